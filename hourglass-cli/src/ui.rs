use hourglass_core::{format, palette, Rgb};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, LogLevel};

const ACCENT: Color = Color::Rgb(0x0d, 0x52, 0x56);

fn rgb(c: Rgb) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(7),
            Constraint::Length(3),
        ])
        .split(f.area());

    draw_header(f, rows[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);
    draw_tasks(f, body[0], app);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(6)])
        .split(body[1]);
    draw_summary(f, side[0], app);
    draw_chart(f, side[1], app);

    draw_log(f, rows[2], app);
    draw_input(f, rows[3], app);
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let budget = app.store.budget();
    let mut spans = vec![
        Span::styled(
            "Time Management Calculator",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!(
                "{} · {} hours",
                budget.time_frame.label(),
                format::hours(budget.available_time)
            ),
            Style::default().fg(Color::Cyan),
        ),
    ];
    if app.exports_in_flight > 0 {
        spans.push(Span::styled(
            format!("  exporting ({})", app.exports_in_flight),
            Style::default().fg(Color::Yellow),
        ));
    }
    let header = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_tasks(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title("your tasks");

    if app.store.is_empty() {
        let empty = Paragraph::new("No tasks added yet. Start by adding your first task!")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .store
        .tasks()
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let prio = t.priority.map_or("-", |p| p.label());
            ListItem::new(Line::from(vec![
                Span::styled("■ ", Style::default().fg(rgb(palette::task_color(i)))),
                Span::styled(format!("#{:<3} ", t.id), Style::default().fg(Color::DarkGray)),
                Span::styled(t.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(format!("  [{prio}]"), Style::default().fg(Color::Gray)),
                Span::raw(format!(
                    "  {} {}",
                    format::hours(t.duration),
                    format::hours_noun(t.duration)
                )),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(ACCENT).fg(Color::White))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(app.selected);
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_summary(f: &mut Frame, area: Rect, app: &App) {
    let alloc = app.store.allocation();
    let frame = app.store.budget().time_frame;

    let block = Block::default().borders(Borders::ALL).title("time summary");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let allocated = Line::from(vec![
        Span::raw("Allocated Time  "),
        Span::styled(
            format!(
                "{} / {} hours",
                format::fixed1(alloc.total_allocated_time),
                format::hours(alloc.available_time)
            ),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(allocated), parts[0]);

    let bar_color = if alloc.is_overbooked {
        rgb(palette::OVERBOOKED)
    } else {
        ACCENT
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(bar_color).bg(Color::DarkGray))
        .ratio(alloc.progress_percent() / 100.0)
        .label(format::percent(alloc.utilization()));
    f.render_widget(gauge, parts[1]);

    let status_color = if alloc.is_overbooked {
        Color::Red
    } else {
        Color::Green
    };
    let text = Text::from(vec![
        Line::raw(""),
        Line::from(Span::styled(
            format::status_line(&alloc),
            Style::default().fg(status_color),
        )),
        Line::from(Span::styled(
            format::time_frame_line(frame),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            format::advice_line(&alloc, frame),
            Style::default().fg(Color::Gray),
        )),
    ]);
    f.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), parts[2]);
}

fn draw_chart(f: &mut Frame, area: Rect, app: &App) {
    let alloc = app.store.allocation();

    // bar values are quarter hours so fractional durations keep their height
    let mut bars: Vec<Bar> = app
        .store
        .tasks()
        .iter()
        .enumerate()
        .map(|(i, t)| {
            Bar::default()
                .value((t.duration * 4.0).round() as u64)
                .text_value(format!("{}h", format::fixed1(t.duration)))
                .label(Line::from(t.name.clone()))
                .style(Style::default().fg(rgb(palette::task_color(i))))
        })
        .collect();
    if let Some(free) = alloc.unallocated() {
        bars.push(
            Bar::default()
                .value((free * 4.0).round() as u64)
                .text_value(format!("{}h", format::fixed1(free)))
                .label(Line::from("Unallocated"))
                .style(Style::default().fg(rgb(palette::UNALLOCATED))),
        );
    }

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title("time distribution"))
        .data(BarGroup::default().bars(&bars))
        .bar_width(7)
        .bar_gap(1)
        .max((alloc.available_time.max(alloc.total_allocated_time) * 4.0).ceil() as u64);
    f.render_widget(chart, area);
}

fn draw_log(f: &mut Frame, area: Rect, app: &App) {
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = app
        .log()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .take(visible)
        .rev()
        .map(|l| {
            let color = match l.level {
                LogLevel::Info => Color::Gray,
                LogLevel::Error => Color::Red,
            };
            Line::from(Span::styled(l.text.clone(), Style::default().fg(color)))
        })
        .collect();
    let title = if app.show_help {
        "log · type help to hide shortcuts"
    } else {
        "log"
    };
    let log = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(log, area);
}

fn draw_input(f: &mut Frame, area: Rect, app: &App) {
    let input = Paragraph::new(app.input.as_str())
        .style(Style::default().fg(Color::White))
        .block(Block::default().borders(Borders::ALL).title("command"));
    f.render_widget(input, area);
}
