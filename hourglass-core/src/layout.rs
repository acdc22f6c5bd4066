//! Report layout engine.
//!
//! Turns a task snapshot, its budget and the derived allocation into a
//! paginated list of draw commands on an A4 grid in millimetres (origin top
//! left, text `y` is the baseline). No font metrics are needed here: centred
//! text carries `Align::Center` and the renderer measures it.
//!
//! Vertical cursor model:
//! - `y` starts at the top margin on every page.
//! - Title, date and budget lines advance `y` by fixed amounts.
//! - Each table is a heading, a filled header row, then data rows.
//! - Before a data row is drawn, `y > PAGE_BREAK_Y` starts a new page.
//!   Headings and header rows never trigger a break. Rows are fixed height
//!   and never split.
//!
//! Output is a pure function of the inputs; the report date is passed in.

use crate::allocation::Allocation;
use crate::format;
use crate::task::{Budget, Task};
use crate::time::{format_date, DEFAULT_DATE_FORMAT};
use chrono::NaiveDate;
use serde::Serialize;

pub const PAGE_WIDTH: f64 = 210.0;
pub const PAGE_HEIGHT: f64 = 297.0;
pub const MARGIN: f64 = 10.0;
pub const TABLE_WIDTH: f64 = 170.0;
pub const ROW_HEIGHT: f64 = 8.0;
/// Baseline offset of text inside a row.
pub const ROW_BASELINE: f64 = 6.0;
pub const PAGE_BREAK_Y: f64 = 270.0;
pub const SECTION_GAP: f64 = 10.0;
pub const HEADING_ADVANCE: f64 = 8.0;
pub const TITLE_ADVANCE: f64 = 15.0;
pub const DATE_ADVANCE: f64 = 15.0;
pub const BUDGET_ADVANCE: f64 = 10.0;

pub const TITLE: &str = "Time Management Summary";
pub const UNALLOCATED_LABEL: &str = "Unallocated Time";

const TITLE_SIZE: f64 = 20.0;
const DATE_SIZE: f64 = 10.0;
const BUDGET_SIZE: f64 = 12.0;
const HEADING_SIZE: f64 = 14.0;
const TABLE_SIZE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const ACCENT: Rgb = Rgb(13, 82, 86);
    pub const MUTED: Rgb = Rgb(100, 100, 100);
    pub const ROW_FILL: Rgb = Rgb(237, 242, 244);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Text {
        x: f64,
        y: f64,
        text: String,
        font_size: f64,
        color: Rgb,
        align: Align,
    },
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Rgb,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub commands: Vec<DrawCommand>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub width: f64,
    pub height: f64,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every text command as `(page index, x, y, text)`, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = (usize, f64, f64, &str)> {
        self.pages.iter().enumerate().flat_map(|(i, page)| {
            page.commands.iter().filter_map(move |c| match c {
                DrawCommand::Text { x, y, text, .. } => Some((i, *x, *y, text.as_str())),
                DrawCommand::FillRect { .. } => None,
            })
        })
    }
}

/// Report metadata that is not part of the task snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportMeta {
    pub generated_on: NaiveDate,
    /// strftime pattern for the "Generated on" line.
    pub date_format: String,
}

impl ReportMeta {
    pub fn new(generated_on: NaiveDate) -> Self {
        Self {
            generated_on,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    pub fn with_date_format(mut self, pattern: impl Into<String>) -> Self {
        self.date_format = pattern.into();
        self
    }

    /// Falls back to ISO-8601 if the configured pattern is unusable.
    pub fn date_label(&self) -> String {
        format_date(self.generated_on, &self.date_format)
            .unwrap_or_else(|_| self.generated_on.to_string())
    }
}

struct Column {
    label: &'static str,
    offset: f64,
}

const TASK_COLUMNS: [Column; 4] = [
    Column { label: "Task Name", offset: 2.0 },
    Column { label: "Duration (hrs)", offset: 70.0 },
    Column { label: "Priority", offset: 110.0 },
    Column { label: "% of Total", offset: 140.0 },
];

const SUMMARY_COLUMNS: [Column; 2] = [
    Column { label: "Metric", offset: 2.0 },
    Column { label: "Value", offset: 70.0 },
];

const DISTRIBUTION_COLUMNS: [Column; 3] = [
    Column { label: "Task", offset: 2.0 },
    Column { label: "Hours", offset: 70.0 },
    Column { label: "Percentage", offset: 110.0 },
];

struct Row {
    cells: Vec<String>,
    filled: bool,
}

impl Row {
    fn striped(index: usize, cells: Vec<String>) -> Self {
        Self {
            cells,
            filled: index % 2 == 0,
        }
    }
}

struct Cursor {
    done: Vec<Page>,
    current: Page,
    y: f64,
}

impl Cursor {
    fn new() -> Self {
        Self {
            done: Vec::new(),
            current: Page::default(),
            y: MARGIN,
        }
    }

    fn break_if_needed(&mut self) {
        if self.y > PAGE_BREAK_Y {
            let full = std::mem::take(&mut self.current);
            self.done.push(full);
            self.y = MARGIN;
        }
    }

    fn text(&mut self, x: f64, y: f64, text: String, font_size: f64, color: Rgb, align: Align) {
        self.current.commands.push(DrawCommand::Text {
            x,
            y,
            text,
            font_size,
            color,
            align,
        });
    }

    fn fill(&mut self, y: f64, color: Rgb) {
        self.current.commands.push(DrawCommand::FillRect {
            x: MARGIN,
            y,
            width: TABLE_WIDTH,
            height: ROW_HEIGHT,
            color,
        });
    }

    /// Headings and header rows never break; only data rows do.
    fn heading(&mut self, label: &str) {
        let y = self.y;
        self.text(MARGIN, y, label.to_string(), HEADING_SIZE, Rgb::ACCENT, Align::Left);
        self.y += HEADING_ADVANCE;
    }

    fn header_row(&mut self, columns: &[Column]) {
        let y = self.y;
        self.fill(y, Rgb::ACCENT);
        for col in columns {
            self.text(
                MARGIN + col.offset,
                y + ROW_BASELINE,
                col.label.to_string(),
                TABLE_SIZE,
                Rgb::WHITE,
                Align::Left,
            );
        }
        self.y += ROW_HEIGHT;
    }

    fn data_row(&mut self, columns: &[Column], row: Row) {
        self.break_if_needed();
        let y = self.y;
        if row.filled {
            self.fill(y, Rgb::ROW_FILL);
        }
        for (col, cell) in columns.iter().zip(row.cells) {
            self.text(
                MARGIN + col.offset,
                y + ROW_BASELINE,
                cell,
                TABLE_SIZE,
                Rgb::BLACK,
                Align::Left,
            );
        }
        self.y += ROW_HEIGHT;
    }

    fn table(&mut self, heading: &str, columns: &[Column], rows: Vec<Row>) {
        self.heading(heading);
        self.header_row(columns);
        for row in rows {
            self.data_row(columns, row);
        }
    }

    fn finish(mut self) -> Vec<Page> {
        self.done.push(self.current);
        self.done
    }
}

/// Tasks ordered by duration, longest first. Equal durations keep input order.
pub fn distribution_order(tasks: &[Task]) -> Vec<&Task> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by(|a, b| b.duration.total_cmp(&a.duration));
    sorted
}

fn task_rows(tasks: &[Task], allocation: &Allocation) -> Vec<Row> {
    tasks
        .iter()
        .enumerate()
        .map(|(i, t)| {
            Row::striped(
                i,
                vec![
                    t.name.clone(),
                    format::hours(t.duration),
                    t.priority.map_or("-", |p| p.label()).to_string(),
                    format::percent(allocation.task_percent(t)),
                ],
            )
        })
        .collect()
}

fn summary_rows(allocation: &Allocation) -> Vec<Row> {
    let pairs = [
        (
            "Total Available Time",
            format!("{} hours", format::hours(allocation.available_time)),
        ),
        (
            "Total Allocated Time",
            format!("{} hours", format::fixed1(allocation.total_allocated_time)),
        ),
        ("Remaining Time", format::remaining_value(allocation)),
        ("Utilization", format::percent(allocation.utilization())),
    ];
    pairs
        .into_iter()
        .enumerate()
        .map(|(i, (label, value))| Row::striped(i, vec![label.to_string(), value]))
        .collect()
}

fn distribution_rows(tasks: &[Task], allocation: &Allocation) -> Vec<Row> {
    let mut rows: Vec<Row> = distribution_order(tasks)
        .into_iter()
        .enumerate()
        .map(|(i, t)| {
            Row::striped(
                i,
                vec![
                    t.name.clone(),
                    format::hours(t.duration),
                    format::percent(allocation.task_percent(t)),
                ],
            )
        })
        .collect();

    if let Some(free) = allocation.unallocated() {
        rows.push(Row {
            cells: vec![
                UNALLOCATED_LABEL.to_string(),
                format::fixed1(free),
                format::percent(allocation.percent_of(free)),
            ],
            filled: true,
        });
    }
    rows
}

pub fn layout(
    tasks: &[Task],
    budget: &Budget,
    allocation: &Allocation,
    meta: &ReportMeta,
) -> Document {
    let mut cur = Cursor::new();
    let center = PAGE_WIDTH / 2.0;

    let y = cur.y;
    cur.text(center, y, TITLE.to_string(), TITLE_SIZE, Rgb::ACCENT, Align::Center);
    cur.y += TITLE_ADVANCE;

    let y = cur.y;
    cur.text(
        center,
        y,
        format!("Generated on: {}", meta.date_label()),
        DATE_SIZE,
        Rgb::MUTED,
        Align::Center,
    );
    cur.y += DATE_ADVANCE;

    let y = cur.y;
    cur.text(
        MARGIN,
        y,
        format!(
            "Time Frame: {} ({} hours)",
            budget.time_frame.label(),
            format::hours(budget.available_time)
        ),
        BUDGET_SIZE,
        Rgb::BLACK,
        Align::Left,
    );
    cur.y += BUDGET_ADVANCE;

    cur.table("Tasks", &TASK_COLUMNS, task_rows(tasks, allocation));

    cur.y += SECTION_GAP;
    cur.table("Time Summary", &SUMMARY_COLUMNS, summary_rows(allocation));

    cur.y += SECTION_GAP;
    cur.table(
        "Time Distribution",
        &DISTRIBUTION_COLUMNS,
        distribution_rows(tasks, allocation),
    );

    Document {
        width: PAGE_WIDTH,
        height: PAGE_HEIGHT,
        pages: cur.finish(),
    }
}
