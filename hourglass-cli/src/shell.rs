use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::app::{App, Outcome};
use crate::config::Config;
use crate::export::{self, ExportFormat};
use crate::ui;

type ExportResult = (ExportFormat, Result<PathBuf, String>);

/// How long quitting waits for each outstanding export.
const EXPORT_GRACE: Duration = Duration::from_secs(10);

/// Run the interactive session until the user quits. Blocks the calling
/// thread; exports are spawned onto `rt`.
pub fn run_session(cfg: &Config, rt: Handle) -> Result<()> {
    let mut app = App::new(cfg.budget())?;
    for line in crate::command::HELP {
        app.info(*line);
    }

    enable_raw_mode()?;
    let mut terminal = setup_or_restore(enter_screen, restore_screen)?;

    tracing::info!(budget = ?cfg.budget(), "session start");
    let (tx, mut rx) = unbounded_channel::<ExportResult>();
    let res = session_loop(&mut terminal, &mut app, cfg, &rt, &tx, &mut rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    finish_exports(&mut app, &mut rx, &rt, EXPORT_GRACE);
    tracing::info!(tasks = app.store.len(), "session end");
    res
}

fn enter_screen() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_screen() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// Run `setup`; if it fails, run `restore` before handing back the error.
fn setup_or_restore<T>(setup: impl FnOnce() -> Result<T>, restore: impl FnOnce()) -> Result<T> {
    setup().inspect_err(|_| restore())
}

fn session_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    cfg: &Config,
    rt: &Handle,
    tx: &UnboundedSender<ExportResult>,
    rx: &mut UnboundedReceiver<ExportResult>,
) -> Result<()> {
    loop {
        drain_exports(app, rx);
        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Esc => break,
            KeyCode::Enter => match app.submit() {
                Outcome::Continue => {}
                Outcome::Quit => break,
                Outcome::Export(format) => start_export(app, cfg, rt, format, tx.clone()),
            },
            KeyCode::Up => app.select_prev(),
            KeyCode::Down => app.select_next(),
            KeyCode::Delete => app.remove_selected(),
            KeyCode::PageUp => app.nudge_selected(1),
            KeyCode::PageDown => app.nudge_selected(-1),
            KeyCode::Backspace => {
                app.input.pop();
            }
            KeyCode::Char(c) => app.input.push(c),
            _ => {}
        }
    }

    Ok(())
}

/// Lay out the report from the current state and hand it to a background task.
fn start_export(
    app: &mut App,
    cfg: &Config,
    rt: &Handle,
    format: ExportFormat,
    tx: UnboundedSender<ExportResult>,
) {
    let meta = match cfg.report_meta() {
        Ok(meta) => meta,
        Err(e) => {
            app.export_finished(format, Err(format!("{e:#}")));
            return;
        }
    };
    let doc = hourglass_core::report(&app.store, &meta);
    let settings = cfg.export_settings(None);

    rt.spawn(async move {
        let result = export::export(doc, format, &settings).await.map_err(|e| {
            tracing::error!(%format, error = %format!("{e:#}"), "export failed");
            format!("{e:#}")
        });
        // receiver gone means the session already ended
        let _ = tx.send((format, result));
    });
}

fn drain_exports(app: &mut App, rx: &mut UnboundedReceiver<ExportResult>) {
    while let Ok((format, result)) = rx.try_recv() {
        app.export_finished(format, result.as_deref().map_err(|e| e.clone()));
    }
}

/// Wait up to `grace` per export still running at quit; whatever is left is
/// abandoned with the runtime and logged.
fn finish_exports(
    app: &mut App,
    rx: &mut UnboundedReceiver<ExportResult>,
    rt: &Handle,
    grace: Duration,
) {
    drain_exports(app, rx);
    if app.exports_in_flight > 0 {
        tracing::info!(pending = app.exports_in_flight, "waiting for exports");
    }
    while app.exports_in_flight > 0 {
        match rt.block_on(async { tokio::time::timeout(grace, rx.recv()).await }) {
            Ok(Some((format, result))) => {
                app.export_finished(format, result.as_deref().map_err(|e| e.clone()));
            }
            Ok(None) | Err(_) => break,
        }
    }
    if app.exports_in_flight > 0 {
        tracing::warn!(abandoned = app.exports_in_flight, "exports still running at exit");
    }
}
