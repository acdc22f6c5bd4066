//! Session state for the interactive shell. Pure state transitions; the
//! terminal loop in `shell.rs` owns drawing and export tasks.

use anyhow::Result;
use hourglass_core::{Budget, TaskId, TaskPatch, TaskStore};
use hourglass_core::task::DURATION_STEP;
use std::collections::VecDeque;
use std::path::Path;

use crate::command::{CommandParser, ShellCommand, HELP};
use crate::export::ExportFormat;

const LOG_CAPACITY: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: LogLevel,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
    Export(ExportFormat),
}

pub struct App {
    pub store: TaskStore,
    pub input: String,
    pub selected: Option<usize>,
    pub show_help: bool,
    pub exports_in_flight: usize,
    log: VecDeque<LogLine>,
    parser: CommandParser,
}

impl App {
    pub fn new(budget: Budget) -> Result<Self> {
        Ok(Self {
            store: TaskStore::with_budget(budget),
            input: String::new(),
            selected: None,
            show_help: true,
            exports_in_flight: 0,
            log: VecDeque::new(),
            parser: CommandParser::new()?,
        })
    }

    pub fn log(&self) -> impl Iterator<Item = &LogLine> {
        self.log.iter()
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(LogLevel::Info, text.into());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::warn!(%text, "session error");
        self.push(LogLevel::Error, text);
    }

    fn push(&mut self, level: LogLevel, text: String) {
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(LogLine { level, text });
    }

    /// Run whatever is in the input line and clear it.
    pub fn submit(&mut self) -> Outcome {
        let line = std::mem::take(&mut self.input);
        if line.trim().is_empty() {
            return Outcome::Continue;
        }
        self.execute(&line)
    }

    pub fn execute(&mut self, line: &str) -> Outcome {
        let cmd = match self.parser.parse(line) {
            Ok(cmd) => cmd,
            Err(e) => {
                self.error(e.to_string());
                return Outcome::Continue;
            }
        };
        tracing::debug!(?cmd, "command");

        match cmd {
            ShellCommand::Add(task) => match self.store.add_task(task) {
                Ok(id) => {
                    self.selected = Some(self.store.len() - 1);
                    self.info(format!("added task #{id}"));
                }
                Err(e) => self.error(e.to_string()),
            },
            ShellCommand::Remove(id) => match self.store.remove_task(id) {
                Some(task) => {
                    self.clamp_selection();
                    self.info(format!("removed #{id} {}", task.name));
                }
                None => self.error(format!("no task with id {id}")),
            },
            ShellCommand::SetDuration(id, hours) => {
                match self.store.update_task(id, TaskPatch::duration(hours)) {
                    Ok(task) => {
                        let msg = format!("#{id} {} is now {hours}h", task.name);
                        self.info(msg);
                    }
                    Err(e) => self.error(e.to_string()),
                }
            }
            ShellCommand::Frame(frame) => {
                self.store.set_time_frame(frame);
                self.info(format!("time frame: {}", frame.label()));
            }
            ShellCommand::Available(hours) => match self.store.set_available_time(hours) {
                Ok(()) => self.info(format!("available time: {hours}h")),
                Err(e) => self.error(e.to_string()),
            },
            ShellCommand::Export(format) => {
                self.exports_in_flight += 1;
                self.info(format!("exporting {format}..."));
                return Outcome::Export(format);
            }
            ShellCommand::Help => {
                self.show_help = !self.show_help;
                if self.show_help {
                    for line in HELP {
                        self.info(*line);
                    }
                }
            }
            ShellCommand::Quit => return Outcome::Quit,
        }
        Outcome::Continue
    }

    pub fn export_finished(&mut self, format: ExportFormat, result: Result<&Path, String>) {
        self.exports_in_flight = self.exports_in_flight.saturating_sub(1);
        match result {
            Ok(path) => self.info(format!("{format} saved to {}", path.display())),
            Err(e) => self.error(format!("{format} export failed: {e}")),
        }
    }

    pub fn select_next(&mut self) {
        let n = self.store.len();
        if n == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) if i + 1 < n => i + 1,
            Some(i) => i,
            None => 0,
        });
    }

    pub fn select_prev(&mut self) {
        if self.store.is_empty() {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => i.saturating_sub(1),
            None => 0,
        });
    }

    pub fn remove_selected(&mut self) {
        let Some(id) = self.selected_id() else { return };
        if let Some(task) = self.store.remove_task(id) {
            self.clamp_selection();
            self.info(format!("removed #{id} {}", task.name));
        }
    }

    /// Step the selected task's duration by `steps` quarter hours, never below one step.
    pub fn nudge_selected(&mut self, steps: i32) {
        let Some(i) = self.selected else { return };
        let Some(task) = self.store.tasks().get(i) else { return };
        let id = task.id;
        let hours = (task.duration + f64::from(steps) * DURATION_STEP).max(DURATION_STEP);
        if let Err(e) = self.store.update_task(id, TaskPatch::duration(hours)) {
            self.error(e.to_string());
        }
    }

    fn selected_id(&self) -> Option<TaskId> {
        self.selected
            .and_then(|i| self.store.tasks().get(i))
            .map(|t| t.id)
    }

    fn clamp_selection(&mut self) {
        let n = self.store.len();
        self.selected = match self.selected {
            _ if n == 0 => None,
            Some(i) if i >= n => Some(n - 1),
            other => other,
        };
    }
}
