//! Parsing for prompt commands (`add Deep work 2.5 high`) and `--task` specs
//! (`Deep work:2.5:high`).

use anyhow::{anyhow, bail, Result};
use hourglass_core::{NewTask, Priority, TaskId, TimeFrame};
use regex::{Captures, Regex};

use crate::export::ExportFormat;

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Add(NewTask),
    Remove(TaskId),
    SetDuration(TaskId, f64),
    Frame(TimeFrame),
    Available(f64),
    Export(ExportFormat),
    Help,
    Quit,
}

pub struct CommandParser {
    add_re: Regex,
    remove_re: Regex,
    set_re: Regex,
    frame_re: Regex,
    avail_re: Regex,
    export_re: Regex,
    task_spec_re: Regex,
}

const HOURS: &str = r"(?P<hours>\d+(?:\.\d+)?|\.\d+)h?";

fn hours(caps: &Captures<'_>) -> Result<f64> {
    let raw = &caps["hours"];
    raw.parse()
        .map_err(|_| anyhow!("invalid number of hours: {raw}"))
}

fn priority(caps: &Captures<'_>) -> Result<Option<Priority>> {
    match caps.name("prio").map(|m| m.as_str()) {
        None => Ok(Some(Priority::default())),
        Some("-") => Ok(None),
        Some(p) => p.parse().map(Some).map_err(|e: String| anyhow!(e)),
    }
}

fn task_id(caps: &Captures<'_>) -> Result<TaskId> {
    let raw = &caps["id"];
    raw.parse()
        .map_err(|_| anyhow!("invalid task id: {raw}"))
}

impl CommandParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            add_re: Regex::new(&format!(
                r"(?i)^add\s+(?P<name>.+?)\s+{HOURS}(?:\s+(?P<prio>high|medium|med|low|[hml]|-))?$"
            ))?,
            remove_re: Regex::new(r"(?i)^(?:rm|del|delete|remove)\s+#?(?P<id>\d+)$")?,
            set_re: Regex::new(&format!(r"(?i)^set\s+#?(?P<id>\d+)\s+{HOURS}$"))?,
            frame_re: Regex::new(r"(?i)^frame\s+(?P<frame>\w+)$")?,
            avail_re: Regex::new(&format!(r"(?i)^(?:avail|available)\s+{HOURS}$"))?,
            export_re: Regex::new(r"(?i)^export\s+(?P<format>\w+)$")?,
            task_spec_re: Regex::new(&format!(
                r"^(?P<name>.+?):{HOURS}(?::(?P<prio>[A-Za-z]+|-))?$"
            ))?,
        })
    }

    pub fn parse(&self, line: &str) -> Result<ShellCommand> {
        let line = line.trim();
        match line.to_lowercase().as_str() {
            "help" | "?" | "/help" => return Ok(ShellCommand::Help),
            "quit" | "exit" | "q" | "/quit" => return Ok(ShellCommand::Quit),
            _ => {}
        }

        if let Some(caps) = self.add_re.captures(line) {
            let task = NewTask::new(caps["name"].trim(), hours(&caps)?).with_priority(priority(&caps)?);
            return Ok(ShellCommand::Add(task));
        }
        if let Some(caps) = self.remove_re.captures(line) {
            return Ok(ShellCommand::Remove(task_id(&caps)?));
        }
        if let Some(caps) = self.set_re.captures(line) {
            return Ok(ShellCommand::SetDuration(task_id(&caps)?, hours(&caps)?));
        }
        if let Some(caps) = self.frame_re.captures(line) {
            let frame = caps["frame"].parse().map_err(|e: String| anyhow!(e))?;
            return Ok(ShellCommand::Frame(frame));
        }
        if let Some(caps) = self.avail_re.captures(line) {
            return Ok(ShellCommand::Available(hours(&caps)?));
        }
        if let Some(caps) = self.export_re.captures(line) {
            return Ok(ShellCommand::Export(caps["format"].parse()?));
        }

        bail!("unknown command: {line} (type help)")
    }

    /// `NAME:HOURS[:PRIORITY]`; a priority of `-` leaves the task without one.
    pub fn parse_task_spec(&self, spec: &str) -> Result<NewTask> {
        let caps = self
            .task_spec_re
            .captures(spec.trim())
            .ok_or_else(|| anyhow!("invalid task '{spec}' (expected NAME:HOURS[:PRIORITY])"))?;
        Ok(NewTask::new(&caps["name"], hours(&caps)?).with_priority(priority(&caps)?))
    }
}

pub const HELP: &[&str] = &[
    "add <name> <hours> [high|medium|low]   add a task (default priority: medium)",
    "rm <id>                                remove a task",
    "set <id> <hours>                       change a task's duration",
    "frame daily|weekly                     change the time frame label",
    "avail <hours>                          change the available time",
    "export pdf|png|jpeg|json               export the current report",
    "keys: Up/Down select, Del remove, PgUp/PgDn +/-0.25h, Esc quit",
];

#[cfg(test)]
mod tests {
    use super::*;

    fn p() -> CommandParser {
        CommandParser::new().unwrap()
    }

    #[test]
    fn add_with_multiword_name_and_priority() {
        let cmd = p().parse("add Deep work 2.5 high").unwrap();
        assert_eq!(
            cmd,
            ShellCommand::Add(NewTask::new("Deep work", 2.5).with_priority(Some(Priority::High)))
        );
    }

    #[test]
    fn add_defaults_to_medium() {
        let ShellCommand::Add(task) = p().parse("add Gym 1h").unwrap() else {
            panic!("expected add");
        };
        assert_eq!(task.name, "Gym");
        assert_eq!(task.duration, 1.0);
        assert_eq!(task.priority, Some(Priority::Medium));
    }

    #[test]
    fn add_name_may_end_in_a_number() {
        let ShellCommand::Add(task) = p().parse("add Chapter 3 0.75 l").unwrap() else {
            panic!("expected add");
        };
        assert_eq!(task.name, "Chapter 3");
        assert_eq!(task.duration, 0.75);
        assert_eq!(task.priority, Some(Priority::Low));
    }

    #[test]
    fn id_commands() {
        assert_eq!(p().parse("rm #4").unwrap(), ShellCommand::Remove(TaskId(4)));
        assert_eq!(
            p().parse("set 2 3.25").unwrap(),
            ShellCommand::SetDuration(TaskId(2), 3.25)
        );
    }

    #[test]
    fn budget_commands() {
        assert_eq!(p().parse("frame Weekly").unwrap(), ShellCommand::Frame(TimeFrame::Weekly));
        assert_eq!(p().parse("avail 40").unwrap(), ShellCommand::Available(40.0));
        assert!(p().parse("frame monthly").is_err());
    }

    #[test]
    fn export_and_misc() {
        assert_eq!(p().parse("export jpg").unwrap(), ShellCommand::Export(ExportFormat::Jpeg));
        assert_eq!(p().parse("  QUIT ").unwrap(), ShellCommand::Quit);
        assert_eq!(p().parse("?").unwrap(), ShellCommand::Help);
        assert!(p().parse("export gif").is_err());
        assert!(p().parse("dance").is_err());
    }

    #[test]
    fn task_specs() {
        let parser = p();
        let t = parser.parse_task_spec("Work:8:high").unwrap();
        assert_eq!(t, NewTask::new("Work", 8.0).with_priority(Some(Priority::High)));

        let t = parser.parse_task_spec("Sleep:8:-").unwrap();
        assert_eq!(t.priority, None);

        let t = parser.parse_task_spec("Ratio 1:2 study:1.5").unwrap();
        assert_eq!(t.name, "Ratio 1:2 study");
        assert_eq!(t.priority, Some(Priority::Medium));

        assert!(parser.parse_task_spec("no hours").is_err());
        assert!(parser.parse_task_spec("Work:8:urgent").is_err());
    }
}
