use anyhow::{Context, Result};
use chrono::Local;
use hourglass_core::{today_in, Budget, ReportMeta, TimeFrame, DEFAULT_DATE_FORMAT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::export::ExportSettings;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub budget: BudgetSection,
    pub report: ReportSection,
    pub export: ExportSection,
    pub log: LogSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetSection {
    pub time_frame: TimeFrame,
    /// Hours available at session start.
    pub available_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    /// strftime pattern for the "Generated on" line.
    pub date_format: String,
    /// IANA zone used to decide today's date; local time when unset.
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSection {
    pub output_dir: PathBuf,
    /// PDF-to-raster converter, invoked poppler-style (`pdftoppm`).
    pub raster_command: String,
    pub raster_dpi: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    pub level: String,
    /// Defaults to ~/.hourglass/hourglass.log
    pub file: Option<PathBuf>,
}

impl Default for BudgetSection {
    fn default() -> Self {
        let b = Budget::default();
        Self {
            time_frame: b.time_frame,
            available_time: b.available_time,
        }
    }
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            timezone: None,
        }
    }
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            raster_command: "pdftoppm".to_string(),
            raster_dpi: 150,
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    pub fn budget(&self) -> Budget {
        Budget::new(self.budget.time_frame, self.budget.available_time)
    }

    /// Command-line overrides win over the file.
    pub fn apply_budget_overrides(&mut self, frame: Option<TimeFrame>, available: Option<f64>) {
        if let Some(frame) = frame {
            self.budget.time_frame = frame;
        }
        if let Some(hours) = available {
            self.budget.available_time = hours;
        }
    }

    pub fn report_meta(&self) -> Result<ReportMeta> {
        let today = match &self.report.timezone {
            Some(tz) => today_in(tz)?,
            None => Local::now().date_naive(),
        };
        Ok(ReportMeta::new(today).with_date_format(self.report.date_format.clone()))
    }

    pub fn export_settings(&self, output_dir: Option<PathBuf>) -> ExportSettings {
        ExportSettings {
            output_dir: output_dir.unwrap_or_else(|| self.export.output_dir.clone()),
            raster_command: self.export.raster_command.clone(),
            raster_dpi: self.export.raster_dpi,
            producer: crate::producer(),
        }
    }
}

pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => crate::state::default_config_path(),
    }
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_config(&s)
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    save_config(path, &Config::default())?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.budget().available_time, 24.0);
        assert_eq!(cfg.export.raster_command, "pdftoppm");
    }

    #[test]
    fn partial_sections_fill_in_defaults() {
        let cfg = parse_config(
            r#"
            [budget]
            time_frame = "weekly"
            available_time = 40.0

            [report]
            timezone = "America/Chicago"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.budget.time_frame, TimeFrame::Weekly);
        assert_eq!(cfg.budget.available_time, 40.0);
        assert_eq!(cfg.report.date_format, DEFAULT_DATE_FORMAT);
        assert!(cfg.report_meta().is_ok());
    }

    #[test]
    fn bad_timezone_is_an_error() {
        let mut cfg = Config::default();
        cfg.report.timezone = Some("Nowhere/Special".into());
        assert!(cfg.report_meta().is_err());
    }

    #[test]
    fn overrides_win() {
        let mut cfg = Config::default();
        cfg.apply_budget_overrides(Some(TimeFrame::Weekly), Some(60.0));
        assert_eq!(cfg.budget(), Budget::new(TimeFrame::Weekly, 60.0));
        cfg.apply_budget_overrides(None, None);
        assert_eq!(cfg.budget().available_time, 60.0);
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.export.raster_dpi = 300;
        save_config(&path, &cfg).unwrap();
        assert_eq!(load_config(&path).unwrap(), cfg);
        assert_eq!(load_config(&dir.path().join("missing.toml")).unwrap(), Config::default());
    }
}
