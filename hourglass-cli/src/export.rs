//! Export paths: PDF file write, raster snapshot via an external converter,
//! and a JSON dump of the laid-out document.
//!
//! Every export works on a `Document` built from a snapshot taken when the
//! export was requested, so the session can keep mutating while it runs.

use anyhow::{bail, Context, Result};
use hourglass_core::Document;
use hourglass_pdf::{render_pdf, PDF_FILE_NAME};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::process::Command;

pub const RASTER_STEM: &str = "time-management";
pub const LAYOUT_FILE_NAME: &str = "time-management-layout.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Pdf,
    Png,
    #[value(alias = "jpg")]
    Jpeg,
    Json,
}

impl ExportFormat {
    pub fn file_name(self) -> String {
        match self {
            ExportFormat::Pdf => PDF_FILE_NAME.to_string(),
            ExportFormat::Png => format!("{RASTER_STEM}.png"),
            ExportFormat::Jpeg => format!("{RASTER_STEM}.jpg"),
            ExportFormat::Json => LAYOUT_FILE_NAME.to_string(),
        }
    }

    fn raster_flag(self) -> Option<&'static str> {
        match self {
            ExportFormat::Png => Some("-png"),
            ExportFormat::Jpeg => Some("-jpeg"),
            ExportFormat::Pdf | ExportFormat::Json => None,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
            ExportFormat::Json => "json",
        };
        f.write_str(s)
    }
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "png" => Ok(ExportFormat::Png),
            "jpeg" | "jpg" => Ok(ExportFormat::Jpeg),
            "json" => Ok(ExportFormat::Json),
            other => bail!("unknown export format '{other}' (expected pdf, png, jpeg or json)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub output_dir: PathBuf,
    pub raster_command: String,
    pub raster_dpi: u32,
    /// Written into the PDF Producer field.
    pub producer: String,
}

/// Write `doc` in `format` under the output directory; returns the file written.
pub async fn export(doc: Document, format: ExportFormat, settings: &ExportSettings) -> Result<PathBuf> {
    tokio::fs::create_dir_all(&settings.output_dir)
        .await
        .with_context(|| format!("create {}", settings.output_dir.display()))?;
    let out = settings.output_dir.join(format.file_name());

    match format {
        ExportFormat::Pdf => {
            let bytes = render_pdf(&doc, &settings.producer).context("render pdf")?;
            tokio::fs::write(&out, bytes)
                .await
                .with_context(|| format!("write {}", out.display()))?;
        }
        ExportFormat::Json => {
            let bytes = serde_json::to_vec_pretty(&doc).context("serialize layout")?;
            tokio::fs::write(&out, bytes)
                .await
                .with_context(|| format!("write {}", out.display()))?;
        }
        ExportFormat::Png | ExportFormat::Jpeg => {
            rasterize(&doc, format, settings).await?;
        }
    }

    tracing::info!(format = %format, path = %out.display(), "export written");
    Ok(out)
}

/// Render the first page to an image by handing the PDF to the configured converter.
async fn rasterize(doc: &Document, format: ExportFormat, settings: &ExportSettings) -> Result<()> {
    let Some(flag) = format.raster_flag() else {
        bail!("{format} is not a raster format");
    };

    let bin = which::which(&settings.raster_command).map_err(|_| {
        anyhow::anyhow!(
            "{} is not installed. Install poppler-utils, or set export.raster_command in ~/.hourglass/config.toml.\n\nmacOS (brew):  brew install poppler\nUbuntu:        apt install poppler-utils\n\nOr export a PDF instead: hourglass report --format pdf",
            settings.raster_command
        )
    })?;

    let scratch = tempfile::tempdir().context("create scratch dir")?;
    let pdf_path = scratch.path().join(PDF_FILE_NAME);
    let bytes = render_pdf(doc, &settings.producer).context("render pdf")?;
    tokio::fs::write(&pdf_path, bytes)
        .await
        .with_context(|| format!("write {}", pdf_path.display()))?;

    let stem = settings.output_dir.join(RASTER_STEM);
    run_converter(&bin, flag, settings.raster_dpi, &pdf_path, &stem).await
}

async fn run_converter(bin: &Path, flag: &str, dpi: u32, pdf: &Path, stem: &Path) -> Result<()> {
    tracing::debug!(converter = %bin.display(), flag, dpi, "rasterizing");
    let output = Command::new(bin)
        .arg("-singlefile")
        .args(["-r", &dpi.to_string()])
        .arg(flag)
        .arg(pdf)
        .arg(stem)
        .output()
        .await
        .with_context(|| format!("running {}", bin.display()))?;

    if !output.status.success() {
        bail!(
            "{} failed with status {}: {}",
            bin.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hourglass_core::{report, NewTask, ReportMeta, TaskStore};

    fn sample_doc() -> Document {
        let mut store = TaskStore::new();
        store.add_task(NewTask::new("Work", 8.0)).unwrap();
        report(&store, &ReportMeta::new(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()))
    }

    fn settings(dir: &Path, raster: &str) -> ExportSettings {
        ExportSettings {
            output_dir: dir.to_path_buf(),
            raster_command: raster.to_string(),
            raster_dpi: 72,
            producer: "hourglass test".to_string(),
        }
    }

    #[test]
    fn file_names() {
        assert_eq!(ExportFormat::Pdf.file_name(), "time-management-summary.pdf");
        assert_eq!(ExportFormat::Png.file_name(), "time-management.png");
        assert_eq!(ExportFormat::Jpeg.file_name(), "time-management.jpg");
        assert_eq!("JPG".parse::<ExportFormat>().unwrap(), ExportFormat::Jpeg);
        assert!("gif".parse::<ExportFormat>().is_err());
    }

    #[tokio::test]
    async fn writes_pdf_into_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("exports");
        let path = export(sample_doc(), ExportFormat::Pdf, &settings(&out_dir, "pdftoppm"))
            .await
            .unwrap();
        assert_eq!(path, out_dir.join("time-management-summary.pdf"));
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
    }

    #[tokio::test]
    async fn writes_layout_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = export(sample_doc(), ExportFormat::Json, &settings(dir.path(), "pdftoppm"))
            .await
            .unwrap();
        let v: serde_json::Value = serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
        assert_eq!(v["width"], 210.0);
    }

    #[tokio::test]
    async fn missing_converter_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let err = export(
            sample_doc(),
            ExportFormat::Png,
            &settings(dir.path(), "hourglass-no-such-converter"),
        )
        .await
        .unwrap_err();
        assert!(format!("{err:#}").contains("not installed"));
        assert!(!dir.path().join("time-management.png").exists());
    }
}
