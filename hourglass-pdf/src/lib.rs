//! hourglass-pdf: serializes a laid-out report into a PDF file.

pub mod metrics;
pub mod writer;

pub use writer::{render_pdf, write_pdf, PdfError};

pub const PDF_FILE_NAME: &str = "time-management-summary.pdf";
