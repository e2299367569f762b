// HTML rendering, PDF export and delivery of the temporary artifact.
// Chromium and Tera are black boxes behind this module.

pub mod artifact;
pub mod pdf;
pub mod template;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template rendering failed: {0}")]
    Template(String),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tera::Error> for RenderError {
    fn from(e: tera::Error) -> Self {
        // Tera nests the useful detail in the source chain.
        let mut message = e.to_string();
        let mut source = std::error::Error::source(&e);
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = inner.source();
        }
        RenderError::Template(message)
    }
}

impl From<chromiumoxide::error::CdpError> for RenderError {
    fn from(e: chromiumoxide::error::CdpError) -> Self {
        RenderError::Browser(e.to_string())
    }
}
