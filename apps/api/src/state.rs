use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::persistence::SubmissionStore;
use crate::render::pdf::PdfRenderer;
use crate::render::template::ResumeTemplate;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Every handle is created once in `main` and only read by requests.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn TextGenerator>,
    pub renderer: Arc<dyn PdfRenderer>,
    /// `None` turns submission capture into a logged no-op.
    pub store: Option<Arc<dyn SubmissionStore>>,
    pub template: Arc<ResumeTemplate>,
    pub config: Config,
}
