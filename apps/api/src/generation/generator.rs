//! Resume generation: orchestrates prompts, model calls, template and PDF export.
//!
//! Flow: build_prompts → generate_sections (4× concurrent) → normalize →
//!       render template → export PDF to a temporary artifact.

use tracing::info;

use crate::errors::AppError;
use crate::generation::invoker::generate_sections;
use crate::generation::prompts::build_prompts;
use crate::models::submission::Submission;
use crate::render::artifact::TempArtifact;
use crate::render::template::ResumeView;
use crate::state::AppState;

/// Runs the generation pipeline for a validated submission.
///
/// Returns the PDF as a `TempArtifact`; on any error the artifact (if reserved)
/// is dropped and its file removed.
pub async fn generate_resume(
    state: &AppState,
    submission: &Submission,
) -> Result<TempArtifact, AppError> {
    let prompts = build_prompts(submission);
    let generated = generate_sections(state.generator.as_ref(), &prompts).await?;

    let view = ResumeView::assemble(submission, generated);
    let html = state.template.render(&view)?;

    let artifact = TempArtifact::reserve(&state.config.pdf_output_dir);
    state.renderer.render_pdf(&html, artifact.path()).await?;

    info!(
        "Rendered resume for {} to {}",
        view.name,
        artifact.path().display()
    );
    Ok(artifact)
}
