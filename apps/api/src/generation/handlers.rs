//! Axum route handler for resume generation.

use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::header,
    response::Response,
    Form, Json,
};

use crate::errors::AppError;
use crate::generation::generator::generate_resume;
use crate::models::submission::Submission;
use crate::persistence::record_submission;
use crate::render::artifact::into_attachment;
use crate::state::AppState;

/// Accepts a `Submission` as JSON or as an url-encoded form, keyed on Content-Type.
pub struct SubmissionBody(pub Submission);

#[async_trait]
impl<S> FromRequest<S> for SubmissionBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        if is_json {
            let Json(submission) = Json::<Submission>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(Self(submission))
        } else {
            let Form(submission) = Form::<Submission>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(Self(submission))
        }
    }
}

/// POST /ask
///
/// Validates, fires a detached save of the raw submission, generates the four
/// sections, renders the PDF and streams it back as `resume.pdf`.
pub async fn handle_ask(
    State(state): State<AppState>,
    SubmissionBody(submission): SubmissionBody,
) -> Result<Response, AppError> {
    submission.validate()?;

    // Not awaited: capture must never delay or fail generation.
    record_submission(state.store.clone(), submission.clone());

    let artifact = generate_resume(&state, &submission).await?;
    into_attachment(artifact).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::llm_client::{LlmError, TextGenerator};
    use crate::persistence::tests::MemoryStore;
    use crate::persistence::SubmissionStore;
    use crate::render::pdf::PdfRenderer;
    use crate::render::template::ResumeTemplate;
    use crate::render::RenderError;
    use crate::routes::build_router;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::Router;
    use serde_json::json;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tower::ServiceExt;

    /// Answers by section and records every prompt it sees.
    #[derive(Default)]
    struct ScriptedGenerator {
        prompts: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if self.fail {
                return Err(LlmError::Api {
                    status: 503,
                    message: "unavailable".to_string(),
                });
            }
            let text = if prompt.contains("Skills to enhance:") {
                "Python, **SQL**"
            } else if prompt.contains("Experience to rewrite:") {
                "NA"
            } else if prompt.contains("Achievements to rewrite:") {
                " na \n"
            } else {
                "* **Engine**: analytical engine notes"
            };
            Ok(text.to_string())
        }
    }

    /// Writes the HTML into the output file behind a fake PDF header.
    #[derive(Default)]
    struct FileRenderer {
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl PdfRenderer for FileRenderer {
        async fn render_pdf(&self, html: &str, output: &Path) -> Result<(), RenderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fail {
                tokio::fs::write(output, b"%PDF-partial").await?;
                return Err(RenderError::Pdf("printToPDF failed".to_string()));
            }
            tokio::fs::write(output, format!("%PDF-fake\n{html}")).await?;
            Ok(())
        }
    }

    struct Harness {
        app: Router,
        generator: Arc<ScriptedGenerator>,
        renderer: Arc<FileRenderer>,
        store: Arc<MemoryStore>,
        dir: tempfile::TempDir,
    }

    fn harness(generator: ScriptedGenerator, renderer: FileRenderer, store: MemoryStore) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let generator = Arc::new(generator);
        let renderer = Arc::new(renderer);
        let store = Arc::new(store);
        let state = AppState {
            generator: generator.clone(),
            renderer: renderer.clone(),
            store: Some(store.clone() as Arc<dyn SubmissionStore>),
            template: Arc::new(ResumeTemplate::new().unwrap()),
            config: Config::for_tests(dir.path().to_path_buf()),
        };
        Harness {
            app: build_router(state),
            generator,
            renderer,
            store,
            dir,
        }
    }

    fn default_harness() -> Harness {
        harness(
            ScriptedGenerator::default(),
            FileRenderer::default(),
            MemoryStore::default(),
        )
    }

    fn ada() -> serde_json::Value {
        json!({
            "name": "Ada",
            "email": "a@x.com",
            "skills": "python, sql",
            "experience": "",
            "achievements": "",
            "projects": "",
            "company": "Acme"
        })
    }

    fn json_request(body: &serde_json::Value) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/ask")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn wait_for_records(store: &MemoryStore, expected: usize) {
        for _ in 0..100 {
            if store.records.lock().unwrap().len() >= expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    fn artifact_count(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    /// Cleanup runs on the blocking pool; give it a moment to land.
    async fn artifacts_left(dir: &Path) -> usize {
        for _ in 0..100 {
            if artifact_count(dir) == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        artifact_count(dir)
    }

    #[tokio::test]
    async fn test_end_to_end_returns_pdf_attachment() {
        let h = default_harness();

        let response = h.app.clone().oneshot(json_request(&ada())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"resume.pdf\""
        );
        let body = body_text(response).await;
        assert!(body.starts_with("%PDF-fake"));
        assert!(body.contains("<h1>Ada</h1>"));
        assert!(!body.contains("<h2>Experience</h2>"));
        assert!(!body.contains("<h2>Achievements</h2>"));
        assert!(body.contains("<strong>Engine</strong>"));

        let prompts = h.generator.prompts.lock().unwrap().clone();
        assert_eq!(prompts.len(), 4);
        assert!(prompts.iter().all(|p| p.contains("\"Acme\"")));
        assert_eq!(h.renderer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_skills_are_never_markdown_rendered() {
        let h = default_harness();

        let response = h.app.clone().oneshot(json_request(&ada())).await.unwrap();
        let body = body_text(response).await;

        assert!(body.contains("<p class=\"skills\">Python, **SQL**</p>"));
        assert!(!body.contains("<strong>SQL</strong>"));
    }

    #[tokio::test]
    async fn test_accepts_urlencoded_form() {
        let h = default_harness();
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/ask")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(
                "name=Grace&email=g%40x.com&skills=cobol&company=Navy&experience=&year=1934&college=Yale",
            ))
            .unwrap();

        let response = h.app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("<h1>Grace</h1>"));
        assert!(body.contains("Yale (1934)"));
        assert!(h
            .generator
            .prompts
            .lock()
            .unwrap()
            .iter()
            .all(|p| p.contains("\"Navy\"")));
    }

    #[tokio::test]
    async fn test_numeric_json_fields_are_accepted() {
        let h = default_harness();
        let mut body = ada();
        body["year"] = json!(2024);
        body["college"] = json!("MIT");

        let response = h.app.clone().oneshot(json_request(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("MIT (2024)"));
    }

    #[tokio::test]
    async fn test_whitespace_required_fields_are_accepted() {
        let h = default_harness();
        let mut body = ada();
        body["skills"] = json!("   ");

        let response = h.app.clone().oneshot(json_request(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_required_fields_short_circuit() {
        for field in ["name", "email", "skills"] {
            let h = default_harness();
            let mut body = ada();
            body[field] = json!("");

            let response = h.app.clone().oneshot(json_request(&body)).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                body_text(response).await,
                "Missing required fields: name, email, skills."
            );
            tokio::time::sleep(Duration::from_millis(20)).await;
            assert!(h.generator.prompts.lock().unwrap().is_empty());
            assert!(h.store.records.lock().unwrap().is_empty());
            assert_eq!(h.renderer.calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn test_unparseable_body_is_bad_request() {
        let h = default_harness();
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/ask")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = h.app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_exactly_one_insert_per_valid_request() {
        let h = default_harness();

        let response = h.app.clone().oneshot(json_request(&ada())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        wait_for_records(&h.store, 1).await;

        let records = h.store.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].submission.company.as_deref(), Some("Acme"));
    }

    #[tokio::test]
    async fn test_store_failure_does_not_change_response() {
        let h = harness(
            ScriptedGenerator::default(),
            FileRenderer::default(),
            MemoryStore {
                fail: true,
                ..Default::default()
            },
        );

        let response = h.app.clone().oneshot(json_request(&ada())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.starts_with("%PDF-fake"));
        wait_for_records(&h.store, 1).await;
        assert_eq!(h.store.records.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_generation_failure_is_500_without_pdf() {
        let h = harness(
            ScriptedGenerator {
                fail: true,
                ..Default::default()
            },
            FileRenderer::default(),
            MemoryStore::default(),
        );

        let response = h.app.clone().oneshot(json_request(&ada())).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Resume generation failed");
        assert_eq!(h.renderer.calls.load(Ordering::SeqCst), 0);
        assert_eq!(artifacts_left(h.dir.path()).await, 0);
    }

    #[tokio::test]
    async fn test_export_failure_removes_partial_file() {
        let h = harness(
            ScriptedGenerator::default(),
            FileRenderer {
                fail: true,
                ..Default::default()
            },
            MemoryStore::default(),
        );

        let response = h.app.clone().oneshot(json_request(&ada())).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(artifacts_left(h.dir.path()).await, 0);
    }

    #[tokio::test]
    async fn test_temp_file_removed_after_download_or_disconnect() {
        let h = default_harness();

        let response = h.app.clone().oneshot(json_request(&ada())).await.unwrap();
        assert_eq!(artifact_count(h.dir.path()), 1);
        body_text(response).await;
        assert_eq!(artifacts_left(h.dir.path()).await, 0);

        let response = h.app.clone().oneshot(json_request(&ada())).await.unwrap();
        drop(response);
        assert_eq!(artifacts_left(h.dir.path()).await, 0);
    }

    #[tokio::test]
    async fn test_concurrent_requests_get_their_own_documents() {
        let h = default_harness();
        let names: Vec<String> = (0..5).map(|i| format!("Person{i}")).collect();

        let responses = futures_util::future::join_all(names.iter().map(|name| {
            let mut body = ada();
            body["name"] = json!(name);
            h.app.clone().oneshot(json_request(&body))
        }))
        .await;

        for (name, response) in names.iter().zip(responses) {
            let response = response.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body = body_text(response).await;
            assert!(body.contains(&format!("<h1>{name}</h1>")));
            for other in names.iter().filter(|n| *n != name) {
                assert!(!body.contains(other.as_str()), "{other} leaked into {name}");
            }
        }
        assert_eq!(h.renderer.calls.load(Ordering::SeqCst), 5);
        assert!(h.renderer.peak.load(Ordering::SeqCst) > 1);
        assert_eq!(artifacts_left(h.dir.path()).await, 0);
    }
}
