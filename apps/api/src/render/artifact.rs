//! Temporary PDF artifacts and their delivery as a download.

use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use futures_util::Stream;
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{debug, error};
use uuid::Uuid;

use crate::errors::AppError;

/// Filename the client sees. The on-disk name is never exposed.
pub const DOWNLOAD_NAME: &str = "resume.pdf";

/// A per-request PDF path, deleted when the guard is dropped.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
}

impl TempArtifact {
    /// Reserves `resume-<uuid>.pdf` inside `dir`. Nothing is written yet.
    pub fn reserve(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("resume-{}.pdf", Uuid::new_v4())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        let path = std::mem::take(&mut self.path);
        // Off the async workers when a runtime is around; inline otherwise.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || remove_artifact(&path));
            }
            Err(_) => remove_artifact(&path),
        }
    }
}

fn remove_artifact(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!("Removed {}", path.display()),
        // Export failed before anything was written.
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => error!("File cleanup error for {}: {e}", path.display()),
    }
}

/// Body stream that owns the artifact, so the file goes away when the body
/// finishes, fails, or is dropped by a disconnecting client.
struct ArtifactStream {
    inner: ReaderStream<File>,
    _artifact: TempArtifact,
}

impl Stream for ArtifactStream {
    type Item = io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let poll = Pin::new(&mut self.inner).poll_next(cx);
        if let Poll::Ready(Some(Err(e))) = &poll {
            // Headers are already out; the client sees a truncated download.
            error!("Download error: {e}");
        }
        poll
    }
}

/// Streams the artifact back as `resume.pdf`.
///
/// Failing to open the file is a `Delivery` error; the guard is dropped either way.
pub async fn into_attachment(artifact: TempArtifact) -> Result<Response, AppError> {
    let file = File::open(artifact.path())
        .await
        .map_err(AppError::Delivery)?;
    let length = file.metadata().await.ok().map(|m| m.len());

    let body = Body::from_stream(ArtifactStream {
        inner: ReaderStream::new(file),
        _artifact: artifact,
    });

    let mut response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DOWNLOAD_NAME}\""),
            ),
        ],
        body,
    )
        .into_response();

    if let Some(length) = length {
        response
            .headers_mut()
            .insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    }
    Ok(response)
}
