//! Submission: validate, send, deliver, record

use redact_client::RedactionService;
use redact_core::{RedactionJob, RedactionRequest};
use redact_storage::Storage;
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::delivery::DownloadSink;
use crate::error::SubmitError;
use crate::form::UploadForm;

/// A delivered redaction
#[derive(Debug, Clone)]
pub struct Submission {
    pub path: PathBuf,
    pub job: RedactionJob,
}

impl UploadForm {
    /// Submit the current document. Validation failures never reach the
    /// network. On success the document is cleared from the form; on any
    /// failure it stays selected and `error()` holds the message to show.
    pub async fn submit(
        &mut self,
        service: &dyn RedactionService,
        sink: &dyn DownloadSink,
        storage: Option<&Storage>,
    ) -> Result<Submission, SubmitError> {
        self.error = None;

        let request = match RedactionRequest::build(self.file.as_ref(), self.selection(), self.policy)
        {
            Ok(request) => request,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(SubmitError::Validation(e));
            }
        };

        let input_hash = self
            .file
            .as_ref()
            .map(|f| f.content_hash())
            .unwrap_or_default();
        let job = RedactionJob::new(
            request.original_name.clone(),
            request.file_name.clone(),
            request.categories.clone(),
            input_hash,
        );

        let outcome = service.redact(&request).await;

        let result = outcome
            .map_err(SubmitError::from)
            .and_then(|artifact| sink.deliver(&artifact).map_err(SubmitError::from));

        match result {
            Ok(path) => {
                info!("Redacted {} -> {}", request.original_name, path.display());
                self.file = None;
                let job = job.succeeded(path.display().to_string());
                record(storage, &job).await;
                Ok(Submission { path, job })
            }
            Err(e) => {
                error!("Redaction of {} failed: {}", request.original_name, e);
                self.error = Some(e.to_string());
                record(storage, &job.failed(e.to_string())).await;
                Err(e)
            }
        }
    }
}

async fn record(storage: Option<&Storage>, job: &RedactionJob) {
    if let Some(storage) = storage {
        if let Err(e) = storage.record_job(job).await {
            warn!("Failed to record job {}: {}", job.id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::MemorySink;
    use async_trait::async_trait;
    use redact_client::ClientError;
    use redact_core::error::{NO_CATEGORY_MESSAGE, NO_FILE_MESSAGE};
    use redact_core::{JobStatus, RedactedArtifact, UploadedFile};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers with a fixed status; 200 echoes the request as the document
    struct FakeService {
        status: u16,
        calls: AtomicUsize,
        last: Mutex<Option<RedactionRequest>>,
    }

    impl FakeService {
        fn new(status: u16) -> Self {
            Self {
                status,
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RedactionService for FakeService {
        async fn redact(
            &self,
            request: &RedactionRequest,
        ) -> redact_client::Result<RedactedArtifact> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(request.clone());
            match self.status {
                200 => Ok(RedactedArtifact::new(
                    b"%PDF-redacted".to_vec(),
                    Some("application/pdf".to_string()),
                    None,
                )),
                0 => Err(ClientError::Unreachable {
                    reason: "connection refused".to_string(),
                }),
                status => Err(ClientError::Http {
                    status,
                    status_text: "Internal Server Error".to_string(),
                }),
            }
        }
    }

    fn form_with_pdf() -> UploadForm {
        let mut form = UploadForm::default();
        form.set_file(UploadedFile::new("report.pdf", b"%PDF-1.7".to_vec()).unwrap());
        form
    }

    #[tokio::test]
    async fn test_submit_without_file() {
        let service = FakeService::new(200);
        let sink = MemorySink::new();
        let mut form = UploadForm::default();

        let err = form.submit(&service, &sink, None).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(form.error(), Some(NO_FILE_MESSAGE));
        assert_eq!(service.calls(), 0);
    }

    #[tokio::test]
    async fn test_submit_without_categories() {
        let service = FakeService::new(200);
        let sink = MemorySink::new();
        let mut form = form_with_pdf();
        form.toggle_all();

        let err = form.submit(&service, &sink, None).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(form.error(), Some(NO_CATEGORY_MESSAGE));
        assert_eq!(service.calls(), 0);
        assert!(form.file().is_some());
    }

    #[tokio::test]
    async fn test_success_delivers_and_clears_file() {
        let service = FakeService::new(200);
        let sink = MemorySink::new();
        let mut form = form_with_pdf();

        let submission = form.submit(&service, &sink, None).await.unwrap();

        assert_eq!(service.calls(), 1);
        assert_eq!(sink.delivered().len(), 1);
        assert_eq!(submission.path, PathBuf::from("REDACTED_OUTPUT.pdf"));
        assert_eq!(submission.job.status, JobStatus::Succeeded);
        assert!(form.file().is_none());
        assert!(form.error().is_none());

        let sent = service.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent.file_name, "test.pdf");
        assert_eq!(sent.categories.len(), 8);
    }

    #[tokio::test]
    async fn test_http_error_keeps_file() {
        let service = FakeService::new(500);
        let sink = MemorySink::new();
        let mut form = form_with_pdf();

        let err = form.submit(&service, &sink, None).await.unwrap_err();

        assert!(matches!(err, SubmitError::Client(ClientError::Http { status: 500, .. })));
        assert_eq!(form.error(), Some("API Error: 500 Internal Server Error"));
        assert!(sink.delivered().is_empty());
        assert!(form.file().is_some());
    }

    #[tokio::test]
    async fn test_unreachable_message() {
        let service = FakeService::new(0);
        let sink = MemorySink::new();
        let mut form = form_with_pdf();

        form.submit(&service, &sink, None).await.unwrap_err();

        assert_eq!(
            form.error(),
            Some("Redaction failed. Is the backend server running?")
        );
    }

    #[tokio::test]
    async fn test_jobs_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(Some(dir.path().join("jobs.db"))).await.unwrap();
        let sink = MemorySink::new();

        let mut form = form_with_pdf();
        form.submit(&FakeService::new(500), &sink, Some(&storage))
            .await
            .unwrap_err();
        form.submit(&FakeService::new(200), &sink, Some(&storage))
            .await
            .unwrap();

        let jobs = storage.list_jobs(10).await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert!(jobs.iter().any(|j| j.status == JobStatus::Failed));
        assert!(jobs.iter().any(|j| j.status == JobStatus::Succeeded));
        assert!(jobs.iter().all(|j| j.original_name == "report.pdf"));
    }
}
