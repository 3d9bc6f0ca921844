// src/pipeline.rs
//! The publish orchestration pipeline: validate required fields, generate the
//! article, submit it to the post store, report the outcome. One run per job
//! fields record; the same pipeline serves the CLI, the batch loop, and the
//! chat bot.

use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::ai::{ContentGenerator, GenerationError};
use crate::store::{PostStore, StoreError};
use crate::types::{JobFields, Post};

/// Pause between batch items to stay inside provider rate limits.
pub const BATCH_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("missing required field: {0}")]
    Validation(&'static str),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn validate(job: &JobFields) -> Result<(), PipelineError> {
    match job.missing_required() {
        Some(field) => Err(PipelineError::Validation(field)),
        None => Ok(()),
    }
}

/// Generate an article for `job` and create it on the store. `publish_now`
/// false leaves it as a draft. Validation runs before any network call.
pub async fn publish<S>(
    generator: &ContentGenerator,
    store: &S,
    job: &JobFields,
    publish_now: bool,
) -> Result<Post, PipelineError>
where
    S: PostStore + ?Sized,
{
    validate(job)?;

    info!(
        "generating content for {} in {}",
        job.title.as_deref().unwrap_or_default(),
        job.location.as_deref().unwrap_or_default()
    );
    let html = generator.generate(job).await?;

    info!(
        "{} to blog",
        if publish_now { "publishing" } else { "drafting" }
    );
    let post = store
        .create(&job.post_title(), &html, !publish_now, &job.labels)
        .await?;
    Ok(post)
}

/// Regenerate content for an existing post. The current title is fetched
/// first and preserved across the update, whatever the caller supplied.
pub async fn edit<S>(
    generator: &ContentGenerator,
    store: &S,
    post_id: &str,
    job: &JobFields,
) -> Result<Post, PipelineError>
where
    S: PostStore + ?Sized,
{
    validate(job)?;

    let existing = store.get(post_id).await?;
    info!("found post: {}", existing.title);

    let html = generator.generate(job).await?;

    let updated = store.update(post_id, &existing.title, &html).await?;
    Ok(updated)
}

#[derive(Debug)]
pub struct BatchFailure {
    pub index: usize,
    pub title: String,
    pub error: PipelineError,
}

/// Outcome of one batch run. Failed items are collected here rather than
/// aborting the loop or changing the exit code.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failures: Vec<BatchFailure>,
}

/// Drive one publish pipeline per batch element, sequentially, with a fixed
/// delay between submissions. A failed item is recorded and the loop moves on.
pub async fn run_batch<S>(
    generator: &ContentGenerator,
    store: &S,
    jobs: &[JobFields],
    publish_now: bool,
) -> BatchReport
where
    S: PostStore + ?Sized,
{
    let mut report = BatchReport {
        total: jobs.len(),
        ..Default::default()
    };

    for (index, job) in jobs.iter().enumerate() {
        let label = job.title.as_deref().unwrap_or("(untitled)");
        info!("[{}/{}] processing: {}", index + 1, jobs.len(), label);

        match publish(generator, store, job, publish_now).await {
            Ok(post) => {
                report.succeeded += 1;
                info!("post {} created: {}", post.id, post.url_or_dash());
            }
            Err(error) => {
                warn!("[{}/{}] failed: {}", index + 1, jobs.len(), error);
                report.failures.push(BatchFailure {
                    index,
                    title: label.to_string(),
                    error,
                });
            }
        }

        if index + 1 < jobs.len() {
            info!("waiting {}s before next job", BATCH_DELAY.as_secs());
            tokio::time::sleep(BATCH_DELAY).await;
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{CompletionBackend, CompletionError, ModelCandidate, Provider};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    const ONE_MODEL: &[ModelCandidate] = &[ModelCandidate {
        provider: Provider::Gemini,
        model: "test-model",
    }];

    struct CountingBackend {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionBackend for CountingBackend {
        async fn complete(
            &self,
            _candidate: &ModelCandidate,
            _prompt: &str,
        ) -> Result<String, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("<h1>Generated</h1>".to_string())
        }
    }

    fn test_generator() -> (ContentGenerator, Arc<CountingBackend>) {
        let backend = Arc::new(CountingBackend {
            calls: AtomicUsize::new(0),
        });
        (
            ContentGenerator::with_backend(backend.clone(), ONE_MODEL),
            backend,
        )
    }

    /// Store that records each call as "<op> <arg>" and serves a canned post.
    struct RecordingStore {
        calls: Mutex<Vec<String>>,
        existing_title: String,
    }

    impl RecordingStore {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                existing_title: "Original Title - Dubai".to_string(),
            }
        }

        fn post(id: &str, title: &str) -> Post {
            Post {
                id: id.to_string(),
                title: title.to_string(),
                url: Some(format!("https://blog.example/{}", id)),
                status: Some("DRAFT".to_string()),
                published: None,
                content: None,
                labels: None,
            }
        }
    }

    #[async_trait]
    impl PostStore for RecordingStore {
        async fn create(
            &self,
            title: &str,
            _html: &str,
            is_draft: bool,
            _labels: &[String],
        ) -> Result<Post, StoreError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("create {} draft={}", title, is_draft));
            Ok(Self::post("p1", title))
        }

        async fn update(&self, post_id: &str, title: &str, _html: &str) -> Result<Post, StoreError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("update {} title={}", post_id, title));
            Ok(Self::post(post_id, title))
        }

        async fn get(&self, post_id: &str) -> Result<Post, StoreError> {
            self.calls.lock().unwrap().push(format!("get {}", post_id));
            Ok(Self::post(post_id, &self.existing_title))
        }

        async fn list(&self, _max_results: usize) -> Result<Vec<Post>, StoreError> {
            self.calls.lock().unwrap().push("list".to_string());
            Ok(Vec::new())
        }

        async fn delete(&self, post_id: &str) -> Result<(), StoreError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("delete {}", post_id));
            Ok(())
        }
    }

    fn job(title: &str) -> JobFields {
        JobFields {
            title: Some(title.to_string()),
            location: Some("Remote".to_string()),
            requirements: Some("3+ yrs Node".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_validation_failure_makes_no_network_calls() {
        let (generator, backend) = test_generator();
        let store = RecordingStore::new();

        let mut invalid = job("Backend Engineer");
        invalid.requirements = None;

        let err = publish(&generator, &store, &invalid, false)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Validation("requirements")));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert!(store.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_publish_creates_draft_by_default() {
        let (generator, _) = test_generator();
        let store = RecordingStore::new();

        let post = publish(&generator, &store, &job("Backend Engineer"), false)
            .await
            .unwrap();
        assert_eq!(post.id, "p1");
        assert_eq!(
            *store.calls.lock().unwrap(),
            vec!["create Backend Engineer - Remote draft=true"]
        );
    }

    #[tokio::test]
    async fn test_publish_flag_flips_draft() {
        let (generator, _) = test_generator();
        let store = RecordingStore::new();

        publish(&generator, &store, &job("Backend Engineer"), true)
            .await
            .unwrap();
        assert_eq!(
            *store.calls.lock().unwrap(),
            vec!["create Backend Engineer - Remote draft=false"]
        );
    }

    #[tokio::test]
    async fn test_edit_preserves_existing_title() {
        let (generator, _) = test_generator();
        let store = RecordingStore::new();

        // Caller supplies a brand new title; the update must keep the old one.
        edit(&generator, &store, "42", &job("Completely New Title"))
            .await
            .unwrap();
        assert_eq!(
            *store.calls.lock().unwrap(),
            vec!["get 42", "update 42 title=Original Title - Dubai"]
        );
    }

    #[tokio::test]
    async fn test_batch_continues_past_failures_and_throttles() {
        let (generator, _) = test_generator();
        let store = RecordingStore::new();

        let mut broken = job("Broken Job");
        broken.location = None;
        let jobs = vec![job("First"), broken, job("Third")];

        let started = Instant::now();
        let report = run_batch(&generator, &store, &jobs, false).await;
        let elapsed = started.elapsed();

        assert_eq!(report.total, 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 1);
        assert_eq!(report.failures[0].title, "Broken Job");

        // Items before and after the failure were attempted, in order.
        assert_eq!(
            *store.calls.lock().unwrap(),
            vec![
                "create First - Remote draft=true",
                "create Third - Remote draft=true"
            ]
        );

        // Two inter-item delays: >= (N-1) * 2s.
        assert!(elapsed >= BATCH_DELAY * 2);
    }
}
