use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::MaterialGenerator;
use crate::core::error::{AppError, Result};
use crate::features::activity::{ActivityRepository, NewActivity};
use crate::features::files::models::{File, ProcessingStatus};
use crate::features::files::repositories::FileRepository;
use crate::features::generation::dtos::ProcessFileResponseDto;
use crate::features::generation::extractors::ContentExtractor;
use crate::features::materials::repositories::ArtifactRepository;
use crate::features::quotas::models::Resource;
use crate::features::quotas::services::QuotaService;
use crate::modules::storage::BlobStore;
use crate::shared::constants::ACTION_GENERATE_MATERIALS;

#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    /// Extracted text beyond this many characters is not sent to the model
    pub max_input_chars: usize,
    pub extraction_timeout: Duration,
    pub generation_timeout: Duration,
}

/// Drives one file from `pending` (or `failed`) to `completed` or `failed`.
///
/// Admission happens before any write: ownership, terminal-state and quota
/// checks, then a compare-and-swap into `processing` that at most one
/// caller can win. From there every error is caught, the file is marked
/// `failed` on a best-effort basis, and the original error is returned.
pub struct PipelineService {
    files: Arc<dyn FileRepository>,
    artifacts: Arc<dyn ArtifactRepository>,
    activity: Arc<dyn ActivityRepository>,
    quota_service: Arc<QuotaService>,
    blob_store: Arc<dyn BlobStore>,
    extractor: ContentExtractor,
    generator: MaterialGenerator,
    settings: PipelineSettings,
}

/// Longest prefix of `text` holding at most `max_chars` characters
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

impl PipelineService {
    pub fn new(
        files: Arc<dyn FileRepository>,
        artifacts: Arc<dyn ArtifactRepository>,
        activity: Arc<dyn ActivityRepository>,
        quota_service: Arc<QuotaService>,
        blob_store: Arc<dyn BlobStore>,
        generator: MaterialGenerator,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            files,
            artifacts,
            activity,
            quota_service,
            blob_store,
            extractor: ContentExtractor::standard(settings.extraction_timeout),
            generator,
            settings,
        }
    }

    pub fn with_extractor(mut self, extractor: ContentExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub async fn process_file(
        &self,
        file_id: Uuid,
        user_id: Uuid,
    ) -> Result<ProcessFileResponseDto> {
        let file = self
            .files
            .find_owned(file_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        match file.processing_status {
            ProcessingStatus::Completed => {
                return Err(AppError::Conflict(
                    "File has already been processed".to_string(),
                ))
            }
            ProcessingStatus::Processing => {
                return Err(AppError::Conflict(
                    "File is already being processed".to_string(),
                ))
            }
            ProcessingStatus::Pending | ProcessingStatus::Failed => {}
        }

        self.quota_service
            .ensure_can_consume(user_id, Resource::Generations, 1)
            .await?;

        // Sole entry gate: a concurrent caller that lost the race matches zero rows
        let claimed = self
            .files
            .transition_status(file.id, user_id, ProcessingStatus::Processing)
            .await?;
        if !claimed {
            info!(file_id = %file.id, "Lost processing race");
            return Err(AppError::Conflict(
                "File is already being processed".to_string(),
            ));
        }

        info!(
            file_id = %file.id,
            user_id = %user_id,
            from = file.processing_status.as_str(),
            "File processing started"
        );

        match self.run(&file).await {
            Ok(counts) => {
                info!(
                    file_id = %file.id,
                    flashcards = counts.flashcards_count,
                    mcq = counts.mcq_count,
                    essays = counts.essays_count,
                    "File processing completed"
                );
                self.log_activity(
                    &file,
                    "completed",
                    json!({
                        "file_name": file.file_name,
                        "flashcards_count": counts.flashcards_count,
                        "mcq_count": counts.mcq_count,
                        "essays_count": counts.essays_count,
                    }),
                )
                .await;
                Ok(counts)
            }
            Err(e) => {
                if let AppError::GenerationService { status, body } = &e {
                    error!(file_id = %file.id, status, body = %body, "Generation request failed");
                }
                warn!(file_id = %file.id, "File processing failed: {}", e);
                self.mark_failed(&file, &e).await;
                Err(e)
            }
        }
    }

    /// Steps after the file is claimed. Artifacts, the `completed` status
    /// and the generation charge are committed together at the end.
    async fn run(&self, file: &File) -> Result<ProcessFileResponseDto> {
        let raw = self.blob_store.download(&file.file_path).await?;

        let text = tokio::time::timeout(
            self.settings.extraction_timeout,
            self.extractor.extract(&raw, file.file_type),
        )
        .await
        .map_err(|_| {
            AppError::Extraction(format!(
                "Text extraction timed out after {}s",
                self.settings.extraction_timeout.as_secs_f64()
            ))
        })??;
        let content = truncate_chars(&text, self.settings.max_input_chars);
        if content.len() < text.len() {
            info!(
                file_id = %file.id,
                max_chars = self.settings.max_input_chars,
                "Extracted text truncated for generation"
            );
        }

        let batch = tokio::time::timeout(
            self.settings.generation_timeout,
            self.generator.generate(content),
        )
        .await
        .map_err(|_| AppError::GenerationService {
            status: 504,
            body: format!(
                "Generation timed out after {}s",
                self.settings.generation_timeout.as_secs_f64()
            ),
        })??;

        self.artifacts.commit_generation(file, &batch).await?;

        Ok(ProcessFileResponseDto {
            flashcards_count: batch.flashcards.len(),
            mcq_count: batch.mcq_questions.len(),
            essays_count: batch.essay_prompts.len(),
        })
    }

    /// Secondary writes after a failure; their own errors are logged and dropped
    async fn mark_failed(&self, file: &File, cause: &AppError) {
        match self
            .files
            .transition_status(file.id, file.user_id, ProcessingStatus::Failed)
            .await
        {
            Ok(true) => {}
            Ok(false) => warn!(file_id = %file.id, "File was no longer processing when marking it failed"),
            Err(e) => error!(file_id = %file.id, "Failed to mark file as failed: {}", e),
        }

        self.log_activity(
            file,
            "failed",
            json!({ "file_name": file.file_name, "error": cause.to_string() }),
        )
        .await;
    }

    async fn log_activity(&self, file: &File, status: &str, metadata: serde_json::Value) {
        let entry = NewActivity::new(file.user_id, ACTION_GENERATE_MATERIALS)
            .resource("file", file.id)
            .status(status)
            .metadata(metadata);

        if let Err(e) = self.activity.append(entry).await {
            error!(file_id = %file.id, "Failed to log generation activity: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::generation::extractors::TextExtractor;
    use crate::modules::llm::TextCompletion;
    use crate::shared::test_helpers::{
        valid_materials_json, InMemoryBlobStore, InMemoryStore, ScriptedCompletion,
    };
    use async_trait::async_trait;

    /// Backend that finds nothing in any input
    struct BlankExtractor;

    #[async_trait]
    impl TextExtractor for BlankExtractor {
        async fn extract(&self, _raw: &[u8]) -> Result<String> {
            Ok("   ".to_string())
        }
    }

    /// Backend that never finishes, like a wedged external tool
    struct StuckExtractor;

    #[async_trait]
    impl TextExtractor for StuckExtractor {
        async fn extract(&self, _raw: &[u8]) -> Result<String> {
            std::future::pending().await
        }
    }

    struct Harness {
        store: Arc<InMemoryStore>,
        blobs: Arc<InMemoryBlobStore>,
        llm: Arc<ScriptedCompletion>,
        service: PipelineService,
        user_id: Uuid,
    }

    fn settings() -> PipelineSettings {
        PipelineSettings {
            max_input_chars: 100_000,
            extraction_timeout: Duration::from_secs(5),
            generation_timeout: Duration::from_secs(5),
        }
    }

    fn harness_with(llm: Arc<ScriptedCompletion>, settings: PipelineSettings) -> Harness {
        let store = InMemoryStore::new();
        let blobs = InMemoryBlobStore::new();
        let completion: Arc<dyn TextCompletion> = llm.clone();
        let service = PipelineService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(QuotaService::new(store.clone())),
            blobs.clone(),
            MaterialGenerator::new(completion, 4000),
            settings,
        );
        Harness {
            store,
            blobs,
            llm,
            service,
            user_id: Uuid::new_v4(),
        }
    }

    fn harness(llm: Arc<ScriptedCompletion>) -> Harness {
        harness_with(llm, settings())
    }

    impl Harness {
        fn uploaded_file(&self, status: ProcessingStatus) -> File {
            let file = self.store.insert_file(self.user_id, status);
            self.blobs
                .put(&file.file_path, b"The mitochondria is the powerhouse of the cell.");
            file
        }

        fn generations_used(&self) -> i64 {
            self.store.counters(self.user_id).monthly_generations_used
        }
    }

    #[tokio::test]
    async fn test_pending_file_with_last_generation_completes() {
        let h = harness(ScriptedCompletion::reply(valid_materials_json()));
        h.store.set_counters(h.user_id, "free", 0, 14, 0);
        let file = h.uploaded_file(ProcessingStatus::Pending);

        let counts = h.service.process_file(file.id, h.user_id).await.unwrap();

        assert_eq!(counts.flashcards_count, 10);
        assert_eq!(counts.mcq_count, 5);
        assert_eq!(counts.essays_count, 3);
        assert_eq!(h.store.status_of(file.id), Some(ProcessingStatus::Completed));
        assert_eq!(h.generations_used(), 15);
        assert_eq!(h.store.artifact_counts(file.id), (10, 5, 3));

        let activity = h.store.activities_for(h.user_id, ACTION_GENERATE_MATERIALS);
        assert_eq!(activity.len(), 1);
        assert_eq!(activity[0].status.as_deref(), Some("completed"));
        assert_eq!(activity[0].resource_id, Some(file.id));
    }

    #[tokio::test]
    async fn test_non_json_reply_fails_file_without_charge() {
        let h = harness(ScriptedCompletion::reply("Sure! Here are some flashcards: ..."));
        let file = h.uploaded_file(ProcessingStatus::Pending);

        let result = h.service.process_file(file.id, h.user_id).await;

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::GenerationFormat(_)));
        assert_eq!(
            err.status_code(),
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(h.store.status_of(file.id), Some(ProcessingStatus::Failed));
        assert_eq!(h.generations_used(), 0);
        assert_eq!(h.store.artifact_counts(file.id), (0, 0, 0));

        let activity = h.store.activities_for(h.user_id, ACTION_GENERATE_MATERIALS);
        assert_eq!(activity.len(), 1);
        assert_eq!(activity[0].status.as_deref(), Some("failed"));
    }

    #[tokio::test]
    async fn test_exhausted_quota_rejected_before_model_call() {
        let h = harness(ScriptedCompletion::reply(valid_materials_json()));
        h.store.set_counters(h.user_id, "free", 0, 15, 0);
        let file = h.uploaded_file(ProcessingStatus::Pending);

        let result = h.service.process_file(file.id, h.user_id).await;

        assert!(matches!(result, Err(AppError::QuotaExceeded(_))));
        assert_eq!(h.llm.calls(), 0);
        assert_eq!(h.store.status_of(file.id), Some(ProcessingStatus::Pending));
    }

    #[tokio::test]
    async fn test_concurrent_calls_admit_exactly_one() {
        let h = harness(ScriptedCompletion::slow(Duration::from_millis(50)));
        let file = h.uploaded_file(ProcessingStatus::Pending);

        let (first, second) = tokio::join!(
            h.service.process_file(file.id, h.user_id),
            h.service.process_file(file.id, h.user_id)
        );

        let results = [first, second];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(AppError::Conflict(_))))
                .count(),
            1
        );
        assert_eq!(h.llm.calls(), 1);
        assert_eq!(h.generations_used(), 1);
        assert_eq!(h.store.artifact_counts(file.id), (10, 5, 3));
    }

    #[tokio::test]
    async fn test_last_generation_cannot_be_spent_twice() {
        let h = harness(ScriptedCompletion::slow(Duration::from_millis(50)));
        h.store.set_counters(h.user_id, "free", 0, 14, 0);
        let first = h.uploaded_file(ProcessingStatus::Pending);
        let second = h.uploaded_file(ProcessingStatus::Pending);

        let (a, b) = tokio::join!(
            h.service.process_file(first.id, h.user_id),
            h.service.process_file(second.id, h.user_id)
        );

        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(AppError::QuotaExceeded(_))))
                .count(),
            1
        );
        assert_eq!(h.llm.calls(), 2);
        assert_eq!(h.generations_used(), 15);
    }

    #[tokio::test]
    async fn test_completed_file_is_not_reprocessed() {
        let h = harness(ScriptedCompletion::reply(valid_materials_json()));
        let file = h.uploaded_file(ProcessingStatus::Pending);
        h.service.process_file(file.id, h.user_id).await.unwrap();

        let again = h.service.process_file(file.id, h.user_id).await;

        assert!(matches!(again, Err(AppError::Conflict(_))));
        assert_eq!(h.llm.calls(), 1);
        assert_eq!(h.generations_used(), 1);
        assert_eq!(h.store.artifact_counts(file.id), (10, 5, 3));
    }

    #[tokio::test]
    async fn test_failed_file_can_be_retried() {
        let h = harness(ScriptedCompletion::reply(valid_materials_json()));
        let file = h.uploaded_file(ProcessingStatus::Failed);

        h.service.process_file(file.id, h.user_id).await.unwrap();

        assert_eq!(h.store.status_of(file.id), Some(ProcessingStatus::Completed));
        assert_eq!(h.generations_used(), 1);
    }

    #[tokio::test]
    async fn test_slow_model_times_out_as_service_error() {
        let h = harness_with(
            ScriptedCompletion::slow(Duration::from_millis(500)),
            PipelineSettings {
                max_input_chars: 100_000,
                extraction_timeout: Duration::from_secs(5),
                generation_timeout: Duration::from_millis(20),
            },
        );
        let file = h.uploaded_file(ProcessingStatus::Pending);

        let result = h.service.process_file(file.id, h.user_id).await;

        assert!(matches!(
            result,
            Err(AppError::GenerationService { status: 504, .. })
        ));
        assert_eq!(h.store.status_of(file.id), Some(ProcessingStatus::Failed));
        assert_eq!(h.generations_used(), 0);
    }

    #[tokio::test]
    async fn test_upstream_error_fails_file() {
        let h = harness(ScriptedCompletion::upstream_error(429, "rate_limit_error"));
        let file = h.uploaded_file(ProcessingStatus::Pending);

        let err = h.service.process_file(file.id, h.user_id).await.unwrap_err();

        assert!(err.to_string().contains("rate_limit_error"));
        assert_eq!(h.store.status_of(file.id), Some(ProcessingStatus::Failed));
    }

    #[tokio::test]
    async fn test_persistence_failure_leaves_no_artifacts_or_charge() {
        let h = harness(ScriptedCompletion::reply(valid_materials_json()));
        h.store.fail_commits(true);
        let file = h.uploaded_file(ProcessingStatus::Pending);

        let result = h.service.process_file(file.id, h.user_id).await;

        assert!(matches!(result, Err(AppError::Persistence(_))));
        assert_eq!(h.store.status_of(file.id), Some(ProcessingStatus::Failed));
        assert_eq!(h.store.artifact_counts(file.id), (0, 0, 0));
        assert_eq!(h.generations_used(), 0);
    }

    #[tokio::test]
    async fn test_missing_blob_is_storage_error() {
        let h = harness(ScriptedCompletion::reply(valid_materials_json()));
        let file = h.store.insert_file(h.user_id, ProcessingStatus::Pending);

        let result = h.service.process_file(file.id, h.user_id).await;

        assert!(matches!(result, Err(AppError::Storage(_))));
        assert_eq!(h.store.status_of(file.id), Some(ProcessingStatus::Failed));
        assert_eq!(h.llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_extraction_fails_before_model_call() {
        let h = harness(ScriptedCompletion::reply(valid_materials_json()));
        let blank: Arc<dyn TextExtractor> = Arc::new(BlankExtractor);
        let service = h.service.with_extractor(ContentExtractor::new(
            blank.clone(),
            blank.clone(),
            blank,
        ));
        let file = h.store.insert_file(h.user_id, ProcessingStatus::Pending);
        h.blobs.put(&file.file_path, b"%PDF-1.7 scanned pages only");

        let result = service.process_file(file.id, h.user_id).await;

        assert!(matches!(result, Err(AppError::Extraction(_))));
        assert_eq!(h.store.status_of(file.id), Some(ProcessingStatus::Failed));
        assert_eq!(h.llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_stuck_extraction_times_out_and_fails_file() {
        let h = harness_with(
            ScriptedCompletion::reply(valid_materials_json()),
            PipelineSettings {
                max_input_chars: 100_000,
                extraction_timeout: Duration::from_millis(20),
                generation_timeout: Duration::from_secs(5),
            },
        );
        let stuck: Arc<dyn TextExtractor> = Arc::new(StuckExtractor);
        let service = h.service.with_extractor(ContentExtractor::new(
            stuck.clone(),
            stuck.clone(),
            stuck,
        ));
        let file = h.store.insert_file(h.user_id, ProcessingStatus::Pending);
        h.blobs.put(&file.file_path, b"%PDF-1.7 lecture slides");

        let result = service.process_file(file.id, h.user_id).await;

        match result {
            Err(AppError::Extraction(msg)) => assert!(msg.contains("timed out")),
            other => panic!("expected extraction timeout, got {:?}", other),
        }
        assert_eq!(h.store.status_of(file.id), Some(ProcessingStatus::Failed));
        assert_eq!(h.llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_foreign_file_is_not_found_and_untouched() {
        let h = harness(ScriptedCompletion::reply(valid_materials_json()));
        let file = h.uploaded_file(ProcessingStatus::Pending);

        let result = h.service.process_file(file.id, Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(h.store.status_of(file.id), Some(ProcessingStatus::Pending));
    }

    #[tokio::test]
    async fn test_original_error_survives_failed_secondary_writes() {
        let h = harness(ScriptedCompletion::reply("not json"));
        h.store.fail_failed_transition(true);
        h.store.fail_activity(true);
        let file = h.uploaded_file(ProcessingStatus::Pending);

        let result = h.service.process_file(file.id, h.user_id).await;

        assert!(matches!(result, Err(AppError::GenerationFormat(_))));
        assert_eq!(
            h.store.status_of(file.id),
            Some(ProcessingStatus::Processing)
        );
    }

    #[tokio::test]
    async fn test_activity_failure_does_not_fail_success() {
        let h = harness(ScriptedCompletion::reply(valid_materials_json()));
        h.store.fail_activity(true);
        let file = h.uploaded_file(ProcessingStatus::Pending);

        assert!(h.service.process_file(file.id, h.user_id).await.is_ok());
        assert_eq!(h.store.status_of(file.id), Some(ProcessingStatus::Completed));
    }

    #[tokio::test]
    async fn test_input_is_truncated_to_limit() {
        let h = harness_with(
            ScriptedCompletion::reply(valid_materials_json()),
            PipelineSettings {
                max_input_chars: 12,
                extraction_timeout: Duration::from_secs(5),
                generation_timeout: Duration::from_secs(5),
            },
        );
        let file = h.store.insert_file(h.user_id, ProcessingStatus::Pending);
        h.blobs.put(&file.file_path, "Ünïcödé text TRUNCATED-TAIL".as_bytes());

        h.service.process_file(file.id, h.user_id).await.unwrap();

        let (_, user_prompt, _) = h.llm.last_prompt().unwrap();
        assert!(user_prompt.contains("Ünïcödé text"));
        assert!(!user_prompt.contains("TRUNCATED-TAIL"));
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }
}
