//! In-memory collaborators and fixtures for service and handler tests

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, Router};
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use fake::faker::lorem::en::{Sentence, Words};
use fake::Fake;
use serde_json::json;
use sqlx::types::Json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::activity::{ActivityEntry, ActivityRepository, NewActivity};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::dashboard::models::{DashboardCounts, WeakSession};
use crate::features::dashboard::repositories::DashboardRepository;
use crate::features::files::models::{File, FileType, NewFile, ProcessingStatus};
use crate::features::files::repositories::FileRepository;
use crate::features::materials::models::{
    ArgumentFramework, EssayPrompt, EssayPromptRecord, Flashcard, FlashcardRecord,
    GeneratedArtifactBatch, McqOptions, McqQuestion, McqQuestionRecord, StoredMaterials,
};
use crate::features::materials::repositories::ArtifactRepository;
use crate::features::quotas::models::{QuotaCounters, Resource};
use crate::features::quotas::repositories::QuotaRepository;
use crate::features::study_sessions::models::{NewStudyProgress, NewStudySession, StudySession};
use crate::features::study_sessions::repositories::StudySessionRepository;
use crate::modules::llm::TextCompletion;
use crate::modules::storage::BlobStore;

// =============================================================================
// AUTH
// =============================================================================

pub fn test_user(user_id: Uuid) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id,
        email: Some("student@example.com".to_string()),
        role: Some("authenticated".to_string()),
    }
}

/// Layer that authenticates every request as `user_id`
pub fn with_user(router: Router, user_id: Uuid) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| async move {
            request.extensions_mut().insert(test_user(user_id));
            next.run(request).await
        },
    ))
}

// =============================================================================
// RELATIONAL STORE
// =============================================================================

#[derive(Default)]
struct StoreState {
    files: HashMap<Uuid, File>,
    profiles: HashMap<Uuid, QuotaCounters>,
    flashcards: Vec<FlashcardRecord>,
    mcq_questions: Vec<McqQuestionRecord>,
    essay_prompts: Vec<EssayPromptRecord>,
    activities: Vec<ActivityEntry>,
    sessions: Vec<StudySession>,
    progress: Vec<NewStudyProgress>,
    fail_file_creates: bool,
    fail_commits: bool,
    fail_failed_transition: bool,
    fail_activity: bool,
    fail_progress: bool,
}

/// Implements every repository trait over one mutex, so each trait call is atomic
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

fn db_down() -> AppError {
    AppError::Database(sqlx::Error::PoolTimedOut)
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap()
    }

    pub fn set_counters(
        &self,
        user_id: Uuid,
        tier: &str,
        uploads: i64,
        generations: i64,
        storage: i64,
    ) {
        self.lock().profiles.insert(
            user_id,
            QuotaCounters {
                user_id,
                subscription_tier: tier.to_string(),
                monthly_uploads_used: uploads,
                monthly_generations_used: generations,
                storage_used_bytes: storage,
            },
        );
    }

    pub fn counters(&self, user_id: Uuid) -> QuotaCounters {
        self.lock()
            .profiles
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| QuotaCounters::empty(user_id))
    }

    /// Seed a file row directly; each call is one second newer than the last
    pub fn insert_file(&self, user_id: Uuid, status: ProcessingStatus) -> File {
        self.insert_file_of_type(user_id, status, FileType::Pdf)
    }

    pub fn insert_file_of_type(
        &self,
        user_id: Uuid,
        status: ProcessingStatus,
        file_type: FileType,
    ) -> File {
        let mut state = self.lock();
        let id = Uuid::new_v4();
        let created_at = Utc::now() + ChronoDuration::seconds(state.files.len() as i64);
        let extension = match file_type {
            FileType::Pdf => "pdf",
            FileType::Pptx => "pptx",
            FileType::Video => "mp4",
        };
        let module_id = Uuid::new_v4();
        let file = File {
            id,
            user_id,
            module_id,
            file_name: format!("{}.{}", Words(1..3).fake::<Vec<String>>().join("_"), extension),
            file_type,
            file_size: 1024,
            file_path: format!("{}/{}/{}.{}", user_id, module_id, id, extension),
            mime_type: "application/pdf".to_string(),
            content_hash: None,
            processing_status: status,
            created_at,
            updated_at: created_at,
        };
        state.files.insert(id, file.clone());
        file
    }

    pub fn file(&self, file_id: Uuid) -> Option<File> {
        self.lock().files.get(&file_id).cloned()
    }

    pub fn status_of(&self, file_id: Uuid) -> Option<ProcessingStatus> {
        self.file(file_id).map(|f| f.processing_status)
    }

    /// (flashcards, mcq questions, essay prompts) stored for a file
    pub fn artifact_counts(&self, file_id: Uuid) -> (usize, usize, usize) {
        let state = self.lock();
        (
            state.flashcards.iter().filter(|r| r.file_id == file_id).count(),
            state.mcq_questions.iter().filter(|r| r.file_id == file_id).count(),
            state.essay_prompts.iter().filter(|r| r.file_id == file_id).count(),
        )
    }

    /// Seed one essay prompt owned by `user_id`
    pub fn insert_essay_prompt(&self, user_id: Uuid) -> EssayPromptRecord {
        let record = EssayPromptRecord {
            id: Uuid::new_v4(),
            file_id: Uuid::new_v4(),
            module_id: Uuid::new_v4(),
            user_id,
            prompt: "Evaluate the claim that free markets always allocate resources efficiently."
                .to_string(),
            argument_framework: Json(ArgumentFramework {
                thesis_suggestion: "Markets are efficient only under strict conditions".to_string(),
                key_arguments: vec!["Price signals coordinate dispersed knowledge".to_string()],
                counter_arguments: vec!["Externalities are not priced".to_string()],
                evidence_points: vec!["Pigou's analysis of pollution".to_string()],
            }),
            source_reference: Some("Lecture 4".to_string()),
            created_at: Utc::now(),
        };
        self.lock().essay_prompts.push(record.clone());
        record
    }

    /// Seed a scored session at a chosen time
    pub fn insert_session(
        &self,
        user_id: Uuid,
        module_id: Option<Uuid>,
        score: i16,
        created_at: DateTime<Utc>,
    ) -> StudySession {
        let session = StudySession {
            id: Uuid::new_v4(),
            user_id,
            module_id,
            session_type: "questions".to_string(),
            duration_seconds: 120,
            score,
            correct_count: 1,
            incorrect_count: 1,
            created_at,
        };
        self.lock().sessions.push(session.clone());
        session
    }

    /// Seed `count` flashcards owned by `user_id` under one fresh file id
    pub fn insert_flashcards(&self, user_id: Uuid, count: usize) {
        let file_id = Uuid::new_v4();
        let module_id = Uuid::new_v4();
        let mut state = self.lock();
        for _ in 0..count {
            state.flashcards.push(FlashcardRecord {
                id: Uuid::new_v4(),
                file_id,
                module_id,
                user_id,
                question: sentence(),
                answer: sentence(),
                source_reference: None,
                created_at: Utc::now(),
            });
        }
    }

    pub fn activities_for(&self, user_id: Uuid, action: &str) -> Vec<ActivityEntry> {
        self.lock()
            .activities
            .iter()
            .filter(|a| a.user_id == user_id && a.action == action)
            .cloned()
            .collect()
    }

    pub fn session_count(&self) -> usize {
        self.lock().sessions.len()
    }

    pub fn progress_rows(&self, session_id: Uuid) -> Vec<NewStudyProgress> {
        self.lock()
            .progress
            .iter()
            .filter(|p| p.session_id == session_id)
            .cloned()
            .collect()
    }

    pub fn fail_file_creates(&self, fail: bool) {
        self.lock().fail_file_creates = fail;
    }

    /// Make `commit_generation` fail after partially writing, as a dropped transaction would
    pub fn fail_commits(&self, fail: bool) {
        self.lock().fail_commits = fail;
    }

    pub fn fail_failed_transition(&self, fail: bool) {
        self.lock().fail_failed_transition = fail;
    }

    pub fn fail_activity(&self, fail: bool) {
        self.lock().fail_activity = fail;
    }

    pub fn fail_progress_inserts(&self, fail: bool) {
        self.lock().fail_progress = fail;
    }
}

fn apply_increment(state: &mut StoreState, user_id: Uuid, resource: Resource, amount: i64) {
    let counters = state
        .profiles
        .entry(user_id)
        .or_insert_with(|| QuotaCounters::empty(user_id));
    match resource {
        Resource::Uploads => counters.monthly_uploads_used += amount,
        Resource::Generations => counters.monthly_generations_used += amount,
        Resource::Storage => counters.storage_used_bytes += amount,
    }
}

fn apply_transition(
    state: &mut StoreState,
    file_id: Uuid,
    user_id: Uuid,
    to: ProcessingStatus,
) -> bool {
    match state.files.get_mut(&file_id) {
        Some(file) if file.user_id == user_id && file.processing_status.can_transition_to(to) => {
            file.processing_status = to;
            file.updated_at = Utc::now();
            true
        }
        _ => false,
    }
}

#[async_trait]
impl FileRepository for InMemoryStore {
    async fn find_owned(&self, file_id: Uuid, user_id: Uuid) -> Result<Option<File>> {
        Ok(self
            .lock()
            .files
            .get(&file_id)
            .filter(|f| f.user_id == user_id)
            .cloned())
    }

    async fn list_recent(&self, user_id: Uuid, limit: i64) -> Result<Vec<File>> {
        let mut files: Vec<File> = self
            .lock()
            .files
            .values()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        files.truncate(limit as usize);
        Ok(files)
    }

    async fn create(&self, new_file: NewFile) -> Result<File> {
        let mut state = self.lock();
        if state.fail_file_creates {
            return Err(db_down());
        }

        let counters = state
            .profiles
            .get(&new_file.user_id)
            .cloned()
            .unwrap_or_else(|| QuotaCounters::empty(new_file.user_id));
        counters.ensure_can_consume(Resource::Uploads, 1)?;
        counters.ensure_can_consume(Resource::Storage, new_file.file_size)?;

        let now = Utc::now();
        let file = File {
            id: new_file.id,
            user_id: new_file.user_id,
            module_id: new_file.module_id,
            file_name: new_file.file_name,
            file_type: new_file.file_type,
            file_size: new_file.file_size,
            file_path: new_file.file_path,
            mime_type: new_file.mime_type,
            content_hash: Some(new_file.content_hash),
            processing_status: ProcessingStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        state.files.insert(file.id, file.clone());
        apply_increment(&mut state, file.user_id, Resource::Uploads, 1);
        apply_increment(&mut state, file.user_id, Resource::Storage, file.file_size);
        Ok(file)
    }

    async fn delete_owned(&self, file_id: Uuid, user_id: Uuid) -> Result<Option<File>> {
        let mut state = self.lock();
        let owned = state
            .files
            .get(&file_id)
            .is_some_and(|f| f.user_id == user_id);
        if !owned {
            return Ok(None);
        }

        state.flashcards.retain(|r| r.file_id != file_id);
        state.mcq_questions.retain(|r| r.file_id != file_id);
        state.essay_prompts.retain(|r| r.file_id != file_id);
        Ok(state.files.remove(&file_id))
    }

    async fn transition_status(
        &self,
        file_id: Uuid,
        user_id: Uuid,
        to: ProcessingStatus,
    ) -> Result<bool> {
        let mut state = self.lock();
        if to == ProcessingStatus::Failed && state.fail_failed_transition {
            return Err(db_down());
        }
        Ok(apply_transition(&mut state, file_id, user_id, to))
    }
}

#[async_trait]
impl QuotaRepository for InMemoryStore {
    async fn get_or_create(&self, user_id: Uuid) -> Result<QuotaCounters> {
        Ok(self
            .lock()
            .profiles
            .entry(user_id)
            .or_insert_with(|| QuotaCounters::empty(user_id))
            .clone())
    }

    async fn increment(&self, user_id: Uuid, resource: Resource, amount: i64) -> Result<()> {
        apply_increment(&mut self.lock(), user_id, resource, amount);
        Ok(())
    }
}

#[async_trait]
impl ArtifactRepository for InMemoryStore {
    async fn commit_generation(&self, file: &File, batch: &GeneratedArtifactBatch) -> Result<()> {
        let mut state = self.lock();
        if state.fail_commits {
            return Err(AppError::Persistence(
                "Failed to insert essay prompts: connection reset".to_string(),
            ));
        }

        let counters = state
            .profiles
            .get(&file.user_id)
            .cloned()
            .unwrap_or_else(|| QuotaCounters::empty(file.user_id));
        counters.ensure_can_consume(Resource::Generations, 1)?;

        let still_processing = state
            .files
            .get(&file.id)
            .is_some_and(|f| f.processing_status == ProcessingStatus::Processing);
        if !still_processing {
            return Err(AppError::Persistence(format!(
                "File {} left the processing state before its materials were saved",
                file.id
            )));
        }

        let now = Utc::now();
        for card in &batch.flashcards {
            state.flashcards.push(FlashcardRecord {
                id: Uuid::new_v4(),
                file_id: file.id,
                module_id: file.module_id,
                user_id: file.user_id,
                question: card.question.clone(),
                answer: card.answer.clone(),
                source_reference: card.source_reference.clone(),
                created_at: now,
            });
        }
        for mcq in &batch.mcq_questions {
            state.mcq_questions.push(McqQuestionRecord {
                id: Uuid::new_v4(),
                file_id: file.id,
                module_id: file.module_id,
                user_id: file.user_id,
                question: mcq.question.clone(),
                options: Json(McqOptions::from(mcq)),
                source_reference: mcq.source_reference.clone(),
                created_at: now,
            });
        }
        for essay in &batch.essay_prompts {
            state.essay_prompts.push(EssayPromptRecord {
                id: Uuid::new_v4(),
                file_id: file.id,
                module_id: file.module_id,
                user_id: file.user_id,
                prompt: essay.prompt.clone(),
                argument_framework: Json(ArgumentFramework::from(essay)),
                source_reference: essay.source_reference.clone(),
                created_at: now,
            });
        }

        apply_transition(&mut state, file.id, file.user_id, ProcessingStatus::Completed);
        apply_increment(&mut state, file.user_id, Resource::Generations, 1);
        Ok(())
    }

    async fn list_for_file(&self, file_id: Uuid, user_id: Uuid) -> Result<StoredMaterials> {
        let state = self.lock();
        Ok(StoredMaterials {
            flashcards: state
                .flashcards
                .iter()
                .filter(|r| r.file_id == file_id && r.user_id == user_id)
                .cloned()
                .collect(),
            mcq_questions: state
                .mcq_questions
                .iter()
                .filter(|r| r.file_id == file_id && r.user_id == user_id)
                .cloned()
                .collect(),
            essay_prompts: state
                .essay_prompts
                .iter()
                .filter(|r| r.file_id == file_id && r.user_id == user_id)
                .cloned()
                .collect(),
        })
    }

    async fn find_essay_prompt(
        &self,
        prompt_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<EssayPromptRecord>> {
        Ok(self
            .lock()
            .essay_prompts
            .iter()
            .find(|r| r.id == prompt_id && r.user_id == user_id)
            .cloned())
    }
}

#[async_trait]
impl ActivityRepository for InMemoryStore {
    async fn append(&self, entry: NewActivity) -> Result<()> {
        let mut state = self.lock();
        if state.fail_activity {
            return Err(db_down());
        }
        state.activities.push(ActivityEntry {
            id: Uuid::new_v4(),
            user_id: entry.user_id,
            action: entry.action,
            resource_type: entry.resource_type,
            resource_id: entry.resource_id,
            status: entry.status,
            metadata: entry.metadata,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn recent(&self, user_id: Uuid, limit: i64) -> Result<Vec<ActivityEntry>> {
        let state = self.lock();
        if state.fail_activity {
            return Err(db_down());
        }
        Ok(state
            .activities
            .iter()
            .rev()
            .filter(|a| a.user_id == user_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DashboardRepository for InMemoryStore {
    async fn counts(&self, user_id: Uuid) -> Result<DashboardCounts> {
        let state = self.lock();
        let mut modules: Vec<Uuid> = state
            .files
            .values()
            .filter(|f| f.user_id == user_id)
            .map(|f| f.module_id)
            .collect();
        modules.sort();
        modules.dedup();

        let scores: Vec<i64> = state
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .map(|s| s.score as i64)
            .collect();
        let average_score = (!scores.is_empty())
            .then(|| (scores.iter().sum::<i64>() as f64 / scores.len() as f64).round() as i32);

        Ok(DashboardCounts {
            module_count: modules.len() as i64,
            flashcard_count: state.flashcards.iter().filter(|c| c.user_id == user_id).count()
                as i64,
            session_count: scores.len() as i64,
            average_score,
        })
    }

    async fn weakest_sessions(&self, user_id: Uuid, limit: i64) -> Result<Vec<WeakSession>> {
        let state = self.lock();
        let mut sessions: Vec<WeakSession> = state
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .filter_map(|s| {
                s.module_id.map(|module_id| WeakSession {
                    id: s.id,
                    module_id,
                    score: s.score,
                    created_at: s.created_at,
                })
            })
            .collect();
        sessions.sort_by(|a, b| a.score.cmp(&b.score).then(b.created_at.cmp(&a.created_at)));
        sessions.truncate(limit as usize);
        Ok(sessions)
    }

    async fn study_days(&self, user_id: Uuid, limit: i64) -> Result<Vec<NaiveDate>> {
        let state = self.lock();
        let mut days: Vec<NaiveDate> = state
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .map(|s| s.created_at.date_naive())
            .collect();
        days.sort_by(|a, b| b.cmp(a));
        days.dedup();
        days.truncate(limit as usize);
        Ok(days)
    }
}

#[async_trait]
impl StudySessionRepository for InMemoryStore {
    async fn create_session(&self, session: NewStudySession) -> Result<StudySession> {
        let record = StudySession {
            id: Uuid::new_v4(),
            user_id: session.user_id,
            module_id: session.module_id,
            session_type: session.session_type.as_str().to_string(),
            duration_seconds: session.duration_seconds,
            score: session.score.score,
            correct_count: session.score.correct_count,
            incorrect_count: session.score.incorrect_count,
            created_at: Utc::now(),
        };
        self.lock().sessions.push(record.clone());
        Ok(record)
    }

    async fn insert_progress(&self, progress: NewStudyProgress) -> Result<()> {
        let mut state = self.lock();
        if state.fail_progress {
            return Err(db_down());
        }
        state.progress.push(progress);
        Ok(())
    }
}

// =============================================================================
// BLOB STORE
// =============================================================================

#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn put(&self, path: &str, data: &[u8]) {
        self.blobs
            .lock()
            .unwrap()
            .insert(path.to_string(), data.to_vec());
    }

    pub fn contains(&self, path: &str) -> bool {
        self.blobs.lock().unwrap().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn download(&self, path: &str) -> Result<Vec<u8>> {
        self.blobs
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| AppError::Storage(format!("Object {} not found", path)))
    }

    async fn upload(&self, path: &str, data: Vec<u8>, _content_type: &str) -> Result<String> {
        self.blobs.lock().unwrap().insert(path.to_string(), data);
        Ok(path.to_string())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.blobs.lock().unwrap().remove(path);
        Ok(())
    }
}

// =============================================================================
// TEXT COMPLETION
// =============================================================================

pub enum Script {
    Reply(String),
    Upstream { status: u16, body: String },
    Slow(Duration),
}

/// Returns one scripted outcome for every call and records the prompts it saw
pub struct ScriptedCompletion {
    script: Script,
    calls: AtomicUsize,
    prompts: Mutex<Vec<(String, String, u32)>>,
}

impl ScriptedCompletion {
    fn with(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn reply(text: impl Into<String>) -> Arc<Self> {
        Self::with(Script::Reply(text.into()))
    }

    pub fn upstream_error(status: u16, body: &str) -> Arc<Self> {
        Self::with(Script::Upstream {
            status,
            body: body.to_string(),
        })
    }

    pub fn slow(delay: Duration) -> Arc<Self> {
        Self::with(Script::Slow(delay))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// (system, user, max_tokens) of the most recent call
    pub fn last_prompt(&self) -> Option<(String, String, u32)> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextCompletion for ScriptedCompletion {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push((
            system_prompt.to_string(),
            user_prompt.to_string(),
            max_tokens,
        ));

        match &self.script {
            Script::Reply(text) => Ok(text.clone()),
            Script::Upstream { status, body } => Err(AppError::GenerationService {
                status: *status,
                body: body.clone(),
            }),
            Script::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(valid_materials_json())
            }
        }
    }
}

// =============================================================================
// FIXTURES
// =============================================================================

fn sentence() -> String {
    Sentence(4..9).fake()
}

/// A batch with the requested 10 / 5 / 3 shape and four options per question
pub fn valid_batch() -> GeneratedArtifactBatch {
    GeneratedArtifactBatch {
        flashcards: (0..10)
            .map(|i| Flashcard {
                question: format!("{} ({})", sentence(), i),
                answer: sentence(),
                source_reference: Some(format!("Page {}", i + 1)),
            })
            .collect(),
        mcq_questions: (0..5)
            .map(|i| McqQuestion {
                question: sentence(),
                options: (0..4).map(|_| sentence()).collect(),
                correct_option_index: i % 4,
                explanation: sentence(),
                source_reference: None,
            })
            .collect(),
        essay_prompts: (0..3)
            .map(|_| EssayPrompt {
                prompt: sentence(),
                thesis_suggestion: sentence(),
                key_arguments: vec![sentence(), sentence()],
                counter_arguments: vec![sentence()],
                evidence_points: vec![sentence(), sentence()],
                source_reference: Some("Slide 3".to_string()),
            })
            .collect(),
    }
}

/// Model reply body in the shape the generation prompt asks for
pub fn materials_json(batch: &GeneratedArtifactBatch) -> String {
    json!({
        "flashcards": batch.flashcards.iter().map(|c| json!({
            "question": c.question,
            "answer": c.answer,
            "source_reference": c.source_reference,
        })).collect::<Vec<_>>(),
        "mcq_questions": batch.mcq_questions.iter().map(|q| json!({
            "question": q.question,
            "options": q.options,
            "correct_option": q.correct_option_index,
            "explanation": q.explanation,
            "source_reference": q.source_reference,
        })).collect::<Vec<_>>(),
        "essay_prompts": batch.essay_prompts.iter().map(|e| json!({
            "prompt": e.prompt,
            "thesis_suggestion": e.thesis_suggestion,
            "key_arguments": e.key_arguments,
            "counter_arguments": e.counter_arguments,
            "evidence_points": e.evidence_points,
            "source_reference": e.source_reference,
        })).collect::<Vec<_>>(),
    })
    .to_string()
}

pub fn valid_materials_json() -> String {
    materials_json(&valid_batch())
}

pub fn essay_feedback_json(grade: &str) -> String {
    json!({
        "structure_analysis": "Clear introduction, but the conclusion restates rather than synthesises.",
        "argumentation_analysis": "Arguments are relevant and mostly well supported.",
        "strengths": ["Engages with the counter-argument", "Good use of evidence"],
        "weaknesses": ["Paragraph three drifts from the thesis"],
        "improvement_suggestions": ["Tie each paragraph back to the question"],
        "grade_estimate": grade,
        "overall_feedback": "A solid answer that would benefit from tighter structure."
    })
    .to_string()
}
