use async_trait::async_trait;
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::ArtifactRepository;
use crate::core::database::persistence_error;
use crate::core::error::{AppError, Result};
use crate::features::files::models::{File, ProcessingStatus};
use crate::features::files::repositories::guarded_transition;
use crate::features::materials::models::{
    ArgumentFramework, EssayPromptRecord, FlashcardRecord, GeneratedArtifactBatch, McqOptions,
    McqQuestionRecord, StoredMaterials,
};
use crate::features::quotas::models::Resource;
use crate::features::quotas::repositories::{increment_usage, lock_counters};

pub struct PgArtifactRepository {
    pool: PgPool,
}

impl PgArtifactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArtifactRepository for PgArtifactRepository {
    async fn commit_generation(&self, file: &File, batch: &GeneratedArtifactBatch) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| persistence_error("Failed to open transaction", e))?;

        // Admission checked the quota before generation; recheck under the row lock
        lock_counters(&mut tx, file.user_id)
            .await
            .map_err(|e| persistence_error("Failed to lock quota counters", e))?
            .ensure_can_consume(Resource::Generations, 1)?;

        if !batch.flashcards.is_empty() {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO flashcards (file_id, module_id, user_id, question, answer, source_reference) ",
            );
            builder.push_values(&batch.flashcards, |mut row, card| {
                row.push_bind(file.id)
                    .push_bind(file.module_id)
                    .push_bind(file.user_id)
                    .push_bind(&card.question)
                    .push_bind(&card.answer)
                    .push_bind(&card.source_reference);
            });
            builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(|e| persistence_error("Failed to insert flashcards", e))?;
        }

        if !batch.mcq_questions.is_empty() {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO mcq_questions (file_id, module_id, user_id, question, options, \
                 correct_option_index, explanation, source_reference) ",
            );
            builder.push_values(&batch.mcq_questions, |mut row, mcq| {
                row.push_bind(file.id)
                    .push_bind(file.module_id)
                    .push_bind(file.user_id)
                    .push_bind(&mcq.question)
                    .push_bind(Json(McqOptions::from(mcq)))
                    .push_bind(mcq.correct_option_index as i16)
                    .push_bind(&mcq.explanation)
                    .push_bind(&mcq.source_reference);
            });
            builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(|e| persistence_error("Failed to insert multiple-choice questions", e))?;
        }

        if !batch.essay_prompts.is_empty() {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO essay_prompts (file_id, module_id, user_id, prompt, \
                 argument_framework, source_reference) ",
            );
            builder.push_values(&batch.essay_prompts, |mut row, essay| {
                row.push_bind(file.id)
                    .push_bind(file.module_id)
                    .push_bind(file.user_id)
                    .push_bind(&essay.prompt)
                    .push_bind(Json(ArgumentFramework::from(essay)))
                    .push_bind(&essay.source_reference);
            });
            builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(|e| persistence_error("Failed to insert essay prompts", e))?;
        }

        let completed =
            guarded_transition(&mut *tx, file.id, file.user_id, ProcessingStatus::Completed)
                .await
                .map_err(|e| persistence_error("Failed to mark file completed", e))?;
        if !completed {
            // Dropping the transaction rolls the inserts back
            return Err(AppError::Persistence(format!(
                "File {} left the processing state before its materials were saved",
                file.id
            )));
        }

        increment_usage(&mut *tx, file.user_id, Resource::Generations, 1)
            .await
            .map_err(|e| persistence_error("Failed to record generation usage", e))?;

        tx.commit()
            .await
            .map_err(|e| persistence_error("Failed to commit generated materials", e))?;

        tracing::debug!(
            file_id = %file.id,
            flashcards = batch.flashcards.len(),
            mcq = batch.mcq_questions.len(),
            essays = batch.essay_prompts.len(),
            "Generated materials committed"
        );

        Ok(())
    }

    async fn list_for_file(&self, file_id: Uuid, user_id: Uuid) -> Result<StoredMaterials> {
        let flashcards = sqlx::query_as!(
            FlashcardRecord,
            r#"
            SELECT id, file_id, module_id, user_id, question, answer, source_reference, created_at
            FROM flashcards
            WHERE file_id = $1 AND user_id = $2
            ORDER BY created_at ASC, id ASC
            "#,
            file_id,
            user_id
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch flashcards: {:?}", e);
            AppError::Database(e)
        })?;

        let mcq_questions = sqlx::query_as!(
            McqQuestionRecord,
            r#"
            SELECT id, file_id, module_id, user_id, question,
                   options as "options: Json<McqOptions>",
                   source_reference, created_at
            FROM mcq_questions
            WHERE file_id = $1 AND user_id = $2
            ORDER BY created_at ASC, id ASC
            "#,
            file_id,
            user_id
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch multiple-choice questions: {:?}", e);
            AppError::Database(e)
        })?;

        let essay_prompts = sqlx::query_as!(
            EssayPromptRecord,
            r#"
            SELECT id, file_id, module_id, user_id, prompt,
                   argument_framework as "argument_framework: Json<ArgumentFramework>",
                   source_reference, created_at
            FROM essay_prompts
            WHERE file_id = $1 AND user_id = $2
            ORDER BY created_at ASC, id ASC
            "#,
            file_id,
            user_id
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch essay prompts: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(StoredMaterials {
            flashcards,
            mcq_questions,
            essay_prompts,
        })
    }

    async fn find_essay_prompt(
        &self,
        prompt_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<EssayPromptRecord>> {
        sqlx::query_as!(
            EssayPromptRecord,
            r#"
            SELECT id, file_id, module_id, user_id, prompt,
                   argument_framework as "argument_framework: Json<ArgumentFramework>",
                   source_reference, created_at
            FROM essay_prompts
            WHERE id = $1 AND user_id = $2
            "#,
            prompt_id,
            user_id
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch essay prompt: {:?}", e);
            AppError::Database(e)
        })
    }
}
