use async_trait::async_trait;
use sqlx::{PgConnection, PgExecutor, PgPool};
use uuid::Uuid;

use super::QuotaRepository;
use crate::core::error::{AppError, Result};
use crate::features::quotas::models::{QuotaCounters, Resource};

pub struct PgQuotaRepository {
    pool: PgPool,
}

impl PgQuotaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `used = used + amount` in a single statement, creating the profile if needed.
///
/// Generic over the executor so callers can run it inside their own transaction.
pub async fn increment_usage<'e, E>(
    executor: E,
    user_id: Uuid,
    resource: Resource,
    amount: i64,
) -> std::result::Result<(), sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let column = resource.column();
    let sql = format!(
        r#"
        INSERT INTO user_profiles (id, {column})
        VALUES ($1, $2)
        ON CONFLICT (id) DO UPDATE
        SET {column} = user_profiles.{column} + EXCLUDED.{column},
            updated_at = NOW()
        "#
    );

    sqlx::query(&sql)
        .bind(user_id)
        .bind(amount)
        .execute(executor)
        .await?;

    Ok(())
}

/// Counters read with `FOR UPDATE`, creating the profile if needed.
///
/// Holding the row lock until commit serializes concurrent charges for
/// the same user, so a recheck here cannot be raced past the limit.
pub async fn lock_counters(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> std::result::Result<QuotaCounters, sqlx::Error> {
    sqlx::query!(
        r#"
        INSERT INTO user_profiles (id)
        VALUES ($1)
        ON CONFLICT (id) DO NOTHING
        "#,
        user_id
    )
    .execute(&mut *conn)
    .await?;

    sqlx::query_as!(
        QuotaCounters,
        r#"
        SELECT id as user_id, subscription_tier, monthly_uploads_used,
               monthly_generations_used, storage_used_bytes
        FROM user_profiles
        WHERE id = $1
        FOR UPDATE
        "#,
        user_id
    )
    .fetch_one(&mut *conn)
    .await
}

#[async_trait]
impl QuotaRepository for PgQuotaRepository {
    async fn get_or_create(&self, user_id: Uuid) -> Result<QuotaCounters> {
        sqlx::query!(
            r#"
            INSERT INTO user_profiles (id)
            VALUES ($1)
            ON CONFLICT (id) DO NOTHING
            "#,
            user_id
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to ensure user profile: {:?}", e);
            AppError::Database(e)
        })?;

        sqlx::query_as!(
            QuotaCounters,
            r#"
            SELECT id as user_id, subscription_tier, monthly_uploads_used,
                   monthly_generations_used, storage_used_bytes
            FROM user_profiles
            WHERE id = $1
            "#,
            user_id
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch quota counters: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn increment(&self, user_id: Uuid, resource: Resource, amount: i64) -> Result<()> {
        increment_usage(&self.pool, user_id, resource, amount)
            .await
            .map_err(|e| {
                tracing::error!("Failed to increment {:?} usage: {:?}", resource, e);
                AppError::Database(e)
            })
    }
}
