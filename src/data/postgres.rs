//! Postgres-backed implementation of [`Store`].
//!
//! All contest writes go through `ON CONFLICT` upserts against the
//! `(name, platform)` natural key, so replaying a batch is idempotent.

use crate::data::models::{Contest, ContestRecord, ContestStatus, Platform, SolutionLink};
use crate::data::store::{ContestFilter, Store, StoreError, UpsertOutcome};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn decode_error(msg: String) -> StoreError {
    StoreError::Database(sqlx::Error::Decode(msg.into()))
}

fn contest_from_row(row: &PgRow) -> Result<Contest, StoreError> {
    let platform_raw: String = row.try_get("platform")?;
    let platform = Platform::parse(&platform_raw)
        .ok_or_else(|| decode_error(format!("unknown platform in contests row: {platform_raw}")))?;
    let status_raw: String = row.try_get("status")?;
    let status = ContestStatus::parse(&status_raw)
        .ok_or_else(|| decode_error(format!("unknown status in contests row: {status_raw}")))?;

    Ok(Contest {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        platform,
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time")?,
        url: row.try_get("url")?,
        status,
    })
}

fn solution_from_row(row: &PgRow) -> Result<SolutionLink, StoreError> {
    Ok(SolutionLink {
        contest_id: row.try_get("contest_id")?,
        url: row.try_get("url")?,
        added_manually: row.try_get("added_manually")?,
    })
}

const CONTEST_COLUMNS: &str = "id, name, platform, start_time, end_time, url, status";

#[async_trait]
impl Store for PgStore {
    async fn upsert_contest(&self, record: &ContestRecord) -> Result<UpsertOutcome, StoreError> {
        // `xmax = 0` distinguishes a fresh insert from a conflict-update.
        let row = sqlx::query(
            r#"
            INSERT INTO contests (name, platform, start_time, end_time, url, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (name, platform)
            DO UPDATE SET
                start_time = EXCLUDED.start_time,
                end_time = EXCLUDED.end_time,
                url = EXCLUDED.url,
                status = EXCLUDED.status,
                updated_at = now()
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(&record.name)
        .bind(record.platform.as_str())
        .bind(record.start_time)
        .bind(record.end_time)
        .bind(&record.url)
        .bind(record.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        let inserted: bool = row.try_get("inserted")?;
        Ok(if inserted {
            UpsertOutcome::Inserted
        } else {
            UpsertOutcome::Updated
        })
    }

    async fn find_contests(&self, filter: &ContestFilter) -> Result<Vec<Contest>, StoreError> {
        let platforms: Vec<String> = filter
            .platforms
            .iter()
            .map(|p| p.as_str().to_owned())
            .collect();
        let status = filter.status.map(|s| s.as_str().to_owned());

        let rows = sqlx::query(&format!(
            r#"
            SELECT {CONTEST_COLUMNS} FROM contests
            WHERE (cardinality($1::text[]) = 0 OR platform = ANY($1))
              AND ($2::text IS NULL OR status = $2)
            ORDER BY start_time ASC
            "#
        ))
        .bind(&platforms)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(contest_from_row).collect()
    }

    async fn find_contest_by_id(&self, id: i64) -> Result<Option<Contest>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {CONTEST_COLUMNS} FROM contests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(contest_from_row).transpose()
    }

    async fn search_contests(
        &self,
        platform: Platform,
        fragment: &str,
    ) -> Result<Vec<Contest>, StoreError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {CONTEST_COLUMNS} FROM contests
            WHERE platform = $1 AND name ILIKE '%' || $2 || '%'
            ORDER BY start_time ASC
            "#
        ))
        .bind(platform.as_str())
        .bind(fragment)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(contest_from_row).collect()
    }

    async fn upsert_solution_link(
        &self,
        contest_id: i64,
        url: &str,
        added_manually: bool,
    ) -> Result<SolutionLink, StoreError> {
        // DO NOTHING keeps the existing link authoritative; the insert
        // returns no row on conflict and we read back the survivor.
        let inserted = sqlx::query(
            r#"
            INSERT INTO solutions (contest_id, url, added_manually)
            VALUES ($1, $2, $3)
            ON CONFLICT (contest_id) DO NOTHING
            RETURNING contest_id, url, added_manually
            "#,
        )
        .bind(contest_id)
        .bind(url)
        .bind(added_manually)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = inserted {
            return solution_from_row(&row);
        }

        let existing = sqlx::query(
            "SELECT contest_id, url, added_manually FROM solutions WHERE contest_id = $1",
        )
        .bind(contest_id)
        .fetch_one(&self.pool)
        .await?;
        solution_from_row(&existing)
    }

    async fn find_solution_link(
        &self,
        contest_id: i64,
    ) -> Result<Option<SolutionLink>, StoreError> {
        let row = sqlx::query(
            "SELECT contest_id, url, added_manually FROM solutions WHERE contest_id = $1",
        )
        .bind(contest_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(solution_from_row).transpose()
    }

    async fn get_timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>, StoreError> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM app_kv WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value.and_then(|v| DateTime::parse_from_rfc3339(&v).ok().map(|dt| dt.to_utc())))
    }

    async fn set_timestamp(&self, key: &str, ts: DateTime<Utc>) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO app_kv (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key)
            DO UPDATE SET value = EXCLUDED.value, updated_at = now()
            "#,
        )
        .bind(key)
        .bind(ts.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
