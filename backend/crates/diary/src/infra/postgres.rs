//! PostgreSQL Repository Implementation

use chrono::{DateTime, NaiveDate, Utc};
use kernel::error::conversions::is_unique_violation;
use kernel::id::{DiaryId, UserId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{DATE_TAKEN, Diary};
use crate::domain::repository::{DiaryRepository, Window};
use crate::domain::scope::DiaryScope;
use crate::domain::value_objects::DailyCheck;
use crate::error::{DiaryError, DiaryResult};

const DATE_OWNER_KEY: &str = "diaries_date_created_by_key";

/// PostgreSQL-backed diary repository
#[derive(Clone)]
pub struct PgDiaryRepository {
    pool: PgPool,
}

impl PgDiaryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// A concurrent writer can still win the race past `date_taken`
fn map_write_error(err: sqlx::Error) -> DiaryError {
    if is_unique_violation(&err, Some(DATE_OWNER_KEY)) {
        DiaryError::field("date", DATE_TAKEN)
    } else {
        DiaryError::Database(err)
    }
}

impl DiaryRepository for PgDiaryRepository {
    async fn count_diaries(&self, scope: &DiaryScope) -> DiaryResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM diaries WHERE created_by = $1",
        )
        .bind(scope.owner.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(count as u64)
    }

    async fn list_diaries(
        &self,
        scope: &DiaryScope,
        window: Option<Window>,
    ) -> DiaryResult<Vec<Diary>> {
        let (offset, limit) = match window {
            Some(w) => (w.offset as i64, Some(w.limit as i64)),
            None => (0, None),
        };

        let rows = sqlx::query_as::<_, DiaryRow>(
            r#"
            SELECT
                diary_id,
                date,
                daily_check,
                daily_record,
                todo,
                remark,
                created_by,
                created_at,
                updated_at
            FROM diaries
            WHERE created_by = $1
            ORDER BY date DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(scope.owner.as_uuid())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DiaryRow::into_diary).collect())
    }

    async fn find_diary(&self, diary_id: &DiaryId, owner: &UserId) -> DiaryResult<Option<Diary>> {
        let row = sqlx::query_as::<_, DiaryRow>(
            r#"
            SELECT
                diary_id,
                date,
                daily_check,
                daily_record,
                todo,
                remark,
                created_by,
                created_at,
                updated_at
            FROM diaries
            WHERE diary_id = $1 AND created_by = $2
            "#,
        )
        .bind(diary_id.as_uuid())
        .bind(owner.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(DiaryRow::into_diary))
    }

    async fn date_taken(
        &self,
        owner: &UserId,
        date: NaiveDate,
        except: Option<&DiaryId>,
    ) -> DiaryResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM diaries
                WHERE created_by = $1 AND date = $2
                  AND ($3::uuid IS NULL OR diary_id <> $3)
            )
            "#,
        )
        .bind(owner.as_uuid())
        .bind(date)
        .bind(except.map(|id| *id.as_uuid()))
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create_diary(&self, diary: &Diary) -> DiaryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO diaries (
                diary_id,
                date,
                daily_check,
                daily_record,
                todo,
                remark,
                created_by,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(diary.diary_id.as_uuid())
        .bind(diary.date)
        .bind(diary.daily_check.as_str())
        .bind(&diary.daily_record)
        .bind(&diary.todo)
        .bind(&diary.remark)
        .bind(diary.created_by.as_uuid())
        .bind(diary.created_at)
        .bind(diary.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn update_diary(&self, diary: &Diary) -> DiaryResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE diaries SET
                date = $3,
                daily_check = $4,
                daily_record = $5,
                todo = $6,
                remark = $7,
                updated_at = $8
            WHERE diary_id = $1 AND created_by = $2
            "#,
        )
        .bind(diary.diary_id.as_uuid())
        .bind(diary.created_by.as_uuid())
        .bind(diary.date)
        .bind(diary.daily_check.as_str())
        .bind(&diary.daily_record)
        .bind(&diary.todo)
        .bind(&diary.remark)
        .bind(diary.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?
        .rows_affected();

        if updated == 0 {
            return Err(DiaryError::NotFound);
        }
        Ok(())
    }

    async fn delete_diary(&self, diary_id: &DiaryId, owner: &UserId) -> DiaryResult<bool> {
        let deleted = sqlx::query("DELETE FROM diaries WHERE diary_id = $1 AND created_by = $2")
            .bind(diary_id.as_uuid())
            .bind(owner.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct DiaryRow {
    diary_id: Uuid,
    date: NaiveDate,
    daily_check: String,
    daily_record: String,
    todo: Option<String>,
    remark: Option<String>,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DiaryRow {
    fn into_diary(self) -> Diary {
        Diary {
            diary_id: DiaryId::from_uuid(self.diary_id),
            date: self.date,
            daily_check: DailyCheck::from_db(&self.daily_check),
            daily_record: self.daily_record,
            todo: self.todo,
            remark: self.remark,
            created_by: UserId::from_uuid(self.created_by),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
