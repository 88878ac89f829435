//! Repository Traits

use chrono::NaiveDate;
use kernel::id::{DiaryId, UserId};

use crate::domain::entities::Diary;
use crate::domain::scope::DiaryScope;
use crate::error::DiaryResult;

/// Slice of a scoped listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}

#[trait_variant::make(DiaryRepository: Send)]
pub trait LocalDiaryRepository {
    async fn count_diaries(&self, scope: &DiaryScope) -> DiaryResult<u64>;

    /// Newest date first; `None` returns the whole scope
    async fn list_diaries(
        &self,
        scope: &DiaryScope,
        window: Option<Window>,
    ) -> DiaryResult<Vec<Diary>>;

    /// Lookup by id and owner together
    async fn find_diary(&self, diary_id: &DiaryId, owner: &UserId) -> DiaryResult<Option<Diary>>;

    /// Whether the owner already has a diary on `date` (other than `except`)
    async fn date_taken(
        &self,
        owner: &UserId,
        date: NaiveDate,
        except: Option<&DiaryId>,
    ) -> DiaryResult<bool>;

    /// A duplicate `(date, owner)` is reported as a field error on `date`
    async fn create_diary(&self, diary: &Diary) -> DiaryResult<()>;

    /// Same duplicate handling as `create_diary`
    async fn update_diary(&self, diary: &Diary) -> DiaryResult<()>;

    async fn delete_diary(&self, diary_id: &DiaryId, owner: &UserId) -> DiaryResult<bool>;
}
