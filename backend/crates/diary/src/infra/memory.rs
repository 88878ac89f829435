//! In-memory Repository
//!
//! Enforces the `(date, created_by)` uniqueness under its lock, like the
//! table constraint does.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use kernel::id::{DiaryId, UserId};

use crate::domain::entities::{DATE_TAKEN, Diary};
use crate::domain::repository::{DiaryRepository, Window};
use crate::domain::scope::DiaryScope;
use crate::error::{DiaryError, DiaryResult};

#[derive(Clone, Debug, Default)]
pub struct MemoryDiaryRepository {
    diaries: Arc<Mutex<HashMap<DiaryId, Diary>>>,
}

impl MemoryDiaryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn diaries(&self) -> DiaryResult<MutexGuard<'_, HashMap<DiaryId, Diary>>> {
        self.diaries
            .lock()
            .map_err(|_| DiaryError::Internal("Memory store lock poisoned".to_string()))
    }
}

fn clashes(diaries: &HashMap<DiaryId, Diary>, diary: &Diary) -> bool {
    diaries.values().any(|d| {
        d.created_by == diary.created_by && d.date == diary.date && d.diary_id != diary.diary_id
    })
}

impl DiaryRepository for MemoryDiaryRepository {
    async fn count_diaries(&self, scope: &DiaryScope) -> DiaryResult<u64> {
        Ok(self.diaries()?.values().filter(|d| scope.admits(d)).count() as u64)
    }

    async fn list_diaries(
        &self,
        scope: &DiaryScope,
        window: Option<Window>,
    ) -> DiaryResult<Vec<Diary>> {
        let mut diaries: Vec<Diary> = self
            .diaries()?
            .values()
            .filter(|d| scope.admits(d))
            .cloned()
            .collect();
        diaries.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(match window {
            Some(w) => diaries
                .into_iter()
                .skip(w.offset as usize)
                .take(w.limit as usize)
                .collect(),
            None => diaries,
        })
    }

    async fn find_diary(&self, diary_id: &DiaryId, owner: &UserId) -> DiaryResult<Option<Diary>> {
        Ok(self
            .diaries()?
            .get(diary_id)
            .filter(|d| &d.created_by == owner)
            .cloned())
    }

    async fn date_taken(
        &self,
        owner: &UserId,
        date: NaiveDate,
        except: Option<&DiaryId>,
    ) -> DiaryResult<bool> {
        Ok(self.diaries()?.values().any(|d| {
            &d.created_by == owner && d.date == date && Some(&d.diary_id) != except
        }))
    }

    async fn create_diary(&self, diary: &Diary) -> DiaryResult<()> {
        let mut diaries = self.diaries()?;
        if clashes(&diaries, diary) {
            return Err(DiaryError::field("date", DATE_TAKEN));
        }
        diaries.insert(diary.diary_id, diary.clone());
        Ok(())
    }

    async fn update_diary(&self, diary: &Diary) -> DiaryResult<()> {
        let mut diaries = self.diaries()?;
        if clashes(&diaries, diary) {
            return Err(DiaryError::field("date", DATE_TAKEN));
        }
        match diaries.get_mut(&diary.diary_id) {
            Some(stored) if stored.created_by == diary.created_by => {
                *stored = diary.clone();
                Ok(())
            }
            _ => Err(DiaryError::NotFound),
        }
    }

    async fn delete_diary(&self, diary_id: &DiaryId, owner: &UserId) -> DiaryResult<bool> {
        let mut diaries = self.diaries()?;
        match diaries.get(diary_id) {
            Some(d) if &d.created_by == owner => {
                diaries.remove(diary_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::DiaryInput;

    fn diary(owner: UserId, date: &str) -> Diary {
        let fields = DiaryInput {
            date: date.to_string(),
            daily_record: "ok".to_string(),
            ..Default::default()
        }
        .validate()
        .unwrap();
        Diary::new(owner, fields)
    }

    #[tokio::test]
    async fn test_store_rejects_duplicate_date() {
        let repo = MemoryDiaryRepository::new();
        let owner = UserId::new();
        repo.create_diary(&diary(owner, "2024-05-01")).await.unwrap();

        let err = repo
            .create_diary(&diary(owner, "2024-05-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, DiaryError::Validation(ref e) if e.contains("date")));

        repo.create_diary(&diary(UserId::new(), "2024-05-01"))
            .await
            .unwrap();
    }
}
