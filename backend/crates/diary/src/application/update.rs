//! Update Diary Use Case

use std::sync::Arc;

use kernel::context::RequestContext;
use kernel::permission::Action;

use crate::application::{authorize, parse_id};
use crate::domain::entities::{DATE_TAKEN, Diary, DiaryInput};
use crate::domain::repository::DiaryRepository;
use crate::domain::scope::DiaryScope;
use crate::error::{DiaryError, DiaryResult};

pub struct UpdateDiaryUseCase<R>
where
    R: DiaryRepository,
{
    repo: Arc<R>,
}

impl<R> UpdateDiaryUseCase<R>
where
    R: DiaryRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Permission check ahead of reading the submitted form
    pub fn prepare(&self, ctx: &RequestContext) -> DiaryResult<()> {
        authorize(&ctx.actor, Action::Change)
    }

    /// The actor's diary behind `raw_id`, for prefilling the form
    pub async fn load(&self, ctx: &RequestContext, raw_id: &str) -> DiaryResult<Diary> {
        authorize(&ctx.actor, Action::Change)?;

        let scope = DiaryScope::for_actor(&ctx.actor);
        let diary_id = parse_id(raw_id)?;
        self.repo
            .find_diary(&diary_id, &scope.owner)
            .await?
            .ok_or(DiaryError::NotFound)
    }

    pub async fn execute(
        &self,
        ctx: &RequestContext,
        raw_id: &str,
        input: DiaryInput,
    ) -> DiaryResult<Diary> {
        let mut diary = self.load(ctx, raw_id).await?;

        let fields = input.validate()?;
        if self
            .repo
            .date_taken(&diary.created_by, fields.date, Some(&diary.diary_id))
            .await?
        {
            return Err(DiaryError::field("date", DATE_TAKEN));
        }

        diary.apply(fields);
        self.repo.update_diary(&diary).await?;

        tracing::info!(diary_id = %diary.diary_id, "Diary updated");
        Ok(diary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::tests::{context, input, seed};
    use crate::infra::memory::MemoryDiaryRepository;

    #[tokio::test]
    async fn test_update_keeps_own_date() {
        let repo = MemoryDiaryRepository::new();
        let ctx = context(&["change"]);
        let diaries = seed(&repo, &ctx, 2).await;
        let uc = UpdateDiaryUseCase::new(Arc::new(repo.clone()));
        let id = diaries[0].diary_id.to_string();

        let updated = uc
            .execute(&ctx, &id, input("2024-01-01", "Rewritten"))
            .await
            .unwrap();
        assert_eq!(updated.daily_record, "Rewritten");

        let err = uc
            .execute(&ctx, &id, input("2024-01-02", "Clash"))
            .await
            .unwrap_err();
        assert!(matches!(err, DiaryError::Validation(ref e) if e.contains("date")));
    }

    #[tokio::test]
    async fn test_foreign_or_malformed_id_is_not_found() {
        let repo = MemoryDiaryRepository::new();
        let owner = context(&["change"]);
        let intruder = context(&["change"]);
        let diaries = seed(&repo, &owner, 1).await;
        let uc = UpdateDiaryUseCase::new(Arc::new(repo.clone()));

        assert!(matches!(
            uc.load(&intruder, &diaries[0].diary_id.to_string()).await,
            Err(DiaryError::NotFound)
        ));
        assert!(matches!(
            uc.load(&owner, "not-a-uuid").await,
            Err(DiaryError::NotFound)
        ));
        assert!(matches!(
            uc.load(&context(&["view"]), &diaries[0].diary_id.to_string()).await,
            Err(DiaryError::NotFound)
        ));
    }
}
