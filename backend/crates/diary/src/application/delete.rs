//! Delete Diary Use Case

use std::sync::Arc;

use kernel::context::RequestContext;
use kernel::permission::Action;

use crate::application::{authorize, parse_id};
use crate::domain::entities::Diary;
use crate::domain::repository::DiaryRepository;
use crate::domain::scope::DiaryScope;
use crate::error::{DiaryError, DiaryResult};

pub struct DeleteDiaryUseCase<R>
where
    R: DiaryRepository,
{
    repo: Arc<R>,
}

impl<R> DeleteDiaryUseCase<R>
where
    R: DiaryRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// The diary to confirm; nothing is removed
    pub async fn confirm(&self, ctx: &RequestContext, raw_id: &str) -> DiaryResult<Diary> {
        authorize(&ctx.actor, Action::Delete)?;

        let scope = DiaryScope::for_actor(&ctx.actor);
        let diary_id = parse_id(raw_id)?;
        self.repo
            .find_diary(&diary_id, &scope.owner)
            .await?
            .ok_or(DiaryError::NotFound)
    }

    pub async fn execute(&self, ctx: &RequestContext, raw_id: &str) -> DiaryResult<()> {
        let diary = self.confirm(ctx, raw_id).await?;

        if !self
            .repo
            .delete_diary(&diary.diary_id, &diary.created_by)
            .await?
        {
            return Err(DiaryError::NotFound);
        }

        tracing::info!(diary_id = %diary.diary_id, "Diary deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::tests::{context, seed};
    use crate::infra::memory::MemoryDiaryRepository;

    #[tokio::test]
    async fn test_confirm_then_delete() {
        let repo = MemoryDiaryRepository::new();
        let ctx = context(&["delete"]);
        let diaries = seed(&repo, &ctx, 1).await;
        let uc = DeleteDiaryUseCase::new(Arc::new(repo.clone()));
        let id = diaries[0].diary_id.to_string();

        uc.confirm(&ctx, &id).await.unwrap();
        assert!(
            repo.find_diary(&diaries[0].diary_id, &ctx.actor.user_id)
                .await
                .unwrap()
                .is_some()
        );

        uc.execute(&ctx, &id).await.unwrap();
        assert!(matches!(uc.execute(&ctx, &id).await, Err(DiaryError::NotFound)));
    }

    #[tokio::test]
    async fn test_other_owner_cannot_delete() {
        let repo = MemoryDiaryRepository::new();
        let owner = context(&["delete"]);
        let diaries = seed(&repo, &owner, 1).await;
        let uc = DeleteDiaryUseCase::new(Arc::new(repo.clone()));

        let intruder = context(&["delete"]);
        assert!(matches!(
            uc.execute(&intruder, &diaries[0].diary_id.to_string()).await,
            Err(DiaryError::NotFound)
        ));
        assert!(
            repo.find_diary(&diaries[0].diary_id, &owner.actor.user_id)
                .await
                .unwrap()
                .is_some()
        );
    }
}
