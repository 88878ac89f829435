//! Create Diary Use Case

use std::sync::Arc;

use kernel::context::RequestContext;
use kernel::permission::Action;

use crate::application::authorize;
use crate::domain::entities::{DATE_TAKEN, Diary, DiaryInput};
use crate::domain::repository::DiaryRepository;
use crate::error::{DiaryError, DiaryResult};

pub struct CreateDiaryUseCase<R>
where
    R: DiaryRepository,
{
    repo: Arc<R>,
}

impl<R> CreateDiaryUseCase<R>
where
    R: DiaryRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Permission check for showing the empty form
    pub fn prepare(&self, ctx: &RequestContext) -> DiaryResult<()> {
        authorize(&ctx.actor, Action::Add)
    }

    pub async fn execute(&self, ctx: &RequestContext, input: DiaryInput) -> DiaryResult<Diary> {
        authorize(&ctx.actor, Action::Add)?;

        let owner = ctx.actor.user_id;
        let fields = input.validate()?;
        if self.repo.date_taken(&owner, fields.date, None).await? {
            return Err(DiaryError::field("date", DATE_TAKEN));
        }

        let diary = Diary::new(owner, fields);
        self.repo.create_diary(&diary).await?;

        tracing::info!(diary_id = %diary.diary_id, user_id = %owner, "Diary created");
        Ok(diary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::tests::{context, input};
    use crate::infra::memory::MemoryDiaryRepository;

    #[tokio::test]
    async fn test_create_owned_by_actor() {
        let repo = MemoryDiaryRepository::new();
        let ctx = context(&["add"]);
        let uc = CreateDiaryUseCase::new(Arc::new(repo.clone()));

        let diary = uc.execute(&ctx, input("2024-03-01", "Patched")).await.unwrap();
        assert_eq!(diary.created_by, ctx.actor.user_id);
        assert!(
            repo.find_diary(&diary.diary_id, &ctx.actor.user_id)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_duplicate_date_is_field_error() {
        let repo = MemoryDiaryRepository::new();
        let ctx = context(&["add"]);
        let uc = CreateDiaryUseCase::new(Arc::new(repo.clone()));
        uc.execute(&ctx, input("2024-03-01", "first")).await.unwrap();

        let err = uc
            .execute(&ctx, input("2024-03-01", "second"))
            .await
            .unwrap_err();
        let DiaryError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.get("date"), [DATE_TAKEN.to_string()]);

        // Another user may use the same date.
        let other = context(&["add"]);
        uc.execute(&other, input("2024-03-01", "theirs")).await.unwrap();
    }

    #[tokio::test]
    async fn test_without_grant_is_not_found() {
        let repo = MemoryDiaryRepository::new();
        let ctx = context(&["view", "change"]);
        let uc = CreateDiaryUseCase::new(Arc::new(repo));

        assert!(matches!(uc.prepare(&ctx), Err(DiaryError::NotFound)));
        assert!(matches!(
            uc.execute(&ctx, input("2024-03-01", "x")).await,
            Err(DiaryError::NotFound)
        ));
    }
}
