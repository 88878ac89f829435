//! Application Layer
//!
//! Use cases. Each one asks the capability policy before touching the
//! store and answers `NotFound` when the actor lacks the grant.

use kernel::context::Actor;
use kernel::id::DiaryId;
use kernel::permission::{Action, can};

use crate::domain::DIARY;
use crate::error::{DiaryError, DiaryResult};

pub mod config;
pub mod create;
pub mod delete;
pub mod list;
pub mod update;

pub use config::DiaryConfig;
pub use create::CreateDiaryUseCase;
pub use delete::DeleteDiaryUseCase;
pub use list::{DiaryPage, ListDiariesUseCase};
pub use update::UpdateDiaryUseCase;

fn authorize(actor: &Actor, action: Action) -> DiaryResult<()> {
    if can(actor, action, &DIARY) {
        Ok(())
    } else {
        tracing::debug!(user_id = %actor.user_id, %action, "Diary capability missing");
        Err(DiaryError::NotFound)
    }
}

/// Malformed ids name no diary
fn parse_id(raw: &str) -> DiaryResult<DiaryId> {
    raw.parse().map_err(|_| DiaryError::NotFound)
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::{Days, NaiveDate};
    use kernel::context::{Actor, RequestContext};
    use kernel::id::UserId;
    use uuid::Uuid;

    use crate::domain::DIARY;
    use crate::domain::entities::{Diary, DiaryInput};
    use crate::domain::repository::DiaryRepository;
    use crate::infra::memory::MemoryDiaryRepository;

    use super::*;

    /// Context for a fresh user holding the listed diary actions
    pub(crate) fn context(actions: &[&str]) -> RequestContext {
        let permissions = Action::ALL
            .into_iter()
            .filter(|a| actions.contains(&a.as_str()))
            .map(|a| DIARY.codename(a))
            .collect();
        let actor = Actor {
            user_id: UserId::new(),
            user_name: "alice".to_string(),
            is_superuser: false,
            permissions,
            departments: Vec::new(),
        };
        RequestContext::new(actor, Uuid::new_v4(), None)
    }

    pub(crate) fn input(date: &str, record: &str) -> DiaryInput {
        DiaryInput {
            date: date.to_string(),
            daily_record: record.to_string(),
            ..Default::default()
        }
    }

    /// `count` diaries on consecutive days from 2024-01-01
    pub(crate) async fn seed(
        repo: &MemoryDiaryRepository,
        ctx: &RequestContext,
        count: u64,
    ) -> Vec<Diary> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut diaries = Vec::new();
        for n in 0..count {
            let date = start.checked_add_days(Days::new(n)).unwrap();
            let fields = input(&date.to_string(), &format!("Day {n}"))
                .validate()
                .unwrap();
            let diary = Diary::new(ctx.actor.user_id, fields);
            repo.create_diary(&diary).await.unwrap();
            diaries.push(diary);
        }
        diaries
    }
}
