//! List Diaries Use Case

use std::sync::Arc;

use kernel::context::RequestContext;
use kernel::pagination::{Page, Paginator, is_show_all};
use kernel::permission::Action;

use crate::application::authorize;
use crate::application::config::DiaryConfig;
use crate::domain::entities::Diary;
use crate::domain::repository::{DiaryRepository, Window};
use crate::domain::scope::DiaryScope;
use crate::error::DiaryResult;

pub struct DiaryPage {
    pub diaries: Vec<Diary>,
    pub page: Page,
    /// False for `page=all` or when everything fits on one page;
    /// `diaries` is then the whole scope
    pub is_paginated: bool,
}

pub struct ListDiariesUseCase<R>
where
    R: DiaryRepository,
{
    repo: Arc<R>,
    config: Arc<DiaryConfig>,
}

impl<R> ListDiariesUseCase<R>
where
    R: DiaryRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<DiaryConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, ctx: &RequestContext, raw_page: &str) -> DiaryResult<DiaryPage> {
        authorize(&ctx.actor, Action::View)?;

        let scope = DiaryScope::for_session(ctx);
        let count = self.repo.count_diaries(&scope).await?;
        let page = Paginator::new(count, self.config.page_size).get_page(raw_page);
        let is_paginated = !is_show_all(raw_page) && page.has_other_pages();

        let window = is_paginated.then_some(Window {
            offset: page.offset,
            limit: page.limit,
        });
        let diaries = self.repo.list_diaries(&scope, window).await?;

        Ok(DiaryPage {
            diaries,
            page,
            is_paginated,
        })
    }
}
