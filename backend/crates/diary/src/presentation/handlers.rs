//! HTTP Handlers
//!
//! Every route needs a signed-in user; the `RequestContext` extractor
//! redirects anonymous callers to the login page.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Form, FromRequest, Path, Query, Request, State};
use axum::response::{IntoResponse, Redirect, Response};
use kernel::context::RequestContext;
use kernel::error::form::InvalidForm;

use crate::application::config::DiaryConfig;
use crate::application::{
    CreateDiaryUseCase, DeleteDiaryUseCase, ListDiariesUseCase, UpdateDiaryUseCase,
};
use crate::domain::repository::DiaryRepository;
use crate::domain::value_objects::DailyCheck;
use crate::error::{DiaryError, DiaryResult};
use crate::presentation::dto::{
    DeleteConfirmation, DiaryForm, DiaryFormResponse, DiaryListResponse, DiaryResponse,
    ListQuery, PageInfo,
};

pub const DIARY_LIST_URL: &str = "/diary";
pub const DIARY_CREATE_URL: &str = "/diary/create";

fn update_url(id: &str) -> String {
    format!("/diary/{id}/update")
}

fn delete_url(id: &str) -> String {
    format!("/diary/{id}/delete")
}

/// Shared state for diary handlers
pub struct DiaryAppState<R> {
    pub repo: Arc<R>,
    pub config: Arc<DiaryConfig>,
}

impl<R> Clone for DiaryAppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

fn back_to_list() -> Response {
    Redirect::to(DIARY_LIST_URL).into_response()
}

/// 303 on success, 422 echoing the form on validation failure
fn submitted(result: DiaryResult<()>, form: DiaryForm) -> DiaryResult<Response> {
    match result {
        Ok(()) => Ok(back_to_list()),
        Err(DiaryError::Validation(errors)) => Ok(InvalidForm::new(errors, form).into_response()),
        Err(e) => Err(e),
    }
}

/// Decode the form body once the actor has passed the capability check
async fn read_form(request: Request) -> Result<DiaryForm, Response> {
    Form::<DiaryForm>::from_request(request, &())
        .await
        .map(|Form(form)| form)
        .map_err(IntoResponse::into_response)
}

/// GET /diary
pub async fn list<R>(
    State(state): State<DiaryAppState<R>>,
    ctx: RequestContext,
    Query(query): Query<ListQuery>,
) -> DiaryResult<Json<DiaryListResponse>>
where
    R: DiaryRepository + Sync + 'static,
{
    let use_case = ListDiariesUseCase::new(state.repo.clone(), state.config.clone());
    let raw_page = query.page.unwrap_or_default();
    let listing = use_case.execute(&ctx, &raw_page).await?;

    let page = listing.is_paginated.then(|| PageInfo {
        number: listing.page.number,
        num_pages: listing.page.num_pages,
        count: listing.page.count,
        has_next: listing.page.has_next(),
        has_previous: listing.page.has_previous(),
    });

    Ok(Json(DiaryListResponse {
        diaries: listing.diaries.iter().map(DiaryResponse::from).collect(),
        is_paginated: listing.is_paginated,
        page,
    }))
}

/// GET /diary/create
pub async fn create_form<R>(
    State(state): State<DiaryAppState<R>>,
    ctx: RequestContext,
) -> DiaryResult<Json<DiaryFormResponse>>
where
    R: DiaryRepository + Sync + 'static,
{
    CreateDiaryUseCase::new(state.repo.clone()).prepare(&ctx)?;

    Ok(Json(DiaryFormResponse {
        action: DIARY_CREATE_URL.to_string(),
        values: DiaryForm::default(),
        daily_check_choices: DailyCheck::CHOICES,
    }))
}

/// POST /diary/create
pub async fn create<R>(
    State(state): State<DiaryAppState<R>>,
    ctx: RequestContext,
    request: Request,
) -> DiaryResult<Response>
where
    R: DiaryRepository + Sync + 'static,
{
    let use_case = CreateDiaryUseCase::new(state.repo.clone());
    use_case.prepare(&ctx)?;
    let form = match read_form(request).await {
        Ok(form) => form,
        Err(rejection) => return Ok(rejection),
    };

    let result = use_case.execute(&ctx, form.to_input()).await.map(|_| ());
    submitted(result, form)
}

/// GET /diary/{id}/update
pub async fn update_form<R>(
    State(state): State<DiaryAppState<R>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> DiaryResult<Json<DiaryFormResponse>>
where
    R: DiaryRepository + Sync + 'static,
{
    let diary = UpdateDiaryUseCase::new(state.repo.clone())
        .load(&ctx, &id)
        .await?;

    Ok(Json(DiaryFormResponse {
        action: update_url(&diary.diary_id.to_string()),
        values: DiaryForm::from(&diary),
        daily_check_choices: DailyCheck::CHOICES,
    }))
}

/// POST /diary/{id}/update
pub async fn update<R>(
    State(state): State<DiaryAppState<R>>,
    ctx: RequestContext,
    Path(id): Path<String>,
    request: Request,
) -> DiaryResult<Response>
where
    R: DiaryRepository + Sync + 'static,
{
    let use_case = UpdateDiaryUseCase::new(state.repo.clone());
    use_case.prepare(&ctx)?;
    let form = match read_form(request).await {
        Ok(form) => form,
        Err(rejection) => return Ok(rejection),
    };

    let result = use_case
        .execute(&ctx, &id, form.to_input())
        .await
        .map(|_| ());
    submitted(result, form)
}

/// GET /diary/{id}/delete
pub async fn delete_confirm<R>(
    State(state): State<DiaryAppState<R>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> DiaryResult<Json<DeleteConfirmation>>
where
    R: DiaryRepository + Sync + 'static,
{
    let diary = DeleteDiaryUseCase::new(state.repo.clone())
        .confirm(&ctx, &id)
        .await?;

    Ok(Json(DeleteConfirmation {
        action: delete_url(&diary.diary_id.to_string()),
        diary: DiaryResponse::from(&diary),
    }))
}

/// POST /diary/{id}/delete
pub async fn delete<R>(
    State(state): State<DiaryAppState<R>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> DiaryResult<Response>
where
    R: DiaryRepository + Sync + 'static,
{
    DeleteDiaryUseCase::new(state.repo.clone())
        .execute(&ctx, &id)
        .await?;
    Ok(back_to_list())
}
