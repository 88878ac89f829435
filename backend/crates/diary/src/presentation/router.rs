//! Diary Router

use std::sync::Arc;

use axum::{Router, routing::get};

use crate::application::config::DiaryConfig;
use crate::domain::repository::DiaryRepository;
use crate::infra::postgres::PgDiaryRepository;
use crate::presentation::handlers::{self, DiaryAppState};

/// Create the Diary router with the PostgreSQL repository
pub fn diary_router(repo: PgDiaryRepository, config: Arc<DiaryConfig>) -> Router {
    diary_router_generic(repo, config)
}

/// Create a Diary router for any repository
///
/// The request-context middleware must be layered on top; without it
/// every route redirects to the login page.
pub fn diary_router_generic<R>(repo: R, config: Arc<DiaryConfig>) -> Router
where
    R: DiaryRepository + Clone + Sync + 'static,
{
    let state = DiaryAppState {
        repo: Arc::new(repo),
        config,
    };

    Router::new()
        .route("/diary", get(handlers::list::<R>))
        .route(
            "/diary/create",
            get(handlers::create_form::<R>).post(handlers::create::<R>),
        )
        .route(
            "/diary/{id}/update",
            get(handlers::update_form::<R>).post(handlers::update::<R>),
        )
        .route(
            "/diary/{id}/delete",
            get(handlers::delete_confirm::<R>).post(handlers::delete::<R>),
        )
        .with_state(state)
}
