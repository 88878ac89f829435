//! Accounts Router

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use platform::mail::{AnyMailer, Mailer};

use crate::application::config::AccountsConfig;
use crate::domain::repository::AccountsRepository;
use crate::infra::postgres::PgAccountsRepository;
use crate::presentation::handlers::{self, AccountsAppState};

/// Create the Accounts router with the PostgreSQL repository
pub fn accounts_router(
    repo: PgAccountsRepository,
    mailer: AnyMailer,
    config: Arc<AccountsConfig>,
) -> Router {
    accounts_router_generic(repo, mailer, config)
}

/// Create an Accounts router for any repository and mail transport
///
/// The request-context middleware must be layered on top for the
/// routes that need a signed-in user.
pub fn accounts_router_generic<R, M>(repo: R, mailer: M, config: Arc<AccountsConfig>) -> Router
where
    R: AccountsRepository,
    M: Mailer + Sync + 'static,
{
    let state = AccountsAppState {
        repo: Arc::new(repo),
        mailer: Arc::new(mailer),
        config,
    };

    Router::new()
        .route("/", get(handlers::index::<R, M>))
        .route("/accounts/signup", get(handlers::signup_lobby))
        .route(
            "/accounts/signup/email",
            get(handlers::signup_with_email_form).post(handlers::signup_with_email::<R, M>),
        )
        .route(
            "/accounts/login",
            get(handlers::login_form).post(handlers::login::<R, M>),
        )
        .route("/accounts/logout", post(handlers::logout::<R, M>))
        .route(
            "/accounts/profile",
            get(handlers::profile::<R, M>).post(handlers::profile_change::<R, M>),
        )
        .route("/accounts/set-role/{role}", get(handlers::set_role::<R, M>))
        .route(
            "/accounts/password-change",
            get(handlers::password_change_form).post(handlers::password_change::<R, M>),
        )
        .route(
            "/accounts/password-change/done",
            get(handlers::password_change_done),
        )
        .route(
            "/accounts/password-reset",
            get(handlers::password_reset_form).post(handlers::password_reset::<R, M>),
        )
        .route(
            "/accounts/password-reset/done",
            get(handlers::password_reset_done),
        )
        .route(
            "/accounts/password-reset/confirm/{token}",
            get(handlers::password_reset_confirm_form::<R, M>)
                .post(handlers::password_reset_confirm::<R, M>),
        )
        .route(
            "/accounts/password-reset/complete",
            get(handlers::password_reset_complete),
        )
        .with_state(state)
}
