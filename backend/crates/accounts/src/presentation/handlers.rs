//! HTTP Handlers

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::Json;
use axum::extract::{ConnectInfo, Form, FromRequestParts, Path, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{IntoResponse, Redirect, Response};
use kernel::context::{LOGIN_URL, RequestContext};
use kernel::error::fields::{FieldErrors, NON_FIELD_ERRORS};
use kernel::error::form::InvalidForm;
use platform::client::{ClientFingerprint, extract_client_ip};
use platform::mail::Mailer;

use crate::application::config::AccountsConfig;
use crate::application::profile_change::EMAIL_HELP;
use crate::application::{
    PasswordChangeInput, PasswordChangeUseCase, PasswordResetConfirmInput, PasswordResetUseCase,
    ProfileChangeInput,
    ProfileChangeUseCase, ProfileView, RoleSelection, SetRoleUseCase, SignInInput,
    SignInUseCase, SignOutUseCase, SignUpWithEmailInput, SignUpWithEmailUseCase,
};
use crate::application::password_reset::CONFIRM_URL_PREFIX;
use crate::application::set_role::NO_ACCESS_TO_ROLE;
use crate::domain::repository::AccountsRepository;
use crate::error::{AccountsError, AccountsResult};
use crate::presentation::dto::{
    FieldDescription, FormDescription, IndexResponse, LoginForm, LoginValues, NoticeResponse,
    PasswordChangeForm, PasswordResetConfirmForm, PasswordResetForm, ProfileForm, SignUpForm,
    SignUpMethod,
};
use crate::presentation::flash::{self, FlashMessage};

pub const SIGNUP_EMAIL_URL: &str = "/accounts/signup/email";
pub const PROFILE_URL: &str = "/accounts/profile";
pub const PASSWORD_CHANGE_URL: &str = "/accounts/password-change";
pub const PASSWORD_CHANGE_DONE_URL: &str = "/accounts/password-change/done";
pub const PASSWORD_RESET_URL: &str = "/accounts/password-reset";
pub const PASSWORD_RESET_DONE_URL: &str = "/accounts/password-reset/done";
pub const PASSWORD_RESET_COMPLETE_URL: &str = "/accounts/password-reset/complete";

/// Shared state for accounts handlers
pub struct AccountsAppState<R, M> {
    pub repo: Arc<R>,
    pub mailer: Arc<M>,
    pub config: Arc<AccountsConfig>,
}

impl<R, M> Clone for AccountsAppState<R, M> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            mailer: self.mailer.clone(),
            config: self.config.clone(),
        }
    }
}

/// Client address: first X-Forwarded-For hop, else the peer address
/// when the server was started with connect info
pub struct ClientAddr(pub Option<IpAddr>);

impl<S> FromRequestParts<S> for ClientAddr
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());
        Ok(ClientAddr(extract_client_ip(&parts.headers, peer)))
    }
}

fn see_other(location: &str) -> Response {
    Redirect::to(location).into_response()
}

fn with_cookie(mut response: Response, cookie: Option<HeaderValue>) -> Response {
    if let Some(cookie) = cookie {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}

// ============================================================================
// Index
// ============================================================================

/// GET /
pub async fn index<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    ctx: Option<RequestContext>,
    headers: HeaderMap,
) -> Response
where
    R: AccountsRepository,
    M: Mailer + Sync + 'static,
{
    let flash_cookie = state.config.flash_cookie();
    let pending = platform::cookie::extract_cookie(&headers, &flash_cookie.name);
    let messages = pending
        .as_deref()
        .map(|cookie| flash::decode(&state.config.session_secret, cookie))
        .unwrap_or_default();

    let body = match ctx {
        Some(ctx) => IndexResponse {
            authenticated: true,
            user_name: Some(ctx.actor.user_name),
            departments: ctx.actor.departments,
            active_role: ctx.active_role,
            messages,
        },
        None => IndexResponse {
            authenticated: false,
            user_name: None,
            departments: Vec::new(),
            active_role: None,
            messages,
        },
    };

    let response = Json(body).into_response();
    if pending.is_some() {
        with_cookie(response, flash_cookie.delete_header())
    } else {
        response
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// GET /accounts/signup
pub async fn signup_lobby() -> Json<Vec<SignUpMethod>> {
    Json(vec![SignUpMethod {
        name: "email",
        url: SIGNUP_EMAIL_URL,
    }])
}

/// GET /accounts/signup/email
pub async fn signup_with_email_form() -> Json<FormDescription> {
    Json(FormDescription {
        action: SIGNUP_EMAIL_URL.to_string(),
        fields: vec![
            FieldDescription::required("username"),
            FieldDescription::required("email"),
            FieldDescription::optional("first_name"),
            FieldDescription::optional("last_name"),
        ],
    })
}

/// POST /accounts/signup/email
pub async fn signup_with_email<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Form(form): Form<SignUpForm>,
) -> AccountsResult<Response>
where
    R: AccountsRepository,
    M: Mailer + Sync + 'static,
{
    let use_case = SignUpWithEmailUseCase::new(
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    let input = SignUpWithEmailInput {
        user_name: form.username.clone(),
        email: form.email.clone(),
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
    };

    match use_case.execute(input).await {
        Ok(_) => Ok(see_other(PASSWORD_RESET_DONE_URL)),
        Err(AccountsError::Validation(errors)) => {
            Ok(InvalidForm::new(errors, form).into_response())
        }
        Err(e) => Err(e),
    }
}

// ============================================================================
// Login / Logout
// ============================================================================

/// GET /accounts/login
pub async fn login_form() -> Json<FormDescription> {
    Json(FormDescription {
        action: LOGIN_URL.to_string(),
        fields: vec![
            FieldDescription::required("username"),
            FieldDescription::required("password"),
            FieldDescription::optional("remember_me"),
        ],
    })
}

/// POST /accounts/login
pub async fn login<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    headers: HeaderMap,
    ClientAddr(client_ip): ClientAddr,
    Form(form): Form<LoginForm>,
) -> AccountsResult<Response>
where
    R: AccountsRepository,
    M: Mailer + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let remember_me = form.remember_me();
    let values = LoginValues {
        username: form.username.clone(),
    };
    let input = SignInInput {
        user_name: form.username,
        password: form.password,
        remember_me,
    };

    let fingerprint = ClientFingerprint::from_headers(&headers);
    match use_case
        .execute(input, fingerprint, client_ip.map(|ip| ip.to_string()))
        .await
    {
        Ok(output) => {
            let cookie = state
                .config
                .session_cookie(remember_me)
                .set_header(&output.session_token);
            Ok(with_cookie(see_other("/"), cookie))
        }
        Err(e @ (AccountsError::InvalidCredentials | AccountsError::AccountDisabled)) => {
            tracing::debug!(error = %e, "Login rejected");
            let errors = FieldErrors::new().with(NON_FIELD_ERRORS, e.to_string());
            Ok(InvalidForm::new(errors, values).into_response())
        }
        Err(e) => Err(e),
    }
}

/// POST /accounts/logout
pub async fn logout<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    headers: HeaderMap,
) -> Response
where
    R: AccountsRepository,
    M: Mailer + Sync + 'static,
{
    let session_cookie = state.config.session_cookie(false);

    if let Some(token) = platform::cookie::extract_cookie(&headers, &session_cookie.name) {
        let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
        // The cookie is cleared either way.
        if let Err(e) = use_case.execute(&token).await {
            tracing::debug!(error = %e, "Sign out without a live session");
        }
    }

    with_cookie(see_other(LOGIN_URL), session_cookie.delete_header())
}

// ============================================================================
// Profile
// ============================================================================

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(flatten)]
    profile: ProfileView,
    email_help: &'static str,
}

/// GET /accounts/profile
pub async fn profile<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    ctx: RequestContext,
) -> AccountsResult<Json<ProfileResponse>>
where
    R: AccountsRepository,
    M: Mailer + Sync + 'static,
{
    let use_case = ProfileChangeUseCase::new(state.repo.clone());
    let profile = use_case.view(&ctx.actor.user_id).await?;

    Ok(Json(ProfileResponse {
        profile,
        email_help: EMAIL_HELP,
    }))
}

/// POST /accounts/profile
pub async fn profile_change<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    ctx: RequestContext,
    Form(form): Form<ProfileForm>,
) -> AccountsResult<Response>
where
    R: AccountsRepository,
    M: Mailer + Sync + 'static,
{
    let use_case = ProfileChangeUseCase::new(state.repo.clone());

    let input = ProfileChangeInput {
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        email: form.email.clone(),
        phone_number: form.phone_number.clone(),
    };

    match use_case.execute(&ctx.actor.user_id, input).await {
        Ok(_) => Ok(see_other(PROFILE_URL)),
        Err(AccountsError::Validation(errors)) => {
            Ok(InvalidForm::new(errors, form).into_response())
        }
        Err(e) => Err(e),
    }
}

// ============================================================================
// Role Selector
// ============================================================================

/// GET /accounts/set-role/{role}
pub async fn set_role<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    ctx: RequestContext,
    Path(role): Path<String>,
    headers: HeaderMap,
) -> AccountsResult<Response>
where
    R: AccountsRepository,
    M: Mailer + Sync + 'static,
{
    let use_case = SetRoleUseCase::new(state.repo.clone());

    match use_case.execute(&ctx, &role).await? {
        RoleSelection::Accepted => {
            let back = headers
                .get(header::REFERER)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .unwrap_or("/");
            Ok(see_other(back))
        }
        RoleSelection::Denied => {
            let value = flash::encode(
                &state.config.session_secret,
                &[FlashMessage::error(NO_ACCESS_TO_ROLE)],
            );
            let cookie = state.config.flash_cookie().set_header(&value);
            Ok(with_cookie(see_other("/"), cookie))
        }
    }
}

// ============================================================================
// Password Change
// ============================================================================

/// GET /accounts/password-change
pub async fn password_change_form(_ctx: RequestContext) -> Json<FormDescription> {
    Json(FormDescription {
        action: PASSWORD_CHANGE_URL.to_string(),
        fields: vec![
            FieldDescription::required("old_password"),
            FieldDescription::required("new_password1"),
            FieldDescription::required("new_password2"),
        ],
    })
}

/// POST /accounts/password-change
pub async fn password_change<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    ctx: RequestContext,
    Form(form): Form<PasswordChangeForm>,
) -> AccountsResult<Response>
where
    R: AccountsRepository,
    M: Mailer + Sync + 'static,
{
    let use_case = PasswordChangeUseCase::new(state.repo.clone(), state.config.clone());

    let input = PasswordChangeInput {
        old_password: form.old_password,
        new_password1: form.new_password1,
        new_password2: form.new_password2,
    };

    match use_case.execute(&ctx.actor.user_id, input).await {
        Ok(()) => Ok(see_other(PASSWORD_CHANGE_DONE_URL)),
        Err(AccountsError::Validation(errors)) => {
            Ok(InvalidForm::new(errors, serde_json::json!({})).into_response())
        }
        Err(e) => Err(e),
    }
}

/// GET /accounts/password-change/done
pub async fn password_change_done(_ctx: RequestContext) -> Json<NoticeResponse> {
    Json(NoticeResponse {
        message: "Your password was changed.",
    })
}

// ============================================================================
// Password Reset
// ============================================================================

/// GET /accounts/password-reset
pub async fn password_reset_form() -> Json<FormDescription> {
    Json(FormDescription {
        action: PASSWORD_RESET_URL.to_string(),
        fields: vec![FieldDescription::required("email")],
    })
}

/// POST /accounts/password-reset
pub async fn password_reset<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Form(form): Form<PasswordResetForm>,
) -> AccountsResult<Response>
where
    R: AccountsRepository,
    M: Mailer + Sync + 'static,
{
    match reset_use_case(&state).request(&form.email).await {
        Ok(()) => Ok(see_other(PASSWORD_RESET_DONE_URL)),
        Err(AccountsError::Validation(errors)) => {
            Ok(InvalidForm::new(errors, form).into_response())
        }
        Err(e) => Err(e),
    }
}

/// GET /accounts/password-reset/done
pub async fn password_reset_done() -> Json<NoticeResponse> {
    Json(NoticeResponse {
        message: "We've emailed you. You should receive the message shortly.",
    })
}

/// GET /accounts/password-reset/confirm/{token}
pub async fn password_reset_confirm_form<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Path(token): Path<String>,
) -> AccountsResult<Response>
where
    R: AccountsRepository,
    M: Mailer + Sync + 'static,
{
    match reset_use_case(&state).check(&token).await {
        Ok(_) => Ok(Json(FormDescription {
            action: format!("{CONFIRM_URL_PREFIX}{token}"),
            fields: vec![
                FieldDescription::required("new_password1"),
                FieldDescription::required("new_password2"),
            ],
        })
        .into_response()),
        Err(AccountsError::Validation(errors)) => {
            Ok(InvalidForm::new(errors, serde_json::json!({})).into_response())
        }
        Err(e) => Err(e),
    }
}

/// POST /accounts/password-reset/confirm/{token}
pub async fn password_reset_confirm<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Path(token): Path<String>,
    Form(form): Form<PasswordResetConfirmForm>,
) -> AccountsResult<Response>
where
    R: AccountsRepository,
    M: Mailer + Sync + 'static,
{
    let input = PasswordResetConfirmInput {
        token,
        new_password1: form.new_password1,
        new_password2: form.new_password2,
    };

    match reset_use_case(&state).confirm(input).await {
        Ok(()) => Ok(see_other(PASSWORD_RESET_COMPLETE_URL)),
        Err(AccountsError::Validation(errors)) => {
            Ok(InvalidForm::new(errors, serde_json::json!({})).into_response())
        }
        Err(e) => Err(e),
    }
}

/// GET /accounts/password-reset/complete
pub async fn password_reset_complete() -> Json<NoticeResponse> {
    Json(NoticeResponse {
        message: "Your password has been set. You may go ahead and log in now.",
    })
}

fn reset_use_case<R, M>(state: &AccountsAppState<R, M>) -> PasswordResetUseCase<R, M>
where
    R: AccountsRepository,
    M: Mailer + Sync + 'static,
{
    PasswordResetUseCase::new(
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    )
}
