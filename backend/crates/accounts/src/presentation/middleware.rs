//! Request Context Middleware
//!
//! Resolves the session cookie once per request and stores the
//! resulting `RequestContext` in the request extensions. Requests
//! without a usable session continue anonymously; handlers that need a
//! user reject them through the extractor.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use platform::client::ClientFingerprint;

use crate::application::ResolveContextUseCase;
use crate::application::config::AccountsConfig;
use crate::domain::repository::AccountsRepository;
use crate::error::AccountsError;

/// Middleware state
pub struct RequestContextState<R> {
    pub repo: Arc<R>,
    pub config: Arc<AccountsConfig>,
}

impl<R> Clone for RequestContextState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R> RequestContextState<R> {
    pub fn new(repo: R, config: Arc<AccountsConfig>) -> Self {
        Self {
            repo: Arc::new(repo),
            config,
        }
    }
}

/// Use with `axum::middleware::from_fn_with_state`
pub async fn resolve_request_context<R>(
    State(state): State<RequestContextState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    R: AccountsRepository,
{
    let headers = req.headers();
    let token = platform::cookie::extract_cookie(headers, &state.config.session_cookie_name);

    if let Some(token) = token {
        let fingerprint = ClientFingerprint::from_headers(headers);
        let use_case = ResolveContextUseCase::new(state.repo.clone(), state.config.clone());

        match use_case.execute(&token, &fingerprint.hash).await {
            Ok(ctx) => {
                req.extensions_mut().insert(ctx);
            }
            Err(AccountsError::SessionInvalid | AccountsError::SessionFingerprintMismatch) => {
                tracing::debug!("Session cookie ignored");
            }
            Err(e) => return e.into_response(),
        }
    }

    next.run(req).await
}
