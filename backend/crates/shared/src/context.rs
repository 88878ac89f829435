//! Per-request context
//!
//! The session middleware resolves the cookie into a [`RequestContext`]
//! and stores it in the request extensions. Handlers take it as an
//! extractor instead of reading ambient session state.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::id::UserId;

/// Where unauthenticated callers are sent
pub const LOGIN_URL: &str = "/accounts/login";

/// The authenticated identity acting in this request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub user_name: String,
    pub is_superuser: bool,
    /// Granted permission codenames
    pub permissions: BTreeSet<String>,
    /// Names of the departments on the actor's profile
    pub departments: Vec<String>,
}

impl Actor {
    pub fn has_permission(&self, codename: &str) -> bool {
        self.permissions.contains(codename)
    }

    pub fn belongs_to(&self, department: &str) -> bool {
        self.departments.iter().any(|d| d == department)
    }
}

/// Identity plus session state for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub actor: Actor,
    pub session_id: Uuid,
    /// Department name selected as the active role for this session
    pub active_role: Option<String>,
}

impl RequestContext {
    pub fn new(actor: Actor, session_id: Uuid, active_role: Option<String>) -> Self {
        Self {
            actor,
            session_id,
            active_role,
        }
    }
}

/// Rejection for handlers that need a signed-in user
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("Authentication required")]
pub struct NotAuthenticated;

#[cfg(feature = "axum")]
mod extract {
    use axum::extract::{FromRequestParts, OptionalFromRequestParts};
    use axum::http::request::Parts;
    use axum::response::{IntoResponse, Redirect, Response};

    use super::{LOGIN_URL, NotAuthenticated, RequestContext};

    impl IntoResponse for NotAuthenticated {
        fn into_response(self) -> Response {
            Redirect::to(LOGIN_URL).into_response()
        }
    }

    impl<S> FromRequestParts<S> for RequestContext
    where
        S: Send + Sync,
    {
        type Rejection = NotAuthenticated;

        async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
            parts
                .extensions
                .get::<RequestContext>()
                .cloned()
                .ok_or(NotAuthenticated)
        }
    }

    impl<S> OptionalFromRequestParts<S> for RequestContext
    where
        S: Send + Sync,
    {
        type Rejection = std::convert::Infallible;

        async fn from_request_parts(
            parts: &mut Parts,
            _state: &S,
        ) -> Result<Option<Self>, Self::Rejection> {
            Ok(parts.extensions.get::<RequestContext>().cloned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor() -> Actor {
        Actor {
            user_id: UserId::new(),
            user_name: "bob".to_string(),
            is_superuser: false,
            permissions: ["diary.view_diary".to_string()].into_iter().collect(),
            departments: vec!["network".to_string(), "security".to_string()],
        }
    }

    #[test]
    fn test_actor_lookups() {
        let actor = actor();
        assert!(actor.has_permission("diary.view_diary"));
        assert!(!actor.has_permission("diary.add_diary"));
        assert!(actor.belongs_to("security"));
        assert!(!actor.belongs_to("sales"));
    }

    #[cfg(feature = "axum")]
    #[tokio::test]
    async fn test_extractor_rejects_without_context() {
        use axum::extract::FromRequestParts;
        use axum::http::{Request, StatusCode, header};
        use axum::response::IntoResponse;

        let (mut parts, _) = Request::new(()).into_parts();
        let rejection = RequestContext::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], LOGIN_URL);

        let ctx = RequestContext::new(actor(), Uuid::new_v4(), None);
        parts.extensions.insert(ctx.clone());
        let found = RequestContext::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(found, ctx);
    }
}
