//! Router-level tests against the in-memory store
//!
//! A stand-in middleware resolves an `x-session` header into one of the
//! registered request contexts, the way the accounts middleware does for
//! the session cookie.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode, header};
use axum::middleware::{Next, from_fn_with_state};
use axum::response::Response;
use http_body_util::BodyExt;
use kernel::context::{LOGIN_URL, RequestContext};
use serde_json::Value;
use tower::ServiceExt;

use crate::application::tests::{context, seed};
use crate::domain::entities::DATE_TAKEN;
use crate::domain::repository::DiaryRepository;
use crate::domain::scope::DiaryScope;
use crate::presentation::diary_router_generic;
use crate::{DiaryConfig, MemoryDiaryRepository};

type Sessions = Arc<HashMap<String, RequestContext>>;

async fn inject_context(
    State(sessions): State<Sessions>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let ctx = request
        .headers()
        .get("x-session")
        .and_then(|v| v.to_str().ok())
        .and_then(|token| sessions.get(token))
        .cloned();
    if let Some(ctx) = ctx {
        request.extensions_mut().insert(ctx);
    }
    next.run(request).await
}

struct Harness {
    app: Router,
    repo: MemoryDiaryRepository,
    alice: RequestContext,
    bob: RequestContext,
}

/// `alice` holds every diary grant, `bob` only `view`
fn harness() -> Harness {
    let repo = MemoryDiaryRepository::new();
    let alice = context(&["view", "add", "change", "delete"]);
    let bob = context(&["view"]);

    let sessions: Sessions = Arc::new(HashMap::from([
        ("alice".to_string(), alice.clone()),
        ("bob".to_string(), bob.clone()),
    ]));

    let app = diary_router_generic(repo.clone(), Arc::new(DiaryConfig::development()))
        .layer(from_fn_with_state(sessions, inject_context));

    Harness {
        app,
        repo,
        alice,
        bob,
    }
}

impl Harness {
    async fn get(&self, uri: &str, session: Option<&str>) -> Response {
        let mut builder = Request::builder().uri(uri);
        if let Some(session) = session {
            builder = builder.header("x-session", session);
        }
        self.app
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post(&self, uri: &str, form: &str, session: Option<&str>) -> Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(session) = session {
            builder = builder.header("x-session", session);
        }
        self.app
            .clone()
            .oneshot(builder.body(Body::from(form.to_string())).unwrap())
            .await
            .unwrap()
    }
}

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

async fn json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_anonymous_is_redirected_to_login() {
    let h = harness();

    for response in [
        h.get("/diary", None).await,
        h.get("/diary/create", None).await,
        h.post("/diary/create", "date=2024-01-01&daily_record=x", None)
            .await,
    ] {
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), LOGIN_URL);
    }
    let scope = DiaryScope::for_actor(&h.alice.actor);
    assert_eq!(h.repo.count_diaries(&scope).await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_then_list() {
    let h = harness();

    let form = h.get("/diary/create", Some("alice")).await;
    assert_eq!(form.status(), StatusCode::OK);
    let form = json(form).await;
    assert_eq!(form["action"], "/diary/create");
    assert_eq!(form["values"]["daily_check"], "");

    let response = h
        .post(
            "/diary/create",
            "date=2024-03-01&daily_check=yes&daily_record=Rotated+the+VPN+keys&todo=",
            Some("alice"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/diary");

    let body = json(h.get("/diary", Some("alice")).await).await;
    assert_eq!(body["isPaginated"], false);
    assert_eq!(body["page"], Value::Null);
    let diaries = body["diaries"].as_array().unwrap();
    assert_eq!(diaries.len(), 1);
    assert_eq!(diaries[0]["date"], "2024-03-01");
    assert_eq!(diaries[0]["dailyCheck"], "yes");
    assert_eq!(diaries[0]["summary"], "Rotated ..");
    assert_eq!(diaries[0]["todo"], Value::Null);
}

#[tokio::test]
async fn test_invalid_form_echoes_values() {
    let h = harness();

    let response = h
        .post(
            "/diary/create",
            "date=2024-13-01&daily_check=maybe&remark=kept",
            Some("alice"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json(response).await;
    assert_eq!(body["errors"]["date"][0], "Enter a valid date.");
    assert_eq!(body["errors"]["daily_record"][0], "This field is required.");
    assert!(body["errors"]["daily_check"].is_array());
    assert_eq!(body["values"]["remark"], "kept");
    assert_eq!(body["values"]["date"], "2024-13-01");
}

#[tokio::test]
async fn test_duplicate_date_reported_on_date_field() {
    let h = harness();
    seed(&h.repo, &h.alice, 1).await;

    let response = h
        .post(
            "/diary/create",
            "date=2024-01-01&daily_record=again",
            Some("alice"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json(response).await;
    assert_eq!(body["errors"]["date"][0], DATE_TAKEN);
}

#[tokio::test]
async fn test_pagination_and_show_all() {
    let h = harness();
    seed(&h.repo, &h.alice, 12).await;

    let first = json(h.get("/diary", Some("alice")).await).await;
    assert_eq!(first["isPaginated"], true);
    assert_eq!(first["page"]["number"], 1);
    assert_eq!(first["page"]["numPages"], 3);
    assert_eq!(first["page"]["hasNext"], true);
    assert_eq!(first["diaries"].as_array().unwrap().len(), 5);
    assert_eq!(first["diaries"][0]["date"], "2024-01-12");

    let last = json(h.get("/diary?page=7", Some("alice")).await).await;
    assert_eq!(last["page"]["number"], 3);
    assert_eq!(last["diaries"].as_array().unwrap().len(), 2);

    let junk = json(h.get("/diary?page=abc", Some("alice")).await).await;
    assert_eq!(junk["page"]["number"], 1);

    let all = json(h.get("/diary?page=all", Some("alice")).await).await;
    assert_eq!(all["isPaginated"], false);
    assert_eq!(all["diaries"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn test_other_users_diaries_are_not_found() {
    let h = harness();
    let diaries = seed(&h.repo, &h.bob, 1).await;
    let id = diaries[0].diary_id.to_string();

    let listing = json(h.get("/diary", Some("alice")).await).await;
    assert!(listing["diaries"].as_array().unwrap().is_empty());

    let update = h.get(&format!("/diary/{id}/update"), Some("alice")).await;
    assert_eq!(update.status(), StatusCode::NOT_FOUND);

    let delete = h.post(&format!("/diary/{id}/delete"), "", Some("alice")).await;
    assert_eq!(delete.status(), StatusCode::NOT_FOUND);

    assert!(
        h.repo
            .find_diary(&diaries[0].diary_id, &h.bob.actor.user_id)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn test_missing_grant_is_not_found() {
    let h = harness();
    let diaries = seed(&h.repo, &h.bob, 1).await;
    let id = diaries[0].diary_id.to_string();

    assert_eq!(
        h.get("/diary/create", Some("bob")).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        h.get(&format!("/diary/{id}/update"), Some("bob")).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        h.post(&format!("/diary/{id}/delete"), "", Some("bob"))
            .await
            .status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(h.get("/diary", Some("bob")).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_grant_checked_before_body() {
    let h = harness();
    let diaries = seed(&h.repo, &h.bob, 1).await;
    let id = diaries[0].diary_id.to_string();

    let json_post = |uri: String, session: &'static str| {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-session", session)
            .body(Body::from(r#"{"date":"2024-06-01"}"#))
            .unwrap()
    };

    for uri in ["/diary/create".to_string(), format!("/diary/{id}/update")] {
        let response = h.app.clone().oneshot(json_post(uri, "bob")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    let response = h
        .app
        .clone()
        .oneshot(json_post("/diary/create".to_string(), "alice"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let scope = DiaryScope::for_actor(&h.alice.actor);
    assert_eq!(h.repo.count_diaries(&scope).await.unwrap(), 0);
}

#[tokio::test]
async fn test_malformed_id_is_not_found() {
    let h = harness();

    let response = h.get("/diary/not-a-uuid/update", Some("alice")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json(response).await;
    assert_eq!(body["detail"], "Not found.");
}

#[tokio::test]
async fn test_update_prefills_and_saves() {
    let h = harness();
    let diaries = seed(&h.repo, &h.alice, 2).await;
    let id = diaries[0].diary_id.to_string();
    let uri = format!("/diary/{id}/update");

    let form = json(h.get(&uri, Some("alice")).await).await;
    assert_eq!(form["action"], uri);
    assert_eq!(form["values"]["date"], "2024-01-01");
    assert_eq!(form["values"]["daily_check"], "no");

    let clash = h
        .post(&uri, "date=2024-01-02&daily_record=moved", Some("alice"))
        .await;
    assert_eq!(clash.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = h
        .post(&uri, "date=2024-01-01&daily_record=Rewritten", Some("alice"))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let stored = h
        .repo
        .find_diary(&diaries[0].diary_id, &h.alice.actor.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.daily_record, "Rewritten");
}

#[tokio::test]
async fn test_delete_confirmation_does_not_mutate() {
    let h = harness();
    let diaries = seed(&h.repo, &h.alice, 1).await;
    let id = diaries[0].diary_id.to_string();
    let uri = format!("/diary/{id}/delete");

    let confirm = h.get(&uri, Some("alice")).await;
    assert_eq!(confirm.status(), StatusCode::OK);
    let body = json(confirm).await;
    assert_eq!(body["diary"]["id"], id);
    assert_eq!(body["action"], uri);
    assert!(
        h.repo
            .find_diary(&diaries[0].diary_id, &h.alice.actor.user_id)
            .await
            .unwrap()
            .is_some()
    );

    let response = h.post(&uri, "", Some("alice")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/diary");
    assert!(
        h.repo
            .find_diary(&diaries[0].diary_id, &h.alice.actor.user_id)
            .await
            .unwrap()
            .is_none()
    );

    assert_eq!(h.get(&uri, Some("alice")).await.status(), StatusCode::NOT_FOUND);
}
