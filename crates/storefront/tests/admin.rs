mod common;

use axum::{body::Body, http::Request};
use common::{ADMIN_PASSWORD, ADMIN_USERNAME, TestApp, json_request};
use serde_json::{Value, json};

fn authed(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"));
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn seeded() -> TestApp {
    let app = TestApp::new();
    app.admin.seed(
        "jurisdictions",
        json!({ "id": 1, "name": "British Virgin Islands", "slug": "bvi", "price": 599 }),
    );
    app.admin.seed(
        "jurisdictions",
        json!({ "id": 2, "name": "Seychelles", "slug": "seychelles", "price": 499 }),
    );
    app.admin.seed(
        "applications",
        json!({ "id": 10, "jurisdiction_id": 1, "company_name": "Acme", "status": "submitted" }),
    );
    app.admin.seed(
        "applications",
        json!({ "id": 11, "jurisdiction_id": 1, "company_name": "Globex", "status": "approved" }),
    );
    app
}

#[tokio::test]
async fn login_issues_token_for_configured_operator() {
    let app = TestApp::new();

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/admin/login",
            json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }),
        ))
        .await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["token_type"], "Bearer");
    let token = body["token"].as_str().unwrap().to_string();

    let (status, _) = app
        .send(authed("GET", "/api/admin/jurisdictions", &token, None))
        .await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = TestApp::new();

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/admin/login",
            json!({ "username": ADMIN_USERNAME, "password": "guess" }),
        ))
        .await;

    assert_eq!(status, 401);
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn admin_routes_require_a_token() {
    let app = seeded();

    for (method, uri) in [
        ("GET", "/api/admin/jurisdictions"),
        ("GET", "/api/admin/jurisdictions/1"),
        ("DELETE", "/api/admin/jurisdictions/2"),
    ] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let (status, _) = app.send(request).await;
        assert_eq!(status, 401, "{method} {uri}");
    }

    assert_eq!(app.admin.rows("jurisdictions").len(), 2);
}

#[tokio::test]
async fn list_searches_and_filters_by_status() {
    let app = seeded();
    let token = app.admin_token();

    let (status, body) = app
        .send(authed("GET", "/api/admin/jurisdictions?search=seych", &token, None))
        .await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["slug"], "seychelles");

    let (status, body) = app
        .send(authed("GET", "/api/admin/applications?status=approved", &token, None))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["company_name"], "Globex");

    let (status, _) = app
        .send(authed("GET", "/api/admin/jurisdictions?status=active", &token, None))
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn page_far_past_the_end_is_empty() {
    let app = seeded();
    let token = app.admin_token();

    let (status, body) = app
        .send(authed(
            "GET",
            "/api/admin/orders?page=30000000&page_size=100",
            &token,
            None,
        ))
        .await;

    assert_eq!(status, 200, "{body}");
    assert_eq!(body["items"], json!([]));
}

#[tokio::test]
async fn unknown_entity_is_not_found() {
    let app = seeded();
    let token = app.admin_token();

    let (status, _) = app
        .send(authed("GET", "/api/admin/users", &token, None))
        .await;

    assert_eq!(status, 404);
}

#[tokio::test]
async fn patch_updates_only_allowed_fields() {
    let app = seeded();
    let token = app.admin_token();

    let (status, body) = app
        .send(authed(
            "PATCH",
            "/api/admin/applications/10",
            &token,
            Some(json!({ "status": "approved", "admin_notes": "documents verified" })),
        ))
        .await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["status"], "approved");
    assert_eq!(body["admin_notes"], "documents verified");

    let (status, body) = app
        .send(authed(
            "PATCH",
            "/api/admin/applications/10",
            &token,
            Some(json!({ "jurisdiction_id": 2 })),
        ))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["details"], json!(["jurisdiction_id: field is not editable"]));

    let (status, _) = app
        .send(authed("PATCH", "/api/admin/applications/10", &token, Some(json!({}))))
        .await;
    assert_eq!(status, 400);

    let (status, _) = app
        .send(authed("PATCH", "/api/admin/applications/10", &token, Some(json!([1, 2]))))
        .await;
    assert_eq!(status, 400);

    let (status, _) = app
        .send(authed(
            "PATCH",
            "/api/admin/applications/999",
            &token,
            Some(json!({ "status": "approved" })),
        ))
        .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn catalog_rows_can_be_created_and_fetched() {
    let app = seeded();
    let token = app.admin_token();

    let (status, created) = app
        .send(authed(
            "POST",
            "/api/admin/jurisdictions",
            &token,
            Some(json!({ "name": "Belize", "slug": "belize", "price": 699 })),
        ))
        .await;
    assert_eq!(status, 201, "{created}");
    assert_eq!(created["slug"], "belize");

    let id = created["id"].to_string();
    let (status, fetched) = app
        .send(authed("GET", &format!("/api/admin/jurisdictions/{id}"), &token, None))
        .await;
    assert_eq!(status, 200);
    assert_eq!(fetched["name"], "Belize");

    let (status, _) = app
        .send(authed(
            "POST",
            "/api/admin/applications",
            &token,
            Some(json!({ "company_name": "Initech" })),
        ))
        .await;
    assert_eq!(status, 400);

    let (status, body) = app
        .send(authed(
            "POST",
            "/api/admin/services",
            &token,
            Some(json!({ "name": "Nominee director" })),
        ))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["details"], json!(["slug: field is required"]));
}

#[tokio::test]
async fn referenced_rows_cannot_be_deleted() {
    let app = seeded();
    let token = app.admin_token();

    let (status, body) = app
        .send(authed("DELETE", "/api/admin/jurisdictions/1", &token, None))
        .await;
    assert_eq!(status, 400, "{body}");
    assert_eq!(app.admin.rows("jurisdictions").len(), 2);

    let (status, body) = app
        .send(authed("DELETE", "/api/admin/jurisdictions/2", &token, None))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["deleted"], true);
    assert_eq!(app.admin.rows("jurisdictions").len(), 1);

    let (status, _) = app
        .send(authed("DELETE", "/api/admin/jurisdictions/2", &token, None))
        .await;
    assert_eq!(status, 404);
}
