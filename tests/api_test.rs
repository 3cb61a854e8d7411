mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use noticeboard::api::{create_app, state::AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app() -> anyhow::Result<Router> {
    let pool = common::test_pool().await?;
    Ok(create_app(AppState::from_pool(pool)))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok((status, value))
}

async fn create_user(app: &Router, name: &str, email: &str, role: &str) -> anyhow::Result<String> {
    let (status, body) = send(
        app,
        "POST",
        "/users",
        Some(json!({"name": name, "email": email, "role": role})),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    Ok(body["id"].as_str().expect("created user id").to_string())
}

async fn create_announcement(
    app: &Router,
    title: &str,
    end_date: &str,
    is_urgent: bool,
    announcer_id: &str,
) -> anyhow::Result<String> {
    let (status, body) = send(
        app,
        "POST",
        "/announcements",
        Some(json!({
            "title": title,
            "body": "details",
            "startDate": "2024-06-01",
            "endDate": end_date,
            "isUrgent": is_urgent,
            "announcerId": announcer_id
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    Ok(body["id"].as_str().expect("created announcement id").to_string())
}

#[tokio::test]
async fn test_user_round_trip_hides_password() -> anyhow::Result<()> {
    let app = app().await?;

    let (status, body) = send(
        &app,
        "POST",
        "/users",
        Some(json!({"name": "Ana", "email": "ana@x.com", "role": "Admin", "password": "s3cret"})),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User created");
    assert_eq!(body["type"], "success");
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", &format!("/users/{}", id), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"id": id, "name": "Ana", "email": "ana@x.com", "role": "Admin"})
    );

    let (status, by_email) = send(&app, "GET", "/users/login/ana@x.com", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_email, body);

    let (status, list) = send(&app, "GET", "/users", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([body]));

    Ok(())
}

#[tokio::test]
async fn test_duplicate_email_returns_400() -> anyhow::Result<()> {
    let app = app().await?;
    create_user(&app, "Ana", "ana@x.com", "Admin").await?;

    let (status, body) = send(
        &app,
        "POST",
        "/users",
        Some(json!({"name": "Imposter", "email": "ana@x.com", "role": "Announcer"})),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"message": "Email already exists", "type": "error"}));

    Ok(())
}

#[tokio::test]
async fn test_missing_required_field_is_a_client_error() -> anyhow::Result<()> {
    let app = app().await?;

    let (status, body) = send(
        &app,
        "POST",
        "/users",
        Some(json!({"name": "Ana", "email": "ana@x.com"})),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "error");
    assert!(body["message"].as_str().unwrap().contains("role"));

    let (status, body) = send(&app, "POST", "/announcements", Some(json!({"body": "no title"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "error");

    Ok(())
}

#[tokio::test]
async fn test_unknown_users_are_not_found() -> anyhow::Result<()> {
    let app = app().await?;
    let missing = uuid::Uuid::new_v4();

    for (method, uri) in [
        ("GET", format!("/users/{}", missing)),
        ("GET", "/users/not-an-id".to_string()),
        ("GET", "/users/login/nobody@x.com".to_string()),
        ("DELETE", format!("/users/{}", missing)),
        ("DELETE", "/users/not-an-id".to_string()),
    ] {
        let (status, body) = send(&app, method, &uri, None).await?;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
        assert_eq!(body, json!({"message": "User not found", "type": "error"}));
    }

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/users/{}", missing),
        Some(json!({"name": "Ghost"})),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_patch_user_rejects_empty_and_absent_bodies() -> anyhow::Result<()> {
    let app = app().await?;
    let id = create_user(&app, "Ana", "ana@x.com", "Admin").await?;
    let uri = format!("/users/{}", id);

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({"favouriteColour": "red"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"message": "No valid fields provided for update", "type": "error"})
    );

    let (status, body) = send(&app, "PATCH", &uri, None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"message": "No data provided", "type": "error"}));

    Ok(())
}

#[tokio::test]
async fn test_patch_user_changes_only_named_fields() -> anyhow::Result<()> {
    let app = app().await?;
    let id = create_user(&app, "Ana", "ana@x.com", "Admin").await?;
    let uri = format!("/users/{}", id);

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({"role": "Announcer"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "User updated", "type": "success"}));

    let (_, user) = send(&app, "GET", &uri, None).await?;
    assert_eq!(
        user,
        json!({"id": id, "name": "Ana", "email": "ana@x.com", "role": "Announcer"})
    );

    Ok(())
}

#[tokio::test]
async fn test_delete_user() -> anyhow::Result<()> {
    let app = app().await?;
    let id = create_user(&app, "Ana", "ana@x.com", "Admin").await?;
    let uri = format!("/users/{}", id);

    let (status, body) = send(&app, "DELETE", &uri, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "User deleted", "type": "success"}));

    let (status, _) = send(&app, "GET", &uri, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_delete_user_with_announcements_is_conflict() -> anyhow::Result<()> {
    let app = app().await?;
    let user_id = create_user(&app, "Ana", "ana@x.com", "Announcer").await?;
    create_announcement(&app, "Notice", "2024-06-10", false, &user_id).await?;

    let (status, body) = send(&app, "DELETE", &format!("/users/{}", user_id), None).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["type"], "error");

    let (status, _) = send(&app, "GET", &format!("/users/{}", user_id), None).await?;
    assert_eq!(status, StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_announcement_list_ordering_and_join() -> anyhow::Result<()> {
    let app = app().await?;
    let ana = create_user(&app, "Ana", "ana@x.com", "Admin").await?;
    let bea = create_user(&app, "Bea", "bea@x.com", "Announcer").await?;

    create_announcement(&app, "routine later", "2024-06-30", false, &ana).await?;
    create_announcement(&app, "urgent later", "2024-06-20", true, &bea).await?;
    create_announcement(&app, "routine sooner", "2024-06-05", false, &bea).await?;
    create_announcement(&app, "urgent sooner", "2024-06-15", true, &ana).await?;

    let (status, list) = send(&app, "GET", "/announcements", None).await?;
    assert_eq!(status, StatusCode::OK);

    let rows = list.as_array().unwrap();
    let titles: Vec<&str> = rows.iter().map(|a| a["title"].as_str().unwrap()).collect();
    assert_eq!(
        titles,
        vec!["urgent sooner", "urgent later", "routine sooner", "routine later"]
    );

    let first = &rows[0];
    assert_eq!(first["announcer"], "Ana");
    assert_eq!(first["announcerId"], ana.as_str());
    assert_eq!(first["isUrgent"], true);
    assert_eq!(first["endDate"], "2024-06-15");
    assert_eq!(first["image"], Value::Null);
    assert_eq!(first["createdAt"], first["updatedAt"]);

    Ok(())
}

#[tokio::test]
async fn test_announcement_get_update_delete() -> anyhow::Result<()> {
    let app = app().await?;
    let ana = create_user(&app, "Ana", "ana@x.com", "Admin").await?;
    let id = create_announcement(&app, "Fire drill", "2024-06-10", false, &ana).await?;
    let uri = format!("/announcements/{}", id);

    let (status, before) = send(&app, "GET", &uri, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(before["title"], "Fire drill");
    assert_eq!(before["announcer"], "Ana");

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({"isUrgent": 1, "image": "map.png"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Announcement updated", "type": "success"}));

    let (_, after) = send(&app, "GET", &uri, None).await?;
    assert_eq!(after["isUrgent"], true);
    assert_eq!(after["image"], "map.png");
    for untouched in ["title", "body", "startDate", "endDate", "announcerId", "createdAt"] {
        assert_eq!(after[untouched], before[untouched], "{} changed", untouched);
    }
    assert!(after["updatedAt"].as_str().unwrap() >= before["updatedAt"].as_str().unwrap());

    let (status, _) = send(&app, "PATCH", &uri, Some(json!({}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "DELETE", &uri, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Announcement deleted", "type": "success"}));

    let (status, body) = send(&app, "DELETE", &uri, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Announcement not found", "type": "error"}));

    let (status, _) = send(&app, "GET", &uri, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_announcement_with_unknown_announcer_is_rejected() -> anyhow::Result<()> {
    let app = app().await?;

    let (status, body) = send(
        &app,
        "POST",
        "/announcements",
        Some(json!({
            "title": "Orphan",
            "body": "nobody posted this",
            "startDate": "2024-06-01",
            "endDate": "2024-06-02",
            "isUrgent": false,
            "announcerId": uuid::Uuid::new_v4()
        })),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"message": "Invalid announcer ID or other constraints violated", "type": "error"})
    );

    let (_, list) = send(&app, "GET", "/announcements", None).await?;
    assert_eq!(list, json!([]));

    Ok(())
}

#[tokio::test]
async fn test_root_and_health() -> anyhow::Result<()> {
    let app = app().await?;

    let (status, body) = send(&app, "GET", "/", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "operational");

    let (status, body) = send(&app, "GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    Ok(())
}
