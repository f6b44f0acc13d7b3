//! Integration tests for the staff admin surface

mod common;

use axum::http::StatusCode;
use common::{unique_email, TestApp};
use recipe_api_backend::repositories::UserRepository;
use recipe_api_backend::services::{UserFlags, UserService};
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_users_listed_for_staff() {
    let app = TestApp::new().await;
    let (admin, token) = app.create_test_user(UserFlags::SUPERUSER).await;
    let (user, _) = app.create_test_user(UserFlags::REGULAR).await;

    let (status, body) = app.get("/api/v1/admin/users", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let row = body
        .as_array()
        .unwrap()
        .iter()
        .find(|row| row["id"] == user.id.to_string())
        .expect("user listed");
    assert_eq!(row["email"], user.email.as_str());
    assert_eq!(row["name"], user.name.as_str());
    assert!(row.get("password").is_none());
    app.cleanup_user(&user).await;
    app.cleanup_user(&admin).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_admin_requires_staff() {
    let app = TestApp::new().await;
    let (user, token) = app.create_test_user(UserFlags::REGULAR).await;

    let (status, body) = app.get("/api/v1/admin/users", Some(&token)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
    app.cleanup_user(&user).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_edit_user_page() {
    let app = TestApp::new().await;
    let (admin, token) = app.create_test_user(UserFlags::SUPERUSER).await;
    let (user, _) = app.create_test_user(UserFlags::REGULAR).await;

    let (status, body) = app
        .get(&format!("/api/v1/admin/users/{}", user.id), Some(&token))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fieldsets"][0]["fields"]["email"], user.email.as_str());
    assert_eq!(body["fieldsets"][1]["title"], "Permissions");
    assert_eq!(body["readonly_fields"], json!(["last_login"]));
    app.cleanup_user(&user).await;
    app.cleanup_user(&admin).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_user_page() {
    let app = TestApp::new().await;
    let (admin, token) = app.create_test_user(UserFlags::SUPERUSER).await;

    let (status, body) = app.get("/api/v1/admin/users/add", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().contains(&json!("password2")));

    let email = unique_email();
    let (status, body) = app
        .post(
            "/api/v1/admin/users",
            Some(&token),
            &json!({
                "email": email,
                "name": "Added",
                "password1": "added123",
                "password2": "added123",
                "is_staff": true,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["fieldsets"][1]["fields"]["is_staff"], true);
    assert_eq!(body["fieldsets"][1]["fields"]["is_active"], true);

    let added = UserRepository::find_by_email(&app.pool, &email)
        .await
        .unwrap()
        .expect("user added");
    app.cleanup_user(&added).await;
    app.cleanup_user(&admin).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_add_user_password_mismatch() {
    let app = TestApp::new().await;
    let (admin, token) = app.create_test_user(UserFlags::SUPERUSER).await;
    let email = unique_email();

    let (status, body) = app
        .post(
            "/api/v1/admin/users",
            Some(&token),
            &json!({"email": email, "password1": "added123", "password2": "added124"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "password2");
    assert!(!UserRepository::email_exists(&app.pool, &email).await.unwrap());
    app.cleanup_user(&admin).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_staff_can_deactivate_user() {
    let app = TestApp::new().await;
    let (admin, token) = app.create_test_user(UserFlags::SUPERUSER).await;
    let (user, user_token) = app.create_test_user(UserFlags::REGULAR).await;

    let (status, body) = app
        .patch(
            &format!("/api/v1/admin/users/{}", user.id),
            Some(&token),
            &json!({"is_active": false}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fieldsets"][1]["fields"]["is_active"], false);

    let (status, _) = app.get("/api/v1/user/me", Some(&user_token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    app.cleanup_user(&user).await;
    app.cleanup_user(&admin).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_superuser() {
    let app = TestApp::new().await;
    let email = unique_email();

    let user = UserService::create_superuser(&app.pool, &email, "test123")
        .await
        .unwrap();

    assert!(user.is_superuser);
    assert!(user.is_staff);
    app.cleanup_user(&user).await;
}
