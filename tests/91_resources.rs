//! Per-resource behavior against a real Postgres, gated on
//! `TASKAPP_TEST_DATABASE_URL` like the lifecycle test.

mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{create_project, create_task, online_app, path_of, send, signup, unique};

/// Larger than any id a test database hands out
const MISSING_ID: i64 = 999_999_999;

#[tokio::test]
async fn refresh_token_yields_working_pair() -> Result<()> {
    let Some((app, _pool)) = online_app().await? else {
        return Ok(());
    };
    let erika = signup(&app, "erika").await?;

    let res = send(
        &app,
        Method::POST,
        "/api/auth/refreshtoken",
        None,
        Some(json!({ "refreshToken": erika.refresh_token })),
    )
    .await?;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.body["tokenType"], "Bearer");
    let token = res.body["token"].as_str().unwrap().to_string();
    assert!(res.body["refreshToken"].as_str().is_some());

    let res = send(&app, Method::GET, "/api/auth/me", Some(&token), None).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["username"], erika.username.as_str());

    let res = send(&app, Method::GET, "/api/auth/me", Some(&erika.refresh_token), None).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn duplicate_accounts_conflict() -> Result<()> {
    let Some((app, _pool)) = online_app().await? else {
        return Ok(());
    };
    let erika = signup(&app, "erika").await?;

    let res = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "username": erika.username,
            "email": format!("other-{}@example.com", erika.username),
            "password": "password123"
        })),
    )
    .await?;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.body["code"], "CONFLICT");

    let res = send(
        &app,
        Method::POST,
        "/api/users",
        Some(&erika.token),
        Some(json!({
            "username": unique("someone"),
            "email": format!("{}@example.com", erika.username),
            "password": "password123",
            "role": "ROLE_USER"
        })),
    )
    .await?;
    assert_eq!(res.status, StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn user_endpoints() -> Result<()> {
    let Some((app, _pool)) = online_app().await? else {
        return Ok(());
    };
    let admin = signup(&app, "admin").await?;
    let username = unique("operator");
    let body = json!({
        "username": username,
        "email": format!("{}@example.com", username),
        "password": "password123",
        "role": "ROLE_ADMIN"
    });

    let res = send(&app, Method::POST, "/api/users", None, Some(body.clone())).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = send(&app, Method::POST, "/api/users", Some(&admin.token), Some(body)).await?;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    assert_eq!(res.body["role"], "ROLE_ADMIN");
    let id = res.body["id"].as_i64().unwrap();
    let self_path = path_of(&res.body["_links"]["self"]["href"]);

    let res = send(&app, Method::GET, "/api/users", None, None).await?;
    assert_eq!(res.status, StatusCode::OK);
    let listed = res.body["_embedded"]["users"].as_array().cloned().unwrap_or_default();
    assert!(listed.iter().any(|u| u["id"] == id));
    assert!(listed.iter().all(|u| u.get("password").is_none()));

    let res = send(&app, Method::GET, &self_path, None, None).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["username"], username.as_str());

    let res = send(&app, Method::GET, &format!("/api/users/{}", MISSING_ID), None, None).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(
        res.body["message"],
        format!("User not found with id: {}", MISSING_ID).as_str()
    );
    Ok(())
}

#[tokio::test]
async fn project_search_is_case_insensitive_substring() -> Result<()> {
    let Some((app, _pool)) = online_app().await? else {
        return Ok(());
    };
    let erika = signup(&app, "erika").await?;
    let marker = unique("board");
    let project_id = create_project(&app, &erika.token, &format!("Alpha {} Roadmap", marker)).await?;

    let needle = marker.to_uppercase();
    let res = send(&app, Method::GET, &format!("/api/projects?name={}", needle), None, None).await?;
    assert_eq!(res.status, StatusCode::OK);
    let found = res.body["_embedded"]["projects"].as_array().cloned().unwrap_or_default();
    assert_eq!(found.len(), 1, "{}", res.body);
    assert_eq!(found[0]["id"], project_id);
    assert_eq!(
        res.body["_links"]["self"]["href"],
        format!("http://localhost:8080/api/projects?name={}", needle).as_str()
    );

    let res = send(&app, Method::GET, &format!("/api/projects?name={}x", marker), None, None).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.get("_embedded").is_none());
    Ok(())
}

#[tokio::test]
async fn project_tasks_are_filtered() -> Result<()> {
    let Some((app, _pool)) = online_app().await? else {
        return Ok(());
    };
    let erika = signup(&app, "erika").await?;
    let max = signup(&app, "max").await?;

    let res = send(&app, Method::GET, &format!("/api/projects/{}/tasks", MISSING_ID), None, None).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let project_id = create_project(&app, &erika.token, &unique("project")).await?;
    let res = create_task(&app, &erika.token, project_id, "Deploy Backend", Some(max.id)).await?;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    let deploy_id = res.body["id"].as_i64().unwrap();
    let res = create_task(&app, &erika.token, project_id, "Write docs", None).await?;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);

    let base = format!("/api/projects/{}/tasks", project_id);
    let res = send(&app, Method::GET, &base, None, None).await?;
    assert_eq!(res.body["_embedded"]["tasks"].as_array().map(Vec::len), Some(2));

    let res = send(&app, Method::GET, &format!("{}?assignedToUserId={}", base, max.id), None, None).await?;
    let tasks = res.body["_embedded"]["tasks"].as_array().cloned().unwrap_or_default();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], deploy_id);

    let uri = format!("{}?assignedToUserId={}&title=backend", base, max.id);
    let res = send(&app, Method::GET, &uri, None, None).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["_embedded"]["tasks"].as_array().map(Vec::len), Some(1));
    assert_eq!(
        res.body["_links"]["self"]["href"],
        format!("http://localhost:8080{}", uri).as_str()
    );

    let res = send(&app, Method::GET, &format!("{}?title=nothing-like-this", base), None, None).await?;
    assert!(res.body.get("_embedded").is_none());
    Ok(())
}

#[tokio::test]
async fn unknown_assignee_is_not_found() -> Result<()> {
    let Some((app, _pool)) = online_app().await? else {
        return Ok(());
    };
    let erika = signup(&app, "erika").await?;
    let project_id = create_project(&app, &erika.token, &unique("project")).await?;

    let res = create_task(&app, &erika.token, project_id, "Orphaned work", Some(MISSING_ID)).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(
        res.body["message"],
        format!("User not found with id: {}", MISSING_ID).as_str()
    );

    let res = create_task(&app, &erika.token, project_id, "Real work", None).await?;
    let task_id = res.body["id"].as_i64().unwrap();
    let res = send(
        &app,
        Method::PUT,
        &format!("/api/tasks/{}", task_id),
        Some(&erika.token),
        Some(json!({
            "title": "Real work",
            "state": "Open",
            "dueDate": common::future_due_date(),
            "assignedToUserId": MISSING_ID
        })),
    )
    .await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = create_task(&app, &erika.token, MISSING_ID, "Nowhere", None).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn comment_is_scoped_to_its_task() -> Result<()> {
    let Some((app, _pool)) = online_app().await? else {
        return Ok(());
    };
    let erika = signup(&app, "erika").await?;
    let project_id = create_project(&app, &erika.token, &unique("project")).await?;
    let first = create_task(&app, &erika.token, project_id, "First task", None).await?.body["id"]
        .as_i64()
        .unwrap();
    let second = create_task(&app, &erika.token, project_id, "Second task", None).await?.body["id"]
        .as_i64()
        .unwrap();

    let res = send(
        &app,
        Method::POST,
        &format!("/api/tasks/{}/comments", first),
        Some(&erika.token),
        Some(json!({ "content": "Belongs to the first task" })),
    )
    .await?;
    assert_eq!(res.status, StatusCode::CREATED);
    let comment_id = res.body["id"].as_i64().unwrap();

    let res = send(&app, Method::GET, &format!("/api/tasks/{}/comments/{}", first, comment_id), None, None).await?;
    assert_eq!(res.status, StatusCode::OK);

    let wrong = format!("/api/tasks/{}/comments/{}", second, comment_id);
    let res = send(&app, Method::GET, &wrong, None, None).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(
        res.body["message"],
        format!("Comment not found with id {} for task {}", comment_id, second).as_str()
    );

    let res = send(&app, Method::DELETE, &wrong, Some(&erika.token), None).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = send(&app, Method::GET, &format!("/api/tasks/{}/comments", MISSING_ID), None, None).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn deleting_task_removes_its_comments() -> Result<()> {
    let Some((app, pool)) = online_app().await? else {
        return Ok(());
    };
    let erika = signup(&app, "erika").await?;
    let project_id = create_project(&app, &erika.token, &unique("project")).await?;
    let task_id = create_task(&app, &erika.token, project_id, "Short lived", None).await?.body["id"]
        .as_i64()
        .unwrap();

    let res = send(
        &app,
        Method::POST,
        &format!("/api/tasks/{}/comments", task_id),
        Some(&erika.token),
        Some(json!({ "content": "Soon gone" })),
    )
    .await?;
    let comment_id = res.body["id"].as_i64().unwrap();

    let res = send(&app, Method::DELETE, &format!("/api/tasks/{}", task_id), Some(&erika.token), None).await?;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    let (remaining,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments WHERE id = $1")
        .bind(comment_id)
        .fetch_one(&pool)
        .await?;
    assert_eq!(remaining, 0);

    let res = send(&app, Method::GET, &format!("/api/tasks/{}/comments", task_id), None, None).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn unknown_user_and_wrong_password_look_alike() -> Result<()> {
    let Some((app, _pool)) = online_app().await? else {
        return Ok(());
    };
    let erika = signup(&app, "erika").await?;

    let wrong_password = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": erika.username, "password": "not-the-password" })),
    )
    .await?;
    let unknown_user = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": unique("nobody"), "password": "not-the-password" })),
    )
    .await?;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_user.body);
    Ok(())
}
