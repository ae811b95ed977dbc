//! HTTP-level integration tests for checklist authoring endpoints.

mod common;

use axum::http::StatusCode;
use common::{expect_json, get_auth, post_json_auth, put_json_auth, seed_user, token_for};
use sqlx::PgPool;

fn checklist_body() -> serde_json::Value {
    serde_json::json!({
        "title": "Limpieza de cocina",
        "description": "Inspección diaria",
        "items": [
            {
                "id": "sec-1",
                "title": "Área de preparación",
                "hasCheck": false,
                "children": [
                    { "id": "item-1", "title": "Superficies desinfectadas" },
                    { "id": "item-2", "title": "Hora de apertura", "type": "time" }
                ]
            },
            { "id": "item-3", "title": "Observaciones", "fieldType": "text" }
        ]
    })
}

/// Create sanitizes drafts: hasCheck=false becomes a section, untyped items
/// default to rating, and explicit ids survive.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_checklist(pool: PgPool) {
    let admin = seed_user(&pool, "root", "admin").await;
    let token = token_for(&admin);
    let app = common::build_test_app(pool);

    let response = post_json_auth(app, "/api/v1/checklists", &token, checklist_body()).await;
    let json = expect_json(response, StatusCode::CREATED).await;

    let items = json["data"]["items"].as_array().unwrap();
    assert_eq!(items[0]["fieldType"], "section");
    assert_eq!(items[0]["children"][0]["fieldType"], "rating");
    assert_eq!(items[0]["children"][1]["fieldType"], "time");
    assert_eq!(items[0]["children"][0]["id"], "item-1");
    assert_eq!(items[1]["fieldType"], "text");
}

/// A checklist whose items all sanitize away cannot be saved.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_checklist_requires_an_item(pool: PgPool) {
    let admin = seed_user(&pool, "root", "admin").await;
    let token = token_for(&admin);
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "title": "Vacía",
        "items": [ { "title": "   " } ]
    });
    let response = post_json_auth(app, "/api/v1/checklists", &token, body).await;
    let json = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

/// A blank title is rejected before anything touches the database.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_checklist_requires_title(pool: PgPool) {
    let admin = seed_user(&pool, "root", "admin").await;
    let token = token_for(&admin);
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "title": "  ",
        "items": [ { "title": "Puntualidad" } ]
    });
    let response = post_json_auth(app, "/api/v1/checklists", &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Update replaces the whole tree; item ids in the new tree are preserved.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_replaces_tree(pool: PgPool) {
    let admin = seed_user(&pool, "root", "admin").await;
    let token = token_for(&admin);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/checklists", &token, checklist_body()).await;
    let created = expect_json(response, StatusCode::CREATED).await;
    let id = created["data"]["id"].as_i64().unwrap();

    let replacement = serde_json::json!({
        "title": "Limpieza de cocina v2",
        "items": [
            { "id": "item-3", "title": "Observaciones", "fieldType": "text" }
        ]
    });
    let app = common::build_test_app(pool.clone());
    let response =
        put_json_auth(app, &format!("/api/v1/checklists/{id}"), &token, replacement).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["title"], "Limpieza de cocina v2");
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["items"][0]["id"], "item-3");

    // The stored row reflects the replacement.
    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/checklists/{id}"), &token).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 1);
}

/// Updating a missing checklist is a 404.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_checklist(pool: PgPool) {
    let admin = seed_user(&pool, "root", "admin").await;
    let token = token_for(&admin);
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "title": "Fantasma",
        "items": [ { "title": "Puntualidad" } ]
    });
    let response = put_json_auth(app, "/api/v1/checklists/9999", &token, body).await;
    let json = expect_json(response, StatusCode::NOT_FOUND).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

/// The listing is newest first and admin-only.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_checklists_admin_only(pool: PgPool) {
    let admin = seed_user(&pool, "root", "admin").await;
    let eva = seed_user(&pool, "eva", "evaluator").await;
    let token = token_for(&admin);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/checklists", &token, checklist_body()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/checklists", &token).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/checklists", &token_for(&eva)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
