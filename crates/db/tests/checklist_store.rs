//! Round-trip tests for checklist storage: the sanitized JSONB tree must
//! come back structurally identical, ids included.

use evalia_core::checklist::{sanitize_items, ItemDraft};
use sqlx::PgPool;

use evalia_db::models::user::User;
use evalia_db::repositories::{ChecklistRepo, UserRepo};

async fn seed_admin(pool: &PgPool) -> User {
    UserRepo::create(pool, "admin", "not-a-real-hash", "admin", "Ana", "Lopez", "")
        .await
        .unwrap()
}

fn draft(title: &str, children: Vec<ItemDraft>) -> ItemDraft {
    ItemDraft {
        title: title.to_string(),
        children,
        ..Default::default()
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_checklist_tree_roundtrips(pool: PgPool) {
    let admin = seed_admin(&pool).await;
    let items = sanitize_items(&[draft(
        "Seguridad",
        vec![draft("Usa casco", vec![]), draft("Usa guantes", vec![])],
    )]);

    let created = ChecklistRepo::create(&pool, "Seguridad", "", &items, admin.id)
        .await
        .unwrap();
    assert_eq!(created.items.0, items);

    let fetched = ChecklistRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.items.0, items);
    assert_eq!(fetched.title, "Seguridad");
    assert_eq!(fetched.created_by, Some(admin.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_replaces_whole_tree_and_preserves_ids(pool: PgPool) {
    let admin = seed_admin(&pool).await;
    let items = sanitize_items(&[draft("Pregunta", vec![])]);
    let created = ChecklistRepo::create(&pool, "Original", "", &items, admin.id)
        .await
        .unwrap();

    // Round-trip through drafts the way the editor saves: existing ids kept.
    let json = serde_json::to_value(&created.items.0).unwrap();
    let drafts: Vec<ItemDraft> = serde_json::from_value(json).unwrap();
    let resaved = sanitize_items(&drafts);
    assert_eq!(resaved, items);

    let updated = ChecklistRepo::update(&pool, created.id, "Renombrado", "desc", &resaved)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "Renombrado");
    assert_eq!(updated.items.0[0].id, items[0].id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_checklist_returns_none(pool: PgPool) {
    let updated = ChecklistRepo::update(&pool, 9999, "x", "", &[]).await.unwrap();
    assert!(updated.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_is_newest_first(pool: PgPool) {
    let admin = seed_admin(&pool).await;
    let items = sanitize_items(&[draft("Item", vec![])]);
    ChecklistRepo::create(&pool, "Primero", "", &items, admin.id)
        .await
        .unwrap();
    ChecklistRepo::create(&pool, "Segundo", "", &items, admin.id)
        .await
        .unwrap();

    let listed = ChecklistRepo::list(&pool).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed[0].created_at >= listed[1].created_at);
}
