use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    evalia_db::health_check(&pool).await.unwrap();

    let tables = [
        "users",
        "checklists",
        "evaluation_schedules",
        "evaluations",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should exist and start empty");
    }
}

/// The schedule/period uniqueness backstop must exist: it is the storage
/// guarantee behind reconcile idempotence.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_schedule_period_unique_index_exists(pool: PgPool) {
    let count: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM pg_indexes
         WHERE tablename = 'evaluations' AND indexname = 'uq_evaluations_schedule_period'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count.0, 1);
}
