use std::collections::BTreeSet;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::db::MIGRATOR;
use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "luma-api",
        "version": env!("CARGO_PKG_VERSION"),
        "dayBoundary": format!("{:?}", state.config.day_boundary),
    }))
}

/// What the database looked like when readiness was checked.
#[derive(Debug, Default)]
struct SchemaState {
    reachable: bool,
    applied: BTreeSet<i64>,
    journal_table: bool,
}

fn expected_migrations() -> BTreeSet<i64> {
    MIGRATOR
        .iter()
        .filter(|m| !m.migration_type.is_down_migration())
        .map(|m| m.version)
        .collect()
}

async fn inspect_schema(db: &sqlx::PgPool) -> SchemaState {
    let applied = match sqlx::query_scalar::<_, i64>(
        "SELECT version FROM _sqlx_migrations WHERE success = true",
    )
    .fetch_all(db)
    .await
    {
        Ok(versions) => versions.into_iter().collect(),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness: migration table unavailable");
            let reachable = sqlx::query_scalar::<_, i32>("SELECT 1")
                .fetch_one(db)
                .await
                .is_ok();
            return SchemaState {
                reachable,
                ..SchemaState::default()
            };
        }
    };

    let journal_table = sqlx::query_scalar::<_, bool>(
        "SELECT to_regclass('public.journal_entries') IS NOT NULL",
    )
    .fetch_one(db)
    .await
    .unwrap_or(false);

    SchemaState {
        reachable: true,
        applied,
        journal_table,
    }
}

fn readiness(schema: &SchemaState, expected: &BTreeSet<i64>) -> (StatusCode, Json<Value>) {
    let pending: Vec<i64> = expected.difference(&schema.applied).copied().collect();
    let migrations_ok = schema.reachable && pending.is_empty();
    let ready = migrations_ok && schema.journal_table;

    let check = |ok: bool| if ok { "ok" } else { "failed" };
    let body = json!({
        "status": if ready { "ready" } else { "not_ready" },
        "checks": {
            "database": check(schema.reachable),
            "migrations": check(migrations_ok),
            "journalEntries": check(schema.journal_table),
        },
        "pendingMigrations": pending,
    });

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}

pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let schema = inspect_schema(&state.db).await;
    readiness(&schema, &expected_migrations())
}
