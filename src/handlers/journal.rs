use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Datelike, Utc};

use crate::auth::middleware::AuthUser;
use crate::dto::{CalendarQuery, CalendarResponse, HistoryQuery};
use crate::error::{AppError, AppResult};
use crate::handlers::auth::load_user;
use crate::journal::{aggregate_month, calculate_streak, day::month_fetch_window, CalendarMonth, StreakResult};
use crate::models::journal_entry::{CalendarRow, JournalEntry};
use crate::AppState;

const DEFAULT_HISTORY_LIMIT: i64 = 50;
const MAX_HISTORY_LIMIT: i64 = 200;

pub async fn get_streak(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<StreakResult>> {
    let user = load_user(&state.db, auth_user.id).await?;

    let timestamps = sqlx::query_scalar::<_, DateTime<Utc>>(
        r#"
        SELECT created_at FROM journal_entries
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user.id)
    .fetch_all(&state.db)
    .await?;

    let result = calculate_streak(&timestamps, Utc::now(), &state.config.day_boundary);
    tracing::debug!(user_id = %user.id, streak = result.streak, "Streak calculated");

    Ok(Json(result))
}

/// Parse an optional integer query value, falling back to `default` when the
/// parameter is absent.
fn parse_param(raw: Option<&str>, default: i64) -> AppResult<i64> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(s) => s
            .parse()
            .map_err(|_| AppError::BadRequest("Invalid month or year".into())),
    }
}

fn resolve_month(query: &CalendarQuery, today: chrono::NaiveDate) -> AppResult<CalendarMonth> {
    let month = parse_param(query.month.as_deref(), i64::from(today.month()))?;
    let year = parse_param(query.year.as_deref(), i64::from(today.year()))?;
    Ok(CalendarMonth::new(month, year)?)
}

pub async fn get_calendar_data(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<CalendarQuery>,
) -> AppResult<Json<CalendarResponse>> {
    let days = state.config.day_boundary;
    let target = resolve_month(&query, days.today(Utc::now()))?;

    let user = load_user(&state.db, auth_user.id).await?;

    let (from, to) = month_fetch_window(target.year(), target.month())
        .ok_or_else(|| AppError::BadRequest("Invalid month or year".into()))?;

    let rows = sqlx::query_as::<_, CalendarRow>(
        r#"
        SELECT id, created_at, mood, anxiety_level, content
        FROM journal_entries
        WHERE user_id = $1 AND created_at >= $2 AND created_at < $3
        ORDER BY created_at ASC
        "#,
    )
    .bind(user.id)
    .bind(from)
    .bind(to)
    .fetch_all(&state.db)
    .await?;

    let data = aggregate_month(&rows, target, &days);

    Ok(Json(CalendarResponse {
        month: target.month(),
        year: target.year(),
        data,
    }))
}

pub async fn list_history(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<JournalEntry>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);

    let user = load_user(&state.db, auth_user.id).await?;

    let entries = sqlx::query_as::<_, JournalEntry>(
        r#"
        SELECT * FROM journal_entries
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(user.id)
    .bind(limit)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(entries))
}
