use axum::{extract::State, http::StatusCode, Extension, Json};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{
    jwt::create_access_token,
    middleware::AuthUser,
    password::{hash_password, verify_password},
};
use crate::dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::models::user::{User, UserProfile};
use crate::AppState;

/// Load the account behind a verified token. The token may outlive the row.
pub async fn load_user(db: &sqlx::PgPool, user_id: Uuid) -> AppResult<User> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))
}

/// A concurrent signup can pass the existence check and still lose on the
/// unique index.
fn conflict_on_duplicate(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("User already exists".into())
        }
        _ => AppError::Database(err),
    }
}

fn default_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

pub async fn register(
    State(state): State<AppState>,
    AppJson(body): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    if !body.has_credentials() {
        return Err(AppError::BadRequest("Email and password are required".into()));
    }
    body.validate()?;
    let email = body.email.trim().to_lowercase();

    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&state.db)
        .await?;

    if existing > 0 {
        return Err(AppError::Conflict("User already exists".into()));
    }

    let pwd_hash = hash_password(&body.password)?;
    let name = body
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| default_name(&email));

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, name, password_hash)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&email)
    .bind(&name)
    .bind(&pwd_hash)
    .fetch_one(&state.db)
    .await
    .map_err(conflict_on_duplicate)?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: user.into(),
            message: "User created successfully".into(),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    body.validate().map_err(|_| AppError::Unauthorized)?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(body.email.trim().to_lowercase())
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let password_hash = user.password_hash.as_deref().ok_or(AppError::Unauthorized)?;
    if !verify_password(&body.password, password_hash)? {
        return Err(AppError::Unauthorized);
    }

    let access_token = create_access_token(user.id, &user.email, &state.config)?;
    Ok(Json(LoginResponse {
        access_token,
        expires_in: state.config.jwt_access_ttl_secs,
        user: user.into(),
    }))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<UserProfile>> {
    let user = load_user(&state.db, auth_user.id).await?;
    Ok(Json(user.into()))
}
