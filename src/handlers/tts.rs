use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::dto::TtsRequest;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::services::tts::DEFAULT_LANG;
use crate::AppState;

pub async fn speak(State(state): State<AppState>, AppJson(body): AppJson<TtsRequest>) -> AppResult<Response> {
    if body.text.trim().is_empty() {
        return Err(AppError::BadRequest("Text is required".into()));
    }
    let lang = body.lang.as_deref().unwrap_or(DEFAULT_LANG);

    let audio = state
        .tts
        .synthesize(&body.text, lang)
        .await
        .map_err(|e| AppError::Internal(e.context("Text-to-speech failed")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "audio/mpeg".to_string()),
            (header::CONTENT_LENGTH, audio.len().to_string()),
        ],
        audio,
    )
        .into_response())
}
