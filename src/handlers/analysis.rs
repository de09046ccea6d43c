use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::dto::{
    AnalysisResponse, AnalysisUnavailable, AnalyzeRequest, DailyInsightResponse,
    VoiceAnalysisResponse, VoiceAnalyzeRequest,
};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::models::journal_entry::NewJournalEntry;
use crate::services::groq::Sampling;
use crate::services::recommendations::recommend;
use crate::AppState;

const PERSONA: &str = "You are Luma, a compassionate digital companion.";

const STYLE: &str = r#"Response Style:
- Use a wide variety of emojis to make it visually engaging.
- Adaptive: if input is short, be curious and encouraging. If long, be deep and reflective.
- Language: Indonesian, casual and warm but smart.

Important guidelines:
- You are NOT a therapist or doctor. Never diagnose.
- If the user expresses severe distress, self-harm, or suicidal thoughts, gently encourage them to speak with a professional."#;

const DAILY_FALLBACK: &str = "Small steps lead to big changes. Keep going!";

fn entry_system_prompt() -> String {
    format!(
        r#"{PERSONA}
Analyze the user's journal entry.

Your tasks:
1. INFER the user's primary emotion (mood).
2. ESTIMATE the intensity/stress level (1-10) based on the content.
3. Provide a warm, supportive insight. Be creative and avoid repetitive phrases.
4. Detect specific issues (insomnia, stress, anxiety, sadness, loneliness).
5. Provide actionable suggestions.

{STYLE}

You MUST respond in valid JSON format with this exact structure:
{{
  "insight": "Your reflection here",
  "insightVoice": "Spoken version of the insight",
  "emotionClassification": "One of: happy, calm, sad, anxious, angry, confused, hopeful, neutral",
  "anxietyLevel": 1-10,
  "anxietyIndicators": ["detected anxiety markers"],
  "detectedIssues": ["issue1", "issue2"],
  "suggestions": ["suggestion1", "suggestion2"],
  "followUp": "Follow up question?"
}}"#
    )
}

fn voice_system_prompt() -> String {
    format!(
        r#"{PERSONA}
Analyze the user's spoken voice transcript.

Your tasks:
1. INFER the user's primary emotion (mood), even from a very short input.
2. ESTIMATE the intensity/stress level (1-10).
3. Provide a warm, supportive insight. Be creative and avoid repetitive phrases.
4. Detect specific issues (insomnia, stress, anxiety, sadness, loneliness).
5. Provide actionable suggestions.

{STYLE}

You MUST respond in valid JSON:
{{
  "insight": "Your reflection here",
  "insightVoice": "Spoken version of the insight",
  "inferredMood": "One of: Happy, Calm, Sad, Anxious, Angry, Confused, Hopeful, Neutral",
  "inferredScale": 1-10,
  "emotionClassification": "simple emotion key (e.g. anxious)",
  "detectedIssues": ["issue1", "issue2"],
  "suggestions": ["suggestion1", "suggestion2"],
  "followUp": "Follow up question?"
}}"#
    )
}

fn entry_user_message(mood: &str, scale: Option<i32>, entry: &str) -> String {
    let scale = scale.map_or_else(|| "not rated".to_string(), |s| s.to_string());
    format!(
        r#"User's initial mood selection: {mood}
User's intensity scale (1-10): {scale}

Journal entry:
"{entry}"

Please analyze this journal entry and provide your response in the specified JSON format. Remember to detect any specific issues mentioned."#
    )
}

/// Store the entry for a signed-in caller. Failures are logged, never surfaced:
/// the caller still gets their analysis.
async fn save_entry(state: &AppState, auth_user: Option<&AuthUser>, entry: impl FnOnce(uuid::Uuid) -> NewJournalEntry) {
    let Some(auth_user) = auth_user else {
        tracing::debug!("Anonymous analysis, entry not saved");
        return;
    };

    match entry(auth_user.id).insert(&state.db).await {
        Ok(id) => tracing::info!(user_id = %auth_user.id, entry_id = %id, "Journal entry saved"),
        Err(e) => tracing::warn!(user_id = %auth_user.id, error = %e, "Failed to save journal entry"),
    }
}

pub async fn analyze(
    State(state): State<AppState>,
    auth_user: Option<Extension<AuthUser>>,
    AppJson(body): AppJson<AnalyzeRequest>,
) -> AppResult<Response> {
    if body.entry.trim().is_empty() {
        return Err(AppError::BadRequest("Journal entry is required".into()));
    }
    body.validate()?;

    let mood = body.mood.clone().unwrap_or_default();
    let user_message = entry_user_message(&mood, body.scale, &body.entry);

    let mut analysis: AnalysisResponse = match state
        .llm
        .complete_json(&entry_system_prompt(), &user_message)
        .await
    {
        Ok(analysis) => analysis,
        Err(e) => {
            tracing::warn!(error = %e, "Entry analysis failed, returning fallback");
            let body = AnalysisUnavailable {
                fallback: AnalysisResponse::unavailable(),
                error: "Analysis temporarily unavailable".into(),
            };
            return Ok((StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response());
        }
    };

    analysis.content_recommendations =
        recommend(&analysis.detected_issues, &analysis.emotion_classification);

    save_entry(&state, auth_user.as_deref(), |user_id| NewJournalEntry {
        user_id,
        mood: body.mood.clone(),
        scale: body.scale,
        content: body.entry.clone(),
        insight: Some(analysis.insight.clone()),
        emotion_classification: Some(analysis.emotion_classification.clone()),
        anxiety_level: Some(analysis.anxiety_level),
        suggestions: analysis.suggestions.clone(),
    })
    .await;

    Ok(Json(analysis).into_response())
}

pub async fn analyze_voice(
    State(state): State<AppState>,
    auth_user: Option<Extension<AuthUser>>,
    AppJson(body): AppJson<VoiceAnalyzeRequest>,
) -> AppResult<Json<VoiceAnalysisResponse>> {
    if body.transcript.trim().is_empty() {
        return Err(AppError::BadRequest("No transcript provided".into()));
    }

    let user_message = format!("Here is the user's spoken transcript:\n\"{}\"", body.transcript);
    let mut analysis: VoiceAnalysisResponse = state
        .llm
        .complete_json(&voice_system_prompt(), &user_message)
        .await
        .map_err(|e| AppError::Internal(e.context("Voice analysis failed")))?;

    analysis.content_recommendations =
        recommend(&analysis.detected_issues, &analysis.emotion_classification);

    save_entry(&state, auth_user.as_deref(), |user_id| NewJournalEntry {
        user_id,
        mood: Some(analysis.inferred_mood.clone()).filter(|m| !m.is_empty()),
        scale: Some(analysis.inferred_scale),
        content: body.transcript.clone(),
        insight: Some(analysis.insight.clone()),
        emotion_classification: Some(analysis.emotion_classification.clone()),
        anxiety_level: Some(analysis.inferred_scale),
        suggestions: analysis.suggestions.clone(),
    })
    .await;

    Ok(Json(analysis))
}

pub async fn daily_insight(State(state): State<AppState>) -> Json<DailyInsightResponse> {
    let system = r#"You are Luma. Generate a SHORT, uplifting, daily insight/tip for the user.
- Language: English.
- Style: Warm, creative, diverse.
- Format: Plain text, max 1 sentence.
- Emojis: Include 1-2 relevant emojis."#;

    let insight = match state
        .llm
        .complete(system, "Give me a unique daily insight for today.", Sampling::DAILY_TIP)
        .await
    {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Daily insight unavailable, using fallback");
            DAILY_FALLBACK.to_string()
        }
    };

    Json(DailyInsightResponse { insight })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_includes_inputs() {
        let msg = entry_user_message("Sad", Some(7), "Aku capek banget");
        assert!(msg.contains("mood selection: Sad"));
        assert!(msg.contains("(1-10): 7"));
        assert!(msg.contains("\"Aku capek banget\""));

        let unrated = entry_user_message("", None, "x");
        assert!(unrated.contains("not rated"));
    }

    #[test]
    fn test_prompts_request_expected_keys() {
        let entry = entry_system_prompt();
        for key in ["insightVoice", "emotionClassification", "anxietyLevel", "detectedIssues", "followUp"] {
            assert!(entry.contains(key), "entry prompt missing {key}");
        }
        let voice = voice_system_prompt();
        assert!(voice.contains("inferredMood"));
        assert!(voice.contains("inferredScale"));
    }
}
