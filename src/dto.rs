//! # Luma — Request/Response DTOs
//!
//! API contract types shared by the handlers. Field names are camelCase on
//! the wire to match the web client.
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body or query params
//! - `*Response` → serialized to client JSON
//! - Field validation is expressed via `validator` derive macros

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::journal::MonthCalendar;
use crate::models::user::UserProfile;
use crate::services::recommendations::ContentRecommendation;

// ============================================================================
// Auth
// ============================================================================

/// POST /api/register — missing credentials decode as empty strings so the
/// handler can answer with a 400 instead of a body rejection.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 254, message = "Email too long"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    /// Display name. Defaults to the local part of the email.
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: UserProfile,
    pub message: String,
}

/// POST /api/login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub user: UserProfile,
}

// ============================================================================
// Journal views
// ============================================================================

/// GET /api/calendar-data — raw strings so bad input maps to 400, not a
/// query rejection.
#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    pub month: Option<String>,
    pub year: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub month: u32,
    pub year: i32,
    pub data: MonthCalendar,
}

/// GET /api/history
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

// ============================================================================
// Analysis
// ============================================================================

/// Model-reported 0-10 levels arrive as integers, floats or numeric strings.
/// Anything else reads as 0; numbers are rounded and clamped.
fn lenient_level<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(raw
        .filter(|v| v.is_finite())
        .map_or(0, |v| v.round().clamp(0.0, 10.0) as i32))
}

/// POST /api/analyze
#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeRequest {
    pub mood: Option<String>,

    #[validate(range(min = 0, max = 10, message = "Scale must be between 0 and 10"))]
    pub scale: Option<i32>,

    #[serde(default)]
    pub entry: String,
}

/// Analysis of a written entry. Also the shape the LLM is asked to return,
/// hence the defaults on every field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisResponse {
    pub insight: String,
    pub insight_voice: String,
    pub emotion_classification: String,
    #[serde(deserialize_with = "lenient_level")]
    pub anxiety_level: i32,
    pub anxiety_indicators: Vec<String>,
    pub detected_issues: Vec<String>,
    pub suggestions: Vec<String>,
    pub follow_up: String,
    pub content_recommendations: Vec<ContentRecommendation>,
}

impl RegisterRequest {
    pub fn has_credentials(&self) -> bool {
        !self.email.trim().is_empty() && !self.password.is_empty()
    }
}

impl AnalysisResponse {
    /// Shown when the model cannot be reached.
    pub fn unavailable() -> Self {
        Self {
            insight: "I'm having trouble processing your thoughts right now. Please try again in a moment.".into(),
            insight_voice: "I'm having trouble processing your thoughts right now. Please try again in a moment.".into(),
            emotion_classification: "neutral".into(),
            anxiety_level: 0,
            anxiety_indicators: Vec::new(),
            detected_issues: Vec::new(),
            suggestions: vec!["Take a deep breath".into(), "Try again in a moment".into()],
            follow_up: "Would you like to try sharing again?".into(),
            content_recommendations: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalysisUnavailable {
    #[serde(flatten)]
    pub fallback: AnalysisResponse,
    pub error: String,
}

/// POST /api/analyze-voice
#[derive(Debug, Deserialize)]
pub struct VoiceAnalyzeRequest {
    #[serde(default)]
    pub transcript: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VoiceAnalysisResponse {
    pub insight: String,
    pub insight_voice: String,
    pub inferred_mood: String,
    #[serde(deserialize_with = "lenient_level")]
    pub inferred_scale: i32,
    pub emotion_classification: String,
    pub detected_issues: Vec<String>,
    pub suggestions: Vec<String>,
    pub follow_up: String,
    pub content_recommendations: Vec<ContentRecommendation>,
}

/// GET /api/daily-insight
#[derive(Debug, Serialize)]
pub struct DailyInsightResponse {
    pub insight: String,
}

// ============================================================================
// Text-to-speech
// ============================================================================

/// POST /api/tts
#[derive(Debug, Deserialize)]
pub struct TtsRequest {
    #[serde(default)]
    pub text: String,
    pub lang: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_tolerates_missing_fields() {
        let parsed: AnalysisResponse =
            serde_json::from_str(r#"{"insight":"Kamu hebat","anxietyLevel":4}"#).unwrap();
        assert_eq!(parsed.insight, "Kamu hebat");
        assert_eq!(parsed.anxiety_level, 4);
        assert!(parsed.suggestions.is_empty());
    }

    #[test]
    fn test_model_levels_are_rounded_and_clamped() {
        let level = |raw: &str| {
            serde_json::from_str::<AnalysisResponse>(&format!(r#"{{"anxietyLevel":{raw}}}"#))
                .unwrap()
                .anxiety_level
        };
        assert_eq!(level("6.5"), 7);
        assert_eq!(level("42"), 10);
        assert_eq!(level("-3"), 0);
        assert_eq!(level(r#""5""#), 5);
        assert_eq!(level("null"), 0);

        let missing: AnalysisResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.anxiety_level, 0);
    }

    #[test]
    fn test_voice_scale_accepts_float() {
        let parsed: VoiceAnalysisResponse =
            serde_json::from_str(r#"{"inferredMood":"Calm","inferredScale":3.4}"#).unwrap();
        assert_eq!(parsed.inferred_mood, "Calm");
        assert_eq!(parsed.inferred_scale, 3);
    }

    #[test]
    fn test_calendar_response_shape() {
        use crate::journal::{aggregate_month, CalendarMonth, DayBoundary};
        use crate::models::journal_entry::CalendarRow;
        use chrono::{FixedOffset, TimeZone, Utc};

        let rows = [CalendarRow {
            id: uuid::Uuid::new_v4(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap(),
            mood: Some("Calm".into()),
            anxiety_level: Some(2),
            content: Some("jalan pagi".into()),
        }];
        let utc = DayBoundary::Fixed(FixedOffset::east_opt(0).unwrap());
        let response = CalendarResponse {
            month: 3,
            year: 2024,
            data: aggregate_month(&rows, CalendarMonth::new(3, 2024).unwrap(), &utc),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 3);
        assert_eq!(json["month"], 3);
        assert_eq!(json["year"], 2024);
        assert_eq!(json["data"]["5"]["date"], 5);
        assert_eq!(json["data"]["5"]["hasEntry"], true);
        assert_eq!(json["data"]["5"]["entries"][0]["mood"], "Calm");
        assert!(json["data"].get("6").is_none());
    }

    #[test]
    fn test_register_missing_fields_decode_empty() {
        let req: RegisterRequest = serde_json::from_str(r#"{"email":"rani@example.com"}"#).unwrap();
        assert!(req.password.is_empty());
        assert!(!req.has_credentials());
    }

    #[test]
    fn test_unavailable_body_carries_error() {
        let body = AnalysisUnavailable {
            fallback: AnalysisResponse::unavailable(),
            error: "Analysis temporarily unavailable".into(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["emotionClassification"], "neutral");
        assert_eq!(json["error"], "Analysis temporarily unavailable");
        assert_eq!(json["contentRecommendations"], serde_json::json!([]));
    }

    #[test]
    fn test_register_validation() {
        let bad = RegisterRequest {
            email: "not-an-email".into(),
            password: "short".into(),
            name: None,
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_scale_range() {
        let req = AnalyzeRequest {
            mood: Some("Sad".into()),
            scale: Some(11),
            entry: "hari ini berat".into(),
        };
        assert!(req.validate().is_err());
    }
}
