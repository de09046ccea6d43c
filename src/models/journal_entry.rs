use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub mood: Option<String>,
    pub scale: Option<i32>,
    pub content: String,
    pub insight: Option<String>,
    pub emotion_classification: Option<String>,
    pub anxiety_level: Option<i32>,
    pub suggestions: sqlx::types::Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

/// Projection used by the calendar view.
#[derive(Debug, Clone, FromRow)]
pub struct CalendarRow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub mood: Option<String>,
    pub anxiety_level: Option<i32>,
    pub content: Option<String>,
}

/// Fields written once an analysis succeeds.
#[derive(Debug, Clone)]
pub struct NewJournalEntry {
    pub user_id: Uuid,
    pub mood: Option<String>,
    pub scale: Option<i32>,
    pub content: String,
    pub insight: Option<String>,
    pub emotion_classification: Option<String>,
    pub anxiety_level: Option<i32>,
    pub suggestions: Vec<String>,
}

impl NewJournalEntry {
    pub async fn insert(&self, db: &sqlx::PgPool) -> Result<Uuid, sqlx::Error> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO journal_entries
                (id, user_id, mood, scale, content, insight, emotion_classification, anxiety_level, suggestions)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(self.user_id)
        .bind(&self.mood)
        .bind(self.scale)
        .bind(&self.content)
        .bind(&self.insight)
        .bind(&self.emotion_classification)
        .bind(self.anxiety_level)
        .bind(sqlx::types::Json(&self.suggestions))
        .fetch_one(db)
        .await
    }
}
