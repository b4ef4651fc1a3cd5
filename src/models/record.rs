//! Record model, mood vocabulary and the hydrated "intact" representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::PublicUser;

/// Mood attached to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Great,
    Good,
    Neutral,
    Bad,
    Awful,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Great => "great",
            Mood::Good => "good",
            Mood::Neutral => "neutral",
            Mood::Bad => "bad",
            Mood::Awful => "awful",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "great" => Some(Mood::Great),
            "good" => Some(Mood::Good),
            "neutral" => Some(Mood::Neutral),
            "bad" => Some(Mood::Bad),
            "awful" => Some(Mood::Awful),
            _ => None,
        }
    }
}

/// A financial journal entry. Owned by exactly one user; deletion only ever
/// sets `is_deleted`, so attachments stay referentially valid history.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub note: String,
    pub date: DateTime<Utc>,
    /// 'great', 'good', 'neutral', 'bad', 'awful'
    pub mood: String,
    pub amount: f64,
    pub currency: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record {
    pub fn from_body(user_id: &str, body: &RecordBody) -> Self {
        let now = super::now();
        Self {
            id: super::new_id(),
            user_id: user_id.to_string(),
            title: body.title.clone(),
            note: body.note.clone(),
            date: body.date,
            mood: body.mood.as_str().to_string(),
            amount: body.amount,
            currency: body.currency.clone(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mood_enum(&self) -> Option<Mood> {
        Mood::from_str(&self.mood)
    }

    /// Hydrate with resolved companion identities.
    pub fn into_intact(self, companions: Vec<PublicUser>) -> IntactRecord {
        IntactRecord {
            id: self.id,
            title: self.title,
            note: self.note,
            date: self.date,
            mood: self.mood,
            amount: self.amount,
            currency: self.currency,
            companions,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Request body for creating or updating a record.
///
/// `companion_ids` defaults to empty: omitting it in an update clears all
/// companions. That is a load-bearing contract (replace, not merge).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordBody {
    pub title: String,
    pub note: String,
    pub date: DateTime<Utc>,
    pub mood: Mood,
    pub amount: f64,
    pub currency: String,
    #[serde(default)]
    pub companion_ids: Vec<String>,
}

/// A record together with its resolved companions, as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntactRecord {
    pub id: String,
    pub title: String,
    pub note: String,
    pub date: DateTime<Utc>,
    pub mood: String,
    pub amount: f64,
    pub currency: String,
    pub companions: Vec<PublicUser>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
