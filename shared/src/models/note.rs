//! Notes and reminders

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Priority of a note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "note_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotePriority {
    Alta,
    #[default]
    Media,
    Baja,
}

impl NotePriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotePriority::Alta => "alta",
            NotePriority::Media => "media",
            NotePriority::Baja => "baja",
        }
    }
}

/// A free-form note, optionally with a reminder date
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub priority: NotePriority,
    pub reminder_date: Option<NaiveDate>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
