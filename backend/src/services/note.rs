//! Notes and reminders service

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{Note, NotePriority};
use shared::validation;

/// Note service
#[derive(Clone)]
pub struct NoteService {
    db: PgPool,
}

/// Input for creating or updating a note
#[derive(Debug, Deserialize)]
pub struct NoteInput {
    pub title: String,
    pub content: Option<String>,
    pub priority: Option<NotePriority>,
    pub reminder_date: Option<NaiveDate>,
}

const NOTE_COLUMNS: &str =
    "id, title, content, priority, reminder_date, completed, created_at, updated_at";

impl NoteService {
    /// Create a new NoteService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    fn validate(input: &NoteInput) -> AppResult<()> {
        validation::validate_name(&input.title).map_err(|msg| AppError::Validation {
            field: "title".to_string(),
            message: msg.to_string(),
            message_es: "El título no puede estar vacío".to_string(),
        })?;
        Ok(())
    }

    /// Create a note
    pub async fn create(&self, input: NoteInput) -> AppResult<Note> {
        Self::validate(&input)?;

        let note = sqlx::query_as::<_, Note>(&format!(
            r#"
            INSERT INTO notes (title, content, priority, reminder_date)
            VALUES ($1, $2, $3, $4)
            RETURNING {NOTE_COLUMNS}
            "#
        ))
        .bind(&input.title)
        .bind(&input.content)
        .bind(input.priority.unwrap_or_default())
        .bind(input.reminder_date)
        .fetch_one(&self.db)
        .await?;

        Ok(note)
    }

    /// Update a note
    pub async fn update(&self, note_id: Uuid, input: NoteInput) -> AppResult<Note> {
        Self::validate(&input)?;

        let note = sqlx::query_as::<_, Note>(&format!(
            r#"
            UPDATE notes
            SET title = $1, content = $2, priority = $3, reminder_date = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING {NOTE_COLUMNS}
            "#
        ))
        .bind(&input.title)
        .bind(&input.content)
        .bind(input.priority.unwrap_or_default())
        .bind(input.reminder_date)
        .bind(note_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Note".to_string()))?;

        Ok(note)
    }

    /// Flip the completed flag
    pub async fn toggle_completed(&self, note_id: Uuid) -> AppResult<Note> {
        let note = sqlx::query_as::<_, Note>(&format!(
            r#"
            UPDATE notes
            SET completed = NOT completed, updated_at = NOW()
            WHERE id = $1
            RETURNING {NOTE_COLUMNS}
            "#
        ))
        .bind(note_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Note".to_string()))?;

        Ok(note)
    }

    /// Delete a note
    pub async fn delete(&self, note_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(note_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Note".to_string()));
        }

        Ok(())
    }

    /// List notes: pending first, then by priority and recency
    pub async fn list(&self) -> AppResult<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(&format!(
            r#"
            SELECT {NOTE_COLUMNS}
            FROM notes
            ORDER BY completed ASC, priority ASC, created_at DESC
            "#
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(notes)
    }
}
