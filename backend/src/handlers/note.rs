//! HTTP handlers for note endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::note::{NoteInput, NoteService};
use crate::AppState;
use shared::models::Note;

/// Create a note
pub async fn create_note(
    State(state): State<AppState>,
    Json(input): Json<NoteInput>,
) -> AppResult<Json<Note>> {
    let service = NoteService::new(state.db);
    let note = service.create(input).await?;
    Ok(Json(note))
}

/// List notes
pub async fn list_notes(State(state): State<AppState>) -> AppResult<Json<Vec<Note>>> {
    let service = NoteService::new(state.db);
    let notes = service.list().await?;
    Ok(Json(notes))
}

/// Update a note
pub async fn update_note(
    State(state): State<AppState>,
    Path(note_id): Path<Uuid>,
    Json(input): Json<NoteInput>,
) -> AppResult<Json<Note>> {
    let service = NoteService::new(state.db);
    let note = service.update(note_id, input).await?;
    Ok(Json(note))
}

/// Toggle a note's completed flag
pub async fn toggle_note(
    State(state): State<AppState>,
    Path(note_id): Path<Uuid>,
) -> AppResult<Json<Note>> {
    let service = NoteService::new(state.db);
    let note = service.toggle_completed(note_id).await?;
    Ok(Json(note))
}

/// Delete a note
pub async fn delete_note(
    State(state): State<AppState>,
    Path(note_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = NoteService::new(state.db);
    service.delete(note_id).await?;
    Ok(Json(()))
}
