use axum::{routing::get, Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    ctx::BaseParams,
    extract::{Path, Payload},
    state::AppState,
    Error, Result,
};

use super::{handlers, CreateNote, FindNotesResponse, Note, NoteId, NoteResponse, UpdateNote};

#[derive(Debug, Deserialize)]
struct NoteIdPath {
    note_id: String,
}

impl NoteIdPath {
    /// Ids that are not UUIDs cannot name a note, so they are reported as missing.
    fn parse(self) -> Result<NoteId> {
        Uuid::parse_str(&self.note_id).map_err(|_| Error::NotFound(format!("Note '{}' not found", self.note_id)))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/notes", get(find_notes).post(create_note))
        .route("/notes/{note_id}", get(get_note).put(update_note).delete(delete_note))
        .with_state(state)
}

async fn find_notes(base: BaseParams) -> Result<Json<FindNotesResponse>> {
    handlers::find_notes(base).await.map(NoteResponse::success).map(Json)
}

async fn create_note(base: BaseParams, Payload(args): Payload<CreateNote>) -> Result<Json<NoteResponse<Note>>> {
    handlers::create_note(args, base)
        .await
        .map(NoteResponse::success)
        .map(Json)
}

async fn get_note(Path(path): Path<NoteIdPath>, base: BaseParams) -> Result<Json<NoteResponse<Note>>> {
    handlers::get_note(path.parse()?, base)
        .await
        .map(NoteResponse::success)
        .map(Json)
}

async fn update_note(
    Path(path): Path<NoteIdPath>,
    base: BaseParams,
    Payload(args): Payload<UpdateNote>,
) -> Result<Json<NoteResponse<Note>>> {
    handlers::update_note(path.parse()?, args, base)
        .await
        .map(NoteResponse::success)
        .map(Json)
}

async fn delete_note(Path(path): Path<NoteIdPath>, base: BaseParams) -> Result<Json<NoteResponse<()>>> {
    handlers::delete_note(path.parse()?, base)
        .await
        .map(|_| Json(NoteResponse::empty()))
}
