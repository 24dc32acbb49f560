use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::users::UserId;

pub type NoteId = Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    #[serde(skip)]
    pub created_by: Option<UserId>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Body of both create and update; an update replaces the whole note.
#[derive(Debug, Deserialize, Validate)]
pub struct NoteForm {
    #[validate(length(min = 1))]
    pub title: String,
    pub content: String,
}

pub type CreateNote = NoteForm;
pub type UpdateNote = NoteForm;

#[derive(Debug, Serialize, Deserialize)]
pub struct NoteResponse<T> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> NoteResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success".into(),
            data: Some(data),
        }
    }
}

impl NoteResponse<()> {
    pub fn empty() -> Self {
        Self {
            status: "success".into(),
            data: None,
        }
    }
}

pub type FindNotesResponse = NoteResponse<Vec<Note>>;
