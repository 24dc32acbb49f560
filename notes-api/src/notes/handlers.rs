use rusqlite::{params, Row};

use crate::{ctx::BaseParams, db, Error, Result};

use super::{CreateNote, Note, NoteId, UpdateNote};

const NOTE_COLUMNS: &str = "id, title, content, created_by, created_at, updated_at";

impl<'a> TryFrom<&Row<'a>> for Note {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            created_by: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}

fn not_found(note_id: NoteId) -> impl FnOnce(db::Error) -> db::Error {
    move |e| e.not_found_message(format!("Note '{note_id}' not found"))
}

pub async fn find_notes(BaseParams { db, ctx }: BaseParams) -> Result<Vec<Note>> {
    let user_id = ctx.user_id();
    db.call(move |conn| {
        let notes = conn
            .prepare(&format!(
                "SELECT {NOTE_COLUMNS} FROM notes WHERE created_by = ? ORDER BY rowid"
            ))?
            .query_map(params![user_id], |row| Note::try_from(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(notes)
    })
    .await
    .map_err(db::Error::from)
    .map_err(Error::from)
}

pub async fn create_note(CreateNote { title, content }: CreateNote, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    let user_id = ctx.user_id();
    let note = db
        .call(move |conn| {
            conn.query_row(
                &format!("INSERT INTO notes (title, content, created_by) VALUES (?, ?, ?) RETURNING {NOTE_COLUMNS}"),
                params![title, content, user_id],
                |row| Note::try_from(row),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(Error::from)?;

    tracing::debug!(user_id = %user_id, note_id = %note.id, "note created");

    Ok(note)
}

pub async fn get_note(note_id: NoteId, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    let user_id = ctx.user_id();
    db.call(move |conn| {
        let note = conn.query_row(
            &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ? AND created_by = ?"),
            params![note_id, user_id],
            |row| Note::try_from(row),
        )?;
        Ok(note)
    })
    .await
    .map_err(db::Error::from)
    .map_err(not_found(note_id))
    .map_err(Error::from)
}

pub async fn update_note(
    note_id: NoteId,
    UpdateNote { title, content }: UpdateNote,
    BaseParams { db, ctx }: BaseParams,
) -> Result<Note> {
    let user_id = ctx.user_id();
    let note = db
        .call(move |conn| {
            conn.query_row(
                &format!(
                    r#"UPDATE notes SET title = ?, content = ?, updated_at = ?
                    WHERE id = ? AND created_by = ?
                    RETURNING {NOTE_COLUMNS}"#
                ),
                params![title, content, chrono::Utc::now(), note_id, user_id],
                |row| Note::try_from(row),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(not_found(note_id))
        .map_err(Error::from)?;

    tracing::debug!(user_id = %user_id, note_id = %note.id, "note updated");

    Ok(note)
}

pub async fn delete_note(note_id: NoteId, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    let user_id = ctx.user_id();
    let note = db
        .call(move |conn| {
            conn.query_row(
                &format!("DELETE FROM notes WHERE id = ? AND created_by = ? RETURNING {NOTE_COLUMNS}"),
                params![note_id, user_id],
                |row| Note::try_from(row),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(not_found(note_id))
        .map_err(Error::from)?;

    tracing::debug!(user_id = %user_id, note_id = %note.id, "note deleted");

    Ok(note)
}
