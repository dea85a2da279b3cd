//! Note CRUD routes.
//!
//! - POST /create - Create a note and file it in a folder
//! - GET /get/{id} - List the caller's notes in a folder
//! - GET /view/{id} - Fetch one of the caller's notes, or `null`
//! - PUT /update - Set title and content, answering with the previous note
//! - DELETE /delete - Unfile and delete a note
//!
//! Every route authenticates through [`CurrentUser`] before the body is
//! decoded, so a malformed body from an unknown user is still a 400.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};

use notes_core::{DeleteResult, FolderRef, Note, NoteId};
use notes_store::NoteUpdate;

use crate::error::{ApiError, ApiResult};
use crate::extract::CurrentUser;
use crate::service::NewNote;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for POST /create.
#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    pub visibility: String,
    /// Folder id, or `"root"` for the caller's root folder.
    pub folder: FolderRef,
}

impl From<CreateNoteRequest> for NewNote {
    fn from(request: CreateNoteRequest) -> Self {
        Self {
            title: request.title,
            visibility: request.visibility,
            folder: request.folder,
        }
    }
}

/// Request body for PUT /update.
#[derive(Debug, Deserialize)]
pub struct UpdateNoteRequest {
    pub id: NoteId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Response for PUT /update.
#[derive(Debug, Serialize)]
pub struct UpdateNoteResponse {
    /// The note as it was before the update; `null` when nothing matched.
    pub prev: Option<Note>,
}

/// Request body for DELETE /delete.
#[derive(Debug, Deserialize)]
pub struct DeleteNoteRequest {
    pub id: NoteId,
    pub folder: FolderRef,
}

/// Response for DELETE /delete.
#[derive(Debug, Serialize)]
pub struct DeleteNoteResponse {
    pub reason: String,
    pub n: u64,
}

impl From<DeleteResult> for DeleteNoteResponse {
    fn from(result: DeleteResult) -> Self {
        Self {
            reason: format!("Success! {} documents deleted", result.deleted_count),
            n: result.deleted_count,
        }
    }
}

/// Unwrap a JSON body, reporting decode failures as malformed input.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::MalformedInput(rejection.body_text()))
}

// ============================================================================
// Handlers
// ============================================================================

async fn create_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> ApiResult<Json<Note>> {
    let request = body(payload)?;
    let note = state.service().create_note(&user, request.into()).await?;
    Ok(Json(note))
}

async fn list_notes(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(folder): Path<String>,
) -> ApiResult<Json<Vec<Note>>> {
    let folder = FolderRef::parse(&folder);
    let notes = state.service().list_notes(&user, &folder).await?;
    Ok(Json(notes))
}

async fn view_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Option<Note>>> {
    let note = state.service().view_note(&user, &NoteId::new(id)).await?;
    Ok(Json(note))
}

async fn update_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<UpdateNoteRequest>, JsonRejection>,
) -> ApiResult<Json<UpdateNoteResponse>> {
    let request = body(payload)?;
    let update = NoteUpdate {
        title: request.title,
        content: request.content,
    };
    let prev = state
        .service()
        .update_note(&user, &request.id, &update)
        .await?;
    Ok(Json(UpdateNoteResponse { prev }))
}

async fn delete_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<DeleteNoteRequest>, JsonRejection>,
) -> ApiResult<Json<DeleteNoteResponse>> {
    let request = body(payload)?;
    let result = state
        .service()
        .delete_note(&user, &request.folder, &request.id)
        .await?;
    Ok(Json(result.into()))
}

// ============================================================================
// Router
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_note))
        .route("/get/{id}", get(list_notes))
        .route("/view/{id}", get(view_note))
        .route("/update", put(update_note))
        .route("/delete", delete(delete_note))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notes_core::FolderId;

    #[test]
    fn test_create_request_root_sentinel() {
        let json = r#"{"title": "A", "visibility": "private", "folder": "root"}"#;
        let request: CreateNoteRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.folder, FolderRef::Root);

        let json = r#"{"title": "A", "visibility": "private", "folder": "F7"}"#;
        let request: CreateNoteRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.folder, FolderRef::Id(FolderId::new("F7")));
    }

    #[test]
    fn test_update_request_optional_fields() {
        let request: UpdateNoteRequest = serde_json::from_str(r#"{"id": "n1"}"#).unwrap();
        assert_eq!(request.id, NoteId::new("n1"));
        assert!(request.title.is_none());
        assert!(request.content.is_none());
    }

    #[test]
    fn test_delete_request_requires_folder() {
        let result: Result<DeleteNoteRequest, _> = serde_json::from_str(r#"{"id": "n1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_delete_response_reason() {
        let response = DeleteNoteResponse::from(DeleteResult::acknowledged(1));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "reason": "Success! 1 documents deleted", "n": 1 })
        );
    }

    #[test]
    fn test_update_response_null_prev() {
        let json = serde_json::to_value(UpdateNoteResponse { prev: None }).unwrap();
        assert_eq!(json, serde_json::json!({ "prev": null }));
    }
}
