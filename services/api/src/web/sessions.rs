//! services/api/src/web/sessions.rs
//!
//! Compose sessions: the attachments a user collects before sending, and the
//! send action itself.

use crate::web::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use email_assistant_core::{
    attachments::AttachmentError,
    composer::SendRequest,
    domain::{Attachment, SmtpProvider},
    template::EmailTemplate,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct AttachmentInfo {
    pub name: String,
    pub content_type: String,
    pub size: usize,
    pub added_at: DateTime<Utc>,
}

impl From<&Attachment> for AttachmentInfo {
    fn from(a: &Attachment) -> Self {
        Self {
            name: a.name.clone(),
            content_type: a.content_type.clone(),
            size: a.size(),
            added_at: a.added_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct AttachmentListResponse {
    pub attachments: Vec<AttachmentInfo>,
    pub total_size: usize,
}

#[derive(Deserialize, ToSchema)]
pub struct SendEmailRequest {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    /// The email text, usually the generated draft after user edits.
    pub body: String,
    /// One of gmail, outlook, yahoo, custom. Defaults to gmail.
    #[serde(default)]
    pub provider: Option<String>,
    /// One of default, formal, newsletter, meeting, thank_you. Defaults to default.
    #[serde(default)]
    pub template: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct SendOutcomeResponse {
    pub success: bool,
    pub message: String,
}

//=========================================================================================
// Helpers
//=========================================================================================

fn session_not_found(id: Uuid) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("Session {} not found", id))
}

fn attachment_error_response(e: &AttachmentError) -> (StatusCode, String) {
    let status = match e {
        AttachmentError::TooLarge { .. } | AttachmentError::TotalTooLarge { .. } => {
            StatusCode::PAYLOAD_TOO_LARGE
        }
        AttachmentError::Duplicate(_) => StatusCode::CONFLICT,
    };
    (status, e.to_string())
}

async fn list_response(app_state: &AppState, id: Uuid) -> Result<AttachmentListResponse, (StatusCode, String)> {
    let session = app_state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(AttachmentListResponse {
        attachments: session.attachments.iter().map(AttachmentInfo::from).collect(),
        total_size: session.attachments.total_size(),
    })
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Start a compose session that can collect attachments.
#[utoipa::path(
    post,
    path = "/sessions",
    responses((status = 201, description = "Session created", body = CreateSessionResponse))
)]
pub async fn create_session_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = app_state.sessions.create().await;
    info!(session_id = %session.id, "Compose session created");
    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id: session.id,
            created_at: session.created_at,
        }),
    )
}

/// Discard a compose session and its attachments.
#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    params(("id" = Uuid, Path, description = "Compose session id")),
    responses(
        (status = 204, description = "Session removed"),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn delete_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if app_state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(id))
    }
}

/// List the attachments of a session.
#[utoipa::path(
    get,
    path = "/sessions/{id}/attachments",
    params(("id" = Uuid, Path, description = "Compose session id")),
    responses(
        (status = 200, description = "Current attachments", body = AttachmentListResponse),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn list_attachments_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<AttachmentListResponse>, (StatusCode, String)> {
    Ok(Json(list_response(&app_state, id).await?))
}

/// Upload one or more files to a session.
///
/// Accepts multipart/form-data; every part with a file name is attached. Files
/// over 10MB, duplicate names and uploads that push the session past 25MB are rejected.
#[utoipa::path(
    post,
    path = "/sessions/{id}/attachments",
    params(("id" = Uuid, Path, description = "Compose session id")),
    request_body(content_type = "multipart/form-data", description = "Files to attach."),
    responses(
        (status = 201, description = "Files attached", body = AttachmentListResponse),
        (status = 400, description = "No file in the upload"),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "A file with that name is already attached"),
        (status = 413, description = "Size limit exceeded")
    )
)]
pub async fn add_attachments_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if app_state.sessions.get(id).await.is_none() {
        return Err(session_not_found(id));
    }

    let mut uploads = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Failed to read multipart data: {}", e),
        )
    })? {
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                format!("Failed to read file bytes: {}", e),
            )
        })?;
        uploads.push(Attachment::new(name, content_type.as_deref(), data.to_vec()));
    }

    if uploads.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Multipart form must include a file".to_string(),
        ));
    }

    let count = uploads.len();
    app_state
        .sessions
        .with_session(id, |session| session.attachments.add_all(uploads))
        .await
        .ok_or_else(|| session_not_found(id))?
        .map_err(|e| {
            warn!(session_id = %id, "Upload rejected: {}", e);
            attachment_error_response(&e)
        })?;
    info!(session_id = %id, count, "Attachments added");

    Ok((StatusCode::CREATED, Json(list_response(&app_state, id).await?)))
}

/// Remove one attachment by file name.
#[utoipa::path(
    delete,
    path = "/sessions/{id}/attachments/{name}",
    params(
        ("id" = Uuid, Path, description = "Compose session id"),
        ("name" = String, Path, description = "Attachment file name")
    ),
    responses(
        (status = 204, description = "Attachment removed"),
        (status = 404, description = "Unknown session or attachment")
    )
)]
pub async fn remove_attachment_handler(
    State(app_state): State<Arc<AppState>>,
    Path((id, name)): Path<(Uuid, String)>,
) -> Result<StatusCode, (StatusCode, String)> {
    let removed = app_state
        .sessions
        .with_session(id, |session| session.attachments.remove(&name))
        .await
        .ok_or_else(|| session_not_found(id))?;

    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, format!("No attachment named {}", name)))
    }
}

/// Send an email with the session's attachments.
///
/// Delivery problems are reported in the body (`success: false`) rather than as
/// an HTTP error, so a client can show the message as-is.
#[utoipa::path(
    post,
    path = "/sessions/{id}/send",
    params(("id" = Uuid, Path, description = "Compose session id")),
    request_body = SendEmailRequest,
    responses(
        (status = 200, description = "Outcome of the send attempt", body = SendOutcomeResponse),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn send_email_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<SendEmailRequest>,
) -> Result<Json<SendOutcomeResponse>, (StatusCode, String)> {
    let session = app_state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| session_not_found(id))?;

    let request = SendRequest {
        sender: req.sender.trim().to_string(),
        recipient: req.recipient.trim().to_string(),
        subject: req.subject,
        body: req.body,
        provider: req
            .provider
            .as_deref()
            .map(SmtpProvider::from_name)
            .unwrap_or_default(),
        template: req
            .template
            .as_deref()
            .map(EmailTemplate::from_name)
            .unwrap_or_default(),
        attachments: session.attachments.to_vec(),
    };

    let outcome = app_state.composer.send(request).await;
    if !outcome.success {
        error!(session_id = %id, "{}", outcome.message);
    }

    Ok(Json(SendOutcomeResponse {
        success: outcome.success,
        message: outcome.message,
    }))
}
