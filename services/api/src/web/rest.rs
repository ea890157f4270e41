//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the email drafting endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::sessions::{
    self, AttachmentInfo, AttachmentListResponse, CreateSessionResponse, SendEmailRequest,
    SendOutcomeResponse,
};
use crate::web::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use email_assistant_core::{
    domain::{parse_key_points, EmailRequest, EmailType, EvaluationResult, SmtpProvider, ToneLabel},
    evaluation::evaluate,
    ports::{CompletionOptions, PortError},
    prompt::build_prompt_for,
    template::EmailTemplate,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        options_handler,
        prompt_handler,
        generate_handler,
        evaluate_handler,
        sessions::create_session_handler,
        sessions::delete_session_handler,
        sessions::list_attachments_handler,
        sessions::add_attachments_handler,
        sessions::remove_attachment_handler,
        sessions::send_email_handler,
    ),
    components(
        schemas(
            OptionsResponse, TemplateOption, ComposeRequest, PromptResponse, GenerateResponse,
            EvaluateRequest, EvaluationResponse, CreateSessionResponse, AttachmentInfo,
            AttachmentListResponse, SendEmailRequest, SendOutcomeResponse
        )
    ),
    tags(
        (name = "Email Assistant API", description = "Draft emails from key points, check them, and send them.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The inputs for building a prompt. Each key point entry may itself hold
/// several points, one per line.
#[derive(Deserialize, ToSchema, Debug, Clone)]
pub struct ComposeRequest {
    pub key_points: Vec<String>,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub email_type: Option<String>,
    /// Sampling temperature between 0.0 and 1.0. Only used by `/emails/generate`.
    #[serde(default)]
    pub temperature: Option<f32>,
}

#[derive(Serialize, ToSchema)]
pub struct PromptResponse {
    pub prompt: String,
}

#[derive(Serialize, ToSchema)]
pub struct GenerateResponse {
    pub prompt: String,
    pub email: String,
    pub evaluation: EvaluationResponse,
}

#[derive(Deserialize, ToSchema)]
pub struct EvaluateRequest {
    pub reply: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct EvaluationResponse {
    pub all_key_points_included: bool,
    pub found_points: Vec<String>,
    pub missing_points: Vec<String>,
    pub coverage_percent: f64,
    pub tone_is_polite: bool,
    pub polite_count: usize,
    pub impolite_count: usize,
    pub word_count: usize,
    pub suggestions: Vec<String>,
    pub passed: bool,
}

impl From<EvaluationResult> for EvaluationResponse {
    fn from(result: EvaluationResult) -> Self {
        let passed = result.passed();
        Self {
            all_key_points_included: result.all_key_points_included,
            found_points: result.found_points,
            missing_points: result.missing_points,
            coverage_percent: result.coverage_percent,
            tone_is_polite: result.tone_is_polite,
            polite_count: result.polite_count,
            impolite_count: result.impolite_count,
            word_count: result.word_count,
            suggestions: result.suggestions,
            passed,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct TemplateOption {
    pub name: String,
    pub description: String,
}

#[derive(Serialize, ToSchema)]
pub struct OptionsResponse {
    pub tones: Vec<String>,
    pub email_types: Vec<String>,
    pub templates: Vec<TemplateOption>,
    pub providers: Vec<String>,
}

//=========================================================================================
// Helpers
//=========================================================================================

/// Maps a port error onto the HTTP status the client should see.
pub(crate) fn port_error_response(e: &PortError) -> (StatusCode, String) {
    let status = match e {
        PortError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        PortError::Provider(_) => StatusCode::BAD_GATEWAY,
        PortError::Configuration(_) | PortError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

struct PreparedPrompt {
    request: EmailRequest,
    prompt: String,
}

fn prepare_prompt(req: &ComposeRequest) -> Result<PreparedPrompt, (StatusCode, String)> {
    let key_points: Vec<String> = req
        .key_points
        .iter()
        .flat_map(|entry| parse_key_points(entry))
        .collect();

    if key_points.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "At least one key point is required".to_string(),
        ));
    }

    let tone = req
        .tone
        .as_deref()
        .map(|t| t.parse::<ToneLabel>().unwrap_or_default())
        .unwrap_or_default();
    let email_type = req
        .email_type
        .as_deref()
        .map(EmailType::from_key)
        .unwrap_or_default();

    let request = EmailRequest {
        key_points,
        tone,
        context: req.context.clone(),
        email_type,
    };
    let prompt = build_prompt_for(&request);
    Ok(PreparedPrompt { request, prompt })
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Liveness probe.
#[utoipa::path(get, path = "/health", responses((status = 200, description = "Service is up")))]
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Lists the tones, email types, templates and SMTP providers a client can offer.
#[utoipa::path(
    get,
    path = "/options",
    responses((status = 200, description = "Available choices", body = OptionsResponse))
)]
pub async fn options_handler() -> Json<OptionsResponse> {
    Json(OptionsResponse {
        tones: ToneLabel::OFFERED.iter().map(|t| t.to_string()).collect(),
        email_types: EmailType::ALL.iter().map(|t| t.to_string()).collect(),
        templates: EmailTemplate::ALL
            .iter()
            .map(|t| TemplateOption {
                name: t.as_str().to_string(),
                description: t.description().to_string(),
            })
            .collect(),
        providers: SmtpProvider::ALL.iter().map(|p| p.as_str().to_string()).collect(),
    })
}

/// Build the prompt for a set of key points without calling the model.
#[utoipa::path(
    post,
    path = "/emails/prompt",
    request_body = ComposeRequest,
    responses(
        (status = 200, description = "The prompt that would be sent", body = PromptResponse),
        (status = 400, description = "No key points supplied")
    )
)]
pub async fn prompt_handler(
    Json(req): Json<ComposeRequest>,
) -> Result<Json<PromptResponse>, (StatusCode, String)> {
    let prepared = prepare_prompt(&req)?;
    Ok(Json(PromptResponse {
        prompt: prepared.prompt,
    }))
}

/// Draft an email from key points and evaluate the draft.
#[utoipa::path(
    post,
    path = "/emails/generate",
    request_body = ComposeRequest,
    responses(
        (status = 200, description = "Generated email with its evaluation", body = GenerateResponse),
        (status = 400, description = "No key points supplied"),
        (status = 502, description = "The completion provider failed")
    )
)]
pub async fn generate_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<ComposeRequest>,
) -> Result<Json<GenerateResponse>, (StatusCode, String)> {
    let prepared = prepare_prompt(&req)?;

    let options = CompletionOptions {
        temperature: req.temperature,
        ..Default::default()
    };

    let email = app_state
        .completion
        .complete(&prepared.prompt, &options)
        .await
        .map_err(|e| {
            error!("Failed to generate email: {:?}", e);
            port_error_response(&e)
        })?;

    let evaluation = evaluate(&email, &prepared.request.key_points);
    info!(
        key_points = prepared.request.key_points.len(),
        words = evaluation.word_count,
        passed = evaluation.passed(),
        "Generated email"
    );

    Ok(Json(GenerateResponse {
        prompt: prepared.prompt,
        email,
        evaluation: evaluation.into(),
    }))
}

/// Evaluate an email text (for example, one the user edited) against key points.
#[utoipa::path(
    post,
    path = "/emails/evaluate",
    request_body = EvaluateRequest,
    responses((status = 200, description = "Evaluation of the text", body = EvaluationResponse))
)]
pub async fn evaluate_handler(Json(req): Json<EvaluateRequest>) -> Json<EvaluationResponse> {
    let key_points: Vec<String> = req
        .key_points
        .iter()
        .flat_map(|entry| parse_key_points(entry))
        .collect();
    Json(evaluate(&req.reply, &key_points).into())
}
