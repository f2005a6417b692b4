use axum::{body::Bytes, extract::State, http::HeaderMap, http::StatusCode, Json};
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::info;

use crate::{
    config::get_config,
    dto::webhook_dto::ApplicantWebhook,
    error::{Error, Result},
    AppState,
};

type HmacSha256 = Hmac<Sha256>;

/// Entry point for Huntflow webhook deliveries. The raw body is needed for
/// the signature check, so the JSON parse happens by hand after it.
pub async fn handle_applicant_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>)> {
    verify_signature(&headers, &body)?;

    let payload: ApplicantWebhook = serde_json::from_slice(&body)
        .map_err(|_| Error::BadRequest("Missing or malformed request body".into()))?;

    let event_type = headers
        .get("x-huntflow-event")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    match event_type {
        "PING" => Ok((StatusCode::OK, Json(json!("Ping received")))),
        "APPLICANT" => handle_applicant(&state, payload).await,
        _ => Err(Error::BadRequest("Unknown event".into())),
    }
}

async fn handle_applicant(
    state: &AppState,
    payload: ApplicantWebhook,
) -> Result<(StatusCode, Json<Value>)> {
    let log = payload.event.applicant_log;

    let action = log.kind.unwrap_or_default();
    if action != "STATUS" {
        return Err(Error::BadRequest(format!(
            "Only STATUS events are handled, got '{}'",
            action
        )));
    }

    let trigger_stage = &get_config().trigger_stage;
    let status_name = log.status.name.unwrap_or_default();
    if status_name.to_lowercase() != trigger_stage.to_lowercase() {
        return Err(Error::BadRequest(format!(
            "Stage '{}' does not match trigger stage '{}'",
            status_name, trigger_stage
        )));
    }

    let Some(applicant_id) = payload.event.applicant.id else {
        return Err(Error::BadRequest("Applicant id is missing".into()));
    };
    let Some(vacancy_id) = log.vacancy.id else {
        return Err(Error::BadRequest("Vacancy id is missing".into()));
    };

    info!(
        "Applicant {} entered stage '{}' on vacancy {}",
        applicant_id, status_name, vacancy_id
    );

    let evaluation = state
        .evaluation_service
        .evaluate_candidate(applicant_id, vacancy_id)
        .await?;
    state
        .status_service
        .apply_verdict(applicant_id, vacancy_id, &evaluation)
        .await?;

    Ok((StatusCode::OK, Json(json!({ "success": "Данные обработаны" }))))
}

fn verify_signature(headers: &HeaderMap, body: &[u8]) -> Result<()> {
    let Some(header) = headers.get("x-huntflow-signature") else {
        return Err(Error::Unauthorized(
            "Missing X-Huntflow-Signature header".into(),
        ));
    };
    let provided = header
        .to_str()
        .map_err(|_| Error::Unauthorized("Invalid signature header".into()))?;

    let secret = &get_config().webhook_secret;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| Error::Internal("Invalid webhook secret".into()))?;
    mac.update(body);
    let computed = hex::encode(mac.finalize().into_bytes());

    if ConstantTimeEq::ct_eq(computed.as_bytes(), provided.as_bytes()).into() {
        Ok(())
    } else {
        Err(Error::Unauthorized("Invalid signature".into()))
    }
}
