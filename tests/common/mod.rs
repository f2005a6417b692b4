#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use huntflow_screening::error::{Error, Result};
use huntflow_screening::models::evaluation::CandidateEvaluation;
use huntflow_screening::services::huntflow_service::HuntflowService;
use huntflow_screening::services::llm_service::LlmClient;
use huntflow_screening::services::token_store::TokenStore;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

pub const ACCOUNT_ID: &str = "100";
pub const REFRESHED_TOKEN: &str = "refreshed-token";

/// In-memory Huntflow stand-in. Serves canned data, tracks call counts and
/// simulates token expiry against the `valid_token` it currently accepts.
#[derive(Default)]
pub struct StubAts {
    pub valid_token: Mutex<String>,
    pub always_expired: bool,
    pub refresh_calls: AtomicU32,
    pub applicants: Mutex<HashMap<i64, Value>>,
    pub resumes: Mutex<HashMap<(i64, i64), Value>>,
    pub vacancies: Mutex<HashMap<i64, Value>>,
    pub statuses: Mutex<Vec<Value>>,
    pub applicant_pages: Mutex<Vec<(u16, Value)>>,
    pub list_calls: AtomicU32,
    pub applicant_calls: AtomicU32,
    pub vacancy_calls: AtomicU32,
    pub status_updates: Mutex<Vec<(i64, Value)>>,
}

impl StubAts {
    pub fn with_token(token: &str) -> Self {
        let stub = Self::default();
        *stub.valid_token.lock().unwrap() = token.to_string();
        stub
    }

    fn authorize(&self, headers: &HeaderMap) -> std::result::Result<(), (StatusCode, Json<Value>)> {
        let expired = (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "errors": [{ "detail": "token_expired" }] })),
        );
        if self.always_expired {
            return Err(expired);
        }
        let provided = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .unwrap_or_default();
        if provided == *self.valid_token.lock().unwrap() {
            Ok(())
        } else {
            Err(expired)
        }
    }
}

async fn refresh(State(stub): State<Arc<StubAts>>) -> (StatusCode, Json<Value>) {
    stub.refresh_calls.fetch_add(1, Ordering::SeqCst);
    *stub.valid_token.lock().unwrap() = REFRESHED_TOKEN.to_string();
    (
        StatusCode::OK,
        Json(json!({
            "access_token": REFRESHED_TOKEN,
            "refresh_token": "refreshed-refresh",
        })),
    )
}

async fn get_applicant(
    State(stub): State<Arc<StubAts>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> (StatusCode, Json<Value>) {
    if let Err(rejection) = stub.authorize(&headers) {
        return rejection;
    }
    stub.applicant_calls.fetch_add(1, Ordering::SeqCst);
    match stub.applicants.lock().unwrap().get(&id) {
        Some(applicant) => (StatusCode::OK, Json(applicant.clone())),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "errors": [{ "detail": "not_found" }] })),
        ),
    }
}

async fn get_resume(
    State(stub): State<Arc<StubAts>>,
    headers: HeaderMap,
    Path((applicant_id, external_id)): Path<(i64, i64)>,
) -> (StatusCode, Json<Value>) {
    if let Err(rejection) = stub.authorize(&headers) {
        return rejection;
    }
    match stub
        .resumes
        .lock()
        .unwrap()
        .get(&(applicant_id, external_id))
    {
        Some(resume) => (StatusCode::OK, Json(resume.clone())),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "errors": [{ "detail": "not_found" }] })),
        ),
    }
}

async fn list_applicants(
    State(stub): State<Arc<StubAts>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if let Err(rejection) = stub.authorize(&headers) {
        return rejection;
    }
    let index = stub.list_calls.fetch_add(1, Ordering::SeqCst) as usize;
    let pages = stub.applicant_pages.lock().unwrap();
    match pages.get(index) {
        Some((status, body)) => (
            StatusCode::from_u16(*status).unwrap(),
            Json(body.clone()),
        ),
        None => (StatusCode::OK, Json(json!({ "items": [], "next": null }))),
    }
}

async fn get_statuses(
    State(stub): State<Arc<StubAts>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if let Err(rejection) = stub.authorize(&headers) {
        return rejection;
    }
    let statuses = stub.statuses.lock().unwrap().clone();
    (StatusCode::OK, Json(json!({ "items": statuses })))
}

async fn get_vacancy(
    State(stub): State<Arc<StubAts>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> (StatusCode, Json<Value>) {
    if let Err(rejection) = stub.authorize(&headers) {
        return rejection;
    }
    stub.vacancy_calls.fetch_add(1, Ordering::SeqCst);
    match stub.vacancies.lock().unwrap().get(&id) {
        Some(vacancy) => (StatusCode::OK, Json(vacancy.clone())),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "errors": [{ "detail": "not_found" }] })),
        ),
    }
}

async fn update_status(
    State(stub): State<Arc<StubAts>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if let Err(rejection) = stub.authorize(&headers) {
        return rejection;
    }
    stub.status_updates.lock().unwrap().push((id, body.clone()));
    (StatusCode::OK, Json(json!({ "changed": body })))
}

/// Binds the stub to an ephemeral port and returns its base URL.
pub async fn spawn_stub(stub: Arc<StubAts>) -> String {
    let app = Router::new()
        .route("/token/refresh", post(refresh))
        .route(
            &format!("/accounts/{}/applicants", ACCOUNT_ID),
            get(list_applicants),
        )
        .route(
            &format!("/accounts/{}/applicants/:id", ACCOUNT_ID),
            get(get_applicant),
        )
        .route(
            &format!("/accounts/{}/applicants/:id/externals/:ext", ACCOUNT_ID),
            get(get_resume),
        )
        .route(
            &format!("/accounts/{}/applicants/:id/vacancy", ACCOUNT_ID),
            put(update_status),
        )
        .route(
            &format!("/accounts/{}/vacancies/statuses", ACCOUNT_ID),
            get(get_statuses),
        )
        .route(
            &format!("/accounts/{}/vacancies/:id", ACCOUNT_ID),
            get(get_vacancy),
        )
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub struct NoopTokenStore;

#[async_trait]
impl TokenStore for NoopTokenStore {
    async fn save(&self, _access_token: &str, _refresh_token: &str) -> Result<()> {
        Ok(())
    }
}

/// LLM stand-in: records every call and replays a canned verdict. With no
/// canned verdict any call fails, which doubles as a "never called" guard.
#[derive(Default)]
pub struct ScriptedLlm {
    pub calls: Mutex<Vec<(String, String)>>,
    pub verdict: Mutex<Option<CandidateEvaluation>>,
}

impl ScriptedLlm {
    pub fn replying(verdict: CandidateEvaluation) -> Self {
        let llm = Self::default();
        *llm.verdict.lock().unwrap() = Some(verdict);
        llm
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn evaluate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<CandidateEvaluation> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));
        self.verdict
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::Internal("unexpected LLM call".to_string()))
    }
}

pub fn huntflow_for(base_url: &str, token: &str) -> HuntflowService {
    HuntflowService::new(
        reqwest::Client::new(),
        base_url.to_string(),
        ACCOUNT_ID.to_string(),
        token.to_string(),
        "refresh-0".to_string(),
        Arc::new(NoopTokenStore),
    )
}
