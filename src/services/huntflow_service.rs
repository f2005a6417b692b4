use crate::error::Result;
use crate::models::applicant::Applicant;
use crate::models::resume::ExternalResume;
use crate::models::stage::Stage;
use crate::models::vacancy::{Vacancy, VacancyListItem};
use crate::services::token_store::TokenStore;
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

const PAGE_LIMIT: u32 = 100;

#[derive(Debug, Clone)]
struct TokenPair {
    access: String,
    refresh: String,
}

/// Authenticated client for the Huntflow REST API. Holds the bearer/refresh
/// token pair behind a mutex so concurrent 401s collapse into a single
/// refresh, and persists refreshed tokens through the token store.
#[derive(Clone)]
pub struct HuntflowService {
    client: Client,
    base_url: String,
    account_id: String,
    tokens: Arc<Mutex<TokenPair>>,
    store: Arc<dyn TokenStore>,
}

impl HuntflowService {
    pub fn new(
        client: Client,
        base_url: String,
        account_id: String,
        access_token: String,
        refresh_token: String,
        store: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            client,
            base_url,
            account_id,
            tokens: Arc::new(Mutex::new(TokenPair {
                access: access_token,
                refresh: refresh_token,
            })),
            store,
        }
    }

    fn account_url(&self, path: &str) -> String {
        format!("{}/accounts/{}{}", self.base_url, self.account_id, path)
    }

    /// Issues one API call with the current bearer token. On a 401 whose
    /// error detail is `token_expired` the token is refreshed and the call
    /// retried exactly once; every other failure status is returned as an
    /// error immediately.
    async fn send(
        &self,
        method: Method,
        url: &str,
        query: Option<&[(&str, String)]>,
        body: Option<&Value>,
    ) -> Result<Value> {
        let token = self.tokens.lock().await.access.clone();
        let response = self
            .execute(method.clone(), url, query, body, &token)
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let text = response.text().await.unwrap_or_default();
            if error_detail(&text) == Some("token_expired".to_string()) {
                info!("Token expired. Refreshing token...");
                if let Some(new_token) = self.refresh_access_token(&token).await {
                    let retried = self.execute(method, url, query, body, &new_token).await?;
                    return into_json(retried).await;
                }
            }
            return Err(anyhow::anyhow!("Huntflow API error 401: {}", text).into());
        }

        into_json(response).await
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        query: Option<&[(&str, String)]>,
        body: Option<&Value>,
        token: &str,
    ) -> Result<reqwest::Response> {
        let mut request = self.client.request(method, url).bearer_auth(token);
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// Exchanges the refresh token for a new pair. The mutex is held for the
    /// whole exchange, including persistence, so a second caller that raced
    /// on the same expired token reuses the first caller's result instead of
    /// hitting the refresh endpoint again. Failure is reported as `None`.
    pub async fn refresh_access_token(&self, expired_token: &str) -> Option<String> {
        let mut guard = self.tokens.lock().await;
        if guard.access != expired_token {
            return Some(guard.access.clone());
        }

        let url = format!("{}/token/refresh", self.base_url);
        let payload = json!({ "refresh_token": guard.refresh });
        let response = match self.client.post(&url).json(&payload).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Error refreshing tokens: {}", e);
                return None;
            }
        };
        if !response.status().is_success() {
            error!("Error refreshing tokens: HTTP {}", response.status());
            return None;
        }
        let data: Value = match response.json().await {
            Ok(data) => data,
            Err(e) => {
                error!("Error refreshing tokens: {}", e);
                return None;
            }
        };

        let access = data.get("access_token").and_then(|v| v.as_str());
        let refresh = data.get("refresh_token").and_then(|v| v.as_str());
        let (Some(access), Some(refresh)) = (access, refresh) else {
            error!("Failed to obtain new tokens from the response.");
            return None;
        };

        guard.access = access.to_string();
        guard.refresh = refresh.to_string();
        if let Err(e) = self.store.save(access, refresh).await {
            error!("Failed to persist refreshed tokens: {}", e);
        }
        info!("Tokens successfully refreshed.");
        Some(guard.access.clone())
    }

    pub async fn get_vacancies(
        &self,
        state: &str,
        count: u32,
        page: u32,
        mine: bool,
    ) -> Vec<VacancyListItem> {
        let url = self.account_url("/vacancies");
        let query = [
            ("state", state.to_string()),
            ("count", count.to_string()),
            ("page", page.to_string()),
            ("mine", mine.to_string()),
        ];
        match self.send(Method::GET, &url, Some(&query), None).await {
            Ok(data) => items_from(data),
            Err(e) => {
                error!("Error fetching vacancies: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn get_vacancy(&self, vacancy_id: i64) -> Option<Value> {
        let url = self.account_url(&format!("/vacancies/{}", vacancy_id));
        match self.send(Method::GET, &url, None, None).await {
            Ok(data) => Some(data),
            Err(e) => {
                error!("Error fetching vacancy details: {}", e);
                None
            }
        }
    }

    pub async fn get_vacancy_description(&self, vacancy_id: i64) -> Option<Vacancy> {
        let url = self.account_url(&format!("/vacancies/{}", vacancy_id));
        match self.send(Method::GET, &url, None, None).await {
            Ok(data) => serde_json::from_value(data).ok(),
            Err(e) => {
                error!("Error fetching vacancy description: {}", e);
                None
            }
        }
    }

    /// Stage catalogue, without removed stages unless asked for.
    pub async fn get_statuses(&self, include_removed: bool) -> Vec<Stage> {
        let url = self.account_url("/vacancies/statuses");
        match self.send(Method::GET, &url, None, None).await {
            Ok(data) => {
                let stages: Vec<Stage> = items_from(data);
                if include_removed {
                    stages
                } else {
                    stages.into_iter().filter(|s| !s.is_removed()).collect()
                }
            }
            Err(e) => {
                error!("Error fetching statuses: {}", e);
                Vec::new()
            }
        }
    }

    /// Case-insensitive lookup of a stage id by its display name.
    pub async fn get_status_id_by_name(&self, status_name: &str) -> Option<i64> {
        let wanted = status_name.to_lowercase();
        self.get_statuses(false)
            .await
            .into_iter()
            .find(|stage| stage.name.to_lowercase() == wanted)
            .map(|stage| stage.id)
    }

    pub async fn get_resume(
        &self,
        applicant_id: i64,
        external_id: i64,
    ) -> Option<ExternalResume> {
        let url = self.account_url(&format!(
            "/applicants/{}/externals/{}",
            applicant_id, external_id
        ));
        match self.send(Method::GET, &url, None, None).await {
            Ok(data) => serde_json::from_value(data).ok(),
            Err(e) => {
                error!("Error fetching resume: {}", e);
                None
            }
        }
    }

    pub async fn get_applicant(&self, applicant_id: i64) -> Result<Applicant> {
        let url = self.account_url(&format!("/applicants/{}", applicant_id));
        let data = self.send(Method::GET, &url, None, None).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Collects every applicant on the given vacancy/stage, advancing the
    /// offset a page at a time. A failure mid-way stops accumulation and
    /// returns what was collected so far.
    pub async fn get_applicants(&self, vacancy_id: i64, status_id: i64) -> Vec<Value> {
        let url = self.account_url("/applicants");
        let mut offset: u32 = 0;
        let mut applicants = Vec::new();
        loop {
            let query = [
                ("vacancy", vacancy_id.to_string()),
                ("status", status_id.to_string()),
                ("limit", PAGE_LIMIT.to_string()),
                ("offset", offset.to_string()),
            ];
            let data = match self.send(Method::GET, &url, Some(&query), None).await {
                Ok(data) => data,
                Err(e) => {
                    error!("Error fetching applicants: {}", e);
                    break;
                }
            };
            if let Some(items) = data.get("items").and_then(|v| v.as_array()) {
                applicants.extend(items.iter().cloned());
            }
            if !has_next(&data) {
                break;
            }
            offset += PAGE_LIMIT;
        }
        applicants
    }

    pub async fn create_applicant(&self, applicant_data: &Value) -> Option<i64> {
        let url = self.account_url("/applicants");
        match self
            .send(Method::POST, &url, None, Some(applicant_data))
            .await
        {
            Ok(data) => {
                let applicant_id = data.get("id").and_then(|v| v.as_i64());
                info!("Applicant created with ID: {:?}", applicant_id);
                applicant_id
            }
            Err(e) => {
                error!("Error creating applicant: {}", e);
                None
            }
        }
    }

    /// Moves the applicant to a new stage on the vacancy, attaching a
    /// comment. Write failures propagate so the delivery is seen as failed.
    pub async fn update_applicant_status(
        &self,
        applicant_id: i64,
        status_id: i64,
        vacancy_id: i64,
        comment: &str,
    ) -> Result<Value> {
        let url = self.account_url(&format!("/applicants/{}/vacancy", applicant_id));
        let body = json!({
            "status": status_id,
            "vacancy": vacancy_id,
            "comment": comment,
        });
        let data = self.send(Method::PUT, &url, None, Some(&body)).await?;
        info!("Updated candidate {} to status {}.", applicant_id, status_id);
        Ok(data)
    }

    /// A comment without a stage change is the same mutation against the
    /// same endpoint; the ATS models both as "set current vacancy stage".
    pub async fn add_comment(
        &self,
        applicant_id: i64,
        vacancy_id: i64,
        status_id: i64,
        text: &str,
    ) -> Result<Value> {
        let url = self.account_url(&format!("/applicants/{}/vacancy", applicant_id));
        let body = json!({
            "vacancy": vacancy_id,
            "status": status_id,
            "comment": text,
        });
        let data = self.send(Method::PUT, &url, None, Some(&body)).await?;
        info!("Added comment to candidate {}.", applicant_id);
        Ok(data)
    }
}

async fn into_json(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(anyhow::anyhow!("Huntflow API error {}: {}", status, text).into());
    }
    Ok(response.json().await?)
}

fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("errors")?
        .get(0)?
        .get("detail")?
        .as_str()
        .map(|s| s.to_string())
}

fn items_from<T: serde::de::DeserializeOwned>(data: Value) -> Vec<T> {
    data.get("items")
        .cloned()
        .and_then(|items| serde_json::from_value(items).ok())
        .unwrap_or_default()
}

fn has_next(data: &Value) -> bool {
    match data.get("next") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}
