use crate::errors::{AppError, AppResult};
use crate::models::{
    CompletionRecord, Habit, HabitPatch, LoginRequest, NewHabit, RegisterRequest, ToggleRequest,
    TokenResponse, User,
};
use crate::storage;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::{env, path::PathBuf};

pub fn resolve_base_url() -> String {
    match env::var("HABIT_API_URL") {
        Ok(url) => url,
        Err(_) => "http://localhost:8000".to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// REST client for the habit backend. Attaches the bearer credential to
/// every request when one is held, and keeps that credential mirrored to
/// local storage across login/logout.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token_path: PathBuf,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token_path: PathBuf) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token_path,
            token: None,
        }
    }

    /// Like [`ApiClient::new`], but restores a previously stored credential.
    pub async fn connect(base_url: impl Into<String>, token_path: PathBuf) -> Self {
        let mut client = Self::new(base_url, token_path);
        client.token = storage::load_token(&client.token_path).await;
        client
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = format!("{}/api{}", self.base_url, endpoint);
        let mut request = self.http.request(method, url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request
    }

    /// Maps a non-2xx response to the backend's `detail` message when the
    /// body carries one, otherwise to an HTTP-status-derived message.
    async fn check(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail);
        Err(AppError::Backend(
            detail.unwrap_or_else(|| format!("HTTP {status}")),
        ))
    }

    async fn json_of<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn health_check(&self) -> AppResult<()> {
        let response = self.request(Method::GET, "/health").send().await?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn get_habits(&self) -> AppResult<Vec<Habit>> {
        let response = self.request(Method::GET, "/habits").send().await?;
        Self::json_of(response).await
    }

    pub async fn create_habit(&self, name: &str, color: &str) -> AppResult<Habit> {
        let response = self
            .request(Method::POST, "/habits")
            .json(&NewHabit { name, color })
            .send()
            .await?;
        Self::json_of(response).await
    }

    pub async fn update_habit(&self, habit_id: &str, patch: &HabitPatch) -> AppResult<Habit> {
        let response = self
            .request(Method::PATCH, &format!("/habits/{habit_id}"))
            .json(patch)
            .send()
            .await?;
        Self::json_of(response).await
    }

    /// The backend answers 204 on success; there is no body to parse.
    pub async fn delete_habit(&self, habit_id: &str) -> AppResult<()> {
        let response = self
            .request(Method::DELETE, &format!("/habits/{habit_id}"))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn toggle_completion(&self, habit_id: &str, date: &str) -> AppResult<CompletionRecord> {
        let response = self
            .request(Method::POST, "/habits/completions/toggle")
            .json(&ToggleRequest { habit_id, date })
            .send()
            .await?;
        Self::json_of(response).await
    }

    pub async fn get_completions(&self, habit_id: &str) -> AppResult<Vec<CompletionRecord>> {
        let response = self
            .request(Method::GET, &format!("/habits/completions/{habit_id}"))
            .send()
            .await?;
        Self::json_of(response).await
    }

    pub async fn register(&self, email: &str, password: &str, name: &str) -> AppResult<User> {
        let response = self
            .request(Method::POST, "/auth/register")
            .json(&RegisterRequest {
                email,
                password,
                name,
            })
            .send()
            .await?;
        Self::json_of(response).await
    }

    /// Obtains a bearer credential and stores it for later sessions.
    pub async fn login(&mut self, email: &str, password: &str) -> AppResult<()> {
        let response = self
            .request(Method::POST, "/auth/login")
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        let token: TokenResponse = Self::json_of(response).await?;
        storage::persist_token(&self.token_path, &token.access_token).await?;
        self.token = Some(token.access_token);
        Ok(())
    }

    pub async fn logout(&mut self) -> AppResult<()> {
        self.token = None;
        storage::clear_token(&self.token_path).await
    }

    pub async fn me(&self) -> AppResult<User> {
        if self.token.is_none() {
            return Err(AppError::NotAuthenticated);
        }
        let response = self.request(Method::GET, "/auth/me").send().await?;
        Self::json_of(response).await
    }
}
