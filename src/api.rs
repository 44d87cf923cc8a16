use crate::errors::ApiError;
use crate::models::{
    ChatRequest, ChatResponse, ErrorBody, LoginRequest, LoginResponse, MoodEntry,
    MoodHistoryResponse, MoodRequest, RegisterRequest, UserId,
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, de::IgnoredAny, Serialize};

/// The backend operations the client depends on.
#[async_trait]
pub trait MoodApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;
    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError>;
    async fn save_mood(&self, request: &MoodRequest) -> Result<(), ApiError>;
    async fn mood_history(&self, user_id: UserId) -> Result<Vec<MoodEntry>, ApiError>;
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpApi {
    base_url: String,
    client: Client,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .map_err(ApiError::transport)?;
        decode(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .map_err(ApiError::transport)?;
        decode(response).await
    }
}

#[async_trait]
impl MoodApi for HttpApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.post_json("/api/login", request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        self.post_json::<_, IgnoredAny>("/api/register", request).await?;
        Ok(())
    }

    async fn save_mood(&self, request: &MoodRequest) -> Result<(), ApiError> {
        self.post_json::<_, IgnoredAny>("/api/mood", request).await?;
        Ok(())
    }

    async fn mood_history(&self, user_id: UserId) -> Result<Vec<MoodEntry>, ApiError> {
        let body: MoodHistoryResponse = self.get_json(&format!("/api/mood/{user_id}")).await?;
        Ok(body.mood_entries)
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        self.post_json("/api/chat", request).await
    }
}

/// Every body is decoded as JSON whatever the status; a body that does not
/// decode counts as a transport failure.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(ApiError::transport)?;

    if status.is_success() {
        return serde_json::from_slice(&bytes).map_err(ApiError::transport);
    }

    let body: ErrorBody = serde_json::from_slice(&bytes).map_err(ApiError::transport)?;
    Err(ApiError::rejected(status.as_u16(), body.message))
}
