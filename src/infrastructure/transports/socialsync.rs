#[cfg(test)]
#[path = "socialsync_test.rs"]
mod tests;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AuthClient;
use crate::domain::models::ChatRequest;
use crate::domain::models::ChatResponse;
use crate::domain::models::ChatTransport;
use crate::domain::models::ErrorBody;
use crate::domain::models::QuickSuggestionRequest;
use crate::domain::models::TransportError;

/// HTTP client for the SocialSync chatbot API.
pub struct SocialSyncApi {
    url: String,
    auth: Option<AuthClient>,
    client: reqwest::Client,
}

impl SocialSyncApi {
    pub fn new(auth: Option<AuthClient>) -> SocialSyncApi {
        return SocialSyncApi::with_url(Config::get(ConfigKey::ApiURL), auth);
    }

    pub fn with_url(url: String, auth: Option<AuthClient>) -> SocialSyncApi {
        return SocialSyncApi {
            url: url.trim_end_matches('/').to_string(),
            auth,
            client: reqwest::Client::new(),
        };
    }

    async fn bearer_token(&self) -> Option<String> {
        let auth = self.auth.as_ref()?;
        auth.current_user()?;

        match auth.get_id_token(false).await {
            Ok(token) => return Some(token),
            Err(err) => {
                tracing::warn!(error = ?err, "Failed to get id token, sending request unauthenticated");
                return None;
            }
        }
    }

    async fn post<Req: Serialize + Sync, Res: DeserializeOwned>(
        &self,
        path: &str,
        body: &Req,
    ) -> Result<Res, TransportError> {
        let mut req = self
            .client
            .post(format!("{url}{path}", url = self.url))
            .json(body);

        if let Some(token) = self.bearer_token().await {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let res = req.send().await?;
        let status = res.status();
        if !status.is_success() {
            let detail = res
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| return body.detail);

            tracing::error!(
                status = status.as_u16(),
                path = path,
                "Chatbot request failed"
            );
            return Err(TransportError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        return Ok(res.json::<Res>().await?);
    }
}

#[async_trait]
impl ChatTransport for SocialSyncApi {
    #[allow(clippy::implicit_return)]
    async fn send(&self, req: ChatRequest) -> Result<ChatResponse, TransportError> {
        return self.post("/chatbot/", &req).await;
    }

    #[allow(clippy::implicit_return)]
    async fn quick_suggestions(
        &self,
        req: QuickSuggestionRequest,
    ) -> Result<serde_json::Value, TransportError> {
        return self.post("/chatbot/quick-suggestions/", &req).await;
    }
}
