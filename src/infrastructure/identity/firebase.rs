#[cfg(test)]
#[path = "firebase_test.rs"]
mod tests;

use std::path::PathBuf;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use tokio::fs;
use tokio::sync::watch;
use tokio::sync::RwLock;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::FirebaseConfig;
use crate::domain::models::IdentityProvider;
use crate::domain::models::Persistence;
use crate::domain::models::User;

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com";
const SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com";

/// Tokens this close to expiry are refreshed even without a forced refresh.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest {
    email: String,
    password: String,
    return_secure_token: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    email: Option<String>,
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

fn expires_at(expires_in: &str) -> Result<i64> {
    return Ok(Utc::now().timestamp() + expires_in.parse::<i64>()?);
}

async fn error_message(res: reqwest::Response) -> String {
    let status = res.status().as_u16();
    match res.json::<ErrorResponse>().await {
        Ok(body) => return body.error.message,
        Err(_) => return format!("status {status}"),
    }
}

/// Identity provider client for Firebase Authentication, spoken to over its
/// REST API. The signed in user lives in a watch channel so every subscriber
/// observes sign-in and sign-out transitions.
pub struct FirebaseAuth {
    api_key: String,
    project_id: String,
    identity_url: String,
    token_url: String,
    state_dir: PathBuf,
    persistence: RwLock<Persistence>,
    user_tx: watch::Sender<Option<User>>,
    client: reqwest::Client,
}

impl FirebaseAuth {
    pub fn new(config: &FirebaseConfig) -> FirebaseAuth {
        return FirebaseAuth::with_urls(
            config,
            IDENTITY_TOOLKIT_URL,
            SECURE_TOKEN_URL,
            PathBuf::from(Config::get(ConfigKey::AuthDir)),
        );
    }

    pub fn with_urls(
        config: &FirebaseConfig,
        identity_url: &str,
        token_url: &str,
        state_dir: PathBuf,
    ) -> FirebaseAuth {
        let (user_tx, _) = watch::channel(None);

        return FirebaseAuth {
            api_key: config.api_key.to_string(),
            project_id: config.project_id.to_string(),
            identity_url: identity_url.to_string(),
            token_url: token_url.to_string(),
            state_dir,
            persistence: RwLock::new(Persistence::Session),
            user_tx,
            client: reqwest::Client::new(),
        };
    }

    pub fn state_file(&self) -> PathBuf {
        return self.state_dir.join(format!("{}.json", self.project_id));
    }

    async fn load_user(&self) -> Result<Option<User>> {
        let file_path = self.state_file();
        if !file_path.exists() {
            return Ok(None);
        }

        let payload = fs::read_to_string(file_path).await?;
        let user: User = serde_json::from_str(&payload)?;

        return Ok(Some(user));
    }

    async fn save_user(&self, user: &User) -> Result<()> {
        if *self.persistence.read().await != Persistence::Local {
            return Ok(());
        }

        if !self.state_dir.exists() {
            fs::create_dir_all(&self.state_dir).await?;
        }

        fs::write(self.state_file(), serde_json::to_string(user)?).await?;

        return Ok(());
    }

    async fn remove_user(&self) -> Result<()> {
        let file_path = self.state_file();
        if !file_path.exists() {
            return Ok(());
        }

        fs::remove_file(file_path).await?;
        return Ok(());
    }

    async fn refresh(&self, user: &User) -> Result<User> {
        let res = self
            .client
            .post(format!(
                "{url}/v1/token?key={key}",
                url = self.token_url,
                key = self.api_key
            ))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", user.refresh_token.as_str()),
            ])
            .send()
            .await?;

        if !res.status().is_success() {
            let message = error_message(res).await;
            tracing::error!(reason = message, "Firebase token refresh failed");
            bail!(format!("Token refresh failed: {message}"));
        }

        let body = res.json::<RefreshResponse>().await?;
        return Ok(User {
            uid: body.user_id,
            email: user.email.clone(),
            id_token: body.id_token,
            refresh_token: body.refresh_token,
            expires_at: expires_at(&body.expires_in)?,
        });
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuth {
    #[allow(clippy::implicit_return)]
    async fn set_persistence(&self, persistence: Persistence) -> Result<()> {
        *self.persistence.write().await = persistence;

        if persistence == Persistence::Session {
            return self.remove_user().await;
        }

        if let Some(user) = self.current_user() {
            return self.save_user(&user).await;
        }

        if let Some(user) = self.load_user().await? {
            tracing::debug!(uid = user.uid, "Restored persisted Firebase user");
            self.user_tx.send_replace(Some(user));
        }

        return Ok(());
    }

    fn subscribe(&self) -> watch::Receiver<Option<User>> {
        return self.user_tx.subscribe();
    }

    fn current_user(&self) -> Option<User> {
        return self.user_tx.borrow().clone();
    }

    #[allow(clippy::implicit_return)]
    async fn get_id_token(&self, force_refresh: bool) -> Result<String> {
        let user = self
            .current_user()
            .ok_or_else(|| return anyhow!("No user is signed in"))?;

        if !force_refresh && user.expires_at - EXPIRY_MARGIN_SECS > Utc::now().timestamp() {
            return Ok(user.id_token);
        }

        let refreshed = self.refresh(&user).await?;
        let id_token = refreshed.id_token.to_string();

        // Refreshing is not a sign-in transition, subscribers are left alone.
        let mut still_signed_in = false;
        self.user_tx.send_if_modified(|current| {
            if let Some(current_user) = current {
                if current_user.uid == refreshed.uid {
                    *current_user = refreshed.clone();
                    still_signed_in = true;
                }
            }
            return false;
        });

        if still_signed_in {
            self.save_user(&refreshed).await?;
        }

        return Ok(id_token);
    }

    #[allow(clippy::implicit_return)]
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<User> {
        let req = SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
            return_secure_token: true,
        };

        let res = self
            .client
            .post(format!(
                "{url}/v1/accounts:signInWithPassword?key={key}",
                url = self.identity_url,
                key = self.api_key
            ))
            .json(&req)
            .send()
            .await?;

        if !res.status().is_success() {
            let message = error_message(res).await;
            tracing::error!(reason = message, "Firebase sign in failed");
            bail!(format!("Sign in failed: {message}"));
        }

        let body = res.json::<SignInResponse>().await?;
        let user = User {
            uid: body.local_id,
            email: body.email,
            id_token: body.id_token,
            refresh_token: body.refresh_token,
            expires_at: expires_at(&body.expires_in)?,
        };

        self.save_user(&user).await?;
        self.user_tx.send_replace(Some(user.clone()));

        return Ok(user);
    }

    #[allow(clippy::implicit_return)]
    async fn sign_out(&self) -> Result<()> {
        self.user_tx.send_replace(None);
        return self.remove_user().await;
    }
}
