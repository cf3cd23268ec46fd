#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use thiserror::Error;
use tokio::sync::watch;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// Identity provider settings, one per environment variable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,
    pub measurement_id: String,
}

impl FirebaseConfig {
    pub fn from_config() -> FirebaseConfig {
        return FirebaseConfig {
            api_key: Config::get(ConfigKey::FirebaseApiKey),
            auth_domain: Config::get(ConfigKey::FirebaseAuthDomain),
            project_id: Config::get(ConfigKey::FirebaseProjectId),
            storage_bucket: Config::get(ConfigKey::FirebaseStorageBucket),
            messaging_sender_id: Config::get(ConfigKey::FirebaseMessagingSenderId),
            app_id: Config::get(ConfigKey::FirebaseAppId),
            measurement_id: Config::get(ConfigKey::FirebaseMeasurementId),
        };
    }

    /// Field names paired with whether a value is present. Values themselves
    /// never leave this struct.
    pub fn presence(&self) -> Vec<(&'static str, bool)> {
        return vec![
            ("apiKey", !self.api_key.is_empty()),
            ("authDomain", !self.auth_domain.is_empty()),
            ("projectId", !self.project_id.is_empty()),
            ("storageBucket", !self.storage_bucket.is_empty()),
            ("messagingSenderId", !self.messaging_sender_id.is_empty()),
            ("appId", !self.app_id.is_empty()),
            ("measurementId", !self.measurement_id.is_empty()),
        ];
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = ["apiKey", "authDomain", "projectId"];
        let missing = self
            .presence()
            .into_iter()
            .filter(|(name, present)| return required.contains(name) && !present)
            .map(|(name, _)| return name)
            .collect::<Vec<&'static str>>();

        if !missing.is_empty() {
            return Err(ConfigError::MissingFields(missing));
        }

        return Ok(());
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Persistence {
    /// Survives process restarts.
    Local,
    /// Lives only as long as the process.
    Session,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    pub email: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
    /// Unix seconds after which `id_token` must be refreshed.
    pub expires_at: i64,
}

#[async_trait]
pub trait IdentityProvider {
    async fn set_persistence(&self, persistence: Persistence) -> Result<()>;

    /// Receives the signed in user on every sign-in or sign-out transition.
    /// Token refreshes of an already signed in user are not transitions.
    fn subscribe(&self) -> watch::Receiver<Option<User>>;

    fn current_user(&self) -> Option<User>;

    /// Returns the current user's id token. `force_refresh` skips the cached
    /// token even if it has not expired yet.
    async fn get_id_token(&self, force_refresh: bool) -> Result<String>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<User>;

    async fn sign_out(&self) -> Result<()>;
}

pub type AuthClient = Arc<dyn IdentityProvider + Send + Sync>;
