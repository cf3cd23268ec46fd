#[cfg(test)]
#[path = "auth_session_test.rs"]
mod tests;

use tokio::task::JoinHandle;

use crate::domain::models::AuthClient;
use crate::domain::models::ConfigError;
use crate::domain::models::FirebaseConfig;
use crate::domain::models::Persistence;
use crate::infrastructure::identity::IdentityManager;

async fn request_persistence(client: AuthClient) {
    match client.set_persistence(Persistence::Local).await {
        Ok(_) => {
            tracing::info!("Auth persistence set to local");
        }
        Err(err) => {
            tracing::error!(error = ?err, "Failed to set auth persistence");
        }
    }
}

async fn refresh_token(client: &AuthClient) {
    match client.get_id_token(true).await {
        Ok(token) => {
            tracing::info!(token_length = token.len(), "Refreshed id token");
        }
        Err(err) => {
            tracing::error!(error = ?err, "Failed to refresh id token");
        }
    }
}

async fn listen(client: AuthClient) {
    let mut rx = client.subscribe();

    let initial = rx.borrow_and_update().clone();
    if let Some(user) = initial {
        tracing::info!(uid = user.uid, "User already signed in");
        refresh_token(&client).await;
    }

    while rx.changed().await.is_ok() {
        let user = rx.borrow_and_update().clone();
        match user {
            Some(user) => {
                tracing::info!(uid = user.uid, "User signed in");
                refresh_token(&client).await;
            }
            None => {
                tracing::info!("User signed out");
            }
        }
    }

    tracing::debug!("Auth state listener stopped");
}

/// Process wide identity provider session. Owns the background tasks started
/// on construction, which live until the session is dropped.
pub struct AuthSession {
    client: AuthClient,
    persistence: JoinHandle<()>,
    listener: JoinHandle<()>,
}

impl AuthSession {
    /// Validates the config, then builds the client with `connect`. Durable
    /// persistence is requested in the background, so this returns before it
    /// is confirmed.
    pub fn initialize<F>(config: &FirebaseConfig, connect: F) -> Result<AuthSession, ConfigError>
    where
        F: FnOnce(&FirebaseConfig) -> AuthClient,
    {
        let presence = config
            .presence()
            .into_iter()
            .map(|(name, present)| {
                let state = if present { "set" } else { "missing" };
                return format!("{name}={state}");
            })
            .collect::<Vec<String>>()
            .join(", ");
        tracing::debug!(fields = presence, "Firebase config");

        if let Err(err) = config.validate() {
            tracing::error!(error = %err, "Firebase config is invalid, skipping auth");
            return Err(err);
        }

        let client = connect(config);
        tracing::info!(project_id = config.project_id, "Identity provider initialized");

        let persistence = tokio::spawn(request_persistence(client.clone()));
        let listener = tokio::spawn(listen(client.clone()));

        return Ok(AuthSession {
            client,
            persistence,
            listener,
        });
    }

    /// Starts a session against Firebase. A bad config disables auth rather
    /// than failing the process.
    pub fn bootstrap(config: &FirebaseConfig) -> Option<AuthSession> {
        match AuthSession::initialize(config, IdentityManager::connect) {
            Ok(session) => return Some(session),
            Err(err) => {
                tracing::warn!(error = %err, "Auth is unavailable");
                return None;
            }
        }
    }

    pub fn client(&self) -> AuthClient {
        return self.client.clone();
    }
}

impl Drop for AuthSession {
    fn drop(&mut self) {
        self.persistence.abort();
        self.listener.abort();
    }
}
