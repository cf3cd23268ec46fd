use std::sync::Arc;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use test_utils::chat_response_fixture;
use tokio::sync::watch;

use super::SocialSyncApi;
use crate::domain::models::AuthClient;
use crate::domain::models::ChatRequest;
use crate::domain::models::ChatTransport;
use crate::domain::models::IdentityProvider;
use crate::domain::models::Persistence;
use crate::domain::models::QuickSuggestionRequest;
use crate::domain::models::TransportError;
use crate::domain::models::User;

struct SignedInIdentity {
    tx: watch::Sender<Option<User>>,
    fail_token: bool,
}

impl SignedInIdentity {
    fn client(user: Option<User>, fail_token: bool) -> AuthClient {
        let (tx, _rx) = watch::channel(user);
        return Arc::new(SignedInIdentity { tx, fail_token });
    }
}

#[async_trait]
impl IdentityProvider for SignedInIdentity {
    #[allow(clippy::implicit_return)]
    async fn set_persistence(&self, _persistence: Persistence) -> Result<()> {
        return Ok(());
    }

    fn subscribe(&self) -> watch::Receiver<Option<User>> {
        return self.tx.subscribe();
    }

    fn current_user(&self) -> Option<User> {
        return self.tx.borrow().clone();
    }

    #[allow(clippy::implicit_return)]
    async fn get_id_token(&self, _force_refresh: bool) -> Result<String> {
        if self.fail_token {
            bail!("Token refresh failed");
        }
        return Ok("token-1".to_string());
    }

    #[allow(clippy::implicit_return)]
    async fn sign_in_with_password(&self, _email: &str, _password: &str) -> Result<User> {
        bail!("Not supported");
    }

    #[allow(clippy::implicit_return)]
    async fn sign_out(&self) -> Result<()> {
        return Ok(());
    }
}

fn user() -> User {
    return User {
        uid: "user-1".to_string(),
        email: None,
        id_token: "token-1".to_string(),
        refresh_token: "refresh-1".to_string(),
        expires_at: 0,
    };
}

fn request() -> ChatRequest {
    return ChatRequest {
        query: "Generate 5 viral Instagram Reel ideas".to_string(),
        context: None,
        conversation_id: None,
    };
}

#[tokio::test]
async fn it_sends_a_chat_request() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chatbot/")
        .match_header("Content-Type", "application/json")
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "query": "Generate 5 viral Instagram Reel ideas",
            "context": null,
            "conversation_id": null
        })))
        .with_status(200)
        .with_body(chat_response_fixture())
        .create();

    let api = SocialSyncApi::with_url(format!("{}/", server.url()), None);
    let res = api.send(request()).await?;
    mock.assert();

    assert_eq!(res.conversation_id, Some("abc123".to_string()));
    assert_eq!(res.response_time, Some(1.8));
    assert_eq!(res.suggestions.unwrap().len(), 4);

    return Ok(());
}

#[tokio::test]
async fn it_attaches_bearer_token_for_signed_in_users() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chatbot/")
        .match_header("Authorization", "Bearer token-1")
        .with_status(200)
        .with_body(r#"{"response":"Hi"}"#)
        .create();

    let api = SocialSyncApi::with_url(server.url(), Some(SignedInIdentity::client(Some(user()), false)));
    let res = api.send(request()).await?;
    mock.assert();

    assert_eq!(res.response, "Hi");

    return Ok(());
}

#[tokio::test]
async fn it_sends_unauthenticated_when_signed_out_or_token_fails() -> Result<()> {
    for auth in [
        SignedInIdentity::client(None, false),
        SignedInIdentity::client(Some(user()), true),
    ] {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chatbot/")
            .match_header("Authorization", mockito::Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"response":"Hi"}"#)
            .create();

        let api = SocialSyncApi::with_url(server.url(), Some(auth));
        api.send(request()).await?;
        mock.assert();
    }

    return Ok(());
}

#[tokio::test]
async fn it_returns_status_with_detail() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chatbot/")
        .with_status(400)
        .with_body(r#"{"detail":"Query is too long"}"#)
        .create();

    let api = SocialSyncApi::with_url(server.url(), None);
    let err = api.send(request()).await.unwrap_err();
    mock.assert();

    assert_eq!(
        err,
        TransportError::Status {
            status: 400,
            detail: Some("Query is too long".to_string()),
        }
    );
    assert_eq!(err.user_message(), "Query is too long");

    return Ok(());
}

#[tokio::test]
async fn it_returns_status_without_detail() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chatbot/")
        .with_status(429)
        .with_body("Too Many Requests")
        .create();

    let api = SocialSyncApi::with_url(server.url(), None);
    let err = api.send(request()).await.unwrap_err();
    mock.assert();

    assert_eq!(
        err,
        TransportError::Status {
            status: 429,
            detail: None,
        }
    );

    return Ok(());
}

#[tokio::test]
async fn it_returns_decode_error_for_bad_bodies() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chatbot/")
        .with_status(200)
        .with_body("not json")
        .create();

    let api = SocialSyncApi::with_url(server.url(), None);
    let err = api.send(request()).await.unwrap_err();
    mock.assert();

    match err {
        TransportError::Decode(_) => (),
        _ => bail!("Wrong error {err:?}"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_returns_network_error_when_unreachable() {
    let api = SocialSyncApi::with_url("http://127.0.0.1:1".to_string(), None);
    let err = api.send(request()).await.unwrap_err();

    assert!(matches!(err, TransportError::Network(_)));
}

#[tokio::test]
async fn it_fetches_quick_suggestions() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chatbot/quick-suggestions/")
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "category": "content_ideas",
            "niche": "bakery",
            "platform": null
        })))
        .with_status(200)
        .with_body(r#"{"suggestions":["Behind the scenes","Recipe reels"]}"#)
        .create();

    let api = SocialSyncApi::with_url(server.url(), None);
    let res = api
        .quick_suggestions(QuickSuggestionRequest {
            category: "content_ideas".to_string(),
            niche: Some("bakery".to_string()),
            platform: None,
        })
        .await?;
    mock.assert();

    assert_eq!(res["suggestions"][1], "Recipe reels");

    return Ok(());
}
