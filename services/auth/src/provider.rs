//! External auth provider boundary
//!
//! Email/password sign-up and sign-in, session retrieval, global sign-out,
//! and auth-state push notifications are delegated to the hosted identity
//! provider. This module only consumes its session object and subscribes
//! to its change events; subscribers are notified on transitions, the core
//! never polls.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{AuthEvent, AuthSession, Identity, SignOutScope};

/// Callback invoked by the provider on auth state transitions
pub type AuthCallback = Arc<dyn Fn(AuthEvent, Option<AuthSession>) + Send + Sync>;

/// Registration handle returned by [`AuthProvider::subscribe`]; pass it
/// back to `unsubscribe` to stop receiving events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(pub(crate) u64);

/// The external identity boundary consumed by the session manager
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Retrieve the existing session, if any
    async fn get_session(&self) -> Result<Option<AuthSession>>;

    /// Sign in with email and password
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession>;

    /// Register a new account
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity>;

    /// Create a confirmed account through the provider's admin endpoint
    async fn admin_create_user(&self, email: &str, password: &str) -> Result<Identity>;

    /// Invalidate the session with the given scope
    async fn sign_out(&self, scope: SignOutScope) -> Result<()>;

    /// Register an observer for auth state transitions
    fn subscribe(&self, callback: AuthCallback) -> Subscription;

    /// Remove a previously registered observer
    fn unsubscribe(&self, subscription: Subscription);
}

/// Configuration for the hosted auth provider
#[derive(Debug, Clone)]
pub struct AuthProviderConfig {
    /// Base URL of the provider's auth API
    pub base_url: String,
    /// Public (anon) API key sent with every request
    pub anon_key: String,
    /// Service-role key for admin endpoints, if available
    pub service_role_key: Option<String>,
}

impl AuthProviderConfig {
    /// Create a new AuthProviderConfig from environment variables
    ///
    /// # Environment Variables
    /// - `AUTH_URL`: Base URL of the provider's auth API
    /// - `AUTH_ANON_KEY`: Public API key
    /// - `AUTH_SERVICE_ROLE_KEY`: Service-role key for admin endpoints (optional)
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("AUTH_URL")
            .map_err(|_| anyhow::anyhow!("AUTH_URL environment variable not set"))?;
        let anon_key = std::env::var("AUTH_ANON_KEY")
            .map_err(|_| anyhow::anyhow!("AUTH_ANON_KEY environment variable not set"))?;
        let service_role_key = std::env::var("AUTH_SERVICE_ROLE_KEY").ok();

        Ok(AuthProviderConfig {
            base_url,
            anon_key,
            service_role_key,
        })
    }
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    id: Uuid,
    email: String,
}

#[derive(Debug, Deserialize)]
struct TokenPayload {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    user: UserPayload,
}

/// Auth provider client speaking the hosted provider's HTTP API
pub struct HttpAuthProvider {
    http: reqwest::Client,
    config: AuthProviderConfig,
    current: Mutex<Option<AuthSession>>,
    subscribers: Mutex<Vec<(u64, AuthCallback)>>,
    next_subscriber_id: AtomicU64,
}

impl HttpAuthProvider {
    /// Create a new provider client
    pub fn new(config: AuthProviderConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            current: Mutex::new(None),
            subscribers: Mutex::new(Vec::new()),
            next_subscriber_id: AtomicU64::new(1),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Notify every subscriber of a transition. Callbacks run outside the
    /// subscriber lock.
    fn notify(&self, event: AuthEvent, session: Option<&AuthSession>) {
        let callbacks: Vec<AuthCallback> = {
            let subscribers = self.subscribers.lock().unwrap();
            subscribers.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };

        for callback in callbacks {
            callback(event, session.cloned());
        }
    }

    fn session_from_payload(payload: TokenPayload) -> AuthSession {
        let expires_at = payload
            .expires_in
            .map(|seconds| Utc::now() + Duration::seconds(seconds));

        AuthSession {
            user: Identity {
                id: payload.user.id,
                email: payload.user.email,
            },
            access_token: payload.access_token,
            refresh_token: payload.refresh_token,
            expires_at,
        }
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn get_session(&self) -> Result<Option<AuthSession>> {
        Ok(self.current.lock().unwrap().clone())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession> {
        info!("Signing in with the auth provider: {}", email);

        let response = self
            .http
            .post(self.endpoint("/token?grant_type=password"))
            .header("apikey", &self.config.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .context("auth provider unreachable")?
            .error_for_status()
            .context("sign-in rejected by the auth provider")?;

        let payload: TokenPayload = response
            .json()
            .await
            .context("malformed token response from the auth provider")?;

        let session = Self::session_from_payload(payload);
        *self.current.lock().unwrap() = Some(session.clone());
        self.notify(AuthEvent::SignedIn, Some(&session));

        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity> {
        info!("Registering new account: {}", email);

        let response = self
            .http
            .post(self.endpoint("/signup"))
            .header("apikey", &self.config.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .context("auth provider unreachable")?
            .error_for_status()
            .context("sign-up rejected by the auth provider")?;

        let payload: UserPayload = response
            .json()
            .await
            .context("malformed sign-up response from the auth provider")?;

        Ok(Identity {
            id: payload.id,
            email: payload.email,
        })
    }

    async fn admin_create_user(&self, email: &str, password: &str) -> Result<Identity> {
        let service_key = self
            .config
            .service_role_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("AUTH_SERVICE_ROLE_KEY not configured"))?;

        info!("Creating confirmed account via admin endpoint: {}", email);

        let response = self
            .http
            .post(self.endpoint("/admin/users"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(service_key)
            .json(&json!({
                "email": email,
                "password": password,
                "email_confirm": true,
            }))
            .send()
            .await
            .context("auth provider unreachable")?
            .error_for_status()
            .context("admin user creation rejected by the auth provider")?;

        let payload: UserPayload = response
            .json()
            .await
            .context("malformed admin response from the auth provider")?;

        Ok(Identity {
            id: payload.id,
            email: payload.email,
        })
    }

    async fn sign_out(&self, scope: SignOutScope) -> Result<()> {
        // The stored token is dropped before the remote call so the local
        // session is gone even when the provider cannot be reached.
        let session = self.current.lock().unwrap().take();

        let result = match session {
            Some(session) => {
                info!("Signing out with scope: {}", scope.as_str());
                let sent = self
                    .http
                    .post(self.endpoint(&format!("/logout?scope={}", scope.as_str())))
                    .header("apikey", &self.config.anon_key)
                    .bearer_auth(&session.access_token)
                    .send()
                    .await
                    .context("auth provider unreachable");

                // Subscribers are notified below even when the call failed.
                sent.and_then(|response| {
                    response
                        .error_for_status()
                        .context("sign-out rejected by the auth provider")
                        .map(|_| ())
                })
            }
            None => {
                warn!("Sign-out requested without an active session");
                Ok(())
            }
        };

        self.notify(AuthEvent::SignedOut, None);
        result
    }

    fn subscribe(&self, callback: AuthCallback) -> Subscription {
        let id = self.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.lock().unwrap().push((id, callback));
        Subscription(id)
    }

    fn unsubscribe(&self, subscription: Subscription) {
        self.subscribers
            .lock()
            .unwrap()
            .retain(|(id, _)| *id != subscription.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::atomic::AtomicUsize;

    #[test]
    #[serial]
    fn test_provider_config_from_env() {
        unsafe {
            std::env::set_var("AUTH_URL", "https://auth.example.com/auth/v1");
            std::env::set_var("AUTH_ANON_KEY", "anon-key");
            std::env::remove_var("AUTH_SERVICE_ROLE_KEY");
        }

        let config = AuthProviderConfig::from_env().unwrap();
        assert_eq!(config.base_url, "https://auth.example.com/auth/v1");
        assert_eq!(config.anon_key, "anon-key");
        assert!(config.service_role_key.is_none());

        unsafe {
            std::env::remove_var("AUTH_URL");
            std::env::remove_var("AUTH_ANON_KEY");
        }
    }

    #[test]
    #[serial]
    fn test_provider_config_requires_url() {
        unsafe {
            std::env::remove_var("AUTH_URL");
            std::env::remove_var("AUTH_ANON_KEY");
        }

        assert!(AuthProviderConfig::from_env().is_err());
    }

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let provider = HttpAuthProvider::new(AuthProviderConfig {
            base_url: "http://localhost:9999".to_string(),
            anon_key: "anon".to_string(),
            service_role_key: None,
        });

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let subscription = provider.subscribe(Arc::new(move |event, session| {
            assert_eq!(event, AuthEvent::SignedOut);
            assert!(session.is_none());
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        provider.notify(AuthEvent::SignedOut, None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        provider.unsubscribe(subscription);
        provider.notify(AuthEvent::SignedOut, None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sign_out_without_session_is_noop() {
        let provider = HttpAuthProvider::new(AuthProviderConfig {
            base_url: "http://localhost:9999".to_string(),
            anon_key: "anon".to_string(),
            service_role_key: None,
        });

        // No remote call is made when there is no stored session.
        provider.sign_out(SignOutScope::Global).await.unwrap();
        assert!(provider.get_session().await.unwrap().is_none());
    }
}
