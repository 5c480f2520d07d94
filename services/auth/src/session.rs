//! Process-wide session state
//!
//! Tracks whether the operator is authenticated and exposes the current
//! identity and resolved roles to the rest of the application. The
//! manager is constructed by the entry point and passed by handle; its
//! lifecycle is driven by provider callbacks, never by polling. Exactly
//! one live instance exists per process.

use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use anyhow::Result;
use tracing::{error, info, warn};
use uuid::Uuid;

use common::cache::RedisPool;

use crate::models::{AuthEvent, AuthSession, Identity, Role, SignOutScope};
use crate::permissions;
use crate::provider::{AuthProvider, Subscription};
use crate::resolver::RoleResolver;
use crate::validation;

/// Bounded wait for role loading during initialization and sign-in
const ROLE_LOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Cache key under which the provider session is persisted
const SESSION_CACHE_KEY: &str = "auth:session";

fn encode_session(session: &AuthSession) -> Option<String> {
    serde_json::to_string(session).ok()
}

/// Unreadable cached data is treated as no session, never an error.
fn decode_session(raw: &str) -> Option<AuthSession> {
    serde_json::from_str(raw).ok()
}

#[derive(Debug, Default)]
struct SessionState {
    user: Option<Identity>,
    roles: Vec<Role>,
    loading: bool,
}

/// Session manager: the single authority for "who is signed in" and
/// "what are they allowed to do" in this process.
pub struct SessionManager {
    provider: Arc<dyn AuthProvider>,
    resolver: Arc<dyn RoleResolver>,
    cache: Option<RedisPool>,
    state: RwLock<SessionState>,
    subscription: Mutex<Option<Subscription>>,
}

impl SessionManager {
    /// Create a new session manager. The provider and resolver are
    /// injected; no module-level singleton exists.
    pub fn new(
        provider: Arc<dyn AuthProvider>,
        resolver: Arc<dyn RoleResolver>,
        cache: Option<RedisPool>,
    ) -> Self {
        Self {
            provider,
            resolver,
            cache,
            state: RwLock::new(SessionState {
                user: None,
                roles: Vec::new(),
                loading: true,
            }),
            subscription: Mutex::new(None),
        }
    }

    /// Query the provider for an existing session and resolve roles.
    /// Ends in Authenticated or Anonymous; a provider error means
    /// Anonymous with empty roles, never a hang.
    pub async fn initialize(self: &Arc<Self>) -> Result<()> {
        info!("Initializing session");

        match self.provider.get_session().await {
            Ok(Some(session)) => {
                self.set_user(session.user.clone());
                self.load_roles(session.user.id).await;
            }
            Ok(None) => match self.restore_cached_session().await {
                Some(session) => {
                    info!("Restored persisted session for {}", session.user.email);
                    self.set_user(session.user.clone());
                    self.load_roles(session.user.id).await;
                }
                None => {
                    info!("No existing session; starting anonymous");
                    self.clear_local();
                }
            },
            Err(e) => {
                error!("Session check failed: {}; starting anonymous", e);
                self.clear_local();
            }
        }

        self.state.write().unwrap().loading = false;
        self.attach_provider_events();

        Ok(())
    }

    /// Subscribe to provider push events. Each event is handled on its
    /// own task so the provider callback never blocks.
    fn attach_provider_events(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        let subscription = self.provider.subscribe(Arc::new(move |event, session| {
            if let Some(manager) = weak.upgrade() {
                tokio::spawn(async move {
                    manager.handle_auth_event(event, session).await;
                });
            }
        }));

        *self.subscription.lock().unwrap() = Some(subscription);
    }

    /// Apply a provider-pushed auth state transition
    pub async fn handle_auth_event(&self, event: AuthEvent, session: Option<AuthSession>) {
        info!("Auth state change: {:?}", event);

        match session {
            Some(session) if event != AuthEvent::SignedOut => {
                self.set_user(session.user.clone());
                self.persist_session(&session).await;
                self.load_roles(session.user.id).await;
            }
            _ => {
                self.discard_cached_session().await;
                self.clear_local();
            }
        }

        self.state.write().unwrap().loading = false;
    }

    /// Sign in with email and password through the provider
    pub async fn sign_in(self: &Arc<Self>, email: &str, password: &str) -> Result<Identity> {
        validation::validate_email(email).map_err(|e| anyhow::anyhow!(e))?;

        let session = self.provider.sign_in_with_password(email, password).await?;
        self.set_user(session.user.clone());
        self.persist_session(&session).await;
        self.load_roles(session.user.id).await;
        self.state.write().unwrap().loading = false;

        Ok(session.user)
    }

    /// Register a new account with the provider. Registration does not
    /// sign the operator in; the provider confirms the address first.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Identity> {
        validation::validate_email(email).map_err(|e| anyhow::anyhow!(e))?;
        validation::validate_password(password).map_err(|e| anyhow::anyhow!(e))?;

        self.provider.sign_up(email, password).await
    }

    /// Sign out with global scope (invalidate on all devices).
    ///
    /// Local identity, roles, and all locally persisted state are cleared
    /// even when the provider call fails; the provider error is surfaced
    /// only after the local session is already anonymous.
    pub async fn sign_out(&self) -> Result<()> {
        info!("Signing out");

        let result = self.provider.sign_out(SignOutScope::Global).await;
        if let Err(e) = &result {
            error!("Provider sign-out failed: {}", e);
        }

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.flush().await {
                warn!("Failed to flush local cache on sign-out: {}", e);
            }
        }

        self.clear_local();
        result
    }

    /// Drop the provider subscription. Called on application teardown.
    pub fn shutdown(&self) {
        if let Some(subscription) = self.subscription.lock().unwrap().take() {
            self.provider.unsubscribe(subscription);
        }
    }

    /// Persist the provider session so a restart can restore the
    /// identity before the provider is consulted again. Cache failures
    /// only degrade persistence, never the sign-in itself.
    async fn persist_session(&self, session: &AuthSession) {
        let Some(cache) = &self.cache else { return };
        let Some(encoded) = encode_session(session) else {
            return;
        };

        if let Err(e) = cache.set(SESSION_CACHE_KEY, &encoded, None).await {
            warn!("Failed to persist session to the cache: {}", e);
        }
    }

    async fn restore_cached_session(&self) -> Option<AuthSession> {
        let cache = self.cache.as_ref()?;

        match cache.get(SESSION_CACHE_KEY).await {
            Ok(Some(raw)) => decode_session(&raw),
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to read persisted session: {}", e);
                None
            }
        }
    }

    async fn discard_cached_session(&self) {
        let Some(cache) = &self.cache else { return };

        if let Err(e) = cache.delete(SESSION_CACHE_KEY).await {
            warn!("Failed to discard persisted session: {}", e);
        }
    }

    async fn load_roles(&self, user_id: Uuid) {
        let resolved =
            match tokio::time::timeout(ROLE_LOAD_TIMEOUT, self.resolver.resolve_roles(user_id))
                .await
            {
                Ok(roles) => roles,
                Err(_) => {
                    warn!("Role loading timed out for user {}", user_id);
                    Vec::new()
                }
            };

        // Zero assignments means the minimal default role, not a lockout.
        let roles = if resolved.is_empty() {
            info!(
                "No role assignments for user {}; using the default role",
                user_id
            );
            vec![permissions::default_role()]
        } else {
            resolved
        };

        self.state.write().unwrap().roles = roles;
    }

    fn set_user(&self, user: Identity) {
        self.state.write().unwrap().user = Some(user);
    }

    fn clear_local(&self) {
        let mut state = self.state.write().unwrap();
        state.user = None;
        state.roles.clear();
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().unwrap().user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().unwrap().loading
    }

    pub fn current_user(&self) -> Option<Identity> {
        self.state.read().unwrap().user.clone()
    }

    pub fn roles(&self) -> Vec<Role> {
        self.state.read().unwrap().roles.clone()
    }

    /// Fine-grained permission check against the resolved role set
    pub fn has_permission(&self, permission: &str) -> bool {
        permissions::is_allowed(&self.state.read().unwrap().roles, permission)
    }

    pub fn is_admin(&self) -> bool {
        permissions::is_admin(&self.state.read().unwrap().roles)
    }

    pub fn is_super_admin(&self) -> bool {
        permissions::is_super_admin(&self.state.read().unwrap().roles)
    }

    /// Coarse role-name gate for mutating actions
    pub fn can_manage_records(&self) -> bool {
        permissions::can_manage_records(&self.state.read().unwrap().roles)
    }
}
