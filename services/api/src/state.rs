//! Application state shared across handlers

use std::sync::Arc;

use auth::session::SessionManager;
use auth::users::UserAdmin;
use sqlx::PgPool;

use crate::receipts::ReceiptDispatcher;
use crate::store::ChurchStore;

/// Application state shared across handlers. Exactly one session
/// manager and one data store live in the process; handlers share them
/// through here.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub session: Arc<SessionManager>,
    pub store: Arc<ChurchStore>,
    pub receipts: Arc<ReceiptDispatcher>,
    pub user_admin: Arc<UserAdmin>,
}
