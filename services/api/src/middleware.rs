//! Session middleware and permission gates
//!
//! The middleware rejects requests while no operator session is live.
//! The gate helpers run per handler: reads need the fine-grained
//! permission key, mutations additionally need the coarse role check.
//! Both checks run locally against the resolved roles; denial never
//! reaches the remote store.

use axum::{extract::Request, extract::State, middleware::Next, response::Response};

use crate::{error::ApiError, state::AppState};

/// Reject the request when no operator session is live
pub async fn require_session(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !state.session.is_authenticated() {
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(req).await)
}

/// Fine-grained gate: the permission map must grant the key
pub fn ensure_view(state: &AppState, permission: &str) -> Result<(), ApiError> {
    if state.session.has_permission(permission) {
        Ok(())
    } else {
        Err(ApiError::PermissionDenied(permission.to_string()))
    }
}

/// Mutation gate: the coarse role check and the fine-grained key must
/// both pass. The two checks are independent; an admin role with an
/// empty permission map still fails here.
pub fn ensure_manage(state: &AppState, permission: &str) -> Result<(), ApiError> {
    if !state.session.can_manage_records() {
        return Err(ApiError::PermissionDenied("record management".to_string()));
    }
    ensure_view(state, permission)
}

/// Super-admin-only gate for user management
pub fn ensure_super_admin(state: &AppState) -> Result<(), ApiError> {
    if state.session.is_super_admin() {
        Ok(())
    } else {
        Err(ApiError::PermissionDenied("user management".to_string()))
    }
}
