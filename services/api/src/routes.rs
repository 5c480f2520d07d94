//! HTTP surface of the application service
//!
//! Everything under the protected set requires a live operator session;
//! each handler then runs its own permission gate before touching the
//! store.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::{ensure_manage, ensure_super_admin, ensure_view, require_session},
    models::{
        FollowUpStatus, NewAttendanceRecord, NewDonation, NewEquipment, NewMember,
        NewMessageTemplate, NewVisitor, UpdateEquipment, UpdateMember,
    },
    state::AppState,
};

/// Create the router for the application service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/members", get(list_members).post(create_member))
        .route("/members/:id", put(update_member).delete(delete_member))
        .route("/attendance", get(list_attendance).post(record_attendance))
        .route("/donations", get(list_donations).post(record_donation))
        .route("/visitors", get(list_visitors).post(record_visitor))
        .route("/visitors/:id/follow-up", put(update_follow_up))
        .route("/equipment", get(list_equipment).post(register_equipment))
        .route(
            "/equipment/:id",
            put(update_equipment).delete(delete_equipment),
        )
        .route("/templates", get(list_templates).post(create_template))
        .route("/templates/:id", delete(delete_template))
        .route("/roles", get(list_roles))
        .route("/users", post(create_user))
        .route("/users/:id/role", put(update_user_role))
        .route("/data/refresh", post(refresh_data))
        .route("/auth/logout", post(sign_out))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/login", post(sign_in))
        .route("/auth/signup", post(sign_up))
        .route("/auth/session", get(session_info))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "church-api",
    }))
}

// Auth

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Establish the operator session and load the collections
pub async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth::validation::validate_email(&payload.email).map_err(ApiError::BadRequest)?;

    let user = state
        .session
        .sign_in(&payload.email, &payload.password)
        .await
        .map_err(|e| ApiError::Provider(e.to_string()))?;

    // A failed load leaves the operator signed in with empty
    // collections; a refresh can retry.
    if let Err(e) = state.store.load_all().await {
        warn!("Initial data load failed: {}", e);
    }

    Ok(Json(json!({ "user": user })))
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

/// Register a new account. Registration does not sign the operator in.
pub async fn sign_up(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth::validation::validate_email(&payload.email).map_err(ApiError::BadRequest)?;
    auth::validation::validate_password(&payload.password).map_err(ApiError::BadRequest)?;

    let user = state
        .session
        .sign_up(&payload.email, &payload.password)
        .await
        .map_err(|e| ApiError::Provider(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

/// Report the current session state
pub async fn session_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "authenticated": state.session.is_authenticated(),
        "loading": state.session.is_loading(),
        "user": state.session.current_user(),
        "roles": state.session.roles(),
    }))
}

/// End the operator session. Local state clears even when the provider
/// call fails; the failure still surfaces to the caller.
pub async fn sign_out(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    state
        .session
        .sign_out()
        .await
        .map_err(|e| ApiError::Provider(e.to_string()))?;

    Ok(Json(json!({ "message": "Signed out" })))
}

/// Re-fetch all six collections from the store
pub async fn refresh_data(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    state.store.load_all().await?;
    Ok(Json(json!({ "message": "Data refreshed" })))
}

// Members

pub async fn list_members(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    ensure_view(&state, "members")?;
    Ok(Json(state.store.members()))
}

pub async fn create_member(
    State(state): State<AppState>,
    Json(payload): Json<NewMember>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_manage(&state, "members")?;
    let member = state.store.add_member(payload).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMember>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_manage(&state, "members")?;
    let member = state.store.update_member(id, payload).await?;
    Ok(Json(member))
}

pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_manage(&state, "members")?;
    state.store.remove_member(id).await?;
    Ok(Json(json!({ "message": "Member deleted" })))
}

// Attendance

pub async fn list_attendance(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    ensure_view(&state, "attendance")?;
    Ok(Json(state.store.attendance()))
}

pub async fn record_attendance(
    State(state): State<AppState>,
    Json(payload): Json<NewAttendanceRecord>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_manage(&state, "attendance")?;
    let record = state.store.record_attendance(payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

// Donations

pub async fn list_donations(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    ensure_view(&state, "finances")?;
    Ok(Json(state.store.donations()))
}

pub async fn record_donation(
    State(state): State<AppState>,
    Json(payload): Json<NewDonation>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_manage(&state, "finances")?;
    let donation = state.store.add_donation(payload).await?;

    if !donation.receipt_sent {
        state
            .receipts
            .schedule(Arc::clone(&state.store), donation.id);
    }

    Ok((StatusCode::CREATED, Json(donation)))
}

// Visitors

#[derive(Debug, Deserialize)]
pub struct FollowUpRequest {
    pub follow_up_status: FollowUpStatus,
}

pub async fn list_visitors(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    ensure_view(&state, "visitors")?;
    Ok(Json(state.store.visitors()))
}

pub async fn record_visitor(
    State(state): State<AppState>,
    Json(payload): Json<NewVisitor>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_manage(&state, "visitors")?;
    let visitor = state.store.add_visitor(payload).await?;
    Ok((StatusCode::CREATED, Json(visitor)))
}

pub async fn update_follow_up(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FollowUpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_manage(&state, "visitors")?;
    let visitor = state
        .store
        .set_visitor_follow_up(id, payload.follow_up_status)
        .await?;
    Ok(Json(visitor))
}

// Equipment

pub async fn list_equipment(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    ensure_view(&state, "equipment")?;
    Ok(Json(state.store.equipment()))
}

pub async fn register_equipment(
    State(state): State<AppState>,
    Json(payload): Json<NewEquipment>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_manage(&state, "equipment")?;
    let equipment = state.store.add_equipment(payload).await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

pub async fn update_equipment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEquipment>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_manage(&state, "equipment")?;
    let equipment = state.store.update_equipment(id, payload).await?;
    Ok(Json(equipment))
}

pub async fn delete_equipment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_manage(&state, "equipment")?;
    state.store.remove_equipment(id).await?;
    Ok(Json(json!({ "message": "Equipment deleted" })))
}

// Message templates

pub async fn list_templates(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    ensure_view(&state, "communications")?;
    Ok(Json(state.store.templates()))
}

pub async fn create_template(
    State(state): State<AppState>,
    Json(payload): Json<NewMessageTemplate>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_view(&state, "communications")?;
    let template = state.store.add_template(payload).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_view(&state, "communications")?;
    state.store.remove_template(id).await?;
    Ok(Json(json!({ "message": "Template deleted" })))
}

// User management, super admin only

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

pub async fn list_roles(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    ensure_super_admin(&state)?;
    let roles = state
        .user_admin
        .list_roles()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok(Json(roles))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_super_admin(&state)?;
    let user = state
        .user_admin
        .create_user(&payload.email, &payload.password, &payload.role)
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_super_admin(&state)?;
    state
        .user_admin
        .update_user_role(id, &payload.role)
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok(Json(json!({ "message": "Role updated" })))
}
