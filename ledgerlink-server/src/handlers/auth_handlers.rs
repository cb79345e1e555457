use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{errors::AppResult, infra::app_state::AppState};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub auth: bool,
    pub token: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<Json<RegisterResponse>> {
    state
        .auth
        .register(&request.username, &request.password, &request.email)
        .await?;

    Ok(Json(RegisterResponse {
        message: "User registered successfully".to_string(),
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let token = state.auth.login(&request.username, &request.password).await?;

    Ok(Json(LoginResponse { auth: true, token }))
}
