//! Data Transfer Objects

use serde::{Deserialize, Serialize};

/// Sign up request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
}

/// Sign up response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    pub user_id: String,
}

/// Log in request (also used for bearer token issuance)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogInRequest {
    pub email: String,
    pub password: String,
}

/// Log in response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogInResponse {
    pub user_id: String,
    pub csrf_token: String,
    pub expires_at_ms: i64,
}

/// Session status response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at_ms: Option<i64>,
}

impl SessionStatusResponse {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            user_id: None,
            email: None,
            csrf_token: None,
            expires_at_ms: None,
        }
    }
}

/// Bearer token response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub user_id: String,
    pub token: String,
    pub expires_at_ms: i64,
}
