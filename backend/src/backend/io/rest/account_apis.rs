//! # REST API for Accounts
//!
//! Endpoints for account creation, login, lookup, listing, renaming, and
//! deletion. Everything addressing a specific account runs the
//! authorization gate first.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use tracing::{error, info};

use crate::backend::domain::account_service::AccountError;
use crate::backend::domain::models::account::AccountDraftError;
use crate::backend::io::rest::mappers::account_mapper::AccountMapper;
use crate::backend::io::rest::{auth_error_response, auth_token, error_response};
use crate::backend::AppState;
use shared::{
    AccountListResponse, CreateAccountRequest, DeleteAccountResponse, LoginRequest, LoginResponse,
    PaginationInfo, UpdateAccountRequest,
};

/// Query parameters for the account listing API
#[derive(Debug, Deserialize)]
pub struct AccountListQuery {
    pub after: Option<i64>,
    pub limit: Option<u32>,
}

fn account_error_response(err: AccountError) -> Response {
    let status = match &err {
        AccountError::Draft(AccountDraftError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
        AccountError::NotFound => StatusCode::NOT_FOUND,
        AccountError::InvalidCredential => StatusCode::UNAUTHORIZED,
        AccountError::BalanceNotZero => StatusCode::CONFLICT,
        AccountError::Draft(AccountDraftError::Secret(_))
        | AccountError::NumberAllocationFailed
        | AccountError::Token(_)
        | AccountError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, err.to_string())
}

/// Create a new account with a zero balance
pub async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    info!("POST /api/accounts");

    match state.account_service.create_account(request).await {
        Ok(account) => {
            (StatusCode::CREATED, Json(AccountMapper::to_dto(account))).into_response()
        }
        Err(e) => {
            error!("Failed to create account: {}", e);
            account_error_response(e)
        }
    }
}

/// Exchange an account number and password for a token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    info!("POST /api/login - number: {}", request.number);

    match state.account_service.login(request).await {
        Ok(outcome) => {
            let response = LoginResponse {
                id: outcome.account.id,
                number: outcome.account.number,
                token: outcome.token,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Login failed: {}", e);
            account_error_response(e)
        }
    }
}

/// List accounts, one ascending-by-id page at a time
pub async fn list_accounts(
    State(state): State<AppState>,
    Query(query): Query<AccountListQuery>,
) -> impl IntoResponse {
    info!("GET /api/accounts - query: {:?}", query);

    match state.account_service.list_accounts(query.limit.unwrap_or(20), query.after).await {
        Ok(page) => {
            let response = AccountListResponse {
                accounts: page.accounts.into_iter().map(AccountMapper::to_dto).collect(),
                pagination: PaginationInfo {
                    has_more: page.has_more,
                    next_cursor: page.next_cursor,
                },
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to list accounts: {}", e);
            account_error_response(e)
        }
    }
}

/// Fetch the caller's own account
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> impl IntoResponse {
    info!("GET /api/accounts/{}", id);

    if let Err(e) = state.auth.authorize(auth_token(&headers), id).await {
        return auth_error_response(e);
    }

    match state.account_service.account(id).await {
        Ok(account) => (StatusCode::OK, Json(AccountMapper::to_dto(account))).into_response(),
        Err(e) => {
            error!("Failed to load account {}: {}", id, e);
            account_error_response(e)
        }
    }
}

/// Update the caller's display names
pub async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(request): Json<UpdateAccountRequest>,
) -> impl IntoResponse {
    info!("PUT /api/accounts/{}", id);

    if let Err(e) = state.auth.authorize(auth_token(&headers), id).await {
        return auth_error_response(e);
    }

    match state.account_service.update_names(id, request).await {
        Ok(account) => (StatusCode::OK, Json(AccountMapper::to_dto(account))).into_response(),
        Err(e) => {
            error!("Failed to update account {}: {}", id, e);
            account_error_response(e)
        }
    }
}

/// Delete the caller's account once its balance is zero
pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> impl IntoResponse {
    info!("DELETE /api/accounts/{}", id);

    if let Err(e) = state.auth.authorize(auth_token(&headers), id).await {
        return auth_error_response(e);
    }

    match state.account_service.delete_account(id).await {
        Ok(()) => (StatusCode::OK, Json(DeleteAccountResponse { deleted: id })).into_response(),
        Err(e) => {
            error!("Failed to delete account {}: {}", id, e);
            account_error_response(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test_utils::test_state;
    use axum::http::HeaderValue;
    use shared::TransferRequest;

    fn create_request() -> CreateAccountRequest {
        CreateAccountRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            password: "correct horse".to_string(),
            pin: "1234".to_string(),
        }
    }

    fn headers_with_token(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            crate::backend::io::rest::AUTH_HEADER,
            HeaderValue::from_str(token).unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn create_account_returns_created() {
        let state = test_state().await;

        let response = create_account(State(state), Json(create_request())).await;
        assert_eq!(response.into_response().status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn create_account_rejects_weak_password() {
        let state = test_state().await;

        let mut request = create_request();
        request.password = "short".to_string();
        let response = create_account(State(state), Json(request)).await;
        assert_eq!(response.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_round_trip() {
        let state = test_state().await;
        let account = state.account_service.create_account(create_request()).await.unwrap();

        let response = login(
            State(state.clone()),
            Json(LoginRequest { number: account.number, password: "correct horse".to_string() }),
        )
        .await;
        assert_eq!(response.into_response().status(), StatusCode::OK);

        let response = login(
            State(state),
            Json(LoginRequest { number: account.number, password: "wrong".to_string() }),
        )
        .await;
        assert_eq!(response.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn get_account_requires_matching_token() {
        let state = test_state().await;
        let account = state.account_service.create_account(create_request()).await.unwrap();
        let outcome = state
            .account_service
            .login(LoginRequest { number: account.number, password: "correct horse".to_string() })
            .await
            .unwrap();

        // Own token works
        let response = get_account(
            State(state.clone()),
            Path(account.id),
            headers_with_token(&outcome.token),
        )
        .await;
        assert_eq!(response.into_response().status(), StatusCode::OK);

        // No token at all
        let response =
            get_account(State(state.clone()), Path(account.id), HeaderMap::new()).await;
        assert_eq!(response.into_response().status(), StatusCode::UNAUTHORIZED);

        // Someone else's resource path
        let mut other_request = create_request();
        other_request.first_name = "Grace".to_string();
        let other = state.account_service.create_account(other_request).await.unwrap();
        let response = get_account(
            State(state),
            Path(other.id),
            headers_with_token(&outcome.token),
        )
        .await;
        assert_eq!(response.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn update_account_renames_owner() {
        let state = test_state().await;
        let account = state.account_service.create_account(create_request()).await.unwrap();
        let outcome = state
            .account_service
            .login(LoginRequest { number: account.number, password: "correct horse".to_string() })
            .await
            .unwrap();

        let response = update_account(
            State(state.clone()),
            Path(account.id),
            headers_with_token(&outcome.token),
            Json(UpdateAccountRequest {
                first_name: "Augusta".to_string(),
                last_name: "King".to_string(),
            }),
        )
        .await;
        assert_eq!(response.into_response().status(), StatusCode::OK);

        let stored = state.account_service.account(account.id).await.unwrap();
        assert_eq!(stored.first_name, "Augusta");
    }

    #[tokio::test]
    async fn delete_account_guards_balance() {
        let backend = crate::backend::test_utils::TestBackend::new().await;
        let state = backend.state.clone();
        let account = state.account_service.create_account(create_request()).await.unwrap();
        let mut receiver_request = create_request();
        receiver_request.first_name = "Grace".to_string();
        let receiver = state.account_service.create_account(receiver_request).await.unwrap();
        let outcome = state
            .account_service
            .login(LoginRequest { number: account.number, password: "correct horse".to_string() })
            .await
            .unwrap();

        // Fund the account out-of-band
        backend.credit(account.id, 100).await;

        let response = delete_account(
            State(state.clone()),
            Path(account.id),
            headers_with_token(&outcome.token),
        )
        .await;
        assert_eq!(response.into_response().status(), StatusCode::CONFLICT);

        // Empty the account, then deletion succeeds
        state
            .transfer_service
            .transfer(
                account.number,
                &TransferRequest { receiver: receiver.number, amount: 100, pin: "1234".to_string() },
            )
            .await
            .unwrap();

        let response = delete_account(
            State(state.clone()),
            Path(account.id),
            headers_with_token(&outcome.token),
        )
        .await;
        assert_eq!(response.into_response().status(), StatusCode::OK);

        let response = list_accounts(
            State(state),
            Query(AccountListQuery { after: None, limit: None }),
        )
        .await;
        assert_eq!(response.into_response().status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn listing_is_paginated() {
        let state = test_state().await;
        for name in ["Ada", "Grace", "Edith"] {
            let mut request = create_request();
            request.first_name = name.to_string();
            state.account_service.create_account(request).await.unwrap();
        }

        let response = list_accounts(
            State(state),
            Query(AccountListQuery { after: None, limit: Some(2) }),
        )
        .await;
        assert_eq!(response.into_response().status(), StatusCode::OK);
    }
}
