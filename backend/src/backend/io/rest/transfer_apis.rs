//! # REST API for Transfers
//!
//! The transfer endpoint and the per-account transaction history, both
//! behind the authorization gate.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use tracing::{error, info};

use crate::backend::domain::transfer_service::TransferError;
use crate::backend::io::rest::mappers::transaction_mapper::TransactionMapper;
use crate::backend::io::rest::{auth_error_response, auth_token, error_response};
use crate::backend::AppState;
use shared::{TransactionListResponse, TransferRequest, TransferResponse};

fn transfer_error_response(err: TransferError) -> Response {
    let status = match &err {
        TransferError::InvalidAmount | TransferError::SelfTransfer => StatusCode::BAD_REQUEST,
        TransferError::SenderNotFound | TransferError::ReceiverNotFound => StatusCode::NOT_FOUND,
        TransferError::InvalidCredential => StatusCode::UNAUTHORIZED,
        TransferError::InsufficientFunds => StatusCode::UNPROCESSABLE_ENTITY,
        TransferError::Conflict => StatusCode::CONFLICT,
        TransferError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, err.to_string())
}

/// Execute a transfer from the authenticated account
pub async fn transfer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(request): Json<TransferRequest>,
) -> impl IntoResponse {
    info!("POST /api/accounts/{}/transfer", id);

    let sender_number = match state.auth.authorize(auth_token(&headers), id).await {
        Ok(number) => number,
        Err(e) => return auth_error_response(e),
    };

    match state.transfer_service.transfer(sender_number, &request).await {
        Ok(receipt) => {
            let response = TransferResponse {
                sender: receipt.sender,
                receiver: receipt.receiver,
                amount: receipt.amount,
                sender_balance: receipt.sender_balance,
                time: receipt.time,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Transfer failed: {}", e);
            transfer_error_response(e)
        }
    }
}

/// Transaction history for the authenticated account, time ascending
pub async fn list_transactions(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> impl IntoResponse {
    info!("GET /api/accounts/{}/transactions", id);

    let number = match state.auth.authorize(auth_token(&headers), id).await {
        Ok(number) => number,
        Err(e) => return auth_error_response(e),
    };

    match state.account_service.transactions_involving(number).await {
        Ok(transactions) => {
            let response = TransactionListResponse {
                transactions: transactions.into_iter().map(TransactionMapper::to_dto).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to list transactions: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error listing transactions")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test_utils::TestBackend;
    use axum::http::HeaderValue;
    use shared::{CreateAccountRequest, LoginRequest};

    struct Party {
        id: i64,
        number: i64,
        token: String,
    }

    async fn party(backend: &TestBackend, name: &str, balance: i64) -> Party {
        let account = backend
            .state
            .account_service
            .create_account(CreateAccountRequest {
                first_name: name.to_string(),
                last_name: "Tester".to_string(),
                password: "correct horse".to_string(),
                pin: "1234".to_string(),
            })
            .await
            .unwrap();
        if balance > 0 {
            backend.credit(account.id, balance).await;
        }
        let outcome = backend
            .state
            .account_service
            .login(LoginRequest { number: account.number, password: "correct horse".to_string() })
            .await
            .unwrap();

        Party { id: account.id, number: account.number, token: outcome.token }
    }

    fn headers_with_token(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            crate::backend::io::rest::AUTH_HEADER,
            HeaderValue::from_str(token).unwrap(),
        );
        headers
    }

    fn request(receiver: i64, amount: i64) -> TransferRequest {
        TransferRequest { receiver, amount, pin: "1234".to_string() }
    }

    #[tokio::test]
    async fn transfer_moves_funds_and_records_history() {
        let backend = TestBackend::new().await;
        let sender = party(&backend, "Ada", 1000).await;
        let receiver = party(&backend, "Grace", 0).await;

        let response = transfer(
            State(backend.state.clone()),
            Path(sender.id),
            headers_with_token(&sender.token),
            Json(request(receiver.number, 300)),
        )
        .await;
        assert_eq!(response.into_response().status(), StatusCode::OK);

        let sender_account = backend.state.account_service.account(sender.id).await.unwrap();
        let receiver_account = backend.state.account_service.account(receiver.id).await.unwrap();
        assert_eq!(sender_account.balance, 700);
        assert_eq!(receiver_account.balance, 300);

        // Both parties see the same single history entry
        for account in [&sender, &receiver] {
            let response = list_transactions(
                State(backend.state.clone()),
                Path(account.id),
                headers_with_token(&account.token),
            )
            .await;
            assert_eq!(response.into_response().status(), StatusCode::OK);
        }
        let history = backend
            .state
            .account_service
            .transactions_involving(sender.number)
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].amount, 300);
    }

    #[tokio::test]
    async fn transfer_requires_the_senders_own_token() {
        let backend = TestBackend::new().await;
        let sender = party(&backend, "Ada", 1000).await;
        let receiver = party(&backend, "Grace", 0).await;

        // Receiver's token on the sender's path
        let response = transfer(
            State(backend.state.clone()),
            Path(sender.id),
            headers_with_token(&receiver.token),
            Json(request(receiver.number, 300)),
        )
        .await;
        assert_eq!(response.into_response().status(), StatusCode::FORBIDDEN);

        // Balances untouched
        let sender_account = backend.state.account_service.account(sender.id).await.unwrap();
        assert_eq!(sender_account.balance, 1000);
    }

    #[tokio::test]
    async fn overdraft_is_unprocessable() {
        let backend = TestBackend::new().await;
        let sender = party(&backend, "Ada", 700).await;
        let receiver = party(&backend, "Grace", 0).await;

        let response = transfer(
            State(backend.state.clone()),
            Path(sender.id),
            headers_with_token(&sender.token),
            Json(request(receiver.number, 800)),
        )
        .await;
        assert_eq!(
            response.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[tokio::test]
    async fn self_transfer_is_a_bad_request() {
        let backend = TestBackend::new().await;
        let sender = party(&backend, "Ada", 1000).await;

        let response = transfer(
            State(backend.state.clone()),
            Path(sender.id),
            headers_with_token(&sender.token),
            Json(request(sender.number, 100)),
        )
        .await;
        assert_eq!(response.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn wrong_pin_is_unauthorized() {
        let backend = TestBackend::new().await;
        let sender = party(&backend, "Ada", 1000).await;
        let receiver = party(&backend, "Grace", 0).await;

        let mut bad_pin = request(receiver.number, 100);
        bad_pin.pin = "0000".to_string();
        let response = transfer(
            State(backend.state.clone()),
            Path(sender.id),
            headers_with_token(&sender.token),
            Json(bad_pin),
        )
        .await;
        assert_eq!(response.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn history_requires_a_token() {
        let backend = TestBackend::new().await;
        let sender = party(&backend, "Ada", 0).await;

        let response =
            list_transactions(State(backend.state.clone()), Path(sender.id), HeaderMap::new())
                .await;
        assert_eq!(response.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
