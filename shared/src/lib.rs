use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request body for creating a new account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name: String,
    /// Plaintext password; hashed before storage, never persisted as-is
    pub password: String,
    /// Transfer PIN as a string of digits (leading zeros are significant)
    pub pin: String,
}

/// Public view of an account. Credential hashes are deliberately absent
/// from this type so they can never be serialized outward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: i64,
    /// Public-facing account number
    pub number: i64,
    pub first_name: String,
    pub last_name: String,
    /// Balance in minor currency units (cents)
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateAccountRequest {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteAccountResponse {
    pub deleted: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub number: i64,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub id: i64,
    pub number: i64,
    /// Opaque signed token to present in the `x-auth-token` header
    pub token: String,
}

/// Request body for a peer-to-peer transfer. The sender is implied by the
/// authenticated account; only the receiver is named explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub receiver: i64,
    /// Amount in minor currency units, must be positive
    pub amount: i64,
    pub pin: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferResponse {
    pub sender: i64,
    pub receiver: i64,
    pub amount: i64,
    /// Sender balance after the transfer committed
    pub sender_balance: i64,
    pub time: DateTime<Utc>,
}

/// One immutable ledger entry. Sender and receiver are account numbers,
/// not surrogate ids, so history stays meaningful after account deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub id: i64,
    pub sender: i64,
    pub receiver: i64,
    pub amount: i64,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<TransactionResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountListResponse {
    pub accounts: Vec<AccountResponse>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub has_more: bool,
    /// Account id to pass as `after` to fetch the next page
    pub next_cursor: Option<i64>,
}

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_response_has_no_credential_fields() {
        let account = AccountResponse {
            id: 1,
            number: 48291733,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            balance: 1000,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&account).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("password"));
        assert!(!object.contains_key("password_hash"));
        assert!(!object.contains_key("pin"));
        assert!(!object.contains_key("pin_hash"));
    }

    #[test]
    fn transfer_request_round_trips() {
        let request = TransferRequest {
            receiver: 55512345,
            amount: 300,
            pin: "0412".to_string(),
        };

        let json = serde_json::to_string(&request).unwrap();
        let parsed: TransferRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, request);
    }
}
