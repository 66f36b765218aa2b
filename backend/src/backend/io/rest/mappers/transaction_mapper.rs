use crate::backend::domain::models::transaction::Transaction as DomainTransaction;
use shared::TransactionResponse;

/// Mapper from the domain ledger entry to its DTO.
pub struct TransactionMapper;

impl TransactionMapper {
    pub fn to_dto(domain: DomainTransaction) -> TransactionResponse {
        TransactionResponse {
            id: domain.id,
            sender: domain.sender,
            receiver: domain.receiver,
            amount: domain.amount,
            time: domain.time,
        }
    }
}
