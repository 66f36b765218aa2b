use crate::backend::domain::models::account::Account as DomainAccount;
use shared::AccountResponse;

/// Mapper from the domain account to its public DTO. The DTO has no
/// credential fields, so hashes cannot leak through serialization.
pub struct AccountMapper;

impl AccountMapper {
    pub fn to_dto(domain: DomainAccount) -> AccountResponse {
        AccountResponse {
            id: domain.id,
            number: domain.number,
            first_name: domain.first_name,
            last_name: domain.last_name,
            balance: domain.balance,
            created_at: domain.created_at,
        }
    }
}
