use shared::{Account as SharedAccount, RegisterRequest, UpdateAccountRequest};

use super::child_mapper::ChildMapper;
use crate::backend::domain::commands::accounts::{AccountUpdate, RegisterCommand};
use crate::backend::domain::models::account::Account as DomainAccount;

/// Mapper to convert between shared Account DTOs and domain Account models.
pub struct AccountMapper;

impl AccountMapper {
    /// The password hash never leaves the domain
    pub fn to_dto(domain: DomainAccount) -> SharedAccount {
        SharedAccount {
            id: domain.id,
            phone: domain.phone,
            username: domain.username,
            children: domain.children.into_iter().map(ChildMapper::to_dto).collect(),
            current_child_id: domain.current_child_id,
        }
    }

    pub fn to_register_command(request: RegisterRequest) -> RegisterCommand {
        RegisterCommand {
            phone: request.phone,
            password: request.password,
            username: request.username,
        }
    }

    pub fn to_account_update(request: UpdateAccountRequest) -> AccountUpdate {
        AccountUpdate {
            username: request.username,
            phone: request.phone,
            password: request.password,
        }
    }
}
