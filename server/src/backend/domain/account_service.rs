//! Account roster: guardians, their children and the session token.
//!
//! Children are embedded in their account, so every child mutation
//! rewrites the `growtree_users` document.

use anyhow::Result;
use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::backend::domain::commands::accounts::{AccountUpdate, ChildUpdate, NewChild, RegisterCommand};
use crate::backend::domain::error::{DomainError, DomainResult};
use crate::backend::domain::models::account::Account;
use crate::backend::domain::models::child::Child;
use crate::backend::domain::session::{hash_password, verify_password, SessionToken};
use crate::backend::storage::{load_collection, load_document, save_document, DocumentKey, DocumentStorage};

/// Shortest password accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Clone)]
pub struct AccountService {
    storage: Arc<dyn DocumentStorage>,
    accounts: Arc<RwLock<Vec<Account>>>,
}

impl AccountService {
    pub async fn load(storage: Arc<dyn DocumentStorage>) -> Result<Self> {
        let accounts: Vec<Account> = load_collection(storage.as_ref(), DocumentKey::Users).await?;
        info!("Loaded {} accounts", accounts.len());

        Ok(Self {
            storage,
            accounts: Arc::new(RwLock::new(accounts)),
        })
    }

    /// Create an account with a unique phone number
    pub async fn register(&self, command: RegisterCommand) -> DomainResult<Account> {
        let phone = command.phone.trim().to_string();
        info!("Registering account for phone {}", phone);

        if phone.is_empty() {
            return Err(DomainError::validation("Phone number is required"));
        }
        if command.password.trim().len() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let username = command
            .username
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| phone.clone());

        let mut accounts = self.accounts.write().await;
        if accounts.iter().any(|a| a.phone == phone) {
            warn!("Phone {} is already registered", phone);
            return Err(DomainError::Conflict("Phone number is already registered".to_string()));
        }

        let account = Account {
            id: Account::generate_id(),
            phone,
            username,
            password: hash_password(&command.password),
            children: Vec::new(),
            current_child_id: None,
        };

        let mut updated = accounts.clone();
        updated.push(account.clone());
        save_document(self.storage.as_ref(), DocumentKey::Users, &updated).await?;
        *accounts = updated;

        info!("Registered account {}", account.id);
        Ok(account)
    }

    /// Check credentials, then issue and store a session token
    pub async fn login(&self, phone: &str, password: &str) -> DomainResult<(String, Account)> {
        info!("Login attempt for phone {}", phone.trim());

        if phone.trim().is_empty() || password.trim().is_empty() {
            return Err(DomainError::Unauthorized("Phone and password are required".to_string()));
        }

        let account = self
            .accounts
            .read()
            .await
            .iter()
            .find(|a| a.phone == phone.trim())
            .filter(|a| verify_password(password, &a.password))
            .cloned()
            .ok_or_else(|| {
                warn!("Rejected login for phone {}", phone.trim());
                DomainError::Unauthorized("Invalid phone number or password".to_string())
            })?;

        let token = SessionToken::issue(&account.id, Utc::now()).encode();
        save_document(self.storage.as_ref(), DocumentKey::Token, &token).await?;

        info!("Account {} logged in", account.id);
        Ok((token, account))
    }

    pub async fn logout(&self) -> DomainResult<()> {
        info!("Logging out");
        self.storage.remove_document(DocumentKey::Token).await?;
        Ok(())
    }

    /// Account of the stored token, if it is still valid.
    ///
    /// A stale or unreadable token is removed.
    pub async fn restore_session(&self) -> DomainResult<Option<Account>> {
        let stored: Option<String> = load_document(self.storage.as_ref(), DocumentKey::Token).await?;
        let Some(token) = stored else {
            return Ok(None);
        };

        match self.authenticate(&token).await {
            Ok(account) => {
                info!("Restored session of account {}", account.id);
                Ok(Some(account))
            }
            Err(DomainError::Unauthorized(reason)) => {
                warn!("Discarding stored session token: {}", reason);
                self.storage.remove_document(DocumentKey::Token).await?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve the account a client token names
    pub async fn authenticate(&self, token: &str) -> DomainResult<Account> {
        let session = SessionToken::decode(token)
            .ok_or_else(|| DomainError::Unauthorized("Malformed session token".to_string()))?;
        if session.is_expired(Utc::now()) {
            return Err(DomainError::Unauthorized("Session has expired".to_string()));
        }

        self.get_account(&session.user_id)
            .await
            .map_err(|_| DomainError::Unauthorized("Unknown account".to_string()))
    }

    pub async fn get_account(&self, account_id: &str) -> DomainResult<Account> {
        self.accounts
            .read()
            .await
            .iter()
            .find(|a| a.id == account_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Account"))
    }

    /// Merge profile fields; the phone number stays unique
    pub async fn update_account(&self, account_id: &str, update: AccountUpdate) -> DomainResult<Account> {
        info!("Updating account {}", account_id);

        if let Some(phone) = &update.phone {
            if phone.trim().is_empty() {
                return Err(DomainError::validation("Phone number is required"));
            }
        }
        if let Some(password) = &update.password {
            if password.trim().len() < MIN_PASSWORD_LENGTH {
                return Err(DomainError::validation(format!(
                    "Password must be at least {} characters",
                    MIN_PASSWORD_LENGTH
                )));
            }
        }

        self.mutate_accounts(|accounts| {
            let index = Self::position(accounts, account_id)?;
            if let Some(phone) = update.phone {
                let phone = phone.trim().to_string();
                Self::ensure_phone_free(accounts, &phone, account_id)?;
                accounts[index].phone = phone;
            }

            let account = &mut accounts[index];
            if let Some(username) = update.username {
                account.username = username.trim().to_string();
            }
            if let Some(password) = update.password {
                account.password = hash_password(&password);
            }
            Ok(account.clone())
        })
        .await
    }

    /// Swap an existing account for an imported copy of itself.
    /// Returns the account as it was before.
    pub async fn replace_account(&self, imported: Account) -> DomainResult<Account> {
        info!(
            "Replacing account {} with {} imported children",
            imported.id,
            imported.children.len()
        );

        self.mutate_accounts(|accounts| {
            let index = Self::position(accounts, &imported.id)?;
            Self::ensure_phone_free(accounts, &imported.phone, &imported.id)?;
            Ok(std::mem::replace(&mut accounts[index], imported))
        })
        .await
    }

    /// The selected child, else the first child, else none
    pub async fn current_child(&self, account_id: &str) -> DomainResult<Option<Child>> {
        Ok(self.get_account(account_id).await?.current_child().cloned())
    }

    /// The named child of the account, or its current child without a name
    pub async fn resolve_child(&self, account_id: &str, child_id: Option<&str>) -> DomainResult<Child> {
        self.get_account(account_id)
            .await?
            .resolve_child(child_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Child"))
    }

    pub async fn set_current_child(&self, account_id: &str, child_id: &str) -> DomainResult<Child> {
        info!("Selecting child {} for account {}", child_id, account_id);

        self.mutate_account(account_id, |account| {
            let child = account
                .find_child(child_id)
                .cloned()
                .ok_or_else(|| DomainError::not_found("Child"))?;
            account.current_child_id = Some(child.id.clone());
            Ok(child)
        })
        .await
    }

    /// Add a child at the first growth stage and make it the current child
    pub async fn add_child(&self, account_id: &str, command: NewChild) -> DomainResult<Child> {
        info!("Adding child '{}' to account {}", command.name, account_id);

        let name = command.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("Child name cannot be empty"));
        }
        Self::validate_grade(command.grade)?;

        let child = Child::new(Child::generate_id(), name, command.grade, command.avatar);

        let created = self
            .mutate_account(account_id, |account| {
                account.children.push(child.clone());
                account.current_child_id = Some(child.id.clone());
                Ok(child)
            })
            .await?;

        info!("Added child {} to account {}", created.id, account_id);
        Ok(created)
    }

    /// Merge child fields and recompute growth
    pub async fn update_child(&self, account_id: &str, child_id: &str, update: ChildUpdate) -> DomainResult<Child> {
        info!("Updating child {} of account {}", child_id, account_id);

        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("Child name cannot be empty"));
            }
        }
        if let Some(grade) = update.grade {
            Self::validate_grade(grade)?;
        }

        self.mutate_child(account_id, child_id, |child| {
            if let Some(name) = update.name {
                child.name = name.trim().to_string();
            }
            if let Some(grade) = update.grade {
                child.grade = grade;
            }
            if let Some(avatar) = update.avatar {
                child.avatar = Some(avatar);
            }
            if let Some(points) = update.points {
                child.points = points;
            }
            if let Some(monthly_points) = update.monthly_points {
                child.monthly_points = monthly_points;
            }
            child.refresh_growth();
        })
        .await
    }

    /// Remove a child; the first remaining child becomes current.
    /// The child's tasks are left in the task store.
    pub async fn delete_child(&self, account_id: &str, child_id: &str) -> DomainResult<bool> {
        info!("Deleting child {} of account {}", child_id, account_id);

        self.mutate_account(account_id, |account| {
            let before = account.children.len();
            account.children.retain(|c| c.id != child_id);
            if account.children.len() == before {
                warn!("Child not found for delete: {}", child_id);
                return Ok(false);
            }
            account.current_child_id = account.children.first().map(|c| c.id.clone());
            Ok(true)
        })
        .await
    }

    /// Add earned points to a child's lifetime and monthly totals
    pub async fn award_points(&self, account_id: &str, child_id: &str, points: u32) -> DomainResult<Child> {
        info!("Awarding {} points to child {}", points, child_id);

        let child = self
            .mutate_child(account_id, child_id, |child| child.award(points))
            .await?;

        info!(
            "Child {} now has {} points ({} this month, level {} {})",
            child.id, child.points, child.monthly_points, child.growth_level, child.growth_name
        );
        Ok(child)
    }

    pub async fn reset_monthly_points(&self, account_id: &str, child_id: &str) -> DomainResult<Child> {
        info!("Resetting monthly points of child {}", child_id);

        self.mutate_child(account_id, child_id, |child| {
            child.monthly_points = 0;
            child.refresh_growth();
        })
        .await
    }

    fn validate_grade(grade: u8) -> DomainResult<()> {
        if !Child::is_valid_grade(grade) {
            return Err(DomainError::validation(format!(
                "Grade must be between {} and {}",
                Child::MIN_GRADE,
                Child::MAX_GRADE
            )));
        }
        Ok(())
    }

    async fn mutate_child<F>(&self, account_id: &str, child_id: &str, change: F) -> DomainResult<Child>
    where
        F: FnOnce(&mut Child),
    {
        self.mutate_account(account_id, |account| {
            let child = account
                .find_child_mut(child_id)
                .ok_or_else(|| DomainError::not_found("Child"))?;
            change(child);
            Ok(child.clone())
        })
        .await
    }

    /// Apply `change` to a copy of the account and persist the roster.
    /// Nothing is written when `change` fails.
    async fn mutate_account<F, R>(&self, account_id: &str, change: F) -> DomainResult<R>
    where
        F: FnOnce(&mut Account) -> DomainResult<R>,
    {
        self.mutate_accounts(|accounts| {
            let index = Self::position(accounts, account_id)?;
            change(&mut accounts[index])
        })
        .await
    }

    /// Apply `change` to a copy of the roster under the write lock,
    /// persist it, then swap it in
    async fn mutate_accounts<F, R>(&self, change: F) -> DomainResult<R>
    where
        F: FnOnce(&mut Vec<Account>) -> DomainResult<R>,
    {
        let mut accounts = self.accounts.write().await;
        let mut updated = accounts.clone();
        let result = change(&mut updated)?;
        save_document(self.storage.as_ref(), DocumentKey::Users, &updated).await?;
        *accounts = updated;

        Ok(result)
    }

    fn position(accounts: &[Account], account_id: &str) -> DomainResult<usize> {
        accounts
            .iter()
            .position(|a| a.id == account_id)
            .ok_or_else(|| DomainError::not_found("Account"))
    }

    fn ensure_phone_free(accounts: &[Account], phone: &str, account_id: &str) -> DomainResult<()> {
        if accounts.iter().any(|a| a.phone == phone && a.id != account_id) {
            warn!("Phone {} is already registered to another account", phone);
            return Err(DomainError::Conflict("Phone number is already registered".to_string()));
        }
        Ok(())
    }
}
