use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::backend::domain::commands::accounts::{NewReward, RewardUpdate};
use crate::backend::domain::error::{DomainError, DomainResult};
use crate::backend::domain::models::reward::Reward;
use crate::backend::storage::{load_collection, save_document, DocumentKey, DocumentStorage};

/// Service for the reward catalogue shared by every account
#[derive(Clone)]
pub struct RewardService {
    storage: Arc<dyn DocumentStorage>,
    rewards: Arc<RwLock<Vec<Reward>>>,
}

impl RewardService {
    pub async fn load(storage: Arc<dyn DocumentStorage>) -> Result<Self> {
        let rewards: Vec<Reward> = load_collection(storage.as_ref(), DocumentKey::Rewards).await?;
        info!("Loaded {} rewards", rewards.len());

        Ok(Self {
            storage,
            rewards: Arc::new(RwLock::new(rewards)),
        })
    }

    /// Upsert imported rewards by id; rewards missing from the import stay
    pub async fn merge_rewards(&self, imported: Vec<Reward>) -> DomainResult<usize> {
        info!("Merging {} imported rewards", imported.len());

        let mut rewards = self.rewards.write().await;
        let mut updated = rewards.clone();
        let count = imported.len();
        for reward in imported {
            match updated.iter_mut().find(|r| r.id == reward.id) {
                Some(existing) => *existing = reward,
                None => updated.push(reward),
            }
        }
        save_document(self.storage.as_ref(), DocumentKey::Rewards, &updated).await?;
        *rewards = updated;

        Ok(count)
    }

    pub async fn list_rewards(&self) -> Vec<Reward> {
        self.rewards.read().await.clone()
    }

    pub async fn add_reward(&self, command: NewReward) -> DomainResult<Reward> {
        info!("Adding reward '{}' costing {} points", command.name, command.points);

        let name = command.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("Reward name cannot be empty"));
        }

        let reward = Reward {
            id: Reward::generate_id(),
            name,
            points: command.points,
            icon: command.icon,
            description: command.description,
        };

        let mut rewards = self.rewards.write().await;
        let mut updated = rewards.clone();
        updated.push(reward.clone());
        save_document(self.storage.as_ref(), DocumentKey::Rewards, &updated).await?;
        *rewards = updated;

        Ok(reward)
    }

    pub async fn update_reward(&self, reward_id: &str, update: RewardUpdate) -> DomainResult<Reward> {
        info!("Updating reward {}", reward_id);

        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("Reward name cannot be empty"));
            }
        }

        let mut rewards = self.rewards.write().await;
        let index = rewards
            .iter()
            .position(|r| r.id == reward_id)
            .ok_or_else(|| DomainError::not_found("Reward"))?;

        let mut updated = rewards.clone();
        let reward = &mut updated[index];
        if let Some(name) = update.name {
            reward.name = name.trim().to_string();
        }
        if let Some(points) = update.points {
            reward.points = points;
        }
        if let Some(icon) = update.icon {
            reward.icon = Some(icon);
        }
        if let Some(description) = update.description {
            reward.description = Some(description);
        }
        let reward = reward.clone();

        save_document(self.storage.as_ref(), DocumentKey::Rewards, &updated).await?;
        *rewards = updated;

        Ok(reward)
    }

    /// Remove a reward; removing an unknown id is not an error
    pub async fn delete_reward(&self, reward_id: &str) -> DomainResult<bool> {
        info!("Deleting reward {}", reward_id);

        let mut rewards = self.rewards.write().await;
        if !rewards.iter().any(|r| r.id == reward_id) {
            warn!("Reward not found for delete: {}", reward_id);
            return Ok(false);
        }

        let updated: Vec<Reward> = rewards.iter().filter(|r| r.id != reward_id).cloned().collect();
        save_document(self.storage.as_ref(), DocumentKey::Rewards, &updated).await?;
        *rewards = updated;

        Ok(true)
    }
}
