use shared::{CreateRewardRequest, Reward as SharedReward, UpdateRewardRequest};

use crate::backend::domain::commands::accounts::{NewReward, RewardUpdate};
use crate::backend::domain::models::reward::Reward as DomainReward;

pub struct RewardMapper;

impl RewardMapper {
    pub fn to_dto(domain: DomainReward) -> SharedReward {
        SharedReward {
            id: domain.id,
            name: domain.name,
            points: domain.points,
            icon: domain.icon,
            description: domain.description,
        }
    }

    pub fn to_new_reward(request: CreateRewardRequest) -> NewReward {
        NewReward {
            name: request.name,
            points: request.points,
            icon: request.icon,
            description: request.description,
        }
    }

    pub fn to_reward_update(request: UpdateRewardRequest) -> RewardUpdate {
        RewardUpdate {
            name: request.name,
            points: request.points,
            icon: request.icon,
            description: request.description,
        }
    }
}
