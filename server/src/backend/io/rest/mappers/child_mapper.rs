use shared::{Child as SharedChild, CreateChildRequest, UpdateChildRequest};

use crate::backend::domain::commands::accounts::{ChildUpdate, NewChild};
use crate::backend::domain::models::child::Child as DomainChild;

/// Mapper to convert between shared Child DTOs and domain Child models.
pub struct ChildMapper;

impl ChildMapper {
    pub fn to_dto(domain: DomainChild) -> SharedChild {
        SharedChild {
            id: domain.id,
            name: domain.name,
            grade: domain.grade,
            avatar: domain.avatar,
            points: domain.points,
            growth_level: domain.growth_level,
            growth_name: domain.growth_name,
            monthly_points: domain.monthly_points,
        }
    }

    pub fn to_new_child(request: CreateChildRequest) -> NewChild {
        NewChild {
            name: request.name,
            grade: request.grade,
            avatar: request.avatar,
        }
    }

    pub fn to_child_update(request: UpdateChildRequest) -> ChildUpdate {
        ChildUpdate {
            name: request.name,
            grade: request.grade,
            avatar: request.avatar,
            points: request.points,
            monthly_points: request.monthly_points,
        }
    }
}
