use crate::group::GroupId;
use thiserror::Error;

/// Failures reported by the checked command paths. The plain store and
/// engine operations never fail; they ignore unknown identifiers instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("group {0} not found")]
    UnknownGroup(GroupId),

    #[error("unit {0} is not in the catalog")]
    UnknownUnit(String),

    #[error("personnel {0} is not in the catalog")]
    UnknownPersonnel(String),

    #[error("unit {unit_id} is already assigned to group {group_id}")]
    UnitAlreadyAssigned { unit_id: String, group_id: GroupId },

    #[error("personnel {personnel_id} is already assigned to group {group_id}")]
    PersonnelAlreadyAssigned {
        personnel_id: String,
        group_id: GroupId,
    },

    #[error("unit {unit_id} is not eligible for assignment (status '{status}')")]
    UnitNotEligible { unit_id: String, status: String },

    #[error("unit {unit_id} is not assigned to group {group_id}")]
    UnitNotInGroup { unit_id: String, group_id: GroupId },

    #[error("personnel {personnel_id} is not assigned to group {group_id}")]
    PersonnelNotInGroup {
        personnel_id: String,
        group_id: GroupId,
    },

    #[error("{0}")]
    UnknownField(String),
}

pub type AllocationResult<T> = Result<T, AllocationError>;
