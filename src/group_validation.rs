use crate::group::InterventionGroup;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GroupValidationError {
    message: String,
}

impl GroupValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn validate_group(group: &InterventionGroup) -> Result<(), GroupValidationError> {
    if group.id.as_str().trim().is_empty() {
        return Err(GroupValidationError::new(format!(
            "group '{}' requires a non-empty id",
            group.name
        )));
    }

    for (idx, tracked) in group.units.iter().enumerate() {
        if tracked.id().trim().is_empty() {
            return Err(GroupValidationError::new(format!(
                "group {} unit #{} requires a non-empty id",
                group.id, idx
            )));
        }
    }

    for (idx, tracked) in group.personnel.iter().enumerate() {
        if tracked.id().trim().is_empty() {
            return Err(GroupValidationError::new(format!(
                "group {} personnel #{} requires a non-empty id",
                group.id, idx
            )));
        }
    }

    Ok(())
}

/// Checks group ids are unique and that no unit or person is held more
/// than once across the whole collection.
pub fn validate_group_collection(groups: &[InterventionGroup]) -> Result<(), GroupValidationError> {
    let mut seen_ids = HashSet::with_capacity(groups.len());
    let mut unit_owner: HashMap<&str, &InterventionGroup> = HashMap::new();
    let mut personnel_owner: HashMap<&str, &InterventionGroup> = HashMap::new();

    for group in groups {
        if !seen_ids.insert(&group.id) {
            return Err(GroupValidationError::new(format!(
                "duplicate group id {}",
                group.id
            )));
        }
        validate_group(group)?;

        for tracked in &group.units {
            if let Some(owner) = unit_owner.insert(tracked.id(), group) {
                return Err(GroupValidationError::new(format!(
                    "unit {} is assigned to both group {} and group {}",
                    tracked.id(),
                    owner.id,
                    group.id
                )));
            }
        }
        for tracked in &group.personnel {
            if let Some(owner) = personnel_owner.insert(tracked.id(), group) {
                return Err(GroupValidationError::new(format!(
                    "personnel {} is assigned to both group {} and group {}",
                    tracked.id(),
                    owner.id,
                    group.id
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Unit;
    use crate::group::{GroupId, GroupKind, TrackedUnit};

    fn group(id: &str, units: &[&str]) -> InterventionGroup {
        let mut group = InterventionGroup::new(GroupId::from(id), GroupKind::Frente, id);
        for unit_id in units {
            group.units.push(TrackedUnit::new(
                Unit::new(*unit_id, "para servicio"),
                id,
                "08:00",
                "#ff0000",
            ));
        }
        group
    }

    #[test]
    fn accepts_disjoint_groups() {
        assert!(validate_group_collection(&[group("a", &["B-1"]), group("b", &["B-2"])]).is_ok());
    }

    #[test]
    fn rejects_duplicate_group_ids() {
        let err = validate_group_collection(&[group("a", &[]), group("a", &[])]).unwrap_err();
        assert!(err.to_string().contains("duplicate group id a"));
    }

    #[test]
    fn rejects_unit_held_twice() {
        let err =
            validate_group_collection(&[group("a", &["B-1"]), group("b", &["B-1"])]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unit B-1 is assigned to both group a and group b"
        );
    }

    #[test]
    fn rejects_blank_group_id() {
        assert!(validate_group(&group(" ", &[])).is_err());
    }
}
