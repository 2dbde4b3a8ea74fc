use crate::catalog::{DEFAULT_ELIGIBLE_STATUS, Personnel, ResourceCatalog, Unit};
use crate::group::InterventionGroup;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Derives which catalog resources are still free to assign.
///
/// Nothing is cached: every call recomputes from the catalog and the group
/// collection it is given, and keeps catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityIndex {
    eligible_status: String,
}

impl Default for AvailabilityIndex {
    fn default() -> Self {
        Self::new(DEFAULT_ELIGIBLE_STATUS)
    }
}

impl AvailabilityIndex {
    pub fn new(eligible_status: impl Into<String>) -> Self {
        Self {
            eligible_status: eligible_status.into(),
        }
    }

    pub fn eligible_status(&self) -> &str {
        &self.eligible_status
    }

    pub fn available_units(
        &self,
        catalog: &ResourceCatalog,
        groups: &[InterventionGroup],
    ) -> Vec<Unit> {
        let assigned: HashSet<&str> = groups
            .iter()
            .flat_map(|group| group.units.iter().map(|tracked| tracked.id()))
            .collect();
        catalog
            .units()
            .iter()
            .filter(|unit| unit.is_eligible(&self.eligible_status))
            .filter(|unit| !assigned.contains(unit.id.as_str()))
            .cloned()
            .collect()
    }

    pub fn available_personnel(
        &self,
        catalog: &ResourceCatalog,
        groups: &[InterventionGroup],
    ) -> Vec<Personnel> {
        let assigned: HashSet<&str> = groups
            .iter()
            .flat_map(|group| group.personnel.iter().map(|tracked| tracked.id()))
            .collect();
        catalog
            .personnel()
            .iter()
            .filter(|person| !assigned.contains(person.id.as_str()))
            .cloned()
            .collect()
    }

    pub fn snapshot(
        &self,
        catalog: &ResourceCatalog,
        groups: &[InterventionGroup],
    ) -> BoardSnapshot {
        BoardSnapshot {
            groups: groups.to_vec(),
            available_units: self.available_units(catalog, groups),
            available_personnel: self.available_personnel(catalog, groups),
        }
    }
}

/// Read-only view handed to presentation and export adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub groups: Vec<InterventionGroup>,
    pub available_units: Vec<Unit>,
    pub available_personnel: Vec<Personnel>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{GroupId, GroupKind, TrackedPersonnel, TrackedUnit};

    fn catalog() -> ResourceCatalog {
        ResourceCatalog::new(
            vec![
                Unit::new("B-1", "para servicio"),
                Unit::new("B-2", "fuera de servicio"),
                Unit::new("B-3", "Para Servicio"),
            ],
            vec![
                Personnel::new("P1", "Ana Rojas", "Capitán"),
                Personnel::new("P2", "Luis Soto", "Bombero"),
            ],
        )
    }

    #[test]
    fn empty_groups_leave_every_eligible_resource_available() {
        let index = AvailabilityIndex::default();
        let units = index.available_units(&catalog(), &[]);
        let ids: Vec<_> = units.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["B-1", "B-3"]);
        assert_eq!(index.available_personnel(&catalog(), &[]).len(), 2);
    }

    #[test]
    fn empty_catalog_yields_nothing() {
        let index = AvailabilityIndex::default();
        let snapshot = index.snapshot(&ResourceCatalog::default(), &[]);
        assert!(snapshot.available_units.is_empty());
        assert!(snapshot.available_personnel.is_empty());
    }

    #[test]
    fn assigned_resources_are_filtered_out_in_catalog_order() {
        let catalog = catalog();
        let mut group = InterventionGroup::new(GroupId::from("g"), GroupKind::Frente, "F");
        group.units.push(TrackedUnit::new(
            catalog.unit("B-1").unwrap().clone(),
            "F",
            "10:00",
            "#ff0000",
        ));
        group.personnel.push(TrackedPersonnel::new(
            catalog.person("P2").unwrap().clone(),
            "F",
        ));
        let index = AvailabilityIndex::default();
        let snapshot = index.snapshot(&catalog, std::slice::from_ref(&group));
        let unit_ids: Vec<_> = snapshot.available_units.iter().map(|u| u.id.as_str()).collect();
        let person_ids: Vec<_> = snapshot
            .available_personnel
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(unit_ids, vec!["B-3"]);
        assert_eq!(person_ids, vec!["P1"]);
    }

    #[test]
    fn custom_status_sentinel_is_respected() {
        let catalog = ResourceCatalog::new(
            vec![Unit::new("B-1", "in service"), Unit::new("B-2", "para servicio")],
            Vec::new(),
        );
        let index = AvailabilityIndex::new("In Service");
        let units = index.available_units(&catalog, &[]);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].id, "B-1");
    }
}
