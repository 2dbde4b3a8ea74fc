use crate::availability::{AvailabilityIndex, BoardSnapshot};
use crate::catalog::{Personnel, ResourceCatalog, Unit};
use crate::config::BoardConfig;
use crate::error::{AllocationError, AllocationResult};
use crate::group::{GroupField, GroupId, GroupKind, InterventionGroup, UnitDetailField};
use crate::store::{GroupCollection, InterventionGroupStore};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Counts shown after each change in the CLI and served by the HTTP API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSummary {
    pub group_count: usize,
    pub frente_count: usize,
    pub unidad_operativa_count: usize,
    pub assigned_unit_count: usize,
    pub assigned_personnel_count: usize,
    pub available_unit_count: usize,
    pub available_personnel_count: usize,
    /// Catalog units neither assigned nor eligible by status.
    pub out_of_service_count: usize,
}

impl BoardSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("groups={}", self.group_count));
        if self.frente_count > 0 {
            parts.push(format!("frentes={}", self.frente_count));
        }
        if self.unidad_operativa_count > 0 {
            parts.push(format!("uo={}", self.unidad_operativa_count));
        }
        parts.push(format!(
            "units={}/{}",
            self.assigned_unit_count,
            self.assigned_unit_count + self.available_unit_count
        ));
        parts.push(format!(
            "personnel={}/{}",
            self.assigned_personnel_count,
            self.assigned_personnel_count + self.available_personnel_count
        ));
        if self.out_of_service_count > 0 {
            parts.push(format!("out_of_service={}", self.out_of_service_count));
        }
        parts.join(", ")
    }
}

/// One entry of the command surface, in a form that can travel over the
/// wire or be replayed from a log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    CreateGroup {
        kind: GroupKind,
    },
    DeleteGroup {
        group_id: GroupId,
    },
    RenameGroup {
        group_id: GroupId,
        field: GroupField,
        value: String,
    },
    AssignUnit {
        unit_id: String,
        group_id: GroupId,
    },
    AssignPersonnel {
        personnel_id: String,
        group_id: GroupId,
    },
    UnassignUnit {
        unit_id: String,
        group_id: GroupId,
    },
    UnassignPersonnel {
        personnel_id: String,
        group_id: GroupId,
    },
    UpdateUnitDetail {
        group_id: GroupId,
        unit_id: String,
        field: UnitDetailField,
        value: String,
    },
}

/// The catalog, the group collection and the availability rule, bundled
/// for a host application.
#[derive(Debug, Clone)]
pub struct IncidentBoard {
    catalog: ResourceCatalog,
    store: InterventionGroupStore,
    index: AvailabilityIndex,
    config: BoardConfig,
}

impl Default for IncidentBoard {
    fn default() -> Self {
        Self::new(ResourceCatalog::default())
    }
}

impl IncidentBoard {
    pub fn new(catalog: ResourceCatalog) -> Self {
        Self::with_config(catalog, BoardConfig::default())
    }

    pub fn with_config(catalog: ResourceCatalog, config: BoardConfig) -> Self {
        let store = InterventionGroupStore::new()
            .with_map_color(config.default_map_color.clone())
            .with_eligible_status(config.eligible_status.clone());
        Self {
            catalog,
            store,
            index: AvailabilityIndex::new(config.eligible_status.clone()),
            config,
        }
    }

    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn store(&self) -> &InterventionGroupStore {
        &self.store
    }

    /// Direct access for callers that need the unchecked engine operations.
    pub fn store_mut(&mut self) -> &mut InterventionGroupStore {
        &mut self.store
    }

    pub fn groups(&self) -> &[InterventionGroup] {
        self.store.groups()
    }

    pub fn group(&self, group_id: &GroupId) -> Option<&InterventionGroup> {
        self.store.find(group_id)
    }

    /// Swaps in a freshly reported catalog. Groups are left as they are;
    /// availability follows on the next read.
    pub fn refresh_catalog(&mut self, catalog: ResourceCatalog) {
        info!(
            units = catalog.units().len(),
            personnel = catalog.personnel().len(),
            "catalog refreshed"
        );
        self.catalog = catalog;
    }

    /// Replaces the group collection wholesale, e.g. after a load.
    pub fn replace_groups(&mut self, groups: Vec<InterventionGroup>) -> GroupCollection {
        info!(groups = groups.len(), "group collection replaced");
        self.store.replace(groups)
    }

    pub fn available_units(&self) -> Vec<Unit> {
        self.index.available_units(&self.catalog, self.store.groups())
    }

    pub fn available_personnel(&self) -> Vec<Personnel> {
        self.index
            .available_personnel(&self.catalog, self.store.groups())
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.index.snapshot(&self.catalog, self.store.groups())
    }

    pub fn summary(&self) -> BoardSummary {
        let groups = self.store.groups();
        let available_units = self.available_units();
        let assigned_unit_count: usize = groups.iter().map(|g| g.units.len()).sum();
        let out_of_service_count = self
            .catalog
            .units()
            .iter()
            .filter(|unit| !unit.is_eligible(self.index.eligible_status()))
            .filter(|unit| self.store.group_of_unit(&unit.id).is_none())
            .count();
        BoardSummary {
            group_count: groups.len(),
            frente_count: groups.iter().filter(|g| g.kind == GroupKind::Frente).count(),
            unidad_operativa_count: groups
                .iter()
                .filter(|g| g.kind == GroupKind::UnidadOperativa)
                .count(),
            assigned_unit_count,
            assigned_personnel_count: groups.iter().map(|g| g.personnel.len()).sum(),
            available_unit_count: available_units.len(),
            available_personnel_count: self.available_personnel().len(),
            out_of_service_count,
        }
    }

    pub fn suggest_officers(&self, query: &str) -> Vec<String> {
        self.catalog.suggest_officers(query)
    }

    pub fn create_group(&mut self, kind: GroupKind) -> GroupCollection {
        self.store.create_group(kind)
    }

    pub fn delete_group(&mut self, group_id: &GroupId) -> GroupCollection {
        self.store.delete_group(group_id)
    }

    pub fn rename_group(
        &mut self,
        group_id: &GroupId,
        field: GroupField,
        value: impl Into<String>,
    ) -> GroupCollection {
        self.store.rename_group(group_id, field, value)
    }

    pub fn assign_unit(&mut self, unit: &Unit, group_id: &GroupId) -> GroupCollection {
        self.store.assign_unit(unit, group_id)
    }

    pub fn assign_personnel(&mut self, person: &Personnel, group_id: &GroupId) -> GroupCollection {
        self.store.assign_personnel(person, group_id)
    }

    pub fn unassign_unit(&mut self, unit_id: &str, group_id: &GroupId) -> GroupCollection {
        self.store.unassign_unit(unit_id, group_id)
    }

    pub fn unassign_personnel(
        &mut self,
        personnel_id: &str,
        group_id: &GroupId,
    ) -> GroupCollection {
        self.store.unassign_personnel(personnel_id, group_id)
    }

    pub fn update_unit_detail(
        &mut self,
        group_id: &GroupId,
        unit_id: &str,
        field: UnitDetailField,
        value: impl Into<String>,
    ) -> GroupCollection {
        self.store.update_unit_detail(group_id, unit_id, field, value)
    }

    /// Looks the unit up in the catalog and assigns it through the checked
    /// path.
    pub fn assign_unit_by_id(
        &mut self,
        unit_id: &str,
        group_id: &GroupId,
    ) -> AllocationResult<GroupCollection> {
        let unit = self
            .catalog
            .unit(unit_id)
            .cloned()
            .ok_or_else(|| AllocationError::UnknownUnit(unit_id.to_string()))?;
        self.store.try_assign_unit(&unit, group_id)
    }

    pub fn assign_personnel_by_id(
        &mut self,
        personnel_id: &str,
        group_id: &GroupId,
    ) -> AllocationResult<GroupCollection> {
        let person = self
            .catalog
            .person(personnel_id)
            .cloned()
            .ok_or_else(|| AllocationError::UnknownPersonnel(personnel_id.to_string()))?;
        self.store.try_assign_personnel(&person, group_id)
    }

    /// Applies one command. Assignments go through the checked path; every
    /// other command is total and returns `Ok`.
    pub fn apply(&mut self, command: Command) -> AllocationResult<GroupCollection> {
        match command {
            Command::CreateGroup { kind } => Ok(self.create_group(kind)),
            Command::DeleteGroup { group_id } => Ok(self.delete_group(&group_id)),
            Command::RenameGroup {
                group_id,
                field,
                value,
            } => Ok(self.rename_group(&group_id, field, value)),
            Command::AssignUnit { unit_id, group_id } => {
                self.assign_unit_by_id(&unit_id, &group_id)
            }
            Command::AssignPersonnel {
                personnel_id,
                group_id,
            } => self.assign_personnel_by_id(&personnel_id, &group_id),
            Command::UnassignUnit { unit_id, group_id } => {
                Ok(self.unassign_unit(&unit_id, &group_id))
            }
            Command::UnassignPersonnel {
                personnel_id,
                group_id,
            } => Ok(self.unassign_personnel(&personnel_id, &group_id)),
            Command::UpdateUnitDetail {
                group_id,
                unit_id,
                field,
                value,
            } => Ok(self.update_unit_detail(&group_id, &unit_id, field, value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> IncidentBoard {
        IncidentBoard::new(ResourceCatalog::new(
            vec![
                Unit::new("U1", "Para Servicio"),
                Unit::new("U2", "Fuera de Servicio"),
            ],
            vec![Personnel::new("P1", "Ana Rojas", "Capitán")],
        ))
    }

    #[test]
    fn command_json_uses_tagged_snake_case() {
        let json = r#"{"command":"update_unit_detail","group_id":"1","unit_id":"U1","field":"on_scene_time","value":"10:30"}"#;
        let command: Command = serde_json::from_str(json).unwrap();
        assert_eq!(
            command,
            Command::UpdateUnitDetail {
                group_id: GroupId::from("1"),
                unit_id: "U1".into(),
                field: UnitDetailField::OnSceneTime,
                value: "10:30".into(),
            }
        );
        let json = r#"{"command":"create_group","kind":"Unidad Operativa"}"#;
        let command: Command = serde_json::from_str(json).unwrap();
        assert_eq!(
            command,
            Command::CreateGroup {
                kind: GroupKind::UnidadOperativa
            }
        );
    }

    #[test]
    fn apply_routes_assignments_through_checked_path() {
        let mut board = board();
        let groups = board
            .apply(Command::CreateGroup {
                kind: GroupKind::Frente,
            })
            .unwrap();
        let group_id = groups[0].id.clone();
        board
            .apply(Command::AssignUnit {
                unit_id: "U1".into(),
                group_id: group_id.clone(),
            })
            .unwrap();
        let err = board
            .apply(Command::AssignUnit {
                unit_id: "U2".into(),
                group_id: group_id.clone(),
            })
            .unwrap_err();
        assert!(matches!(err, AllocationError::UnitNotEligible { .. }));
        let err = board
            .apply(Command::AssignUnit {
                unit_id: "U9".into(),
                group_id,
            })
            .unwrap_err();
        assert_eq!(err, AllocationError::UnknownUnit("U9".into()));
    }

    #[test]
    fn summary_counts_assigned_available_and_out_of_service() {
        let mut board = board();
        let groups = board.create_group(GroupKind::UnidadOperativa);
        let group_id = groups[0].id.clone();
        board.assign_personnel_by_id("P1", &group_id).unwrap();
        let summary = board.summary();
        assert_eq!(summary.group_count, 1);
        assert_eq!(summary.unidad_operativa_count, 1);
        assert_eq!(summary.available_unit_count, 1);
        assert_eq!(summary.assigned_personnel_count, 1);
        assert_eq!(summary.available_personnel_count, 0);
        assert_eq!(summary.out_of_service_count, 1);
        assert_eq!(
            summary.to_cli_summary(),
            "groups=1, uo=1, units=0/1, personnel=1/1, out_of_service=1"
        );
    }
}
