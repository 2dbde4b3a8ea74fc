//! Membership bookkeeping: moving units and personnel in and out of groups
//! and recording what each assigned unit is doing.
//!
//! The plain operations trust the caller to pick resources from the current
//! availability snapshot. Assigning the same resource twice creates two
//! tracked entries; the `try_*` variants refuse instead.

use crate::catalog::{Personnel, Unit};
use crate::error::{AllocationError, AllocationResult};
use crate::group::{GroupId, TrackedPersonnel, TrackedUnit, UnitDetailField};
use crate::store::{GroupCollection, InterventionGroupStore};
use chrono::{Local, NaiveTime};
use tracing::{debug, warn};

/// Wall-clock format used for the departure stamp.
pub const DEPARTURE_FORMAT: &str = "%H:%M";

impl InterventionGroupStore {
    /// Assigns `unit` to the group, stamping the departure with the current
    /// local time.
    pub fn assign_unit(&mut self, unit: &Unit, group_id: &GroupId) -> GroupCollection {
        self.assign_unit_at(unit, group_id, Local::now().time())
    }

    pub fn assign_unit_at(
        &mut self,
        unit: &Unit,
        group_id: &GroupId,
        departure: NaiveTime,
    ) -> GroupCollection {
        let Some(idx) = self.position(group_id) else {
            debug!(%group_id, unit_id = %unit.id, "assign ignored: unknown group");
            return self.snapshot();
        };
        if let Some(holder) = self.group_of_unit(&unit.id) {
            warn!(
                unit_id = %unit.id,
                held_by = %holder.id,
                %group_id,
                "unit assigned while already tracked by another group"
            );
        }
        let map_color = self.map_color.clone();
        let departure = departure.format(DEPARTURE_FORMAT).to_string();
        debug!(%group_id, unit_id = %unit.id, %departure, "assigning unit");
        self.mutate_at(idx, |group| {
            let tracked = TrackedUnit::new(unit.clone(), group.name.clone(), departure, map_color);
            group.units.push(tracked);
        })
    }

    pub fn assign_personnel(&mut self, person: &Personnel, group_id: &GroupId) -> GroupCollection {
        let Some(idx) = self.position(group_id) else {
            debug!(%group_id, personnel_id = %person.id, "assign ignored: unknown group");
            return self.snapshot();
        };
        if let Some(holder) = self.group_of_personnel(&person.id) {
            warn!(
                personnel_id = %person.id,
                held_by = %holder.id,
                %group_id,
                "personnel assigned while already tracked by another group"
            );
        }
        debug!(%group_id, personnel_id = %person.id, "assigning personnel");
        self.mutate_at(idx, |group| {
            let tracked = TrackedPersonnel::new(person.clone(), group.name.clone());
            group.personnel.push(tracked);
        })
    }

    pub fn unassign_unit(&mut self, unit_id: &str, group_id: &GroupId) -> GroupCollection {
        let Some(idx) = self.position(group_id) else {
            debug!(%group_id, unit_id, "unassign ignored: unknown group");
            return self.snapshot();
        };
        if !self.groups()[idx].holds_unit(unit_id) {
            debug!(%group_id, unit_id, "unassign ignored: unit not in group");
            return self.snapshot();
        }
        debug!(%group_id, unit_id, "unassigning unit");
        self.mutate_at(idx, |group| group.units.retain(|tracked| tracked.id() != unit_id))
    }

    pub fn unassign_personnel(
        &mut self,
        personnel_id: &str,
        group_id: &GroupId,
    ) -> GroupCollection {
        let Some(idx) = self.position(group_id) else {
            debug!(%group_id, personnel_id, "unassign ignored: unknown group");
            return self.snapshot();
        };
        if !self.groups()[idx].holds_personnel(personnel_id) {
            debug!(%group_id, personnel_id, "unassign ignored: personnel not in group");
            return self.snapshot();
        }
        debug!(%group_id, personnel_id, "unassigning personnel");
        self.mutate_at(idx, |group| {
            group
                .personnel
                .retain(|tracked| tracked.id() != personnel_id)
        })
    }

    /// Sets one detail field on an assigned unit. Every tracked entry with
    /// that identifier in the group is updated.
    pub fn update_unit_detail(
        &mut self,
        group_id: &GroupId,
        unit_id: &str,
        field: UnitDetailField,
        value: impl Into<String>,
    ) -> GroupCollection {
        let Some(idx) = self.position(group_id) else {
            debug!(%group_id, unit_id, "detail update ignored: unknown group");
            return self.snapshot();
        };
        if !self.groups()[idx].holds_unit(unit_id) {
            debug!(%group_id, unit_id, "detail update ignored: unit not in group");
            return self.snapshot();
        }
        let value = value.into();
        debug!(%group_id, unit_id, field = field.as_str(), %value, "updating unit detail");
        self.mutate_at(idx, |group| {
            for tracked in group.units.iter_mut().filter(|t| t.id() == unit_id) {
                tracked.set_field(field, value.clone());
            }
        })
    }

    /// Like [`assign_unit`](Self::assign_unit) but refuses unknown groups,
    /// units already held by any group, and units whose status is not
    /// eligible.
    pub fn try_assign_unit(
        &mut self,
        unit: &Unit,
        group_id: &GroupId,
    ) -> AllocationResult<GroupCollection> {
        if self.position(group_id).is_none() {
            return Err(AllocationError::UnknownGroup(group_id.clone()));
        }
        if let Some(holder) = self.group_of_unit(&unit.id) {
            return Err(AllocationError::UnitAlreadyAssigned {
                unit_id: unit.id.clone(),
                group_id: holder.id.clone(),
            });
        }
        if !unit.is_eligible(&self.eligible_status) {
            return Err(AllocationError::UnitNotEligible {
                unit_id: unit.id.clone(),
                status: unit.status.clone(),
            });
        }
        Ok(self.assign_unit(unit, group_id))
    }

    pub fn try_assign_personnel(
        &mut self,
        person: &Personnel,
        group_id: &GroupId,
    ) -> AllocationResult<GroupCollection> {
        if self.position(group_id).is_none() {
            return Err(AllocationError::UnknownGroup(group_id.clone()));
        }
        if let Some(holder) = self.group_of_personnel(&person.id) {
            return Err(AllocationError::PersonnelAlreadyAssigned {
                personnel_id: person.id.clone(),
                group_id: holder.id.clone(),
            });
        }
        Ok(self.assign_personnel(person, group_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GroupKind;

    fn store_with_group() -> (InterventionGroupStore, GroupId) {
        let mut store = InterventionGroupStore::new();
        let groups = store.create_group(GroupKind::Frente);
        let id = groups[0].id.clone();
        (store, id)
    }

    #[test]
    fn assign_unit_stamps_departure_and_group_name() {
        let (mut store, id) = store_with_group();
        let departure = NaiveTime::from_hms_opt(7, 5, 0).unwrap();
        let groups = store.assign_unit_at(&Unit::new("B-1", "para servicio"), &id, departure);
        let tracked = &groups[0].units[0];
        assert_eq!(tracked.group_name, "Nuevo Frente 1");
        assert_eq!(tracked.departure_time, "07:05");
        assert_eq!(tracked.map_label, "B-1");
        assert_eq!(tracked.map_color, crate::store::DEFAULT_MAP_COLOR);
    }

    #[test]
    fn unchecked_assignment_duplicates_across_groups() {
        let (mut store, first) = store_with_group();
        let groups = store.create_group(GroupKind::Frente);
        let second = groups[1].id.clone();
        let unit = Unit::new("B-1", "para servicio");
        store.assign_unit(&unit, &first);
        let groups = store.assign_unit(&unit, &second);
        assert!(groups[0].holds_unit("B-1"));
        assert!(groups[1].holds_unit("B-1"));
    }

    #[test]
    fn checked_assignment_rejects_second_group() {
        let (mut store, first) = store_with_group();
        let groups = store.create_group(GroupKind::UnidadOperativa);
        let second = groups[1].id.clone();
        let unit = Unit::new("B-1", "para servicio");
        store.try_assign_unit(&unit, &first).unwrap();
        let err = store.try_assign_unit(&unit, &second).unwrap_err();
        assert_eq!(
            err,
            AllocationError::UnitAlreadyAssigned {
                unit_id: "B-1".into(),
                group_id: first,
            }
        );
        assert!(store.find(&second).unwrap().units.is_empty());
    }

    #[test]
    fn checked_assignment_rejects_ineligible_status() {
        let (mut store, id) = store_with_group();
        let err = store
            .try_assign_unit(&Unit::new("B-2", "fuera de servicio"), &id)
            .unwrap_err();
        assert!(matches!(err, AllocationError::UnitNotEligible { .. }));
    }

    #[test]
    fn personnel_round_trip() {
        let (mut store, id) = store_with_group();
        let person = Personnel::new("P1", "Ana Rojas", "Capitán");
        let groups = store.assign_personnel(&person, &id);
        assert_eq!(groups[0].personnel[0].group_name, "Nuevo Frente 1");
        let groups = store.unassign_personnel("P1", &id);
        assert!(groups[0].personnel.is_empty());
    }
}
