use crate::catalog::DEFAULT_ELIGIBLE_STATUS;
use crate::group::{GroupField, GroupId, GroupKind, InterventionGroup};
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

/// Colour given to a unit's map marker when it is first assigned.
pub const DEFAULT_MAP_COLOR: &str = "#ff0000";

/// Immutable view of every group at one point in time. Each mutation
/// produces a new collection; holders of an older one keep seeing it intact.
pub type GroupCollection = Arc<Vec<InterventionGroup>>;

/// Authoritative collection of intervention groups.
///
/// Writes go through [`Arc::make_mut`], so outstanding snapshots are copied
/// away from rather than modified. Operations addressed to an unknown group
/// leave the collection untouched and return the current snapshot.
#[derive(Debug, Clone)]
pub struct InterventionGroupStore {
    groups: GroupCollection,
    pub(crate) map_color: String,
    pub(crate) eligible_status: String,
}

impl Default for InterventionGroupStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InterventionGroupStore {
    pub fn new() -> Self {
        Self::from_groups(Vec::new())
    }

    pub fn from_groups(groups: Vec<InterventionGroup>) -> Self {
        Self {
            groups: Arc::new(groups),
            map_color: DEFAULT_MAP_COLOR.to_string(),
            eligible_status: DEFAULT_ELIGIBLE_STATUS.to_string(),
        }
    }

    pub fn with_map_color(mut self, color: impl Into<String>) -> Self {
        self.map_color = color.into();
        self
    }

    pub fn with_eligible_status(mut self, status: impl Into<String>) -> Self {
        self.eligible_status = status.into();
        self
    }

    pub fn groups(&self) -> &[InterventionGroup] {
        &self.groups
    }

    pub fn snapshot(&self) -> GroupCollection {
        Arc::clone(&self.groups)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn find(&self, group_id: &GroupId) -> Option<&InterventionGroup> {
        self.groups.iter().find(|group| &group.id == group_id)
    }

    pub(crate) fn position(&self, group_id: &GroupId) -> Option<usize> {
        self.groups.iter().position(|group| &group.id == group_id)
    }

    /// Replaces the whole collection, e.g. after loading it from a store.
    pub fn replace(&mut self, groups: Vec<InterventionGroup>) -> GroupCollection {
        self.groups = Arc::new(groups);
        self.snapshot()
    }

    /// Runs `mutator` on the group at `idx` in a copy-on-write fashion.
    pub(crate) fn mutate_at<F>(&mut self, idx: usize, mutator: F) -> GroupCollection
    where
        F: FnOnce(&mut InterventionGroup),
    {
        let groups = Arc::make_mut(&mut self.groups);
        mutator(&mut groups[idx]);
        self.snapshot()
    }

    /// Suggested display name for the next group of `kind`: one more than
    /// the number of groups of that kind that exist right now.
    pub fn next_group_name(&self, kind: GroupKind) -> String {
        let existing = self.groups.iter().filter(|group| group.kind == kind).count();
        format!("{} {} {}", kind.new_name_prefix(), kind.label(), existing + 1)
    }

    fn generate_id(&self) -> GroupId {
        let mut stamp = Utc::now().timestamp_millis();
        loop {
            let candidate = GroupId::new(stamp.to_string());
            if self.find(&candidate).is_none() {
                return candidate;
            }
            stamp += 1;
        }
    }

    pub fn create_group(&mut self, kind: GroupKind) -> GroupCollection {
        let id = self.generate_id();
        let name = self.next_group_name(kind);
        debug!(group_id = %id, %kind, %name, "creating group");
        Arc::make_mut(&mut self.groups).push(InterventionGroup::new(id, kind, name));
        self.snapshot()
    }

    /// Removes the group and everything it holds. Its units and personnel
    /// become available again on the next availability read.
    pub fn delete_group(&mut self, group_id: &GroupId) -> GroupCollection {
        let Some(idx) = self.position(group_id) else {
            debug!(%group_id, "delete ignored: unknown group");
            return self.snapshot();
        };
        let removed = Arc::make_mut(&mut self.groups).remove(idx);
        debug!(
            %group_id,
            released_units = removed.units.len(),
            released_personnel = removed.personnel.len(),
            "deleted group"
        );
        self.snapshot()
    }

    pub fn rename_group(
        &mut self,
        group_id: &GroupId,
        field: GroupField,
        value: impl Into<String>,
    ) -> GroupCollection {
        let Some(idx) = self.position(group_id) else {
            debug!(%group_id, field = field.as_str(), "edit ignored: unknown group");
            return self.snapshot();
        };
        let value = value.into();
        debug!(%group_id, field = field.as_str(), %value, "editing group");
        self.mutate_at(idx, |group| group.set_field(field, value))
    }

    /// Group currently holding `unit_id`, if any.
    pub fn group_of_unit(&self, unit_id: &str) -> Option<&InterventionGroup> {
        self.groups.iter().find(|group| group.holds_unit(unit_id))
    }

    pub fn group_of_personnel(&self, personnel_id: &str) -> Option<&InterventionGroup> {
        self.groups
            .iter()
            .find(|group| group.holds_personnel(personnel_id))
    }
}
