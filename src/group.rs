use crate::catalog::{Personnel, Unit};
use crate::error::AllocationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two kinds of work group a commander can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKind {
    #[serde(rename = "Frente", alias = "frente")]
    Frente,
    #[serde(rename = "Unidad Operativa", alias = "unidad_operativa")]
    UnidadOperativa,
}

impl GroupKind {
    pub fn label(&self) -> &'static str {
        match self {
            GroupKind::Frente => "Frente",
            GroupKind::UnidadOperativa => "Unidad Operativa",
        }
    }

    /// Prefix of generated group names, agreeing with the label's gender.
    pub fn new_name_prefix(&self) -> &'static str {
        match self {
            GroupKind::Frente => "Nuevo",
            GroupKind::UnidadOperativa => "Nueva",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GroupKind {
    type Err = AllocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "frente" => Ok(GroupKind::Frente),
            "unidad operativa" | "uo" => Ok(GroupKind::UnidadOperativa),
            _ => Err(AllocationError::UnknownField(format!(
                "unknown group kind '{s}'"
            ))),
        }
    }
}

/// Identifier of an intervention group, stamped at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for GroupId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Group-level attributes that can be edited after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupField {
    Name,
    OfficerInCharge,
}

impl GroupField {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupField::Name => "name",
            GroupField::OfficerInCharge => "officer_in_charge",
        }
    }
}

impl FromStr for GroupField {
    type Err = AllocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "name" => Ok(GroupField::Name),
            "officer" | "officer_in_charge" | "officerInCharge" => Ok(GroupField::OfficerInCharge),
            other => Err(AllocationError::UnknownField(format!(
                "unknown group field '{other}'"
            ))),
        }
    }
}

/// Per-unit operational detail that can be edited while the unit is assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitDetailField {
    Task,
    LocationInScene,
    WorkTime,
    DepartureTime,
    OnSceneTime,
    ReturnTime,
    MapLabel,
    MapColor,
}

impl UnitDetailField {
    pub const ALL: [UnitDetailField; 8] = [
        UnitDetailField::Task,
        UnitDetailField::LocationInScene,
        UnitDetailField::WorkTime,
        UnitDetailField::DepartureTime,
        UnitDetailField::OnSceneTime,
        UnitDetailField::ReturnTime,
        UnitDetailField::MapLabel,
        UnitDetailField::MapColor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitDetailField::Task => "task",
            UnitDetailField::LocationInScene => "location_in_scene",
            UnitDetailField::WorkTime => "work_time",
            UnitDetailField::DepartureTime => "departure_time",
            UnitDetailField::OnSceneTime => "on_scene_time",
            UnitDetailField::ReturnTime => "return_time",
            UnitDetailField::MapLabel => "map_label",
            UnitDetailField::MapColor => "map_color",
        }
    }
}

impl FromStr for UnitDetailField {
    type Err = AllocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == key)
            .ok_or_else(|| {
                AllocationError::UnknownField(format!("unknown unit detail field '{key}'"))
            })
    }
}

/// A unit committed to a group, with the operational detail recorded while
/// it works there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedUnit {
    #[serde(flatten)]
    pub unit: Unit,
    /// Name of the owning group at the time of assignment.
    pub group_name: String,
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub location_in_scene: String,
    #[serde(default)]
    pub work_time: String,
    /// Local `HH:MM` the unit left for the scene.
    #[serde(default)]
    pub departure_time: String,
    #[serde(default)]
    pub on_scene_time: String,
    #[serde(default)]
    pub return_time: String,
    #[serde(default)]
    pub map_label: String,
    #[serde(default)]
    pub map_color: String,
}

impl TrackedUnit {
    pub fn new(
        unit: Unit,
        group_name: impl Into<String>,
        departure_time: impl Into<String>,
        map_color: impl Into<String>,
    ) -> Self {
        let map_label = unit.id.clone();
        Self {
            unit,
            group_name: group_name.into(),
            task: String::new(),
            location_in_scene: String::new(),
            work_time: String::new(),
            departure_time: departure_time.into(),
            on_scene_time: String::new(),
            return_time: String::new(),
            map_label,
            map_color: map_color.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.unit.id
    }

    pub fn field(&self, field: UnitDetailField) -> &str {
        match field {
            UnitDetailField::Task => &self.task,
            UnitDetailField::LocationInScene => &self.location_in_scene,
            UnitDetailField::WorkTime => &self.work_time,
            UnitDetailField::DepartureTime => &self.departure_time,
            UnitDetailField::OnSceneTime => &self.on_scene_time,
            UnitDetailField::ReturnTime => &self.return_time,
            UnitDetailField::MapLabel => &self.map_label,
            UnitDetailField::MapColor => &self.map_color,
        }
    }

    pub fn set_field(&mut self, field: UnitDetailField, value: impl Into<String>) {
        let slot = match field {
            UnitDetailField::Task => &mut self.task,
            UnitDetailField::LocationInScene => &mut self.location_in_scene,
            UnitDetailField::WorkTime => &mut self.work_time,
            UnitDetailField::DepartureTime => &mut self.departure_time,
            UnitDetailField::OnSceneTime => &mut self.on_scene_time,
            UnitDetailField::ReturnTime => &mut self.return_time,
            UnitDetailField::MapLabel => &mut self.map_label,
            UnitDetailField::MapColor => &mut self.map_color,
        };
        *slot = value.into();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedPersonnel {
    #[serde(flatten)]
    pub person: Personnel,
    pub group_name: String,
}

impl TrackedPersonnel {
    pub fn new(person: Personnel, group_name: impl Into<String>) -> Self {
        Self {
            person,
            group_name: group_name.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.person.id
    }
}

/// An ad-hoc work team holding the units and personnel committed to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterventionGroup {
    pub id: GroupId,
    pub kind: GroupKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub officer_in_charge: Option<String>,
    #[serde(default)]
    pub units: Vec<TrackedUnit>,
    #[serde(default)]
    pub personnel: Vec<TrackedPersonnel>,
}

impl InterventionGroup {
    pub fn new(id: GroupId, kind: GroupKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            officer_in_charge: None,
            units: Vec::new(),
            personnel: Vec::new(),
        }
    }

    pub fn unit(&self, unit_id: &str) -> Option<&TrackedUnit> {
        self.units.iter().find(|tracked| tracked.id() == unit_id)
    }

    pub fn holds_unit(&self, unit_id: &str) -> bool {
        self.unit(unit_id).is_some()
    }

    pub fn holds_personnel(&self, personnel_id: &str) -> bool {
        self.personnel
            .iter()
            .any(|tracked| tracked.id() == personnel_id)
    }

    /// Applies a group-level edit. A blank officer clears the field.
    pub fn set_field(&mut self, field: GroupField, value: impl Into<String>) {
        let value = value.into();
        match field {
            GroupField::Name => self.name = value,
            GroupField::OfficerInCharge => {
                self.officer_in_charge = if value.trim().is_empty() {
                    None
                } else {
                    Some(value)
                };
            }
        }
    }
}
