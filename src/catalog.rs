use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Status value that marks a unit as ready to be committed to a group.
pub const DEFAULT_ELIGIBLE_STATUS: &str = "para servicio";

/// A fire apparatus as reported by the external unit roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Call sign of the apparatus. Unique across the catalog.
    pub id: String,
    /// Apparatus type (pumper, ladder, tanker, ...).
    #[serde(default)]
    pub unit_type: String,
    /// Free-text operational state, e.g. "Para Servicio" or "Fuera de Servicio".
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub officer_in_charge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personnel_count: Option<u32>,
    /// Station or group the unit belongs to outside the incident.
    #[serde(default)]
    pub station: String,
}

impl Unit {
    pub fn new(id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            unit_type: String::new(),
            status: status.into(),
            officer_in_charge: None,
            personnel_count: None,
            station: String::new(),
        }
    }

    /// Whether the unit status matches `eligible_status`, ignoring case and
    /// surrounding whitespace.
    pub fn is_eligible(&self, eligible_status: &str) -> bool {
        self.status
            .trim()
            .eq_ignore_ascii_case(eligible_status.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personnel {
    pub id: String,
    /// Display name. Also the key used to merge several rosters.
    pub name: String,
    #[serde(default)]
    pub rank: String,
}

impl Personnel {
    pub fn new(id: impl Into<String>, name: impl Into<String>, rank: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rank: rank.into(),
        }
    }
}

/// Roster of every unit and person known to the incident, as last reported
/// by the external feed. The allocation core reads it but never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCatalog {
    #[serde(default)]
    units: Vec<Unit>,
    #[serde(default)]
    personnel: Vec<Personnel>,
}

impl ResourceCatalog {
    pub fn new(units: Vec<Unit>, personnel: Vec<Personnel>) -> Self {
        Self::from_rosters(units, [personnel])
    }

    /// Builds a catalog from one unit list and any number of personnel
    /// rosters. The first occurrence of a name wins; later rosters add no
    /// duplicate entry for a name already seen. Repeated identifiers are
    /// dropped the same way.
    pub fn from_rosters<I>(units: Vec<Unit>, rosters: I) -> Self
    where
        I: IntoIterator<Item = Vec<Personnel>>,
    {
        let mut seen_units = HashSet::new();
        let units = units
            .into_iter()
            .filter(|unit| seen_units.insert(unit.id.clone()))
            .collect();

        let mut seen_names = HashSet::new();
        let mut seen_ids = HashSet::new();
        let mut personnel = Vec::new();
        for roster in rosters {
            for person in roster {
                let name_key = person.name.trim().to_string();
                if seen_names.contains(&name_key) || seen_ids.contains(&person.id) {
                    continue;
                }
                seen_names.insert(name_key);
                seen_ids.insert(person.id.clone());
                personnel.push(person);
            }
        }

        Self { units, personnel }
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn personnel(&self) -> &[Personnel] {
        &self.personnel
    }

    pub fn unit(&self, unit_id: &str) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.id == unit_id)
    }

    pub fn person(&self, personnel_id: &str) -> Option<&Personnel> {
        self.personnel.iter().find(|person| person.id == personnel_id)
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty() && self.personnel.is_empty()
    }

    /// Roster names matching `query` (case-insensitive substring), in roster
    /// order. An empty query matches everyone.
    pub fn suggest_officers(&self, query: &str) -> Vec<String> {
        let needle = query.trim().to_lowercase();
        self.personnel
            .iter()
            .filter(|person| needle.is_empty() || person.name.to_lowercase().contains(&needle))
            .map(|person| match person.rank.trim() {
                "" => person.name.clone(),
                rank => format!("{rank} {}", person.name),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eligibility_ignores_case_and_padding() {
        assert!(Unit::new("B-1", " Para Servicio ").is_eligible(DEFAULT_ELIGIBLE_STATUS));
        assert!(!Unit::new("B-2", "Fuera de Servicio").is_eligible(DEFAULT_ELIGIBLE_STATUS));
    }

    #[test]
    fn rosters_are_merged_by_name_first_wins() {
        let first = vec![
            Personnel::new("P1", "Ana Rojas", "Capitán"),
            Personnel::new("P2", "Luis Soto", "Bombero"),
        ];
        let second = vec![
            Personnel::new("X9", "Luis Soto", "Teniente"),
            Personnel::new("P3", "Eva Díaz", "Bombero"),
        ];
        let catalog = ResourceCatalog::from_rosters(Vec::new(), [first, second]);
        let ids: Vec<_> = catalog.personnel().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["P1", "P2", "P3"]);
        assert_eq!(catalog.person("P2").unwrap().rank, "Bombero");
        assert!(catalog.person("X9").is_none());
    }

    #[test]
    fn officer_suggestions_include_rank() {
        let catalog = ResourceCatalog::new(
            Vec::new(),
            vec![
                Personnel::new("P1", "Ana Rojas", "Capitán"),
                Personnel::new("P2", "Luis Soto", ""),
            ],
        );
        assert_eq!(catalog.suggest_officers("rOj"), vec!["Capitán Ana Rojas"]);
        assert_eq!(catalog.suggest_officers("").len(), 2);
    }
}
