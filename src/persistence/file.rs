use super::{BoardStore, PersistenceError, PersistenceResult};
use crate::catalog::{Personnel, ResourceCatalog, Unit};
use crate::group::{InterventionGroup, TrackedUnit};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Serialize, Deserialize)]
struct BoardFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saved_at: Option<DateTime<Utc>>,
    groups: Vec<InterventionGroup>,
}

pub fn save_groups_to_json<P: AsRef<Path>>(
    groups: &[InterventionGroup],
    path: P,
) -> PersistenceResult<()> {
    super::validate_groups(groups)?;
    let snapshot = BoardFile {
        saved_at: Some(Utc::now()),
        groups: groups.to_vec(),
    };
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    info!(path = %path.as_ref().display(), groups = groups.len(), "board saved");
    Ok(())
}

pub fn load_groups_from_json<P: AsRef<Path>>(
    path: P,
) -> PersistenceResult<Vec<InterventionGroup>> {
    let file = File::open(path.as_ref())?;
    let snapshot: BoardFile = serde_json::from_reader(file)?;
    super::validate_groups(&snapshot.groups)?;
    info!(
        path = %path.as_ref().display(),
        groups = snapshot.groups.len(),
        "board loaded"
    );
    Ok(snapshot.groups)
}

/// [`BoardStore`] backed by a single JSON file. A missing file loads as
/// "nothing stored".
#[derive(Debug, Clone)]
pub struct JsonFileBoardStore {
    path: PathBuf,
}

impl JsonFileBoardStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BoardStore for JsonFileBoardStore {
    fn save_groups(&self, groups: &[InterventionGroup]) -> PersistenceResult<()> {
        save_groups_to_json(groups, &self.path)
    }

    fn load_groups(&self) -> PersistenceResult<Option<Vec<InterventionGroup>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        load_groups_from_json(&self.path).map(Some)
    }
}

#[derive(Default, Serialize, Deserialize)]
struct UnitCsvRecord {
    id: String,
    #[serde(default)]
    unit_type: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    officer_in_charge: String,
    #[serde(default)]
    personnel_count: String,
    #[serde(default)]
    station: String,
}

impl UnitCsvRecord {
    fn into_unit(self) -> PersistenceResult<Unit> {
        if self.id.trim().is_empty() {
            return Err(PersistenceError::InvalidData(
                "unit row requires a non-empty id".into(),
            ));
        }
        let mut unit = Unit::new(self.id.trim(), self.status.trim());
        unit.unit_type = self.unit_type.trim().to_string();
        unit.officer_in_charge = parse_string_option(self.officer_in_charge);
        unit.personnel_count = parse_u32(&self.personnel_count)?;
        unit.station = self.station.trim().to_string();
        Ok(unit)
    }
}

#[derive(Default, Serialize, Deserialize)]
struct PersonnelCsvRecord {
    id: String,
    name: String,
    #[serde(default)]
    rank: String,
}

impl PersonnelCsvRecord {
    fn into_personnel(self) -> PersistenceResult<Personnel> {
        if self.id.trim().is_empty() || self.name.trim().is_empty() {
            return Err(PersistenceError::InvalidData(format!(
                "personnel row '{}' requires an id and a name",
                self.id
            )));
        }
        Ok(Personnel::new(
            self.id.trim(),
            self.name.trim(),
            self.rank.trim(),
        ))
    }
}

/// Reads the unit report and any number of personnel rosters into a
/// catalog. Rosters are merged in the order given.
pub fn load_catalog_from_csv<P, Q>(
    units_path: P,
    personnel_paths: &[Q],
) -> PersistenceResult<ResourceCatalog>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let mut reader = csv::Reader::from_reader(File::open(units_path.as_ref())?);
    let mut units = Vec::new();
    for record in reader.deserialize::<UnitCsvRecord>() {
        units.push(record?.into_unit()?);
    }

    let mut rosters = Vec::with_capacity(personnel_paths.len());
    for path in personnel_paths {
        let mut reader = csv::Reader::from_reader(File::open(path.as_ref())?);
        let mut roster = Vec::new();
        for record in reader.deserialize::<PersonnelCsvRecord>() {
            roster.push(record?.into_personnel()?);
        }
        rosters.push(roster);
    }

    let catalog = ResourceCatalog::from_rosters(units, rosters);
    info!(
        units = catalog.units().len(),
        personnel = catalog.personnel().len(),
        "catalog read from csv reports"
    );
    Ok(catalog)
}

#[derive(Serialize)]
struct ResourceLogRecord<'a> {
    group_id: &'a str,
    group_kind: &'static str,
    group_name: &'a str,
    officer_in_charge: &'a str,
    unit_id: &'a str,
    unit_type: &'a str,
    station: &'a str,
    assigned_as: &'a str,
    task: &'a str,
    location_in_scene: &'a str,
    work_time: &'a str,
    departure_time: &'a str,
    on_scene_time: &'a str,
    return_time: &'a str,
}

impl<'a> ResourceLogRecord<'a> {
    fn new(group: &'a InterventionGroup, tracked: &'a TrackedUnit) -> Self {
        Self {
            group_id: group.id.as_str(),
            group_kind: group.kind.label(),
            group_name: &group.name,
            officer_in_charge: group.officer_in_charge.as_deref().unwrap_or_default(),
            unit_id: tracked.id(),
            unit_type: &tracked.unit.unit_type,
            station: &tracked.unit.station,
            assigned_as: &tracked.group_name,
            task: &tracked.task,
            location_in_scene: &tracked.location_in_scene,
            work_time: &tracked.work_time,
            departure_time: &tracked.departure_time,
            on_scene_time: &tracked.on_scene_time,
            return_time: &tracked.return_time,
        }
    }
}

/// Writes one row per tracked unit, in group order, for the resource log.
pub fn save_resource_log_to_csv<P: AsRef<Path>>(
    groups: &[InterventionGroup],
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for group in groups {
        for tracked in &group.units {
            writer.serialize(ResourceLogRecord::new(group, tracked))?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn parse_u32(input: &str) -> PersistenceResult<Option<u32>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input
        .trim()
        .parse::<u32>()
        .map(Some)
        .map_err(|e| PersistenceError::InvalidData(format!("invalid integer '{input}': {e}")))
}

fn parse_string_option(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.trim().to_string())
    }
}
