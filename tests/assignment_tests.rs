use chrono::NaiveTime;
use intervention_tool::{
    GroupId, GroupKind, InterventionGroupStore, Personnel, Unit, UnitDetailField,
};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn two_groups() -> (InterventionGroupStore, GroupId, GroupId) {
    let mut store = InterventionGroupStore::new();
    store.create_group(GroupKind::Frente);
    let groups = store.create_group(GroupKind::UnidadOperativa);
    (store, groups[0].id.clone(), groups[1].id.clone())
}

#[test]
fn assign_then_unassign_round_trips_and_leaves_other_groups_alone() {
    let (mut store, first, second) = two_groups();
    let other = Unit::new("B-9", "para servicio");
    store.assign_unit(&other, &second);
    let before = store.groups().to_vec();

    let unit = Unit::new("B-1", "para servicio");
    store.assign_unit(&unit, &first);
    assert!(store.find(&first).unwrap().holds_unit("B-1"));

    store.unassign_unit("B-1", &first);
    assert_eq!(store.groups(), before.as_slice());
}

#[test]
fn units_keep_assignment_order() {
    let (mut store, first, _) = two_groups();
    for id in ["B-3", "B-1", "B-2"] {
        store.assign_unit(&Unit::new(id, "para servicio"), &first);
    }
    let ids: Vec<_> = store
        .find(&first)
        .unwrap()
        .units
        .iter()
        .map(|u| u.id().to_string())
        .collect();
    assert_eq!(ids, vec!["B-3", "B-1", "B-2"]);
}

#[test]
fn assigning_to_unknown_group_is_a_no_op() {
    let (mut store, _, _) = two_groups();
    let before = store.groups().to_vec();
    store.assign_unit(&Unit::new("B-1", "para servicio"), &GroupId::from("missing"));
    store.assign_personnel(&Personnel::new("P1", "Ana", ""), &GroupId::from("missing"));
    assert_eq!(store.groups(), before.as_slice());
}

#[test]
fn unassign_missing_unit_is_a_no_op() {
    let (mut store, first, _) = two_groups();
    store.assign_unit(&Unit::new("B-1", "para servicio"), &first);
    let before = store.groups().to_vec();
    store.unassign_unit("B-7", &first);
    store.unassign_personnel("P7", &first);
    store.unassign_unit("B-1", &GroupId::from("missing"));
    assert_eq!(store.groups(), before.as_slice());
}

#[test]
fn update_unit_detail_sets_every_field() {
    let (mut store, first, _) = two_groups();
    store.assign_unit_at(&Unit::new("B-1", "para servicio"), &first, t(9, 15));
    let values = [
        (UnitDetailField::Task, "Ataque interior"),
        (UnitDetailField::LocationInScene, "Acceso norte"),
        (UnitDetailField::WorkTime, "00:45"),
        (UnitDetailField::DepartureTime, "09:20"),
        (UnitDetailField::OnSceneTime, "09:32"),
        (UnitDetailField::ReturnTime, "11:05"),
        (UnitDetailField::MapLabel, "B1"),
        (UnitDetailField::MapColor, "#00ff00"),
    ];
    for (field, value) in values {
        store.update_unit_detail(&first, "B-1", field, value);
    }
    let tracked = store.find(&first).unwrap().unit("B-1").unwrap().clone();
    for (field, value) in values {
        assert_eq!(tracked.field(field), value, "field {}", field.as_str());
    }
}

#[test]
fn update_unit_detail_on_missing_pair_changes_nothing() {
    let (mut store, first, second) = two_groups();
    store.assign_unit_at(&Unit::new("B-1", "para servicio"), &first, t(8, 0));
    let before = store.groups().to_vec();
    store.update_unit_detail(&second, "B-1", UnitDetailField::Task, "x");
    store.update_unit_detail(&first, "B-2", UnitDetailField::Task, "x");
    store.update_unit_detail(&GroupId::from("missing"), "B-1", UnitDetailField::Task, "x");
    assert_eq!(store.groups(), before.as_slice());
}

#[test]
fn departure_defaults_to_hh_mm() {
    let (mut store, first, _) = two_groups();
    let groups = store.assign_unit(&Unit::new("B-1", "para servicio"), &first);
    let departure = &groups[0].units[0].departure_time;
    assert!(NaiveTime::parse_from_str(departure, "%H:%M").is_ok(), "{departure}");
}

#[test]
fn custom_map_color_is_used_for_new_assignments() {
    let mut store = InterventionGroupStore::new().with_map_color("#0000ff");
    let groups = store.create_group(GroupKind::Frente);
    let id = groups[0].id.clone();
    let groups = store.assign_unit(&Unit::new("B-1", "para servicio"), &id);
    assert_eq!(groups[0].units[0].map_color, "#0000ff");
}

#[test]
fn reassignment_requires_unassign_first_on_checked_path() {
    let (mut store, first, second) = two_groups();
    let person = Personnel::new("P1", "Ana Rojas", "Capitán");
    store.try_assign_personnel(&person, &first).unwrap();
    assert!(store.try_assign_personnel(&person, &second).is_err());
    store.unassign_personnel("P1", &first);
    store.try_assign_personnel(&person, &second).unwrap();
    assert_eq!(store.group_of_personnel("P1").unwrap().id, second);
}
