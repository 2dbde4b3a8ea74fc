use intervention_tool::{
    GroupField, GroupId, GroupKind, IncidentBoard, InterventionGroupStore, Personnel,
    ResourceCatalog, Unit,
};

fn names(store: &InterventionGroupStore) -> Vec<String> {
    store.groups().iter().map(|g| g.name.clone()).collect()
}

#[test]
fn create_group_names_count_current_groups() {
    let mut store = InterventionGroupStore::new();
    store.create_group(GroupKind::Frente);
    store.create_group(GroupKind::Frente);
    assert_eq!(names(&store), vec!["Nuevo Frente 1", "Nuevo Frente 2"]);

    let first = store.groups()[0].id.clone();
    store.delete_group(&first);
    store.create_group(GroupKind::Frente);
    assert_eq!(names(&store), vec!["Nuevo Frente 2", "Nuevo Frente 2"]);
}

#[test]
fn renamed_groups_still_count_towards_the_next_name() {
    let mut store = InterventionGroupStore::new();
    let groups = store.create_group(GroupKind::UnidadOperativa);
    store.rename_group(&groups[0].id, GroupField::Name, "Ataque Norte");
    let groups = store.create_group(GroupKind::UnidadOperativa);
    assert_eq!(groups[1].name, "Nueva Unidad Operativa 2");
}

#[test]
fn new_groups_start_empty_without_officer() {
    let mut store = InterventionGroupStore::new();
    let groups = store.create_group(GroupKind::Frente);
    let group = &groups[0];
    assert_eq!(group.kind, GroupKind::Frente);
    assert!(group.officer_in_charge.is_none());
    assert!(group.units.is_empty());
    assert!(group.personnel.is_empty());
}

#[test]
fn rename_group_sets_name_and_officer() {
    let mut store = InterventionGroupStore::new();
    let groups = store.create_group(GroupKind::Frente);
    let id = groups[0].id.clone();
    store.rename_group(&id, GroupField::Name, "Sector Sur");
    let groups = store.rename_group(&id, GroupField::OfficerInCharge, "Capitán Ana Rojas");
    assert_eq!(groups[0].name, "Sector Sur");
    assert_eq!(groups[0].officer_in_charge.as_deref(), Some("Capitán Ana Rojas"));
}

#[test]
fn rename_and_delete_unknown_group_leave_collection_unchanged() {
    let mut store = InterventionGroupStore::new();
    store.create_group(GroupKind::Frente);
    let before = store.groups().to_vec();
    store.rename_group(&GroupId::from("nope"), GroupField::Name, "X");
    store.delete_group(&GroupId::from("nope"));
    assert_eq!(store.groups(), before.as_slice());
}

#[test]
fn deleting_a_group_releases_everything_it_held() {
    let catalog = ResourceCatalog::new(
        vec![Unit::new("B-1", "para servicio"), Unit::new("B-2", "para servicio")],
        vec![Personnel::new("P1", "Ana Rojas", "Capitán")],
    );
    let mut board = IncidentBoard::new(catalog);
    let pristine = board.snapshot();

    let groups = board.create_group(GroupKind::Frente);
    let id = groups[0].id.clone();
    board.assign_unit_by_id("B-1", &id).unwrap();
    board.assign_unit_by_id("B-2", &id).unwrap();
    board.assign_personnel_by_id("P1", &id).unwrap();
    assert!(board.available_units().is_empty());
    assert!(board.available_personnel().is_empty());

    board.delete_group(&id);
    assert_eq!(board.snapshot(), pristine);
}

#[test]
fn group_name_snapshot_is_not_rewritten_on_rename() {
    let catalog = ResourceCatalog::new(vec![Unit::new("B-1", "para servicio")], Vec::new());
    let mut board = IncidentBoard::new(catalog);
    let groups = board.create_group(GroupKind::Frente);
    let id = groups[0].id.clone();
    board.assign_unit_by_id("B-1", &id).unwrap();
    let groups = board.rename_group(&id, GroupField::Name, "Sector Norte");
    assert_eq!(groups[0].name, "Sector Norte");
    assert_eq!(groups[0].units[0].group_name, "Nuevo Frente 1");
}
