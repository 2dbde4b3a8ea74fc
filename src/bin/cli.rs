use intervention_tool::{
    BoardConfig, BoardStore, GroupField, GroupId, GroupKind, IncidentBoard, InterventionGroup,
    JsonFileBoardStore, ResourceCatalog, UnitDetailField, load_catalog_from_csv,
    load_groups_from_json, save_groups_to_json, save_resource_log_to_csv,
};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

fn render_row<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::from("|");
    for (ci, cell) in cells.enumerate() {
        let pad = widths[ci].saturating_sub(cell.chars().count());
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(pad));
        line.push_str(" |");
    }
    line
}

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&widths, headers.iter().copied()));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(&widths, row.iter().map(String::as_str)));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_groups(groups: &[InterventionGroup]) -> String {
    let mut rows = Vec::new();
    for (idx, group) in groups.iter().enumerate() {
        let officer = group.officer_in_charge.clone().unwrap_or_default();
        let units = group
            .units
            .iter()
            .map(|t| t.id().to_string())
            .collect::<Vec<_>>()
            .join(",");
        let personnel = group
            .personnel
            .iter()
            .map(|t| t.person.name.clone())
            .collect::<Vec<_>>()
            .join(",");
        rows.push(vec![
            (idx + 1).to_string(),
            group.id.to_string(),
            group.kind.label().to_string(),
            group.name.clone(),
            officer,
            units,
            personnel,
        ]);
    }
    render_text_table(
        &["#", "id", "kind", "name", "officer", "units", "personnel"],
        &rows,
    )
}

fn render_group_units(group: &InterventionGroup) -> String {
    let rows: Vec<Vec<String>> = group
        .units
        .iter()
        .map(|t| {
            let mut row = vec![t.id().to_string()];
            row.extend(UnitDetailField::ALL.iter().map(|f| t.field(*f).to_string()));
            row
        })
        .collect();
    let mut headers = vec!["unit"];
    headers.extend(UnitDetailField::ALL.iter().map(|f| f.as_str()));
    render_text_table(&headers, &rows)
}

fn render_available(board: &IncidentBoard) -> String {
    let unit_rows: Vec<Vec<String>> = board
        .available_units()
        .into_iter()
        .map(|u| vec![u.id, u.unit_type, u.status, u.station])
        .collect();
    let person_rows: Vec<Vec<String>> = board
        .available_personnel()
        .into_iter()
        .map(|p| vec![p.id, p.name, p.rank])
        .collect();
    format!(
        "Available units:\n{}Available personnel:\n{}",
        render_text_table(&["id", "type", "status", "station"], &unit_rows),
        render_text_table(&["id", "name", "rank"], &person_rows)
    )
}

fn print_help() {
    println!(
        "Commands:\n  help                                    Show this help\n  show                                    Show groups\n  units <group>                           Show unit detail for a group\n  available                               Show available units and personnel\n  summary                                 Show board counts\n  new <frente|uo>                         Create a group\n  delete <group>                          Delete a group and release its resources\n  rename <group> <text...>                Rename a group\n  officer <group> <text...>               Set the officer in charge\n  officers [query]                        Suggest officers from the roster\n  assign <group> <unit_id>                Assign an available unit\n  release <group> <unit_id>               Return a unit to the available pool\n  join <group> <personnel_id>             Assign available personnel\n  leave <group> <personnel_id>            Return personnel to the available pool\n  detail <group> <unit_id> <field> <text...>\n                                          Set a unit detail field\n  catalog <units_csv> [personnel_csv...]  Load the catalog from report CSVs\n  save <path>                             Save groups to JSON\n  load <path>                             Load groups from JSON\n  export <path>                           Write the resource log CSV\n  quit|exit                               Exit\n\n<group> is the row number shown by 'show' or a group id."
    );
}

/// Resolves a 1-based row number or a literal group id.
fn resolve_group(board: &IncidentBoard, reference: &str) -> Option<GroupId> {
    if let Ok(row) = reference.parse::<usize>() {
        if let Some(group) = row.checked_sub(1).and_then(|idx| board.groups().get(idx)) {
            return Some(group.id.clone());
        }
    }
    let id = GroupId::from(reference);
    board.group(&id).map(|group| group.id.clone())
}

fn group_name(board: &IncidentBoard, group_id: &GroupId) -> String {
    board
        .group(group_id)
        .map(|group| group.name.clone())
        .unwrap_or_default()
}

fn print_summary(board: &IncidentBoard) {
    println!("Board: {}", board.summary().to_cli_summary());
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("intervention_tool=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match BoardConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {}. Using defaults.", e);
            BoardConfig::default()
        }
    };
    let store = config.data_path.as_ref().map(JsonFileBoardStore::new);
    let mut board = IncidentBoard::with_config(ResourceCatalog::default(), config);
    if let Some(store) = &store {
        match store.load_groups() {
            Ok(Some(groups)) => {
                board.replace_groups(groups);
                println!("Board loaded from {}.", store.path().display());
            }
            Ok(None) => {}
            Err(e) => println!("Error loading board: {}", e),
        }
    }

    println!("Intervention Tool (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => println!("{}", render_groups(board.groups())),
            "available" => println!("{}", render_available(&board)),
            "summary" => print_summary(&board),
            "units" => match parts.next().and_then(|r| resolve_group(&board, r)) {
                Some(id) => {
                    if let Some(group) = board.group(&id) {
                        println!("{}", render_group_units(group));
                    }
                }
                None => println!("Usage: units <group> (unknown group)"),
            },
            "new" => match parts.next().map(str::parse::<GroupKind>) {
                Some(Ok(kind)) => {
                    let groups = board.create_group(kind);
                    if let Some(group) = groups.last() {
                        println!("Created group '{}' (id={}).", group.name, group.id);
                    }
                    print_summary(&board);
                }
                Some(Err(e)) => println!("Error: {}", e),
                None => println!("Usage: new <frente|uo>"),
            },
            "delete" => match parts.next().and_then(|r| resolve_group(&board, r)) {
                Some(id) => {
                    let name = group_name(&board, &id);
                    board.delete_group(&id);
                    println!("Deleted group '{}'.", name);
                    print_summary(&board);
                }
                None => println!("Usage: delete <group> (unknown group)"),
            },
            "rename" | "officer" => {
                let group = parts.next().and_then(|r| resolve_group(&board, r));
                let rest: Vec<&str> = parts.collect();
                match group {
                    Some(id) if cmd == "officer" || !rest.is_empty() => {
                        let field = if cmd == "rename" {
                            GroupField::Name
                        } else {
                            GroupField::OfficerInCharge
                        };
                        board.rename_group(&id, field, rest.join(" "));
                        println!("{} set.", field.as_str());
                        println!("{}", render_groups(board.groups()));
                    }
                    _ => println!("Usage: {} <group> <text...>", cmd),
                }
            }
            "officers" => {
                let query = parts.collect::<Vec<_>>().join(" ");
                for name in board.suggest_officers(&query) {
                    println!("  {}", name);
                }
            }
            "assign" | "join" => {
                let group = parts.next().and_then(|r| resolve_group(&board, r));
                let resource = parts.next();
                match (group, resource) {
                    (Some(id), Some(resource_id)) => {
                        let result = if cmd == "assign" {
                            board.assign_unit_by_id(resource_id, &id)
                        } else {
                            board.assign_personnel_by_id(resource_id, &id)
                        };
                        match result {
                            Ok(_) => {
                                println!(
                                    "Assigned {} to '{}'.",
                                    resource_id,
                                    group_name(&board, &id)
                                );
                                print_summary(&board);
                            }
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!("Usage: {} <group> <id>", cmd),
                }
            }
            "release" | "leave" => {
                let group = parts.next().and_then(|r| resolve_group(&board, r));
                let resource = parts.next();
                match (group, resource) {
                    (Some(id), Some(resource_id)) => {
                        let held = board.group(&id).is_some_and(|g| {
                            if cmd == "release" {
                                g.holds_unit(resource_id)
                            } else {
                                g.holds_personnel(resource_id)
                            }
                        });
                        if !held {
                            println!("{} is not in '{}'.", resource_id, group_name(&board, &id));
                            continue;
                        }
                        if cmd == "release" {
                            board.unassign_unit(resource_id, &id);
                        } else {
                            board.unassign_personnel(resource_id, &id);
                        }
                        println!("Released {}.", resource_id);
                        print_summary(&board);
                    }
                    _ => println!("Usage: {} <group> <id>", cmd),
                }
            }
            "detail" => {
                let group = parts.next().and_then(|r| resolve_group(&board, r));
                let unit_id = parts.next();
                let field = parts.next().map(str::parse::<UnitDetailField>);
                let value = parts.collect::<Vec<_>>().join(" ");
                match (group, unit_id, field) {
                    (Some(id), Some(unit_id), Some(Ok(field))) => {
                        if !board.group(&id).is_some_and(|g| g.holds_unit(unit_id)) {
                            println!("{} is not in '{}'.", unit_id, group_name(&board, &id));
                            continue;
                        }
                        board.update_unit_detail(&id, unit_id, field, value);
                        println!("{} set.", field.as_str());
                        if let Some(group) = board.group(&id) {
                            println!("{}", render_group_units(group));
                        }
                    }
                    (_, _, Some(Err(e))) => println!("Error: {}", e),
                    _ => println!("Usage: detail <group> <unit_id> <field> <text...>"),
                }
            }
            "catalog" => {
                let units_path = parts.next();
                let personnel_paths: Vec<&str> = parts.collect();
                match units_path {
                    Some(units_path) => match load_catalog_from_csv(units_path, &personnel_paths) {
                        Ok(catalog) => {
                            println!(
                                "Catalog loaded: {} units, {} personnel.",
                                catalog.units().len(),
                                catalog.personnel().len()
                            );
                            board.refresh_catalog(catalog);
                            print_summary(&board);
                        }
                        Err(e) => println!("Error loading catalog: {}", e),
                    },
                    None => println!("Usage: catalog <units_csv> [personnel_csv...]"),
                }
            }
            "save" => match parts.next() {
                Some(path) => match save_groups_to_json(board.groups(), path) {
                    Ok(_) => println!("Board saved to {}.", path),
                    Err(e) => println!("Error saving board: {}", e),
                },
                None => println!("Usage: save <path>"),
            },
            "load" => match parts.next() {
                Some(path) => match load_groups_from_json(path) {
                    Ok(groups) => {
                        board.replace_groups(groups);
                        println!("Board loaded from {}.", path);
                        println!("{}", render_groups(board.groups()));
                    }
                    Err(e) => println!("Error loading board: {}", e),
                },
                None => println!("Usage: load <path>"),
            },
            "export" => match parts.next() {
                Some(path) => match save_resource_log_to_csv(board.groups(), path) {
                    Ok(_) => println!("Resource log written to {}.", path),
                    Err(e) => println!("Error writing resource log: {}", e),
                },
                None => println!("Usage: export <path>"),
            },
            _ => println!("Unknown command. Type 'help'."),
        }
    }

    if let Some(store) = &store {
        match store.save_groups(board.groups()) {
            Ok(()) => println!("Board saved to {}.", store.path().display()),
            Err(e) => println!("Error saving board: {}", e),
        }
    }
}
