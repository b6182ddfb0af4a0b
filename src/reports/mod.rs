use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use rotorforge::config::MachineConfig;
use rotorforge::machine::{ReflectorKind, RotorKind};
use rotorforge::search::BestSettings;
use rotorforge::util::indices_to_text;
use strum::IntoEnumIterator;

fn join<T: ToString>(values: &[T], sep: &str) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

fn settings_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn add_setting(table: &mut Table, name: &str, value: String) {
    table.add_row(vec![
        Cell::new(name).add_attribute(Attribute::Bold),
        Cell::new(value),
    ]);
}

pub fn print_machine_settings(config: &MachineConfig) {
    let mut table = settings_table();
    add_setting(&mut table, "Rotors", join(&config.rotors, " "));
    add_setting(&mut table, "Reflector", config.reflector.clone());
    add_setting(&mut table, "Positions", join(&config.positions, " "));
    add_setting(&mut table, "Rings", join(&config.ring_settings, " "));
    let plugboard = if config.plugboard.is_empty() {
        "-".to_string()
    } else {
        join(&config.plugboard, " ")
    };
    add_setting(&mut table, "Plugboard", plugboard);
    if config.historic {
        add_setting(&mut table, "Historic", "yes".to_string());
    }
    println!("{}", table);
}

pub fn print_best_settings(best: &BestSettings) {
    println!("\n🏆 Best settings");
    let mut table = settings_table();
    add_setting(&mut table, "Rotors", join(&best.rotors, " "));
    add_setting(&mut table, "Reflector", best.reflector.clone());
    add_setting(&mut table, "Positions", join(&best.positions, " "));
    add_setting(&mut table, "Rings", join(&best.ring_settings, " "));
    add_setting(&mut table, "Plugboard", join(&best.plugboard, " "));
    table.add_row(vec![
        Cell::new("Score").add_attribute(Attribute::Bold),
        Cell::new(format!("{:.2}", best.score)).fg(Color::Cyan),
    ]);
    println!("{}", table);

    let s = &best.stats;
    let mut stats = settings_table();
    stats.set_header(vec![
        Cell::new("Stage").add_attribute(Attribute::Bold),
        Cell::new("Trials"),
        Cell::new("Kept"),
    ]);
    stats.add_row(vec![
        Cell::new("Rotors & positions"),
        Cell::new(s.stage1_trials),
        Cell::new(s.stage1_retained),
    ]);
    stats.add_row(vec![Cell::new("Ring settings"), Cell::new(s.stage2_trials), Cell::new(1)]);
    stats.add_row(vec![
        Cell::new(format!("Plugboard ({} rounds)", s.stage3_rounds)),
        Cell::new(s.stage3_trials),
        Cell::new(best.plugboard.len()),
    ]);
    for i in 1..=2 {
        if let Some(col) = stats.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    println!("{}", stats);

    println!("Job: {}", best.fingerprint);
    println!("\n{}", best.decrypted);
}

pub fn print_rotor_catalog() {
    let mut table = settings_table();
    table.set_header(vec![
        Cell::new("Rotor").add_attribute(Attribute::Bold),
        Cell::new("Wiring"),
        Cell::new("Notches"),
    ]);
    for kind in RotorKind::iter() {
        let spec = kind.spec();
        let notches = if spec.notches().is_empty() {
            "-".to_string()
        } else {
            indices_to_text(spec.notches())
        };
        let name = if kind.is_extra() {
            Cell::new(&spec.name).fg(Color::Yellow)
        } else {
            Cell::new(&spec.name)
        };
        table.add_row(vec![name, Cell::new(indices_to_text(&spec.forward)), Cell::new(notches)]);
    }
    println!("{}", table);
}

pub fn print_reflector_catalog() {
    let mut table = settings_table();
    table.set_header(vec![
        Cell::new("Reflector").add_attribute(Attribute::Bold),
        Cell::new("Wiring"),
        Cell::new("Type"),
    ]);
    for kind in ReflectorKind::iter() {
        let spec = kind.spec();
        let size = if spec.thin { "thin" } else { "full" };
        table.add_row(vec![
            Cell::new(&spec.name),
            Cell::new(indices_to_text(&spec.wiring)),
            Cell::new(size),
        ]);
    }
    println!("{}", table);
}
