#![allow(dead_code)]

use rotorforge::config::MachineConfig;
use rotorforge::machine::Machine;
use rotorforge::scorer::NgramScorer;
use std::collections::BTreeMap;
use std::io::Cursor;

/// Plain English used both to train small scoring tables and as plaintext.
pub const CORPUS: &str = "WEATHERREPORTFORTHENORTHSEAWINDSFROMTHEWESTATFORTYKNOTS\
VISIBILITYPOORRAINEXPECTEDBEFOREMIDNIGHTALLSHIPSSHOULDREMAININHARBOUR\
UNTILTHESTORMHASPASSEDANDTHESEAISCALMAGAINTHEHARBOURMASTERWILLSIGNAL\
WHENITISSAFETOLEAVETHEPORTANDRETURNTOTHEFISHINGGROUNDSINTHENORTH";

/// Counts every `len`-letter window of `text` and renders the table as
/// `"<ngram> <count>"` lines, sorted so the output is stable.
pub fn ngram_table(text: &str, len: usize) -> String {
    let letters: Vec<char> = text.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for window in letters.windows(len) {
        *counts.entry(window.iter().collect()).or_default() += 1;
    }
    counts
        .iter()
        .map(|(gram, count)| format!("{} {}\n", gram, count))
        .collect()
}

pub fn trigram_scorer(text: &str) -> NgramScorer {
    NgramScorer::from_reader(Cursor::new(ngram_table(text, 3)), ' ').unwrap()
}

pub fn machine(rotors: &[&str], positions: &[i32], rings: &[i32], plugboard: &[&str]) -> Machine<'static> {
    let reflector = if rotors.len() == 4 { "UKW_B_THIN" } else { "UKW_B" };
    let config = MachineConfig::new(rotors, reflector, positions, rings, plugboard);
    Machine::new(&config).unwrap()
}

pub fn encrypt(rotors: &[&str], positions: &[i32], rings: &[i32], plugboard: &[&str], text: &str) -> String {
    machine(rotors, positions, rings, plugboard).transform(text)
}
