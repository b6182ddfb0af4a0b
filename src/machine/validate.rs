use crate::error::{RfResult, RotorForgeError};
use crate::machine::wiring::{ReflectorKind, RotorKind};

/// Rules a wartime operator could not break: each rotor type fitted once,
/// thin reflector and extra rotor on the four-rotor machine only.
pub fn check_historic(rotors: &[RotorKind], reflector: ReflectorKind) -> RfResult<()> {
    for (i, kind) in rotors.iter().enumerate() {
        if rotors[..i].contains(kind) {
            return Err(RotorForgeError::HistoricRule(format!(
                "Rotor {} is fitted more than once",
                kind
            )));
        }
    }

    let four_rotor = rotors.len() == 4;
    if four_rotor && !reflector.is_thin() {
        return Err(RotorForgeError::HistoricRule(format!(
            "A 4-rotor machine requires a thin reflector, found {}",
            reflector
        )));
    }
    if !four_rotor && reflector.is_thin() {
        return Err(RotorForgeError::HistoricRule(format!(
            "A {}-rotor machine requires a full-size reflector, found {}",
            rotors.len(),
            reflector
        )));
    }

    if four_rotor {
        if !rotors[0].is_extra() {
            return Err(RotorForgeError::HistoricRule(format!(
                "The leftmost rotor of a 4-rotor machine must be BETA or GAMMA, found {}",
                rotors[0]
            )));
        }
        if let Some(kind) = rotors[1..].iter().find(|k| k.is_extra()) {
            return Err(RotorForgeError::HistoricRule(format!(
                "Rotor {} only fits the leftmost slot",
                kind
            )));
        }
    } else if let Some(kind) = rotors.iter().find(|k| k.is_extra()) {
        return Err(RotorForgeError::HistoricRule(format!(
            "Rotor {} is only used in 4-rotor machines",
            kind
        )));
    }

    Ok(())
}
