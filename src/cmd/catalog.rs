use crate::reports;
use rotorforge::RfResult;

pub fn run() -> RfResult<()> {
    reports::print_rotor_catalog();
    reports::print_reflector_catalog();
    Ok(())
}
