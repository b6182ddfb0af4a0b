pub mod plugboard;
pub mod rotor;
pub mod setting;
pub mod validate;
pub mod wiring;

pub use self::plugboard::Plugboard;
pub use self::rotor::RotorState;
pub use self::setting::Setting;
pub use self::wiring::{ReflectorKind, ReflectorSpec, RotorKind, RotorPool, RotorSpec};

use crate::config::MachineConfig;
use crate::consts::STEPPING_ROTORS;
use crate::error::{RfResult, RotorForgeError};
use crate::util::letter_index;

/// The rotor machine: plugboard, 3 or 4 rotors (leftmost first) and a
/// reflector. Rotor positions advance as text is transformed, so a machine
/// belongs to exactly one message.
#[derive(Debug, Clone)]
pub struct Machine<'a> {
    rotors: Vec<RotorState<'a>>,
    reflector: &'a ReflectorSpec,
    plugboard: Plugboard,
}

impl Machine<'static> {
    /// Validates a configuration and builds a machine from the catalogue.
    pub fn new(config: &MachineConfig) -> RfResult<Self> {
        let n = config.rotors.len();
        if n != config.positions.len() || n != config.ring_settings.len() {
            return Err(RotorForgeError::Config(format!(
                "Number of rotors ({}), rotor positions ({}) and ring settings ({}) must match",
                n,
                config.positions.len(),
                config.ring_settings.len()
            )));
        }
        check_rotor_count(n)?;

        let kinds = config
            .rotors
            .iter()
            .map(|name| RotorKind::from_name(name))
            .collect::<RfResult<Vec<_>>>()?;
        let positions = to_indices(&config.positions, "Rotor position")?;
        let rings = to_indices(&config.ring_settings, "Ring setting")?;
        let reflector = ReflectorKind::from_name(&config.reflector)?;
        let plugboard = Plugboard::from_pairs(&config.plugboard)?;

        if config.historic {
            validate::check_historic(&kinds, reflector)?;
        }

        let rotors = kinds
            .iter()
            .zip(positions.iter().zip(rings.iter()))
            .map(|(kind, (&pos, &ring))| RotorState::new(kind.spec(), pos, ring))
            .collect();

        Self::from_parts(rotors, reflector.spec(), plugboard)
    }
}

impl<'a> Machine<'a> {
    /// Assembles a machine from already resolved parts. Used by the search
    /// loops and for custom wirings.
    pub fn from_parts(
        rotors: Vec<RotorState<'a>>,
        reflector: &'a ReflectorSpec,
        plugboard: Plugboard,
    ) -> RfResult<Self> {
        check_rotor_count(rotors.len())?;
        Ok(Self {
            rotors,
            reflector,
            plugboard,
        })
    }

    /// Advances the three rightmost rotors by one keystroke, including the
    /// middle rotor's double step. Notches are read before anything moves.
    #[inline(always)]
    pub fn step(&mut self) {
        let n = self.rotors.len();
        let (left, middle, right) = (n - STEPPING_ROTORS, n - 2, n - 1);

        if self.rotors[middle].is_at_notch() {
            self.rotors[left].turnover();
            self.rotors[middle].turnover();
        } else if self.rotors[right].is_at_notch() {
            self.rotors[middle].turnover();
        }
        self.rotors[right].turnover();
    }

    /// Enciphers one 0-based letter, stepping first.
    #[inline(always)]
    pub fn encrypt_index(&mut self, c: u8) -> u8 {
        self.step();

        let mut c = self.plugboard.substitute(c);
        for rotor in self.rotors.iter().rev() {
            c = rotor.forward(c);
        }
        c = self.reflector.reflect(c);
        for rotor in &self.rotors {
            c = rotor.backward(c);
        }
        self.plugboard.substitute(c)
    }

    /// Transforms letter indices into `out`, which is appended to.
    pub fn transform_indices(&mut self, input: &[u8], out: &mut Vec<u8>) {
        out.reserve(input.len());
        for &c in input {
            out.push(self.encrypt_index(c));
        }
    }

    /// Uppercases, drops every non-letter, and enciphers what is left.
    pub fn transform(&mut self, text: &str) -> String {
        text.chars()
            .filter_map(letter_index)
            .map(|c| (b'A' + self.encrypt_index(c)) as char)
            .collect()
    }

    /// Current 0-based positions, leftmost first.
    pub fn positions(&self) -> Vec<u8> {
        self.rotors.iter().map(|r| r.position()).collect()
    }

    pub fn rotors(&self) -> &[RotorState<'a>] {
        &self.rotors
    }

    pub fn reflector(&self) -> &ReflectorSpec {
        self.reflector
    }

    pub fn plugboard(&self) -> &Plugboard {
        &self.plugboard
    }
}

fn check_rotor_count(n: usize) -> RfResult<()> {
    if n == 3 || n == 4 {
        Ok(())
    } else {
        Err(RotorForgeError::Config(format!(
            "A machine takes 3 or 4 rotors, found {}",
            n
        )))
    }
}

fn to_indices(settings: &[Setting], what: &str) -> RfResult<Vec<u8>> {
    settings
        .iter()
        .map(|s| {
            s.to_index().ok_or_else(|| {
                RotorForgeError::Config(format!("{} '{}' must be within 1..=26 or A..=Z", what, s))
            })
        })
        .collect()
}
