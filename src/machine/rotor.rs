use crate::consts::ALPHABET_SIZE;
use crate::machine::wiring::RotorSpec;

/// One rotor mounted in a machine: shared wiring plus its own position and
/// ring offset (both 0-based).
#[derive(Debug, Clone)]
pub struct RotorState<'a> {
    spec: &'a RotorSpec,
    position: u8,
    ring_setting: u8,
}

impl<'a> RotorState<'a> {
    pub fn new(spec: &'a RotorSpec, position: u8, ring_setting: u8) -> Self {
        Self {
            spec,
            position: position % ALPHABET_SIZE as u8,
            ring_setting: ring_setting % ALPHABET_SIZE as u8,
        }
    }

    #[inline(always)]
    pub fn forward(&self, c: u8) -> u8 {
        self.encipher(c, &self.spec.forward)
    }

    #[inline(always)]
    pub fn backward(&self, c: u8) -> u8 {
        self.encipher(c, &self.spec.backward)
    }

    // Shift into the rotor frame, look up the wiring, shift back out.
    #[inline(always)]
    fn encipher(&self, c: u8, wiring: &[u8; ALPHABET_SIZE]) -> u8 {
        let shift = (ALPHABET_SIZE + self.position as usize - self.ring_setting as usize)
            % ALPHABET_SIZE;
        let out = wiring[(c as usize + shift) % ALPHABET_SIZE] as usize;
        ((out + ALPHABET_SIZE - shift) % ALPHABET_SIZE) as u8
    }

    #[inline(always)]
    pub fn is_at_notch(&self) -> bool {
        self.spec.is_notch(self.position)
    }

    #[inline(always)]
    pub fn turnover(&mut self) {
        self.position = (self.position + 1) % ALPHABET_SIZE as u8;
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    pub fn ring_setting(&self) -> u8 {
        self.ring_setting
    }

    pub fn spec(&self) -> &'a RotorSpec {
        self.spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::wiring::RotorKind;

    #[test]
    fn test_identity_offsets_use_raw_wiring() {
        let rotor = RotorState::new(RotorKind::I.spec(), 0, 0);
        // A -> E on rotor I
        assert_eq!(rotor.forward(0), 4);
        assert_eq!(rotor.backward(4), 0);
    }

    #[test]
    fn test_position_and_ring_cancel_out() {
        let spec = RotorKind::III.spec();
        let a = RotorState::new(spec, 7, 7);
        let b = RotorState::new(spec, 0, 0);
        for c in 0..26 {
            assert_eq!(a.forward(c), b.forward(c));
        }
    }

    #[test]
    fn test_backward_undoes_forward_at_any_offset() {
        let spec = RotorKind::V.spec();
        for pos in 0..26 {
            for ring in [0u8, 3, 25] {
                let rotor = RotorState::new(spec, pos, ring);
                for c in 0..26 {
                    assert_eq!(rotor.backward(rotor.forward(c)), c);
                }
            }
        }
    }

    #[test]
    fn test_turnover_wraps() {
        let mut rotor = RotorState::new(RotorKind::II.spec(), 25, 0);
        rotor.turnover();
        assert_eq!(rotor.position(), 0);
    }
}
