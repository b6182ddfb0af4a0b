use crate::error::RfResult;
use crate::machine::{Machine, Plugboard, ReflectorSpec, RotorKind, RotorState};
use crate::util::indices_to_text;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// One trial configuration of a three-rotor machine, with all values
/// 0-based. Stage 1 fills rotors and positions; stage 2 adds rings; stage 3
/// adds plugboard pairs.
#[derive(Debug, Clone)]
pub struct SearchCandidate {
    pub score: f64,
    pub rotors: [RotorKind; 3],
    pub positions: [u8; 3],
    pub rings: [u8; 3],
    pub plugboard: Vec<(u8, u8)>,
}

impl SearchCandidate {
    pub fn new(rotors: [RotorKind; 3], positions: [u8; 3]) -> Self {
        Self {
            score: f64::NEG_INFINITY,
            rotors,
            positions,
            rings: [0; 3],
            plugboard: Vec::new(),
        }
    }

    /// A fresh machine in this candidate's start state.
    pub fn build_machine<'a>(&self, reflector: &'a ReflectorSpec) -> RfResult<Machine<'a>> {
        let rotors = self
            .rotors
            .iter()
            .zip(self.positions.iter().zip(self.rings.iter()))
            .map(|(kind, (&pos, &ring))| RotorState::new(kind.spec(), pos, ring))
            .collect();
        let plugboard = Plugboard::from_index_pairs(&self.plugboard)?;
        Machine::from_parts(rotors, reflector, plugboard)
    }

    pub fn rotor_names(&self) -> Vec<String> {
        self.rotors.iter().map(|k| k.to_string()).collect()
    }

    /// 1-based positions as an operator would set them.
    pub fn display_positions(&self) -> Vec<u8> {
        self.positions.iter().map(|p| p + 1).collect()
    }

    pub fn display_rings(&self) -> Vec<u8> {
        self.rings.iter().map(|r| r + 1).collect()
    }

    pub fn plugboard_strings(&self) -> Vec<String> {
        self.plugboard
            .iter()
            .map(|&(a, b)| indices_to_text(&[a, b]))
            .collect()
    }

    fn tie_key(&self) -> ([RotorKind; 3], [u8; 3], [u8; 3], &[(u8, u8)]) {
        (self.rotors, self.positions, self.rings, &self.plugboard)
    }
}

/// Ranking order: a greater candidate is a better one. Equal scores fall
/// back to the settings themselves, where the lower (earlier enumerated)
/// settings rank higher.
impl Ord for SearchCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.tie_key().cmp(&self.tie_key()))
    }
}

impl PartialOrd for SearchCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SearchCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchCandidate {}

/// Keeps the `capacity` greatest items pushed into it.
#[derive(Debug, Clone)]
pub struct BoundedTopN<T: Ord> {
    capacity: usize,
    heap: BinaryHeap<Reverse<T>>,
}

impl<T: Ord> BoundedTopN<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::new(),
        }
    }

    /// Returns whether the item was retained.
    pub fn push(&mut self, item: T) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(item));
            return true;
        }
        match self.heap.peek() {
            Some(Reverse(worst)) if item > *worst => {
                self.heap.pop();
                self.heap.push(Reverse(item));
                true
            }
            _ => false,
        }
    }

    /// Folds another collection in under the same ordering.
    pub fn merge(&mut self, other: BoundedTopN<T>) {
        for Reverse(item) in other.heap {
            self.push(item);
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Best first.
    pub fn into_sorted_vec(self) -> Vec<T> {
        let mut items: Vec<T> = self.heap.into_iter().map(|Reverse(item)| item).collect();
        items.sort_by(|a, b| b.cmp(a));
        items
    }
}
