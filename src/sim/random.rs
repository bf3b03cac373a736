//! Injectable randomness for the market and dice engines
//!
//! The simulation never touches a global RNG; every draw goes through a
//! [`Randomness`] handed in by the caller.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::DIE_FACES;

/// Source of the two kinds of draws the game needs
pub trait Randomness {
    /// Uniform die face in 1..=6
    fn d6(&mut self) -> u8;
    /// Uniform sample in [0, 1)
    fn unit(&mut self) -> f64;
}

/// Seeded PCG source (reproducible runs)
#[derive(Debug, Clone)]
pub struct SeededRandomness {
    seed: u64,
    rng: Pcg32,
}

impl SeededRandomness {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Randomness for SeededRandomness {
    fn d6(&mut self) -> u8 {
        self.rng.random_range(1..=DIE_FACES)
    }

    fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Replays queued draws, falling back to a seeded source when a queue runs dry
///
/// Used for forced rolls in tests and scripted demos.
#[derive(Debug, Clone)]
pub struct ScriptedRandomness {
    faces: VecDeque<u8>,
    units: VecDeque<f64>,
    fallback: SeededRandomness,
}

impl ScriptedRandomness {
    pub fn new() -> Self {
        Self {
            faces: VecDeque::new(),
            units: VecDeque::new(),
            fallback: SeededRandomness::new(0),
        }
    }

    /// Queue die faces (clamped to 1..=6)
    pub fn with_faces(mut self, faces: &[u8]) -> Self {
        self.push_faces(faces);
        self
    }

    /// Queue unit samples (clamped to [0, 1))
    pub fn with_units(mut self, units: &[f64]) -> Self {
        self.push_units(units);
        self
    }

    pub fn push_faces(&mut self, faces: &[u8]) {
        self.faces
            .extend(faces.iter().map(|f| (*f).clamp(1, DIE_FACES)));
    }

    pub fn push_units(&mut self, units: &[f64]) {
        self.units
            .extend(units.iter().map(|u| u.clamp(0.0, 1.0 - f64::EPSILON)));
    }
}

impl Default for ScriptedRandomness {
    fn default() -> Self {
        Self::new()
    }
}

impl Randomness for ScriptedRandomness {
    fn d6(&mut self) -> u8 {
        match self.faces.pop_front() {
            Some(face) => face,
            None => self.fallback.d6(),
        }
    }

    fn unit(&mut self) -> f64 {
        match self.units.pop_front() {
            Some(u) => u,
            None => self.fallback.unit(),
        }
    }
}
