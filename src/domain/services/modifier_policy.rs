//! Randomized attribute modifiers applied at instantiation time
//!
//! The policy is pluggable so the game-balance rules can be swapped
//! without touching the generator. Callers supply the RNG, which keeps
//! the policy deterministic for a given seed.

use rand::{Rng, RngCore};

use crate::domain::value_objects::{AbilityScores, CombatStats, ABILITY_MAX, ABILITY_MIN};

/// A bounded randomization policy for generated characters.
///
/// Contract: the output must stay within the valid domain of each field
/// (ability scores in `[ABILITY_MIN, ABILITY_MAX]`, hit points at least 1),
/// and must be a pure function of the inputs and the RNG stream.
pub trait ModifierPolicy: Send + Sync {
    fn apply(&self, abilities: &mut AbilityScores, combat: &mut CombatStats, rng: &mut dyn RngCore);
}

/// Default policy: every ability score shifts by a uniform integer in
/// `[-spread, +spread]`, clamped to the ability domain; hit points shift
/// by the same spread with a floor of 1. Armor class, speed, and saves
/// are carried from the template unchanged.
///
/// The spread of 2 is a placeholder balance contract until the real
/// game rules pin it down.
#[derive(Debug, Clone, Copy)]
pub struct UniformModifierPolicy {
    pub spread: i32,
}

impl UniformModifierPolicy {
    pub fn new(spread: i32) -> Self {
        Self { spread }
    }
}

impl Default for UniformModifierPolicy {
    fn default() -> Self {
        Self { spread: 2 }
    }
}

impl ModifierPolicy for UniformModifierPolicy {
    fn apply(&self, abilities: &mut AbilityScores, combat: &mut CombatStats, rng: &mut dyn RngCore) {
        if self.spread <= 0 {
            return;
        }

        for score in abilities.scores_mut() {
            let delta = rng.gen_range(-self.spread..=self.spread);
            *score = (*score + delta).clamp(ABILITY_MIN, ABILITY_MAX);
        }

        let delta = rng.gen_range(-self.spread..=self.spread);
        combat.hit_points = (combat.hit_points + delta).max(1);
    }
}
