//! Ability scores, derived combat stats, and association proficiency

use serde::{Deserialize, Serialize};

/// Lowest value an ability score may take after modifiers
pub const ABILITY_MIN: i32 = 1;
/// Highest value an ability score may take after modifiers
pub const ABILITY_MAX: i32 = 30;

/// The seven raw ability scores carried by every character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
    pub perception: i32,
}

impl AbilityScores {
    /// Mutable view over all seven scores, in declaration order
    pub fn scores_mut(&mut self) -> [&mut i32; 7] {
        [
            &mut self.strength,
            &mut self.dexterity,
            &mut self.constitution,
            &mut self.intelligence,
            &mut self.wisdom,
            &mut self.charisma,
            &mut self.perception,
        ]
    }

    pub fn scores(&self) -> [i32; 7] {
        [
            self.strength,
            self.dexterity,
            self.constitution,
            self.intelligence,
            self.wisdom,
            self.charisma,
            self.perception,
        ]
    }

    /// Force every score back into the valid ability domain
    pub fn clamp_to_domain(&mut self) {
        for score in self.scores_mut() {
            *score = (*score).clamp(ABILITY_MIN, ABILITY_MAX);
        }
    }
}

/// Derived combat statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatStats {
    pub armor_class: i32,
    pub hit_points: i32,
    pub speed: i32,
    pub fortitude_save: i32,
    pub reflex_save: i32,
    pub will_save: i32,
}

/// Proficiency rank scoped to one character/item or character/skill
/// association. The same item can carry a different rank per holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Proficiency(i32);

impl Proficiency {
    pub fn new(rank: i32) -> Self {
        Self(rank)
    }

    pub fn rank(&self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for Proficiency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for Proficiency {
    fn from(rank: i32) -> Self {
        Self(rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores() -> AbilityScores {
        AbilityScores {
            strength: 10,
            dexterity: 12,
            constitution: 14,
            intelligence: 8,
            wisdom: 11,
            charisma: 9,
            perception: 13,
        }
    }

    #[test]
    fn clamp_pulls_scores_back_into_domain() {
        let mut out_of_range = scores();
        out_of_range.strength = -3;
        out_of_range.charisma = 99;
        out_of_range.clamp_to_domain();
        assert_eq!(out_of_range.strength, ABILITY_MIN);
        assert_eq!(out_of_range.charisma, ABILITY_MAX);
        assert_eq!(out_of_range.dexterity, 12);
    }

    #[test]
    fn scores_mut_covers_every_field() {
        let mut s = scores();
        for score in s.scores_mut() {
            *score += 1;
        }
        assert_eq!(s.scores(), [11, 13, 15, 9, 12, 10, 14]);
    }
}
