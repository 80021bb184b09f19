//! Item entity - shared equipment library rows
//!
//! Items are value objects shared across characters: two items with the
//! same properties are the same library row, and per-character state
//! (proficiency) lives on the association instead.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ItemId;

/// A persisted item row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub item_type: String,
    pub damage: String,
    pub damage_type: String,
    pub traits: Vec<String>,
}

/// The full column set of an item, which doubles as its deduplication
/// key: an incoming item matches an existing row when every property
/// matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemProperties {
    pub name: String,
    pub item_type: String,
    pub damage: String,
    pub damage_type: String,
    pub traits: Vec<String>,
}

impl ItemProperties {
    /// Trait tags in canonical form (sorted, deduplicated) so that tag
    /// order never splits the dedup key.
    pub fn canonical_traits(&self) -> Vec<String> {
        let mut traits = self.traits.clone();
        traits.sort();
        traits.dedup();
        traits
    }

    pub fn into_item(self, id: ItemId) -> Item {
        let traits = self.canonical_traits();
        Item {
            id,
            name: self.name,
            item_type: self.item_type,
            damage: self.damage,
            damage_type: self.damage_type,
            traits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trait_order_does_not_change_the_canonical_form() {
        let a = ItemProperties {
            name: "Longsword".into(),
            item_type: "weapon".into(),
            damage: "1d8".into(),
            damage_type: "slashing".into(),
            traits: vec!["versatile".into(), "martial".into()],
        };
        let b = ItemProperties {
            traits: vec!["martial".into(), "versatile".into(), "martial".into()],
            ..a.clone()
        };
        assert_eq!(a.canonical_traits(), b.canonical_traits());
    }
}
