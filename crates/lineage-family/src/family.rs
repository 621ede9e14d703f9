//! Family links: marriage, divorce, widowhood, children, and mourning.
//!
//! These operate on the character map directly and keep the partner link
//! symmetric: both sides of a couple are always written together.

use std::collections::BTreeMap;

use lineage_types::{Character, CharacterId, RelationshipStatus};
use tracing::{debug, info};

use crate::config::LifecycleConfig;
use crate::error::FamilyError;

type Characters = BTreeMap<CharacterId, Character>;

fn living(characters: &Characters, id: CharacterId) -> Result<&Character, FamilyError> {
    let character = characters
        .get(&id)
        .ok_or(FamilyError::CharacterNotFound(id))?;
    if !character.is_alive {
        return Err(FamilyError::CharacterDeceased(id));
    }
    Ok(character)
}

/// Marry `a` and `b`. Both must be alive and unpartnered.
pub fn marry(characters: &mut Characters, a: CharacterId, b: CharacterId) -> Result<(), FamilyError> {
    for id in [a, b] {
        let character = living(characters, id)?;
        if let Some(partner_id) = character.partner_id {
            return Err(FamilyError::AlreadyPartnered {
                character_id: id,
                partner_id,
            });
        }
    }
    for (id, partner) in [(a, b), (b, a)] {
        if let Some(character) = characters.get_mut(&id) {
            character.partner_id = Some(partner);
            character.relationship_status = RelationshipStatus::Married;
        }
    }
    info!(a = %a, b = %b, "married");
    Ok(())
}

/// Dissolve `id`'s marriage. Both become divorced. Returns the ex-partner.
pub fn divorce(characters: &mut Characters, id: CharacterId) -> Result<CharacterId, FamilyError> {
    let partner_id = living(characters, id)?
        .partner_id
        .ok_or(FamilyError::NotPartnered(id))?;
    let reciprocated = characters
        .get(&partner_id)
        .is_some_and(|p| p.partner_id == Some(id));
    if !reciprocated {
        return Err(FamilyError::PartnerAsymmetry {
            character_id: id,
            partner_id,
        });
    }
    for member in [id, partner_id] {
        if let Some(character) = characters.get_mut(&member) {
            character.partner_id = None;
            character.relationship_status = RelationshipStatus::Divorced;
        }
    }
    info!(a = %id, b = %partner_id, "divorced");
    Ok(partner_id)
}

/// Clear the partner link of a deceased character. The survivor becomes
/// widowed. Returns the survivor.
pub fn widow(characters: &mut Characters, deceased: CharacterId) -> Option<CharacterId> {
    let partner_id = characters.get(&deceased)?.partner_id?;
    if let Some(dead) = characters.get_mut(&deceased) {
        dead.partner_id = None;
    }
    let survivor = characters.get_mut(&partner_id)?;
    survivor.partner_id = None;
    if survivor.is_alive {
        survivor.relationship_status = RelationshipStatus::Widowed;
    }
    Some(partner_id)
}

/// Insert a newborn and append it to both parents' children.
///
/// Rejected if either parent has reached `max_children`.
pub fn register_child(
    characters: &mut Characters,
    child: Character,
    config: &LifecycleConfig,
) -> Result<(), FamilyError> {
    let Some(parents) = child.parents else {
        characters.insert(child.id, child);
        return Ok(());
    };
    for parent in [parents.first, parents.second] {
        let count = characters
            .get(&parent)
            .ok_or(FamilyError::CharacterNotFound(parent))?
            .child_count();
        if count >= config.max_children {
            return Err(FamilyError::ChildLimitReached {
                character_id: parent,
                limit: config.max_children,
            });
        }
    }
    for parent in [parents.first, parents.second] {
        if let Some(p) = characters.get_mut(&parent) {
            p.children_ids.push(child.id);
        }
    }
    debug!(child_id = %child.id, "child registered");
    characters.insert(child.id, child);
    Ok(())
}

/// Grief after `deceased` dies: every other living character loses
/// `mourning_penalty` happiness and mourns for `mourning_years`.
///
/// Returns the mourners.
pub fn apply_mourning(
    characters: &mut Characters,
    deceased: CharacterId,
    year: i32,
    config: &LifecycleConfig,
) -> Vec<CharacterId> {
    let until = year.saturating_add(config.mourning_years);
    let mut mourners = Vec::new();
    for character in characters.values_mut() {
        if character.id == deceased || !character.is_alive {
            continue;
        }
        character.stats.happiness = character
            .stats
            .happiness
            .saturating_sub(config.mourning_penalty);
        let current = character.status.mourning_until_year.unwrap_or(until);
        character.status.mourning_until_year = Some(current.max(until));
        mourners.push(character.id);
    }
    mourners
}

/// Check that every partner link is reciprocated.
pub fn check_partner_symmetry(characters: &Characters) -> Result<(), FamilyError> {
    for character in characters.values() {
        if let Some(partner_id) = character.partner_id {
            let back = characters.get(&partner_id).and_then(|p| p.partner_id);
            if back != Some(character.id) {
                return Err(FamilyError::PartnerAsymmetry {
                    character_id: character.id,
                    partner_id,
                });
            }
        }
    }
    Ok(())
}

/// Highest generation any character has reached, living or dead.
pub fn latest_generation(characters: &Characters) -> u32 {
    characters
        .values()
        .map(|c| c.generation)
        .max()
        .unwrap_or(0)
}
