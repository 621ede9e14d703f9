//! Purchases and business management.
//!
//! Every operation checks the family fund and catalog first and leaves the
//! state untouched on rejection. Prices are paid from the shared fund,
//! which must cover them in full.

use lineage_types::{
    AssetId, Business, BusinessId, BusinessKindId, BusinessSlot, Catalog, GameState, LogEntry,
    PurchasedAsset, SlotWorker, StatKind,
};
use rand::RngCore;
use tracing::info;

use crate::error::CoreError;

fn pay(state: &mut GameState, price: i64) -> Result<(), CoreError> {
    if state.family_fund < price {
        return Err(CoreError::InsufficientFunds {
            needed: price,
            available: state.family_fund,
        });
    }
    state.family_fund = state.family_fund.saturating_sub(price);
    Ok(())
}

/// Buy `asset_id` for the family.
///
/// Every living member gets the asset's one-off happiness bonus. The
/// ledger is append-only; buying the same asset twice records it twice.
pub fn purchase_asset(
    state: &GameState,
    catalog: &Catalog,
    asset_id: &AssetId,
) -> Result<GameState, CoreError> {
    let asset = catalog
        .asset(asset_id)
        .ok_or_else(|| CoreError::UnknownAsset(asset_id.clone()))?;
    let mut next = state.clone();
    pay(&mut next, asset.price)?;
    for member in next.characters.values_mut().filter(|c| c.is_alive) {
        member.stats.adjust(StatKind::Happiness, asset.happiness_bonus);
    }
    next.assets.push(PurchasedAsset {
        asset_id: asset_id.clone(),
        year: next.date.year,
    });
    next.record(
        LogEntry::new(next.date, None, "log.asset.purchased")
            .with_param("asset", asset_id)
            .with_param("price", asset.price),
    );
    info!(%asset_id, price = asset.price, fund = next.family_fund, "asset purchased");
    Ok(next)
}

/// Buy a new business of `kind` at level 1 with every slot empty.
pub fn buy_business(
    state: &GameState,
    catalog: &Catalog,
    kind: &BusinessKindId,
    rng: &mut dyn RngCore,
) -> Result<(GameState, BusinessId), CoreError> {
    let definition = catalog
        .business(kind)
        .ok_or_else(|| CoreError::UnknownBusinessKind(kind.clone()))?;
    let mut next = state.clone();
    pay(&mut next, definition.purchase_cost)?;
    let id = BusinessId::generate(rng);
    let business = Business {
        id,
        kind: kind.clone(),
        level: 1,
        slots: definition
            .slots
            .iter()
            .map(|template| BusinessSlot {
                role: template.role.clone(),
                required_major: template.required_major.clone(),
                worker: SlotWorker::Empty,
            })
            .collect(),
        acquired: next.date,
    };
    next.businesses.insert(id, business);
    next.record(
        LogEntry::new(next.date, None, "log.business.bought")
            .with_param("business", kind)
            .with_param("price", definition.purchase_cost),
    );
    info!(business_id = %id, %kind, fund = next.family_fund, "business bought");
    Ok((next, id))
}

/// Put `worker` in slot `slot_index` of `business_id`.
///
/// A character must be alive, must not already work elsewhere, and must
/// hold the slot's required major. The previous occupant, if a character,
/// is released. Robots and empty slots have no requirements.
pub fn assign_business_slot(
    state: &GameState,
    business_id: BusinessId,
    slot_index: usize,
    worker: SlotWorker,
) -> Result<GameState, CoreError> {
    let business = state
        .businesses
        .get(&business_id)
        .ok_or(CoreError::BusinessNotFound(business_id))?;
    let slot = business
        .slots
        .get(slot_index)
        .ok_or(CoreError::SlotOutOfRange {
            business_id,
            index: slot_index,
            slots: business.slots.len(),
        })?;

    if let SlotWorker::Character { id } = worker {
        let character = state.character(id).ok_or(CoreError::CharacterNotFound(id))?;
        if !character.is_alive {
            return Err(CoreError::CharacterDeceased(id));
        }
        let already_here = business.slot_of(id) == Some(slot_index);
        if let Some(current) = character.business_id {
            if !already_here {
                return Err(CoreError::AlreadyAssigned {
                    character_id: id,
                    business_id: current,
                });
            }
        }
        if let Some(required) = &slot.required_major {
            if character.education.major.as_ref() != Some(required) {
                return Err(CoreError::MajorMismatch {
                    character_id: id,
                    required: required.clone(),
                });
            }
        }
    }

    let mut next = state.clone();
    let previous = slot.worker;
    if let Some(old) = previous.character() {
        if worker.character() != Some(old) {
            if let Some(member) = next.characters.get_mut(&old) {
                member.business_id = None;
            }
        }
    }
    if let Some(id) = worker.character() {
        if let Some(member) = next.characters.get_mut(&id) {
            member.business_id = Some(business_id);
        }
    }
    if let Some(target) = next
        .businesses
        .get_mut(&business_id)
        .and_then(|b| b.slots.get_mut(slot_index))
    {
        target.worker = worker;
    }
    info!(%business_id, slot_index, ?worker, "business slot assigned");
    Ok(next)
}

/// Raise `business_id` one level for `upgrade_cost * level`.
pub fn upgrade_business(
    state: &GameState,
    catalog: &Catalog,
    business_id: BusinessId,
) -> Result<GameState, CoreError> {
    let business = state
        .businesses
        .get(&business_id)
        .ok_or(CoreError::BusinessNotFound(business_id))?;
    let definition = catalog
        .business(&business.kind)
        .ok_or_else(|| CoreError::UnknownBusinessKind(business.kind.clone()))?;
    if business.level >= definition.max_level {
        return Err(CoreError::MaxLevelReached {
            business_id,
            level: business.level,
        });
    }
    let cost = definition
        .upgrade_cost
        .saturating_mul(i64::from(business.level));
    let level = business.level.saturating_add(1);

    let mut next = state.clone();
    pay(&mut next, cost)?;
    if let Some(upgraded) = next.businesses.get_mut(&business_id) {
        upgraded.level = level;
    }
    next.record(
        LogEntry::new(next.date, None, "log.business.upgraded")
            .with_param("business", &business.kind)
            .with_param("level", level),
    );
    info!(%business_id, level, cost, "business upgraded");
    Ok(next)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lineage_types::{BusinessKindId, MajorId};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::testing::{add_adult, catalog, state_with_player_aged};

    fn cafe_state(fund: i64) -> (GameState, BusinessId) {
        let mut rng = SmallRng::seed_from_u64(70);
        let (state, _) = state_with_player_aged(40, fund);
        buy_business(&state, &catalog(), &BusinessKindId::new("cafe"), &mut rng).unwrap()
    }

    #[test]
    fn asset_purchase_needs_funds_and_cheers_everyone() {
        let (state, id) = state_with_player_aged(30, 1_000);
        let (state, other) = add_adult(&state, 31);
        let catalog = catalog();
        let before = state.characters[&other].stats.happiness;

        assert!(matches!(
            purchase_asset(&state, &catalog, &AssetId::new("car")),
            Err(CoreError::InsufficientFunds {
                needed: 15_000,
                available: 1_000
            })
        ));

        let next = purchase_asset(&state, &catalog, &AssetId::new("bicycle")).unwrap();
        assert_eq!(next.family_fund, 700);
        assert_eq!(next.characters[&other].stats.happiness, before + 2);
        assert_eq!(next.characters[&id].stats.happiness, state.characters[&id].stats.happiness + 2);
        assert_eq!(next.assets.len(), 1);
    }

    #[test]
    fn bought_business_starts_empty_at_level_one() {
        let (state, id) = cafe_state(60_000);
        assert_eq!(state.family_fund, 10_000);
        let business = &state.businesses[&id];
        assert_eq!(business.level, 1);
        assert_eq!(business.slots.len(), 4);
        assert_eq!(business.filled_slots(), 0);
    }

    #[test]
    fn character_fills_one_slot_at_a_time() {
        let (state, business) = cafe_state(60_000);
        let worker = state.living_ids()[0];
        let state = assign_business_slot(&state, business, 0, SlotWorker::Character { id: worker })
            .unwrap();
        assert_eq!(state.characters[&worker].business_id, Some(business));

        assert!(matches!(
            assign_business_slot(&state, business, 1, SlotWorker::Character { id: worker }),
            Err(CoreError::AlreadyAssigned { .. })
        ));
        assert!(matches!(
            assign_business_slot(&state, business, 9, SlotWorker::Robot),
            Err(CoreError::SlotOutOfRange { slots: 4, .. })
        ));

        let state = assign_business_slot(&state, business, 0, SlotWorker::Robot).unwrap();
        assert_eq!(state.characters[&worker].business_id, None);
        assert_eq!(state.businesses[&business].robot_count(), 1);
    }

    #[test]
    fn restricted_slot_needs_major() {
        let mut rng = SmallRng::seed_from_u64(71);
        let (state, id) = state_with_player_aged(40, 100_000);
        let (state, workshop) =
            buy_business(&state, &catalog(), &BusinessKindId::new("workshop"), &mut rng).unwrap();
        assert!(matches!(
            assign_business_slot(&state, workshop, 0, SlotWorker::Character { id }),
            Err(CoreError::MajorMismatch { .. })
        ));

        let mut qualified = state.clone();
        qualified.characters.get_mut(&id).unwrap().education.major =
            Some(MajorId::new("engineering"));
        assert!(assign_business_slot(&qualified, workshop, 0, SlotWorker::Character { id }).is_ok());
    }

    #[test]
    fn upgrades_cost_more_each_level_and_stop_at_cap() {
        let (mut state, business) = cafe_state(60_000);
        state.family_fund = 1_000_000;
        let catalog = catalog();
        let mut fund = state.family_fund;
        for level in 1..5 {
            state = upgrade_business(&state, &catalog, business).unwrap();
            fund -= 20_000 * level;
            assert_eq!(state.family_fund, fund);
        }
        assert_eq!(state.businesses[&business].level, 5);
        assert!(matches!(
            upgrade_business(&state, &catalog, business),
            Err(CoreError::MaxLevelReached { level: 5, .. })
        ));
    }
}
