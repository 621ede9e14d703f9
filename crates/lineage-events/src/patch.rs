//! Partial state updates produced by effect actions.
//!
//! Action handlers never touch [`GameState`] directly. They read it and
//! return a [`StatePatch`] describing whole-record upserts; the patch is
//! then merged in one validated step. A merge that would break an
//! invariant is rejected as a whole and the input state is left untouched.

use std::collections::BTreeSet;

use lineage_family::family::check_partner_symmetry;
use lineage_types::{Business, Character, GameState, LogEntry, PendingChoice, Pet};
use tracing::debug;

use crate::error::EventError;

/// Record-level changes to apply to a [`GameState`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatePatch {
    /// Characters to insert or replace.
    pub characters: Vec<Character>,
    /// Businesses to replace.
    pub businesses: Vec<Business>,
    /// Pets to insert or replace.
    pub pets: Vec<Pet>,
    /// Added to the family fund.
    pub fund_delta: i64,
    /// Pending choices to open.
    pub pending: Vec<PendingChoice>,
    /// Log entries to append.
    pub log: Vec<LogEntry>,
}

impl StatePatch {
    /// A patch that changes nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
            && self.businesses.is_empty()
            && self.pets.is_empty()
            && self.fund_delta == 0
            && self.pending.is_empty()
            && self.log.is_empty()
    }

    /// Append a log entry.
    #[must_use]
    pub fn with_log(mut self, entry: LogEntry) -> Self {
        self.log.push(entry);
        self
    }

    /// Merge into a copy of `state`.
    ///
    /// Rejected when the patch rewrites a character who is already dead,
    /// opens a pending choice in an occupied slot, or leaves a partner link
    /// unreciprocated. Pending choices and queued triggers of characters
    /// who die in this patch are dropped.
    pub fn merge_into(self, state: &GameState) -> Result<GameState, EventError> {
        let mut next = state.clone();

        for character in self.characters {
            if next
                .characters
                .get(&character.id)
                .is_some_and(|existing| !existing.is_alive)
            {
                return Err(EventError::DeadCharacterMutation(character.id));
            }
            next.characters.insert(character.id, character);
        }
        for business in self.businesses {
            next.businesses.insert(business.id, business);
        }
        for pet in self.pets {
            next.pets.insert(pet.id, pet);
        }
        next.family_fund = next.family_fund.saturating_add(self.fund_delta);

        for choice in self.pending {
            let kind = choice.request.kind();
            if next.pending_for(choice.character_id, kind).is_some() {
                return Err(EventError::PendingSlotOccupied {
                    character_id: choice.character_id,
                    kind,
                });
            }
            next.pending.push(choice);
        }

        check_partner_symmetry(&next.characters)?;

        let dead: BTreeSet<_> = next
            .characters
            .values()
            .filter(|c| !c.is_alive)
            .map(|c| c.id)
            .collect();
        next.pending.retain(|p| !dead.contains(&p.character_id));
        next.trigger_queue.retain(|t| !dead.contains(&t.character_id));
        if next
            .offered_event
            .as_ref()
            .is_some_and(|o| dead.contains(&o.character_id))
        {
            next.offered_event = None;
        }

        let appended = self.log.len();
        next.log.extend(self.log);
        debug!(log_entries = appended, fund = next.family_fund, "patch merged");
        Ok(next)
    }
}
