//! Choice sources: who answers offered events and pending choices.
//!
//! The tick loop presents every offered event and open pending choice to a
//! [`ChoiceSource`]. The source may be a scripted policy, a random player,
//! or a presentation layer that answers later; returning `None` leaves the
//! question open and the character blocked.

use lineage_family::random::pick;
use lineage_types::{Character, ChoiceId, GameEvent, GameState, PendingChoice};
use rand::RngCore;

use crate::config::ChoicePolicy;
use crate::pending::PendingResolution;

/// A source of answers for events and pending choices.
pub trait ChoiceSource {
    /// Pick a choice of `event` for `character`, or `None` to leave the
    /// event offered.
    fn choose_event(
        &mut self,
        state: &GameState,
        character: &Character,
        event: &GameEvent,
        rng: &mut dyn RngCore,
    ) -> Option<ChoiceId>;

    /// Pick one of `options` for `pending`, or `None` to leave it open.
    fn choose_pending(
        &mut self,
        state: &GameState,
        pending: &PendingChoice,
        options: &[PendingResolution],
        rng: &mut dyn RngCore,
    ) -> Option<PendingResolution>;
}

impl ChoicePolicy {
    /// The source implementing this policy.
    pub fn into_source(self) -> Box<dyn ChoiceSource> {
        match self {
            Self::First => Box::new(FirstChoiceSource),
            Self::Random => Box::new(RandomChoiceSource),
        }
    }
}

/// Always takes the first listed option.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstChoiceSource;

impl ChoiceSource for FirstChoiceSource {
    fn choose_event(
        &mut self,
        _state: &GameState,
        _character: &Character,
        event: &GameEvent,
        _rng: &mut dyn RngCore,
    ) -> Option<ChoiceId> {
        event.choices.first().map(|c| c.id.clone())
    }

    fn choose_pending(
        &mut self,
        _state: &GameState,
        _pending: &PendingChoice,
        options: &[PendingResolution],
        _rng: &mut dyn RngCore,
    ) -> Option<PendingResolution> {
        options.first().cloned()
    }
}

/// Picks uniformly at random with the simulation RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomChoiceSource;

impl ChoiceSource for RandomChoiceSource {
    fn choose_event(
        &mut self,
        _state: &GameState,
        _character: &Character,
        event: &GameEvent,
        rng: &mut dyn RngCore,
    ) -> Option<ChoiceId> {
        pick(rng, &event.choices).map(|c| c.id.clone())
    }

    fn choose_pending(
        &mut self,
        _state: &GameState,
        _pending: &PendingChoice,
        options: &[PendingResolution],
        rng: &mut dyn RngCore,
    ) -> Option<PendingResolution> {
        pick(rng, options).cloned()
    }
}

/// Never answers. Offered events and pending choices stay open for an
/// external caller to resolve through the reducer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeferredChoiceSource;

impl ChoiceSource for DeferredChoiceSource {
    fn choose_event(
        &mut self,
        _state: &GameState,
        _character: &Character,
        _event: &GameEvent,
        _rng: &mut dyn RngCore,
    ) -> Option<ChoiceId> {
        None
    }

    fn choose_pending(
        &mut self,
        _state: &GameState,
        _pending: &PendingChoice,
        _options: &[PendingResolution],
        _rng: &mut dyn RngCore,
    ) -> Option<PendingResolution> {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lineage_types::{EventId, PendingRequest, SchoolKind};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::testing::{catalog, state_with_player_aged};

    fn school_options() -> Vec<PendingResolution> {
        [SchoolKind::Public, SchoolKind::Private, SchoolKind::International]
            .into_iter()
            .map(|school| PendingResolution::School { school })
            .collect()
    }

    #[test]
    fn first_source_is_deterministic() {
        let mut rng = SmallRng::seed_from_u64(1);
        let (state, id) = state_with_player_aged(17, 0);
        let catalog = catalog();
        let event = catalog.event(&EventId::new("school_trip")).unwrap();
        let character = state.character(id).unwrap();
        let mut source = FirstChoiceSource;
        assert_eq!(
            source.choose_event(&state, character, event, &mut rng),
            Some(event.choices[0].id.clone())
        );
        let pending = PendingChoice {
            character_id: id,
            request: PendingRequest::School,
            opened: state.date,
        };
        assert_eq!(
            source.choose_pending(&state, &pending, &school_options(), &mut rng),
            Some(PendingResolution::School {
                school: SchoolKind::Public
            })
        );
    }

    #[test]
    fn random_source_stays_within_options() {
        let mut rng = SmallRng::seed_from_u64(2);
        let (state, id) = state_with_player_aged(6, 0);
        let pending = PendingChoice {
            character_id: id,
            request: PendingRequest::School,
            opened: state.date,
        };
        let options = school_options();
        let mut source = RandomChoiceSource;
        for _ in 0..50 {
            let answer = source
                .choose_pending(&state, &pending, &options, &mut rng)
                .unwrap();
            assert!(options.contains(&answer));
        }
        assert_eq!(source.choose_pending(&state, &pending, &[], &mut rng), None);
    }

    #[test]
    fn deferred_source_never_answers() {
        let mut rng = SmallRng::seed_from_u64(3);
        let (state, id) = state_with_player_aged(17, 0);
        let catalog = catalog();
        let event = catalog.event(&EventId::new("school_trip")).unwrap();
        let mut source = DeferredChoiceSource;
        assert_eq!(
            source.choose_event(&state, state.character(id).unwrap(), event, &mut rng),
            None
        );
    }
}
