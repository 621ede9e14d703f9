//! Catalog validation errors.

use crate::ids::{BusinessKindId, CareerTrackId, ChoiceId, EventId, MajorId};

/// Structural problems found by [`Catalog::validate`](crate::catalog::Catalog::validate).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    /// Two entries of the same kind share an id.
    #[error("duplicate {kind} id: {id}")]
    DuplicateId {
        /// Entry kind ("event", "asset", ...).
        kind: &'static str,
        /// The repeated id.
        id: String,
    },

    /// An event offers no choices.
    #[error("event {event_id} has no choices")]
    EventWithoutChoices {
        /// The event.
        event_id: EventId,
    },

    /// A choice effect has an empty log key.
    #[error("event {event_id} choice {choice_id} has no log key")]
    MissingLogKey {
        /// The event.
        event_id: EventId,
        /// The choice.
        choice_id: ChoiceId,
    },

    /// A trigger names an event that does not exist.
    #[error("event {event_id} triggers unknown event {target}")]
    UnknownTriggerTarget {
        /// The triggering event.
        event_id: EventId,
        /// The missing target.
        target: EventId,
    },

    /// A probability outside `[0, 1]`.
    #[error("event {event_id} uses chance {chance} outside [0, 1]")]
    InvalidChance {
        /// The event.
        event_id: EventId,
        /// The bad probability.
        chance: f64,
    },

    /// No career track is open to characters without a major.
    #[error("catalog has no career track without a required major")]
    NoOpenCareerTrack,

    /// A career track has no levels.
    #[error("career track {track_id} has no levels")]
    EmptyCareerTrack {
        /// The track.
        track_id: CareerTrackId,
    },

    /// A track requires a major that does not exist.
    #[error("unknown major {major_id}")]
    UnknownMajor {
        /// The missing major.
        major_id: MajorId,
    },

    /// A business definition has no slots.
    #[error("business {business_id} has no slots")]
    BusinessWithoutSlots {
        /// The business definition.
        business_id: BusinessKindId,
    },

    /// An avatar token pool is empty.
    #[error("avatar pool {pool} is empty")]
    EmptyAvatarPool {
        /// Pool name.
        pool: &'static str,
    },
}
