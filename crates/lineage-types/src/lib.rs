//! Shared type definitions for the Lineage family simulation.
//!
//! This crate is the single source of truth for the data model used across
//! the workspace. State types derive `ts-rs` so the presentation layer can
//! consume `TypeScript` bindings of [`GameState`] snapshots.
//!
//! # Modules
//!
//! - [`ids`] -- Seeded UUID wrappers for runtime entities, slug keys for catalog entries
//! - [`enums`] -- Life phases, genders, statuses, and other enumerations
//! - [`structs`] -- Characters, businesses, the calendar, and the [`GameState`] root
//! - [`catalog`] -- Static content: events, careers, assets, businesses, avatar tokens
//! - [`error`] -- Catalog validation errors

pub mod catalog;
pub mod enums;
pub mod error;
pub mod ids;
pub mod structs;

pub use catalog::{
    ActionKind, AssetDefinition, AvatarManifest, BusinessDefinition, CareerTrack, Catalog, Club,
    DynamicEffect, EffectAction, EventChoice, EventCondition, EventEffect, GameEvent,
    PhaseOutfits, SlotTemplate, TriggeredEvent, UniversityMajor,
};
pub use enums::{
    DeathCause, EmploymentStatus, GameOverReason, Gender, Language, LifePhase, PendingChoiceKind,
    PetSpecies, RelationshipStatus, SchoolKind, StatKind,
};
pub use error::CatalogError;
pub use ids::{
    AssetId, BusinessId, BusinessKindId, CareerTrackId, CharacterId, ChoiceId, ClubId, EventId,
    MajorId, PetId,
};
pub use structs::{
    AvatarState, Business, BusinessSlot, CareerPosition, Character, CharacterStatus, DAYS_PER_MONTH,
    DAYS_PER_YEAR, Education, GameState, IQ_CEILING, LogEntry, Loan, OfferedEvent, ParentPair,
    PendingChoice, PendingRequest, Pet, PurchasedAsset, QueuedTrigger, STAT_CEILING, SimDate,
    SlotWorker, StatChanges, Stats,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation for the presentation layer.

    #[test]
    fn export_bindings() {
        // Types with #[ts(export)] write their bindings to `bindings/`
        // relative to the crate root.
        use ts_rs::TS;

        let _ = crate::ids::CharacterId::export_all();
        let _ = crate::ids::BusinessId::export_all();
        let _ = crate::ids::PetId::export_all();
        let _ = crate::ids::EventId::export_all();

        let _ = crate::enums::LifePhase::export_all();
        let _ = crate::enums::RelationshipStatus::export_all();
        let _ = crate::enums::PendingChoiceKind::export_all();

        let _ = crate::structs::GameState::export_all();
        let _ = crate::catalog::Catalog::export_all();
    }
}
