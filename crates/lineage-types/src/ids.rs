//! Type-safe identifier wrappers.
//!
//! Runtime entities (characters, businesses, pets) carry [`Uuid`] newtypes.
//! They are drawn from the simulation's injected RNG rather than from the
//! operating system, so two runs with the same seed hand out identical ids.
//!
//! Catalog entries (events, careers, assets, ...) are keyed by stable string
//! slugs written by content authors; those use [`define_key!`] newtypes.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Draw a new random (v4-shaped) identifier from `rng`.
            pub fn generate<R: RngCore + ?Sized>(rng: &mut R) -> Self {
                let mut bytes = [0_u8; 16];
                rng.fill_bytes(&mut bytes);
                Self(uuid::Builder::from_random_bytes(bytes).into_uuid())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

/// Generates a newtype wrapper around a catalog slug.
macro_rules! define_key {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Wrap a slug.
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            /// Borrow the slug.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(key: &str) -> Self {
                Self(key.to_owned())
            }
        }
    };
}

define_id! {
    /// Unique identifier for a family member or synthesized partner.
    CharacterId
}

define_id! {
    /// Unique identifier for a business owned by the family.
    BusinessId
}

define_id! {
    /// Unique identifier for a family pet.
    PetId
}

define_key! {
    /// Catalog key of a [`GameEvent`](crate::catalog::GameEvent).
    EventId
}

define_key! {
    /// Key of a choice, unique within its event.
    ChoiceId
}

define_key! {
    /// Catalog key of a career track.
    CareerTrackId
}

define_key! {
    /// Catalog key of a purchasable asset.
    AssetId
}

define_key! {
    /// Catalog key of a business definition.
    BusinessKindId
}

define_key! {
    /// Catalog key of a university major.
    MajorId
}

define_key! {
    /// Catalog key of a school club.
    ClubId
}
