//! Cosmetic avatar generation and ageing.
//!
//! Nothing here affects simulation rules; tokens are looked up by the
//! presentation layer.

use lineage_types::{AvatarManifest, AvatarState, Gender, LifePhase};
use rand::Rng;

use crate::config::LifecycleConfig;
use crate::random::{pick_token, roll};

fn hair_styles(manifest: &AvatarManifest, gender: Gender) -> &[String] {
    match gender {
        Gender::Male => &manifest.male_hair_styles,
        Gender::Female => &manifest.female_hair_styles,
    }
}

/// A fresh avatar for a character of `gender` and `age` in `phase`.
pub fn randomize_avatar(
    manifest: &AvatarManifest,
    gender: Gender,
    age: u32,
    phase: LifePhase,
    config: &LifecycleConfig,
    rng: &mut (impl Rng + ?Sized),
) -> AvatarState {
    let hair_color = if age >= config.grey_hair_age {
        manifest.grey_hair_color.clone()
    } else {
        pick_token(rng, &manifest.hair_colors, "")
    };
    AvatarState {
        skin_tone: pick_token(rng, &manifest.skin_tones, ""),
        hair_style: pick_token(rng, hair_styles(manifest, gender), ""),
        hair_color,
        eye_color: pick_token(rng, &manifest.eye_colors, ""),
        outfit: pick_token(rng, manifest.outfits_for(phase), ""),
        glasses: roll(rng, config.glasses_chance),
    }
}

/// Update an avatar on a birthday.
///
/// New phase means new outfit. Hair greys at `grey_hair_age`; men past
/// `balding_age` may lose their hair.
pub fn age_avatar(
    avatar: &mut AvatarState,
    manifest: &AvatarManifest,
    gender: Gender,
    age: u32,
    phase_changed_to: Option<LifePhase>,
    config: &LifecycleConfig,
    rng: &mut (impl Rng + ?Sized),
) {
    if let Some(phase) = phase_changed_to {
        let outfits = manifest.outfits_for(phase);
        if !outfits.is_empty() {
            avatar.outfit = pick_token(rng, outfits, "");
        }
    }
    if age >= config.grey_hair_age && !manifest.grey_hair_color.is_empty() {
        avatar.hair_color.clone_from(&manifest.grey_hair_color);
    }
    if gender == Gender::Male
        && age >= config.balding_age
        && avatar.hair_style != manifest.bald_style
        && !manifest.bald_style.is_empty()
        && roll(rng, config.balding_chance)
    {
        avatar.hair_style.clone_from(&manifest.bald_style);
    }
}
