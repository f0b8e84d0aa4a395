use std::collections::HashMap;

use ab_glyph::{Font, FontArc, ScaleFont};
use strum::{Display, EnumString};
use thiserror::Error;

/// The five population-driven font buckets from `original_source`.
/// `Country` is the one shared country font; the rest gate on a city's
/// population (see `maplabel-io`'s loader).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Tier {
    #[strum(serialize = "country")]
    Country,
    #[strum(serialize = "25m")]
    Pop25m,
    #[strum(serialize = "250k")]
    Pop250k,
    #[strum(serialize = "50k")]
    Pop50k,
    #[strum(serialize = "other")]
    Other,
}

#[derive(Debug, Error)]
pub enum FontError {
    #[error("unreadable font data for tier {0}")]
    InvalidFont(Tier),
    #[error("no font configured for tier {0}")]
    MissingTier(Tier),
}

/// A loaded TrueType/OpenType font at a fixed point size, ready to
/// measure strings. This is the `measure_text` collaborator from the
/// spec's external interfaces (§6): the core calls it once per
/// placeable at construction and never re-measures.
pub struct MeasuredFont {
    font: FontArc,
    size_px: f32,
}

impl MeasuredFont {
    pub fn load(bytes: Vec<u8>, size_px: f32, tier: Tier) -> Result<Self, FontError> {
        let font = FontArc::try_from_vec(bytes).map_err(|_| {
            log::warn!("font data for tier {tier} could not be parsed");
            FontError::InvalidFont(tier)
        })?;
        Ok(MeasuredFont { font, size_px })
    }

    /// The underlying font handle, for collaborators (the debug preview)
    /// that need to rasterize glyphs rather than just measure them.
    pub fn font(&self) -> &FontArc {
        &self.font
    }

    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    /// Integer pixel width/height of `text` rendered in this font.
    /// Kerning is intentionally not applied (non-goal).
    pub fn measure(&self, text: &str) -> (u32, u32) {
        let scaled = self.font.as_scaled(self.size_px);
        let width: f32 = text
            .chars()
            .map(|c| scaled.h_advance(scaled.glyph_id(c)))
            .sum();
        let height = scaled.ascent() - scaled.descent();

        (width.ceil().max(0.0) as u32, height.ceil().max(0.0) as u32)
    }
}

/// The five loaded fonts a loader needs: one per [`Tier`].
#[derive(Default)]
pub struct FontSet {
    fonts: HashMap<Tier, MeasuredFont>,
}

impl FontSet {
    pub fn new() -> Self {
        FontSet::default()
    }

    pub fn insert(&mut self, tier: Tier, font: MeasuredFont) {
        self.fonts.insert(tier, font);
    }

    pub fn get(&self, tier: Tier) -> Result<&MeasuredFont, FontError> {
        self.fonts.get(&tier).ok_or(FontError::MissingTier(tier))
    }

    /// The city font tier for a given population, per `original_source`'s
    /// thresholds. `None` (unparseable/missing population) uses the
    /// smallest tier.
    pub fn tier_for_population(population: Option<u64>) -> Tier {
        match population {
            Some(p) if p >= 2_500_000 => Tier::Pop25m,
            Some(p) if p >= 250_000 => Tier::Pop250k,
            Some(p) if p >= 50_000 => Tier::Pop50k,
            _ => Tier::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_thresholds_match_original_source() {
        assert_eq!(FontSet::tier_for_population(Some(3_000_000)), Tier::Pop25m);
        assert_eq!(FontSet::tier_for_population(Some(2_500_000)), Tier::Pop25m);
        assert_eq!(FontSet::tier_for_population(Some(2_499_999)), Tier::Pop250k);
        assert_eq!(FontSet::tier_for_population(Some(250_000)), Tier::Pop250k);
        assert_eq!(FontSet::tier_for_population(Some(50_000)), Tier::Pop50k);
        assert_eq!(FontSet::tier_for_population(Some(49_999)), Tier::Other);
        assert_eq!(FontSet::tier_for_population(None), Tier::Other);
    }

    #[test]
    fn missing_tier_is_reported_not_panicked() {
        let fonts = FontSet::new();
        assert!(matches!(
            fonts.get(Tier::Country),
            Err(FontError::MissingTier(Tier::Country))
        ));
    }
}
