use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{eyre, Context, Result};
use maplabel_geo::Tier;

/// Anneal label placements for a set of countries and cities and emit
/// point/label GeoJSON, resolving `original_source`'s `optparse` surface
/// into `clap`.
#[derive(Debug, Parser)]
#[command(name = "maplabel", version, about)]
pub struct Args {
    /// Countries CSV (`name,abbreviation,zoom,land area km,population,
    /// latitude,longitude`).
    #[arg(long, default_value = "Countries.csv")]
    pub countries: PathBuf,

    /// City TSV input files, gzip-compressed if named `*.gz`.
    #[arg(required = true)]
    pub cities: Vec<PathBuf>,

    /// Output path for the point FeatureCollection.
    #[arg(long, default_value = "points.json")]
    pub points: PathBuf,

    /// Output path for the label-bbox FeatureCollection.
    #[arg(long, default_value = "labels.json")]
    pub labels: PathBuf,

    /// Zoom level to place labels for.
    #[arg(long, default_value_t = 5)]
    pub zoom: u8,

    /// Wall-clock annealing budget, in minutes.
    #[arg(long, default_value_t = 1.0)]
    pub minutes: f64,

    /// Flat file of one capital geonameid per line.
    #[arg(long)]
    pub capitals: Option<PathBuf>,

    /// One per tier: `--font country=DejaVuSans.ttf:12`.
    #[arg(long = "font", value_parser = parse_font_spec)]
    pub fonts: Vec<FontSpec>,

    /// Optional debug PNG preview of the resolved placement.
    #[arg(long)]
    pub preview: Option<PathBuf>,

    /// Deterministic PRNG seed. Drawn from OS entropy and logged if absent.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of proposals in the calibration probe run.
    #[arg(long, default_value_t = 200)]
    pub probe_steps: usize,
}

#[derive(Debug, Clone)]
pub struct FontSpec {
    pub tier: Tier,
    pub path: PathBuf,
    pub size_px: f32,
}

/// Parses `tier=path:size`, e.g. `250k=DejaVuSans.ttf:11`.
fn parse_font_spec(raw: &str) -> Result<FontSpec, String> {
    let (tier_str, rest) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected tier=path:size, got {raw:?}"))?;
    let (path_str, size_str) = rest
        .rsplit_once(':')
        .ok_or_else(|| format!("expected tier=path:size, got {raw:?}"))?;

    let tier = tier_str
        .parse::<Tier>()
        .map_err(|_| format!("unknown font tier {tier_str:?}"))?;
    let size_px = size_str
        .parse::<f32>()
        .map_err(|_| format!("invalid font size {size_str:?}"))?;

    Ok(FontSpec {
        tier,
        path: PathBuf::from(path_str),
        size_px,
    })
}

/// Load every `--font` flag into a `FontSet`, failing loudly if a tier's
/// font file can't be read rather than deferring to a `MissingTier` error
/// mid-annealing.
pub fn load_font_set(specs: &[FontSpec]) -> Result<maplabel_geo::FontSet> {
    let mut fonts = maplabel_geo::FontSet::new();
    for spec in specs {
        let bytes = std::fs::read(&spec.path)
            .wrap_err_with(|| format!("reading font {}", spec.path.display()))?;
        let measured = maplabel_geo::MeasuredFont::load(bytes, spec.size_px, spec.tier)
            .map_err(|err| eyre!(err))
            .wrap_err_with(|| format!("loading font {}", spec.path.display()))?;
        fonts.insert(spec.tier, measured);
    }
    Ok(fonts)
}
