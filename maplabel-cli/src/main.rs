mod cli;
mod preview;

use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use rand::RngCore;

use maplabel_core::{Annealer, Places};
use maplabel_geo::{Tier, WebMercator};
use maplabel_io::{build_feature_collections, load_capitals, load_cities, load_countries, open_input};

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let args = cli::Args::parse();
    run(args)
}

fn run(args: cli::Args) -> Result<()> {
    let fonts = cli::load_font_set(&args.fonts)?;
    let country_font = fonts.get(Tier::Country)?;
    let projection = WebMercator;

    let mut places = Places::new();
    let mut next_id = 1u64;
    let mut geonameids = HashMap::new();

    let countries_reader =
        open_input(&args.countries).wrap_err_with(|| format!("opening {}", args.countries.display()))?;
    for country in load_countries(countries_reader, args.zoom, country_font, &projection, &mut next_id) {
        places.add(country);
    }
    log::info!("loaded {} countries", places.len());

    for city_path in &args.cities {
        let reader = open_input(city_path).wrap_err_with(|| format!("opening {}", city_path.display()))?;
        let (cities, ids) = load_cities(reader, args.zoom, &fonts, &projection, &mut next_id)?;
        for city in cities {
            places.add(city);
        }
        geonameids.extend(ids);
    }
    log::info!("loaded {} places total", places.len());

    let capitals = match &args.capitals {
        Some(path) => {
            let reader = open_input(path).wrap_err_with(|| format!("opening {}", path.display()))?;
            load_capitals(reader)?
        }
        None => Default::default(),
    };

    let seed = args.seed.unwrap_or_else(|| {
        let drawn = rand::thread_rng().next_u64();
        log::info!("no --seed given; drew {drawn} from OS entropy (pass --seed {drawn} to replay this run)");
        drawn
    });

    let mut annealer = Annealer::new(seed);
    let (placed, best_energy) = annealer.auto(places, args.minutes, args.probe_steps)?;
    log::info!("annealing finished at energy {best_energy:.4}");
    placed.check_energy_invariant()?;

    let visible = maplabel_core::resolve(&placed);
    log::info!("{} of {} placeables are visible at zoom {}", visible.len(), placed.len(), args.zoom);

    let (points, labels) =
        build_feature_collections(&placed, &visible, &projection, args.zoom, &geonameids, &capitals);

    write_json(&args.points, &points)?;
    write_json(&args.labels, &labels)?;

    if let Some(preview_path) = &args.preview {
        let preview_font = fonts.get(Tier::Other)?;
        preview::render(&placed, &visible, preview_font.font(), preview_font.size_px(), preview_path)?;
        log::info!("wrote preview to {}", preview_path.display());
    }

    Ok(())
}

fn write_json<T: serde::Serialize>(path: &std::path::Path, value: &T) -> Result<()> {
    let file = File::create(path).wrap_err_with(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .wrap_err_with(|| format!("writing {}", path.display()))
}
