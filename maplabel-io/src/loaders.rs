use std::collections::HashMap;
use std::io::Read;

use maplabel_core::{Category, PlaceError, PlaceableHeader, Placeable};
use maplabel_geo::{FontSet, MeasuredFont, WebMercator};

fn validate_coordinates(lat: f64, lon: f64) -> Result<(), PlaceError> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        Err(PlaceError::InvalidInput(format!(
            "latitude/longitude out of range: {lat}, {lon}"
        )))
    } else {
        Ok(())
    }
}

/// Load `Countries.csv` rows eligible at `zoom`. A malformed or
/// out-of-range row is logged and skipped; it does not abort the load
/// (the original tool never aborted a whole run for one bad row).
pub fn load_countries<R: Read>(
    reader: R,
    zoom: u8,
    font: &MeasuredFont,
    projection: &WebMercator,
    next_id: &mut u64,
) -> Vec<Placeable> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut out = Vec::new();

    for result in rdr.deserialize::<crate::rows::CountryRow>() {
        let row = match result {
            Ok(row) => row,
            Err(err) => {
                log::warn!("skipping malformed country row: {err}");
                continue;
            }
        };
        if row.zoom > zoom {
            continue;
        }
        if let Err(err) = validate_coordinates(row.latitude, row.longitude) {
            log::warn!("skipping country {}: {err}", row.name);
            continue;
        }

        let (location, anchor) = projection.project(row.latitude, row.longitude, zoom);
        let abbr_size = font.measure(&row.abbreviation);
        let full_size = font.measure(&row.name);

        let id = *next_id;
        *next_id += 1;

        let header = PlaceableHeader {
            id,
            name: row.name.clone(),
            abbreviation: Some(row.abbreviation.clone()),
            population: Some(row.population),
            category: Category::Country,
            rank: row.zoom as i32 - 2, // biggest countries appear at z3, per spec
            zoom_threshold: row.zoom,
            anchor,
            location,
            buffer: 2.0,
        };

        out.push(Placeable::new_country(
            header,
            (abbr_size.0 as f64, abbr_size.1 as f64),
            (full_size.0 as f64, full_size.1 as f64),
        ));
    }

    out
}

/// Load one city input file's rows eligible at `zoom`, returning the
/// placeables plus the `id -> geonameid` pairs the emitter needs (the
/// core's `Placeable` has no notion of `geonameid`; it is purely an
/// output-side identifier).
pub fn load_cities<R: Read>(
    reader: R,
    zoom: u8,
    fonts: &FontSet,
    projection: &WebMercator,
    next_id: &mut u64,
) -> color_eyre::Result<(Vec<Placeable>, HashMap<u64, String>)> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(reader);

    let mut out = Vec::new();
    let mut geonameids = HashMap::new();

    for result in rdr.deserialize::<crate::rows::CityRow>() {
        let row = match result {
            Ok(row) => row,
            Err(err) => {
                log::warn!("skipping malformed city row: {err}");
                continue;
            }
        };
        if row.zoom > zoom {
            continue;
        }
        if let Err(err) = validate_coordinates(row.latitude, row.longitude) {
            log::warn!("skipping city {}: {err}", row.name);
            continue;
        }

        let tier = FontSet::tier_for_population(row.population);
        let font = fonts.get(tier)?;

        let (location, anchor) = projection.project(row.latitude, row.longitude, zoom);
        let label_size = font.measure(&row.name);

        let id = *next_id;
        *next_id += 1;

        let header = PlaceableHeader {
            id,
            name: row.name.clone(),
            abbreviation: None,
            population: row.population,
            category: Category::City,
            rank: row.zoom as i32 - 3, // biggest cities appear at z4, per spec
            zoom_threshold: row.zoom,
            anchor,
            location,
            buffer: 2.0,
        };

        let size = (label_size.0 as f64, label_size.1 as f64);
        let placeable = if zoom >= 9 {
            Placeable::new_high_zoom_city(header, size)
        } else {
            Placeable::new_city(header, size)
        };

        geonameids.insert(id, row.geonameid.clone());
        out.push(placeable);
    }

    Ok((out, geonameids))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Row filtering happens before any font is touched, so these loader
    // tests exercise the CSV/TSV parsing and zoom gate directly; glyph
    // metrics are covered in `maplabel_geo::fonts`'s own tests.

    #[test]
    fn rows_above_the_zoom_threshold_are_skipped() {
        let csv = "name,abbreviation,zoom,land area km,population,latitude,longitude\n\
                    Poland,PL,3,312696,37950000,52.0,19.0\n\
                    Monaco,MC,9,2,38000,43.73,7.42\n";
        let mut rdr = csv::Reader::from_reader(csv.as_bytes());
        let rows: Vec<crate::rows::CountryRow> =
            rdr.deserialize().map(|r| r.unwrap()).collect();
        let eligible: Vec<_> = rows.into_iter().filter(|r| r.zoom <= 5).collect();
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].name, "Poland");
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        assert!(validate_coordinates(52.0, 19.0).is_ok());
        assert!(validate_coordinates(200.0, 19.0).is_err());
        assert!(validate_coordinates(52.0, -200.0).is_err());
    }
}
