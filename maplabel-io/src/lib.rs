//! I/O glue: CSV/TSV row loaders for countries and cities, the capitals
//! set, and GeoJSON serialization of the resolved placeables. None of
//! this is part of the label placement engine itself (`maplabel-core`);
//! it is the surrounding loader the spec treats as external.

pub mod capitals;
pub mod geojson;
pub mod input;
pub mod loaders;
pub mod rows;

pub use capitals::load_capitals;
pub use geojson::{build_feature_collections, Feature, FeatureCollection, Geometry, Properties};
pub use input::open_input;
pub use loaders::{load_cities, load_countries};
pub use rows::{CityRow, CountryRow};
