use std::collections::{HashMap, HashSet};

use maplabel_core::{Category, Places};
use maplabel_geo::WebMercator;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: (f64, f64) },
    Polygon { coordinates: Vec<Vec<(f64, f64)>> },
}

#[derive(Debug, Clone, Serialize)]
pub struct Properties {
    pub name: String,
    pub rank: i32,
    pub population: Option<u64>,
    pub geonameid: Option<String>,
    pub capital: &'static str,
    pub place: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub geometry: Geometry,
    pub properties: Properties,
}

#[derive(Debug, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    fn new(features: Vec<Feature>) -> Self {
        FeatureCollection {
            kind: "FeatureCollection",
            features,
        }
    }
}

fn properties_for(
    place: &maplabel_core::Placeable,
    geonameids: &HashMap<u64, String>,
    capitals: &HashSet<String>,
) -> Properties {
    let header = place.header();
    let geonameid = geonameids.get(&header.id).cloned();
    let capital = match &geonameid {
        Some(id) if capitals.contains(id) => "yes",
        _ => "no",
    };
    let place_kind = match header.category {
        Category::Country => "country",
        Category::City => "city",
    };

    Properties {
        name: place.display_name().to_owned(),
        rank: header.rank,
        population: header.population,
        geonameid,
        capital,
        place: place_kind,
    }
}

/// Build the point and label-bbox feature collections for the resolved
/// `visible` placeables, per the spec's §6 output contract.
pub fn build_feature_collections(
    places: &Places,
    visible: &[usize],
    projection: &WebMercator,
    zoom: u8,
    geonameids: &HashMap<u64, String>,
    capitals: &HashSet<String>,
) -> (FeatureCollection, FeatureCollection) {
    let mut point_features = Vec::with_capacity(visible.len());
    let mut label_features = Vec::with_capacity(visible.len());

    for &index in visible {
        let place = places.get(index);
        let header = place.header();
        let properties = properties_for(place, geonameids, capitals);

        point_features.push(Feature {
            kind: "Feature",
            geometry: Geometry::Point {
                coordinates: (header.location.lon, header.location.lat),
            },
            properties: properties.clone(),
        });

        let rect = place.label_rect();
        let (lat1, lon1) = projection.unproject(rect.min, zoom);
        let (lat2, lon2) = projection.unproject(rect.max, zoom);
        let ring = vec![
            (lon1, lat1),
            (lon1, lat2),
            (lon2, lat2),
            (lon2, lat1),
            (lon1, lat1),
        ];

        label_features.push(Feature {
            kind: "Feature",
            geometry: Geometry::Polygon {
                coordinates: vec![ring],
            },
            properties,
        });
    }

    (
        FeatureCollection::new(point_features),
        FeatureCollection::new(label_features),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use maplabel_core::{GeoPoint, PlaceableHeader, Placeable};

    #[test]
    fn label_polygon_is_a_closed_ring() {
        let mut places = Places::new();
        places.add(Placeable::new_city(
            PlaceableHeader {
                id: 1,
                name: "Nowhere".into(),
                abbreviation: None,
                population: Some(10),
                category: Category::City,
                rank: 1,
                zoom_threshold: 5,
                anchor: DVec2::new(1000.0, 1000.0),
                location: GeoPoint { lat: 10.0, lon: 10.0 },
                buffer: 2.0,
            },
            (20.0, 10.0),
        ));

        let projection = WebMercator;
        let (points, labels) = build_feature_collections(
            &places,
            &[0],
            &projection,
            5,
            &HashMap::new(),
            &HashSet::new(),
        );

        assert_eq!(points.features.len(), 1);
        assert_eq!(labels.features.len(), 1);
        match &labels.features[0].geometry {
            Geometry::Polygon { coordinates } => {
                let ring = &coordinates[0];
                assert_eq!(ring.len(), 5);
                assert_eq!(ring.first(), ring.last());
            }
            _ => panic!("expected a polygon"),
        }
        assert_eq!(points.features[0].properties.capital, "no");
    }
}
