use crate::placeable::Category;
use crate::places::Places;

/// Walk placeables in priority order, keeping each only if it does not
/// overlap anything already kept. Deterministic given the places'
/// insertion order (ties in the sort key are broken by it, since
/// `sort_by_key` is stable).
pub fn resolve(places: &Places) -> Vec<usize> {
    let mut order: Vec<usize> = (0..places.len()).collect();
    order.sort_by_key(|&index| {
        let place = places.get(index);
        let category_order = match place.header().category {
            Category::Country => 0u8,
            Category::City => 1u8,
        };
        (
            category_order,
            place.rank(),
            std::cmp::Reverse(place.header().population.unwrap_or(0)),
        )
    });

    let mut visible = Vec::new();
    for index in order {
        let place = places.get(index);
        let collides = visible
            .iter()
            .any(|&other: &usize| place.overlaps(places.get(other)));
        if collides {
            log::debug!("skip {} because it overlaps a visible placeable", place.display_name());
            continue;
        }
        visible.push(index);
    }
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeoPoint;
    use crate::placeable::{Placeable, PlaceableHeader};
    use glam::DVec2;

    fn country(id: u64, rank: i32, anchor: DVec2) -> Placeable {
        Placeable::new_country(
            PlaceableHeader {
                id,
                name: format!("country-{id}"),
                abbreviation: Some("C".into()),
                population: Some(1_000_000),
                category: Category::Country,
                rank,
                zoom_threshold: 2,
                anchor,
                location: GeoPoint { lat: 0.0, lon: 0.0 },
                buffer: 2.0,
            },
            (40.0, 14.0),
            (80.0, 14.0),
        )
    }

    fn city(id: u64, rank: i32, anchor: DVec2) -> Placeable {
        Placeable::new_city(
            PlaceableHeader {
                id,
                name: format!("city-{id}"),
                abbreviation: None,
                population: Some(10),
                category: Category::City,
                rank,
                zoom_threshold: 5,
                anchor,
                location: GeoPoint { lat: 0.0, lon: 0.0 },
                buffer: 2.0,
            },
            (20.0, 10.0),
        )
    }

    #[test]
    fn resolver_never_emits_overlapping_pairs() {
        let mut places = Places::new();
        places.add(country(1, 1, DVec2::ZERO));
        places.add(country(2, 2, DVec2::ZERO));
        places.add(city(3, 1, DVec2::ZERO));

        let visible = resolve(&places);
        for &a in &visible {
            for &b in &visible {
                if a != b {
                    assert!(!places.get(a).overlaps(places.get(b)));
                }
            }
        }
    }

    #[test]
    fn country_beats_city_at_the_same_anchor() {
        let mut places = Places::new();
        places.add(country(1, 1, DVec2::ZERO));
        places.add(city(2, 1, DVec2::ZERO));

        let visible = resolve(&places);
        assert_eq!(visible, vec![0]);
    }

    #[test]
    fn higher_rank_country_is_always_retained() {
        let mut places = Places::new();
        places.add(country(1, 1, DVec2::ZERO)); // rank 1, more important
        places.add(country(2, 2, DVec2::ZERO)); // rank 2

        let visible = resolve(&places);
        assert_eq!(visible, vec![0]);
    }
}
