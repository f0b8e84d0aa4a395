use std::f64::consts::PI;

use glam::DVec2;
use maplabel_core::GeoPoint;

/// Mercator's latitude limit; beyond this the projection's `y` runs to
/// infinity, so inputs are clamped before projecting.
const MAX_LATITUDE: f64 = 85.051_129;

/// Web-Mercator tiling at `zoom`, tile size `2^8` px, matching
/// `original_source`'s `ModestMaps.OpenStreetMap.Provider` at
/// `zoom + 8`. The core treats the result as an opaque pixel plane; only
/// the emitter calls [`unproject`] to go back to geographic coordinates.
pub struct WebMercator;

impl WebMercator {
    fn world_size(zoom: u8) -> f64 {
        2f64.powi(zoom as i32 + 8)
    }

    /// Project geographic coordinates to a pixel anchor at `zoom`,
    /// returning the clamped location alongside the point so callers can
    /// keep both without reprojecting.
    pub fn project(&self, lat: f64, lon: f64, zoom: u8) -> (GeoPoint, DVec2) {
        let clamped = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        if clamped != lat {
            log::debug!("latitude {lat} clamped to the Mercator limit {clamped}");
        }
        let lat = clamped;
        let world_size = Self::world_size(zoom);

        let x = (lon + 180.0) / 360.0 * world_size;
        let lat_rad = lat.to_radians();
        let merc_n = (PI / 4.0 + lat_rad / 2.0).tan().ln();
        let y = world_size / 2.0 - world_size * merc_n / (2.0 * PI);

        (GeoPoint { lat, lon }, DVec2::new(x, y))
    }

    /// Inverse of [`Self::project`].
    pub fn unproject(&self, point: DVec2, zoom: u8) -> (f64, f64) {
        let world_size = Self::world_size(zoom);

        let lon = point.x / world_size * 360.0 - 180.0;
        let merc_n = (world_size / 2.0 - point.y) * 2.0 * PI / world_size;
        let lat_rad = 2.0 * merc_n.exp().atan() - PI / 2.0;

        (lat_rad.to_degrees(), lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn project_then_unproject_round_trips() {
        let proj = WebMercator;
        for &(lat, lon) in &[
            (0.0, 0.0),
            (49.5, 20.1),
            (-33.87, 151.21),
            (64.13, -21.9),
        ] {
            for zoom in [0u8, 5, 9, 14] {
                let (_, point) = proj.project(lat, lon, zoom);
                let (out_lat, out_lon) = proj.unproject(point, zoom);
                assert_abs_diff_eq!(out_lat, lat, epsilon = 1e-6);
                assert_abs_diff_eq!(out_lon, lon, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn latitude_is_clamped_to_the_mercator_limit() {
        let proj = WebMercator;
        let (location, _) = proj.project(89.9, 0.0, 5);
        assert_abs_diff_eq!(location.lat, MAX_LATITUDE, epsilon = 1e-9);
    }

    #[test]
    fn one_more_zoom_level_doubles_pixel_extent() {
        let proj = WebMercator;
        let (_, low) = proj.project(10.0, 10.0, 3);
        let (_, high) = proj.project(10.0, 10.0, 4);
        assert_abs_diff_eq!(high.x, low.x * 2.0, epsilon = 1e-6);
    }
}
