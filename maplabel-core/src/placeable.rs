use glam::DVec2;
use rand::Rng;
use std::f64::consts::FRAC_1_SQRT_2;

use crate::geometry::{GeoPoint, Rect};

/// A point-marker circle's radius, shared by City and the 13 compass
/// offsets below.
const MARKER_RADIUS: f64 = 4.0;

/// `category` tag from the data model: drives both emitted `place` and
/// the resolver's sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Country,
    City,
}

/// One of the 13 discrete label positions available to a low-zoom City.
/// Order matches the spec's enumeration and doubles as the uniform
/// choice set in `move()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompassTag {
    NE,
    ENE,
    ESE,
    SE,
    SSE,
    S,
    SW,
    WSW,
    WNW,
    NW,
    NNW,
    N,
    NNE,
}

pub const ALL_TAGS: [CompassTag; 13] = [
    CompassTag::NE,
    CompassTag::ENE,
    CompassTag::ESE,
    CompassTag::SE,
    CompassTag::SSE,
    CompassTag::S,
    CompassTag::SW,
    CompassTag::WSW,
    CompassTag::WNW,
    CompassTag::NW,
    CompassTag::NNW,
    CompassTag::N,
    CompassTag::NNE,
]; // slide 13 of http://www.cs.uu.nl/docs/vakken/gd/steven2.pdf

impl CompassTag {
    /// Cultural placement-preference cost; lower is better. Table is
    /// reproduced verbatim, including `S` outranking `N` in cost.
    pub fn placement_energy(self) -> f64 {
        match self {
            CompassTag::NE => 0.000,
            CompassTag::ENE => 0.070,
            CompassTag::ESE => 0.100,
            CompassTag::SE => 0.175,
            CompassTag::SSE => 0.200,
            CompassTag::S => 0.900,
            CompassTag::SW => 0.600,
            CompassTag::WSW => 0.500,
            CompassTag::WNW => 0.470,
            CompassTag::NW => 0.400,
            CompassTag::NNW => 0.575,
            CompassTag::N => 0.800,
            CompassTag::NNE => 0.150,
        }
    }

    /// Offset from the anchor to the label center for this tag, given
    /// the measured label size `(w, h)` and the marker radius `r`.
    fn offset(self, r: f64, w: f64, h: f64) -> DVec2 {
        let diag = r * FRAC_1_SQRT_2; // r*cos(45deg) == r*sin(45deg)
        match self {
            CompassTag::NE => DVec2::new(r + w / 2.0, -h / 2.0),
            CompassTag::SE => DVec2::new(r + w / 2.0, h / 2.0),
            CompassTag::NW => DVec2::new(-(r + w / 2.0), -h / 2.0),
            CompassTag::SW => DVec2::new(-(r + w / 2.0), h / 2.0),
            CompassTag::ENE => DVec2::new(r + w / 2.0, -h / 6.0),
            CompassTag::ESE => DVec2::new(r + w / 2.0, h / 6.0),
            CompassTag::WNW => DVec2::new(-(r + w / 2.0), -h / 6.0),
            CompassTag::WSW => DVec2::new(-(r + w / 2.0), h / 6.0),
            CompassTag::N => DVec2::new(0.0, -(r + h / 2.0)),
            CompassTag::S => DVec2::new(0.0, r + h / 2.0),
            CompassTag::NNE => DVec2::new(diag + w / 2.0, -(diag + h / 2.0)),
            CompassTag::NNW => DVec2::new(-(diag + w / 2.0), -(diag + h / 2.0)),
            CompassTag::SSE => DVec2::new(diag + w / 2.0, diag + h / 2.0),
        }
    }
}

/// Fields every placeable carries regardless of variant. Immutable after
/// construction; only the per-variant placement state (held in the
/// enclosing [`Placeable`] arm) is mutated by the annealer.
#[derive(Debug, Clone)]
pub struct PlaceableHeader {
    pub id: u64,
    pub name: String,
    pub abbreviation: Option<String>,
    pub population: Option<u64>,
    pub category: Category,
    pub rank: i32,
    pub zoom_threshold: u8,
    pub anchor: DVec2,
    pub location: GeoPoint,
    pub buffer: f64,
}

#[derive(Debug, Clone)]
pub struct CountryPlaceable {
    pub header: PlaceableHeader,
    abbr_size: (f64, f64),
    full_size: (f64, f64),
    use_abbreviation: bool,
    offset: DVec2,
}

#[derive(Debug, Clone)]
pub struct CityPlaceable {
    pub header: PlaceableHeader,
    label_size: (f64, f64),
    placement: CompassTag,
}

#[derive(Debug, Clone)]
pub struct HighZoomCityPlaceable {
    pub header: PlaceableHeader,
    label_size: (f64, f64),
    offset: DVec2,
}

/// The mutable placement state, snapshotted before a proposal so the
/// annealer can undo a rejected move without cloning the whole
/// placeable (see design notes on rollback).
#[derive(Debug, Clone, Copy)]
pub enum PlacementSnapshot {
    Country { use_abbreviation: bool, offset: DVec2 },
    City { placement: CompassTag },
    HighZoomCity { offset: DVec2 },
}

/// The polymorphic entity whose label position the annealer optimizes.
/// A tagged variant stands in for the class hierarchy of the original:
/// shared behavior lives in the `impl` below, variant-specific data in
/// each arm's struct.
#[derive(Debug, Clone)]
pub enum Placeable {
    Country(CountryPlaceable),
    City(CityPlaceable),
    HighZoomCity(HighZoomCityPlaceable),
}

impl Placeable {
    pub fn new_country(
        header: PlaceableHeader,
        abbr_size: (f64, f64),
        full_size: (f64, f64),
    ) -> Self {
        Placeable::Country(CountryPlaceable {
            header,
            abbr_size,
            full_size,
            use_abbreviation: false,
            offset: DVec2::ZERO,
        })
    }

    pub fn new_city(header: PlaceableHeader, label_size: (f64, f64)) -> Self {
        Placeable::City(CityPlaceable {
            header,
            label_size,
            placement: CompassTag::NE,
        })
    }

    pub fn new_high_zoom_city(header: PlaceableHeader, label_size: (f64, f64)) -> Self {
        Placeable::HighZoomCity(HighZoomCityPlaceable {
            header,
            label_size,
            offset: DVec2::ZERO,
        })
    }

    pub fn header(&self) -> &PlaceableHeader {
        match self {
            Placeable::Country(p) => &p.header,
            Placeable::City(p) => &p.header,
            Placeable::HighZoomCity(p) => &p.header,
        }
    }

    pub fn rank(&self) -> i32 {
        self.header().rank
    }

    pub fn zoom_threshold(&self) -> u8 {
        self.header().zoom_threshold
    }

    pub fn display_name(&self) -> &str {
        match self {
            Placeable::Country(p) if p.use_abbreviation => {
                p.header.abbreviation.as_deref().unwrap_or(&p.header.name)
            }
            _ => &self.header().name,
        }
    }

    /// Current label size `(w, h)` for whichever state is active.
    fn current_size(&self) -> (f64, f64) {
        match self {
            Placeable::Country(p) => {
                if p.use_abbreviation {
                    p.abbr_size
                } else {
                    p.full_size
                }
            }
            Placeable::City(p) => p.label_size,
            Placeable::HighZoomCity(p) => p.label_size,
        }
    }

    /// Current label AABB in pixel space.
    pub fn label_rect(&self) -> Rect {
        let anchor = self.header().anchor;
        match self {
            Placeable::Country(p) => {
                let (w, h) = self.current_size();
                Rect::from_center_size(anchor + p.offset, w, h)
            }
            Placeable::City(p) => {
                let (w, h) = p.label_size;
                let center = anchor + p.placement.offset(MARKER_RADIUS, w, h);
                Rect::from_center_size(center, w, h)
            }
            Placeable::HighZoomCity(p) => {
                let (w, h) = p.label_size;
                Rect::from_center_size(anchor + p.offset, w, h)
            }
        }
    }

    /// Collision footprint: the label rect inflated by `buffer`, unioned
    /// (City only) with the point-marker square.
    pub fn mask_rect(&self) -> Rect {
        let inflated = self.label_rect().inflate(self.header().buffer);
        match self {
            Placeable::City(p) => {
                let marker = Rect::from_center_size(
                    p.header.anchor,
                    2.0 * MARKER_RADIUS,
                    2.0 * MARKER_RADIUS,
                );
                inflated.union(&marker)
            }
            _ => inflated,
        }
    }

    /// Upper bound on this placeable's mask radius from its anchor, over
    /// every placement it could ever reach.
    fn max_mask_radius(&self) -> f64 {
        let buffer = self.header().buffer;
        match self {
            Placeable::Country(p) => {
                crate::geometry::hypot(p.full_size.0 + 2.0 * buffer, p.full_size.1 + 2.0 * buffer)
            }
            Placeable::City(p) => {
                let (w, h) = p.label_size;
                MARKER_RADIUS + crate::geometry::hypot(w + 2.0 * buffer, h + 2.0 * buffer)
            }
            Placeable::HighZoomCity(p) => {
                let (w, h) = p.label_size;
                crate::geometry::hypot(w + 2.0 * buffer, h + 2.0 * buffer)
            }
        }
    }

    /// True iff the two anchors are within the sum of their maximum
    /// possible mask radii. Symmetric by construction.
    pub fn in_range(&self, other: &Placeable) -> bool {
        let distance = crate::geometry::distance(self.header().anchor, other.header().anchor);
        distance <= self.max_mask_radius() + other.max_mask_radius()
    }

    /// True iff either mask intersects the other's current label rect.
    pub fn overlaps(&self, other: &Placeable) -> bool {
        self.mask_rect().intersects(&other.label_rect())
            || other.mask_rect().intersects(&self.label_rect())
    }

    pub fn placement_energy(&self) -> f64 {
        match self {
            Placeable::Country(p) => {
                let (w, _h) = self.current_size();
                let x = 2.0 * p.offset.x / w;
                let y = 2.0 * p.offset.y / w; // both divided by width, verbatim
                p.use_abbreviation as i32 as f64 + x * x + y * y
            }
            Placeable::City(p) => p.placement.placement_energy(),
            Placeable::HighZoomCity(p) => {
                let (w, _h) = p.label_size;
                let x = 2.0 * p.offset.x / w;
                let y = 2.0 * p.offset.y / w;
                x * x + y * y
            }
        }
    }

    pub fn overlap_energy(&self, other: &Placeable) -> f64 {
        if self.overlaps(other) {
            (10.0 / self.rank() as f64).min(10.0 / other.rank() as f64)
        } else {
            0.0
        }
    }

    pub fn snapshot(&self) -> PlacementSnapshot {
        match self {
            Placeable::Country(p) => PlacementSnapshot::Country {
                use_abbreviation: p.use_abbreviation,
                offset: p.offset,
            },
            Placeable::City(p) => PlacementSnapshot::City {
                placement: p.placement,
            },
            Placeable::HighZoomCity(p) => PlacementSnapshot::HighZoomCity { offset: p.offset },
        }
    }

    pub fn restore(&mut self, snapshot: PlacementSnapshot) {
        match (self, snapshot) {
            (
                Placeable::Country(p),
                PlacementSnapshot::Country {
                    use_abbreviation,
                    offset,
                },
            ) => {
                p.use_abbreviation = use_abbreviation;
                p.offset = offset;
            }
            (Placeable::City(p), PlacementSnapshot::City { placement }) => {
                p.placement = placement;
            }
            (Placeable::HighZoomCity(p), PlacementSnapshot::HighZoomCity { offset }) => {
                p.offset = offset;
            }
            _ => unreachable!("placement snapshot variant must match placeable variant"),
        }
    }

    /// Draw a new placement state at random, per the per-variant
    /// proposal rules. Leaves all derived fields (there are none stored;
    /// `label_rect`/`mask_rect` are computed on demand) consistent.
    pub fn do_move(&mut self, rng: &mut impl Rng) {
        match self {
            Placeable::Country(p) => {
                p.use_abbreviation = rng.gen_bool(0.5);
                let (w, h) = if p.use_abbreviation {
                    p.abbr_size
                } else {
                    p.full_size
                };
                p.offset = DVec2::new(
                    rng.gen_range(-w / 2.0..=w / 2.0),
                    rng.gen_range(-h / 2.0..=h / 2.0),
                );
            }
            Placeable::City(p) => {
                p.placement = ALL_TAGS[rng.gen_range(0..ALL_TAGS.len())];
            }
            Placeable::HighZoomCity(p) => {
                let (w, h) = p.label_size;
                p.offset = DVec2::new(
                    rng.gen_range(-w / 2.0..=w / 2.0),
                    rng.gen_range(-h / 2.0..=h / 2.0),
                );
            }
        }
    }
}
