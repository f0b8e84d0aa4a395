//! External collaborators the core treats as opaque: the projection
//! between geographic and pixel space, and font metrics.

pub mod fonts;
pub mod projection;

pub use fonts::{FontError, FontSet, MeasuredFont, Tier};
pub use projection::WebMercator;
