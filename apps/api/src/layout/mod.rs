// Preview capture
// Positions every rendered block on a fixed-width canvas using static font metrics.
// Capture runs once, when a preview is first displayed; the PDF encoding that
// consumes the region runs inside tokio::task::spawn_blocking.

pub mod capture;
pub mod font_metrics;
pub mod wrap;

pub use capture::{capture_region, PaintItem, RenderedRegion};
