//! Chart builders
//!
//! Everything here is a pure function of the loaded table and the caller's
//! selections; the output is a [`Figure`] the page hands to Chart.js.

pub mod distribution;
pub mod figure;
pub mod mirrored;
pub mod palette;
pub mod panel;

pub use distribution::{Section, build_sections};
pub use figure::{ChartBody, Dataset, Figure, FigureData, FigureType, Point};
pub use mirrored::{MirroredBar, MirroredDistribution};
pub use palette::ColorMap;
pub use panel::{ChartKind, Control, PanelEvent, PanelState, render};
