//! Spatial discretization of the samples and the void filling that densifies it.
//!
//! [`scan`] sizes the [`Extent`](crate::geometry::Extent), [`accumulate`] drops every sample
//! into the [`Grid`], and [`VoidFiller`] grows district labels into the empty cells around them.

pub mod grid;
pub use grid::{Cell, Grid, LabelId, Labels};

pub mod accumulate;
pub use accumulate::{accumulate, scan, AccumulateStats, GridAccumulator, ScanStats};

pub mod void_fill;
pub use void_fill::{fill_pass, DistanceControl, FillReport, PassStats, Termination, VoidFiller};

#[cfg(test)] mod tests;
