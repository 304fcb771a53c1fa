//! Postal district maps from sparse geocoded samples.
//!
//! Every sample (longitude, latitude, postcode) falls into a cell of a dense storage grid,
//! cells take the district of the first sample they receive, and empty cells near a district
//! are heuristically absorbed into it before the grid is downsampled to a picture with one
//! random colour per district.
//!
//! The stages are, in order:
//! - [`solver::scan`]: first pass over the rows, sizing the [`geometry::Extent`];
//! - [`solver::accumulate`]: second pass, placing every row in the [`solver::Grid`];
//! - [`solver::VoidFiller`]: repeated sweeps growing districts into empty cells;
//! - [`drawing::rasterize`]: colouring via [`drawing::Palette`] (requires `drawing` feature).
//!
//! # Basic usage
//! ```no_run
//! # use postcode_map::{
//! #   config::Config,
//! #   drawing::{self, Palette},
//! #   error::Result,
//! #   input::TsvReader,
//! #   solver::{self, VoidFiller},
//! # };
//! # fn main() -> Result<()> {
//! let config = Config::builder()
//!   .postcode_filter("^RG")
//!   .color_seed(0)
//!   .build()?;
//! let rows = || TsvReader::open("GB_full.csv", config.columns());
//!
//! let (extent, _) = itertools::process_results(rows()?, |rows| solver::scan(rows, &config))??;
//! let (mut grid, _) = itertools::process_results(rows()?, |rows| solver::accumulate(rows, &extent, &config))?;
//! VoidFiller::new(&config).run(&mut grid);
//!
//! let mut palette = Palette::from_seed_option(config.color_seed());
//! drawing::render(&grid, &extent, &mut palette).save("map.png")?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod solver;
#[cfg(feature = "drawing")]
pub mod drawing;
pub mod util;
