//! The two passes over the input: sizing the [`Extent`], then filling the [`Grid`].

use {
  super::grid::Grid,
  crate::{
    config::Config,
    error::{MapError, Result},
    geometry::Extent,
    input::RowResult,
    util::{self, Timed},
  },
};

/// Out-of-bounds placements reported individually before going quiet.
const OUT_OF_BOUNDS_WARNINGS: usize = 10;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
  /// rows with a usable coordinate
  pub rows: usize,
  /// rows that failed to parse
  pub rejected: usize,
  /// rows excluded by the postcode filter
  pub filtered: usize,
}

/// First pass: bounding box of every accepted sample and the ratios derived from it.
/// Fails with [`MapError::EmptyDataset`] when no row yields a coordinate.
pub fn scan(rows: impl IntoIterator<Item = RowResult>, config: &Config) -> Result<(Extent, ScanStats)> {
  let _t = Timed::info("scan extent");
  let mut stats = ScanStats::default();

  let extent = {
    let ScanStats { rows: count, rejected, filtered } = &mut stats;
    let points = rows.into_iter()
      .filter_map(|row| match row {
        Err(e) => {
          log::trace!("skipped row: {}", e);
          *rejected += 1;
          None
        }
        Ok(row) if !config.accepts(&row.postcode) => {
          *filtered += 1;
          None
        }
        Ok(row) => {
          *count += 1;
          Some(row.position())
        }
      });
    Extent::from_points(points, config.storage_size(), config.image_size())
  };
  let extent = extent.ok_or(MapError::EmptyDataset)?;

  log::info!("{:?}", stats);
  log::info!("extent:\n{}", extent);
  Ok((extent, stats))
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct AccumulateStats {
  /// rows placed in a cell
  pub processed: usize,
  /// distinct cells populated
  pub unique_cells: usize,
  /// rows whose cell fell outside the grid
  pub out_of_bounds: usize,
  /// rows that failed to parse, including a blank postcode
  pub rejected: usize,
  /// rows excluded by the postcode filter
  pub filtered: usize,
}

/// Second pass: drops every accepted sample into its storage cell.
pub struct GridAccumulator<'a> {
  grid: Grid,
  extent: &'a Extent,
  config: &'a Config,
  stats: AccumulateStats,
}

impl<'a> GridAccumulator<'a> {
  /// Allocates a grid sized by the configured storage size.
  pub fn new(extent: &'a Extent, config: &'a Config) -> Self {
    let grid = Grid::for_storage(config.storage_size());
    log::info!(
      "storage grid: {}x{} cells, {}",
      grid.width(), grid.height(), util::file_size(grid.memory_usage())
    );
    Self { grid, extent, config, stats: AccumulateStats::default() }
  }

  pub fn push(&mut self, row: RowResult) {
    let row = match row {
      Ok(row) => row,
      Err(e) => {
        log::trace!("skipped row: {}", e);
        self.stats.rejected += 1;
        return;
      }
    };
    if !self.config.accepts(&row.postcode) {
      self.stats.filtered += 1;
      return;
    }
    let district = match row.district() {
      Ok(district) => district,
      Err(e) => {
        log::trace!("skipped row {:?}: {}", row, e);
        self.stats.rejected += 1;
        return;
      }
    };
    let cell = match self.extent.to_storage(row.position()) {
      Some(cell) => cell,
      None => {
        self.stats.out_of_bounds += 1;
        if self.stats.out_of_bounds <= OUT_OF_BOUNDS_WARNINGS {
          log::warn!("sample outside the storage grid: {:?} at {:?}", row, row.position());
        }
        return;
      }
    };
    if self.grid.increment(cell.x as usize, cell.y as usize, district) {
      self.stats.unique_cells += 1;
    }
    self.stats.processed += 1;
  }

  pub fn stats(&self) -> AccumulateStats {
    self.stats
  }

  pub fn finish(self) -> (Grid, AccumulateStats) {
    log::info!("{:?}", self.stats);
    (self.grid, self.stats)
  }
}

impl<'a> Extend<RowResult> for GridAccumulator<'a> {
  fn extend<I: IntoIterator<Item = RowResult>>(&mut self, rows: I) {
    rows.into_iter().for_each(|row| self.push(row));
  }
}

/// Runs a [`GridAccumulator`] over `rows`.
pub fn accumulate(
  rows: impl IntoIterator<Item = RowResult>,
  extent: &Extent,
  config: &Config
) -> (Grid, AccumulateStats) {
  let _t = Timed::info("accumulate");
  let mut accumulator = GridAccumulator::new(extent, config);
  accumulator.extend(rows);
  accumulator.finish()
}
