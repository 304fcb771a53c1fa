//! Heuristic propagation of district labels into empty cells.
//!
//! A pass looks back from every labelled interior cell along -x and -y, up to a search
//! distance, and claims the run of empty cells it crosses:
//! - whole run, if the scan ends on a cell of the same district;
//! - the half nearest the source, if it ends on a different district;
//! - nothing, if it reaches the search distance or the border first.
//!
//! Border cells neither spread nor are reached by a scan. An axis one cell long has no border,
//! so a single row or column fills along its length.
//!
//! Passes are driven by [`DistanceControl`], which widens the search while passes come back
//! nearly empty and falls back to a cheap distance while they are productive.
//! This approximates a nearest-district assignment; the result depends on sweep order and
//! on the thresholds below.

use {
  super::grid::{Cell, Grid, LabelId},
  crate::{config::Config, util::Timed},
  std::ops::Range,
};

/// Passes filling more cells than this fall back to a short search distance.
const SHRINK_ABOVE: usize = 50;
/// Passes filling at most this many cells (but some) widen the search distance.
const WIDEN_UP_TO: usize = 20;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Axis { X, Y }

impl Axis {
  fn along(self, (x, y): (usize, usize)) -> usize {
    match self {
      Axis::X => x,
      Axis::Y => y,
    }
  }

  fn at(self, (x, y): (usize, usize), pos: usize) -> (usize, usize) {
    match self {
      Axis::X => (pos, y),
      Axis::Y => (x, pos),
    }
  }
}

fn interior(pos: usize, len: usize) -> bool {
  len == 1 || (pos > 0 && pos + 1 < len)
}

/// Positions along `axis` that the cell at `source` claims, if any.
/// The scan stops short of index 0.
fn fill_span(
  grid: &Grid,
  source: (usize, usize),
  axis: Axis,
  distance: usize,
  label: LabelId
) -> Option<Range<usize>> {
  let pos = axis.along(source);
  let mut has_gap = false;

  for step in 1..=distance.min(pos.saturating_sub(1)) {
    let probe = pos - step;
    let (x, y) = axis.at(source, probe);
    match grid.get(x, y).label {
      None => has_gap = true,
      Some(found) if found == label => return has_gap.then(|| probe + 1..pos),
      // midpoint, rounded toward the source
      Some(_) => return has_gap.then(|| pos - (pos - probe) / 2..pos),
    }
  }
  None
}

/// Sweep the whole grid once at a fixed search distance. Returns the number of cells filled.
///
/// Interior cells are visited `x` outer, `y` inner. Fills land immediately, so they are
/// visible to the scans of cells visited later in the same pass. Labelled cells are never
/// rewritten.
pub fn fill_pass(grid: &mut Grid, distance: usize) -> usize {
  let (width, height) = (grid.width(), grid.height());
  let mut infills = 0;

  for x in (0..width).filter(|&x| interior(x, width)) {
    for y in (0..height).filter(|&y| interior(y, height)) {
      let label = match grid.get(x, y).label {
        Some(label) => label,
        None => continue,
      };
      for axis in [Axis::X, Axis::Y] {
        let span = match fill_span(grid, (x, y), axis, distance, label) {
          Some(span) => span,
          None => continue,
        };
        for pos in span {
          let (fx, fy) = axis.at((x, y), pos);
          let cell = grid.get_mut(fx, fy);
          debug_assert!(cell.is_empty());
          *cell = Cell { label: Some(label), count: 1 };
          infills += 1;
        }
      }
    }
  }
  infills
}

/// Adaptive search distance.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DistanceControl {
  distance: usize,
  max_distance: usize,
  start: usize,
  max_growth: usize,
  reduce_threshold: usize,
}

impl DistanceControl {
  pub fn new(start: usize, max_growth: usize, reduce_threshold: usize) -> Self {
    Self { distance: start, max_distance: start, start, max_growth, reduce_threshold }
  }

  pub fn from_config(config: &Config) -> Self {
    Self::new(config.start_distance(), config.max_growth(), config.reduce_threshold())
  }

  /// Distance of the next pass.
  pub fn distance(&self) -> usize { self.distance }

  /// Widest distance used so far.
  pub fn max_distance(&self) -> usize { self.max_distance }

  /// Adjust the distance after a pass that filled `infills` cells.
  /// Returns `false` once the passes are exhausted.
  pub fn update(&mut self, infills: usize) -> bool {
    let max_growth = self.max_growth;
    let below_max = |k: usize| k < max_growth;

    if infills == 0 {
      if below_max(self.distance) {
        self.distance += 1;
      }
      if !below_max(self.distance) {
        return false;
      }
    } else if infills > SHRINK_ABOVE && below_max(self.distance) {
      self.distance = if self.max_distance > self.reduce_threshold + 3 {
        self.max_distance - self.reduce_threshold
      } else {
        self.start
      };
    } else if infills <= WIDEN_UP_TO && below_max(self.distance) {
      self.distance += 1;
    }
    self.max_distance = self.max_distance.max(self.distance);
    true
  }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Termination {
  /// A pass at the widest distance filled nothing.
  Converged,
  /// The configured pass cap was hit first.
  PassCapReached,
}

/// Outcome of a single pass, handed to [`VoidFiller::run_with`] observers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PassStats {
  pub pass: usize,
  pub distance: usize,
  pub max_distance: usize,
  pub infills: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FillReport {
  pub passes: usize,
  pub infills: usize,
  pub final_distance: usize,
  pub max_distance: usize,
  pub termination: Termination,
}

/// Runs [`fill_pass`] under [`DistanceControl`] until it converges or the pass cap is hit.
pub struct VoidFiller<'a> {
  config: &'a Config,
}

impl<'a> VoidFiller<'a> {
  pub fn new(config: &'a Config) -> Self {
    Self { config }
  }

  pub fn run(&self, grid: &mut Grid) -> FillReport {
    self.run_with(grid, |_, _| {})
  }

  /// Like [`run`](Self::run), calling `on_pass` with the grid after every pass.
  pub fn run_with(&self, grid: &mut Grid, mut on_pass: impl FnMut(&Grid, PassStats)) -> FillReport {
    let _t = Timed::info("void fill");
    let mut control = DistanceControl::from_config(self.config);
    let mut passes = 0;
    let mut total = 0;

    let termination = loop {
      if passes == self.config.max_passes() {
        log::warn!(
          "void fill stopped after {} passes at distance {} without converging",
          passes, control.distance()
        );
        break Termination::PassCapReached;
      }
      let distance = control.distance();
      let infills = fill_pass(grid, distance);
      passes += 1;
      total += infills;
      if infills > 0 {
        log::debug!(
          "k: {}/{}:{} infilled cells: {}",
          distance, control.max_distance(), self.config.max_growth(), infills
        );
      }
      on_pass(grid, PassStats { pass: passes, distance, max_distance: control.max_distance(), infills });
      if !control.update(infills) {
        break Termination::Converged;
      }
    };

    let report = FillReport {
      passes,
      infills: total,
      final_distance: control.distance(),
      max_distance: control.max_distance(),
      termination,
    };
    log::info!("void fill: {:?}", report);
    report
  }
}
