use {
  super::*,
  crate::{
    config::Config,
    error::{MapError, Result, RowParseError},
    input::{RawRow, RowResult},
  },
};

fn row_grid(cells: &[(usize, &str)], width: usize) -> Grid {
  let mut grid = Grid::new(width, 1);
  cells.iter().for_each(|&(x, label)| { grid.increment(x, 0, label); });
  grid
}

fn labels_of_row(grid: &Grid) -> Vec<Option<&str>> {
  (0..grid.width()).map(|x| grid.label(x, 0)).collect()
}

#[test] fn half_fill_toward_foreign_label() {
  let mut grid = row_grid(&[(2, "A"), (7, "B")], 10);
  assert_eq!(fill_pass(&mut grid, 5), 2);
  assert_eq!(
    labels_of_row(&grid),
    [None, None, Some("A"), None, None, Some("B"), Some("B"), Some("B"), None, None]
  );
  assert_eq!(grid.get(5, 0).count, 1);
  assert_eq!(grid.get(6, 0).count, 1);
}

#[test] fn half_fill_along_y() {
  let mut grid = Grid::new(1, 10);
  grid.increment(0, 2, "A");
  grid.increment(0, 7, "B");
  assert_eq!(fill_pass(&mut grid, 5), 2);
  assert_eq!(grid.label(0, 4), None);
  assert_eq!(grid.label(0, 5), Some("B"));
  assert_eq!(grid.label(0, 6), Some("B"));
}

#[test] fn full_fill_between_same_label() {
  let mut grid = row_grid(&[(2, "A"), (6, "A")], 10);
  grid.increment(2, 0, "A");
  // out of reach
  assert_eq!(fill_pass(&mut grid, 3), 0);
  assert_eq!(fill_pass(&mut grid, 4), 3);
  assert_eq!(
    labels_of_row(&grid)[2..=6],
    [Some("A"); 5]
  );
  // matched cell keeps its samples
  assert_eq!(grid.get(2, 0).count, 2);
}

#[test] fn no_fill_without_gap() {
  let mut grid = row_grid(&[(3, "A"), (4, "B"), (5, "B")], 10);
  assert_eq!(fill_pass(&mut grid, 8), 0);
}

#[test] fn first_obstruction_wins() {
  let mut grid = row_grid(&[(1, "A"), (4, "B"), (8, "A")], 10);
  assert_eq!(fill_pass(&mut grid, 5), 3);
  assert_eq!(
    labels_of_row(&grid),
    [None, Some("A"), None, Some("B"), Some("B"), None, Some("A"), Some("A"), Some("A"), None]
  );
}

#[test] fn lone_cell_never_spreads() {
  let mut grid = Grid::new(16, 16);
  grid.increment(7, 9, "RG1");
  for distance in 1..=20 {
    assert_eq!(fill_pass(&mut grid, distance), 0);
  }
  assert_eq!(grid.occupied(), 1);
}

#[test] fn scan_stops_short_of_the_border() {
  let mut grid = row_grid(&[(0, "A"), (3, "A")], 10);
  assert_eq!(fill_pass(&mut grid, 5), 0);
  let mut grid = row_grid(&[(1, "A"), (4, "A")], 10);
  assert_eq!(fill_pass(&mut grid, 5), 2);
  // the last cell of the row does not spread either
  let mut grid = row_grid(&[(5, "A"), (9, "A")], 10);
  assert_eq!(fill_pass(&mut grid, 8), 0);
}

#[test] fn border_columns_do_not_spread() {
  let column = |x| {
    let mut grid = Grid::new(10, 10);
    grid.increment(x, 1, "A");
    grid.increment(x, 5, "A");
    fill_pass(&mut grid, 6)
  };
  assert_eq!(column(0), 0);
  assert_eq!(column(9), 0);
  assert_eq!(column(1), 3);
  assert_eq!(column(8), 3);
}

#[test] fn distance_control() {
  let mut control = DistanceControl::new(3, 20, 5);
  assert!(control.update(0));
  assert_eq!(control.distance(), 4);
  assert!(control.update(10));
  assert_eq!(control.distance(), 5);
  assert!(control.update(30));
  assert_eq!(control.distance(), 5);
  // max distance 5 is not above reduce_threshold + 3
  assert!(control.update(60));
  assert_eq!(control.distance(), 3);
  assert_eq!(control.max_distance(), 5);

  (0..4).for_each(|_| { control.update(0); });
  assert_eq!(control.distance(), 7);
  assert!(control.update(1));
  assert!(control.update(1));
  assert_eq!(control.max_distance(), 9);
  assert!(control.update(51));
  assert_eq!(control.distance(), 4);
}

#[test] fn distance_control_terminates_at_max_growth() {
  let mut control = DistanceControl::new(3, 5, 5);
  assert!(control.update(0));
  assert!(!control.update(0));
  assert_eq!(control.distance(), 5);

  // productive passes at the maximum keep going without widening
  let mut control = DistanceControl::new(5, 5, 5);
  assert!(control.update(100));
  assert!(control.update(3));
  assert_eq!(control.distance(), 5);
  assert!(!control.update(0));
}

#[test] fn run_until_converged() -> Result<()> {
  let config = Config::builder().max_growth(6).build()?;
  let mut grid = row_grid(&[(2, "A"), (7, "B")], 10);
  let mut yields = vec![];
  let report = VoidFiller::new(&config)
    .run_with(&mut grid, |_, pass| yields.push((pass.distance, pass.infills)));

  assert_eq!(yields, [(3, 0), (4, 0), (5, 2), (6, 1), (6, 1), (6, 0)]);
  assert_eq!(report, FillReport {
    passes: 6,
    infills: 4,
    final_distance: 6,
    max_distance: 6,
    termination: Termination::Converged,
  });
  // the foreign label creeps up to its neighbour
  assert_eq!(grid.label(2, 0), Some("A"));
  assert!((3..=7).all(|x| grid.label(x, 0) == Some("B")));
  Ok(())
}

#[test] fn pass_cap() -> Result<()> {
  let config = Config::builder().max_growth(6).max_passes(2).build()?;
  let mut grid = row_grid(&[(2, "A"), (7, "B")], 10);
  let report = VoidFiller::new(&config).run(&mut grid);
  assert_eq!(report.passes, 2);
  assert_eq!(report.termination, Termination::PassCapReached);
  Ok(())
}

#[cfg(feature = "drawing")]
fn random_grid(seed: u64, size: usize, samples: usize) -> Grid {
  use rand::prelude::*;

  let mut rng = rand_pcg::Pcg64::seed_from_u64(seed);
  let districts = ["RG1", "RG2", "RG30", "SL4", "OX10"];
  let mut grid = Grid::new(size, size);
  for _ in 0..samples {
    let district = districts.choose(&mut rng).unwrap();
    grid.increment(rng.gen_range(0..size), rng.gen_range(0..size), district);
  }
  grid
}

#[cfg(feature = "drawing")]
#[test] fn occupied_cells_only_grow() -> Result<()> {
  let config = Config::builder().max_growth(12).build()?;
  let mut grid = random_grid(0, 64, 150);
  let original = grid.clone();
  let mut occupied = vec![grid.occupied()];

  VoidFiller::new(&config).run_with(&mut grid, |grid, _| occupied.push(grid.occupied()));

  assert!(occupied.windows(2).all(|w| w[0] <= w[1]));
  assert!(occupied.last() > occupied.first());
  // sampled cells are read but never rewritten
  original.cells()
    .filter(|(_, cell)| !cell.is_empty())
    .for_each(|(p, cell)| {
      assert_eq!(grid.get(p.x, p.y).count, cell.count);
      assert_eq!(grid.label(p.x, p.y), original.label(p.x, p.y));
    });
  Ok(())
}

#[cfg(feature = "drawing")]
#[test] fn fixed_point() {
  let mut grid = random_grid(7, 48, 80);
  let distance = 6;
  while fill_pass(&mut grid, distance) > 0 {}
  let settled = grid.clone();
  assert_eq!(fill_pass(&mut grid, distance), 0);
  assert!(grid == settled);
}

fn sample(longitude: f64, latitude: f64, postcode: &str) -> RowResult {
  Ok(RawRow::new(longitude, latitude, postcode))
}

#[test] fn scan_empty_dataset() {
  let rows = vec![Err(RowParseError::MissingField { column: 10 })];
  let err = scan(rows, &Config::default()).unwrap_err();
  assert!(matches!(err.downcast_ref::<MapError>(), Some(MapError::EmptyDataset)));
  assert!(scan(Vec::<RowResult>::new(), &Config::default()).is_err());
}

#[test] fn scan_bounds() -> Result<()> {
  let rows = vec![
    sample(-1.0, 51.0, "RG1 1AA"),
    Err(RowParseError::InvalidCoordinate { column: 9, value: "x".into() }),
    sample(0.5, 52.5, "RG2 7AA"),
  ];
  let (extent, stats) = scan(rows, &Config::default())?;
  assert_eq!(stats, ScanStats { rows: 2, rejected: 1, filtered: 0 });
  let bounds = extent.bounds();
  assert!((bounds.min.x - 1_790_000.0).abs() < 1e-6);
  assert!((bounds.max.y - 525_000.0).abs() < 1e-6);
  Ok(())
}

#[test] fn accumulate_counts() -> Result<()> {
  let config = Config::builder()
    .storage_size(10, 10)
    .image_size(5, 5)
    .postcode_filter("^RG")
    .build()?;
  let rows = || vec![
    sample(-1.0, 51.0, "RG1 1AA"),
    sample(-1.0, 51.0, "RG2 2BB"),
    sample(0.0, 52.0, "RG4 8ZZ"),
    sample(-0.5, 51.5, "SL4 1NJ"),
    sample(-0.5, 51.5, "RG"),
    sample(-0.5, 51.5, ""),
    Err(RowParseError::MissingField { column: 1 }),
  ];
  let (extent, scanned) = scan(rows(), &config)?;
  assert_eq!(scanned, ScanStats { rows: 4, rejected: 1, filtered: 2 });

  let (grid, stats) = accumulate(rows(), &extent, &config);
  assert_eq!(stats, AccumulateStats {
    processed: 4,
    unique_cells: 3,
    out_of_bounds: 0,
    rejected: 1,
    filtered: 2,
  });
  assert_eq!(grid.width(), 11);
  assert_eq!(grid.height(), 11);
  // first district written to a cell sticks
  assert_eq!(grid.label(0, 0), Some("RG1"));
  assert_eq!(grid.get(0, 0).count, 2);
  // the upper bound lands on the boundary cell
  assert_eq!(grid.label(10, 10), Some("RG4"));
  assert_eq!(grid.labels().len(), 3);
  Ok(())
}

#[test] fn out_of_bounds_rows_are_skipped() -> Result<()> {
  let config = Config::builder().storage_size(10, 10).image_size(5, 5).build()?;
  let (extent, _) = scan(vec![sample(-1.0, 51.0, "RG1 1AA"), sample(0.0, 52.0, "RG4 8ZZ")], &config)?;
  let mut accumulator = GridAccumulator::new(&extent, &config);
  accumulator.extend(vec![sample(-2.0, 51.5, "OX1 1AA"), sample(-0.5, 51.5, "RG1 6SP")]);
  let (grid, stats) = accumulator.finish();
  assert_eq!(stats.out_of_bounds, 1);
  assert_eq!(stats.processed, 1);
  assert_eq!(grid.occupied(), 1);
  Ok(())
}
