use {
  anyhow::{Context, Result},
  clap::Parser,
  itertools::process_results,
  postcode_map::{
    config::{Columns, Config},
    drawing::{self, Palette},
    input::TsvReader,
    solver::{self, VoidFiller},
  },
  std::path::PathBuf,
};

/// Render a postal district map from a tab-delimited file of geocoded postcodes
/// (geonames `GB_full.txt` layout by default).
#[derive(Parser, Debug)]
#[command(name = "postcode-map", version)]
struct Args {
  /// Tab-delimited input file
  input: PathBuf,

  /// Output PNG path
  #[arg(short, long, default_value = "map.png")]
  output: PathBuf,

  /// Storage grid width and height
  #[arg(long, num_args = 2, value_names = ["W", "H"], default_values_t = [1000, 2000])]
  storage: Vec<u32>,

  /// Image width and height
  #[arg(long, num_args = 2, value_names = ["W", "H"], default_values_t = [600, 1000])]
  image: Vec<u32>,

  /// Widest void-fill search distance
  #[arg(long, default_value_t = 20)]
  max_growth: usize,

  /// Distance dropped from the widest distance so far after a productive pass
  #[arg(long, default_value_t = 5)]
  reduce_threshold: usize,

  /// Initial void-fill search distance
  #[arg(long, default_value_t = 3)]
  start_distance: usize,

  /// Upper bound on void-fill passes
  #[arg(long, default_value_t = 10_000)]
  max_passes: usize,

  /// Skip void filling, drawing only the sampled cells
  #[arg(long)]
  no_fill: bool,

  /// Only keep postcodes matching this regular expression, e.g. "^RG"
  #[arg(long)]
  filter: Option<String>,

  /// Colour seed; colours differ between runs when omitted
  #[arg(long)]
  seed: Option<u64>,

  /// Column of the postcode field
  #[arg(long, default_value_t = 1)]
  postcode_column: usize,

  /// Column of the latitude field
  #[arg(long, default_value_t = 9)]
  latitude_column: usize,

  /// Column of the longitude field
  #[arg(long, default_value_t = 10)]
  longitude_column: usize,

  /// Open the picture once saved
  #[arg(long)]
  open: bool,
}

impl Args {
  fn config(&self) -> Result<Config> {
    let mut builder = Config::builder()
      .storage_size(self.storage[0], self.storage[1])
      .image_size(self.image[0], self.image[1])
      .max_growth(self.max_growth)
      .reduce_threshold(self.reduce_threshold)
      .start_distance(self.start_distance)
      .max_passes(self.max_passes)
      .columns(Columns {
        postcode: self.postcode_column,
        latitude: self.latitude_column,
        longitude: self.longitude_column,
      });
    if let Some(filter) = &self.filter {
      builder = builder.postcode_filter(filter.as_str());
    }
    if let Some(seed) = self.seed {
      builder = builder.color_seed(seed);
    }
    builder.build()
  }
}

fn main() -> Result<()> {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
  let args = Args::parse();
  let config = args.config()?;

  let rows = || TsvReader::open(&args.input, config.columns())
    .with_context(|| format!("unable to open {}", args.input.display()));

  let (extent, _) = process_results(rows()?, |rows| solver::scan(rows, &config))
    .context("reading input")??;
  let (mut grid, _) = process_results(rows()?, |rows| solver::accumulate(rows, &extent, &config))
    .context("reading input")?;

  if !args.no_fill {
    VoidFiller::new(&config).run(&mut grid);
  }

  let mut palette = Palette::from_seed_option(config.color_seed());
  drawing::render(&grid, &extent, &mut palette)
    .save(&args.output)
    .with_context(|| format!("unable to save {}", args.output.display()))?;
  log::info!("saved {}", args.output.display());

  if args.open {
    open::that(&args.output)?;
  }
  Ok(())
}
