//! Run configuration, built once and shared by reference with every stage.

use {
  crate::{
    error::{MapError, Result},
    geometry::{ImageSpace, StorageSpace},
    solver::Cell,
  },
  euclid::Size2D,
  regex::Regex,
  std::mem::size_of,
};

/// Bytes taken by a `(width + 1) × (height + 1)` buffer of `T`, if addressable.
fn buffer_size<T>((width, height): (u32, u32)) -> Option<usize> {
  (width as usize).checked_add(1)?
    .checked_mul((height as usize).checked_add(1)?)?
    .checked_mul(size_of::<T>())
    .filter(|&bytes| bytes <= isize::MAX as usize)
}

/// Positions of the consumed fields within a tab-delimited row.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Columns {
  pub postcode: usize,
  pub latitude: usize,
  pub longitude: usize,
}

impl Default for Columns {
  /// geonames `GB_full.txt` layout
  fn default() -> Self {
    Self { postcode: 1, latitude: 9, longitude: 10 }
  }
}

#[derive(Debug, Clone)]
pub struct Config {
  storage: Size2D<u32, StorageSpace>,
  image: Size2D<u32, ImageSpace>,
  max_growth: usize,
  reduce_threshold: usize,
  start_distance: usize,
  max_passes: usize,
  columns: Columns,
  postcode_filter: Option<Regex>,
  color_seed: Option<u64>,
}

impl Config {
  pub fn builder() -> ConfigBuilder {
    ConfigBuilder::default()
  }

  /// Storage grid size; the grid holds `(width + 1) × (height + 1)` cells.
  pub fn storage_size(&self) -> Size2D<u32, StorageSpace> { self.storage }
  /// Output picture size; the buffer holds `(width + 1) × (height + 1)` pixels.
  pub fn image_size(&self) -> Size2D<u32, ImageSpace> { self.image }
  /// Widest search distance the void filler will try.
  pub fn max_growth(&self) -> usize { self.max_growth }
  pub fn reduce_threshold(&self) -> usize { self.reduce_threshold }
  pub fn start_distance(&self) -> usize { self.start_distance }
  /// Upper bound on the total number of void-fill passes.
  pub fn max_passes(&self) -> usize { self.max_passes }
  pub fn columns(&self) -> Columns { self.columns }
  pub fn postcode_filter(&self) -> Option<&Regex> { self.postcode_filter.as_ref() }
  pub fn color_seed(&self) -> Option<u64> { self.color_seed }

  /// Whether a postcode passes the configured filter.
  pub fn accepts(&self, postcode: &str) -> bool {
    self.postcode_filter
      .as_ref()
      .map_or(true, |filter| filter.is_match(postcode))
  }
}

impl Default for Config {
  fn default() -> Self {
    ConfigBuilder::default().into_config()
  }
}

#[derive(Debug, Clone)]
pub struct ConfigBuilder {
  storage: (u32, u32),
  image: (u32, u32),
  max_growth: usize,
  reduce_threshold: usize,
  start_distance: usize,
  max_passes: usize,
  columns: Columns,
  postcode_filter: Option<String>,
  color_seed: Option<u64>,
}

impl Default for ConfigBuilder {
  fn default() -> Self {
    Self {
      storage: (1000, 2000),
      image: (600, 1000),
      max_growth: 20,
      reduce_threshold: 5,
      start_distance: 3,
      max_passes: 10_000,
      columns: Columns::default(),
      postcode_filter: None,
      color_seed: None,
    }
  }
}

impl ConfigBuilder {
  pub fn storage_size(mut self, width: u32, height: u32) -> Self {
    self.storage = (width, height);
    self
  }

  pub fn image_size(mut self, width: u32, height: u32) -> Self {
    self.image = (width, height);
    self
  }

  pub fn max_growth(mut self, max_growth: usize) -> Self {
    self.max_growth = max_growth;
    self
  }

  pub fn reduce_threshold(mut self, reduce_threshold: usize) -> Self {
    self.reduce_threshold = reduce_threshold;
    self
  }

  pub fn start_distance(mut self, start_distance: usize) -> Self {
    self.start_distance = start_distance;
    self
  }

  pub fn max_passes(mut self, max_passes: usize) -> Self {
    self.max_passes = max_passes;
    self
  }

  pub fn columns(mut self, columns: Columns) -> Self {
    self.columns = columns;
    self
  }

  /// Regular expression matched against the whole postcode field.
  pub fn postcode_filter(mut self, pattern: impl Into<String>) -> Self {
    self.postcode_filter = Some(pattern.into());
    self
  }

  pub fn color_seed(mut self, seed: u64) -> Self {
    self.color_seed = Some(seed);
    self
  }

  pub fn build(self) -> Result<Config> {
    let invalid = |msg: &str| -> Result<Config> { Err(MapError::InvalidConfig(msg.into()).into()) };

    let sizes = [self.storage.0, self.storage.1, self.image.0, self.image.1];
    if sizes.iter().any(|&side| side == 0) {
      return invalid("storage and image sizes must be positive");
    }
    if buffer_size::<Cell>(self.storage).is_none() {
      return invalid("storage grid is too large to allocate");
    }
    if buffer_size::<[u8; 3]>(self.image).is_none() {
      return invalid("image is too large to allocate");
    }
    if self.start_distance == 0 {
      return invalid("start distance must be at least 1");
    }
    if self.max_passes == 0 {
      return invalid("pass cap must be at least 1");
    }
    let Columns { postcode, latitude, longitude } = self.columns;
    if postcode == latitude || postcode == longitude || latitude == longitude {
      return invalid("postcode, latitude and longitude columns must differ");
    }
    let filter = self.postcode_filter.as_deref()
      .map(Regex::new)
      .transpose()
      .map_err(|e| MapError::InvalidConfig(format!("postcode filter: {}", e)))?;

    let mut config = self.into_config();
    config.postcode_filter = filter;
    Ok(config)
  }

  fn into_config(self) -> Config {
    Config {
      storage: self.storage.into(),
      image: self.image.into(),
      max_growth: self.max_growth,
      reduce_threshold: self.reduce_threshold,
      start_distance: self.start_distance,
      max_passes: self.max_passes,
      columns: self.columns,
      postcode_filter: None,
      color_seed: self.color_seed,
    }
  }
}
