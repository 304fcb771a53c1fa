//! .
//!
//! Three coordinate bases are in play. Samples arrive as longitude/latitude and are moved
//! into [`SourceSpace`], a positive planar system (easting/northing). The [`Extent`] of all
//! samples then fixes how source coordinates land on the storage lattice ([`StorageSpace`])
//! and how that lattice is downsampled onto the output picture ([`ImageSpace`]).
//! Northing grows upward in source and storage space; image rows grow downward.

use {
  std::fmt,
  euclid::{Point2D, Box2D, Size2D, Vector2D as V2},
};

/// Easting/northing basis
#[derive(Debug, Copy, Clone)]
pub struct SourceSpace;
/// Storage lattice basis, one unit per cell
#[derive(Debug, Copy, Clone)]
pub struct StorageSpace;
/// Output picture basis, one unit per pixel
#[derive(Debug, Copy, Clone)]
pub struct ImageSpace;

/// Source units per degree.
pub const DEGREE_SCALE: f64 = 10_000.0;

/// Range assumed for an axis on which every sample shares one coordinate; they all land in cell 0.
const MIN_RANGE: f64 = 1.0;

/// `easting = (longitude + 180) * 10000`, `northing = latitude * 10000`
pub fn to_source_space(longitude: f64, latitude: f64) -> Point2D<f64, SourceSpace> {
  Point2D::new(
    (longitude + 180.0) * DEGREE_SCALE,
    latitude * DEGREE_SCALE
  )
}

/// Bounding box of every sample, together with the per-axis ratios derived from it.
/// Computed once; every later coordinate-to-index conversion goes through it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Extent {
  bounds: Box2D<f64, SourceSpace>,
  storage: Size2D<u32, StorageSpace>,
  image: Size2D<u32, ImageSpace>,
  /// source units per storage cell
  storage_ratio: V2<f64, SourceSpace>,
  /// source units per image pixel
  image_ratio: V2<f64, SourceSpace>,
  /// storage cells per image pixel
  storage_to_image: V2<f64, StorageSpace>,
}

impl Extent {
  pub fn new(
    bounds: Box2D<f64, SourceSpace>,
    storage: Size2D<u32, StorageSpace>,
    image: Size2D<u32, ImageSpace>
  ) -> Self {
    let size = bounds.size();
    let nonzero = |r: f64| if r > 0.0 { r } else { MIN_RANGE };
    let range = V2::new(nonzero(size.width), nonzero(size.height));
    let storage_ratio = range.component_div(storage.to_f64().to_vector().cast_unit());
    let image_ratio = range.component_div(image.to_f64().to_vector().cast_unit());
    let storage_to_image = image_ratio.component_div(storage_ratio).cast_unit();
    Self { bounds, storage, image, storage_ratio, image_ratio, storage_to_image }
  }

  /// Tightest box around `points`; `None` when there are none.
  pub fn from_points(
    points: impl IntoIterator<Item = Point2D<f64, SourceSpace>>,
    storage: Size2D<u32, StorageSpace>,
    image: Size2D<u32, ImageSpace>
  ) -> Option<Self> {
    let mut points = points.into_iter();
    let first = points.next()?;
    let bounds = points.fold(Box2D::new(first, first), |b, p| Box2D::new(b.min.min(p), b.max.max(p)));
    Some(Self::new(bounds, storage, image))
  }

  pub fn bounds(&self) -> Box2D<f64, SourceSpace> { self.bounds }
  pub fn range(&self) -> V2<f64, SourceSpace> { self.bounds.size().to_vector() }
  pub fn storage_size(&self) -> Size2D<u32, StorageSpace> { self.storage }
  pub fn image_size(&self) -> Size2D<u32, ImageSpace> { self.image }
  pub fn storage_ratio(&self) -> V2<f64, SourceSpace> { self.storage_ratio }
  pub fn image_ratio(&self) -> V2<f64, SourceSpace> { self.image_ratio }
  pub fn storage_to_image_ratio(&self) -> V2<f64, StorageSpace> { self.storage_to_image }

  /// Storage cell holding `point`, or `None` when it falls outside
  /// `[0, storage.width] × [0, storage.height]`.
  /// A coordinate equal to the upper bound always lands in the last cell of its axis.
  pub fn to_storage(&self, point: Point2D<f64, SourceSpace>) -> Option<Point2D<u32, StorageSpace>> {
    let index = |v: f64, min: f64, max: f64, ratio: f64, cells: u32| {
      let cell = if v == max && max > min { cells as f64 } else { ((v - min) / ratio).floor() };
      (cell >= 0.0 && cell <= cells as f64).then(|| cell as u32)
    };
    let (min, max) = (self.bounds.min, self.bounds.max);
    Some(Point2D::new(
      index(point.x, min.x, max.x, self.storage_ratio.x, self.storage.width)?,
      index(point.y, min.y, max.y, self.storage_ratio.y, self.storage.height)?
    ))
  }

  /// Pixel a storage cell is drawn on. The y axis is flipped, and both coordinates are
  /// clamped into `[0, image.width] × [0, image.height]`.
  pub fn to_image(&self, cell: Point2D<u32, StorageSpace>) -> Point2D<u32, ImageSpace> {
    let scaled = cell.to_f64().to_vector()
      .component_div(self.storage_to_image)
      .floor();
    let x = (scaled.x.max(0.0) as u32).min(self.image.width);
    let y = (scaled.y.max(0.0) as u32).min(self.image.height);
    Point2D::new(x, self.image.height - y)
  }
}

impl fmt::Display for Extent {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let range = self.range();
    writeln!(f, "easting range:    {:.1}", range.x)?;
    writeln!(f, "northing range:   {:.1}", range.y)?;
    writeln!(f, "easting offset:   {:.1}", self.bounds.min.x)?;
    writeln!(f, "northing offset:  {:.1}", self.bounds.min.y)?;
    writeln!(f, "storage ratio:    {:.4} x {:.4}", self.storage_ratio.x, self.storage_ratio.y)?;
    writeln!(f, "image ratio:      {:.4} x {:.4}", self.image_ratio.x, self.image_ratio.y)?;
    write!(f, "storage to image: {:.4} x {:.4}", self.storage_to_image.x, self.storage_to_image.y)
  }
}
