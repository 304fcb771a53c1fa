//! Downsampling of the filled storage grid onto a picture.

use {
  crate::{
    geometry::{Extent, ImageSpace},
    solver::Grid,
    util::Timed,
  },
  euclid::{Point2D, Size2D},
  image::{Rgb, RgbImage},
  rand::Rng,
};

mod palette;
pub use palette::Palette;

pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Write-only pixel sink the rasterizer draws on.
pub trait Canvas {
  fn dimensions(&self) -> Size2D<u32, ImageSpace>;
  fn put_pixel(&mut self, pixel: Point2D<u32, ImageSpace>, color: Rgb<u8>);
}

impl Canvas for RgbImage {
  fn dimensions(&self) -> Size2D<u32, ImageSpace> {
    RgbImage::dimensions(self).into()
  }

  fn put_pixel(&mut self, pixel: Point2D<u32, ImageSpace>, color: Rgb<u8>) {
    RgbImage::put_pixel(self, pixel.x, pixel.y, color)
  }
}

/// Buffer of `(image.width + 1) × (image.height + 1)` pixels, fitting every pixel
/// [`Extent::to_image`] can return.
pub fn new_image(extent: &Extent) -> RgbImage {
  let size = extent.image_size();
  RgbImage::new(size.width + 1, size.height + 1)
}

/// Draw every storage cell onto `canvas`: labelled cells in their district colour, empty
/// ones in [`BACKGROUND`]. Cells are visited `x` outer, `y` inner, and when several cells
/// share a pixel the last one wins.
pub fn rasterize<C, R>(grid: &Grid, extent: &Extent, palette: &mut Palette<R>, canvas: &mut C)
  where C: Canvas,
        R: Rng {
  let _t = Timed::info("rasterize");
  let bounds = canvas.dimensions();

  grid.cells().for_each(|(cell_xy, cell)| {
    let pixel = extent.to_image(cell_xy.cast());
    if pixel.x >= bounds.width || pixel.y >= bounds.height {
      return;
    }
    let color = match cell.label {
      Some(id) if cell.count > 0 => palette.color(grid.labels().name(id)),
      _ => BACKGROUND,
    };
    canvas.put_pixel(pixel, color);
  });
  log::info!("{} districts coloured", palette.len());
}

/// [`rasterize`] onto a fresh buffer from [`new_image`].
pub fn render<R: Rng>(grid: &Grid, extent: &Extent, palette: &mut Palette<R>) -> RgbImage {
  let mut image = new_image(extent);
  rasterize(grid, extent, palette, &mut image);
  image
}
