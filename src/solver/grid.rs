use {
  crate::geometry::StorageSpace,
  euclid::{Point2D, Size2D},
  std::{collections::HashMap, num::NonZeroU32},
};

/// Compact handle of a district name, see [`Labels`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LabelId(NonZeroU32);

/// A storage cell. `count > 0` exactly when `label` is set.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Cell {
  pub label: Option<LabelId>,
  pub count: u32,
}

impl Cell {
  pub fn is_empty(&self) -> bool {
    self.label.is_none()
  }
}

/// Interner mapping district names to [`LabelId`]s and back.
#[derive(Debug, Default, Clone)]
pub struct Labels {
  names: Vec<String>,
  ids: HashMap<String, LabelId>,
}

impl Labels {
  pub fn intern(&mut self, name: &str) -> LabelId {
    if let Some(&id) = self.ids.get(name) {
      return id;
    }
    let id = NonZeroU32::new(self.names.len() as u32 + 1)
      .map(LabelId)
      .expect("label id overflow");
    self.names.push(name.to_string());
    self.ids.insert(name.to_string(), id);
    id
  }

  pub fn get(&self, name: &str) -> Option<LabelId> {
    self.ids.get(name).copied()
  }

  pub fn name(&self, id: LabelId) -> &str {
    &self.names[id.0.get() as usize - 1]
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }
}

/// Dense lattice of [`Cell`]s stored row-major, plus the names of every label in it.
/// Dimensions are fixed at construction.
#[derive(Debug, Clone)]
pub struct Grid {
  cells: Vec<Cell>,
  size: Size2D<usize, StorageSpace>,
  labels: Labels,
}

impl Grid {
  /// `width × height` empty cells.
  ///
  /// # Panics
  /// When `width * height` overflows `usize`. [`Config`](crate::config::Config) rejects
  /// storage sizes that would.
  pub fn new(width: usize, height: usize) -> Self {
    let len = width.checked_mul(height).expect("grid cell count overflows usize");
    Self {
      cells: vec![Cell::default(); len],
      size: Size2D::new(width, height),
      labels: Labels::default(),
    }
  }

  /// Grid addressed by `[0, storage.width] × [0, storage.height]`.
  pub fn for_storage(storage: Size2D<u32, StorageSpace>) -> Self {
    Self::new(storage.width as usize + 1, storage.height as usize + 1)
  }

  pub fn width(&self) -> usize { self.size.width }
  pub fn height(&self) -> usize { self.size.height }
  pub fn size(&self) -> Size2D<usize, StorageSpace> { self.size }
  pub fn labels(&self) -> &Labels { &self.labels }

  #[inline]
  fn offset(&self, x: usize, y: usize) -> usize {
    debug_assert!(x < self.size.width && y < self.size.height);
    y * self.size.width + x
  }

  #[inline]
  pub fn get(&self, x: usize, y: usize) -> Cell {
    self.cells[self.offset(x, y)]
  }

  #[inline]
  pub(crate) fn get_mut(&mut self, x: usize, y: usize) -> &mut Cell {
    let offset = self.offset(x, y);
    &mut self.cells[offset]
  }

  /// District name held by a cell.
  pub fn label(&self, x: usize, y: usize) -> Option<&str> {
    self.get(x, y).label.map(|id| self.labels.name(id))
  }

  /// Record one sample of `district` in a cell. The label is only taken on the first
  /// write; returns whether that happened.
  pub fn increment(&mut self, x: usize, y: usize, district: &str) -> bool {
    let first = self.get(x, y).is_empty();
    if first {
      let id = self.labels.intern(district);
      self.get_mut(x, y).label = Some(id);
    }
    self.get_mut(x, y).count += 1;
    first
  }

  /// Number of cells holding a label.
  pub fn occupied(&self) -> usize {
    self.cells.iter().filter(|cell| !cell.is_empty()).count()
  }

  /// Every cell with its position, `x` outer and `y` inner.
  pub fn cells(&self) -> impl Iterator<Item = (Point2D<usize, StorageSpace>, Cell)> + '_ {
    itertools::iproduct!(0..self.size.width, 0..self.size.height)
      .map(move |(x, y)| (Point2D::new(x, y), self.get(x, y)))
  }

  /// Bytes held by the cell array.
  pub fn memory_usage(&self) -> usize {
    self.cells.len() * std::mem::size_of::<Cell>()
  }
}

impl PartialEq for Grid {
  /// Same dimensions and the same district name at every position, with equal counts.
  fn eq(&self, other: &Self) -> bool {
    self.size == other.size && self.cells().zip(other.cells()).all(|((p, a), (_, b))|
      a.count == b.count && self.label(p.x, p.y) == other.label(p.x, p.y)
    )
  }
}
