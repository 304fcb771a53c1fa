use {
  image::Rgb,
  rand::{Rng, SeedableRng},
  rand_pcg::Pcg64,
  std::collections::HashMap,
};

/// Random colour per district, drawn the first time a district is asked for and
/// remembered for the rest of the run.
pub struct Palette<R = Pcg64> {
  rng: R,
  colors: HashMap<String, Rgb<u8>>,
}

impl Palette<Pcg64> {
  pub fn seeded(seed: u64) -> Self {
    Self::new(Pcg64::seed_from_u64(seed))
  }

  pub fn from_entropy() -> Self {
    Self::new(Pcg64::from_entropy())
  }

  /// Seeded when a seed is given, from entropy otherwise.
  pub fn from_seed_option(seed: Option<u64>) -> Self {
    seed.map_or_else(Self::from_entropy, Self::seeded)
  }
}

impl<R: Rng> Palette<R> {
  pub fn new(rng: R) -> Self {
    Self { rng, colors: HashMap::new() }
  }

  pub fn color(&mut self, label: &str) -> Rgb<u8> {
    if let Some(&color) = self.colors.get(label) {
      return color;
    }
    let color = Rgb(self.rng.gen::<[u8; 3]>());
    self.colors.insert(label.to_string(), color);
    color
  }

  /// Districts coloured so far.
  pub fn len(&self) -> usize {
    self.colors.len()
  }

  pub fn is_empty(&self) -> bool {
    self.colors.is_empty()
  }
}
