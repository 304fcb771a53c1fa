use std::time::Instant;

/// Logs the elapsed time of a phase when dropped.
/// ```ignore
/// let _t = Timed::info("void fill");
/// // logs "void fill: 1.234s" at the end of scope
/// ```
pub struct Timed {
  name: &'static str,
  start: Instant,
}

impl Timed {
  pub fn info(name: &'static str) -> Self {
    log::debug!("{}...", name);
    Self { name, start: Instant::now() }
  }
}

impl Drop for Timed {
  fn drop(&mut self) {
    log::info!("{}: {:.3?}", self.name, self.start.elapsed());
  }
}

/// `1234` -> `"1.21 KiB"`
pub fn file_size(bytes: usize) -> String {
  use humansize::{FileSize, file_size_opts};

  bytes.file_size(file_size_opts::BINARY)
    .unwrap_or_else(|_| format!("{} B", bytes))
}
