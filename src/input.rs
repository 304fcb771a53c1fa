//! Tab-delimited sample rows.
//!
//! Every line is turned into a `Result<RawRow, RowParseError>`; a bad line never stops the
//! stream, including one that is not valid UTF-8. Only a failing read surfaces as
//! `Err(io::Error)` from [`TsvReader`] and ends the pass.

use {
  crate::{
    config::Columns,
    error::{self, MapError, RowParseError},
    geometry::{self, SourceSpace},
  },
  euclid::Point2D,
  std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
  },
};

pub type RowResult = Result<RawRow, RowParseError>;

/// A geocoded sample.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
  pub longitude: f64,
  pub latitude: f64,
  pub postcode: String,
}

impl RawRow {
  pub fn new(longitude: f64, latitude: f64, postcode: impl Into<String>) -> Self {
    Self { longitude, latitude, postcode: postcode.into() }
  }

  pub fn position(&self) -> Point2D<f64, SourceSpace> {
    geometry::to_source_space(self.longitude, self.latitude)
  }

  /// Postal district: the first whitespace-delimited token of the postcode.
  pub fn district(&self) -> Result<&str, RowParseError> {
    self.postcode
      .split_whitespace()
      .next()
      .ok_or(RowParseError::MissingDistrict)
  }
}

/// Parse one tab-delimited line.
pub fn parse_row(line: &str, columns: Columns) -> RowResult {
  let fields = line.split('\t').collect::<Vec<_>>();
  let field = |column: usize| fields.get(column)
    .copied()
    .ok_or(RowParseError::MissingField { column });
  let coordinate = |column: usize| -> Result<f64, RowParseError> {
    let value = field(column)?;
    value.trim()
      .parse::<f64>()
      .ok()
      .filter(|v| v.is_finite())
      .ok_or_else(|| RowParseError::InvalidCoordinate { column, value: value.to_string() })
  };

  Ok(RawRow {
    longitude: coordinate(columns.longitude)?,
    latitude: coordinate(columns.latitude)?,
    postcode: field(columns.postcode)?.trim().to_string(),
  })
}

/// Streams [`RowResult`]s out of a tab-delimited source.
pub struct TsvReader<R> {
  reader: R,
  line: Vec<u8>,
  columns: Columns,
}

impl<R: BufRead> TsvReader<R> {
  pub fn new(reader: R, columns: Columns) -> Self {
    Self { reader, line: Vec::new(), columns }
  }
}

impl TsvReader<BufReader<File>> {
  pub fn open(path: impl AsRef<Path>, columns: Columns) -> error::Result<Self> {
    let file = File::open(path).map_err(MapError::from)?;
    Ok(Self::new(BufReader::new(file), columns))
  }
}

impl<R: BufRead> Iterator for TsvReader<R> {
  type Item = io::Result<RowResult>;

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      self.line.clear();
      match self.reader.read_until(b'\n', &mut self.line) {
        Ok(0) => return None,
        Ok(_) => {}
        Err(e) => return Some(Err(e)),
      }
      let line = match std::str::from_utf8(&self.line) {
        Ok(line) => line,
        Err(_) => return Some(Ok(Err(RowParseError::InvalidUtf8))),
      };
      if line.trim().is_empty() {
        continue;
      }
      return Some(Ok(parse_row(line.trim_end_matches(&['\n', '\r'][..]), self.columns)));
    }
  }
}

#[cfg(test)]
mod tests {
  use {super::*, std::io::Cursor};

  const LINE: &str = "GB\tRG1 1AA\tReading\tEngland\tENG\tBerkshire\t11\tReading\tE06000038\t51.4551\t-0.9787\t6";

  #[test] fn geonames_row() {
    let row = parse_row(LINE, Columns::default()).unwrap();
    assert_eq!(row, RawRow::new(-0.9787, 51.4551, "RG1 1AA"));
    assert_eq!(row.district(), Ok("RG1"));
  }

  #[test] fn malformed_rows() {
    let columns = Columns::default();
    assert_eq!(
      parse_row("GB\tRG1 1AA\tReading", columns),
      Err(RowParseError::MissingField { column: 10 })
    );
    let bad = LINE.replace("51.4551", "north");
    assert_eq!(
      parse_row(&bad, columns),
      Err(RowParseError::InvalidCoordinate { column: 9, value: "north".into() })
    );
    let nan = LINE.replace("-0.9787", "NaN");
    assert!(parse_row(&nan, columns).is_err());
    let blank = parse_row(&LINE.replace("RG1 1AA", "  "), columns).unwrap();
    assert_eq!(blank.district(), Err(RowParseError::MissingDistrict));
  }

  #[test] fn reader_skips_blank_lines() {
    let text = format!("{}\n\n\ngarbage\r\n{}\r\n", LINE, LINE);
    let rows = TsvReader::new(Cursor::new(text), Columns::default())
      .collect::<io::Result<Vec<_>>>()
      .unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows[0].is_ok());
    assert!(rows[1].is_err());
    assert!(rows[2].is_ok());
  }

  #[test] fn missing_file() {
    let err = TsvReader::open("/nonexistent/GB_full.txt", Columns::default()).err().unwrap();
    assert!(matches!(err.downcast_ref::<MapError>(), Some(MapError::Io(_))));
  }

  #[test] fn undecodable_line_is_a_bad_row() {
    let mut text = format!("{}\n", LINE).into_bytes();
    text.extend_from_slice(b"GB\tRG1 2\xff\tX\n");
    text.extend_from_slice(format!("{}\n", LINE).as_bytes());
    let rows = TsvReader::new(Cursor::new(text), Columns::default())
      .collect::<io::Result<Vec<_>>>()
      .unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows[0].is_ok());
    assert_eq!(rows[1], Err(RowParseError::InvalidUtf8));
    assert!(rows[2].is_ok());
  }
}
