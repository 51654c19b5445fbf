//! Breakpoint tables and their interpolation

use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

use super::error::TableError;

/// Guards `ceil` against representation error on exact breakpoints
const CEIL_TOLERANCE: f64 = 1e-9;

/// Variability-to-subjects lookup table
///
/// Breakpoints map a CVintra percentage to the number of subjects required by
/// a given statistical method. Breakpoints are kept sorted by CV and are
/// unique; a table always has at least one breakpoint.
///
/// Serialized as a list of `[cv_pct, n]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(f64, u32)>", into = "Vec<(f64, u32)>")]
pub struct ReferenceTable {
    points: Vec<(f64, u32)>,
}

impl ReferenceTable {
    /// Build a table from `(cv_pct, n)` pairs in any order
    pub fn new(mut points: Vec<(f64, u32)>) -> Result<Self, TableError> {
        if points.is_empty() {
            return Err(TableError::Empty);
        }
        if let Some(&(cv, n)) = points
            .iter()
            .find(|(cv, n)| !cv.is_finite() || *cv < 0.0 || *n == 0)
        {
            return Err(TableError::InvalidBreakpoint { cv, n });
        }

        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        if let Some(pair) = points.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(TableError::DuplicateBreakpoint { cv: pair[0].0 });
        }

        Ok(Self { points })
    }

    /// Read a table from CSV with `cv_pct,n` columns
    pub fn from_csv_reader<R: io::Read>(reader: R) -> Result<Self, TableError> {
        #[derive(Deserialize)]
        struct Row {
            cv_pct: f64,
            n: u32,
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut points = Vec::new();
        for row in reader.deserialize::<Row>() {
            let row = row?;
            points.push((row.cv_pct, row.n));
        }
        Self::new(points)
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Sorted breakpoints
    pub fn points(&self) -> &[(f64, u32)] {
        &self.points
    }

    /// Lowest breakpoint
    pub fn first(&self) -> (f64, u32) {
        self.points[0]
    }

    /// Highest breakpoint
    pub fn last(&self) -> (f64, u32) {
        self.points[self.points.len() - 1]
    }

    /// Subject count at `cv`
    ///
    /// - at or below the lowest breakpoint: the lowest value, raised to `floor`
    /// - strictly between two breakpoints: linear interpolation, rounded up,
    ///   raised to `floor`
    /// - at or above the highest breakpoint: the highest value, unchanged
    pub fn interpolate(&self, cv: f64, floor: u32) -> u32 {
        let (first_cv, first_n) = self.first();
        let (last_cv, last_n) = self.last();

        if cv <= first_cv {
            return first_n.max(floor);
        }
        if cv >= last_cv {
            return last_n;
        }

        for pair in self.points.windows(2) {
            let (lo_cv, lo_n) = pair[0];
            let (hi_cv, hi_n) = pair[1];
            if cv > hi_cv {
                continue;
            }
            if cv == hi_cv {
                return hi_n.max(floor);
            }
            let frac = (cv - lo_cv) / (hi_cv - lo_cv);
            let n = lo_n as f64 + frac * (hi_n as f64 - lo_n as f64);
            let n = (n - CEIL_TOLERANCE).ceil() as u32;
            return n.max(floor);
        }

        last_n
    }

    /// Whether subject counts never decrease as CV grows
    pub fn is_monotone(&self) -> bool {
        self.points.windows(2).all(|w| w[0].1 <= w[1].1)
    }
}

impl TryFrom<Vec<(f64, u32)>> for ReferenceTable {
    type Error = TableError;

    fn try_from(points: Vec<(f64, u32)>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<ReferenceTable> for Vec<(f64, u32)> {
    fn from(table: ReferenceTable) -> Self {
        table.points
    }
}
