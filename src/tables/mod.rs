//! Reference sample-size tables
//!
//! The planner does not derive statistical power analytically. Instead it reads
//! precomputed tables (CVintra → required subjects) for three statistical
//! families and interpolates between their breakpoints:
//!
//! | Family | Tables |
//! |--------|--------|
//! | Unscaled TOST | crossover / parallel, θ0 = 0.95 and θ0 = 0.90 |
//! | Scaled limits (ABEL) | 4-period (θ0 = 0.95, 0.90), 3-period (θ0 = 0.95) |
//! | NTID | θ0 = 0.975 and θ0 = 0.95 |
//!
//! A [`TableStore`] starts from the built-in tables and any of them can be
//! replaced, from code, JSON or CSV, without touching the selection logic.
//!
//! ```rust,ignore
//! use beplan::tables::{TableKey, TableStore};
//!
//! let store = TableStore::default()
//!     .load_csv(TableKey::TostCrossover095, "tables/tost_2x2_095.csv")?;
//! let n = store.get(TableKey::TostCrossover095)?.interpolate(24.0, 12);
//! ```

mod builtin;
mod error;
mod table;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub use error::TableError;
pub use table::ReferenceTable;

/// Identifies one reference table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TableKey {
    #[serde(rename = "tost_crossover_095")]
    TostCrossover095,
    #[serde(rename = "tost_crossover_090")]
    TostCrossover090,
    #[serde(rename = "tost_parallel_095")]
    TostParallel095,
    #[serde(rename = "tost_parallel_090")]
    TostParallel090,
    #[serde(rename = "abel_4_period_095")]
    Abel4Period095,
    #[serde(rename = "abel_4_period_090")]
    Abel4Period090,
    #[serde(rename = "abel_3_period_095")]
    Abel3Period095,
    #[serde(rename = "ntid_0975")]
    Ntid0975,
    #[serde(rename = "ntid_095")]
    Ntid095,
}

impl TableKey {
    pub const ALL: [TableKey; 9] = [
        TableKey::TostCrossover095,
        TableKey::TostCrossover090,
        TableKey::TostParallel095,
        TableKey::TostParallel090,
        TableKey::Abel4Period095,
        TableKey::Abel4Period090,
        TableKey::Abel3Period095,
        TableKey::Ntid0975,
        TableKey::Ntid095,
    ];

    /// Stable table name, as used in JSON files
    pub fn name(&self) -> &'static str {
        match self {
            TableKey::TostCrossover095 => "tost_crossover_095",
            TableKey::TostCrossover090 => "tost_crossover_090",
            TableKey::TostParallel095 => "tost_parallel_095",
            TableKey::TostParallel090 => "tost_parallel_090",
            TableKey::Abel4Period095 => "abel_4_period_095",
            TableKey::Abel4Period090 => "abel_4_period_090",
            TableKey::Abel3Period095 => "abel_3_period_095",
            TableKey::Ntid0975 => "ntid_0975",
            TableKey::Ntid095 => "ntid_095",
        }
    }

    /// Expected geometric mean ratio the table was computed for
    pub fn theta0(&self) -> f64 {
        match self {
            TableKey::TostCrossover090
            | TableKey::TostParallel090
            | TableKey::Abel4Period090 => 0.90,
            TableKey::Ntid0975 => 0.975,
            _ => 0.95,
        }
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TableKey {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TableKey::ALL
            .into_iter()
            .find(|key| key.name() == s)
            .ok_or_else(|| TableError::UnknownTable(s.to_string()))
    }
}

/// Set of reference tables indexed by [`TableKey`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableStore {
    tables: BTreeMap<TableKey, ReferenceTable>,
}

impl Default for TableStore {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

impl TableStore {
    /// The built-in tables, initialised once
    pub fn builtin() -> &'static TableStore {
        &*builtin::BUILTIN
    }

    /// A store holding no tables at all
    pub fn empty() -> Self {
        Self {
            tables: BTreeMap::new(),
        }
    }

    pub(crate) fn from_tables(tables: BTreeMap<TableKey, ReferenceTable>) -> Self {
        Self { tables }
    }

    /// Look up a table
    pub fn get(&self, key: TableKey) -> Result<&ReferenceTable, TableError> {
        self.tables.get(&key).ok_or(TableError::MissingTable(key))
    }

    /// Replace (or add) one table
    pub fn with_table(mut self, key: TableKey, table: ReferenceTable) -> Self {
        self.tables.insert(key, table);
        self
    }

    /// Replace the tables named in a JSON object of `name -> [[cv, n], ...]`
    ///
    /// Tables not mentioned in the document are kept.
    pub fn load_json(mut self, json: &str) -> Result<Self, TableError> {
        let raw: BTreeMap<String, ReferenceTable> = serde_json::from_str(json)?;
        for (name, table) in raw {
            let key = TableKey::from_str(&name)?;
            self.tables.insert(key, table);
        }
        Ok(self)
    }

    /// Replace one table with the contents of a `cv_pct,n` CSV file
    pub fn load_csv(self, key: TableKey, path: impl AsRef<Path>) -> Result<Self, TableError> {
        let table = ReferenceTable::from_csv_path(path)?;
        Ok(self.with_table(key, table))
    }

    /// Keys of the tables currently loaded
    pub fn keys(&self) -> impl Iterator<Item = TableKey> + '_ {
        self.tables.keys().copied()
    }
}
