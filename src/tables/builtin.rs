//! Built-in reference tables
//!
//! Values were produced with the R package PowerTOST at target power 0.80 and
//! alpha 0.05:
//!
//! | Table | Call |
//! |-------|------|
//! | TOST crossover | `sampleN.TOST(CV, theta0, design = "2x2x2")` |
//! | TOST parallel | `sampleN.TOST(CV, theta0, design = "parallel")` |
//! | ABEL 4-period | `sampleN.scABEL.ad(CV, theta0, design = "2x2x4")` |
//! | ABEL 3-period | `sampleN.scABEL.ad(CV, theta0, design = "2x2x3")` |
//! | NTID | `sampleN.NTID(CV, theta0, design = "2x2x4")` |

use lazy_static::lazy_static;
use std::collections::BTreeMap;

use super::{ReferenceTable, TableKey, TableStore};

const TOST_CROSSOVER_095: &[(f64, u32)] = &[
    (10.0, 8),
    (15.0, 12),
    (17.0, 14),
    (20.0, 20),
    (22.0, 22),
    (24.0, 26),
    (25.0, 28),
    (26.0, 30),
    (28.0, 34),
    (30.0, 40),
    (32.0, 44),
    (35.0, 52),
    (38.0, 64),
    (40.0, 70),
    (42.0, 78),
    (45.0, 90),
    (48.0, 104),
    (50.0, 116),
];

const TOST_CROSSOVER_090: &[(f64, u32)] = &[
    (15.0, 18),
    (17.0, 20),
    (20.0, 26),
    (22.0, 30),
    (24.0, 34),
    (25.0, 36),
    (26.0, 40),
    (28.0, 44),
    (30.0, 52),
    (32.0, 56),
    (35.0, 68),
    (38.0, 80),
    (40.0, 90),
    (42.0, 96),
    (45.0, 112),
    (48.0, 130),
    (50.0, 142),
];

const TOST_PARALLEL_095: &[(f64, u32)] = &[
    (20.0, 38),
    (25.0, 54),
    (30.0, 78),
    (35.0, 102),
    (40.0, 132),
    (45.0, 162),
    (50.0, 196),
    (55.0, 232),
    (60.0, 270),
];

const TOST_PARALLEL_090: &[(f64, u32)] = &[
    (20.0, 60),
    (25.0, 88),
    (30.0, 124),
    (35.0, 166),
    (40.0, 214),
    (45.0, 268),
    (50.0, 326),
    (55.0, 390),
    (60.0, 458),
];

const ABEL_4_PERIOD_095: &[(f64, u32)] = &[
    (30.0, 24),
    (32.0, 24),
    (34.0, 26),
    (35.0, 26),
    (36.0, 28),
    (38.0, 30),
    (40.0, 32),
    (42.0, 34),
    (44.0, 36),
    (45.0, 38),
    (48.0, 42),
    (50.0, 46),
    (55.0, 54),
    (60.0, 64),
    (65.0, 76),
    (70.0, 90),
];

const ABEL_4_PERIOD_090: &[(f64, u32)] = &[
    (30.0, 30),
    (32.0, 32),
    (34.0, 34),
    (35.0, 34),
    (36.0, 36),
    (38.0, 38),
    (40.0, 40),
    (42.0, 42),
    (44.0, 44),
    (45.0, 46),
    (48.0, 50),
    (50.0, 54),
    (55.0, 64),
    (60.0, 76),
    (65.0, 90),
    (70.0, 104),
];

const ABEL_3_PERIOD_095: &[(f64, u32)] = &[
    (30.0, 36),
    (32.0, 36),
    (34.0, 36),
    (35.0, 36),
    (36.0, 36),
    (38.0, 42),
    (40.0, 42),
    (42.0, 48),
    (45.0, 54),
    (48.0, 60),
    (50.0, 66),
    (55.0, 78),
    (60.0, 90),
    (65.0, 108),
    (70.0, 126),
];

const NTID_0975: &[(f64, u32)] = &[
    (4.0, 54),
    (5.0, 34),
    (6.0, 24),
    (8.0, 16),
    (10.0, 14),
    (12.0, 14),
    (15.0, 16),
    (20.0, 28),
    (25.0, 48),
    (30.0, 72),
];

const NTID_095: &[(f64, u32)] = &[
    (4.0, 98),
    (5.0, 64),
    (6.0, 48),
    (8.0, 32),
    (10.0, 24),
    (12.0, 22),
    (15.0, 22),
    (20.0, 36),
    (25.0, 58),
    (30.0, 88),
];

fn raw(key: TableKey) -> &'static [(f64, u32)] {
    match key {
        TableKey::TostCrossover095 => TOST_CROSSOVER_095,
        TableKey::TostCrossover090 => TOST_CROSSOVER_090,
        TableKey::TostParallel095 => TOST_PARALLEL_095,
        TableKey::TostParallel090 => TOST_PARALLEL_090,
        TableKey::Abel4Period095 => ABEL_4_PERIOD_095,
        TableKey::Abel4Period090 => ABEL_4_PERIOD_090,
        TableKey::Abel3Period095 => ABEL_3_PERIOD_095,
        TableKey::Ntid0975 => NTID_0975,
        TableKey::Ntid095 => NTID_095,
    }
}

fn build(raw: impl Fn(TableKey) -> &'static [(f64, u32)]) -> TableStore {
    let mut tables = BTreeMap::new();
    for key in TableKey::ALL {
        match ReferenceTable::new(raw(key).to_vec()) {
            Ok(table) => {
                tables.insert(key, table);
            }
            Err(e) => tracing::error!(%key, error = %e, "builtin table rejected"),
        }
    }
    TableStore::from_tables(tables)
}

lazy_static! {
    pub(crate) static ref BUILTIN: TableStore = build(raw);
}
