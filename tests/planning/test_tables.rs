//! Externally supplied reference tables

use beplan::prelude::*;
use beplan::sizing::{SampleSizeCalculator, SampleSizeRequest};
use beplan::tables::{ReferenceTable, TableError, TableKey, TableStore};
use std::io::Write;

fn temp_csv(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("beplan_{}_{name}", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn test_csv_table_drives_sizing() {
    let path = temp_csv(
        "crossover.csv",
        "# site-specific crossover table\ncv_pct,n\n20, 24\n30, 48\n10, 12\n",
    );
    let store = TableStore::default()
        .load_csv(TableKey::TostCrossover095, &path)
        .unwrap();
    std::fs::remove_file(&path).ok();

    let table = store.get(TableKey::TostCrossover095).unwrap();
    assert_eq!(table.points(), &[(10.0, 12), (20.0, 24), (30.0, 48)]);

    let overrides = Overrides::default().validate().unwrap();
    let plan = SampleSizeCalculator::new(&store)
        .compute(&SampleSizeRequest::new(Some(25.0), 2), &overrides)
        .unwrap();
    assert_eq!(plan.n_base, 36);
}

#[test]
fn test_csv_rejects_bad_rows() {
    let path = temp_csv("duplicate.csv", "cv_pct,n\n20,24\n20,26\n");
    let result = ReferenceTable::from_csv_path(&path);
    std::fs::remove_file(&path).ok();
    assert!(matches!(result, Err(TableError::DuplicateBreakpoint { .. })));

    let path = temp_csv("garbage.csv", "cv_pct,n\ntwenty,24\n");
    let result = ReferenceTable::from_csv_path(&path);
    std::fs::remove_file(&path).ok();
    assert!(matches!(result, Err(TableError::Csv(_))));

    let result = ReferenceTable::from_csv_path("/nonexistent/beplan/table.csv");
    assert!(matches!(result, Err(TableError::Io(_))));
}

#[test]
fn test_json_tables_drive_the_planner() {
    let json = r#"{
        "tost_crossover_095": [[10, 12], [40, 60]],
        "tost_parallel_095": [[10, 30], [40, 90]]
    }"#;
    let store = TableStore::default().load_json(json).unwrap();
    let planner = StudyPlanner::default().with_tables(store);

    let pk = PkInputs::new()
        .with_cv_intra(25.0)
        .with_t_half(6.0)
        .with_tmax(1.0);
    let plan = planner.plan(&pk, &Overrides::default()).unwrap();
    // 12 + 0.5 × 48
    assert_eq!(plan.sample_size.n_base, 36);
}

#[test]
fn test_invalid_json_tables() {
    for json in [
        r#"{"tost_crossover_095": []}"#,
        r#"{"tost_crossover_095": [[20, 0]]}"#,
        r#"{"tost_crossover_095": [[-1, 10]]}"#,
        r#"{"tost_crossover_095": "table"}"#,
    ] {
        assert!(TableStore::default().load_json(json).is_err(), "{json}");
    }
}
