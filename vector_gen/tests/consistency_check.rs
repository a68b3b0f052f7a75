mod common;

use common::*;
use vector_gen::consistency::compare_dirs;
use vector_gen::pipeline::classify::{ClassifyOptions, run_classify};

#[test]
fn expanding_output_is_consistent_with_raw() {
    let data = setup_data_dir();
    write_spy_day(&data.raw());
    run_classify(&data.raw(), &data.classified(), &ClassifyOptions::default()).unwrap();

    let report = compare_dirs(&data.raw(), &data.classified()).unwrap();
    assert!(report.is_consistent(), "{report}");
    assert_eq!(report.raw_files, 2);
}

#[test]
fn detects_missing_and_short_outputs() {
    let data = setup_data_dir();
    write_spy_day(&data.raw());
    run_classify(&data.raw(), &data.classified(), &ClassifyOptions::default()).unwrap();

    std::fs::remove_file(data.classified().join("SPY_260222_5_0940_0950.jsonl")).unwrap();
    let path = data.classified().join("SPY_260222_5_0930_0940.jsonl");
    let lines = read_lines(&path);
    write_lines(&path, &lines[..2]);

    let report = compare_dirs(&data.raw(), &data.classified()).unwrap();
    assert!(!report.is_consistent());
    assert_eq!(report.in_raw_only, vec!["SPY_260222_5_0940_0950".to_string()]);
    assert_eq!(report.count_mismatch.len(), 1);
    assert_eq!(report.count_mismatch[0].raw, Some(3));
    assert_eq!(report.count_mismatch[0].classified, Some(2));
}
