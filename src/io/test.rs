#![cfg(test)]

use std::fs;
use std::path::PathBuf;

use approx::assert_relative_eq;

use crate::io::error::IoError;
use crate::io::{
    parse_dataset_file, parse_query_file, parse_trajectory_file, write_query_results,
};

/// A unique scratch directory per test.
fn scratch(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("leash-io-{tag}-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("creating the scratch directory");
    dir
}

#[test]
fn dataset_files_are_whitespace_separated() {
    let dir = scratch("dataset");
    let path = dir.join("dataset.txt");
    fs::write(&path, "a.txt b.txt\nsub/c.txt\n\t d.txt\n").unwrap();

    let names = parse_dataset_file(&path).unwrap();
    assert_eq!(names, vec!["a.txt", "b.txt", "sub/c.txt", "d.txt"]);
}

#[test]
fn query_files_hold_path_delta_pairs() {
    let dir = scratch("queries");
    let path = dir.join("queries.txt");
    fs::write(&path, "q0.txt 1.5\nq1.txt 0.25 q2.txt 3\n").unwrap();

    let queries = parse_query_file(&path).unwrap();
    assert_eq!(queries.len(), 3);
    assert_eq!(queries[0].file, "q0.txt");
    assert_relative_eq!(queries[0].delta, 1.5);
    assert_eq!(queries[2].index, 2);
}

#[test]
fn query_parsing_stops_at_a_malformed_delta() {
    let dir = scratch("queries-bad");
    let path = dir.join("queries.txt");
    fs::write(&path, "q0.txt 1.0 q1.txt oops q2.txt 2.0\n").unwrap();

    let queries = parse_query_file(&path).unwrap();
    assert_eq!(queries.len(), 1);
}

#[test]
fn trajectory_files_skip_the_header_and_extra_fields() {
    let dir = scratch("trajectory");
    let path = dir.join("t.txt");
    fs::write(
        &path,
        "x y timestamp id\n0.0 0.0 17 a\n1.0 0.5 18 b\n2.0 0.0 19 c\n",
    )
    .unwrap();

    let t = parse_trajectory_file(&path, "t.txt").unwrap().unwrap();
    assert_eq!(t.name, "t.txt");
    assert_eq!(t.len(), 3);
    assert_relative_eq!(t.points[1].y(), 0.5);
}

#[test]
fn trajectory_parsing_drops_duplicates_and_stops_at_bad_lines() {
    let dir = scratch("trajectory-bad");
    let path = dir.join("t.txt");
    fs::write(
        &path,
        "header\n0.0 0.0\n0.0 0.0\n1.0 0.0\nnot a number\n2.0 0.0\n",
    )
    .unwrap();

    let t = parse_trajectory_file(&path, "t.txt").unwrap().unwrap();
    // the duplicate is dropped and parsing ends at the bad line
    assert_eq!(t.len(), 2);
}

#[test]
fn degenerate_trajectory_files_yield_none() {
    let dir = scratch("trajectory-degenerate");
    let path = dir.join("t.txt");
    fs::write(&path, "header\n1.0 1.0\n1.0 1.0\n").unwrap();

    assert!(parse_trajectory_file(&path, "t.txt").unwrap().is_none());
}

#[test]
fn missing_files_are_open_errors() {
    let dir = scratch("missing");
    let missing = dir.join("does-not-exist.txt");
    assert!(matches!(
        parse_dataset_file(&missing),
        Err(IoError::Open(..))
    ));
    assert!(matches!(
        parse_trajectory_file(&missing, "x"),
        Err(IoError::Open(..))
    ));
}

#[test]
fn result_files_are_zero_padded() {
    let dir = scratch("results");
    write_query_results(&dir, 42, &["alpha", "beta"]).unwrap();

    let content = fs::read_to_string(dir.join("result-00042.txt")).unwrap();
    assert_eq!(content, "alpha\nbeta\n");

    write_query_results(&dir, 0, &[]).unwrap();
    assert_eq!(fs::read_to_string(dir.join("result-00000.txt")).unwrap(), "");
}
