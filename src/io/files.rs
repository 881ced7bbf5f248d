use std::fs;
use std::path::Path;

use geo::Point;
use log::warn;

use crate::io::error::IoError;
use crate::model::Trajectory;
use crate::query::Query;

/// Parses a dataset list file: one trajectory path per
/// whitespace-separated token.
pub fn parse_dataset_file(path: &Path) -> Result<Vec<String>, IoError> {
    let content = fs::read_to_string(path).map_err(|e| IoError::Open(path.to_path_buf(), e))?;
    Ok(content.split_whitespace().map(str::to_owned).collect())
}

/// Parses a query file: whitespace-separated (trajectory path, delta)
/// pairs. Parsing stops at the first malformed pair.
pub fn parse_query_file(path: &Path) -> Result<Vec<Query>, IoError> {
    let content = fs::read_to_string(path).map_err(|e| IoError::Open(path.to_path_buf(), e))?;

    let mut queries = Vec::new();
    let mut tokens = content.split_whitespace();
    while let (Some(file), Some(delta)) = (tokens.next(), tokens.next()) {
        let Ok(delta) = delta.parse::<f64>() else {
            warn!("{}: stopping at malformed delta {delta:?}", path.display());
            break;
        };
        queries.push(Query {
            file: file.to_owned(),
            delta,
            index: queries.len(),
        });
    }
    Ok(queries)
}

/// Parses a trajectory file.
///
/// The first line is a header and is ignored. Every further line holds at
/// least two whitespace-separated float fields; fields one and two are x
/// and y, anything after is tolerated and ignored. Parsing stops at the
/// first malformed line. Returns `None` when fewer than two distinct
/// vertices remain after deduplication.
pub fn parse_trajectory_file(path: &Path, name: &str) -> Result<Option<Trajectory>, IoError> {
    let content = fs::read_to_string(path).map_err(|e| IoError::Open(path.to_path_buf(), e))?;

    let mut points = Vec::new();
    for line in content.lines().skip(1) {
        let mut fields = line.split_whitespace();
        let (Some(x), Some(y)) = (fields.next(), fields.next()) else {
            break;
        };
        let (Ok(x), Ok(y)) = (x.parse::<f64>(), y.parse::<f64>()) else {
            break;
        };
        points.push(Point::new(x, y));
    }
    Ok(Trajectory::from_points(name, points))
}

/// Writes the result file for one query: `result-NNNNN.txt` with one
/// matching trajectory name per line, order unspecified.
pub fn write_query_results(dir: &Path, index: usize, names: &[&str]) -> Result<(), IoError> {
    let path = dir.join(format!("result-{index:05}.txt"));

    let mut content = String::new();
    for name in names {
        content.push_str(name);
        content.push('\n');
    }
    fs::write(&path, content).map_err(|e| IoError::Write(path.clone(), e))
}
