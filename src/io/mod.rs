//! Parsers for the dataset, trajectory and query files, and the
//! per-query result writer.

pub mod error;
pub mod files;
mod test;

#[doc(inline)]
pub use files::{
    parse_dataset_file, parse_query_file, parse_trajectory_file, write_query_results,
};
