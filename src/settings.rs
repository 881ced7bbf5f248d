//! Program-wide configuration.

use std::path::PathBuf;
use std::thread;

/// Number of simplification levels built per trajectory.
pub const NUM_LEVELS: usize = 4;

/// Runtime configuration for preprocessing and query solving.
///
/// The defaults reproduce the tuned values the engine ships with; every
/// field can be overridden before constructing an
/// [`Engine`](crate::query::Engine).
#[derive(Clone, Debug)]
pub struct Settings {
    /// Worker threads per phase. `<= 1` runs everything on the calling
    /// thread, which is useful when debugging concurrency issues.
    pub workers: usize,

    /// Number of trajectories / queries a worker claims at once.
    pub batch_size: usize,

    /// Target vertex-count ratios of the simplification ladder, coarsest
    /// level first.
    pub level_ratios: [f64; NUM_LEVELS],

    /// Minimum vertex count any simplification level aims for.
    pub min_simplification_size: usize,

    /// Level 0 starts simple in case the spatial hash prunes nothing.
    pub level0_max_size: usize,

    /// Simplifier invocations allowed per epsilon search.
    pub epsilon_search_budget: usize,

    /// Cells per dimension of the spatial hash.
    pub slots_per_dimension: usize,

    /// Tolerance guarding the hash cell index against representation
    /// errors at the grid boundary.
    pub hash_tolerance: f64,

    /// Growth base of the double-and-search probe sequence.
    pub search_base: f64,

    /// Exponent step of the double-and-search probe sequence.
    pub search_exponent_step: f64,

    /// Directory prepended to every trajectory path from the dataset and
    /// query files.
    pub trajectory_dir: PathBuf,

    /// Directory the per-query result files are written to.
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            workers: thread::available_parallelism().map_or(1, |n| n.get()),
            batch_size: 20,
            level_ratios: [0.07, 0.19, 0.24, 0.32],
            min_simplification_size: 20,
            level0_max_size: 18,
            epsilon_search_budget: 10,
            slots_per_dimension: 500,
            hash_tolerance: 1e-5,
            search_base: 2.0,
            search_exponent_step: 1.0,
            trajectory_dir: PathBuf::new(),
            output_dir: PathBuf::new(),
        }
    }
}
