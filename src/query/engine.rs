//! Two-phase execution: parallel preprocessing of the dataset, then
//! parallel query solving.
//!
//! Both phases run on a fixed-size rayon pool and hand out fixed-size
//! batches; every worker carries private scratch (simplifier buffers,
//! freespace queues) and private accumulators that are folded into the
//! engine once the phase joins, so nothing is shared mutably while the
//! pool is live.

use std::path::Path;

use log::{debug, info, warn};
use measure_time::info_time;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::geom::Bounds;
use crate::index::SpatialHash;
use crate::io;
use crate::model::Trajectory;
use crate::query::pipeline::{self, QueryStats};
use crate::query::Query;
use crate::settings::Settings;
use crate::simplify::ladder;
use crate::simplify::{AgarwalSimplifier, EpsilonStats, ProgressiveSimplifier};

/// What one preprocessing batch produced: the trajectory slots in dataset
/// order plus the worker-private accumulators.
struct ChunkResult {
    slots: Vec<Option<Trajectory>>,
    bounds: Bounds,
    stats: EpsilonStats,
}

/// Private scratch of a query-phase worker.
struct QueryWorker {
    progressive: ProgressiveSimplifier,
    cdf: crate::frechet::CdfShortcuts,
}

impl QueryWorker {
    fn new(settings: &Settings) -> Self {
        QueryWorker {
            progressive: ProgressiveSimplifier::new(
                settings.search_base,
                settings.search_exponent_step,
            ),
            cdf: crate::frechet::CdfShortcuts::default(),
        }
    }
}

/// The preprocessed dataset and everything needed to answer queries
/// against it.
pub struct Engine {
    settings: Settings,
    trajectories: Vec<Option<Trajectory>>,
    hash: Option<SpatialHash>,
    learned: EpsilonStats,
}

impl Engine {
    pub fn new(settings: Settings) -> Self {
        Engine {
            settings,
            trajectories: Vec::new(),
            hash: None,
            learned: EpsilonStats::default(),
        }
    }

    /// Loads, preprocesses and solves in one go, writing one result file
    /// per query.
    pub fn run(
        dataset_list: &Path,
        query_list: &Path,
        settings: Settings,
    ) -> crate::Result<Vec<QueryStats>> {
        let names = io::parse_dataset_file(dataset_list)?;
        let queries = io::parse_query_file(query_list)?;

        let mut engine = Engine::new(settings);
        engine.preprocess(&names)?;
        engine.solve(&queries)
    }

    /// Phase 1: loads and simplifies every dataset trajectory, then
    /// builds the spatial hash over the folded bounding box.
    pub fn preprocess(&mut self, names: &[String]) -> crate::Result<()> {
        info_time!("preprocessed {} trajectories", names.len());
        let settings = self.settings.clone();
        let batch = settings.batch_size.max(1);

        let chunks: Vec<ChunkResult> = if settings.workers <= 1 {
            let mut agarwal =
                AgarwalSimplifier::new(settings.search_base, settings.search_exponent_step);
            names
                .chunks(batch)
                .map(|chunk| preprocess_chunk(chunk, &settings, &mut agarwal))
                .collect::<crate::Result<_>>()?
        } else {
            let pool = ThreadPoolBuilder::new()
                .num_threads(settings.workers)
                .build()?;
            pool.install(|| {
                names
                    .par_chunks(batch)
                    .map_init(
                        || {
                            AgarwalSimplifier::new(
                                settings.search_base,
                                settings.search_exponent_step,
                            )
                        },
                        |agarwal, chunk| preprocess_chunk(chunk, &settings, agarwal),
                    )
                    .collect::<crate::Result<_>>()
            })?
        };

        // fold the worker-private accumulators
        let mut bounds = Bounds::default();
        for chunk in chunks {
            self.trajectories.extend(chunk.slots);
            bounds.merge(&chunk.bounds);
            self.learned.merge(&chunk.stats);
        }

        if bounds.is_valid() {
            let mut hash = SpatialHash::new(
                bounds,
                settings.slots_per_dimension,
                settings.hash_tolerance,
            );
            for (index, t) in self.trajectories.iter().enumerate() {
                if let Some(t) = t {
                    hash.insert_trajectory(index, t);
                }
            }
            info!(
                "indexed {} of {} trajectories",
                hash.len() / 2,
                self.trajectories.len()
            );
            self.hash = Some(hash);
        } else {
            warn!("dataset is empty, nothing to index");
        }
        Ok(())
    }

    /// Phase 2: answers every query against the preprocessed dataset and
    /// writes its result file. The learned epsilon table is read-only
    /// from here on.
    pub fn solve(&self, queries: &[Query]) -> crate::Result<Vec<QueryStats>> {
        info_time!("solved {} queries", queries.len());
        let settings = &self.settings;
        let batch = settings.batch_size.max(1);

        if settings.workers <= 1 {
            let mut worker = QueryWorker::new(settings);
            return queries
                .iter()
                .map(|query| self.solve_query(query, &mut worker))
                .collect();
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(settings.workers)
            .build()?;
        let nested: Vec<Vec<QueryStats>> = pool.install(|| {
            queries
                .par_chunks(batch)
                .map_init(
                    || QueryWorker::new(settings),
                    |worker, chunk| {
                        chunk
                            .iter()
                            .map(|query| self.solve_query(query, worker))
                            .collect::<crate::Result<Vec<_>>>()
                    },
                )
                .collect::<crate::Result<_>>()
        })?;
        Ok(nested.into_iter().flatten().collect())
    }

    /// Loads the query trajectory, builds its ladder from the learned
    /// epsilon ratios, prunes the hash candidates and writes the result
    /// file once the pipeline has finished.
    fn solve_query(&self, query: &Query, worker: &mut QueryWorker) -> crate::Result<QueryStats> {
        if query.index % 100 == 0 {
            info!("solving query {}", query.index);
        }

        let path = self.settings.trajectory_dir.join(&query.file);
        let loaded = io::parse_trajectory_file(&path, &query.file)?;

        let mut stats = QueryStats::default();
        let mut matches: Vec<&str> = Vec::new();

        match (&self.hash, loaded) {
            (Some(hash), Some(mut q)) => {
                ladder::simplify_query_trajectory(&mut q, &mut worker.progressive, &self.learned);

                let cdf = &mut worker.cdf;
                hash.range_query(
                    q.start(),
                    q.end(),
                    query.delta,
                    &self.trajectories,
                    |index| {
                        let Some(t) = self.trajectories[index].as_ref() else {
                            return;
                        };
                        if pipeline::resolve(cdf, &q, t, query.delta, &mut stats) {
                            matches.push(&t.name);
                        }
                    },
                );
            }
            (_, None) => debug!("query {}: degenerate trajectory, empty result", query.index),
            (None, _) => {}
        }

        io::write_query_results(&self.settings.output_dir, query.index, &matches)?;
        debug!(
            "query {}: {} candidates, {} matched",
            query.index, stats.candidates, stats.matches
        );
        Ok(stats)
    }

    /// The preprocessed dataset, slots of discarded trajectories
    /// included.
    pub fn trajectories(&self) -> &[Option<Trajectory>] {
        &self.trajectories
    }

    /// The learned epsilon / diagonal ratios.
    pub fn learned(&self) -> &EpsilonStats {
        &self.learned
    }
}

fn preprocess_chunk(
    chunk: &[String],
    settings: &Settings,
    agarwal: &mut AgarwalSimplifier,
) -> crate::Result<ChunkResult> {
    let mut result = ChunkResult {
        slots: Vec::with_capacity(chunk.len()),
        bounds: Bounds::default(),
        stats: EpsilonStats::default(),
    };
    for name in chunk {
        let path = settings.trajectory_dir.join(name);
        match io::parse_trajectory_file(&path, name)? {
            None => {
                debug!("{name}: fewer than two distinct vertices, skipped");
                result.slots.push(None);
            }
            Some(mut t) => {
                result.bounds.merge(&t.bounds);
                ladder::simplify_trajectory(&mut t, agarwal, &mut result.stats, settings);
                result.slots.push(Some(t));
            }
        }
    }
    Ok(result)
}
