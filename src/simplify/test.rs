#![cfg(test)]

use approx::assert_relative_eq;
use geo::Point;
use itertools::Itertools;

use crate::model::Trajectory;
use crate::settings::{Settings, NUM_LEVELS};
use crate::simplify::etd::{equal_time, equal_time_distance, Window};
use crate::simplify::ladder;
use crate::simplify::search::{binary_search_real, double_and_search, Refine};
use crate::simplify::{AgarwalSimplifier, EpsilonStats, ProgressiveSimplifier};

fn trajectory(name: &str, coords: &[(f64, f64)]) -> Trajectory {
    Trajectory::from_points(name, coords.iter().map(|&(x, y)| Point::new(x, y)))
        .expect("test trajectory is degenerate")
}

/// A saw-tooth line from (0, 0) to (n - 1, 0) with the given amplitude.
fn zigzag(name: &str, n: usize, amplitude: f64) -> Trajectory {
    let points = (0..n).map(|i| {
        let y = if i % 2 == 0 { 0.0 } else { amplitude };
        Point::new(i as f64, y)
    });
    Trajectory::from_points(name, points).expect("zigzag is degenerate")
}

// --- equal time distance ---------------------------------------------------

#[test]
fn etd_identical_trajectories_is_zero() {
    let t = trajectory("t", &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
    assert_relative_eq!(equal_time(&t, &t), 0.0);
}

#[test]
fn etd_ignores_redundant_vertices_at_equal_speed() {
    // both trace the same segment at the same speed fractions
    let t = trajectory("t", &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
    let q = trajectory("q", &[(0.0, 0.0), (3.0, 0.0)]);
    assert_relative_eq!(equal_time(&t, &q), 0.0);
}

#[test]
fn etd_parallel_lines_is_offset() {
    let t = trajectory("t", &[(0.0, 0.0), (10.0, 0.0)]);
    let q = trajectory("q", &[(0.0, 1.0), (10.0, 1.0)]);
    assert_relative_eq!(equal_time(&t, &q), 1.0);
}

#[test]
fn etd_zigzag_peaks_against_straight_line() {
    let t = trajectory(
        "t",
        &[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (3.0, 1.0), (4.0, 0.0)],
    );
    let q = trajectory("q", &[(0.0, 0.0), (4.0, 0.0)]);
    assert_relative_eq!(equal_time(&t, &q), 1.0);
}

#[test]
fn etd_zero_length_window_falls_back_to_endpoints() {
    let t = trajectory("t", &[(0.0, 0.0), (4.0, 0.0)]);
    let single = Window {
        points: &t.points,
        totals: &t.totals,
        distances: &t.distances,
        start: 1,
        end: 2,
    };
    // one window collapses to the vertex (4, 0)
    assert_relative_eq!(equal_time_distance(Window::full(&t), single), 4.0);
}

#[test]
fn etd_bounds_frechet_from_above() {
    // d_F is 1 here (slide along, pay for the amplitude), ETD is larger
    // because the zigzag burns arc length the straight line does not have
    let t = trajectory(
        "t",
        &[(0.0, 0.0), (2.0, 2.0), (4.0, 0.0), (6.0, 2.0), (8.0, 0.0)],
    );
    let q = trajectory("q", &[(0.0, 1.0), (8.0, 1.0)]);
    assert!(equal_time(&t, &q) >= 1.0);
}

// --- double-and-search -----------------------------------------------------

#[test]
fn double_and_search_finds_the_threshold() {
    for threshold in [0usize, 1, 5, 31, 63, 97, 98] {
        let found = double_and_search(|k| k <= threshold, 0, 99, 2.0, 1.0);
        assert_eq!(found, threshold);
    }
}

#[test]
fn double_and_search_saturates_at_the_range_end() {
    assert_eq!(double_and_search(|_| true, 1, 50, 2.0, 1.0), 49);
}

#[test]
fn double_and_search_stays_at_start_when_nothing_more_fits() {
    assert_eq!(double_and_search(|k| k <= 3, 3, 100, 2.0, 1.0), 3);
}

#[test]
fn binary_search_real_converges() {
    let mut probes = 0;
    let mut last = 0.0;
    binary_search_real(
        |value| {
            probes += 1;
            last = value;
            if probes == 40 {
                Refine::Stop
            } else if value * value < 2.0 {
                Refine::Up
            } else {
                Refine::Down
            }
        },
        2.0,
        0.0,
    );
    assert_relative_eq!(last, std::f64::consts::SQRT_2, epsilon = 1e-9);
}

// --- agarwal ---------------------------------------------------------------

#[test]
fn simplification_keeps_the_endpoints() {
    let t = zigzag("t", 40, 0.3);
    let mut agarwal = AgarwalSimplifier::default();
    let simp = agarwal.simplify(&t, 1.0);

    assert!(simp.len() >= 2);
    assert!(simp.len() < t.len());
    assert_eq!(simp.points[0], t.points[0]);
    assert_eq!(*simp.points.last().unwrap(), *t.points.last().unwrap());
    assert_eq!(simp.epsilon, Some(1.0));
    assert!(simp.source_index.iter().tuple_windows().all(|(a, b)| a < b));
}

#[test]
fn simplification_segments_respect_epsilon() {
    let epsilon = 0.75;
    let t = zigzag("t", 60, 0.4);
    let mut agarwal = AgarwalSimplifier::default();
    let simp = agarwal.simplify(&t, epsilon);

    for j in 0..simp.len() - 1 {
        let bound = equal_time_distance(
            Window {
                points: &t.points,
                totals: &t.totals,
                distances: &t.distances,
                start: simp.source_index[j],
                end: simp.source_index[j + 1] + 1,
            },
            Window {
                points: &simp.points,
                totals: &simp.totals,
                distances: &simp.distances,
                start: j,
                end: j + 2,
            },
        );
        assert!(
            bound <= epsilon + 1e-12,
            "segment {j} exceeds epsilon: {bound}"
        );
    }
}

#[test]
fn simplification_arc_length_tables_are_consistent() {
    let t = zigzag("t", 50, 0.5);
    let mut agarwal = AgarwalSimplifier::default();
    let simp = agarwal.simplify(&t, 0.8);

    assert_eq!(simp.distances[0], 0.0);
    for (j, (a, b)) in simp.totals.iter().tuple_windows().enumerate() {
        assert_relative_eq!(b - a, simp.distances[j + 1]);
        let step = crate::geom::dist_sq(simp.points[j], simp.points[j + 1]).sqrt();
        assert_relative_eq!(simp.distances[j + 1], step);
    }
}

#[test]
fn simplifying_with_zero_epsilon_is_identity() {
    let t = zigzag("t", 25, 0.7);
    let mut agarwal = AgarwalSimplifier::default();
    let simp = agarwal.simplify(&t, 0.0);
    assert_eq!(simp.points, t.points);
}

// --- progressive -----------------------------------------------------------

#[test]
fn progressive_portals_store_the_exact_shortcut_cost() {
    let t = zigzag("t", 40, 0.3);
    let mut progressive = ProgressiveSimplifier::default();
    let simp = progressive.simplify(&t, &t, 0.9);

    assert!(!simp.portals.is_empty());
    for portal in &simp.portals {
        let segment = [t.points[portal.source], t.points[portal.destination]];
        let distances = [0.0, crate::geom::dist_sq(segment[0], segment[1]).sqrt()];
        let totals = [0.0, distances[1]];

        let window_end = if portal.destination + 1 >= t.len() {
            t.len()
        } else {
            t.source_index[portal.destination + 1]
        };
        let recomputed = equal_time_distance(
            Window {
                points: &t.points,
                totals: &t.totals,
                distances: &t.distances,
                start: t.source_index[portal.source],
                end: window_end,
            },
            Window {
                points: &segment,
                totals: &totals,
                distances: &distances,
                start: 0,
                end: 2,
            },
        );
        assert_relative_eq!(portal.distance, recomputed, epsilon = 1e-12);
    }
}

#[test]
fn progressive_maps_source_indices_through_the_parent() {
    let t = zigzag("t", 50, 0.4);
    let mut progressive = ProgressiveSimplifier::default();
    let parent = progressive.simplify(&t, &t, 0.6);
    let child = progressive.simplify(&parent, &t, 1.2);

    assert!(child.len() <= parent.len());
    // every child vertex refers back to the original trajectory
    for (point, &source) in child.points.iter().zip(child.source_index.iter()) {
        assert_eq!(*point, t.points[source]);
    }
    assert!(child.source_index.iter().tuple_windows().all(|(a, b)| a < b));
}

// --- ladders ---------------------------------------------------------------

#[test]
fn dataset_ladder_has_all_levels_and_learns_ratios() {
    let mut t = zigzag("t", 200, 0.2);
    let mut agarwal = AgarwalSimplifier::default();
    let mut stats = EpsilonStats::default();
    let settings = Settings::default();

    ladder::simplify_trajectory(&mut t, &mut agarwal, &mut stats, &settings);

    assert_eq!(t.simplifications.len(), NUM_LEVELS);
    for simp in &t.simplifications {
        assert!(simp.len() >= 2);
        assert_eq!(simp.points[0], t.points[0]);
        assert_eq!(simp.points.last(), t.points.last());
        assert!(simp.epsilon.is_some());
    }
    assert_eq!(stats.samples(), 1);
    for level in 0..NUM_LEVELS {
        assert!(stats.ratio(level) > 0.0);
    }
    // the plain simplifier records no probes, so nothing to jump through
    assert!(t.shortcuts.is_empty());
}

#[test]
fn query_ladder_reuses_learned_ratios_and_harvests_shortcuts() {
    let settings = Settings::default();
    let mut agarwal = AgarwalSimplifier::default();
    let mut stats = EpsilonStats::default();

    let mut dataset = zigzag("d", 150, 0.25);
    ladder::simplify_trajectory(&mut dataset, &mut agarwal, &mut stats, &settings);

    let mut q = zigzag("q", 120, 0.3);
    let mut progressive = ProgressiveSimplifier::default();
    ladder::simplify_query_trajectory(&mut q, &mut progressive, &stats);

    assert_eq!(q.simplifications.len(), NUM_LEVELS);
    let diagonal = q.diagonal();
    for (level, simp) in q.simplifications.iter().enumerate() {
        // no epsilon search on the query side, the learned ratio is applied
        assert_relative_eq!(
            simp.epsilon.unwrap(),
            diagonal * stats.ratio(level),
            epsilon = 1e-12
        );
    }
    // nested ladders exist purely for their freespace jumps
    for (level, simp) in q.simplifications.iter().enumerate() {
        let expected = level.saturating_sub(1);
        assert_eq!(simp.simplifications.len(), expected);
    }
    // buckets are deduplicated and sorted by destination
    for bucket in q.shortcuts.values() {
        assert!(bucket
            .iter()
            .tuple_windows()
            .all(|(a, b)| a.destination < b.destination));
        assert!(bucket.iter().all(|p| p.destination - p.source > 1));
    }
}

#[test]
fn epsilon_stats_merge_matches_sequential_accumulation() {
    let settings = Settings::default();

    let mut sequential = EpsilonStats::default();
    let mut agarwal = AgarwalSimplifier::default();
    let mut a = zigzag("a", 90, 0.2);
    let mut b = zigzag("b", 130, 0.6);
    ladder::simplify_trajectory(&mut a, &mut agarwal, &mut sequential, &settings);
    ladder::simplify_trajectory(&mut b, &mut agarwal, &mut sequential, &settings);

    // workers accumulate privately and merge at join
    let mut left = EpsilonStats::default();
    let mut right = EpsilonStats::default();
    let mut a2 = zigzag("a", 90, 0.2);
    let mut b2 = zigzag("b", 130, 0.6);
    ladder::simplify_trajectory(&mut a2, &mut agarwal, &mut left, &settings);
    ladder::simplify_trajectory(&mut b2, &mut agarwal, &mut right, &settings);
    left.merge(&right);

    assert_eq!(left.samples(), sequential.samples());
    for level in 0..NUM_LEVELS {
        assert_relative_eq!(left.ratio(level), sequential.ratio(level));
    }
}
