// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use crate::core::DistanceGrid;

/// Solve the first-order upwind eikonal update for a single cell.
///
/// `dhoriz` and `dvert` are the smaller neighbour distances along each axis
/// (`+inf` if neither neighbour is reached) and `cost` is the local cost. Solves
/// `(u - dhoriz)^2 + (u - dvert)^2 = cost^2` when it has a real root, and falls
/// back to the 1D update along the cheaper axis otherwise.
pub fn solve_2d(dhoriz: f64, dvert: f64, cost: f64) -> f64 {
    if dhoriz.is_infinite() && dvert.is_infinite() {
        return f64::INFINITY;
    }
    // One axis unreached: the quadratic has no real root, use the other axis
    if dhoriz.is_infinite() {
        return dvert + cost;
    }
    if dvert.is_infinite() {
        return dhoriz + cost;
    }

    let det = 2.0 * dvert * dhoriz - dvert * dvert - dhoriz * dhoriz + 2.0 * cost * cost;
    if det >= 0.0 {
        0.5 * (dhoriz + dvert + det.sqrt())
    } else {
        dhoriz.min(dvert) + cost
    }
}

/// Eikonal update from the four axis neighbours of a cell.
///
/// Out-of-bounds or unreached neighbours are passed as `+inf`.
#[inline]
pub fn eikonal_update(dleft: f64, dright: f64, dup: f64, ddown: f64, cost: f64) -> f64 {
    solve_2d(dleft.min(dright), dup.min(ddown), cost)
}

/// Compute the tentative distance for cell `id` (column `x`) from the
/// current state of its neighbours.
pub fn update_cell(grid: &DistanceGrid, cost: &[f64], id: usize, x: usize) -> f64 {
    let cols = grid.cols();
    let num_cells = grid.num_cells();

    let dleft = if x > 0 {
        grid.distance_or_inf(id - 1)
    } else {
        f64::INFINITY
    };
    let dright = if x + 1 < cols {
        grid.distance_or_inf(id + 1)
    } else {
        f64::INFINITY
    };
    let dup = if id >= cols {
        grid.distance_or_inf(id - cols)
    } else {
        f64::INFINITY
    };
    let ddown = if id + cols < num_cells {
        grid.distance_or_inf(id + cols)
    } else {
        f64::INFINITY
    };

    eikonal_update(dleft, dright, dup, ddown, cost[id])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DistanceGrid;

    #[test]
    fn solve_2d_known_case() {
        // Both axes at 0, cost 1: u = sqrt(2)/2
        let u = solve_2d(0.0, 0.0, 1.0);
        assert!((u - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn solve_2d_diagonal_of_unit_source() {
        // Both axes at 1, cost 1: 0.5 * (2 + sqrt(2))
        let u = solve_2d(1.0, 1.0, 1.0);
        assert!((u - 0.5 * (2.0 + 2.0_f64.sqrt())).abs() < 1e-12);
    }

    #[test]
    fn solve_2d_fallback_negative_determinant() {
        // det = 2 - 10000 < 0: 1D update along the cheaper axis
        let u = solve_2d(0.0, 100.0, 1.0);
        assert!((u - 1.0).abs() < 1e-12);
        let u = solve_2d(100.0, 0.0, 1.0);
        assert!((u - 1.0).abs() < 1e-12);
    }

    #[test]
    fn solve_2d_both_infinite() {
        assert!(solve_2d(f64::INFINITY, f64::INFINITY, 1.0).is_infinite());
    }

    #[test]
    fn solve_2d_one_infinite() {
        let u = solve_2d(f64::INFINITY, 5.0, 1.5);
        assert!((u - 6.5).abs() < 1e-12);
        let u = solve_2d(2.0, f64::INFINITY, 0.25);
        assert!((u - 2.25).abs() < 1e-12);
    }

    #[test]
    fn solve_2d_zero_cost_keeps_distance() {
        assert_eq!(solve_2d(3.0, 3.0, 0.0), 3.0);
        assert_eq!(solve_2d(f64::INFINITY, 0.0, 0.0), 0.0);
    }

    #[test]
    fn eikonal_update_uses_upwind_neighbours() {
        // The smaller of each opposing pair is used
        let u = eikonal_update(4.0, 1.0, f64::INFINITY, 9.0, 1.0);
        let expected = solve_2d(1.0, 9.0, 1.0);
        assert_eq!(u, expected);
        assert!((u - 2.0).abs() < 1e-12);
    }

    #[test]
    fn update_cell_reads_in_bounds_neighbours() {
        // 3x3 grid, seed at centre (id 4)
        let mut grid = DistanceGrid::new(3, 3);
        grid.set_distance(4, 0.0);
        let cost = vec![1.0; 9];

        // Axis neighbours of the seed
        for (id, x) in [(1, 1), (3, 0), (5, 2), (7, 1)] {
            let u = update_cell(&grid, &cost, id, x);
            assert!((u - 1.0).abs() < 1e-12, "id={} u={}", id, u);
        }

        // Corner has no reached neighbour yet
        assert!(update_cell(&grid, &cost, 0, 0).is_infinite());
    }

    #[test]
    fn update_cell_does_not_wrap_rows() {
        // 2x3 grid: id 3 is (0, 1); id 2 is (2, 0) and must not count as its left
        let mut grid = DistanceGrid::new(2, 3);
        grid.set_distance(2, 0.0);
        let cost = vec![1.0; 6];
        assert!(update_cell(&grid, &cost, 3, 0).is_infinite());
        // (2, 0) is directly above (2, 1) = id 5
        assert!((update_cell(&grid, &cost, 5, 2) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn no_nan_produced() {
        let inf = f64::INFINITY;
        let cases = [
            (0.0, 0.0, 1.0),
            (1.0, 1.0, 1.0),
            (inf, 0.0, 1.0),
            (0.0, inf, 1.0),
            (inf, inf, 1.0),
            (0.0, 0.0, 0.0),
            (0.0, 0.0, 1e-3),
            (0.0, 0.0, 1e3),
            (1e300, 1e300, 1.0),
        ];
        for (h, v, c) in cases {
            let u = solve_2d(h, v, c);
            assert!(!u.is_nan(), "NaN for solve_2d({}, {}, {})", h, v, c);
        }
    }
}
