//! The Hungarian (Kuhn-Munkres) algorithm for the assignment problem.

use std::collections::{HashMap, HashSet};

use super::{Assignment, AssignmentProblem, NormalizedAssignmentProblem, finalize_assignment};
use crate::E;
use crate::options::SolverOptions;

const EPSILON: E = SolverOptions::DEFAULT_EPSILON;

/// Solves `problem` with the Hungarian algorithm: repeatedly extract
/// row/column minima, try to find a complete zero-cost assignment, and if
/// one isn't yet possible, uncover new zeros by crossing out lines and
/// adjusting the uncovered minimum.
pub fn solve_hungarian(problem: &AssignmentProblem) -> Assignment {
    let normalized = NormalizedAssignmentProblem::from_problem(problem);
    let mut costs = normalized.costs.clone();

    loop {
        extract_mins(&mut costs);
        tracing::trace!("reduced rows and columns to create zeros");

        let max_assignment = find_max_assignment(&costs);
        tracing::debug!(
            matched = max_assignment.len(),
            size = normalized.size(),
            "built zero-cost assignment"
        );
        if max_assignment.len() == normalized.size() {
            return create_assignment(&normalized, &max_assignment);
        }

        add_zero_by_crossing_out(&mut costs, &max_assignment);
        tracing::trace!("covered zeros and uncovered a new minimum");
    }
}

/// Subtracts the row minimum from every row, then the column minimum from
/// every column. The subtraction always runs, even when the minimum is
/// `0.0` — a no-op in that case, but kept unconditional for regularity
/// rather than special-cased away.
fn extract_mins(costs: &mut [Vec<E>]) {
    let height = costs.len();
    let width = costs[0].len();

    for row in costs.iter_mut() {
        let minimum = row.iter().copied().fold(E::INFINITY, E::min);
        for value in row.iter_mut() {
            *value -= minimum;
        }
    }

    for col in 0..width {
        let minimum = (0..height).map(|r| costs[r][col]).fold(E::INFINITY, E::min);
        for row in 0..height {
            costs[row][col] -= minimum;
        }
    }
}

/// Greedily builds the largest possible zero-cost assignment: repeatedly
/// picks the not-yet-assigned row with the fewest available zero columns
/// (ties broken by row iteration order), assigning it to the first such
/// column not already claimed. This can under-assign; the outer loop in
/// [`solve_hungarian`] corrects that with another covering pass.
///
/// Returns a `col -> row` map, not `row -> col`.
fn find_max_assignment(costs: &[Vec<E>]) -> HashMap<usize, usize> {
    let size = costs.len();
    let mut coords: HashMap<usize, usize> = HashMap::new();

    loop {
        let assigned_rows: HashSet<usize> = coords.values().copied().collect();
        let mut min_zeros = usize::MAX;
        let mut best: Option<(usize, usize)> = None;

        for row in 0..size {
            if assigned_rows.contains(&row) {
                continue;
            }
            let available_zero_cols: Vec<usize> = (0..size)
                .filter(|&col| costs[row][col].abs() < EPSILON && !coords.contains_key(&col))
                .collect();

            if available_zero_cols.len() < min_zeros {
                if let Some(&col) = available_zero_cols.first() {
                    min_zeros = available_zero_cols.len();
                    best = Some((row, col));
                }
            }
        }

        match best {
            Some((row, col)) => {
                coords.insert(col, row);
            }
            None => break,
        }
    }

    coords
}

/// Marks uncovered rows, then columns with a zero in a marked row, then
/// rows assigned to a newly-marked column; "covered" rows/columns are
/// everything left unmarked (rows) or marked (columns). Subtracts the
/// minimum uncovered value from every cell, then adds it back to every
/// covered-row cell and every covered-column cell: doubly-covered cells
/// net `+minimum`, singly-covered cells net unchanged, uncovered cells
/// net `-minimum` — standard Hungarian line-crossing.
fn add_zero_by_crossing_out(costs: &mut [Vec<E>], partial_assignment: &HashMap<usize, usize>) {
    let size = costs.len();
    let assigned_rows: HashSet<usize> = partial_assignment.values().copied().collect();

    let mut horizontal: Vec<usize> = (0..size).filter(|r| !assigned_rows.contains(r)).collect();
    let mut vertical: Vec<usize> = Vec::new();

    loop {
        let mut newly_marked = 0;
        for col in 0..size {
            let has_zero_in_marked_row = horizontal.iter().any(|&row| costs[row][col].abs() < EPSILON);
            if has_zero_in_marked_row {
                vertical.push(col);
                newly_marked += 1;
            }
        }
        for &col in vertical.clone().iter() {
            if let Some(&row) = partial_assignment.get(&col) {
                horizontal.push(row);
            }
        }
        if newly_marked > 0 {
            break;
        }
    }

    let covered_rows: HashSet<usize> = (0..size).filter(|r| !horizontal.contains(r)).collect();
    let covered_cols: HashSet<usize> = vertical.into_iter().collect();

    let mut minimum = E::INFINITY;
    for row in 0..size {
        for col in 0..size {
            if covered_rows.contains(&row) || covered_cols.contains(&col) {
                continue;
            }
            if costs[row][col] < minimum {
                minimum = costs[row][col];
            }
        }
    }

    for row in costs.iter_mut() {
        for value in row.iter_mut() {
            *value -= minimum;
        }
    }
    for &row in &covered_rows {
        for value in costs[row].iter_mut() {
            *value += minimum;
        }
    }
    for &col in &covered_cols {
        for row in 0..size {
            costs[row][col] += minimum;
        }
    }
}

fn create_assignment(
    normalized: &NormalizedAssignmentProblem<'_>,
    coords: &HashMap<usize, usize>,
) -> Assignment {
    let mut raw_task_per_worker = vec![-1i64; normalized.size()];
    for (&col, &row) in coords {
        raw_task_per_worker[row] = col as i64;
    }
    finalize_assignment(normalized, &raw_task_per_worker)
}
