//! The linear assignment problem: a square (after padding) worker-by-task
//! cost matrix, solved either by the Hungarian algorithm or by reduction
//! to an LP.

mod hungarian;
mod simplex_solver;

pub use hungarian::solve_hungarian;
pub use simplex_solver::solve_assignment_simplex;

use crate::E;
use crate::error::{SolveError, SolveResult};

/// A worker-by-task cost matrix; need not be square. `costs[w][t]` is the
/// cost of assigning worker `w` to task `t`.
#[derive(Debug, Clone)]
pub struct AssignmentProblem {
    costs: Vec<Vec<E>>,
}

impl AssignmentProblem {
    /// Builds a problem from a dense cost matrix. Every row must have the
    /// same length and there must be at least one worker and one task.
    pub fn new(costs: Vec<Vec<E>>) -> SolveResult<Self> {
        if costs.is_empty() || costs[0].is_empty() {
            return Err(SolveError::InvalidInput(
                "assignment problem needs at least one worker and one task".into(),
            ));
        }
        let width = costs[0].len();
        if costs.iter().any(|row| row.len() != width) {
            return Err(SolveError::InvalidInput(
                "every row of the cost matrix must have the same length".into(),
            ));
        }

        Ok(Self { costs })
    }

    pub fn n_workers(&self) -> usize {
        self.costs.len()
    }

    pub fn n_tasks(&self) -> usize {
        self.costs[0].len()
    }

    pub fn cost(&self, worker: usize, task: usize) -> E {
        self.costs[worker][task]
    }
}

/// An assignment of tasks to workers: `task_per_worker[w]` is the task
/// assigned to worker `w`, or `-1` if that worker has no assigned task
/// (possible only when there are more workers than tasks).
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub task_per_worker: Vec<i64>,
    pub total_cost: E,
}

/// Pads a (possibly rectangular) [`AssignmentProblem`] out to a square
/// matrix, filling the padding with `-1.0` — a sentinel that both solvers
/// treat as "no real task here" (never counted into `total_cost`, and
/// never reported as a real assignment).
struct NormalizedAssignmentProblem<'p> {
    original: &'p AssignmentProblem,
    costs: Vec<Vec<E>>,
}

impl<'p> NormalizedAssignmentProblem<'p> {
    fn from_problem(problem: &'p AssignmentProblem) -> Self {
        let size = problem.n_workers().max(problem.n_tasks());
        let mut costs = vec![vec![-1.0; size]; size];
        for worker in 0..problem.n_workers() {
            for task in 0..problem.n_tasks() {
                costs[worker][task] = problem.cost(worker, task);
            }
        }
        Self {
            original: problem,
            costs,
        }
    }

    fn size(&self) -> usize {
        self.costs.len()
    }
}

/// Builds the final per-worker assignment and total cost from a raw
/// `task_per_worker` vector over the padded square matrix, dropping any
/// assignment to a padding task and any negative (padding) cost.
fn finalize_assignment(
    normalized: &NormalizedAssignmentProblem<'_>,
    raw_task_per_worker: &[i64],
) -> Assignment {
    let n_workers = normalized.original.n_workers();
    let n_tasks = normalized.original.n_tasks();

    let mut task_per_worker = vec![-1i64; n_workers];
    for worker in 0..n_workers {
        let task = raw_task_per_worker[worker];
        if task >= 0 && (task as usize) < n_tasks {
            task_per_worker[worker] = task;
        }
    }

    let mut total_cost = 0.0;
    for (worker, &task) in task_per_worker.iter().enumerate() {
        if task >= 0 {
            let c = normalized.original.cost(worker, task as usize);
            if c >= 0.0 {
                total_cost += c;
            }
        }
    }

    Assignment {
        task_per_worker,
        total_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_ragged_cost_matrix() {
        let problem = AssignmentProblem::new(vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(problem, Err(SolveError::InvalidInput(_))));
    }

    #[test]
    fn padding_fills_rectangular_problems_with_sentinel() {
        let problem = AssignmentProblem::new(vec![vec![1.0, 2.0, 3.0]]).unwrap();
        let normalized = NormalizedAssignmentProblem::from_problem(&problem);
        assert_eq!(normalized.size(), 3);
        assert_eq!(normalized.costs[1][0], -1.0);
        assert_eq!(normalized.costs[0][0], 1.0);
    }
}
