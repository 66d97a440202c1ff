//! The assignment problem solved by reduction to a linear program.

use super::{Assignment, AssignmentProblem, NormalizedAssignmentProblem, finalize_assignment};
use crate::E;
use crate::error::SolveResult;
use crate::expr::Expression;
use crate::model::Model;
use crate::options::SolverOptions;

/// Solves `problem` by building one `{0, 1}`-ish variable per cell, a
/// `<= 1` constraint per cell, an `== 1` constraint per row and per
/// column, and minimizing total cost — then, per worker, picks the task
/// with the largest value in that worker's row slice of the LP solution
/// (which lands on an integral assignment-polytope vertex, so the values
/// end up effectively 0/1 without needing an explicit integrality
/// constraint).
pub fn solve_assignment_simplex(problem: &AssignmentProblem) -> SolveResult<Assignment> {
    let normalized = NormalizedAssignmentProblem::from_problem(problem);
    let size = normalized.size();

    let mut model = Model::new("assignment");
    let mut objective = Expression::new();
    let mut variables = vec![vec![None; size]; size];

    for row in 0..size {
        for col in 0..size {
            let var = model.create_variable(format!("x_{row}_{col}"))?;
            objective = objective + Expression::from(var.clone()) * normalized.costs[row][col];
            model.add_constraint(Expression::from(var.clone()).le(1.0));
            variables[row][col] = Some(var);
        }
    }

    for row in 0..size {
        let mut expression = Expression::new();
        for col in 0..size {
            expression = expression + variables[row][col].clone().unwrap();
        }
        model.add_constraint(expression.equal(1.0));
    }

    for col in 0..size {
        let mut expression = Expression::new();
        for row in 0..size {
            expression = expression + variables[row][col].clone().unwrap();
        }
        model.add_constraint(expression.equal(1.0));
    }

    model.minimize(objective);
    let solution = model.solve_with_options(&SolverOptions::default())?;

    let mut raw_task_per_worker = vec![-1i64; size];
    for row in 0..size {
        let mut best_col = 0;
        let mut best_value = E::NEG_INFINITY;
        for col in 0..size {
            let value = solution.value(variables[row][col].clone().unwrap());
            if value > best_value {
                best_value = value;
                best_col = col;
            }
        }
        raw_task_per_worker[row] = best_col as i64;
    }

    Ok(finalize_assignment(&normalized, &raw_task_per_worker))
}
