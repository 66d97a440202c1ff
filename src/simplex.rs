//! The two-phase tableau simplex solver: `normalize`, an
//! artificial-variable `presolve` when no basic feasible tableau is
//! obvious, and `optimize`.

use std::collections::HashMap;

use faer::Mat;

use crate::E;
use crate::error::{SolveError, SolveResult};
use crate::expr::{Expression, Relation, Sense, Variable};
use crate::model::Model;
use crate::options::SolverOptions;
use crate::tableau::Tableau;

/// The result of solving a [`Model`]: the variable assignment, the
/// objective value, and the machinery that produced them.
///
/// `tableau` and `normalized_model` are exposed so callers can feed them
/// into sensitivity analysis without re-solving.
#[derive(Debug, Clone)]
pub struct Solution {
    assignment: Vec<E>,
    tableau: Tableau,
    normalized_model: Model,
    original_sense: Sense,
}

impl Solution {
    /// The value assigned to `var` in the original model's coordinates.
    pub fn value(&self, var: Variable) -> E {
        self.assignment.get(var.index()).copied().unwrap_or(0.0)
    }

    /// The optimal objective value, in the original model's sense.
    ///
    /// The tableau always carries the value of the normalized
    /// maximization (the original objective negated first if it was a
    /// `MIN`), so a `MIN` model's true objective is the negation of
    /// `tableau.cost()`.
    pub fn objective_value(&self) -> E {
        match self.original_sense {
            Sense::Max => self.tableau.cost(),
            Sense::Min => -self.tableau.cost(),
        }
    }

    /// The tableau in its final, optimal state.
    pub fn tableau(&self) -> &Tableau {
        &self.tableau
    }

    /// The normalized (standard-form-plus-slacks) model the tableau was
    /// built from.
    pub fn normalized_model(&self) -> &Model {
        &self.normalized_model
    }
}

/// Maps a variable's column index to the row of the constraint it was
/// introduced for (slack, surplus, or artificial).
type RowMap = HashMap<usize, usize>;

struct Normalized {
    model: Model,
    slack: RowMap,
    surplus: RowMap,
}

/// Deep-copies `model`, flips `MIN` to `MAX`, inverts any constraint with
/// a negative bound, and adds a slack variable to every `LE` row and a
/// surplus variable to every `GE` row.
fn normalize(model: &Model) -> SolveResult<Normalized> {
    let mut normal = model.simplified_with_max_objective();

    for constraint in normal.constraints_mut() {
        if constraint.bound < 0.0 {
            *constraint = constraint.invert();
        }
    }

    let mut slack = RowMap::new();
    let mut surplus = RowMap::new();

    let rows: Vec<Relation> = normal.constraints().iter().map(|c| c.relation).collect();
    for (row, relation) in rows.into_iter().enumerate() {
        match relation {
            Relation::Le => {
                let var = normal.create_variable(format!("s{}", row + 1))?;
                let expr = normal.constraints()[row].expression.clone() + Expression::from(var.clone());
                normal.set_constraint_expression(row, expr);
                slack.insert(var.index(), row);
            }
            Relation::Ge => {
                let var = normal.create_variable(format!("e{}", row + 1))?;
                let expr = normal.constraints()[row].expression.clone() - Expression::from(var.clone());
                normal.set_constraint_expression(row, expr);
                surplus.insert(var.index(), row);
            }
            Relation::Eq => {}
        }
    }

    Ok(Normalized {
        model: normal,
        slack,
        surplus,
    })
}

/// Builds the initial `(m+1) x (n+1)` tableau for `model`'s current
/// variable list, constraints, and objective: row 0 is `-c` (objective
/// coefficients, negated, since the tableau drives toward `cost >= 0`),
/// rows `1..=m` are each constraint's coefficient row plus its bound.
fn build_tableau(model: &Model, epsilon: E) -> Tableau {
    let n = model.variables().len();
    let m = model.constraints().len();
    let objective = model.objective().expect("build_tableau requires an objective");

    let c = objective.expression.factors(model);
    let mut rows: Vec<Vec<E>> = Vec::with_capacity(m + 1);

    let mut cost_row = vec![0.0; n + 1];
    for (j, &coeff) in c.iter().enumerate() {
        cost_row[j] = -coeff;
    }
    rows.push(cost_row);

    for constraint in model.constraints() {
        let mut row = constraint.expression.factors(model);
        row.push(constraint.bound);
        rows.push(row);
    }

    let table = Mat::from_fn(m + 1, n + 1, |i, j| rows[i][j]);
    Tableau::new(table, epsilon)
}

/// Runs [`Tableau::pivot`] until optimal, signaling
/// [`SolveError::Unbounded`] if an unbounded entering column is found.
fn optimize(tableau: &mut Tableau) -> SolveResult<()> {
    while !tableau.is_optimal() {
        let col = tableau.choose_entering_variable();
        if tableau.is_unbounded(col) {
            return Err(SolveError::Unbounded);
        }
        let row = tableau.choose_leaving_variable(col);
        tableau.pivot(row, col);
    }
    Ok(())
}

/// Adds an artificial variable (coefficient `+1`) to every `GE`/`EQ` row,
/// solves the phase-1 objective `max -sum(artificials)`, and returns the
/// phase-2-ready model and tableau (or `Infeasible`).
fn presolve(normal: &Normalized, epsilon: E) -> SolveResult<(Model, Tableau)> {
    let mut presolve_model = normal.model.clone();
    let mut artificial = RowMap::new();

    let rows: Vec<Relation> = presolve_model
        .constraints()
        .iter()
        .map(|c| c.relation)
        .collect();
    for (row, relation) in rows.into_iter().enumerate() {
        if relation == Relation::Ge || relation == Relation::Eq {
            let var = presolve_model.create_variable(format!("a{}", row + 1))?;
            let expr = presolve_model.constraints()[row].expression.clone() + Expression::from(var.clone());
            presolve_model.set_constraint_expression(row, expr);
            artificial.insert(var.index(), row);
        }
    }

    let n = presolve_model.variables().len();
    let phase1_objective = {
        let mut expr = Expression::new();
        for &var_index in artificial.keys() {
            expr = expr + Expression::from(presolve_model.variables()[var_index].clone()) * -1.0;
        }
        expr
    };
    let mut phase1_model = presolve_model.clone();
    phase1_model.maximize(phase1_objective);

    let mut tableau = build_tableau(&phase1_model, epsilon);

    // Fix the basis: every artificial variable starts basic with cost -1,
    // so the cost row is not yet zero on those columns. Subtract the
    // corresponding constraint row from the cost row for each.
    for &row in artificial.values() {
        let mut cost_row = Vec::with_capacity(n + 1);
        for j in 0..=n {
            cost_row.push(tableau.get(0, j) - tableau.get(row + 1, j));
        }
        for (j, value) in cost_row.into_iter().enumerate() {
            tableau.table_mut()[(0, j)] = value;
        }
    }

    optimize(&mut tableau)?;

    if tableau.cost().abs() > epsilon {
        tracing::debug!(cost = tableau.cost(), "phase-1 objective nonzero, infeasible");
        return Err(SolveError::Infeasible);
    }

    let basis = tableau.extract_basis();
    let assignment = tableau.extract_solution();
    for (row, &col) in basis.iter().enumerate() {
        if col >= 0 && artificial.contains_key(&(col as usize)) && assignment[col as usize] > epsilon {
            tracing::debug!(row, value = assignment[col as usize], "artificial variable still basic");
            return Err(SolveError::Infeasible);
        }
    }

    // Drop the artificial columns from both the model and the tableau.
    let kept_vars: Vec<usize> = (0..n).filter(|j| !artificial.contains_key(j)).collect();
    let m = presolve_model.constraints().len();
    let reduced = Mat::from_fn(m + 1, kept_vars.len() + 1, |i, out_j| {
        if out_j == kept_vars.len() {
            tableau.get(i, n)
        } else {
            tableau.get(i, kept_vars[out_j])
        }
    });

    let mut phase2_model = presolve_model.clone();
    phase2_model.set_objective(
        normal
            .model
            .objective()
            .expect("normalized model always carries an objective")
            .clone(),
    );
    phase2_model.retain_variables(&kept_vars);

    let mut phase2_tableau = Tableau::new(reduced, epsilon);

    // Replace the cost row with the negated phase-2 objective, then fix
    // it to the current basis.
    let objective = phase2_model
        .objective()
        .expect("phase2_model has an objective")
        .clone();
    let c = objective.expression.factors(&phase2_model);
    for (j, &coeff) in c.iter().enumerate() {
        phase2_tableau.table_mut()[(0, j)] = -coeff;
    }
    let last_col = phase2_tableau.n_vars();
    phase2_tableau.table_mut()[(0, last_col)] = 0.0;

    let basis = phase2_tableau.extract_basis();
    for (row, &col) in basis.iter().enumerate() {
        if col < 0 {
            continue;
        }
        let factor = phase2_tableau.get(0, col as usize);
        if factor == 0.0 {
            continue;
        }
        for j in 0..=last_col {
            let pivot_val = phase2_tableau.get(row + 1, j);
            phase2_tableau.table_mut()[(0, j)] -= factor * pivot_val;
        }
    }

    Ok((phase2_model, phase2_tableau))
}

/// Solves `model` with `options`: normalize, (maybe) presolve, optimize,
/// translate back.
pub fn solve(model: &Model, options: &SolverOptions) -> SolveResult<Solution> {
    let epsilon = options.epsilon;
    let original_sense = model
        .objective()
        .expect("Model::solve_with_options already rejects a missing objective")
        .sense;
    let normal = normalize(model)?;

    let needs_presolve = normal.model.constraints().len() != normal.slack.len();

    let (final_model, mut tableau) = if needs_presolve {
        tracing::debug!("running presolve for artificial-variable phase 1");
        presolve(&normal, epsilon)?
    } else {
        (normal.model.clone(), build_tableau(&normal.model, epsilon))
    };

    optimize(&mut tableau)?;

    let full_assignment = tableau.extract_solution();
    let mut assignment = vec![0.0; model.variables().len()];
    assignment[..model.variables().len().min(full_assignment.len())]
        .copy_from_slice(&full_assignment[..model.variables().len().min(full_assignment.len())]);

    Ok(Solution {
        assignment,
        tableau,
        normalized_model: final_model,
        original_sense,
    })
}
