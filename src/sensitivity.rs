//! Objective-coefficient sensitivity analysis: for each objective
//! coefficient, the interval it can move within while the current
//! optimal basis stays optimal.

use crate::E;
use crate::simplex::Solution;

/// For each objective coefficient, the `(lower, upper)` bound it can take
/// while the solution's basis stays optimal. `E::NEG_INFINITY`/`E::INFINITY`
/// mean that side is unbounded.
pub fn analyze_objective_sensitivity(solution: &Solution) -> Vec<(E, E)> {
    let model = solution.normalized_model();
    let tableau = solution.tableau();
    let objective = model
        .objective()
        .expect("a solved model always carries an objective");
    let obj_coeffs = objective.expression.factors(model);

    let basis = tableau.extract_basis();
    let n_vars = tableau.n_vars();
    let final_obj_coeffs: Vec<E> = (0..n_vars).map(|j| tableau.get(0, j)).collect();

    let mut ranges = Vec::with_capacity(obj_coeffs.len());
    for (i, &coeff) in obj_coeffs.iter().enumerate() {
        let basis_row = basis.iter().position(|&col| col == i as i64);
        match basis_row {
            Some(row) => ranges.push(calculate_deltas(tableau, row + 1, i, coeff)),
            None => ranges.push((E::NEG_INFINITY, coeff + final_obj_coeffs[i])),
        }
    }

    ranges
}

/// For the basic variable at column `col_index` (with current objective
/// coefficient `coeff`), basic in tableau row `basis_row`, finds how far
/// `coeff` can move while every other cost-row entry stays `>= 0`: one
/// delta bound per non-basic column, bucketed by the sign of that
/// column's entry in `basis_row`.
fn calculate_deltas(
    tableau: &crate::tableau::Tableau,
    basis_row: usize,
    col_index: usize,
    coeff: E,
) -> (E, E) {
    let n_vars = tableau.n_vars();
    let mut ge_deltas: Vec<E> = Vec::new();
    let mut le_deltas: Vec<E> = Vec::new();

    for index in 0..n_vars {
        if index == col_index {
            continue;
        }
        let given = tableau.get(basis_row, index);
        if given == 0.0 {
            continue;
        }

        let result = (-1.0 / given) * tableau.get(0, index);
        if given > 0.0 {
            ge_deltas.push(result);
        } else {
            le_deltas.push(result);
        }
    }

    let left = ge_deltas
        .into_iter()
        .fold(None, |acc: Option<E>, v| Some(acc.map_or(v, |a| a.max(v))))
        .map_or(E::NEG_INFINITY, |delta| coeff + delta);

    let right = le_deltas
        .into_iter()
        .fold(None, |acc: Option<E>, v| Some(acc.map_or(v, |a| a.min(v))))
        .map_or(E::INFINITY, |delta| coeff + delta);

    (left, right)
}
