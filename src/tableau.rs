//! The simplex tableau: a dense `(m+1) x (n+1)` coefficient matrix with
//! pivot, basis-extraction, and optimality/unboundedness predicates.
//!
//! Row 0 is the cost row, rows `1..=m` correspond one-to-one with
//! constraints, and column `n` (the last) is the right-hand-side `b`.
//! [`Tableau`] only wraps and manipulates the matrix; building the initial
//! matrix from a [`Model`](crate::model::Model) (the cost row's sign
//! convention, slack/surplus/artificial columns, etc.) is the simplex
//! solver's job.

use faer::Mat;

use crate::E;

/// A dense simplex tableau.
///
/// Basis detection (`extract_basis`) and the optimality/unboundedness
/// predicates compare floats against an epsilon rather than exact
/// equality to `0.0`/`1.0`, which is fragile after a chain of pivots.
#[derive(Debug, Clone)]
pub struct Tableau {
    table: Mat<E>,
    epsilon: E,
}

impl Tableau {
    /// Wraps `table` ($m+1$ rows, $n+1$ columns) as a tableau, using
    /// `epsilon` for every float comparison below.
    pub fn new(table: Mat<E>, epsilon: E) -> Self {
        Self { table, epsilon }
    }

    pub fn table(&self) -> &Mat<E> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut Mat<E> {
        &mut self.table
    }

    /// Number of constraint rows (`m`, i.e. rows excluding the cost row).
    pub fn n_constraints(&self) -> usize {
        self.table.nrows() - 1
    }

    /// Number of variable columns (`n`, i.e. columns excluding `b`).
    pub fn n_vars(&self) -> usize {
        self.table.ncols() - 1
    }

    pub fn get(&self, row: usize, col: usize) -> E {
        self.table[(row, col)]
    }

    fn rhs_col(&self) -> usize {
        self.table.ncols() - 1
    }

    /// The current objective value (the cost row's RHS entry).
    pub fn cost(&self) -> E {
        self.table[(0, self.rhs_col())]
    }

    /// Whether every cost-row entry (excluding the RHS column) is `>= 0`.
    pub fn is_optimal(&self) -> bool {
        let rhs_col = self.rhs_col();
        (0..rhs_col).all(|j| self.table[(0, j)] >= -self.epsilon)
    }

    /// The column in the cost row (excluding the RHS column) with the
    /// smallest (most negative) entry. Ties resolve to the first
    /// occurrence.
    pub fn choose_entering_variable(&self) -> usize {
        let rhs_col = self.rhs_col();
        let mut best_col = 0;
        let mut best_val = self.table[(0, 0)];
        for j in 1..rhs_col {
            let value = self.table[(0, j)];
            if value < best_val {
                best_val = value;
                best_col = j;
            }
        }
        best_col
    }

    /// Whether every entry in column `col`, including the cost row, is
    /// `<= 0` — in which case increasing that variable never violates a
    /// constraint and the objective is unbounded.
    pub fn is_unbounded(&self, col: usize) -> bool {
        (0..self.table.nrows()).all(|i| self.table[(i, col)] <= self.epsilon)
    }

    /// The row among `1..=m` with the smallest strictly-positive ratio
    /// `b_i / a_{i,col}`, considering only rows where `a_{i,col} > 0`.
    /// Ties resolve to the first occurrence.
    ///
    /// Panics if no such row exists; callers must check
    /// [`Tableau::is_unbounded`] first.
    pub fn choose_leaving_variable(&self, col: usize) -> usize {
        let rhs_col = self.rhs_col();
        let mut best_row = None;
        let mut best_ratio = E::INFINITY;

        for row in 1..self.table.nrows() {
            let denom = self.table[(row, col)];
            if denom > self.epsilon {
                let ratio = self.table[(row, rhs_col)] / denom;
                if ratio > self.epsilon && ratio < best_ratio {
                    best_ratio = ratio;
                    best_row = Some(row);
                }
            }
        }

        best_row.expect(
            "choose_leaving_variable found no positive ratio; caller must check is_unbounded first",
        )
    }

    /// Divides row `row` by `table[row, col]`, then subtracts
    /// `table[r, col] * (normalized row)` from every other row `r`, so
    /// that column `col` becomes a unit vector with `1` at `row`.
    pub fn pivot(&mut self, row: usize, col: usize) {
        tracing::trace!(row, col, "pivoting tableau");

        let divisor = self.table[(row, col)];
        let ncols = self.table.ncols();
        for j in 0..ncols {
            self.table[(row, j)] /= divisor;
        }

        let nrows = self.table.nrows();
        for r in 0..nrows {
            if r == row {
                continue;
            }
            let factor = self.table[(r, col)];
            if factor == 0.0 {
                continue;
            }
            for j in 0..ncols {
                let pivot_val = self.table[(row, j)];
                self.table[(r, j)] -= factor * pivot_val;
            }
        }
    }

    /// For each column `0..n`, if its entries form a unit vector (exactly
    /// one entry `~= 1.0`, the rest `~= 0.0`), records that the variable
    /// at that column is basic in the corresponding constraint row.
    /// Returns a length-`m` vector of variable column indices, `-1` where
    /// no basic variable was identified for that row.
    pub fn extract_basis(&self) -> Vec<i64> {
        let m = self.n_constraints();
        let n = self.n_vars();
        let mut basis = vec![-1i64; m];

        for j in 0..n {
            let mut one_at = None;
            let mut is_unit = true;

            for i in 0..=m {
                let value = self.table[(i, j)];
                if (value - 1.0).abs() < self.epsilon {
                    if one_at.is_some() {
                        is_unit = false;
                        break;
                    }
                    one_at = Some(i);
                } else if value.abs() >= self.epsilon {
                    is_unit = false;
                    break;
                }
            }

            if is_unit {
                if let Some(row) = one_at {
                    if row >= 1 {
                        basis[row - 1] = j as i64;
                    }
                }
            }
        }

        basis
    }

    /// Builds the variable assignment implied by the current basis: `x[j]
    /// = b_r` for the basic column `j` of row `r`, `0` everywhere else.
    pub fn extract_solution(&self) -> Vec<E> {
        let n = self.n_vars();
        let mut assignment = vec![0.0; n];
        let rhs_col = self.rhs_col();

        for (row, &col) in self.extract_basis().iter().enumerate() {
            if col >= 0 {
                assignment[col as usize] = self.table[(row + 1, rhs_col)];
            }
        }

        assignment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tableau {
        // max 5x1 + 4x2 s.t. 3x1 + 5x2 + s1 = 78, 4x1 + x2 + s2 = 36
        let rows: Vec<Vec<E>> = vec![
            vec![-5.0, -4.0, 0.0, 0.0, 0.0],
            vec![3.0, 5.0, 1.0, 0.0, 78.0],
            vec![4.0, 1.0, 0.0, 1.0, 36.0],
        ];
        let table = Mat::from_fn(rows.len(), rows[0].len(), |i, j| rows[i][j]);
        Tableau::new(table, 1e-9)
    }

    #[test]
    fn initial_tableau_is_not_optimal() {
        assert!(!sample().is_optimal());
    }

    #[test]
    fn entering_variable_is_most_negative_cost_entry() {
        assert_eq!(sample().choose_entering_variable(), 0);
    }

    #[test]
    fn column_with_a_negative_entry_is_not_unbounded() {
        assert!(!sample().is_unbounded(0));
    }

    #[test]
    fn leaving_variable_is_minimum_positive_ratio() {
        // ratios: 78/3=26, 36/4=9 -> row 2 wins
        assert_eq!(sample().choose_leaving_variable(0), 2);
    }

    #[test]
    fn pivot_reaches_optimum_in_two_steps() {
        let mut t = sample();
        while !t.is_optimal() {
            let col = t.choose_entering_variable();
            assert!(!t.is_unbounded(col));
            let row = t.choose_leaving_variable(col);
            t.pivot(row, col);
        }
        assert!((t.cost() - 78.0).abs() < 1e-6);
    }

    #[test]
    fn basis_columns_are_unit_vectors_after_solving() {
        let mut t = sample();
        while !t.is_optimal() {
            let col = t.choose_entering_variable();
            let row = t.choose_leaving_variable(col);
            t.pivot(row, col);
        }
        let basis = t.extract_basis();
        assert_eq!(basis.len(), 2);
        assert!(basis.iter().all(|&b| b >= 0));
    }
}
