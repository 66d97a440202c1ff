//! Crate-wide error taxonomy.
//!
//! Every public solve boundary returns `Result<_, SolveError>` rather than a
//! sentinel value, per the failure taxonomy the solver core follows:
//! `Unbounded` and `Infeasible` are raised by the simplex engine itself,
//! while `InvalidModel`/`InvalidInput` are raised eagerly at call sites
//! before any solve begins.

use derive_more::{Display, Error};

/// A failure surfaced by one of the solvers in this crate.
#[derive(Debug, Display, Error, PartialEq, Clone)]
pub enum SolveError {
    /// The simplex solver chose an entering column that is non-positive in
    /// every row, including the cost row: the objective can be improved
    /// without bound.
    #[display("linear program is unbounded")]
    Unbounded,

    /// Phase one of the two-phase simplex method ended with an artificial
    /// variable still basic at a positive value: no feasible point exists.
    #[display("linear program is infeasible")]
    Infeasible,

    /// The model itself is malformed: no variables, no objective, a
    /// duplicate variable name, or a dual requested for a model that
    /// contains an equality constraint.
    #[display("invalid model: {_0}")]
    InvalidModel(String),

    /// The input to a combinatorial solver (assignment, max-flow) violates
    /// a precondition the solver requires, e.g. a non-rectangular cost
    /// matrix or an undefined source/sink node.
    #[display("invalid input: {_0}")]
    InvalidInput(String),
}

/// Convenience alias used at every public solve boundary.
pub type SolveResult<T> = Result<T, SolveError>;
