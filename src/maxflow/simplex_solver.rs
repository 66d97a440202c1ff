//! Max-flow solved by reduction to a linear program.

use super::Network;
use crate::error::{SolveError, SolveResult};
use crate::expr::{Expression, Variable};
use crate::model::Model;
use crate::options::SolverOptions;

fn out_edges_of(network: &Network, node: usize) -> impl Iterator<Item = usize> + '_ {
    network
        .edges()
        .iter()
        .enumerate()
        .filter(move |(_, &(from, _, _))| from == node)
        .map(|(index, _)| index)
}

fn in_edges_of(network: &Network, node: usize) -> impl Iterator<Item = usize> + '_ {
    network
        .edges()
        .iter()
        .enumerate()
        .filter(move |(_, &(_, to, _))| to == node)
        .map(|(index, _)| index)
}

fn sum_of(variables: &[Variable], indices: impl Iterator<Item = usize>) -> Expression {
    let mut expression = Expression::new();
    for index in indices {
        expression = expression + variables[index].clone();
    }
    expression
}

/// Solves `network` for its maximum source-to-sink flow by building one
/// variable per edge (bounded by that edge's capacity), a flow-conservation
/// constraint at every node other than the source and sink, an explicit
/// `out(source) - in(sink) == 0` constraint tying the two endpoints'
/// throughput together, and maximizing the source's total out-flow.
pub fn solve_maxflow_simplex(network: &Network) -> SolveResult<u64> {
    if network.source() == network.sink() {
        return Err(SolveError::InvalidInput(
            "source and sink must be different nodes".into(),
        ));
    }

    let mut model = Model::new(network.name());
    let mut variables = Vec::with_capacity(network.edges().len());
    for (index, &(_, _, capacity)) in network.edges().iter().enumerate() {
        let var = model.create_variable(format!("f{index}"))?;
        model.add_constraint(Expression::from(var.clone()).le(capacity as f64));
        variables.push(var);
    }

    let source = network.source();
    let sink = network.sink();

    let source_out = sum_of(&variables, out_edges_of(network, source));
    let sink_in = sum_of(&variables, in_edges_of(network, sink));
    model.add_constraint((source_out.clone() - sink_in).equal(0.0));

    for node in 0..network.n_nodes() {
        if node == source || node == sink {
            continue;
        }
        let inflow = sum_of(&variables, in_edges_of(network, node));
        let outflow = sum_of(&variables, out_edges_of(network, node));
        model.add_constraint((inflow - outflow).equal(0.0));
    }

    model.maximize(source_out);
    let solution = model.solve_with_options(&SolverOptions::default())?;

    // The objective is integral at the optimum for integer-capacity
    // networks; rounding guards against floating-point noise around that
    // integer (a truncating cast would silently round down on noise).
    Ok(solution.objective_value().round() as u64)
}
