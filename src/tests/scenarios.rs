//! Seven concrete end-to-end scenarios covering a simple bounded max, a
//! min with mixed LE/GE/EQ constraints, an unbounded variant of it, an
//! infeasible system, an artificial-variable solve, a square assignment,
//! and a max-flow network.

use float_cmp::approx_eq;
use rstest::rstest;

use crate::assignment::{AssignmentProblem, solve_assignment_simplex, solve_hungarian};
use crate::error::SolveError;
use crate::expr::Expression;
use crate::maxflow::{Network, solve_edmonds_karp, solve_maxflow_simplex};
use crate::model::Model;

#[rstest]
fn scenario_1_very_simple_max() {
    let mut m = Model::new("very simple max");
    let x1 = m.create_variable("x1").unwrap();
    let x2 = m.create_variable("x2").unwrap();
    m.add_constraint((Expression::from(x1.clone()) * 3.0 + Expression::from(x2.clone()) * 5.0).le(78.0));
    m.add_constraint((Expression::from(x1.clone()) * 4.0 + Expression::from(x2.clone())).le(36.0));
    m.maximize(Expression::from(x1.clone()) * 5.0 + Expression::from(x2.clone()) * 4.0);

    let solution = m.solve().unwrap();
    assert!(approx_eq!(f64, solution.value(x1), 6.0, epsilon = 1e-6));
    assert!(approx_eq!(f64, solution.value(x2), 12.0, epsilon = 1e-6));
    assert!(approx_eq!(f64, solution.objective_value(), 78.0, epsilon = 1e-6));
}

fn scenario_2_model() -> (Model, crate::expr::Variable, crate::expr::Variable, crate::expr::Variable) {
    let mut m = Model::new("solvable min with mixed constraints");
    let x1 = m.create_variable("x1").unwrap();
    let x2 = m.create_variable("x2").unwrap();
    let x3 = m.create_variable("x3").unwrap();
    m.add_constraint(
        (Expression::from(x1.clone()) - Expression::from(x2.clone()) - Expression::from(x3.clone())).ge(-50.0),
    );
    m.add_constraint(
        (Expression::from(x1.clone()) + Expression::from(x2.clone()) * 2.0 + Expression::from(x3.clone()))
            .ge(-10.0),
    );
    m.add_constraint((Expression::from(x2.clone()) * 4.0 + Expression::from(x3.clone())).equal(100.0));
    m.minimize(Expression::from(x1.clone()) * 2.0 - Expression::from(x2.clone()) + Expression::from(x3.clone()) * 3.0);
    (m, x1, x2, x3)
}

#[rstest]
fn scenario_2_solvable_min_with_mixed_constraints() {
    let (m, x1, x2, x3) = scenario_2_model();
    let solution = m.solve().unwrap();

    assert!(approx_eq!(f64, solution.value(x1), 0.0, epsilon = 1e-6));
    assert!(approx_eq!(f64, solution.value(x2), 25.0, epsilon = 1e-6));
    assert!(approx_eq!(f64, solution.value(x3), 0.0, epsilon = 1e-6));
    assert!(approx_eq!(f64, solution.objective_value(), -25.0, epsilon = 1e-6));
}

#[rstest]
fn scenario_3_unbounded() {
    let (mut m, x1, x2, x3) = scenario_2_model();
    m.maximize(Expression::from(x1) * 2.0 - Expression::from(x2) + Expression::from(x3) * 3.0);

    assert!(matches!(m.solve(), Err(SolveError::Unbounded)));
}

#[rstest]
fn scenario_4_infeasible_with_artificials() {
    let mut m = Model::new("infeasible with artificials");
    let x1 = m.create_variable("x1").unwrap();
    let x2 = m.create_variable("x2").unwrap();
    let x3 = m.create_variable("x3").unwrap();
    m.add_constraint(
        (Expression::from(x1.clone()) + Expression::from(x2.clone()) + Expression::from(x3.clone())).equal(10.0),
    );
    m.add_constraint(
        (Expression::from(x1.clone()) - Expression::from(x2.clone()) + Expression::from(x3.clone())).ge(100.0),
    );
    m.maximize(Expression::from(x1) + Expression::from(x2));

    assert!(matches!(m.solve(), Err(SolveError::Infeasible)));
}

#[rstest]
fn scenario_5_artificial_variable_solve() {
    let mut m = Model::new("artificial variable solve");
    let x1 = m.create_variable("x1").unwrap();
    let x2 = m.create_variable("x2").unwrap();
    m.add_constraint((Expression::from(x1.clone()) * 2.0 - Expression::from(x2.clone())).le(-1.0));
    m.add_constraint((Expression::from(x1.clone()) + Expression::from(x2.clone())).equal(3.0));
    m.maximize(Expression::from(x1.clone()) + Expression::from(x2.clone()) * 3.0);

    let solution = m.solve().unwrap();
    assert!(approx_eq!(f64, solution.value(x1), 0.0, epsilon = 1e-6));
    assert!(approx_eq!(f64, solution.value(x2), 3.0, epsilon = 1e-6));
    assert!(approx_eq!(f64, solution.objective_value(), 9.0, epsilon = 1e-6));
}

#[rstest]
fn scenario_6_square_assignment() {
    let problem = AssignmentProblem::new(vec![
        vec![4.0, 1.0, 3.0],
        vec![2.0, 0.0, 5.0],
        vec![3.0, 2.0, 2.0],
    ])
    .unwrap();

    let hungarian = solve_hungarian(&problem);
    assert!(approx_eq!(f64, hungarian.total_cost, 5.0, epsilon = 1e-6));

    let simplex = solve_assignment_simplex(&problem).unwrap();
    assert!(approx_eq!(f64, simplex.total_cost, 5.0, epsilon = 1e-6));
}

#[rstest]
fn scenario_7_max_flow() {
    let mut network = Network::new("scenario 7", 0, 3);
    network.add_edge(0, 1, 10);
    network.add_edge(0, 2, 5);
    network.add_edge(1, 2, 15);
    network.add_edge(1, 3, 10);
    network.add_edge(2, 3, 10);

    assert_eq!(solve_edmonds_karp(&network).unwrap(), 15);
    assert_eq!(solve_maxflow_simplex(&network).unwrap(), 15);
}
