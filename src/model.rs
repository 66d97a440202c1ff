//! The LP model: a named collection of variables, constraints, and one
//! objective.

use crate::E;
use crate::error::{SolveError, SolveResult};
use crate::expr::{Atom, Constraint, Expression, Objective, Relation, Sense, Variable};
use crate::options::SolverOptions;
use crate::simplex::Solution;

/// A linear program in algebraic form.
///
/// `Model` owns its variables, constraints, and objective; expressions and
/// constraints hold only variable indices, never a reference back to the
/// model that created them, so there is no ownership cycle.
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: Option<Objective>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> Option<&Objective> {
        self.objective.as_ref()
    }

    /// Creates a new, uniquely named variable and appends it to this
    /// model's variable list; its index is its position in that list.
    pub fn create_variable(&mut self, name: impl Into<String>) -> SolveResult<Variable> {
        let name = name.into();
        if self.variables.iter().any(|v| v.name() == name) {
            return Err(SolveError::InvalidModel(format!(
                "there is already a variable named {name}"
            )));
        }

        let variable = Variable::new(self.variables.len(), name);
        self.variables.push(variable.clone());
        Ok(variable)
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn minimize(&mut self, expression: Expression) {
        self.objective = Some(Objective::new(expression, Sense::Min));
    }

    pub fn maximize(&mut self, expression: Expression) {
        self.objective = Some(Objective::new(expression, Sense::Max));
    }

    pub(crate) fn constraints_mut(&mut self) -> &mut [Constraint] {
        &mut self.constraints
    }

    pub(crate) fn set_constraint_expression(&mut self, row: usize, expression: Expression) {
        self.constraints[row].expression = expression;
    }

    pub(crate) fn set_objective(&mut self, objective: Objective) {
        self.objective = Some(objective);
    }

    /// Drops every variable whose index is not in `keep`, remapping the
    /// survivors to new, contiguous indices in `keep`'s order, and
    /// rewriting every constraint's and the objective's expression
    /// accordingly (dropping atoms for variables that weren't kept).
    ///
    /// Used by the simplex solver's presolve step to discard artificial
    /// variable columns once phase 1 has found a feasible basis.
    pub(crate) fn retain_variables(&mut self, keep: &[usize]) {
        let mut remap = vec![None; self.variables.len()];
        let mut new_variables = Vec::with_capacity(keep.len());
        for (new_index, &old_index) in keep.iter().enumerate() {
            remap[old_index] = Some(new_index);
            new_variables.push(Variable::new(new_index, self.variables[old_index].name()));
        }

        let remap_expression = |expression: &Expression| -> Expression {
            let mut atoms = Vec::new();
            for atom in expression.atoms() {
                if let Some(new_index) = remap[atom.variable.index()] {
                    atoms.push(Atom::new(new_variables[new_index].clone(), atom.coefficient));
                }
            }
            Expression {
                atoms,
                constant: expression.constant_term(),
            }
        };

        for constraint in &mut self.constraints {
            constraint.expression = remap_expression(&constraint.expression);
        }
        if let Some(objective) = &mut self.objective {
            objective.expression = remap_expression(&objective.expression);
        }

        self.variables = new_variables;
    }

    fn simplify_all(&mut self) {
        self.constraints = self.constraints.iter().map(Constraint::simplify).collect();
        if let Some(objective) = &self.objective {
            self.objective = Some(objective.simplify());
        }
    }

    fn change_constraints_to_le(&mut self) {
        for constraint in &mut self.constraints {
            if constraint.relation == Relation::Ge {
                *constraint = constraint.invert();
            }
        }
    }

    fn change_objective_to_max(&mut self) {
        if let Some(objective) = &self.objective {
            if objective.sense == Sense::Min {
                self.objective = Some(objective.invert());
            }
        }
    }

    /// Deep-copies this model, folds constants into bounds, and flips a
    /// `MIN` objective to `MAX` — the first step shared by
    /// [`Model::translate_to_standard_form`] and the simplex solver's own
    /// `normalize`, which (unlike standard-form translation) does *not*
    /// flip `GE` constraints to `LE`.
    pub(crate) fn simplified_with_max_objective(&self) -> Model {
        let mut m = self.clone();
        m.simplify_all();
        m.change_objective_to_max();
        m
    }

    /// Deep-copies this model, simplifies every constraint and the
    /// objective, flips every `GE` constraint to `LE`, and flips a `MIN`
    /// objective to `MAX`. Idempotent: translating an already-standard
    /// model again yields an equivalent model.
    pub fn translate_to_standard_form(&self) -> Model {
        let mut standard = self.clone();
        standard.simplify_all();
        standard.change_constraints_to_le();
        standard.change_objective_to_max();
        standard
    }

    /// Builds the dual of this model: `min b*y s.t. A^T y >= c, y >= 0`.
    ///
    /// Requires a model with no equality constraints; call
    /// [`Model::translate_to_standard_form`] on a model with only `LE`/`GE`
    /// constraints if you need to eliminate equalities first via some
    /// other means — this crate does not invent one, and simply rejects
    /// equality constraints here.
    pub fn dual(&self) -> SolveResult<Model> {
        if self.constraints.iter().any(|c| c.relation == Relation::Eq) {
            return Err(SolveError::InvalidModel(
                "model doesn't support duals for problems with equality constraints".into(),
            ));
        }

        let primal = self.translate_to_standard_form();
        let Some(primal_objective) = &primal.objective else {
            return Err(SolveError::InvalidModel(
                "can't build a dual for a model without an objective".into(),
            ));
        };

        let mut dual = Model::new(format!("{} (dual)", primal.name));

        let dual_variables: Vec<Variable> = (0..primal.constraints.len())
            .map(|i| dual.create_variable(format!("y{}", i + 1)))
            .collect::<SolveResult<_>>()?;

        let mut dual_objective = Expression::new();
        for (variable, constraint) in dual_variables.iter().zip(primal.constraints.iter()) {
            dual_objective = dual_objective + Expression::from(variable.clone()) * constraint.bound;
        }
        dual.minimize(dual_objective);

        let primal_rows: Vec<Vec<E>> = primal
            .constraints
            .iter()
            .map(|c| c.expression.factors(&primal))
            .collect();
        let objective_factors = primal_objective.expression.factors(&primal);

        for (var_index, &rhs) in objective_factors.iter().enumerate() {
            let mut expression = Expression::new();
            for (row, variable) in primal_rows.iter().zip(dual_variables.iter()) {
                let coefficient = row[var_index];
                if coefficient != 0.0 {
                    expression = expression + Expression::from(variable.clone()) * coefficient;
                }
            }
            dual.add_constraint(expression.ge(rhs));
        }

        Ok(dual)
    }

    /// Two models are equivalent iff their standard forms have the same
    /// variable count, the same constraint count, the same objective
    /// sense and coefficient vector, and, in list order, identical
    /// per-constraint bound, relation, and coefficient vector. Variable
    /// names are ignored.
    pub fn is_equivalent(&self, other: &Model) -> bool {
        let m1 = self.translate_to_standard_form();
        let m2 = other.translate_to_standard_form();

        if m1.variables.len() != m2.variables.len() {
            return false;
        }
        if m1.constraints.len() != m2.constraints.len() {
            return false;
        }

        let (Some(o1), Some(o2)) = (&m1.objective, &m2.objective) else {
            return false;
        };
        if o1.sense != o2.sense {
            return false;
        }
        if o1.expression.factors(&m1) != o2.expression.factors(&m2) {
            return false;
        }

        for (c1, c2) in m1.constraints.iter().zip(m2.constraints.iter()) {
            if c1.bound != c2.bound || c1.relation != c2.relation {
                return false;
            }
            if c1.expression.factors(&m1) != c2.expression.factors(&m2) {
                return false;
            }
        }

        true
    }

    /// Solves this model with the default [`SolverOptions`].
    pub fn solve(&self) -> SolveResult<Solution> {
        self.solve_with_options(&SolverOptions::default())
    }

    /// Solves this model with the supplied options (currently only the
    /// numeric tolerance epsilon).
    pub fn solve_with_options(&self, options: &SolverOptions) -> SolveResult<Solution> {
        if self.variables.is_empty() {
            return Err(SolveError::InvalidModel(
                "can't solve a model without any variables".into(),
            ));
        }
        if self.objective.is_none() {
            return Err(SolveError::InvalidModel(
                "can't solve a model without an objective".into(),
            ));
        }

        crate::simplex::solve(self, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primal_with_only_le() -> Model {
        let mut m = Model::new("primal");
        let x1 = m.create_variable("x1").unwrap();
        let x2 = m.create_variable("x2").unwrap();
        m.add_constraint((Expression::from(x1.clone()) * 3.0 + Expression::from(x2.clone()) * 5.0).le(78.0));
        m.add_constraint((Expression::from(x1.clone()) * 4.0 + Expression::from(x2.clone())).le(36.0));
        m.maximize(Expression::from(x1) * 5.0 + Expression::from(x2) * 4.0);
        m
    }

    #[test]
    fn standard_form_translation_is_idempotent() {
        let m = primal_with_only_le();
        let once = m.translate_to_standard_form();
        let twice = once.translate_to_standard_form();
        assert!(once.is_equivalent(&twice));
    }

    #[test]
    fn duplicate_variable_name_is_rejected() {
        let mut m = Model::new("t");
        m.create_variable("x").unwrap();
        assert!(matches!(
            m.create_variable("x"),
            Err(SolveError::InvalidModel(_))
        ));
    }

    #[test]
    fn solve_without_variables_is_rejected() {
        let mut m = Model::new("t");
        m.maximize(Expression::constant(0.0));
        assert!(matches!(m.solve(), Err(SolveError::InvalidModel(_))));
    }

    #[test]
    fn solve_without_objective_is_rejected() {
        let mut m = Model::new("t");
        m.create_variable("x").unwrap();
        assert!(matches!(m.solve(), Err(SolveError::InvalidModel(_))));
    }

    #[test]
    fn dual_of_equality_model_is_rejected() {
        let mut m = Model::new("t");
        let x = m.create_variable("x").unwrap();
        m.add_constraint(Expression::from(x).equal(1.0));
        assert!(matches!(m.dual(), Err(SolveError::InvalidModel(_))));
    }

    #[test]
    fn dual_of_dual_is_equivalent_to_primal_for_le_only_model() {
        let m = primal_with_only_le();
        let dual = m.dual().unwrap();
        let dual_of_dual = dual.dual().unwrap();

        assert!(m.translate_to_standard_form().is_equivalent(&dual_of_dual));
    }

    #[test]
    fn adding_a_constraint_does_not_change_objective_or_prior_constraints() {
        let mut m = Model::new("t");
        let x = m.create_variable("x").unwrap();
        m.add_constraint(Expression::from(x.clone()).le(10.0));
        m.maximize(Expression::from(x.clone()));

        let objective_before = m.objective().unwrap().expression.factors(&m);
        let first_constraint_before = m.constraints()[0].expression.factors(&m);

        m.add_constraint(Expression::from(x).le(20.0));

        assert_eq!(objective_before, m.objective().unwrap().expression.factors(&m));
        assert_eq!(first_constraint_before, m.constraints()[0].expression.factors(&m));
    }
}
