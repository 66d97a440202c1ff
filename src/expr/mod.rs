//! Linear-expression algebra: variables, atoms, expressions, constraints,
//! and objectives.
//!
//! Expressions and constraints store variable *indices*, never a reference
//! back to the owning [`Model`](crate::model::Model) — see
//! [`Expression::factors`](expression::Expression::factors), which
//! materializes coefficients against whatever model is handed to it. This
//! keeps the algebra pure and trivially `Clone`, with no ownership cycles.

mod constraint;
mod expression;
mod objective;
mod variable;

pub use constraint::{Constraint, Relation};
pub use expression::{Atom, Expression};
pub use objective::{Objective, Sense};
pub use variable::Variable;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;

    #[test]
    fn negation_distributes_over_factors() {
        let mut model = Model::new("t");
        let x = model.create_variable("x").unwrap();
        let y = model.create_variable("y").unwrap();

        let e = Expression::from(x.clone()) * 2.0 + Expression::from(y.clone()) * 3.0;
        let neg = -e.clone();

        let ef = e.factors(&model);
        let nf = neg.factors(&model);

        for (a, b) in ef.iter().zip(nf.iter()) {
            assert_eq!(*a, -*b);
        }
    }

    #[test]
    fn addition_distributes_over_factors() {
        let mut model = Model::new("t");
        let x = model.create_variable("x").unwrap();
        let y = model.create_variable("y").unwrap();

        let e1 = Expression::from(x.clone()) * 2.0;
        let e2 = Expression::from(y.clone()) * 3.0;
        let sum = e1.clone() + e2.clone();

        let f1 = e1.factors(&model);
        let f2 = e2.factors(&model);
        let fs = sum.factors(&model);

        for i in 0..fs.len() {
            assert_eq!(fs[i], f1[i] + f2[i]);
        }
    }

    #[test]
    fn simplify_merges_repeated_variables() {
        let mut model = Model::new("t");
        let x = model.create_variable("x").unwrap();

        let e = Expression::from(x.clone()) * 2.0 + Expression::from(x.clone()) * 3.0;
        let simplified = e.simplify();

        assert_eq!(simplified.atoms().len(), 1);
        assert_eq!(simplified.atoms()[0].coefficient, 5.0);
    }

    #[test]
    fn simplify_drops_zero_coefficients() {
        let mut model = Model::new("t");
        let x = model.create_variable("x").unwrap();
        let y = model.create_variable("y").unwrap();

        let e = Expression::from(x.clone()) * 2.0 + Expression::from(y.clone()) * -2.0
            + Expression::from(y.clone()) * 2.0;
        let simplified = e.simplify();

        assert_eq!(simplified.atoms().len(), 1);
        assert_eq!(simplified.atoms()[0].variable.index(), x.index());
    }

    #[test]
    fn constraint_folds_constant_into_bound() {
        let mut model = Model::new("t");
        let x = model.create_variable("x").unwrap();

        let c = (Expression::from(x.clone()) + Expression::constant(3.0)).le(10.0);
        let simplified = c.simplify();

        assert_eq!(simplified.bound, 7.0);
        assert_eq!(simplified.expression.constant_term(), 0.0);
    }

    #[test]
    fn invert_flips_le_and_ge() {
        let mut model = Model::new("t");
        let x = model.create_variable("x").unwrap();

        let c = Expression::from(x).le(5.0);
        let inverted = c.invert();

        assert_eq!(inverted.relation, Relation::Ge);
        assert_eq!(inverted.bound, -5.0);
    }
}
