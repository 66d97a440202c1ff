use std::ops::{Add, Mul, Neg, Sub};

use super::constraint::{Constraint, Relation};
use super::variable::Variable;
use crate::E;
use crate::model::Model;

/// A `(variable, coefficient)` pair, one term of a [`Expression`].
#[derive(Debug, Clone)]
pub struct Atom {
    pub variable: Variable,
    pub coefficient: E,
}

impl Atom {
    pub fn new(variable: Variable, coefficient: E) -> Self {
        Self {
            variable,
            coefficient,
        }
    }
}

/// A linear combination of variables plus a constant term.
///
/// `Expression` stores variable *indices* (via [`Variable`]), never a
/// reference to the [`Model`] that created them, so it stays trivially
/// `Clone` and free of ownership cycles. Coefficients of repeated
/// variables are folded together by [`Expression::simplify`].
#[derive(Debug, Clone, Default)]
pub struct Expression {
    pub(crate) atoms: Vec<Atom>,
    pub(crate) constant: E,
}

impl Expression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constant(value: E) -> Self {
        Self {
            atoms: Vec::new(),
            constant: value,
        }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn constant_term(&self) -> E {
        self.constant
    }

    /// Returns an equivalent expression with at most one atom per variable
    /// index, zero-coefficient atoms removed. The constant term is left
    /// untouched here; callers that need it folded into a constraint bound
    /// do so at the [`Constraint`] level.
    pub fn simplify(&self) -> Self {
        let mut merged: Vec<Atom> = Vec::new();

        for atom in &self.atoms {
            if let Some(existing) = merged
                .iter_mut()
                .find(|a| a.variable.index() == atom.variable.index())
            {
                existing.coefficient += atom.coefficient;
            } else {
                merged.push(atom.clone());
            }
        }

        merged.retain(|a| a.coefficient != 0.0);

        Self {
            atoms: merged,
            constant: self.constant,
        }
    }

    /// Projects this expression onto a dense coefficient vector indexed by
    /// `model`'s current variable list, padding with zero for any variable
    /// not present in the expression.
    pub fn factors(&self, model: &Model) -> Vec<E> {
        let mut out = vec![0.0; model.variables().len()];
        for atom in &self.atoms {
            if let Some(slot) = out.get_mut(atom.variable.index()) {
                *slot += atom.coefficient;
            }
        }
        out
    }

    pub fn le(self, bound: E) -> Constraint {
        Constraint::new(self, Relation::Le, bound)
    }

    pub fn ge(self, bound: E) -> Constraint {
        Constraint::new(self, Relation::Ge, bound)
    }

    pub fn equal(self, bound: E) -> Constraint {
        Constraint::new(self, Relation::Eq, bound)
    }
}

impl From<Variable> for Expression {
    fn from(variable: Variable) -> Self {
        Self {
            atoms: vec![Atom::new(variable, 1.0)],
            constant: 0.0,
        }
    }
}

impl From<E> for Expression {
    fn from(value: E) -> Self {
        Self::constant(value)
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        let a = self.simplify();
        let b = other.simplify();

        if a.constant != b.constant || a.atoms.len() != b.atoms.len() {
            return false;
        }

        a.atoms
            .iter()
            .zip(b.atoms.iter())
            .all(|(x, y)| x.variable.index() == y.variable.index() && x.coefficient == y.coefficient)
    }
}

impl Add for Expression {
    type Output = Expression;

    fn add(mut self, rhs: Expression) -> Expression {
        self.atoms.extend(rhs.atoms);
        self.constant += rhs.constant;
        self
    }
}

impl Add<Variable> for Expression {
    type Output = Expression;

    fn add(self, rhs: Variable) -> Expression {
        self + Expression::from(rhs)
    }
}

impl Neg for Expression {
    type Output = Expression;

    fn neg(mut self) -> Expression {
        for atom in &mut self.atoms {
            atom.coefficient = -atom.coefficient;
        }
        self.constant = -self.constant;
        self
    }
}

impl Sub for Expression {
    type Output = Expression;

    fn sub(self, rhs: Expression) -> Expression {
        self + (-rhs)
    }
}

impl Sub<Variable> for Expression {
    type Output = Expression;

    fn sub(self, rhs: Variable) -> Expression {
        self - Expression::from(rhs)
    }
}

impl Mul<E> for Expression {
    type Output = Expression;

    fn mul(mut self, rhs: E) -> Expression {
        for atom in &mut self.atoms {
            atom.coefficient *= rhs;
        }
        self.constant *= rhs;
        self
    }
}

impl Mul<Expression> for E {
    type Output = Expression;

    fn mul(self, rhs: Expression) -> Expression {
        rhs * self
    }
}

impl Mul<Variable> for E {
    type Output = Expression;

    fn mul(self, rhs: Variable) -> Expression {
        Expression::from(rhs) * self
    }
}
