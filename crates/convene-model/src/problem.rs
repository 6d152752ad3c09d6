// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Generic 0/1 integer programs.
//!
//! A `Problem` is an ordered list of binary variables, a list of linear
//! constraints over them, an integral objective and a sense. It is assembled
//! through `ProblemBuilder`, which validates every reference before handing
//! out the immutable `Problem`; solvers can rely on that invariant and skip
//! bounds checks of their own.
//!
//! Variables carry a `VariableKind` that ties them back to the attendance
//! domain: slot selections, or entity coverage indicators. The search engine
//! uses the kind to prefer branching on slot variables, and the extractor
//! uses it to map an assignment back to slot indices.
//!
//! Objective coefficients are integers. The objective value of any 0/1
//! assignment is therefore an integer, which lets the engine round
//! relaxation bounds before comparing them with an incumbent.

use crate::{
    error::ModelError,
    index::{ConstraintIndex, EntityIndex, SlotIndex, VariableIndex},
};
use smallvec::SmallVec;

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sense {
    Minimize,
    Maximize,
}

impl Sense {
    /// Returns `true` if objective value `a` is strictly better than `b`.
    #[inline]
    pub fn is_better(self, a: i64, b: i64) -> bool {
        match self {
            Sense::Minimize => a < b,
            Sense::Maximize => a > b,
        }
    }

    /// The objective value every feasible assignment beats or ties.
    #[inline]
    pub fn worst_value(self) -> i64 {
        match self {
            Sense::Minimize => i64::MAX,
            Sense::Maximize => i64::MIN,
        }
    }
}

impl std::fmt::Display for Sense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sense::Minimize => write!(f, "minimize"),
            Sense::Maximize => write!(f, "maximize"),
        }
    }
}

/// Relation between a constraint's left-hand side and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// `lhs >= rhs`
    GreaterEqual,
    /// `lhs <= rhs`
    LessEqual,
    /// `lhs == rhs`
    Equal,
}

impl std::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintKind::GreaterEqual => write!(f, ">="),
            ConstraintKind::LessEqual => write!(f, "<="),
            ConstraintKind::Equal => write!(f, "="),
        }
    }
}

/// What a binary variable stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    /// `1` if the slot is selected.
    Slot(SlotIndex),
    /// `1` if the entity attends some selected slot.
    Entity(EntityIndex),
}

/// A declared binary variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variable {
    index: VariableIndex,
    kind: VariableKind,
}

impl Variable {
    #[inline]
    pub fn index(&self) -> VariableIndex {
        self.index
    }

    #[inline]
    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    /// Returns the slot this variable selects, if it is a slot variable.
    #[inline]
    pub fn slot(&self) -> Option<SlotIndex> {
        match self.kind {
            VariableKind::Slot(slot) => Some(slot),
            VariableKind::Entity(_) => None,
        }
    }

    #[inline]
    pub fn is_slot(&self) -> bool {
        matches!(self.kind, VariableKind::Slot(_))
    }
}

/// One `(variable, coefficient)` pair of a constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    pub variable: VariableIndex,
    pub coefficient: f64,
}

impl Term {
    #[inline]
    pub fn new(variable: VariableIndex, coefficient: f64) -> Self {
        Self {
            variable,
            coefficient,
        }
    }
}

/// A sparse linear constraint `sum(coefficient * variable) <kind> rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    terms: SmallVec<[Term; 8]>,
    kind: ConstraintKind,
    rhs: f64,
}

impl Constraint {
    #[inline]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    #[inline]
    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    #[inline]
    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    /// Evaluates the left-hand side for a 0/1 assignment.
    #[inline]
    pub fn activity(&self, values: &[bool]) -> f64 {
        self.terms
            .iter()
            .filter(|term| values[term.variable.get()])
            .map(|term| term.coefficient)
            .sum()
    }

    /// Returns `true` if `activity` satisfies the constraint within `tolerance`.
    #[inline]
    pub fn is_satisfied_by(&self, activity: f64, tolerance: f64) -> bool {
        match self.kind {
            ConstraintKind::GreaterEqual => activity >= self.rhs - tolerance,
            ConstraintKind::LessEqual => activity <= self.rhs + tolerance,
            ConstraintKind::Equal => (activity - self.rhs).abs() <= tolerance,
        }
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.terms.is_empty() {
            write!(f, "0")?;
        }
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{}*x{}", term.coefficient, term.variable.get())?;
        }
        write!(f, " {} {}", self.kind, self.rhs)
    }
}

/// A validated, immutable 0/1 integer program.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: Vec<i64>,
    sense: Sense,
}

impl Problem {
    #[inline]
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    #[inline]
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    #[inline]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn variable(&self, index: VariableIndex) -> &Variable {
        &self.variables[index.get()]
    }

    #[inline]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn constraint(&self, index: ConstraintIndex) -> &Constraint {
        &self.constraints[index.get()]
    }

    /// Objective coefficients, one per variable.
    #[inline]
    pub fn objective(&self) -> &[i64] {
        &self.objective
    }

    #[inline]
    pub fn sense(&self) -> Sense {
        self.sense
    }

    /// Iterates over the slot variables in declaration order.
    pub fn slot_variables(&self) -> impl Iterator<Item = (VariableIndex, SlotIndex)> + '_ {
        self.variables
            .iter()
            .filter_map(|var| var.slot().map(|slot| (var.index, slot)))
    }

    /// Objective value of a 0/1 assignment.
    ///
    /// # Panics
    ///
    /// Panics if `values` is shorter than the number of variables.
    pub fn objective_value(&self, values: &[bool]) -> i64 {
        self.objective
            .iter()
            .zip(values)
            .filter(|(_, value)| **value)
            .map(|(coefficient, _)| *coefficient)
            .sum()
    }

    /// Returns the first constraint a 0/1 assignment violates, if any.
    ///
    /// # Panics
    ///
    /// Panics if `values` is shorter than the number of variables.
    pub fn first_violated(&self, values: &[bool], tolerance: f64) -> Option<ConstraintIndex> {
        self.constraints
            .iter()
            .position(|c| !c.is_satisfied_by(c.activity(values), tolerance))
            .map(ConstraintIndex::new)
    }
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ", self.sense)?;
        let mut first = true;
        for (j, &c) in self.objective.iter().enumerate().filter(|(_, c)| **c != 0) {
            if !first {
                write!(f, " + ")?;
            }
            write!(f, "{}*x{}", c, j)?;
            first = false;
        }
        if first {
            write!(f, "0")?;
        }
        writeln!(f)?;
        for constraint in &self.constraints {
            writeln!(f, "  {}", constraint)?;
        }
        Ok(())
    }
}

/// Mutable builder for `Problem`.
///
/// Variables are declared first; constraints may then reference them.
/// `build` checks every reference, rejects duplicate terms and non-finite
/// numbers, and freezes the result.
#[derive(Debug, Clone)]
pub struct ProblemBuilder {
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: Vec<i64>,
    sense: Sense,
}

impl ProblemBuilder {
    /// Starts an empty program with the given sense.
    #[inline]
    pub fn new(sense: Sense) -> Self {
        Self {
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: Vec::new(),
            sense,
        }
    }

    /// Starts an empty program with preallocated storage.
    #[inline]
    pub fn with_capacity(sense: Sense, num_variables: usize, num_constraints: usize) -> Self {
        Self {
            variables: Vec::with_capacity(num_variables),
            constraints: Vec::with_capacity(num_constraints),
            objective: Vec::with_capacity(num_variables),
            sense,
        }
    }

    #[inline]
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Declares a new binary variable with objective coefficient `cost`.
    pub fn add_variable(&mut self, kind: VariableKind, cost: i64) -> VariableIndex {
        let index = VariableIndex::new(self.variables.len());
        self.variables.push(Variable { index, kind });
        self.objective.push(cost);
        index
    }

    /// Appends a constraint. References are checked in `build`.
    pub fn add_constraint<I>(&mut self, terms: I, kind: ConstraintKind, rhs: f64) -> ConstraintIndex
    where
        I: IntoIterator<Item = Term>,
    {
        let index = ConstraintIndex::new(self.constraints.len());
        self.constraints.push(Constraint {
            terms: terms.into_iter().collect(),
            kind,
            rhs,
        });
        index
    }

    /// Validates all constraints and freezes the program.
    ///
    /// # Errors
    ///
    /// `ModelError::UnknownVariable`, `ModelError::DuplicateTerm` or
    /// `ModelError::NonFiniteCoefficient` for the first offending constraint.
    pub fn build(self) -> Result<Problem, ModelError> {
        let num_variables = self.variables.len();
        let mut seen = vec![usize::MAX; num_variables];

        for (i, constraint) in self.constraints.iter().enumerate() {
            let index = ConstraintIndex::new(i);
            if !constraint.rhs.is_finite() {
                return Err(ModelError::NonFiniteCoefficient { constraint: index });
            }
            for term in constraint.terms.iter() {
                let var = term.variable.get();
                if var >= num_variables {
                    return Err(ModelError::UnknownVariable {
                        constraint: index,
                        variable: term.variable,
                        num_variables,
                    });
                }
                if !term.coefficient.is_finite() {
                    return Err(ModelError::NonFiniteCoefficient { constraint: index });
                }
                if seen[var] == i {
                    return Err(ModelError::DuplicateTerm {
                        constraint: index,
                        variable: term.variable,
                    });
                }
                seen[var] = i;
            }
        }

        Ok(Problem {
            variables: self.variables,
            constraints: self.constraints,
            objective: self.objective,
            sense: self.sense,
        })
    }
}
