//! The immutable problem description (component C1 of the design).
//!
//! A [`Problem`] is produced by [`Builder::build`](crate::Builder::build) (or
//! [`Builder::try_build`](crate::Builder::try_build)) and is never mutated
//! again; [`crate::solver::Solver`] borrows it for its whole lifetime and
//! builds the mutable link store (C2) from it.

use crate::types::{Bounds, ColoredItem};

/// A primary item's declared name and multiplicity bounds.
#[derive(Debug, Clone)]
pub(crate) struct PrimaryItemSpec {
    pub name: String,
    pub bounds: Bounds,
}

/// One option (a "sequence"): the items it touches, in item-declaration
/// order, plus the caller-supplied `meaning` used to report solutions.
#[derive(Debug)]
pub(crate) struct OptionSpec<T> {
    pub items: Vec<ColoredItem>,
    pub meaning: T,
}

/// A compiled exact-cover-with-multiplicities-and-colors problem.
///
/// Build one with [`Problem::builder`]:
///
/// ```
/// use dlx_m::Problem;
///
/// let mut builder = Problem::builder();
/// builder.add_primary_item("a");
/// builder.add_option(1, ["a"]);
/// let problem = builder.build();
/// ```
#[derive(Debug)]
pub struct Problem<T> {
    pub(crate) primary: Vec<PrimaryItemSpec>,
    pub(crate) secondary_names: Vec<String>,
    pub(crate) colors: Vec<String>,
    pub(crate) options: Vec<OptionSpec<T>>,
}

impl<T> Problem<T> {
    /// Total number of distinct items (primary + secondary).
    #[must_use]
    pub fn num_items(&self) -> usize {
        self.primary.len() + self.secondary_names.len()
    }

    /// Number of primary items.
    #[must_use]
    pub fn num_primary_items(&self) -> usize {
        self.primary.len()
    }

    /// Number of options.
    #[must_use]
    pub fn num_options(&self) -> usize {
        self.options.len()
    }

    /// Returns the meaning (the value passed to
    /// [`Builder::add_option`](crate::Builder::add_option)) of the given
    /// option.
    #[must_use]
    pub fn meaning(&self, option_number: usize) -> &T {
        &self.options[option_number].meaning
    }

    /// Creates a [`crate::Builder`] to configure a problem.
    #[must_use]
    pub fn builder() -> crate::Builder<T> {
        crate::Builder::default()
    }

    /// Iterates over the declared primary items, in declaration order.
    pub(crate) fn primary_iter(&self) -> impl Iterator<Item = &PrimaryItemSpec> {
        self.primary.iter()
    }

    /// Iterates over the declared secondary item names, in declaration
    /// order.
    pub(crate) fn secondary_iter(&self) -> impl Iterator<Item = &String> {
        self.secondary_names.iter()
    }

    /// Iterates over the declared options, in insertion order.
    pub(crate) fn options_iter(&self) -> impl Iterator<Item = &OptionSpec<T>> {
        self.options.iter()
    }

    /// Solves the problem, returning all solutions.
    ///
    /// # Example
    ///
    /// ```
    /// let mut problem = dlx_m::samples::toy();
    /// let solutions = problem.solve_all();
    /// assert_eq!(solutions.len(), 1);
    /// ```
    pub fn solve_all(&mut self) -> Vec<crate::solver::Solution> {
        crate::solver::Solver::new(self)
            .expect("toy/sample problems never overflow setup")
            .solve_all()
    }

    /// Solves the problem, returning a unique solution if there is one, or
    /// [`Unique::Ambiguous`](crate::Unique::Ambiguous) if there are multiple
    /// solutions, or [`Unique::None`](crate::Unique::None) if there are
    /// none.
    pub fn solve_unique(&mut self) -> crate::Unique<crate::solver::Solution> {
        crate::solver::Solver::new(self)
            .expect("toy/sample problems never overflow setup")
            .solve_unique()
    }

    /// Solves the problem, returning at most one solution.
    pub fn solve_once(&mut self) -> Option<crate::solver::Solution> {
        crate::solver::Solver::new(self)
            .expect("toy/sample problems never overflow setup")
            .solve_once()
    }
}
