#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

//! Knuth's Algorithm M (TAOCP 7.2.2.1): exact cover with item
//! multiplicities and colors, solved via dancing links.
//!
//! Start with [`Problem::builder`] to describe primary items (with
//! optional multiplicity bounds), secondary items (optionally colored),
//! and options; then call [`Problem::solve_all`],
//! [`Problem::solve_unique`], or [`Problem::solve_once`], or build a
//! [`Solver`] directly for incremental iteration.

mod builder;
mod problem;
mod solver;
mod types;
mod unique;

pub mod samples;

pub use builder::{BuildError, Builder};
pub use problem::Problem;
pub use solver::{SolveOptions, Solution, Solver, SolverError};
pub use types::{Bounds, ColorId, ColoredItem, ItemId, OptionId};
pub use unique::Unique;
