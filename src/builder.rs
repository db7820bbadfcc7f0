use crate::problem::{OptionSpec, PrimaryItemSpec, Problem};
use crate::types::{Bounds, ColorId, ColoredItem, ItemId};
use std::collections::HashMap;
use std::fmt::Debug;
use std::fmt::Display;

/// Errors raised while compiling a [`Builder`] into a [`Problem`].
///
/// This is the `InvalidProblem` case of the error taxonomy: these are all
/// caught before a [`crate::solver::Solver`] is ever built, so the solver
/// itself never has to handle a malformed problem.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("item {0:?} is used in an option, but was never declared as primary or secondary")]
    ItemNotDeclared(String),
    #[error("item {0:?} is declared as both primary and secondary")]
    ItemDeclaredTwice(String),
    #[error("no primary items declared")]
    NoPrimaryItems,
    #[error("no options declared")]
    NoOptions,
    #[error("primary item {0:?} has lower bound {1} greater than upper bound {2}")]
    InvalidBounds(String, u32, u32),
    #[error("primary item {0:?} has lower bound 0; primary items must be used at least once")]
    ZeroLowerBound(String),
    #[error("primary item {0:?} is colored in an option, but primary items cannot carry colors")]
    ColorOnPrimaryItem(String),
    #[error("color {0:?} used in an option was never declared")]
    ColorNotDeclared(String),
    #[error("color {0:?} is declared more than once")]
    ColorDeclaredTwice(String),
}

/// A builder for a [`Problem`].
///
/// The usual way to use this is to call [`Problem::builder`] to get a
/// `Builder`, call `add_primary_item(s)`, `add_secondary_item(s)`,
/// `add_color(s)`, and `add_option` to configure the problem, and finally
/// call `build` (or `try_build`) to get a `Problem`.
///
/// The `add_option` method takes a parameter of type `T`, the option's
/// "meaning" — any data you want. The solver never inspects it; it is handed
/// back to you on [`Solution::meanings`](crate::solver::Solution::meanings)
/// so that you can reconstruct what a solution means in problem-specific
/// terms (e.g. which cell of a grid got which tile).
///
/// An option may reference any mix of primary and secondary items (an
/// option made up entirely of secondary items is accepted). Item references
/// in an option are plain names (`"x"`) for uncolored items, or
/// `"name:color"` for a secondary item asserting a color. Every color
/// referenced this way must have been declared with `add_color`/
/// `add_colors` (a declared color may go unused). It's fine to call
/// `add_option` before declaring the items and colors it references, so
/// long as they are declared before `build`/`try_build` is called.
///
/// # Example
/// ```
/// use dlx_m::Problem;
///
/// let mut builder = Problem::builder();
/// builder.add_primary_items(["p", "q", "r"]);
/// builder.add_secondary_items(["x", "y"]);
/// builder.add_colors(["A", "B"]);
/// builder.add_option(1, ["p", "q", "x", "y:A"]);
/// builder.add_option(2, ["p", "r", "x:A", "y"]);
/// builder.add_option(3, ["p", "x:B"]);
/// builder.add_option(4, ["q", "x:A"]);
/// builder.add_option(5, ["r", "y:B"]);
/// let problem = builder.build();
/// ```
#[derive(Debug, Clone)]
pub struct Builder<T> {
    primary_items: Vec<(String, u32, u32)>,
    secondary_items: Vec<String>,
    colors: Vec<String>,
    options: Vec<(T, Vec<String>)>,
}

impl<T> Default for Builder<T> {
    fn default() -> Self {
        Self {
            primary_items: Vec::new(),
            secondary_items: Vec::new(),
            colors: Vec::new(),
            options: Vec::new(),
        }
    }
}

impl<T> Builder<T> {
    /// Creates a new `Builder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds primary items with the default bounds (used exactly once).
    pub fn add_primary_items<S: Display>(&mut self, items: impl IntoIterator<Item = S>) {
        for item in items {
            self.add_primary_item(item);
        }
    }

    /// Adds a single primary item with the default bounds (used exactly
    /// once).
    pub fn add_primary_item(&mut self, item: impl Display) {
        self.add_primary_item_with_bounds(item, 1, 1);
    }

    /// Adds a primary item that must be used between `u` and `v` times
    /// (inclusive) in any solution.
    pub fn add_primary_item_with_bounds(&mut self, item: impl Display, u: u32, v: u32) {
        self.primary_items.push((item.to_string(), u, v));
    }

    /// Adds secondary items to the problem.
    pub fn add_secondary_items<S: Display>(&mut self, items: impl IntoIterator<Item = S>) {
        self.secondary_items
            .extend(items.into_iter().map(|t| t.to_string()));
    }

    /// Adds a single secondary item to the problem.
    pub fn add_secondary_item(&mut self, item: impl Display) {
        self.secondary_items.push(item.to_string());
    }

    /// Declares the permitted color names secondary items may be asserted
    /// with. A color used in an option's `"name:color"` reference must be
    /// declared here first; see [`try_build`](Self::try_build).
    pub fn add_colors<S: Display>(&mut self, colors: impl IntoIterator<Item = S>) {
        for color in colors {
            self.add_color(color);
        }
    }

    /// Declares a single permitted color name.
    pub fn add_color(&mut self, color: impl Display) {
        self.colors.push(color.to_string());
    }

    /// Adds an option to the problem.
    pub fn add_option<S: Display>(&mut self, meaning: T, items: impl IntoIterator<Item = S>) {
        let items: Vec<_> = items.into_iter().map(|i| i.to_string()).collect();
        self.options.push((meaning, items));
    }

    /// Builds the problem. Panics if the configuration is invalid; see
    /// [`try_build`](Self::try_build) for a non-panicking version.
    #[must_use]
    pub fn build(self) -> Problem<T> {
        self.try_build().unwrap()
    }

    /// Builds the problem, returning a [`BuildError`] if the configuration
    /// is invalid (duplicate or undeclared names, colors on primary items,
    /// malformed bounds, and so on).
    pub fn try_build(self) -> Result<Problem<T>, BuildError> {
        let mut seen = HashMap::new();
        for (name, u, v) in &self.primary_items {
            if seen.insert(name.clone(), ()).is_some() {
                return Err(BuildError::ItemDeclaredTwice(name.clone()));
            }
            if *u == 0 {
                return Err(BuildError::ZeroLowerBound(name.clone()));
            }
            if u > v {
                return Err(BuildError::InvalidBounds(name.clone(), *u, *v));
            }
        }
        if self.primary_items.is_empty() {
            return Err(BuildError::NoPrimaryItems);
        }
        for name in &self.secondary_items {
            if seen.insert(name.clone(), ()).is_some() {
                return Err(BuildError::ItemDeclaredTwice(name.clone()));
            }
        }
        if self.options.is_empty() {
            return Err(BuildError::NoOptions);
        }

        // Primary items first, then secondary -- this is what lets the
        // solver treat "is primary" as a single range test (spec C2).
        let item_index: HashMap<&str, u32> = self
            .primary_items
            .iter()
            .map(|(name, _, _)| name.as_str())
            .chain(self.secondary_items.iter().map(String::as_str))
            .enumerate()
            .map(|(i, name)| (name, i as u32))
            .collect();

        let primary_names: std::collections::HashSet<&str> = self
            .primary_items
            .iter()
            .map(|(name, _, _)| name.as_str())
            .collect();

        // Colors are a declared collection, the same as primary/secondary
        // items (spec.md §4.1's C1 data model), not whatever happens to
        // show up in an option: a color reference that was never declared
        // via `add_color`/`add_colors` is rejected below.
        let mut color_index: HashMap<&str, u32> = HashMap::new();
        for (i, name) in self.colors.iter().enumerate() {
            if color_index.insert(name.as_str(), i as u32).is_some() {
                return Err(BuildError::ColorDeclaredTwice(name.clone()));
            }
        }

        let mut options = Vec::with_capacity(self.options.len());
        for (meaning, raw_items) in self.options {
            let mut parsed = Vec::with_capacity(raw_items.len());
            for raw in &raw_items {
                let (name, color) = match raw.split_once(':') {
                    Some((name, color)) => (name, Some(color)),
                    None => (raw.as_str(), None),
                };
                let item_id = *item_index
                    .get(name)
                    .ok_or_else(|| BuildError::ItemNotDeclared(name.to_string()))?;
                if primary_names.contains(name) && color.is_some() {
                    return Err(BuildError::ColorOnPrimaryItem(name.to_string()));
                }
                let colored = match color {
                    Some(color_name) => {
                        let color_id = *color_index
                            .get(color_name)
                            .ok_or_else(|| BuildError::ColorNotDeclared(color_name.to_string()))?;
                        ColoredItem::with_color(ItemId::new(item_id), ColorId::new(color_id))
                    }
                    None => ColoredItem::new(ItemId::new(item_id)),
                };
                parsed.push(colored);
            }
            options.push(OptionSpec {
                items: parsed,
                meaning,
            });
        }

        let primary = self
            .primary_items
            .into_iter()
            .map(|(name, u, v)| PrimaryItemSpec {
                name,
                bounds: Bounds::new(u, v),
            })
            .collect();

        Ok(Problem {
            primary,
            secondary_names: self.secondary_items,
            colors: self.colors,
            options,
        })
    }
}

impl<T: Debug> Builder<T> {
    /// Prints the configuration to stdout in a format close to Knuth's dlx2
    /// input format. Only available when the meaning type is `Debug`.
    pub fn dump_knuth_format(&self) {
        println!("| primary items: {}", self.primary_items.len());
        println!("| secondary items: {}", self.secondary_items.len());
        println!("| options: {}", self.options.len());
        print!(
            "{}",
            self.primary_items
                .iter()
                .map(|(name, _, _)| name.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        );
        if !self.secondary_items.is_empty() {
            print!(" | ");
            print!("{}", self.secondary_items.join(" "));
        }
        println!();
        for (i, (meaning, items)) in self.options.iter().enumerate() {
            println!("| Option {}: {:?}", i, meaning);
            println!("{}", items.join(" "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_undeclared_item() {
        let mut builder: Builder<usize> = Builder::new();
        builder.add_primary_item("a");
        builder.add_option(1, ["a", "b"]);
        assert!(matches!(
            builder.try_build(),
            Err(BuildError::ItemNotDeclared(name)) if name == "b"
        ));
    }

    #[test]
    fn rejects_duplicate_declaration() {
        let mut builder: Builder<usize> = Builder::new();
        builder.add_primary_item("a");
        builder.add_secondary_item("a");
        builder.add_option(1, ["a"]);
        assert!(matches!(
            builder.try_build(),
            Err(BuildError::ItemDeclaredTwice(name)) if name == "a"
        ));
    }

    #[test]
    fn rejects_color_on_primary() {
        let mut builder: Builder<usize> = Builder::new();
        builder.add_primary_item("a");
        builder.add_option(1, ["a:red"]);
        assert!(matches!(
            builder.try_build(),
            Err(BuildError::ColorOnPrimaryItem(name)) if name == "a"
        ));
    }

    #[test]
    fn rejects_invalid_bounds() {
        let mut builder: Builder<usize> = Builder::new();
        builder.add_primary_item_with_bounds("a", 3, 2);
        builder.add_option(1, ["a"]);
        assert!(matches!(
            builder.try_build(),
            Err(BuildError::InvalidBounds(name, 3, 2)) if name == "a"
        ));
    }

    #[test]
    fn rejects_no_primary_items() {
        let builder: Builder<usize> = Builder::new();
        assert!(matches!(builder.try_build(), Err(BuildError::NoPrimaryItems)));
    }

    #[test]
    fn rejects_no_options() {
        let mut builder: Builder<usize> = Builder::new();
        builder.add_primary_item("a");
        assert!(matches!(builder.try_build(), Err(BuildError::NoOptions)));
    }

    #[test]
    fn builds_colored_items() {
        let mut builder = Builder::new();
        builder.add_primary_items(["p", "q", "r"]);
        builder.add_secondary_items(["x", "y"]);
        builder.add_color("A");
        builder.add_option("p q x y:A", ["p", "q", "x", "y:A"]);
        builder.add_option("p r x:A y", ["p", "r", "x:A", "y"]);
        let problem = builder.build();
        assert_eq!(problem.num_items(), 5);
        assert_eq!(problem.num_primary_items(), 3);
        assert_eq!(problem.num_options(), 2);
    }

    #[test]
    fn rejects_undeclared_color() {
        let mut builder: Builder<usize> = Builder::new();
        builder.add_primary_item("p");
        builder.add_secondary_item("x");
        builder.add_option(1, ["p", "x:A"]);
        assert!(matches!(
            builder.try_build(),
            Err(BuildError::ColorNotDeclared(name)) if name == "A"
        ));
    }

    #[test]
    fn rejects_duplicate_color_declaration() {
        let mut builder: Builder<usize> = Builder::new();
        builder.add_primary_item("p");
        builder.add_secondary_item("x");
        builder.add_colors(["A", "A"]);
        builder.add_option(1, ["p", "x:A"]);
        assert!(matches!(
            builder.try_build(),
            Err(BuildError::ColorDeclaredTwice(name)) if name == "A"
        ));
    }

    #[test]
    fn declared_but_unused_color_is_accepted() {
        let mut builder: Builder<usize> = Builder::new();
        builder.add_primary_item("p");
        builder.add_secondary_item("x");
        builder.add_colors(["A", "B"]);
        builder.add_option(1, ["p", "x:A"]);
        let problem = builder.build();
        assert_eq!(problem.num_options(), 1);
    }
}
