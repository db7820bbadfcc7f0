//! Small worked problems used in doctests and as a reference for anyone
//! writing their own [`Problem`](crate::Problem).

use crate::Problem;

/// Knuth's running example from 7.2.2.1: seven primary items `1..=7` and
/// six options. The unique exact cover is options 0 (`3 5`), 3 (`1 4 6`),
/// and 4 (`2 7`).
#[must_use]
pub fn toy() -> Problem<usize> {
    let mut builder = Problem::builder();
    builder.add_primary_items(1..=7);
    for (i, items) in [
        vec![3, 5],
        vec![1, 4, 7],
        vec![2, 3, 6],
        vec![1, 4, 6],
        vec![2, 7],
        vec![4, 5, 7],
    ]
    .into_iter()
    .enumerate()
    {
        builder.add_option(i, items);
    }
    builder.build()
}

/// The colored exact-cover example from TAOCP 7.2.2.1 (Figure 49): three
/// primary items `p`, `q`, `r` and two secondary items `x`, `y`, each of
/// which may be asserted with a color (`A`, `B`, `C`, or `D`) by the
/// option that uses it.
#[must_use]
pub fn colored() -> Problem<usize> {
    let mut builder = Problem::builder();
    builder.add_primary_items(["p", "q", "r"]);
    builder.add_secondary_items(["x", "y"]);
    builder.add_colors(["A", "B", "C", "D"]);
    builder.add_option(0, ["p", "q", "x:C", "y:A"]);
    builder.add_option(1, ["p", "r", "x:A", "y:D"]);
    builder.add_option(2, ["p", "x:B"]);
    builder.add_option(3, ["q", "x:A"]);
    builder.add_option(4, ["r", "y:B"]);
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toy_has_the_textbook_solution() {
        let mut problem = toy();
        let solutions = problem.solve_all();
        assert_eq!(solutions.len(), 1);
        let mut numbers: Vec<usize> = solutions[0].option_numbers().collect();
        numbers.sort_unstable();
        assert_eq!(numbers, vec![0, 3, 4]);
    }

    #[test]
    fn colored_has_the_textbook_solution() {
        let mut problem = colored();
        let solutions = problem.solve_all();
        assert_eq!(solutions.len(), 1);
        let mut numbers: Vec<usize> = solutions[0].option_numbers().collect();
        numbers.sort_unstable();
        assert_eq!(numbers, vec![1, 3, 4]);
    }
}
