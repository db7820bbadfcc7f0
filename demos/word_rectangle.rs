use dlx_m::{Problem, SolveOptions, Solver};

// Fills a 3x3 grid so every row and every column spells a word from a
// small embedded list. Row/column selections are primary items; each grid
// cell is a secondary item colored by the chosen letter, so a row word and
// a column word that disagree on a shared cell's letter are automatically
// ruled out by color consistency -- the same mechanism demonstrated in
// `samples::colored`. A `#tally` sentinel primary item, touched by every
// placement, shows `non_sharp_preference`: with the flag set, the solver
// is pushed to resolve the real row/column choices before it would ever
// consider branching on the sentinel (whose branching factor is driven up
// by the large constant rather than its true candidate count).

const WORDS: &[&str] = &[
    "bat", "are", "ten", "cat", "car", "art", "net", "ear", "eat", "tea",
];

fn main() {
    let side = 3;

    let mut builder = Problem::builder();
    for r in 0..side {
        builder.add_primary_item(format!("R{r}"));
    }
    for c in 0..side {
        builder.add_primary_item(format!("C{c}"));
    }
    builder.add_primary_item_with_bounds("#tally", (2 * side) as u32, (2 * side) as u32);
    for r in 0..side {
        for c in 0..side {
            builder.add_secondary_item(format!("({r},{c})"));
        }
    }
    let mut letters: Vec<char> = WORDS.iter().flat_map(|w| w.chars()).collect();
    letters.sort_unstable();
    letters.dedup();
    builder.add_colors(letters.iter().map(|c| c.to_string()));

    for (r, word) in (0..side).flat_map(|r| WORDS.iter().map(move |w| (r, *w))) {
        if word.len() != side {
            continue;
        }
        let mut items = vec!["#tally".to_string(), format!("R{r}")];
        for (c, letter) in word.chars().enumerate() {
            items.push(format!("({r},{c}):{letter}"));
        }
        builder.add_option(('R', r, word.to_string()), items);
    }
    for (c, word) in (0..side).flat_map(|c| WORDS.iter().map(move |w| (c, *w))) {
        if word.len() != side {
            continue;
        }
        let mut items = vec!["#tally".to_string(), format!("C{c}")];
        for (r, letter) in word.chars().enumerate() {
            items.push(format!("({r},{c}):{letter}"));
        }
        builder.add_option(('C', c, word.to_string()), items);
    }

    let problem = builder.build();
    println!("Solving a {side}x{side} word rectangle...");
    let options = SolveOptions {
        max_solutions: 1,
        non_sharp_preference: true,
    };
    match Solver::with_options(&problem, options)
        .expect("demo problem never overflows setup")
        .solve_once()
    {
        Some(solution) => {
            let mut rows: Vec<(usize, String)> = solution
                .meanings(&problem)
                .into_iter()
                .filter(|(kind, _, _)| *kind == 'R')
                .map(|(_, r, word)| (*r, word.clone()))
                .collect();
            rows.sort_by_key(|(r, _)| *r);
            for (_, word) in rows {
                println!("{word}");
            }
        }
        None => println!("no solution found"),
    }
}
