use dlx_m::Problem;

// The partridge puzzle: tile an N x N board, N = n(n+1)/2, with exactly one
// 1x1 square, two 2x2 squares, ..., and n nxn squares. Every square size is
// a primary item with multiplicity bounds (k, k) -- it must be placed
// exactly k times -- and every board position is a primary item that must
// be covered exactly once. This demo uses the solver's multiplicity
// support directly; no colors are needed.

fn main() {
    let n = 5;
    let board = n * (n + 1) / 2;

    let mut builder = Problem::builder();
    for k in 1..=n {
        builder.add_primary_item_with_bounds(format!("#{k}"), k as u32, k as u32);
    }
    for row in 0..board {
        for col in 0..board {
            builder.add_primary_item(format!("({row},{col})"));
        }
    }

    for k in 1..=n {
        for row in 0..=(board - k) {
            for col in 0..=(board - k) {
                let mut items = vec![format!("#{k}")];
                for y in 0..k {
                    for x in 0..k {
                        items.push(format!("({},{})", row + y, col + x));
                    }
                }
                builder.add_option((k, row, col), items);
            }
        }
    }

    let mut problem = builder.build();
    println!("Solving the order-{n} partridge puzzle ({board}x{board} board)...");
    match problem.solve_once() {
        Some(solution) => {
            let mut grid = vec![0usize; board * board];
            for &(k, row, col) in solution.meanings(&problem) {
                for y in 0..k {
                    for x in 0..k {
                        grid[(row + y) * board + (col + x)] = k;
                    }
                }
            }
            for row in 0..board {
                let line: String = (0..board)
                    .map(|col| char::from_digit(grid[row * board + col] as u32, 16).unwrap())
                    .collect();
                println!("{line}");
            }
        }
        None => println!("no solution found"),
    }
}
