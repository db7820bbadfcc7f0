use dlx_m::Problem;

// Example constraint problem
//     i1  i2  i3  i4  i5  i6  i7
// o1   0   0   1   0   1   0   0
// o2   1   0   0   1   0   0   0
// o3   0   1   1   0   0   0   0
// o4   1   0   0   1   0   1   0
// o5   0   1   0   0   0   0   1
// o6   0   0   0   1   1   0   1
//
// The only valid solution is [o1,o4,o5]

fn main() {
    // Set RUST_LOG=trace to see the search driver's stage transitions.
    env_logger::init();

    let mut builder = Problem::builder();
    builder.add_primary_items(1..=7);
    builder.add_option("o1", [3, 5]);
    builder.add_option("o2", [1, 4, 7]);
    builder.add_option("o3", [2, 3, 6]);
    builder.add_option("o4", [1, 4, 6]);
    builder.add_option("o5", [2, 7]);
    builder.add_option("o6", [4, 5, 7]);

    let mut problem = builder.build();

    println!("Now finding solutions");
    for solution in problem.solve_all() {
        println!("Solution: {:?}", solution.meanings(&problem));
    }
}
