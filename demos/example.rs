use dlx_m::Problem;

// Example constraint problem
//     i1  i2  i3  i4  i5  i6  i7
// A   x           x           x
// B   x           x
// C               x   x       x
// D           x       x   x
// E       x   x           x   x
// F       x                   x
//
// The only valid solution is [B,D,F]

fn main() {
    let mut builder = Problem::builder();
    builder.add_primary_items(1..=7);
    builder.add_option("A", [1, 4, 7]);
    builder.add_option("B", [1, 4]);
    builder.add_option("C", [4, 5, 7]);
    builder.add_option("D", [3, 5, 6]);
    builder.add_option("E", [2, 3, 6, 7]);
    builder.add_option("F", [2, 7]);

    let mut problem = builder.build();

    println!("Now finding solutions");
    for solution in problem.solve_all() {
        println!("Solution: {:?}", solution.meanings(&problem));
    }
}
