#[macro_use]
extern crate criterion;
use criterion::Criterion;

use dlx_m::Problem;

fn partridge(c: &mut Criterion) {
    c.bench_function("partridge", |b| {
        b.iter(|| {
            let n = 4;
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
            let _ = problem.solve_once();
        })
    });
}

fn simple(c: &mut Criterion) {
    c.bench_function("simple", |b| {
        b.iter(|| {
            let mut builder = Problem::builder();
            builder.add_primary_items(1..=7);
            builder.add_option("o1", [3, 5]);
            builder.add_option("o2", [1, 4, 7]);
            builder.add_option("o3", [2, 3, 6]);
            builder.add_option("o4", [1, 4, 6]);
            builder.add_option("o5", [2, 7]);
            builder.add_option("o6", [4, 5, 7]);

            let mut problem = builder.build();
            let _ = problem.solve_all();
        })
    });
}

criterion_group!(benches, partridge, simple);
criterion_main!(benches);
