use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use criterion::{criterion_group, criterion_main, Criterion};
use regexmatch::{RuleSet, RuleSetBuilder};

fn build_shared_ruleset() -> Arc<RuleSet> {
    let mut builder = RuleSetBuilder::new()
        .answer("full", "[[find . -name \\*.rs]] [[wc -l]]/OP/", |a| a.fraction(1.0));

    for i in 0..20 {
        builder = builder.answer(&format!("partial{i}"), &format!("[[find .* {i}]]//"), |a| {
            a.fraction(0.1)
        });
    }

    Arc::new(builder.compile().unwrap())
}

fn bench_throughput(c: &mut Criterion) {
    let thread_counts = [1, 2, 4, 8];
    let answer = "wc -l\nfind   .  -name *.rs";

    let mut group = c.benchmark_group("throughput");
    group.measurement_time(Duration::from_secs(5));

    for &threads in &thread_counts {
        let ruleset = build_shared_ruleset();

        group.bench_function(format!("{threads}_threads"), |b| {
            b.iter_custom(|iters| {
                let per_thread = iters / threads as u64;
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let rs = Arc::clone(&ruleset);
                        thread::spawn(move || {
                            let start = Instant::now();
                            for _ in 0..per_thread {
                                let _ = rs.grade(answer);
                            }
                            start.elapsed()
                        })
                    })
                    .collect();

                let mut max_elapsed = Duration::ZERO;
                for h in handles {
                    let elapsed = h.join().unwrap();
                    if elapsed > max_elapsed {
                        max_elapsed = elapsed;
                    }
                }
                max_elapsed
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_throughput);
criterion_main!(benches);
