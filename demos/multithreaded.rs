use std::sync::Arc;
use std::thread;

use regexmatch::RuleSetBuilder;

fn main() {
    let ruleset = Arc::new(
        RuleSetBuilder::new()
            .answer("full", "[[chmod 0?755 script\\.sh]]//", |a| a.fraction(1.0))
            .answer("symbolic", "[[chmod [ug]*\\+x script\\.sh]]//", |a| {
                a.fraction(0.5)
            })
            .compile()
            .expect("failed to compile ruleset"),
    );

    let answers = ["chmod 755 script.sh", "chmod +x script.sh", "chmod u+x  script.sh", "rm script.sh"];

    let handles: Vec<_> = answers
        .into_iter()
        .enumerate()
        .map(|(i, answer)| {
            let rs = Arc::clone(&ruleset);
            thread::spawn(move || {
                let score = rs.grade(answer);
                println!("Thread {i}: {answer:?} -> {score}");
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
