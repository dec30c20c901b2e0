use regexmatch::RuleSetBuilder;

fn main() {
    let ruleset = RuleSetBuilder::new()
        .answer("exact", "[[ls -la /tmp]]//", |a| {
            a.fraction(1.0).feedback("Correct.")
        })
        .answer("no_hidden", "[[ls -l /tmp]]//", |a| {
            a.fraction(0.5).feedback("Hidden files are missing, try -a.")
        })
        .answer("wrong_dir", "[[ls .*]]//", |a| {
            a.fraction(0.0).feedback("Look in /tmp.")
        })
        .compile()
        .expect("failed to compile ruleset");

    println!("{ruleset}");

    for answer in ["ls   -la /tmp", "ls -l /tmp", "ls -la", "pwd"] {
        let score = ruleset.grade(answer);
        let feedback = score
            .rule()
            .and_then(|id| ruleset.rule(id))
            .map_or("", |rule| rule.feedback());
        println!("{answer:?} -> {score} {feedback}");
    }
}
