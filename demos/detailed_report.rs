use regexmatch::{AnswerRule, RuleOutcome, RuleSet};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let ruleset = RuleSet::from_rules(vec![
        AnswerRule::new("redirect", "[[echo hi>out\\.txt]]/R/", 1.0),
        AnswerRule::new("broken", "[[echo (hi]]//", 1.0),
        AnswerRule::new("echo_only", "[[echo .*]]//", 0.25),
    ]);

    let report = ruleset.grade_detailed("echo hi > out.txt");

    println!("{report}");
    println!();
    for (id, outcome) in report.outcomes() {
        match outcome {
            RuleOutcome::Matched { raw, weighted } => {
                println!("  {id}: matched (raw {raw:.2}, weighted {weighted:.2})");
            }
            RuleOutcome::NoMatch => println!("  {id}: no match"),
            RuleOutcome::Unprocessable(err) => println!("  {id}: unprocessable ({err})"),
        }
    }
    if let Some(notice) = report.notice() {
        println!("Student notice: {notice}");
    }
    println!("Duration: {:?}", report.duration());
}
