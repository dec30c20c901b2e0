use regexmatch::parse::KeyProfile;
use regexmatch::{Flags, RuleSetBuilder};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let builder = RuleSetBuilder::new()
        .profile(KeyProfile::Question)
        .answer("1", "[[tar -xzf archive\\.tar\\.gz]]/I/", |a| a.fraction(0.8))
        .answer("2", "[[tar xf $]]/X/\nfeedback=Close", |a| a.fraction(0.5))
        .answer("3", "", |a| a.fraction(0.0).feedback("Orphaned feedback"));

    for error in builder.validate() {
        println!("{error}");
    }

    match builder.compile() {
        Ok(ruleset) => println!("compiled {ruleset}"),
        Err(err) => println!("{err}"),
    }

    let fixed = RuleSetBuilder::new()
        .answer("1", "[[tar -xzf archive\\.tar\\.gz]]/I/", |a| a.fraction(1.0))
        .answer("2", "[[tar xf .*]]//\nseparator=;\ncomment=accepts any archive", |a| {
            a.fraction(0.5)
        })
        .compile()
        .expect("answers should be valid");

    for rule in fixed.rules() {
        let body = rule.body();
        println!(
            "{}: {:?} {} comment={:?}",
            rule.id(),
            body.regex_fragments(),
            body.flags(),
            body.comment()
        );
    }
    println!("defaults: {}", Flags::default());
}
