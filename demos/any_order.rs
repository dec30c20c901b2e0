use regexmatch::{AnswerRule, RuleSet};

fn main() {
    // The steps may be typed in any order, one per line.
    let ruleset = RuleSet::from_rules(vec![AnswerRule::new(
        "setup",
        "[[mkdir build]]\n[[cd build]]\n[[cmake \\.\\.]]\n/OP/",
        1.0,
    )]);

    let answers = [
        "mkdir build\ncd build\ncmake ..",
        "cd build\nmkdir build\ncmake ..",
        "mkdir build\ncmake ..",
        "mkdir build\ncd build\nmake\ncmake ..",
    ];

    for answer in answers {
        let score = ruleset.grade(answer);
        println!("{:?} -> {:.2}", answer.replace('\n', "; "), score.fraction());
    }

    // A custom separator splits the answer on something other than newlines.
    let ruleset = RuleSet::from_rules(vec![AnswerRule::new(
        "pipeline",
        "[[sort]] [[uniq -c]]/O/\nseparator=|",
        1.0,
    )]);
    println!("{}", ruleset.grade("uniq -c|sort"));
}
