//! `!roll` - roll dice.

use rand::Rng;

pub fn run(args: &[String]) -> String {
    let max = limit(args);
    let rolled = rand::rng().random_range(1..=max);
    format!("rolls {}", rolled)
}

/// Upper bound for the roll. Unparsable or absurd input falls back to 100.
fn limit(args: &[String]) -> u64 {
    args.get(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .filter(|n| *n >= 1)
        .unwrap_or(100)
}
