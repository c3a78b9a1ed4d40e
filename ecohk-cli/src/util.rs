use anyhow::{Context, Result};
use chrono::Utc;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse comma-separated seeds, keeping the order given.
pub fn parse_seeds(s: &str) -> Result<Vec<u64>> {
    split_csv(s)
        .iter()
        .map(|token| {
            token
                .parse::<u64>()
                .with_context(|| format!("invalid seed `{token}`"))
        })
        .collect()
}

/// Seed for an interactive game when none was given.
pub fn clock_seed() -> u64 {
    let now = Utc::now();
    let secs = u64::try_from(now.timestamp()).unwrap_or_default();
    secs.rotate_left(32) ^ u64::from(now.timestamp_subsec_nanos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" alpha, ,beta,  gamma ");
        assert_eq!(parts, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn parse_seeds_keeps_order() {
        assert_eq!(parse_seeds("7, 1337,42").unwrap(), vec![7, 1337, 42]);
        assert!(parse_seeds("").unwrap().is_empty());
    }

    #[test]
    fn parse_seeds_rejects_garbage() {
        let err = parse_seeds("1,two").unwrap_err();
        assert!(err.to_string().contains("two"));
    }
}
