use std::sync::LazyLock;

use regex::Regex;

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)(?:-(\d+))?\s*min").expect("duration regex is valid"));

/// Relative size weight for a segment duration string like `"2 min"` or `"3-4 min"`.
///
/// Ranges average their endpoints. Scale: 2 min = 1.5x, 5 min = 2x, 10+ min
/// clamps at 2x. Anything unparseable is weight 1.0, never an error.
pub fn duration_weight(duration: &str) -> f32 {
    let Some(caps) = DURATION_RE.captures(duration) else {
        return 1.0;
    };

    let min: f32 = match caps[1].parse() {
        Ok(v) => v,
        Err(_) => return 1.0,
    };
    let max: f32 = caps
        .get(2)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(min);
    let avg = (min + max) / 2.0;

    if avg <= 2.0 { 1.5 } else { 2.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_neutral() {
        assert_eq!(duration_weight(""), 1.0);
    }

    #[test]
    fn test_malformed_is_neutral() {
        assert_eq!(duration_weight("a while"), 1.0);
        assert_eq!(duration_weight("min"), 1.0);
    }

    #[test]
    fn test_single_value() {
        assert_eq!(duration_weight("2 min"), 1.5);
        assert_eq!(duration_weight("5 min"), 2.0);
        assert_eq!(duration_weight("10 min"), 2.0);
    }

    #[test]
    fn test_range_averages() {
        // 3-4 min averages to 3.5, which lands in the 2x bucket
        assert_eq!(duration_weight("3-4 min"), 2.0);
        assert_eq!(duration_weight("1-2 min"), 1.5);
    }

    #[test]
    fn test_no_space_before_unit() {
        assert_eq!(duration_weight("2min"), 1.5);
    }
}
