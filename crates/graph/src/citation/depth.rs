//! Traversal depth as supplied by callers
//!
//! Anything that is not a positive number becomes 1.

use serde::Serialize;
use serde_json::Value;

/// Number of hops away from the seed, always at least 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Depth(usize);

impl Depth {
    pub const MIN: Depth = Depth(1);

    pub fn new(hops: usize) -> Self {
        Depth(hops.max(1))
    }

    pub fn from_i64(hops: i64) -> Self {
        usize::try_from(hops).map(Self::new).unwrap_or(Self::MIN)
    }

    /// Lenient text parse: "3" -> 3, "2.9" -> 2, "-1" / "abc" / "" -> 1
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if let Ok(n) = input.parse::<i64>() {
            return Self::from_i64(n);
        }
        match input.parse::<f64>() {
            Ok(f) if f.is_finite() && f >= 1.0 => Self::new(f.trunc() as usize),
            _ => Self::MIN,
        }
    }

    /// Depth from an arbitrary JSON value (number, numeric string, or junk)
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Self::from_i64(i),
                (None, Some(f)) if f.is_finite() && f >= 1.0 => Self::new(f.trunc() as usize),
                _ => Self::MIN,
            },
            Value::String(s) => Self::parse(s),
            _ => Self::MIN,
        }
    }

    /// Cap at `max` hops (which is itself at least 1)
    pub fn clamp_to(self, max: usize) -> Self {
        Depth(self.0.min(max.max(1)))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for Depth {
    fn default() -> Self {
        Self::MIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse() {
        assert_eq!(Depth::parse("3").get(), 3);
        assert_eq!(Depth::parse(" 2 ").get(), 2);
        assert_eq!(Depth::parse("2.9").get(), 2);
        assert_eq!(Depth::parse("0").get(), 1);
        assert_eq!(Depth::parse("-4").get(), 1);
        assert_eq!(Depth::parse("deep").get(), 1);
        assert_eq!(Depth::parse("").get(), 1);
        assert_eq!(Depth::parse("NaN").get(), 1);
    }

    #[test]
    fn test_from_value() {
        assert_eq!(Depth::from_value(&json!(2)).get(), 2);
        assert_eq!(Depth::from_value(&json!(-2)).get(), 1);
        assert_eq!(Depth::from_value(&json!(0.5)).get(), 1);
        assert_eq!(Depth::from_value(&json!("4")).get(), 4);
        assert_eq!(Depth::from_value(&json!(null)).get(), 1);
        assert_eq!(Depth::from_value(&json!([3])).get(), 1);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(Depth::new(9).clamp_to(4).get(), 4);
        assert_eq!(Depth::new(2).clamp_to(4).get(), 2);
        assert_eq!(Depth::new(2).clamp_to(0).get(), 1);
    }
}
