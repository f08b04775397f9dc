//! JSON reporter
//!
//! Outputs the full result, including the per-stage breakdown, as
//! pretty-printed JSON.

use super::ScoredMethod;
use anyhow::Result;

/// Render one method as JSON
pub fn render(method: &ScoredMethod<'_>) -> Result<String> {
    Ok(serde_json::to_string_pretty(method)?)
}

/// Render several methods as a JSON array
pub fn render_batch(methods: &[ScoredMethod<'_>]) -> Result<String> {
    Ok(serde_json::to_string_pretty(methods)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_result;

    #[test]
    fn test_json_render_valid() {
        let result = test_result();
        let method = ScoredMethod {
            name: "screen",
            result: &result,
        };
        let json_str = render(&method).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["name"], "screen");
        assert_eq!(parsed["result"]["axes"]["safety"], 30.0);
        assert_eq!(parsed["result"]["sub_factors"]["S1"], 30.0);
        assert_eq!(parsed["result"]["stages"]["instrument"]["masses"]["Methanol"], 7.91);
        assert_eq!(parsed["result"]["schemes"]["final_composite"], "Standard");
    }

    #[test]
    fn test_json_batch_is_array() {
        let result = test_result();
        let methods = vec![
            ScoredMethod { name: "a", result: &result },
            ScoredMethod { name: "b", result: &result },
        ];
        let json_str = render_batch(&methods).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed.as_array().expect("array").len(), 2);
        assert_eq!(parsed[1]["name"], "b");
    }
}
