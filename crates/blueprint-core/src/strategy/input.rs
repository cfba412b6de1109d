//! Typed field access over JSON case inputs.

use crate::error::{SolveError, SolveResult};
use serde_json::Value;

pub trait CaseInput {
    fn field(&self, name: &str) -> SolveResult<&Value>;

    fn int(&self, name: &str) -> SolveResult<i64> {
        self.field(name)?
            .as_i64()
            .ok_or_else(|| SolveError::invalid(name, "an integer"))
    }

    /// Non-negative integer usable as a size or index
    fn count(&self, name: &str) -> SolveResult<usize> {
        self.field(name)?
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| SolveError::invalid(name, "a non-negative integer"))
    }

    fn text(&self, name: &str) -> SolveResult<&str> {
        self.field(name)?
            .as_str()
            .ok_or_else(|| SolveError::invalid(name, "a string"))
    }

    fn ints(&self, name: &str) -> SolveResult<Vec<i64>> {
        int_list(self.field(name)?).ok_or_else(|| SolveError::invalid(name, "an integer array"))
    }

    fn int_grid(&self, name: &str) -> SolveResult<Vec<Vec<i64>>> {
        self.field(name)?
            .as_array()
            .and_then(|rows| rows.iter().map(int_list).collect())
            .ok_or_else(|| SolveError::invalid(name, "an array of integer arrays"))
    }

    fn strings(&self, name: &str) -> SolveResult<Vec<String>> {
        self.field(name)?
            .as_array()
            .and_then(|items| {
                items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .ok_or_else(|| SolveError::invalid(name, "a string array"))
    }

    /// Grid of one-character strings, as used for `"1"` / `"0"` maps
    fn char_grid(&self, name: &str) -> SolveResult<Vec<Vec<char>>> {
        self.field(name)?
            .as_array()
            .and_then(|rows| {
                rows.iter()
                    .map(|row| {
                        row.as_array()?
                            .iter()
                            .map(|cell| cell.as_str().and_then(|s| s.chars().next()))
                            .collect()
                    })
                    .collect()
            })
            .ok_or_else(|| SolveError::invalid(name, "a grid of single characters"))
    }
}

impl CaseInput for Value {
    fn field(&self, name: &str) -> SolveResult<&Value> {
        self.get(name)
            .ok_or_else(|| SolveError::MissingField(name.to_string()))
    }
}

fn int_list(value: &Value) -> Option<Vec<i64>> {
    value.as_array()?.iter().map(Value::as_i64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typed_access() {
        let input = json!({
            "nums": [1, 2, 3],
            "k": 2,
            "s": "abc",
            "grid": [["1", "0"], ["0", "1"]],
            "m": [[1], [2, 3]],
            "words": ["a", "b"]
        });
        assert_eq!(input.ints("nums").unwrap(), vec![1, 2, 3]);
        assert_eq!(input.int("k").unwrap(), 2);
        assert_eq!(input.count("k").unwrap(), 2);
        assert_eq!(input.text("s").unwrap(), "abc");
        assert_eq!(input.char_grid("grid").unwrap()[1], vec!['0', '1']);
        assert_eq!(input.int_grid("m").unwrap()[1], vec![2, 3]);
        assert_eq!(input.strings("words").unwrap().len(), 2);
    }

    #[test]
    fn test_errors() {
        let input = json!({"nums": [1, "x"], "k": -1});
        assert_eq!(input.count("k"), Err(SolveError::invalid("k", "a non-negative integer")));
        let input = json!({"nums": [1, "x"]});
        assert_eq!(input.int("k"), Err(SolveError::MissingField("k".to_string())));
        assert_eq!(input.ints("nums"), Err(SolveError::invalid("nums", "an integer array")));
    }
}
