use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decimal fields arrive as `"50.00"` or `50`; keep the text form.
pub(crate) fn opt_decimal<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Fee {
        #[serde(default, deserialize_with = "opt_decimal")]
        fee: Option<String>,
    }

    #[test]
    fn accepts_strings_numbers_and_null() {
        let f: Fee = serde_json::from_value(json!({"fee": "50.00"})).unwrap();
        assert_eq!(f.fee.as_deref(), Some("50.00"));
        let f: Fee = serde_json::from_value(json!({"fee": 35})).unwrap();
        assert_eq!(f.fee.as_deref(), Some("35"));
        let f: Fee = serde_json::from_value(json!({"fee": null})).unwrap();
        assert!(f.fee.is_none());
        let f: Fee = serde_json::from_value(json!({})).unwrap();
        assert!(f.fee.is_none());
    }
}
