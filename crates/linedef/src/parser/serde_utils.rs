use serde::{Serialize, Serializer};
use serde::ser::SerializeMap;

/// Serialize ordered `(name, value)` pairs as a map, keeping declaration order.
pub fn serialize_fields_as_map<S, V>(fields: &[(String, V)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    let mut map = serializer.serialize_map(Some(fields.len()))?;
    for (k, v) in fields {
        map.serialize_entry(k, v)?;
    }
    map.end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::model::Value;

    // Helper: serialize fields via serde_json
    fn serialize_fields(fields: &[(String, Value)]) -> String {
        #[derive(Serialize)]
        struct Wrapper<'a> {
            #[serde(serialize_with = "serialize_fields_as_map")]
            fields: &'a [(String, Value)],
        }

        let w = Wrapper { fields };
        serde_json::to_string(&w).unwrap()
    }

    #[test]
    fn test_serialize_empty_fields() {
        let json = serialize_fields(&[]);
        assert_eq!(json, r#"{"fields":{}}"#);
    }

    #[test]
    fn test_serialize_keeps_declaration_order() {
        let fields = vec![
            ("z_last".to_string(), Value::Integer(1)),
            ("a_first".to_string(), Value::Integer(2)),
        ];
        let json = serialize_fields(&fields);
        assert_eq!(json, r#"{"fields":{"z_last":1,"a_first":2}}"#);
    }

    #[test]
    fn test_serialize_value_kinds() {
        let fields = vec![
            ("absent".to_string(), Value::Absent),
            ("text".to_string(), Value::Text("GET /".to_string())),
            ("secs".to_string(), Value::Decimal(50.001)),
            ("ts".to_string(), Value::Timestamp(20090206121414)),
        ];
        let json = serialize_fields(&fields);
        assert_eq!(
            json,
            r#"{"fields":{"absent":null,"text":"GET /","secs":50.001,"ts":20090206121414}}"#
        );
    }

    #[test]
    fn test_serialize_special_characters() {
        let fields = vec![
            ("path".to_string(), Value::Text("/api/users?id=123&name=foo".to_string())),
            ("msg".to_string(), Value::Text("line with \"quotes\" and \\backslashes".to_string())),
        ];
        let json = serialize_fields(&fields);
        // Should be valid JSON
        let _: serde_json::Value = serde_json::from_str(&json).unwrap();
    }
}
