//! Attribute-tree ingest.
//!
//! The external parser emits its tree as nested attribute maps: each node is
//! a map keyed by attribute name (`term`, `boost`, `field`, `inclusive_range`
//! and so on), sequences are arrays, and boolean keywords are bare strings.
//! The same logical node can carry different optional attributes, so a map is
//! matched by its exact key set.
//!
//! ```text
//! {"field": "title", "operand": {"term": "foo", "boost": "2"}}
//!  ───┬───────────── ──────────────┬──────────────────────────
//!     │                            └── Term + Boost
//!     └── Field over operand
//! ```

use serde_json::{Map, Value, json};
use std::io::Read;
use tracing::{debug, trace};

use crate::ast::*;
use crate::error::{QueryError, QueryResult};

const ROOT: &str = "$";

/// Convert a parser attribute tree into a typed tree.
pub fn from_value(value: &Value) -> QueryResult<Node> {
    ingest(value, ROOT)
}

/// Parse JSON text, then ingest it.
pub fn from_json_str(input: &str) -> QueryResult<Node> {
    let value: Value = serde_json::from_str(input)?;
    from_value(&value)
}

/// Read JSON from a reader, then ingest it.
pub fn from_reader(reader: impl Read) -> QueryResult<Node> {
    let value: Value = serde_json::from_reader(reader)?;
    from_value(&value)
}

fn ingest(value: &Value, path: &str) -> QueryResult<Node> {
    match value {
        Value::Array(items) => {
            let nodes = items
                .iter()
                .enumerate()
                .map(|(i, item)| ingest(item, &format!("{}[{}]", path, i)))
                .collect::<QueryResult<Vec<_>>>()?;
            trace!(path, len = nodes.len(), "sequence");
            Ok(Node::Sequence(nodes))
        }
        // Keywords (AND, OR, NOT) arrive as plain tokens
        Value::String(token) => {
            trace!(path, token = token.as_str(), "literal token");
            Ok(Node::term(token.as_str()))
        }
        Value::Object(map) => ingest_map(map, path),
        other => Err(QueryError::unhandled(path, json_kind(other))),
    }
}

fn ingest_map(map: &Map<String, Value>, path: &str) -> QueryResult<Node> {
    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
    keys.sort_unstable();
    trace!(path, ?keys, "matching node shape");

    let node: Node = match keys.as_slice() {
        ["term"] => Node::term(text(map, "term", path)?),
        ["similarity", "term"] => {
            let similarity = match &map["similarity"] {
                // `fuzzy~` with no digits
                Value::Null => String::new(),
                _ => text(map, "similarity", path)?,
            };
            Term::new(text(map, "term", path)?).fuzzy(similarity).into()
        }
        ["boost", "term"] => Term::new(text(map, "term", path)?)
            .boost(text(map, "boost", path)?)
            .into(),
        ["phrase"] => Node::phrase(text(map, "phrase", path)?),
        ["boost", "phrase"] => Phrase::new(text(map, "phrase", path)?)
            .boost(text(map, "boost", path)?)
            .into(),
        ["distance", "phrase"] => Phrase::new(text(map, "phrase", path)?)
            .distance(text(map, "distance", path)?)
            .into(),
        ["group"] => Node::group(ingest(&map["group"], &child(path, "group"))?),
        ["operand", "unary_operator"] => {
            let marker = &map["unary_operator"];
            let operator = unary_operator(marker, &child(path, "unary_operator"))?;
            Node::unary(operator, ingest(&map["operand"], &child(path, "operand"))?)
        }
        ["operand"] => {
            debug!(path, "unwrapping bare operand");
            ingest(&map["operand"], &child(path, "operand"))?
        }
        ["field", "operand"] => Node::field(
            text(map, "field", path)?,
            ingest(&map["operand"], &child(path, "operand"))?,
        ),
        ["field", "inclusive_range"] => Node::Field {
            field: text(map, "field", path)?,
            value: FieldValue::Inclusive(range(
                &map["inclusive_range"],
                &child(path, "inclusive_range"),
            )?),
        },
        ["exclusive_range", "field"] => Node::Field {
            field: text(map, "field", path)?,
            value: FieldValue::Exclusive(range(
                &map["exclusive_range"],
                &child(path, "exclusive_range"),
            )?),
        },
        _ => return Err(QueryError::unhandled(path, shape(&keys))),
    };

    trace!(path, kind = node.kind(), "matched");
    Ok(node)
}

/// `{"required": "+"}`, `{"prohibited": "-"}`, or the bare symbol.
fn unary_operator(value: &Value, path: &str) -> QueryResult<UnaryOperator> {
    let (attribute, symbol) = match value {
        Value::String(symbol) => ("unary_operator", symbol.as_str()),
        Value::Object(map) => match (map.len(), map.iter().next()) {
            (1, Some((key, Value::String(symbol)))) => (key.as_str(), symbol.as_str()),
            (1, Some((key, other))) => {
                return Err(QueryError::invalid(
                    path,
                    key.as_str(),
                    format!("expected a string, found {}", json_kind(other)),
                ));
            }
            _ => {
                let keys: Vec<&str> = map.keys().map(String::as_str).collect();
                return Err(QueryError::unhandled(path, shape(&keys)));
            }
        },
        other => return Err(QueryError::unhandled(path, json_kind(other))),
    };

    let operator = UnaryOperator::from_symbol(symbol).ok_or_else(|| {
        QueryError::invalid(path, attribute, format!("unknown unary operator '{}'", symbol))
    })?;

    match attribute {
        "unary_operator" => Ok(operator),
        name if name == operator.attribute() => Ok(operator),
        "required" | "prohibited" => Err(QueryError::invalid(
            path,
            attribute,
            format!("'{}' does not mark a {} operand", symbol, attribute),
        )),
        _ => Err(QueryError::unhandled(path, shape(&[attribute]))),
    }
}

fn range(value: &Value, path: &str) -> QueryResult<Range> {
    let map = match value {
        Value::Object(map) => map,
        other => return Err(QueryError::unhandled(path, json_kind(other))),
    };
    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
    keys.sort_unstable();
    match keys.as_slice() {
        ["from", "to"] => Ok(Range::new(text(map, "from", path)?, text(map, "to", path)?)),
        _ => Err(QueryError::unhandled(path, shape(&keys))),
    }
}

/// Textual attributes are kept exactly as the parser read them, so numbers
/// are rejected rather than reformatted.
fn text(map: &Map<String, Value>, attribute: &str, path: &str) -> QueryResult<String> {
    match map.get(attribute) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(QueryError::invalid(
            path,
            attribute,
            format!("expected a string, found {}", json_kind(other)),
        )),
        None => Err(QueryError::invalid(path, attribute, "missing")),
    }
}

fn child(path: &str, key: &str) -> String {
    format!("{}.{}", path, key)
}

fn shape(keys: &[&str]) -> String {
    format!("{{{}}}", keys.join(", "))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Convert a typed tree into the attribute tree a parser would produce for it.
pub fn to_value(node: &Node) -> Value {
    match node {
        Node::Term(term) => match &term.modifier {
            None => json!({ "term": term.value }),
            Some(TermModifier::Similarity(s)) => json!({ "term": term.value, "similarity": s }),
            Some(TermModifier::Boost(b)) => json!({ "term": term.value, "boost": b }),
        },
        Node::Phrase(phrase) => match &phrase.modifier {
            None => json!({ "phrase": phrase.value }),
            Some(PhraseModifier::Boost(b)) => json!({ "phrase": phrase.value, "boost": b }),
            Some(PhraseModifier::Distance(d)) => {
                json!({ "phrase": phrase.value, "distance": d })
            }
        },
        Node::Group { inner } => json!({ "group": to_value(inner) }),
        Node::Unary { operator, operand } => {
            let mut marker = Map::new();
            marker.insert(operator.attribute().to_string(), json!(operator.symbol()));
            json!({ "unary_operator": marker, "operand": to_value(operand) })
        }
        Node::Field { field, value } => match value {
            FieldValue::Operand(operand) => json!({ "field": field, "operand": to_value(operand) }),
            FieldValue::Inclusive(r) => {
                json!({ "field": field, "inclusive_range": { "from": r.from, "to": r.to } })
            }
            FieldValue::Exclusive(r) => {
                json!({ "field": field, "exclusive_range": { "from": r.from, "to": r.to } })
            }
        },
        Node::Sequence(items) => Value::Array(items.iter().map(to_value).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::serialize;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_term_shapes() {
        assert_eq!(from_value(&json!({"term": "foo"})).unwrap(), Node::term("foo"));
        assert_eq!(
            from_value(&json!({"term": "foo", "boost": "2"})).unwrap(),
            Node::from(Term::new("foo").boost("2"))
        );
        assert_eq!(
            from_value(&json!({"term": "foo", "similarity": "0.8"})).unwrap(),
            Node::from(Term::new("foo").fuzzy("0.8"))
        );
    }

    #[test]
    fn test_null_similarity_is_bare_fuzzy() {
        let node = from_value(&json!({"term": "fuzzy", "similarity": null})).unwrap();
        assert_eq!(node, Node::from(Term::new("fuzzy").fuzzy("")));
        assert_eq!(serialize(&node), "fuzzy~");
    }

    #[test]
    fn test_phrase_shapes() {
        assert_eq!(
            from_value(&json!({"phrase": "foo bar", "distance": "2"})).unwrap(),
            Node::from(Phrase::new("foo bar").distance("2"))
        );
        assert_eq!(
            from_value(&json!({"phrase": "foo bar", "boost": "10"})).unwrap(),
            Node::from(Phrase::new("foo bar").boost("10"))
        );
    }

    #[test]
    fn test_keywords_are_literal_tokens() {
        let node = from_value(&json!([{"term": "foo"}, "AND", {"term": "bar"}])).unwrap();
        assert_eq!(node, Node::sequence(["foo", "AND", "bar"]));
    }

    #[test]
    fn test_unary_operator_forms() {
        let marked = json!({"unary_operator": {"prohibited": "-"}, "operand": {"term": "foo"}});
        let bare = json!({"unary_operator": "-", "operand": {"term": "foo"}});
        assert_eq!(from_value(&marked).unwrap(), Node::prohibited("foo"));
        assert_eq!(from_value(&bare).unwrap(), Node::prohibited("foo"));
    }

    #[test]
    fn test_mismatched_unary_marker() {
        let value = json!({"unary_operator": {"required": "-"}, "operand": {"term": "foo"}});
        let err = from_value(&value).unwrap_err();
        assert!(matches!(
            err,
            QueryError::InvalidAttribute { ref attribute, .. } if attribute == "required"
        ));
    }

    #[test]
    fn test_unknown_unary_symbol() {
        let value = json!({"unary_operator": "!", "operand": {"term": "foo"}});
        assert!(matches!(
            from_value(&value),
            Err(QueryError::InvalidAttribute { .. })
        ));
    }

    #[test]
    fn test_unary_marker_must_hold_one_symbol() {
        let empty = json!({"unary_operator": {}, "operand": {"term": "foo"}});
        match from_value(&empty).unwrap_err() {
            QueryError::UnhandledShape { path, shape } => {
                assert_eq!(path, "$.unary_operator");
                assert_eq!(shape, "{}");
            }
            other => panic!("unexpected error: {other}"),
        }

        let both = json!({
            "unary_operator": {"prohibited": "-", "required": "+"},
            "operand": {"term": "foo"}
        });
        assert!(matches!(
            from_value(&both),
            Err(QueryError::UnhandledShape { .. })
        ));

        let numeric = json!({"unary_operator": {"required": 1}, "operand": {"term": "foo"}});
        assert_eq!(
            from_value(&numeric).unwrap_err().to_string(),
            "Invalid attribute 'required' at $.unary_operator: expected a string, found number"
        );
    }

    #[test]
    fn test_operand_wrapper_is_transparent() {
        let value = json!({"operand": {"operand": {"phrase": "a b"}}});
        assert_eq!(from_value(&value).unwrap(), Node::phrase("a b"));
    }

    #[test]
    fn test_group_of_single_node() {
        let value = json!({"group": {"term": "baz"}});
        assert_eq!(from_value(&value).unwrap(), Node::group("baz"));
    }

    #[test]
    fn test_field_ranges() {
        let value = json!({"field": "month", "inclusive_range": {"from": "6", "to": "*"}});
        assert_eq!(from_value(&value).unwrap(), Node::inclusive("month", "6", "*"));

        let value = json!({"field": "day", "exclusive_range": {"from": "*", "to": "10"}});
        assert_eq!(from_value(&value).unwrap(), Node::exclusive("day", "*", "10"));
    }

    #[test]
    fn test_term_with_similarity_and_boost_is_unhandled() {
        let value = json!([{"term": "a"}, {"term": "foo", "similarity": "1", "boost": "2"}]);
        match from_value(&value).unwrap_err() {
            QueryError::UnhandledShape { path, shape } => {
                assert_eq!(path, "$[1]");
                assert_eq!(shape, "{boost, similarity, term}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_field_with_two_values_is_unhandled() {
        let value = json!({
            "field": "year",
            "operand": {"term": "2010"},
            "inclusive_range": {"from": "2010", "to": "2011"}
        });
        assert!(matches!(
            from_value(&value),
            Err(QueryError::UnhandledShape { .. })
        ));
    }

    #[test]
    fn test_unknown_keys_are_unhandled() {
        assert!(matches!(
            from_value(&json!({"regex": "/ab+c/"})),
            Err(QueryError::UnhandledShape { .. })
        ));
        assert!(matches!(
            from_value(&json!(42)),
            Err(QueryError::UnhandledShape { .. })
        ));
    }

    #[test]
    fn test_bad_range_is_unhandled_with_path() {
        let value = json!({"group": [{"field": "year", "inclusive_range": {"from": "2010"}}]});
        match from_value(&value).unwrap_err() {
            QueryError::UnhandledShape { path, .. } => {
                assert_eq!(path, "$.group[0].inclusive_range");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_numeric_attributes_are_rejected() {
        let err = from_value(&json!({"term": "boosted", "boost": 0.1})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid attribute 'boost' at $: expected a string, found number"
        );
    }

    #[test]
    fn test_from_json_str() {
        let node = from_json_str(r#"{"field": "title", "operand": {"term": "foo"}}"#).unwrap();
        assert_eq!(node, Node::field("title", "foo"));
        assert!(matches!(from_json_str("{"), Err(QueryError::Json(_))));
    }

    #[test]
    fn test_to_value_is_inverse() {
        let tree = Node::sequence([
            Node::required(Node::group(Node::sequence(["foo", "bar"]))),
            Node::prohibited(Node::phrase("mumble stuff")),
            Node::from(Term::new("fuzzy").fuzzy("")),
            Node::field("title", Node::from(Phrase::new("a b").distance("2"))),
            Node::exclusive("year", "2010", "*"),
        ]);
        let value = to_value(&tree);
        let back = from_value(&value).unwrap();
        assert_eq!(back, tree);
        assert_eq!(serialize(&back), serialize(&tree));
    }
}
