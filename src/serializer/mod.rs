//! Query serializer for the expression tree.
//!
//! Converts typed nodes back into canonical Lucene query text. Children are
//! serialized first and their text is substituted verbatim into the parent's
//! rule, so the whole tree is rendered in one post-order pass.

use crate::ast::*;


/// Trait for converting tree nodes to query text.
pub trait ToQuery {
    /// Convert this node to its canonical query string.
    fn to_query(&self) -> String;
}

/// Serialize a whole tree.
pub fn serialize(node: &Node) -> String {
    node.to_query()
}

impl ToQuery for Node {
    fn to_query(&self) -> String {
        match self {
            Node::Term(term) => term.to_query(),
            Node::Phrase(phrase) => phrase.to_query(),
            Node::Group { inner } => format!("({})", inner.to_query()),
            Node::Unary { operator, operand } => {
                format!("{}{}", operator.symbol(), operand.to_query())
            }
            Node::Field { field, value } => format!("{}:{}", field, value.to_query()),
            Node::Sequence(items) => {
                let parts: Vec<String> = items.iter().map(|n| n.to_query()).collect();
                parts.join(" ")
            }
        }
    }
}

impl ToQuery for Term {
    fn to_query(&self) -> String {
        match &self.modifier {
            None => self.value.clone(),
            // An empty similarity is the default fuzzy form: `value~`
            Some(TermModifier::Similarity(similarity)) => {
                format!("{}~{}", self.value, similarity)
            }
            Some(TermModifier::Boost(boost)) => format!("{}^{}", self.value, boost),
        }
    }
}

impl ToQuery for Phrase {
    fn to_query(&self) -> String {
        match &self.modifier {
            None => format!("\"{}\"", self.value),
            Some(PhraseModifier::Boost(boost)) => format!("\"{}\"^{}", self.value, boost),
            Some(PhraseModifier::Distance(distance)) => {
                format!("\"{}\"~{}", self.value, distance)
            }
        }
    }
}

impl ToQuery for FieldValue {
    fn to_query(&self) -> String {
        match self {
            FieldValue::Operand(operand) => operand.to_query(),
            FieldValue::Inclusive(range) => format!("[{}]", range.to_query()),
            FieldValue::Exclusive(range) => format!("{{{}}}", range.to_query()),
        }
    }
}

impl ToQuery for Range {
    fn to_query(&self) -> String {
        format!("{} TO {}", self.from, self.to)
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_query())
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_query())
    }
}

impl std::fmt::Display for Phrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_query())
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_query())
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_query())
    }
}
