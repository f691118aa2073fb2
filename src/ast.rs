//! Abstract Syntax Tree for Lucene-style queries.
//!
//! This module defines the typed expression tree a parsed query is made of.
//! Every type here is immutable once built and is consumed by
//! [`crate::serializer`] to produce canonical query text.

use serde::{Deserialize, Serialize};

/// A node of the query expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    /// Bare token or wildcard pattern (`foo`, `fu?zy`, `fuzzy~0.8`)
    Term(Term),
    /// Quoted string (`"foo bar"`, `"foo bar"~2`)
    Phrase(Phrase),
    /// Parenthesized sub-expression (`(foo bar)`)
    Group { inner: Box<Node> },
    /// Required or prohibited prefix (`+foo`, `-"foo bar"`)
    Unary {
        operator: UnaryOperator,
        operand: Box<Node>,
    },
    /// Field-qualified value (`title:foo`, `year:[2010 TO 2011]`)
    Field { field: String, value: FieldValue },
    /// Ordered siblings, boolean keywords included as literal terms
    Sequence(Vec<Node>),
}

impl Node {
    /// Create a bare term node.
    pub fn term(value: impl Into<String>) -> Self {
        Node::Term(Term::new(value))
    }

    /// Create an unmodified phrase node.
    pub fn phrase(value: impl Into<String>) -> Self {
        Node::Phrase(Phrase::new(value))
    }

    /// Wrap a node in parentheses.
    pub fn group(inner: impl Into<Node>) -> Self {
        Node::Group {
            inner: Box::new(inner.into()),
        }
    }

    /// Prefix a node with a unary operator.
    pub fn unary(operator: UnaryOperator, operand: impl Into<Node>) -> Self {
        Node::Unary {
            operator,
            operand: Box::new(operand.into()),
        }
    }

    /// Mark a node as required (`+`).
    pub fn required(operand: impl Into<Node>) -> Self {
        Self::unary(UnaryOperator::Required, operand)
    }

    /// Mark a node as prohibited (`-`).
    pub fn prohibited(operand: impl Into<Node>) -> Self {
        Self::unary(UnaryOperator::Prohibited, operand)
    }

    /// Qualify a term, phrase or group with a field name.
    pub fn field(field: impl Into<String>, operand: impl Into<Node>) -> Self {
        Node::Field {
            field: field.into(),
            value: FieldValue::Operand(Box::new(operand.into())),
        }
    }

    /// Field restricted to an inclusive range (`field:[from TO to]`).
    pub fn inclusive(
        field: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Node::Field {
            field: field.into(),
            value: FieldValue::Inclusive(Range::new(from, to)),
        }
    }

    /// Field restricted to an exclusive range (`field:{from TO to}`).
    pub fn exclusive(
        field: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Node::Field {
            field: field.into(),
            value: FieldValue::Exclusive(Range::new(from, to)),
        }
    }

    /// Create a sequence from an ordered list of nodes.
    pub fn sequence<I, N>(items: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        Node::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// A boolean keyword as it appears inside a sequence.
    pub fn keyword(keyword: BooleanKeyword) -> Self {
        Self::term(keyword.as_str())
    }

    /// Short name of the node variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Term(_) => "term",
            Node::Phrase(_) => "phrase",
            Node::Group { .. } => "group",
            Node::Unary { .. } => "unary",
            Node::Field { .. } => "field",
            Node::Sequence(_) => "sequence",
        }
    }
}

impl From<Term> for Node {
    fn from(term: Term) -> Self {
        Node::Term(term)
    }
}

impl From<Phrase> for Node {
    fn from(phrase: Phrase) -> Self {
        Node::Phrase(phrase)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::term(value)
    }
}

/// An unquoted query token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Token text, wildcards (`*`, `?`) included
    pub value: String,
    /// Fuzzy similarity or boost, never both
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<TermModifier>,
}

impl Term {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            modifier: None,
        }
    }

    /// Attach a fuzzy similarity. An empty string means a bare `~`.
    pub fn fuzzy(mut self, similarity: impl Into<String>) -> Self {
        self.modifier = Some(TermModifier::Similarity(similarity.into()));
        self
    }

    /// Attach a boost weight.
    pub fn boost(mut self, boost: impl Into<String>) -> Self {
        self.modifier = Some(TermModifier::Boost(boost.into()));
        self
    }
}

/// Suffix carried by a term. Values are kept exactly as the parser read them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TermModifier {
    /// `~n`
    Similarity(String),
    /// `^n`
    Boost(String),
}

/// A quoted query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    /// Text between the quotes
    pub value: String,
    /// Boost or proximity distance, never both
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<PhraseModifier>,
}

impl Phrase {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            modifier: None,
        }
    }

    /// Attach a boost weight.
    pub fn boost(mut self, boost: impl Into<String>) -> Self {
        self.modifier = Some(PhraseModifier::Boost(boost.into()));
        self
    }

    /// Attach a proximity slop.
    pub fn distance(mut self, distance: impl Into<String>) -> Self {
        self.modifier = Some(PhraseModifier::Distance(distance.into()));
        self
    }
}

/// Suffix carried by a phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhraseModifier {
    /// `^n`
    Boost(String),
    /// `~n`
    Distance(String),
}

/// Prefix operator on an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    /// `+`
    Required,
    /// `-`
    Prohibited,
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Required => "+",
            UnaryOperator::Prohibited => "-",
        }
    }

    /// Attribute name the parser uses for this operator.
    pub fn attribute(self) -> &'static str {
        match self {
            UnaryOperator::Required => "required",
            UnaryOperator::Prohibited => "prohibited",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(UnaryOperator::Required),
            "-" => Some(UnaryOperator::Prohibited),
            _ => None,
        }
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// What a field qualifies: an operand or one of the two range kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    Operand(Box<Node>),
    /// `[from TO to]`
    Inclusive(Range),
    /// `{from TO to}`
    Exclusive(Range),
}

/// Bounded interval. Endpoints are opaque tokens, `*` for unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub from: String,
    pub to: String,
}

impl Range {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Boolean keywords. They live in sequences as literal terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanKeyword {
    And,
    Or,
    Not,
}

impl BooleanKeyword {
    pub fn as_str(self) -> &'static str {
        match self {
            BooleanKeyword::And => "AND",
            BooleanKeyword::Or => "OR",
            BooleanKeyword::Not => "NOT",
        }
    }
}

impl std::fmt::Display for BooleanKeyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
