//! # lucene-query
//!
//! > **Tree in, canonical query out.**
//!
//! lucene-query turns a parsed Lucene-style expression tree back into
//! normalized query text. It is the serializing half of a parser/serializer
//! pair: parsing is done elsewhere, and the output re-parses to an equivalent
//! tree.
//!
//! ## Quick Example
//!
//! ```
//! use lucene_query::prelude::*;
//!
//! let tree = Node::sequence([
//!     Node::required(Node::group(Node::sequence(["foo", "bar"]))),
//!     Node::prohibited(Node::phrase("mumble stuff")),
//! ]);
//! assert_eq!(serialize(&tree), r#"+(foo bar) -"mumble stuff""#);
//! ```
//!
//! ## Rules
//!
//! | Node                    | Output             |
//! |-------------------------|--------------------|
//! | term                    | `value`            |
//! | term + similarity       | `value~similarity` |
//! | term + boost            | `value^boost`      |
//! | phrase                  | `"value"`          |
//! | phrase + boost          | `"value"^boost`    |
//! | phrase + distance       | `"value"~distance` |
//! | group                   | `(inner)`          |
//! | unary                   | `+operand`, `-operand` |
//! | field + operand         | `field:operand`    |
//! | field + inclusive range | `field:[from TO to]` |
//! | field + exclusive range | `field:{from TO to}` |
//! | sequence                | items joined by one space |

pub mod ast;
pub mod config;
pub mod error;
pub mod serializer;
pub mod tree;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::error::*;
    pub use crate::serializer::{ToQuery, serialize};
    pub use crate::tree::{from_value, to_value};
}

/// Serialize a typed tree into canonical query text.
pub fn serialize(node: &ast::Node) -> String {
    serializer::serialize(node)
}

/// Ingest a parser attribute tree and serialize it.
///
/// # Example
///
/// ```
/// use serde_json::json;
///
/// let tree = json!({"field": "month", "inclusive_range": {"from": "6", "to": "*"}});
/// assert_eq!(lucene_query::canonicalize(&tree).unwrap(), "month:[6 TO *]");
/// ```
pub fn canonicalize(value: &serde_json::Value) -> error::QueryResult<String> {
    let node = tree::from_value(value)?;
    Ok(serializer::serialize(&node))
}
