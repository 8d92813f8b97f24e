//! A parser library for Paradox clausewitz-style text files.
//!
//! The format is loosely based on braces `{}` and `key = value` assignments,
//! typically encoded in `WINDOWS_1252`. Saves, mod rule files and the
//! converter's own mapping files all share it.
//!
//! Parsing produces a [`PdxNode`] tree. Downstream crates only consume the
//! query side of it: children by key, first leaf for a key, bare tokens.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use encoding_rs_io::DecodeReaderBytesBuilder;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected token {found:?} at token {pos}")]
    Unexpected { found: String, pos: usize },
    #[error("unbalanced braces at token {pos}")]
    Unbalanced { pos: usize },
}

/// A token scanned from a clausewitz text file.
///
/// Numbers are kept as text: the consumers decide whether `1444.11.11` is a
/// date, a float or three integers.
#[derive(Debug, Clone, PartialEq)]
enum Token {
    /// Bare identifier or number.
    Ident(String),
    /// Quoted string, quotes stripped.
    Str(String),
    LeftBrace,
    RightBrace,
    Equals,
}

/// A node in the parsed tree.
///
/// `key = scalar` becomes a child with a leaf value, `key = { ... }` a child
/// with its own children, and bare scalars inside braces accumulate as
/// tokens of the enclosing node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdxNode {
    key: String,
    leaf: Option<String>,
    tokens: Vec<String>,
    children: Vec<PdxNode>,
}

impl PdxNode {
    fn named(key: &str) -> Self {
        PdxNode {
            key: key.to_string(),
            ..Default::default()
        }
    }

    fn leaf_node(key: &str, value: &str) -> Self {
        PdxNode {
            key: key.to_string(),
            leaf: Some(value.to_string()),
            ..Default::default()
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The scalar value of this node, if it is a `key = scalar` assignment.
    pub fn leaf(&self) -> Option<&str> {
        self.leaf.as_deref()
    }

    /// The leaf of the first child with the given key.
    pub fn leaf_of(&self, key: &str) -> Option<&str> {
        self.children
            .iter()
            .find(|c| c.key == key)
            .and_then(|c| c.leaf())
    }

    /// All children with the given key, in file order.
    pub fn values(&self, key: &str) -> Vec<&PdxNode> {
        self.children.iter().filter(|c| c.key == key).collect()
    }

    /// All children, in file order.
    pub fn children(&self) -> &[PdxNode] {
        &self.children
    }

    /// Bare scalar tokens of this node (e.g. the members of `{ 1 2 3 }`).
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Counts the total number of nodes in this subtree (inclusive).
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
    }
}

fn tokenize(contents: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = contents.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => {
                // Comment runs to end of line
                for nc in chars.by_ref() {
                    if nc == '\n' {
                        break;
                    }
                }
            }
            '{' => {
                tokens.push(Token::LeftBrace);
                chars.next();
            }
            '}' => {
                tokens.push(Token::RightBrace);
                chars.next();
            }
            '=' => {
                tokens.push(Token::Equals);
                chars.next();
            }
            '"' => {
                chars.next();
                let mut s = String::new();
                while let Some(&nc) = chars.peek() {
                    if nc == '"' {
                        chars.next();
                        break;
                    }
                    s.push(nc);
                    chars.next();
                }
                tokens.push(Token::Str(s));
            }
            _ => {
                let mut s = String::new();
                while let Some(&nc) = chars.peek() {
                    if nc.is_whitespace() || matches!(nc, '=' | '{' | '}' | '#' | '"') {
                        break;
                    }
                    s.push(nc);
                    chars.next();
                }
                tokens.push(Token::Ident(s));
            }
        }
    }
    tokens
}

fn scalar(tok: &Token) -> Option<&str> {
    match tok {
        Token::Ident(s) | Token::Str(s) => Some(s),
        _ => None,
    }
}

/// Parses the body of a block into `node`, starting at `pos`.
/// Returns the position after the closing brace (or end of input at depth 0).
fn parse_block(
    node: &mut PdxNode,
    tokens: &[Token],
    mut pos: usize,
    depth: usize,
) -> Result<usize, ParseError> {
    loop {
        let tok = match tokens.get(pos) {
            None if depth == 0 => return Ok(pos),
            None => return Err(ParseError::UnexpectedEof),
            Some(t) => t,
        };
        match tok {
            Token::RightBrace => {
                if depth == 0 {
                    return Err(ParseError::Unbalanced { pos });
                }
                return Ok(pos + 1);
            }
            Token::LeftBrace => {
                // Anonymous nested block inside a list
                let mut child = PdxNode::named("");
                pos = parse_block(&mut child, tokens, pos + 1, depth + 1)?;
                node.children.push(child);
            }
            _ => {
                let lhs = scalar(tok).ok_or_else(|| ParseError::Unexpected {
                    found: format!("{:?}", tok),
                    pos,
                })?;
                if tokens.get(pos + 1) == Some(&Token::Equals) {
                    match tokens.get(pos + 2) {
                        Some(Token::LeftBrace) => {
                            let mut child = PdxNode::named(lhs);
                            pos = parse_block(&mut child, tokens, pos + 3, depth + 1)?;
                            node.children.push(child);
                        }
                        Some(rhs) => {
                            let value = scalar(rhs).ok_or_else(|| ParseError::Unexpected {
                                found: format!("{:?}", rhs),
                                pos: pos + 2,
                            })?;
                            node.children.push(PdxNode::leaf_node(lhs, value));
                            pos += 3;
                        }
                        None => return Err(ParseError::UnexpectedEof),
                    }
                } else {
                    node.tokens.push(lhs.to_string());
                    pos += 1;
                }
            }
        }
    }
}

/// Parses a full document into an unnamed root node.
pub fn parse_str(contents: &str) -> Result<PdxNode, ParseError> {
    let tokens = tokenize(contents);
    let mut root = PdxNode::named("");
    let end = parse_block(&mut root, &tokens, 0, 0)?;
    if end != tokens.len() {
        return Err(ParseError::Unbalanced { pos: end });
    }
    Ok(root)
}

/// Reads and parses a WINDOWS-1252 encoded file.
pub fn parse_file(path: &Path) -> Result<PdxNode, ParseError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(
        DecodeReaderBytesBuilder::new()
            .encoding(Some(WINDOWS_1252))
            .build(file),
    );
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    parse_str(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn assignments_and_blocks() {
        let root = parse_str(
            r#"
            owner = SWE
            core = SWE
            core = DAN
            history = {
                1444.11.11 = { owner = SWE }
            }
            "#,
        )
        .unwrap();

        assert_eq!(root.leaf_of("owner"), Some("SWE"));
        assert_eq!(root.values("core").len(), 2);
        assert_eq!(root.values("core")[1].leaf(), Some("DAN"));

        let history = &root.values("history")[0];
        let entry = &history.children()[0];
        assert_eq!(entry.key(), "1444.11.11");
        assert_eq!(entry.leaf_of("owner"), Some("SWE"));
    }

    #[test]
    fn token_lists() {
        let root = parse_str("state = { 853 854 855 }").unwrap();
        let state = &root.values("state")[0];
        assert_eq!(state.tokens(), &["853", "854", "855"]);
    }

    #[test]
    fn quoted_values_and_comments() {
        let root = parse_str(
            "name = \"United Daimyos\" # trailing comment\nfort = 2.000\n",
        )
        .unwrap();
        assert_eq!(root.leaf_of("name"), Some("United Daimyos"));
        assert_eq!(root.leaf_of("fort"), Some("2.000"));
    }

    #[test]
    fn order_is_preserved() {
        let root = parse_str("a = 1 b = 2 a = 3").unwrap();
        let keys: Vec<_> = root.children().iter().map(|c| c.key()).collect();
        assert_eq!(keys, vec!["a", "b", "a"]);
        assert_eq!(root.leaf_of("a"), Some("1"));
    }

    #[test]
    fn unbalanced_braces_fail() {
        assert!(parse_str("a = {").is_err());
        assert!(parse_str("a = 1 }").is_err());
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping.txt");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "mappings = {{ link = {{ eu4 = 1 v2 = 2 }} }}").unwrap();

        let root = parse_file(&path).unwrap();
        let link = &root.values("mappings")[0].values("link")[0];
        assert_eq!(link.leaf_of("eu4"), Some("1"));
        assert_eq!(link.leaf_of("v2"), Some("2"));
    }

    #[test]
    fn nonexistent_file_fails() {
        assert!(parse_file(Path::new("path/to/nowhere")).is_err());
    }
}
