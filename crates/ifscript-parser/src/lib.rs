//! The file Parser (C3, spec.md §4.3) and `ParseNode` model (C2, spec.md §4.2).
//!
//! Grounded on `plotnik-compiler`'s parser module split (a `grammar`
//! submodule building a tree from tokens, tests colocated per grammar
//! feature) — adapted here from a CST grammar to the line-oriented
//! header/comment/if-endif scan spec.md prescribes.

mod node;
mod scan;

pub use node::{Forest, NodeId, ParseNode};

use std::fs;
use std::path::Path;

use ifscript_core::names::normalize_fork_name;
use ifscript_core::ParseError;
use indexmap::IndexMap;

/// One fork's tree: the arena that owns its nodes, plus the root.
#[derive(Clone, Debug)]
pub struct ForkTree {
    pub forest: Forest,
    pub root: NodeId,
}

impl ForkTree {
    pub fn node(&self, id: NodeId) -> &ParseNode {
        self.forest.get(id)
    }

    pub fn preorder(&self) -> Vec<NodeId> {
        self.forest.preorder(self.root)
    }
}

/// Output of the Parser: the options header blob plus the fork table.
///
/// `forks` is insertion-ordered: the first entry is the default entry
/// point and the restart target (spec.md §3 "Fork Table").
#[derive(Clone, Debug, Default)]
pub struct ParsedFile {
    pub header: String,
    pub forks: IndexMap<String, ForkTree>,
}

impl ParsedFile {
    pub fn first_fork(&self) -> Option<&str> {
        self.forks.keys().next().map(|s| s.as_str())
    }
}

pub struct Parser;

impl Parser {
    /// Parse a file from disk (spec.md §4.3 "Input: A file path").
    pub fn parse_file(path: &Path) -> Result<ParsedFile, ParseError> {
        let contents = fs::read_to_string(path)
            .map_err(|_| ParseError::FileNotFound(path.to_path_buf()))?;
        if contents.is_empty() {
            return Err(ParseError::EmptyFile(path.to_path_buf()));
        }
        Self::parse_str(&contents)
    }

    /// Parse an in-memory game file. Exposed separately from
    /// [`Parser::parse_file`] so tests don't need a filesystem, the same
    /// split the teacher keeps between file-path convenience wrappers and
    /// the core parse routine.
    pub fn parse_str(source: &str) -> Result<ParsedFile, ParseError> {
        let lines: Vec<String> = source
            .lines()
            .map(|l| l.trim_end_matches('\r').trim_end().to_string())
            .collect();

        let mut header_lines: Vec<&str> = Vec::new();
        let mut entries: Vec<(String, Vec<&str>)> = Vec::new();
        let mut current: Option<(String, Vec<&str>)> = None;

        for line in &lines {
            if let Some(name) = line.strip_prefix('@') {
                if let Some(entry) = current.take() {
                    entries.push(entry);
                }
                let normalized = normalize_fork_name(name);
                if normalized.is_empty() {
                    return Err(ParseError::EmptyForkName);
                }
                current = Some((normalized, Vec::new()));
            } else if let Some((_, body)) = current.as_mut() {
                body.push(line.as_str());
            } else {
                header_lines.push(line.as_str());
            }
        }
        if let Some(entry) = current.take() {
            entries.push(entry);
        }

        let mut forks: IndexMap<String, ForkTree> = IndexMap::new();
        for (name, body_lines) in entries {
            if forks.contains_key(&name) {
                return Err(ParseError::DuplicateFork(name));
            }
            let body = body_lines.join("\n");
            let tree = build_fork_tree(&name, &body)?;
            forks.insert(name, tree);
        }

        Ok(ParsedFile {
            header: header_lines.join("\n"),
            forks,
        })
    }
}

fn build_fork_tree(fork_name: &str, body: &str) -> Result<ForkTree, ParseError> {
    let stripped = scan::strip_comments(body.to_string());
    let tokens = scan::scan_if_endif(&stripped);

    let mut forest = Forest::new();
    let root = forest.push(ParseNode::default());

    if tokens.is_empty() {
        forest.get_mut(root).text = stripped;
        return Ok(ForkTree { forest, root });
    }

    let mut stack: Vec<NodeId> = Vec::new();
    let mut current = root;
    let mut depth: i32 = 0;
    let mut prior_boundary: usize = 0;

    for tok in &tokens {
        if tok.pos < prior_boundary {
            return Err(ParseError::MultipleOnOneLine {
                fork: fork_name.to_string(),
                line: scan::rest_of_line(&stripped, tok.pos).to_string(),
            });
        }
        let span = &stripped[prior_boundary..tok.pos];
        if !span.is_empty() {
            let child = forest.push(ParseNode {
                condition: String::new(),
                text: span.to_string(),
                children: Vec::new(),
            });
            forest.add_child(current, child);
        }

        match tok.kind {
            scan::TokenKind::If => {
                let condition = scan::rest_of_line(&stripped, tok.pos).to_string();
                let child = forest.push(ParseNode {
                    condition,
                    text: String::new(),
                    children: Vec::new(),
                });
                forest.add_child(current, child);
                stack.push(current);
                current = child;
                depth += 1;
            }
            scan::TokenKind::EndIf => {
                depth -= 1;
                if depth < 0 {
                    return Err(ParseError::UnbalancedIf {
                        fork: fork_name.to_string(),
                    });
                }
                current = stack.pop().expect("depth tracked stack push/pop together");
            }
        }

        let line_end = stripped[tok.pos..]
            .find('\n')
            .map(|i| tok.pos + i + 1)
            .unwrap_or(stripped.len());
        prior_boundary = line_end;
    }

    if depth != 0 {
        return Err(ParseError::UnbalancedIf {
            fork: fork_name.to_string(),
        });
    }

    let trailing = &stripped[prior_boundary..];
    if !trailing.is_empty() {
        let child = forest.push(ParseNode {
            condition: String::new(),
            text: trailing.to_string(),
            children: Vec::new(),
        });
        forest.add_child(root, child);
    }

    Ok(ForkTree { forest, root })
}

#[cfg(test)]
mod tests;
