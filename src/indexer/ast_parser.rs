use super::language::Lang;
use anyhow::{Context, Result};
use tree_sitter::{Node, Parser, TreeCursor};

/// A chunkable node located in a syntax tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstNode {
    pub kind: String,
    pub start_byte: usize,
    pub end_byte: usize,
    pub start_line: usize,
    pub end_line: usize,
    /// Byte range of the name-bearing child, when the grammar exposes one
    pub symbol_range: Option<(usize, usize)>,
}

/// AST parser bound to one language's grammar
pub struct AstParser {
    parser: Parser,
    lang: Lang,
    allow_partial: bool,
}

impl AstParser {
    /// Create a parser for the given language
    pub fn new(lang: Lang) -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&lang.grammar())
            .context("Failed to set parser language")?;

        Ok(Self {
            parser,
            lang,
            allow_partial: false,
        })
    }

    /// Accept trees that contain syntax errors instead of rejecting the file
    pub fn with_partial_parse(mut self, allow: bool) -> Self {
        self.allow_partial = allow;
        self
    }

    /// Parse source code and locate every chunkable node in document order
    pub fn parse(&mut self, source_code: &str) -> Result<Vec<AstNode>> {
        let tree = self
            .parser
            .parse(source_code, None)
            .context("Parser produced no syntax tree")?;

        let root = tree.root_node();
        if root.has_error() && !self.allow_partial {
            let line = first_error_line(root.walk()).unwrap_or(1);
            anyhow::bail!("syntax error near line {}", line);
        }

        Ok(self.collect_chunkable(root.walk()))
    }

    /// Pre-order walk that keeps nested matches, so a class and its methods all count
    fn collect_chunkable(&self, mut cursor: TreeCursor) -> Vec<AstNode> {
        let mut result = Vec::new();

        loop {
            let node = cursor.node();
            if node.is_named() && self.lang.is_chunkable(node.kind()) {
                result.push(self.to_ast_node(node));
            }

            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return result;
                }
            }
        }
    }

    fn to_ast_node(&self, node: Node) -> AstNode {
        let symbol_range = self
            .lang
            .symbol_field(node.kind())
            .and_then(|field| node.child_by_field_name(field))
            .map(|name| (name.start_byte(), name.end_byte()));

        AstNode {
            kind: node.kind().to_string(),
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_line: node.start_position().row + 1, // Tree-sitter uses 0-indexed rows
            end_line: node.end_position().row + 1,
            symbol_range,
        }
    }
}

fn first_error_line(mut cursor: TreeCursor) -> Option<usize> {
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node.start_position().row + 1);
        }
        // Only descend into subtrees that contain the error
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}
