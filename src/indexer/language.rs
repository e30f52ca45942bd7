//! Language detection and the tree-sitter grammar registry
//!
//! Every supported language is one [`Lang`] variant carrying its grammar, the node
//! kinds that become chunks, how a chunk's symbol is found, and whether a leading
//! interpreter directive has to be hidden from the parser.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tree_sitter::Language;

/// Supported source language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Go,
    JavaScript,
    TypeScript,
    Tsx,
    Python,
    Rust,
}

impl Lang {
    /// All registered languages
    pub const ALL: [Lang; 6] = [
        Lang::Go,
        Lang::JavaScript,
        Lang::TypeScript,
        Lang::Tsx,
        Lang::Python,
        Lang::Rust,
    ];

    /// Identifier written into chunk records
    pub fn id(self) -> &'static str {
        match self {
            Self::Go => "go",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
            Self::Python => "python",
            Self::Rust => "rust",
        }
    }

    /// Tree-sitter grammar used to parse this language
    pub fn grammar(self) -> Language {
        match self {
            Self::Go => tree_sitter_go::LANGUAGE.into(),
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
        }
    }

    /// Node kinds that become chunks.
    ///
    /// Nested matches are kept, so a class and each of its methods are separate chunks.
    pub fn chunkable_kinds(self) -> &'static [&'static str] {
        match self {
            Self::Go => &["function_declaration", "method_declaration"],
            Self::JavaScript => &[
                "function_declaration",
                "function_expression",
                "arrow_function",
                "method_definition",
                "class_declaration",
            ],
            Self::TypeScript | Self::Tsx => &[
                "function_declaration",
                "method_definition",
                "class_declaration",
            ],
            Self::Python => &["function_definition", "class_definition"],
            Self::Rust => &[
                "function_item",
                "impl_item",
                "trait_item",
                "struct_item",
                "enum_item",
            ],
        }
    }

    pub fn is_chunkable(self, kind: &str) -> bool {
        self.chunkable_kinds().contains(&kind)
    }

    /// Field of a chunkable node whose text names it, if the kind is named at all
    pub fn symbol_field(self, kind: &str) -> Option<&'static str> {
        match (self, kind) {
            (Self::Rust, "impl_item") => Some("type"),
            (
                _,
                "function_declaration"
                | "method_definition"
                | "class_declaration"
                | "method_declaration"
                | "function_definition"
                | "class_definition"
                | "function_item"
                | "trait_item"
                | "struct_item"
                | "enum_item",
            ) => Some("name"),
            _ => None,
        }
    }

    /// Whether a leading `#!` line is a syntax error for this grammar
    pub fn blanks_interpreter_line(self) -> bool {
        !matches!(self, Self::Python)
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Detect the language of a file from its extension (exact, case-sensitive)
pub fn detect_language(path: &Path) -> Option<Lang> {
    let ext = path.extension()?.to_str()?;
    let lang = match ext {
        "go" => Lang::Go,
        "js" | "mjs" | "cjs" | "jsx" => Lang::JavaScript,
        "ts" | "mts" | "cts" => Lang::TypeScript,
        "tsx" => Lang::Tsx,
        "py" => Lang::Python,
        "rs" => Lang::Rust,
        _ => return None,
    };
    Some(lang)
}
