//! Stylesheet syntax for the Lattice resolver.
//!
//! - [`lexer`]: logos-based tokenizer
//! - [`parser`]: hand-rolled recursive descent parser producing a [`Stylesheet`]
//! - [`directive`]: recognition of `:import(...)` and `:export` rules
//! - [`printer`]: lossless `Display` output
//! - [`replace`]: symbol substitution over declaration values

pub mod ast;
pub mod directive;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod replace;

pub use ast::{Binding, BodyItem, Declaration, ExportRule, ImportRule, PlainRule, Rule, Stylesheet};
pub use directive::{parse_directive, Directive};
pub use error::{SyntaxError, SyntaxResult};
pub use parser::parse;
pub use replace::{replace_symbols, replace_value_symbols, Translations};
