//! The mutable rule tree.
//!
//! Import and export directives are recognized while the tree is built, so
//! consumers match on [`Rule`] variants instead of re-inspecting selector
//! text.

use miette::SourceSpan;

/// A parsed stylesheet: an ordered, mutable list of top-level rules.
///
/// Every node keeps the raw text around its tokens (`before`, `between`,
/// `after`), so an untouched tree prints back exactly as it was written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
    /// Text after the last rule.
    pub trailing: String,
}

/// One top-level rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Any rule that is not a directive: style rules and at-rules.
    Plain(PlainRule),
    /// `:import("path") { local: exported; }`
    Import(ImportRule),
    /// `:export { name: value; }`
    Export(ExportRule),
}

/// A selector or at-rule with an optional block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainRule {
    /// Whitespace, comments and stray `;` before the prelude.
    pub before: String,
    /// Selector or at-rule header, e.g. `.button:hover` or `@media (min-width: 10px)`.
    pub prelude: String,
    /// Text between the prelude and its `{` or `;`.
    pub between: String,
    /// `None` for statement at-rules such as `@charset "utf-8";`.
    pub body: Option<Vec<BodyItem>>,
    /// Text between the last body item and the closing `}`.
    pub after: String,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyItem {
    Declaration(Declaration),
    Rule(PlainRule),
}

/// `property: value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub before: String,
    pub property: String,
    /// Everything from the end of the property to the start of the value,
    /// colon included.
    pub between: String,
    pub value: String,
    /// Text after the value up to and including its `;`, or empty when the
    /// declaration is closed by `}`.
    pub after: String,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRule {
    pub before: String,
    /// The module path with its quotes stripped.
    pub source: String,
    /// `(local name, referenced export name)` pairs in document order.
    pub bindings: Vec<Binding>,
    /// The rule's text as parsed. `None` prints the canonical form.
    pub raw: Option<String>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRule {
    pub before: String,
    /// `(exported name, value expression)` pairs in document order.
    pub bindings: Vec<Binding>,
    /// The rule's text as parsed. `None` prints the canonical form.
    pub raw: Option<String>,
    pub span: SourceSpan,
}

/// A `name: value` pair inside a directive block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub value: String,
    pub span: SourceSpan,
}

impl Stylesheet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            trailing: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Top-level import directives in document order.
    pub fn imports(&self) -> impl Iterator<Item = &ImportRule> {
        self.rules.iter().filter_map(|rule| match rule {
            Rule::Import(import) => Some(import),
            _ => None,
        })
    }

    /// Top-level export directives in document order.
    pub fn exports(&self) -> impl Iterator<Item = &ExportRule> {
        self.rules.iter().filter_map(|rule| match rule {
            Rule::Export(export) => Some(export),
            _ => None,
        })
    }

    /// Removes every rule for which `remove(index, rule)` holds, returning
    /// the removed rules in document order.
    ///
    /// When the removed rules lead the document, the first remaining rule
    /// takes over the leading text of the first removed one, so a file
    /// header stays at the top.
    pub fn remove_rules<F>(&mut self, mut remove: F) -> Vec<Rule>
    where
        F: FnMut(usize, &Rule) -> bool,
    {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.rules.len());
        let mut leading: Option<String> = None;

        for (index, mut rule) in std::mem::take(&mut self.rules).into_iter().enumerate() {
            if remove(index, &rule) {
                if kept.is_empty() && leading.is_none() {
                    leading = Some(rule.before().to_string());
                }
                removed.push(rule);
                continue;
            }
            if kept.is_empty() {
                if let Some(before) = leading.take() {
                    *rule.before_mut() = before;
                }
            }
            kept.push(rule);
        }

        self.rules = kept;
        removed
    }

    /// Removes every export directive, returning them in document order.
    pub fn take_exports(&mut self) -> Vec<ExportRule> {
        self.remove_rules(|_, rule| matches!(rule, Rule::Export(_)))
            .into_iter()
            .filter_map(|rule| match rule {
                Rule::Export(export) => Some(export),
                _ => None,
            })
            .collect()
    }
}

impl Rule {
    /// Text before the rule.
    pub fn before(&self) -> &str {
        match self {
            Rule::Plain(rule) => &rule.before,
            Rule::Import(import) => &import.before,
            Rule::Export(export) => &export.before,
        }
    }

    pub fn before_mut(&mut self) -> &mut String {
        match self {
            Rule::Plain(rule) => &mut rule.before,
            Rule::Import(import) => &mut import.before,
            Rule::Export(export) => &mut export.before,
        }
    }
}

impl ExportRule {
    /// An export block with no source text behind it. It prints canonically.
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self {
            before: String::new(),
            bindings,
            raw: None,
            span: SourceSpan::from(0..0),
        }
    }
}

impl PlainRule {
    /// The at-keyword (without `@`) and its parameters, if this is an at-rule.
    pub fn at_rule(&self) -> Option<(&str, &str)> {
        let rest = self.prelude.strip_prefix('@')?;
        match rest.find(|c: char| c.is_whitespace() || c == '(') {
            Some(idx) => Some((&rest[..idx], rest[idx..].trim_start())),
            None => Some((rest, "")),
        }
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.body.iter().flatten().filter_map(|item| match item {
            BodyItem::Declaration(decl) => Some(decl),
            BodyItem::Rule(_) => None,
        })
    }
}
