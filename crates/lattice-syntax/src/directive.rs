use miette::SourceSpan;

use crate::ast::{Binding, BodyItem, ExportRule, ImportRule, PlainRule, Rule};

/// The directive a prelude names, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    /// `:import(<path>)`, carrying the path with its quotes stripped
    Import(&'a str),
    /// `:export`
    Export,
}

/// Recognizes `:import(<path>)` and `:export` preludes.
///
/// Anything else, including `:import()` with an empty path, is an ordinary
/// selector.
pub fn parse_directive(prelude: &str) -> Option<Directive<'_>> {
    let prelude = prelude.trim();
    if prelude == ":export" {
        return Some(Directive::Export);
    }

    let inner = prelude.strip_prefix(":import(")?.strip_suffix(')')?;
    let source = strip_quotes(inner.trim());
    if source.is_empty() {
        return None;
    }
    Some(Directive::Import(source))
}

fn strip_quotes(text: &str) -> &str {
    let is_quote = |c: char| c == '"' || c == '\'';
    let text = text.strip_prefix(is_quote).unwrap_or(text);
    text.strip_suffix(is_quote).unwrap_or(text)
}

/// Turns a top-level rule into its typed form.
///
/// Directives keep their parsed text in `raw`, so an import that is never
/// resolved prints back as written.
pub(crate) fn classify(mut rule: PlainRule) -> Rule {
    let directive = match rule.body {
        Some(_) => parse_directive(&rule.prelude),
        None => None,
    };
    let source = match directive {
        Some(Directive::Import(source)) => Some(source.to_string()),
        Some(Directive::Export) => None,
        None => return Rule::Plain(rule),
    };

    let before = std::mem::take(&mut rule.before);
    let raw = Some(rule.to_string());
    let span = rule.span;
    let bindings = into_bindings(rule.body, span);

    match source {
        Some(source) => Rule::Import(ImportRule {
            before,
            source,
            bindings,
            raw,
            span,
        }),
        None => Rule::Export(ExportRule {
            before,
            bindings,
            raw,
            span,
        }),
    }
}

fn into_bindings(body: Option<Vec<BodyItem>>, span: SourceSpan) -> Vec<Binding> {
    body.unwrap_or_default()
        .into_iter()
        .filter_map(|item| match item {
            BodyItem::Declaration(decl) => Some(Binding {
                name: decl.property,
                value: decl.value,
                span: decl.span,
            }),
            BodyItem::Rule(nested) => {
                log::debug!(
                    "Ignoring nested rule `{}` inside directive at offset {}",
                    nested.prelude,
                    span.offset()
                );
                None
            }
        })
        .collect()
}
