//! Symbol substitution over declaration values.

use fxhash::FxHashMap;

use crate::ast::{BodyItem, PlainRule, Rule, Stylesheet};

/// Local name to resolved value.
pub type Translations = FxHashMap<String, String>;

/// At-rules whose parameters may reference imported symbols.
const SYMBOL_AT_RULES: &[&str] = &["media", "custom-media"];

fn is_symbol_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.')
}

/// Replaces every symbol token of `value` that has a translation.
///
/// A symbol token is a maximal run of ASCII alphanumerics, `_`, `-` and `.`,
/// optionally preceded by `$` or `#`. Only whole tokens are replaced, so a
/// translation for `red` leaves `darkred` and `#red` alone.
pub fn replace_value_symbols(value: &str, translations: &Translations) -> String {
    if translations.is_empty() {
        return value.to_string();
    }

    let bytes = value.as_bytes();
    let mut out = String::with_capacity(value.len());
    let mut last = 0;
    let mut i = 0;

    while i < bytes.len() {
        let start = i;
        let mut end = i;
        if matches!(bytes[end], b'$' | b'#') && end + 1 < bytes.len() && is_symbol_byte(bytes[end + 1]) {
            end += 1;
        }
        if !is_symbol_byte(bytes[end]) {
            i += 1;
            continue;
        }
        while end < bytes.len() && is_symbol_byte(bytes[end]) {
            end += 1;
        }

        // Token boundaries always sit next to ASCII bytes, so slicing is safe
        let token = &value[start..end];
        if let Some(replacement) = translations.get(token) {
            log::trace!("Replacing `{}` with `{}`", token, replacement);
            out.push_str(&value[last..start]);
            out.push_str(replacement);
            last = end;
        }
        i = end;
    }

    out.push_str(&value[last..]);
    out
}

/// Rewrites every reference to a translated name throughout `sheet`.
///
/// Declaration values at any depth are rewritten, as are the parameters of
/// `@media` and `@custom-media` rules. Directive rules are left alone; export
/// values are translated separately when they are extracted.
pub fn replace_symbols(sheet: &mut Stylesheet, translations: &Translations) {
    if translations.is_empty() {
        return;
    }
    for rule in &mut sheet.rules {
        if let Rule::Plain(rule) = rule {
            replace_in_rule(rule, translations);
        }
    }
}

fn replace_in_rule(rule: &mut PlainRule, translations: &Translations) {
    if let Some((name, params)) = rule.at_rule() {
        if SYMBOL_AT_RULES.contains(&name) && !params.is_empty() {
            // params is a suffix of the prelude
            let head = &rule.prelude[..rule.prelude.len() - params.len()];
            rule.prelude = format!("{}{}", head, replace_value_symbols(params, translations));
        }
    }

    for item in rule.body.iter_mut().flatten() {
        match item {
            BodyItem::Declaration(decl) => {
                decl.value = replace_value_symbols(&decl.value, translations);
            }
            BodyItem::Rule(nested) => replace_in_rule(nested, translations),
        }
    }
}
