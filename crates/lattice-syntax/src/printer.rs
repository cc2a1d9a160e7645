//! Printing of the rule tree.
//!
//! Parsed nodes print their own raw text, so a tree nobody has touched
//! prints back byte for byte. Directives built in code (`raw: None`) print
//! canonically: `prelude {`, one indented `name: value;` per line and a
//! closing `}` on its own line.

use std::fmt::{self, Display};

use crate::ast::{Binding, BodyItem, Declaration, ExportRule, ImportRule, PlainRule, Rule, Stylesheet};

const INDENT: &str = "  ";

impl Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            write!(f, "{}", rule)?;
        }
        f.write_str(&self.trailing)
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Plain(rule) => write!(f, "{}", rule),
            Rule::Import(import) => write!(f, "{}", import),
            Rule::Export(export) => write!(f, "{}", export),
        }
    }
}

impl Display for PlainRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.before, self.prelude, self.between)?;
        let Some(body) = &self.body else {
            return f.write_str(";");
        };

        f.write_str("{")?;
        for item in body {
            match item {
                BodyItem::Declaration(decl) => write!(f, "{}", decl)?,
                BodyItem::Rule(nested) => write!(f, "{}", nested)?,
            }
        }
        write!(f, "{}}}", self.after)
    }
}

impl Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}",
            self.before, self.property, self.between, self.value, self.after
        )
    }
}

impl Display for ImportRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.before)?;
        match &self.raw {
            Some(raw) => f.write_str(raw),
            None => write_directive(f, &format!(":import(\"{}\")", self.source), &self.bindings),
        }
    }
}

impl Display for ExportRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.before)?;
        match &self.raw {
            Some(raw) => f.write_str(raw),
            None => write_directive(f, ":export", &self.bindings),
        }
    }
}

fn write_directive(f: &mut fmt::Formatter<'_>, prelude: &str, bindings: &[Binding]) -> fmt::Result {
    writeln!(f, "{} {{", prelude)?;
    for binding in bindings {
        writeln!(f, "{}{}: {};", INDENT, binding.name, binding.value)?;
    }
    writeln!(f, "}}")
}
