//! Whitelist lines from the visible types of a graph.

use published_core::config::LineEnding;
use published_core::errors::QueryError;
use published_core::types::collections::FxHashSet;

use super::signature::normalize_signature;
use crate::model::{DocNode, Query};
use crate::policy::InclusionPolicy;

/// Ordered, duplicate-free whitelist entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist {
    entries: Vec<String>,
}

impl Whitelist {
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.entries.iter().any(|e| e == entry)
    }

    /// One entry per line, each followed by the line separator.
    pub fn render(&self, line_ending: LineEnding) -> String {
        let sep = line_ending.as_str();
        let mut out = String::with_capacity(self.entries.iter().map(|e| e.len() + sep.len()).sum());
        for entry in &self.entries {
            out.push_str(entry);
            out.push_str(sep);
        }
        out
    }
}

#[derive(Default)]
struct Lines {
    entries: Vec<String>,
    seen: FxHashSet<String>,
}

impl Lines {
    fn push(&mut self, line: String) {
        if self.seen.insert(line.clone()) {
            self.entries.push(line);
        }
    }
}

/// Serializes the qualified names visible through a graph. Does no
/// filtering of its own: hand it a filtered root.
#[derive(Debug, Clone, Copy)]
pub struct WhitelistEmitter<'p> {
    policy: &'p InclusionPolicy,
}

impl<'p> WhitelistEmitter<'p> {
    pub fn new(policy: &'p InclusionPolicy) -> Self {
        Self { policy }
    }

    pub fn collect<N: DocNode>(&self, root: &N) -> Result<Whitelist, QueryError> {
        let mut lines = Lines::default();
        let types = root.nodes(Query::Classes)?;
        for ty in &types {
            self.emit_type(ty, &mut lines)?;
        }
        tracing::debug!(types = types.len(), entries = lines.entries.len(), "whitelist collected");
        Ok(Whitelist {
            entries: lines.entries,
        })
    }

    /// A type with its own qualifying marker is one line. Otherwise each
    /// marked constructor, method and field is a line, then nested types.
    fn emit_type<N: DocNode>(&self, ty: &N, lines: &mut Lines) -> Result<(), QueryError> {
        if self.policy.has_qualifying_marker(ty) {
            lines.push(ty.qualified_name().to_string());
            return Ok(());
        }
        for query in [Query::Constructors, Query::Methods] {
            for member in ty.nodes(query)? {
                if self.policy.has_qualifying_marker(&member) {
                    let signature = normalize_signature(member.signature().unwrap_or("()"));
                    lines.push(format!("{}{}", member.qualified_name(), signature));
                }
            }
        }
        for field in ty.nodes(Query::Fields)? {
            if self.policy.has_qualifying_marker(&field) {
                lines.push(field.qualified_name().to_string());
            }
        }
        for inner in ty.nodes(Query::InnerClasses)? {
            self.emit_type(&inner, lines)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_ends_every_line() {
        let list = Whitelist {
            entries: vec!["a.B".into(), "a.B.c()".into()],
        };
        assert_eq!(list.render(LineEnding::Lf), "a.B\na.B.c()\n");
        assert_eq!(list.render(LineEnding::Crlf), "a.B\r\na.B.c()\r\n");
        assert_eq!(Whitelist::default().render(LineEnding::Lf), "");
    }

    #[test]
    fn duplicate_lines_suppressed_in_order() {
        let mut lines = Lines::default();
        lines.push("b".into());
        lines.push("a".into());
        lines.push("b".into());
        assert_eq!(lines.entries, vec!["b", "a"]);
    }
}
