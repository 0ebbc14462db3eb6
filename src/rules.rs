use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::borrow::Cow;

// `$$`, `${name}` or a bare `$name` in a replacement template
static GROUP_REF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\$|\$\{([^}]*)\}|\$([0-9A-Za-z_]+)").unwrap());

/// One substitution step: every non-overlapping match of `pattern` in the
/// document is replaced by `replacement`, which may refer to captures as
/// `${1}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StyleRule {
    pub id: String,
    pub name: String,
    pub pattern: String,
    pub replacement: String,
}

#[derive(thiserror::Error, Debug)]
pub enum RuleError {
    #[error("rule `{id}` has an invalid pattern: {source}")]
    Pattern { id: String, source: regex::Error },
    #[error("rule `{id}` refers to capture group `{group}` which its pattern does not define")]
    UnknownGroup { id: String, group: String },
    #[error("rule `{id}` uses `{reference}`, write it as `${{N}}` to keep the group number apart from the text after it")]
    AmbiguousGroup { id: String, reference: String },
}

#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub rule: StyleRule,
    regex: Regex,
}

impl StyleRule {
    pub fn compile(&self) -> Result<CompiledRule, RuleError> {
        let regex = Regex::new(&self.pattern).map_err(|source| RuleError::Pattern {
            id: self.id.clone(),
            source,
        })?;
        self.check_template(&regex)?;
        Ok(CompiledRule {
            rule: self.clone(),
            regex,
        })
    }

    fn check_template(&self, regex: &Regex) -> Result<(), RuleError> {
        for caps in GROUP_REF_RE.captures_iter(&self.replacement) {
            let (group, braced) = match (caps.get(1), caps.get(2)) {
                (Some(m), _) => (m.as_str(), true),
                (None, Some(m)) => (m.as_str(), false),
                // `$$` is a literal dollar sign
                (None, None) => continue,
            };

            if let Ok(index) = group.parse::<usize>() {
                if index >= regex.captures_len() {
                    return Err(self.unknown_group(group));
                }
                continue;
            }

            if !braced && group.starts_with(|c: char| c.is_ascii_digit()) {
                return Err(RuleError::AmbiguousGroup {
                    id: self.id.clone(),
                    reference: format!("${group}"),
                });
            }

            if !regex.capture_names().flatten().any(|name| name == group) {
                return Err(self.unknown_group(group));
            }
        }
        Ok(())
    }

    fn unknown_group(&self, group: &str) -> RuleError {
        RuleError::UnknownGroup {
            id: self.id.clone(),
            group: group.to_string(),
        }
    }
}

impl CompiledRule {
    /// Replaces every match in `document`. Returns the input untouched when
    /// nothing matches, together with the number of replacements made.
    pub fn apply<'a>(&self, document: &'a str) -> (Cow<'a, str>, usize) {
        let mut hits = 0;
        let replaced = self.regex.replace_all(document, |caps: &Captures<'_>| {
            hits += 1;
            let mut out = String::new();
            caps.expand(&self.rule.replacement, &mut out);
            out
        });
        (replaced, hits)
    }
}

#[cfg(test)]
mod tests {
    use super::{RuleError, StyleRule};

    fn rule(pattern: &str, replacement: &str) -> StyleRule {
        StyleRule {
            id: "test".to_string(),
            name: "Test rule".to_string(),
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        }
    }

    #[test]
    fn replaces_every_match_and_counts_them() {
        let compiled = rule(
            r#"bg-gray-800([^"]*?)hover:bg-gray-900"#,
            "bg-black${1}hover:bg-gray-700",
        )
        .compile()
        .unwrap();
        let input = r#"<a className="bg-gray-800 p-2 hover:bg-gray-900" /><b className="bg-gray-800 hover:bg-gray-900" />"#;
        let (output, hits) = compiled.apply(input);
        assert_eq!(hits, 2);
        assert_eq!(
            output,
            r#"<a className="bg-black p-2 hover:bg-gray-700" /><b className="bg-black hover:bg-gray-700" />"#
        );
    }

    #[test]
    fn no_match_borrows_input() {
        let compiled = rule("bg-gray-600", "bg-black").compile().unwrap();
        let (output, hits) = compiled.apply("text-white");
        assert_eq!(hits, 0);
        assert!(matches!(output, std::borrow::Cow::Borrowed("text-white")));
    }

    #[test]
    fn rejects_invalid_pattern() {
        let err = rule("bg-(gray", "bg-black").compile().unwrap_err();
        assert!(matches!(err, RuleError::Pattern { .. }));
    }

    #[test]
    fn rejects_reference_to_missing_group() {
        let err = rule("bg-(gray)-800", "bg-${2}").compile().unwrap_err();
        match err {
            RuleError::UnknownGroup { group, .. } => assert_eq!(group, "2"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_bare_reference_glued_to_text() {
        let err = rule("bg-gray-800(.*)hover", "bg-black$1hover")
            .compile()
            .unwrap_err();
        match err {
            RuleError::AmbiguousGroup { reference, .. } => assert_eq!(reference, "$1hover"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn accepts_named_groups_and_literal_dollars() {
        let compiled = rule(r"bg-(?P<shade>\d+)", "$$${shade} ${0}").compile().unwrap();
        let (output, _) = compiled.apply("bg-800");
        assert_eq!(output, "$800 bg-800");
    }
}
