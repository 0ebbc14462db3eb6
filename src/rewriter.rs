use crate::rules::{CompiledRule, RuleError, StyleRule};
use serde::Serialize;
use std::borrow::Cow;

/// Applies an ordered rule list to whole documents. Each rule runs once over
/// the output of the rule before it.
#[derive(Debug, Clone)]
pub struct StyleRewriter {
    rules: Vec<CompiledRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleHit {
    pub rule_id: String,
    pub rule_name: String,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct Rewrite {
    pub output: String,
    pub hits: Vec<RuleHit>,
    pub changed: bool,
}

impl StyleRewriter {
    pub fn new(rules: &[StyleRule]) -> Result<Self, RuleError> {
        let rules = rules
            .iter()
            .map(StyleRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn rewrite(&self, document: &str) -> Rewrite {
        let mut current = document.to_string();
        let mut hits = Vec::with_capacity(self.rules.len());

        for compiled in &self.rules {
            let (next, count) = compiled.apply(&current);
            if let Cow::Owned(next) = next {
                current = next;
            }
            hits.push(RuleHit {
                rule_id: compiled.rule.id.clone(),
                rule_name: compiled.rule.name.clone(),
                count,
            });
        }

        let changed = current != document;
        Rewrite {
            output: current,
            hits,
            changed,
        }
    }
}
