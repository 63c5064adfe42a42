//! Source label to template column reconciliation

use crate::reader::Template;
use std::collections::HashMap;

/// Outcome of reconciling one source label against the template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled<'a> {
    /// The label (or its alias) names a template column
    Canonical(&'a str),
    /// Neither the label nor its alias is a template column
    Unmapped(&'a str),
}

/// Maps raw report labels to canonical column names through an alias table
#[derive(Debug, Clone, Default)]
pub struct LabelReconciler {
    aliases: HashMap<String, String>,
}

impl LabelReconciler {
    pub fn new<I, K, V>(aliases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            aliases: aliases
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Candidate column name: the alias target, or the label itself
    pub fn candidate<'a>(&'a self, label: &'a str) -> &'a str {
        self.aliases.get(label).map(String::as_str).unwrap_or(label)
    }

    pub fn reconcile<'a>(&'a self, label: &'a str, template: &Template) -> Reconciled<'a> {
        let candidate = self.candidate(label);
        if template.contains(candidate) {
            Reconciled::Canonical(candidate)
        } else {
            Reconciled::Unmapped(label)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractionConfig;

    fn reconciler() -> LabelReconciler {
        LabelReconciler::new(ExtractionConfig::default().aliases)
    }

    #[test]
    fn test_alias_lookup() {
        let r = reconciler();
        assert_eq!(r.candidate("X线"), "胸部X线");
        assert_eq!(r.candidate("尿常规"), "尿常规/沉渣");
        assert_eq!(r.candidate("身高"), "身高");
    }

    #[test]
    fn test_reconcile_against_template() {
        let r = reconciler();
        let template = Template::new(["检查日期", "胸部X线", "身高"]);

        assert_eq!(r.reconcile("X线", &template), Reconciled::Canonical("胸部X线"));
        assert_eq!(r.reconcile("身高", &template), Reconciled::Canonical("身高"));
        assert_eq!(r.reconcile("体重", &template), Reconciled::Unmapped("体重"));
        // alias target missing from the template reports the source label
        assert_eq!(r.reconcile("尿常规", &template), Reconciled::Unmapped("尿常规"));
    }
}
