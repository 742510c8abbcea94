use std::collections::HashMap;
use tracing::warn;

/// Renames `source` to `canonical` when the header lacks `canonical`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRule {
    pub source: String,
    pub canonical: String,
}

impl ColumnRule {
    pub fn new(source: &str, canonical: &str) -> Self {
        Self {
            source: source.to_string(),
            canonical: canonical.to_string(),
        }
    }
}

pub fn default_rules() -> Vec<ColumnRule> {
    vec![
        ColumnRule::new("impression", "impressions"),
        ColumnRule::new("attributed revenue", "attributed_revenue"),
    ]
}

/// Case-folds, trims, and turns spaces into underscores.
pub fn normalize_name(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
        .replace(' ', "_")
}

/// Column name to field position, resolved once per input.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    columns: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl HeaderMap {
    pub fn resolve<'a, I>(raw: I, rules: &[ColumnRule], input: &str) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut names: Vec<String> = raw.into_iter().map(normalize_name).collect();

        for rule in rules {
            let source = normalize_name(&rule.source);
            if source == rule.canonical || names.iter().any(|n| *n == rule.canonical) {
                continue;
            }
            if let Some(name) = names.iter_mut().find(|n| **n == source) {
                *name = rule.canonical.clone();
            }
        }

        let mut map = HeaderMap::default();
        for (pos, name) in names.into_iter().enumerate() {
            if name.is_empty() {
                continue;
            }
            if map.index.contains_key(&name) {
                warn!("{}: duplicate column `{}` ignored (position {})", input, name, pos + 1);
                continue;
            }
            map.index.insert(name.clone(), pos);
            map.columns.push((name, pos));
        }
        map
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Columns in source order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, usize)> {
        self.columns.iter().map(|(n, p)| (n.as_str(), *p))
    }
}
