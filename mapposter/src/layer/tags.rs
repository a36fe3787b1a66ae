use std::collections::BTreeMap;

/// OSM-style tags of a feature.
pub type Tags = BTreeMap<String, String>;

/// Condition on the value of a single tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagMatch {
    /// Tag is present with any value.
    Any,
    /// Tag value is one of the listed.
    OneOf(Vec<String>),
    /// Tag is present and its value is none of the listed.
    AnyExcept(Vec<String>),
}

impl TagMatch {
    fn matches(&self, value: &str) -> bool {
        match self {
            TagMatch::Any => true,
            TagMatch::OneOf(values) => values.iter().any(|v| v == value),
            TagMatch::AnyExcept(values) => values.iter().all(|v| v != value),
        }
    }
}

/// Set of tag conditions. A feature passes the filter if it satisfies at least one condition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    rules: Vec<(String, TagMatch)>,
}

impl TagFilter {
    /// Creates an empty filter. An empty filter matches nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a condition that is satisfied by any value of the `key` tag.
    pub fn any(mut self, key: &str) -> Self {
        self.rules.push((key.to_string(), TagMatch::Any));
        self
    }

    /// Adds a condition that is satisfied if the `key` tag has one of the `values`.
    pub fn one_of(mut self, key: &str, values: &[&str]) -> Self {
        self.rules.push((
            key.to_string(),
            TagMatch::OneOf(values.iter().map(|v| v.to_string()).collect()),
        ));
        self
    }

    /// Adds a condition that is satisfied if the `key` tag is present and has none of the `values`.
    pub fn any_except(mut self, key: &str, values: &[&str]) -> Self {
        self.rules.push((
            key.to_string(),
            TagMatch::AnyExcept(values.iter().map(|v| v.to_string()).collect()),
        ));
        self
    }

    /// Conditions of the filter.
    pub fn rules(&self) -> &[(String, TagMatch)] {
        &self.rules
    }

    /// Returns true if the tags satisfy at least one condition.
    pub fn matches(&self, tags: &Tags) -> bool {
        self.rules.iter().any(|(key, rule)| {
            tags.get(key)
                .is_some_and(|value| rule.matches(value))
        })
    }
}
