//! Query keys

use std::fmt;

/// An ordered tuple addressing one cached value, e.g. `["applications", uuid]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// This key with one more part appended
    pub fn child(&self, part: impl Into<String>) -> Self {
        let mut parts = self.0.clone();
        parts.push(part.into());
        Self(parts)
    }

    /// Whether `prefix` names this key or one of its ancestors
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_and_child() {
        let list = QueryKey::new(["applications"]);
        let single = list.child("a1");
        assert_eq!(single, QueryKey::new(["applications", "a1"]));
        assert!(single.starts_with(&list));
        assert!(!list.starts_with(&single));
        assert!(!QueryKey::new(["applicationsx"]).starts_with(&list));
        assert_eq!(single.to_string(), "[applications, a1]");
    }
}
