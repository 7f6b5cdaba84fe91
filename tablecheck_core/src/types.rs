//! Type tags and the subtype relation used by the column type check.

use std::collections::HashMap;

/// An explicit subtype relation over type tags.
///
/// Each tag may declare parent tags. The lineage of a tag is the tag itself
/// followed by all of its transitive ancestors, nearest first.
///
/// # Example
///
/// ```rust
/// use tablecheck_core::TypeHierarchy;
///
/// let hierarchy = TypeHierarchy::default().with_parent("currency", "float");
/// assert_eq!(hierarchy.lineage("currency"), vec!["currency", "float", "numeric"]);
/// ```
#[derive(Debug, Clone)]
pub struct TypeHierarchy {
    parents: HashMap<String, Vec<String>>,
}

impl TypeHierarchy {
    /// Creates a hierarchy with no relations at all.
    pub fn empty() -> Self {
        Self {
            parents: HashMap::new(),
        }
    }

    /// Declares `parent` as a direct supertype of `tag`.
    pub fn with_parent(mut self, tag: impl Into<String>, parent: impl Into<String>) -> Self {
        self.add_parent(tag, parent);
        self
    }

    /// Declares `parent` as a direct supertype of `tag`.
    pub fn add_parent(&mut self, tag: impl Into<String>, parent: impl Into<String>) {
        let parent = parent.into();
        let parents = self.parents.entry(tag.into()).or_default();
        if !parents.contains(&parent) {
            parents.push(parent);
        }
    }

    /// Returns the tag followed by its ancestors, breadth first, without
    /// repeats. Cycles are tolerated.
    pub fn lineage(&self, tag: &str) -> Vec<String> {
        let mut lineage = vec![tag.to_string()];
        let mut cursor = 0;

        while cursor < lineage.len() {
            if let Some(parents) = self.parents.get(&lineage[cursor]) {
                for parent in parents {
                    if !lineage.contains(parent) {
                        lineage.push(parent.clone());
                    }
                }
            }
            cursor += 1;
        }

        lineage
    }

    /// Returns true if `tag` is `ancestor` or descends from it.
    pub fn is_a(&self, tag: &str, ancestor: &str) -> bool {
        self.lineage(tag).iter().any(|t| t == ancestor)
    }
}

impl Default for TypeHierarchy {
    /// `integer` and `float` are `numeric`; `date` and `datetime` are
    /// `temporal`.
    fn default() -> Self {
        Self::empty()
            .with_parent("integer", "numeric")
            .with_parent("float", "numeric")
            .with_parent("date", "temporal")
            .with_parent("datetime", "temporal")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lineage() {
        let h = TypeHierarchy::default();
        assert_eq!(h.lineage("integer"), vec!["integer", "numeric"]);
        assert_eq!(h.lineage("numeric"), vec!["numeric"]);
        assert_eq!(h.lineage("string"), vec!["string"]);
        assert!(h.is_a("float", "numeric"));
        assert!(!h.is_a("string", "numeric"));
    }

    #[test]
    fn test_cycles_terminate() {
        let h = TypeHierarchy::empty().with_parent("a", "b").with_parent("b", "a");
        assert_eq!(h.lineage("a"), vec!["a", "b"]);
    }
}
