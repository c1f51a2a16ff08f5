//! Course-wide anchor and citation tables.

use std::collections::HashMap;

use super::StepRef;

/// Named jump targets, `[target name="x"]`, unique across the course.
///
/// The first binding of a name wins; later ones are rejected so the caller
/// can warn about them.
#[derive(Debug, Clone, Default)]
pub struct AnchorTable {
    anchors: HashMap<String, StepRef>,
}

impl AnchorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `at`. Returns the existing binding if the name was taken.
    pub fn insert(&mut self, name: &str, at: &StepRef) -> Result<(), StepRef> {
        if let Some(existing) = self.anchors.get(name) {
            return Err(existing.clone());
        }
        self.anchors.insert(name.to_string(), at.clone());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&StepRef> {
        self.anchors.get(name)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

/// A cited reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub key: String,
    /// 1-based number, assigned in first-citation order.
    pub number: usize,
    pub cited_at: Vec<StepRef>,
}

/// Citations of `[ref key="x" /]` markers across the course.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    citations: Vec<Citation>,
    index: HashMap<String, usize>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a citation and return its number.
    pub fn cite(&mut self, key: &str, at: &StepRef) -> usize {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                let idx = self.citations.len();
                self.citations.push(Citation {
                    key: key.to_string(),
                    number: idx + 1,
                    cited_at: Vec::new(),
                });
                self.index.insert(key.to_string(), idx);
                idx
            }
        };
        self.citations[idx].cited_at.push(at.clone());
        self.citations[idx].number
    }

    pub fn get(&self, key: &str) -> Option<&Citation> {
        self.index.get(key).map(|&idx| &self.citations[idx])
    }

    /// Citations in number order.
    pub fn iter(&self) -> impl Iterator<Item = &Citation> {
        self.citations.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.citations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_first_binding_wins() {
        let mut anchors = AnchorTable::new();
        let first = StepRef::new("t", "m", "step01.html");
        let second = StepRef::new("t", "m", "step02.html");

        assert!(anchors.insert("eq1", &first).is_ok());
        assert_eq!(anchors.insert("eq1", &second), Err(first.clone()));
        assert_eq!(anchors.get("eq1"), Some(&first));
        assert_eq!(anchors.len(), 1);
    }

    #[test]
    fn test_citations_numbered_by_first_use() {
        let mut refs = ReferenceTable::new();
        let a = StepRef::new("t", "m", "step01.html");
        let b = StepRef::new("t", "m", "step02.html");

        assert_eq!(refs.cite("knuth", &a), 1);
        assert_eq!(refs.cite("dijkstra", &a), 2);
        assert_eq!(refs.cite("knuth", &b), 1);

        let knuth = refs.get("knuth").unwrap();
        assert_eq!(knuth.cited_at, vec![a, b]);
        let keys: Vec<_> = refs.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["knuth", "dijkstra"]);
    }
}
