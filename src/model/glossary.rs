//! Glossary terms, their keys and the per-letter page buckets.

use std::collections::BTreeMap;
use std::fmt;

use super::StepRef;

/// Normalize a term into its glossary key.
///
/// Trims the term, lowercases it, maps each whitespace character to `_`
/// and drops all punctuation, including `-` and `_`.
///
/// ```
/// use courseproc::model::normalize_term;
///
/// assert_eq!(normalize_term("Big-O Notation!"), "bigo_notation");
/// assert_eq!(normalize_term("C++"), "c");
/// ```
pub fn normalize_term(term: &str) -> String {
    let mut key = String::with_capacity(term.len());
    for c in term.trim().chars() {
        if c.is_alphanumeric() {
            key.extend(c.to_lowercase());
        } else if c.is_whitespace() {
            key.push('_');
        }
    }
    key
}

/// Which glossary page a key lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    Letter(char),
    Digit,
    Symbol,
}

impl Bucket {
    /// All buckets in page order: `a`..`z`, digits, symbols.
    pub fn all() -> impl Iterator<Item = Bucket> {
        ('a'..='z')
            .map(Bucket::Letter)
            .chain([Bucket::Digit, Bucket::Symbol])
    }

    pub fn of(key: &str) -> Self {
        match key.chars().next() {
            Some(c @ 'a'..='z') => Bucket::Letter(c),
            Some(c) if c.is_ascii_digit() => Bucket::Digit,
            _ => Bucket::Symbol,
        }
    }

    /// Page file name inside the `glossary/` directory.
    pub fn file_name(self) -> String {
        format!("{self}.html")
    }

    pub fn label(self) -> String {
        match self {
            Bucket::Letter(c) => c.to_ascii_uppercase().to_string(),
            Bucket::Digit => "0-9".to_string(),
            Bucket::Symbol => "Symbols".to_string(),
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Letter(c) => write!(f, "{c}"),
            Bucket::Digit => f.write_str("digit"),
            Bucket::Symbol => f.write_str("symb"),
        }
    }
}

/// A defined (or merely referenced) glossary term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlossaryTerm {
    pub key: String,
    /// Display form, from the defining marker (or the first reference until defined).
    pub term: String,
    pub definition: Option<String>,
    pub defined_at: Option<StepRef>,
    /// Every bare reference, in scan order.
    pub references: Vec<StepRef>,
}

impl GlossaryTerm {
    pub fn bucket(&self) -> Bucket {
        Bucket::of(&self.key)
    }

    pub fn is_defined(&self) -> bool {
        self.definition.is_some()
    }
}

/// Outcome of recording a definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Definition {
    New,
    /// The term already had a definition; the stored one is kept.
    Duplicate { first: StepRef },
}

/// All glossary terms keyed by normalized key.
#[derive(Debug, Clone, Default)]
pub struct GlossaryTable {
    terms: BTreeMap<String, GlossaryTerm>,
}

impl GlossaryTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, term: &str) -> &mut GlossaryTerm {
        let key = normalize_term(term);
        self.terms
            .entry(key.clone())
            .or_insert_with(|| GlossaryTerm {
                key,
                term: term.trim().to_string(),
                definition: None,
                defined_at: None,
                references: Vec::new(),
            })
    }

    /// Record a `[glossary term=".."]definition[/glossary]` marker.
    pub fn define(&mut self, term: &str, definition: &str, at: &StepRef) -> Definition {
        let entry = self.entry(term);
        if let Some(first) = &entry.defined_at {
            return Definition::Duplicate {
                first: first.clone(),
            };
        }
        entry.term = term.trim().to_string();
        entry.definition = Some(definition.trim().to_string());
        entry.defined_at = Some(at.clone());
        Definition::New
    }

    /// Record a bare `[glossary term=".." /]` reference.
    pub fn reference(&mut self, term: &str, at: &StepRef) {
        self.entry(term).references.push(at.clone());
    }

    pub fn get(&self, term: &str) -> Option<&GlossaryTerm> {
        self.terms.get(&normalize_term(term))
    }

    /// Terms with a definition, ordered by key.
    pub fn defined(&self) -> impl Iterator<Item = &GlossaryTerm> {
        self.terms.values().filter(|t| t.is_defined())
    }

    /// Terms referenced somewhere but never defined.
    pub fn undefined(&self) -> impl Iterator<Item = &GlossaryTerm> {
        self.terms.values().filter(|t| !t.is_defined())
    }

    /// Defined terms on one bucket page.
    pub fn in_bucket(&self, bucket: Bucket) -> impl Iterator<Item = &GlossaryTerm> {
        self.defined().filter(move |t| t.bucket() == bucket)
    }

    /// True if the course has at least one defined term.
    pub fn has_terms(&self) -> bool {
        self.defined().next().is_some()
    }
}
