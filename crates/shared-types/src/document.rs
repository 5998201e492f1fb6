//! Uploaded documents and the per-session document set

use serde::{Deserialize, Serialize};

/// A single uploaded record, identified by its file name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub text: String, // All pages concatenated, no page markers
}

impl Document {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Name-keyed collection of documents for one review session.
///
/// Iteration follows upload order. Inserting a name that is already present
/// replaces its text but keeps the original position, so pairwise comparison
/// order stays stable across re-uploads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentSet {
    documents: Vec<Document>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document, returning the previous text if the name was taken
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) -> Option<String> {
        let name = name.into();
        let text = text.into();

        match self.documents.iter_mut().find(|d| d.name == name) {
            Some(existing) => Some(std::mem::replace(&mut existing.text, text)),
            None => {
                self.documents.push(Document { name, text });
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|d| d.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl<N: Into<String>, T: Into<String>> FromIterator<(N, T)> for DocumentSet {
    fn from_iter<I: IntoIterator<Item = (N, T)>>(iter: I) -> Self {
        let mut set = DocumentSet::new();
        for (name, text) in iter {
            set.insert(name, text);
        }
        set
    }
}

impl<'a> IntoIterator for &'a DocumentSet {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}
