//! Transient ordered selection used to parameterise a chain export.
//!
//! Nothing here is persisted: the list lives while the export dialog is open
//! and is consumed by `export`.

use url::Url;
use url::form_urlencoded;

use crate::error::ChainError;
use crate::model::{DocumentId, TreeData};

/// Query parameter carrying the ordered id list.
pub const EXPORT_PARAM: &str = "documentos";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceSelection {
    items: Vec<DocumentId>,
}

impl SequenceSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection of the given display codes, in order.
    pub fn from_codes<S: AsRef<str>>(data: &TreeData, codes: &[S]) -> Result<Self, ChainError> {
        let mut selection = Self::new();
        for code in codes {
            let code = code.as_ref().trim();
            let doc = data
                .document_by_code(code)
                .ok_or_else(|| ChainError::UnknownDocument(code.to_string()))?;
            selection.add(doc.id);
        }
        Ok(selection)
    }

    pub fn items(&self) -> &[DocumentId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: DocumentId) -> bool {
        self.items.contains(&id)
    }

    /// Append `id`; returns false if it is already selected.
    pub fn add(&mut self, id: DocumentId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.items.push(id);
        true
    }

    pub fn remove(&mut self, id: DocumentId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| *i != id);
        self.items.len() != before
    }

    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.items.len() {
            return false;
        }
        self.items.swap(index - 1, index);
        true
    }

    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.items.len() {
            return false;
        }
        self.items.swap(index, index + 1);
        true
    }

    /// Drag-and-drop: take the item at `from` and insert it at `to`.
    pub fn move_to(&mut self, from: usize, to: usize) -> bool {
        let len = self.items.len();
        if from >= len || to >= len {
            return false;
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        from != to
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// `documentos=3%2C1%2C2`: the ordered ids as a form-encoded query.
    pub fn query(&self) -> String {
        let ids = self
            .items
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        form_urlencoded::Serializer::new(String::new())
            .append_pair(EXPORT_PARAM, &ids)
            .finish()
    }

    /// Consume the selection into an export URL on `endpoint`. Existing query
    /// pairs on the endpoint are kept.
    pub fn export(&mut self, endpoint: &Url) -> Url {
        let mut url = endpoint.clone();
        let ids = std::mem::take(&mut self.items)
            .into_iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        url.query_pairs_mut().append_pair(EXPORT_PARAM, &ids);
        url
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_interaction_sequence.rs"]
mod tests;
