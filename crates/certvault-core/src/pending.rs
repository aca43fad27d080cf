//! Pending transfer index.
//!
//! Holds certificate identifiers, not references: entries are resolved
//! through the [`CertificateStore`](crate::store::CertificateStore) on every
//! access, so removing or reordering store records never leaves a dangling
//! entry.

/// Ordered list of certificate ids with an unresolved transfer.
#[derive(Debug, Default, Clone)]
pub struct PendingTransferIndex {
    entries: Vec<String>,
}

impl PendingTransferIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry for a certificate that just received a transfer.
    pub fn register(&mut self, cert_id: impl Into<String>) {
        self.entries.push(cert_id.into());
    }

    /// Position of the first entry for `cert_id`.
    pub fn find_by_id(&self, cert_id: &str) -> Option<usize> {
        self.entries.iter().position(|id| id == cert_id)
    }

    /// Remove the entry at `position`, preserving the order of the rest.
    /// Out-of-range positions are ignored.
    pub fn remove(&mut self, position: usize) -> Option<String> {
        (position < self.entries.len()).then(|| self.entries.remove(position))
    }

    /// Remove every entry for `cert_id`, returning how many were dropped.
    pub fn purge(&mut self, cert_id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|id| id != cert_id);
        before - self.entries.len()
    }

    /// Number of entries for `cert_id`.
    pub fn count(&self, cert_id: &str) -> usize {
        self.entries.iter().filter(|id| *id == cert_id).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
