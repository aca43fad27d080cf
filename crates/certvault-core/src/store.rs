//! Certificate store: the owning collection of certificate records.

use crate::model::Certificate;

/// Result of [`CertificateStore::replace_if_owner_unchanged`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    Replaced,
    /// Owner differs from the stored record; ownership only moves by transfer.
    OwnerChangeRejected,
    NotFound,
}

/// Ordered collection of certificates keyed by identifier.
#[derive(Debug, Default, Clone)]
pub struct CertificateStore {
    certs: Vec<Certificate>,
}

impl CertificateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, id: &str) -> Option<&Certificate> {
        self.certs.iter().find(|c| c.id == id)
    }

    pub(crate) fn find_mut(&mut self, id: &str) -> Option<&mut Certificate> {
        self.certs.iter_mut().find(|c| c.id == id)
    }

    /// Append a new record. The caller has already set the owner.
    pub fn create(&mut self, cert: Certificate) {
        self.certs.push(cert);
    }

    /// Replace the full record (transfer included) if the owner is unchanged.
    pub fn replace_if_owner_unchanged(&mut self, updated: Certificate) -> ReplaceOutcome {
        match self.find_mut(&updated.id) {
            None => ReplaceOutcome::NotFound,
            Some(existing) if existing.owner_id != updated.owner_id => {
                ReplaceOutcome::OwnerChangeRejected
            }
            Some(existing) => {
                *existing = updated;
                ReplaceOutcome::Replaced
            }
        }
    }

    /// Remove a record by identifier, preserving the order of the rest.
    pub fn delete(&mut self, id: &str) -> bool {
        match self.certs.iter().position(|c| c.id == id) {
            Some(pos) => {
                self.certs.remove(pos);
                true
            }
            None => false,
        }
    }

    /// All certificates owned by `owner_id`, and whether there were any.
    pub fn list_by_owner(&self, owner_id: &str) -> (Vec<Certificate>, bool) {
        let owned: Vec<Certificate> = self
            .certs
            .iter()
            .filter(|c| c.owner_id == owner_id)
            .cloned()
            .collect();
        let found_any = !owned.is_empty();
        (owned, found_any)
    }

    pub fn all(&self) -> &[Certificate] {
        &self.certs
    }

    pub fn len(&self) -> usize {
        self.certs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certs.is_empty()
    }
}

impl FromIterator<Certificate> for CertificateStore {
    fn from_iter<T: IntoIterator<Item = Certificate>>(iter: T) -> Self {
        Self {
            certs: iter.into_iter().collect(),
        }
    }
}
