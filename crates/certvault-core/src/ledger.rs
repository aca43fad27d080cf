//! Shared certificate ledger.
//!
//! [`Ledger`] is the handle the HTTP layer works against. It owns the
//! certificate store and pending transfer index behind a single
//! `RwLock`, so every mutation runs its whole read-modify-write under one
//! write guard, while reads share the lock. Credentials are checked against
//! the [`Authenticator`] before the lock is taken.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::{Certificate, Transfer, User};
use crate::pending::PendingTransferIndex;
use crate::seed;
use crate::store::{CertificateStore, ReplaceOutcome};
use crate::transfer;
use crate::users::{Authenticator, Credentials, UserDirectory};

/// Certificate store and pending index, always locked together.
#[derive(Debug, Default)]
pub struct LedgerState {
    pub store: CertificateStore,
    pub pending: PendingTransferIndex,
}

/// Cloneable handle over the shared ledger state and user directory.
#[derive(Clone)]
pub struct Ledger {
    state: Arc<RwLock<LedgerState>>,
    users: Arc<dyn Authenticator>,
}

impl Ledger {
    pub fn new<I>(users: Arc<dyn Authenticator>, certificates: I) -> Self
    where
        I: IntoIterator<Item = Certificate>,
    {
        let state = LedgerState {
            store: certificates.into_iter().collect(),
            pending: PendingTransferIndex::new(),
        };
        Self {
            state: Arc::new(RwLock::new(state)),
            users,
        }
    }

    /// Ledger with the built-in users and certificates.
    pub fn seeded() -> Result<Self> {
        let users = UserDirectory::from_records(seed::users())?;
        Ok(Self::new(Arc::new(users), seed::certificates()))
    }

    /// Ledger with the built-in users and no certificates.
    pub fn empty() -> Result<Self> {
        let users = UserDirectory::from_records(seed::users())?;
        Ok(Self::new(Arc::new(users), Vec::new()))
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn list_certificates(&self) -> Vec<Certificate> {
        self.state.read().await.store.all().to_vec()
    }

    pub async fn get_certificate(&self, id: &str) -> Result<Certificate> {
        debug!(cert_id = %id, "Get certificate");
        self.state
            .read()
            .await
            .store
            .find(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Certificate {id}")))
    }

    /// Certificates owned by `user_id`.
    ///
    /// A known user with no certificates gets an empty list; `NotFound` is
    /// reserved for owners that are neither known users nor hold anything.
    pub async fn certificates_of(&self, user_id: &str) -> Result<Vec<Certificate>> {
        let (owned, found_any) = self.state.read().await.store.list_by_owner(user_id);
        if found_any || self.users.exists(user_id) {
            Ok(owned)
        } else {
            Err(Error::NotFound(format!("User {user_id}")))
        }
    }

    /// Certificate ids with an unresolved transfer, in index order.
    pub async fn pending_transfers(&self) -> Vec<String> {
        self.state
            .read()
            .await
            .pending
            .iter()
            .map(str::to_owned)
            .collect()
    }

    // =========================================================================
    // Certificate mutations
    // =========================================================================

    /// Insert a new certificate owned by `owner`.
    pub async fn create_certificate(
        &self,
        mut cert: Certificate,
        owner: Option<&str>,
    ) -> Result<Certificate> {
        let owner = required_owner(owner)?;
        let mut state = self.state.write().await;
        if state.store.find(&cert.id).is_some() {
            return Err(Error::AlreadyExists(format!("Certificate {}", cert.id)));
        }
        cert.owner_id = owner.to_string();
        state.store.create(cert.clone());
        info!(cert_id = %cert.id, owner_id = %cert.owner_id, "Certificate created");
        Ok(cert)
    }

    /// Replace a certificate without changing its owner, or create it when
    /// it does not exist and an owner is supplied.
    ///
    /// An update that changes or clears the recipient, or marks the transfer
    /// accepted, withdraws the pending proposal; an update never registers a
    /// new one.
    pub async fn update_certificate(
        &self,
        mut cert: Certificate,
        owner: Option<&str>,
    ) -> Result<Certificate> {
        let mut state = self.state.write().await;
        let previous_transfer = state.store.find(&cert.id).map(|c| c.transfer.clone());

        match state.store.replace_if_owner_unchanged(cert.clone()) {
            ReplaceOutcome::Replaced => {
                let withdrawn_by_update = previous_transfer.is_some_and(|prev| {
                    prev.to != cert.transfer.to || !cert.transfer.is_unresolved()
                });
                if withdrawn_by_update {
                    let withdrawn = state.pending.purge(&cert.id);
                    if withdrawn > 0 {
                        info!(cert_id = %cert.id, "Pending transfer withdrawn by update");
                    }
                }
                info!(cert_id = %cert.id, "Certificate updated");
                Ok(cert)
            }
            ReplaceOutcome::OwnerChangeRejected => {
                warn!(cert_id = %cert.id, "Owner change attempted through update");
                Err(Error::OwnerChangeRejected)
            }
            ReplaceOutcome::NotFound => {
                let owner = required_owner(owner)?;
                cert.owner_id = owner.to_string();
                state.store.create(cert.clone());
                info!(cert_id = %cert.id, owner_id = %cert.owner_id, "Certificate created by update");
                Ok(cert)
            }
        }
    }

    pub async fn delete_certificate(&self, id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.store.delete(id) {
            return Err(Error::NotFound(format!("Certificate {id}")));
        }
        state.pending.purge(id);
        info!(cert_id = %id, "Certificate deleted");
        Ok(())
    }

    // =========================================================================
    // Transfers
    // =========================================================================

    pub async fn propose_transfer(
        &self,
        cert_id: &str,
        proposal: Transfer,
        credentials: &Credentials,
    ) -> Result<Transfer> {
        let actor = self.authenticate(credentials)?;
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        transfer::propose_transfer(
            &mut state.store,
            &mut state.pending,
            cert_id,
            proposal,
            &actor,
        )
    }

    pub async fn accept_transfer(&self, cert_id: &str, credentials: &Credentials) -> Result<()> {
        let actor = self.authenticate(credentials)?;
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        transfer::accept_transfer(&mut state.store, &mut state.pending, cert_id, &actor)
    }

    fn authenticate(&self, credentials: &Credentials) -> Result<User> {
        self.users
            .authenticate(&credentials.id, &credentials.secret)
            .ok_or_else(|| {
                warn!(user_id = %credentials.id, "Authentication failed");
                Error::Unauthenticated
            })
    }
}

fn required_owner(owner: Option<&str>) -> Result<&str> {
    owner
        .filter(|o| !o.is_empty())
        .ok_or(Error::MissingOwnerContext)
}
