//! Transfer state machine.
//!
//! A certificate moves `NoTransfer → Pending → Resolved`. Only the current
//! owner may propose, and only the named recipient may accept; ownership
//! never changes any other way.
//!
//! Both operations take the store and the pending index together and either
//! apply all of their changes or none.

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::model::{Certificate, Transfer, User};
use crate::pending::PendingTransferIndex;
use crate::store::CertificateStore;

/// Where a certificate sits in the transfer protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    NoTransfer,
    Pending,
    Resolved,
}

impl TransferState {
    pub fn of(cert: &Certificate) -> Self {
        if cert.transfer.to.is_empty() {
            Self::NoTransfer
        } else if cert.transfer.status == Transfer::ACCEPTED {
            Self::Resolved
        } else {
            Self::Pending
        }
    }
}

/// Record a transfer proposed by the certificate's owner.
///
/// Any earlier unresolved proposal on the same certificate is discarded and
/// its index entry replaced, so the certificate appears exactly once in the
/// index afterwards.
pub fn propose_transfer(
    store: &mut CertificateStore,
    index: &mut PendingTransferIndex,
    cert_id: &str,
    proposal: Transfer,
    actor: &User,
) -> Result<Transfer> {
    let cert = store
        .find_mut(cert_id)
        .ok_or_else(|| Error::NotFound(format!("Certificate {cert_id}")))?;

    if cert.owner_id != actor.id {
        warn!(cert_id, user_id = %actor.id, "Transfer proposed by non-owner");
        return Err(Error::Unauthorized(
            "user does not own certificate".to_string(),
        ));
    }

    cert.transfer = proposal.clone();
    let replaced = index.purge(cert_id);
    index.register(cert_id);

    info!(
        cert_id,
        from = %actor.id,
        to = %proposal.to,
        replaced,
        "Transfer proposed"
    );
    Ok(proposal)
}

/// Accept the pending transfer on `cert_id` as `actor`.
///
/// On success the certificate's owner becomes `actor` and its status is set
/// to [`Transfer::ACCEPTED`].
pub fn accept_transfer(
    store: &mut CertificateStore,
    index: &mut PendingTransferIndex,
    cert_id: &str,
    actor: &User,
) -> Result<()> {
    let position = index
        .find_by_id(cert_id)
        .ok_or_else(|| Error::NotFound(format!("Transfer for certificate {cert_id}")))?;

    let Some(cert) = store
        .find_mut(cert_id)
        .filter(|c| TransferState::of(c) == TransferState::Pending)
    else {
        // Record removed or no longer pending; the entry is dead.
        index.remove(position);
        warn!(cert_id, "Dropped stale pending transfer");
        return Err(Error::NotFound(format!(
            "Transfer for certificate {cert_id}"
        )));
    };

    if cert.transfer.to != actor.email {
        warn!(cert_id, user_id = %actor.id, "Transfer accept by non-recipient");
        return Err(Error::Unauthorized(
            "transfer not intended for this user".to_string(),
        ));
    }

    let previous_owner = std::mem::replace(&mut cert.owner_id, actor.id.clone());
    cert.transfer.status = Transfer::ACCEPTED.to_string();
    index.remove(position);

    info!(cert_id, from = %previous_owner, to = %actor.id, "Transfer accepted");
    Ok(())
}
