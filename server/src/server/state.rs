use std::{
    collections::HashMap,
    hash::{DefaultHasher, Hash, Hasher},
    sync::Arc,
};

use tokio::sync::Mutex;

use nfsopen_proto::nfs4_proto::{NfsResOp4, NfsStat4, Stateid4};

/// Identifies an open-owner: the client it belongs to plus the opaque
/// owner bytes the client picked. Two different clients are free to reuse
/// the same owner bytes without colliding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerKey {
    pub clientid: u64,
    pub owner: Vec<u8>,
}

/// Hashes the `Debug` rendering of a request so retransmit detection does
/// not need every argument type to implement `Hash`, the same trick
/// `FileManager` uses to turn a `VfsPath` into a `fileid`.
pub fn request_digest<T: std::fmt::Debug>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    format!("{:?}", value).hash(&mut hasher);
    hasher.finish()
}

#[derive(Debug, Clone)]
struct LastReply {
    seqid: u32,
    request_digest: u64,
    status: NfsStat4,
    result: Option<NfsResOp4>,
}

/// What an open-owner's sequence id did to a request.
pub enum SeqidAction {
    /// Not a new request: resend the reply that was saved last time.
    Replay(NfsStat4, Option<NfsResOp4>),
    /// A legitimate next request; the caller should run the handler body
    /// and call `save_reply` with the result before releasing the owner.
    Advance,
    /// Neither a replay nor the next in sequence.
    Fail(NfsStat4),
}

/// Per-owner sequencing and replay state. Held behind its own
/// `Arc<Mutex<_>>` so the OPEN handler can lock one owner for the whole
/// request without blocking unrelated owners.
#[derive(Debug)]
pub struct OpenOwnerState {
    pub clientid: u64,
    pub owner_bytes: Vec<u8>,
    pub seqid: u32,
    pub confirmed: bool,
    last_reply: Option<LastReply>,
}

impl OpenOwnerState {
    fn new(clientid: u64, owner_bytes: Vec<u8>) -> Self {
        OpenOwnerState {
            clientid,
            owner_bytes,
            seqid: 0,
            confirmed: false,
            last_reply: None,
        }
    }

    /// Classify `req_seqid` against the last seqid this owner advanced to.
    ///
    /// Order matters: a request can only be a replay when both the seqid
    /// matches *and* the digest matches, otherwise it falls through to the
    /// "next in sequence" and "reset from zero" checks before finally
    /// being rejected as out of sequence.
    pub fn check_seqid(&mut self, req_seqid: u32, digest: u64) -> SeqidAction {
        if req_seqid == self.seqid {
            if let Some(last) = &self.last_reply {
                if last.request_digest == digest {
                    return SeqidAction::Replay(last.status.clone(), last.result.clone());
                }
            }
        }
        if req_seqid == self.seqid.wrapping_add(1) {
            return SeqidAction::Advance;
        }
        if req_seqid == 0 {
            // a seqid of 0 on a known owner restarts the sequence, used by
            // clients re-establishing an owner after OPEN_CONFIRM was lost
            self.confirmed = false;
            return SeqidAction::Advance;
        }
        SeqidAction::Fail(NfsStat4::Nfs4errBadSeqid)
    }

    pub fn save_reply(&mut self, seqid: u32, digest: u64, status: NfsStat4, result: Option<NfsResOp4>) {
        self.seqid = seqid;
        self.last_reply = Some(LastReply {
            seqid,
            request_digest: digest,
            status,
            result,
        });
    }

    pub fn confirm(&mut self) {
        self.confirmed = true;
    }
}

/// A single granted open: the stateid it was issued under, the share
/// reservation it holds against the file, and (for EXCLUSIVE4 creates)
/// the verifier that makes a repeated create idempotent.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareState {
    pub other: [u8; 12],
    pub file_id: Vec<u8>,
    pub owner_key: OwnerKey,
    pub share_access: u32,
    pub share_deny: u32,
    pub excl_verifier: Option<[u8; 8]>,
    pub stateid_seqid: u32,
    pub lockheld: u32,
}

impl ShareState {
    /// True if granting `access`/`deny` to someone else would conflict
    /// with what this share state already holds against the file. Applied
    /// unconditionally: a deny a client placed on itself still binds it.
    pub fn conflicts_with(&self, access: u32, deny: u32) -> bool {
        (self.share_access & deny) != 0 || (self.share_deny & access) != 0
    }

    pub fn stateid(&self) -> Stateid4 {
        Stateid4 {
            seqid: self.stateid_seqid,
            other: self.other,
        }
    }
}

struct StateManagerInner {
    owners: HashMap<OwnerKey, Arc<Mutex<OpenOwnerState>>>,
    shares: HashMap<Vec<u8>, Arc<Mutex<Vec<ShareState>>>>,
    boot_time: u64,
    next_other_seq: u32,
}

/// Owns the open-owner table, the per-file share-state lists and the
/// stateid allocator. Unlike `ClientManagerHandle`/`FileManagerHandle`
/// this isn't an actor behind an mpsc mailbox: the OPEN handler needs to
/// lock one owner and hold it across several awaited calls into the
/// client and file managers, which a single round-trip mailbox can't
/// express without the handler re-entering its own actor. A plain
/// `Arc<Mutex<_>>` lets the caller hold the guard for exactly as long as
/// the request needs it, and the per-file share list is a second, nested
/// lock so unrelated files never wait on one busy owner.
#[derive(Clone)]
pub struct StateManagerHandle(Arc<Mutex<StateManagerInner>>);

impl StateManagerHandle {
    pub fn new() -> Self {
        let boot_time = std::time::UNIX_EPOCH.elapsed().unwrap().as_secs();
        StateManagerHandle(Arc::new(Mutex::new(StateManagerInner {
            owners: HashMap::new(),
            shares: HashMap::new(),
            boot_time,
            next_other_seq: 1,
        })))
    }

    /// Look up or create the owner identified by `clientid`/`owner`. The
    /// returned `Arc` should be locked and held by the caller for the
    /// whole OPEN request; looking it up only takes the table lock
    /// briefly.
    pub async fn owner_for(&self, clientid: u64, owner: Vec<u8>) -> Arc<Mutex<OpenOwnerState>> {
        let mut inner = self.0.lock().await;
        let key = OwnerKey { clientid, owner: owner.clone() };
        inner
            .owners
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(OpenOwnerState::new(clientid, owner))))
            .clone()
    }

    async fn share_list(&self, file_id: &[u8]) -> Arc<Mutex<Vec<ShareState>>> {
        let mut inner = self.0.lock().await;
        inner
            .shares
            .entry(file_id.to_vec())
            .or_insert_with(|| Arc::new(Mutex::new(Vec::new())))
            .clone()
    }

    async fn alloc_other(&self) -> [u8; 12] {
        let mut inner = self.0.lock().await;
        let seq = inner.next_other_seq;
        inner.next_other_seq += 1;
        let mut other = [0u8; 12];
        other[..8].copy_from_slice(&inner.boot_time.to_be_bytes());
        other[8..].copy_from_slice(&seq.to_be_bytes());
        other
    }

    /// Snapshot of the share states currently held against `file_id`.
    pub async fn iterate_shares(&self, file_id: &[u8]) -> Vec<ShareState> {
        let list = self.share_list(file_id).await;
        let guard = list.lock().await;
        guard.clone()
    }

    /// Check-then-insert under one lock: used by the CREATE paths, which
    /// never reuse a prior share state even for the same owner, so there
    /// is nothing to decide beyond "does this conflict with what's
    /// already there".
    pub async fn add_share(
        &self,
        file_id: &[u8],
        owner_key: OwnerKey,
        share_access: u32,
        share_deny: u32,
        excl_verifier: Option<[u8; 8]>,
    ) -> Result<ShareState, ()> {
        let list_arc = self.share_list(file_id).await;
        let mut list = list_arc.lock().await;
        if list.iter().any(|s| s.conflicts_with(share_access, share_deny)) {
            return Err(());
        }
        let other = self.alloc_other().await;
        let state = ShareState {
            other,
            file_id: file_id.to_vec(),
            owner_key,
            share_access,
            share_deny,
            excl_verifier,
            stateid_seqid: 1,
            lockheld: 0,
        };
        list.push(state.clone());
        Ok(state)
    }

    /// Bump the stateid seqid of an existing share state, returning the
    /// new seqid, or `None` if it no longer exists.
    pub async fn advance(&self, file_id: &[u8], other: &[u8; 12]) -> Option<u32> {
        let list_arc = self.share_list(file_id).await;
        let mut list = list_arc.lock().await;
        let state = list.iter_mut().find(|s| s.other == *other)?;
        state.stateid_seqid += 1;
        Some(state.stateid_seqid)
    }

    /// Remove a share state outright. Lock-based reservations aren't
    /// implemented, so `lockheld` never rises above zero and CLOSE always
    /// destroys the state it names.
    pub async fn close(&self, file_id: &[u8], other: &[u8; 12]) -> bool {
        let list_arc = self.share_list(file_id).await;
        let mut list = list_arc.lock().await;
        let before = list.len();
        list.retain(|s| s.other != *other);
        list.len() != before
    }
}

impl Default for StateManagerHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn check_seqid_advances_and_replays() {
        let mut owner = OpenOwnerState::new(1, b"owner-a".to_vec());
        assert!(matches!(owner.check_seqid(1, 42), SeqidAction::Advance));
        owner.save_reply(1, 42, NfsStat4::Nfs4Ok, None);

        // resending the exact same request replays the saved reply
        assert!(matches!(
            owner.check_seqid(1, 42),
            SeqidAction::Replay(NfsStat4::Nfs4Ok, None)
        ));

        // same seqid, different body: neither a replay nor in sequence
        assert!(matches!(
            owner.check_seqid(1, 99),
            SeqidAction::Fail(NfsStat4::Nfs4errBadSeqid)
        ));

        // the next request in sequence advances
        assert!(matches!(owner.check_seqid(2, 7), SeqidAction::Advance));

        // anything further ahead is out of sequence
        assert!(matches!(
            owner.check_seqid(9, 7),
            SeqidAction::Fail(NfsStat4::Nfs4errBadSeqid)
        ));
    }

    #[tokio::test]
    async fn check_seqid_zero_resets_confirmation() {
        let mut owner = OpenOwnerState::new(1, b"owner-a".to_vec());
        owner.seqid = 5;
        owner.confirm();
        assert!(matches!(owner.check_seqid(0, 1), SeqidAction::Advance));
        assert!(!owner.confirmed);
    }

    #[tokio::test]
    async fn owner_for_is_stable_per_key() {
        let smanager = StateManagerHandle::new();
        let a1 = smanager.owner_for(1, b"o".to_vec()).await;
        let a2 = smanager.owner_for(1, b"o".to_vec()).await;
        assert!(Arc::ptr_eq(&a1, &a2));

        let b = smanager.owner_for(2, b"o".to_vec()).await;
        assert!(!Arc::ptr_eq(&a1, &b));
    }

    #[tokio::test]
    async fn add_share_detects_conflict_and_is_conflict_free_across_owners() {
        use nfsopen_proto::nfs4_proto::{OPEN4_SHARE_ACCESS_READ, OPEN4_SHARE_DENY_WRITE};

        let smanager = StateManagerHandle::new();
        let file_id = vec![1, 2, 3];
        let owner_a = OwnerKey { clientid: 1, owner: b"a".to_vec() };
        let owner_b = OwnerKey { clientid: 1, owner: b"b".to_vec() };

        let first = smanager
            .add_share(&file_id, owner_a, OPEN4_SHARE_ACCESS_READ, OPEN4_SHARE_DENY_WRITE, None)
            .await
            .expect("first open should succeed");
        assert_eq!(first.stateid_seqid, 1);

        // a second owner asking for write access conflicts with the
        // first owner's DENY_WRITE
        let second = smanager
            .add_share(&file_id, owner_b, nfsopen_proto::nfs4_proto::OPEN4_SHARE_ACCESS_WRITE, 0, None)
            .await;
        assert!(second.is_err());

        assert_eq!(smanager.iterate_shares(&file_id).await.len(), 1);
    }

    #[tokio::test]
    async fn close_removes_the_named_share_state() {
        use nfsopen_proto::nfs4_proto::OPEN4_SHARE_ACCESS_READ;

        let smanager = StateManagerHandle::new();
        let file_id = vec![9];
        let owner = OwnerKey { clientid: 1, owner: b"a".to_vec() };
        let state = smanager
            .add_share(&file_id, owner, OPEN4_SHARE_ACCESS_READ, 0, None)
            .await
            .unwrap();

        assert!(smanager.close(&file_id, &state.other).await);
        assert!(smanager.iterate_shares(&file_id).await.is_empty());
        assert!(!smanager.close(&file_id, &state.other).await);
    }
}
