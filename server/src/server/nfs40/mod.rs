pub mod attrs;

use async_trait::async_trait;
use tracing::{debug, trace, warn};

use nfsopen_proto::nfs4_proto::{
    Access4args, Access4res, Access4resok, ChangeInfo4, Close4args, Close4res, Compound4args,
    Compound4res, CreateHow4, Fattr4, FileAttr, Getattr4args, Getattr4resok, GetFh4res,
    GetFh4resok, Lookup4args, Lookup4res, NfsArgOp, NfsFtype4, NfsResOp4, NfsStat4, Open4args,
    Open4res, Open4resok, OpenClaim4, OpenConfirm4args, OpenConfirm4res, OpenConfirm4resok,
    OpenDelegation4, OpenFlag4, PutFh4args, PutFh4res, PutRootFh4res, Renew4args, Renew4res,
    SetAttr4args, SetAttr4res, SetClientId4args, SetClientId4res, SetClientId4resok,
    SetClientIdConfirm4args, SetClientIdConfirm4res, Stateid4, NFS4_MAXNAMLEN,
    OPEN4_RESULT_CONFIRM, OPEN4_RESULT_LOCKT_YPE_POSIX, OPEN4_SHARE_ACCESS_READ,
    OPEN4_SHARE_ACCESS_WRITE, OPEN4_SHARE_DENY_WRITE,
};
use nfsopen_proto::rpc_proto::{AcceptBody, AcceptedReply, CallBody, OpaqueAuth, ReplyBody};
use nfsopen_proto::utils::file_attrs_to_bitmap;

use super::{
    clientmanager::ClientCallback,
    filemanager::Filehandle,
    request::NfsRequest,
    state::{request_digest, OwnerKey, SeqidAction, ShareState},
    NfsProtoImpl,
};

/// The NFSv4.0 minor-version-0 service: dispatches a COMPOUND's operation
/// array and, for OPEN specifically, runs the owner/share-state machine
/// described by the crate's `StateManagerHandle`.
#[derive(Debug, Clone)]
pub struct NFS40Server {
    /// Whether an unconfirmed owner's first successful OPEN sets
    /// `OPEN4_RESULT_CONFIRM`, requiring an explicit OPEN_CONFIRM.
    use_open_confirm: bool,
    /// Optional strict rejection of files whose cached mode is 0.
    with_mode_0_check: bool,
}

impl NFS40Server {
    fn reply(status: NfsStat4, tag: String, resarray: Vec<NfsResOp4>) -> ReplyBody {
        ReplyBody::MsgAccepted(AcceptedReply {
            verf: OpaqueAuth::AuthNull(Vec::new()),
            reply_data: AcceptBody::Success(Compound4res { status, tag, resarray }),
        })
    }

    /// Runs one decoded operation against `request`, mutating its current
    /// filehandle as a side effect the way every NFSv4 operation does.
    async fn dispatch(&self, request: &mut NfsRequest, op: NfsArgOp) -> Result<NfsResOp4, NfsStat4> {
        match op {
            NfsArgOp::Opputrootfh(()) => self.put_root_filehandle(request).await,
            NfsArgOp::Opputfh(args) => self.put_filehandle(request, args).await,
            NfsArgOp::Opgetfh(()) => self.get_filehandle(request).await,
            NfsArgOp::Oplookup(args) => self.lookup(request, args).await,
            NfsArgOp::Opgetattr(args) => self.getattr(request, args).await,
            NfsArgOp::OpAccess(args) => self.access(request, args).await,
            NfsArgOp::Opsetattr(args) => self.setattr(request, args).await,
            NfsArgOp::Opsetclientid(args) => self.set_client_id(request, args).await,
            NfsArgOp::OpsetclientidConfirm(args) => self.set_client_id_confirm(request, args).await,
            NfsArgOp::Oprenew(args) => self.renew(request, args).await,
            NfsArgOp::Opopen(args) => self.open(request, args).await,
            NfsArgOp::OpopenConfirm(args) => self.open_confirm(request, args).await,
            NfsArgOp::Opclose(args) => self.close(request, args).await,
            _ => {
                warn!("operation not supported by this server");
                Err(NfsStat4::Nfs4errNotsupp)
            }
        }
    }

    // -- PUTROOTFH / PUTFH / GETFH / LOOKUP -------------------------------

    async fn put_root_filehandle(&self, request: &mut NfsRequest) -> Result<NfsResOp4, NfsStat4> {
        let fh = request
            .file_manager()
            .get_root_filehandle()
            .await
            .map_err(|e| e.nfs_error)?;
        request.set_filehandle_id(fh.id.clone());
        Ok(NfsResOp4::Opputrootfh(PutRootFh4res { status: NfsStat4::Nfs4Ok }))
    }

    async fn put_filehandle(&self, request: &mut NfsRequest, args: PutFh4args) -> Result<NfsResOp4, NfsStat4> {
        if args.object.is_empty() {
            return Err(NfsStat4::Nfs4errBadhandle);
        }
        let fh = request
            .file_manager()
            .get_filehandle_for_id(args.object)
            .await
            .map_err(|_| NfsStat4::Nfs4errStale)?;
        request.set_filehandle_id(fh.id.clone());
        Ok(NfsResOp4::Opputfh(PutFh4res { status: NfsStat4::Nfs4Ok }))
    }

    async fn get_filehandle(&self, request: &NfsRequest) -> Result<NfsResOp4, NfsStat4> {
        let fh = preflight(request).await?;
        Ok(NfsResOp4::Opgetfh(GetFh4res::Resok4(GetFh4resok { object: fh.id.clone() })))
    }

    async fn lookup(&self, request: &mut NfsRequest, args: Lookup4args) -> Result<NfsResOp4, NfsStat4> {
        let dir = preflight(request).await?;
        let target = request
            .file_manager()
            .lookup(dir.id.clone(), args.objname)
            .await
            .map_err(|e| e.nfs_error)?;
        request.set_filehandle_id(target.id.clone());
        Ok(NfsResOp4::Oplookup(Lookup4res { status: NfsStat4::Nfs4Ok }))
    }

    // -- GETATTR / ACCESS / SETATTR ---------------------------------------

    async fn getattr(&self, request: &NfsRequest, args: Getattr4args) -> Result<NfsResOp4, NfsStat4> {
        let fh = preflight(request).await?;
        let (attrmask, attr_vals) = request
            .file_manager()
            .get_filehandle_attrs(fh.id.clone(), args.attr_request)
            .await
            .map_err(|e| e.nfs_error)?;
        Ok(NfsResOp4::Opgetattr(Getattr4resok {
            status: NfsStat4::Nfs4Ok,
            obj_attributes: Some(Fattr4 { attrmask, attr_vals }),
        }))
    }

    async fn access(&self, request: &NfsRequest, args: Access4args) -> Result<NfsResOp4, NfsStat4> {
        let fh = preflight(request).await?;
        request
            .file_manager()
            .access(fh.id.clone())
            .await
            .map_err(|e| e.nfs_error)?;
        Ok(NfsResOp4::OpAccess(Access4res::Resok4(Access4resok {
            supported: args.access,
            access: args.access,
        })))
    }

    async fn setattr(&self, request: &NfsRequest, args: SetAttr4args) -> Result<NfsResOp4, NfsStat4> {
        let fh = preflight(request).await?;
        let (mode, size) = attrs::validate_createattrs(&args.obj_attributes)?;
        request
            .file_manager()
            .setattr(fh.id.clone(), mode, size)
            .await
            .map_err(|e| e.nfs_error)?;
        let mut applied = Vec::new();
        if mode.is_some() {
            applied.push(FileAttr::Mode);
        }
        if size.is_some() {
            applied.push(FileAttr::Size);
        }
        let attrsset = file_attrs_to_bitmap(&applied).unwrap_or_default();
        Ok(NfsResOp4::Opsetattr(SetAttr4res { status: NfsStat4::Nfs4Ok, attrsset }))
    }

    // -- client lifecycle --------------------------------------------------

    async fn set_client_id(&self, request: &NfsRequest, args: SetClientId4args) -> Result<NfsResOp4, NfsStat4> {
        let callback = ClientCallback {
            program: args.callback.cb_program,
            rnetid: args.callback.cb_location.rnetid,
            raddr: args.callback.cb_location.raddr,
            callback_ident: args.callback_ident,
        };
        let client = request
            .client_manager()
            .upsert_client(args.client.verifier, args.client.id, callback, None)
            .await
            .map_err(|e| e.nfs_error)?;
        Ok(NfsResOp4::Opsetclientid(SetClientId4res::Resok4(SetClientId4resok {
            clientid: client.clientid,
            setclientid_confirm: client.setclientid_confirm,
        })))
    }

    async fn set_client_id_confirm(
        &self,
        request: &NfsRequest,
        args: SetClientIdConfirm4args,
    ) -> Result<NfsResOp4, NfsStat4> {
        request
            .client_manager()
            .confirm_client(args.clientid, args.setclientid_confirm, None)
            .await
            .map_err(|e| e.nfs_error)?;
        Ok(NfsResOp4::OpsetclientidConfirm(SetClientIdConfirm4res { status: NfsStat4::Nfs4Ok }))
    }

    async fn renew(&self, request: &NfsRequest, args: Renew4args) -> Result<NfsResOp4, NfsStat4> {
        request
            .client_manager()
            .renew(args.clientid)
            .await
            .map_err(|e| e.nfs_error)?;
        Ok(NfsResOp4::Oprenew(Renew4res { status: NfsStat4::Nfs4Ok }))
    }

    // -- OPEN ---------------------------------------------------------------

    async fn open(&self, request: &mut NfsRequest, args: Open4args) -> Result<NfsResOp4, NfsStat4> {
        let dir_fh = preflight(request).await?;

        let name = match &args.claim {
            OpenClaim4::ClaimDelegateCur(claim) => {
                validate_name(&claim.file)?;
                warn!("CLAIM_DELEGATE_CUR is not supported: no delegations are issued");
                return Err(NfsStat4::Nfs4errNotsupp);
            }
            OpenClaim4::ClaimDelegatePrev(name) => {
                validate_name(name)?;
                warn!("CLAIM_DELEGATE_PREV is not supported: no delegations are issued");
                return Err(NfsStat4::Nfs4errNotsupp);
            }
            OpenClaim4::ClaimPrevious(_) => {
                // reclaim semantics are an open source ambiguity (see DESIGN.md)
                warn!("CLAIM_PREVIOUS reclaim is not implemented");
                return Err(NfsStat4::Nfs4errNotsupp);
            }
            OpenClaim4::ClaimNull(name) => name.clone(),
        };

        self.open_claim_null(request, &dir_fh, args, name).await
    }

    async fn open_claim_null(
        &self,
        request: &mut NfsRequest,
        dir_fh: &Filehandle,
        args: Open4args,
        name: String,
    ) -> Result<NfsResOp4, NfsStat4> {
        let smanager = request.state_manager();
        let digest = request_digest(&args);
        let owner_arc = smanager.owner_for(args.owner.clientid, args.owner.owner.clone()).await;
        let mut owner = owner_arc.lock().await;

        match owner.check_seqid(args.seqid, digest) {
            SeqidAction::Replay(NfsStat4::Nfs4Ok, Some(result)) => return Ok(result),
            SeqidAction::Replay(status, _) => return Err(status),
            SeqidAction::Fail(err) => return Err(err),
            SeqidAction::Advance => {}
        }

        let confirmed_before = owner.confirmed;
        let owner_key = OwnerKey { clientid: args.owner.clientid, owner: args.owner.owner.clone() };

        let outcome = self
            .open_body(request, dir_fh, &args, &name, owner_key, confirmed_before)
            .await;

        if let Ok(NfsResOp4::Opopen(Open4res::Resok4(ref resok))) = outcome {
            if resok.rflags & OPEN4_RESULT_CONFIRM == 0 {
                owner.confirm();
            }
        }

        let (status, result) = match &outcome {
            Ok(res) => (NfsStat4::Nfs4Ok, Some(res.clone())),
            Err(err) => (err.clone(), None),
        };
        owner.save_reply(args.seqid, digest, status, result);
        drop(owner);

        outcome
    }

    async fn open_body(
        &self,
        request: &mut NfsRequest,
        dir_fh: &Filehandle,
        args: &Open4args,
        name: &str,
        owner_key: OwnerKey,
        confirmed: bool,
    ) -> Result<NfsResOp4, NfsStat4> {
        validate_name(name)?;

        match dir_fh.attr_type {
            NfsFtype4::Nf4lnk => return Err(NfsStat4::Nfs4errSymlink),
            NfsFtype4::Nf4dir => {}
            _ => return Err(NfsStat4::Nfs4errNotdir),
        }

        request
            .client_manager()
            .get_client_confirmed(args.owner.clientid)
            .await
            .ok_or(NfsStat4::Nfs4errStaleClientid)?;

        let cinfo_before = dir_fh.attr_change;

        match &args.openhow {
            OpenFlag4::Open4Nocreate => {
                self.open_nocreate(request, dir_fh, name, args, owner_key, cinfo_before, confirmed)
                    .await
            }
            OpenFlag4::How(how) => {
                self.open_create(request, dir_fh, name, args, how, owner_key, cinfo_before, confirmed)
                    .await
            }
        }
    }

    async fn open_nocreate(
        &self,
        request: &mut NfsRequest,
        dir_fh: &Filehandle,
        name: &str,
        args: &Open4args,
        owner_key: OwnerKey,
        cinfo_before: u64,
        confirmed: bool,
    ) -> Result<NfsResOp4, NfsStat4> {
        let fmanager = request.file_manager();
        let smanager = request.state_manager();

        let target = fmanager.lookup(dir_fh.id.clone(), name.to_string()).await.map_err(|e| e.nfs_error)?;
        match target.attr_type {
            NfsFtype4::Nf4dir | NfsFtype4::Nf4attrdir => return Err(NfsStat4::Nfs4errIsdir),
            NfsFtype4::Nf4lnk => return Err(NfsStat4::Nfs4errSymlink),
            NfsFtype4::Nf4reg => {}
            _ => return Err(NfsStat4::Nfs4errInval),
        }

        probe_access(&fmanager, &target, args.share_access).await?;

        let shares = smanager.iterate_shares(&target.id).await;
        let mut reuse = None;
        for s in &shares {
            // a deny a client placed on itself still binds it (ShareState::conflicts_with)
            if s.conflicts_with(args.share_access, args.share_deny) {
                return Err(NfsStat4::Nfs4errShareDenied);
            }
            if s.owner_key == owner_key {
                reuse = Some(s.clone());
            }
        }

        let share = match reuse {
            Some(s) => s,
            None => smanager
                .add_share(&target.id, owner_key, args.share_access, args.share_deny, None)
                .await
                .map_err(|_| NfsStat4::Nfs4errShareDenied)?,
        };

        if self.with_mode_0_check && target.attr_mode == 0 {
            return Err(NfsStat4::Nfs4errAccess);
        }
        fmanager.open_by_name(target.id.clone()).await.map_err(|_| NfsStat4::Nfs4errAccess)?;

        self.finish_open(request, dir_fh, &target, &share, cinfo_before, Vec::new(), confirmed).await
    }

    async fn open_create(
        &self,
        request: &mut NfsRequest,
        dir_fh: &Filehandle,
        name: &str,
        args: &Open4args,
        how: &CreateHow4,
        owner_key: OwnerKey,
        cinfo_before: u64,
        confirmed: bool,
    ) -> Result<NfsResOp4, NfsStat4> {
        let fmanager = request.file_manager();
        let smanager = request.state_manager();

        let mut existing = match fmanager.lookup(dir_fh.id.clone(), name.to_string()).await {
            Ok(fh) => Some(*fh),
            Err(e) if e.nfs_error == NfsStat4::Nfs4errNoent => None,
            Err(e) => return Err(e.nfs_error),
        };

        loop {
            match (how, existing) {
                (CreateHow4::GUARDED4(_), Some(_)) => return Err(NfsStat4::Nfs4errExist),

                (CreateHow4::EXCLUSIVE4(verifier), Some(target)) => {
                    let shares = smanager.iterate_shares(&target.id).await;
                    let retry = shares
                        .iter()
                        .find(|s| s.owner_key == owner_key && s.excl_verifier.as_ref() == Some(verifier))
                        .cloned();
                    return match retry {
                        Some(share) => {
                            self.finish_open(request, dir_fh, &target, &share, cinfo_before, attrset_for_create(), confirmed)
                                .await
                        }
                        None => Err(NfsStat4::Nfs4errExist),
                    };
                }

                (CreateHow4::UNCHECKED4(createattrs), Some(target)) => {
                    probe_access(&fmanager, &target, args.share_access).await?;
                    let (mode, size) = attrs::validate_createattrs(createattrs)?;
                    let target = if mode.is_some() || size.is_some() {
                        *fmanager.setattr(target.id.clone(), mode, size).await.map_err(|e| e.nfs_error)?
                    } else {
                        target
                    };

                    // open-existing never consults a prior ShareState for reuse here
                    // (see DESIGN.md, open question 3): a fresh state is always added.
                    let share = smanager
                        .add_share(&target.id, owner_key, args.share_access, args.share_deny, None)
                        .await
                        .map_err(|_| NfsStat4::Nfs4errShareDenied)?;

                    fmanager
                        .open_by_name(target.id.clone())
                        .await
                        .map_err(|_| NfsStat4::Nfs4errAccess)?;

                    return self
                        .finish_open(request, dir_fh, &target, &share, cinfo_before, attrset_for_create(), confirmed)
                        .await;
                }

                (how, None) => match fmanager.create(dir_fh.id.clone(), name.to_string(), 0o600).await {
                    Ok(target) => {
                        let verifier = match how {
                            CreateHow4::EXCLUSIVE4(v) => Some(*v),
                            _ => None,
                        };
                        let share = smanager
                            .add_share(&target.id, owner_key.clone(), args.share_access, args.share_deny, verifier)
                            .await
                            .map_err(|_| NfsStat4::Nfs4errShareDenied)?;

                        let (mode, size) = match how {
                            CreateHow4::UNCHECKED4(createattrs) | CreateHow4::GUARDED4(createattrs) => {
                                attrs::validate_createattrs(createattrs)?
                            }
                            CreateHow4::EXCLUSIVE4(_) => (None, None),
                        };
                        let target = if mode.is_some() || size.is_some() {
                            *fmanager.setattr(target.id.clone(), mode, size).await.map_err(|e| e.nfs_error)?
                        } else {
                            *target
                        };

                        trace!(openflags = ?openflags(args.share_access, args.share_deny), "derived openflags for new file");
                        fmanager
                            .open_by_name(target.id.clone())
                            .await
                            .map_err(|_| NfsStat4::Nfs4errAccess)?;

                        return self
                            .finish_open(request, dir_fh, &target, &share, cinfo_before, attrset_for_create(), confirmed)
                            .await;
                    }
                    Err(e) if e.nfs_error == NfsStat4::Nfs4errExist => {
                        existing = Some(
                            *fmanager
                                .lookup(dir_fh.id.clone(), name.to_string())
                                .await
                                .map_err(|e| e.nfs_error)?,
                        );
                        continue;
                    }
                    Err(e) => return Err(e.nfs_error),
                },
            }
        }
    }

    async fn finish_open(
        &self,
        request: &mut NfsRequest,
        dir_fh: &Filehandle,
        target: &Filehandle,
        share: &ShareState,
        cinfo_before: u64,
        attrset: Vec<FileAttr>,
        confirmed: bool,
    ) -> Result<NfsResOp4, NfsStat4> {
        request.set_filehandle_id(target.id.clone());
        // before/after are both sampled from the parent directory, not the target file.
        let cinfo_after = request
            .file_manager()
            .get_filehandle_for_id(dir_fh.id.clone())
            .await
            .map(|fh| fh.attr_change)
            .unwrap_or(cinfo_before);

        let mut rflags = OPEN4_RESULT_LOCKT_YPE_POSIX;
        if self.use_open_confirm && !confirmed {
            rflags |= OPEN4_RESULT_CONFIRM;
        }

        debug!(file = ?target.id, stateid_other = ?share.other, "OPEN granted");

        Ok(NfsResOp4::Opopen(Open4res::Resok4(Open4resok {
            stateid: share.stateid(),
            cinfo: ChangeInfo4 { atomic: true, before: cinfo_before, after: cinfo_after },
            rflags,
            attrset,
            delegation: OpenDelegation4::None,
        })))
    }

    // -- OPEN_CONFIRM / CLOSE -----------------------------------------------

    async fn open_confirm(&self, request: &mut NfsRequest, args: OpenConfirm4args) -> Result<NfsResOp4, NfsStat4> {
        let fh = preflight(request).await?;
        let smanager = request.state_manager();
        let shares = smanager.iterate_shares(&fh.id).await;
        let share = shares
            .iter()
            .find(|s| s.other == args.open_stateid.other)
            .ok_or(NfsStat4::Nfs4errBadStateid)?
            .clone();

        let owner_arc = smanager.owner_for(share.owner_key.clientid, share.owner_key.owner.clone()).await;
        let mut owner = owner_arc.lock().await;
        let digest = request_digest(&args);
        match owner.check_seqid(args.seqid, digest) {
            SeqidAction::Replay(NfsStat4::Nfs4Ok, Some(result)) => return Ok(result),
            SeqidAction::Replay(status, _) => return Err(status),
            SeqidAction::Fail(err) => return Err(err),
            SeqidAction::Advance => {}
        }

        owner.confirm();
        let new_seqid = smanager.advance(&fh.id, &share.other).await.unwrap_or(share.stateid_seqid);
        let result = NfsResOp4::OpopenConfirm(OpenConfirm4res::Resok4(OpenConfirm4resok {
            open_stateid: Stateid4 { seqid: new_seqid, other: share.other },
        }));
        owner.save_reply(args.seqid, digest, NfsStat4::Nfs4Ok, Some(result.clone()));
        Ok(result)
    }

    async fn close(&self, request: &mut NfsRequest, args: Close4args) -> Result<NfsResOp4, NfsStat4> {
        let fh = preflight(request).await?;
        let smanager = request.state_manager();
        let shares = smanager.iterate_shares(&fh.id).await;
        let share = shares
            .iter()
            .find(|s| s.other == args.open_stateid.other)
            .ok_or(NfsStat4::Nfs4errBadStateid)?
            .clone();

        let owner_arc = smanager.owner_for(share.owner_key.clientid, share.owner_key.owner.clone()).await;
        let mut owner = owner_arc.lock().await;
        let digest = request_digest(&args);
        match owner.check_seqid(args.seqid, digest) {
            SeqidAction::Replay(NfsStat4::Nfs4Ok, Some(result)) => return Ok(result),
            SeqidAction::Replay(status, _) => return Err(status),
            SeqidAction::Fail(err) => return Err(err),
            SeqidAction::Advance => {}
        }

        smanager.close(&fh.id, &share.other).await;
        let result = NfsResOp4::Opclose(Close4res::OpenStateid(Stateid4 {
            seqid: args.open_stateid.seqid.wrapping_add(1),
            other: share.other,
        }));
        owner.save_reply(args.seqid, digest, NfsStat4::Nfs4Ok, Some(result.clone()));
        Ok(result)
    }
}

#[async_trait]
impl NfsProtoImpl for NFS40Server {
    fn minor_version(&self) -> u32 {
        0
    }

    fn new() -> Self {
        NFS40Server { use_open_confirm: true, with_mode_0_check: false }
    }

    fn hash(&self) -> u64 {
        0
    }

    async fn null(&self, _: CallBody, request: NfsRequest) -> (NfsRequest, ReplyBody) {
        let body = ReplyBody::MsgAccepted(AcceptedReply {
            verf: OpaqueAuth::AuthNull(Vec::new()),
            reply_data: AcceptBody::Success(Compound4res {
                status: NfsStat4::Nfs4Ok,
                tag: String::new(),
                resarray: Vec::new(),
            }),
        });
        (request, body)
    }

    async fn compound(&self, msg: CallBody, mut request: NfsRequest) -> (NfsRequest, ReplyBody) {
        let Some(args) = msg.args else {
            return (request, Self::reply(NfsStat4::Nfs4errBadxdr, String::new(), Vec::new()));
        };
        let Compound4args { tag, minor_version, argarray } = args;
        if minor_version != self.minor_version() {
            return (request, Self::reply(NfsStat4::Nfs4errMinorVersMismatch, tag, Vec::new()));
        }

        let mut resarray = Vec::with_capacity(argarray.len());
        let mut status = NfsStat4::Nfs4Ok;

        for op in argarray {
            match self.dispatch(&mut request, op).await {
                Ok(result) => resarray.push(result),
                Err(err) => {
                    status = err;
                    break;
                }
            }
        }

        (request, Self::reply(status, tag, resarray))
    }
}

/// Resolves and sanity-checks the current filehandle before any operation
/// that requires one. `is_pseudo`/`is_xattr` are always false: this server
/// exports a single real `vfs` tree and has no separate pseudo-fs or named
/// attribute namespace to classify a handle into.
async fn preflight(request: &NfsRequest) -> Result<Box<Filehandle>, NfsStat4> {
    let id = request.current_filehandle_id().ok_or(NfsStat4::Nfs4errNofilehandle)?;
    if id.is_empty() {
        return Err(NfsStat4::Nfs4errBadhandle);
    }
    request.current_filehandle().await.ok_or(NfsStat4::Nfs4errFhexpired)
}

fn validate_name(name: &str) -> Result<(), NfsStat4> {
    if name.is_empty() {
        return Err(NfsStat4::Nfs4errInval);
    }
    if name.len() > NFS4_MAXNAMLEN {
        return Err(NfsStat4::Nfs4errNametoolong);
    }
    Ok(())
}

async fn probe_access(
    fmanager: &super::filemanager::FileManagerHandle,
    target: &Filehandle,
    share_access: u32,
) -> Result<(), NfsStat4> {
    if share_access & (OPEN4_SHARE_ACCESS_READ | OPEN4_SHARE_ACCESS_WRITE) != 0 {
        fmanager.access(target.id.clone()).await.map_err(|_| NfsStat4::Nfs4errAccess)?;
    }
    Ok(())
}

fn attrset_for_create() -> Vec<FileAttr> {
    vec![FileAttr::Size, FileAttr::Mode]
}

#[derive(Debug, PartialEq, Eq)]
enum OpenFlags {
    Rdonly,
    Rdwr,
}

/// Normalizes the (overlapping) share-bit-to-openflags table in §4.5.1 to a
/// last-assignment-wins rule (open question 5).
fn openflags(share_access: u32, share_deny: u32) -> OpenFlags {
    let mut flags = OpenFlags::Rdonly;
    if share_access & OPEN4_SHARE_ACCESS_WRITE != 0 {
        flags = OpenFlags::Rdwr;
    }
    if share_access & OPEN4_SHARE_ACCESS_READ != 0 && share_access & OPEN4_SHARE_ACCESS_WRITE == 0 {
        flags = OpenFlags::Rdonly;
    }
    if share_deny & OPEN4_SHARE_DENY_WRITE != 0 {
        flags = OpenFlags::Rdwr;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::test_utils::{create_client, create_fake_fs, create_nfs40_server};
    use nfsopen_proto::nfs4_proto::{
        CreateHow4, NfsClientId4, OpenClaim4, OpenFlag4, OpenOwner4, OPEN4_SHARE_ACCESS_BOTH,
        OPEN4_SHARE_ACCESS_READ, OPEN4_SHARE_ACCESS_WRITE, OPEN4_SHARE_DENY_NONE,
        OPEN4_SHARE_DENY_WRITE,
    };

    async fn confirmed_client(request: &NfsRequest, id: &str) -> u64 {
        let args = create_client([1, 2, 3, 4, 5, 6, 7, 8], id.to_string());
        let NfsClientId4 { verifier, id } = args.client;
        let client = request
            .client_manager()
            .upsert_client(verifier, id, ClientCallback {
                program: args.callback.cb_program,
                rnetid: args.callback.cb_location.rnetid,
                raddr: args.callback.cb_location.raddr,
                callback_ident: args.callback_ident,
            }, None)
            .await
            .unwrap();
        request
            .client_manager()
            .confirm_client(client.clientid, client.setclientid_confirm, None)
            .await
            .unwrap();
        client.clientid
    }

    fn open_args(clientid: u64, owner: &str, seqid: u32, access: u32, deny: u32, how: OpenFlag4, name: &str) -> Open4args {
        Open4args {
            seqid,
            share_access: access,
            share_deny: deny,
            owner: OpenOwner4 { clientid, owner: owner.as_bytes().to_vec() },
            openhow: how,
            claim: OpenClaim4::ClaimNull(name.to_string()),
        }
    }

    #[tokio::test]
    async fn open_unchecked_creates_new_file_with_confirm_flag() {
        let server = NFS40Server::new();
        let mut request = create_nfs40_server(Some(create_fake_fs())).await;
        let clientid = confirmed_client(&request, "o1").await;

        request
            .set_filehandle_id(request.file_manager().get_root_filehandle().await.unwrap().id.clone());

        let how = OpenFlag4::How(CreateHow4::UNCHECKED4(Fattr4 { attrmask: vec![], attr_vals: vec![] }));
        let args = open_args(clientid, "o1", 1, OPEN4_SHARE_ACCESS_BOTH, OPEN4_SHARE_DENY_NONE, how, "f");

        let result = server.open(&mut request, args).await.unwrap();
        let NfsResOp4::Opopen(Open4res::Resok4(resok)) = result else {
            panic!("expected Opopen result");
        };
        assert_eq!(resok.stateid.seqid, 1);
        assert_eq!(resok.attrset, vec![FileAttr::Size, FileAttr::Mode]);
        assert_ne!(resok.rflags & OPEN4_RESULT_CONFIRM, 0);
        assert!(resok.cinfo.atomic);

        let smanager = request.state_manager();
        let shares = smanager.iterate_shares(&request.current_filehandle_id().unwrap()).await;
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].share_access, OPEN4_SHARE_ACCESS_BOTH);
    }

    #[tokio::test]
    async fn open_replay_returns_identical_response() {
        let server = NFS40Server::new();
        let mut request = create_nfs40_server(Some(create_fake_fs())).await;
        let clientid = confirmed_client(&request, "o1").await;
        request.set_filehandle_id(request.file_manager().get_root_filehandle().await.unwrap().id.clone());

        let how = OpenFlag4::How(CreateHow4::UNCHECKED4(Fattr4 { attrmask: vec![], attr_vals: vec![] }));
        let args = open_args(clientid, "o1", 1, OPEN4_SHARE_ACCESS_READ, OPEN4_SHARE_DENY_NONE, how.clone(), "g");

        let first = server.open(&mut request, args.clone()).await.unwrap();
        let second = server.open(&mut request, args).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn open_bad_seqid_is_rejected() {
        let server = NFS40Server::new();
        let mut request = create_nfs40_server(Some(create_fake_fs())).await;
        let clientid = confirmed_client(&request, "o1").await;
        request.set_filehandle_id(request.file_manager().get_root_filehandle().await.unwrap().id.clone());

        let how = OpenFlag4::How(CreateHow4::UNCHECKED4(Fattr4 { attrmask: vec![], attr_vals: vec![] }));
        let args = open_args(clientid, "o1", 1, OPEN4_SHARE_ACCESS_READ, OPEN4_SHARE_DENY_NONE, how, "h");
        server.open(&mut request, args).await.unwrap();

        let bad = open_args(clientid, "o1", 9, OPEN4_SHARE_ACCESS_READ, OPEN4_SHARE_DENY_NONE,
            OpenFlag4::Open4Nocreate, "h");
        let err = server.open(&mut request, bad).await.unwrap_err();
        assert_eq!(err, NfsStat4::Nfs4errBadSeqid);
    }

    #[tokio::test]
    async fn open_share_conflict_is_rejected() {
        let server = NFS40Server::new();
        let mut request = create_nfs40_server(Some(create_fake_fs())).await;
        let clientid = confirmed_client(&request, "owners").await;
        request.set_filehandle_id(request.file_manager().get_root_filehandle().await.unwrap().id.clone());

        let how = OpenFlag4::How(CreateHow4::UNCHECKED4(Fattr4 { attrmask: vec![], attr_vals: vec![] }));
        let args = open_args(clientid, "o1", 1, OPEN4_SHARE_ACCESS_WRITE, OPEN4_SHARE_DENY_NONE, how, "shared");
        server.open(&mut request, args).await.unwrap();

        request.set_filehandle_id(request.file_manager().get_root_filehandle().await.unwrap().id.clone());
        let conflicting = open_args(
            clientid,
            "o2",
            1,
            OPEN4_SHARE_ACCESS_READ,
            OPEN4_SHARE_DENY_WRITE,
            OpenFlag4::Open4Nocreate,
            "shared",
        );
        let err = server.open(&mut request, conflicting).await.unwrap_err();
        assert_eq!(err, NfsStat4::Nfs4errShareDenied);
    }

    #[tokio::test]
    async fn open_guarded_collision_is_exist() {
        let server = NFS40Server::new();
        let mut request = create_nfs40_server(Some(create_fake_fs())).await;
        let clientid = confirmed_client(&request, "o1").await;
        request.set_filehandle_id(request.file_manager().get_root_filehandle().await.unwrap().id.clone());

        let how = OpenFlag4::How(CreateHow4::UNCHECKED4(Fattr4 { attrmask: vec![], attr_vals: vec![] }));
        let args = open_args(clientid, "o1", 1, OPEN4_SHARE_ACCESS_READ, OPEN4_SHARE_DENY_NONE, how, "exists");
        server.open(&mut request, args).await.unwrap();

        request.set_filehandle_id(request.file_manager().get_root_filehandle().await.unwrap().id.clone());
        let guarded = OpenFlag4::How(CreateHow4::GUARDED4(Fattr4 { attrmask: vec![], attr_vals: vec![] }));
        let args2 = open_args(clientid, "o2", 1, OPEN4_SHARE_ACCESS_READ, OPEN4_SHARE_DENY_NONE, guarded, "exists");
        let err = server.open(&mut request, args2).await.unwrap_err();
        assert_eq!(err, NfsStat4::Nfs4errExist);
    }

    #[tokio::test]
    async fn open_nocreate_on_directory_is_isdir() {
        let server = NFS40Server::new();
        let mut request = create_nfs40_server(Some(create_fake_fs())).await;
        let clientid = confirmed_client(&request, "o1").await;
        request.set_filehandle_id(request.file_manager().get_root_filehandle().await.unwrap().id.clone());

        let args = open_args(
            clientid,
            "o1",
            1,
            OPEN4_SHARE_ACCESS_READ,
            OPEN4_SHARE_DENY_NONE,
            OpenFlag4::Open4Nocreate,
            "dir1",
        );
        let err = server.open(&mut request, args).await.unwrap_err();
        assert_eq!(err, NfsStat4::Nfs4errIsdir);
    }

    #[tokio::test]
    async fn open_exclusive_retransmit_is_idempotent() {
        let server = NFS40Server::new();
        let mut request = create_nfs40_server(Some(create_fake_fs())).await;
        let clientid = confirmed_client(&request, "o1").await;
        request.set_filehandle_id(request.file_manager().get_root_filehandle().await.unwrap().id.clone());

        let verifier = [9u8; 8];
        let how = OpenFlag4::How(CreateHow4::EXCLUSIVE4(verifier));
        let args = open_args(clientid, "o1", 1, OPEN4_SHARE_ACCESS_BOTH, OPEN4_SHARE_DENY_NONE, how.clone(), "excl");
        let first = server.open(&mut request, args).await.unwrap();
        let NfsResOp4::Opopen(Open4res::Resok4(first_resok)) = first else {
            panic!("expected Opopen result");
        };

        request.set_filehandle_id(request.file_manager().get_root_filehandle().await.unwrap().id.clone());
        let retry = open_args(clientid, "o1", 2, OPEN4_SHARE_ACCESS_BOTH, OPEN4_SHARE_DENY_NONE, how, "excl");
        let second = server.open(&mut request, retry).await.unwrap();
        let NfsResOp4::Opopen(Open4res::Resok4(second_resok)) = second else {
            panic!("expected Opopen result");
        };
        assert_eq!(first_resok.stateid.other, second_resok.stateid.other);
    }

    #[tokio::test]
    async fn open_confirm_advances_and_confirms_owner() {
        let server = NFS40Server::new();
        let mut request = create_nfs40_server(Some(create_fake_fs())).await;
        let clientid = confirmed_client(&request, "o1").await;
        request.set_filehandle_id(request.file_manager().get_root_filehandle().await.unwrap().id.clone());

        let how = OpenFlag4::How(CreateHow4::UNCHECKED4(Fattr4 { attrmask: vec![], attr_vals: vec![] }));
        let args = open_args(clientid, "o1", 1, OPEN4_SHARE_ACCESS_READ, OPEN4_SHARE_DENY_NONE, how, "confirmme");
        let opened = server.open(&mut request, args).await.unwrap();
        let NfsResOp4::Opopen(Open4res::Resok4(resok)) = opened else {
            panic!("expected Opopen result");
        };
        assert_ne!(resok.rflags & OPEN4_RESULT_CONFIRM, 0);

        let confirm_args = OpenConfirm4args { open_stateid: resok.stateid.clone(), seqid: 2 };
        let confirmed = server.open_confirm(&mut request, confirm_args).await.unwrap();
        let NfsResOp4::OpopenConfirm(OpenConfirm4res::Resok4(resok2)) = confirmed else {
            panic!("expected OpopenConfirm result");
        };
        assert_eq!(resok2.open_stateid.other, resok.stateid.other);
        assert_eq!(resok2.open_stateid.seqid, resok.stateid.seqid + 1);
    }

    #[tokio::test]
    async fn close_removes_share_state() {
        let server = NFS40Server::new();
        let mut request = create_nfs40_server(Some(create_fake_fs())).await;
        let clientid = confirmed_client(&request, "o1").await;
        request.set_filehandle_id(request.file_manager().get_root_filehandle().await.unwrap().id.clone());

        let how = OpenFlag4::How(CreateHow4::UNCHECKED4(Fattr4 { attrmask: vec![], attr_vals: vec![] }));
        let args = open_args(clientid, "o1", 1, OPEN4_SHARE_ACCESS_READ, OPEN4_SHARE_DENY_NONE, how, "closeme");
        let opened = server.open(&mut request, args).await.unwrap();
        let NfsResOp4::Opopen(Open4res::Resok4(resok)) = opened else {
            panic!("expected Opopen result");
        };
        let file_id = request.current_filehandle_id().unwrap();

        let close_args = Close4args { seqid: 2, open_stateid: resok.stateid };
        server.close(&mut request, close_args).await.unwrap();

        let smanager = request.state_manager();
        assert!(smanager.iterate_shares(&file_id).await.is_empty());
    }

    #[test]
    fn openflags_last_assignment_wins() {
        assert_eq!(openflags(OPEN4_SHARE_ACCESS_READ, OPEN4_SHARE_DENY_NONE), OpenFlags::Rdonly);
        assert_eq!(openflags(OPEN4_SHARE_ACCESS_WRITE, OPEN4_SHARE_DENY_NONE), OpenFlags::Rdwr);
        assert_eq!(openflags(OPEN4_SHARE_ACCESS_READ, OPEN4_SHARE_DENY_WRITE), OpenFlags::Rdwr);
    }
}
