use std::{
    hash::{DefaultHasher, Hash, Hasher},
    io::Read,
    time::{SystemTime, UNIX_EPOCH},
};

use multi_index_map::MultiIndexMap;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;
use vfs::VfsPath;

use nfsopen_proto::nfs4_proto::{
    FileAttr, FileAttrValue, Fsid4, NfsFtype4, NfsLease4, NfsStat4, Nfstime4,
    ACL4_SUPPORT_ALLOW_ACL, FH4_VOLATILE_ANY, MODE4_RGRP, MODE4_ROTH, MODE4_RUSR, MODE4_WUSR,
};

type FilehandleDb = MultiIndexFilehandleMap;

/// One cached directory entry: its opaque (volatile) filehandle id plus the
/// attributes the rest of the server reads back through `filehandle_attrs`.
#[derive(MultiIndexMap, Debug, Clone)]
#[multi_index_derive(Debug, Clone)]
pub struct Filehandle {
    #[multi_index(hashed_unique)]
    pub id: Vec<u8>,
    pub file: VfsPath,
    #[multi_index(hashed_unique)]
    pub path: String,
    pub attr_type: NfsFtype4,
    pub attr_change: u64,
    pub attr_size: u64,
    pub attr_fileid: u64,
    pub attr_fsid: Fsid4,
    pub attr_mode: u32,
    pub attr_owner: String,
    pub attr_owner_group: String,
    pub attr_space_used: u64,
    pub attr_time_access: Nfstime4,
    pub attr_time_metadata: Nfstime4,
    pub attr_time_modify: Nfstime4,
}

impl Filehandle {
    fn new(file: VfsPath, id: Vec<u8>, major: u64, minor: u64) -> Self {
        Self::with_mode(file, id, major, minor, MODE4_RUSR + MODE4_RGRP + MODE4_ROTH)
    }

    fn with_mode(file: VfsPath, id: Vec<u8>, major: u64, minor: u64, mode: u32) -> Self {
        let now = Self::now();
        let mut path = file.as_str().to_string();
        if path.is_empty() {
            path = "/".to_string();
        }
        Filehandle {
            attr_type: Self::kind(&file),
            attr_change: Self::changeid(&file),
            attr_size: Self::size(&file),
            attr_fileid: Self::fileid(&file),
            attr_fsid: Fsid4 { major, minor },
            attr_mode: mode,
            attr_owner: "1000".to_string(),
            attr_owner_group: "1000".to_string(),
            attr_space_used: Self::size(&file),
            attr_time_access: now,
            attr_time_metadata: now,
            attr_time_modify: now,
            path,
            id,
            file,
        }
    }

    fn kind(file: &VfsPath) -> NfsFtype4 {
        if file.is_dir().unwrap_or(false) {
            NfsFtype4::Nf4dir
        } else if file.is_file().unwrap_or(false) {
            NfsFtype4::Nf4reg
        } else {
            NfsFtype4::Nf4Undef
        }
    }

    fn changeid(file: &VfsPath) -> u64 {
        match file.metadata() {
            Ok(m) => match m.modified {
                Some(t) => u64::try_from(t.duration_since(UNIX_EPOCH).unwrap_or_default().as_secs())
                    .unwrap_or(0),
                None => 0,
            },
            Err(_) => 0,
        }
    }

    fn fileid(file: &VfsPath) -> u64 {
        let mut hasher = DefaultHasher::new();
        file.as_str().hash(&mut hasher);
        hasher.finish()
    }

    fn size(file: &VfsPath) -> u64 {
        file.metadata().map(|m| m.len).unwrap_or(0)
    }

    fn now() -> Nfstime4 {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Nfstime4 {
            seconds: since_epoch.as_secs() as i64,
            nseconds: since_epoch.subsec_nanos(),
        }
    }
}

enum FileManagerMessage {
    GetFilehandle(GetFilehandleRequest),
    GetFilehandleAttrs(GetFilehandleAttrsRequest),
    Lookup(LookupRequest),
    Create(CreateRequest),
    Remove(RemoveRequest),
    Truncate(TruncateRequest),
    Setattr(SetattrRequest),
    Access(CheckRequest),
    OpenByName(CheckRequest),
    Touch(Vec<u8>),
}

struct GetFilehandleRequest {
    path: Option<String>,
    filehandle: Option<Vec<u8>>,
    respond_to: oneshot::Sender<Option<Filehandle>>,
}

struct GetFilehandleAttrsRequest {
    filehandle_id: Vec<u8>,
    attrs_request: Vec<FileAttr>,
    respond_to: oneshot::Sender<Option<(Vec<FileAttr>, Vec<FileAttrValue>)>>,
}

struct LookupRequest {
    parent_id: Vec<u8>,
    name: String,
    respond_to: oneshot::Sender<Result<Filehandle, NfsStat4>>,
}

struct CreateRequest {
    parent_id: Vec<u8>,
    name: String,
    mode: u32,
    respond_to: oneshot::Sender<Result<Filehandle, NfsStat4>>,
}

struct SetattrRequest {
    filehandle_id: Vec<u8>,
    mode: Option<u32>,
    size: Option<u64>,
    respond_to: oneshot::Sender<Result<Filehandle, NfsStat4>>,
}

struct CheckRequest {
    filehandle_id: Vec<u8>,
    respond_to: oneshot::Sender<Result<(), NfsStat4>>,
}

struct RemoveRequest {
    parent_id: Vec<u8>,
    name: String,
    respond_to: oneshot::Sender<Result<(), NfsStat4>>,
}

struct TruncateRequest {
    filehandle_id: Vec<u8>,
    size: u64,
    respond_to: oneshot::Sender<Result<(), NfsStat4>>,
}

#[derive(Debug, Clone)]
pub struct FileManagerError {
    pub nfs_error: NfsStat4,
}

impl From<NfsStat4> for FileManagerError {
    fn from(nfs_error: NfsStat4) -> Self {
        FileManagerError { nfs_error }
    }
}

/// Inode-cache actor: owns the mapping from volatile filehandle ids to
/// backing `VfsPath`s plus the attributes derived from them. Open/lock
/// state is not tracked here; it lives in `StateManagerHandle`.
struct FileManager {
    root: VfsPath,
    lease_time: NfsLease4,
    hard_link_support: bool,
    symlink_support: bool,
    unique_handles: bool,
    fsid: u64,
    fhdb: FilehandleDb,
    next_fh_id: u64,
    boot_time: u64,
    receiver: mpsc::Receiver<FileManagerMessage>,
}

impl FileManager {
    fn new(receiver: mpsc::Receiver<FileManagerMessage>, root: VfsPath, fsid: Option<u64>) -> Self {
        let fsid = fsid.unwrap_or(152);
        let boot_time = std::time::UNIX_EPOCH.elapsed().unwrap().as_secs();
        let mut fmanager = FileManager {
            root: root.clone(),
            lease_time: 60,
            hard_link_support: false,
            symlink_support: false,
            unique_handles: false,
            fsid,
            next_fh_id: 100,
            boot_time,
            fhdb: FilehandleDb::default(),
            receiver,
        };
        // always have a root filehandle upon start
        fmanager.root_fh();
        fmanager
    }

    fn handle_message(&mut self, msg: FileManagerMessage) {
        match msg {
            FileManagerMessage::GetFilehandle(req) => {
                let fh = if let Some(id) = req.filehandle {
                    self.get_filehandle_by_id(&id)
                } else if let Some(path) = req.path {
                    let path = self.root.join(path).ok();
                    match path {
                        Some(path) if path.exists().unwrap_or(false) => Some(self.get_filehandle(&path)),
                        _ => None,
                    }
                } else {
                    Some(self.root_fh())
                };
                let _ = req.respond_to.send(fh);
            }
            FileManagerMessage::GetFilehandleAttrs(req) => {
                let _ = req
                    .respond_to
                    .send(self.filehandle_attrs(&req.attrs_request, &req.filehandle_id));
            }
            FileManagerMessage::Lookup(req) => {
                let result = self.lookup(&req.parent_id, &req.name);
                let _ = req.respond_to.send(result);
            }
            FileManagerMessage::Create(req) => {
                let result = self.create(&req.parent_id, &req.name, req.mode);
                let _ = req.respond_to.send(result);
            }
            FileManagerMessage::Remove(req) => {
                let result = self.remove(&req.parent_id, &req.name);
                let _ = req.respond_to.send(result);
            }
            FileManagerMessage::Truncate(req) => {
                let result = self.truncate(&req.filehandle_id, req.size);
                let _ = req.respond_to.send(result);
            }
            FileManagerMessage::Setattr(req) => {
                let result = self.setattr(&req.filehandle_id, req.mode, req.size);
                let _ = req.respond_to.send(result);
            }
            FileManagerMessage::Access(req) => {
                let result = self.access(&req.filehandle_id);
                let _ = req.respond_to.send(result);
            }
            FileManagerMessage::OpenByName(req) => {
                let result = self.open_by_name(&req.filehandle_id);
                let _ = req.respond_to.send(result);
            }
            FileManagerMessage::Touch(id) => {
                if let Some(fh) = self.get_filehandle_by_id(&id) {
                    self.touch_filehandle(fh);
                }
            }
        }
    }

    fn lookup(&mut self, parent_id: &Vec<u8>, name: &str) -> Result<Filehandle, NfsStat4> {
        let parent = self
            .get_filehandle_by_id(parent_id)
            .ok_or(NfsStat4::Nfs4errStale)?;
        if parent.attr_type != NfsFtype4::Nf4dir {
            return Err(NfsStat4::Nfs4errNotdir);
        }
        let child = parent.file.join(name).map_err(|_| NfsStat4::Nfs4errInval)?;
        if !child.exists().unwrap_or(false) {
            return Err(NfsStat4::Nfs4errNoent);
        }
        Ok(self.get_filehandle(&child))
    }

    fn create(&mut self, parent_id: &Vec<u8>, name: &str, mode: u32) -> Result<Filehandle, NfsStat4> {
        let parent = self
            .get_filehandle_by_id(parent_id)
            .ok_or(NfsStat4::Nfs4errStale)?;
        if parent.attr_type != NfsFtype4::Nf4dir {
            return Err(NfsStat4::Nfs4errNotdir);
        }
        let child = parent.file.join(name).map_err(|_| NfsStat4::Nfs4errInval)?;
        if child.exists().unwrap_or(false) {
            return Err(NfsStat4::Nfs4errExist);
        }
        child.create_file().map_err(|_| NfsStat4::Nfs4errIo)?;
        let id = self.get_filehandle_id(&child);
        let fh = Filehandle::with_mode(child, id, self.fsid, self.fsid, mode);
        self.fhdb.insert(fh.clone());
        self.touch_filehandle(parent);
        Ok(fh)
    }

    /// Apply a new mode and/or size to an already-resolved file. There is
    /// no real permission bit backing a `vfs` path, so `mode` is tracked
    /// purely in the cached `Filehandle` record; `size` goes through the
    /// same truncate-and-rewrite path GETATTR/SETATTR share.
    fn setattr(
        &mut self,
        filehandle_id: &Vec<u8>,
        mode: Option<u32>,
        size: Option<u64>,
    ) -> Result<Filehandle, NfsStat4> {
        let mut fh = self
            .get_filehandle_by_id(filehandle_id)
            .ok_or(NfsStat4::Nfs4errStale)?;
        if let Some(size) = size {
            self.truncate(filehandle_id, size)?;
            fh = self
                .get_filehandle_by_id(filehandle_id)
                .ok_or(NfsStat4::Nfs4errStale)?;
        }
        if let Some(mode) = mode {
            fh.attr_mode = mode;
            self.fhdb.remove_by_id(&fh.id);
            self.fhdb.insert(fh.clone());
        }
        Ok(fh)
    }

    /// A capability probe for a resolved file: the only enforcement this
    /// backing store can do is the conventional "mode 000 means nobody
    /// gets in" check used to exercise the ACCESS error path.
    fn access(&mut self, filehandle_id: &Vec<u8>) -> Result<(), NfsStat4> {
        let fh = self
            .get_filehandle_by_id(filehandle_id)
            .ok_or(NfsStat4::Nfs4errStale)?;
        if fh.attr_mode == 0 {
            return Err(NfsStat4::Nfs4errAccess);
        }
        Ok(())
    }

    /// Final capability check before an OPEN is granted. There is no
    /// separate file-descriptor table to register against in this
    /// backing store, so this reconfirms the target is still present and
    /// folds in the same mode check `access` does.
    fn open_by_name(&mut self, filehandle_id: &Vec<u8>) -> Result<(), NfsStat4> {
        self.access(filehandle_id)
    }

    fn remove(&mut self, parent_id: &Vec<u8>, name: &str) -> Result<(), NfsStat4> {
        let parent = self
            .get_filehandle_by_id(parent_id)
            .ok_or(NfsStat4::Nfs4errStale)?;
        let child = parent.file.join(name).map_err(|_| NfsStat4::Nfs4errInval)?;
        if !child.exists().unwrap_or(false) {
            return Err(NfsStat4::Nfs4errNoent);
        }
        let is_dir = child.is_dir().unwrap_or(false);
        let removed = if is_dir {
            child.remove_dir()
        } else {
            child.remove_file()
        };
        removed.map_err(|_| NfsStat4::Nfs4errIo)?;
        if let Some(existing) = self.get_filehandle_by_path(&Self::normalize(&child)) {
            self.fhdb.remove_by_id(&existing.id);
        }
        self.touch_filehandle(parent);
        Ok(())
    }

    fn truncate(&mut self, filehandle_id: &Vec<u8>, size: u64) -> Result<(), NfsStat4> {
        let fh = self
            .get_filehandle_by_id(filehandle_id)
            .ok_or(NfsStat4::Nfs4errStale)?;
        if fh.attr_type != NfsFtype4::Nf4reg {
            return Err(NfsStat4::Nfs4errInval);
        }
        // vfs has no in-place truncate; re-create content truncated/padded to size.
        let mut content = Vec::new();
        if let Ok(mut reader) = fh.file.open_file() {
            let _ = reader.read_to_end(&mut content);
        }
        content.resize(size as usize, 0);
        fh.file
            .create_file()
            .map_err(|_| NfsStat4::Nfs4errIo)?
            .write_all(&content)
            .map_err(|_| NfsStat4::Nfs4errIo)?;
        self.touch_filehandle(fh);
        Ok(())
    }

    fn touch_filehandle(&mut self, filehandle: Filehandle) {
        let fh = Filehandle::with_mode(
            filehandle.file.clone(),
            filehandle.id.clone(),
            self.fsid,
            self.fsid,
            filehandle.attr_mode,
        );
        self.fhdb.remove_by_id(&filehandle.id);
        debug!("touching filehandle: {:?}", fh.id);
        self.fhdb.insert(fh);
    }

    fn normalize(file: &VfsPath) -> String {
        let path = file.as_str().to_string();
        if path.is_empty() {
            "/".to_string()
        } else {
            path
        }
    }

    fn get_filehandle_id(&mut self, file: &VfsPath) -> Vec<u8> {
        let path = Self::normalize(file);
        if let Some(existing) = self.get_filehandle_by_path(&path) {
            return existing.id;
        }
        if path == "/" {
            // root gets a special filehandle that always constructs the same way
            return vec![128_u8];
        }
        // https://datatracker.ietf.org/doc/html/rfc7530#section-4.2.3
        // this implements a "Volatile Filehandle"
        let mut id = vec![128_u8];
        id.extend(self.boot_time.to_be_bytes());
        id.extend(self.next_fh_id.to_be_bytes());
        id.push(1_u8);
        self.next_fh_id += 1;
        id
    }

    fn get_filehandle_by_id(&mut self, id: &Vec<u8>) -> Option<Filehandle> {
        let fh = self.fhdb.get_by_id(id)?;
        if fh.file.exists().unwrap_or(false) {
            return Some(fh.clone());
        }
        debug!("removing stale filehandle: {:?}", id);
        let id = id.clone();
        self.fhdb.remove_by_id(&id);
        None
    }

    fn get_filehandle_by_path(&self, path: &String) -> Option<Filehandle> {
        self.fhdb.get_by_path(path).cloned()
    }

    fn get_filehandle(&mut self, file: &VfsPath) -> Filehandle {
        let id = self.get_filehandle_id(file);
        match self.get_filehandle_by_id(&id) {
            Some(fh) => fh,
            None => {
                let fh = Filehandle::new(file.clone(), id, self.fsid, self.fsid);
                self.fhdb.insert(fh.clone());
                fh
            }
        }
    }

    fn root_fh(&mut self) -> Filehandle {
        self.get_filehandle(&self.root.clone())
    }

    fn filehandle_attrs(
        &mut self,
        attr_request: &Vec<FileAttr>,
        filehandle_id: &Vec<u8>,
    ) -> Option<(Vec<FileAttr>, Vec<FileAttrValue>)> {
        let filehandle = self.get_filehandle_by_id(filehandle_id)?;
        let mut answer_attrs = Vec::new();
        let mut attrs = Vec::new();
        for fileattr in attr_request {
            match fileattr {
                FileAttr::SupportedAttrs => {
                    attrs.push(FileAttrValue::SupportedAttrs(self.attr_supported_attrs()));
                    answer_attrs.push(FileAttr::SupportedAttrs);
                }
                FileAttr::Type => {
                    attrs.push(FileAttrValue::Type(filehandle.attr_type));
                    answer_attrs.push(FileAttr::Type);
                }
                FileAttr::LeaseTime => {
                    attrs.push(FileAttrValue::LeaseTime(self.lease_time));
                    answer_attrs.push(FileAttr::LeaseTime);
                }
                FileAttr::Change => {
                    attrs.push(FileAttrValue::Change(filehandle.attr_change));
                    answer_attrs.push(FileAttr::Change);
                }
                FileAttr::Size => {
                    attrs.push(FileAttrValue::Size(filehandle.attr_size));
                    answer_attrs.push(FileAttr::Size);
                }
                FileAttr::LinkSupport => {
                    attrs.push(FileAttrValue::LinkSupport(self.hard_link_support));
                    answer_attrs.push(FileAttr::LinkSupport);
                }
                FileAttr::SymlinkSupport => {
                    attrs.push(FileAttrValue::SymlinkSupport(self.symlink_support));
                    answer_attrs.push(FileAttr::SymlinkSupport);
                }
                FileAttr::NamedAttr => {
                    attrs.push(FileAttrValue::NamedAttr(false));
                    answer_attrs.push(FileAttr::NamedAttr);
                }
                FileAttr::AclSupport => {
                    attrs.push(FileAttrValue::AclSupport(ACL4_SUPPORT_ALLOW_ACL));
                    answer_attrs.push(FileAttr::AclSupport);
                }
                FileAttr::Fsid => {
                    attrs.push(FileAttrValue::Fsid(filehandle.attr_fsid));
                    answer_attrs.push(FileAttr::Fsid);
                }
                FileAttr::UniqueHandles => {
                    attrs.push(FileAttrValue::UniqueHandles(self.unique_handles));
                    answer_attrs.push(FileAttr::UniqueHandles);
                }
                FileAttr::FhExpireType => {
                    attrs.push(FileAttrValue::FhExpireType(FH4_VOLATILE_ANY));
                    answer_attrs.push(FileAttr::FhExpireType);
                }
                FileAttr::RdattrError => {
                    attrs.push(FileAttrValue::RdattrError(NfsStat4::Nfs4errInval));
                    answer_attrs.push(FileAttr::RdattrError);
                }
                FileAttr::Fileid => {
                    attrs.push(FileAttrValue::Fileid(filehandle.attr_fileid));
                    answer_attrs.push(FileAttr::Fileid);
                }
                FileAttr::Mode => {
                    attrs.push(FileAttrValue::Mode(filehandle.attr_mode));
                    answer_attrs.push(FileAttr::Mode);
                }
                FileAttr::Numlinks => {
                    attrs.push(FileAttrValue::Numlinks(1));
                    answer_attrs.push(FileAttr::Numlinks);
                }
                FileAttr::Owner => {
                    attrs.push(FileAttrValue::Owner(filehandle.attr_owner.clone()));
                    answer_attrs.push(FileAttr::Owner);
                }
                FileAttr::OwnerGroup => {
                    attrs.push(FileAttrValue::OwnerGroup(filehandle.attr_owner_group.clone()));
                    answer_attrs.push(FileAttr::OwnerGroup);
                }
                FileAttr::SpaceUsed => {
                    attrs.push(FileAttrValue::SpaceUsed(filehandle.attr_space_used));
                    answer_attrs.push(FileAttr::SpaceUsed);
                }
                FileAttr::TimeAccess => {
                    attrs.push(FileAttrValue::TimeAccess(filehandle.attr_time_access));
                    answer_attrs.push(FileAttr::TimeAccess);
                }
                FileAttr::TimeMetadata => {
                    attrs.push(FileAttrValue::TimeMetadata(filehandle.attr_time_metadata));
                    answer_attrs.push(FileAttr::TimeMetadata);
                }
                FileAttr::TimeModify => {
                    attrs.push(FileAttrValue::TimeModify(filehandle.attr_time_modify));
                    answer_attrs.push(FileAttr::TimeModify);
                }
                _ => {}
            }
        }
        Some((answer_attrs, attrs))
    }

    fn attr_supported_attrs(&self) -> Vec<FileAttr> {
        vec![
            FileAttr::SupportedAttrs,
            FileAttr::Type,
            FileAttr::FhExpireType,
            FileAttr::Change,
            FileAttr::Size,
            FileAttr::LinkSupport,
            FileAttr::SymlinkSupport,
            FileAttr::NamedAttr,
            FileAttr::Fsid,
            FileAttr::UniqueHandles,
            FileAttr::LeaseTime,
            FileAttr::RdattrError,
            FileAttr::AclSupport,
            FileAttr::Filehandle,
            FileAttr::Fileid,
            FileAttr::Mode,
            FileAttr::Numlinks,
            FileAttr::Owner,
            FileAttr::OwnerGroup,
            FileAttr::SpaceUsed,
            FileAttr::TimeAccess,
            FileAttr::TimeMetadata,
            FileAttr::TimeModify,
        ]
    }
}

// FileManager is run with the actor pattern
// learn more: https://ryhl.io/blog/actors-with-tokio/
async fn run_file_manager(mut actor: FileManager) {
    while let Some(msg) = actor.receiver.recv().await {
        actor.handle_message(msg);
    }
}

#[derive(Debug, Clone)]
pub struct FileManagerHandle {
    sender: mpsc::Sender<FileManagerMessage>,
}

impl FileManagerHandle {
    pub fn new(root: VfsPath, fsid: Option<u64>) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let fmanager = FileManager::new(receiver, root, fsid);
        tokio::spawn(run_file_manager(fmanager));
        Self { sender }
    }

    async fn send_filehandle_request(
        &self,
        path: Option<String>,
        filehandle: Option<Vec<u8>>,
    ) -> Result<Box<Filehandle>, FileManagerError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(FileManagerMessage::GetFilehandle(GetFilehandleRequest {
                path,
                filehandle,
                respond_to: tx,
            }))
            .await
            .map_err(|_| FileManagerError::from(NfsStat4::Nfs4errServerfault))?;
        match rx.await {
            Ok(Some(fh)) => Ok(Box::new(fh)),
            Ok(None) => Err(NfsStat4::Nfs4errStale.into()),
            Err(_) => Err(NfsStat4::Nfs4errServerfault.into()),
        }
    }

    pub async fn get_root_filehandle(&self) -> Result<Box<Filehandle>, FileManagerError> {
        self.send_filehandle_request(None, None).await
    }

    pub async fn get_filehandle_for_id(
        &self,
        id: Vec<u8>,
    ) -> Result<Box<Filehandle>, FileManagerError> {
        self.send_filehandle_request(None, Some(id)).await
    }

    pub async fn get_filehandle_for_path(
        &self,
        path: String,
    ) -> Result<Box<Filehandle>, FileManagerError> {
        self.send_filehandle_request(Some(path), None).await
    }

    pub async fn get_filehandle_attrs(
        &self,
        filehandle_id: Vec<u8>,
        attrs_request: Vec<FileAttr>,
    ) -> Result<(Vec<FileAttr>, Vec<FileAttrValue>), FileManagerError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(FileManagerMessage::GetFilehandleAttrs(
                GetFilehandleAttrsRequest {
                    filehandle_id,
                    attrs_request,
                    respond_to: tx,
                },
            ))
            .await
            .map_err(|_| FileManagerError::from(NfsStat4::Nfs4errServerfault))?;
        match rx.await {
            Ok(Some(attrs)) => Ok(attrs),
            Ok(None) => Err(NfsStat4::Nfs4errBadhandle.into()),
            Err(_) => Err(NfsStat4::Nfs4errServerfault.into()),
        }
    }

    /// Resolve `name` under the directory identified by `parent_id`.
    pub async fn lookup(
        &self,
        parent_id: Vec<u8>,
        name: String,
    ) -> Result<Box<Filehandle>, FileManagerError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(FileManagerMessage::Lookup(LookupRequest {
                parent_id,
                name,
                respond_to: tx,
            }))
            .await
            .map_err(|_| FileManagerError::from(NfsStat4::Nfs4errServerfault))?;
        match rx.await {
            Ok(Ok(fh)) => Ok(Box::new(fh)),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(NfsStat4::Nfs4errServerfault.into()),
        }
    }

    /// Create a new regular file `name` under `parent_id` with the given
    /// Unix mode bits.
    pub async fn create(
        &self,
        parent_id: Vec<u8>,
        name: String,
        mode: u32,
    ) -> Result<Box<Filehandle>, FileManagerError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(FileManagerMessage::Create(CreateRequest {
                parent_id,
                name,
                mode,
                respond_to: tx,
            }))
            .await
            .map_err(|_| FileManagerError::from(NfsStat4::Nfs4errServerfault))?;
        match rx.await {
            Ok(Ok(fh)) => Ok(Box::new(fh)),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(NfsStat4::Nfs4errServerfault.into()),
        }
    }

    /// Apply `mode` and/or `size` to an already-resolved file, returning
    /// its refreshed attributes.
    pub async fn setattr(
        &self,
        filehandle_id: Vec<u8>,
        mode: Option<u32>,
        size: Option<u64>,
    ) -> Result<Box<Filehandle>, FileManagerError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(FileManagerMessage::Setattr(SetattrRequest {
                filehandle_id,
                mode,
                size,
                respond_to: tx,
            }))
            .await
            .map_err(|_| FileManagerError::from(NfsStat4::Nfs4errServerfault))?;
        match rx.await {
            Ok(Ok(fh)) => Ok(Box::new(fh)),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(NfsStat4::Nfs4errServerfault.into()),
        }
    }

    /// Probe whether the resolved file still grants access (currently:
    /// its mode is not 000).
    pub async fn access(&self, filehandle_id: Vec<u8>) -> Result<(), FileManagerError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(FileManagerMessage::Access(CheckRequest {
                filehandle_id,
                respond_to: tx,
            }))
            .await
            .map_err(|_| FileManagerError::from(NfsStat4::Nfs4errServerfault))?;
        match rx.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(NfsStat4::Nfs4errServerfault.into()),
        }
    }

    /// Last capability check run right before OPEN grants its share
    /// reservation.
    pub async fn open_by_name(&self, filehandle_id: Vec<u8>) -> Result<(), FileManagerError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(FileManagerMessage::OpenByName(CheckRequest {
                filehandle_id,
                respond_to: tx,
            }))
            .await
            .map_err(|_| FileManagerError::from(NfsStat4::Nfs4errServerfault))?;
        match rx.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(NfsStat4::Nfs4errServerfault.into()),
        }
    }

    pub async fn remove(&self, parent_id: Vec<u8>, name: String) -> Result<(), FileManagerError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(FileManagerMessage::Remove(RemoveRequest {
                parent_id,
                name,
                respond_to: tx,
            }))
            .await
            .map_err(|_| FileManagerError::from(NfsStat4::Nfs4errServerfault))?;
        match rx.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(NfsStat4::Nfs4errServerfault.into()),
        }
    }

    pub async fn truncate(&self, filehandle_id: Vec<u8>, size: u64) -> Result<(), FileManagerError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(FileManagerMessage::Truncate(TruncateRequest {
                filehandle_id,
                size,
                respond_to: tx,
            }))
            .await
            .map_err(|_| FileManagerError::from(NfsStat4::Nfs4errServerfault))?;
        match rx.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(NfsStat4::Nfs4errServerfault.into()),
        }
    }

    pub async fn touch(&self, filehandle_id: Vec<u8>) {
        let _ = self
            .sender
            .send(FileManagerMessage::Touch(filehandle_id))
            .await;
    }
}
