use nfsopen_proto::nfs4_proto::{Fattr4, FileAttr, FileAttrValue, NfsStat4};

/// Attributes this backing store can answer GETATTR for, mirroring
/// `FileManager::attr_supported_attrs`. Anything outside this set is
/// `ATTRNOTSUPP` on a createattrs/SETATTR request; anything inside it but
/// not MODE/SIZE is read-only here, so setting it is `INVAL`.
fn recognized(attr: &FileAttr) -> bool {
    matches!(
        attr,
        FileAttr::SupportedAttrs
            | FileAttr::Type
            | FileAttr::FhExpireType
            | FileAttr::Change
            | FileAttr::Size
            | FileAttr::LinkSupport
            | FileAttr::SymlinkSupport
            | FileAttr::NamedAttr
            | FileAttr::Fsid
            | FileAttr::UniqueHandles
            | FileAttr::LeaseTime
            | FileAttr::RdattrError
            | FileAttr::AclSupport
            | FileAttr::Filehandle
            | FileAttr::Fileid
            | FileAttr::Mode
            | FileAttr::Numlinks
            | FileAttr::Owner
            | FileAttr::OwnerGroup
            | FileAttr::SpaceUsed
            | FileAttr::TimeAccess
            | FileAttr::TimeMetadata
            | FileAttr::TimeModify
    )
}

/// Validates createattrs/SETATTR attributes against the two this server can
/// actually apply (MODE, SIZE), per §4.5.1's ATTRNOTSUPP/INVAL split.
pub fn validate_createattrs(attrs: &Fattr4) -> Result<(Option<u32>, Option<u64>), NfsStat4> {
    let mut mode = None;
    let mut size = None;
    for (attr, val) in attrs.attrmask.iter().zip(attrs.attr_vals.iter()) {
        match (attr, val) {
            (FileAttr::Mode, FileAttrValue::Mode(m)) => mode = Some(*m),
            (FileAttr::Size, FileAttrValue::Size(s)) => size = Some(*s),
            (FileAttr::Mode | FileAttr::Size, _) => return Err(NfsStat4::Nfs4errInval),
            (other, _) if recognized(other) => return Err(NfsStat4::Nfs4errInval),
            _ => return Err(NfsStat4::Nfs4errAttrnotsupp),
        }
    }
    Ok((mode, size))
}
