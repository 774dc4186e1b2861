extern crate serde_xdr;

pub mod codec;
pub mod nfs4_proto;
pub mod rpc_proto;
pub mod utils;

pub use codec::{from_bytes, to_bytes, NfsProtoCodec};
