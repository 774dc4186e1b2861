use bytes::{Buf, BytesMut};
use serde_xdr::{from_reader, to_writer, CompatDeserializationError};
use std::io::Cursor;
use tokio_util::codec::{Decoder, Encoder};
use tracing::{instrument, trace};

use crate::rpc_proto::{RpcCallMsg, RpcReplyMsg};

/// Record-marking + XDR codec for the NFSv4 RPC transport.
///
/// Frames follow the "last fragment" record marking scheme from
/// https://datatracker.ietf.org/doc/html/rfc1057#section-10: a 4-byte
/// big-endian header whose top bit marks the final fragment of a message
/// and whose remaining 31 bits carry the fragment length.
#[derive(Debug, Default)]
pub struct NfsProtoCodec {}

const MAX_FRAGMENT: usize = 8 * 1024 * 1024;

impl NfsProtoCodec {
    pub fn new() -> NfsProtoCodec {
        NfsProtoCodec {}
    }
}

impl Decoder for NfsProtoCodec {
    type Item = RpcCallMsg;
    type Error = std::io::Error;

    #[instrument(skip(self, src), name = "client")]
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let mut message_data = Vec::new();
        let mut is_last = false;
        while !is_last {
            if src.len() < 4 {
                // Not enough data to read the length marker yet.
                return Ok(None);
            }

            let mut header_bytes = [0u8; 4];
            header_bytes.copy_from_slice(&src[..4]);

            let fragment_header = u32::from_be_bytes(header_bytes) as usize;
            is_last = (fragment_header & (1 << 31)) > 0;
            let length = fragment_header & ((1 << 31) - 1);

            // Bound the fragment length to avoid letting a malicious peer
            // exhaust server memory with a bogus header.
            if length > MAX_FRAGMENT {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("fragment of length {} is too large", length),
                ));
            }

            if src.len() < 4 + length {
                // The full fragment has not yet arrived.
                src.reserve(4 + length - src.len());
                return Ok(None);
            }
            let fragment = src[4..4 + length].to_vec();
            src.advance(4 + length);

            message_data.extend_from_slice(&fragment[..]);
            trace!(length, is_last, "finished reading fragment");
        }

        RpcCallMsg::from_bytes(message_data)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            .map(Some)
    }
}

impl Encoder<Box<RpcReplyMsg>> for NfsProtoCodec {
    type Error = std::io::Error;

    fn encode(&mut self, message: Box<RpcReplyMsg>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let buffer_message = message
            .to_bytes()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let buffer_header = u32::to_be_bytes(buffer_message.len() as u32 + (1 << 31));

        dst.reserve(4 + buffer_message.len());
        dst.extend_from_slice(&buffer_header);
        dst.extend_from_slice(&buffer_message);
        Ok(())
    }
}

pub fn from_bytes<T>(buffer: Vec<u8>) -> Result<T, anyhow::Error>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let mut cursor = Cursor::new(buffer);
    let result: Result<T, CompatDeserializationError> = from_reader(&mut cursor);
    result.map_err(|e| anyhow::anyhow!("error deserializing message: {:?}", e))
}

pub fn to_bytes<T>(message: &T) -> Result<Vec<u8>, anyhow::Error>
where
    T: serde::Serialize,
{
    let mut bytes = Vec::new();
    to_writer(&mut bytes, message).map_err(|e| anyhow::anyhow!("error serializing message: {:?}", e))?;
    Ok(bytes)
}
