//! Length-prefixed framing for protobuf envelopes.
//!
//! Each frame is a big-endian `u32` byte count followed by the encoded message.

use prost::Message;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::errors::ProtocolError;

/// Upper bound on a single frame.
pub const MAX_FRAME_LEN: usize = 4 * 1024 * 1024;

pub async fn write_frame<W, M>(writer: &mut W, message: &M) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
    M: Message,
{
    let body = message.encode_to_vec();
    if body.len() > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge {
            len: body.len(),
            limit: MAX_FRAME_LEN,
        });
    }
    writer.write_u32(body.len() as u32).await?;
    writer.write_all(&body).await?;
    writer.flush().await?;
    Ok(())
}

/// Reads one frame. Returns `Ok(None)` when the peer closed the stream
/// cleanly before a new frame started.
pub async fn read_frame<R, M>(reader: &mut R) -> Result<Option<M>, ProtocolError>
where
    R: AsyncRead + Unpin,
    M: Message + Default,
{
    let len = match reader.read_u32().await {
        Ok(len) => len as usize,
        Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    if len > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge {
            len,
            limit: MAX_FRAME_LEN,
        });
    }
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await.map_err(|err| {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            ProtocolError::ConnectionClosed
        } else {
            ProtocolError::Io(err)
        }
    })?;
    Ok(Some(M::decode(body.as_slice())?))
}
