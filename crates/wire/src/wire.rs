// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Length-prefixed JSON framing shared by every duplex pipe in the
//! execution core: host <-> worker process, and (via the same codec)
//! any future transport `eventbus::Client` impl wants to reuse.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// A message larger than this is almost certainly a framing bug, not a
/// legitimate payload; refuse to allocate for it.
pub const MAX_MESSAGE_BYTES: u32 = 64 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("message of {len} bytes exceeds the {MAX_MESSAGE_BYTES} byte limit")]
    MessageTooLarge { len: u32 },
}

/// Serialize `value` to its raw JSON bytes, without the length prefix.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ProtocolError> {
    Ok(serde_json::to_vec(value)?)
}

/// Parse raw JSON bytes (no length prefix) back into `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Write `data` to `out` as a single length-prefixed frame.
pub async fn write_message<W: AsyncWrite + Unpin>(
    out: &mut W,
    data: &[u8],
) -> Result<(), ProtocolError> {
    let len: u32 = data.len().try_into().map_err(|_| ProtocolError::MessageTooLarge { len: u32::MAX })?;
    out.write_all(&len.to_be_bytes()).await?;
    out.write_all(data).await?;
    out.flush().await?;
    Ok(())
}

/// Read one length-prefixed frame from `input`, returning its raw bytes.
pub async fn read_message<R: AsyncRead + Unpin>(input: &mut R) -> Result<Vec<u8>, ProtocolError> {
    let mut len_buf = [0u8; 4];
    input.read_exact(&mut len_buf).await?;
    let len = u32::from_be_bytes(len_buf);
    if len > MAX_MESSAGE_BYTES {
        return Err(ProtocolError::MessageTooLarge { len });
    }
    let mut buf = vec![0u8; len as usize];
    input.read_exact(&mut buf).await?;
    Ok(buf)
}

/// Encode and frame `value` onto `out` in one call.
pub async fn write_framed<T: Serialize, W: AsyncWrite + Unpin>(
    out: &mut W,
    value: &T,
) -> Result<(), ProtocolError> {
    let bytes = encode(value)?;
    write_message(out, &bytes).await
}

/// Read one frame from `input` and decode it as `T`.
pub async fn read_framed<T: DeserializeOwned, R: AsyncRead + Unpin>(
    input: &mut R,
) -> Result<T, ProtocolError> {
    let bytes = read_message(input).await?;
    decode(&bytes)
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
