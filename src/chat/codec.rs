/// Line codec — frames a TCP byte stream into chat lines.
///
/// Splits on `\n`, strips an optional trailing `\r` (so telnet and
/// netcat clients both work), and serializes outgoing lines with `\n`
/// termination. Lines are plain UTF-8 text; command interpretation
/// happens one layer up in [`super::command`].
use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

/// Maximum line length (including the terminator). Anything longer is
/// a misbehaving client.
const MAX_LINE_LENGTH: usize = 4096;

/// Codec error: oversized line, bad encoding, or an I/O error.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("line exceeds maximum length ({MAX_LINE_LENGTH} bytes)")]
    LineTooLong,
    #[error("line is not valid UTF-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A tokio codec that frames chat lines on `\n` boundaries.
#[derive(Debug, Default)]
pub struct LineCodec;

impl Decoder for LineCodec {
    type Item = String;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match src.iter().position(|b| *b == b'\n') {
            Some(pos) => {
                // Extract the line (without \n), advance the buffer.
                let line_bytes = src.split_to(pos);
                src.advance(1); // skip \n

                let mut line = std::str::from_utf8(&line_bytes)?;
                if line.ends_with('\r') {
                    line = &line[..line.len() - 1];
                }
                Ok(Some(line.to_owned()))
            }
            None => {
                // No complete line yet. Check if buffer is getting too large.
                if src.len() > MAX_LINE_LENGTH {
                    return Err(CodecError::LineTooLong);
                }
                Ok(None)
            }
        }
    }
}

// Accepts both `&str` and `String`, so sessions can send literals
// without allocating.
impl<T: AsRef<str>> Encoder<T> for LineCodec {
    type Error = CodecError;

    fn encode(&mut self, item: T, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let line = item.as_ref();
        dst.reserve(line.len() + 1);
        dst.put_slice(line.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}
