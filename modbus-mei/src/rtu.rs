use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::trace;

use crate::{function_code::FunctionCode, messages::*};

/// Address, function code, exception code and CRC.
pub const RTU_EXCEPTION_FRAME_LENGTH: usize = 1 + 1 + 1 + RTU_CRC_LENGTH;

/// Expected length of the frame starting at `data`, exception frames included.
fn rtu_frame_size(data: &[u8]) -> usize {
    match data.get(1).copied().map(FunctionCode::from) {
        Some(function_code) if function_code.is_err() => RTU_EXCEPTION_FRAME_LENGTH,
        _ => ReadDeviceIdentificationResponse::estimate_frame_size(data),
    }
}

/**
 * Reads one complete read device identification RTU frame from `reader`.
 *
 * Bytes are accumulated in `buffer` until it holds as many bytes as
 * [`ReadDeviceIdentificationResponse::estimate_frame_size`] asks for, or
 * [`RTU_EXCEPTION_FRAME_LENGTH`] when the function code carries the error bit;
 * the frame is then split off, leaving any following bytes in `buffer`.
 * The CRC is not checked.
 *
 * Returns `Ok(None)` when the stream ends between frames.
 */
pub async fn read_rtu_frame<R>(reader: &mut R, buffer: &mut BytesMut) -> Result<Option<BytesMut>, std::io::Error>
where
    R: AsyncRead + Unpin,
{
    loop {
        let frame_size = rtu_frame_size(&buffer[..]);
        if buffer.len() >= frame_size {
            trace!(frame_size, "rtu frame complete");
            return Ok(Some(buffer.split_to(frame_size)));
        }

        let bytes_read = reader.read_buf(buffer).await?;
        trace!(bytes_read, buffered = buffer.len(), frame_size, "rtu read");

        if bytes_read == 0 {
            if buffer.is_empty() {
                return Ok(None);
            }
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("stream ended after {} of {} frame bytes", buffer.len(), frame_size),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: [u8; 15] = [0x01, 0x2B, 0x0E, 0x01, 0x83, 0x00, 0x00, 0x01, 0x00, 0x03, 0x41, 0x42, 0x43, 0xAA, 0x55];

    #[tokio::test]
    async fn splits_back_to_back_frames() {
        let mut input = FRAME.to_vec();
        input.extend_from_slice(&FRAME);
        let mut reader = input.as_slice();
        let mut buffer = BytesMut::new();

        let first = read_rtu_frame(&mut reader, &mut buffer).await.unwrap().unwrap();
        assert_eq!(&first[..], &FRAME[..]);
        let second = read_rtu_frame(&mut reader, &mut buffer).await.unwrap().unwrap();
        assert_eq!(&second[..], &FRAME[..]);
        assert!(read_rtu_frame(&mut reader, &mut buffer).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn exception_frame_before_response() {
        let exception = [0x01, 0xAB, 0x03, 0xAA, 0x55];
        let mut input = exception.to_vec();
        input.extend_from_slice(&FRAME);
        let mut reader = input.as_slice();
        let mut buffer = BytesMut::new();

        let first = read_rtu_frame(&mut reader, &mut buffer).await.unwrap().unwrap();
        assert_eq!(&first[..], &exception[..]);
        let second = read_rtu_frame(&mut reader, &mut buffer).await.unwrap().unwrap();
        assert_eq!(&second[..], &FRAME[..]);
        assert!(read_rtu_frame(&mut reader, &mut buffer).await.unwrap().is_none());
    }

    #[test]
    fn frame_size_by_function_code() {
        assert_eq!(rtu_frame_size(&[0x01]), 10);
        assert_eq!(rtu_frame_size(&[0x01, 0xAB]), RTU_EXCEPTION_FRAME_LENGTH);
        assert_eq!(rtu_frame_size(&FRAME), FRAME.len());
    }

    #[tokio::test]
    async fn waits_for_trickling_bytes() {
        let (mut tx, mut rx) = tokio::io::duplex(4);
        let writer = tokio::spawn(async move {
            use tokio::io::AsyncWriteExt;
            for chunk in FRAME.chunks(3) {
                tx.write_all(chunk).await.unwrap();
                tokio::task::yield_now().await;
            }
        });

        let mut buffer = BytesMut::new();
        let frame = read_rtu_frame(&mut rx, &mut buffer).await.unwrap().unwrap();
        assert_eq!(&frame[..], &FRAME[..]);
        writer.await.unwrap();
    }

    #[tokio::test]
    async fn truncated_stream_is_unexpected_eof() {
        let mut reader = &FRAME[..11];
        let mut buffer = BytesMut::new();
        let err = read_rtu_frame(&mut reader, &mut buffer).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }
}
