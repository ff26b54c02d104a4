// Probe Payload Fixture

use std::fmt;

/// Bytes written by every probe run and expected back unchanged
pub const PROBE_PAYLOAD: &[u8] = b"\nHello, world! This is a blob.\n";

/// Fixed payload known at compile time
///
/// The same instance is uploaded and later compared against the download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadFixture(&'static [u8]);

impl PayloadFixture {
    pub const fn new(bytes: &'static [u8]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &'static [u8] {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Zeroed buffer sized exactly to the fixture
    pub fn download_buffer(&self) -> Vec<u8> {
        vec![0; self.0.len()]
    }

    /// Byte-for-byte comparison against what was read back
    ///
    /// A short read counts as a mismatch, same as a changed byte.
    pub fn verify(&self, received: &[u8]) -> Result<(), IntegrityMismatch> {
        if received == self.0 {
            return Ok(());
        }

        let first_difference = self
            .0
            .iter()
            .zip(received)
            .position(|(expected, actual)| expected != actual)
            .or_else(|| Some(self.0.len().min(received.len())));

        Err(IntegrityMismatch {
            expected_len: self.0.len(),
            actual_len: received.len(),
            first_difference,
        })
    }

    /// Verify a download that reported `bytes_read` bytes into `buffer`
    ///
    /// The reported length must equal the fixture length, even when the
    /// buffer itself holds the right bytes.
    pub fn verify_read(&self, buffer: &[u8], bytes_read: usize) -> Result<(), IntegrityMismatch> {
        let received = &buffer[..bytes_read.min(buffer.len())];
        match self.verify(received) {
            Ok(()) if bytes_read == self.0.len() => Ok(()),
            Ok(()) => Err(IntegrityMismatch {
                expected_len: self.0.len(),
                actual_len: bytes_read,
                first_difference: Some(self.0.len()),
            }),
            Err(mut mismatch) => {
                mismatch.actual_len = bytes_read;
                Err(mismatch)
            }
        }
    }
}

impl Default for PayloadFixture {
    fn default() -> Self {
        Self(PROBE_PAYLOAD)
    }
}

/// Downloaded content did not match the fixture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityMismatch {
    pub expected_len: usize,
    pub actual_len: usize,
    /// Offset of the first differing byte (or where the shorter side ends)
    pub first_difference: Option<usize>,
}

impl fmt::Display for IntegrityMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected {} bytes, received {} bytes",
            self.expected_len, self.actual_len
        )?;
        if let Some(offset) = self.first_difference {
            write!(f, ", first difference at offset {}", offset)?;
        }
        Ok(())
    }
}

impl std::error::Error for IntegrityMismatch {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_identical() {
        let fixture = PayloadFixture::default();
        assert!(fixture.verify(PROBE_PAYLOAD).is_ok());
    }

    #[test]
    fn test_verify_single_byte_changed() {
        let fixture = PayloadFixture::new(b"Hello, world! This is a blob.\n");
        let err = fixture
            .verify(b"Hello, world! This is a blog.\n")
            .unwrap_err();
        assert_eq!(err.expected_len, err.actual_len);
        assert_eq!(err.first_difference, Some(27));
    }

    #[test]
    fn test_verify_short_read() {
        let fixture = PayloadFixture::default();
        let err = fixture.verify(&PROBE_PAYLOAD[..10]).unwrap_err();
        assert_eq!(err.actual_len, 10);
        assert_eq!(err.first_difference, Some(10));
        assert!(err.to_string().contains("received 10 bytes"));
    }

    #[test]
    fn test_verify_read_rejects_overreported_length() {
        let fixture = PayloadFixture::default();
        let err = fixture
            .verify_read(PROBE_PAYLOAD, PROBE_PAYLOAD.len() + 100)
            .unwrap_err();
        assert_eq!(err.expected_len, PROBE_PAYLOAD.len());
        assert_eq!(err.actual_len, PROBE_PAYLOAD.len() + 100);
        assert_eq!(err.first_difference, Some(PROBE_PAYLOAD.len()));
    }

    #[test]
    fn test_verify_read_exact_length() {
        let fixture = PayloadFixture::default();
        assert!(fixture.verify_read(PROBE_PAYLOAD, PROBE_PAYLOAD.len()).is_ok());

        let err = fixture.verify_read(PROBE_PAYLOAD, 5).unwrap_err();
        assert_eq!(err.actual_len, 5);
    }

    #[test]
    fn test_download_buffer_matches_len() {
        let fixture = PayloadFixture::default();
        assert_eq!(fixture.download_buffer().len(), fixture.len());
        assert!(!fixture.is_empty());
    }
}
