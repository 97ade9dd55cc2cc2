use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use bytes::Bytes;

use crate::firestore::error::{invalid_argument, FirestoreResult};

/// Opaque consistency marker delivered by the watch stream.
///
/// The inventory never interprets the bytes; it stores the latest committed
/// token so a listener can resume the target after reconnecting.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct ResumeToken(Bytes);

impl ResumeToken {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn from_base64(encoded: &str) -> FirestoreResult<Self> {
        BASE64_STANDARD
            .decode(encoded)
            .map(Self::new)
            .map_err(|err| invalid_argument(format!("Invalid resume token: {err}")))
    }

    pub fn to_base64(&self) -> String {
        BASE64_STANDARD.encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for ResumeToken {
    fn from(value: Vec<u8>) -> Self {
        Self::new(value)
    }
}

impl From<&'static [u8]> for ResumeToken {
    fn from(value: &'static [u8]) -> Self {
        Self(Bytes::from_static(value))
    }
}

impl fmt::Debug for ResumeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResumeToken({})", self.to_base64())
    }
}
