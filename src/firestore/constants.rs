/// Reserved field path that orders by the document key.
pub const DOCUMENT_KEY_FIELD: &str = "__name__";

/// Target id used for the single query target a listener registers.
pub const DEFAULT_LISTEN_TARGET_ID: i32 = 0x42;

pub(crate) const LOGGER_NAME: &str = "@firebase/firestore";
