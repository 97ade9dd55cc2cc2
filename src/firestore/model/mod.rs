mod document;
mod document_key;
mod field_path;
mod geo_point;
mod resource_path;
mod resume_token;
mod timestamp;

pub use document::DocumentRecord;
pub use document_key::DocumentKey;
pub use field_path::{FieldPath, IntoFieldPath};
pub use geo_point::GeoPoint;
pub use resource_path::ResourcePath;
pub use resume_token::ResumeToken;
pub use timestamp::Timestamp;
