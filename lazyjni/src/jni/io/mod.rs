//! Signature file encoding and writing
//!
//! This module contains the JSON encoding of a resolved signature map and
//! the all-or-nothing file write used by the export action.

pub mod codec;
pub mod writer;

pub use codec::{deserialize, serialize, serialize_with, CodecError, SignatureRecord};
pub use writer::{signature_file_path, write_atomically, SIGNATURE_FILE_SUFFIX};
