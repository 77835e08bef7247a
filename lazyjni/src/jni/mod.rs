//! JNI native-method signature resolution
//!
//! This module turns the native methods declared in Java bytecode into the
//! external C symbol names a JNI library has to export for them. The
//! functionality is organized into several sub-modules:
//!
//! - `analysis`: class file and JAR scanning
//! - `resolve`: overload grouping, symbol mangling and collision detection
//! - `io`: signature file encoding and atomic writing
//! - `types`: Java types and method descriptors
//! - `stubs`: C header rendering for a resolved signature map
//!
//! # Example Usage
//!
//! ```no_run
//! use lazyjni::jni::{analysis::load_methods, io::serialize, resolve::resolve_signatures};
//!
//! let methods = load_methods("app.jar", |_| {})?;
//! let map = resolve_signatures(methods)?;
//! let json = serialize(&map)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

// Sub-modules
pub mod analysis;
pub mod io;
pub mod resolve;
pub mod stubs;
pub mod types;

// Re-export the most commonly used functionality for convenience
pub use analysis::load_methods;
pub use io::{deserialize, serialize, signature_file_path, CodecError};
pub use resolve::{
    demangle_symbol, group_by_logical_key, resolve_external_names, resolve_signatures,
    OverloadGroups, SignatureCollisionError, SignatureMap,
};
pub use stubs::{render_header, render_prototype, HeaderOptions};
pub use types::{JavaType, LogicalKey, MethodDescriptor};
