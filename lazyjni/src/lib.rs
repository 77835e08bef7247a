//! Resolves the JNI external symbol names for the native methods of a Java
//! program and exports them as a JSON signature file.

pub mod export;
pub mod jni;
pub mod types;

pub use export::{
    export_signatures, export_signatures_with, spawn_export, ExportError, ExportHandle,
    ExportOptions, ExportReport,
};
pub use jni::{
    group_by_logical_key, resolve_external_names, resolve_signatures, serialize,
    MethodDescriptor, SignatureCollisionError, SignatureMap,
};
