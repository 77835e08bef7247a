//! Type definitions for native method signatures
//!
//! Java types in both source and JVM descriptor form, and the method
//! descriptors the resolver consumes.

pub mod descriptor;
pub mod java_type;

pub use descriptor::{LogicalKey, MethodDescriptor};
pub use java_type::{
    arguments_descriptor, method_descriptor, parse_method_descriptor, ClassName, DescriptorError,
    JavaType, PrimitiveType,
};
