//! Native-signature resolution
//!
//! Native methods are grouped by owner and method name, then every method is
//! given its JNI external symbol: the short form when it has no native
//! overloads, the long form with mangled argument descriptors otherwise.

pub mod grouping;
pub mod mangling;
pub mod resolver;

pub use grouping::{group_by_logical_key, OverloadGroups};
pub use mangling::{
    demangle_symbol, external_symbol, long_symbol, mangle_arguments, mangle_class_name,
    mangle_method_name, short_symbol, DemangledSymbol, SYMBOL_PREFIX,
};
pub use resolver::{
    resolve_external_names, resolve_signatures, SignatureCollisionError, SignatureMap,
};
