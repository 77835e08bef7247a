//! Method sources
//!
//! Reads method declarations out of class files and JAR archives so they can
//! be handed to the resolver.

pub mod scanner;

pub use scanner::{
    is_class_entry, load_methods, parse_class_methods, scan_aar, scan_archive, scan_class,
};
