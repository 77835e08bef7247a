//! JNI external symbol names
//!
//! Symbols follow the JNI specification's naming scheme:
//!
//! - short name: `Java_` + mangled class name + `_` + mangled method name
//! - long name (overloads): short name + `__` + mangled argument descriptors
//!
//! Mangling keeps ASCII letters and digits, turns package separators into `_`
//! and escapes everything else:
//!
//! | character | escape |
//! |-----------|--------|
//! | `_`       | `_1`   |
//! | `;`       | `_2`   |
//! | `[`       | `_3`   |
//! | other     | `_0xxxx` per UTF-16 code unit, lowercase hex |
//!
//! [`demangle_symbol`] inverts the encoding. Decoding is unique as long as no
//! name component is empty or starts with a digit, which holds for every valid
//! Java identifier. Class names are decoded in `/`-separated form, so `a.b.C`
//! and `a/b/C` share a symbol.

use std::fmt::Write as _;

use crate::jni::types::{parse_method_descriptor, DescriptorError, JavaType, MethodDescriptor};

pub const SYMBOL_PREFIX: &str = "Java_";

const OVERLOAD_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    ClassName,
    MethodName,
    Arguments,
}

fn mangle_into(out: &mut String, src: &str, part: Part) {
    for ch in src.chars() {
        match ch {
            'a'..='z' | 'A'..='Z' | '0'..='9' => out.push(ch),
            '/' if part != Part::MethodName => out.push('_'),
            '.' if part == Part::ClassName => out.push('_'),
            '_' => out.push_str("_1"),
            ';' => out.push_str("_2"),
            '[' => out.push_str("_3"),
            other => {
                let mut buf = [0u16; 2];
                for unit in other.encode_utf16(&mut buf).iter() {
                    // Writing to a String cannot fail
                    let _ = write!(out, "_0{:04x}", unit);
                }
            }
        }
    }
}

pub fn mangle_class_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    mangle_into(&mut out, name, Part::ClassName);
    out
}

pub fn mangle_method_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    mangle_into(&mut out, name, Part::MethodName);
    out
}

pub fn mangle_arguments(arguments_descriptor: &str) -> String {
    let mut out = String::with_capacity(arguments_descriptor.len());
    mangle_into(&mut out, arguments_descriptor, Part::Arguments);
    out
}

pub fn short_symbol(owner: &str, method: &str) -> String {
    let mut out = String::from(SYMBOL_PREFIX);
    mangle_into(&mut out, owner, Part::ClassName);
    out.push('_');
    mangle_into(&mut out, method, Part::MethodName);
    out
}

pub fn long_symbol(owner: &str, method: &str, arguments_descriptor: &str) -> String {
    let mut out = short_symbol(owner, method);
    out.push_str(OVERLOAD_SEPARATOR);
    mangle_into(&mut out, arguments_descriptor, Part::Arguments);
    out
}

/// Symbol a native library must export for `method`.
pub fn external_symbol(method: &MethodDescriptor, overloaded: bool) -> String {
    if overloaded {
        long_symbol(&method.owner, &method.name, &method.arguments_descriptor())
    } else {
        short_symbol(&method.owner, &method.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemangledSymbol {
    /// Declaring class, `/`-separated.
    pub class_name: String,
    pub method_name: String,
    /// Argument descriptors, present for long (overloaded) symbols.
    pub arguments: Option<String>,
}

impl DemangledSymbol {
    pub fn parameter_types(&self) -> Option<Result<Vec<JavaType>, DescriptorError>> {
        self.arguments.as_ref().map(|arguments| {
            parse_method_descriptor(&format!("({})V", arguments)).map(|(params, _)| params)
        })
    }
}

/// Decodes a `Java_...` symbol back into class, method and arguments.
pub fn demangle_symbol(symbol: &str) -> Option<DemangledSymbol> {
    if !symbol.is_ascii() {
        return None;
    }
    let bytes = symbol.strip_prefix(SYMBOL_PREFIX)?.as_bytes();

    let mut components = Vec::new();
    let mut current = Vec::new();
    let mut arguments = None;
    let mut pos = 0;
    while pos < bytes.len() {
        let byte = bytes[pos];
        if byte.is_ascii_alphanumeric() {
            current.push(u16::from(byte));
            pos += 1;
            continue;
        }
        if byte != b'_' {
            return None;
        }
        match bytes.get(pos + 1) {
            // `__` not followed by an escape digit starts the argument list
            Some(b'_') if !bytes.get(pos + 2).is_some_and(u8::is_ascii_digit) => {
                arguments = Some(unmangle_arguments(&bytes[pos + 2..])?);
                break;
            }
            Some(b'0'..=b'3') => pos += read_escape(bytes, pos, &mut current)?,
            Some(_) => {
                components.push(finish_component(&mut current)?);
                pos += 1;
            }
            None => return None,
        }
    }
    components.push(finish_component(&mut current)?);

    if components.len() < 2 {
        return None;
    }
    let method_name = components.pop()?;
    Some(DemangledSymbol {
        class_name: components.join("/"),
        method_name,
        arguments,
    })
}

/// Decodes the escape starting at `pos` and returns its length.
fn read_escape(bytes: &[u8], pos: usize, out: &mut Vec<u16>) -> Option<usize> {
    match bytes.get(pos + 1)? {
        b'0' => {
            let hex = bytes.get(pos + 2..pos + 6)?;
            if !hex.iter().all(u8::is_ascii_hexdigit) {
                return None;
            }
            let unit = u16::from_str_radix(std::str::from_utf8(hex).ok()?, 16).ok()?;
            out.push(unit);
            Some(6)
        }
        b'1' => {
            out.push(u16::from(b'_'));
            Some(2)
        }
        b'2' => {
            out.push(u16::from(b';'));
            Some(2)
        }
        b'3' => {
            out.push(u16::from(b'['));
            Some(2)
        }
        _ => None,
    }
}

fn unmangle_arguments(bytes: &[u8]) -> Option<String> {
    let mut units = Vec::with_capacity(bytes.len());
    let mut pos = 0;
    while pos < bytes.len() {
        match bytes[pos] {
            b'_' if matches!(bytes.get(pos + 1), Some(b'0'..=b'3')) => {
                pos += read_escape(bytes, pos, &mut units)?
            }
            b'_' => {
                units.push(u16::from(b'/'));
                pos += 1;
            }
            byte if byte.is_ascii_alphanumeric() => {
                units.push(u16::from(byte));
                pos += 1;
            }
            _ => return None,
        }
    }
    String::from_utf16(&units).ok()
}

fn finish_component(units: &mut Vec<u16>) -> Option<String> {
    if units.is_empty() {
        return None;
    }
    let component = String::from_utf16(units).ok()?;
    units.clear();
    Some(component)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_symbols() {
        assert_eq!(short_symbol("com.app.Foo", "bar"), "Java_com_app_Foo_bar");
        assert_eq!(short_symbol("com/app/Foo", "bar"), "Java_com_app_Foo_bar");
        assert_eq!(short_symbol("Foo", "get_value"), "Java_Foo_get_1value");
        assert_eq!(
            short_symbol("com.app.Foo$Inner", "run"),
            "Java_com_app_Foo_00024Inner_run"
        );
    }

    #[test]
    fn long_symbols() {
        assert_eq!(
            long_symbol("pkg.Cls", "f", "ILjava/lang/String;"),
            "Java_pkg_Cls_f__ILjava_lang_String_2"
        );
        assert_eq!(long_symbol("pkg.Cls", "f", "[[J"), "Java_pkg_Cls_f___3_3J");
        assert_eq!(long_symbol("pkg.Cls", "f", ""), "Java_pkg_Cls_f__");
    }

    #[test]
    fn non_ascii_is_escaped_per_utf16_unit() {
        assert_eq!(mangle_method_name("naïve"), "na_000efve");
        assert_eq!(mangle_method_name("\u{1d4b3}"), "_0d835_0dcb3");
        // dots are package separators only inside class names
        assert_eq!(mangle_method_name("a.b"), "a_0002eb");
        assert_eq!(mangle_class_name("a.b"), "a_b");
    }

    #[test]
    fn demangles_short_symbol() {
        assert_eq!(
            demangle_symbol("Java_com_app_Foo_00024Inner_get_1value"),
            Some(DemangledSymbol {
                class_name: "com/app/Foo$Inner".into(),
                method_name: "get_value".into(),
                arguments: None,
            })
        );
    }

    #[test]
    fn demangles_long_symbol() {
        let symbol = long_symbol("com.app.Foo", "_init", "I[Ljava/lang/String;");
        let demangled = demangle_symbol(&symbol).unwrap();
        assert_eq!(demangled.class_name, "com/app/Foo");
        assert_eq!(demangled.method_name, "_init");
        assert_eq!(demangled.arguments.as_deref(), Some("I[Ljava/lang/String;"));
        assert_eq!(
            demangled.parameter_types(),
            Some(Ok(vec![
                "int".parse().unwrap(),
                "java.lang.String[]".parse().unwrap()
            ]))
        );
    }

    #[test]
    fn demangles_non_ascii() {
        let symbol = short_symbol("caf\u{e9}.\u{1d4b3}", "naïve");
        let demangled = demangle_symbol(&symbol).unwrap();
        assert_eq!(demangled.class_name, "caf\u{e9}/\u{1d4b3}");
        assert_eq!(demangled.method_name, "naïve");
    }

    #[test]
    fn empty_overload_arguments() {
        let demangled = demangle_symbol("Java_Foo_bar__").unwrap();
        assert_eq!(demangled.arguments.as_deref(), Some(""));
        assert_eq!(demangled.parameter_types(), Some(Ok(vec![])));
    }

    #[test]
    fn rejects_malformed_symbols() {
        assert_eq!(demangle_symbol("Jave_Foo_bar"), None);
        assert_eq!(demangle_symbol("Java_Foo"), None);
        assert_eq!(demangle_symbol("Java_Foo_bar_"), None);
        assert_eq!(demangle_symbol("Java_Foo_b_0zzzz"), None);
        assert_eq!(demangle_symbol("Java_Foo_b$r"), None);
        assert_eq!(
            demangle_symbol("Java_Foo_b_4"),
            Some(DemangledSymbol {
                class_name: "Foo/b".into(),
                method_name: "4".into(),
                arguments: None,
            })
        );
    }
}
