use std::fmt::Write;

use crate::jni::{resolve::SignatureMap, types::MethodDescriptor};

#[derive(Debug, Clone, Default)]
pub struct HeaderOptions {
    /// Also declare `JNI_OnLoad` and `JNI_OnUnload`.
    pub lifecycle: bool,
}

/// C prototype for one exported native method, without linkage macros.
///
/// Static methods receive the declaring `jclass`, instance methods the
/// receiving `jobject`.
pub fn render_prototype(symbol: &str, method: &MethodDescriptor) -> String {
    format!(
        "{} {}({})",
        method.return_type.jni_type(),
        symbol,
        parameter_list(method)
    )
}

fn parameter_list(method: &MethodDescriptor) -> String {
    let mut out = String::from("JNIEnv* env, ");
    out.push_str(if method.is_static {
        "jclass clazz"
    } else {
        "jobject thiz"
    });
    for (idx, ty) in method.parameter_types.iter().enumerate() {
        let _ = write!(out, ", {} arg{}", ty.jni_type(), idx + 1);
    }
    out
}

pub fn render_header(map: &SignatureMap, options: &HeaderOptions) -> String {
    let mut out = String::new();
    out.push_str("#include <jni.h>\n\n");
    out.push_str("#ifdef __cplusplus\nextern \"C\" {\n#endif\n");

    if options.lifecycle {
        out.push_str("\nJNIEXPORT jint JNICALL JNI_OnLoad(JavaVM* vm, void* reserved);\n");
        out.push_str("JNIEXPORT void JNICALL JNI_OnUnload(JavaVM* vm, void* reserved);\n");
    }

    for (symbol, method) in map {
        let _ = writeln!(out, "\n/* {}{} */", method, static_marker(method));
        let _ = writeln!(
            out,
            "JNIEXPORT {} JNICALL {}({});",
            method.return_type.jni_type(),
            symbol,
            parameter_list(method)
        );
    }

    out.push_str("\n#ifdef __cplusplus\n}\n#endif\n");
    out
}

fn static_marker(method: &MethodDescriptor) -> &'static str {
    if method.is_static {
        " static"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jni::resolve::resolve_signatures;

    #[test]
    fn instance_prototype() {
        let method =
            MethodDescriptor::parse_native("com.app.Foo", "bar", &["int", "java.lang.String"])
                .unwrap()
                .returning("byte[]".parse().unwrap());
        assert_eq!(
            render_prototype("Java_com_app_Foo_bar", &method),
            "jbyteArray Java_com_app_Foo_bar(JNIEnv* env, jobject thiz, jint arg1, jstring arg2)"
        );
    }

    #[test]
    fn static_prototype_takes_class() {
        let method = MethodDescriptor::native("Foo", "init", vec![]).with_static(true);
        assert_eq!(
            render_prototype("Java_Foo_init", &method),
            "void Java_Foo_init(JNIEnv* env, jclass clazz)"
        );
    }

    #[test]
    fn header_lists_every_symbol() {
        let map = resolve_signatures([
            MethodDescriptor::parse_native("a.B", "f", &["int"]).unwrap(),
            MethodDescriptor::parse_native("a.B", "f", &["long"]).unwrap(),
            MethodDescriptor::native("a.B", "g", vec![]).with_static(true),
        ])
        .unwrap();

        let header = render_header(&map, &HeaderOptions::default());
        assert!(header.starts_with("#include <jni.h>\n"));
        assert!(header.contains("JNIEXPORT void JNICALL Java_a_B_f__I(JNIEnv* env, jobject thiz, jint arg1);"));
        assert!(header.contains("JNIEXPORT void JNICALL Java_a_B_f__J(JNIEnv* env, jobject thiz, jlong arg1);"));
        assert!(header.contains("JNIEXPORT void JNICALL Java_a_B_g(JNIEnv* env, jclass clazz);"));
        assert!(header.contains("/* a.B.g() static */"));
        assert!(!header.contains("JNI_OnLoad"));
    }

    #[test]
    fn lifecycle_hooks_are_optional() {
        let header = render_header(&SignatureMap::new(), &HeaderOptions { lifecycle: true });
        assert!(header.contains("JNIEXPORT jint JNICALL JNI_OnLoad(JavaVM* vm, void* reserved);"));
        assert!(header.contains("JNI_OnUnload"));
        assert!(!header.contains("Java_"));
    }
}
