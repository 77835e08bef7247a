use std::fmt;

use crate::jni::types::java_type::{
    arguments_descriptor, method_descriptor, DescriptorError, JavaType,
};

/// A method as reported by the method source, native or not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    /// Declaring type, `.`- or `/`-separated, kept exactly as supplied.
    pub owner: String,
    pub name: String,
    pub parameter_types: Vec<JavaType>,
    pub return_type: JavaType,
    pub is_native: bool,
    pub is_static: bool,
}

impl MethodDescriptor {
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        parameter_types: Vec<JavaType>,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            parameter_types,
            return_type: JavaType::Void,
            is_native: false,
            is_static: false,
        }
    }

    pub fn native(
        owner: impl Into<String>,
        name: impl Into<String>,
        parameter_types: Vec<JavaType>,
    ) -> Self {
        Self::new(owner, name, parameter_types).with_native(true)
    }

    /// Builds a native method from source-form parameter type names.
    pub fn parse_native(
        owner: impl Into<String>,
        name: impl Into<String>,
        parameter_types: &[&str],
    ) -> Result<Self, DescriptorError> {
        let parameter_types = parameter_types
            .iter()
            .map(|ty| match ty.parse::<JavaType>()? {
                JavaType::Void => Err(DescriptorError::VoidValue),
                ty => Ok(ty),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::native(owner, name, parameter_types))
    }

    pub fn returning(mut self, return_type: JavaType) -> Self {
        self.return_type = return_type;
        self
    }

    pub fn with_native(mut self, is_native: bool) -> Self {
        self.is_native = is_native;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn logical_key(&self) -> LogicalKey {
        LogicalKey {
            owner: self.owner.clone(),
            method: self.name.clone(),
        }
    }

    /// JVM method descriptor, e.g. `(ILjava/lang/String;)V`.
    pub fn signature(&self) -> String {
        method_descriptor(&self.parameter_types, &self.return_type)
    }

    pub fn arguments_descriptor(&self) -> String {
        arguments_descriptor(&self.parameter_types)
    }

    /// Checks that `void` appears only as the whole return type.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        let return_ok = self.return_type == JavaType::Void || holds_value(&self.return_type);
        if return_ok && self.parameter_types.iter().all(holds_value) {
            Ok(())
        } else {
            Err(DescriptorError::VoidValue)
        }
    }
}

fn holds_value(ty: &JavaType) -> bool {
    match ty {
        JavaType::Void => false,
        JavaType::Array(element) => holds_value(element),
        _ => true,
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}(", self.owner, self.name)?;
        for (idx, ty) in self.parameter_types.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", ty)?;
        }
        f.write_str(")")
    }
}

/// Identity shared by all overloads of one method on one type.
///
/// Owner and method are compared separately, so `a.b` + `c` and `a` + `b.c`
/// stay distinct even though both display as `a.b.c`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogicalKey {
    pub owner: String,
    pub method: String,
}

impl fmt::Display for LogicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_signature() {
        let method =
            MethodDescriptor::parse_native("com.app.Foo", "bar", &["int", "java.lang.String[]"])
                .unwrap()
                .returning("long".parse().unwrap());
        assert_eq!(method.to_string(), "com.app.Foo.bar(int, java.lang.String[])");
        assert_eq!(method.signature(), "(I[Ljava/lang/String;)J");
        assert_eq!(method.arguments_descriptor(), "I[Ljava/lang/String;");
        assert_eq!(method.logical_key().to_string(), "com.app.Foo.bar");
    }

    #[test]
    fn void_parameter_is_rejected() {
        assert_eq!(
            MethodDescriptor::parse_native("com.app.Foo", "bar", &["void"]),
            Err(DescriptorError::VoidValue)
        );
    }

    #[test]
    fn validate_catches_void_values() {
        assert_eq!(MethodDescriptor::native("Foo", "bar", vec![]).validate(), Ok(()));
        assert_eq!(
            MethodDescriptor::native("Foo", "bar", vec![JavaType::Void]).validate(),
            Err(DescriptorError::VoidValue)
        );
        assert_eq!(
            MethodDescriptor::native("Foo", "bar", vec![])
                .returning(JavaType::array_of(JavaType::Void))
                .validate(),
            Err(DescriptorError::VoidValue)
        );
    }

    #[test]
    fn logical_key_compares_parts() {
        let a = MethodDescriptor::native("a.b", "c", vec![]);
        let b = MethodDescriptor::native("a", "b.c", vec![]);
        assert_eq!(a.logical_key().to_string(), b.logical_key().to_string());
        assert_ne!(a.logical_key(), b.logical_key());
    }
}
