use std::{fmt, str::FromStr};

use strum_macros::EnumIter;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("empty type name")]
    EmptyTypeName,
    #[error("invalid class name `{0}`")]
    InvalidClassName(String),
    #[error("`void` is only valid as a return type")]
    VoidValue,
    #[error("unexpected end of descriptor `{descriptor}`")]
    UnexpectedEnd { descriptor: String },
    #[error("unexpected character {found:?} at offset {offset} in descriptor `{descriptor}`")]
    UnexpectedChar {
        descriptor: String,
        offset: usize,
        found: char,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub fn keyword(&self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    pub fn descriptor_char(&self) -> char {
        match self {
            PrimitiveType::Boolean => 'Z',
            PrimitiveType::Byte => 'B',
            PrimitiveType::Char => 'C',
            PrimitiveType::Short => 'S',
            PrimitiveType::Int => 'I',
            PrimitiveType::Long => 'J',
            PrimitiveType::Float => 'F',
            PrimitiveType::Double => 'D',
        }
    }

    pub fn jni_type(&self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "jboolean",
            PrimitiveType::Byte => "jbyte",
            PrimitiveType::Char => "jchar",
            PrimitiveType::Short => "jshort",
            PrimitiveType::Int => "jint",
            PrimitiveType::Long => "jlong",
            PrimitiveType::Float => "jfloat",
            PrimitiveType::Double => "jdouble",
        }
    }

    pub fn jni_array_type(&self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "jbooleanArray",
            PrimitiveType::Byte => "jbyteArray",
            PrimitiveType::Char => "jcharArray",
            PrimitiveType::Short => "jshortArray",
            PrimitiveType::Int => "jintArray",
            PrimitiveType::Long => "jlongArray",
            PrimitiveType::Float => "jfloatArray",
            PrimitiveType::Double => "jdoubleArray",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "boolean" => PrimitiveType::Boolean,
            "byte" => PrimitiveType::Byte,
            "char" => PrimitiveType::Char,
            "short" => PrimitiveType::Short,
            "int" => PrimitiveType::Int,
            "long" => PrimitiveType::Long,
            "float" => PrimitiveType::Float,
            "double" => PrimitiveType::Double,
            _ => return None,
        })
    }

    pub fn from_descriptor_char(ch: char) -> Option<Self> {
        Some(match ch {
            'Z' => PrimitiveType::Boolean,
            'B' => PrimitiveType::Byte,
            'C' => PrimitiveType::Char,
            'S' => PrimitiveType::Short,
            'I' => PrimitiveType::Int,
            'J' => PrimitiveType::Long,
            'F' => PrimitiveType::Float,
            'D' => PrimitiveType::Double,
            _ => return None,
        })
    }
}

/// Fully-qualified class name, stored in JVM internal form (`java/lang/String`).
///
/// Both `.` and `/` separators are accepted on construction, so two spellings of
/// the same type compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassName(String);

impl ClassName {
    pub fn new(name: &str) -> Result<Self, DescriptorError> {
        if name.is_empty() {
            return Err(DescriptorError::EmptyTypeName);
        }
        let malformed = name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ';' | '[' | '(' | ')' | '<' | '>'))
            || name.split(['.', '/']).any(str::is_empty);
        if malformed {
            return Err(DescriptorError::InvalidClassName(name.to_string()));
        }
        Ok(ClassName(name.replace('.', "/")))
    }

    pub fn internal_name(&self) -> &str {
        &self.0
    }

    /// Dotted source form, e.g. `java.lang.String`.
    pub fn qualified_name(&self) -> String {
        self.0.replace('/', ".")
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

/// Erased Java type as it appears in a method signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JavaType {
    Void,
    Primitive(PrimitiveType),
    Object(ClassName),
    Array(Box<JavaType>),
}

impl JavaType {
    pub fn object(name: &str) -> Result<Self, DescriptorError> {
        ClassName::new(name).map(JavaType::Object)
    }

    pub fn array_of(element: JavaType) -> Self {
        JavaType::Array(Box::new(element))
    }

    /// Parses exactly one field type in JVM descriptor form (`I`, `[J`,
    /// `Ljava/lang/String;`). `V` is accepted.
    pub fn from_descriptor(descriptor: &str) -> Result<Self, DescriptorError> {
        let mut reader = DescriptorReader::new(descriptor);
        let ty = reader.read_type()?;
        reader.expect_end()?;
        Ok(ty)
    }

    pub fn descriptor(&self) -> String {
        let mut out = String::new();
        self.write_descriptor(&mut out);
        out
    }

    pub fn write_descriptor(&self, out: &mut String) {
        match self {
            JavaType::Void => out.push('V'),
            JavaType::Primitive(prim) => out.push(prim.descriptor_char()),
            JavaType::Object(class) => {
                out.push('L');
                out.push_str(class.internal_name());
                out.push(';');
            }
            JavaType::Array(element) => {
                out.push('[');
                element.write_descriptor(out);
            }
        }
    }

    /// C type used for this value in a JNI function prototype.
    pub fn jni_type(&self) -> &'static str {
        match self {
            JavaType::Void => "void",
            JavaType::Primitive(prim) => prim.jni_type(),
            JavaType::Object(class) => match class.internal_name() {
                "java/lang/String" => "jstring",
                "java/lang/Class" => "jclass",
                "java/lang/Throwable" => "jthrowable",
                _ => "jobject",
            },
            JavaType::Array(element) => match element.as_ref() {
                JavaType::Primitive(prim) => prim.jni_array_type(),
                _ => "jobjectArray",
            },
        }
    }
}

impl fmt::Display for JavaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JavaType::Void => f.write_str("void"),
            JavaType::Primitive(prim) => f.write_str(prim.keyword()),
            JavaType::Object(class) => write!(f, "{}", class),
            JavaType::Array(element) => write!(f, "{}[]", element),
        }
    }
}

/// Source-form type names: `int`, `java.lang.String`, `byte[][]`, `void`.
impl FromStr for JavaType {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut base = s.trim();
        let mut dimensions = 0;
        while let Some(stripped) = base.strip_suffix("[]") {
            base = stripped.trim_end();
            dimensions += 1;
        }

        let mut ty = match base {
            "" => return Err(DescriptorError::EmptyTypeName),
            "void" if dimensions > 0 => return Err(DescriptorError::VoidValue),
            "void" => JavaType::Void,
            keyword => match PrimitiveType::from_keyword(keyword) {
                Some(prim) => JavaType::Primitive(prim),
                None => JavaType::object(keyword)?,
            },
        };
        for _ in 0..dimensions {
            ty = JavaType::array_of(ty);
        }
        Ok(ty)
    }
}

/// Parses a method descriptor such as `(ILjava/lang/String;)V` into its
/// parameter types and return type.
pub fn parse_method_descriptor(
    descriptor: &str,
) -> Result<(Vec<JavaType>, JavaType), DescriptorError> {
    let mut reader = DescriptorReader::new(descriptor);
    reader.expect('(')?;
    let mut parameters = Vec::new();
    while reader.peek() != Some(')') {
        let ty = reader.read_type()?;
        if ty == JavaType::Void {
            return Err(DescriptorError::VoidValue);
        }
        parameters.push(ty);
    }
    reader.expect(')')?;
    let return_type = reader.read_type()?;
    reader.expect_end()?;
    Ok((parameters, return_type))
}

/// Concatenated parameter descriptors, without the surrounding parentheses.
pub fn arguments_descriptor(parameters: &[JavaType]) -> String {
    let mut out = String::new();
    for ty in parameters {
        ty.write_descriptor(&mut out);
    }
    out
}

pub fn method_descriptor(parameters: &[JavaType], return_type: &JavaType) -> String {
    let mut out = String::from("(");
    out.push_str(&arguments_descriptor(parameters));
    out.push(')');
    return_type.write_descriptor(&mut out);
    out
}

struct DescriptorReader<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> DescriptorReader<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Result<char, DescriptorError> {
        let ch = self.peek().ok_or_else(|| DescriptorError::UnexpectedEnd {
            descriptor: self.src.to_string(),
        })?;
        self.pos += ch.len_utf8();
        Ok(ch)
    }

    fn unexpected(&self, offset: usize, found: char) -> DescriptorError {
        DescriptorError::UnexpectedChar {
            descriptor: self.src.to_string(),
            offset,
            found,
        }
    }

    fn expect(&mut self, wanted: char) -> Result<(), DescriptorError> {
        let offset = self.pos;
        match self.bump()? {
            ch if ch == wanted => Ok(()),
            ch => Err(self.unexpected(offset, ch)),
        }
    }

    fn expect_end(&self) -> Result<(), DescriptorError> {
        match self.peek() {
            None => Ok(()),
            Some(ch) => Err(self.unexpected(self.pos, ch)),
        }
    }

    fn read_type(&mut self) -> Result<JavaType, DescriptorError> {
        let offset = self.pos;
        let ch = self.bump()?;
        if let Some(prim) = PrimitiveType::from_descriptor_char(ch) {
            return Ok(JavaType::Primitive(prim));
        }
        match ch {
            'V' => Ok(JavaType::Void),
            '[' => match self.read_type()? {
                JavaType::Void => Err(DescriptorError::VoidValue),
                element => Ok(JavaType::array_of(element)),
            },
            'L' => {
                let rest = &self.src[self.pos..];
                let end = rest.find(';').ok_or_else(|| DescriptorError::UnexpectedEnd {
                    descriptor: self.src.to_string(),
                })?;
                let class = ClassName::new(&rest[..end])?;
                self.pos += end + 1;
                Ok(JavaType::Object(class))
            }
            other => Err(self.unexpected(offset, other)),
        }
    }
}
