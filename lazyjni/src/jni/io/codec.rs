use std::fmt;

use indexmap::IndexMap;
use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};
use thiserror::Error;

use crate::jni::{
    resolve::{SignatureCollisionError, SignatureMap},
    types::{parse_method_descriptor, DescriptorError, MethodDescriptor},
};

/// One entry of a signature file.
///
/// `argumentTypes` and `returnType` hold JNI C types for tools that apply
/// prototypes to native libraries; they are derived from `signature` and are
/// not read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureRecord {
    pub class_name: String,
    pub method_name: String,
    pub signature: String,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub argument_types: Vec<String>,
    #[serde(default)]
    pub return_type: String,
}

impl From<&MethodDescriptor> for SignatureRecord {
    fn from(method: &MethodDescriptor) -> Self {
        SignatureRecord {
            class_name: method.owner.clone(),
            method_name: method.name.clone(),
            signature: method.signature(),
            is_static: method.is_static,
            argument_types: method
                .parameter_types
                .iter()
                .map(|ty| ty.jni_type().to_string())
                .collect(),
            return_type: method.return_type.jni_type().to_string(),
        }
    }
}

impl SignatureRecord {
    pub fn to_descriptor(&self) -> Result<MethodDescriptor, DescriptorError> {
        let (parameter_types, return_type) = parse_method_descriptor(&self.signature)?;
        Ok(MethodDescriptor {
            owner: self.class_name.clone(),
            name: self.method_name.clone(),
            parameter_types,
            return_type,
            is_native: true,
            is_static: self.is_static,
        })
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed signature file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("record `{symbol}` has an invalid signature: {source}")]
    Descriptor {
        symbol: String,
        #[source]
        source: DescriptorError,
    },
    #[error(transparent)]
    Collision(#[from] SignatureCollisionError),
}

/// Pretty-printed JSON, entries in map order.
pub fn serialize(map: &SignatureMap) -> Result<Vec<u8>, serde_json::Error> {
    serialize_with(map, true)
}

pub fn serialize_with(map: &SignatureMap, pretty: bool) -> Result<Vec<u8>, serde_json::Error> {
    let records = map
        .iter()
        .map(|(symbol, method)| (symbol.as_str(), SignatureRecord::from(method)))
        .collect::<IndexMap<_, _>>();
    if pretty {
        serde_json::to_vec_pretty(&records)
    } else {
        serde_json::to_vec(&records)
    }
}

pub fn deserialize(bytes: &[u8]) -> Result<SignatureMap, CodecError> {
    let RecordEntries(entries) = serde_json::from_slice(bytes)?;
    let mut map = SignatureMap::new();
    for (symbol, record) in entries {
        let method = match record.to_descriptor() {
            Ok(method) => method,
            Err(source) => return Err(CodecError::Descriptor { symbol, source }),
        };
        map.try_insert(symbol, method)?;
    }
    Ok(map)
}

/// Object entries in document order, duplicates included.
struct RecordEntries(Vec<(String, SignatureRecord)>);

impl<'de> Deserialize<'de> for RecordEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RecordEntries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of JNI symbol names to method records")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, SignatureRecord>()? {
                    entries.push(entry);
                }
                Ok(RecordEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jni::{resolve::resolve_signatures, types::JavaType};

    fn sample() -> SignatureMap {
        resolve_signatures(vec![
            MethodDescriptor::parse_native("com.app.Foo", "bar", &["int"])
                .unwrap()
                .returning("java.lang.String".parse().unwrap())
                .with_static(true),
            MethodDescriptor::parse_native("com.app.Foo", "baz", &["byte[]"]).unwrap(),
            MethodDescriptor::parse_native("com.app.Foo", "baz", &[]).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn record_shape() {
        let bytes = serialize(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            value["Java_com_app_Foo_bar"],
            serde_json::json!({
                "className": "com.app.Foo",
                "methodName": "bar",
                "signature": "(I)Ljava/lang/String;",
                "isStatic": true,
                "argumentTypes": ["jint"],
                "returnType": "jstring"
            })
        );
        assert_eq!(
            value["Java_com_app_Foo_baz___3B"]["argumentTypes"],
            serde_json::json!(["jbyteArray"])
        );
        assert!(value.get("Java_com_app_Foo_baz__").is_some());
    }

    #[test]
    fn keys_follow_map_order() {
        let text = String::from_utf8(serialize(&sample()).unwrap()).unwrap();
        let bar = text.find("Java_com_app_Foo_bar").unwrap();
        let baz_array = text.find("Java_com_app_Foo_baz___3B").unwrap();
        let baz_empty = text.find("Java_com_app_Foo_baz__\"").unwrap();
        assert!(bar < baz_array && baz_array < baz_empty);
    }

    #[test]
    fn decodes_what_it_encodes() {
        let map = sample();
        assert_eq!(deserialize(&serialize(&map).unwrap()).unwrap(), map);
        assert_eq!(deserialize(&serialize_with(&map, false).unwrap()).unwrap(), map);
    }

    #[test]
    fn empty_map_is_an_empty_object() {
        let bytes = serialize(&SignatureMap::new()).unwrap();
        assert_eq!(bytes, b"{}");
        assert!(deserialize(&bytes).unwrap().is_empty());
    }

    #[test]
    fn derived_fields_are_optional() {
        let map = deserialize(
            br#"{"Java_Foo_bar": {"className": "Foo", "methodName": "bar", "signature": "(J)V"}}"#,
        )
        .unwrap();
        let method = map.get("Java_Foo_bar").unwrap();
        assert_eq!(method.parameter_types, vec!["long".parse::<JavaType>().unwrap()]);
        assert!(method.is_native);
        assert!(!method.is_static);
    }

    #[test]
    fn rejects_bad_records() {
        assert!(matches!(deserialize(b"[]"), Err(CodecError::Json(_))));
        let bad_signature =
            br#"{"Java_Foo_bar": {"className": "Foo", "methodName": "bar", "signature": "(Q)V"}}"#;
        assert!(matches!(
            deserialize(bad_signature),
            Err(CodecError::Descriptor { ref symbol, .. }) if symbol == "Java_Foo_bar"
        ));
        let duplicated = br#"{
            "Java_Foo_bar": {"className": "Foo", "methodName": "bar", "signature": "()V"},
            "Java_Foo_bar": {"className": "Foo", "methodName": "bar", "signature": "(I)V"}
        }"#;
        assert!(matches!(deserialize(duplicated), Err(CodecError::Collision(_))));
    }
}
