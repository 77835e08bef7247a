use indexmap::IndexMap;

use crate::jni::types::{LogicalKey, MethodDescriptor};

/// Native methods grouped by [`LogicalKey`], in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverloadGroups {
    groups: IndexMap<LogicalKey, Vec<MethodDescriptor>>,
}

impl OverloadGroups {
    pub fn iter(&self) -> impl Iterator<Item = (&LogicalKey, &[MethodDescriptor])> {
        self.groups
            .iter()
            .map(|(key, members)| (key, members.as_slice()))
    }

    pub fn get(&self, key: &LogicalKey) -> Option<&[MethodDescriptor]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of methods across all groups.
    pub fn method_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Number of methods that share their key with at least one other method.
    pub fn overloaded_count(&self) -> usize {
        self.groups
            .values()
            .filter(|members| members.len() > 1)
            .map(Vec::len)
            .sum()
    }
}

/// Groups the native methods of `descriptors` by owner and name.
///
/// Non-native methods are skipped. Key order and member order follow the
/// order of `descriptors`.
pub fn group_by_logical_key<I>(descriptors: I) -> OverloadGroups
where
    I: IntoIterator<Item = MethodDescriptor>,
{
    let mut groups: IndexMap<LogicalKey, Vec<MethodDescriptor>> = IndexMap::new();
    for method in descriptors.into_iter().filter(|method| method.is_native) {
        groups.entry(method.logical_key()).or_default().push(method);
    }
    OverloadGroups { groups }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn native(owner: &str, name: &str, params: &[&str]) -> MethodDescriptor {
        MethodDescriptor::parse_native(owner, name, params).unwrap()
    }

    #[test]
    fn keeps_first_seen_order() {
        let methods = vec![
            native("com.app.Foo", "bar", &["int"]),
            native("com.app.Foo", "baz", &[]),
            native("com.app.Foo", "bar", &["long"]),
            native("com.app.Bar", "bar", &[]),
        ];
        let groups = group_by_logical_key(methods.clone());

        let keys = groups.iter().map(|(key, _)| key.to_string()).collect::<Vec<_>>();
        assert_eq!(keys, ["com.app.Foo.bar", "com.app.Foo.baz", "com.app.Bar.bar"]);

        let bar = groups.get(&methods[0].logical_key()).unwrap();
        assert_eq!(bar, &[methods[0].clone(), methods[2].clone()]);
        assert_eq!(groups.method_count(), 4);
        assert_eq!(groups.overloaded_count(), 2);
    }

    #[test]
    fn skips_non_native_methods() {
        let methods = vec![
            native("com.app.Foo", "bar", &[]),
            MethodDescriptor::new("com.app.Foo", "baz", vec![]),
            MethodDescriptor::new("com.app.Foo", "bar", vec![]),
        ];
        let groups = group_by_logical_key(methods);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.method_count(), 1);
        assert_eq!(groups.overloaded_count(), 0);
    }

    #[test]
    fn empty_input() {
        let groups = group_by_logical_key(Vec::<MethodDescriptor>::new());
        assert!(groups.is_empty());
        assert_eq!(groups.method_count(), 0);
    }
}
