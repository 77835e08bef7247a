use indexmap::{map::Iter, IndexMap};
use thiserror::Error;
use tracing::debug;

use crate::jni::{
    resolve::{
        grouping::{group_by_logical_key, OverloadGroups},
        mangling::external_symbol,
    },
    types::MethodDescriptor,
};

/// Two distinct methods were assigned the same external symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("native methods {existing} and {incoming} both map to external symbol `{symbol}`")]
pub struct SignatureCollisionError {
    pub symbol: String,
    pub existing: Box<MethodDescriptor>,
    pub incoming: Box<MethodDescriptor>,
}

/// External symbol name → native method, in insertion order.
///
/// Equality ignores order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureMap {
    entries: IndexMap<String, MethodDescriptor>,
}

impl SignatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn try_insert(
        &mut self,
        symbol: String,
        method: MethodDescriptor,
    ) -> Result<(), SignatureCollisionError> {
        if let Some(existing) = self.entries.get(&symbol) {
            return Err(SignatureCollisionError {
                symbol,
                existing: Box::new(existing.clone()),
                incoming: Box::new(method),
            });
        }
        self.entries.insert(symbol, method);
        Ok(())
    }

    pub fn get(&self, symbol: &str) -> Option<&MethodDescriptor> {
        self.entries.get(symbol)
    }

    pub fn contains_symbol(&self, symbol: &str) -> bool {
        self.entries.contains_key(symbol)
    }

    pub fn iter(&self) -> Iter<'_, String, MethodDescriptor> {
        self.entries.iter()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a SignatureMap {
    type Item = (&'a String, &'a MethodDescriptor);
    type IntoIter = Iter<'a, String, MethodDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Assigns every grouped method its external symbol.
///
/// Sole members of a group get the short symbol, members of a group with
/// overloads get the long one. Fails on the first symbol that is already
/// taken; nothing is overwritten.
pub fn resolve_external_names(
    groups: &OverloadGroups,
) -> Result<SignatureMap, SignatureCollisionError> {
    let mut map = SignatureMap::new();
    for (key, members) in groups.iter() {
        let overloaded = members.len() > 1;
        if overloaded {
            debug!("{} has {} native overloads", key, members.len());
        }
        for method in members {
            map.try_insert(external_symbol(method, overloaded), method.clone())?;
        }
    }
    Ok(map)
}

/// Groups and resolves in one step.
pub fn resolve_signatures<I>(methods: I) -> Result<SignatureMap, SignatureCollisionError>
where
    I: IntoIterator<Item = MethodDescriptor>,
{
    resolve_external_names(&group_by_logical_key(methods))
}
