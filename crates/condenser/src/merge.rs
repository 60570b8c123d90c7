//! Collision-checked merge of one [Template] into another
//!
//! Each namespace is merged all-or-nothing: if any key of the source namespace already exists in the
//! destination, none of the source entries of that namespace are copied. The decision only depends on
//! the intersection of both key sets, never on iteration order.
use crate::template::{Namespace, Template};
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Keys present in both source and destination of one namespace
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("duplicate {namespace} keys detected: {}", display_keys(.keys))]
pub struct MergeError {
    pub namespace: Namespace,
    pub keys: BTreeSet<String>,
}

fn display_keys(keys: &BTreeSet<String>) -> String {
    let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
    format!("[{}]", keys.join(", "))
}

/// Merge `source` into `dest`
///
/// Returns one [MergeError] per namespace that was skipped. `source` is left untouched and the
/// description of `dest` is kept.
pub fn merge(source: &Template, dest: &mut Template) -> Vec<MergeError> {
    let mut errors = vec![];

    for namespace in Namespace::ALL {
        let result = match namespace {
            Namespace::Mappings => merge_namespace(&source.mappings, &mut dest.mappings),
            Namespace::Parameters => merge_namespace(&source.parameters, &mut dest.parameters),
            Namespace::Resources => merge_namespace(&source.resources, &mut dest.resources),
            Namespace::Outputs => merge_namespace(&source.outputs, &mut dest.outputs),
            Namespace::Conditions => merge_namespace(&source.conditions, &mut dest.conditions),
        };

        if let Err(keys) = result {
            tracing::debug!(%namespace, ?keys, "namespace collision");
            errors.push(MergeError { namespace, keys });
        }
    }

    errors
}

/// Copies all entries or returns the colliding keys
fn merge_namespace<V: Clone>(
    source: &IndexMap<String, V>,
    dest: &mut IndexMap<String, V>,
) -> Result<(), BTreeSet<String>> {
    let colliding: BTreeSet<String> = source
        .keys()
        .filter(|key| dest.contains_key(key.as_str()))
        .cloned()
        .collect();

    if !colliding.is_empty() {
        return Err(colliding);
    }

    for (key, value) in source {
        tracing::trace!(key, "copy entry");
        dest.insert(key.clone(), value.clone());
    }

    Ok(())
}
