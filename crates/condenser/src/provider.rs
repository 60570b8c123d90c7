//! Producers of template fragments
//!
//! A [Provider] is handed the current [Context] and a fresh [Template]. It may add entries to any
//! namespace of that template and returns the context that all following entries will observe.
use crate::context::Context;
use crate::template::{Resource, Template};
use anyhow::Context as _;
use std::collections::BTreeSet;

/// Populates (part of) a template
pub trait Provider {
    /// Add entries to `template` and return the context for the next entry
    ///
    /// Returning `context.clone()` passes the context through unchanged.
    fn populate(&self, context: &Context, template: &mut Template) -> anyhow::Result<Context>;
}

impl<P: Provider + ?Sized> Provider for Box<P> {
    fn populate(&self, context: &Context, template: &mut Template) -> anyhow::Result<Context> {
        (**self).populate(context, template)
    }
}

/// Inserts a single resource under a fixed name
#[derive(derive_new::new, Debug, Clone)]
pub struct Static {
    #[new(into)]
    name: String,
    resource: Resource,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum StaticError {
    #[error("resource name must not be empty")]
    EmptyName,
    #[error("resource `{0}` already exists")]
    Exists(String),
}

impl Provider for Static {
    fn populate(&self, context: &Context, template: &mut Template) -> anyhow::Result<Context> {
        if self.name.is_empty() {
            return Err(StaticError::EmptyName.into());
        }

        if template.resources.contains_key(&self.name) {
            return Err(StaticError::Exists(self.name.clone()).into());
        }

        template
            .resources
            .insert(self.name.clone(), self.resource.clone());
        Ok(context.clone())
    }
}

/// Runs an inner provider in isolation and promotes its resources under a name prefix
///
/// Only resources are promoted. Mappings, parameters, outputs and conditions of the inner provider
/// are dropped. Nothing is promoted if the inner provider fails or a prefixed name is already taken.
#[derive(derive_new::new)]
pub struct Flatten {
    #[new(into)]
    prefix: String,
    inner: Box<dyn Provider>,
}

impl std::fmt::Debug for Flatten {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flatten")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FlattenError {
    #[error("flattened resources already exist: {0:?}")]
    Exists(BTreeSet<String>),
}

impl Provider for Flatten {
    #[tracing::instrument(level = "trace", skip_all, fields(prefix = %self.prefix))]
    fn populate(&self, context: &Context, template: &mut Template) -> anyhow::Result<Context> {
        let mut scratch = Template::default();

        let context = self
            .inner
            .populate(context, &mut scratch)
            .with_context(|| format!("flattened provider `{}` failed", self.prefix))?;

        let promoted: Vec<(String, Resource)> = scratch
            .resources
            .into_iter()
            .map(|(name, resource)| (format!("{}{}", self.prefix, name), resource))
            .collect();

        let existing: BTreeSet<String> = promoted
            .iter()
            .filter(|(name, _)| template.resources.contains_key(name))
            .map(|(name, _)| name.clone())
            .collect();
        if !existing.is_empty() {
            return Err(FlattenError::Exists(existing).into());
        }

        for (name, resource) in promoted {
            tracing::trace!(%name, "promote resource");
            template.resources.insert(name, resource);
        }

        Ok(context)
    }
}

/// Lifts a plain function into a [Provider]
///
/// See [provider_fn].
#[derive(Clone, Copy)]
pub struct ProviderFn<F>(pub F);

impl<F> Provider for ProviderFn<F>
where
    F: Fn(&Context, &mut Template) -> anyhow::Result<Context>,
{
    fn populate(&self, context: &Context, template: &mut Template) -> anyhow::Result<Context> {
        (self.0)(context, template)
    }
}

impl<F> std::fmt::Debug for ProviderFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ProviderFn")
    }
}

/// Use a free function or closure as a [Provider]
///
/// ```
/// use condenser::provider::{provider_fn, Provider};
/// use condenser::template::{Resource, Template};
/// use condenser::context::Context;
///
/// let provider = provider_fn(|context: &Context, template: &mut Template| {
///     template
///         .resources
///         .insert("Topic".into(), Resource::new("AWS::SNS::Topic"));
///     Ok(context.clone())
/// });
///
/// let mut template = Template::default();
/// provider.populate(&Context::new(), &mut template).unwrap();
/// assert!(template.resources.contains_key("Topic"));
/// ```
pub fn provider_fn<F>(f: F) -> ProviderFn<F>
where
    F: Fn(&Context, &mut Template) -> anyhow::Result<Context>,
{
    ProviderFn(f)
}
