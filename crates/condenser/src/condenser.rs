//! Evaluation of an ordered list of [Entry]s into one [Template]
use crate::context::Context;
use crate::merge::{merge, MergeError};
use crate::provider::Provider;
use crate::template::{NotAResource, Resource, Template};
use crate::value::Value;

/// Prefix of names synthesized for raw resources
pub const GENERATED_NAME_PREFIX: &str = "CloudFormer";

/// One element of the evaluation list
pub enum Entry {
    /// A raw resource, named `CloudFormer<CleanedType><index>`
    Resource(Resource),
    /// A loosely typed value, treated as a raw resource if it has the shape of one
    Value(Value),
    Provider(Box<dyn Provider>),
}

impl Entry {
    pub fn provider(provider: impl Provider + 'static) -> Self {
        Entry::Provider(Box::new(provider))
    }
}

impl From<Resource> for Entry {
    fn from(value: Resource) -> Self {
        Entry::Resource(value)
    }
}

impl From<Value> for Entry {
    fn from(value: Value) -> Self {
        Entry::Value(value)
    }
}

impl From<Box<dyn Provider>> for Entry {
    fn from(value: Box<dyn Provider>) -> Self {
        Entry::Provider(value)
    }
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entry::Resource(resource) => f.debug_tuple("Resource").field(resource).finish(),
            Entry::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Entry::Provider(_) => f.write_str("Provider"),
        }
    }
}

/// Name given to a raw resource at position `index`
pub fn generated_name(resource: &Resource, index: usize) -> String {
    format!(
        "{GENERATED_NAME_PREFIX}{}{index}",
        resource.cleaned_type_name()
    )
}

/// Ordered list of entries making up one template
#[derive(Debug, Default)]
pub struct Condenser {
    pub description: String,
    pub entries: Vec<Entry>,
}

impl Condenser {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            entries: vec![],
        }
    }

    /// Append an entry
    pub fn entry(mut self, entry: impl Into<Entry>) -> Self {
        self.entries.push(entry.into());
        self
    }

    /// Evaluate all entries in order
    ///
    /// Evaluation does not stop at the first failing entry. A failing entry contributes nothing
    /// and passes the context it received on to the next entry. All errors are collected in
    /// [Evaluation::errors] next to the template built from the entries that succeeded.
    pub fn evaluate(&self, mut context: Context) -> Evaluation {
        let mut template = Template::new(self.description.clone());
        let mut errors = EvaluationErrors::new();

        for (index, entry) in self.entries.iter().enumerate() {
            let _span = tracing::debug_span!("entry", index).entered();
            let mut scratch = Template::default();

            let populated = match entry {
                Entry::Resource(resource) => {
                    insert_generated(resource.clone(), index, &mut scratch);
                    Ok(())
                }
                Entry::Value(value) => match Resource::try_from(value) {
                    Ok(resource) => {
                        insert_generated(resource, index, &mut scratch);
                        Ok(())
                    }
                    Err(reason) => Err(EntryErrorKind::Unsupported(reason)),
                },
                Entry::Provider(provider) => match provider.populate(&context, &mut scratch) {
                    Ok(next) => {
                        context = next;
                        Ok(())
                    }
                    Err(err) => Err(EntryErrorKind::Provider(err)),
                },
            };

            if let Err(kind) = populated {
                errors.log(EntryError { index, kind });
                continue;
            }

            for merge_error in merge(&scratch, &mut template) {
                errors.log(EntryError {
                    index,
                    kind: EntryErrorKind::Merge(merge_error),
                });
            }
        }

        tracing::debug!(errors = errors.len(), "evaluation finished");

        Evaluation {
            template,
            errors: (!errors.is_empty()).then_some(errors),
        }
    }
}

fn insert_generated(resource: Resource, index: usize, scratch: &mut Template) {
    let name = generated_name(&resource, index);
    tracing::trace!(%name, resource_type = resource.resource_type(), "raw resource");
    scratch.resources.insert(name, resource);
}

/// Outcome of [Condenser::evaluate]
#[derive(Debug)]
pub struct Evaluation {
    /// Everything the successful entries contributed
    pub template: Template,
    /// `None` if every entry succeeded
    pub errors: Option<EvaluationErrors>,
}

impl Evaluation {
    pub fn is_ok(&self) -> bool {
        self.errors.is_none()
    }

    /// Discards the partial template on failure
    pub fn into_result(self) -> Result<Template, EvaluationErrors> {
        match self.errors {
            None => Ok(self.template),
            Some(errors) => Err(errors),
        }
    }
}

/// A failure of the entry at `index`
#[derive(thiserror::Error, Debug)]
#[error("entry[{index}]: {kind}")]
pub struct EntryError {
    pub index: usize,
    #[source]
    pub kind: EntryErrorKind,
}

#[derive(thiserror::Error, Debug)]
pub enum EntryErrorKind {
    #[error("unsupported entry: {0}")]
    Unsupported(NotAResource),
    #[error("provider failed: {0:#}")]
    Provider(anyhow::Error),
    #[error(transparent)]
    Merge(MergeError),
}

/// All errors of one evaluation, in the order they occurred
#[derive(derive_new::new, Debug)]
pub struct EvaluationErrors {
    #[new(default)]
    errors: Vec<EntryError>,
}

impl EvaluationErrors {
    pub fn log(&mut self, error: EntryError) {
        tracing::trace!(%error, "issue found");
        self.errors.push(error);
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntryError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<'a> IntoIterator for &'a EvaluationErrors {
    type Item = &'a EntryError;
    type IntoIter = std::slice::Iter<'a, EntryError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl std::error::Error for EvaluationErrors {}

impl std::fmt::Display for EvaluationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "evaluation failed with {} error(s)", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  {error}")?;
        }
        Ok(())
    }
}
