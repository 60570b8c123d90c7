//! The composed document ([Template]) and its raw resource values ([Resource])
use crate::value::Value;
use indexmap::IndexMap;
use serde::{ser::SerializeMap, Serializer};

/// Document format version written at the top of every serialized template
pub const FORMAT_VERSION: &str = "2010-09-09";

/// One of the five independent key spaces of a [Template]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Mappings,
    Parameters,
    Resources,
    Outputs,
    Conditions,
}

impl Namespace {
    /// All namespaces in merge order
    pub const ALL: [Namespace; 5] = [
        Namespace::Mappings,
        Namespace::Parameters,
        Namespace::Resources,
        Namespace::Outputs,
        Namespace::Conditions,
    ];

    /// Section name as it appears in the serialized document
    pub fn section_name(&self) -> &'static str {
        match self {
            Namespace::Mappings => "Mappings",
            Namespace::Parameters => "Parameters",
            Namespace::Resources => "Resources",
            Namespace::Outputs => "Outputs",
            Namespace::Conditions => "Conditions",
        }
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.section_name())
    }
}

/// A resource with a declared type
///
/// The properties a given type accepts are not checked here.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    resource_type: String,
    properties: IndexMap<String, Value>,
}

impl Resource {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            properties: Default::default(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Type identifier without namespace separators
    ///
    /// `AWS::S3::Bucket` becomes `AWSS3Bucket`
    pub fn cleaned_type_name(&self) -> String {
        self.resource_type.replace(':', "")
    }
}

/// Reasons a loosely typed [Value] is not a [Resource]
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NotAResource {
    #[error("expected an object, found {0:?}")]
    NotAnObject(Value),
    #[error("missing string `Type` key")]
    MissingType,
    #[error("`Properties` must be an object")]
    PropertiesNotAnObject,
}

impl TryFrom<&Value> for Resource {
    type Error = NotAResource;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let Some(object) = value.as_object() else {
            return Err(NotAResource::NotAnObject(value.clone()));
        };

        let Some(resource_type) = object.get("Type").and_then(Value::as_str) else {
            return Err(NotAResource::MissingType);
        };

        let properties = match object.get("Properties") {
            None => Default::default(),
            Some(Value::Object(properties)) => properties.clone(),
            Some(_) => return Err(NotAResource::PropertiesNotAnObject),
        };

        Ok(Self {
            resource_type: resource_type.to_string(),
            properties,
        })
    }
}

impl serde::ser::Serialize for Resource {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = if self.properties.is_empty() { 1 } else { 2 };
        let mut ser = serializer.serialize_map(Some(len))?;
        ser.serialize_entry("Type", &self.resource_type)?;
        if !self.properties.is_empty() {
            ser.serialize_entry("Properties", &Section(&self.properties))?;
        }
        ser.end()
    }
}

/// The composed document
///
/// Keys are unique within each namespace. Every namespace keeps insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Template {
    pub description: String,
    pub mappings: IndexMap<String, Value>,
    pub parameters: IndexMap<String, Value>,
    pub resources: IndexMap<String, Resource>,
    pub outputs: IndexMap<String, Value>,
    pub conditions: IndexMap<String, Value>,
}

impl Template {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }

    /// `true` when none of the namespaces contain an entry
    pub fn is_empty(&self) -> bool {
        Namespace::ALL.iter().all(|namespace| self.len(*namespace) == 0)
    }

    pub fn len(&self, namespace: Namespace) -> usize {
        match namespace {
            Namespace::Mappings => self.mappings.len(),
            Namespace::Parameters => self.parameters.len(),
            Namespace::Resources => self.resources.len(),
            Namespace::Outputs => self.outputs.len(),
            Namespace::Conditions => self.conditions.len(),
        }
    }

    /// Keys of one namespace in insertion order
    pub fn keys(&self, namespace: Namespace) -> Vec<&str> {
        match namespace {
            Namespace::Mappings => self.mappings.keys().map(String::as_str).collect(),
            Namespace::Parameters => self.parameters.keys().map(String::as_str).collect(),
            Namespace::Resources => self.resources.keys().map(String::as_str).collect(),
            Namespace::Outputs => self.outputs.keys().map(String::as_str).collect(),
            Namespace::Conditions => self.conditions.keys().map(String::as_str).collect(),
        }
    }
}

/// Order-preserving map serialization for one namespace or property set
struct Section<'a, V>(&'a IndexMap<String, V>);

impl<V: serde::ser::Serialize> serde::ser::Serialize for Section<'_, V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut ser = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0 {
            ser.serialize_entry(key, value)?;
        }
        ser.end()
    }
}

impl serde::ser::Serialize for Template {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut ser = serializer.serialize_map(Some(7))?;
        ser.serialize_entry("AWSTemplateFormatVersion", FORMAT_VERSION)?;
        ser.serialize_entry("Description", &self.description)?;
        ser.serialize_entry(Namespace::Mappings.section_name(), &Section(&self.mappings))?;
        ser.serialize_entry(Namespace::Parameters.section_name(), &Section(&self.parameters))?;
        ser.serialize_entry(Namespace::Resources.section_name(), &Section(&self.resources))?;
        ser.serialize_entry(Namespace::Outputs.section_name(), &Section(&self.outputs))?;
        ser.serialize_entry(Namespace::Conditions.section_name(), &Section(&self.conditions))?;
        ser.end()
    }
}
