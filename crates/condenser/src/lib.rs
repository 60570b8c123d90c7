//! # condenser - compose infrastructure templates
//!
//! ## Introduction for developers
//!
//! Read this to understand how `condenser` works internally.
//!
//! ### Terms
//!
//! - a [template::Template] is the output document: a description and five independent namespaces
//!   (`Mappings`, `Parameters`, `Resources`, `Outputs`, `Conditions`), each mapping a name to a value
//! - a [template::Resource] is a value with a declared type such as `AWS::S3::Bucket`
//! - a [provider::Provider] writes a fragment of a template
//! - a [condenser::Condenser] is an ordered list of [condenser::Entry]s: raw resources, loosely typed
//!   values or providers
//!
//! ### Evaluation
//!
//! see [condenser::Condenser::evaluate]
//!
//! Every entry is evaluated against its own empty scratch template:
//!
//! - a raw resource is inserted as `CloudFormer<Type><index>`, where `<Type>` is the declared type
//!   with all `:` removed (`AWS::IAM::Role` at index 3 becomes `CloudFormerAWSIAMRole3`)
//! - a loosely typed value is inserted the same way if it looks like a resource, otherwise it is an
//!   unsupported entry
//! - a provider populates the scratch template and returns the context for the next entry
//!
//! The scratch template is then merged into the target (see [merge::merge]). A failing entry is
//! logged and skipped; evaluation always visits every entry so one run reports every problem.
//!
//! **Example**
//!
//! | **index** | **entry**                             | **resources added**                  |
//! |-----------|---------------------------------------|--------------------------------------|
//! | 0         | `AWS::IAM::Role`                      | `CloudFormerAWSIAMRole0`             |
//! | 1         | `Static("MyResource", bucket)`        | `MyResource`                         |
//! | 2         | `Flatten("Web", {Role, Bucket})`      | `WebRole`, `WebBucket`               |
//! | 3         | `Static("MyResource", other)`         | none, `Resources` collision reported |
//!
//! ### Context
//!
//! A [context::Context] flows strictly from one entry to the next. Entries see what earlier entries
//! added and never what later ones do. The initial context carries the caller supplied parameters
//! (see [context::Context::with_params]).
//!
//! ### Merging
//!
//! Merging is all-or-nothing per namespace: a single colliding key keeps the whole namespace of that
//! entry out of the target, so the result never depends on iteration order.
//!
//! ### Output
//!
//! [template::Template] and [value::Value] implement [serde::Serialize].
//!
pub mod condenser;
pub mod context;
pub mod merge;
pub mod provider;
pub mod template;
pub mod value;
