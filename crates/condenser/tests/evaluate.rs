//! End-to-end evaluation behaviour
use condenser::condenser::{Condenser, Entry, EntryErrorKind};
use condenser::context::Context;
use condenser::provider::{provider_fn, Flatten, Static};
use condenser::template::{Namespace, Resource, Template};
use condenser::value::Value;
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

fn bucket(name: &str) -> Resource {
    Resource::new("AWS::S3::Bucket").with_property("BucketName", name)
}

#[test]
fn single_static() {
    let evaluation = Condenser::new("My Stack")
        .entry(Entry::provider(Static::new("MyResource", bucket("MyS3Bucket"))))
        .evaluate(Context::new());

    assert!(evaluation.errors.is_none());
    assert_eq!(evaluation.template.resources.len(), 1);
    assert_eq!(
        evaluation.template.resources.get("MyResource"),
        Some(&bucket("MyS3Bucket"))
    );
}

#[test]
fn failure_does_not_stop_evaluation() {
    let evaluation = Condenser::new("My Stack")
        .entry(Entry::provider(provider_fn(|_: &Context, template: &mut Template| {
            template.resources.insert("Discarded".into(), bucket("discarded"));
            anyhow::bail!("first provider is broken")
        })))
        .entry(Entry::provider(Static::new("Second", bucket("second"))))
        .evaluate(Context::new());

    assert_eq!(evaluation.template.keys(Namespace::Resources), vec!["Second"]);

    let errors = evaluation.errors.expect("must error");
    assert_eq!(errors.len(), 1);
    let error = errors.iter().next().unwrap();
    assert_eq!(error.index, 0);
    assert!(matches!(error.kind, EntryErrorKind::Provider(_)));
    assert!(errors.to_string().contains("first provider is broken"));
}

#[test]
fn same_resource_twice() {
    let evaluation = Condenser::new("My Stack")
        .entry(Entry::provider(Static::new("Same", bucket("first"))))
        .entry(Entry::provider(Static::new("Same", bucket("second"))))
        .evaluate(Context::new());

    assert_eq!(evaluation.template.resources.len(), 1);
    assert_eq!(
        evaluation.template.resources.get("Same"),
        Some(&bucket("first"))
    );

    let errors = evaluation.errors.expect("must error");
    let error = errors.iter().next().unwrap();
    assert_eq!(error.index, 1);
    let EntryErrorKind::Merge(merge_error) = &error.kind else {
        panic!("expected merge error, got {:?}", error.kind);
    };
    assert_eq!(merge_error.namespace, Namespace::Resources);
    assert_eq!(merge_error.keys, BTreeSet::from(["Same".to_string()]));
}

#[test]
fn collision_drops_whole_namespace_of_entry() {
    let evaluation = Condenser::new("")
        .entry(Entry::provider(Static::new("Same", bucket("first"))))
        .entry(Entry::provider(provider_fn(
            |context: &Context, template: &mut Template| {
                template.resources.insert("Fresh".into(), bucket("fresh"));
                template.resources.insert("Same".into(), bucket("second"));
                template.outputs.insert("Kept".into(), Value::from("output"));
                Ok(context.clone())
            },
        )))
        .evaluate(Context::new());

    assert_eq!(evaluation.template.keys(Namespace::Resources), vec!["Same"]);
    assert_eq!(evaluation.template.keys(Namespace::Outputs), vec!["Kept"]);
    assert_eq!(evaluation.errors.expect("must error").len(), 1);
}

#[test]
fn raw_resources_of_same_type_do_not_collide() {
    let template = Condenser::new("")
        .entry(bucket("a"))
        .entry(Entry::provider(Static::new("Named", bucket("b"))))
        .entry(bucket("c"))
        .evaluate(Context::new())
        .into_result()
        .unwrap();

    assert_eq!(
        template.keys(Namespace::Resources),
        vec!["CloudFormerAWSS3Bucket0", "Named", "CloudFormerAWSS3Bucket2"]
    );
}

#[test]
fn flatten_contributes_only_resources() {
    let template = Condenser::new("")
        .entry(Entry::provider(Flatten::new(
            "Prefix",
            Box::new(provider_fn(|context: &Context, template: &mut Template| {
                template.resources.insert("A".into(), bucket("x"));
                template.resources.insert("B".into(), bucket("y"));
                template.conditions.insert("Dropped".into(), Value::from(true));
                template.mappings.insert("Dropped".into(), Value::from(1i64));
                Ok(context.clone())
            })),
        )))
        .evaluate(Context::new())
        .into_result()
        .unwrap();

    assert_eq!(template.resources.get("PrefixA"), Some(&bucket("x")));
    assert_eq!(template.resources.get("PrefixB"), Some(&bucket("y")));
    assert_eq!(template.resources.len(), 2);
    assert!(template.conditions.is_empty());
    assert!(template.mappings.is_empty());
}

/// Each provider records which markers it can see, then adds its own
fn marker_provider(
    own: &'static str,
) -> impl Fn(&Context, &mut Template) -> anyhow::Result<Context> {
    move |context: &Context, template: &mut Template| {
        let seen: Vec<Value> = ["first", "second", "third"]
            .into_iter()
            .filter(|marker| context.contains_key(marker))
            .map(Value::from)
            .collect();
        template.outputs.insert(own.to_string(), Value::Array(seen));
        Ok(context.with(own, true))
    }
}

#[test]
fn context_flows_forward_only() {
    let template = Condenser::new("")
        .entry(Entry::provider(provider_fn(marker_provider("first"))))
        .entry(Entry::provider(provider_fn(marker_provider("second"))))
        .entry(Entry::provider(provider_fn(marker_provider("third"))))
        .evaluate(Context::new())
        .into_result()
        .unwrap();

    assert_eq!(template.outputs.get("first"), Some(&Value::Array(vec![])));
    assert_eq!(
        template.outputs.get("second"),
        Some(&Value::from(vec!["first"]))
    );
    assert_eq!(
        template.outputs.get("third"),
        Some(&Value::from(vec!["first", "second"]))
    );
}

#[test]
fn params_reach_providers() {
    let template = Condenser::new("")
        .entry(Entry::provider(provider_fn(
            |context: &Context, template: &mut Template| {
                let stage = context.param("Stage").unwrap_or("dev");
                template
                    .resources
                    .insert(format!("{stage}Bucket"), bucket(stage));
                Ok(context.clone())
            },
        )))
        .evaluate(Context::with_params([("Stage", "prod")]))
        .into_result()
        .unwrap();

    assert_eq!(template.keys(Namespace::Resources), vec!["prodBucket"]);
}

#[test]
fn all_errors_are_collected() {
    let evaluation = Condenser::new("")
        .entry(Entry::provider(Static::new("A", bucket("a"))))
        .entry(Value::from(1i64))
        .entry(Entry::provider(Static::new("A", bucket("again"))))
        .entry(Entry::provider(Static::new("", bucket("unnamed"))))
        .entry(Entry::provider(Static::new("B", bucket("b"))))
        .evaluate(Context::new());

    assert_eq!(evaluation.template.keys(Namespace::Resources), vec!["A", "B"]);

    let errors = evaluation.errors.expect("must error");
    let indices: Vec<_> = errors.iter().map(|e| e.index).collect();
    assert_eq!(indices, vec![1, 2, 3]);
}
