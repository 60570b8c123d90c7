//! Built-in template
use condenser::condenser::{Condenser, Entry};
use condenser::context::Context;
use condenser::provider::{provider_fn, Flatten, Provider, Static};
use condenser::template::{Resource, Template};
use condenser::value::Value;

/// Related website resources, flattened under a prefix
struct Website;

impl Provider for Website {
    fn populate(&self, context: &Context, template: &mut Template) -> anyhow::Result<Context> {
        template.resources.insert(
            "Role".into(),
            Resource::new("AWS::IAM::Role").with_property("RoleName", "CustomRole"),
        );
        template.resources.insert(
            "Bucket".into(),
            Resource::new("AWS::S3::Bucket").with_property("BucketName", "CustomBucket"),
        );
        Ok(context.clone())
    }
}

fn free_bucket(context: &Context, template: &mut Template) -> anyhow::Result<Context> {
    template.resources.insert(
        "FreeResource".into(),
        Resource::new("AWS::S3::Bucket").with_property("BucketName", "FreeBucket"),
    );
    Ok(context.clone())
}

/// Only contributes when `--param Stage=<value>` was given
fn stage(context: &Context, template: &mut Template) -> anyhow::Result<Context> {
    let Some(stage) = context.param("Stage") else {
        return Ok(context.clone());
    };

    template.parameters.insert(
        "Stage".into(),
        [("Type", "String"), ("Default", stage)].into_iter().collect(),
    );
    template.outputs.insert(
        "Stage".into(),
        [("Value", [("Ref", "Stage")].into_iter().collect::<Value>())]
            .into_iter()
            .collect(),
    );
    Ok(context.with("stage", stage))
}

pub fn template() -> Condenser {
    Condenser::new("My Stack")
        // name is derived from type and position
        .entry(Resource::new("AWS::IAM::Role"))
        .entry(Entry::provider(Static::new(
            "MyResource",
            Resource::new("AWS::S3::Bucket").with_property("BucketName", "MyS3Bucket"),
        )))
        .entry(Entry::provider(Flatten::new(
            "WebsiteResources",
            Box::new(Website),
        )))
        .entry(Entry::provider(provider_fn(free_bucket)))
        .entry(Entry::provider(provider_fn(stage)))
}
