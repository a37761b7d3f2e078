use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StackError;

/// A single cloud resource's property schema. Implementors render themselves
/// into the JSON the reconciliation engine consumes, and check their own
/// field-level constraints before the resource enters a template.
pub trait CfnResource {
    /// The provider resource type, e.g. `AWS::S3::Bucket`.
    fn type_string(&self) -> &'static str;

    /// The `Properties` object. Deferred values appear as intrinsic
    /// references (`Ref` / `Fn::GetAtt`) for the engine to resolve.
    fn properties(&self) -> Value;

    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// A named resource declaration waiting to be rendered into a template.
pub struct Resource {
    pub name: String,
    /// Pins the resource to a provisioning region other than the stack's
    /// own, e.g. certificates consumed by CloudFront must be in us-east-1.
    pub region: Option<String>,
    pub properties: Box<dyn CfnResource>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedResource {
    #[serde(rename = "Type")]
    pub ty: String,
    #[serde(rename = "Properties")]
    pub properties: Value,
    #[serde(rename = "Metadata", skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceOutput {
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Value")]
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTemplate {
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub version: String,
    #[serde(rename = "Resources")]
    pub resources: BTreeMap<String, SavedResource>,
    #[serde(rename = "Outputs")]
    pub outputs: BTreeMap<String, ResourceOutput>,
}

impl Default for SavedTemplate {
    fn default() -> Self {
        Self {
            version: "2010-09-09".to_string(),
            resources: Default::default(),
            outputs: Default::default(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedStack {
    /// this is expected to only have 1 item.
    /// we structure it this way so that we can separate the stack name
    /// from the template
    pub template: BTreeMap<String, SavedTemplate>,
}

/// `{ "Ref": name }` — deferred reference to a declared resource's identity.
pub fn get_ref(logical_name: &str) -> Value {
    serde_json::json!({ "Ref": logical_name })
}

/// `{ "Fn::GetAtt": [name, attr] }` — deferred reference to an attribute the
/// engine only knows after provisioning the named resource.
pub fn get_att(logical_name: &str, attribute: &str) -> Value {
    serde_json::json!({ "Fn::GetAtt": [logical_name, attribute] })
}

/// Every logical name a properties tree refers to via `Ref` or `Fn::GetAtt`.
/// This is the source of truth for dependency edges: a resource depends on
/// exactly the resources its rendered properties reference.
pub fn ref_targets(value: &Value) -> Vec<String> {
    let mut out = vec![];
    collect_refs(value, &mut out);
    out.sort();
    out.dedup();
    out
}

fn collect_refs(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if map.len() == 1 {
                if let Some(Value::String(name)) = map.get("Ref") {
                    out.push(name.clone());
                    return;
                }
                if let Some(Value::Array(args)) = map.get("Fn::GetAtt") {
                    if let Some(Value::String(name)) = args.first() {
                        out.push(name.clone());
                        return;
                    }
                }
            }
            for v in map.values() {
                collect_refs(v, out);
            }
        }
        Value::Array(items) => {
            for v in items {
                collect_refs(v, out);
            }
        }
        _ => {}
    }
}

/// Replace every `Fn::GetAtt` of `logical_name.attribute` with a concrete
/// value, in place. Used when the engine hands back a resolved lookup.
pub fn substitute_att(value: &mut Value, logical_name: &str, attribute: &str, replacement: &Value) {
    let matches_target = |map: &serde_json::Map<String, Value>| -> bool {
        if map.len() != 1 {
            return false;
        }
        match map.get("Fn::GetAtt") {
            Some(Value::Array(args)) => {
                args.first().and_then(Value::as_str) == Some(logical_name)
                    && args.get(1).and_then(Value::as_str) == Some(attribute)
            }
            _ => false,
        }
    };
    match value {
        Value::Object(map) => {
            if matches_target(map) {
                *value = replacement.clone();
                return;
            }
            for v in map.values_mut() {
                substitute_att(v, logical_name, attribute, replacement);
            }
        }
        Value::Array(items) => {
            for v in items {
                substitute_att(v, logical_name, attribute, replacement);
            }
        }
        _ => {}
    }
}

/// Render declarations into a template, validating each one. Fail-fast: the
/// first invalid or duplicated resource aborts with no partial template.
pub fn resources_to_template(resources: &[Resource]) -> Result<SavedTemplate, StackError> {
    let mut out_template = SavedTemplate::default();
    for resource in resources {
        if let Err(message) = resource.properties.validate() {
            return Err(StackError::InvalidResource {
                name: resource.name.clone(),
                message,
            });
        }
        let saved = SavedResource {
            ty: resource.properties.type_string().to_string(),
            properties: resource.properties.properties(),
            metadata: resource
                .region
                .as_ref()
                .map(|r| serde_json::json!({ "Region": r })),
        };
        if out_template
            .resources
            .insert(resource.name.clone(), saved)
            .is_some()
        {
            return Err(StackError::DuplicateResource {
                name: resource.name.clone(),
            });
        }
    }
    Ok(out_template)
}

/// Derive a stable logical id from an arbitrary name token. Logical ids must
/// be alphanumeric, so dots and dashes in domain names are dropped. Stable
/// input produces a stable id, which is what keeps re-evaluation idempotent.
pub fn logical_name(prefix: &str, token: &str) -> String {
    let mut out = String::with_capacity(prefix.len() + token.len());
    out.push_str(prefix);
    out.extend(
        token
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase()),
    );
    out
}

// A stack name can contain only alphanumeric characters (case sensitive) and hyphens.
// It must start with an alphabetical character and can't be longer than 128 characters.
pub fn validate_stack_name(fallback_token: &str, current_stack_name: &str) -> Result<String, StackError> {
    let stack_name = if current_stack_name.is_empty() {
        let mut stack_name = fallback_token.to_string();
        stack_name = stack_name.replace(['.', '_'], "-");
        stack_name.truncate(128);
        stack_name
    } else {
        current_stack_name.to_string()
    };
    let restriction = "must only consist of alphanumeric characters and hyphens, \
         must start with an alphabetical character, and cannot be longer than 128 characters";
    for (i, c) in stack_name.chars().enumerate() {
        if i == 0 && !c.is_ascii_alphabetic() {
            return Err(StackError::InvalidStackName {
                name: stack_name,
                message: restriction.to_string(),
            });
        }
        if !c.is_ascii_alphanumeric() && c != '-' {
            return Err(StackError::InvalidStackName {
                name: stack_name,
                message: restriction.to_string(),
            });
        }
    }
    if stack_name.is_empty() || stack_name.len() > 128 {
        return Err(StackError::InvalidStackName {
            name: stack_name,
            message: restriction.to_string(),
        });
    }
    Ok(stack_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ref_targets_finds_nested_intrinsics() {
        let props = serde_json::json!({
            "Bucket": { "Ref": "mybucket" },
            "Origins": [{
                "DomainName": {
                    "Fn::Select": ["2", { "Fn::Split": ["/", { "Fn::GetAtt": ["mybucket", "WebsiteURL"] }] }]
                },
                "Id": { "Fn::GetAtt": ["othernode", "Arn"] },
            }],
            "Literal": "no-ref-here",
        });
        assert_eq!(ref_targets(&props), vec!["mybucket", "othernode"]);
    }

    #[test]
    fn substitute_att_replaces_only_the_named_attribute() {
        let mut props = serde_json::json!({
            "HostedZoneId": { "Fn::GetAtt": ["zonelookup", "Id"] },
            "Name": { "Fn::GetAtt": ["zonelookup", "Name"] },
        });
        substitute_att(
            &mut props,
            "zonelookup",
            "Id",
            &Value::String("Z123".to_string()),
        );
        assert_eq!(props["HostedZoneId"], Value::String("Z123".to_string()));
        assert_eq!(props["Name"], serde_json::json!({ "Fn::GetAtt": ["zonelookup", "Name"] }));
    }

    #[test]
    fn logical_names_are_lowercase_alphanumeric() {
        assert_eq!(
            logical_name("sitegenbucket", "www.Example-Site.com"),
            "sitegenbucketwwwexamplesitecom"
        );
    }

    #[test]
    fn stack_name_defaults_from_the_token() {
        assert_eq!(
            validate_stack_name("www.example.com", "").unwrap(),
            "www-example-com"
        );
    }

    #[test]
    fn explicit_stack_name_is_validated() {
        assert!(validate_stack_name("x.com", "my-stack").is_ok());
        assert!(matches!(
            validate_stack_name("x.com", "1leading-digit"),
            Err(StackError::InvalidStackName { .. })
        ));
        assert!(matches!(
            validate_stack_name("x.com", "under_score"),
            Err(StackError::InvalidStackName { .. })
        ));
    }

    struct FailingResource;

    impl CfnResource for FailingResource {
        fn type_string(&self) -> &'static str {
            "Custom::Failing"
        }
        fn properties(&self) -> Value {
            Value::Null
        }
        fn validate(&self) -> Result<(), String> {
            Err("bad field".to_string())
        }
    }

    #[test]
    fn invalid_resource_aborts_template_rendering() {
        let resources = vec![Resource {
            name: "broken".to_string(),
            region: None,
            properties: Box::new(FailingResource),
        }];
        let err = resources_to_template(&resources).unwrap_err();
        assert!(matches!(err, StackError::InvalidResource { ref name, .. } if name == "broken"));
    }
}
