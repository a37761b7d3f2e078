pub mod acm;
pub mod cloudfront;
pub mod regions;
pub mod route53;
pub mod s3;

/// Property structs are plain string-keyed trees; serializing them cannot fail.
pub(crate) fn to_props<T: serde::Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}
