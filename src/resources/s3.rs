use serde::Serialize;
use serde_json::Value;

use super::to_props;
use crate::template::{get_att, get_ref, CfnResource};

#[derive(Debug, Default, Clone, Serialize)]
pub struct WebsiteConfiguration {
    #[serde(rename = "IndexDocument")]
    pub index_document: String,
    #[serde(rename = "ErrorDocument", skip_serializing_if = "Option::is_none")]
    pub error_document: Option<String>,
}

/// A public static-content origin bucket.
#[derive(Debug, Default, Clone, Serialize)]
pub struct CfnBucket {
    #[serde(rename = "BucketName")]
    pub bucket_name: String,
    #[serde(rename = "AccessControl")]
    pub access_control: String,
    #[serde(rename = "WebsiteConfiguration", skip_serializing_if = "Option::is_none")]
    pub website_configuration: Option<WebsiteConfiguration>,
}

impl CfnBucket {
    /// A website bucket named after the site's domain, public-read, serving
    /// the given index document.
    pub fn website(domain: &str, index_document: &str) -> Self {
        Self {
            bucket_name: domain.to_string(),
            access_control: "PublicRead".to_string(),
            website_configuration: Some(WebsiteConfiguration {
                index_document: index_document.to_string(),
                error_document: None,
            }),
        }
    }
}

impl CfnResource for CfnBucket {
    fn type_string(&self) -> &'static str {
        "AWS::S3::Bucket"
    }

    fn properties(&self) -> Value {
        to_props(self)
    }

    fn validate(&self) -> Result<(), String> {
        if self.bucket_name.is_empty() {
            return Err("bucket name must not be empty".to_string());
        }
        if self.bucket_name.len() > 63 {
            return Err(format!(
                "bucket name {} exceeds 63 characters",
                self.bucket_name
            ));
        }
        Ok(())
    }
}

/// Grants public `s3:GetObject` over every object in the named bucket, which
/// website buckets need on top of their ACL.
#[derive(Debug, Clone, Serialize)]
pub struct CfnBucketPolicy {
    #[serde(rename = "Bucket")]
    pub bucket: Value,
    #[serde(rename = "PolicyDocument")]
    pub policy_document: Value,
}

impl CfnBucketPolicy {
    pub fn public_read(logical_bucket_name: &str) -> Self {
        let object_arn = serde_json::json!({
            "Fn::Sub": format!("arn:aws:s3:::${{{logical_bucket_name}}}/*")
        });
        Self {
            bucket: get_ref(logical_bucket_name),
            policy_document: serde_json::json!({
                "Version": "2012-10-17",
                "Statement": [{
                    "Effect": "Allow",
                    "Principal": "*",
                    "Action": "s3:GetObject",
                    "Resource": object_arn,
                }],
            }),
        }
    }
}

impl CfnResource for CfnBucketPolicy {
    fn type_string(&self) -> &'static str {
        "AWS::S3::BucketPolicy"
    }

    fn properties(&self) -> Value {
        to_props(self)
    }
}

/// The bucket's website endpoint hostname, for use as a CDN origin.
/// `WebsiteURL` resolves to `http://host/`, so select the host component:
/// `{ "Fn::Select": ["2", { "Fn::Split": ["/", WebsiteURL] }] }`.
pub fn website_endpoint(logical_bucket_name: &str) -> Value {
    serde_json::json!({
        "Fn::Select": ["2", { "Fn::Split": ["/", get_att(logical_bucket_name, "WebsiteURL")] }]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn website_bucket_is_public_read_with_index() {
        let bucket = CfnBucket::website("www.example.com", "index.html");
        bucket.validate().unwrap();
        let props = bucket.properties();
        assert_eq!(props["AccessControl"], "PublicRead");
        assert_eq!(props["WebsiteConfiguration"]["IndexDocument"], "index.html");
        assert_eq!(props["BucketName"], "www.example.com");
    }

    #[test]
    fn empty_bucket_name_fails_validation() {
        assert!(CfnBucket::default().validate().is_err());
    }

    #[test]
    fn public_read_policy_references_the_bucket() {
        let policy = CfnBucketPolicy::public_read("sitegenbucketexample");
        let props = policy.properties();
        assert_eq!(props["Bucket"], get_ref("sitegenbucketexample"));
        assert_eq!(
            props["PolicyDocument"]["Statement"][0]["Action"],
            "s3:GetObject"
        );
    }

    #[test]
    fn website_endpoint_selects_the_host_from_the_url() {
        let endpoint = website_endpoint("sitegenbucketexample");
        let split = &endpoint["Fn::Select"][1]["Fn::Split"];
        assert_eq!(split[0], "/");
        assert_eq!(split[1], get_att("sitegenbucketexample", "WebsiteURL"));
    }
}
