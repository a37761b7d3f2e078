use serde::Serialize;
use serde_json::Value;

use super::to_props;
use crate::template::CfnResource;

pub const PRICE_CLASSES: &[&str] = &["PriceClass_100", "PriceClass_200", "PriceClass_All"];

#[derive(Debug, Clone, Serialize)]
pub struct CustomOriginConfig {
    #[serde(rename = "HTTPPort")]
    pub http_port: u16,
    #[serde(rename = "HTTPSPort")]
    pub https_port: u16,
    #[serde(rename = "OriginProtocolPolicy")]
    pub origin_protocol_policy: String,
    #[serde(rename = "OriginSSLProtocols")]
    pub origin_ssl_protocols: Vec<String>,
}

impl Default for CustomOriginConfig {
    // S3 doesn't support HTTPS connections when the bucket is configured as
    // a website endpoint, so the origin side stays http-only.
    fn default() -> Self {
        Self {
            http_port: 80,
            https_port: 443,
            origin_protocol_policy: "http-only".to_string(),
            origin_ssl_protocols: vec!["TLSv1.2".to_string()],
        }
    }
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct Origin {
    #[serde(rename = "Id")]
    pub id: Value,
    #[serde(rename = "DomainName")]
    pub domain_name: Value,
    #[serde(rename = "CustomOriginConfig", skip_serializing_if = "Option::is_none")]
    pub custom_origin_config: Option<CustomOriginConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Cookies {
    #[serde(rename = "Forward")]
    pub forward: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForwardedValues {
    #[serde(rename = "Cookies")]
    pub cookies: Cookies,
    #[serde(rename = "QueryString")]
    pub query_string: bool,
}

impl Default for ForwardedValues {
    fn default() -> Self {
        Self {
            cookies: Cookies {
                forward: "none".to_string(),
            },
            query_string: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DefaultCacheBehavior {
    #[serde(rename = "TargetOriginId")]
    pub target_origin_id: Value,
    #[serde(rename = "ViewerProtocolPolicy")]
    pub viewer_protocol_policy: String,
    #[serde(rename = "AllowedMethods")]
    pub allowed_methods: Vec<String>,
    #[serde(rename = "CachedMethods")]
    pub cached_methods: Vec<String>,
    #[serde(rename = "ForwardedValues")]
    pub forwarded_values: ForwardedValues,
    #[serde(rename = "MinTTL")]
    pub min_ttl: u64,
    #[serde(rename = "DefaultTTL")]
    pub default_ttl: u64,
    #[serde(rename = "MaxTTL")]
    pub max_ttl: u64,
}

impl Default for DefaultCacheBehavior {
    fn default() -> Self {
        let read_only = vec!["GET".to_string(), "HEAD".to_string(), "OPTIONS".to_string()];
        Self {
            target_origin_id: Value::Null,
            viewer_protocol_policy: "redirect-to-https".to_string(),
            allowed_methods: read_only.clone(),
            cached_methods: read_only,
            forwarded_values: ForwardedValues::default(),
            min_ttl: 0,
            default_ttl: 600,
            max_ttl: 600,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomErrorResponse {
    #[serde(rename = "ErrorCode")]
    pub error_code: u16,
    #[serde(rename = "ResponseCode")]
    pub response_code: u16,
    #[serde(rename = "ResponsePagePath")]
    pub response_page_path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeoRestriction {
    #[serde(rename = "RestrictionType")]
    pub restriction_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Restrictions {
    #[serde(rename = "GeoRestriction")]
    pub geo_restriction: GeoRestriction,
}

impl Default for Restrictions {
    fn default() -> Self {
        Self {
            geo_restriction: GeoRestriction {
                restriction_type: "none".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewerCertificate {
    #[serde(rename = "AcmCertificateArn")]
    pub acm_certificate_arn: Value,
    #[serde(rename = "SslSupportMethod")]
    pub ssl_support_method: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DistributionConfig {
    #[serde(rename = "Enabled")]
    pub enabled: bool,
    #[serde(rename = "Aliases")]
    pub aliases: Vec<String>,
    #[serde(rename = "Origins")]
    pub origins: Vec<Origin>,
    #[serde(rename = "DefaultRootObject")]
    pub default_root_object: String,
    #[serde(rename = "DefaultCacheBehavior")]
    pub default_cache_behavior: DefaultCacheBehavior,
    #[serde(rename = "PriceClass")]
    pub price_class: String,
    #[serde(rename = "CustomErrorResponses")]
    pub custom_error_responses: Vec<CustomErrorResponse>,
    #[serde(rename = "Restrictions")]
    pub restrictions: Restrictions,
    #[serde(rename = "ViewerCertificate", skip_serializing_if = "Option::is_none")]
    pub viewer_certificate: Option<ViewerCertificate>,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            aliases: vec![],
            origins: vec![],
            default_root_object: "index.html".to_string(),
            default_cache_behavior: DefaultCacheBehavior::default(),
            price_class: "PriceClass_100".to_string(),
            custom_error_responses: vec![],
            restrictions: Restrictions::default(),
            viewer_certificate: None,
        }
    }
}

/// CDN edge configuration fronting the website bucket.
#[derive(Debug, Default, Clone, Serialize)]
pub struct CfnDistribution {
    #[serde(rename = "DistributionConfig")]
    pub distribution_config: DistributionConfig,
}

impl CfnResource for CfnDistribution {
    fn type_string(&self) -> &'static str {
        "AWS::CloudFront::Distribution"
    }

    fn properties(&self) -> Value {
        to_props(self)
    }

    fn validate(&self) -> Result<(), String> {
        let config = &self.distribution_config;
        if config.origins.is_empty() {
            return Err("must provide at least one origin".to_string());
        }
        let behavior = &config.default_cache_behavior;
        if behavior.target_origin_id.is_null() {
            return Err("default cache behavior must target an origin".to_string());
        }
        if !config.origins.iter().any(|o| o.id == behavior.target_origin_id) {
            return Err("default cache behavior targets an origin that is not declared".to_string());
        }
        if behavior.min_ttl > behavior.default_ttl || behavior.default_ttl > behavior.max_ttl {
            return Err(format!(
                "cache TTLs must satisfy min <= default <= max, got [{}, {}, {}]",
                behavior.min_ttl, behavior.default_ttl, behavior.max_ttl
            ));
        }
        if !PRICE_CLASSES.contains(&config.price_class.as_str()) {
            return Err(format!(
                "invalid price class {:?}, must be one of {:?}",
                config.price_class, PRICE_CLASSES
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_distribution() -> CfnDistribution {
        CfnDistribution {
            distribution_config: DistributionConfig {
                origins: vec![Origin {
                    id: json!("origin0"),
                    domain_name: json!("bucket.s3-website.example"),
                    custom_origin_config: Some(CustomOriginConfig::default()),
                }],
                default_cache_behavior: DefaultCacheBehavior {
                    target_origin_id: json!("origin0"),
                    ..Default::default()
                },
                ..Default::default()
            },
        }
    }

    #[test]
    fn defaults_match_a_read_only_website_distribution() {
        let dist = minimal_distribution();
        dist.validate().unwrap();
        let props = dist.properties();
        let config = &props["DistributionConfig"];
        assert_eq!(config["Enabled"], json!(true));
        assert_eq!(config["PriceClass"], "PriceClass_100");
        let behavior = &config["DefaultCacheBehavior"];
        assert_eq!(behavior["ViewerProtocolPolicy"], "redirect-to-https");
        assert_eq!(behavior["ForwardedValues"]["QueryString"], json!(false));
        assert_eq!(behavior["ForwardedValues"]["Cookies"]["Forward"], "none");
        assert_eq!(behavior["MinTTL"], json!(0));
        assert_eq!(behavior["MaxTTL"], json!(600));
        let origin_config = &config["Origins"][0]["CustomOriginConfig"];
        assert_eq!(origin_config["OriginProtocolPolicy"], "http-only");
        assert_eq!(origin_config["OriginSSLProtocols"], json!(["TLSv1.2"]));
    }

    #[test]
    fn ttl_bounds_are_enforced() {
        let mut dist = minimal_distribution();
        dist.distribution_config.default_cache_behavior.min_ttl = 700;
        assert!(dist.validate().is_err());
    }

    #[test]
    fn behavior_must_target_a_declared_origin() {
        let mut dist = minimal_distribution();
        dist.distribution_config.default_cache_behavior.target_origin_id = json!("ghost");
        assert!(dist.validate().is_err());
    }

    #[test]
    fn lone_distribution_needs_an_origin() {
        let dist = CfnDistribution::default();
        assert!(dist.validate().is_err());
    }

    #[test]
    fn unknown_price_class_is_rejected() {
        let mut dist = minimal_distribution();
        dist.distribution_config.price_class = "PriceClass_50".to_string();
        assert!(dist.validate().is_err());
    }
}
