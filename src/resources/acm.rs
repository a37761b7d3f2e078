use serde::Serialize;
use serde_json::Value;

use super::to_props;
use crate::template::{get_att, CfnResource};

/// A TLS certificate request, DNS-validated. The certificate authority
/// answers the request with domain validation options; downstream records
/// copy those verbatim via [`validation_option_att`].
#[derive(Debug, Default, Clone, Serialize)]
pub struct CfnCertificate {
    #[serde(rename = "DomainName")]
    pub domain_name: String,
    #[serde(rename = "ValidationMethod")]
    pub validation_method: String,
}

impl CfnCertificate {
    pub fn dns_validated(domain_name: &str) -> Self {
        Self {
            domain_name: domain_name.to_string(),
            validation_method: "DNS".to_string(),
        }
    }
}

impl CfnResource for CfnCertificate {
    fn type_string(&self) -> &'static str {
        "AWS::CertificateManager::Certificate"
    }

    fn properties(&self) -> Value {
        to_props(self)
    }

    fn validate(&self) -> Result<(), String> {
        if self.domain_name.is_empty() {
            return Err("must provide a domain name".to_string());
        }
        if !self.domain_name.contains('.') {
            return Err(format!("{} is not a fully qualified domain", self.domain_name));
        }
        if self.domain_name.ends_with('.') {
            return Err(format!("{} must not end with a dot", self.domain_name));
        }
        if self.domain_name.contains('*') {
            if self.domain_name.matches('*').count() > 1 {
                return Err(format!(
                    "must only provide 1 wildcard. {} is invalid",
                    self.domain_name
                ));
            }
            if !self.domain_name.starts_with('*') {
                return Err(format!(
                    "if using a wildcard, it must be the first component of your domain, eg: \"*.something.com\". {} is invalid",
                    self.domain_name
                ));
            }
        }
        Ok(())
    }
}

/// Attribute path into the first domain validation option the certificate
/// authority returns, e.g. `ResourceRecordName` / `ResourceRecordType` /
/// `ResourceRecordValue`. The validation record must mirror these exactly,
/// so it always references them instead of restating them.
pub fn validation_option_att(logical_cert_name: &str, field: &str) -> Value {
    get_att(
        logical_cert_name,
        &format!("DomainValidationOptions.0.{field}"),
    )
}

/// Proof that DNS validation succeeded. Consumers that need a usable
/// certificate (the CDN's viewer certificate) must take the ARN from this
/// resource's output, never from the raw certificate request.
#[derive(Debug, Clone)]
pub struct CertificateValidation {
    pub certificate_arn: Value,
    pub validation_record_fqdns: Vec<Value>,
}

impl CfnResource for CertificateValidation {
    fn type_string(&self) -> &'static str {
        "Custom::CertificateValidation"
    }

    fn properties(&self) -> Value {
        let mut map = serde_json::Map::new();
        map.insert("CertificateArn".to_string(), self.certificate_arn.clone());
        map.insert(
            "ValidationRecordFqdns".to_string(),
            Value::Array(self.validation_record_fqdns.clone()),
        );
        Value::Object(map)
    }

    fn validate(&self) -> Result<(), String> {
        if self.certificate_arn.is_null() {
            return Err("must reference a certificate".to_string());
        }
        if self.validation_record_fqdns.is_empty() {
            return Err("must reference at least one validation record".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::get_ref;

    #[test]
    fn dns_validated_cert_uses_dns_method() {
        let cert = CfnCertificate::dns_validated("www.example.com");
        cert.validate().unwrap();
        let props = cert.properties();
        assert_eq!(props["DomainName"], "www.example.com");
        assert_eq!(props["ValidationMethod"], "DNS");
    }

    #[test]
    fn wildcard_rules_match_acm_restrictions() {
        assert!(CfnCertificate::dns_validated("*.example.com").validate().is_ok());
        assert!(CfnCertificate::dns_validated("*.foo.*.example.com").validate().is_err());
        assert!(CfnCertificate::dns_validated("foo.*.example.com").validate().is_err());
    }

    #[test]
    fn malformed_domains_are_rejected() {
        assert!(CfnCertificate::dns_validated("").validate().is_err());
        assert!(CfnCertificate::dns_validated("nodots").validate().is_err());
        assert!(CfnCertificate::dns_validated("example.com.").validate().is_err());
    }

    #[test]
    fn validation_option_att_paths_into_the_first_option() {
        let att = validation_option_att("sitegencert", "ResourceRecordName");
        assert_eq!(
            att,
            serde_json::json!({ "Fn::GetAtt": ["sitegencert", "DomainValidationOptions.0.ResourceRecordName"] })
        );
    }

    #[test]
    fn completion_requires_cert_and_records() {
        let completion = CertificateValidation {
            certificate_arn: get_ref("sitegencert"),
            validation_record_fqdns: vec![get_ref("sitegenvalidationrecord")],
        };
        completion.validate().unwrap();
        let empty = CertificateValidation {
            certificate_arn: Value::Null,
            validation_record_fqdns: vec![],
        };
        assert!(empty.validate().is_err());
    }
}
