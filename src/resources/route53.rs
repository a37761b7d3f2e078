use serde::Serialize;
use serde_json::Value;

use super::to_props;
use crate::template::CfnResource;

/// Looks up an existing hosted zone by name. This is a data source, not a
/// managed resource: the engine resolves it against the DNS provider and
/// every record declaration takes the resulting `Id` attribute as a deferred
/// reference. No match is fatal to the whole evaluation.
#[derive(Debug, Default, Clone)]
pub struct HostedZoneLookup {
    pub zone_name: String,
}

impl HostedZoneLookup {
    pub fn by_name(zone_name: &str) -> Self {
        Self {
            zone_name: zone_name.to_string(),
        }
    }
}

impl CfnResource for HostedZoneLookup {
    fn type_string(&self) -> &'static str {
        "Custom::HostedZoneLookup"
    }

    fn properties(&self) -> Value {
        let mut map = serde_json::Map::new();
        map.insert(
            "ZoneName".to_string(),
            Value::String(self.zone_name.clone()),
        );
        Value::Object(map)
    }

    fn validate(&self) -> Result<(), String> {
        if self.zone_name.is_empty() {
            return Err("hosted zone name must not be empty".to_string());
        }
        if !self.zone_name.contains('.') {
            return Err(format!(
                "hosted zone name {} is not a domain",
                self.zone_name
            ));
        }
        Ok(())
    }
}

/// An alias points the record at another named resource (here the CDN)
/// instead of literal record values.
#[derive(Debug, Clone, Serialize)]
pub struct AliasTarget {
    #[serde(rename = "DNSName")]
    pub dns_name: Value,
    #[serde(rename = "HostedZoneId")]
    pub hosted_zone_id: Value,
    #[serde(rename = "EvaluateTargetHealth")]
    pub evaluate_target_health: bool,
}

/// A DNS record declaration. Either literal `resource_records` with a TTL,
/// or an `alias_target` — never both.
#[derive(Debug, Default, Clone, Serialize)]
pub struct CfnRecordSet {
    #[serde(rename = "Name")]
    pub name: Value,
    #[serde(rename = "Type")]
    pub record_type: Value,
    #[serde(rename = "HostedZoneId")]
    pub hosted_zone_id: Value,
    #[serde(rename = "ResourceRecords", skip_serializing_if = "Vec::is_empty")]
    pub resource_records: Vec<Value>,
    #[serde(rename = "TTL", skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
    #[serde(rename = "AliasTarget", skip_serializing_if = "Option::is_none")]
    pub alias_target: Option<AliasTarget>,
}

impl CfnResource for CfnRecordSet {
    fn type_string(&self) -> &'static str {
        "AWS::Route53::RecordSet"
    }

    fn properties(&self) -> Value {
        to_props(self)
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.is_null() {
            return Err("record must have a name".to_string());
        }
        if self.alias_target.is_some() {
            if self.ttl.is_some() || !self.resource_records.is_empty() {
                return Err("an alias record must not carry a TTL or literal records".to_string());
            }
            return Ok(());
        }
        if self.ttl.is_none() {
            return Err("a non-alias record requires a TTL".to_string());
        }
        if self.resource_records.is_empty() {
            return Err("a non-alias record requires at least one record value".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zone_lookup_requires_a_domain_shaped_name() {
        assert!(HostedZoneLookup::by_name("example.com").validate().is_ok());
        assert!(HostedZoneLookup::by_name("").validate().is_err());
        assert!(HostedZoneLookup::by_name("nodots").validate().is_err());
    }

    #[test]
    fn alias_record_must_not_carry_ttl_or_records() {
        let record = CfnRecordSet {
            name: json!("www.example.com"),
            record_type: json!("A"),
            hosted_zone_id: json!("Z123"),
            ttl: Some(600),
            alias_target: Some(AliasTarget {
                dns_name: json!("d111.cloudfront.net"),
                hosted_zone_id: json!("Z2FDTNDATAQYW2"),
                evaluate_target_health: true,
            }),
            ..Default::default()
        };
        assert!(record.validate().is_err());
    }

    #[test]
    fn literal_record_requires_ttl_and_values() {
        let mut record = CfnRecordSet {
            name: json!("_acme.example.com"),
            record_type: json!("CNAME"),
            hosted_zone_id: json!("Z123"),
            resource_records: vec![json!("validation-value")],
            ttl: None,
            alias_target: None,
        };
        assert!(record.validate().is_err());
        record.ttl = Some(600);
        assert!(record.validate().is_ok());
        record.resource_records.clear();
        assert!(record.validate().is_err());
    }

    #[test]
    fn serialized_alias_record_omits_empty_fields() {
        let record = CfnRecordSet {
            name: json!("www.example.com"),
            record_type: json!("A"),
            hosted_zone_id: json!("Z123"),
            alias_target: Some(AliasTarget {
                dns_name: json!("d111.cloudfront.net"),
                hosted_zone_id: json!("Z2FDTNDATAQYW2"),
                evaluate_target_health: true,
            }),
            ..Default::default()
        };
        let props = record.properties();
        assert!(props.get("TTL").is_none());
        assert!(props.get("ResourceRecords").is_none());
        assert_eq!(props["AliasTarget"]["EvaluateTargetHealth"], json!(true));
    }
}
