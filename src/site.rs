use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::StackError;
use crate::graph::StackGraph;
use crate::resources::acm::{validation_option_att, CertificateValidation, CfnCertificate};
use crate::resources::cloudfront::{
    CfnDistribution, CustomErrorResponse, CustomOriginConfig, DefaultCacheBehavior,
    DistributionConfig, Origin, ViewerCertificate,
};
use crate::resources::regions::verify_region;
use crate::resources::route53::{AliasTarget, CfnRecordSet, HostedZoneLookup};
use crate::resources::s3::{website_endpoint, CfnBucket, CfnBucketPolicy};
use crate::template::{
    get_att, get_ref, logical_name, resources_to_template, ref_targets, substitute_att,
    validate_stack_name, Resource, ResourceOutput, SavedStack, SavedTemplate,
};

/// Configuration for one static website stack. Everything beyond the domain
/// and zone name ships with the defaults a read-only S3 website wants;
/// override individual fields as needed.
pub struct SiteConfig {
    /// The fully qualified domain the site is served at, e.g. `www.example.com`.
    pub domain: String,
    /// Name of the existing hosted zone the DNS records go into,
    /// e.g. `example.com`.
    pub zone_name: String,
    /// TTL for the DNS validation record, in seconds.
    pub dns_ttl: u64,
    /// Default and maximum TTL for the CDN cache behavior, in seconds.
    pub cache_default_ttl: u64,
    pub price_class: String,
    /// Static page the CDN serves for origin 404s.
    pub error_page_path: String,
    pub index_document: String,
    /// CloudFront only accepts certificates provisioned in us-east-1, so the
    /// certificate and its validation completion are pinned here regardless
    /// of where the rest of the stack is provisioned.
    pub certificate_region: String,
    /// Derived from the domain when left empty.
    pub stack_name: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            zone_name: String::new(),
            dns_ttl: 600,
            cache_default_ttl: 600,
            price_class: "PriceClass_100".to_string(),
            error_page_path: "/404.html".to_string(),
            index_document: "index.html".to_string(),
            certificate_region: "us-east-1".to_string(),
            stack_name: String::new(),
        }
    }
}

impl SiteConfig {
    pub fn for_domain(domain: &str, zone_name: &str) -> Self {
        Self {
            domain: domain.to_string(),
            zone_name: zone_name.to_string(),
            ..Default::default()
        }
    }
}

/// The externally visible handles of a built stack, also mirrored into the
/// template's `Outputs` section.
#[derive(Debug, Clone)]
pub struct SiteOutputs {
    /// Deferred until the engine resolves the hosted-zone lookup; concrete
    /// after [`StaticSiteStack::bind_hosted_zone`].
    pub hosted_zone_id: Value,
    pub bucket: String,
    pub alias_record: String,
    pub certificate: String,
}

/// A fully built desired-state declaration: the template the engine applies,
/// the dependency graph that orders the apply, and the stack's outputs.
#[derive(Debug)]
pub struct StaticSiteStack {
    pub stack_name: String,
    pub zone_name: String,
    pub template: SavedTemplate,
    pub graph: StackGraph,
    pub outputs: SiteOutputs,
    zone_lookup: String,
}

impl StaticSiteStack {
    /// Wrap the template under its stack name, the shape the engine consumes.
    pub fn to_saved_stack(&self) -> SavedStack {
        let mut stack = SavedStack::default();
        stack
            .template
            .insert(self.stack_name.clone(), self.template.clone());
        stack
    }

    /// Feed back the engine's hosted-zone lookup result, replacing every
    /// deferred zone-id reference with the concrete id. A zone name with no
    /// match fails the whole stack; nothing is substituted partially.
    pub fn bind_hosted_zone(
        &mut self,
        zones: &HashMap<String, String>,
    ) -> Result<String, StackError> {
        let zone_id = zones
            .get(&self.zone_name)
            .ok_or_else(|| StackError::UnresolvedReference {
                reference: self.zone_name.clone(),
            })?;
        let concrete = Value::String(zone_id.clone());
        for resource in self.template.resources.values_mut() {
            substitute_att(&mut resource.properties, &self.zone_lookup, "Id", &concrete);
        }
        for output in self.template.outputs.values_mut() {
            substitute_att(&mut output.value, &self.zone_lookup, "Id", &concrete);
        }
        self.outputs.hosted_zone_id = concrete;
        Ok(zone_id.clone())
    }
}

/// Declare every resource of the static site exactly once and wire their
/// outputs together: bucket, public-read policy, hosted-zone lookup,
/// DNS-validated certificate (region-pinned), validation record, validation
/// completion, CDN distribution, and the apex alias record.
///
/// Nothing is provisioned here. The returned stack is a pure description;
/// ordering is carried by the data references alone and can be read back
/// from the graph.
pub fn build_site(config: &SiteConfig) -> Result<StaticSiteStack, StackError> {
    if config.domain.split('.').count() < 2 {
        return Err(StackError::InvalidDomain {
            domain: config.domain.clone(),
        });
    }
    verify_region(&config.certificate_region)?;
    let stack_name = validate_stack_name(&config.domain, &config.stack_name)?;
    let cert_region = Some(config.certificate_region.clone());

    let bucket = logical_name("sitegenbucket", &config.domain);
    let bucket_policy = format!("{bucket}policy");
    let zone_lookup = logical_name("sitegenzonelookup", &config.zone_name);
    let cert = logical_name("sitegencert", &config.domain);
    let validation_record = logical_name("sitegenvalidationrecord", &config.domain);
    let cert_validation = logical_name("sitegencertvalidation", &config.domain);
    let cdn = logical_name("sitegencdn", &config.domain);
    let alias_record = logical_name("sitegenaliasrecord", &config.domain);

    let mut resources: Vec<Resource> = vec![];

    debug!(name = %bucket, domain = %config.domain, "declaring website bucket");
    resources.push(Resource {
        name: bucket.clone(),
        region: None,
        properties: Box::new(CfnBucket::website(&config.domain, &config.index_document)),
    });
    resources.push(Resource {
        name: bucket_policy,
        region: None,
        properties: Box::new(CfnBucketPolicy::public_read(&bucket)),
    });

    debug!(name = %zone_lookup, zone = %config.zone_name, "declaring hosted zone lookup");
    resources.push(Resource {
        name: zone_lookup.clone(),
        region: None,
        properties: Box::new(HostedZoneLookup::by_name(&config.zone_name)),
    });
    let zone_id = get_att(&zone_lookup, "Id");

    debug!(name = %cert, region = %config.certificate_region, "declaring certificate");
    resources.push(Resource {
        name: cert.clone(),
        region: cert_region.clone(),
        properties: Box::new(CfnCertificate::dns_validated(&config.domain)),
    });

    // Name/type/value mirror whatever the certificate authority returned for
    // the first validation option; the record never restates them.
    resources.push(Resource {
        name: validation_record.clone(),
        region: None,
        properties: Box::new(CfnRecordSet {
            name: validation_option_att(&cert, "ResourceRecordName"),
            record_type: validation_option_att(&cert, "ResourceRecordType"),
            hosted_zone_id: zone_id.clone(),
            resource_records: vec![validation_option_att(&cert, "ResourceRecordValue")],
            ttl: Some(config.dns_ttl),
            alias_target: None,
        }),
    });

    resources.push(Resource {
        name: cert_validation.clone(),
        region: cert_region,
        properties: Box::new(CertificateValidation {
            certificate_arn: get_ref(&cert),
            validation_record_fqdns: vec![get_ref(&validation_record)],
        }),
    });

    let origin_id = get_att(&bucket, "Arn");
    debug!(name = %cdn, "declaring distribution");
    resources.push(Resource {
        name: cdn.clone(),
        region: None,
        properties: Box::new(CfnDistribution {
            distribution_config: DistributionConfig {
                aliases: vec![config.domain.clone()],
                origins: vec![Origin {
                    id: origin_id.clone(),
                    domain_name: website_endpoint(&bucket),
                    custom_origin_config: Some(CustomOriginConfig::default()),
                }],
                default_root_object: config.index_document.clone(),
                default_cache_behavior: DefaultCacheBehavior {
                    target_origin_id: origin_id,
                    default_ttl: config.cache_default_ttl,
                    max_ttl: config.cache_default_ttl,
                    ..Default::default()
                },
                price_class: config.price_class.clone(),
                custom_error_responses: vec![CustomErrorResponse {
                    error_code: 404,
                    response_code: 404,
                    response_page_path: config.error_page_path.clone(),
                }],
                // The viewer certificate comes from the validation completion,
                // never the raw certificate request: referencing the completion
                // is what keeps the distribution behind a validated cert.
                viewer_certificate: Some(ViewerCertificate {
                    acm_certificate_arn: get_att(&cert_validation, "CertificateArn"),
                    ssl_support_method: "sni-only".to_string(),
                }),
                ..Default::default()
            },
        }),
    });

    resources.push(Resource {
        name: alias_record.clone(),
        region: None,
        properties: Box::new(CfnRecordSet {
            name: Value::String(config.domain.clone()),
            record_type: Value::String("A".to_string()),
            hosted_zone_id: zone_id.clone(),
            resource_records: vec![],
            ttl: None,
            alias_target: Some(AliasTarget {
                dns_name: get_att(&cdn, "DomainName"),
                hosted_zone_id: get_att(&cdn, "HostedZoneId"),
                evaluate_target_health: true,
            }),
        }),
    });

    let mut template = resources_to_template(&resources)?;
    template.outputs.insert(
        "HostedZoneId".to_string(),
        ResourceOutput {
            description: format!("id of the hosted zone {}", config.zone_name),
            value: zone_id.clone(),
        },
    );
    template.outputs.insert(
        "BucketName".to_string(),
        ResourceOutput {
            description: "name of the website content bucket".to_string(),
            value: get_ref(&bucket),
        },
    );
    template.outputs.insert(
        "AliasRecordName".to_string(),
        ResourceOutput {
            description: "apex record pointing the domain at the CDN".to_string(),
            value: get_ref(&alias_record),
        },
    );
    template.outputs.insert(
        "CertificateArn".to_string(),
        ResourceOutput {
            description: "ARN of the TLS certificate request".to_string(),
            value: get_ref(&cert),
        },
    );

    let mut graph = StackGraph::new();
    for resource in &resources {
        graph.add_node(&resource.name)?;
    }
    for (name, saved) in &template.resources {
        for target in ref_targets(&saved.properties) {
            graph.add_edge(&target, name)?;
        }
    }
    // Surfaces a cycle now rather than at the first apply_order call.
    graph.apply_order()?;

    info!(
        stack = %stack_name,
        resources = template.resources.len(),
        "declared static site stack"
    );
    Ok(StaticSiteStack {
        stack_name,
        zone_name: config.zone_name.clone(),
        template,
        graph,
        outputs: SiteOutputs {
            hosted_zone_id: zone_id,
            bucket,
            alias_record,
            certificate: cert,
        },
        zone_lookup,
    })
}
