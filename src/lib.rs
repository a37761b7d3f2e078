//! Desired-state declarations for an S3-backed static website fronted by
//! CloudFront, with a DNS-validated ACM certificate and Route53 records.
//!
//! [`build_site`] evaluates a [`SiteConfig`] into a [`StaticSiteStack`]: a
//! CloudFormation-shaped template, an explicit dependency graph over the
//! declared resources, and the stack's outputs. Nothing here talks to a
//! cloud provider; an external reconciliation engine diffs the template
//! against live state and applies it in an order the graph permits.
//! Values only the engine can know (the hosted zone id, certificate
//! validation options, the CDN's domain name) stay deferred as `Ref` /
//! `Fn::GetAtt` references until it resolves them.

pub mod domain;
pub mod error;
pub mod graph;
pub mod resources;
pub mod site;
pub mod template;

pub use domain::{split_domain, DomainParts};
pub use error::StackError;
pub use graph::StackGraph;
pub use site::{build_site, SiteConfig, SiteOutputs, StaticSiteStack};
pub use template::{get_att, get_ref, CfnResource, SavedStack, SavedTemplate};
