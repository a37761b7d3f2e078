use thiserror::Error;

/// Failures that can occur while building the desired-state declaration.
///
/// Provisioning failures (rate limits, permission errors, validation
/// timeouts) never appear here: those belong to the reconciliation engine
/// that applies the stack, and this crate performs no provisioning.
#[derive(Debug, Error)]
pub enum StackError {
    /// The domain string has no top-level label, e.g. `"localhost"`.
    #[error("no TLD found on {domain}")]
    InvalidDomain { domain: String },

    /// A deferred reference names something that was never declared, or an
    /// external lookup (hosted zone by name) returned no match. Fatal to the
    /// whole evaluation; no partial stack is emitted.
    #[error("unresolved reference: {reference}")]
    UnresolvedReference { reference: String },

    /// The declared references do not form a DAG.
    #[error("dependency cycle involving {node}")]
    DependencyCycle { node: String },

    /// A logical name was declared more than once.
    #[error("resource {name} declared more than once")]
    DuplicateResource { name: String },

    /// A resource's own property validation failed.
    #[error("validation failed on resource '{name}': {message}")]
    InvalidResource { name: String, message: String },

    #[error("invalid stack name {name}: {message}")]
    InvalidStackName { name: String, message: String },

    #[error("invalid region code {region}")]
    InvalidRegion { region: String },
}
