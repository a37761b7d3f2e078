use crate::error::StackError;

/// A fully-qualified domain name split into its subdomain and parent domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainParts {
    /// First label, or empty when the domain is an apex like `example.com`.
    pub subdomain: String,
    /// Remaining labels. Root-terminated (trailing `.`) when a subdomain was
    /// present; a bare 2-label domain is returned unchanged.
    pub parent_domain: String,
}

/// Split a domain name into its subdomain and parent domain names.
/// e.g. `"www.example.com"` => `"www"`, `"example.com."`.
///
/// Note the asymmetry: the parent of a 3+ label domain gets a trailing `.`
/// to canonicalize it, but a 2-label domain is passed through as-is.
pub fn split_domain(domain: &str) -> Result<DomainParts, StackError> {
    let parts: Vec<&str> = domain.split('.').collect();
    if parts.len() < 2 {
        return Err(StackError::InvalidDomain {
            domain: domain.to_string(),
        });
    }
    // No subdomain, e.g. awesome-website.com.
    if parts.len() == 2 {
        return Ok(DomainParts {
            subdomain: String::new(),
            parent_domain: domain.to_string(),
        });
    }
    Ok(DomainParts {
        subdomain: parts[0].to_string(),
        parent_domain: format!("{}.", parts[1..].join(".")),
    })
}
