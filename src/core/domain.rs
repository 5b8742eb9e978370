// src/core/domain.rs

use psl::Psl;
use url::Url;

use crate::core::models::InvalidDomainError;

/// Canonicalizes arbitrary input (URL, subdomain or bare name) into a
/// registrable domain string using public-suffix rules.
///
/// The scheme, path, port and any trailing dot are stripped and the host is
/// lowercased. The host must decompose into a registrable domain under a
/// known public suffix; the full host (including any subdomain) is returned.
/// Normalizing an already-normalized domain returns it unchanged.
pub fn normalize(input: &str) -> Result<String, InvalidDomainError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(InvalidDomainError::new(input));
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let host = Url::parse(&with_scheme)
        .ok()
        .and_then(|url| url.host_str().map(str::to_owned))
        .ok_or_else(|| InvalidDomainError::new(input))?;
    let host = host.trim_end_matches('.').to_lowercase();

    let registrable = psl::List
        .domain(host.as_bytes())
        .is_some_and(|domain| domain.suffix().is_known());
    if registrable {
        Ok(host)
    } else {
        Err(InvalidDomainError::new(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scheme_and_path() {
        assert_eq!(normalize("https://example.com/about?x=1").unwrap(), "example.com");
        assert_eq!(normalize("http://example.com:8080/").unwrap(), "example.com");
    }

    #[test]
    fn keeps_subdomains() {
        assert_eq!(normalize("https://blog.example.com").unwrap(), "blog.example.com");
        assert_eq!(normalize("www.example.co.uk").unwrap(), "www.example.co.uk");
    }

    #[test]
    fn lowercases_and_drops_trailing_dot() {
        assert_eq!(normalize("Example.COM.").unwrap(), "example.com");
    }

    #[test]
    fn is_idempotent() {
        for input in ["example.com", "https://www.example.co.uk/x", "Blog.Example.ORG"] {
            let once = normalize(input).unwrap();
            assert_eq!(normalize(&once).unwrap(), once);
        }
    }

    #[test]
    fn rejects_empty_and_blank_input() {
        assert!(normalize("").is_err());
        assert!(normalize("   ").is_err());
    }

    #[test]
    fn rejects_unparsable_input() {
        assert!(normalize("not a domain").is_err());
        assert!(normalize("localhost").is_err());
        assert!(normalize("co.uk").is_err());
    }
}
