//! Origin whitelist matching
//!
//! Entries take three forms:
//!
//! - `*` allows every origin
//! - `*.example.com` allows `example.com` and any subdomain, on any scheme or port
//! - `https://app.example.com:8443` matches scheme, host and port exactly; an
//!   entry without a port matches any port, an entry without a scheme any scheme

#[derive(Debug, Clone, PartialEq, Eq)]
struct Origin {
    scheme: Option<String>,
    host: String,
    port: Option<u16>,
}

impl Origin {
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim().to_ascii_lowercase();
        if raw.is_empty() {
            return None;
        }
        let (scheme, rest) = match raw.split_once("://") {
            Some((scheme, rest)) => (Some(scheme.to_string()), rest),
            None => (None, raw.as_str()),
        };
        let authority = rest.split('/').next().unwrap_or_default();
        let (host, port) = split_host_port(authority)?;
        if host.is_empty() {
            return None;
        }
        Some(Self {
            scheme,
            host: host.to_string(),
            port,
        })
    }
}

fn split_host_port(authority: &str) -> Option<(&str, Option<u16>)> {
    // Bracketed IPv6 literal
    if authority.starts_with('[') {
        let end = authority.find(']')?;
        let host = &authority[..=end];
        return match &authority[end + 1..] {
            "" => Some((host, None)),
            rest => rest
                .strip_prefix(':')
                .and_then(|p| p.parse().ok())
                .map(|port| (host, Some(port))),
        };
    }
    match authority.rsplit_once(':') {
        Some((host, port)) => port.parse().ok().map(|port| (host, Some(port))),
        None => Some((authority, None)),
    }
}

#[derive(Debug, Clone)]
enum OriginRule {
    Any,
    Suffix(String),
    Exact(Origin),
}

impl OriginRule {
    fn parse(entry: &str) -> Option<Self> {
        let entry = entry.trim();
        if entry == "*" {
            return Some(Self::Any);
        }
        if let Some(domain) = entry.strip_prefix("*.") {
            return Some(Self::Suffix(domain.to_ascii_lowercase()));
        }
        Origin::parse(entry).map(Self::Exact)
    }

    fn matches(&self, origin: &Origin) -> bool {
        match self {
            Self::Any => true,
            Self::Suffix(domain) => {
                origin.host == *domain
                    || origin
                        .host
                        .strip_suffix(domain.as_str())
                        .is_some_and(|prefix| prefix.ends_with('.'))
            }
            Self::Exact(rule) => {
                rule.host == origin.host
                    && rule.scheme.as_ref().is_none_or(|s| Some(s) == origin.scheme.as_ref())
                    && rule.port.is_none_or(|p| Some(p) == origin.port)
            }
        }
    }
}

/// Compiled origin whitelist
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    rules: Vec<OriginRule>,
}

impl OriginPolicy {
    /// Compile whitelist entries; unparseable entries are dropped
    pub fn new<S: AsRef<str>>(entries: &[S]) -> Self {
        let rules = entries
            .iter()
            .filter_map(|entry| {
                let rule = OriginRule::parse(entry.as_ref());
                if rule.is_none() {
                    tracing::warn!(entry = entry.as_ref(), "Ignoring unparseable origin entry");
                }
                rule
            })
            .collect();
        Self { rules }
    }

    /// Whether `origin` (an `Origin` header value) is whitelisted
    pub fn allows(&self, origin: &str) -> bool {
        if self.rules.iter().any(|rule| matches!(rule, OriginRule::Any)) {
            return true;
        }
        match Origin::parse(origin) {
            Some(origin) => self.rules.iter().any(|rule| rule.matches(&origin)),
            None => false,
        }
    }
}
