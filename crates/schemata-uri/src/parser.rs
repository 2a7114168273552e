//! URI parsing

use crate::UriError;
use crate::components::{Components, UriOptions};
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

/// Loose split of a URI reference into its five parts (RFC 3986, appendix B),
/// with the authority further split into userinfo, host and port.
static URI_PARSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)^(?:([^:/?#]+):)?(?://((?:([^/?#@]*)@)?(\[[^/?#\]]*\]|[^/?#:]*)(?::([^/?#]*))?))?([^?#]*)(?:\?([^#]*))?(?:#(.*))?$",
    )
    .expect("URI split pattern is valid")
});

static SCHEME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+\-.]*$").expect("scheme pattern is valid")
});

static USERINFO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:%[0-9A-Fa-f]{2}|[A-Za-z0-9\-._~!$&'()*+,;=:])*$")
        .expect("userinfo pattern is valid")
});

static REG_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:%[0-9A-Fa-f]{2}|[A-Za-z0-9\-._~!$&'()*+,;=])*$")
        .expect("host pattern is valid")
});

static IP_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(?:[0-9A-Fa-f:.]+|v[0-9A-Fa-f]+\.[A-Za-z0-9\-._~!$&'()*+,;=:]+)\]$")
        .expect("IP literal pattern is valid")
});

static PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:%[0-9A-Fa-f]{2}|[A-Za-z0-9\-._~!$&'()*+,;=:@/])*$")
        .expect("path pattern is valid")
});

static QUERY_OR_FRAGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:%[0-9A-Fa-f]{2}|[A-Za-z0-9\-._~!$&'()*+,;=:@/?])*$")
        .expect("query pattern is valid")
});

/// Parse a URI reference with default (tolerant) options
#[must_use]
pub fn parse(uri: &str) -> Components {
    parse_with(uri, &UriOptions::default())
}

/// Parse a URI reference
///
/// Parsing always produces components. Input outside the strict grammar is
/// split on a best-effort basis; in strict mode a [`UriError::NotStrict`]
/// fault is recorded for each offending part.
#[must_use]
pub fn parse_with(uri: &str, options: &UriOptions) -> Components {
    let mut components = Components::default();

    // The split pattern has only optional groups, so it always matches.
    let Some(caps) = URI_PARSE.captures(uri) else {
        components
            .errors
            .push(UriError::NotStrict("URI can not be parsed".to_string()));
        return components;
    };

    let group = |i: usize| caps.get(i).map(|m| m.as_str().to_string());

    components.scheme = group(1);
    components.authority = group(2);
    components.userinfo = group(3);
    components.host = group(4);
    components.path = group(6).unwrap_or_default();
    components.query = group(7);
    components.fragment = group(8);

    if let Some(port) = group(5).filter(|p| !p.is_empty()) {
        match port.parse::<u16>() {
            Ok(p) => components.port = Some(p),
            Err(_) => components.errors.push(UriError::InvalidPort(port)),
        }
    }

    components.classify();

    if !options.tolerant {
        for fault in strict_faults(&components) {
            components.errors.push(UriError::NotStrict(fault));
        }
    }

    if let Some(expected) = options.reference {
        if expected != components.reference {
            components
                .errors
                .push(UriError::UnexpectedReference { expected });
        }
    }

    trace!(uri, reference = %components.reference, "parsed URI");
    components
}

fn strict_faults(c: &Components) -> Vec<String> {
    let mut faults = Vec::new();

    if let Some(scheme) = &c.scheme {
        if !SCHEME.is_match(scheme) {
            faults.push(format!("invalid scheme '{scheme}'"));
        }
    }
    if let Some(userinfo) = &c.userinfo {
        if !USERINFO.is_match(userinfo) {
            faults.push(format!("invalid userinfo '{userinfo}'"));
        }
    }
    if let Some(host) = &c.host {
        let valid = if host.starts_with('[') {
            IP_LITERAL.is_match(host)
        } else {
            REG_NAME.is_match(host)
        };
        if !valid {
            faults.push(format!("invalid host '{host}'"));
        }
    }
    if !PATH.is_match(&c.path) {
        faults.push(format!("invalid path '{}'", c.path));
    }
    if c.authority.is_some() && !c.path.is_empty() && !c.path.starts_with('/') {
        faults.push("path must be absolute when an authority is present".to_string());
    }
    if c.scheme.is_none() && c.authority.is_none() {
        let first_segment = c.path.split('/').next().unwrap_or_default();
        if first_segment.contains(':') {
            faults.push(format!(
                "first segment '{first_segment}' of a relative path may not contain ':'"
            ));
        }
    }
    if let Some(query) = &c.query {
        if !QUERY_OR_FRAGMENT.is_match(query) {
            faults.push(format!("invalid query '{query}'"));
        }
    }
    if let Some(fragment) = &c.fragment {
        if !QUERY_OR_FRAGMENT.is_match(fragment) {
            faults.push(format!("invalid fragment '{fragment}'"));
        }
    }

    faults
}
