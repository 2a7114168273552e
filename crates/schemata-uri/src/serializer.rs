//! URI serialization and normalization helpers

use crate::components::Components;

fn is_unreserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}

fn is_sub_delim(c: char) -> bool {
    matches!(
        c,
        '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';' | '='
    )
}

fn userinfo_char(c: char) -> bool {
    is_unreserved(c) || is_sub_delim(c) || c == ':'
}

fn host_char(c: char) -> bool {
    is_unreserved(c) || is_sub_delim(c)
}

fn ip_literal_char(c: char) -> bool {
    host_char(c) || matches!(c, '[' | ']' | ':')
}

fn path_char(c: char) -> bool {
    is_unreserved(c) || is_sub_delim(c) || matches!(c, '/' | ':' | '@')
}

fn path_noscheme_char(c: char) -> bool {
    is_unreserved(c) || is_sub_delim(c) || matches!(c, '/' | '@')
}

fn query_char(c: char) -> bool {
    is_unreserved(c) || is_sub_delim(c) || matches!(c, ':' | '@' | '/' | '?')
}

fn is_pct_triplet(bytes: &[u8], i: usize) -> bool {
    i + 2 < bytes.len()
        && bytes[i] == b'%'
        && bytes[i + 1].is_ascii_hexdigit()
        && bytes[i + 2].is_ascii_hexdigit()
}

fn push_encoded(out: &mut String, c: char) {
    let mut buf = [0u8; 4];
    for byte in c.encode_utf8(&mut buf).bytes() {
        out.push_str(&format!("%{byte:02X}"));
    }
}

/// Percent-encode every character not accepted by `allowed`.
/// Existing `%XX` triplets are preserved.
fn encode_disallowed(input: &str, allowed: fn(char) -> bool) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    for (i, c) in input.char_indices() {
        if c == '%' && is_pct_triplet(bytes, i) {
            out.push(c);
        } else if allowed(c) {
            out.push(c);
        } else {
            push_encoded(&mut out, c);
        }
    }
    out
}

/// Decode percent-encoded unreserved characters and uppercase the hex
/// digits of every remaining triplet.
fn normalize_percent_encoding(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    while i < bytes.len() {
        if is_pct_triplet(bytes, i) {
            let hex = &input[i + 1..i + 3];
            let decoded = u8::from_str_radix(hex, 16).ok().map(char::from);
            match decoded {
                Some(c) if c.is_ascii() && is_unreserved(c) => out.push(c),
                _ => {
                    out.push('%');
                    out.push_str(&hex.to_ascii_uppercase());
                }
            }
            i += 3;
        } else {
            // Step over a whole UTF-8 sequence at a time.
            let ch = input[i..].chars().next().unwrap_or_default();
            out.push(ch);
            i += ch.len_utf8().max(1);
        }
    }
    out
}

/// Remove `.` and `..` segments from a path (RFC 3986, section 5.2.4)
#[must_use]
pub fn remove_dot_segments(path: &str) -> String {
    let mut input = path;
    let mut output: Vec<&str> = Vec::new();

    while !input.is_empty() {
        if let Some(rest) = input.strip_prefix("../") {
            input = rest;
        } else if let Some(rest) = input.strip_prefix("./") {
            input = rest;
        } else if input.starts_with("/./") {
            input = &input[2..];
        } else if input == "/." {
            input = "/";
        } else if input.starts_with("/../") {
            input = &input[3..];
            output.pop();
        } else if input == "/.." {
            input = "/";
            output.pop();
        } else if input == "." || input == ".." {
            input = "";
        } else {
            // Move the first segment, including its leading '/', to the output.
            let start = usize::from(input.starts_with('/'));
            let end = input[start..]
                .find('/')
                .map_or(input.len(), |idx| idx + start);
            output.push(&input[..end]);
            input = &input[end..];
        }
    }

    output.concat()
}

fn recompose_authority(c: &Components) -> Option<String> {
    if c.userinfo.is_none() && c.host.is_none() && c.port.is_none() {
        return None;
    }

    let mut authority = String::new();
    if let Some(userinfo) = c.userinfo.as_deref().filter(|u| !u.is_empty()) {
        authority.push_str(&encode_disallowed(userinfo, userinfo_char));
        authority.push('@');
    }
    if let Some(host) = c.host.as_deref().filter(|h| !h.is_empty()) {
        let host = host.to_lowercase();
        if host.starts_with('[') {
            authority.push_str(&encode_disallowed(&host, ip_literal_char));
        } else {
            authority.push_str(&encode_disallowed(&host, host_char));
        }
    }
    if let Some(port) = c.port {
        authority.push(':');
        authority.push_str(&port.to_string());
    }
    Some(authority)
}

/// Serialize components into a normalized URI string
///
/// The scheme and host are lowercased, dot segments are removed from
/// hierarchical paths, characters outside each component's grammar are
/// percent-encoded, percent-encoded unreserved characters are decoded and
/// the remaining hex digits are uppercased. Empty queries and fragments
/// are dropped.
#[must_use]
pub fn serialize(c: &Components) -> String {
    let mut out = String::new();

    if let Some(scheme) = &c.scheme {
        let scheme: String = scheme
            .to_ascii_lowercase()
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '+' | '-' | '.'))
            .collect();
        out.push_str(&scheme);
        out.push(':');
    }

    let authority = recompose_authority(c);
    if let Some(authority) = &authority {
        out.push_str("//");
        out.push_str(authority);
        if !c.path.is_empty() && !c.path.starts_with('/') {
            out.push('/');
        }
    }

    if !c.path.is_empty() {
        let path = c.path.replace("%2E", ".").replace("%2e", ".");
        let hierarchical = c.scheme.is_some() || authority.is_some() || path.starts_with('/');
        let path = if hierarchical {
            remove_dot_segments(&path)
        } else {
            path
        };
        let mut path = if c.scheme.is_some() {
            encode_disallowed(&path, path_char)
        } else {
            encode_disallowed(&path, path_noscheme_char)
        };
        if authority.is_none() && path.starts_with("//") {
            path = format!("/%2F{}", &path[2..]);
        }
        out.push_str(&path);
    }

    if let Some(query) = c.query.as_deref().filter(|q| !q.is_empty()) {
        out.push('?');
        out.push_str(&encode_disallowed(query, query_char));
    }

    if let Some(fragment) = c.fragment.as_deref().filter(|f| !f.is_empty()) {
        out.push('#');
        out.push_str(&encode_disallowed(fragment, query_char));
    }

    normalize_percent_encoding(&out)
}

/// Percent-encode everything except unreserved and sub-delimiter characters
#[must_use]
pub fn escape_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if is_unreserved(c) || is_sub_delim(c) {
            out.push(c);
        } else {
            push_encoded(&mut out, c);
        }
    }
    out
}

/// Decode every percent-encoded triplet; invalid UTF-8 is replaced
#[must_use]
pub fn unescape_component(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if is_pct_triplet(bytes, i) {
            if let Ok(byte) = u8::from_str_radix(&input[i + 1..i + 3], 16) {
                decoded.push(byte);
                i += 3;
                continue;
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&decoded).into_owned()
}
