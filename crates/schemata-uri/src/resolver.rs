//! Reference resolution (RFC 3986, section 5.2)

use crate::components::{Components, UriOptions};
use crate::parser::parse_with;
use crate::serializer::{remove_dot_segments, serialize};
use tracing::trace;

fn merge_paths(base: &Components, relative_path: &str) -> String {
    if base.has_authority() && base.path.is_empty() {
        return format!("/{relative_path}");
    }
    match base.path.rfind('/') {
        Some(idx) => format!("{}{}", &base.path[..=idx], relative_path),
        None => relative_path.to_string(),
    }
}

fn copy_authority(target: &mut Components, source: &Components) {
    target.authority = source.authority.clone();
    target.userinfo = source.userinfo.clone();
    target.host = source.host.clone();
    target.port = source.port;
}

/// Resolve parsed `relative` against parsed `base`
///
/// In tolerant mode a relative reference whose scheme equals the base
/// scheme is treated as if it had no scheme (the non-strict rule of
/// RFC 3986, section 5.2.2).
#[must_use]
pub fn resolve_components(
    base: &Components,
    relative: &Components,
    options: &UriOptions,
) -> Components {
    let mut relative_scheme = relative.scheme.clone();
    if options.tolerant {
        let same_scheme = match (&relative.scheme, &base.scheme) {
            (Some(r), Some(b)) => r.eq_ignore_ascii_case(b),
            _ => false,
        };
        if same_scheme {
            relative_scheme = None;
        }
    }

    let mut target = Components::default();

    if relative_scheme.is_some() {
        target.scheme = relative_scheme;
        copy_authority(&mut target, relative);
        target.path = remove_dot_segments(&relative.path);
        target.query = relative.query.clone();
    } else {
        if relative.has_authority() {
            copy_authority(&mut target, relative);
            target.path = remove_dot_segments(&relative.path);
            target.query = relative.query.clone();
        } else {
            if relative.path.is_empty() {
                target.path = base.path.clone();
                target.query = relative.query.clone().or_else(|| base.query.clone());
            } else {
                target.path = if relative.path.starts_with('/') {
                    remove_dot_segments(&relative.path)
                } else {
                    remove_dot_segments(&merge_paths(base, &relative.path))
                };
                target.query = relative.query.clone();
            }
            copy_authority(&mut target, base);
        }
        target.scheme = base.scheme.clone();
    }

    target.fragment = relative.fragment.clone();
    target.classify();
    target
}

/// Resolve `relative` against `base` with options, returning the
/// serialized result
#[must_use]
pub fn resolve_with(base: &str, relative: &str, options: &UriOptions) -> String {
    let base_components = parse_with(base, options);
    let relative_components = parse_with(relative, options);
    let resolved = serialize(&resolve_components(
        &base_components,
        &relative_components,
        options,
    ));
    trace!(base, relative, resolved = %resolved, "resolved URI reference");
    resolved
}

/// Resolve `relative` against `base` with tolerant options
#[must_use]
pub fn resolve(base: &str, relative: &str) -> String {
    resolve_with(base, relative, &UriOptions::default())
}

/// Parse and re-serialize a URI into its normalized form
#[must_use]
pub fn normalize(uri: &str) -> String {
    serialize(&parse_with(uri, &UriOptions::default()))
}

/// Compare two URIs after normalization
#[must_use]
pub fn equal(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}
