//! Path rewriting via named capture groups.
//!
//! A rewrite rule pairs a regex pattern with a template, e.g. pattern
//! `/shop/orders/(?<rest>.*)` and template `/${rest}`. The template
//! references capture groups by name using `$name` or `${name}`.

use regex::Regex;

/// Apply `pattern` to `path` and expand `template` with the captured groups.
///
/// A path that does not match the pattern is forwarded unchanged: a
/// predicate can legitimately match paths the rewrite pattern does not
/// (e.g. the bare prefix `/shop/orders` under a `/shop/orders/**` rule),
/// and those are valid requests, not errors.
pub fn rewrite(path: &str, pattern: &Regex, template: &str) -> String {
    let Some(caps) = pattern.captures(path) else {
        tracing::debug!(
            path = %path,
            pattern = %pattern.as_str(),
            "rewrite pattern did not match, forwarding path unchanged"
        );
        return path.to_string();
    };

    let mut out = String::with_capacity(template.len());
    caps.expand(template, &mut out);
    out
}
