use regex::Regex;
use semver::{Version, VersionReq};
use std::sync::OnceLock;

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d+)(?:\.(\d+))?(?:\.(\d+))?").expect("version pattern is valid")
    })
}

/// Extract the first `major[.minor[.patch]]` group from tool output.
///
/// Missing components are filled with zero, so `v14` becomes `14.0.0`.
pub fn coerce(raw: &str) -> Option<Version> {
    let caps = version_pattern().captures(raw)?;
    let part = |i: usize| -> Option<u64> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };
    Some(Version::new(part(1)?, part(2)?, part(3)?))
}

/// Give an operator-less version its npm meaning.
///
/// `1.2.3` is an exact match and `1.2` is `1.2.x`. A bare major or a
/// version that already holds a wildcard reads the same in both dialects.
fn pin_bare_version(token: &str) -> String {
    if !token.starts_with(|c: char| c.is_ascii_digit()) {
        return token.to_string();
    }
    let core = token
        .split(|c: char| c == '-' || c == '+')
        .next()
        .unwrap_or(token);
    let parts: Vec<&str> = core.split('.').collect();
    if parts.iter().any(|p| matches!(*p, "x" | "X" | "*")) {
        return token.to_string();
    }
    match parts.len() {
        3 => format!("={}", token),
        2 => format!("{}.*", token),
        _ => token.to_string(),
    }
}

/// Translate an npm-style comparator set into `semver` syntax.
///
/// `">= 8.3 < 10"` becomes `">=8.3, <10"` and `"1.2.3 - 2"` becomes
/// `">=1.2.3, <=2"`.
fn normalize_comparators(set: &str) -> String {
    let tokens: Vec<&str> = set
        .split_whitespace()
        .map(|token| token.trim_end_matches(','))
        .filter(|token| !token.is_empty())
        .collect();

    let mut comparators: Vec<String> = Vec::new();
    let mut pending_op: Option<&str> = None;
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i];
        if token.chars().all(|c| matches!(c, '<' | '>' | '=' | '~' | '^')) {
            pending_op = Some(token);
            i += 1;
            continue;
        }
        if pending_op.is_none() && tokens.get(i + 1) == Some(&"-") {
            if let Some(upper) = tokens.get(i + 2) {
                comparators.push(format!(">={}", token));
                comparators.push(format!("<={}", upper));
                i += 3;
                continue;
            }
        }
        match pending_op.take() {
            Some(op) => comparators.push(format!("{}{}", op, token)),
            None => comparators.push(pin_bare_version(token)),
        }
        i += 1;
    }

    comparators.join(", ")
}

fn parse_range(range: &str) -> Option<Vec<VersionReq>> {
    range
        .split("||")
        .map(|alternative| {
            let normalized = normalize_comparators(alternative);
            if normalized.is_empty() {
                Ok(VersionReq::STAR)
            } else {
                VersionReq::parse(&normalized)
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .ok()
}

/// Whether `installed` falls inside `required`.
///
/// Absent or unparsable installed versions never satisfy a range, and an
/// unparsable range is treated the same way.
pub fn satisfies(installed: Option<&str>, required: &str) -> bool {
    let Some(version) = installed.and_then(coerce) else {
        return false;
    };

    match parse_range(required) {
        Some(alternatives) => alternatives.iter().any(|req| req.matches(&version)),
        None => {
            tracing::warn!(range = required, "unparsable version range");
            false
        }
    }
}
