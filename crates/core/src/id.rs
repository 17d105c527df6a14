//! Label-set-derived resource ids
//!
//! Id format: `{namespace}:{label}:{label}...:{suffix}` where the labels are
//! the non-empty type labels, lower-cased and sorted, and the suffix is a
//! random alphanumeric string. The prefix is a pure function of the label set.

use crate::error::{LarderError, LarderResult};
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Namespace every generated id starts with.
pub const ID_NAMESPACE: &str = "grn:tm-food";

/// Separator between id segments.
pub const ID_SEPARATOR: &str = ":";

/// Length of the random suffix.
pub const ID_SUFFIX_LEN: usize = 20;

/// Deterministic prefix for a label set, including the trailing separator.
///
/// Fails with `EmptyLabelSet` when no non-blank label remains.
pub fn id_prefix<S: AsRef<str>>(labels: &[S]) -> LarderResult<String> {
    let mut normalized: Vec<String> = labels
        .iter()
        .map(|l| l.as_ref().trim())
        .filter(|l| !l.is_empty())
        .map(str::to_lowercase)
        .collect();
    if normalized.is_empty() {
        return Err(LarderError::EmptyLabelSet);
    }
    normalized.sort();
    normalized.dedup();

    let mut prefix = String::from(ID_NAMESPACE);
    for label in &normalized {
        prefix.push_str(ID_SEPARATOR);
        prefix.push_str(label);
    }
    prefix.push_str(ID_SEPARATOR);
    Ok(prefix)
}

/// Join a prefix from [`id_prefix`] with a suffix.
pub fn compose_id(prefix: &str, suffix: &str) -> String {
    format!("{}{}", prefix, suffix)
}

/// Generate a fresh id for a record carrying the given labels.
pub fn generate_id<S: AsRef<str>>(labels: &[S]) -> LarderResult<String> {
    let prefix = id_prefix(labels)?;
    Ok(compose_id(&prefix, &random_suffix()))
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_SUFFIX_LEN)
        .map(char::from)
        .collect()
}
