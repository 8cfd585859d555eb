//! Storage keys. Every key shares the `sum-safari:` namespace.

pub const PREFIX: &str = "sum-safari:";

/// Persisted `GlobalSettings`.
pub const SETTINGS: &str = "sum-safari:settings";

/// Snapshot of the in-progress session.
pub const CURRENT_SESSION: &str = "sum-safari:current-session";

/// Prefix an arbitrary record name with the shared namespace.
#[must_use]
pub fn namespaced(name: &str) -> String {
    format!("{PREFIX}{name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_keys_match_namespaced_names() {
        assert_eq!(namespaced("settings"), SETTINGS);
        assert_eq!(namespaced("current-session"), CURRENT_SESSION);
    }
}
