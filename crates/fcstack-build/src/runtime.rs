//! Runtime eligibility for linked (hot-update) builds.

/// Runtime identifier prefixes that always qualify for linked builds.
///
/// These are the interpreted runtimes: they read source files at
/// invocation time, so symlinked artifacts behave identically to copies.
const LINKABLE_PREFIXES: [&str; 3] = ["node", "python", "php"];

/// Decide whether a runtime qualifies for a linked build.
///
/// True when `runtime` starts with one of [`LINKABLE_PREFIXES`] (any
/// suffix, so `node14` and `python3.10` qualify), or when the runtime is
/// exactly `custom` and the caller opted in with `use_link`. Matching is
/// case-sensitive with no normalization.
///
/// # Examples
///
/// ```
/// use fcstack_build::is_link_eligible;
///
/// assert!(is_link_eligible("node14", false));
/// assert!(is_link_eligible("custom", true));
/// assert!(!is_link_eligible("go1", true));
/// ```
#[must_use]
pub fn is_link_eligible(runtime: &str, use_link: bool) -> bool {
    if LINKABLE_PREFIXES.iter().any(|p| runtime.starts_with(p)) {
        return true;
    }
    runtime == "custom" && use_link
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_accept_interpreted_prefixes_regardless_of_flag() {
        for runtime in ["node", "node14", "nodejs16", "python3.10", "php7.2"] {
            assert!(is_link_eligible(runtime, false), "expected eligible: {runtime}");
            assert!(is_link_eligible(runtime, true), "expected eligible: {runtime}");
        }
    }

    #[test]
    fn test_should_accept_custom_only_with_flag() {
        assert!(is_link_eligible("custom", true));
        assert!(!is_link_eligible("custom", false));
    }

    #[test]
    fn test_should_reject_compiled_runtimes() {
        assert!(!is_link_eligible("go1", false));
        assert!(!is_link_eligible("go1", true));
        assert!(!is_link_eligible("java11", false));
        assert!(!is_link_eligible("dotnetcore3.1", true));
    }

    #[test]
    fn test_should_match_case_sensitively() {
        assert!(!is_link_eligible("Node14", false));
        assert!(!is_link_eligible("CUSTOM", true));
    }
}
