//! Build metadata embedded by `build.rs`, shown by `quiver --version`.

pub const GIT_HASH: &str = env!("QUIVER_GIT_HASH");

pub const BUILD_PROFILE: &str = env!("QUIVER_BUILD_PROFILE");

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `"0.1.0 (abc1234, debug)"`
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("QUIVER_GIT_HASH"),
    ", ",
    env!("QUIVER_BUILD_PROFILE"),
    ")"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_version() {
        assert!(LONG_VERSION.starts_with(VERSION));
        assert!(LONG_VERSION.contains(GIT_HASH));
        assert!(LONG_VERSION.ends_with(&format!("{BUILD_PROFILE})")));
        assert!(!GIT_HASH.is_empty());
    }
}
