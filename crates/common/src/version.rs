use std::fmt;

use serde::Serialize;

/// Build metadata for a binary linking this crate.
///
/// Construct it with [`build_info!`](crate::build_info) from the binary
/// crate itself, so that the values come from that crate's build script.
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub repo_version: &'static str,
    pub build_profile: &'static str,
    pub rust_version: &'static str,
    pub target: &'static str,
    pub protocol_version: &'static str,
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "delphi {} ({}) protocol {} [{} {}] {}",
            self.version,
            self.repo_version,
            self.protocol_version,
            self.build_profile,
            self.target,
            self.rust_version
        )
    }
}

/// Collect [`BuildInfo`] from the calling crate's compile-time environment.
///
/// Values the build script did not set read as `unknown`.
#[macro_export]
macro_rules! build_info {
    () => {
        $crate::version::BuildInfo {
            version: env!("CARGO_PKG_VERSION"),
            repo_version: option_env!("REPO_VERSION").unwrap_or("unknown"),
            build_profile: option_env!("BUILD_PROFILE").unwrap_or("unknown"),
            rust_version: option_env!("RUST_VERSION").unwrap_or("unknown"),
            target: option_env!("BUILD_TARGET").unwrap_or("unknown"),
            protocol_version: $crate::message::PROTOCOL_VERSION,
        }
    };
}

#[cfg(test)]
mod test {
    #[test]
    fn test_build_info_display() {
        let info = crate::build_info!();
        let text = info.to_string();
        assert!(text.starts_with("delphi "));
        assert!(text.contains("protocol v1"));
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    }
}
