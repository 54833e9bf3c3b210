//! Version command implementation.

use clap::Args;

use vidlens_core::ios_println;
use vidlens_core::iostreams::IOStreams;

/// Show vidlens version information.
#[derive(Debug, Args)]
pub struct VersionArgs {}

impl VersionArgs {
    /// Run the version command.
    pub fn run(&self, ios: &IOStreams, version: &str) {
        ios_println!(ios, "{}", format_version(version, env!("CARGO_PKG_REPOSITORY")));
    }
}

/// Format version info for display, with the project URL on a second line
/// when one is known.
pub fn format_version(version: &str, repository: &str) -> String {
    if repository.is_empty() {
        format!("vidlens version {version}")
    } else {
        format!("vidlens version {version}\n{repository}/releases/tag/v{version}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_format_version_without_repository() {
        assert_eq!(format_version("0.1.0", ""), "vidlens version 0.1.0");
    }

    #[test]
    fn test_should_format_version_with_release_link() {
        assert_eq!(
            format_version("0.1.0", "https://github.com/vidlens/vidlens"),
            "vidlens version 0.1.0\nhttps://github.com/vidlens/vidlens/releases/tag/v0.1.0",
        );
    }

    #[test]
    fn test_should_print_version_to_stdout() {
        let (ios, output) = IOStreams::test_with_output();
        VersionArgs {}.run(&ios, "1.2.3");
        assert!(output.stdout().starts_with("vidlens version 1.2.3\n"));
    }
}
