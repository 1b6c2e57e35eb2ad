//! CLI commands module
//!
//! Contains all CLI command implementations.

pub mod report;
pub mod serve;

use std::path::PathBuf;
use std::process::ExitCode;

use glm_quota_core::CredentialResolver;

use crate::output::OutputFormat;

/// Shared context for all commands
pub struct Context {
    pub resolver: CredentialResolver,
    pub format: OutputFormat,
    pub quiet: bool,
}

impl Context {
    pub fn new(format: OutputFormat, quiet: bool, settings: Option<&str>) -> Self {
        let resolver = match settings {
            Some(path) => CredentialResolver::with_settings_path(expand_path(path)),
            None => CredentialResolver::new(),
        };

        Self {
            resolver,
            format,
            quiet,
        }
    }
}

/// How a command finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Missing configuration or user interrupt; the message is already printed
    Failure,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Failure => ExitCode::FAILURE,
        }
    }
}

/// Expand `~` and environment variables in a user-supplied path
pub fn expand_path(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path)
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| path.to_string());
    PathBuf::from(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_path_plain() {
        assert_eq!(expand_path("/tmp/settings.json"), PathBuf::from("/tmp/settings.json"));
    }

    #[test]
    fn test_context_uses_settings_override() {
        let ctx = Context::new(OutputFormat::Json, true, Some("/tmp/glm/settings.json"));
        assert_eq!(
            ctx.resolver.settings_path(),
            std::path::Path::new("/tmp/glm/settings.json")
        );
        assert!(ctx.quiet);
    }
}
