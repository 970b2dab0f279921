use anyhow::Result;
use std::collections::HashSet;

use crate::builders::nightly::OverrideToken;
use crate::builders::specifier::Specifier;

/// The `ConfigValidator` trait defines the public interface for linting the
/// manifest's dependency list and the nightly override tokens.
///
/// Validation is advisory: `generate` never consults it, so a token the
/// validator dislikes still behaves exactly as written. The `validate`
/// command is where these checks surface.
pub trait ConfigValidator {
    /// Checks the trimmed dependency list and returns the issues found, one
    /// human-readable string per issue.
    fn validate_manifest(&self, dependencies: &[Specifier]) -> Result<Vec<String>>;

    /// Checks the override tokens against the dependency list and returns
    /// the issues found.
    fn validate_overrides(
        &self,
        dependencies: &[Specifier],
        overrides: &[OverrideToken],
    ) -> Result<Vec<String>>;
}

/// The standard set of checks run by the `validate` command.
pub struct StandardValidator;

impl StandardValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StandardValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidator for StandardValidator {
    fn validate_manifest(&self, dependencies: &[Specifier]) -> Result<Vec<String>> {
        let mut issues = Vec::new();

        for (index, dep) in dependencies.iter().enumerate() {
            if dep.as_str().is_empty() {
                issues.push(format!("Dependency entry {} is empty after trimming", index + 1));
            } else if dep.package_name().is_none() {
                issues.push(format!(
                    "Cannot determine a package name for dependency '{}'",
                    dep.as_str()
                ));
            }
        }

        Ok(issues)
    }

    fn validate_overrides(
        &self,
        dependencies: &[Specifier],
        overrides: &[OverrideToken],
    ) -> Result<Vec<String>> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        for token in overrides {
            if token.raw.is_empty() {
                issues.push(
                    "Override list contains an empty token, it would match every dependency"
                        .to_string(),
                );
                continue;
            }
            if token.raw.chars().any(char::is_whitespace) {
                issues.push(format!("Override '{}' contains whitespace", token.raw));
            }
            if token.raw.matches('/').count() > 1 {
                issues.push(format!(
                    "Override '{}' must be a package name or org/package",
                    token.raw
                ));
            }
            if !seen.insert(token.raw.as_str()) {
                issues.push(format!("Override '{}' is listed more than once", token.raw));
            }

            // Replacement removes by string prefix, not by package name.
            // Warn when that prefix reaches past the token's own name.
            let mut replaces_any = false;
            for dep in dependencies {
                if !dep.as_str().starts_with(token.raw.as_str()) {
                    continue;
                }
                replaces_any = true;
                if let Some(name) = dep.package_name() {
                    if name != token.raw {
                        issues.push(format!(
                            "Override '{}' removes '{}' by prefix although that package is named '{}'",
                            token.raw,
                            dep.as_str(),
                            name
                        ));
                    }
                }
            }
            if !replaces_any {
                issues.push(format!(
                    "Override '{}' does not replace any declared dependency, its nightly entry will only be appended",
                    token.raw
                ));
            }
        }

        Ok(issues)
    }
}
