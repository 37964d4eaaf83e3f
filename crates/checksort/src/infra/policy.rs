//! Per-document opt-in/opt-out policy lookups.

use std::path::Path;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::infra::config::Policy;

/// Tri-state answer for a single document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentPolicy {
    Enabled,
    Disabled,
    Unspecified,
}

/// Resolves the configured glob lists against document paths. An explicit
/// disable entry wins over an enable entry.
#[derive(Debug)]
pub struct PolicyLookup {
    enable: GlobSet,
    disable: GlobSet,
}

impl PolicyLookup {
    pub fn from_config(policy: &Policy) -> Result<Self> {
        Ok(Self {
            enable: build_globset(&policy.enable)?,
            disable: build_globset(&policy.disable)?,
        })
    }

    pub fn lookup(&self, path: &Path) -> DocumentPolicy {
        if self.disable.is_match(path) {
            DocumentPolicy::Disabled
        } else if self.enable.is_match(path) {
            DocumentPolicy::Enabled
        } else {
            DocumentPolicy::Unspecified
        }
    }

    /// Hosts treat anything not explicitly disabled as fair game.
    pub fn allows(&self, path: &Path) -> bool {
        self.lookup(path) != DocumentPolicy::Disabled
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            continue;
        }
        let glob = Glob::new(trimmed)
            .with_context(|| format!("invalid policy glob pattern: {trimmed}"))?;
        builder.add(glob);
    }
    builder.build().context("failed to build policy glob set")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(enable: &[&str], disable: &[&str]) -> PolicyLookup {
        let policy = Policy {
            enable: enable.iter().map(|s| s.to_string()).collect(),
            disable: disable.iter().map(|s| s.to_string()).collect(),
        };
        PolicyLookup::from_config(&policy).unwrap()
    }

    #[test]
    fn unlisted_documents_are_unspecified() {
        let lookup = lookup(&[], &[]);
        assert_eq!(
            lookup.lookup(Path::new("notes.md")),
            DocumentPolicy::Unspecified
        );
        assert!(lookup.allows(Path::new("notes.md")));
    }

    #[test]
    fn disable_wins_over_enable() {
        let lookup = lookup(&["**/*.md"], &["journal/**"]);
        assert_eq!(
            lookup.lookup(Path::new("journal/today.md")),
            DocumentPolicy::Disabled
        );
        assert_eq!(
            lookup.lookup(Path::new("work/tasks.md")),
            DocumentPolicy::Enabled
        );
        assert!(!lookup.allows(Path::new("journal/today.md")));
    }

    #[test]
    fn empty_patterns_are_skipped() {
        let lookup = lookup(&["", "  "], &[""]);
        assert_eq!(
            lookup.lookup(Path::new("anything.md")),
            DocumentPolicy::Unspecified
        );
    }
}
