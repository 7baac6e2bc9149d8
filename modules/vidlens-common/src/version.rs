//! Explicit artifact versioning. Staleness is detected by comparing these
//! fields structurally — never by wall-clock mtimes, which drift across
//! machines and backups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bump when any scoring or summarization heuristic changes semantics.
pub const ENGINE_VERSION: u32 = 1;

/// Bump when the video-type classification weights or signals change.
pub const CLASSIFIER_VERSION: u32 = 1;

/// Version metadata carried by every persisted artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionStamp {
    pub engine_version: u32,
    pub registry_version: u32,
    pub classifier_version: u32,
    pub computed_at: DateTime<Utc>,
}

impl VersionStamp {
    /// Stamp for an artifact computed right now with the installed versions.
    pub fn now(registry_version: u32) -> Self {
        Self {
            engine_version: ENGINE_VERSION,
            registry_version,
            classifier_version: CLASSIFIER_VERSION,
            computed_at: Utc::now(),
        }
    }

    /// True when this artifact was produced by the currently installed
    /// engine, registry, and classifier. `computed_at` is deliberately
    /// excluded — recency is not currency.
    pub fn is_current(&self, registry_version: u32) -> bool {
        self.engine_version == ENGINE_VERSION
            && self.registry_version == registry_version
            && self.classifier_version == CLASSIFIER_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_stamp_is_current() {
        let stamp = VersionStamp::now(3);
        assert!(stamp.is_current(3));
    }

    #[test]
    fn registry_bump_invalidates_stamp() {
        let stamp = VersionStamp::now(3);
        assert!(!stamp.is_current(4));
    }

    #[test]
    fn computed_at_does_not_affect_currency() {
        let mut stamp = VersionStamp::now(1);
        stamp.computed_at = stamp.computed_at - chrono::Duration::days(400);
        assert!(stamp.is_current(1));
    }
}
