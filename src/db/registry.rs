// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The versioned catalog of [`DbModel`]s a parser or validator consults.
//!
//! Grounded on `original_source/include/rexsapi/database/ModelRegistry.hxx`.
//! Loading database models from disk/ZIP resources is external to this
//! crate (see spec §1); `DbRegistry` only holds models handed to it, and
//! resolves version/language lookups, including the relaxed-mode fallback
//! behavior.

use crate::config::Mode;
use crate::db::model::DbModel;

/// A parsed REXS version, e.g. `1.5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    pub fn parse(s: &str) -> Option<Version> {
        let mut parts = s.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next()?.parse().ok()?;
        Some(Version::new(major, minor))
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Holds every [`DbModel`] known to the process and resolves
/// version/language lookups against them.
#[derive(Debug, Clone, Default)]
pub struct DbRegistry {
    models: Vec<DbModel>,
}

impl DbRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, model: DbModel) {
        self.models.push(model);
    }

    pub fn versions(&self) -> Vec<Version> {
        let mut versions: Vec<Version> =
            self.models.iter().filter_map(|m| Version::parse(&m.version)).collect();
        versions.sort();
        versions.dedup();
        versions
    }

    pub fn languages_for(&self, version: Version) -> Vec<String> {
        self.models
            .iter()
            .filter(|m| Version::parse(&m.version) == Some(version))
            .map(|m| m.language.clone())
            .collect()
    }

    /// Looks up the database model for an exact version/language pair.
    ///
    /// In [`Mode::Relaxed`], a missing exact match falls back to the highest
    /// registered version of the requested language, or the highest
    /// registered version under `"en"` if that is newer still — scanning the
    /// whole registry with no ceiling at `version`, since a newer database
    /// model is expected to be a superset of an older one.
    pub fn find(&self, version: Version, language: &str, mode: Mode) -> Option<&DbModel> {
        if let Some(exact) = self.exact(version, language) {
            return Some(exact);
        }
        if mode == Mode::Strict {
            return None;
        }
        let mut best: Option<&DbModel> = None;
        for model in &self.models {
            let Some(model_version) = Version::parse(&model.version) else { continue };
            let threshold = best.and_then(|m| Version::parse(&m.version));
            if model.language == language && threshold.map_or(true, |t| model_version >= t) {
                best = Some(model);
            } else if model.language == "en" && threshold.map_or(true, |t| model_version > t) {
                best = Some(model);
            }
        }
        best
    }

    fn exact(&self, version: Version, language: &str) -> Option<&DbModel> {
        self.models
            .iter()
            .find(|m| Version::parse(&m.version) == Some(version) && m.language == language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::model::DbModel;

    fn model(version: &str, language: &str) -> DbModel {
        DbModel::new(version, language)
    }

    #[test]
    fn strict_mode_requires_exact_match() {
        let mut registry = DbRegistry::new();
        registry.register(model("1.5", "en"));
        assert!(registry.find(Version::new(1, 5), "de", Mode::Strict).is_none());
        assert!(registry.find(Version::new(1, 5), "en", Mode::Strict).is_some());
    }

    #[test]
    fn relaxed_mode_falls_back_to_english() {
        let mut registry = DbRegistry::new();
        registry.register(model("1.5", "en"));
        let found = registry.find(Version::new(1, 5), "de", Mode::Relaxed);
        assert!(found.is_some());
        assert_eq!(found.unwrap().language, "en");
    }

    #[test]
    fn relaxed_mode_falls_back_to_older_version() {
        let mut registry = DbRegistry::new();
        registry.register(model("1.3", "en"));
        let found = registry.find(Version::new(1, 5), "en", Mode::Relaxed);
        assert!(found.is_some());
        assert_eq!(found.unwrap().version, "1.3");
    }

    #[test]
    fn relaxed_mode_falls_forward_to_a_newer_version() {
        let mut registry = DbRegistry::new();
        registry.register(model("1.6", "en"));
        let found = registry.find(Version::new(1, 5), "en", Mode::Relaxed);
        assert!(found.is_some());
        assert_eq!(found.unwrap().version, "1.6");
    }

    #[test]
    fn relaxed_mode_prefers_highest_version_overall() {
        let mut registry = DbRegistry::new();
        registry.register(model("1.3", "en"));
        registry.register(model("1.5", "de"));
        registry.register(model("1.6", "en"));
        let found = registry.find(Version::new(1, 5), "fr", Mode::Relaxed);
        assert!(found.is_some());
        assert_eq!(found.unwrap().version, "1.6");
    }
}
