// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec configuration.
//!
//! # Architecture
//!
//! - **Level 1 (Static)**: wire constants fixed by the Hessian 2.0 grammar
//! - **Level 2 (Dynamic)**: [`CodecConfig`] limits and policies, set in code,
//!   from `HESSIAN_*` environment variables, or (feature `config-loaders`)
//!   from YAML
//!
//! # Example
//!
//! ```
//! use hessian_bridge::config::{CodecConfig, UnknownCompositePolicy};
//!
//! let config = CodecConfig::default()
//!     .with_max_depth(32)
//!     .with_unknown_composite(UnknownCompositePolicy::Retain);
//! assert_eq!(config.max_depth, 32);
//! ```

use std::fmt;
use std::str::FromStr;

// =======================================================================
// Wire constants
// =======================================================================

/// Default nesting limit for lists, maps and composites.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default cap on list/map entries, string units and binary bytes.
pub const DEFAULT_MAX_COLLECTION_LEN: usize = 16 * 1024 * 1024;

/// Default cap on bytes re-read while resolving back references.
pub const DEFAULT_MAX_REPLAY_BYTES: usize = 4 * 1024 * 1024;

/// UTF-16 units per string chunk (`'R'` chunks carry exactly this many,
/// minus one when a surrogate pair would be split).
pub const STRING_CHUNK_UNITS: usize = 0x8000;

/// Bytes per binary chunk.
pub const BINARY_CHUNK_LEN: usize = 0x8000;

/// Class definitions addressable by the one-byte object form (`0x60..0x6f`).
pub const COMPACT_CLASS_REFS: usize = 16;

// =======================================================================
// Runtime configuration
// =======================================================================

/// What the decoder does with a composite whose identifier is not registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config-loaders", derive(serde::Deserialize))]
#[cfg_attr(feature = "config-loaders", serde(rename_all = "lowercase"))]
pub enum UnknownCompositePolicy {
    /// Fail with `UnknownCompositeType`.
    #[default]
    Fail,
    /// Consume the instance and yield `Value::Null`.
    Skip,
    /// Keep the instance as an untyped `Value::Composite`.
    Retain,
}

impl FromStr for UnknownCompositePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "skip" => Ok(Self::Skip),
            "retain" => Ok(Self::Retain),
            other => Err(format!("Invalid unknown composite policy: {}", other)),
        }
    }
}

impl fmt::Display for UnknownCompositePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fail => "fail",
            Self::Skip => "skip",
            Self::Retain => "retain",
        })
    }
}

/// Limits and policies shared by encoders and decoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Maximum nesting of lists, maps and composites.
    pub max_depth: usize,
    /// Maximum entries in a list or map, units in a string, bytes in a binary.
    pub max_collection_len: usize,
    /// Budget of input bytes re-read for `'Q'` back references, summed over
    /// one decoder (nested references included).
    pub max_replay_bytes: usize,
    pub unknown_composite: UnknownCompositePolicy,
    /// Whether `decode_message` rejects input left after the last field.
    pub reject_trailing_bytes: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_collection_len: DEFAULT_MAX_COLLECTION_LEN,
            max_replay_bytes: DEFAULT_MAX_REPLAY_BYTES,
            unknown_composite: UnknownCompositePolicy::Fail,
            reject_trailing_bytes: true,
        }
    }
}

impl CodecConfig {
    /// Defaults overridden by `HESSIAN_*` environment variables.
    ///
    /// Unset or unparsable variables fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_depth: std::env::var("HESSIAN_MAX_DEPTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_depth),
            max_collection_len: std::env::var("HESSIAN_MAX_COLLECTION_LEN")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_collection_len),
            max_replay_bytes: std::env::var("HESSIAN_MAX_REPLAY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_replay_bytes),
            unknown_composite: std::env::var("HESSIAN_UNKNOWN_COMPOSITE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.unknown_composite),
            reject_trailing_bytes: std::env::var("HESSIAN_REJECT_TRAILING_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.reject_trailing_bytes),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_collection_len(mut self, max_collection_len: usize) -> Self {
        self.max_collection_len = max_collection_len;
        self
    }

    pub fn with_max_replay_bytes(mut self, max_replay_bytes: usize) -> Self {
        self.max_replay_bytes = max_replay_bytes;
        self
    }

    pub fn with_unknown_composite(mut self, policy: UnknownCompositePolicy) -> Self {
        self.unknown_composite = policy;
        self
    }

    pub fn with_reject_trailing_bytes(mut self, reject: bool) -> Self {
        self.reject_trailing_bytes = reject;
        self
    }
}

// =======================================================================
// YAML loader
// =======================================================================

#[cfg(feature = "config-loaders")]
mod yaml {
    use super::{CodecConfig, UnknownCompositePolicy};
    use serde::Deserialize;
    use std::fs;
    use std::path::Path;

    /// Root YAML document.
    ///
    /// ```yaml
    /// codec:
    ///   max_depth: 64
    ///   max_collection_len: 65536
    ///   max_replay_bytes: 1048576
    ///   unknown_composite: retain
    ///   reject_trailing_bytes: false
    /// ```
    #[derive(Debug, Deserialize, Default)]
    pub struct YamlCodecDocument {
        #[serde(default)]
        pub codec: YamlCodecConfig,
    }

    /// `codec` section; absent keys keep their defaults.
    #[derive(Debug, Deserialize, Default)]
    #[serde(default, deny_unknown_fields)]
    pub struct YamlCodecConfig {
        pub max_depth: Option<usize>,
        pub max_collection_len: Option<usize>,
        pub max_replay_bytes: Option<usize>,
        pub unknown_composite: Option<UnknownCompositePolicy>,
        pub reject_trailing_bytes: Option<bool>,
    }

    impl CodecConfig {
        /// Parse a YAML document (see [`YamlCodecDocument`]).
        pub fn from_yaml_str(yaml_content: &str) -> Result<Self, String> {
            let doc: YamlCodecDocument = serde_yaml::from_str(yaml_content)
                .map_err(|e| format!("Failed to parse YAML: {}", e))?;
            let defaults = Self::default();
            let section = doc.codec;
            Ok(Self {
                max_depth: section.max_depth.unwrap_or(defaults.max_depth),
                max_collection_len: section
                    .max_collection_len
                    .unwrap_or(defaults.max_collection_len),
                max_replay_bytes: section
                    .max_replay_bytes
                    .unwrap_or(defaults.max_replay_bytes),
                unknown_composite: section
                    .unknown_composite
                    .unwrap_or(defaults.unknown_composite),
                reject_trailing_bytes: section
                    .reject_trailing_bytes
                    .unwrap_or(defaults.reject_trailing_bytes),
            })
        }

        pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
            let content = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read YAML file: {}", e))?;
            Self::from_yaml_str(&content)
        }
    }
}

#[cfg(feature = "config-loaders")]
pub use yaml::{YamlCodecConfig, YamlCodecDocument};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CodecConfig::default();
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.max_collection_len, DEFAULT_MAX_COLLECTION_LEN);
        assert_eq!(config.max_replay_bytes, DEFAULT_MAX_REPLAY_BYTES);
        assert_eq!(config.unknown_composite, UnknownCompositePolicy::Fail);
        assert!(config.reject_trailing_bytes);
    }

    #[test]
    fn test_builders() {
        let config = CodecConfig::default()
            .with_max_depth(4)
            .with_max_collection_len(10)
            .with_max_replay_bytes(64)
            .with_unknown_composite(UnknownCompositePolicy::Skip)
            .with_reject_trailing_bytes(false);
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.max_collection_len, 10);
        assert_eq!(config.max_replay_bytes, 64);
        assert_eq!(config.unknown_composite, UnknownCompositePolicy::Skip);
        assert!(!config.reject_trailing_bytes);
    }

    #[test]
    fn test_policy_parse_is_case_insensitive() {
        assert_eq!(
            "Retain".parse::<UnknownCompositePolicy>(),
            Ok(UnknownCompositePolicy::Retain)
        );
        assert_eq!(
            " skip ".parse::<UnknownCompositePolicy>(),
            Ok(UnknownCompositePolicy::Skip)
        );
        assert!("drop".parse::<UnknownCompositePolicy>().is_err());
        assert_eq!(UnknownCompositePolicy::Fail.to_string(), "fail");
    }

    #[test]
    fn test_from_env_reads_overrides() {
        // Single test touches the environment to avoid races between tests.
        std::env::set_var("HESSIAN_MAX_DEPTH", "7");
        std::env::set_var("HESSIAN_UNKNOWN_COMPOSITE", "retain");
        std::env::set_var("HESSIAN_MAX_COLLECTION_LEN", "not-a-number");
        let config = CodecConfig::from_env();
        std::env::remove_var("HESSIAN_MAX_DEPTH");
        std::env::remove_var("HESSIAN_UNKNOWN_COMPOSITE");
        std::env::remove_var("HESSIAN_MAX_COLLECTION_LEN");

        assert_eq!(config.max_depth, 7);
        assert_eq!(config.unknown_composite, UnknownCompositePolicy::Retain);
        assert_eq!(config.max_collection_len, DEFAULT_MAX_COLLECTION_LEN);
        assert!(config.reject_trailing_bytes);
    }

    #[cfg(feature = "config-loaders")]
    mod yaml {
        use super::*;
        use std::io::Write;

        #[test]
        fn test_parse_partial_yaml() {
            let config = CodecConfig::from_yaml_str(
                "codec:\n  max_depth: 16\n  unknown_composite: skip\n  max_replay_bytes: 512\n",
            )
            .unwrap();
            assert_eq!(config.max_depth, 16);
            assert_eq!(config.unknown_composite, UnknownCompositePolicy::Skip);
            assert_eq!(config.max_replay_bytes, 512);
            assert_eq!(config.max_collection_len, DEFAULT_MAX_COLLECTION_LEN);
        }

        #[test]
        fn test_empty_document() {
            assert_eq!(CodecConfig::from_yaml_str("{}").unwrap(), CodecConfig::default());
        }

        #[test]
        fn test_unknown_key_rejected() {
            let err = CodecConfig::from_yaml_str("codec:\n  max_deep: 3\n").unwrap_err();
            assert!(err.starts_with("Failed to parse YAML"), "{err}");
        }

        #[test]
        fn test_load_from_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "codec:\n  reject_trailing_bytes: false").unwrap();
            let config = CodecConfig::from_yaml_file(file.path()).unwrap();
            assert!(!config.reject_trailing_bytes);
        }
    }
}
