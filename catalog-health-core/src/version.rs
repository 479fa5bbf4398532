//! Version drift and version health.
//!
//! A delivered (contracted) version loses health for every component it trails
//! the current model version by: 30 points per major, 15 per minor and 5 per
//! patch. Tracking several delivered versions at once costs a further flat 15
//! points per extra version.

use std::fmt;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ColorKey;
use crate::error::{CatalogHealthError, Result};

/// Health points lost per major version behind.
pub const MAJOR_DROP: i64 = 30;
/// Health points lost per minor version behind.
pub const MINOR_DROP: i64 = 15;
/// Health points lost per patch version behind.
pub const PATCH_DROP: i64 = 5;
/// Health points lost per delivered version beyond the first.
pub const MULTI_VERSION_PENALTY: i64 = 15;

/// A parsed `major.minor.patch` version.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub struct VersionTriple {
    /// Major component.
    pub major: u32,
    /// Minor component.
    pub minor: u32,
    /// Patch component.
    pub patch: u32,
}

impl VersionTriple {
    /// Create a version from its components.
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for VersionTriple {
    type Err = CatalogHealthError;

    fn from_str(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.trim().split('.').collect();
        if parts.len() != 3 {
            return Err(CatalogHealthError::invalid_version(
                input,
                format!("expected 3 components, found {}", parts.len()),
            ));
        }
        let component = |index: usize| -> Result<u32> {
            let part = parts[index].trim();
            if part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit()) {
                return Err(CatalogHealthError::invalid_version(
                    input,
                    format!("component {} ({part:?}) is not a number", index + 1),
                ));
            }
            part.parse().map_err(|_| {
                CatalogHealthError::invalid_version(
                    input,
                    format!("component {} ({part:?}) is out of range", index + 1),
                )
            })
        };
        Ok(Self::new(component(0)?, component(1)?, component(2)?))
    }
}

impl fmt::Display for VersionTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Parse a `major.minor.patch` string.
pub fn parse_version(input: &str) -> Result<VersionTriple> {
    input.parse()
}

/// One delivered version or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeliveredVersions {
    /// A single delivered version.
    One(String),
    /// Several delivered versions, in the order the agreement lists them.
    Many(Vec<String>),
}

impl DeliveredVersions {
    /// Delivered versions as a slice.
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::One(version) => std::slice::from_ref(version),
            Self::Many(versions) => versions,
        }
    }

    /// True when there is nothing to compare: an empty list or a blank string.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::One(version) => version.trim().is_empty(),
            Self::Many(versions) => versions.is_empty(),
        }
    }
}

impl From<&str> for DeliveredVersions {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<String> for DeliveredVersions {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<Vec<String>> for DeliveredVersions {
    fn from(value: Vec<String>) -> Self {
        Self::Many(value)
    }
}

impl From<&[&str]> for DeliveredVersions {
    fn from(value: &[&str]) -> Self {
        Self::Many(value.iter().map(|version| version.to_string()).collect())
    }
}

/// Signed component differences, `current - delivered`.
///
/// Negative values mean the delivered version is ahead of the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VersionDrift {
    /// Major difference.
    pub major: i64,
    /// Minor difference.
    pub minor: i64,
    /// Patch difference.
    pub patch: i64,
}

impl VersionDrift {
    /// Drift of `delivered` relative to `current`.
    pub fn between(delivered: VersionTriple, current: VersionTriple) -> Self {
        Self {
            major: i64::from(current.major) - i64::from(delivered.major),
            minor: i64::from(current.minor) - i64::from(delivered.minor),
            patch: i64::from(current.patch) - i64::from(delivered.patch),
        }
    }

    /// Health points lost per component.
    pub fn drops(&self) -> VersionDrops {
        VersionDrops {
            major: self.major * MAJOR_DROP,
            minor: self.minor * MINOR_DROP,
            patch: self.patch * PATCH_DROP,
        }
    }
}

/// Health points lost per component; negative when the delivered version is ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VersionDrops {
    /// Points lost to the major difference.
    pub major: i64,
    /// Points lost to the minor difference.
    pub minor: i64,
    /// Points lost to the patch difference.
    pub patch: i64,
}

impl VersionDrops {
    /// Combined drop.
    pub fn total(&self) -> i64 {
        self.major + self.minor + self.patch
    }
}

/// Health of one delivered version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VersionDetail {
    /// Delivered version as supplied.
    pub version: String,
    /// `clamp(100 - total_drop, 0, 100)`.
    pub health: u8,
    /// Component differences against the current version.
    pub drift: VersionDrift,
    /// Points lost per component.
    pub drops: VersionDrops,
    /// Sum of the per-component drops.
    pub total_drop: i64,
}

impl VersionDetail {
    fn compute(version: &str, delivered: VersionTriple, current: VersionTriple) -> Self {
        let drift = VersionDrift::between(delivered, current);
        let drops = drift.drops();
        let total_drop = drops.total();
        Self {
            version: version.to_string(),
            health: (100 - total_drop).clamp(0, 100) as u8,
            drift,
            drops,
            total_drop,
        }
    }

    /// Whether this version trails the current one.
    pub fn is_behind(&self) -> bool {
        self.total_drop > 0
    }
}

/// Overall version health of an agreement or contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VersionHealthResult {
    /// Final health, 0-100.
    pub health: u8,
    /// `health < 100`.
    pub is_behind: bool,
    /// Current model version the deliveries were compared against.
    pub current_version: String,
    /// Delivered versions, in input order.
    pub versions: Vec<String>,
    /// Per-version health, in input order.
    pub per_version_detail: Vec<VersionDetail>,
    /// Flat penalty for tracking more than one delivered version.
    pub multi_version_penalty: i64,
}

impl VersionHealthResult {
    /// Color band for the health bar.
    pub fn color(&self) -> ColorKey {
        ColorKey::for_health(self.health)
    }
}

/// Compute version health for one or more delivered versions against
/// `current`.
///
/// Returns `Ok(None)` when either side is missing. The best per-version health
/// is kept, then reduced by [`MULTI_VERSION_PENALTY`] for every delivered
/// version beyond the first, never dropping below zero.
pub fn compute_version_health(
    delivered: &DeliveredVersions,
    current: &str,
) -> Result<Option<VersionHealthResult>> {
    if delivered.is_missing() || current.trim().is_empty() {
        return Ok(None);
    }

    let current_triple = parse_version(current).inspect_err(|err| warn!("{err}"))?;
    let mut details = Vec::with_capacity(delivered.as_slice().len());
    for version in delivered.as_slice() {
        let triple = parse_version(version).inspect_err(|err| warn!("{err}"))?;
        details.push(VersionDetail::compute(version, triple, current_triple));
    }

    let max_health = details
        .iter()
        .map(|detail| i64::from(detail.health))
        .max()
        .unwrap_or(0);
    let multi_version_penalty = (details.len() as i64 - 1) * MULTI_VERSION_PENALTY;
    let health = (max_health - multi_version_penalty).max(0) as u8;

    Ok(Some(VersionHealthResult {
        health,
        is_behind: health < 100,
        current_version: current.to_string(),
        versions: delivered.as_slice().to_vec(),
        per_version_detail: details,
        multi_version_penalty,
    }))
}
