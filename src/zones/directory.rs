//! Region to availability zone directory.
//!
//! The directory is the discovered set of zones an account can see in each
//! region. It is produced outside the planner (usually cached as
//! `cache.myregions.json`) and consumed here as static input.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::PlanError;

/// Zones visible in one region
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionZones {
    #[serde(rename = "ZoneName", default)]
    pub zone_names: Vec<String>,
    #[serde(rename = "ZoneId", default)]
    pub zone_ids: Vec<String>,
}

impl RegionZones {
    pub fn new<N, I>(zone_names: N, zone_ids: I) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            zone_names: zone_names.into_iter().map(Into::into).collect(),
            zone_ids: zone_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Zone ids in sorted order, after checking names and ids pair up
    pub fn sorted_zone_ids(&self, region: &str) -> Result<Vec<String>, PlanError> {
        if self.zone_names.len() != self.zone_ids.len() {
            return Err(PlanError::ZoneCountMismatch {
                region: region.to_string(),
                names: self.zone_names.len(),
                ids: self.zone_ids.len(),
            });
        }

        let mut ids = self.zone_ids.clone();
        ids.sort();
        Ok(ids)
    }
}

/// Discovered zones keyed by region id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneDirectory {
    regions: BTreeMap<String, RegionZones>,
}

impl ZoneDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, region: impl Into<String>, zones: RegionZones) {
        self.regions.insert(region.into(), zones);
    }

    /// Zones for `region`, or [`PlanError::RegionUnavailable`] when the
    /// account cannot see it
    pub fn region(&self, region: &str) -> Result<&RegionZones, PlanError> {
        self.regions
            .get(region)
            .ok_or_else(|| PlanError::RegionUnavailable {
                region: region.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl FromIterator<(String, RegionZones)> for ZoneDirectory {
    fn from_iter<T: IntoIterator<Item = (String, RegionZones)>>(iter: T) -> Self {
        Self {
            regions: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_discovery_cache() {
        let json = r#"{
    "us-west-1": {
        "ZoneName": ["us-west-1b", "us-west-1c"],
        "ZoneId": ["usw1-az3", "usw1-az1"]
    }
}"#;

        let directory: ZoneDirectory = serde_json::from_str(json).unwrap();
        assert_eq!(directory.len(), 1);

        let zones = directory.region("us-west-1").unwrap();
        assert_eq!(zones.zone_names, vec!["us-west-1b", "us-west-1c"]);
        assert_eq!(
            zones.sorted_zone_ids("us-west-1").unwrap(),
            vec!["usw1-az1", "usw1-az3"]
        );
    }

    #[test]
    fn test_missing_region_is_unavailable() {
        let directory = ZoneDirectory::new();
        let err = directory.region("eu-south-1").unwrap_err();
        assert!(matches!(err, PlanError::RegionUnavailable { ref region } if region == "eu-south-1"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_zone_count_mismatch() {
        let zones = RegionZones::new(["use1-a", "use1-b"], ["use1-az1"]);
        let err = zones.sorted_zone_ids("us-east-1").unwrap_err();
        assert!(matches!(err, PlanError::ZoneCountMismatch { names: 2, ids: 1, .. }));
        assert!(!err.is_recoverable());
    }
}
