//! Zone ordinal normalization.
//!
//! Zone ids end in an ordinal (`usw1-az3` is ordinal 3). Accounts may see gaps
//! in that numbering, so address space is reserved for every ordinal from 1 up
//! to the highest one observed. Missing ordinals get a placeholder id that
//! consumes a subnet but is never emitted.

use std::sync::LazyLock;

use log::warn;
use regex::Regex;

use crate::error::PlanError;

/// Highest zone ordinal the planner accepts
pub const MAX_ZONE_ORDINAL: u8 = 9;

/// Match: "<stem><digits>" with the digits at the very end
static ZONE_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)(\d+)$").expect("Invalid zone id regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Real,
    Placeholder,
}

/// One position in a region's contiguous zone sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneSlot {
    pub ordinal: u8,
    pub zone_id: String,
    pub kind: SlotKind,
}

impl ZoneSlot {
    pub fn is_real(&self) -> bool {
        self.kind == SlotKind::Real
    }
}

/// Contiguous zone sequence `1..=max` for one region
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedZones {
    pub slots: Vec<ZoneSlot>,
}

impl NormalizedZones {
    pub fn real_zone_ids(&self) -> Vec<String> {
        self.slots
            .iter()
            .filter(|slot| slot.is_real())
            .map(|slot| slot.zone_id.clone())
            .collect()
    }

    pub fn has_gaps(&self) -> bool {
        self.slots.iter().any(|slot| !slot.is_real())
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Split a zone id into its stem and single-digit ordinal
pub fn parse_zone_ordinal<'a>(region: &str, zone_id: &'a str) -> Result<(&'a str, u8), PlanError> {
    let caps = ZONE_ID_PATTERN
        .captures(zone_id)
        .ok_or_else(|| PlanError::MalformedZoneId {
            region: region.to_string(),
            zone_id: zone_id.to_string(),
        })?;

    let stem = caps.get(1).map_or("", |m| m.as_str());
    let digits = caps.get(2).map_or("", |m| m.as_str());

    let unsupported = || PlanError::UnsupportedZoneOrdinal {
        region: region.to_string(),
        zone_id: zone_id.to_string(),
    };

    if digits.len() != 1 {
        return Err(unsupported());
    }
    match digits.parse::<u8>() {
        Ok(ordinal) if (1..=MAX_ZONE_ORDINAL).contains(&ordinal) => Ok((stem, ordinal)),
        _ => Err(unsupported()),
    }
}

/// Expand sorted real zone ids into the full ordinal sequence
pub fn normalize_zones(region: &str, zone_ids: &[String]) -> Result<NormalizedZones, PlanError> {
    let Some(first) = zone_ids.first() else {
        return Ok(NormalizedZones::default());
    };
    let (stem, _) = parse_zone_ordinal(region, first)?;

    let mut real: [Option<&String>; MAX_ZONE_ORDINAL as usize] = Default::default();
    for zone_id in zone_ids {
        let (_, ordinal) = parse_zone_ordinal(region, zone_id)?;
        let slot = &mut real[ordinal as usize - 1];
        if let Some(existing) = slot {
            return Err(PlanError::DuplicateZoneOrdinal {
                region: region.to_string(),
                ordinal,
                first: existing.to_string(),
                second: zone_id.clone(),
            });
        }
        *slot = Some(zone_id);
    }

    let highest = real.iter().rposition(Option::is_some).map_or(0, |i| i + 1);
    let slots: Vec<ZoneSlot> = (1..=highest as u8)
        .map(|ordinal| match real[ordinal as usize - 1] {
            Some(zone_id) => ZoneSlot {
                ordinal,
                zone_id: zone_id.clone(),
                kind: SlotKind::Real,
            },
            None => ZoneSlot {
                ordinal,
                zone_id: format!("{}{}", stem, ordinal),
                kind: SlotKind::Placeholder,
            },
        })
        .collect();

    let normalized = NormalizedZones { slots };
    if normalized.has_gaps() {
        let synthetic: Vec<&str> = normalized.slots.iter().map(|s| s.zone_id.as_str()).collect();
        warn!(
            "[{}] Region has zone gaps: {:?} (allocating {:?} for future use anyway)",
            region, zone_ids, synthetic
        );
    }

    Ok(normalized)
}
