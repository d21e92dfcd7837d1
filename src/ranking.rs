//! Custom visiting order supplied by the user.
//!
//! Ranks are sparse: only some locations carry one. A rank shared by two
//! locations is a conflict the user has to fix, so it is reported instead of
//! being resolved.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{Location, LocationId};
use crate::sorting::sort_by_code;

/// Parses a rank as typed into a form. Blank or non-numeric input means "no
/// rank".
pub fn parse_rank(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// Sparse assignment of custom ranks to location ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomRanks {
    ranks: HashMap<LocationId, i64>,
}

impl CustomRanks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the `custom_rank` of every location that has one.
    pub fn from_locations(locations: &[Location]) -> Self {
        locations
            .iter()
            .filter_map(|location| location.custom_rank.map(|rank| (location.id, rank)))
            .collect()
    }

    /// Builds ranks from raw form input; blank entries are dropped.
    pub fn from_input<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (LocationId, &'a str)>,
    {
        entries
            .into_iter()
            .filter_map(|(id, raw)| parse_rank(raw).map(|rank| (id, rank)))
            .collect()
    }

    /// Sets or clears the rank of `id`.
    pub fn set(&mut self, id: LocationId, rank: Option<i64>) {
        match rank {
            Some(rank) => {
                self.ranks.insert(id, rank);
            }
            None => {
                self.ranks.remove(&id);
            }
        }
    }

    pub fn get(&self, id: LocationId) -> Option<i64> {
        self.ranks.get(&id).copied()
    }

    /// True if at least one id has a rank.
    pub fn is_active(&self) -> bool {
        !self.ranks.is_empty()
    }

    /// True if any of `locations` has a rank.
    pub fn is_active_for(&self, locations: &[Location]) -> bool {
        locations.iter().any(|location| self.ranks.contains_key(&location.id))
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// True if an id other than `id` holds `rank`.
    pub fn is_order_duplicate(&self, id: LocationId, rank: i64) -> bool {
        self.ranks
            .iter()
            .any(|(&other, &other_rank)| other != id && other_rank == rank)
    }

    /// Every rank held by more than one id, with the ids sorted.
    pub fn duplicates(&self) -> BTreeMap<i64, Vec<LocationId>> {
        let mut by_rank: BTreeMap<i64, Vec<LocationId>> = BTreeMap::new();
        for (&id, &rank) in &self.ranks {
            by_rank.entry(rank).or_default().push(id);
        }
        by_rank.retain(|_, ids| ids.len() > 1);
        for ids in by_rank.values_mut() {
            ids.sort_unstable();
        }
        by_rank
    }

    /// Ranks restricted to the given ids.
    fn restricted_to(&self, ids: &HashSet<LocationId>) -> CustomRanks {
        self.ranks
            .iter()
            .filter(|(id, _)| ids.contains(*id))
            .map(|(&id, &rank)| (id, rank))
            .collect()
    }
}

impl FromIterator<(LocationId, i64)> for CustomRanks {
    fn from_iter<T: IntoIterator<Item = (LocationId, i64)>>(iter: T) -> Self {
        Self {
            ranks: iter.into_iter().collect(),
        }
    }
}

impl From<HashMap<LocationId, i64>> for CustomRanks {
    fn from(ranks: HashMap<LocationId, i64>) -> Self {
        Self { ranks }
    }
}

/// Orders `locations` by their custom ranks.
///
/// Only ranks of ids present in `locations` are considered. Returns
/// `Ok(None)` when none of them has a rank and [`Error::DuplicateRank`] for
/// the lowest colliding rank when two share one. Otherwise ranked locations
/// come first in ascending rank order, followed by the unranked ones in
/// numeric code order.
pub fn apply_custom_sort(
    locations: &[Location],
    ranks: &CustomRanks,
) -> Result<Option<Vec<Location>>> {
    let ids: HashSet<LocationId> = locations.iter().map(|location| location.id).collect();
    let relevant = ranks.restricted_to(&ids);

    if !relevant.is_active() {
        return Ok(None);
    }

    if let Some((rank, ids)) = relevant.duplicates().into_iter().next() {
        debug!(rank, ?ids, "rejecting custom order with duplicate rank");
        return Err(Error::DuplicateRank { rank, ids });
    }

    let (mut ranked, unranked): (Vec<&Location>, Vec<&Location>) = locations
        .iter()
        .partition(|location| relevant.get(location.id).is_some());

    ranked.sort_by_key(|location| relevant.get(location.id));

    let unranked: Vec<Location> = unranked.into_iter().cloned().collect();
    let mut ordered: Vec<Location> = ranked.into_iter().cloned().collect();
    ordered.extend(sort_by_code(&unranked));

    debug!(ranked = relevant.len(), total = ordered.len(), "applied custom order");
    Ok(Some(ordered))
}

/// Codes used by more than one location, in first-seen order.
pub fn duplicate_codes(locations: &[Location]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for location in locations {
        *counts.entry(location.code.as_str()).or_default() += 1;
    }

    let mut seen = HashSet::new();
    locations
        .iter()
        .map(|location| location.code.as_str())
        .filter(|code| counts[code] > 1 && seen.insert(*code))
        .map(str::to_string)
        .collect()
}
