//! Resolved-window cache keyed by provider and date.
//!
//! Entries hold full day timelines together with the timezone they were
//! resolved in. A single epoch counter is bumped by every invalidation; a
//! reader records the epoch before reading the stores and its results are
//! only kept if no write happened meanwhile. Invalidation drops the
//! provider's entry outright, and each provider keeps at most `day_limit`
//! dates, evicting those farthest from the most recent fill.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use chrono_tz::Tz;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::availability::ResolvedWindow;
use crate::models::time::DateRange;

/// Dates kept per provider unless configured otherwise.
pub const DEFAULT_DAY_LIMIT: usize = 184;

#[derive(Debug)]
struct ProviderEntry {
    timezone: Tz,
    days: BTreeMap<NaiveDate, Vec<ResolvedWindow>>,
}

#[derive(Debug, Default)]
struct CacheState {
    epoch: u64,
    providers: HashMap<Uuid, ProviderEntry>,
}

#[derive(Debug)]
pub struct WindowCache {
    state: RwLock<CacheState>,
    day_limit: usize,
}

impl Default for WindowCache {
    fn default() -> Self {
        Self::with_day_limit(DEFAULT_DAY_LIMIT)
    }
}

impl WindowCache {
    pub fn with_day_limit(day_limit: usize) -> Self {
        Self {
            state: RwLock::default(),
            day_limit: day_limit.max(1),
        }
    }

    /// Epoch a reader must hand back to [`put`](Self::put).
    pub async fn generation(&self) -> u64 {
        self.state.read().await.epoch
    }

    /// Timezone and timelines for the whole range, or `None` if any date is missing.
    pub async fn get(&self, provider_id: Uuid, range: DateRange) -> Option<(Tz, Vec<ResolvedWindow>)> {
        let state = self.state.read().await;
        let entry = state.providers.get(&provider_id)?;

        let mut windows = Vec::new();
        for date in range.dates() {
            windows.extend_from_slice(entry.days.get(&date)?);
        }
        Some((entry.timezone, windows))
    }

    /// Stores timelines computed from a read that started at `generation`.
    ///
    /// Returns false and keeps nothing if anything was invalidated since.
    pub async fn put(
        &self,
        provider_id: Uuid,
        generation: u64,
        timezone: Tz,
        days: BTreeMap<NaiveDate, Vec<ResolvedWindow>>,
    ) -> bool {
        let (Some(&first), Some(&last)) = (days.keys().next(), days.keys().next_back()) else {
            return true;
        };

        let mut state = self.state.write().await;
        if state.epoch != generation {
            return false;
        }

        let entry = state
            .providers
            .entry(provider_id)
            .or_insert_with(|| ProviderEntry {
                timezone,
                days: BTreeMap::new(),
            });
        entry.timezone = timezone;
        entry.days.extend(days);
        evict_far_days(&mut entry.days, first, last, self.day_limit);
        true
    }

    pub async fn invalidate(&self, provider_id: Uuid) {
        let mut state = self.state.write().await;
        state.epoch = state.epoch.wrapping_add(1);
        state.providers.remove(&provider_id);
    }
}

/// Drops whichever end lies farther from `from..=to` until `limit` dates remain.
fn evict_far_days(
    days: &mut BTreeMap<NaiveDate, Vec<ResolvedWindow>>,
    from: NaiveDate,
    to: NaiveDate,
    limit: usize,
) {
    while days.len() > limit {
        let (Some(&oldest), Some(&newest)) = (days.keys().next(), days.keys().next_back()) else {
            break;
        };
        let below = (from - oldest).num_days();
        let above = (newest - to).num_days();
        if below >= above {
            days.remove(&oldest);
        } else {
            days.remove(&newest);
        }
    }
}
