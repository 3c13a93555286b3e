use chrono::{DateTime, Utc};
use fifa_feed::MatchSnapshot;
use notifier::{Icon, Notification};
use tracing::{debug, info};

use crate::record::{MatchCache, MatchRecord};
use crate::vocabulary::MatchStatus;

#[derive(Debug, Default)]
pub struct Discovery {
    /// Live snapshots seen in this batch (new or already cached).
    pub live:          usize,
    /// Ids inserted by this call, in snapshot order.
    pub added:         Vec<String>,
    /// One "went live" message per added match.
    pub notifications: Vec<Notification>,
}

/// Upsert every live snapshot into the cache.
///
/// Non-live snapshots are ignored. A known id is never touched again, so
/// calling this twice with the same batch changes nothing the second time.
/// Persisting the cache is the caller's job.
pub fn discover(snapshots: &[MatchSnapshot], cache: &mut MatchCache, now: DateTime<Utc>) -> Discovery {
    let mut out = Discovery::default();

    for snapshot in snapshots {
        let status = snapshot.match_status.map(MatchStatus::from_code);
        if !status.is_some_and(MatchStatus::is_live) {
            continue;
        }
        out.live += 1;

        if cache.contains(&snapshot.id_match) {
            debug!("Cache exists {}", snapshot.id_match);
            continue;
        }

        let record = MatchRecord::from_snapshot(snapshot, now);
        let text = format!(
            "Match {} is live! {} vs {}",
            record.id, record.home_team_name, record.away_team_name
        );
        let id = record.id.clone();
        if cache.insert_if_absent(record) {
            info!("Added {id}");
            out.notifications.push(Notification::new(Icon::Zap, text).for_match(&id));
            out.added.push(id);
        }
    }

    out
}
