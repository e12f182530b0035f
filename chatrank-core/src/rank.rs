use crate::aggregate::ChatLog;
use crate::classifier::EventClass;
use crate::counter::CountMapping;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A user's position in a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rank {
    pub rank: usize,
    pub count: u64,
}

/// Users tied on one count. Ranks are dense: the group after a tie at rank 1
/// is rank 2 regardless of how many users share rank 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedGroup {
    pub rank: usize,
    pub count: u64,
    pub users: Vec<String>,
}

impl std::fmt::Display for RankedGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {} ({})", self.rank, self.users.join(", "), self.count)
    }
}

/// Entries ordered by descending count. The sort is stable, so equal counts
/// keep the mapping's insertion order.
pub fn most_common(counts: &CountMapping) -> Vec<(&str, u64)> {
    let mut entries: Vec<(&str, u64)> = counts
        .iter()
        .map(|(user, count)| (user.as_str(), *count))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
}

/// Group consecutive equal counts of an already sorted list.
pub fn group_ties<'a>(sorted: impl IntoIterator<Item = (&'a str, u64)>) -> Vec<RankedGroup> {
    let mut groups: Vec<RankedGroup> = Vec::new();
    for (user, count) in sorted {
        if let Some(group) = groups.last_mut().filter(|g| g.count == count) {
            group.users.push(user.to_string());
            continue;
        }
        let rank = groups.len() + 1;
        groups.push(RankedGroup {
            rank,
            count,
            users: vec![user.to_string()],
        });
    }
    groups
}

/// Rank of `user` in `counts`, case-insensitively.
pub fn rank_in(counts: &CountMapping, user: &str) -> Option<Rank> {
    let target = user.to_lowercase();
    group_ties(most_common(counts))
        .into_iter()
        .find(|group| group.users.iter().any(|u| *u == target))
        .map(|group| Rank {
            rank: group.rank,
            count: group.count,
        })
}

/// The `n` highest entries grouped by tie.
///
/// Truncation happens on the sorted entries before grouping, so a tie that
/// straddles the cutoff only keeps the members that fit.
pub fn top_n_of(counts: &CountMapping, n: usize) -> Vec<RankedGroup> {
    group_ties(most_common(counts).into_iter().take(n))
}

impl ChatLog {
    /// Rank and count of `user` for `class`, or `None` if the user has no events.
    pub fn rank_of(&self, user: &str, class: EventClass) -> Result<Option<Rank>> {
        let totals = self.totals(class)?;
        Ok(rank_in(&totals, user))
    }

    pub fn top_n(&self, class: EventClass, n: usize) -> Result<Vec<RankedGroup>> {
        let totals = self.totals(class)?;
        Ok(top_n_of(&totals, n))
    }
}
