//! Leaderboard aggregation over the task list.

use crate::task::domain::{Amount, Task, TaskStatus, WalletAddress};
use std::collections::BTreeMap;

/// Number of entries kept in each ranking.
pub const RANKING_LIMIT: usize = 10;

/// Number of completed tasks listed as recent activity.
pub const RECENT_COMPLETIONS_LIMIT: usize = 5;

/// Totals for one wallet address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    /// Ranked wallet.
    pub address: WalletAddress,
    /// Sum of bounty amounts.
    pub total: Amount,
    /// Number of tasks counted.
    pub tasks: usize,
}

/// Rankings derived from a snapshot of tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    /// Workers ranked by amounts earned on completed tasks.
    pub top_earners: Vec<Standing>,
    /// Creators ranked by amounts posted across all tasks.
    pub top_posters: Vec<Standing>,
    /// Most recent completed tasks in board order.
    pub recent_completions: Vec<Task>,
}

impl Leaderboard {
    /// Aggregates `tasks`, which are expected in board order.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        Self {
            top_earners: top_earners(tasks),
            top_posters: top_posters(tasks),
            recent_completions: recent_completions(tasks),
        }
    }
}

/// Ranks workers by the amounts of their completed tasks.
#[must_use]
pub fn top_earners(tasks: &[Task]) -> Vec<Standing> {
    rank(
        tasks
            .iter()
            .filter(|task| task.status() == TaskStatus::Completed)
            .filter_map(|task| task.worker().map(|worker| (worker, task.amount()))),
    )
}

/// Ranks creators by the amounts of every task they posted.
#[must_use]
pub fn top_posters(tasks: &[Task]) -> Vec<Standing> {
    rank(tasks.iter().map(|task| (task.creator(), task.amount())))
}

/// Returns the first completed tasks in board order.
#[must_use]
pub fn recent_completions(tasks: &[Task]) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| task.status() == TaskStatus::Completed)
        .take(RECENT_COMPLETIONS_LIMIT)
        .cloned()
        .collect()
}

fn rank<'a>(entries: impl Iterator<Item = (&'a WalletAddress, Amount)>) -> Vec<Standing> {
    let mut totals: BTreeMap<&WalletAddress, (Amount, usize)> = BTreeMap::new();
    for (address, amount) in entries {
        let slot = totals.entry(address).or_insert((Amount::ZERO, 0));
        slot.0 = slot.0.saturating_add(amount);
        slot.1 = slot.1.saturating_add(1);
    }
    let mut standings: Vec<Standing> = totals
        .into_iter()
        .map(|(address, (total, count))| Standing {
            address: address.clone(),
            total,
            tasks: count,
        })
        .collect();
    // BTreeMap iteration already orders ties by address.
    standings.sort_by(|left, right| right.total.cmp(&left.total));
    standings.truncate(RANKING_LIMIT);
    standings
}
