//! Experience points and levels
//!
//! `xp = 10 × memories + 25 × insights + 5 × connections`, and a level is
//! reached every time `xp / 100` passes the next perfect square:
//! `level = floor(sqrt(xp / 100)) + 1`. Integer arithmetic throughout, so
//! level boundaries are exact.

use serde::{Deserialize, Serialize};

const XP_PER_MEMORY: u64 = 10;
const XP_PER_INSIGHT: u64 = 25;
const XP_PER_CONNECTION: u64 = 5;
const XP_PER_LEVEL_UNIT: u64 = 100;

const MOTIVATIONS: &[&str] = &[
    "Your mind is expanding like a nebula.",
    "Every idea is a new star in your constellation.",
    "You're not just learning, you're evolving.",
    "This is how genius begins.",
    "Your knowledge garden is blooming beautifully.",
    "The connections you're making are extraordinary.",
    "You're becoming the architect of your own understanding.",
];

/// Derived level state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Progress {
    pub level: u32,
    pub xp: u64,
    pub next_level_xp: u64,
}

impl Progress {
    /// How far `xp` is toward `next_level_xp`, in percent
    pub fn percent(&self) -> f64 {
        self.xp as f64 / self.next_level_xp as f64 * 100.0
    }
}

/// Closed-form leveling curve
pub struct ProgressEngine;

impl ProgressEngine {
    /// Compute progress from running totals
    pub fn calculate_progress(
        total_memories: u64,
        total_insights: u64,
        total_connections: u64,
    ) -> Progress {
        let xp = total_memories
            .saturating_mul(XP_PER_MEMORY)
            .saturating_add(total_insights.saturating_mul(XP_PER_INSIGHT))
            .saturating_add(total_connections.saturating_mul(XP_PER_CONNECTION));
        let level = Self::level_for_xp(xp);
        let next_level_xp = (level as u64)
            .saturating_mul(level as u64)
            .saturating_mul(XP_PER_LEVEL_UNIT);

        Progress {
            level,
            xp,
            next_level_xp,
        }
    }

    /// Level reached with `xp` experience
    pub fn level_for_xp(xp: u64) -> u32 {
        // floor(sqrt(xp / 100)) == isqrt(xp / 100) for integer xp
        isqrt(xp / XP_PER_LEVEL_UNIT) as u32 + 1
    }

    /// Whether moving from `old_xp` to `new_xp` crosses a level boundary
    pub fn check_level_up(old_xp: u64, new_xp: u64) -> bool {
        Self::level_for_xp(new_xp) > Self::level_for_xp(old_xp)
    }

    /// Motivational line for a level; cycles through a fixed list
    pub fn generate_motivation(level: u32) -> &'static str {
        MOTIVATIONS[level as usize % MOTIVATIONS.len()]
    }
}

/// Integer square root
fn isqrt(n: u64) -> u64 {
    let exceeds = |r: u64| r.checked_mul(r).map_or(true, |sq| sq > n);

    let mut root = (n as f64).sqrt() as u64;
    while exceeds(root) {
        root -= 1;
    }
    while !exceeds(root + 1) {
        root += 1;
    }
    root
}

/// Compute progress from running totals
pub fn calculate_progress(
    total_memories: u64,
    total_insights: u64,
    total_connections: u64,
) -> Progress {
    ProgressEngine::calculate_progress(total_memories, total_insights, total_connections)
}

/// Whether moving from `old_xp` to `new_xp` crosses a level boundary
pub fn check_level_up(old_xp: u64, new_xp: u64) -> bool {
    ProgressEngine::check_level_up(old_xp, new_xp)
}

/// Motivational line for a level
pub fn generate_motivation(level: u32) -> &'static str {
    ProgressEngine::generate_motivation(level)
}
