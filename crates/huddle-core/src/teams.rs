// Team partitioning: unbiased shuffle followed by round-robin dealing.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// One team of a draw. `number` is 1-based for display ("Team 1").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub number: usize,
    pub members: Vec<String>,
}

/// The result of one partition call. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamAssignment {
    teams: Vec<Team>,
}

impl TeamAssignment {
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    /// Total number of members dealt across all teams.
    pub fn member_count(&self) -> usize {
        self.teams.iter().map(|t| t.members.len()).sum()
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.teams.iter().map(|t| t.members.len()).collect()
    }

    /// True when no member was dealt (empty roster).
    pub fn is_empty(&self) -> bool {
        self.member_count() == 0
    }

    /// Members sorted within each team, for order-insensitive comparison of
    /// two draws.
    pub fn composition(&self) -> Vec<Vec<String>> {
        self.teams
            .iter()
            .map(|t| {
                let mut members = t.members.clone();
                members.sort();
                members
            })
            .collect()
    }
}

/// Split `roster` into `team_count` balanced teams in random order.
///
/// The roster is shuffled with Fisher–Yates and element `i` of the shuffled
/// order goes to team `i % team_count`, so team sizes differ by at most one.
/// A `team_count` of zero is treated as one. When there are more teams than
/// members the trailing teams are empty. The input is never modified.
pub fn partition<R>(roster: &[String], team_count: usize, rng: &mut R) -> TeamAssignment
where
    R: Rng + ?Sized,
{
    let k = if team_count == 0 {
        debug!("team count of zero clamped to one");
        1
    } else {
        team_count
    };

    let mut shuffled = roster.to_vec();
    shuffled.shuffle(rng);

    let mut teams: Vec<Team> = (1..=k)
        .map(|number| Team {
            number,
            members: Vec::with_capacity(roster.len().div_ceil(k)),
        })
        .collect();
    for (i, name) in shuffled.into_iter().enumerate() {
        teams[i % k].members.push(name);
    }

    TeamAssignment { teams }
}

/// [`partition`] using the thread-local RNG.
pub fn partition_random(roster: &[String], team_count: usize) -> TeamAssignment {
    partition(roster, team_count, &mut rand::rng())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
