//! Mode-entry fare model.
//!
//! A fare is charged when the rider enters a revenue mode different from
//! the one they were on, not per edge. Riding several consecutive edges of
//! the same mode, even across a walking transfer, costs a single boarding.
//! Walks and transfers are free and never change the mode being ridden.

use tracing::warn;

use crate::domain::{Segment, TransportMode};

/// How boarding a mode is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FareRule {
    Free,
    /// Fixed amount per boarding.
    Flat(u32),
    /// `end_to_end` when the ride runs between two distinct terminals,
    /// `inter_station` otherwise.
    TwoTier { inter_station: u32, end_to_end: u32 },
}

impl FareRule {
    /// The lowest amount a single boarding under this rule can cost.
    pub fn cheapest(&self) -> u32 {
        match *self {
            FareRule::Free => 0,
            FareRule::Flat(amount) => amount,
            FareRule::TwoTier {
                inter_station,
                end_to_end,
            } => inter_station.min(end_to_end),
        }
    }
}

/// Fare rules per mode plus the terminal stops two-tier rules look at.
#[derive(Debug, Clone, PartialEq)]
pub struct FareTable {
    rules: [Option<FareRule>; TransportMode::COUNT],
    /// Lowercase name fragments identifying terminal stops.
    terminals: Vec<String>,
}

impl Default for FareTable {
    fn default() -> Self {
        Self::empty()
            .with_rule(
                TransportMode::Rail,
                FareRule::TwoTier {
                    inter_station: 5000,
                    end_to_end: 10000,
                },
            )
            .with_rule(TransportMode::Bus, FareRule::Flat(5000))
            .with_rule(TransportMode::Minivan, FareRule::Free)
            .with_rule(TransportMode::Walk, FareRule::Free)
            .with_rule(TransportMode::Transfer, FareRule::Free)
    }
}

impl FareTable {
    /// A table with no rules and no terminals.
    pub fn empty() -> Self {
        Self {
            rules: [None; TransportMode::COUNT],
            terminals: Vec::new(),
        }
    }

    pub fn with_rule(mut self, mode: TransportMode, rule: FareRule) -> Self {
        self.rules[mode.index()] = Some(rule);
        self
    }

    pub fn without_rule(mut self, mode: TransportMode) -> Self {
        self.rules[mode.index()] = None;
        self
    }

    /// Flag stops whose name contains `fragment` (ignoring case) as
    /// terminals.
    pub fn with_terminal(mut self, fragment: &str) -> Self {
        self.terminals.push(fragment.to_lowercase());
        self
    }

    pub fn rule(&self, mode: TransportMode) -> Option<&FareRule> {
        self.rules[mode.index()].as_ref()
    }

    pub fn is_terminal(&self, stop_name: &str) -> bool {
        let name = stop_name.to_lowercase();
        self.terminals.iter().any(|t| name.contains(t.as_str()))
    }

    /// Fare for boarding `mode` at `board` and riding it to `alight`.
    ///
    /// Modes without a rule cost nothing.
    pub fn boarding_fare(&self, mode: TransportMode, board: &str, alight: &str) -> u32 {
        match self.rule(mode) {
            None => {
                warn!(mode = %mode, "No fare rule for mode, charging nothing");
                0
            }
            Some(FareRule::Free) => 0,
            Some(FareRule::Flat(amount)) => *amount,
            Some(FareRule::TwoTier {
                inter_station,
                end_to_end,
            }) => {
                let distinct = !board.eq_ignore_ascii_case(alight);
                if distinct && self.is_terminal(board) && self.is_terminal(alight) {
                    *end_to_end
                } else {
                    *inter_station
                }
            }
        }
    }

    /// The cheapest single boarding over all revenue modes.
    ///
    /// Modes without a rule count as free.
    pub fn cheapest_boarding(&self) -> u32 {
        TransportMode::ALL
            .iter()
            .filter(|m| m.is_revenue())
            .map(|m| self.rule(*m).map_or(0, FareRule::cheapest))
            .min()
            .unwrap_or(0)
    }

    /// Total fare of an itinerary.
    pub fn compute_route_fare(&self, segments: &[Segment]) -> u32 {
        self.fare_breakdown(segments).iter().sum()
    }

    /// Fare charged on each segment.
    ///
    /// The boarding charge lands on the segment where a new mode is
    /// entered; every other segment is zero. For two-tier rules the ride
    /// runs from that segment's origin to the destination of the last
    /// segment before a different revenue mode is entered.
    pub fn fare_breakdown(&self, segments: &[Segment]) -> Vec<u32> {
        let mut fares = vec![0; segments.len()];
        let mut current: Option<TransportMode> = None;

        for (i, segment) in segments.iter().enumerate() {
            if !segment.mode.is_revenue() || current == Some(segment.mode) {
                continue;
            }

            let alight = segments[i..]
                .iter()
                .filter(|s| s.mode.is_revenue())
                .take_while(|s| s.mode == segment.mode)
                .last()
                .unwrap_or(segment);

            fares[i] = self.boarding_fare(segment.mode, segment.from.name(), alight.to.name());
            current = Some(segment.mode);
        }

        fares
    }
}

/// The Palembang network's fares: free feeder minivans, flat-fare buses
/// and two-tier LRT with its end stations flagged.
pub fn palembang_fares() -> FareTable {
    FareTable::default()
        .with_terminal("smb")
        .with_terminal("bumi sriwijaya")
        .with_terminal("asrama haji")
}
