//! Competitor identities and per-episode rank reports.
//!
//! A competitor is a policy *class* entered into evaluation -- a learned
//! checkpoint or a scripted baseline -- not a per-episode agent. Rank
//! reports are typed records passed directly between components; the
//! string-keyed `Rank_<name>` flattening used by the external metrics
//! channel lives only in the boundary adapter.

use serde::{Deserialize, Serialize};

/// Identity of a competitor class entered into evaluation.
///
/// The wrapped name is the competitor's stable display name; it doubles as
/// the suffix of the `Rank_<name>` / `SR_<name>` metric keys at the
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CompetitorId(String);

impl CompetitorId {
    /// Wrap a competitor name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The competitor's name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for CompetitorId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CompetitorId {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl From<String> for CompetitorId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// One roster entry: a competitor and whether it is a scripted baseline.
///
/// Scripted baselines have a known, fixed strength; the rating tracker
/// pins their belief to a low-uncertainty prior after every update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    /// The competitor's identity.
    pub id: CompetitorId,
    /// Whether this competitor is a scripted (fixed-strength) baseline.
    pub scripted: bool,
}

impl Competitor {
    /// A learned (non-scripted) competitor.
    pub fn learned(name: impl Into<String>) -> Self {
        Self {
            id: CompetitorId::new(name),
            scripted: false,
        }
    }

    /// A scripted fixed-strength baseline competitor.
    pub fn scripted(name: impl Into<String>) -> Self {
        Self {
            id: CompetitorId::new(name),
            scripted: true,
        }
    }
}

/// One competitor's placing within a single episode instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placing {
    /// The competitor being placed.
    pub competitor: CompetitorId,
    /// Ordinal rank, 0 = best. Equal ranks denote a draw.
    pub rank: u32,
}

/// An ordered ranking of competitors for one completed episode instance.
///
/// Ephemeral: produced at an episode boundary, consumed immediately by the
/// rating update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankObservation {
    /// Placings in report order.
    placings: Vec<Placing>,
}

impl RankObservation {
    /// Build an observation from explicit placings.
    pub const fn new(placings: Vec<Placing>) -> Self {
        Self { placings }
    }

    /// Build an observation from a best-to-worst ordering.
    ///
    /// The first competitor gets rank 0, the second rank 1, and so on;
    /// no draws are produced.
    pub fn from_ordering(ids: impl IntoIterator<Item = CompetitorId>) -> Self {
        let placings = ids
            .into_iter()
            .enumerate()
            .map(|(index, competitor)| Placing {
                competitor,
                rank: u32::try_from(index).unwrap_or(u32::MAX),
            })
            .collect();
        Self { placings }
    }

    /// Build an observation by ranking competitors on a relative score,
    /// highest score first.
    ///
    /// Ties in score are broken by input order (stable sort), so each
    /// competitor still receives a distinct ordinal rank -- this mirrors
    /// the upstream episode-end callback, which argsorts mean task scores.
    pub fn from_scores(scores: impl IntoIterator<Item = (CompetitorId, f64)>) -> Self {
        let mut scored: Vec<(CompetitorId, f64)> = scores.into_iter().collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        Self::from_ordering(scored.into_iter().map(|(id, _)| id))
    }

    /// The placings, in report order.
    pub fn placings(&self) -> &[Placing] {
        &self.placings
    }

    /// Number of competitors placed.
    pub fn len(&self) -> usize {
        self.placings.len()
    }

    /// Whether the observation places no competitors.
    pub fn is_empty(&self) -> bool {
        self.placings.is_empty()
    }
}
