//! Opinion polls: true vote shares and the noisy projection shown to the
//! player.

use rand::Rng;

use electorate_types::math::{clamp_range, clamp_unit};
use electorate_world::DistrictGrid;

use crate::party::Party;

/// Margin of error reported when there is nothing to poll.
pub const NO_POLL_MARGIN: f64 = 0.05;

/// One party's poll share.
#[derive(Debug, Clone, PartialEq)]
pub struct PollShare {
    /// Party name.
    pub party: String,
    /// Share of the vote, `[0, 1]`.
    pub share: f64,
}

/// Current true and projected polls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollSnapshot {
    /// Turnout-weighted preference shares, in party order.
    pub shares: Vec<PollShare>,
    /// Shares with sampling noise and the candidate bonus, in party order.
    pub projected: Vec<PollShare>,
    /// Margin of error used for the projection.
    pub margin_of_error: f64,
}

/// Inputs that shape the projected polls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionParams<'a> {
    /// National stability; lower stability widens the margin.
    pub stability: f64,
    /// The player's party name, if any.
    pub player_party: Option<&'a str>,
    /// Candidate polling bonus added to the player's projected share.
    pub polling_bonus: f64,
}

/// Turnout-weighted preference shares across the grid.
///
/// Each bloc prefers a party by `0.8 * alignment + 0.2 * issue match`, where
/// the issue match compares the tile's local-issue axis. Empty when there
/// are no parties.
pub fn compute_poll_shares(parties: &[Party], grid: &DistrictGrid) -> Vec<PollShare> {
    if parties.is_empty() {
        return Vec::new();
    }

    let count = f64::from(u32::try_from(parties.len()).unwrap_or(u32::MAX));
    let mut scores = vec![0.0_f64; parties.len()];
    let mut preferences = vec![0.0_f64; parties.len()];
    let mut total_score = 0.0;

    for tile in grid.tiles() {
        let axis = tile.local_issue;
        for bloc in &tile.blocs {
            let turnout_weight = f64::from(bloc.population) * bloc.turnout_chance;
            let mut total_preference = 0.0;
            for (slot, party) in preferences.iter_mut().zip(parties) {
                let alignment = party.alignment_score(&bloc.ideology);
                let issue_match = 1.0 - (bloc.ideology.axis(axis) - party.platform.axis(axis)).abs() * 0.5;
                *slot = clamp_unit(alignment.mul_add(0.8, issue_match * 0.2));
                total_preference += *slot;
            }

            for (score, preference) in scores.iter_mut().zip(&preferences) {
                let contribution = if total_preference <= 0.0 {
                    turnout_weight / count
                } else {
                    turnout_weight * (preference / total_preference)
                };
                *score += contribution;
                total_score += contribution;
            }
        }
    }

    parties
        .iter()
        .zip(scores)
        .map(|(party, score)| PollShare {
            party: party.name.clone(),
            share: if total_score <= 0.0 { 1.0 / count } else { score / total_score },
        })
        .collect()
}

/// Margin of error for a given national stability.
pub fn margin_of_error(stability: f64) -> f64 {
    let volatility = clamp_range((100.0 - stability) / 700.0, 0.0, 0.09);
    clamp_range(0.03 + volatility, 0.03, 0.12)
}

/// Projected polls: every share perturbed by up to the margin of error,
/// the player's party boosted by the polling bonus, then renormalized.
pub fn project_polls(
    shares: Vec<PollShare>,
    params: &ProjectionParams<'_>,
    rng: &mut impl Rng,
) -> PollSnapshot {
    if shares.is_empty() {
        return PollSnapshot {
            shares,
            projected: Vec::new(),
            margin_of_error: NO_POLL_MARGIN,
        };
    }

    let margin = margin_of_error(params.stability);
    let mut projected: Vec<PollShare> = shares
        .iter()
        .map(|s| {
            let mut value = clamp_unit(s.share + rng.random_range(-margin..=margin));
            if params.player_party.is_some_and(|p| !p.trim().is_empty() && p == s.party) {
                value = clamp_unit(value + params.polling_bonus);
            }
            PollShare {
                party: s.party.clone(),
                share: value,
            }
        })
        .collect();

    let total: f64 = projected.iter().map(|s| s.share).sum();
    let count = f64::from(u32::try_from(projected.len()).unwrap_or(u32::MAX));
    for entry in &mut projected {
        entry.share = if total <= 0.0001 { 1.0 / count } else { entry.share / total };
    }

    PollSnapshot {
        shares,
        projected,
        margin_of_error: margin,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use electorate_types::{IdeologyVector, IndustryType, PopulationDensity};
    use electorate_world::DistrictTile;

    use super::*;

    const EPS: f64 = 1e-9;

    fn grid() -> DistrictGrid {
        DistrictGrid::build(3, 3, |x, y| {
            let mut tile = DistrictTile::new(x, y, PopulationDensity::Urban, IndustryType::Services);
            tile.add_bloc("Industrial Workers", 2000, IdeologyVector::new(-0.6, 0.0, 0.0, 0.0));
            tile.add_bloc("Managers", 1000, IdeologyVector::new(0.5, 0.2, 0.0, 0.1));
            tile
        })
        .unwrap()
    }

    fn parties() -> Vec<Party> {
        vec![
            Party::new("SocDem", "#d94747", IdeologyVector::new(-0.6, 0.35, -0.25, 0.35), 0.6),
            Party::new("Conservative", "#3861cc", IdeologyVector::new(0.4, -0.55, 0.4, -0.3), 0.45),
        ]
    }

    #[test]
    fn shares_sum_to_one() {
        let shares = compute_poll_shares(&parties(), &grid());
        assert_eq!(shares.len(), 2);
        let total: f64 = shares.iter().map(|s| s.share).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(shares.first().unwrap().share > shares.last().unwrap().share);
    }

    #[test]
    fn no_parties_no_polls() {
        assert!(compute_poll_shares(&[], &grid()).is_empty());
        let mut rng = SmallRng::seed_from_u64(42);
        let params = ProjectionParams {
            stability: 50.0,
            player_party: None,
            polling_bonus: 0.0,
        };
        let snapshot = project_polls(Vec::new(), &params, &mut rng);
        assert!((snapshot.margin_of_error - NO_POLL_MARGIN).abs() < EPS);
    }

    #[test]
    fn margin_widens_with_instability() {
        assert!((margin_of_error(100.0) - 0.03).abs() < EPS);
        assert!((margin_of_error(65.0) - 0.08).abs() < EPS);
        assert!((margin_of_error(0.0) - 0.12).abs() < EPS);
    }

    #[test]
    fn projection_is_normalised() {
        let shares = compute_poll_shares(&parties(), &grid());
        let mut rng = SmallRng::seed_from_u64(42);
        let params = ProjectionParams {
            stability: 40.0,
            player_party: Some("SocDem"),
            polling_bonus: 0.08,
        };
        let snapshot = project_polls(shares, &params, &mut rng);
        let total: f64 = snapshot.projected.iter().map(|s| s.share).sum();
        assert!((total - 1.0).abs() < 1e-9);
        for share in &snapshot.projected {
            assert!((0.0..=1.0).contains(&share.share));
        }
    }

    #[test]
    fn unpopulated_grid_splits_evenly() {
        let empty = DistrictGrid::build(2, 2, |x, y| {
            DistrictTile::new(x, y, PopulationDensity::Rural, IndustryType::Agriculture)
        })
        .unwrap();
        let shares = compute_poll_shares(&parties(), &empty);
        for share in shares {
            assert!((share.share - 0.5).abs() < EPS);
        }
    }
}
