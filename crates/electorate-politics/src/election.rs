//! Election resolution: turnout-weighted vote tally and largest-remainder
//! seat apportionment.
//!
//! # Invariants
//!
//! - The seat total always equals the configured parliament size, even
//!   when every party received zero votes (seats then rotate through the
//!   parties in order).
//! - Ties in remainders and in the winning seat count go to the party that
//!   appears first.

use tracing::info;

use electorate_types::{IndustryType, PopulationDensity, SeatRecord};
use electorate_world::{DistrictGrid, DistrictTile};

use crate::party::Party;

/// Default parliament size.
pub const DEFAULT_PARLIAMENT_SEATS: u32 = 120;

/// Winner reported when nobody holds seats.
pub const HUNG_PARLIAMENT: &str = "Hung Parliament";

/// Lowest alignment counted when weighting a party.
const MIN_ALIGNMENT: f64 = 0.01;

/// The player's stake in the vote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CampaignContext<'a> {
    /// The player's party name, if any.
    pub player_party: Option<&'a str>,
    /// Candidate campaign-strength multiplier applied to that party.
    pub campaign_multiplier: f64,
}

/// Result of one election.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectionOutcome {
    /// Raw votes per party, in party order.
    pub votes: Vec<f64>,
    /// Seats per party, in party order.
    pub seats: Vec<SeatRecord>,
    /// Party with the most seats.
    pub winner: String,
}

/// Local campaign advantage of `party` in `tile`.
///
/// Progressive platforms do better in metros, traditional ones in rural
/// tiles, labor-left platforms in heavy industry and market-right ones in
/// tech hubs. The player's party is further scaled by the candidate.
pub fn campaign_buff(party: &Party, tile: &DistrictTile, context: &CampaignContext<'_>) -> f64 {
    let platform = &party.platform;
    let mut buff = 1.0;
    if tile.density == PopulationDensity::Metro && platform.societal() > 0.25 {
        buff += 0.08;
    }
    if tile.density == PopulationDensity::Rural && platform.societal() < -0.25 {
        buff += 0.08;
    }
    if tile.dominant_industry == IndustryType::HeavyIndustry && platform.economic() < -0.25 {
        buff += 0.07;
    }
    if tile.dominant_industry == IndustryType::Tech && platform.economic() > 0.25 {
        buff += 0.07;
    }
    if is_player_party(context.player_party, &party.name) {
        buff *= context.campaign_multiplier;
    }
    buff
}

fn is_player_party(player_party: Option<&str>, name: &str) -> bool {
    player_party.is_some_and(|p| !p.trim().is_empty() && p == name)
}

/// Turnout-weighted votes per party.
///
/// Each bloc's voters (`population x turnout`) split in proportion to
/// `max(0.01, alignment)^2 x campaign buff`.
pub fn tally_votes(parties: &[Party], grid: &DistrictGrid, context: &CampaignContext<'_>) -> Vec<f64> {
    let mut votes = vec![0.0_f64; parties.len()];
    if parties.is_empty() {
        return votes;
    }
    let count = f64::from(u32::try_from(parties.len()).unwrap_or(u32::MAX));
    let mut weights = vec![0.0_f64; parties.len()];

    for tile in grid.tiles() {
        let buffs: Vec<f64> = parties.iter().map(|p| campaign_buff(p, tile, context)).collect();
        for bloc in &tile.blocs {
            let mut total_weight = 0.0;
            for ((slot, party), buff) in weights.iter_mut().zip(parties).zip(&buffs) {
                let alignment = party.alignment_score(&bloc.ideology).max(MIN_ALIGNMENT);
                *slot = alignment * alignment * buff;
                total_weight += *slot;
            }

            let voters = f64::from(bloc.population) * bloc.turnout_chance;
            for (vote, weight) in votes.iter_mut().zip(&weights) {
                *vote += if total_weight <= 0.0 {
                    voters / count
                } else {
                    voters * (weight / total_weight)
                };
            }
        }
    }
    votes
}

/// Hamilton (largest remainder) apportionment of `total_seats`.
///
/// Each party first receives the floor of its exact quota; leftover seats
/// go one at a time to the largest remaining remainder, and a party that
/// received a leftover seat is not considered again in that round.
pub fn apportion_seats(votes: &[f64], total_seats: u32) -> Vec<u32> {
    let mut seats = vec![0_u32; votes.len()];
    if votes.is_empty() || total_seats == 0 {
        return seats;
    }

    let clean: Vec<f64> = votes.iter().map(|v| if v.is_finite() { v.max(0.0) } else { 0.0 }).collect();
    let total_votes: f64 = clean.iter().sum();

    let mut remainders: Vec<Option<f64>> = Vec::with_capacity(clean.len());
    let mut allocated = 0_u32;
    for (seat, vote) in seats.iter_mut().zip(&clean) {
        let quota = if total_votes > 0.0 {
            vote / total_votes * f64::from(total_seats)
        } else {
            0.0
        };
        let floor = quota.floor();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let whole = floor.min(f64::from(total_seats)) as u32;
        *seat = whole;
        allocated = allocated.saturating_add(whole);
        remainders.push(Some(quota - floor));
    }

    while allocated < total_seats {
        let best = remainders
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.map(|value| (i, value)))
            .fold(None::<(usize, f64)>, |best, (i, value)| match best {
                Some((_, top)) if value <= top => best,
                _ => Some((i, value)),
            });

        let Some((index, _)) = best else {
            // Every party already received a leftover seat this round.
            for remainder in &mut remainders {
                *remainder = Some(0.0);
            }
            continue;
        };

        if let Some(seat) = seats.get_mut(index) {
            *seat = seat.saturating_add(1);
        }
        if let Some(remainder) = remainders.get_mut(index) {
            *remainder = None;
        }
        allocated = allocated.saturating_add(1);
    }

    seats
}

/// Party with the most seats; the first listed wins ties.
pub fn top_seat_party(seats: &[SeatRecord]) -> Option<&str> {
    seats
        .iter()
        .fold(None::<&SeatRecord>, |best, record| match best {
            Some(top) if record.seats <= top.seats => best,
            _ => Some(record),
        })
        .map(|r| r.party.as_str())
}

/// Tally votes, apportion seats and pick the winner. `None` without
/// parties.
pub fn resolve_election(
    parties: &[Party],
    grid: &DistrictGrid,
    total_seats: u32,
    context: &CampaignContext<'_>,
) -> Option<ElectionOutcome> {
    if parties.is_empty() {
        return None;
    }

    let votes = tally_votes(parties, grid, context);
    let seats: Vec<SeatRecord> = parties
        .iter()
        .zip(apportion_seats(&votes, total_seats))
        .map(|(party, seats)| SeatRecord {
            party: party.name.clone(),
            seats,
        })
        .collect();
    let winner = top_seat_party(&seats).unwrap_or(HUNG_PARLIAMENT).to_owned();

    info!(winner = %winner, total_seats, parties = parties.len(), "Election resolved");
    Some(ElectionOutcome { votes, seats, winner })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use electorate_types::IdeologyVector;

    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn hamilton_examples() {
        assert_eq!(apportion_seats(&[50.0, 30.0, 20.0], 10), vec![5, 3, 2]);
        assert_eq!(apportion_seats(&[34.0, 33.0, 33.0], 10), vec![4, 3, 3]);
    }

    #[test]
    fn seat_sum_always_matches_total() {
        let cases: [&[f64]; 5] = [
            &[1.0, 1.0, 1.0],
            &[0.0, 0.0, 0.0],
            &[7.3, 0.0, 2.2, 9.9, 1.1],
            &[1e9, 1.0],
            &[0.0],
        ];
        for votes in cases {
            for total in [1_u32, 7, 120, 121] {
                let seats = apportion_seats(votes, total);
                assert_eq!(seats.iter().sum::<u32>(), total, "votes {votes:?}, total {total}");
            }
        }
    }

    #[test]
    fn zero_votes_rotate_in_party_order() {
        assert_eq!(apportion_seats(&[0.0, 0.0, 0.0], 7), vec![3, 2, 2]);
    }

    #[test]
    fn top_party_prefers_first_on_ties() {
        let seats = vec![
            SeatRecord {
                party: String::from("A"),
                seats: 60,
            },
            SeatRecord {
                party: String::from("B"),
                seats: 60,
            },
        ];
        assert_eq!(top_seat_party(&seats), Some("A"));
        assert_eq!(top_seat_party(&[]), None);
    }

    #[test]
    fn buffs_reward_local_fit() {
        let metro = DistrictTile::new(0, 0, PopulationDensity::Metro, IndustryType::Tech);
        let progressive = Party::new("Liberal", "#f2cc38", IdeologyVector::new(0.3, 0.5, 0.0, 0.0), 0.7);
        let context = CampaignContext {
            player_party: Some("Liberal"),
            campaign_multiplier: 1.5,
        };
        assert!((campaign_buff(&progressive, &metro, &context) - 1.15 * 1.5).abs() < EPS);

        let neutral = CampaignContext {
            player_party: None,
            campaign_multiplier: 1.5,
        };
        let rural = DistrictTile::new(0, 0, PopulationDensity::Rural, IndustryType::HeavyIndustry);
        assert!((campaign_buff(&progressive, &rural, &neutral) - 1.0).abs() < EPS);
    }

    #[test]
    fn closer_party_wins() {
        let grid = DistrictGrid::build(2, 2, |x, y| {
            let mut tile = DistrictTile::new(x, y, PopulationDensity::Urban, IndustryType::Services);
            tile.add_bloc("Service Workers", 2000, IdeologyVector::new(-0.5, 0.2, 0.0, 0.1));
            tile
        })
        .unwrap();
        let parties = vec![
            Party::new("Conservative", "#3861cc", IdeologyVector::new(0.4, -0.55, 0.4, -0.3), 0.45),
            Party::new("SocDem", "#d94747", IdeologyVector::new(-0.6, 0.35, -0.25, 0.35), 0.6),
        ];
        let context = CampaignContext {
            player_party: Some("SocDem"),
            campaign_multiplier: 1.0,
        };
        let outcome = resolve_election(&parties, &grid, 120, &context).unwrap();
        assert_eq!(outcome.winner, "SocDem");
        assert_eq!(outcome.seats.iter().map(|s| s.seats).sum::<u32>(), 120);
        let total_votes: f64 = outcome.votes.iter().sum();
        // 4 tiles x 2000 voters x 0.6 turnout.
        assert!((total_votes - 4800.0).abs() < 1e-6);
        assert!(resolve_election(&[], &grid, 120, &context).is_none());
    }
}
