//! Captain selection - fair random draw of the two team captains
//!
//! Existing captains are kept, so a reassignment only redraws the side
//! that lost its captain. The random source is injected by the caller.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::entities::{DraftPlayer, PlayerId, TeamSide};

/// The captain of each team
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captains {
    pub team1: PlayerId,
    pub team2: PlayerId,
}

impl Captains {
    pub fn of(&self, side: TeamSide) -> &PlayerId {
        match side {
            TeamSide::One => &self.team1,
            TeamSide::Two => &self.team2,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CaptainSelectionError {
    #[error("No eligible captain left for team {}", .0.number())]
    NoCandidates(TeamSide),
}

/// Players that could captain `side`, in identity order
pub fn captain_candidates(
    players: &BTreeMap<PlayerId, DraftPlayer>,
    side: TeamSide,
    exclude: Option<&PlayerId>,
) -> Vec<PlayerId> {
    players
        .iter()
        .filter(|(id, player)| Some(*id) != exclude && player.can_lead(side))
        .map(|(id, _)| id.clone())
        .collect()
}

/// Fill every side that lacks a captain with a uniformly drawn candidate
pub fn select_captains<R: Rng + ?Sized>(
    players: &mut BTreeMap<PlayerId, DraftPlayer>,
    exclude: Option<&PlayerId>,
    rng: &mut R,
) -> Result<Captains, CaptainSelectionError> {
    let mut chosen: [Option<PlayerId>; 2] = [None, None];
    for (id, player) in players.iter() {
        if let Some(side) = player.captain_of() {
            chosen[slot(side)] = Some(id.clone());
        }
    }

    for side in TeamSide::ALL {
        if chosen[slot(side)].is_some() {
            continue;
        }

        let pool = captain_candidates(players, side, exclude);
        let pick = pool
            .choose(rng)
            .cloned()
            .ok_or(CaptainSelectionError::NoCandidates(side))?;

        if let Some(player) = players.get_mut(&pick) {
            player.make_captain(side);
        }
        chosen[slot(side)] = Some(pick);
    }

    match chosen {
        [Some(team1), Some(team2)] => Ok(Captains { team1, team2 }),
        [None, _] => Err(CaptainSelectionError::NoCandidates(TeamSide::One)),
        [_, None] => Err(CaptainSelectionError::NoCandidates(TeamSide::Two)),
    }
}

fn slot(side: TeamSide) -> usize {
    (side.number() - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn queue(n: usize) -> BTreeMap<PlayerId, DraftPlayer> {
        (0..n)
            .map(|i| {
                let name = format!("player{}", i);
                (PlayerId::new(name.clone()), DraftPlayer::new(name, false))
            })
            .collect()
    }

    #[test]
    fn test_selects_two_distinct_captains() {
        let mut players = queue(8);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let captains = select_captains(&mut players, None, &mut rng).unwrap();

        assert_ne!(captains.team1, captains.team2);
        assert_eq!(players[&captains.team1].captain_of(), Some(TeamSide::One));
        assert_eq!(players[&captains.team2].captain_of(), Some(TeamSide::Two));
        assert_eq!(players.values().filter(|p| p.is_captain()).count(), 2);
    }

    #[test]
    fn test_same_seed_same_captains() {
        let mut a = queue(8);
        let mut b = queue(8);

        let first = select_captains(&mut a, None, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        let second = select_captains(&mut b, None, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_keeps_surviving_captain_and_skips_excluded() {
        let mut players = queue(8);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let captains = select_captains(&mut players, None, &mut rng).unwrap();

        let old = captains.team1.clone();
        players.get_mut(&old).unwrap().clear_captaincy();

        for seed in 0..20 {
            let mut trial = players.clone();
            let redrawn =
                select_captains(&mut trial, Some(&old), &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
            assert_eq!(redrawn.team2, captains.team2);
            assert_ne!(redrawn.team1, old);
        }
    }

    #[test]
    fn test_subs_are_never_drawn() {
        let mut players = queue(2);
        players.insert(PlayerId::from("sub"), DraftPlayer::new("sub", true));
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let captains = select_captains(&mut players, None, &mut rng).unwrap();

        assert_ne!(captains.team1.as_str(), "sub");
        assert_ne!(captains.team2.as_str(), "sub");
    }

    #[test]
    fn test_empty_pool_is_an_error() {
        let mut players = queue(1);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let result = select_captains(&mut players, None, &mut rng);

        assert_eq!(result, Err(CaptainSelectionError::NoCandidates(TeamSide::Two)));
    }
}
