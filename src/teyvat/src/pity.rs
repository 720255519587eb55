//! Pity counters
//!
//! Reduces a pull history to the count of pulls since the last rank-5 result
//! on each banner. A pure fold over the caller-held wish list; nothing here
//! is persisted.

use serde::{Deserialize, Serialize};

use crate::wish::{Banner, Rank, Wish};

/// Pulls since the last rank-5 result, per banner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PityState {
    pub standard: u32,
    pub character: u32,
    pub weapon: u32,
}

impl PityState {
    /// Counter for one banner
    pub fn counter(&self, banner: Banner) -> u32 {
        match banner {
            Banner::Standard => self.standard,
            Banner::Character => self.character,
            Banner::Weapon => self.weapon,
        }
    }

    fn counter_mut(&mut self, banner: Banner) -> &mut u32 {
        match banner {
            Banner::Standard => &mut self.standard,
            Banner::Character => &mut self.character,
            Banner::Weapon => &mut self.weapon,
        }
    }
}

/// Fold a pull history into current pity counters.
///
/// Pulls are processed in ascending time order. Each pull increments its
/// banner's counter; a rank-5 pull resets that counter to zero after the
/// increment, so the pull that hits rank 5 consumes pity and the next pull
/// starts the count at 1.
pub fn compute_pity(wishes: &[Wish]) -> PityState {
    let mut ordered: Vec<&Wish> = wishes.iter().collect();
    ordered.sort_by_key(|w| w.time);

    let mut pity = PityState::default();
    for wish in ordered {
        let counter = pity.counter_mut(wish.banner);
        *counter += 1;
        if wish.rank_type == Rank::Five {
            *counter = 0;
        }
    }
    pity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wish::ItemKind;
    use chrono::{TimeZone, Utc};

    fn wish(minute: u32, banner: Banner, rank: Rank) -> Wish {
        Wish {
            id: minute.to_string(),
            time: Utc.with_ymd_and_hms(2024, 3, 1, 12, minute, 0).unwrap(),
            name: "Test".to_string(),
            rank_type: rank,
            item_type: ItemKind::Character,
            banner,
        }
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(compute_pity(&[]), PityState::default());
    }

    #[test]
    fn test_counter_resets_after_rank_five() {
        let ranks = [Rank::Three, Rank::Three, Rank::Three, Rank::Five, Rank::Three, Rank::Three];
        let wishes: Vec<Wish> = ranks
            .iter()
            .enumerate()
            .map(|(i, &r)| wish(i as u32, Banner::Weapon, r))
            .collect();
        let pity = compute_pity(&wishes);
        assert_eq!(pity.weapon, 2);
        assert_eq!(pity.standard, 0);
        assert_eq!(pity.character, 0);
    }

    #[test]
    fn test_rank_five_as_last_pull_leaves_zero() {
        let wishes = vec![
            wish(0, Banner::Character, Rank::Three),
            wish(1, Banner::Character, Rank::Five),
        ];
        assert_eq!(compute_pity(&wishes).character, 0);
    }

    #[test]
    fn test_banners_count_independently() {
        let wishes = vec![
            wish(0, Banner::Standard, Rank::Three),
            wish(1, Banner::Character, Rank::Three),
            wish(2, Banner::Character, Rank::Three),
            wish(3, Banner::Weapon, Rank::Five),
            wish(4, Banner::Weapon, Rank::Three),
        ];
        let pity = compute_pity(&wishes);
        assert_eq!(pity.counter(Banner::Standard), 1);
        assert_eq!(pity.counter(Banner::Character), 2);
        assert_eq!(pity.counter(Banner::Weapon), 1);
    }

    #[test]
    fn test_out_of_order_input_is_sorted_by_time() {
        // rank-5 is chronologically first even though it appears last
        let wishes = vec![
            wish(5, Banner::Standard, Rank::Three),
            wish(6, Banner::Standard, Rank::Three),
            wish(0, Banner::Standard, Rank::Five),
        ];
        assert_eq!(compute_pity(&wishes).standard, 2);
    }

    #[test]
    fn test_rank_four_does_not_reset() {
        let wishes = vec![
            wish(0, Banner::Character, Rank::Four),
            wish(1, Banner::Character, Rank::Four),
        ];
        assert_eq!(compute_pity(&wishes).character, 2);
    }
}
