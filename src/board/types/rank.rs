//! Rank data table and combat resolution.
//!
//! Every per-rank fact (army count, heuristic value, mobility) lives in a
//! plain table indexed by [`Rank::index`]. Combat is the pure function
//! [`fight`].

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::RuleConfig;

/// Number of rank slots, including the `Unknown` sentinel and the unused slot 0.
pub const RANK_SLOTS: usize = 14;

/// Pieces per side.
pub const ARMY_SIZE: usize = 40;

/// Combat strength class of a piece.
///
/// `One` is the strongest numeric rank and `Nine` the weakest. `Unknown`
/// never belongs to a real piece; the search view uses it for opponent
/// pieces whose identity has not been revealed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Rank {
    One = 1,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Spy,
    Bomb,
    Flag,
    Unknown,
}

/// Static per-rank data.
#[derive(Clone, Copy, Debug)]
pub struct RankInfo {
    /// Pieces of this rank in a full army.
    pub count: u8,
    /// Base heuristic value used by the evaluator.
    pub value: i32,
    /// Whether the rank may ever leave its square.
    pub movable: bool,
}

const fn info(count: u8, value: i32, movable: bool) -> RankInfo {
    RankInfo {
        count,
        value,
        movable,
    }
}

/// Rank table indexed by [`Rank::index`].
pub const RANK_TABLE: [RankInfo; RANK_SLOTS] = [
    info(0, 0, false),
    info(1, 800, true),
    info(1, 400, true),
    info(2, 200, true),
    info(3, 100, true),
    info(4, 50, true),
    info(4, 30, true),
    info(4, 25, true),
    info(5, 60, true),
    info(8, 25, true),
    info(1, 600, true),
    info(6, 0, false),
    info(1, 0, false),
    info(0, 35, true),
];

impl Rank {
    /// The twelve ranks a real army is built from, strongest numeric first.
    pub const ARMY: [Rank; 12] = [
        Rank::One,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Spy,
        Rank::Bomb,
        Rank::Flag,
    ];

    /// Numeric ranks in descending strength.
    pub const NUMERIC: [Rank; 9] = [
        Rank::One,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
    ];

    /// The rank that may travel any distance along a line.
    pub const LONG_RANGE: Rank = Rank::Nine;

    /// The rank that defuses bombs.
    pub const SAPPER: Rank = Rank::Eight;

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn from_index(idx: usize) -> Option<Rank> {
        match idx {
            1 => Some(Rank::One),
            2 => Some(Rank::Two),
            3 => Some(Rank::Three),
            4 => Some(Rank::Four),
            5 => Some(Rank::Five),
            6 => Some(Rank::Six),
            7 => Some(Rank::Seven),
            8 => Some(Rank::Eight),
            9 => Some(Rank::Nine),
            10 => Some(Rank::Spy),
            11 => Some(Rank::Bomb),
            12 => Some(Rank::Flag),
            13 => Some(Rank::Unknown),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn info(self) -> RankInfo {
        RANK_TABLE[self.index()]
    }

    #[inline]
    #[must_use]
    pub const fn count(self) -> u8 {
        self.info().count
    }

    #[inline]
    #[must_use]
    pub const fn base_value(self) -> i32 {
        self.info().value
    }

    #[inline]
    #[must_use]
    pub const fn is_movable(self) -> bool {
        self.info().movable
    }

    /// True for ranks One through Nine.
    #[inline]
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        (self as u8) <= 9
    }

    #[inline]
    #[must_use]
    pub const fn bit(self) -> u16 {
        1 << (self as u8)
    }

    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Rank::One => '1',
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Spy => 'S',
            Rank::Bomb => 'B',
            Rank::Flag => 'F',
            Rank::Unknown => '?',
        }
    }

    #[must_use]
    pub fn from_char(c: char) -> Option<Rank> {
        match c.to_ascii_uppercase() {
            '1'..='9' => Rank::from_index(c as usize - '0' as usize),
            'S' => Some(Rank::Spy),
            'B' => Some(Rank::Bomb),
            'F' => Some(Rank::Flag),
            '?' => Some(Rank::Unknown),
            _ => None,
        }
    }

    /// Strongest rank recorded in a rank bit set.
    #[must_use]
    pub fn lowest_in(bits: u16) -> Option<Rank> {
        if bits == 0 {
            None
        } else {
            Rank::from_index(bits.trailing_zeros() as usize)
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Result of an attack from the attacker's point of view.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Outcome {
    /// Defender removed, attacker survives.
    Wins,
    /// Attacker removed, defender survives.
    Loses,
    /// Both removed.
    Even,
    /// At least one rank is hidden.
    Unknown,
}

/// Resolve an attack of `attacker` on `defender` under `rules`.
#[must_use]
pub fn fight(attacker: Rank, defender: Rank, rules: &RuleConfig) -> Outcome {
    if defender == Rank::Flag {
        return Outcome::Wins;
    }
    if attacker == Rank::Unknown || defender == Rank::Unknown {
        return Outcome::Unknown;
    }
    if attacker == defender {
        return if rules.defender_advantage {
            Outcome::Loses
        } else {
            Outcome::Even
        };
    }
    if defender == Rank::Bomb {
        return if attacker == Rank::SAPPER {
            Outcome::Wins
        } else if rules.one_time_bombs {
            Outcome::Even
        } else {
            Outcome::Loses
        };
    }
    if attacker == Rank::Spy && defender == Rank::One {
        return Outcome::Wins;
    }
    if attacker.index() < defender.index() {
        Outcome::Wins
    } else {
        Outcome::Loses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn army_totals_forty() {
        let total: usize = Rank::ARMY.iter().map(|r| r.count() as usize).sum();
        assert_eq!(total, ARMY_SIZE);
    }

    #[test]
    fn char_round_trip() {
        for rank in Rank::ARMY {
            assert_eq!(Rank::from_char(rank.to_char()), Some(rank));
        }
    }

    #[test]
    fn lowest_in_picks_strongest() {
        let bits = Rank::Five.bit() | Rank::Three.bit() | Rank::Nine.bit();
        assert_eq!(Rank::lowest_in(bits), Some(Rank::Three));
        assert_eq!(Rank::lowest_in(0), None);
    }
}
