//! Rule variants.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Immutable rule toggles threaded into the board and the search view.
///
/// Several house-rule variants exist and none is canonical, so each one is
/// an explicit switch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RuleConfig {
    /// On equal ranks only the attacker is removed.
    pub defender_advantage: bool,
    /// A defender that beats its attacker steps onto the cell the attack
    /// came from.
    pub defender_moves_on_win: bool,
    /// Attacks reveal the attacker on screen but keep the defender hidden.
    pub hide_defender: bool,
    /// A bomb is removed together with the first piece that hits it.
    pub one_time_bombs: bool,
    /// Enforce the two-squares repetition rule against both sides. The
    /// engine always obeys it for its own moves.
    pub two_squares: bool,
}

impl Default for RuleConfig {
    fn default() -> Self {
        RuleConfig {
            defender_advantage: false,
            defender_moves_on_win: false,
            hide_defender: false,
            one_time_bombs: false,
            two_squares: true,
        }
    }
}

impl RuleConfig {
    /// Default rules without the repetition restriction.
    #[must_use]
    pub fn without_two_squares() -> Self {
        RuleConfig {
            two_squares: false,
            ..RuleConfig::default()
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn json_round_trip() {
        let rules = RuleConfig {
            one_time_bombs: true,
            ..RuleConfig::default()
        };
        let text = serde_json::to_string(&rules).unwrap();
        let back: RuleConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, rules);
    }
}
