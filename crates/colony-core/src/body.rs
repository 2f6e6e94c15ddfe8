//! Body loadouts for newly produced agents.
//!
//! The loadout depends on the role, on how far the locale has developed
//! (its extension tier), and for harvesters on the energy available right
//! now. Costs come from [`BodyPart::cost`].

use colony_types::{BodyPart, Role};

use BodyPart::{Attack, Carry, Move, Work};

/// Development tier of a locale, from its completed extension count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    /// No extensions.
    Zero,
    /// Exactly one extension.
    One,
    /// Two or more extensions.
    Two,
}

impl Tier {
    /// Tier for a completed extension count.
    pub const fn from_extensions(count: usize) -> Self {
        match count {
            0 => Self::Zero,
            1 => Self::One,
            _ => Self::Two,
        }
    }
}

const BASIC: &[BodyPart] = &[Work, Carry, Move];
const ENHANCED: &[BodyPart] = &[Work, Work, Carry, Move];
const ADVANCED: &[BodyPart] = &[Work, Work, Carry, Carry, Move, Move];
const STRIKER: &[BodyPart] = &[Attack, Attack, Attack, Attack, Move, Move];

/// The body for `role` at `tier` given `energy` available in the locale.
pub fn body_for(role: Role, tier: Tier, energy: u32) -> Vec<BodyPart> {
    let parts = match (role, tier) {
        (Role::Attacker, _) => STRIKER,
        (_, Tier::Zero) => BASIC,
        (Role::Harvester, Tier::One) => {
            if energy >= 100 {
                ENHANCED
            } else {
                BASIC
            }
        }
        (Role::Harvester, Tier::Two) => {
            if energy >= 400 {
                ADVANCED
            } else if energy >= 300 {
                ENHANCED
            } else {
                BASIC
            }
        }
        (Role::Upgrader | Role::Builder | Role::Maintainer, Tier::One) => ENHANCED,
        (Role::Upgrader | Role::Builder | Role::Maintainer, Tier::Two) => ADVANCED,
    };
    parts.to_vec()
}

/// Total energy cost of a body.
pub fn body_cost(body: &[BodyPart]) -> u32 {
    body.iter()
        .fold(0_u32, |total, part| total.saturating_add(part.cost()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_follow_extension_count() {
        assert_eq!(Tier::from_extensions(0), Tier::Zero);
        assert_eq!(Tier::from_extensions(1), Tier::One);
        assert_eq!(Tier::from_extensions(2), Tier::Two);
        assert_eq!(Tier::from_extensions(40), Tier::Two);
    }

    #[test]
    fn basic_body_costs_200() {
        let body = body_for(Role::Harvester, Tier::Zero, 300);
        assert_eq!(body, vec![Work, Carry, Move]);
        assert_eq!(body_cost(&body), 200);
    }

    #[test]
    fn harvester_scales_with_energy_at_tier_two() {
        assert_eq!(body_cost(&body_for(Role::Harvester, Tier::Two, 450)), 400);
        assert_eq!(body_for(Role::Harvester, Tier::Two, 350), ENHANCED.to_vec());
        assert_eq!(body_for(Role::Harvester, Tier::Two, 299), BASIC.to_vec());
    }

    #[test]
    fn harvester_at_tier_one_checks_energy() {
        assert_eq!(body_for(Role::Harvester, Tier::One, 100), ENHANCED.to_vec());
        assert_eq!(body_for(Role::Harvester, Tier::One, 99), BASIC.to_vec());
    }

    #[test]
    fn workers_ignore_energy() {
        for role in [Role::Upgrader, Role::Builder, Role::Maintainer] {
            assert_eq!(body_for(role, Tier::One, 0), ENHANCED.to_vec());
            assert_eq!(body_for(role, Tier::Two, 0), ADVANCED.to_vec());
        }
    }

    #[test]
    fn attacker_body_is_fixed() {
        let body = body_for(Role::Attacker, Tier::Zero, 0);
        assert_eq!(body_cost(&body), 420);
        assert_eq!(body, body_for(Role::Attacker, Tier::Two, 10_000));
    }
}
