//! Career skill tree
//!
//! Points are awarded by the career layer after matches and spent here by
//! the player. The match core only reads a snapshot.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest level of any branch
pub const MAX_SKILL_LEVEL: u8 = 5;
/// Lifetime spending cap across all branches
pub const MAX_POINTS_SPENT: u32 = 55;

/// Skill branches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillBranch {
    Speed,
    Shoot,
    Control,
    Defense,
}

impl SkillBranch {
    pub const ALL: [SkillBranch; 4] = [
        SkillBranch::Speed,
        SkillBranch::Shoot,
        SkillBranch::Control,
        SkillBranch::Defense,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillBranch::Speed => "speed",
            SkillBranch::Shoot => "shoot",
            SkillBranch::Control => "control",
            SkillBranch::Defense => "defense",
        }
    }
}

/// Why an upgrade was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkillError {
    #[error("{0:?} is already at max level")]
    MaxLevel(SkillBranch),
    #[error("upgrade needs {needed} points, {available} available")]
    NotEnoughPoints { needed: u32, available: u32 },
    #[error("upgrade costing {cost} would pass the spend cap ({spent} already spent)")]
    SpendCap { spent: u32, cost: u32 },
}

/// Per-branch levels, 0..=5
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLevels {
    pub speed: u8,
    pub shoot: u8,
    pub control: u8,
    pub defense: u8,
}

/// Persistent career skill progression
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTreeState {
    pub levels: SkillLevels,
    pub available_points: u32,
    pub total_points_spent: u32,
}

impl SkillTreeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self, branch: SkillBranch) -> u8 {
        match branch {
            SkillBranch::Speed => self.levels.speed,
            SkillBranch::Shoot => self.levels.shoot,
            SkillBranch::Control => self.levels.control,
            SkillBranch::Defense => self.levels.defense,
        }
    }

    fn level_mut(&mut self, branch: SkillBranch) -> &mut u8 {
        match branch {
            SkillBranch::Speed => &mut self.levels.speed,
            SkillBranch::Shoot => &mut self.levels.shoot,
            SkillBranch::Control => &mut self.levels.control,
            SkillBranch::Defense => &mut self.levels.defense,
        }
    }

    /// Cost of the next level (the level number itself), None at max
    pub fn upgrade_cost(&self, branch: SkillBranch) -> Option<u32> {
        let level = self.level(branch);
        (level < MAX_SKILL_LEVEL).then(|| u32::from(level) + 1)
    }

    /// Credit points earned by the career layer
    pub fn award_points(&mut self, points: u32) {
        self.available_points = self.available_points.saturating_add(points);
    }

    /// Check an upgrade without applying it
    pub fn check_upgrade(&self, branch: SkillBranch) -> Result<u32, SkillError> {
        let cost = self
            .upgrade_cost(branch)
            .ok_or(SkillError::MaxLevel(branch))?;
        if self.total_points_spent + cost > MAX_POINTS_SPENT {
            return Err(SkillError::SpendCap {
                spent: self.total_points_spent,
                cost,
            });
        }
        if self.available_points < cost {
            return Err(SkillError::NotEnoughPoints {
                needed: cost,
                available: self.available_points,
            });
        }
        Ok(cost)
    }

    pub fn can_upgrade(&self, branch: SkillBranch) -> bool {
        self.check_upgrade(branch).is_ok()
    }

    /// Raise a branch by exactly one level. On error nothing changes.
    pub fn upgrade(&mut self, branch: SkillBranch) -> Result<u8, SkillError> {
        let cost = self.check_upgrade(branch)?;
        self.available_points -= cost;
        self.total_points_spent += cost;
        let level = self.level_mut(branch);
        *level += 1;
        let level = *level;
        log::info!(
            "Skill {} upgraded to {} ({} points spent)",
            branch.as_str(),
            level,
            self.total_points_spent
        );
        Ok(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upgrade_is_sequential_and_costs_level() {
        let mut tree = SkillTreeState::new();
        tree.award_points(10);
        assert_eq!(tree.upgrade(SkillBranch::Speed), Ok(1));
        assert_eq!(tree.upgrade(SkillBranch::Speed), Ok(2));
        assert_eq!(tree.available_points, 7);
        assert_eq!(tree.total_points_spent, 3);
        assert_eq!(tree.upgrade_cost(SkillBranch::Speed), Some(3));
    }

    #[test]
    fn test_not_enough_points_leaves_state() {
        let mut tree = SkillTreeState::new();
        tree.award_points(1);
        tree.upgrade(SkillBranch::Shoot).unwrap();
        let before = tree.clone();
        assert_eq!(
            tree.upgrade(SkillBranch::Shoot),
            Err(SkillError::NotEnoughPoints {
                needed: 2,
                available: 0
            })
        );
        assert_eq!(tree, before);
    }

    #[test]
    fn test_max_level_rejected() {
        let mut tree = SkillTreeState::new();
        tree.award_points(100);
        for _ in 0..5 {
            tree.upgrade(SkillBranch::Control).unwrap();
        }
        assert_eq!(
            tree.upgrade(SkillBranch::Control),
            Err(SkillError::MaxLevel(SkillBranch::Control))
        );
        assert_eq!(tree.level(SkillBranch::Control), MAX_SKILL_LEVEL);
    }

    #[test]
    fn test_spend_cap_rejected() {
        let mut tree = SkillTreeState::new();
        tree.award_points(100);
        // Three full branches cost 45, four levels of the last cost 10 more
        for branch in [SkillBranch::Speed, SkillBranch::Shoot, SkillBranch::Control] {
            for _ in 0..5 {
                tree.upgrade(branch).unwrap();
            }
        }
        for _ in 0..4 {
            tree.upgrade(SkillBranch::Defense).unwrap();
        }
        assert_eq!(tree.total_points_spent, 55);

        let before = tree.clone();
        assert_eq!(
            tree.upgrade(SkillBranch::Defense),
            Err(SkillError::SpendCap { spent: 55, cost: 5 })
        );
        assert_eq!(tree, before);
        assert!(tree.total_points_spent <= MAX_POINTS_SPENT);
    }

    #[test]
    fn test_spend_cap_checked_before_points() {
        let tree = SkillTreeState {
            levels: SkillLevels {
                speed: 4,
                ..Default::default()
            },
            available_points: 0,
            total_points_spent: 52,
        };
        assert!(matches!(
            tree.check_upgrade(SkillBranch::Speed),
            Err(SkillError::SpendCap { .. })
        ));
    }
}
