use super::traits::ConfigSection;
use crate::error::CoachError;
use serde::{Deserialize, Serialize};

/// Rink geometry and sensing radii the blackboard derives its senses from.
///
/// Team 0 defends the left goal, team 1 the right one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RinkConfig {
    pub center_x: f64,
    pub center_y: f64,
    pub left_goal_x: f64,
    pub right_goal_x: f64,
    /// Distance past centre ice where the defensive and offensive zones begin
    pub zone_margin: f64,
    pub shot_range: f64,
    pub pressure_radius: f64,
    /// Ticks of puck velocity used to predict the intercept point
    pub intercept_lookahead: f64,
    pub carry_distance: f64,
    /// Teammates this close to the enemy goal are backdoor options
    pub backdoor_radius: f64,
    /// Minimum possession ticks before a pass is attempted without a memoized target
    pub min_possession_for_pass: u32,
}

impl Default for RinkConfig {
    fn default() -> Self {
        Self {
            center_x: 500.0,
            center_y: 320.0,
            left_goal_x: 50.0,
            right_goal_x: 950.0,
            zone_margin: 60.0,
            shot_range: 200.0,
            pressure_radius: 60.0,
            intercept_lookahead: 10.0,
            carry_distance: 100.0,
            backdoor_radius: 120.0,
            min_possession_for_pass: 10,
        }
    }
}

impl ConfigSection for RinkConfig {
    fn section_name() -> &'static str {
        "rink"
    }

    fn validate(&self) -> Result<(), CoachError> {
        if self.left_goal_x >= self.right_goal_x {
            return Err(CoachError::Configuration(
                "Left goal must lie left of the right goal".to_string(),
            ));
        }
        if !(self.left_goal_x..=self.right_goal_x).contains(&self.center_x) {
            return Err(CoachError::Configuration(
                "Centre ice must lie between the goals".to_string(),
            ));
        }
        let radii = [
            self.zone_margin,
            self.shot_range,
            self.pressure_radius,
            self.carry_distance,
            self.backdoor_radius,
        ];
        if radii.iter().any(|r| !r.is_finite() || *r < 0.0) {
            return Err(CoachError::Configuration(
                "Rink distances must be finite and non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
