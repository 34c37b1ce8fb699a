//! Slope forces acting on a rolling ball.
//!
//! Two effects come from the green's tilt:
//!
//! - **Break**: a left/right slope pushes the ball sideways while it rolls.
//!   The push scales with speed, so a ball creeping toward rest stops
//!   breaking instead of sliding off the green forever.
//! - **Grade**: an up/down slope first changes the launch speed, then keeps
//!   bleeding (uphill) or feeding (downhill) speed on every step.
//!
//! ```text
//!          hole
//!           ●
//!          ╱          slope_left_right > 0
//!         ╱           ───────────────────▶ +X
//!        ╱
//!       ○  ball
//! ```

use crate::integrator::ForceModel;
use crate::presets::PhysicsConfig;
use crate::types::{PuttingInput, SimulationState, Vec3};

/// Force model for a planar, tilted green.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreenForces {
    /// Positive breaks toward +X.
    pub slope_left_right: f64,
    /// Positive is uphill.
    pub slope_up_down: f64,
    pub curve_factor: f64,
    pub speed_factor: f64,

    /// Enable/disable individual effects (useful for testing)
    pub enable_break: bool,
    pub enable_grade: bool,
}

impl GreenForces {
    pub fn new(input: &PuttingInput, config: &PhysicsConfig) -> Self {
        Self {
            slope_left_right: input.slope_left_right(),
            slope_up_down: input.slope_up_down(),
            curve_factor: config.slope_curve_factor,
            speed_factor: config.slope_speed_factor,
            enable_break: true,
            enable_grade: true,
        }
    }

    /// A perfectly flat green.
    pub fn flat() -> Self {
        Self {
            slope_left_right: 0.0,
            slope_up_down: 0.0,
            curve_factor: 0.0,
            speed_factor: 0.0,
            enable_break: false,
            enable_grade: false,
        }
    }
}

impl ForceModel for GreenForces {
    fn linear_acceleration(&self, _state: &SimulationState, speed: f64) -> Vec3 {
        if !self.enable_break {
            return Vec3::ZERO;
        }
        Vec3::ground(self.slope_left_right * self.curve_factor * speed, 0.0)
    }

    fn speed_retention(&self, dt: f64) -> f64 {
        if !self.enable_grade {
            return 1.0;
        }
        (1.0 - self.slope_up_down * self.speed_factor * dt).max(0.0)
    }
}

/// Launch speed multiplier from the up/down slope.
///
/// Uphill reduces and downhill increases the initial speed, bounded by the
/// configured range.
pub fn launch_multiplier(slope_up_down: f64, config: &PhysicsConfig) -> f64 {
    (1.0 - slope_up_down * config.slope_launch_factor)
        .clamp(config.launch_multiplier_min, config.launch_multiplier_max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rolling(vz: f64) -> SimulationState {
        SimulationState::new(Vec3::ZERO, Vec3::ground(0.0, vz))
    }

    fn forces(left_right: f64, up_down: f64) -> GreenForces {
        let input = PuttingInput::builder(10.0)
            .slope_left_right(left_right)
            .slope_up_down(up_down)
            .build()
            .unwrap();
        GreenForces::new(&input, &PhysicsConfig::standard())
    }

    #[test]
    fn test_flat_green_has_no_effect() {
        let f = GreenForces::flat();
        let state = rolling(-5.0);
        assert_eq!(f.linear_acceleration(&state, 5.0), Vec3::ZERO);
        assert_eq!(f.speed_retention(1.0 / 60.0), 1.0);
    }

    #[test]
    fn test_right_break_pushes_positive_x() {
        let f = forces(10.0, 0.0);
        let acc = f.linear_acceleration(&rolling(-5.0), 5.0);
        assert!(acc.x > 0.0, "Right break should push +X, got {}", acc.x);
        assert_eq!(acc.z, 0.0);

        let left = forces(-10.0, 0.0).linear_acceleration(&rolling(-5.0), 5.0);
        assert!(left.x < 0.0);
    }

    #[test]
    fn test_break_scales_with_speed() {
        let f = forces(10.0, 0.0);
        let slow = f.linear_acceleration(&rolling(-1.0), 1.0);
        let fast = f.linear_acceleration(&rolling(-4.0), 4.0);
        assert!((fast.x - 4.0 * slow.x).abs() < 1e-12);
    }

    #[test]
    fn test_uphill_bleeds_speed() {
        let dt = 1.0 / 60.0;
        assert!(forces(0.0, 15.0).speed_retention(dt) < 1.0);
        assert!(forces(0.0, -15.0).speed_retention(dt) > 1.0);
        assert_eq!(forces(0.0, 0.0).speed_retention(dt), 1.0);
    }

    #[test]
    fn test_disabled_effects() {
        let f = GreenForces {
            enable_break: false,
            enable_grade: false,
            ..forces(10.0, 10.0)
        };
        assert_eq!(f.linear_acceleration(&rolling(-5.0), 5.0), Vec3::ZERO);
        assert_eq!(f.speed_retention(1.0 / 60.0), 1.0);
    }

    #[test]
    fn test_launch_multiplier_bounds() {
        let config = PhysicsConfig::standard();
        assert_eq!(launch_multiplier(0.0, &config), 1.0);
        assert!((launch_multiplier(15.0, &config) - 0.7).abs() < 1e-12);
        assert!((launch_multiplier(-10.0, &config) - 1.2).abs() < 1e-12);
        assert_eq!(launch_multiplier(100.0, &config), config.launch_multiplier_min);
        assert_eq!(launch_multiplier(-100.0, &config), config.launch_multiplier_max);
    }
}
