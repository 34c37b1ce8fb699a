//! Core types for the putting simulation.
//!
//! Units:
//! - Logical distances: feet (ft)
//! - World positions: simulation units (see [`crate::scale`])
//! - Velocity: units per second
//! - Time: seconds (s)
//!
//! Coordinate system:
//! - X: across the green (positive = right from the golfer's view)
//! - Y: vertical (positive upward)
//! - Z: along the green (the hole lies toward -Z from the ball)

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use crate::error::PuttError;

// =============================================================================
// Vec3 - 3D Vector
// =============================================================================

/// A 3D vector used for positions and velocities.
///
/// Rolling happens in the X/Z plane; Y carries height so the same type can
/// describe the cosmetic drop into the cup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Point on the ground plane.
    pub const fn ground(x: f64, z: f64) -> Self {
        Self { x, y: 0.0, z }
    }

    /// Squared magnitude (avoids sqrt for comparisons)
    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Magnitude (length) of the vector
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Length of the X/Z projection.
    pub fn horizontal_magnitude(&self) -> f64 {
        (self.x * self.x + self.z * self.z).sqrt()
    }

    /// Returns a unit vector in the same direction, or zero if magnitude is zero
    pub fn normalized(&self) -> Self {
        let mag = self.magnitude();
        if mag < constants::EPSILON {
            Self::ZERO
        } else {
            *self / mag
        }
    }

    pub fn distance(&self, other: &Self) -> f64 {
        (*self - *other).magnitude()
    }

    /// Distance between the ground projections of two points.
    pub fn horizontal_distance(&self, other: &Self) -> f64 {
        (*self - *other).horizontal_magnitude()
    }

    /// Linear interpolation between two vectors
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        *self + (*other - *self) * t
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, scalar: f64) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
            z: self.z / scalar,
        }
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

// =============================================================================
// Putting Input
// =============================================================================

/// Everything the golfer and the course contribute to one putt.
///
/// Fields are private: an input can only be obtained through
/// [`PuttingInput::new`] or [`PuttingInputBuilder`], both of which reject
/// out-of-range values instead of clamping them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PuttingInput {
    power_distance_feet: f64,
    hole_distance_feet: f64,
    power_percent: f64,
    aim_angle_degrees: f64,
    green_speed: f64,
    slope_up_down: f64,
    slope_left_right: f64,
}

impl PuttingInput {
    /// Validate and build an input.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        power_distance_feet: f64,
        hole_distance_feet: f64,
        power_percent: f64,
        aim_angle_degrees: f64,
        green_speed: f64,
        slope_up_down: f64,
        slope_left_right: f64,
    ) -> Result<Self, PuttError> {
        let input = Self {
            power_distance_feet,
            hole_distance_feet,
            power_percent,
            aim_angle_degrees,
            green_speed,
            slope_up_down,
            slope_left_right,
        };
        input.validate()?;
        Ok(input)
    }

    /// Start a builder with a straight, flat putt where power equals distance.
    pub fn builder(hole_distance_feet: f64) -> PuttingInputBuilder {
        PuttingInputBuilder::new(hole_distance_feet)
    }

    fn validate(&self) -> Result<(), PuttError> {
        if !self.hole_distance_feet.is_finite() || self.hole_distance_feet <= 0.0 {
            return Err(PuttError::invalid(
                "hole_distance_feet",
                self.hole_distance_feet,
                "must be a positive distance",
            ));
        }
        if !self.power_distance_feet.is_finite() || self.power_distance_feet < 0.0 {
            return Err(PuttError::invalid(
                "power_distance_feet",
                self.power_distance_feet,
                "must be a non-negative distance",
            ));
        }
        if !(constants::POWER_PERCENT_MIN..=constants::POWER_PERCENT_MAX)
            .contains(&self.power_percent)
        {
            return Err(PuttError::invalid(
                "power_percent",
                self.power_percent,
                "must be within [0, 100]",
            ));
        }
        if !(constants::AIM_ANGLE_MIN..=constants::AIM_ANGLE_MAX).contains(&self.aim_angle_degrees)
        {
            return Err(PuttError::invalid(
                "aim_angle_degrees",
                self.aim_angle_degrees,
                "must be within [-45, 45]",
            ));
        }
        if !self.green_speed.is_finite() || self.green_speed <= 0.0 {
            return Err(PuttError::invalid(
                "green_speed",
                self.green_speed,
                "must be a positive stimp rating",
            ));
        }
        if !self.slope_up_down.is_finite() {
            return Err(PuttError::invalid(
                "slope_up_down",
                self.slope_up_down,
                "must be finite",
            ));
        }
        if !self.slope_left_right.is_finite() {
            return Err(PuttError::invalid(
                "slope_left_right",
                self.slope_left_right,
                "must be finite",
            ));
        }
        Ok(())
    }

    pub fn power_distance_feet(&self) -> f64 {
        self.power_distance_feet
    }

    pub fn hole_distance_feet(&self) -> f64 {
        self.hole_distance_feet
    }

    pub fn power_percent(&self) -> f64 {
        self.power_percent
    }

    pub fn aim_angle_degrees(&self) -> f64 {
        self.aim_angle_degrees
    }

    pub fn green_speed(&self) -> f64 {
        self.green_speed
    }

    pub fn slope_up_down(&self) -> f64 {
        self.slope_up_down
    }

    pub fn slope_left_right(&self) -> f64 {
        self.slope_left_right
    }

    /// Distance the stroke would roll on flat ground, in feet.
    pub fn intended_distance_feet(&self) -> f64 {
        self.power_distance_feet * self.power_percent / 100.0
    }

    /// Unit launch direction on the ground plane. Zero aim points at -Z.
    pub fn aim_direction(&self) -> Vec3 {
        let aim = self.aim_angle_degrees.to_radians();
        Vec3::ground(aim.sin(), -aim.cos())
    }
}

/// Builder for [`PuttingInput`]; `build` runs the same validation as `new`.
#[derive(Debug, Clone, Copy)]
pub struct PuttingInputBuilder {
    power_distance_feet: f64,
    hole_distance_feet: f64,
    power_percent: f64,
    aim_angle_degrees: f64,
    green_speed: f64,
    slope_up_down: f64,
    slope_left_right: f64,
}

impl PuttingInputBuilder {
    pub fn new(hole_distance_feet: f64) -> Self {
        Self {
            power_distance_feet: hole_distance_feet,
            hole_distance_feet,
            power_percent: 100.0,
            aim_angle_degrees: 0.0,
            green_speed: constants::REFERENCE_STIMP,
            slope_up_down: 0.0,
            slope_left_right: 0.0,
        }
    }

    pub fn power_distance_feet(mut self, feet: f64) -> Self {
        self.power_distance_feet = feet;
        self
    }

    pub fn power_percent(mut self, percent: f64) -> Self {
        self.power_percent = percent;
        self
    }

    pub fn aim_angle_degrees(mut self, degrees: f64) -> Self {
        self.aim_angle_degrees = degrees;
        self
    }

    pub fn green_speed(mut self, stimp: f64) -> Self {
        self.green_speed = stimp;
        self
    }

    pub fn slope_up_down(mut self, slope: f64) -> Self {
        self.slope_up_down = slope;
        self
    }

    pub fn slope_left_right(mut self, slope: f64) -> Self {
        self.slope_left_right = slope;
        self
    }

    pub fn build(self) -> Result<PuttingInput, PuttError> {
        PuttingInput::new(
            self.power_distance_feet,
            self.hole_distance_feet,
            self.power_percent,
            self.aim_angle_degrees,
            self.green_speed,
            self.slope_up_down,
            self.slope_left_right,
        )
    }
}

// =============================================================================
// Simulation State
// =============================================================================

/// Mutable state of the ball during one simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub step: usize,
}

impl SimulationState {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self {
            position,
            velocity,
            step: 0,
        }
    }

    pub fn speed(&self) -> f64 {
        self.velocity.magnitude()
    }
}

// =============================================================================
// Trajectory
// =============================================================================

/// Ordered ball positions produced by one simulation, one per integration step.
///
/// Index `i` is the position after `i` steps; index 0 is the start position.
/// A trajectory is sealed when returned and cannot be extended or replayed
/// through the integrator; a new putt always produces a new trajectory.
/// It always holds at least the start position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TrajectoryDef")]
pub struct Trajectory {
    points: Vec<Vec3>,
    timestep: f64,
}

#[derive(Deserialize)]
struct TrajectoryDef {
    points: Vec<Vec3>,
    timestep: f64,
}

impl TryFrom<TrajectoryDef> for Trajectory {
    type Error = PuttError;

    fn try_from(def: TrajectoryDef) -> Result<Self, Self::Error> {
        if def.points.is_empty() {
            return Err(PuttError::EmptyTable("trajectory"));
        }
        if !(def.timestep.is_finite() && def.timestep > 0.0) {
            return Err(PuttError::InvalidConfig(format!(
                "trajectory timestep must be positive, got {}",
                def.timestep
            )));
        }
        Ok(Self::sealed(def.points, def.timestep))
    }
}

impl Trajectory {
    pub(crate) fn sealed(points: Vec<Vec3>, timestep: f64) -> Self {
        debug_assert!(!points.is_empty());
        Self { points, timestep }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    pub fn start(&self) -> Vec3 {
        self.points[0]
    }

    pub fn last(&self) -> Vec3 {
        self.points[self.points.len() - 1]
    }

    /// Seconds of motion represented by the trajectory.
    pub fn duration(&self) -> f64 {
        (self.points.len() - 1) as f64 * self.timestep
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vec3> {
        self.points.iter()
    }

    /// Interpolated position at `seconds` after the stroke, for playback.
    ///
    /// Times before zero clamp to the start. Times past the end, infinite or
    /// NaN, clamp to the final point.
    pub fn position_at(&self, seconds: f64) -> Vec3 {
        let last_index = self.points.len() - 1;
        if seconds <= 0.0 || last_index == 0 {
            return self.start();
        }
        let frame = seconds / self.timestep;
        if frame.is_nan() || frame >= last_index as f64 {
            return self.last();
        }
        let index = frame.floor() as usize;
        let t = frame - index as f64;
        self.points[index].lerp(&self.points[index + 1], t)
    }

    /// Highest `y` reached.
    pub fn max_height(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.y)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a Vec3;
    type IntoIter = std::slice::Iter<'a, Vec3>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// Why the integrator stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Ball dropped into the hole.
    Captured,
    /// Speed fell below the rest threshold.
    Stopped,
    /// Ball rolled past the green boundary.
    LeftGreen,
    /// Safety cap on integration steps was reached.
    StepLimit,
}

/// Everything the UI and statistics layers need from one putt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuttingOutcome {
    pub success: bool,
    pub accuracy: f64,
    pub roll_distance_feet: f64,
    pub time_to_hole_seconds: f64,
    pub final_position: Vec3,
    pub final_distance_to_hole_feet: f64,
    pub max_height: f64,
    pub capture_step: Option<usize>,
    pub termination: Termination,
    pub tier: String,
    pub trajectory: Trajectory,
}

// =============================================================================
// Constants
// =============================================================================

/// Input ranges and shared numeric constants.
pub mod constants {
    pub const POWER_PERCENT_MIN: f64 = 0.0;
    pub const POWER_PERCENT_MAX: f64 = 100.0;

    pub const AIM_ANGLE_MIN: f64 = -45.0;
    pub const AIM_ANGLE_MAX: f64 = 45.0;

    /// Stimpmeter rating the default friction is tuned for.
    pub const REFERENCE_STIMP: f64 = 10.0;

    /// Default integration step (60 Hz)
    pub const FIXED_TIMESTEP: f64 = 1.0 / 60.0;

    /// Small value for floating-point comparisons
    pub const EPSILON: f64 = 1e-10;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a - b, Vec3::new(-3.0, -3.0, -3.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(-a, Vec3::new(-1.0, -2.0, -3.0));
    }

    #[test]
    fn test_horizontal_distance_ignores_height() {
        let a = Vec3::new(0.0, 5.0, 0.0);
        let b = Vec3::new(3.0, -2.0, 4.0);
        assert!((a.horizontal_distance(&b) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_aim_direction() {
        let straight = PuttingInput::builder(10.0).build().unwrap();
        let dir = straight.aim_direction();
        assert!(dir.x.abs() < 1e-12);
        assert!((dir.z + 1.0).abs() < 1e-12);

        let right = PuttingInput::builder(10.0)
            .aim_angle_degrees(30.0)
            .build()
            .unwrap();
        let dir = right.aim_direction();
        assert!((dir.x - 0.5).abs() < 1e-12);
        assert!((dir.horizontal_magnitude() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_intended_distance() {
        let input = PuttingInput::builder(10.0)
            .power_distance_feet(20.0)
            .power_percent(25.0)
            .build()
            .unwrap();
        assert!((input.intended_distance_feet() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_input_rejects_out_of_range() {
        assert!(PuttingInput::builder(10.0).power_percent(100.5).build().is_err());
        assert!(PuttingInput::builder(10.0).power_percent(-1.0).build().is_err());
        assert!(PuttingInput::builder(10.0)
            .aim_angle_degrees(45.1)
            .build()
            .is_err());
        assert!(PuttingInput::builder(0.0).build().is_err());
        assert!(PuttingInput::builder(-3.0).build().is_err());
        assert!(PuttingInput::builder(10.0)
            .slope_left_right(f64::NAN)
            .build()
            .is_err());
        assert!(PuttingInput::builder(10.0).green_speed(0.0).build().is_err());
    }

    #[test]
    fn test_input_accepts_range_edges() {
        assert!(PuttingInput::builder(10.0).power_percent(0.0).build().is_ok());
        assert!(PuttingInput::builder(10.0).power_percent(100.0).build().is_ok());
        assert!(PuttingInput::builder(10.0)
            .aim_angle_degrees(-45.0)
            .build()
            .is_ok());
    }

    #[test]
    fn test_trajectory_position_at() {
        let traj = Trajectory::sealed(
            vec![
                Vec3::ground(0.0, 0.0),
                Vec3::ground(0.0, -1.0),
                Vec3::ground(0.0, -2.0),
            ],
            0.5,
        );
        assert_eq!(traj.position_at(-1.0), traj.start());
        assert!((traj.position_at(0.25).z + 0.5).abs() < 1e-12);
        assert!((traj.position_at(0.75).z + 1.5).abs() < 1e-12);
        assert_eq!(traj.position_at(10.0), traj.last());
        assert!((traj.duration() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_trajectory_position_at_unbounded_times() {
        let traj = Trajectory::sealed(
            vec![
                Vec3::ground(0.0, 0.0),
                Vec3::ground(0.0, -1.0),
                Vec3::ground(0.0, -2.0),
            ],
            0.5,
        );
        assert_eq!(traj.position_at(f64::INFINITY), traj.last());
        assert_eq!(traj.position_at(f64::NAN), traj.last());
        assert_eq!(traj.position_at(1e300), traj.last());
        assert_eq!(traj.position_at(1.0), traj.last());
        assert_eq!(traj.position_at(f64::NEG_INFINITY), traj.start());

        let single = Trajectory::sealed(vec![Vec3::ground(1.0, 1.0)], 0.5);
        assert_eq!(single.position_at(f64::INFINITY), single.start());
    }

    #[test]
    fn test_deserialized_trajectory_is_validated() {
        let empty = "points: []\ntimestep: 0.5\n";
        assert!(serde_yaml::from_str::<Trajectory>(empty).is_err());

        let frozen = "points:\n  - { x: 0.0, y: 0.0, z: 0.0 }\ntimestep: 0.0\n";
        assert!(serde_yaml::from_str::<Trajectory>(frozen).is_err());

        let traj = Trajectory::sealed(vec![Vec3::ground(0.0, 0.0), Vec3::ground(0.0, -1.0)], 0.5);
        let yaml = serde_yaml::to_string(&traj).unwrap();
        let back: Trajectory = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, traj);
        assert_eq!(back.position_at(f64::INFINITY), Vec3::ground(0.0, -1.0));
    }

    #[test]
    fn test_trajectory_max_height() {
        let traj = Trajectory::sealed(
            vec![Vec3::ground(0.0, 0.0), Vec3::new(0.0, -0.1, 0.0)],
            1.0 / 60.0,
        );
        assert_eq!(traj.max_height(), 0.0);
    }
}
