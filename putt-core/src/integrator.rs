//! Fixed-step integration of a rolling putt.
//!
//! The ball moves with explicit Euler steps on the ground plane. Rolling
//! resistance is an exponential per-step decay rather than a force, which
//! makes the total roll a geometric series of the first step:
//!
//! ```text
//! roll = v0·dt · (1 + f + f² + …) = v0·dt / (1 - f)
//! ```
//!
//! The launch speed is chosen so that this series equals the intended
//! distance on flat ground (see [`launch_velocity`]).
//!
//! ## Step order
//!
//! ```text
//! 1. x += v·dt, record x
//! 2. ask the monitor (hole capture) whether to stop
//! 3. stop if |v| < rest epsilon or x left the green
//! 4. v *= friction
//! 5. if |v| > curve epsilon: v += a_slope·dt, v *= grade retention
//! ```

use crate::forces::launch_multiplier;
use crate::presets::PhysicsConfig;
use crate::types::{PuttingInput, SimulationState, Termination, Trajectory, Vec3};

/// Trait for the slope forces acting on the ball.
///
/// Implementations provide the green model; the integrator owns friction.
pub trait ForceModel {
    /// Acceleration (units/s²) given the current state and the speed the
    /// ball had when it moved this step.
    fn linear_acceleration(&self, state: &SimulationState, speed: f64) -> Vec3;

    /// Multiplicative speed change applied once per step.
    /// Default implementation: no change.
    fn speed_retention(&self, _dt: f64) -> f64 {
        1.0
    }
}

/// Observes each integration step and may end the roll early.
pub trait StepMonitor {
    /// Return `true` to stop the roll at this step.
    fn observe(&mut self, state: &SimulationState, speed: f64) -> bool;
}

/// Monitor that never stops the roll.
pub struct NoCapture;

impl StepMonitor for NoCapture {
    fn observe(&mut self, _state: &SimulationState, _speed: f64) -> bool {
        false
    }
}

/// Circular playing surface the ball must stay on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreenBounds {
    pub center: Vec3,
    pub radius: f64,
}

impl GreenBounds {
    pub fn contains(&self, point: &Vec3) -> bool {
        point.horizontal_distance(&self.center) <= self.radius
    }
}

/// Result of one complete roll.
#[derive(Debug, Clone)]
pub struct RollResult {
    pub trajectory: Trajectory,
    pub termination: Termination,
    pub final_state: SimulationState,
    /// Speed of the ball on its final step (units/s).
    pub final_speed: f64,
}

/// Fixed-step roll integrator.
#[derive(Debug, Clone, Copy)]
pub struct RollIntegrator {
    pub timestep: f64,
    pub friction: f64,
    pub min_speed_epsilon: f64,
    pub min_curve_epsilon: f64,
    pub max_steps: usize,
    pub bounds: GreenBounds,
}

impl RollIntegrator {
    /// Integrator for `config`, with friction already adjusted for the green.
    pub fn new(config: &PhysicsConfig, friction: f64, bounds: GreenBounds) -> Self {
        Self {
            timestep: config.fixed_timestep,
            friction,
            min_speed_epsilon: config.min_speed_epsilon,
            min_curve_epsilon: config.min_curve_epsilon,
            max_steps: config.max_steps,
            bounds,
        }
    }

    /// Roll the ball from `start` until it stops, leaves the green, the
    /// monitor captures it, or the step cap is hit.
    pub fn roll<F: ForceModel, M: StepMonitor>(
        &self,
        start: Vec3,
        velocity: Vec3,
        forces: &F,
        monitor: &mut M,
    ) -> RollResult {
        let dt = self.timestep;
        let mut state = SimulationState::new(start, velocity);
        let mut points = Vec::with_capacity(self.max_steps.min(1024) + 1);
        points.push(start);
        let mut speed = state.speed();

        let termination = loop {
            if state.step >= self.max_steps {
                tracing::warn!(
                    max_steps = self.max_steps,
                    speed,
                    "roll did not terminate within step cap; returning degraded result"
                );
                break Termination::StepLimit;
            }

            state.position += state.velocity * dt;
            state.step += 1;
            points.push(state.position);
            speed = state.speed();

            if monitor.observe(&state, speed) {
                break Termination::Captured;
            }
            if speed < self.min_speed_epsilon {
                break Termination::Stopped;
            }
            if !self.bounds.contains(&state.position) {
                break Termination::LeftGreen;
            }

            state.velocity = state.velocity * self.friction;
            if speed > self.min_curve_epsilon {
                state.velocity += forces.linear_acceleration(&state, speed) * dt;
                state.velocity = state.velocity * forces.speed_retention(dt);
            }
        };

        tracing::trace!(steps = state.step, ?termination, "roll finished");

        RollResult {
            trajectory: Trajectory::sealed(points, dt),
            termination,
            final_state: state,
            final_speed: speed,
        }
    }
}

/// Initial velocity (units/s) for a putt.
///
/// `intended_units · base_speed_multiplier · launch_step_fraction` is the
/// distance covered on the first step; with the standard tuning that equals
/// `intended_units · (1 - friction)`, so the friction series sums back to the
/// intended distance.
pub fn launch_velocity(input: &PuttingInput, units_per_foot: f64, config: &PhysicsConfig) -> Vec3 {
    let intended_units = input.intended_distance_feet() * units_per_foot;
    let multiplier = launch_multiplier(input.slope_up_down(), config);
    let first_step = intended_units
        * config.base_speed_multiplier
        * multiplier
        * config.launch_step_fraction;
    input.aim_direction() * (first_step / config.fixed_timestep)
}

// =============================================================================
// Tests
// =============================================================================
