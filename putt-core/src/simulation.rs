//! Main orchestrator: one call turns a [`PuttingInput`] into a
//! [`PuttingOutcome`].
//!
//! ```text
//! scale ─▶ canonical layout ─▶ roll (capture checked every step) ─▶ outcome
//! ```
//!
//! [`simulate`] is pure: no I/O, no globals, nothing kept between calls.
//! [`PuttSession`] wraps it for hosts that want the attempt lifecycle
//! `Idle → Simulating → Captured | Missed → Idle` enforced.

use serde::{Deserialize, Serialize};

use crate::capture::{drop_tail, HoleCapture, TierTable};
use crate::error::PuttError;
use crate::forces::GreenForces;
use crate::integrator::{launch_velocity, GreenBounds, RollIntegrator};
use crate::outcome::OutcomeAggregator;
use crate::presets::PhysicsConfig;
use crate::scale::ScaleTable;
use crate::sync::{DistanceState, DistanceSynchronizer};
use crate::types::{constants, PuttingInput, PuttingOutcome, Termination, Trajectory, Vec3};

/// Regulation cup depth (4 in), used by the cosmetic drop tail.
pub const CUP_DEPTH_FEET: f64 = 4.0 / 12.0;

/// Everything about the putt's surroundings, passed explicitly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationContext {
    pub hole_distance_feet: f64,
    pub units_per_foot: f64,
    pub ball_start: Vec3,
    pub hole: Vec3,
    pub green: GreenBounds,
}

impl SimulationContext {
    /// Context from a synchronizer layout, with a circular green extending
    /// `green_margin_feet` past ball and hole.
    pub fn from_layout(layout: &DistanceState, green_margin_feet: f64) -> Self {
        Self {
            hole_distance_feet: layout.logical_distance_feet,
            units_per_foot: layout.units_per_foot,
            ball_start: layout.ball_position,
            hole: layout.hole_position,
            green: GreenBounds {
                center: layout.green_center(),
                radius: layout.green_radius_units(green_margin_feet),
            },
        }
    }

    pub fn new(
        sync: &DistanceSynchronizer,
        hole_distance_feet: f64,
        green_margin_feet: f64,
    ) -> Result<Self, PuttError> {
        let layout = sync.canonical(hole_distance_feet)?;
        Ok(Self::from_layout(&layout, green_margin_feet))
    }

    /// Replace the green boundary radius (world units).
    pub fn with_green_radius(mut self, radius_units: f64) -> Self {
        self.green.radius = radius_units;
        self
    }
}

/// Simulate one putt on the canonical layout for its hole distance.
pub fn simulate(
    input: &PuttingInput,
    tiers: &TierTable,
    scale: &ScaleTable,
    config: &PhysicsConfig,
) -> Result<PuttingOutcome, PuttError> {
    config.validate()?;
    let sync = DistanceSynchronizer::new(scale.clone());
    let context = SimulationContext::new(&sync, input.hole_distance_feet(), config.green_margin_feet)?;
    run(input, &context, tiers, config)
}

/// Simulate one putt in a caller-supplied context.
pub fn simulate_in(
    input: &PuttingInput,
    context: &SimulationContext,
    tiers: &TierTable,
    config: &PhysicsConfig,
) -> Result<PuttingOutcome, PuttError> {
    config.validate()?;
    if (context.hole_distance_feet - input.hole_distance_feet()).abs() > constants::EPSILON {
        return Err(PuttError::invalid(
            "hole_distance_feet",
            input.hole_distance_feet(),
            "does not match the simulation context",
        ));
    }
    if !(context.units_per_foot.is_finite() && context.units_per_foot > 0.0) {
        return Err(PuttError::InvalidConfig(format!(
            "context scale must be positive, got {}",
            context.units_per_foot
        )));
    }
    run(input, context, tiers, config)
}

fn run(
    input: &PuttingInput,
    context: &SimulationContext,
    tiers: &TierTable,
    config: &PhysicsConfig,
) -> Result<PuttingOutcome, PuttError> {
    let tier = tiers.tier_for(input.hole_distance_feet());
    let friction = config.effective_friction(input.green_speed());
    let integrator = RollIntegrator::new(config, friction, context.green);
    let forces = GreenForces::new(input, config);
    let velocity = launch_velocity(input, context.units_per_foot, config);

    let mut capture = HoleCapture::new(
        tier,
        context.hole,
        context.units_per_foot,
        config.fixed_timestep,
    );
    let roll = integrator.roll(context.ball_start, velocity, &forces, &mut capture);

    let mut termination = roll.termination;
    if termination != Termination::Captured && capture.backstop(&roll.final_state, roll.final_speed)
    {
        termination = Termination::Captured;
    }
    let capture_step = capture.captured_at();

    let trajectory = if capture_step.is_some() && config.drop_tail_steps > 0 {
        let mut points = roll.trajectory.points().to_vec();
        points.extend(drop_tail(
            roll.trajectory.last(),
            context.hole,
            config.drop_tail_steps,
            CUP_DEPTH_FEET * context.units_per_foot,
        ));
        Trajectory::sealed(points, roll.trajectory.timestep())
    } else {
        roll.trajectory
    };

    let aggregator = OutcomeAggregator {
        hole: context.hole,
        units_per_foot: context.units_per_foot,
        hole_distance_feet: context.hole_distance_feet,
    };
    let outcome = aggregator.aggregate(trajectory, capture_step, termination, &tier.label);

    tracing::debug!(
        success = outcome.success,
        accuracy = outcome.accuracy,
        roll_distance_feet = outcome.roll_distance_feet,
        steps = outcome.trajectory.len() - 1,
        preset = %config.name,
        "putt simulated"
    );
    Ok(outcome)
}

// =============================================================================
// Session
// =============================================================================

/// Lifecycle of one putt attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuttPhase {
    Idle,
    Simulating,
    Captured,
    Missed,
}

/// Host-side wrapper enforcing one attempt at a time.
///
/// A putt can only start from [`PuttPhase::Idle`]. The session returns to
/// idle once the caller takes the outcome with [`PuttSession::take_outcome`].
#[derive(Debug, Clone)]
pub struct PuttSession {
    tiers: TierTable,
    scale: ScaleTable,
    config: PhysicsConfig,
    phase: PuttPhase,
    pending: Option<PuttingOutcome>,
}

impl PuttSession {
    pub fn new(
        tiers: TierTable,
        scale: ScaleTable,
        config: PhysicsConfig,
    ) -> Result<Self, PuttError> {
        config.validate()?;
        Ok(Self {
            tiers,
            scale,
            config,
            phase: PuttPhase::Idle,
            pending: None,
        })
    }

    pub fn standard() -> Self {
        Self {
            tiers: TierTable::standard(),
            scale: ScaleTable::standard(),
            config: PhysicsConfig::standard(),
            phase: PuttPhase::Idle,
            pending: None,
        }
    }

    pub fn phase(&self) -> PuttPhase {
        self.phase
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Swap the physics preset between attempts.
    pub fn set_config(&mut self, config: PhysicsConfig) -> Result<(), PuttError> {
        if self.phase != PuttPhase::Idle {
            return Err(PuttError::SessionBusy(self.phase));
        }
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Run a putt. Fails with `SessionBusy` unless the session is idle.
    pub fn putt(&mut self, input: &PuttingInput) -> Result<&PuttingOutcome, PuttError> {
        if self.phase != PuttPhase::Idle {
            return Err(PuttError::SessionBusy(self.phase));
        }
        self.phase = PuttPhase::Simulating;
        match simulate(input, &self.tiers, &self.scale, &self.config) {
            Ok(outcome) => {
                self.phase = if outcome.success {
                    PuttPhase::Captured
                } else {
                    PuttPhase::Missed
                };
                Ok(&*self.pending.insert(outcome))
            }
            Err(e) => {
                self.phase = PuttPhase::Idle;
                Err(e)
            }
        }
    }

    /// Outcome of the finished attempt, if not yet taken.
    pub fn outcome(&self) -> Option<&PuttingOutcome> {
        self.pending.as_ref()
    }

    /// Deliver the outcome and return to idle.
    pub fn take_outcome(&mut self) -> Option<PuttingOutcome> {
        let outcome = self.pending.take();
        if outcome.is_some() {
            self.phase = PuttPhase::Idle;
        }
        outcome
    }
}

impl Default for PuttSession {
    fn default() -> Self {
        Self::standard()
    }
}

// =============================================================================
// Tests
// =============================================================================
