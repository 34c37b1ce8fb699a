//! # Putt Core
//!
//! A deterministic physics engine for rolling putts.
//!
//! ## Architecture
//!
//! - `types`: Core data structures (Vec3, inputs, trajectory, outcome)
//! - `scale`: Feet to world-unit scale mapping
//! - `forces`: Slope effects (break and grade)
//! - `integrator`: Fixed-step roll integration
//! - `capture`: Precision tiers and hole capture
//! - `outcome`: Accuracy, roll distance and timing
//! - `sync`: Canonical ball/hole placement and drift detection
//! - `presets`: Physics configuration and YAML preset loader
//! - `simulation`: Main orchestrator and attempt lifecycle
//!
//! ```ignore
//! use putt_core::prelude::*;
//!
//! let input = PuttingInput::builder(10.0).power_percent(90.0).build()?;
//! let outcome = simulate(
//!     &input,
//!     &TierTable::standard(),
//!     &ScaleTable::standard(),
//!     &PhysicsConfig::standard(),
//! )?;
//! println!("holed: {}, accuracy: {:.0}", outcome.success, outcome.accuracy);
//! ```

pub mod capture;
pub mod error;
pub mod forces;
pub mod integrator;
pub mod outcome;
pub mod presets;
pub mod scale;
pub mod simulation;
pub mod sync;
pub mod types;

pub mod prelude {
    pub use crate::capture::{PrecisionTier, TierTable};
    pub use crate::error::PuttError;
    pub use crate::presets::{PhysicsConfig, PresetLoader};
    pub use crate::scale::ScaleTable;
    pub use crate::simulation::{simulate, simulate_in, PuttPhase, PuttSession, SimulationContext};
    pub use crate::sync::{DistanceState, DistanceSynchronizer, ObservedPositions};
    pub use crate::types::{PuttingInput, PuttingOutcome, Termination, Trajectory, Vec3};
}
