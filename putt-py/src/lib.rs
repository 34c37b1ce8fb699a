//! Python bindings for the putt-core physics engine.
//!
//! Provides a simple Python API:
//!
//! ```python
//! from putt_physics import PuttSimulator
//!
//! sim = PuttSimulator()
//! result = sim.putt(power_distance_feet=12.0, hole_distance_feet=12.0,
//!                   power_percent=95.0, aim_angle_degrees=1.5,
//!                   slope_left_right=-3.0)
//! print(result["success"], result["accuracy"])
//!
//! for x, y, z in sim.trajectory():
//!     draw_ball(x, y, z)
//!
//! sim.take_outcome()  # back to "idle", ready for the next putt
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use putt_core::capture::TierTable;
use putt_core::error::PuttError;
use putt_core::presets::PresetLoader;
use putt_core::scale::ScaleTable;
use putt_core::simulation::{PuttPhase, PuttSession};
use putt_core::sync::{DistanceState, DistanceSynchronizer, ObservedPositions};
use putt_core::types::{PuttingInput, PuttingOutcome, Vec3 as CoreVec3};

fn to_py_err(err: PuttError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// 3D vector for world positions.
#[pyclass]
#[derive(Clone, Copy)]
pub struct Vec3 {
    #[pyo3(get, set)]
    pub x: f64,
    #[pyo3(get, set)]
    pub y: f64,
    #[pyo3(get, set)]
    pub z: f64,
}

#[pymethods]
impl Vec3 {
    #[new]
    fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn __repr__(&self) -> String {
        format!("Vec3({:.4}, {:.4}, {:.4})", self.x, self.y, self.z)
    }

    fn to_tuple(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z)
    }
}

impl From<CoreVec3> for Vec3 {
    fn from(v: CoreVec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Vec3> for CoreVec3 {
    fn from(v: Vec3) -> Self {
        CoreVec3::new(v.x, v.y, v.z)
    }
}

fn phase_name(phase: PuttPhase) -> &'static str {
    match phase {
        PuttPhase::Idle => "idle",
        PuttPhase::Simulating => "simulating",
        PuttPhase::Captured => "captured",
        PuttPhase::Missed => "missed",
    }
}

fn outcome_dict<'py>(py: Python<'py>, outcome: &PuttingOutcome) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("success", outcome.success)?;
    dict.set_item("accuracy", outcome.accuracy)?;
    dict.set_item("roll_distance_feet", outcome.roll_distance_feet)?;
    dict.set_item("time_to_hole_seconds", outcome.time_to_hole_seconds)?;
    dict.set_item("final_x", outcome.final_position.x)?;
    dict.set_item("final_y", outcome.final_position.y)?;
    dict.set_item("final_z", outcome.final_position.z)?;
    dict.set_item(
        "final_distance_to_hole_feet",
        outcome.final_distance_to_hole_feet,
    )?;
    dict.set_item("max_height", outcome.max_height)?;
    dict.set_item("capture_step", outcome.capture_step)?;
    dict.set_item("termination", format!("{:?}", outcome.termination))?;
    dict.set_item("tier", outcome.tier.as_str())?;
    dict.set_item("steps", outcome.trajectory.len() - 1)?;
    Ok(dict)
}

fn distance_dict<'py>(py: Python<'py>, state: &DistanceState) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("logical_distance_feet", state.logical_distance_feet)?;
    dict.set_item("units_per_foot", state.units_per_foot)?;
    dict.set_item("ball", Vec3::from(state.ball_position))?;
    dict.set_item("hole", Vec3::from(state.hole_position))?;
    dict.set_item("observed_distance_feet", state.observed_distance_feet)?;
    dict.set_item("sync_error_feet", state.sync_error_feet)?;
    dict.set_item("is_valid", state.is_valid)?;
    dict.set_item(
        "ball_correction",
        state.ball_drift.map(|d| Vec3::from(d.correction)),
    )?;
    dict.set_item(
        "hole_correction",
        state.hole_drift.map(|d| Vec3::from(d.correction)),
    )?;
    Ok(dict)
}

/// Putting simulator.
///
/// Wraps one attempt at a time: `putt` runs a simulation, `take_outcome`
/// hands the result over and makes the simulator ready for the next putt.
#[pyclass]
pub struct PuttSimulator {
    session: PuttSession,
    sync: DistanceSynchronizer,
}

#[pymethods]
impl PuttSimulator {
    /// Create a simulator with the standard preset.
    #[new]
    fn new() -> Self {
        Self {
            session: PuttSession::standard(),
            sync: DistanceSynchronizer::default(),
        }
    }

    /// Current attempt phase: "idle", "simulating", "captured" or "missed".
    #[getter]
    fn phase(&self) -> &'static str {
        phase_name(self.session.phase())
    }

    /// Name of the active physics preset.
    #[getter]
    fn preset(&self) -> String {
        self.session.config().name.clone()
    }

    /// Load a YAML preset from `directory` and make it active.
    fn load_preset(&mut self, directory: &str, name: &str) -> PyResult<()> {
        let config = PresetLoader::new(directory)
            .load_preset(name)
            .map_err(to_py_err)?;
        self.session.set_config(config).map_err(to_py_err)
    }

    /// List preset names available in `directory`.
    #[staticmethod]
    fn list_presets(directory: &str) -> PyResult<Vec<String>> {
        PresetLoader::new(directory)
            .list_presets()
            .map_err(to_py_err)
    }

    /// Simulate a putt and return the outcome as a dict.
    ///
    /// Raises ValueError for out-of-range input or if the previous outcome
    /// has not been taken yet.
    #[pyo3(signature = (
        power_distance_feet,
        hole_distance_feet,
        power_percent,
        aim_angle_degrees = 0.0,
        green_speed = 10.0,
        slope_up_down = 0.0,
        slope_left_right = 0.0
    ))]
    #[allow(clippy::too_many_arguments)]
    fn putt(
        &mut self,
        py: Python<'_>,
        power_distance_feet: f64,
        hole_distance_feet: f64,
        power_percent: f64,
        aim_angle_degrees: f64,
        green_speed: f64,
        slope_up_down: f64,
        slope_left_right: f64,
    ) -> PyResult<PyObject> {
        let input = PuttingInput::new(
            power_distance_feet,
            hole_distance_feet,
            power_percent,
            aim_angle_degrees,
            green_speed,
            slope_up_down,
            slope_left_right,
        )
        .map_err(to_py_err)?;
        let outcome = self.session.putt(&input).map_err(to_py_err)?;
        Ok(outcome_dict(py, outcome)?.into_any().unbind())
    }

    /// Trajectory of the pending outcome as (x, y, z) tuples.
    fn trajectory(&self) -> Vec<(f64, f64, f64)> {
        self.session
            .outcome()
            .map(|o| o.trajectory.iter().map(|p| (p.x, p.y, p.z)).collect())
            .unwrap_or_default()
    }

    /// Interpolated ball position `seconds` after the stroke.
    fn position_at(&self, seconds: f64) -> Option<Vec3> {
        self.session
            .outcome()
            .map(|o| o.trajectory.position_at(seconds).into())
    }

    /// Hand over the finished outcome and return to "idle".
    fn take_outcome(&mut self, py: Python<'_>) -> PyResult<Option<PyObject>> {
        match self.session.take_outcome() {
            Some(outcome) => Ok(Some(outcome_dict(py, &outcome)?.into_any().unbind())),
            None => Ok(None),
        }
    }

    /// Canonical ball/hole positions, checked against what the renderer shows.
    #[pyo3(signature = (hole_distance_feet, ball = None, hole = None))]
    fn sync(
        &self,
        py: Python<'_>,
        hole_distance_feet: f64,
        ball: Option<Vec3>,
        hole: Option<Vec3>,
    ) -> PyResult<PyObject> {
        let observed = ObservedPositions {
            ball: ball.map(CoreVec3::from),
            hole: hole.map(CoreVec3::from),
        };
        let state = self
            .sync
            .reconcile(hole_distance_feet, &observed)
            .map_err(to_py_err)?;
        Ok(distance_dict(py, &state)?.into_any().unbind())
    }

    /// World units per foot for a putt of this length.
    #[staticmethod]
    fn units_per_foot(hole_distance_feet: f64) -> PyResult<f64> {
        ScaleTable::standard()
            .units_per_foot(hole_distance_feet)
            .map_err(to_py_err)
    }

    /// Precision tier label for a putt of this length.
    #[staticmethod]
    fn tier(hole_distance_feet: f64) -> String {
        TierTable::standard()
            .tier_for(hole_distance_feet)
            .label
            .clone()
    }
}

/// Python module definition.
#[pymodule]
fn putt_physics(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Vec3>()?;
    m.add_class::<PuttSimulator>()?;
    Ok(())
}
