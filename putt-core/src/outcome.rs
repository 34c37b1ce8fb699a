//! Reduce a finished roll to the numbers the UI and statistics layers show.

use crate::types::{PuttingOutcome, Termination, Trajectory, Vec3};

/// Miss distance (ft) that scores zero on a short putt.
pub const ACCURACY_WINDOW_FEET: f64 = 2.0;

/// Accuracy score in [0, 100].
///
/// A holed putt scores 100. A miss loses accuracy linearly with the distance
/// left to the hole: over 2ft for putts up to 2ft, over the putt's own length
/// for anything longer. A 1ft miss on a 10ft putt scores 90, not 50, and a
/// lag that stops halfway still scores 50.
pub fn accuracy(success: bool, miss_feet: f64, hole_distance_feet: f64) -> f64 {
    if success {
        return 100.0;
    }
    let window = hole_distance_feet.max(ACCURACY_WINDOW_FEET);
    (100.0 - (miss_feet / window) * 100.0).clamp(0.0, 100.0)
}

/// Builds a [`PuttingOutcome`] for one putt layout.
#[derive(Debug, Clone, Copy)]
pub struct OutcomeAggregator {
    pub hole: Vec3,
    pub units_per_foot: f64,
    pub hole_distance_feet: f64,
}

impl OutcomeAggregator {
    pub fn aggregate(
        &self,
        trajectory: Trajectory,
        capture_step: Option<usize>,
        termination: Termination,
        tier: &str,
    ) -> PuttingOutcome {
        let success = capture_step.is_some();
        let start = trajectory.start();
        // A holed ball comes to rest in the cup, wherever capture fired.
        let final_position = if success {
            self.hole
        } else {
            trajectory.last()
        };

        let roll_distance_feet = start.horizontal_distance(&final_position) / self.units_per_foot;
        let final_distance_to_hole_feet =
            final_position.horizontal_distance(&self.hole) / self.units_per_foot;

        let steps = capture_step.unwrap_or(trajectory.len() - 1);
        let time_to_hole_seconds = steps as f64 * trajectory.timestep();

        PuttingOutcome {
            success,
            accuracy: accuracy(success, final_distance_to_hole_feet, self.hole_distance_feet),
            roll_distance_feet,
            time_to_hole_seconds,
            final_position,
            final_distance_to_hole_feet,
            max_height: trajectory.max_height(),
            capture_step,
            termination,
            tier: tier.to_string(),
            trajectory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregator() -> OutcomeAggregator {
        OutcomeAggregator {
            hole: Vec3::ground(0.0, -8.0),
            units_per_foot: 0.8,
            hole_distance_feet: 10.0,
        }
    }

    fn line(points: &[(f64, f64)]) -> Trajectory {
        Trajectory::sealed(
            points.iter().map(|&(x, z)| Vec3::ground(x, z)).collect(),
            0.5,
        )
    }

    #[test]
    fn test_accuracy_curve() {
        assert_eq!(accuracy(true, 3.0, 10.0), 100.0);
        assert!((accuracy(false, 5.0, 10.0) - 50.0).abs() < 1e-12);
        assert!((accuracy(false, 1.0, 2.0) - 50.0).abs() < 1e-12);
        // Short putts still use the 2ft window.
        assert!((accuracy(false, 0.5, 1.0) - 75.0).abs() < 1e-12);
        assert_eq!(accuracy(false, 25.0, 10.0), 0.0);
        assert_eq!(accuracy(false, 0.0, 10.0), 100.0);
    }

    #[test]
    fn test_roll_distance_in_feet() {
        let traj = line(&[(0.0, 0.0), (0.0, -2.0), (0.0, -4.0)]);
        let outcome = aggregator().aggregate(traj, None, Termination::Stopped, "medium");

        assert!(!outcome.success);
        // 4 units at 0.8 units per foot.
        assert!((outcome.roll_distance_feet - 5.0).abs() < 1e-12);
        assert!((outcome.final_distance_to_hole_feet - 5.0).abs() < 1e-12);
        assert!((outcome.accuracy - 50.0).abs() < 1e-12);
        assert!((outcome.time_to_hole_seconds - 1.0).abs() < 1e-12);
        assert_eq!(outcome.max_height, 0.0);
        assert_eq!(outcome.tier, "medium");
    }

    #[test]
    fn test_captured_outcome() {
        let traj = line(&[(0.0, 0.0), (0.0, -4.0), (0.0, -7.9)]);
        let outcome = aggregator().aggregate(traj, Some(2), Termination::Captured, "medium");

        assert!(outcome.success);
        assert_eq!(outcome.accuracy, 100.0);
        assert_eq!(outcome.capture_step, Some(2));
        assert!((outcome.time_to_hole_seconds - 1.0).abs() < 1e-12);
        assert_eq!(outcome.final_position, Vec3::ground(0.0, -8.0));
        assert_eq!(outcome.final_distance_to_hole_feet, 0.0);
        assert_eq!(outcome.trajectory.last(), Vec3::ground(0.0, -7.9));
        // 8 units at 0.8 units per foot, independent of the capture point.
        assert!((outcome.roll_distance_feet - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_captured_roll_ignores_capture_point() {
        let short = line(&[(0.0, 0.0), (0.0, -7.8)]);
        let long = line(&[(0.0, 0.0), (0.0, -8.1)]);
        let a = aggregator().aggregate(short, Some(1), Termination::Captured, "medium");
        let b = aggregator().aggregate(long, Some(1), Termination::Captured, "medium");
        assert_eq!(a.roll_distance_feet, b.roll_distance_feet);
        assert_eq!(a.final_position, b.final_position);
    }

    #[test]
    fn test_accuracy_window_grows_with_putt_length() {
        assert!((accuracy(false, 1.0, 10.0) - 90.0).abs() < 1e-12);
        assert!((accuracy(false, 1.0, 1.5) - 50.0).abs() < 1e-12);
    }
}
