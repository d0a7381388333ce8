//! Property references and the JSBSim property catalog
//!
//! A [`Property`] names one scalar simulator quantity together with its valid
//! range. Tasks and reward components refer to simulator state exclusively
//! through these references; the catalog below covers the properties the
//! bundled tasks use, named after the JSBSim property tree.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Reference to a named scalar simulator quantity.
///
/// Identity is the property name alone; the range describes valid values and
/// feeds observation/action space bounds.
#[derive(Debug, Clone, Copy)]
pub struct Property {
    /// Name in the simulator's property tree, e.g. `position/h-sl-ft`
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Lower bound of valid values
    pub min: f64,
    /// Upper bound of valid values
    pub max: f64,
}

impl Property {
    /// Property with an explicit valid range
    pub const fn bounded(name: &'static str, description: &'static str, min: f64, max: f64) -> Self {
        Property {
            name,
            description,
            min,
            max,
        }
    }

    /// Property with no meaningful bounds
    pub const fn unbounded(name: &'static str, description: &'static str) -> Self {
        Property {
            name,
            description,
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Property {}

impl Hash for Property {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// Position
pub const ALTITUDE_SL_FT: Property =
    Property::bounded("position/h-sl-ft", "altitude above mean sea level [ft]", -1400.0, 85000.0);
pub const LAT_GEOD_DEG: Property =
    Property::bounded("position/lat-geod-deg", "geodetic latitude [deg]", -90.0, 90.0);
pub const LNG_GEOC_DEG: Property =
    Property::bounded("position/long-gc-deg", "geocentric longitude [deg]", -180.0, 180.0);
pub const DIST_TRAVEL_M: Property = Property::bounded(
    "position/distance-from-start-mag-mt",
    "distance travelled from starting position [m]",
    0.0,
    f64::INFINITY,
);

// Attitude
pub const HEADING_DEG: Property =
    Property::bounded("attitude/psi-deg", "heading [deg]", 0.0, 360.0);
pub const ROLL_RAD: Property = Property::bounded(
    "attitude/roll-rad",
    "roll [rad]",
    -std::f64::consts::PI,
    std::f64::consts::PI,
);
pub const PITCH_RAD: Property = Property::bounded(
    "attitude/theta-rad",
    "pitch [rad]",
    -0.5 * std::f64::consts::PI,
    0.5 * std::f64::consts::PI,
);

// Velocities
pub const ALTITUDE_RATE_FPS: Property =
    Property::unbounded("velocities/h-dot-fps", "altitude rate of change [ft/s]");
pub const U_FPS: Property = Property::bounded(
    "velocities/u-fps",
    "body frame x-axis velocity [ft/s]",
    -2200.0,
    2200.0,
);
pub const V_FPS: Property = Property::bounded(
    "velocities/v-fps",
    "body frame y-axis velocity [ft/s]",
    -2200.0,
    2200.0,
);
pub const W_FPS: Property = Property::bounded(
    "velocities/w-fps",
    "body frame z-axis velocity [ft/s]",
    -2200.0,
    2200.0,
);
pub const P_RADPS: Property = Property::bounded(
    "velocities/p-rad_sec",
    "roll rate [rad/s]",
    -2.0 * std::f64::consts::PI,
    2.0 * std::f64::consts::PI,
);
pub const Q_RADPS: Property = Property::bounded(
    "velocities/q-rad_sec",
    "pitch rate [rad/s]",
    -2.0 * std::f64::consts::PI,
    2.0 * std::f64::consts::PI,
);
pub const R_RADPS: Property = Property::bounded(
    "velocities/r-rad_sec",
    "yaw rate [rad/s]",
    -2.0 * std::f64::consts::PI,
    2.0 * std::f64::consts::PI,
);
pub const PHI_DOT_RADPS: Property = Property::bounded(
    "velocities/phidot-rad_sec",
    "roll angle rate of change [rad/s]",
    -2.0 * std::f64::consts::PI,
    2.0 * std::f64::consts::PI,
);
pub const THETA_DOT_RADPS: Property = Property::bounded(
    "velocities/thetadot-rad_sec",
    "pitch angle rate of change [rad/s]",
    -2.0 * std::f64::consts::PI,
    2.0 * std::f64::consts::PI,
);
pub const PSI_DOT_RADPS: Property = Property::bounded(
    "velocities/psidot-rad_sec",
    "heading rate of change [rad/s]",
    -2.0 * std::f64::consts::PI,
    2.0 * std::f64::consts::PI,
);

// Flight control commands
pub const AILERON_CMD: Property =
    Property::bounded("fcs/aileron-cmd-norm", "aileron command, normalised", -1.0, 1.0);
pub const ELEVATOR_CMD: Property =
    Property::bounded("fcs/elevator-cmd-norm", "elevator command, normalised", -1.0, 1.0);
pub const RUDDER_CMD: Property =
    Property::bounded("fcs/rudder-cmd-norm", "rudder command, normalised", -1.0, 1.0);
pub const THROTTLE_CMD: Property =
    Property::bounded("fcs/throttle-cmd-norm", "throttle command, normalised", 0.0, 1.0);
pub const MIXTURE_CMD: Property =
    Property::bounded("fcs/mixture-cmd-norm", "engine mixture command, normalised", 0.0, 1.0);

// Simulation clock
pub const SIM_TIME_S: Property = Property::bounded(
    "simulation/sim-time-sec",
    "simulation time [s]",
    0.0,
    f64::INFINITY,
);

// Initial conditions
pub const INITIAL_ALTITUDE_FT: Property =
    Property::unbounded("ic/h-sl-ft", "initial altitude above mean sea level [ft]");
pub const INITIAL_TERRAIN_ALTITUDE_FT: Property =
    Property::unbounded("ic/terrain-elevation-ft", "initial terrain elevation [ft]");
pub const INITIAL_LONGITUDE_GEOC_DEG: Property =
    Property::unbounded("ic/long-gc-deg", "initial geocentric longitude [deg]");
pub const INITIAL_LATITUDE_GEOD_DEG: Property =
    Property::unbounded("ic/lat-geod-deg", "initial geodetic latitude [deg]");
pub const INITIAL_U_FPS: Property =
    Property::unbounded("ic/u-fps", "initial body frame x-axis velocity [ft/s]");
pub const INITIAL_V_FPS: Property =
    Property::unbounded("ic/v-fps", "initial body frame y-axis velocity [ft/s]");
pub const INITIAL_W_FPS: Property =
    Property::unbounded("ic/w-fps", "initial body frame z-axis velocity [ft/s]");
pub const INITIAL_P_RADPS: Property =
    Property::unbounded("ic/p-rad_sec", "initial roll rate [rad/s]");
pub const INITIAL_Q_RADPS: Property =
    Property::unbounded("ic/q-rad_sec", "initial pitch rate [rad/s]");
pub const INITIAL_R_RADPS: Property =
    Property::unbounded("ic/r-rad_sec", "initial yaw rate [rad/s]");
pub const INITIAL_ROC_FPM: Property =
    Property::unbounded("ic/roc-fpm", "initial rate of climb [ft/min]");
pub const INITIAL_HEADING_DEG: Property =
    Property::unbounded("ic/psi-true-deg", "initial heading [deg]");

// Task-defined properties
pub const TARGET_HEADING_DEG: Property =
    Property::bounded("target/heading-deg", "target heading [deg]", 0.0, 360.0);

/// Name of the task-derived parallel-distance property.
///
/// Tasks construct the property at runtime because its upper bound depends on
/// aircraft performance and episode length.
pub const DIST_TRAVEL_PARALLEL_HDG_M_NAME: &str = "target/dist-travel-parallel-hdg-m";

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn identity_is_name_only() {
        let a = Property::bounded("target/dist-travel-parallel-hdg-m", "parallel distance", 0.0, 100.0);
        let b = Property::bounded("target/dist-travel-parallel-hdg-m", "parallel distance", 0.0, 900.0);
        assert_eq!(a, b);

        let mut map = HashMap::new();
        map.insert(a, 1.0);
        assert_eq!(map.get(&b), Some(&1.0));
    }

    #[test]
    fn catalog_bounds_sane() {
        assert!(HEADING_DEG.min < HEADING_DEG.max);
        assert_eq!(THROTTLE_CMD.min, 0.0);
        assert_eq!(AILERON_CMD.min, -1.0);
        assert!(ALTITUDE_RATE_FPS.min.is_infinite());
    }

    #[test]
    fn display_is_simulator_name() {
        assert_eq!(ALTITUDE_SL_FT.to_string(), "position/h-sl-ft");
        assert_eq!(ROLL_RAD.to_string(), "attitude/roll-rad");
    }
}
