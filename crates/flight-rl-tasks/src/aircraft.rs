//! Aircraft performance data used for initial conditions and reward scaling

const KTS_TO_M_PER_S: f64 = 0.514444;
const KTS_TO_FT_PER_S: f64 = 1.6878;

/// Performance figures for one aircraft model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aircraft {
    /// Model identifier in the simulator's aircraft library
    pub jsbsim_id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Typical cruise speed [kt]
    pub cruise_speed_kts: f64,
}

impl Aircraft {
    /// Greatest distance the aircraft can cover at cruise speed within an
    /// episode, used to normalise distance-based reward components
    pub fn max_distance_m(&self, episode_time_s: f64) -> f64 {
        self.cruise_speed_kts * KTS_TO_M_PER_S * episode_time_s
    }

    /// Cruise speed as a body-frame forward velocity [ft/s]
    pub fn cruise_speed_fps(&self) -> f64 {
        self.cruise_speed_kts * KTS_TO_FT_PER_S
    }
}

pub const CESSNA_172P: Aircraft = Aircraft {
    jsbsim_id: "c172p",
    name: "Cessna172P",
    cruise_speed_kts: 120.0,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_distance_scales_with_episode_time() {
        let one_second = CESSNA_172P.max_distance_m(1.0);
        assert!((one_second - 120.0 * 0.514444).abs() < 1e-9);
        assert_eq!(CESSNA_172P.max_distance_m(60.0), one_second * 60.0);
    }
}
