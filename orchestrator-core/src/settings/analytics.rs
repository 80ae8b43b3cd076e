use serde::Deserialize;

/// Weights of the student risk heuristic. Each signal is normalised to
/// `0..=1` before weighting; the weighted sum is scaled to `0..=100`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct RiskWeights {
    pub score: f64,
    pub completion: f64,
    pub inactivity: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            score: 0.5,
            completion: 0.3,
            inactivity: 0.2,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct RiskThresholds {
    pub medium: f64,
    pub high: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            medium: 40.0,
            high: 70.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct AnalyticsSettings {
    #[serde(default)]
    pub weights: RiskWeights,
    #[serde(default)]
    pub thresholds: RiskThresholds,
    /// Inactivity beyond this many days counts as the maximum signal.
    #[serde(default = "default_inactivity_horizon_days")]
    pub inactivity_horizon_days: u32,
}

fn default_inactivity_horizon_days() -> u32 {
    30
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            weights: RiskWeights::default(),
            thresholds: RiskThresholds::default(),
            inactivity_horizon_days: default_inactivity_horizon_days(),
        }
    }
}
