//! MCTS configuration parameters.

use gomoku_config::MctsSettings;

use crate::search::SearchError;

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Number of playouts to run per search.
    pub num_simulations: u32,

    /// Exploration constant in the selection score
    /// `-Q + c_puct * P / (1 + N)`, where Q is the child's own value.
    /// Higher values keep following the prior for longer.
    pub c_puct: f32,

    /// Temperature for turning visit counts into a move.
    /// 1.0 = sample proportional to visit counts
    /// 0.0 = always pick most-visited (argmax)
    pub temperature: f32,

    /// Dirichlet noise alpha mixed into the move distribution.
    pub dirichlet_alpha: f32,

    /// Fraction of the move distribution that comes from Dirichlet noise.
    /// 0.0 disables noise.
    pub dirichlet_epsilon: f32,

    /// Seed for the planner's random number generator.
    pub seed: u64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: 400,
            c_puct: 5.0,
            temperature: 1.0,
            dirichlet_alpha: 0.3,
            dirichlet_epsilon: 0.0,
            seed: 42,
        }
    }
}

impl From<&MctsSettings> for MctsConfig {
    fn from(settings: &MctsSettings) -> Self {
        Self {
            num_simulations: settings.num_simulations,
            c_puct: settings.c_puct as f32,
            temperature: settings.temperature as f32,
            dirichlet_alpha: settings.dirichlet_alpha as f32,
            dirichlet_epsilon: settings.dirichlet_epsilon as f32,
            seed: settings.seed,
        }
    }
}

impl MctsConfig {
    /// Create config for self-play data generation (exploration noise on).
    pub fn for_self_play() -> Self {
        Self {
            dirichlet_epsilon: 0.25,
            ..Self::default()
        }
    }

    /// Create config for evaluation (no noise, greedy selection).
    pub fn for_evaluation() -> Self {
        Self {
            num_simulations: 1000,
            temperature: 0.0,
            dirichlet_epsilon: 0.0,
            ..Self::default()
        }
    }

    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            num_simulations: 50,
            temperature: 0.0,
            dirichlet_epsilon: 0.0,
            ..Self::default()
        }
    }

    /// Builder pattern: set number of simulations.
    pub fn with_simulations(mut self, n: u32) -> Self {
        self.num_simulations = n;
        self
    }

    /// Builder pattern: set c_puct exploration constant.
    pub fn with_c_puct(mut self, c: f32) -> Self {
        self.c_puct = c;
        self
    }

    /// Builder pattern: set temperature.
    pub fn with_temperature(mut self, t: f32) -> Self {
        self.temperature = t;
        self
    }

    /// Builder pattern: set RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builder pattern: set Dirichlet noise parameters.
    pub fn with_dirichlet(mut self, alpha: f32, epsilon: f32) -> Self {
        self.dirichlet_alpha = alpha;
        self.dirichlet_epsilon = epsilon;
        self
    }

    /// Whether move selection mixes in Dirichlet noise.
    #[inline]
    pub fn uses_noise(&self) -> bool {
        self.dirichlet_epsilon > 0.0
    }

    /// Check that the parameters describe a runnable search.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.num_simulations == 0 {
            return Err(SearchError::InvalidConfig(
                "num_simulations must be at least 1".into(),
            ));
        }
        if !self.c_puct.is_finite() || self.c_puct < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "c_puct must be finite and non-negative, got {}",
                self.c_puct
            )));
        }
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "temperature must be finite and non-negative, got {}",
                self.temperature
            )));
        }
        if !(0.0..=1.0).contains(&self.dirichlet_epsilon) {
            return Err(SearchError::InvalidConfig(format!(
                "dirichlet_epsilon must be in [0, 1], got {}",
                self.dirichlet_epsilon
            )));
        }
        if self.uses_noise() && !(self.dirichlet_alpha.is_finite() && self.dirichlet_alpha > 0.0) {
            return Err(SearchError::InvalidConfig(format!(
                "dirichlet_alpha must be positive when noise is enabled, got {}",
                self.dirichlet_alpha
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.num_simulations, 400);
        assert!((config.c_puct - 5.0).abs() < 1e-6);
        assert!(!config.uses_noise());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_simulations(100)
            .with_temperature(0.5)
            .with_c_puct(1.5)
            .with_seed(7)
            .with_dirichlet(0.1, 0.5);

        assert_eq!(config.num_simulations, 100);
        assert!((config.temperature - 0.5).abs() < 1e-6);
        assert!((config.c_puct - 1.5).abs() < 1e-6);
        assert_eq!(config.seed, 7);
        assert!((config.dirichlet_alpha - 0.1).abs() < 1e-6);
        assert!(config.uses_noise());
    }

    #[test]
    fn test_presets() {
        let eval = MctsConfig::for_evaluation();
        assert!(eval.temperature.abs() < 1e-6);
        assert!(!eval.uses_noise());

        let self_play = MctsConfig::for_self_play();
        assert!((self_play.dirichlet_epsilon - 0.25).abs() < 1e-6);
        assert!(self_play.validate().is_ok());

        assert_eq!(MctsConfig::for_testing().num_simulations, 50);
    }

    #[test]
    fn test_from_settings() {
        let settings = MctsSettings::default();
        let config = MctsConfig::from(&settings);
        assert_eq!(config.num_simulations, settings.num_simulations);
        assert!((config.c_puct as f64 - settings.c_puct).abs() < 1e-6);
        assert_eq!(config.seed, settings.seed);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero = MctsConfig::default().with_simulations(0);
        assert!(matches!(zero.validate(), Err(SearchError::InvalidConfig(_))));

        let negative_c = MctsConfig::default().with_c_puct(-1.0);
        assert!(matches!(negative_c.validate(), Err(SearchError::InvalidConfig(_))));

        let nan_temp = MctsConfig::default().with_temperature(f32::NAN);
        assert!(matches!(nan_temp.validate(), Err(SearchError::InvalidConfig(_))));

        let bad_eps = MctsConfig::default().with_dirichlet(0.3, 1.5);
        assert!(matches!(bad_eps.validate(), Err(SearchError::InvalidConfig(_))));

        let bad_alpha = MctsConfig::default().with_dirichlet(0.0, 0.25);
        assert!(matches!(bad_alpha.validate(), Err(SearchError::InvalidConfig(_))));

        // Alpha is irrelevant while noise is off
        let unused_alpha = MctsConfig::default().with_dirichlet(0.0, 0.0);
        assert!(unused_alpha.validate().is_ok());
    }
}
