//! Process wide defaults for physical constants and simulation parameters
use std::sync::{LazyLock, PoisonError, RwLock, RwLockReadGuard};

pub static CONFIGURATION: LazyLock<RwLock<Configuration>> =
    LazyLock::new(|| RwLock::new(Configuration::default()));

/// Default values used by the builders when a parameter is not given explicitly
#[derive(Clone, Debug)]
pub struct Configuration {
    /// Ideal gas constant, J/(mol K)
    pub ideal_gas_constant: f64,
    /// Faraday constant, C/mol
    pub faraday_constant: f64,
    /// Temperature, K
    pub temperature: f64,
    /// Integration time step, s
    pub time_step: f64,
    /// Total simulated time, s
    pub total_time: f64,
    /// Initial buffer capacity of the vesicle lumen
    pub init_buffer_capacity: f64,
    /// Display name of the hydrogen ion species
    pub hydrogen_species: String,
    /// Conversion from the vesicle volume unit (m^3) to liters
    pub liters_per_cubic_meter: f64,
    /// pH used when the free hydrogen concentration is not positive
    pub fallback_ph: f64,
    /// Number of iterations between two progress reports
    pub progress_interval: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        let ideal_gas_constant = 8.31446261815324;
        Configuration {
            ideal_gas_constant,
            faraday_constant: 96485.0,
            // Chosen so that R*T is exactly 2578.5871 J/mol
            temperature: 2578.5871 / ideal_gas_constant,
            time_step: 0.001,
            total_time: 100.0,
            init_buffer_capacity: 5e-4,
            hydrogen_species: "h".to_string(),
            liters_per_cubic_meter: 1000.0,
            fallback_ph: 7.0,
            progress_interval: 1000,
        }
    }
}

/// Read access to the global configuration
///
/// A poisoned lock still holds valid plain data, so it is read through.
pub(crate) fn configuration() -> RwLockReadGuard<'static, Configuration> {
    CONFIGURATION.read().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_nernst_constant() {
        let config = Configuration::default();
        let nernst = config.ideal_gas_constant * config.temperature / config.faraday_constant;
        assert!((nernst - 2578.5871 / 96485.0).abs() < 1e-15);
    }

    #[test]
    fn global_configuration_readable() {
        assert_eq!(configuration().hydrogen_species, "h");
        assert_eq!(configuration().progress_interval, 1000);
    }
}
