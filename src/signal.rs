//! Simulated EMG signal source
//!
//! Produces surface-EMG-like readings: a small noise floor plus random
//! spikes whose probability and amplitude follow a periodic contraction
//! envelope. Randomness comes from a caller-supplied generator, so a seeded
//! generator yields a reproducible signal.

use alloc::vec::Vec;

use rand::Rng;

/// Full-scale value of the signed-to-unsigned ADC mapping
pub const ADC_HALF_SCALE: f64 = 32767.0;

/// Simulation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// Sampling rate in Hz
    pub sample_rate_hz: u32,

    /// Seconds between contraction onsets
    pub contraction_period_s: f64,

    /// Seconds each contraction lasts
    pub contraction_duration_s: f64,

    /// Envelope level during a contraction (1.0 = full)
    pub contraction_level: f64,

    /// Envelope level between contractions
    pub rest_level: f64,

    /// Peak amplitude of the uniform noise floor
    pub baseline_noise: f64,

    /// Peak amplitude of a spike at full contraction
    pub spike_amplitude: f64,
}

impl SimulationConfig {
    /// Create a configuration with the default envelope at `sample_rate_hz`
    ///
    /// # Example
    /// ```
    /// use emgcodec::signal::SimulationConfig;
    ///
    /// let config = SimulationConfig::new(2000);
    /// assert_eq!(config.sample_rate_hz, 2000);
    /// assert_eq!(config.contraction_period_s, 2.0);
    /// ```
    pub const fn new(sample_rate_hz: u32) -> Self {
        Self {
            sample_rate_hz,
            contraction_period_s: 2.0,
            contraction_duration_s: 0.5,
            contraction_level: 1.0,
            rest_level: 0.2,
            baseline_noise: 0.1,
            spike_amplitude: 0.5,
        }
    }

    /// A resting muscle: the envelope never leaves the rest level
    pub const fn at_rest(sample_rate_hz: u32) -> Self {
        let mut config = Self::new(sample_rate_hz);
        config.contraction_duration_s = 0.0;
        config
    }

    /// Envelope level at `time_s`
    pub fn envelope(&self, time_s: f64) -> f64 {
        if self.contraction_period_s <= 0.0 {
            return self.rest_level;
        }
        let mut phase = time_s % self.contraction_period_s;
        if phase < 0.0 {
            phase += self.contraction_period_s;
        }
        if phase < self.contraction_duration_s {
            self.contraction_level
        } else {
            self.rest_level
        }
    }

    /// Seconds between consecutive samples
    pub fn sample_interval_s(&self) -> f64 {
        if self.sample_rate_hz == 0 {
            0.0
        } else {
            1.0 / f64::from(self.sample_rate_hz)
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(1000)
    }
}

/// EMG signal generator driven by an explicit random source
#[derive(Debug, Clone)]
pub struct EmgSimulator<R> {
    config: SimulationConfig,
    rng: R,
    /// Samples emitted by `next_sample`
    position: u64,
}

impl<R: Rng> EmgSimulator<R> {
    /// Create a simulator starting at t = 0
    pub fn new(config: SimulationConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            position: 0,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Time of the next sample `next_sample` will produce
    pub fn elapsed_s(&self) -> f64 {
        self.position as f64 * self.config.sample_interval_s()
    }

    /// One reading at `time_s`, nominally within [-1.0, 1.0]
    pub fn sample_at(&mut self, time_s: f64) -> f64 {
        let contraction = self.config.envelope(time_s);

        // Integer-grained noise in [-0.1, 0.1) at the default amplitude
        let noise_step = self.rng.gen_range(-100i32..100) as f64 / 1000.0;
        let baseline = noise_step * (self.config.baseline_noise / 0.1);

        // Spike odds track the envelope: threshold out of 1000
        let threshold = (1000.0 * contraction) as i32;
        let spike = if self.rng.gen_range(0i32..1000) < threshold {
            let magnitude = self.rng.gen_range(0i32..500) as f64 / 1000.0;
            magnitude * contraction * (self.config.spike_amplitude / 0.5)
        } else {
            0.0
        };

        baseline + spike
    }

    /// Next reading on the simulator's own sample clock
    pub fn next_sample(&mut self) -> f64 {
        let time_s = self.elapsed_s();
        self.position += 1;
        self.sample_at(time_s)
    }

    /// `count` consecutive readings
    pub fn generate(&mut self, count: usize) -> Vec<f64> {
        (0..count).map(|_| self.next_sample()).collect()
    }

    /// `count` consecutive readings quantized with [`map_to_adc`]
    pub fn generate_adc(&mut self, count: usize) -> Vec<i32> {
        (0..count).map(|_| map_to_adc(self.next_sample())).collect()
    }

    /// Restart the sample clock at t = 0 (the generator state is kept)
    pub fn reset(&mut self) {
        self.position = 0;
    }
}

/// Map a reading in [-1.0, 1.0] onto the 16-bit ADC range 0..=65534
///
/// Out-of-range readings saturate at the `i32` limits of the cast.
///
/// # Example
/// ```
/// # use emgcodec::signal::map_to_adc;
/// assert_eq!(map_to_adc(-1.0), 0);
/// assert_eq!(map_to_adc(0.0), 32767);
/// assert_eq!(map_to_adc(1.0), 65534);
/// ```
pub fn map_to_adc(sample: f64) -> i32 {
    ((sample + 1.0) * ADC_HALF_SCALE) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_envelope() {
        let config = SimulationConfig::default();
        assert_eq!(config.envelope(0.0), 1.0);
        assert_eq!(config.envelope(0.49), 1.0);
        assert_eq!(config.envelope(0.5), 0.2);
        assert_eq!(config.envelope(1.99), 0.2);
        assert_eq!(config.envelope(2.1), 1.0);
    }

    #[test]
    fn test_at_rest_never_contracts() {
        let config = SimulationConfig::at_rest(1000);
        assert_eq!(config.envelope(0.0), 0.2);
        assert_eq!(config.envelope(4.0), 0.2);
    }

    #[test]
    fn test_sample_interval() {
        assert_eq!(SimulationConfig::new(1000).sample_interval_s(), 0.001);
        assert_eq!(SimulationConfig::new(0).sample_interval_s(), 0.0);
    }

    #[test]
    fn test_seeded_simulation_is_reproducible() {
        let config = SimulationConfig::default();
        let mut a = EmgSimulator::new(config, StdRng::seed_from_u64(7));
        let mut b = EmgSimulator::new(config, StdRng::seed_from_u64(7));

        assert_eq!(a.generate_adc(500), b.generate_adc(500));
    }

    #[test]
    fn test_samples_stay_in_range() {
        let mut sim = EmgSimulator::new(SimulationConfig::default(), StdRng::seed_from_u64(1));
        for sample in sim.generate(4000) {
            // noise in [-0.1, 0.099], spike in [0, 0.499]
            assert!((-0.1..0.6).contains(&sample), "sample {}", sample);
        }
    }

    #[test]
    fn test_clock_advances_and_resets() {
        let mut sim = EmgSimulator::new(SimulationConfig::new(100), StdRng::seed_from_u64(3));
        assert_eq!(sim.elapsed_s(), 0.0);
        sim.generate(50);
        assert!((sim.elapsed_s() - 0.5).abs() < 1e-12);
        sim.reset();
        assert_eq!(sim.elapsed_s(), 0.0);
    }

    #[test]
    fn test_adc_mapping() {
        assert_eq!(map_to_adc(-1.0), 0);
        assert_eq!(map_to_adc(0.0), 32767);
        assert_eq!(map_to_adc(0.5), 49150);
        assert_eq!(map_to_adc(f64::INFINITY), i32::MAX);
    }
}
