//! Jittered pacing between page requests
//!
//! Every page request is preceded by a pause sampled uniformly from
//! `[base - jitter, base + jitter]` so concurrent location fetches drift apart
//! instead of hitting the API in lockstep. Negative samples (possible when
//! `jitter > base`) are clamped to zero.
//!
//! All waiting, including retry backoff, goes through the [`Sleeper`] trait so
//! timing can be observed in tests without wall-clock delays.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::pacing;
use crate::errors::{ConfigError, ConfigResult};

/// Suspends the calling task for a duration
#[async_trait]
pub trait Sleeper: Send + Sync + Debug {
    /// Wait for `duration` before returning
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Configuration for the pause before each page request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Centre of the sampled delay
    pub base_delay: Duration,
    /// Maximum deviation from the base delay in either direction
    pub jitter: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            base_delay: pacing::DEFAULT_BASE_DELAY,
            jitter: pacing::DEFAULT_JITTER,
        }
    }
}

impl PacingConfig {
    /// Build a pacing configuration from seconds, rejecting negative or non-finite values
    pub fn from_secs_f64(base: f64, jitter: f64) -> ConfigResult<Self> {
        for (field, value) in [("pacing.base_delay", base), ("pacing.jitter", jitter)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    value,
                    "must be a finite, non-negative number of seconds",
                ));
            }
        }

        let to_duration = |field: &str, value: f64| {
            Duration::try_from_secs_f64(value).map_err(|e| {
                ConfigError::invalid(field, value, format!("out of range for a delay: {}", e))
            })
        };

        Ok(Self {
            base_delay: to_duration("pacing.base_delay", base)?,
            jitter: to_duration("pacing.jitter", jitter)?,
        })
    }

    /// Disable pacing entirely
    pub fn none() -> Self {
        Self {
            base_delay: Duration::ZERO,
            jitter: Duration::ZERO,
        }
    }
}

/// Sample a delay uniformly from `[base - jitter, base + jitter]`
///
/// Negative samples clamp to zero and samples beyond `Duration::MAX` saturate.
pub fn jittered_delay(base: Duration, jitter: Duration) -> Duration {
    let base = base.as_secs_f64();
    let jitter = jitter.as_secs_f64();
    let sampled = rand::thread_rng().gen_range((base - jitter)..=(base + jitter));
    Duration::try_from_secs_f64(sampled.max(0.0)).unwrap_or(Duration::MAX)
}

/// Produces and applies the jittered pause before each page request
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: PacingConfig,
}

impl RateLimiter {
    /// Create a rate limiter from its configuration
    pub fn new(config: PacingConfig) -> Self {
        if config.jitter > config.base_delay {
            tracing::debug!(
                "Pacing jitter ({:?}) exceeds base delay ({:?}); negative samples wait zero",
                config.jitter,
                config.base_delay
            );
        }
        Self { config }
    }

    /// Sample the next delay
    pub fn delay(&self) -> Duration {
        jittered_delay(self.config.base_delay, self.config.jitter)
    }

    /// Sample a delay and wait for it
    pub async fn pause(&self, sleeper: &dyn Sleeper) -> Duration {
        let delay = self.delay();
        tracing::trace!("Pacing for {}ms", delay.as_millis());
        sleeper.sleep(delay).await;
        delay
    }

    /// Pacing configuration in use
    pub fn config(&self) -> &PacingConfig {
        &self.config
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(PacingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::RecordingSleeper;

    #[test]
    fn test_delay_within_bounds() {
        let base = Duration::from_secs_f64(1.0);
        let jitter = Duration::from_secs_f64(0.5);

        for _ in 0..1000 {
            let delay = jittered_delay(base, jitter).as_secs_f64();
            assert!(
                (0.5 - 1e-9..=1.5 + 1e-9).contains(&delay),
                "delay {} out of bounds",
                delay
            );
        }
    }

    #[test]
    fn test_delay_spreads_across_interval() {
        let limiter = RateLimiter::default();
        let samples: Vec<f64> = (0..1000).map(|_| limiter.delay().as_secs_f64()).collect();

        assert!(samples.iter().any(|d| *d < 0.9));
        assert!(samples.iter().any(|d| *d > 1.1));
    }

    #[test]
    fn test_zero_jitter_is_exact() {
        let delay = jittered_delay(Duration::from_millis(250), Duration::ZERO);
        assert_eq!(delay, Duration::from_millis(250));
    }

    #[test]
    fn test_negative_samples_clamp_to_zero() {
        let limiter = RateLimiter::new(PacingConfig {
            base_delay: Duration::from_millis(100),
            jitter: Duration::from_secs(10),
        });

        let samples: Vec<Duration> = (0..1000).map(|_| limiter.delay()).collect();
        assert!(samples.iter().all(|d| *d <= Duration::from_millis(10_100)));
        assert!(samples.iter().any(|d| d.is_zero()));
    }

    #[test]
    fn test_config_from_secs_rejects_invalid_values() {
        assert!(PacingConfig::from_secs_f64(1.0, 0.5).is_ok());
        assert!(PacingConfig::from_secs_f64(0.2, 0.5).is_ok());
        assert!(PacingConfig::from_secs_f64(-1.0, 0.5).is_err());
        assert!(PacingConfig::from_secs_f64(1.0, -0.1).is_err());
        assert!(PacingConfig::from_secs_f64(f64::NAN, 0.5).is_err());
        assert!(PacingConfig::from_secs_f64(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_config_from_secs_rejects_oversized_values() {
        let result = PacingConfig::from_secs_f64(1e30, 0.5);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));

        let result = PacingConfig::from_secs_f64(1.0, 1e30);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_delay_saturates_at_duration_max() {
        for _ in 0..100 {
            let delay = jittered_delay(Duration::MAX, Duration::MAX);
            assert!(delay <= Duration::MAX);
        }
    }

    #[tokio::test]
    async fn test_pause_uses_sleeper() {
        let sleeper = RecordingSleeper::default();
        let limiter = RateLimiter::default();

        let delay = limiter.pause(&sleeper).await;
        assert_eq!(sleeper.recorded(), vec![delay]);
    }

    #[test]
    fn test_tokio_sleeper_zero_duration_returns_immediately() {
        tokio_test::block_on(TokioSleeper.sleep(Duration::ZERO));
    }
}
