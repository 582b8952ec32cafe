use crate::error::{Error, Result};
use crate::executor::PanicStrategy;
use std::time::Duration;

const MIN_STACK_SIZE: usize = 16 * 1024;
const MAX_TASKS_LIMIT: usize = 65_536;

#[derive(Debug, Clone)]
pub struct Config {
    pub thread_name_prefix: String,
    pub stack_size: Option<usize>,
    pub panic_strategy: PanicStrategy,

    /// Used by `Dispatcher::dispatch` when the caller passes no timeout.
    /// `None` means an untimed select blocks until some worker reports.
    pub default_timeout: Option<Duration>,

    /// Upper bound on the number of tasks (and threads) per dispatch.
    pub max_tasks: usize,

    #[cfg(feature = "telemetry")]
    pub enable_telemetry: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thread_name_prefix: "fanrace-worker".to_string(),
            stack_size: Some(2 * 1024 * 1024),
            panic_strategy: PanicStrategy::default(),
            default_timeout: None,
            max_tasks: 1024,

            #[cfg(feature = "telemetry")]
            enable_telemetry: true,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub fn validate(&self) -> Result<()> {
        if self.thread_name_prefix.is_empty() {
            return Err(Error::config("thread_name_prefix must not be empty"));
        }
        if self.thread_name_prefix.contains('\0') {
            return Err(Error::config("thread_name_prefix must not contain NUL bytes"));
        }

        if let Some(size) = self.stack_size {
            if size < MIN_STACK_SIZE {
                return Err(Error::config(format!(
                    "stack_size too small (min {} bytes)",
                    MIN_STACK_SIZE
                )));
            }
        }

        if let Some(timeout) = self.default_timeout {
            if timeout.is_zero() {
                return Err(Error::config("default_timeout must be > 0"));
            }
        }

        if self.max_tasks == 0 {
            return Err(Error::config("max_tasks must be > 0"));
        }
        if self.max_tasks > MAX_TASKS_LIMIT {
            return Err(Error::config(format!(
                "max_tasks too large (max {})",
                MAX_TASKS_LIMIT
            )));
        }

        Ok(())
    }

    pub(crate) fn telemetry_enabled(&self) -> bool {
        #[cfg(feature = "telemetry")]
        return self.enable_telemetry;

        #[cfg(not(feature = "telemetry"))]
        false
    }
}

#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    pub fn stack_size(mut self, size: usize) -> Self {
        self.config.stack_size = Some(size);
        self
    }

    pub fn panic_strategy(mut self, strategy: PanicStrategy) -> Self {
        self.config.panic_strategy = strategy;
        self
    }

    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.config.default_timeout = Some(timeout);
        self
    }

    pub fn max_tasks(mut self, n: usize) -> Self {
        self.config.max_tasks = n;
        self
    }

    #[cfg(feature = "telemetry")]
    pub fn enable_telemetry(mut self, enable: bool) -> Self {
        self.config.enable_telemetry = enable;
        self
    }

    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_tasks, 1024);
        assert!(config.default_timeout.is_none());
    }

    #[test]
    fn test_builder() {
        let config = Config::builder()
            .thread_name_prefix("racer")
            .max_tasks(8)
            .default_timeout(Duration::from_millis(250))
            .panic_strategy(PanicStrategy::Isolate)
            .build()
            .unwrap();

        assert_eq!(config.thread_name_prefix, "racer");
        assert_eq!(config.max_tasks, 8);
        assert_eq!(config.default_timeout, Some(Duration::from_millis(250)));
        assert_eq!(config.panic_strategy, PanicStrategy::Isolate);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::builder().max_tasks(0).build().is_err());
        assert!(Config::builder().max_tasks(MAX_TASKS_LIMIT + 1).build().is_err());
        assert!(Config::builder().thread_name_prefix("").build().is_err());
        assert!(Config::builder().thread_name_prefix("pool\0").build().is_err());
        assert!(Config::builder().stack_size(1024).build().is_err());
        assert!(Config::builder()
            .default_timeout(Duration::ZERO)
            .build()
            .is_err());
    }
}
