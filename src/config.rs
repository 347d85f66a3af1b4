//! Run configuration (spec.md §6.5): the scalar knobs that gate the R4
//! concurrency invariant are validated at construction, the way the
//! teacher crate uses `derive_builder` for its own multi-field construction.
//! Dimension `D`, the kernel, and the partitioner/selector/serializer
//! instances are not bundled in here — each is its own generic type
//! parameter threaded through `Engine::new`, which is the idiomatic Rust
//! shape for a set of independently-swappable strategy objects (see
//! `DESIGN.md`).

use derive_builder::Builder;

use crate::error::DdtError;

#[derive(Builder, Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// `None` = unbounded (pure in-memory mode); `Some(k)` = at most `k`
    /// in-memory tiles at once.
    #[builder(default = "None")]
    pub in_memory_budget: Option<usize>,

    /// Number of scheduler worker threads (`Sequential` driver ignores
    /// this beyond `1`).
    #[builder(default = "1")]
    pub max_concurrency: usize,
}

impl EngineConfig {
    /// R4: `K >= max_concurrency + 1` so every active worker can hold one
    /// pin without starving the rest.
    pub fn validate(&self) -> Result<(), DdtError> {
        if let Some(k) = self.in_memory_budget {
            if k < self.max_concurrency + 1 {
                return Err(DdtError::InvalidConfig(format!(
                    "in_memory_budget {k} must be >= max_concurrency ({}) + 1",
                    self.max_concurrency
                )));
            }
        }
        if self.max_concurrency == 0 {
            return Err(DdtError::InvalidConfig("max_concurrency must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl EngineConfigBuilder {
    /// `build()` followed by `EngineConfig::validate()`, the single
    /// entry point callers should use.
    pub fn build_validated(self) -> Result<EngineConfig, DdtError> {
        let config = self.build().map_err(|e| DdtError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EngineConfigBuilder::default().build_validated().unwrap();
        assert_eq!(config.max_concurrency, 1);
        assert_eq!(config.in_memory_budget, None);
    }

    #[test]
    fn rejects_budget_below_concurrency_plus_one() {
        let result = EngineConfigBuilder::default()
            .in_memory_budget(Some(2))
            .max_concurrency(2)
            .build_validated();
        assert!(result.is_err());
    }

    #[test]
    fn accepts_budget_satisfying_r4() {
        let config = EngineConfigBuilder::default()
            .in_memory_budget(Some(3))
            .max_concurrency(2)
            .build_validated()
            .unwrap();
        assert_eq!(config.in_memory_budget, Some(3));
    }

    #[test]
    fn rejects_zero_concurrency() {
        let result = EngineConfigBuilder::default().max_concurrency(0).build_validated();
        assert!(result.is_err());
    }
}
