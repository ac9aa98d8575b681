//! Configuration for the flattening engine

/// Configuration options for the axis pipelines
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Factor applied to horizontal offsets after flattening
    pub scale: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the horizontal scale factor
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LayoutConfig::default();
        assert_eq!(config.scale, 1.0);
    }

    #[test]
    fn test_builder_pattern() {
        let config = LayoutConfig::new().with_scale(1.5);
        assert_eq!(config.scale, 1.5);
    }
}
