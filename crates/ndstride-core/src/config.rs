//! Print configuration
//!
//! Backends format arrays according to a [`PrintOptions`] value. The defaults
//! match NumPy's.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintOptions {
    /// Digits after the decimal point for floating-point elements.
    pub precision: usize,
    /// Arrays with more elements than this are summarised with `...`.
    pub threshold: usize,
    /// Leading and trailing items kept per axis when summarising.
    pub edge_items: usize,
    /// Separator between elements of the innermost axis.
    pub separator: String,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            precision: 8,
            threshold: 1000,
            edge_items: 3,
            separator: " ".to_string(),
        }
    }
}

impl PrintOptions {
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_edge_items(mut self, edge_items: usize) -> Self {
        self.edge_items = edge_items;
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = PrintOptions::default();
        assert_eq!(opts.precision, 8);
        assert_eq!(opts.threshold, 1000);
        assert_eq!(opts.edge_items, 3);
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let opts: PrintOptions = serde_json::from_str(r#"{"precision": 3}"#).unwrap();
        assert_eq!(opts.precision, 3);
        assert_eq!(opts.threshold, 1000);
        assert_eq!(opts.separator, " ");
    }
}
