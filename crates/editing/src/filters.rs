//! Named regex filters over layer names.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::query::filter_layer_indices;
use crate::scene::Layer;

/// A stored layer name filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerFilter {
    pub name: String,
    pub pattern: String,
}

/// Ordered filter list with an active entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerFilters {
    filters: Vec<LayerFilter>,
    active_index: usize,
}

impl LayerFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filters(&self) -> &[LayerFilter] {
        &self.filters
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active(&self) -> Option<&LayerFilter> {
        self.filters.get(self.active_index)
    }

    /// Select the active filter; out of range indices are ignored
    pub fn set_active_index(&mut self, index: usize) -> bool {
        if index >= self.filters.len() {
            return false;
        }
        self.active_index = index;
        true
    }

    /// Append a filter and make it active, returning its index
    pub fn add(&mut self, name: impl Into<String>, pattern: impl Into<String>) -> usize {
        self.filters.push(LayerFilter {
            name: name.into(),
            pattern: pattern.into(),
        });
        self.active_index = self.filters.len() - 1;
        debug!("LayerFilters::add: {} filters, active {}", self.filters.len(), self.active_index);
        self.active_index
    }

    /// Remove the active filter; the previous entry becomes active
    pub fn remove_active(&mut self) -> Option<LayerFilter> {
        if self.active_index >= self.filters.len() {
            return None;
        }
        let removed = self.filters.remove(self.active_index);
        self.active_index = self.active_index.saturating_sub(1);
        Some(removed)
    }

    /// Indices of layers matched by the filter at `index`, computed on demand
    pub fn matching_layers(&self, layers: &[Layer], index: usize) -> Vec<usize> {
        match self.filters.get(index) {
            Some(filter) => filter_layer_indices(layers, &filter.pattern),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_makes_active() {
        let mut filters = LayerFilters::new();
        assert!(filters.active().is_none());
        assert_eq!(filters.add("lines", "^L"), 0);
        assert_eq!(filters.add("fills", "^F"), 1);
        assert_eq!(filters.active().unwrap().name, "fills");
        assert!(filters.set_active_index(0));
        assert!(!filters.set_active_index(5));
        assert_eq!(filters.active_index(), 0);
    }

    #[test]
    fn test_remove_active() {
        let mut filters = LayerFilters::new();
        assert!(filters.remove_active().is_none());
        filters.add("a", "a");
        filters.add("b", "b");
        assert_eq!(filters.remove_active().unwrap().name, "b");
        assert_eq!(filters.active_index(), 0);
        assert_eq!(filters.remove_active().unwrap().name, "a");
        assert!(filters.is_empty());
    }

    #[test]
    fn test_matching_layers_on_demand() {
        let mut layers = vec![Layer::new("Line"), Layer::new("Fill")];
        let mut filters = LayerFilters::new();
        filters.add("lines", "Line");
        assert_eq!(filters.matching_layers(&layers, 0), vec![0]);
        layers[1].info = "Line2".to_string();
        assert_eq!(filters.matching_layers(&layers, 0), vec![0, 1]);
        assert!(filters.matching_layers(&layers, 3).is_empty());
    }
}
