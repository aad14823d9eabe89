//! Configuration for an object model's shape tree.

use core_types::PropertyAttributes;
use serde::{Deserialize, Serialize};

/// How transition tables hold on to the schemas they lead to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionRetention {
    /// Targets are held weakly and reclaimed once no object or child
    /// schema references them.
    #[default]
    Weak,
    /// Targets are held strongly and live as long as their source schema.
    /// A schema reachable from the root is then never reclaimed.
    Strong,
}

/// Configuration shared by every schema derived from one root.
///
/// # Example
///
/// ```
/// use shape_manager::{ShapeConfig, TransitionRetention};
///
/// let config = ShapeConfig {
///     transition_retention: TransitionRetention::Strong,
///     ..ShapeConfig::default()
/// };
/// assert!(config.fast_path_transfer);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeConfig {
    /// Retention policy for transition targets
    pub transition_retention: TransitionRetention,
    /// Whether a schema may hand its freshly built property map to its
    /// only add-child instead of copying it
    pub fast_path_transfer: bool,
    /// Attributes given to properties created by plain assignment
    pub default_attributes: PropertyAttributes,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        ShapeConfig {
            transition_retention: TransitionRetention::Weak,
            fast_path_transfer: true,
            default_attributes: PropertyAttributes::FULL_ACCESS,
        }
    }
}
