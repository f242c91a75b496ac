//! Observation and action space configuration.
//!
//! The networks are built against fixed architecture constants: the size of
//! the categorical action space, the spatial feature grid resolution, and the
//! channel counts of the two observation grids. `SpaceConfig` carries these
//! constants to every network and encoder constructor, so the whole stack is
//! derived from a single description of the environment's spaces.

/// Default number of minimap feature channels.
pub const MINIMAP_CHANNELS: usize = 7;

/// Default number of screen feature channels.
pub const SCREEN_CHANNELS: usize = 17;

/// Default side length of the spatial feature grid.
pub const GRID_SIZE: usize = 32;

/// Description of the observation and action spaces.
///
/// Grid observations are `[batch, channels, grid_size, grid_size]`; the
/// non-spatial observation and the validity mask are `[batch, num_actions]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpaceConfig {
    /// Cardinality of the categorical action space.
    pub num_actions: usize,
    /// Side length of the square spatial feature grid.
    pub grid_size: usize,
    /// Number of minimap observation channels.
    pub minimap_channels: usize,
    /// Number of screen observation channels.
    pub screen_channels: usize,
}

impl SpaceConfig {
    /// Create a configuration for `num_actions` categorical actions with
    /// default grid resolution and channel counts.
    pub fn new(num_actions: usize) -> Self {
        Self {
            num_actions,
            grid_size: GRID_SIZE,
            minimap_channels: MINIMAP_CHANNELS,
            screen_channels: SCREEN_CHANNELS,
        }
    }

    /// Set the spatial grid side length.
    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    /// Set the number of minimap channels.
    pub fn with_minimap_channels(mut self, channels: usize) -> Self {
        self.minimap_channels = channels;
        self
    }

    /// Set the number of screen channels.
    pub fn with_screen_channels(mut self, channels: usize) -> Self {
        self.screen_channels = channels;
        self
    }

    /// Number of cells in the spatial grid.
    pub fn grid_cells(&self) -> usize {
        self.grid_size * self.grid_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SpaceConfig::new(541);
        assert_eq!(config.num_actions, 541);
        assert_eq!(config.grid_size, GRID_SIZE);
        assert_eq!(config.minimap_channels, MINIMAP_CHANNELS);
        assert_eq!(config.screen_channels, SCREEN_CHANNELS);
    }

    #[test]
    fn test_builders() {
        let config = SpaceConfig::new(100)
            .with_grid_size(16)
            .with_minimap_channels(5)
            .with_screen_channels(11);
        assert_eq!(config.grid_size, 16);
        assert_eq!(config.minimap_channels, 5);
        assert_eq!(config.screen_channels, 11);
        assert_eq!(config.grid_cells(), 256);
    }
}
