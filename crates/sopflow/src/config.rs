//! Configuration types for sopflow diagram generation.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources; every field has a default, so a partial file only
//! overrides what it names.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration.
//! - [`LayoutConfig`] - Spacing, anchor and node sizes used by the layout engine.
//!
//! # Example
//!
//! ```
//! # use sopflow::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().horizontal_spacing(), 180.0);
//! assert!(config.layout().validate().is_ok());
//! ```

use serde::Deserialize;

use sopflow_core::geometry::{Point, Size};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout configuration.
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }
}

/// Geometry settings for the layout engine.
///
/// Distances are in diagram units. The anchor is the center of the start
/// event; flow advances rightward from it by `horizontal_spacing` per step.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    horizontal_spacing: f32,
    vertical_spacing: f32,
    origin_x: f32,
    origin_y: f32,
    event_size: f32,
    gateway_size: f32,
    task_width: f32,
    task_height: f32,
    /// Maximum vertical offset still routed as a straight flow.
    alignment_epsilon: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            horizontal_spacing: 180.0,
            vertical_spacing: 120.0,
            origin_x: 150.0,
            origin_y: 250.0,
            event_size: 36.0,
            gateway_size: 50.0,
            task_width: 100.0,
            task_height: 80.0,
            alignment_epsilon: 1.0,
        }
    }
}

impl LayoutConfig {
    /// Horizontal distance between the centers of consecutive nodes.
    pub fn horizontal_spacing(&self) -> f32 {
        self.horizontal_spacing
    }

    /// Vertical distance between the centers of sibling branches.
    pub fn vertical_spacing(&self) -> f32 {
        self.vertical_spacing
    }

    /// Center of the start event.
    pub fn origin(&self) -> Point {
        Point::new(self.origin_x, self.origin_y)
    }

    /// Size of start and end events.
    pub fn event_size(&self) -> Size {
        Size::square(self.event_size)
    }

    /// Size of both gateway kinds.
    pub fn gateway_size(&self) -> Size {
        Size::square(self.gateway_size)
    }

    /// Size of tasks.
    pub fn task_size(&self) -> Size {
        Size::new(self.task_width, self.task_height)
    }

    pub fn alignment_epsilon(&self) -> f32 {
        self.alignment_epsilon
    }

    /// Checks that every size and spacing is strictly positive and that the
    /// origin is a finite point.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending setting.
    pub fn validate(&self) -> Result<(), String> {
        let settings = [
            ("horizontal_spacing", self.horizontal_spacing),
            ("vertical_spacing", self.vertical_spacing),
            ("event_size", self.event_size),
            ("gateway_size", self.gateway_size),
            ("task_width", self.task_width),
            ("task_height", self.task_height),
        ];
        for (name, value) in settings {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("layout.{name} must be a positive number, got {value}"));
            }
        }
        for (name, value) in [("origin_x", self.origin_x), ("origin_y", self.origin_y)] {
            if !value.is_finite() {
                return Err(format!("layout.{name} must be a finite number, got {value}"));
            }
        }
        if !(self.alignment_epsilon.is_finite() && self.alignment_epsilon >= 0.0) {
            return Err(format!(
                "layout.alignment_epsilon must not be negative, got {}",
                self.alignment_epsilon
            ));
        }
        Ok(())
    }
}
