//! Geometry
//!
//! Scroll and border offsets consulted when converting client coordinates
//! to page coordinates.

/// Scroll position and client (border) offset of a box
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxMetrics {
    pub scroll_left: f64,
    pub scroll_top: f64,
    pub client_left: f64,
    pub client_top: f64,
}

impl BoxMetrics {
    /// Create with scroll offset only
    pub fn scrolled(left: f64, top: f64) -> Self {
        Self {
            scroll_left: left,
            scroll_top: top,
            ..Self::default()
        }
    }

    /// Set the client (border) offset
    pub fn with_client_offset(mut self, left: f64, top: f64) -> Self {
        self.client_left = left;
        self.client_top = top;
        self
    }
}
