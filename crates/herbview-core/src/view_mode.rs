//! Presentation selector for the visualizer page.

use serde::{Deserialize, Serialize};

/// Which rendition of the loaded image the host shows.
///
/// This never affects mesh or texture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewState {
    /// The flat source image.
    #[default]
    Source,
    /// The interactive 3D scene.
    Rendered,
    /// Source image and 3D scene side by side.
    Comparison,
}

impl ViewState {
    /// All states in toggle order.
    pub const ALL: [ViewState; 3] = [ViewState::Source, ViewState::Rendered, ViewState::Comparison];

    /// Whether the flat image is visible in this state.
    #[must_use]
    pub fn shows_source(self) -> bool {
        matches!(self, ViewState::Source | ViewState::Comparison)
    }

    /// Whether the 3D scene is visible in this state.
    #[must_use]
    pub fn shows_rendered(self) -> bool {
        matches!(self, ViewState::Rendered | ViewState::Comparison)
    }

    /// Returns display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ViewState::Source => "2D View",
            ViewState::Rendered => "3D View",
            ViewState::Comparison => "Compare",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility() {
        assert!(ViewState::Source.shows_source());
        assert!(!ViewState::Source.shows_rendered());
        assert!(!ViewState::Rendered.shows_source());
        assert!(ViewState::Rendered.shows_rendered());
        assert!(ViewState::Comparison.shows_source());
        assert!(ViewState::Comparison.shows_rendered());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&ViewState::Comparison).unwrap(),
            "\"comparison\""
        );
        let v: ViewState = serde_json::from_str("\"rendered\"").unwrap();
        assert_eq!(v, ViewState::Rendered);
    }
}
