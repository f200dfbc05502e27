//! Hotspot markers and the scenes that own them.

use crate::direction::Direction;
use crate::error::ProjectorError;
use crate::projector::{FrameProjector, ScreenState, Visibility};
use serde::Deserialize;

/// Hotspot as written in a tour manifest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HotspotDef {
    pub point: [f64; 3],
    #[serde(default)]
    pub tooltip: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hotspot {
    pub direction: Direction,
    pub tooltip: Option<String>,
    /// Scene to switch to when clicked.
    pub target: Option<String>,
    /// Placement from the latest frame; `None` until first projected.
    pub screen: Option<ScreenState>,
}

impl Hotspot {
    pub fn from_def(def: &HotspotDef) -> Result<Self, ProjectorError> {
        Ok(Self {
            direction: Direction::from_array(def.point)?,
            tooltip: def.tooltip.clone(),
            target: def.target.clone(),
            screen: None,
        })
    }

    pub fn update(&mut self, frame: &FrameProjector<'_>) {
        self.screen = Some(frame.project(self.direction));
    }

    pub fn visibility(&self) -> Visibility {
        self.screen
            .map(|s| s.visibility())
            .unwrap_or(Visibility::Hidden)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub name: String,
    pub location: Option<String>,
    /// Equirectangular panorama shown behind the hotspots.
    pub source: String,
    pub hotspots: Vec<Hotspot>,
}

impl Scene {
    /// Recompute every hotspot's screen state for this frame.
    pub fn update(&mut self, frame: &FrameProjector<'_>) {
        for hotspot in &mut self.hotspots {
            hotspot.update(frame);
        }
    }

    /// Forget screen states, e.g. when the scene becomes active again.
    pub fn clear_screen_states(&mut self) {
        for hotspot in &mut self.hotspots {
            hotspot.screen = None;
        }
    }

    /// Index of the nearest on-screen hotspot within `radius` pixels of `(x, y)`.
    pub fn hotspot_at(&self, x: f64, y: f64, radius: f64) -> Option<usize> {
        self.hotspots
            .iter()
            .enumerate()
            .filter_map(|(i, h)| {
                let s = h.screen?;
                if !s.on_screen {
                    return None;
                }
                let d2 = (s.x - x).powi(2) + (s.y - y).powi(2);
                (d2 <= radius * radius).then_some((i, d2))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }
}
