//! Tour manifest loading and scene navigation.
//!
//! A manifest lists scenes, each with a panorama source and hotspots whose
//! `target` names another scene:
//!
//! ```json
//! {
//!   "start": "lobby",
//!   "scenes": [
//!     { "name": "lobby", "source": "lobby.jpg",
//!       "hotspots": [ { "point": [0, 0, -1], "tooltip": "Hall", "target": "hall" } ] },
//!     { "name": "hall", "source": "hall.jpg", "hotspots": [] }
//!   ]
//! }
//! ```
//!
//! `hitboxes` is accepted as an alias for `hotspots`.

use crate::error::TourError;
use crate::hotspot::{Hotspot, HotspotDef, Scene};
use crate::projector::FrameProjector;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct SceneDef {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    pub source: String,
    #[serde(default, alias = "hitboxes")]
    pub hotspots: Vec<HotspotDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TourManifest {
    #[serde(default)]
    pub start: Option<String>,
    pub scenes: Vec<SceneDef>,
}

impl TourManifest {
    pub fn from_json(text: &str) -> Result<Self, TourError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Clone)]
pub struct Tour {
    scenes: Vec<Scene>,
    index: HashMap<String, usize>,
    current: usize,
}

impl Tour {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TourError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let tour = Self::from_manifest(TourManifest::from_json(&text)?)?;
        log::info!(
            "loaded tour {:?}: {} scenes, starting at '{}'",
            path,
            tour.scenes.len(),
            tour.current().name
        );
        Ok(tour)
    }

    pub fn from_manifest(manifest: TourManifest) -> Result<Self, TourError> {
        if manifest.scenes.is_empty() {
            return Err(TourError::Empty);
        }

        let mut index = HashMap::with_capacity(manifest.scenes.len());
        for (i, def) in manifest.scenes.iter().enumerate() {
            if index.insert(def.name.clone(), i).is_some() {
                return Err(TourError::DuplicateScene(def.name.clone()));
            }
        }

        let mut scenes = Vec::with_capacity(manifest.scenes.len());
        for def in manifest.scenes {
            let mut hotspots = Vec::with_capacity(def.hotspots.len());
            for (i, h) in def.hotspots.iter().enumerate() {
                if let Some(target) = &h.target {
                    if !index.contains_key(target) {
                        return Err(TourError::DanglingTarget {
                            scene: def.name.clone(),
                            target: target.clone(),
                        });
                    }
                }
                let hotspot = Hotspot::from_def(h).map_err(|source| {
                    log::warn!("scene '{}': hotspot #{} rejected: {}", def.name, i, source);
                    TourError::Hotspot {
                        scene: def.name.clone(),
                        index: i,
                        source,
                    }
                })?;
                hotspots.push(hotspot);
            }
            scenes.push(Scene {
                name: def.name,
                location: def.location,
                source: def.source,
                hotspots,
            });
        }

        let current = match &manifest.start {
            Some(name) => *index
                .get(name)
                .ok_or_else(|| TourError::UnknownScene(name.clone()))?,
            None => 0,
        };

        Ok(Self {
            scenes,
            index,
            current,
        })
    }

    pub fn current(&self) -> &Scene {
        &self.scenes[self.current]
    }

    pub fn current_mut(&mut self) -> &mut Scene {
        &mut self.scenes[self.current]
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn scene(&self, name: &str) -> Option<&Scene> {
        self.index.get(name).map(|&i| &self.scenes[i])
    }

    /// Make `name` the active scene. Later frame updates go to it; its
    /// hotspots start without a screen state until projected.
    pub fn go_to(&mut self, name: &str) -> Result<&Scene, TourError> {
        let i = *self
            .index
            .get(name)
            .ok_or_else(|| TourError::UnknownScene(name.to_string()))?;
        self.current = i;
        let scene = &mut self.scenes[i];
        scene.clear_screen_states();
        log::debug!("switched to scene '{}' ({})", scene.name, scene.source);
        Ok(&self.scenes[i])
    }

    /// Project the active scene's hotspots for this frame.
    pub fn update(&mut self, frame: &FrameProjector<'_>) {
        self.current_mut().update(frame);
    }
}
