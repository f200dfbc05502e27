// config.rs: viewer settings from CLI flags and environment
//
// Lookup order per setting: --flag <value>, then env var, then default.

use crate::projector::ProjectionModel;
use std::path::PathBuf;

pub const DEFAULT_MANIFEST: &str = "tour.json";
pub const DEFAULT_LANG: &str = "en";

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub manifest: PathBuf,
    pub projection: ProjectionModel,
    /// Overrides the manifest's start scene.
    pub start_scene: Option<String>,
    pub lang: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from(DEFAULT_MANIFEST),
            projection: ProjectionModel::default(),
            start_scene: None,
            lang: DEFAULT_LANG.to_string(),
        }
    }
}

impl ViewerConfig {
    pub fn from_env() -> Self {
        Self::resolve(std::env::args().skip(1), |k| std::env::var(k).ok())
    }

    pub fn resolve<I, F>(args: I, env: F) -> Self
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let args: Vec<String> = args.into_iter().collect();
        let lookup = |flag: &str, var: &str| -> Option<String> {
            flag_value(&args, flag).or_else(|| env(var).filter(|v| !v.trim().is_empty()))
        };

        let mut cfg = Self::default();

        if let Some(path) = lookup("--manifest", "HOTSPOT_MANIFEST") {
            cfg.manifest = PathBuf::from(path);
        }
        if let Some(model) = lookup("--projection", "HOTSPOT_PROJECTION") {
            match model.parse::<ProjectionModel>() {
                Ok(m) => cfg.projection = m,
                Err(e) => log::warn!("{}; using {}", e, cfg.projection),
            }
        }
        cfg.start_scene = lookup("--scene", "HOTSPOT_SCENE");
        if let Some(lang) = lookup("--lang", "HOTSPOT_LANG") {
            cfg.lang = lang;
        }

        cfg
    }
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    let mut it = args.iter();
    while let Some(a) = it.next() {
        if a == flag {
            return it.next().cloned();
        }
    }
    None
}
