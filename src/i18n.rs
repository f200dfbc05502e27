// i18n.rs: runtime UI strings
//
// Built-in English strings, overridden per language by
// assets/i18n/<lang>.json (flat { "key": "value" }) searched next to the
// executable and then in the working directory. Missing keys fall back to
// English, then to the key itself. `{name}` placeholders are filled by
// tr_with.

use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::RwLock,
};

const BUILTIN_EN: &[(&str, &str)] = &[
    ("app.title", "Panorama Hotspots"),
    ("menu.file", "File"),
    ("menu.open_tour", "Open tour…"),
    ("menu.exit", "Exit"),
    ("menu.view", "View"),
    ("menu.scenes", "Scenes"),
    ("menu.language", "Language"),
    ("view.reset", "Reset view"),
    ("view.fullscreen.enter", "Enter fullscreen"),
    ("view.fullscreen.exit", "Exit fullscreen"),
    ("view.projection_model", "Hotspot projection"),
    ("projection.spherical", "Spherical"),
    ("projection.planar", "Planar (legacy)"),
    ("view.draw_circle", "Show draw circle"),
    ("view.show_fps", "Show FPS"),
    ("view.input_sensitivity", "Drag sensitivity"),
    ("view.multiplier", "multiplier"),
    ("file.filter.tours", "Tour manifests"),
    ("status.scene_prefix", "Scene:"),
    ("status.model_prefix", "Projection:"),
    ("status.loading", "Loading panorama…"),
    ("status.no_camera", "Waiting for orientation…"),
    ("status.fov_clamped", "FOV clamped: {detail}"),
    ("hotspot.go_to", "Go to {target}"),
    ("error.load_tour", "Failed to load tour {path}: {err}"),
    ("error.open_image", "Failed to open panorama {path}: {err}"),
    ("error.decode_image", "Failed to decode panorama {path}: {err}"),
    ("log.loading_image", "Loading panorama {path} in background"),
    ("log.image_loaded", "Panorama loaded: {w}x{h}"),
];

#[derive(Debug, Clone)]
struct Catalog {
    lang: String,
    overrides: HashMap<String, String>,
}

static BUILTIN: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| BUILTIN_EN.iter().copied().collect());

static CATALOG: Lazy<RwLock<Catalog>> = Lazy::new(|| {
    RwLock::new(Catalog {
        lang: "en".to_string(),
        overrides: HashMap::new(),
    })
});

fn candidate_paths(lang: &str) -> Vec<PathBuf> {
    let rel = Path::new("assets").join("i18n").join(format!("{lang}.json"));
    let mut out = Vec::with_capacity(2);
    if let Some(dir) = std::env::current_exe().ok().and_then(|e| e.parent().map(Path::to_path_buf)) {
        out.push(dir.join(&rel));
    }
    out.push(rel);
    out
}

fn load_overrides(lang: &str) -> HashMap<String, String> {
    for path in candidate_paths(lang) {
        let Ok(text) = std::fs::read_to_string(&path) else {
            continue;
        };
        match serde_json::from_str::<HashMap<String, String>>(&text) {
            Ok(map) => {
                log::debug!("loaded {} strings from {:?}", map.len(), path);
                return map;
            }
            Err(e) => log::warn!("ignoring malformed string table {:?}: {}", path, e),
        }
    }
    HashMap::new()
}

/// Switch the UI language. Unknown languages fall back to English.
pub fn init(lang: impl Into<String>) {
    let lang = lang.into();
    let overrides = if lang == "en" {
        HashMap::new()
    } else {
        load_overrides(&lang)
    };
    set_catalog(lang, overrides);
}

fn set_catalog(lang: String, overrides: HashMap<String, String>) {
    if let Ok(mut c) = CATALOG.write() {
        *c = Catalog { lang, overrides };
    }
}

pub fn current_lang() -> String {
    CATALOG
        .read()
        .map(|c| c.lang.clone())
        .unwrap_or_else(|_| "en".to_string())
}

pub fn tr(key: &str) -> String {
    if let Ok(c) = CATALOG.read() {
        if let Some(v) = c.overrides.get(key) {
            return v.clone();
        }
    }
    BUILTIN
        .get(key)
        .map(|v| v.to_string())
        .unwrap_or_else(|| key.to_string())
}

pub fn tr_with(key: &str, args: &[(&str, String)]) -> String {
    args.iter().fold(tr(key), |s, (k, v)| s.replace(&format!("{{{k}}}"), v))
}
