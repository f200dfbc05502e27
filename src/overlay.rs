// overlay.rs: hotspot markers painted over the panorama

use panorama_hotspots::{Scene, ViewportState, Visibility};

pub const MARKER_RADIUS_PT: f32 = 11.0;

pub struct OverlayStyle {
    pub show_draw_circle: bool,
}

/// Paint every projected hotspot of `scene`. Positions are physical pixels,
/// egui works in points.
pub fn paint_hotspots(
    ctx: &egui::Context,
    scene: &Scene,
    viewport: &ViewportState,
    hovered: Option<usize>,
    style: &OverlayStyle,
) {
    let ppp = ctx.pixels_per_point();
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Background,
        egui::Id::new("hotspot_overlay"),
    ));

    if style.show_draw_circle {
        let center = egui::pos2(
            (viewport.width / 2.0) as f32 / ppp,
            (viewport.height / 2.0) as f32 / ppp,
        );
        let r = (viewport.width.min(viewport.height) / 2.0) as f32 / ppp;
        painter.circle_stroke(
            center,
            r,
            egui::Stroke::new(1.0, egui::Color32::from_white_alpha(60)),
        );
    }

    for (i, hotspot) in scene.hotspots.iter().enumerate() {
        let Some(s) = hotspot.screen else {
            continue;
        };
        let fill = match s.visibility() {
            Visibility::Visible => egui::Color32::from_rgba_unmultiplied(255, 200, 40, 230),
            Visibility::Dimmed => egui::Color32::from_rgba_unmultiplied(255, 200, 40, 70),
            Visibility::Hidden => continue,
        };
        let pos = egui::pos2(s.x as f32 / ppp, s.y as f32 / ppp);
        let is_hovered = hovered == Some(i);
        let radius = if is_hovered {
            MARKER_RADIUS_PT * 1.25
        } else {
            MARKER_RADIUS_PT
        };

        painter.circle(pos, radius, fill, egui::Stroke::new(2.0, egui::Color32::WHITE));

        if is_hovered {
            let label = match (&hotspot.tooltip, &hotspot.target) {
                (Some(t), _) => t.clone(),
                (None, Some(target)) => panorama_hotspots::i18n::tr_with(
                    "hotspot.go_to",
                    &[("target", target.clone())],
                ),
                (None, None) => continue,
            };
            painter.text(
                pos + egui::vec2(0.0, -radius - 6.0),
                egui::Align2::CENTER_BOTTOM,
                label,
                egui::FontId::proportional(15.0),
                egui::Color32::WHITE,
            );
        }
    }
}
