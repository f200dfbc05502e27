// main.rs: hotspot tour viewer with a draggable camera and clickable markers

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod overlay;
mod renderer;

use overlay::{OverlayStyle, MARKER_RADIUS_PT};
use panorama_hotspots::config::ViewerConfig;
use panorama_hotspots::i18n::{self, tr, tr_with};
use panorama_hotspots::{
    OrbitController, OrientationFeed, OrientationPublisher, ProjectionModel, Projector, Tour,
    ViewportState,
};
use renderer::{Renderer, SetupError};

use winit::{
    dpi::{LogicalSize, PhysicalPosition},
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowBuilder},
};

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use std::time::Instant;

/// Cursor travel (physical px) below which a press/release counts as a click.
const CLICK_SLOP_PX: f64 = 4.0;

const LANGUAGES: [(&str, &str); 4] = [
    ("en", "English"),
    ("fr", "Français"),
    ("de", "Deutsch"),
    ("es", "Español"),
];

type LoadedPanorama = (String, image::RgbaImage);

enum UiAction {
    OpenTour(PathBuf),
    GoTo(String),
    ToggleFullscreen,
    ResetView,
    SetLanguage(String),
    Exit,
}

struct ViewerState {
    tour: Option<Tour>,
    manifest_dir: PathBuf,
    projector: Projector,
    viewport: ViewportState,
    orbit: OrbitController,
    has_camera: bool,
    hovered: Option<usize>,
    is_fullscreen: bool,
    is_loading: bool,
    show_fps: bool,
    show_draw_circle: bool,
    lang: String,
}

impl ViewerState {
    fn scene_image_path(&self, source: &str) -> PathBuf {
        let p = Path::new(source);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.manifest_dir.join(p)
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        match ViewportState::from_pixels(width, height) {
            Ok(vp) => self.viewport = vp,
            // Minimized windows report 0x0; keep the last good viewport.
            Err(e) => log::debug!("keeping previous viewport: {}", e),
        }
    }
}

fn main() -> Result<(), SetupError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ViewerConfig::from_env();
    i18n::init(config.lang.clone());
    log::info!("config: {:?}", config);

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(tr("app.title"))
        .with_inner_size(LogicalSize::new(1280, 720))
        .build(&event_loop)?;

    let size = window.inner_size();
    let viewport = ViewportState::from_pixels(size.width.max(1), size.height.max(1))?;
    let mut renderer = pollster::block_on(Renderer::new(&window, &viewport))?;

    let mut state = ViewerState {
        tour: None,
        manifest_dir: PathBuf::from("."),
        projector: Projector::new(config.projection),
        viewport,
        orbit: OrbitController::new(),
        has_camera: false,
        hovered: None,
        is_fullscreen: false,
        is_loading: false,
        show_fps: false,
        show_draw_circle: false,
        lang: config.lang.clone(),
    };

    let (image_tx, image_rx): (Sender<LoadedPanorama>, Receiver<LoadedPanorama>) = channel();
    let (publisher, mut feed) = OrientationFeed::new();

    open_tour(&mut state, &config.manifest, &image_tx);
    if let Some(start) = config.start_scene.as_deref() {
        go_to(&mut state, start, &image_tx);
    }
    publish(&publisher, &state.orbit);

    let mut mouse_pressed = false;
    let mut press_pos: Option<PhysicalPosition<f64>> = None;
    let mut last_mouse_pos: Option<PhysicalPosition<f64>> = None;
    let mut cursor: Option<PhysicalPosition<f64>> = None;

    let mut last_fps_time = Instant::now();
    let mut frame_count = 0u32;
    let mut fps = 0.0f32;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        if let Ok((scene, rgba)) = image_rx.try_recv() {
            let current = state.tour.as_ref().map(|t| t.current().name.as_str());
            if current == Some(scene.as_str()) {
                renderer.load_panorama(rgba);
                state.is_loading = false;
            } else {
                log::debug!("dropping stale panorama for '{}'", scene);
            }
        }

        match event {
            Event::WindowEvent { event, .. } => {
                let response = renderer.egui_state.on_event(&renderer.egui_ctx, &event);
                if response.consumed {
                    return;
                }

                match event {
                    WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,

                    WindowEvent::Resized(new_size) => {
                        renderer.resize(new_size);
                        state.resize(new_size.width, new_size.height);
                    }
                    WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                        renderer.resize(*new_inner_size);
                        state.resize(new_inner_size.width, new_inner_size.height);
                    }

                    WindowEvent::KeyboardInput { input, .. } if input.state == ElementState::Pressed => {
                        let action = match input.virtual_keycode {
                            Some(VirtualKeyCode::O) => pick_tour_file().map(UiAction::OpenTour),
                            Some(VirtualKeyCode::F11) => Some(UiAction::ToggleFullscreen),
                            Some(VirtualKeyCode::R) => Some(UiAction::ResetView),
                            Some(VirtualKeyCode::P) => {
                                state.projector.model = match state.projector.model {
                                    ProjectionModel::Spherical => ProjectionModel::Planar,
                                    ProjectionModel::Planar => ProjectionModel::Spherical,
                                };
                                None
                            }
                            _ => None,
                        };
                        if let Some(action) = action {
                            if apply_action(action, &mut state, &window, &publisher, &image_tx) {
                                *control_flow = ControlFlow::Exit;
                            }
                        }
                    }

                    WindowEvent::MouseInput { state: button_state, button: MouseButton::Left, .. } => {
                        mouse_pressed = button_state == ElementState::Pressed;
                        if mouse_pressed {
                            press_pos = cursor;
                        } else {
                            last_mouse_pos = None;
                            if let (Some(start), Some(end)) = (press_pos.take(), cursor) {
                                let travel = ((end.x - start.x).powi(2) + (end.y - start.y).powi(2)).sqrt();
                                if travel < CLICK_SLOP_PX {
                                    handle_click(&mut state, end, window.scale_factor(), &image_tx);
                                }
                            }
                        }
                    }

                    WindowEvent::CursorMoved { position, .. } => {
                        cursor = Some(position);
                        if mouse_pressed {
                            if let Some(last) = last_mouse_pos {
                                state.orbit.drag(position.x - last.x, position.y - last.y, &state.viewport);
                                publish(&publisher, &state.orbit);
                            }
                            last_mouse_pos = Some(position);
                        }
                    }

                    WindowEvent::CursorLeft { .. } => cursor = None,

                    WindowEvent::DroppedFile(path) => {
                        apply_action(UiAction::OpenTour(path), &mut state, &window, &publisher, &image_tx);
                    }

                    _ => {}
                }
            }

            Event::RedrawRequested(_) => {
                frame_count += 1;
                let elapsed = last_fps_time.elapsed().as_secs_f32();
                if elapsed >= 1.0 {
                    fps = frame_count as f32 / elapsed;
                    frame_count = 0;
                    last_fps_time = Instant::now();
                }

                // No projection until the orientation feed has produced a sample.
                if let Some(camera) = feed.poll() {
                    state.has_camera = true;
                    renderer.update_camera(camera, &state.viewport);
                    let frame = state.projector.frame(camera, &state.viewport);
                    if let Some(tour) = state.tour.as_mut() {
                        tour.update(&frame);
                        let radius = MARKER_RADIUS_PT as f64 * window.scale_factor();
                        state.hovered = cursor
                            .and_then(|c| tour.current().hotspot_at(c.x, c.y, radius));
                    }
                }

                let mut actions = Vec::new();
                let result = renderer.render_with_ui(&window, |ctx| {
                    draw_ui(ctx, &mut state, &mut actions, fps);
                });

                for action in actions {
                    if apply_action(action, &mut state, &window, &publisher, &image_tx) {
                        *control_flow = ControlFlow::Exit;
                    }
                }

                match result {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost) => renderer.resize(renderer.size),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("GPU out of memory, exiting");
                        *control_flow = ControlFlow::Exit;
                    }
                    Err(e) => log::error!("render error: {:?}", e),
                }
            }

            Event::MainEventsCleared => window.request_redraw(),

            _ => {}
        }
    })
}

fn publish(publisher: &OrientationPublisher, orbit: &OrbitController) {
    if publisher.publish(orbit.direction()).is_err() {
        log::warn!("orientation feed closed");
    }
}

fn pick_tour_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter(&tr("file.filter.tours"), &["json"])
        .pick_file()
}

fn open_tour(state: &mut ViewerState, path: &Path, image_tx: &Sender<LoadedPanorama>) {
    match Tour::load(path) {
        Ok(tour) => {
            state.manifest_dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            state.tour = Some(tour);
            state.hovered = None;
            load_current_scene(state, image_tx);
        }
        Err(e) => log::error!(
            "{}",
            tr_with(
                "error.load_tour",
                &[("path", path.display().to_string()), ("err", e.to_string())]
            )
        ),
    }
}

fn load_current_scene(state: &mut ViewerState, image_tx: &Sender<LoadedPanorama>) {
    let Some(tour) = state.tour.as_ref() else {
        return;
    };
    let scene = tour.current();
    let path = state.scene_image_path(&scene.source);
    state.is_loading = true;
    start_load_image(scene.name.clone(), path, image_tx.clone());
}

fn go_to(state: &mut ViewerState, target: &str, image_tx: &Sender<LoadedPanorama>) {
    let Some(tour) = state.tour.as_mut() else {
        return;
    };
    if let Err(e) = tour.go_to(target).map(|_| ()) {
        log::error!("{}", e);
        return;
    }
    state.hovered = None;
    load_current_scene(state, image_tx);
}

fn handle_click(
    state: &mut ViewerState,
    at: PhysicalPosition<f64>,
    scale_factor: f64,
    image_tx: &Sender<LoadedPanorama>,
) {
    let Some(tour) = state.tour.as_ref() else {
        return;
    };
    let scene = tour.current();
    let radius = MARKER_RADIUS_PT as f64 * scale_factor;
    let target = scene
        .hotspot_at(at.x, at.y, radius)
        .and_then(|i| scene.hotspots[i].target.clone());
    if let Some(target) = target {
        go_to(state, &target, image_tx);
    }
}

/// Returns true when the viewer should exit.
fn apply_action(
    action: UiAction,
    state: &mut ViewerState,
    window: &Window,
    publisher: &OrientationPublisher,
    image_tx: &Sender<LoadedPanorama>,
) -> bool {
    match action {
        UiAction::OpenTour(path) => open_tour(state, &path, image_tx),
        UiAction::GoTo(name) => go_to(state, &name, image_tx),
        UiAction::ToggleFullscreen => {
            state.is_fullscreen = !state.is_fullscreen;
            window.set_fullscreen(state.is_fullscreen.then(|| Fullscreen::Borderless(None)));
        }
        UiAction::ResetView => {
            state.orbit.reset();
            publish(publisher, &state.orbit);
        }
        UiAction::SetLanguage(lang) => {
            i18n::init(lang.clone());
            state.lang = lang;
            window.set_title(&tr("app.title"));
        }
        UiAction::Exit => return true,
    }
    false
}

fn start_load_image(scene: String, path: PathBuf, tx: Sender<LoadedPanorama>) {
    thread::spawn(move || {
        log::info!(
            "{}",
            tr_with("log.loading_image", &[("path", path.display().to_string())])
        );

        let reader = match image::io::Reader::open(&path) {
            Ok(r) => r,
            Err(e) => {
                log::error!(
                    "{}",
                    tr_with(
                        "error.open_image",
                        &[("path", path.display().to_string()), ("err", e.to_string())]
                    )
                );
                return;
            }
        };

        let decoded = reader
            .with_guessed_format()
            .map_err(image::ImageError::IoError)
            .and_then(|mut r| {
                r.no_limits();
                r.decode()
            });

        match decoded {
            Ok(img) => {
                log::info!(
                    "{}",
                    tr_with(
                        "log.image_loaded",
                        &[("w", img.width().to_string()), ("h", img.height().to_string())]
                    )
                );
                if tx.send((scene, img.to_rgba8())).is_err() {
                    log::warn!("viewer closed before panorama arrived");
                }
            }
            Err(e) => log::error!(
                "{}",
                tr_with(
                    "error.decode_image",
                    &[("path", path.display().to_string()), ("err", e.to_string())]
                )
            ),
        }
    });
}

fn draw_ui(ctx: &egui::Context, state: &mut ViewerState, actions: &mut Vec<UiAction>, fps: f32) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button(tr("menu.file"), |ui| {
                if ui.button(tr("menu.open_tour")).clicked() {
                    ui.close_menu();
                    if let Some(path) = pick_tour_file() {
                        actions.push(UiAction::OpenTour(path));
                    }
                }
                if ui.button(tr("menu.exit")).clicked() {
                    actions.push(UiAction::Exit);
                }
            });

            ui.menu_button(tr("menu.view"), |ui| {
                if ui.button(tr("view.reset")).clicked() {
                    actions.push(UiAction::ResetView);
                    ui.close_menu();
                }
                let fullscreen_label = if state.is_fullscreen {
                    tr("view.fullscreen.exit")
                } else {
                    tr("view.fullscreen.enter")
                };
                if ui.button(fullscreen_label).clicked() {
                    actions.push(UiAction::ToggleFullscreen);
                    ui.close_menu();
                }

                ui.separator();
                ui.menu_button(tr("view.projection_model"), |ui| {
                    for (model, key) in [
                        (ProjectionModel::Spherical, "projection.spherical"),
                        (ProjectionModel::Planar, "projection.planar"),
                    ] {
                        if ui
                            .radio_value(&mut state.projector.model, model, tr(key))
                            .clicked()
                        {
                            ui.close_menu();
                        }
                    }
                });

                ui.separator();
                ui.menu_button(tr("view.input_sensitivity"), |ui| {
                    ui.add(
                        egui::Slider::new(&mut state.orbit.sensitivity_scale, 0.1..=5.0)
                            .text(tr("view.multiplier")),
                    );
                });

                ui.separator();
                ui.checkbox(&mut state.show_draw_circle, tr("view.draw_circle"));
                ui.checkbox(&mut state.show_fps, tr("view.show_fps"));
            });

            if let Some(tour) = state.tour.as_ref() {
                ui.menu_button(tr("menu.scenes"), |ui| {
                    let current = tour.current().name.clone();
                    for scene in tour.scenes() {
                        let label = match &scene.location {
                            Some(loc) => format!("{} ({})", scene.name, loc),
                            None => scene.name.clone(),
                        };
                        if ui.radio(scene.name == current, label).clicked() {
                            actions.push(UiAction::GoTo(scene.name.clone()));
                            ui.close_menu();
                        }
                    }
                });
            }

            ui.menu_button(tr("menu.language"), |ui| {
                for (code, name) in LANGUAGES {
                    if ui.radio(state.lang == code, name).clicked() {
                        actions.push(UiAction::SetLanguage(code.to_string()));
                        ui.close_menu();
                    }
                }
            });
        });
    });

    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if state.is_loading {
                ui.label(egui::RichText::new(tr("status.loading")).color(egui::Color32::YELLOW));
                ui.label("|");
            }
            if !state.has_camera {
                ui.label(egui::RichText::new(tr("status.no_camera")).color(egui::Color32::YELLOW));
                ui.label("|");
            }
            if let Some(tour) = state.tour.as_ref() {
                ui.label(format!("{} {}", tr("status.scene_prefix"), tour.current().name));
                ui.label("|");
            }
            ui.label(format!("{} {}", tr("status.model_prefix"), state.projector.model));
            ui.label("|");
            ui.label(format!("FOV: {:.1}°", state.viewport.fov.to_degrees()));
            if let Some(w) = state.viewport.warning() {
                ui.label(
                    egui::RichText::new(tr_with("status.fov_clamped", &[("detail", w.to_string())]))
                        .color(egui::Color32::LIGHT_RED),
                );
            }
            ui.label("|");
            ui.label(format!("Yaw: {:.1}°", state.orbit.yaw));
            ui.label("|");
            ui.label(format!("Pitch: {:.1}°", state.orbit.pitch));

            if state.show_fps {
                ui.label("|");
                ui.label(egui::RichText::new(format!("FPS: {:.1}", fps)).color(egui::Color32::GREEN));
            }
        });
    });

    if let Some(tour) = state.tour.as_ref() {
        overlay::paint_hotspots(
            ctx,
            tour.current(),
            &state.viewport,
            state.hovered,
            &OverlayStyle {
                show_draw_circle: state.show_draw_circle,
            },
        );
    }
}
