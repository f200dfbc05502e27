// fov.rs: field-of-view estimate and projection constants per viewport size

use crate::error::{ConfigWarning, ProjectorError};

// Empirical quadratic fit of vertical FOV (degrees) against aspect ratio.
const FOV_FIT_A: f64 = -12.4514286;
const FOV_FIT_B: f64 = 74.6538095;
const FOV_FIT_C: f64 = 28.2992857;

const MIN_FOV_DEG: f64 = 1.0;
const MAX_FOV_DEG: f64 = 179.0;

/// Vertical FOV in degrees predicted by the calibration fit.
pub fn approximate_fov_deg(aspect: f64) -> f64 {
    FOV_FIT_A * aspect * aspect + FOV_FIT_B * aspect + FOV_FIT_C
}

/// Projection state derived from the viewport size. Rebuilt on resize only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub width: f64,
    pub height: f64,
    /// Field of view in radians.
    pub fov: f64,
    /// Projection constant of the planar model.
    pub v: f64,
    pub screen_edge_x: f64,
    pub screen_edge_y: f64,
    warning: Option<ConfigWarning>,
}

impl ViewportState {
    /// Derive the projection constants for a `width` x `height` viewport.
    ///
    /// A fit outside (1°, 179°) is clamped and reported through
    /// [`ViewportState::warning`] instead of failing.
    pub fn new(width: f64, height: f64) -> Result<Self, ProjectorError> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(ProjectorError::InvalidViewport { width, height });
        }

        let m = width / height;
        let estimated_deg = approximate_fov_deg(m);

        let mut warning = None;
        let fov_deg = if estimated_deg.is_finite()
            && estimated_deg > MIN_FOV_DEG
            && estimated_deg < MAX_FOV_DEG
        {
            estimated_deg
        } else {
            let clamped_deg = if estimated_deg.is_finite() {
                estimated_deg.clamp(MIN_FOV_DEG, MAX_FOV_DEG)
            } else {
                MIN_FOV_DEG
            };
            let w = ConfigWarning::FovClamped {
                aspect: m,
                estimated_deg,
                clamped_deg,
            };
            log::warn!("viewport {}x{}: {}", width, height, w);
            warning = Some(w);
            clamped_deg
        };

        let fov = fov_deg.to_radians();
        let squared_ctg_half_fov = (1.0 / (fov / 2.0).tan()).powi(2);
        let v = squared_ctg_half_fov / (1.0 + 1.0 / (m * m) + squared_ctg_half_fov);

        let screen_edge_angle = (1.0 / m).atan();
        let screen_circumscribed_radius = v.acos().sin();

        log::debug!(
            "viewport {}x{}: fov {:.3}°, v {:.5}",
            width,
            height,
            fov_deg,
            v
        );

        Ok(Self {
            width,
            height,
            fov,
            v,
            screen_edge_x: screen_edge_angle.cos() * screen_circumscribed_radius,
            screen_edge_y: screen_edge_angle.sin() * screen_circumscribed_radius,
            warning,
        })
    }

    pub fn from_pixels(width: u32, height: u32) -> Result<Self, ProjectorError> {
        Self::new(width as f64, height as f64)
    }

    #[inline]
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    pub fn warning(&self) -> Option<ConfigWarning> {
        self.warning
    }
}
