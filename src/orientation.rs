// orientation.rs: camera samples: publisher/feed channel and the mouse orbit driver

use crate::direction::Direction;
use crate::projector::ViewportState;
use std::sync::mpsc::{channel, Receiver, RecvError, SendError, Sender, TryRecvError};

/// Sending half, handed to whatever produces orientation readings.
#[derive(Debug, Clone)]
pub struct OrientationPublisher {
    tx: Sender<Direction>,
}

impl OrientationPublisher {
    pub fn publish(&self, sample: Direction) -> Result<(), SendError<Direction>> {
        self.tx.send(sample)
    }
}

/// Receiving half, owned by the frame loop. Holds the newest camera sample.
#[derive(Debug)]
pub struct OrientationFeed {
    rx: Receiver<Direction>,
    latest: Option<Direction>,
    connected: bool,
}

impl OrientationFeed {
    pub fn new() -> (OrientationPublisher, OrientationFeed) {
        let (tx, rx) = channel();
        (
            OrientationPublisher { tx },
            OrientationFeed {
                rx,
                latest: None,
                connected: true,
            },
        )
    }

    /// Drain pending samples, keep the newest, and return it.
    pub fn poll(&mut self) -> Option<Direction> {
        loop {
            match self.rx.try_recv() {
                Ok(sample) => self.latest = Some(sample),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.connected {
                        log::debug!("orientation publishers disconnected");
                        self.connected = false;
                    }
                    break;
                }
            }
        }
        self.latest
    }

    /// Last sample seen by [`poll`](Self::poll); `None` before the first reading.
    pub fn latest(&self) -> Option<Direction> {
        self.latest
    }

    /// Block until a sample exists. Errors once every publisher is gone
    /// without one having been published.
    pub fn wait_first(&mut self) -> Result<Direction, RecvError> {
        if let Some(d) = self.poll() {
            return Ok(d);
        }
        let sample = self.rx.recv()?;
        self.latest = Some(sample);
        Ok(self.poll().unwrap_or(sample))
    }
}

pub const DEFAULT_PITCH_LIMIT_DEG: f64 = 89.9;

/// Mouse-driven stand-in for a headset orientation sensor. Angles in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitController {
    pub yaw: f64,
    pub pitch: f64,
    pub sensitivity_scale: f64,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitController {
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            sensitivity_scale: 1.0,
        }
    }

    pub fn reset(&mut self) {
        self.yaw = 0.0;
        self.pitch = 0.0;
    }

    /// Grab-and-drag by `(dx, dy)` pixels; one pixel moves the view by the
    /// angle it subtends at the current viewport FOV.
    pub fn drag(&mut self, dx: f64, dy: f64, viewport: &ViewportState) {
        let v_f = viewport.fov;
        let h_f = 2.0 * ((v_f / 2.0).tan() * viewport.aspect()).atan();

        let yaw_per_px_deg = (h_f / viewport.width).to_degrees();
        let pitch_per_px_deg = (v_f / viewport.height).to_degrees();

        self.yaw = (self.yaw - dx * yaw_per_px_deg * self.sensitivity_scale).rem_euclid(360.0);
        self.pitch = (self.pitch + dy * pitch_per_px_deg * self.sensitivity_scale)
            .clamp(-DEFAULT_PITCH_LIMIT_DEG, DEFAULT_PITCH_LIMIT_DEG);
    }

    pub fn direction(&self) -> Direction {
        Direction::from_yaw_pitch(self.yaw.to_radians(), self.pitch.to_radians())
    }
}
