//! Trackball camera model: maps 2D pointer gestures to rotation, pan and zoom
//! of a 4×4 view transform.

pub mod camera;
pub mod error;
pub mod settings;
pub mod uniform;

pub const CONFY_APP_NAME: &str = "trackball-rs";

pub use camera::{
    CameraController, CameraTransform, FlyCamera, PanGesture, Projection, RotationGesture,
    TrackballCamera, Viewport,
};
pub use error::{GestureError, SettingsError};
pub use settings::{FlySettings, Settings, TrackballSettings};
pub use uniform::CameraUniform;
