// Camera models driven by pointer and keyboard input.
// The trackball is the primary manipulator; the fly camera is a free-look alternative.

mod controller;
mod fly;
mod gesture;
mod projection;
mod state;
mod trackball;
mod viewport;

pub use controller::CameraController;
pub use fly::FlyCamera;
pub use gesture::{PanGesture, RotationGesture};
pub use projection::Projection;
pub use state::CameraTransform;
pub use trackball::{DEFAULT_RADIUS, TrackballCamera, rotation_between, sphere_position};
pub use viewport::Viewport;
