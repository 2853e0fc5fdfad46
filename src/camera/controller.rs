use super::{TrackballCamera, Viewport};
use crate::settings::TrackballSettings;
use nalgebra_glm as glm;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{Key, NamedKey};

/// Handles window input and turns it into trackball gestures
pub struct CameraController {
    camera: TrackballCamera,
    zoom_step: f32,
    left_mouse_pressed: bool,
    middle_mouse_pressed: bool,
    right_mouse_pressed: bool,
    cursor_pos: Option<glm::Vec2>,
}

impl CameraController {
    pub fn new(settings: &TrackballSettings, viewport: Viewport) -> Self {
        let settings = settings.clone().sanitized();
        Self {
            camera: TrackballCamera::from_settings(&settings, viewport),
            zoom_step: settings.zoom_step,
            left_mouse_pressed: false,
            middle_mouse_pressed: false,
            right_mouse_pressed: false,
            cursor_pos: None,
        }
    }

    pub fn camera(&self) -> &TrackballCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut TrackballCamera {
        &mut self.camera
    }

    /// Dispatch a window event. Returns true when the view matrix changed.
    pub fn handle_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::Resized(size) => {
                self.on_resize(size.width, size.height);
                false
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.on_mouse_button(*button, *state == ElementState::Pressed);
                false
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.on_mouse_move((position.x, position.y))
            }
            WindowEvent::MouseWheel { delta, .. } => self.on_mouse_wheel(delta),
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                self.on_key(&event.logical_key)
            }
            _ => false,
        }
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            // minimized
            return;
        }
        self.camera.set_viewport(Viewport::from_size(width, height));
    }

    /// Handle mouse button press/release. A second button never starts a
    /// gesture while the first one is still running.
    pub fn on_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => {
                self.left_mouse_pressed = pressed;
                if !pressed {
                    self.camera.end_rotation();
                } else if !self.camera.is_translating() {
                    if let Some(pos) = self.cursor_pos {
                        self.camera.begin_rotation(&pos);
                    }
                }
            }
            MouseButton::Middle | MouseButton::Right => {
                if button == MouseButton::Middle {
                    self.middle_mouse_pressed = pressed;
                } else {
                    self.right_mouse_pressed = pressed;
                }
                if !self.pan_button_pressed() {
                    self.camera.end_pan();
                } else if pressed && !self.camera.is_translating() && !self.camera.is_rotating() {
                    if let Some(pos) = self.cursor_pos {
                        self.camera.begin_pan(&pos);
                    }
                }
            }
            _ => {}
        }
    }

    fn pan_button_pressed(&self) -> bool {
        self.middle_mouse_pressed || self.right_mouse_pressed
    }

    /// Handle mouse movement in window pixels. Only one gesture is fed per
    /// move; a running gesture wins over a newly held button.
    pub fn on_mouse_move(&mut self, position: (f64, f64)) -> bool {
        let pos = glm::vec2(position.0 as f32, position.1 as f32);
        self.cursor_pos = Some(pos);

        if self.camera.is_rotating() {
            self.camera.rotate_camera(&pos);
        } else if self.camera.is_translating() {
            self.camera.translate_camera(&pos);
        } else if self.left_mouse_pressed {
            self.camera.rotate_camera(&pos);
        } else if self.pan_button_pressed() {
            self.camera.translate_camera(&pos);
        } else {
            return false;
        }
        true
    }

    pub fn on_mouse_wheel(&mut self, delta: &MouseScrollDelta) -> bool {
        let scroll = match delta {
            MouseScrollDelta::LineDelta(_, y) => *y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
        };
        if scroll > 0.0 {
            self.camera.increase_zoom(self.zoom_step);
        } else if scroll < 0.0 {
            self.camera.decrease_zoom(self.zoom_step);
        } else {
            return false;
        }
        true
    }

    pub fn on_key(&mut self, key: &Key) -> bool {
        match key {
            Key::Character(c) => match c.as_str() {
                "r" | "R" => self.reset(),
                "+" | "=" => self.camera.increase_zoom(self.zoom_step),
                "-" => self.camera.decrease_zoom(self.zoom_step),
                _ => return false,
            },
            Key::Named(NamedKey::Home) => self.reset(),
            _ => return false,
        }
        true
    }

    /// Reset camera to defaults
    pub fn reset(&mut self) {
        self.camera.reset();
        self.left_mouse_pressed = false;
        self.middle_mouse_pressed = false;
        self.right_mouse_pressed = false;
    }
}
