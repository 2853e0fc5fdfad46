use super::Viewport;
use crate::settings::FlySettings;
use log::debug;
use nalgebra_glm as glm;
use std::f32::consts::{PI, TAU};

/// Free-look camera with six degrees of freedom.
///
/// Mouse drags turn the view direction (yaw about Y, then pitch about the
/// yawed X axis); the stride and move operations translate by `speed`.
#[derive(Debug, Clone)]
pub struct FlyCamera {
    speed: f32,
    start_mouse_pos: glm::Vec2,
    yaw: f32,
    pitch: f32,
    rotation: glm::Mat3,
    default_rotation: glm::Mat3,
    default_translation: glm::Vec3,
    translation: glm::Vec3,
    viewport: Viewport,
    view_matrix: glm::Mat4,
}

impl FlyCamera {
    pub fn new(viewport: Viewport) -> Self {
        Self::from_settings(&FlySettings::default(), viewport)
    }

    pub fn from_settings(settings: &FlySettings, viewport: Viewport) -> Self {
        let mut camera = Self {
            speed: settings.speed,
            start_mouse_pos: glm::vec2(0.0, 0.0),
            yaw: 0.0,
            pitch: 0.0,
            rotation: glm::Mat3::identity(),
            default_rotation: glm::Mat3::identity(),
            default_translation: glm::make_vec3(&settings.default_translation),
            translation: glm::vec3(0.0, 0.0, 0.0),
            viewport,
            view_matrix: glm::Mat4::identity(),
        };
        camera.update_view_matrix();
        camera
    }

    /// Zeroes the view angles and the accumulated translation.
    pub fn reset(&mut self) {
        self.start_mouse_pos = glm::vec2(0.0, 0.0);
        self.yaw = 0.0;
        self.pitch = 0.0;
        self.translation = glm::vec3(0.0, 0.0, 0.0);
        self.update_view_matrix();
    }

    /// Take the default rotation and translation from an affine view matrix.
    pub fn set_default_view(&mut self, view: &glm::Mat4) {
        self.default_rotation = glm::mat4_to_mat3(view);
        self.default_translation = glm::vec3(view[(0, 3)], view[(1, 3)], view[(2, 3)]);
        debug!(
            "fly camera: default rotation {:?}, translation {:?}",
            self.default_rotation.as_slice(),
            self.default_translation.as_slice()
        );
        self.update_view_matrix();
    }

    pub fn default_translation(&self) -> &glm::Vec3 {
        &self.default_translation
    }

    pub fn default_rotation(&self) -> &glm::Mat3 {
        &self.default_rotation
    }

    pub fn translation(&self) -> &glm::Vec3 {
        &self.translation
    }

    pub fn rotation(&self) -> &glm::Mat3 {
        &self.rotation
    }

    pub fn view_matrix(&self) -> &glm::Mat4 {
        &self.view_matrix
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn start_rotation(&mut self, pos: &glm::Vec2) {
        self.start_mouse_pos = self.viewport.normalize(pos);
    }

    /// Turn by the pointer delta since the previous sample; a full screen
    /// width is a full turn.
    pub fn rotate(&mut self, pos: &glm::Vec2) {
        let position = self.viewport.normalize(pos);
        let delta = position - self.start_mouse_pos;
        self.start_mouse_pos = position;

        self.pitch = wrap_angle(self.pitch - delta.y * PI);
        self.yaw = wrap_angle(self.yaw - delta.x * PI);
        self.update_view_matrix();
    }

    pub fn stride_left(&mut self) {
        self.move_along_heading(&glm::vec3(1.0, 0.0, 0.0));
    }

    pub fn stride_right(&mut self) {
        self.move_along_heading(&glm::vec3(-1.0, 0.0, 0.0));
    }

    pub fn move_forward(&mut self) {
        self.move_along_heading(&glm::vec3(0.0, 0.0, 1.0));
    }

    pub fn move_back(&mut self) {
        self.move_along_heading(&glm::vec3(0.0, 0.0, -1.0));
    }

    pub fn move_up(&mut self) {
        self.translation -= glm::vec3(0.0, 1.0, 0.0) * self.speed;
        self.update_view_matrix();
    }

    pub fn move_down(&mut self) {
        self.translation += glm::vec3(0.0, 1.0, 0.0) * self.speed;
        self.update_view_matrix();
    }

    // Movement ignores pitch so strides stay level.
    fn move_along_heading(&mut self, local: &glm::Vec3) {
        let direction = glm::rotate_vec3(local, self.yaw, &glm::vec3(0.0, 1.0, 0.0));
        self.translation += direction * self.speed;
        self.update_view_matrix();
    }

    fn update_view_matrix(&mut self) {
        let up = glm::vec3(0.0, 1.0, 0.0);

        let rot_x = glm::normalize(&glm::rotate_vec3(&glm::vec3(1.0, 0.0, 0.0), self.yaw, &up));
        let yawed_z = glm::rotate_vec3(&glm::vec3(0.0, 0.0, 1.0), self.yaw, &up);
        let rot_z = glm::normalize(&glm::rotate_vec3(&yawed_z, self.pitch, &rot_x));
        let rot_y = glm::normalize(&glm::rotate_vec3(&up, self.pitch, &rot_x));

        // rows are the rotated axes
        self.rotation = glm::mat3(
            rot_x.x, rot_x.y, rot_x.z, //
            rot_y.x, rot_y.y, rot_y.z, //
            rot_z.x, rot_z.y, rot_z.z,
        );

        self.view_matrix = glm::mat3_to_mat4(&self.default_rotation)
            * glm::mat3_to_mat4(&self.rotation)
            * glm::translation(&self.default_translation)
            * glm::translation(&self.translation);
    }
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

fn wrap_angle(angle: f32) -> f32 {
    if angle > TAU {
        angle - TAU
    } else if angle < 0.0 {
        angle + TAU
    } else {
        angle
    }
}
