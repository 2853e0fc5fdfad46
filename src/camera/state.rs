use nalgebra_glm as glm;

/// Stored quantities the trackball view matrix is rebuilt from.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraTransform {
    rotation: glm::Quat,
    translation: glm::Vec3,
    scale: f32,
    default_rotation: glm::Quat,
    default_translation: glm::Vec3,
}

impl CameraTransform {
    pub fn new(default_rotation: glm::Quat, default_translation: glm::Vec3) -> Self {
        Self {
            rotation: glm::quat_identity(),
            translation: glm::vec3(0.0, 0.0, 0.0),
            scale: 1.0,
            default_rotation: glm::quat_normalize(&default_rotation),
            default_translation,
        }
    }

    /// Clears user rotation, pan and zoom. Defaults are configuration and survive.
    pub fn reset(&mut self) {
        self.rotation = glm::quat_identity();
        self.translation = glm::vec3(0.0, 0.0, 0.0);
        self.scale = 1.0;
    }

    pub fn rotation(&self) -> &glm::Quat {
        &self.rotation
    }

    pub fn translation(&self) -> &glm::Vec3 {
        &self.translation
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn default_rotation(&self) -> &glm::Quat {
        &self.default_rotation
    }

    pub fn default_translation(&self) -> &glm::Vec3 {
        &self.default_translation
    }

    /// User rotation followed by the default orientation.
    pub fn composed_rotation(&self) -> glm::Quat {
        self.rotation * self.default_rotation
    }

    pub(crate) fn pre_rotate(&mut self, q: &glm::Quat) {
        self.rotation = glm::quat_normalize(&(q * self.rotation));
    }

    pub(crate) fn post_rotate(&mut self, q: &glm::Quat) {
        self.rotation = glm::quat_normalize(&(self.rotation * q));
    }

    pub(crate) fn translate(&mut self, offset: &glm::Vec3) {
        self.translation += offset;
    }

    pub(crate) fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    pub(crate) fn set_default_rotation(&mut self, q: &glm::Quat) {
        self.default_rotation = glm::quat_normalize(q);
    }

    pub(crate) fn set_default_translation(&mut self, t: &glm::Vec3) {
        self.default_translation = *t;
    }

    /// Applied to a point: default rotation, default translation, rotation,
    /// translation, then uniform scale.
    pub fn matrix(&self) -> glm::Mat4 {
        glm::scaling(&glm::vec3(self.scale, self.scale, self.scale))
            * glm::translation(&self.translation)
            * glm::quat_to_mat4(&self.rotation)
            * glm::translation(&self.default_translation)
            * glm::quat_to_mat4(&self.default_rotation)
    }
}

impl Default for CameraTransform {
    fn default() -> Self {
        Self::new(glm::quat_identity(), glm::vec3(0.0, 0.0, -4.0))
    }
}
