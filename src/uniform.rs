use crate::camera::TrackballCamera;
use nalgebra_glm as glm;

/// Column-major matrix block ready to be copied into a uniform buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub view_projection: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        let identity: [[f32; 4]; 4] = glm::Mat4::identity().into();
        Self {
            view: identity,
            projection: identity,
            view_projection: identity,
        }
    }

    pub fn update(&mut self, camera: &TrackballCamera) {
        let view = *camera.view_matrix();
        let projection = camera.projection_matrix();
        self.view = view.into();
        self.projection = projection.into();
        self.view_projection = (projection * view).into();
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&TrackballCamera> for CameraUniform {
    fn from(camera: &TrackballCamera) -> Self {
        let mut uniform = Self::new();
        uniform.update(camera);
        uniform
    }
}
