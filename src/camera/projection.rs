use nalgebra_glm as glm;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective {
        /// Vertical field of view in radians.
        fovy: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    Orthographic {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
}

impl Projection {
    pub fn perspective(fovy: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self::Perspective {
            fovy,
            aspect,
            near,
            far,
        }
    }

    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        Self::Orthographic {
            left,
            right,
            bottom,
            top,
            near,
            far,
        }
    }

    pub fn matrix(&self) -> glm::Mat4 {
        match *self {
            Self::Perspective {
                fovy,
                aspect,
                near,
                far,
            } => glm::perspective(aspect, fovy, near, far),
            Self::Orthographic {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => glm::ortho(left, right, bottom, top, near, far),
        }
    }

    /// Orthographic volumes are left untouched.
    pub fn set_aspect(&mut self, value: f32) {
        if let Self::Perspective { aspect, .. } = self {
            *aspect = value;
        }
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::perspective(45.0_f32.to_radians(), 1.0, 0.1, 100.0)
    }
}
