use nalgebra_glm as glm;

/// Rotation drag state. The anchor is the last sample on the trackball surface.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum RotationGesture {
    #[default]
    Idle,
    Rotating { anchor: glm::Vec3 },
}

impl RotationGesture {
    pub fn begin(anchor: glm::Vec3) -> Self {
        Self::Rotating { anchor }
    }

    pub fn anchor(&self) -> Option<&glm::Vec3> {
        match self {
            Self::Idle => None,
            Self::Rotating { anchor } => Some(anchor),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Rotating { .. })
    }
}

/// Pan drag state. The anchor is the last normalized pointer position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum PanGesture {
    #[default]
    Idle,
    Panning { anchor: glm::Vec2 },
}

impl PanGesture {
    pub fn begin(anchor: glm::Vec2) -> Self {
        Self::Panning { anchor }
    }

    pub fn anchor(&self) -> Option<&glm::Vec2> {
        match self {
            Self::Idle => None,
            Self::Panning { anchor } => Some(anchor),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Panning { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_by_default() {
        assert!(!RotationGesture::default().is_active());
        assert!(RotationGesture::default().anchor().is_none());
        assert!(!PanGesture::default().is_active());
        assert!(PanGesture::default().anchor().is_none());
    }

    #[test]
    fn begin_records_anchor() {
        let rotation = RotationGesture::begin(glm::vec3(0.1, 0.2, 0.7));
        assert!(rotation.is_active());
        assert_eq!(rotation.anchor(), Some(&glm::vec3(0.1, 0.2, 0.7)));

        let pan = PanGesture::begin(glm::vec2(-0.5, 0.5));
        assert!(pan.is_active());
        assert_eq!(pan.anchor(), Some(&glm::vec2(-0.5, 0.5)));
    }
}
