use super::{CameraTransform, PanGesture, Projection, RotationGesture, Viewport};
use crate::error::GestureError;
use crate::settings::TrackballSettings;
use log::{debug, trace, warn};
use nalgebra_glm as glm;

/// Fallback for radii that are zero, negative or not finite.
pub const DEFAULT_RADIUS: f32 = 0.8;

/// Lift a normalized screen point onto the trackball surface.
///
/// Inside `|p|² <= r²/2` the point lands on a sphere of radius `r`; outside it
/// lands on the hyperbolic sheet `z = (r²/2) / |p|`, which meets the sphere at
/// the crossover and never folds back for far-away pointers.
pub fn sphere_position(p: &glm::Vec2, radius: f32) -> glm::Vec3 {
    let r2 = radius * radius;
    let d2 = p.x * p.x + p.y * p.y;
    let z = if d2 <= r2 / 2.0 {
        (r2 - d2).sqrt()
    } else {
        (r2 / 2.0) / d2.sqrt()
    };
    glm::vec3(p.x, p.y, z)
}

/// Rotation carrying the direction of `from` onto the direction of `to`.
pub fn rotation_between(from: &glm::Vec3, to: &glm::Vec3) -> glm::Quat {
    let from = normalize_or_zero(from);
    let to = normalize_or_zero(to);
    let axis = normalize_or_zero(&glm::cross(&from, &to));
    axis_angle(&axis, rotation_angle(glm::dot(&from, &to)))
}

// Rounding can push the dot of two unit vectors just past 1.
fn rotation_angle(dot: f32) -> f32 {
    if dot <= 1.0 { dot.acos() } else { 0.0 }
}

fn valid_radius(radius: f32) -> bool {
    radius.is_finite() && radius > 0.0
}

fn normalize_or_zero(v: &glm::Vec3) -> glm::Vec3 {
    let length = glm::length(v);
    if length > 0.0 { v / length } else { *v }
}

// Built by hand so a zero axis yields the identity instead of NaN.
fn axis_angle(axis: &glm::Vec3, angle: f32) -> glm::Quat {
    let (s, c) = (angle / 2.0).sin_cos();
    glm::quat(axis.x * s, axis.y * s, axis.z * s, c)
}

/// Orbit camera driven by pointer gestures.
///
/// Pointer positions are given in pixels and normalized through the current
/// [`Viewport`]. Every mutation rebuilds the cached view matrix from the
/// stored [`CameraTransform`].
#[derive(Debug, Clone)]
pub struct TrackballCamera {
    transform: CameraTransform,
    rotation_gesture: RotationGesture,
    pan_gesture: PanGesture,
    radius: f32,
    viewport: Viewport,
    projection: Projection,
    view_matrix: glm::Mat4,
}

impl TrackballCamera {
    pub fn new(viewport: Viewport) -> Self {
        Self::from_settings(&TrackballSettings::default(), viewport)
    }

    /// Invalid radii fall back to [`DEFAULT_RADIUS`] and an empty viewport to
    /// the unit one.
    pub fn from_settings(settings: &TrackballSettings, viewport: Viewport) -> Self {
        let viewport = if viewport.is_empty() {
            warn!("trackball: empty viewport {viewport:?}, using the unit viewport");
            Viewport::default()
        } else {
            viewport
        };
        let radius = if valid_radius(settings.radius) {
            settings.radius
        } else {
            warn!("trackball: invalid radius {}, using {DEFAULT_RADIUS}", settings.radius);
            DEFAULT_RADIUS
        };

        let mut projection = Projection::default();
        projection.set_aspect(viewport.aspect_ratio());

        let transform = CameraTransform::new(
            glm::quat_identity(),
            glm::make_vec3(&settings.default_translation),
        );
        let view_matrix = transform.matrix();

        Self {
            transform,
            rotation_gesture: RotationGesture::Idle,
            pan_gesture: PanGesture::Idle,
            radius,
            viewport,
            projection,
            view_matrix,
        }
    }

    pub fn transform(&self) -> &CameraTransform {
        &self.transform
    }

    pub fn view_matrix(&self) -> &glm::Mat4 {
        &self.view_matrix
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn projection_matrix(&self) -> glm::Mat4 {
        self.projection.matrix()
    }

    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Also keeps a perspective projection's aspect in step with the new size.
    /// A zero-area viewport is ignored.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            warn!("trackball: ignoring empty viewport {viewport:?}");
            return;
        }
        self.viewport = viewport;
        self.projection.set_aspect(viewport.aspect_ratio());
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Radii that are zero, negative or not finite are ignored.
    pub fn set_radius(&mut self, radius: f32) {
        if !valid_radius(radius) {
            warn!("trackball: ignoring invalid radius {radius}");
            return;
        }
        self.radius = radius;
    }

    pub fn is_rotating(&self) -> bool {
        self.rotation_gesture.is_active()
    }

    pub fn is_translating(&self) -> bool {
        self.pan_gesture.is_active()
    }

    pub fn rotation_gesture(&self) -> &RotationGesture {
        &self.rotation_gesture
    }

    pub fn pan_gesture(&self) -> &PanGesture {
        &self.pan_gesture
    }

    pub fn scale(&self) -> f32 {
        self.transform.scale()
    }

    pub fn composed_rotation(&self) -> glm::Quat {
        self.transform.composed_rotation()
    }

    pub fn set_default_rotation(&mut self, rotation: &glm::Quat) {
        self.transform.set_default_rotation(rotation);
        self.update_view_matrix();
    }

    pub fn set_default_rotation_matrix(&mut self, rotation: &glm::Mat3) {
        self.set_default_rotation(&glm::mat3_to_quat(rotation));
    }

    pub fn set_default_translation(&mut self, translation: &glm::Vec3) {
        self.transform.set_default_translation(translation);
        self.update_view_matrix();
    }

    /// Pixel position to `[-1, 1]²`.
    pub fn normalize_position(&self, pos: &glm::Vec2) -> glm::Vec2 {
        self.viewport.normalize(pos)
    }

    /// Pixel position to a point on the trackball surface.
    pub fn sphere_position(&self, pos: &glm::Vec2) -> glm::Vec3 {
        sphere_position(&self.normalize_position(pos), self.radius)
    }

    pub fn begin_rotation(&mut self, pos: &glm::Vec2) {
        let anchor = self.sphere_position(pos);
        debug!("trackball: begin rotation at {:?}", anchor.as_slice());
        self.rotation_gesture = RotationGesture::begin(anchor);
    }

    /// Rotate by the delta since the previous sample. Returns whether the
    /// pointer moved.
    pub fn continue_rotation(&mut self, pos: &glm::Vec2) -> Result<bool, GestureError> {
        let anchor = *self
            .rotation_gesture
            .anchor()
            .ok_or(GestureError::NotRotating)?;
        Ok(self.rotate_from(&anchor, pos))
    }

    pub fn end_rotation(&mut self) {
        if self.rotation_gesture.is_active() {
            debug!("trackball: end rotation");
        }
        self.rotation_gesture = RotationGesture::Idle;
    }

    /// Begins a rotation on the first call and continues it afterwards.
    pub fn rotate_camera(&mut self, pos: &glm::Vec2) {
        match self.rotation_gesture {
            RotationGesture::Idle => self.begin_rotation(pos),
            RotationGesture::Rotating { anchor } => {
                self.rotate_from(&anchor, pos);
            }
        }
    }

    fn rotate_from(&mut self, anchor: &glm::Vec3, pos: &glm::Vec2) -> bool {
        let normalized = self.normalize_position(pos);
        if normalized == anchor.xy() {
            return false;
        }

        let target = sphere_position(&normalized, self.radius);
        let increment = rotation_between(anchor, &target);
        self.transform.pre_rotate(&increment);
        self.rotation_gesture = RotationGesture::begin(target);
        self.update_view_matrix();
        trace!("trackball: rotation {:?}", self.transform.rotation().coords.as_slice());
        true
    }

    pub fn begin_pan(&mut self, pos: &glm::Vec2) {
        let anchor = self.normalize_position(pos);
        debug!("trackball: begin pan at {:?}", anchor.as_slice());
        self.pan_gesture = PanGesture::begin(anchor);
    }

    /// Pan by the delta since the previous sample. Returns whether the
    /// pointer moved.
    pub fn continue_pan(&mut self, pos: &glm::Vec2) -> Result<bool, GestureError> {
        let anchor = *self.pan_gesture.anchor().ok_or(GestureError::NotPanning)?;
        Ok(self.pan_from(&anchor, pos))
    }

    pub fn end_pan(&mut self) {
        if self.pan_gesture.is_active() {
            debug!("trackball: end pan");
        }
        self.pan_gesture = PanGesture::Idle;
    }

    /// Begins a pan on the first call and continues it afterwards.
    pub fn translate_camera(&mut self, pos: &glm::Vec2) {
        match self.pan_gesture {
            PanGesture::Idle => self.begin_pan(pos),
            PanGesture::Panning { anchor } => {
                self.pan_from(&anchor, pos);
            }
        }
    }

    fn pan_from(&mut self, anchor: &glm::Vec2, pos: &glm::Vec2) -> bool {
        let normalized = self.normalize_position(pos);
        if normalized == *anchor {
            return false;
        }

        let delta = normalized - anchor;
        // Accumulate in camera space so panning follows the current orientation.
        let inverse = glm::quat_inverse(self.transform.rotation());
        let offset = glm::quat_rotate_vec3(&inverse, &glm::vec3(delta.x, delta.y, 0.0));
        self.transform.translate(&offset);
        self.pan_gesture = PanGesture::begin(normalized);
        self.update_view_matrix();
        trace!("trackball: translation {:?}", self.transform.translation().as_slice());
        true
    }

    /// `factor` must be positive.
    pub fn increase_zoom(&mut self, factor: f32) {
        let scale = self.transform.scale() * factor;
        self.set_scale(scale);
    }

    /// `factor` must be positive.
    pub fn decrease_zoom(&mut self, factor: f32) {
        let scale = self.transform.scale() / factor;
        self.set_scale(scale);
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.transform.set_scale(scale);
        self.update_view_matrix();
    }

    /// Add directly to the accumulated translation, outside any gesture.
    pub fn translate_by(&mut self, offset: &glm::Vec3) {
        self.transform.translate(offset);
        self.update_view_matrix();
    }

    /// Append a rotation after the accumulated one, outside any gesture.
    pub fn rotate_by(&mut self, rotation: &glm::Quat) {
        self.transform.post_rotate(rotation);
        self.update_view_matrix();
    }

    pub fn reset(&mut self) {
        self.transform.reset();
        self.rotation_gesture = RotationGesture::Idle;
        self.pan_gesture = PanGesture::Idle;
        self.update_view_matrix();
    }

    fn update_view_matrix(&mut self) {
        self.view_matrix = self.transform.matrix();
    }
}

impl Default for TrackballCamera {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    const RADIUS: f32 = 0.8;

    fn camera() -> TrackballCamera {
        TrackballCamera::new(Viewport::from_size(800, 600))
    }

    fn pixel(x: f32, y: f32) -> glm::Vec2 {
        glm::vec2(x, y)
    }

    #[test]
    fn sphere_branch_near_center() {
        let p = sphere_position(&glm::vec2(0.0, 0.0), RADIUS);
        assert_relative_eq!(p, glm::vec3(0.0, 0.0, RADIUS), epsilon = 1e-6);

        let p = sphere_position(&glm::vec2(0.3, 0.2), RADIUS);
        assert_relative_eq!(glm::length(&p), RADIUS, epsilon = 1e-6);
    }

    #[test]
    fn hyperbolic_branch_far_from_center() {
        let p = sphere_position(&glm::vec2(2.0, 0.0), RADIUS);
        assert_relative_eq!(p.z, RADIUS * RADIUS / 4.0, epsilon = 1e-6);

        let nearer = sphere_position(&glm::vec2(1.0, 0.0), RADIUS);
        assert!(p.z > 0.0 && p.z < nearer.z);
    }

    #[test]
    fn surface_is_continuous_at_crossover() {
        let boundary = (RADIUS * RADIUS / 2.0).sqrt();
        let inside = sphere_position(&glm::vec2(boundary - 1e-5, 0.0), RADIUS);
        let outside = sphere_position(&glm::vec2(boundary + 1e-5, 0.0), RADIUS);
        assert_relative_eq!(inside.z, outside.z, epsilon = 1e-4);

        let at = sphere_position(&glm::vec2(boundary, 0.0), RADIUS);
        assert_relative_eq!(at.z, boundary, epsilon = 1e-5);
    }

    #[test]
    fn identical_samples_give_identity_not_nan() {
        let a = glm::vec3(0.2, -0.1, 0.7);
        let q = rotation_between(&a, &a);
        assert!(q.coords.iter().all(|c| c.is_finite()));
        assert_relative_eq!(q, glm::quat_identity(), epsilon = 1e-6);
    }

    #[test]
    fn dot_past_one_gives_zero_angle() {
        let dot = 1.000_000_1_f32;
        assert!(dot > 1.0);
        assert_eq!(rotation_angle(dot), 0.0);
        assert_eq!(rotation_angle(1.0), 0.0);
        assert_relative_eq!(rotation_angle(0.0), FRAC_PI_2);
        assert_relative_eq!(rotation_angle(-1.0), std::f32::consts::PI);
    }

    #[test]
    fn parallel_samples_of_different_length() {
        let a = glm::vec3(0.3, 0.4, 0.5);
        let q = rotation_between(&a, &(a * 2.0));
        assert!(q.coords.iter().all(|c| c.is_finite()));
        assert_relative_eq!(q, glm::quat_identity(), epsilon = 1e-3);
    }

    #[test]
    fn zero_samples_do_not_poison_rotation() {
        let q = rotation_between(&glm::vec3(0.0, 0.0, 0.0), &glm::vec3(0.0, 0.0, 1.0));
        assert!(q.coords.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn quarter_turn_between_axes() {
        let q = rotation_between(&glm::vec3(0.0, 0.0, 1.0), &glm::vec3(1.0, 0.0, 0.0));
        assert_relative_eq!(
            q,
            glm::quat_angle_axis(FRAC_PI_2, &glm::vec3(0.0, 1.0, 0.0)),
            epsilon = 1e-6
        );
    }

    #[test]
    fn fresh_camera_is_pulled_back() {
        let camera = camera();
        assert!(!camera.is_rotating());
        assert!(!camera.is_translating());
        assert_eq!(camera.scale(), 1.0);
        assert_relative_eq!(
            *camera.view_matrix(),
            glm::translation(&glm::vec3(0.0, 0.0, -4.0))
        );
    }

    #[test]
    fn first_rotate_call_only_anchors() {
        let mut camera = camera();
        let before = *camera.view_matrix();
        camera.rotate_camera(&pixel(400.0, 300.0));
        assert!(camera.is_rotating());
        assert_eq!(*camera.view_matrix(), before);
        assert_relative_eq!(
            *camera.rotation_gesture().anchor().unwrap(),
            glm::vec3(0.0, 0.0, RADIUS),
            epsilon = 1e-6
        );
    }

    #[test]
    fn drag_right_turns_about_up_axis() {
        let mut camera = camera();
        camera.rotate_camera(&pixel(400.0, 300.0));
        camera.rotate_camera(&pixel(480.0, 300.0));

        let rotation = camera.transform().rotation();
        let front = glm::quat_rotate_vec3(rotation, &glm::vec3(0.0, 0.0, 1.0));
        assert!(front.x > 0.0);
        assert_relative_eq!(front.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn rotation_stays_unit_length() {
        let mut camera = camera();
        camera.begin_rotation(&pixel(400.0, 300.0));
        for i in 1..=500 {
            let t = i as f32 * 0.05;
            let pos = pixel(400.0 + 390.0 * (t * 1.3).sin(), 300.0 + 290.0 * (t * 0.7).cos());
            camera.continue_rotation(&pos).unwrap();
            let norm = camera.transform().rotation().norm();
            assert!((norm - 1.0).abs() < 1e-5, "norm drifted to {norm}");
        }
    }

    #[test]
    fn retraced_drag_restores_rotation() {
        let mut camera = camera();
        let path: Vec<glm::Vec2> = (0..=20)
            .map(|i| {
                let t = i as f32 / 20.0;
                pixel(400.0 + 350.0 * t, 300.0 - 200.0 * t * t)
            })
            .collect();

        camera.begin_rotation(&path[0]);
        for pos in path.iter().skip(1) {
            camera.continue_rotation(pos).unwrap();
        }
        assert!(camera.transform().rotation().coords.w < 0.99);
        for pos in path.iter().rev().skip(1) {
            camera.continue_rotation(pos).unwrap();
        }
        camera.end_rotation();

        assert_relative_eq!(*camera.transform().rotation(), glm::quat_identity(), epsilon = 1e-4);
    }

    #[test]
    fn unmoved_pointer_is_ignored() {
        let mut camera = camera();
        camera.begin_rotation(&pixel(100.0, 100.0));
        assert_eq!(camera.continue_rotation(&pixel(100.0, 100.0)), Ok(false));
        camera.begin_pan(&pixel(100.0, 100.0));
        assert_eq!(camera.continue_pan(&pixel(100.0, 100.0)), Ok(false));
        assert_relative_eq!(
            *camera.view_matrix(),
            glm::translation(&glm::vec3(0.0, 0.0, -4.0))
        );
    }

    #[test]
    fn continuing_without_begin_is_an_error() {
        let mut camera = camera();
        assert_eq!(
            camera.continue_rotation(&pixel(10.0, 10.0)),
            Err(GestureError::NotRotating)
        );
        assert_eq!(camera.continue_pan(&pixel(10.0, 10.0)), Err(GestureError::NotPanning));

        camera.begin_rotation(&pixel(400.0, 300.0));
        camera.end_rotation();
        assert_eq!(
            camera.continue_rotation(&pixel(420.0, 300.0)),
            Err(GestureError::NotRotating)
        );
    }

    #[test]
    fn pan_with_identity_rotation() {
        let mut camera = camera();
        camera.translate_camera(&pixel(400.0, 300.0));
        assert!(camera.is_translating());
        camera.translate_camera(&pixel(600.0, 300.0));
        camera.end_pan();

        assert!(!camera.is_translating());
        assert_relative_eq!(*camera.transform().translation(), glm::vec3(0.5, 0.0, 0.0));
    }

    #[test]
    fn pan_is_mapped_through_inverse_rotation() {
        let mut camera = camera();
        let turn = glm::quat_angle_axis(FRAC_PI_2, &glm::vec3(0.0, 0.0, 1.0));
        camera.rotate_by(&turn);
        camera.begin_pan(&pixel(400.0, 300.0));
        camera.continue_pan(&pixel(600.0, 300.0)).unwrap();

        // Rotating +90° about Z maps +X to +Y, so the inverse maps +X to -Y.
        assert_relative_eq!(
            *camera.transform().translation(),
            glm::vec3(0.0, -0.5, 0.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn pan_uses_its_own_anchor() {
        let mut camera = camera();
        camera.begin_rotation(&pixel(600.0, 300.0));
        camera.begin_pan(&pixel(400.0, 300.0));
        // Same spot as the rotation anchor, but the pan anchor says it moved.
        assert_eq!(camera.continue_pan(&pixel(600.0, 300.0)), Ok(true));
        assert_relative_eq!(*camera.transform().translation(), glm::vec3(0.5, 0.0, 0.0));
    }

    #[test]
    fn zoom_in_then_out_restores_scale() {
        let mut camera = camera();
        let before = *camera.view_matrix();
        camera.increase_zoom(2.0);
        assert_eq!(camera.scale(), 2.0);
        camera.decrease_zoom(2.0);
        assert_relative_eq!(camera.scale(), 1.0);
        assert_relative_eq!(*camera.view_matrix(), before);

        camera.set_scale(0.25);
        assert_eq!(camera.scale(), 0.25);
    }

    #[test]
    fn reset_matches_fresh_camera_with_same_defaults() {
        let default_rotation = glm::quat_angle_axis(0.4, &glm::vec3(1.0, 0.0, 0.0));
        let default_translation = glm::vec3(0.0, -1.0, -6.0);

        let mut camera = camera();
        camera.set_default_rotation(&default_rotation);
        camera.set_default_translation(&default_translation);
        camera.rotate_camera(&pixel(400.0, 300.0));
        camera.rotate_camera(&pixel(500.0, 200.0));
        camera.translate_camera(&pixel(100.0, 100.0));
        camera.translate_camera(&pixel(300.0, 50.0));
        camera.increase_zoom(1.5);
        camera.reset();

        let mut fresh = TrackballCamera::new(Viewport::from_size(800, 600));
        fresh.set_default_rotation(&default_rotation);
        fresh.set_default_translation(&default_translation);

        assert!(!camera.is_rotating());
        assert!(!camera.is_translating());
        assert_relative_eq!(*camera.view_matrix(), *fresh.view_matrix());
        assert_relative_eq!(*camera.transform().default_rotation(), default_rotation, epsilon = 1e-6);
    }

    #[test]
    fn default_rotation_from_matrix() {
        let mut camera = camera();
        let rotation = glm::quat_angle_axis(FRAC_PI_2, &glm::vec3(0.0, 1.0, 0.0));
        camera.set_default_rotation_matrix(&glm::quat_to_mat3(&rotation));
        assert_relative_eq!(camera.composed_rotation(), rotation, epsilon = 1e-6);
    }

    #[test]
    fn translate_by_accumulates() {
        let mut camera = camera();
        camera.translate_by(&glm::vec3(1.0, 0.0, 0.0));
        camera.translate_by(&glm::vec3(0.0, 2.0, 0.0));
        assert_relative_eq!(*camera.transform().translation(), glm::vec3(1.0, 2.0, 0.0));
        assert_relative_eq!(
            *camera.view_matrix(),
            glm::translation(&glm::vec3(1.0, 2.0, -4.0))
        );
    }

    #[test]
    fn viewport_change_updates_aspect() {
        let mut camera = camera();
        camera.set_viewport(Viewport::from_size(1000, 500));
        assert!(matches!(
            camera.projection(),
            Projection::Perspective { aspect, .. } if *aspect == 2.0
        ));
    }

    #[test]
    fn empty_viewport_is_ignored() {
        let mut camera = camera();
        camera.set_viewport(Viewport::from_size(0, 600));
        camera.set_viewport(Viewport::new(0.0, 0.0, 800.0, -1.0));
        assert_eq!(*camera.viewport(), Viewport::from_size(800, 600));
        assert!(matches!(
            camera.projection(),
            Projection::Perspective { aspect, .. } if aspect.is_finite()
        ));

        let fallback = TrackballCamera::new(Viewport::from_size(0, 0));
        assert_eq!(*fallback.viewport(), Viewport::default());
        assert!(fallback.normalize_position(&pixel(0.5, 0.5)).iter().all(|c| c.is_finite()));
    }

    #[test]
    fn invalid_radius_is_rejected() {
        let settings = TrackballSettings {
            radius: -2.0,
            ..TrackballSettings::default()
        };
        let mut camera = TrackballCamera::from_settings(&settings, Viewport::from_size(800, 600));
        assert_eq!(camera.radius(), DEFAULT_RADIUS);

        camera.set_radius(0.0);
        camera.set_radius(f32::NAN);
        assert_eq!(camera.radius(), DEFAULT_RADIUS);
        camera.set_radius(0.5);
        assert_eq!(camera.radius(), 0.5);

        // a valid radius keeps every surface point in front of the screen
        assert!(camera.sphere_position(&pixel(800.0, 0.0)).z > 0.0);
    }

    #[test]
    fn settings_drive_construction() {
        let settings = TrackballSettings {
            radius: 0.5,
            default_translation: [0.0, 0.0, -10.0],
            zoom_step: 1.2,
        };
        let camera = TrackballCamera::from_settings(&settings, Viewport::from_size(640, 480));
        assert_eq!(camera.radius(), 0.5);
        assert_relative_eq!(
            *camera.transform().default_translation(),
            glm::vec3(0.0, 0.0, -10.0)
        );
    }
}
