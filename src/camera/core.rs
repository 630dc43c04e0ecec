use glam::{Mat4, Quat, UVec2, Vec2, Vec3, Vec4};

use super::orientation;

/// Which viewport axis the field of view is measured along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FovAxis {
    /// `fov` spans the viewport height.
    #[default]
    Vertical,
    /// `fov` spans the viewport width.
    Horizontal,
}

/// Perspective camera defined by eye position, orientation, and projection
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// World-space orientation; the camera looks down its local −Z.
    pub orientation: Quat,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Field of view in degrees, measured along [`Self::fov_axis`].
    pub fov: f32,
    /// Axis the field of view applies to.
    pub fov_axis: FovAxis,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
    /// Sub-pixel projection offset written into the third projection
    /// column (already divided by the target size).
    pub jitter: Vec2,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the view-projection matrix and camera metadata.
pub struct CameraUniform {
    /// Combined (jittered) view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub position: [f32; 3],
    /// Viewport aspect ratio.
    pub aspect: f32,
    /// Camera forward direction for lighting.
    pub forward: [f32; 3],
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Texture LOD bias for the current multiframe sample.
    pub texture_bias: f32,
    /// Padding for GPU alignment.
    pub(crate) _pad: [f32; 3],
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 10.0),
            orientation: Quat::IDENTITY,
            aspect: 16.0 / 9.0,
            fov: 45.0,
            fov_axis: FovAxis::Vertical,
            znear: 0.1,
            zfar: 1000.0,
            jitter: Vec2::ZERO,
        }
    }
}

impl Camera {
    /// Forward (view) direction.
    pub fn forward(&self) -> Vec3 {
        orientation::forward(self.orientation)
    }

    /// Up direction.
    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// World-to-view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.eye).inverse()
    }

    /// Vertical field of view in radians, converting from a horizontal FOV
    /// when needed.
    pub fn vertical_fov(&self) -> f32 {
        let fov = self.fov.to_radians();
        match self.fov_axis {
            FovAxis::Vertical => fov,
            FovAxis::Horizontal => {
                2.0 * ((fov * 0.5).tan() / self.aspect.max(f32::EPSILON)).atan()
            }
        }
    }

    /// Projection matrix without sub-pixel jitter.
    pub fn unjittered_projection(&self) -> Mat4 {
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        Mat4::perspective_rh(
            self.vertical_fov(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Projection matrix with the current jitter applied.
    pub fn build_projection(&self) -> Mat4 {
        let mut proj = self.unjittered_projection();
        proj.z_axis.x = self.jitter.x;
        proj.z_axis.y = self.jitter.y;
        proj
    }

    /// Build the combined (jittered) view-projection matrix.
    pub fn build_matrix(&self) -> Mat4 {
        self.build_projection() * self.view_matrix()
    }

    /// Choose the FOV axis for a viewport so framed content stays visible:
    /// portrait viewports measure the FOV horizontally.
    pub fn fit_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
        self.fov_axis = if height > width {
            FovAxis::Horizontal
        } else {
            FovAxis::Vertical
        };
    }

    /// Point at `distance` from the eye along the view ray through the
    /// given screen position (pixels, origin top-left).
    pub fn screen_to_world(
        &self,
        screen: Vec2,
        viewport: UVec2,
        distance: f32,
    ) -> Vec3 {
        let size = viewport.max(UVec2::ONE).as_vec2();
        let ndc = Vec2::new(
            screen.x / size.x * 2.0 - 1.0,
            1.0 - screen.y / size.y * 2.0,
        );
        let inv_view_proj =
            (self.unjittered_projection() * self.view_matrix()).inverse();
        let near = inv_view_proj * Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
        let near = near.truncate() / near.w;
        let direction = (near - self.eye)
            .try_normalize()
            .unwrap_or_else(|| self.forward());
        self.eye + direction * distance
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a new camera uniform with identity view-projection.
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 3],
            aspect: 16.0 / 9.0,
            forward: [0.0, 0.0, -1.0],
            fovy: 45.0,
            texture_bias: 0.0,
            _pad: [0.0; 3],
        }
    }

    /// Update uniform fields from the given camera's current state.
    pub fn update_view_proj(&mut self, camera: &Camera, texture_bias: f32) {
        self.view_proj = camera.build_matrix().to_cols_array_2d();
        self.position = camera.eye.to_array();
        self.aspect = camera.aspect;
        self.forward = camera.forward().to_array();
        self.fovy = camera.vertical_fov().to_degrees();
        self.texture_bias = texture_bias;
    }
}
