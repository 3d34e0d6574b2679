//! Live gesture preview
//!
//! Draws the last engine bitmap through the uncommitted gesture transform
//! using tiny-skia, without any engine call. Layout (the composed matrix) is
//! separated from rendering so the geometry can be tested on its own.

use tiny_skia::{Color, FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::domain::transform::GestureTransformState;

/// Preview errors
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("Failed to create {width}x{height} preview surface")]
    SurfaceCreationFailed { width: u32, height: u32 },

    #[error("Preview transform is not finite")]
    InvalidTransform,

    #[error("No engine bitmap to preview")]
    NoBitmap,
}

/// Composed preview matrix for one frame, in device pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewLayout {
    pub transform: Transform,
    pub surface_width: u32,
    pub surface_height: u32,
}

impl PreviewLayout {
    /// Composes the preview matrix for the current gesture state
    ///
    /// Built outermost first: scale and rotation about the pivot (only when
    /// either differs from identity), then the pan offset, then the vertical
    /// flip of the bitmap. The flip is the innermost step, so it is the same
    /// whatever the gesture does.
    ///
    /// # Arguments
    /// * `state` - Uncommitted gesture transform, in logical units
    /// * `surface_width`, `surface_height` - Drawing surface in device pixels
    /// * `device_scale` - Device pixels per logical unit
    /// * `flip_vertical` - Whether the bitmap origin differs from the surface's
    pub fn from_state(
        state: &GestureTransformState,
        surface_width: u32,
        surface_height: u32,
        device_scale: f64,
        flip_vertical: bool,
    ) -> Self {
        let mut transform = Transform::identity();

        if state.has_scale_or_rotation() {
            let pivot = state.pivot().scaled(device_scale);
            let (px, py) = (pivot.x as f32, pivot.y as f32);
            let scale = state.scale() as f32;
            transform = Transform::from_translate(px, py)
                .pre_scale(scale, scale)
                .pre_concat(Transform::from_rotate(state.rotation().to_degrees() as f32))
                .pre_translate(-px, -py);
        }

        let offset = state.offset().scaled(device_scale);
        transform = transform.pre_translate(offset.x as f32, offset.y as f32);

        if flip_vertical {
            transform = transform
                .pre_scale(1.0, -1.0)
                .pre_translate(0.0, -(surface_height as f32));
        }

        Self {
            transform,
            surface_width,
            surface_height,
        }
    }

    /// Maps a bitmap point to the surface point where it is drawn
    pub fn map_point(&self, x: f32, y: f32) -> (f32, f32) {
        let t = &self.transform;
        (
            t.sx * x + t.kx * y + t.tx,
            t.ky * x + t.sy * y + t.ty,
        )
    }
}

/// Draws preview frames with tiny-skia
#[derive(Debug, Clone)]
pub struct PreviewRenderer {
    /// Fill for surface areas the moved bitmap no longer covers
    background: Color,
}

impl PreviewRenderer {
    pub fn new() -> Self {
        Self {
            background: Color::WHITE,
        }
    }

    /// Renders one frame into a newly allocated surface
    pub fn render(&self, layout: &PreviewLayout, bitmap: &Pixmap) -> Result<Pixmap, PreviewError> {
        let mut surface = Pixmap::new(layout.surface_width, layout.surface_height).ok_or(
            PreviewError::SurfaceCreationFailed {
                width: layout.surface_width,
                height: layout.surface_height,
            },
        )?;
        self.render_into(layout, bitmap, &mut surface)?;
        Ok(surface)
    }

    /// Renders one frame into an existing surface
    pub fn render_into(
        &self,
        layout: &PreviewLayout,
        bitmap: &Pixmap,
        surface: &mut Pixmap,
    ) -> Result<(), PreviewError> {
        if !layout.transform.is_finite() {
            return Err(PreviewError::InvalidTransform);
        }

        surface.fill(self.background);

        // Nearest sampling keeps pure translations pixel-exact
        let quality = if layout.transform.is_translate() || layout.transform.is_identity() {
            FilterQuality::Nearest
        } else {
            FilterQuality::Bilinear
        };
        let paint = PixmapPaint {
            quality,
            ..PixmapPaint::default()
        };

        surface.draw_pixmap(0, 0, bitmap.as_ref(), &paint, layout.transform, None);
        Ok(())
    }
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::core::Point;
    use crate::domain::gesture::GestureDelta;

    fn assert_near(actual: (f32, f32), expected: (f32, f32)) {
        assert!(
            (actual.0 - expected.0).abs() < 1e-3 && (actual.1 - expected.1).abs() < 1e-3,
            "{:?} != {:?}",
            actual,
            expected
        );
    }

    fn marked_bitmap() -> Pixmap {
        let mut bitmap = Pixmap::new(4, 4).unwrap();
        bitmap.fill(Color::from_rgba8(0, 0, 255, 255));
        let data = bitmap.data_mut();
        data[0] = 255;
        data[1] = 0;
        data[2] = 0;
        data[3] = 255;
        bitmap
    }

    fn is_red(pixmap: &Pixmap, x: u32, y: u32) -> bool {
        let pixel = pixmap.pixel(x, y).unwrap();
        pixel.red() == 255 && pixel.green() == 0 && pixel.blue() == 0
    }

    #[test]
    fn identity_without_flip_is_identity() {
        let state = GestureTransformState::new();
        let layout = PreviewLayout::from_state(&state, 100, 50, 1.0, false);
        assert!(layout.transform.is_identity());
    }

    #[test]
    fn flip_maps_top_row_to_bottom() {
        let state = GestureTransformState::new();
        let layout = PreviewLayout::from_state(&state, 100, 50, 1.0, true);
        assert_near(layout.map_point(10.0, 0.0), (10.0, 50.0));
        assert_near(layout.map_point(10.0, 50.0), (10.0, 0.0));
    }

    #[test]
    fn pan_offset_is_scaled_to_device_pixels() {
        let mut state = GestureTransformState::new();
        state.update(GestureDelta::Pan(Point::new(5.0, -2.0)), Point::new(20.0, 20.0));
        let layout = PreviewLayout::from_state(&state, 100, 100, 2.0, false);
        assert_near(layout.map_point(0.0, 0.0), (10.0, -4.0));
    }

    #[test]
    fn flip_is_unaffected_by_pan() {
        let mut state = GestureTransformState::new();
        state.update(GestureDelta::Pan(Point::new(7.0, 3.0)), Point::ZERO);
        let layout = PreviewLayout::from_state(&state, 100, 50, 1.0, true);
        // bitmap top row lands on the surface bottom edge, shifted by the pan
        assert_near(layout.map_point(0.0, 0.0), (7.0, 53.0));
    }

    #[test]
    fn zoom_keeps_pivot_fixed() {
        let mut state = GestureTransformState::new();
        state.update(GestureDelta::Zoom(2.0), Point::new(10.0, 10.0));
        let layout = PreviewLayout::from_state(&state, 100, 100, 1.0, false);
        assert_near(layout.map_point(10.0, 10.0), (10.0, 10.0));
        assert_near(layout.map_point(11.0, 10.0), (12.0, 10.0));
    }

    #[test]
    fn rotation_turns_about_pivot() {
        let mut state = GestureTransformState::new();
        state.update(
            GestureDelta::Rotate(std::f64::consts::FRAC_PI_2),
            Point::new(10.0, 10.0),
        );
        let layout = PreviewLayout::from_state(&state, 100, 100, 1.0, false);
        assert_near(layout.map_point(10.0, 10.0), (10.0, 10.0));
        assert_near(layout.map_point(11.0, 10.0), (10.0, 11.0));
    }

    #[test]
    fn offset_applies_inside_pivot_transform() {
        let mut state = GestureTransformState::new();
        state.update(GestureDelta::Zoom(2.0), Point::new(0.0, 0.0));
        state.update(GestureDelta::Pan(Point::new(3.0, 0.0)), Point::new(0.0, 0.0));
        let layout = PreviewLayout::from_state(&state, 100, 100, 1.0, false);
        assert_near(layout.map_point(1.0, 0.0), (8.0, 0.0));
    }

    #[test]
    fn render_flips_bitmap() {
        let renderer = PreviewRenderer::new();
        let state = GestureTransformState::new();
        let layout = PreviewLayout::from_state(&state, 4, 4, 1.0, true);
        let frame = renderer.render(&layout, &marked_bitmap()).unwrap();
        assert!(is_red(&frame, 0, 3));
        assert!(!is_red(&frame, 0, 0));
    }

    #[test]
    fn default_config_identity_frame_is_the_bitmap() {
        let config = crate::config::ShellConfig::default();
        let state = GestureTransformState::new();
        let layout = PreviewLayout::from_state(&state, 4, 4, 1.0, config.flip_vertical);
        let bitmap = marked_bitmap();
        let frame = PreviewRenderer::new().render(&layout, &bitmap).unwrap();
        assert!(is_red(&frame, 0, 0));
        assert_eq!(frame.data(), bitmap.data());
    }

    #[test]
    fn render_translates_bitmap() {
        let renderer = PreviewRenderer::new();
        let mut state = GestureTransformState::new();
        state.update(GestureDelta::Pan(Point::new(1.0, 2.0)), Point::ZERO);
        let layout = PreviewLayout::from_state(&state, 4, 4, 1.0, false);
        let frame = renderer.render(&layout, &marked_bitmap()).unwrap();
        assert!(is_red(&frame, 1, 2));
        // uncovered area shows the background
        let corner = frame.pixel(0, 0).unwrap();
        assert_eq!((corner.red(), corner.green(), corner.blue()), (255, 255, 255));
    }

    #[test]
    fn render_is_idempotent() {
        let renderer = PreviewRenderer::new();
        let mut state = GestureTransformState::new();
        state.update(GestureDelta::Zoom(1.5), Point::new(2.0, 2.0));
        let layout = PreviewLayout::from_state(&state, 4, 4, 1.0, true);
        let bitmap = marked_bitmap();
        let a = renderer.render(&layout, &bitmap).unwrap();
        let b = renderer.render(&layout, &bitmap).unwrap();
        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn zero_sized_surface_fails() {
        let renderer = PreviewRenderer::new();
        let state = GestureTransformState::new();
        let layout = PreviewLayout::from_state(&state, 0, 4, 1.0, false);
        assert!(matches!(
            renderer.render(&layout, &marked_bitmap()),
            Err(PreviewError::SurfaceCreationFailed { .. })
        ));
    }
}
