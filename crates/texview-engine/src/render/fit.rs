//! Aspect-fit ("contain") placement of an image inside a view.
//!
//! The quad spans NDC [-1, 1] on the axis where the image is relatively
//! larger and is shrunk on the other axis, so the whole image is visible and
//! never stretched.

use crate::coords::{Vec2, Viewport};

use super::Vertex;

/// Half-extents, in NDC, of the quad that shows a `texture_size` image inside
/// `viewport` without cropping or distortion.
///
/// Returns `None` when either size is degenerate; there is nothing sensible to
/// draw in that case.
pub fn fit_half_extents(texture_size: (u32, u32), viewport: Viewport) -> Option<Vec2> {
    let (tw, th) = texture_size;
    if tw == 0 || th == 0 || !viewport.is_valid() {
        return None;
    }

    let image_aspect = tw as f32 / th as f32;
    let view_aspect = viewport.aspect();

    let half = if view_aspect > image_aspect {
        // View is wider than the image: full height, narrower width.
        Vec2::new(image_aspect / view_aspect, 1.0)
    } else {
        // View is taller (or equal): full width, shorter height.
        Vec2::new(1.0, view_aspect / image_aspect)
    };

    half.is_finite().then_some(half)
}

/// Triangle-strip corners for the given half-extents.
///
/// Order: bottom-left, top-left, bottom-right, top-right. Texture V is flipped
/// so the first image row lands at the top of the quad.
pub fn quad_vertices(half: Vec2) -> [Vertex; 4] {
    let Vec2 { x, y } = half;
    [
        Vertex::new([-x, -y], [0.0, 1.0]),
        Vertex::new([-x, y], [0.0, 0.0]),
        Vertex::new([x, -y], [1.0, 1.0]),
        Vertex::new([x, y], [1.0, 0.0]),
    ]
}

/// [`fit_half_extents`] followed by [`quad_vertices`].
pub fn aspect_fit_quad(texture_size: (u32, u32), viewport: Viewport) -> Option<[Vertex; 4]> {
    fit_half_extents(texture_size, viewport).map(quad_vertices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(q: [Vertex; 4]) -> [[f32; 2]; 4] {
        q.map(|v| v.position)
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() <= 1e-4 * a.abs().max(b.abs()).max(1.0)
    }

    // ── worked examples ───────────────────────────────────────────────────

    #[test]
    fn square_image_in_wide_view_shrinks_width() {
        let q = aspect_fit_quad((100, 100), Viewport::new(200.0, 100.0)).unwrap();
        assert_eq!(
            positions(q),
            [[-0.5, -1.0], [-0.5, 1.0], [0.5, -1.0], [0.5, 1.0]]
        );
    }

    #[test]
    fn square_image_in_tall_view_shrinks_height() {
        let q = aspect_fit_quad((100, 100), Viewport::new(100.0, 200.0)).unwrap();
        assert_eq!(
            positions(q),
            [[-1.0, -0.5], [-1.0, 0.5], [1.0, -0.5], [1.0, 0.5]]
        );
    }

    #[test]
    fn matching_aspect_fills_the_view() {
        let half = fit_half_extents((640, 480), Viewport::new(1280.0, 960.0)).unwrap();
        assert_eq!(half, Vec2::splat(1.0));
    }

    // ── properties ────────────────────────────────────────────────────────

    #[test]
    fn rendered_aspect_matches_image() {
        let textures = [(1u32, 1u32), (1920, 1080), (1080, 1920), (3, 7), (4096, 17)];
        let views = [(1.0f32, 1.0f32), (390.0, 844.0), (844.0, 390.0), (1000.0, 3.0), (5.0, 999.0)];

        for &(tw, th) in &textures {
            for &(vw, vh) in &views {
                let half = fit_half_extents((tw, th), Viewport::new(vw, vh)).unwrap();

                assert!(half.x > 0.0 && half.x <= 1.0, "{tw}x{th} in {vw}x{vh}: {half:?}");
                assert!(half.y > 0.0 && half.y <= 1.0, "{tw}x{th} in {vw}x{vh}: {half:?}");
                // At least one axis spans the whole view.
                assert!(half.x == 1.0 || half.y == 1.0);

                let on_screen = (half.x * vw) / (half.y * vh);
                let image = tw as f32 / th as f32;
                assert!(approx(on_screen, image), "{tw}x{th} in {vw}x{vh}: {on_screen} vs {image}");
            }
        }
    }

    #[test]
    fn texcoords_put_first_row_on_top() {
        let q = quad_vertices(Vec2::splat(1.0));
        for v in q {
            // Top of the quad (+Y) samples v = 0.
            let expected_v = if v.position[1] > 0.0 { 0.0 } else { 1.0 };
            let expected_u = if v.position[0] > 0.0 { 1.0 } else { 0.0 };
            assert_eq!(v.tex_coord, [expected_u, expected_v]);
        }
    }

    // ── degenerate input ──────────────────────────────────────────────────

    #[test]
    fn zero_sized_view_has_no_fit() {
        assert!(fit_half_extents((10, 10), Viewport::new(0.0, 100.0)).is_none());
        assert!(fit_half_extents((10, 10), Viewport::new(100.0, 0.0)).is_none());
    }

    #[test]
    fn zero_sized_texture_has_no_fit() {
        assert!(fit_half_extents((0, 10), Viewport::new(100.0, 100.0)).is_none());
        assert!(fit_half_extents((10, 0), Viewport::new(100.0, 100.0)).is_none());
    }
}
