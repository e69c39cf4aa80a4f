//! Geometry utilities: affine decomposition, node geometry, and the
//! identity-transform bracket used by every frame write.
//!
//! A node's geometry follows the layer model: `bounds` is the content-space
//! size, `position` is where `anchor` (unit coordinates inside the bounds)
//! lands in parent space, and `transform` (rotation + non-uniform scale)
//! is applied about the anchor. `frame` is derived, never stored. It is
//! only a faithful description of the node while `transform` is the
//! identity, which is why writers bracket with [`Geometry::with_identity_transform`].

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Unit anchor at the geometric centre.
pub const CENTER_ANCHOR: Point = Point::new(0.5, 0.5);

/// Decomposition helpers over a 2D affine `(a, b, c, d, tx, ty)`.
///
/// Rotation and scale are always derived from the coefficients, never
/// stored beside them, so they cannot drift apart.
pub trait AffineExt {
    /// `sqrt(a² + c²)`
    fn x_scale(&self) -> f64;
    /// `sqrt(b² + d²)`
    fn y_scale(&self) -> f64;
    /// `atan2(b, a)`, in radians.
    fn rotation(&self) -> f64;
    /// Concatenate a rotation so that it applies before `self`.
    fn rotated(&self, angle: f64) -> Affine;
    fn translation_part(&self) -> Vec2;
    fn is_identity(&self) -> bool;
}

impl AffineExt for Affine {
    fn x_scale(&self) -> f64 {
        let [a, _, c, _, _, _] = self.as_coeffs();
        (a * a + c * c).sqrt()
    }

    fn y_scale(&self) -> f64 {
        let [_, b, _, d, _, _] = self.as_coeffs();
        (b * b + d * d).sqrt()
    }

    fn rotation(&self) -> f64 {
        let [a, b, _, _, _, _] = self.as_coeffs();
        b.atan2(a)
    }

    fn rotated(&self, angle: f64) -> Affine {
        *self * Affine::rotate(angle)
    }

    fn translation_part(&self) -> Vec2 {
        let [_, _, _, _, tx, ty] = self.as_coeffs();
        Vec2::new(tx, ty)
    }

    fn is_identity(&self) -> bool {
        *self == Affine::IDENTITY
    }
}

/// Rotate `point` by `angle` radians about `center`.
pub fn rotate_about(point: Point, center: Point, angle: f64) -> Point {
    let about = Affine::translate(center.to_vec2())
        * Affine::rotate(angle)
        * Affine::translate(-center.to_vec2());
    about * point
}

/// Clamp a gesture scale factor to a small positive epsilon so the
/// resulting transform stays invertible.
pub fn clamp_scale(factor: f64, epsilon: f64) -> f64 {
    if factor.is_finite() && factor > epsilon {
        factor
    } else {
        epsilon
    }
}

/// Aspect-fit `content` into `view` and centre the result.
///
/// This is the container rectangle imported nodes live in.
pub fn fit_container(view: Size, content: Size) -> Rect {
    let full = Rect::from_origin_size(Point::ZERO, view);
    if content.width <= 0.0 || content.height <= 0.0 || view.width <= 0.0 || view.height <= 0.0 {
        return full;
    }
    let ratio = (view.width / content.width) / (view.height / content.height);
    let size = if ratio > 1.0 {
        Size::new(view.width / ratio, view.height)
    } else if ratio < 1.0 {
        Size::new(view.width, view.height * ratio)
    } else {
        view
    };
    Rect::from_center_size(full.center(), size)
}

/// Position, anchor, bounds and transform of one scene node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub position: Point,
    pub anchor: Point,
    pub bounds: Size,
    pub transform: Affine,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            anchor: CENTER_ANCHOR,
            bounds: Size::ZERO,
            transform: Affine::IDENTITY,
        }
    }
}

impl Geometry {
    /// Centre-anchored geometry with an identity transform occupying `frame`.
    pub fn from_frame(frame: Rect) -> Self {
        let mut geometry = Self::default();
        geometry.set_frame(frame);
        geometry
    }

    /// Parent-space bounding box of the transformed bounds rectangle.
    pub fn frame(&self) -> Rect {
        let local = Rect::from_origin_size(
            Point::new(
                -self.anchor.x * self.bounds.width,
                -self.anchor.y * self.bounds.height,
            ),
            self.bounds,
        );
        (Affine::translate(self.position.to_vec2()) * self.transform).transform_rect_bbox(local)
    }

    /// Write `frame` assuming an identity transform: the bounds take the
    /// frame's size and the position follows the anchor. With any other
    /// transform in place the written size is reinterpreted by it.
    pub fn set_frame(&mut self, frame: Rect) {
        let size = frame.size();
        self.bounds = size;
        self.position = Point::new(
            frame.x0 + self.anchor.x * size.width,
            frame.y0 + self.anchor.y * size.height,
        );
    }

    /// Move the frame's origin, keeping its size.
    pub fn set_origin(&mut self, origin: Point) {
        let size = self.frame().size();
        self.set_frame(Rect::from_origin_size(origin, size));
    }

    /// Run `f` with the transform temporarily reset to identity, then
    /// restore the saved transform.
    pub fn with_identity_transform<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.transform;
        self.transform = Affine::IDENTITY;
        let out = f(self);
        self.transform = saved;
        out
    }

    /// The frame as it reads with the transform at identity.
    pub fn identity_frame(&self) -> Rect {
        let mut probe = *self;
        probe.with_identity_transform(|g| g.frame())
    }

    /// The frame with the rotation component removed but scale kept.
    ///
    /// Evaluated as the same three steps a live layer would take: rotate
    /// the transform back by its own angle, read the frame, restore.
    pub fn unrotated_frame(&self) -> Rect {
        let angle = self.rotation();
        if angle == 0.0 {
            return self.frame();
        }
        let mut probe = *self;
        let saved = probe.transform;
        probe.transform = saved.rotated(-angle);
        let frame = probe.frame();
        probe.transform = saved;
        frame
    }

    pub fn rotation(&self) -> f64 {
        self.transform.rotation()
    }

    /// Bring a parent-space point into the node's unrotated frame space.
    pub fn unrotate_point(&self, point: Point) -> Point {
        let angle = self.rotation();
        if angle == 0.0 {
            return point;
        }
        rotate_about(point, self.unrotated_frame().center(), -angle)
    }
}
