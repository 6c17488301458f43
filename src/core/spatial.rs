use nalgebra::{Point2, Vector2};
use crate::core::domain::Body;

/// Scalar "momentum" of a pair: mass-weighted speed sum.
/// Direction is discarded, so this is not vector momentum.
#[inline]
pub fn momentum_magnitude(a: &Body, b: &Body) -> f64 {
    a.mass * a.speed() + b.mass * b.speed()
}

/// Overlap between two circles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    /// Unit normal pointing from A to B.
    pub normal: Vector2<f64>,
    /// Penetration depth (> 0).
    pub depth: f64,
}

/// Returns the overlap if the circles intersect (`distance < ra + rb`).
/// Coincident centres resolve along +x.
pub fn circle_overlap(pa: &Point2<f64>, ra: f64, pb: &Point2<f64>, rb: f64) -> Option<Overlap> {
    let delta = pb - pa;
    let limit = ra + rb;
    let dist_sq = delta.norm_squared();
    if dist_sq >= limit * limit {
        return None;
    }

    let dist = dist_sq.sqrt();
    let normal = if dist > 1e-9 { delta / dist } else { Vector2::x() };
    Some(Overlap { normal, depth: limit - dist })
}

/// Keeps a body inside `[0, width] x [0, height]`, reflecting the velocity
/// component that points out of the box. Returns true if a wall was hit.
pub fn reflect_in_bounds(body: &mut Body, width: f64, height: f64) -> bool {
    let r = body.radius;
    let mut hit = false;

    if body.position.x - r < 0.0 {
        body.position.x = r;
        body.velocity.x = body.velocity.x.abs() * body.restitution;
        hit = true;
    } else if body.position.x + r > width {
        body.position.x = width - r;
        body.velocity.x = -body.velocity.x.abs() * body.restitution;
        hit = true;
    }

    if body.position.y - r < 0.0 {
        body.position.y = r;
        body.velocity.y = body.velocity.y.abs() * body.restitution;
        hit = true;
    } else if body.position.y + r > height {
        body.position.y = height - r;
        body.velocity.y = -body.velocity.y.abs() * body.restitution;
        hit = true;
    }

    hit
}
