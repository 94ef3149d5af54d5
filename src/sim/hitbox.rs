//! Ray vs. target proxies
//!
//! Spheres stand in for sphere targets and humanoid heads; a vertical
//! capped cylinder stands in for a humanoid body. Used by headless drivers
//! to turn a camera ray into the [`RayHit`] a renderer would report.

use glam::{Vec2, Vec3};

use super::motion::MotionTable;
use super::state::{HitPart, RayHit, Target};

/// Sphere proxy radius per unit of target size
const SPHERE_RADIUS: f32 = 0.6;
/// Head sphere radius per unit of target size
const HEAD_RADIUS: f32 = 0.36;
/// Head center height above the body center per unit of target size
const HEAD_OFFSET: f32 = 1.25;
/// Body cylinder radius and height per unit of target size
const BODY_RADIUS: f32 = 0.495;
const BODY_HEIGHT: f32 = 1.4;

/// World position of a humanoid's head
pub fn head_center(body_center: Vec3, target_size: f32) -> Vec3 {
    body_center + Vec3::Y * (HEAD_OFFSET * target_size)
}

/// Distance along `dir` (unit length) to the first sphere intersection in
/// front of `origin`
pub fn ray_sphere(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    if radius <= 0.0 {
        return None;
    }
    let l = origin - center;
    let b = l.dot(dir);
    let c = l.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let near = -b - sq;
    if near >= 0.0 {
        return Some(near);
    }
    let far = -b + sq;
    (far >= 0.0).then_some(far)
}

/// Distance along `dir` (unit length) to a capped cylinder standing on the
/// y axis through `center`
pub fn ray_cylinder_y(origin: Vec3, dir: Vec3, center: Vec3, radius: f32, height: f32) -> Option<f32> {
    if radius <= 0.0 || height <= 0.0 {
        return None;
    }
    let bottom = center.y - height * 0.5;
    let top = center.y + height * 0.5;
    let in_slab = |t: f32| {
        let y = origin.y + dir.y * t;
        y >= bottom && y <= top
    };

    let mut best: Option<f32> = None;
    let mut consider = |t: f32| {
        if t >= 0.0 && best.is_none_or(|b| t < b) {
            best = Some(t);
        }
    };

    // Side wall
    let o = Vec2::new(origin.x - center.x, origin.z - center.z);
    let d = Vec2::new(dir.x, dir.z);
    let a = d.length_squared();
    if a > f32::EPSILON {
        let b = 2.0 * o.dot(d);
        let c = o.length_squared() - radius * radius;
        let disc = b * b - 4.0 * a * c;
        if disc >= 0.0 {
            let sq = disc.sqrt();
            for t in [(-b - sq) / (2.0 * a), (-b + sq) / (2.0 * a)] {
                if in_slab(t) {
                    consider(t);
                }
            }
        }
    }

    // Caps
    if dir.y.abs() > f32::EPSILON {
        for plane in [bottom, top] {
            let t = (plane - origin.y) / dir.y;
            let p = Vec2::new(origin.x + dir.x * t - center.x, origin.z + dir.z * t - center.z);
            if p.length_squared() <= radius * radius {
                consider(t);
            }
        }
    }

    best
}

/// Nearest target part hit by the ray, if any
pub fn raycast(
    targets: &[Target],
    motion: &MotionTable,
    origin: Vec3,
    dir: Vec3,
    target_size: f32,
) -> Option<RayHit> {
    let dir = dir.normalize_or_zero();
    if dir == Vec3::ZERO {
        return None;
    }

    let mut best: Option<(f32, RayHit)> = None;
    for target in targets {
        let hit = if target.species.is_humanoid() {
            let head = ray_sphere(
                origin,
                dir,
                head_center(target.position, target_size),
                HEAD_RADIUS * target_size,
            )
            .map(|t| (t, HitPart::Head));
            let body = ray_cylinder_y(
                origin,
                dir,
                target.position,
                BODY_RADIUS * target_size,
                BODY_HEIGHT * target_size,
            )
            .map(|t| (t, HitPart::Body));
            match (head, body) {
                (Some(h), Some(b)) => Some(if h.0 <= b.0 { h } else { b }),
                (h, b) => h.or(b),
            }
        } else {
            let scale = motion.get(target.id).map_or(1.0, |m| m.scale);
            ray_sphere(origin, dir, target.position, SPHERE_RADIUS * target_size * scale)
                .map(|t| (t, HitPart::Sphere))
        };

        let Some((t, part)) = hit else {
            continue;
        };
        if best.is_none_or(|(bt, _)| t < bt) {
            best = Some((
                t,
                RayHit {
                    target_id: target.id,
                    part,
                },
            ));
        }
    }

    best.map(|(_, hit)| hit)
}
