//! Quaternion composition, basis extraction, and axis alignment.
//!
//! Every function here is pure and allocation-free.  Composition always
//! renormalizes so that chained updates never drift off the unit sphere.
//!
//! ## Conventions
//!
//! | Local axis | Canonical vector | Meaning |
//! |------------|------------------|---------|
//! | forward    | `-Z`             | thrust / look direction |
//! | right      | `+X`             | strafe direction |
//! | up         | `+Y`             | away from "down" |

use bevy::math::{Quat, Vec3};

/// Squared length below which a vector or quaternion counts as degenerate.
const DEGENERATE_SQ: f32 = 1e-12;

/// `|from + to|²` below which two unit vectors count as anti-parallel
/// (within ~1e-5 rad of a half turn).
const ANTI_PARALLEL_SUM_SQ: f32 = 1e-10;

/// Which frame the axis passed to [`compose`] is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Axis is fixed in the world; the rotation is pre-multiplied.
    World,
    /// Axis is fixed to the body; the rotation is post-multiplied.
    Body,
}

/// World-space directions of the body's local axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Default for Basis {
    fn default() -> Self {
        basis_vectors(Quat::IDENTITY)
    }
}

/// Normalize `q`, falling back to the identity when it has collapsed to zero
/// or picked up a non-finite component.
pub fn renormalize(q: Quat) -> Quat {
    let len_sq = q.length_squared();
    if len_sq > DEGENERATE_SQ && len_sq.is_finite() {
        q / len_sq.sqrt()
    } else {
        Quat::IDENTITY
    }
}

/// Rotate `q` by `angle` radians about `axis`, where `axis` is expressed in
/// `frame`.
///
/// A zero-length axis leaves the rotation unchanged.
pub fn compose(q: Quat, axis: Vec3, angle: f32, frame: Frame) -> Quat {
    let Some(axis) = axis.try_normalize() else {
        return renormalize(q);
    };
    let delta = Quat::from_axis_angle(axis, angle);
    let out = match frame {
        Frame::World => delta * q,
        Frame::Body => q * delta,
    };
    renormalize(out)
}

/// World-space forward/right/up for orientation `q`.
pub fn basis_vectors(q: Quat) -> Basis {
    Basis {
        forward: q * Vec3::NEG_Z,
        right: q * Vec3::X,
        up: q * Vec3::Y,
    }
}

/// Minimal rotation that carries `current` onto `target`.
///
/// - Parallel inputs give the identity; arbitrarily small misalignments are
///   still corrected.
/// - Anti-parallel inputs give a half turn about an axis orthogonal to
///   `target`, chosen deterministically from `target` alone.
/// - A zero-length input gives the identity.
pub fn align_axis_to(current: Vec3, target: Vec3) -> Quat {
    let (Some(from), Some(to)) = (current.try_normalize(), target.try_normalize()) else {
        return Quat::IDENTITY;
    };
    let sum = from + to;
    let sum_sq = sum.length_squared();
    if sum_sq < ANTI_PARALLEL_SUM_SQ {
        return Quat::from_axis_angle(to.any_orthonormal_vector(), std::f32::consts::PI);
    }
    // Half-angle form (from × to, 1 + cos θ), with 1 + cos θ = |from + to|² / 2.
    // Stays exact for tiny angles, where the dot product rounds to 1.
    let axis = from.cross(to);
    renormalize(Quat::from_xyzw(axis.x, axis.y, axis.z, 0.5 * sum_sq))
}

/// Project `v` onto the plane orthogonal to unit vector `normal` and
/// normalize, or `None` when `v` is (nearly) parallel to `normal`.
pub fn project_onto_plane(v: Vec3, normal: Vec3) -> Option<Vec3> {
    (v - normal * v.dot(normal)).try_normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPS: f32 = 1e-4;

    fn random_unit_vec(rng: &mut StdRng) -> Vec3 {
        loop {
            let v = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            if let Some(n) = v.try_normalize() {
                return n;
            }
        }
    }

    fn random_rotation(rng: &mut StdRng) -> Quat {
        Quat::from_axis_angle(random_unit_vec(rng), rng.gen_range(-PI..PI))
    }

    #[test]
    fn basis_is_orthonormal_for_random_rotations() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let b = basis_vectors(random_rotation(&mut rng));
            assert!((b.forward.length() - 1.0).abs() < EPS);
            assert!((b.right.length() - 1.0).abs() < EPS);
            assert!((b.up.length() - 1.0).abs() < EPS);
            assert!(b.forward.dot(b.right).abs() < EPS);
            assert!(b.forward.dot(b.up).abs() < EPS);
            assert!(b.right.dot(b.up).abs() < EPS);
        }
    }

    #[test]
    fn identity_basis_matches_canonical_axes() {
        let b = basis_vectors(Quat::IDENTITY);
        assert_eq!(b.forward, Vec3::NEG_Z);
        assert_eq!(b.right, Vec3::X);
        assert_eq!(b.up, Vec3::Y);
    }

    #[test]
    fn chained_compositions_stay_unit_length() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut q = Quat::IDENTITY;
        for i in 0..5000 {
            let frame = if i % 2 == 0 { Frame::Body } else { Frame::World };
            q = compose(q, random_unit_vec(&mut rng), rng.gen_range(-1.0..1.0), frame);
            assert!(
                (q.length() - 1.0).abs() < 1e-5,
                "norm drifted to {} after {} compositions",
                q.length(),
                i + 1
            );
        }
    }

    #[test]
    fn body_and_world_frames_differ() {
        let pitched = Quat::from_rotation_x(FRAC_PI_2);
        let body = compose(pitched, Vec3::Y, FRAC_PI_2, Frame::Body);
        let world = compose(pitched, Vec3::Y, FRAC_PI_2, Frame::World);
        assert!(basis_vectors(body).forward.distance(basis_vectors(world).forward) > 0.5);
    }

    #[test]
    fn body_frame_yaw_turns_about_local_up() {
        // Pitched straight up: local up now points along world +Z.
        let pitched = Quat::from_rotation_x(FRAC_PI_2);
        let up_before = basis_vectors(pitched).up;
        let yawed = compose(pitched, Vec3::Y, 0.3, Frame::Body);
        assert!(basis_vectors(yawed).up.distance(up_before) < EPS);
    }

    #[test]
    fn zero_axis_leaves_rotation_unchanged() {
        let q = Quat::from_rotation_y(0.7);
        let out = compose(q, Vec3::ZERO, 1.0, Frame::Body);
        assert!(out.abs_diff_eq(q, EPS));
    }

    #[test]
    fn align_parallel_is_identity() {
        let v = Vec3::new(0.3, -0.8, 0.5);
        assert_eq!(align_axis_to(v, v), Quat::IDENTITY);
        assert_eq!(align_axis_to(v, v * 4.0), Quat::IDENTITY);
    }

    #[test]
    fn align_anti_parallel_is_half_turn_about_orthogonal_axis() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let v = random_unit_vec(&mut rng);
            let q = align_axis_to(v, -v);
            assert!(q.is_finite(), "NaN for {v:?}");
            assert!((q.length() - 1.0).abs() < EPS);
            let (axis, angle) = q.to_axis_angle();
            assert!((angle - PI).abs() < 1e-3, "angle {angle} for {v:?}");
            assert!(axis.dot(v).abs() < 1e-3, "axis {axis:?} not orthogonal to {v:?}");
            assert!((q * v).distance(-v) < 1e-3);
        }
    }

    #[test]
    fn align_maps_current_onto_target() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let a = random_unit_vec(&mut rng);
            let b = random_unit_vec(&mut rng);
            let q = align_axis_to(a, b);
            assert!((q * a).distance(b) < 1e-3, "{a:?} -> {b:?} gave {:?}", q * a);
        }
    }

    #[test]
    fn align_corrects_tiny_misalignments() {
        for angle in [1e-5_f32, 1e-4, 1.2e-3, 5e-3] {
            let target = Quat::from_rotation_x(angle) * Vec3::Y;
            let q = align_axis_to(Vec3::Y, target);
            assert!(
                (q * Vec3::Y).distance(target) < 1e-6,
                "residual {} for tilt {angle}",
                (q * Vec3::Y).distance(target)
            );
            // asin of the vector part; acos of w rounds to zero at these angles.
            let turned = 2.0 * q.xyz().length().asin();
            assert!((turned - angle).abs() < 1e-6, "turned {turned} for tilt {angle}");
        }
    }

    #[test]
    fn align_near_anti_parallel_is_still_exact() {
        let target = Quat::from_rotation_x(PI - 1e-3) * Vec3::Y;
        let q = align_axis_to(Vec3::Y, target);
        assert!((q * Vec3::Y).distance(target) < 1e-5);
    }

    #[test]
    fn align_zero_vector_is_identity() {
        assert_eq!(align_axis_to(Vec3::ZERO, Vec3::Y), Quat::IDENTITY);
        assert_eq!(align_axis_to(Vec3::Y, Vec3::ZERO), Quat::IDENTITY);
    }

    #[test]
    fn renormalize_recovers_from_collapse() {
        assert_eq!(renormalize(Quat::from_xyzw(0.0, 0.0, 0.0, 0.0)), Quat::IDENTITY);
        assert_eq!(renormalize(Quat::from_xyzw(f32::NAN, 0.0, 0.0, 1.0)), Quat::IDENTITY);
        let q = renormalize(Quat::from_xyzw(0.0, 0.0, 0.0, 3.0));
        assert!((q.length() - 1.0).abs() < EPS);
    }

    #[test]
    fn projection_drops_normal_component() {
        let p = project_onto_plane(Vec3::new(1.0, 5.0, 0.0), Vec3::Y).unwrap();
        assert!(p.distance(Vec3::X) < EPS);
        assert!(project_onto_plane(Vec3::Y * 2.0, Vec3::Y).is_none());
    }
}
