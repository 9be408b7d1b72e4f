//! Polygon reconciliation.
//!
//! Two arbitrary polygons cannot be blended point-by-point: their rings have
//! different vertex counts, may wind in opposite directions, and may carry a
//! different number of holes. The functions here resample both sides to a
//! shared density, align winding, and pad hole lists with zero-area holes so
//! index `i` of one side always pairs with index `i` of the other.
//!
//! Everything in this module is pure: inputs are borrowed, outputs are
//! fresh vectors.

use glam::Vec3;

use crate::config::MorphSettings;
use crate::errors::{MorphError, Result};
use crate::geometry::Polygon;

/// Resamples a ring to `target_count` points evenly spaced by arc length.
///
/// The ring is closed before measuring, so the final sample lands back on
/// the first vertex. Rings with fewer than two points are returned
/// unchanged; a ring with zero perimeter collapses to its first point.
#[must_use]
pub fn trace(ring: &[Vec3], target_count: usize) -> Vec<Vec3> {
    if ring.len() < 2 {
        return ring.to_vec();
    }
    match target_count {
        0 => return Vec::new(),
        1 => return vec![ring[0]],
        _ => {}
    }

    let mut closed = Vec::with_capacity(ring.len() + 1);
    closed.extend_from_slice(ring);
    closed.push(ring[0]);

    // Cumulative arc length at each vertex of the closed ring
    let mut lengths = Vec::with_capacity(closed.len());
    let mut total = 0.0_f32;
    lengths.push(0.0);
    for pair in closed.windows(2) {
        total += pair[0].distance(pair[1]);
        lengths.push(total);
    }

    if total <= f32::EPSILON {
        return vec![ring[0]; target_count];
    }

    let step = total / (target_count - 1) as f32;
    let final_vertex = closed[closed.len() - 1];
    let mut samples = Vec::with_capacity(target_count);

    // Samples are monotonic in arc length, so the bracketing segment only
    // ever moves forward.
    let mut segment = 0;
    for i in 0..target_count {
        let distance = step * i as f32;
        while segment + 1 < lengths.len() && lengths[segment + 1] < distance {
            segment += 1;
        }

        if segment + 1 >= lengths.len() {
            samples.push(final_vertex);
            continue;
        }

        let start = lengths[segment];
        let span = lengths[segment + 1] - start;
        let local = if span > f32::EPSILON {
            ((distance - start) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        samples.push(closed[segment].lerp(closed[segment + 1], local));
    }

    samples
}

/// Unnormalized Newell normal of a ring.
#[must_use]
pub fn newell_normal(ring: &[Vec3]) -> Vec3 {
    let mut normal = Vec3::ZERO;
    for (i, current) in ring.iter().enumerate() {
        let next = ring[(i + 1) % ring.len()];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    normal
}

/// Index of the largest absolute component; ties favour Z, then Y.
#[must_use]
pub fn dominant_axis(normal: Vec3) -> usize {
    let n = normal.abs();
    if n.z >= n.x && n.z >= n.y {
        2
    } else if n.y >= n.x {
        1
    } else {
        0
    }
}

/// Shoelace area of a ring projected onto the plane orthogonal to `axis`.
///
/// The projected axes are taken cyclically (`YZ`, `ZX`, `XY`), so the sign
/// agrees with the sign of the ring's normal along `axis`.
#[must_use]
pub fn signed_area(ring: &[Vec3], axis: usize) -> f32 {
    let (u, v) = match axis {
        0 => (1, 2),
        1 => (2, 0),
        _ => (0, 1),
    };
    let mut twice_area = 0.0;
    for (i, current) in ring.iter().enumerate() {
        let next = ring[(i + 1) % ring.len()];
        twice_area += current[u] * next[v] - next[u] * current[v];
    }
    twice_area * 0.5
}

/// Resamples two rings to a common length and aligns their winding.
///
/// The "after" ring is reversed when its signed area has the opposite sign
/// to the "before" ring on the plane both rings share.
pub fn resolve_ring(
    before: &[Vec3],
    after: &[Vec3],
    settings: &MorphSettings,
) -> Result<(Vec<Vec3>, Vec<Vec3>)> {
    for (context, ring) in [("before ring", before), ("after ring", after)] {
        if ring.len() < 2 {
            log::error!("Cannot resolve {context}: {} point(s)", ring.len());
            return Err(MorphError::DegenerateRing {
                context,
                len: ring.len(),
            });
        }
    }

    let target = settings.target_point_count(before.len(), after.len());
    log::debug!(
        "Resolving rings {} -> {} at {target} points",
        before.len(),
        after.len()
    );

    let resolved_before = trace(before, target);
    let mut resolved_after = trace(after, target);

    let normal = newell_normal(&resolved_before).abs() + newell_normal(&resolved_after).abs();
    let axis = dominant_axis(normal);
    let area_before = signed_area(&resolved_before, axis);
    let area_after = signed_area(&resolved_after, axis);
    if area_before * area_after < 0.0 {
        resolved_after.reverse();
    }

    Ok((resolved_before, resolved_after))
}

/// Pads the shorter hole list with zero-area holes, then resolves each pair.
///
/// A padding hole has as many points as the hole it will pair with, all
/// placed on its own side's reference point, so the hole visually grows out
/// of (or shrinks into) that point.
pub fn equalize_holes(
    before_holes: &[Vec<Vec3>],
    after_holes: &[Vec<Vec3>],
    before_ref: Vec3,
    after_ref: Vec3,
    settings: &MorphSettings,
) -> Result<(Vec<Vec<Vec3>>, Vec<Vec<Vec3>>)> {
    let mut before_holes = before_holes.to_vec();
    let mut after_holes = after_holes.to_vec();

    while before_holes.len() != after_holes.len() {
        if before_holes.len() < after_holes.len() {
            let len = after_holes[before_holes.len()].len();
            before_holes.push(vec![before_ref; len]);
        } else {
            let len = before_holes[after_holes.len()].len();
            after_holes.push(vec![after_ref; len]);
        }
    }

    before_holes
        .iter()
        .zip(&after_holes)
        .map(|(before, after)| resolve_ring(before, after, settings))
        .collect::<Result<Vec<_>>>()
        .map(|pairs| pairs.into_iter().unzip())
}

/// Resolves filled rings and holes of two polygons.
pub fn resolve_polygons(
    before: &Polygon,
    after: &Polygon,
    settings: &MorphSettings,
) -> Result<(Polygon, Polygon)> {
    let (points_before, points_after) = resolve_ring(&before.points, &after.points, settings)?;
    let (holes_before, holes_after) = equalize_holes(
        &before.holes,
        &after.holes,
        before.points[0],
        after.points[0],
        settings,
    )?;

    Ok((
        Polygon {
            points: points_before,
            holes: holes_before,
        },
        Polygon {
            points: points_after,
            holes: holes_after,
        },
    ))
}
