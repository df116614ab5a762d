//! Mesh Triangulator: Delaunay triangulation of the destination points.
//!
//! Incremental Bowyer–Watson. Points are inserted in index order into a
//! bounding super-triangle; triangles touching the super-triangle are removed
//! at the end. Output triangles index into the input slice, are
//! counter-clockwise in `(x, y)` and have non-zero area.
//!
//! The cavity of each insertion is grown from the triangle containing the
//! point through neighbours whose circumcircle contains it, then extended
//! until every cavity edge sees the point strictly on its left. Collinear
//! and co-circular inputs (resampled rectangles) therefore never produce
//! flat or overlapping triangles.

use std::collections::HashMap;

/// Points closer than this to an already inserted point are not inserted.
const COINCIDENT_EPS: f64 = 1e-9;

/// Super-triangle size as a multiple of the input extent.
const SUPER_SCALE: f64 = 20.0;

/// Counter-clockwise vertex triple.
type Tri = [usize; 3];

fn edges(t: &Tri) -> [[usize; 2]; 3] {
    [[t[0], t[1]], [t[1], t[2]], [t[2], t[0]]]
}

/// Twice the signed area of `(a, b, c)`; positive when counter-clockwise.
fn orient(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

/// Positive when `p` lies strictly inside the circumcircle of the
/// counter-clockwise triangle `(a, b, c)`.
fn in_circle(a: [f64; 2], b: [f64; 2], c: [f64; 2], p: [f64; 2]) -> f64 {
    let (adx, ady) = (a[0] - p[0], a[1] - p[1]);
    let (bdx, bdy) = (b[0] - p[0], b[1] - p[1]);
    let (cdx, cdy) = (c[0] - p[0], c[1] - p[1]);
    let alift = adx * adx + ady * ady;
    let blift = bdx * bdx + bdy * bdy;
    let clift = cdx * cdx + cdy * cdy;
    adx * (bdy * clift - cdy * blift) - ady * (bdx * clift - cdx * blift)
        + alift * (bdx * cdy - cdx * bdy)
}

/// Delaunay triangulation of `points`.
///
/// Returns an empty set for fewer than three usable points or when every
/// point is collinear. Non-finite and coincident points are never referenced.
pub fn triangulate(points: &[[f64; 2]]) -> Vec<[usize; 3]> {
    let finite: Vec<usize> = (0..points.len())
        .filter(|&i| points[i][0].is_finite() && points[i][1].is_finite())
        .collect();
    if finite.len() < 3 {
        return Vec::new();
    }

    let mut min = [f64::INFINITY; 2];
    let mut max = [f64::NEG_INFINITY; 2];
    for &i in &finite {
        for k in 0..2 {
            min[k] = min[k].min(points[i][k]);
            max[k] = max[k].max(points[i][k]);
        }
    }
    let extent = (max[0] - min[0]).max(max[1] - min[1]).max(1.0);
    let mid = [(min[0] + max[0]) * 0.5, (min[1] + max[1]) * 0.5];

    let n = points.len();
    let mut pts: Vec<[f64; 2]> = points.to_vec();
    pts.push([mid[0] - SUPER_SCALE * extent, mid[1] - extent]);
    pts.push([mid[0] + SUPER_SCALE * extent, mid[1] - extent]);
    pts.push([mid[0], mid[1] + SUPER_SCALE * extent]);

    let mut tris: Vec<Tri> = vec![[n, n + 1, n + 2]];
    let mut inserted: Vec<usize> = Vec::with_capacity(finite.len());

    for &i in &finite {
        let p = pts[i];
        if inserted.iter().any(|&j| {
            let (dx, dy) = (pts[j][0] - p[0], pts[j][1] - p[1]);
            dx * dx + dy * dy <= COINCIDENT_EPS * COINCIDENT_EPS
        }) {
            continue;
        }
        inserted.push(i);
        insert_point(&mut tris, &pts, i);
    }

    tris.into_iter()
        .filter(|t| t.iter().all(|&v| v < n))
        .filter(|t| orient(pts[t[0]], pts[t[1]], pts[t[2]]) > 0.0)
        .collect()
}

/// Replace the cavity of `pts[i]` with a fan of triangles around it.
fn insert_point(tris: &mut Vec<Tri>, pts: &[[f64; 2]], i: usize) {
    let p = pts[i];
    let mut owner: HashMap<[usize; 2], usize> = HashMap::with_capacity(tris.len() * 3);
    for (k, t) in tris.iter().enumerate() {
        for e in edges(t) {
            owner.insert(e, k);
        }
    }
    let across = |e: [usize; 2]| owner.get(&[e[1], e[0]]).copied();
    let corners = |t: &Tri| (pts[t[0]], pts[t[1]], pts[t[2]]);

    let mut in_cavity = vec![false; tris.len()];
    let mut stack: Vec<usize> = Vec::new();
    for (k, t) in tris.iter().enumerate() {
        let (a, b, c) = corners(t);
        if orient(a, b, p) >= 0.0 && orient(b, c, p) >= 0.0 && orient(c, a, p) >= 0.0 {
            in_cavity[k] = true;
            stack.push(k);
        }
    }
    while let Some(k) = stack.pop() {
        for e in edges(&tris[k]) {
            let Some(o) = across(e) else { continue };
            if in_cavity[o] {
                continue;
            }
            let (a, b, c) = corners(&tris[o]);
            if in_circle(a, b, c, p) > 0.0 {
                in_cavity[o] = true;
                stack.push(o);
            }
        }
    }

    // grow until every cavity edge has p strictly on its left
    loop {
        let mut grown = false;
        for k in 0..tris.len() {
            if !in_cavity[k] {
                continue;
            }
            for e in edges(&tris[k]) {
                if let Some(o) = across(e) {
                    if !in_cavity[o] && orient(pts[e[0]], pts[e[1]], p) <= 0.0 {
                        in_cavity[o] = true;
                        grown = true;
                    }
                }
            }
        }
        if !grown {
            break;
        }
    }

    let mut boundary: Vec<[usize; 2]> = Vec::new();
    for (k, t) in tris.iter().enumerate() {
        if !in_cavity[k] {
            continue;
        }
        for e in edges(t) {
            if across(e).map_or(true, |o| !in_cavity[o]) {
                boundary.push(e);
            }
        }
    }

    let mut kept: Vec<Tri> = tris
        .iter()
        .zip(&in_cavity)
        .filter_map(|(t, &cut)| (!cut).then_some(*t))
        .collect();
    kept.extend(boundary.into_iter().map(|e| [e[0], e[1], i]));
    *tris = kept;
}
