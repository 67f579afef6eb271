//! The marching-squares lookup table and segment stitching.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Grid;
use crate::Point;

/// An edge of a lattice cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    /// Between the top-left and top-right vertices.
    Top,
    /// Between the top-right and bottom-right vertices.
    Right,
    /// Between the bottom-left and bottom-right vertices.
    Bottom,
    /// Between the top-left and bottom-left vertices.
    Left,
}

/// A straight piece of a level set inside one cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// One end.
    pub start: Point,
    /// The other end.
    pub end: Point,
}

/// A polyline of stitched segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    /// The vertices in order. A closed chain does not repeat its first vertex.
    pub points: Vec<Point>,
    /// Whether the last vertex joins back to the first.
    pub closed: bool,
}

/// Returns the 4-bit configuration of a cell: top-left is 8, top-right is 4,
/// bottom-right is 2 and bottom-left is 1. A bit is set when the corner value
/// is at least `threshold`.
#[must_use]
pub fn cell_config(tl: f64, tr: f64, br: f64, bl: f64, threshold: f64) -> u8 {
    [(tl, 8), (tr, 4), (br, 2), (bl, 1)]
        .into_iter()
        .filter(|&(v, _)| v >= threshold)
        .fold(0, |config, (_, bit)| config | bit)
}

/// The segments drawn for each cell configuration.
///
/// The saddles 5 and 10 are not disambiguated by the cell center.
const TABLE: [&[(Edge, Edge)]; 16] = {
    use Edge::{Bottom as C, Left as D, Right as B, Top as A};
    [
        &[],
        &[(C, D)],
        &[(B, C)],
        &[(B, D)],
        &[(A, B)],
        &[(A, D), (B, C)],
        &[(A, C)],
        &[(A, D)],
        &[(A, D)],
        &[(A, C)],
        &[(A, B), (C, D)],
        &[(A, B)],
        &[(B, D)],
        &[(B, C)],
        &[(C, D)],
        &[],
    ]
};

/// Where the level set crosses an edge of cell `(i, j)`.
///
/// Interpolation always runs from the top or left vertex of the edge, so the
/// two cells sharing an edge compute the same point bit for bit.
fn crossing(grid: &Grid, i: usize, j: usize, edge: Edge, threshold: f64) -> Point {
    let ((i0, j0), (i1, j1)) = match edge {
        Edge::Top => ((i, j), (i + 1, j)),
        Edge::Right => ((i + 1, j), (i + 1, j + 1)),
        Edge::Bottom => ((i, j + 1), (i + 1, j + 1)),
        Edge::Left => ((i, j), (i, j + 1)),
    };
    let (v0, v1) = (grid.value(i0, j0), grid.value(i1, j1));
    let t = if (v1 - v0).abs() > f64::EPSILON {
        ((threshold - v0) / (v1 - v0)).clamp(0.0, 1.0)
    } else {
        0.5
    };
    grid.vertex(i0, j0).lerp(&grid.vertex(i1, j1), t)
}

/// Extracts the segments of the level set `value == threshold`, cell by cell
/// in row order.
#[must_use]
pub fn contour(grid: &Grid, threshold: f64) -> Vec<Segment> {
    let mut segments = Vec::new();
    for j in 0..grid.ny() {
        for i in 0..grid.nx() {
            let config = cell_config(
                grid.value(i, j),
                grid.value(i + 1, j),
                grid.value(i + 1, j + 1),
                grid.value(i, j + 1),
                threshold,
            );
            segments.extend(TABLE[usize::from(config)].iter().map(|&(from, to)| Segment {
                start: crossing(grid, i, j, from, threshold),
                end: crossing(grid, i, j, to, threshold),
            }));
        }
    }
    ftlog::trace!("Extracted {} segments at level {threshold}", segments.len());
    segments
}

/// The exact bit pattern of a point, for matching shared endpoints.
fn key(p: &Point) -> (u64, u64) {
    (p.x.to_bits(), p.y.to_bits())
}

/// Stitches segments that share endpoints into polylines.
///
/// Endpoints are matched exactly, which works because neighboring cells
/// compute their shared crossings identically.
#[must_use]
pub fn chains(segments: &[Segment]) -> Vec<Chain> {
    let mut by_end: HashMap<(u64, u64), Vec<usize>> = HashMap::new();
    for (s, seg) in segments.iter().enumerate() {
        by_end.entry(key(&seg.start)).or_default().push(s);
        by_end.entry(key(&seg.end)).or_default().push(s);
    }

    let mut used = vec![false; segments.len()];

    // Follows unused segments from `tip`, returning the points walked past it.
    let walk = |tip: Point, used: &mut [bool]| {
        let mut path = Vec::new();
        let mut tip = tip;
        while let Some(&s) = by_end
            .get(&key(&tip))
            .and_then(|ends| ends.iter().find(|&&s| !used[s]))
        {
            used[s] = true;
            let seg = &segments[s];
            tip = if key(&seg.start) == key(&tip) { seg.end } else { seg.start };
            path.push(tip);
        }
        path
    };

    let mut result = Vec::new();
    for s in 0..segments.len() {
        if used[s] {
            continue;
        }
        used[s] = true;
        let Segment { start, end } = segments[s];

        let forward = walk(end, &mut used);
        let backward = walk(start, &mut used);

        let mut points: Vec<Point> = backward.into_iter().rev().collect();
        points.push(start);
        points.push(end);
        points.extend(forward);

        let closed = points.len() > 2 && points.first().map(key) == points.last().map(key);
        if closed {
            points.pop();
        }
        result.push(Chain { points, closed });
    }

    result
}
