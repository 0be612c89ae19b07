//! Territory capture resolution
//!
//! Given a finished cut (walkable start, slippery tiles, walkable end) decide
//! which slippery tiles become walkable. Only the minority side is captured.
//!
//! - Straight cuts bisect the grid along the cut's row or column. Tiles on the
//!   line count for both sides.
//! - Cuts that turn are closed into two polygons around the play field
//!   perimeter and tile centers are tested for containment. Tiles on a
//!   polygon edge count for both sides.
//!
//! Ties go to side B (the `<= line` side, or the clockwise closure).
//!
//! [`resolve`] never touches the grid; [`apply`] performs the mutation.

use glam::{IVec2, Vec2};

use super::grid::Grid;
use super::polygon::{self, BoundaryRect, Winding};
use super::tile::TileType;
use crate::error::CaptureError;

/// Axis of a straight cut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Start and end share a row
    Horizontal,
    /// Start and end share a column
    Vertical,
}

impl Orientation {
    /// Classify a straight cut from its end points
    pub fn between(start: IVec2, end: IVec2) -> Option<Self> {
        match (start.y == end.y, start.x == end.x) {
            (true, false) => Some(Orientation::Horizontal),
            (false, true) => Some(Orientation::Vertical),
            _ => None,
        }
    }

    /// The coordinate held fixed along the cut
    #[inline]
    fn fixed(self, coords: IVec2) -> i32 {
        match self {
            Orientation::Horizontal => coords.y,
            Orientation::Vertical => coords.x,
        }
    }
}

/// Which candidate region was captured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// `>= line`, or the counter-clockwise closure
    A,
    /// `<= line`, or the clockwise closure
    B,
}

/// How the captured region was found
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureMethod {
    Bisection {
        orientation: Orientation,
        line: i32,
    },
    Polygon {
        /// Start, every turn, end
        corners: Vec<IVec2>,
        /// Winding of the captured polygon
        winding: Winding,
    },
}

/// Result of resolving a cut
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    pub method: CaptureMethod,
    pub side: Side,
    /// Slippery tiles to convert, row-major
    pub tiles: Vec<IVec2>,
    /// Slippery tiles left after the capture
    pub remaining: usize,
}

impl Capture {
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }
}

/// Pick side A only when strictly smaller
#[inline]
fn minority(a: usize, b: usize) -> Side {
    if a < b { Side::A } else { Side::B }
}

/// Reduce a tile path to its corner points
///
/// Every step must stay on a row or a column; repeated tiles are skipped.
pub fn corner_points(sequence: &[IVec2]) -> Result<Vec<IVec2>, CaptureError> {
    let Some(&first) = sequence.first() else {
        return Err(CaptureError::TooShort { len: 0 });
    };
    let mut corners = vec![first];
    let mut heading: Option<IVec2> = None;

    for pair in sequence.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let step = b - a;
        if step == IVec2::ZERO {
            continue;
        }
        if step.x != 0 && step.y != 0 {
            return Err(CaptureError::Diagonal { from: a, to: b });
        }
        let dir = step.signum();
        if heading.is_some_and(|h| h != dir) {
            corners.push(a);
        }
        heading = Some(dir);
    }

    match (heading, sequence.last()) {
        (Some(_), Some(&last)) => {
            corners.push(last);
            Ok(corners)
        }
        _ => Err(CaptureError::ZeroLength(first)),
    }
}

/// Work out the captured set for a finished cut without mutating the grid
pub fn resolve(grid: &Grid, sequence: &[IVec2]) -> Result<Capture, CaptureError> {
    if sequence.len() < 2 {
        return Err(CaptureError::TooShort {
            len: sequence.len(),
        });
    }
    if let Some(&outside) = sequence.iter().find(|&&c| !grid.in_bounds(c)) {
        return Err(CaptureError::OutOfBounds(outside));
    }

    let corners = corner_points(sequence)?;
    if corners.len() == 2 {
        let (start, end) = (corners[0], corners[1]);
        let orientation =
            Orientation::between(start, end).ok_or(CaptureError::Diagonal { from: start, to: end })?;
        Ok(bisect(grid, orientation, orientation.fixed(start)))
    } else {
        Ok(enclose(grid, sequence, corners))
    }
}

/// Straight cut: split all slippery tiles along the cut line
fn bisect(grid: &Grid, orientation: Orientation, line: i32) -> Capture {
    let slippery = grid.by_type(TileType::Slippery);
    let total = slippery.len();

    let side_a: Vec<IVec2> = slippery
        .iter()
        .map(|t| t.coords())
        .filter(|&c| orientation.fixed(c) >= line)
        .collect();
    let side_b: Vec<IVec2> = slippery
        .iter()
        .map(|t| t.coords())
        .filter(|&c| orientation.fixed(c) <= line)
        .collect();

    let side = minority(side_a.len(), side_b.len());
    let tiles = match side {
        Side::A => side_a,
        Side::B => side_b,
    };
    log::debug!(
        "Bisection {:?} at {}: side {:?} captures {} of {} slippery",
        orientation,
        line,
        side,
        tiles.len(),
        total
    );
    Capture {
        method: CaptureMethod::Bisection { orientation, line },
        side,
        remaining: total - tiles.len(),
        tiles,
    }
}

/// Turning cut: close into two polygons along the play field and test tiles
fn enclose(grid: &Grid, sequence: &[IVec2], corners: Vec<IVec2>) -> Capture {
    let rect = BoundaryRect::new(
        Vec2::ZERO,
        IVec2::new(grid.columns() - 1, grid.rows() - 1).as_vec2(),
    );
    let path: Vec<Vec2> = corners.iter().map(|c| c.as_vec2()).collect();
    let poly_a = rect.close_path(&path, true);
    let poly_b = rect.close_path(&path, false);
    let winding_a = polygon::winding(&poly_a);
    let winding_b = polygon::winding(&poly_b);

    // A zero-area closure encloses nothing, not even the cut tiles
    let in_side = |poly: &[Vec2], winding: Winding, coords: IVec2| {
        winding != Winding::Degenerate
            && (sequence.contains(&coords) || polygon::covers(poly, coords.as_vec2()))
    };

    let slippery = grid.by_type(TileType::Slippery);
    let total = slippery.len();
    let side_a: Vec<IVec2> = slippery
        .iter()
        .map(|t| t.coords())
        .filter(|&c| in_side(&poly_a, winding_a, c))
        .collect();
    let side_b: Vec<IVec2> = slippery
        .iter()
        .map(|t| t.coords())
        .filter(|&c| in_side(&poly_b, winding_b, c))
        .collect();

    let side = minority(side_a.len(), side_b.len());
    let (tiles, winding) = match side {
        Side::A => (side_a, winding_a),
        Side::B => (side_b, winding_b),
    };
    log::debug!(
        "Polygon cut with {} corners: side {:?} ({:?}) captures {} of {} slippery",
        corners.len(),
        side,
        winding,
        tiles.len(),
        total
    );
    Capture {
        method: CaptureMethod::Polygon { corners, winding },
        side,
        remaining: total - tiles.len(),
        tiles,
    }
}

/// Flip every captured tile to walkable; returns how many changed
pub fn apply(grid: &mut Grid, capture: &Capture) -> usize {
    let mut flipped = 0;
    for &coords in &capture.tiles {
        if let Some(tile) = grid.get_mut(coords) {
            if tile.is_slippery() {
                tile.mark_captured();
                flipped += 1;
            }
        }
    }
    log::info!(
        "Captured {} tiles ({} slippery left)",
        flipped,
        grid.count(TileType::Slippery)
    );
    flipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn row_cut(columns: i32, row: i32) -> Vec<IVec2> {
        (0..columns).map(|col| IVec2::new(col, row)).collect()
    }

    fn column_cut(rows: i32, col: i32) -> Vec<IVec2> {
        (0..rows).map(|row| IVec2::new(col, row)).collect()
    }

    #[test]
    fn test_orientation() {
        assert_eq!(
            Orientation::between(IVec2::new(0, 5), IVec2::new(17, 5)),
            Some(Orientation::Horizontal)
        );
        assert_eq!(
            Orientation::between(IVec2::new(4, 0), IVec2::new(4, 10)),
            Some(Orientation::Vertical)
        );
        assert_eq!(Orientation::between(IVec2::new(0, 0), IVec2::new(3, 3)), None);
        assert_eq!(Orientation::between(IVec2::new(2, 2), IVec2::new(2, 2)), None);
    }

    #[test]
    fn test_corner_points() {
        let seq = [
            IVec2::new(0, 3),
            IVec2::new(1, 3),
            IVec2::new(2, 3),
            IVec2::new(2, 2),
            IVec2::new(2, 1),
            IVec2::new(2, 0),
        ];
        assert_eq!(
            corner_points(&seq).unwrap(),
            vec![IVec2::new(0, 3), IVec2::new(2, 3), IVec2::new(2, 0)]
        );

        let straight = row_cut(6, 2);
        assert_eq!(corner_points(&straight).unwrap().len(), 2);
    }

    #[test]
    fn test_row_cut_symmetric_tie_goes_to_side_b() {
        // Row 5 splits the 9 interior rows 4 / 4; on-line row counts for both
        let grid = Grid::build(18, 11);
        let capture = resolve(&grid, &row_cut(18, 5)).unwrap();
        assert_eq!(capture.side, Side::B);
        assert_eq!(capture.len(), 5 * 16);
        assert_eq!(capture.remaining, 4 * 16);
        assert!(capture.tiles.iter().all(|c| c.y <= 5));
    }

    #[test]
    fn test_row_cut_takes_smaller_side() {
        let grid = Grid::build(18, 11);
        let capture = resolve(&grid, &row_cut(18, 3)).unwrap();
        // rows 1..=3 vs rows 3..=9
        assert_eq!(capture.side, Side::B);
        assert_eq!(capture.len(), 3 * 16);
        assert_eq!(
            capture.method,
            CaptureMethod::Bisection {
                orientation: Orientation::Horizontal,
                line: 3
            }
        );

        let capture = resolve(&grid, &row_cut(18, 8)).unwrap();
        assert_eq!(capture.side, Side::A);
        assert_eq!(capture.len(), 2 * 16);
        assert!(capture.tiles.iter().all(|c| c.y >= 8));
    }

    #[test]
    fn test_column_cut() {
        let grid = Grid::build(18, 11);
        let capture = resolve(&grid, &column_cut(11, 3)).unwrap();
        // columns 1..=3 vs 3..=16
        assert_eq!(capture.len(), 3 * 9);
        assert!(capture.tiles.iter().all(|c| c.x <= 3));
    }

    #[test]
    fn test_apply_flips_only_minority() {
        let mut grid = Grid::build(18, 11);
        let capture = resolve(&grid, &row_cut(18, 3)).unwrap();
        let flipped = apply(&mut grid, &capture);
        assert_eq!(flipped, 48);
        for tile in grid.tiles() {
            let c = tile.coords();
            let interior = c.x > 0 && c.x < 17 && c.y > 0 && c.y < 10;
            if interior {
                assert_eq!(tile.is_walkable(), c.y <= 3, "tile {c}");
            }
        }
    }

    #[test]
    fn test_bisection_ignores_already_captured() {
        let mut grid = Grid::build(18, 11);
        let first = resolve(&grid, &row_cut(18, 3)).unwrap();
        apply(&mut grid, &first);

        // Column cut now only sees rows 4..=9
        let capture = resolve(&grid, &column_cut(11, 2)).unwrap();
        assert_eq!(capture.len(), 2 * 6);
        assert!(capture.tiles.iter().all(|c| c.y >= 4 && c.x <= 2));
    }

    #[test]
    fn test_l_cut_captures_small_corner() {
        let grid = Grid::build(18, 11);
        // From the left wall at row 6 across to column 4, then down to the floor
        let mut seq: Vec<IVec2> = (0..=4).map(|col| IVec2::new(col, 6)).collect();
        seq.extend((0..6).rev().map(|row| IVec2::new(4, row)));

        let capture = resolve(&grid, &seq).unwrap();
        assert!(matches!(capture.method, CaptureMethod::Polygon { .. }));
        // Columns 1..=4 x rows 1..=6
        assert_eq!(capture.len(), 4 * 6);
        assert!(capture.tiles.iter().all(|c| c.x <= 4 && c.y <= 6));
        assert_eq!(capture.remaining, 16 * 9 - 24);
    }

    #[test]
    fn test_u_cut_from_floor() {
        let grid = Grid::build(18, 11);
        // Up column 3 to row 4, across to column 6, back down to the floor
        let mut seq: Vec<IVec2> = (0..=4).map(|row| IVec2::new(3, row)).collect();
        seq.extend((4..=6).map(|col| IVec2::new(col, 4)));
        seq.extend((0..4).rev().map(|row| IVec2::new(6, row)));

        let capture = resolve(&grid, &seq).unwrap();
        // Columns 3..=6 x rows 1..=4, cut tiles included
        assert_eq!(capture.len(), 4 * 4);
        assert!(capture.tiles.iter().all(|c| (3..=6).contains(&c.x) && c.y <= 4));
    }

    /// Left wall at `row` across to `col`, then down to the floor
    fn l_cut(col: i32, row: i32) -> Vec<IVec2> {
        let mut seq: Vec<IVec2> = (0..=col).map(|c| IVec2::new(c, row)).collect();
        seq.extend((0..row).rev().map(|r| IVec2::new(col, r)));
        seq
    }

    #[test]
    fn test_turning_cut_tie_goes_to_side_b() {
        // 5x5 interior: the corner block and the rest both hold 16 tiles
        let grid = Grid::build(7, 7);
        let capture = resolve(&grid, &l_cut(4, 4)).unwrap();
        assert!(matches!(capture.method, CaptureMethod::Polygon { .. }));
        assert_eq!(capture.side, Side::B);
        assert_eq!(capture.len(), 16);
        assert_eq!(capture.remaining, 9);
    }

    #[test]
    fn test_degenerate_turning_cut_captures_nothing() {
        let grid = Grid::build(18, 11);
        // Out to (5, 1) and straight back: no enclosed area
        let seq = [
            IVec2::new(2, 0),
            IVec2::new(3, 0),
            IVec2::new(4, 0),
            IVec2::new(5, 0),
            IVec2::new(5, 1),
            IVec2::new(5, 0),
        ];
        let capture = resolve(&grid, &seq).unwrap();
        assert!(matches!(
            capture.method,
            CaptureMethod::Polygon { winding: Winding::Degenerate, .. }
        ));
        assert_eq!(capture.side, Side::B);
        assert!(capture.is_empty());
        assert_eq!(capture.remaining, 16 * 9);

        let mut grid = grid;
        assert_eq!(apply(&mut grid, &capture), 0);
    }

    #[test]
    fn test_diagonal_rejected() {
        let grid = Grid::build(18, 11);
        let seq = [IVec2::new(0, 0), IVec2::new(1, 1), IVec2::new(2, 2)];
        assert_eq!(
            resolve(&grid, &seq),
            Err(CaptureError::Diagonal {
                from: IVec2::new(0, 0),
                to: IVec2::new(1, 1)
            })
        );

        let seq = [IVec2::new(0, 2), IVec2::new(5, 0)];
        assert!(matches!(resolve(&grid, &seq), Err(CaptureError::Diagonal { .. })));
    }

    #[test]
    fn test_too_short_and_out_of_bounds() {
        let grid = Grid::build(18, 11);
        assert_eq!(
            resolve(&grid, &[IVec2::new(0, 3)]),
            Err(CaptureError::TooShort { len: 1 })
        );
        assert_eq!(
            resolve(&grid, &[IVec2::new(0, 3), IVec2::new(20, 3)]),
            Err(CaptureError::OutOfBounds(IVec2::new(20, 3)))
        );
        assert_eq!(
            resolve(&grid, &[IVec2::new(0, 3), IVec2::new(0, 3)]),
            Err(CaptureError::ZeroLength(IVec2::new(0, 3)))
        );
    }

    proptest! {
        #[test]
        fn prop_row_cut_flips_min_side(row in 1i32..10) {
            let mut grid = Grid::build(18, 11);
            let above = grid.by_type(TileType::Slippery).iter().filter(|t| t.coords().y >= row).count();
            let below = grid.by_type(TileType::Slippery).iter().filter(|t| t.coords().y <= row).count();

            let capture = resolve(&grid, &row_cut(18, row)).unwrap();
            let flipped = apply(&mut grid, &capture);
            prop_assert_eq!(flipped, above.min(below));

            let small_side_above = above < below;
            for tile in grid.tiles() {
                let c = tile.coords();
                if tile.original_type() == TileType::Slippery {
                    let on_small_side = if small_side_above { c.y >= row } else { c.y <= row };
                    prop_assert_eq!(tile.is_walkable(), on_small_side);
                }
            }
        }

        #[test]
        fn prop_l_cut_captures_min_side(col in 1i32..=16, row in 1i32..=9) {
            let grid = Grid::build(18, 11);
            let capture = resolve(&grid, &l_cut(col, row)).unwrap();
            prop_assert!(matches!(capture.method, CaptureMethod::Polygon { .. }), "expected polygon capture");

            // Corner block vs the rest; the cut tiles count for both
            let corner = col * row;
            let rest = 16 * 9 - corner + col + row - 1;
            prop_assert_eq!(capture.len(), corner.min(rest) as usize);
            prop_assert_eq!(capture.remaining, 16 * 9 - capture.len());
            if corner < rest {
                prop_assert!(capture.tiles.iter().all(|c| c.x <= col && c.y <= row));
            } else if rest < corner {
                prop_assert!(capture.tiles.iter().all(|c| c.x >= col || c.y >= row));
            } else {
                prop_assert_eq!(capture.side, Side::B);
            }
        }
    }
}
