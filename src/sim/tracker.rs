//! Cut sequence tracking
//!
//! Records the tiles the player slides over, from the walkable tile the slide
//! left to the walkable tile it reaches, and hands the finished cut to
//! [`capture`](super::capture).

use glam::IVec2;

use super::capture::{self, Capture};
use super::grid::Grid;

#[derive(Debug, Clone, Default)]
pub struct CutTracker {
    sequence: Vec<IVec2>,
    tracking: bool,
}

impl CutTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cut is in progress
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Tiles of the cut in progress (empty when idle)
    pub fn sequence(&self) -> &[IVec2] {
        &self.sequence
    }

    /// Direction changes in the cut so far
    pub fn turn_count(&self) -> usize {
        capture::corner_points(&self.sequence)
            .map(|corners| corners.len().saturating_sub(2))
            .unwrap_or(0)
    }

    /// Start a new cut: the walkable tile left behind and the first slippery one
    ///
    /// Any unfinished cut is discarded.
    pub fn begin_tracking(&mut self, start: IVec2, first: IVec2) {
        if self.tracking {
            log::debug!("Restarting cut, dropping {} tiles", self.sequence.len());
        }
        self.sequence.clear();
        self.sequence.push(start);
        self.sequence.push(first);
        self.tracking = true;
    }

    /// Append the next slippery tile
    pub fn add(&mut self, coords: IVec2) {
        if !self.tracking {
            log::debug!("Ignoring tile {} with no cut in progress", coords);
            return;
        }
        self.sequence.push(coords);
    }

    /// Close the cut on a walkable tile and capture the minority side
    ///
    /// Returns the capture when at least one tile changed hands. Without a cut
    /// in progress this is a no-op.
    pub fn end_tracking(&mut self, grid: &mut Grid, end: IVec2) -> Option<Capture> {
        if !self.tracking {
            log::warn!("end_tracking at {} with no cut in progress", end);
            return None;
        }
        self.sequence.push(end);
        self.tracking = false;
        let sequence = std::mem::take(&mut self.sequence);

        match capture::resolve(grid, &sequence) {
            Ok(capture) => {
                capture::apply(grid, &capture);
                clear_capturing(grid, &sequence);
                (!capture.is_empty()).then_some(capture)
            }
            Err(err) => {
                log::error!("Discarding invalid cut of {} tiles: {}", sequence.len(), err);
                clear_capturing(grid, &sequence);
                debug_assert!(false, "invalid cut: {err}");
                None
            }
        }
    }

    /// Whether a slippery tile belongs to the unresolved cut
    pub fn tile_is_in_sequence(&self, grid: &Grid, coords: IVec2) -> bool {
        self.tracking
            && grid.get(coords).is_some_and(|t| t.is_slippery())
            && self.sequence.contains(&coords)
    }

    /// Abort the cut in progress (safe to call at any time)
    pub fn cancel(&mut self, grid: &mut Grid) {
        if self.tracking {
            log::debug!("Cancelled cut of {} tiles", self.sequence.len());
        }
        clear_capturing(grid, &self.sequence);
        self.sequence.clear();
        self.tracking = false;
    }
}

fn clear_capturing(grid: &mut Grid, sequence: &[IVec2]) {
    for &coords in sequence {
        if let Some(tile) = grid.get_mut(coords) {
            tile.capturing = false;
        }
    }
}
