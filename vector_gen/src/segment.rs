//! Segmentation of a sorted bar list into reversal vectors.
//!
//! A segment opens on an edge bar and closes on the next edge of the opposite
//! direction, or on the last bar when no such edge follows. Neighbouring
//! segments share their boundary bar: the closing edge of one segment opens the
//! next. Same-direction edges inside a segment do not open segments of their own.

use crate::models::Bar;
use crate::models::bar::Direction;

/// A contiguous, inclusive `[start, end]` window over a bar list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment<'a> {
    bars: &'a [Bar],
    start: usize,
    end: usize,
}

impl<'a> Segment<'a> {
    fn new(all: &'a [Bar], start: usize, end: usize) -> Self {
        Self {
            bars: &all[start..=end],
            start,
            end,
        }
    }

    pub fn bars(&self) -> &'a [Bar] {
        self.bars
    }

    /// Index of the opening bar in the source list.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Index of the closing bar in the source list (inclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> &'a Bar {
        &self.bars[0]
    }

    pub fn last(&self) -> &'a Bar {
        &self.bars[self.bars.len() - 1]
    }

    /// Direction of the opening edge; `None` for the single edgeless segment
    /// and for edges whose `revDir` is outside `±1`.
    pub fn direction(&self) -> Option<Direction> {
        self.first().rev_dir()
    }

    /// `{parent}_{startHHMM}_{endHHMM}`, the segment file stem.
    pub fn label(&self, parent: &str) -> String {
        format!("{parent}_{}_{}", self.first().hhmm(), self.last().hhmm())
    }
}

/// Positions of all reversal edges.
pub fn edge_indices(bars: &[Bar]) -> Vec<usize> {
    bars.iter()
        .enumerate()
        .filter(|(_, b)| b.is_edge())
        .map(|(i, _)| i)
        .collect()
}

/// Splits `bars` (already in canonical order) into segments.
///
/// No bars gives no segments; bars without any edge form one segment.
pub fn split_segments(bars: &[Bar]) -> Vec<Segment<'_>> {
    if bars.is_empty() {
        return Vec::new();
    }
    let edges = edge_indices(bars);
    if edges.is_empty() {
        return vec![Segment::new(bars, 0, bars.len() - 1)];
    }
    segments_from_edges(bars, &edges)
}

/// Walks an explicit edge list. `edges` must be ascending indices into `bars`.
pub fn segments_from_edges<'a>(bars: &'a [Bar], edges: &[usize]) -> Vec<Segment<'a>> {
    let mut out = Vec::new();
    if bars.is_empty() {
        return out;
    }
    let last = bars.len() - 1;
    let mut k = 0;
    while k < edges.len() {
        let start = edges[k];
        let start_dir = bars[start].rev_dir();
        let closing = edges[k + 1..]
            .iter()
            .position(|&j| bars[j].rev_dir() != start_dir)
            .map(|p| k + 1 + p);
        let end = closing.map_or(last, |c| edges[c]);
        out.push(Segment::new(bars, start, end));

        match closing {
            Some(c) if end != start => k = c,
            Some(_) => k += 1,
            // ran to the last bar: trailing same-direction edges open nothing
            None => break,
        }
    }
    out
}
