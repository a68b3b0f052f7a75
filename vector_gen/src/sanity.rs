//! Structural checks on emitted segments. Violations are reported, never fatal,
//! and never change what gets written.

use std::fmt;

use tracing::warn;

use crate::models::bar::Direction;
use crate::segment::Segment;

/// One failed check.
#[derive(Debug, Clone, PartialEq)]
pub enum SanityViolation {
    /// Opening and closing edges point the same way.
    SameDirection { start: Direction, end: Direction },
    /// The anchor price moved against the opening direction.
    AnchorAgainstDirection {
        direction: Direction,
        start: f64,
        end: f64,
    },
}

impl fmt::Display for SanityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SanityViolation::SameDirection { start, end } => write!(
                f,
                "revDir start ({}) should be opposite of end ({})",
                start.as_i8(),
                end.as_i8()
            ),
            SanityViolation::AnchorAgainstDirection {
                direction: Direction::Up,
                start,
                end,
            } => write!(
                f,
                "up vector (revDir=1) but REV_avwap start ({start}) >= end ({end})"
            ),
            SanityViolation::AnchorAgainstDirection {
                direction: Direction::Down,
                start,
                end,
            } => write!(
                f,
                "down vector (revDir=-1) but REV_avwap start ({start}) <= end ({end})"
            ),
        }
    }
}

/// Runs both boundary checks. Segments shorter than two bars are not checked.
pub fn check_segment(seg: &Segment<'_>) -> Vec<SanityViolation> {
    let mut out = Vec::new();
    if seg.len() < 2 {
        return out;
    }
    let (first, last) = (seg.first(), seg.last());
    let start_dir = first.rev_dir();

    if let (Some(start), Some(end)) = (start_dir, last.rev_dir()) {
        if start == end {
            out.push(SanityViolation::SameDirection { start, end });
        }
    }

    if let (Some(direction), Some(start), Some(end)) =
        (start_dir, first.anchor_price(), last.anchor_price())
    {
        let against = match direction {
            Direction::Up => start >= end,
            Direction::Down => start <= end,
        };
        if against {
            out.push(SanityViolation::AnchorAgainstDirection {
                direction,
                start,
                end,
            });
        }
    }
    out
}

/// [`check_segment`] plus a `warn!` per violation, tagged with `label`.
pub fn log_segment_violations(seg: &Segment<'_>, label: &str) -> usize {
    let violations = check_segment(seg);
    for v in &violations {
        warn!(segment = label, "[sanity] {v}");
    }
    violations.len()
}
