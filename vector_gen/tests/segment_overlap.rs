mod common;

use common::*;
use vector_gen::features::volume;
use vector_gen::loader::load_lines;
use vector_gen::segment::split_segments;

/// Neighbouring segments share their boundary bar, so per-segment sums over a
/// day count that bar twice. This is the documented behaviour of segmentation,
/// kept so segment files stay self-contained.
#[test]
fn boundary_bar_is_double_counted_across_segments() {
    let bars = load_lines([
        bar_line("2026-02-22 09:30:00", 100.0, 1, 100.0),
        bar_line("2026-02-22 09:35:00", 101.0, 0, 100.5),
        bar_line("2026-02-22 09:40:00", 102.0, -1, 101.0),
        bar_line("2026-02-22 09:45:00", 101.0, 0, 100.5),
        bar_line("2026-02-22 09:50:00", 100.0, 1, 100.0),
    ]);
    let segs = split_segments(&bars);
    assert_eq!(segs.len(), 3);
    assert_eq!((segs[0].start(), segs[0].end()), (0, 2));
    assert_eq!((segs[1].start(), segs[1].end()), (2, 4));
    assert_eq!((segs[2].start(), segs[2].end()), (4, 4));

    let day = volume::compute(&bars).dollar_vol_sum;
    let summed: f64 = segs.iter().map(|s| volume::compute(s.bars()).dollar_vol_sum).sum();
    // bars 2 and 4 are each counted twice
    let doubled = 1000.0 * (102.0 + 100.0);
    assert!((summed - (day + doubled)).abs() < 1e-6);
}
