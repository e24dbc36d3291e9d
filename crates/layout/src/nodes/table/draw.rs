//! Turns a resolved border ledger into stroked segments.

use super::ledger::BorderLedger;
use tabula_style::Border;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderSegment {
    pub border: Border,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

/// Computes every border segment of a fragment whose grid starts at `(start_x, start_y)`,
/// the top-left corner in page space.
///
/// Consecutive slots with an identical border are merged into one segment. Interior
/// lines are emitted first and the boundary lines last, so the outer frame is stroked
/// over the joins.
pub fn border_segments(
    ledger: &BorderLedger,
    heights: &[f32],
    widths: &[f32],
    start_x: f32,
    start_y: f32,
) -> Vec<BorderSegment> {
    let mut segments = Vec::new();
    if widths.is_empty() || ledger.horizontal_lines() == 0 {
        return segments;
    }
    let last_line = ledger.horizontal_lines() - 1;

    let mut y = start_y - heights.first().copied().unwrap_or(0.0);
    for line in 1..last_line {
        horizontal_line(ledger, line, widths, start_x, y, &mut segments);
        if let Some(h) = heights.get(line) {
            y -= h;
        }
    }

    let mut x = start_x + widths[0];
    for line in 1..ledger.vertical_lines() {
        vertical_line(ledger, line, heights, start_y, x, &mut segments);
        if let Some(w) = widths.get(line) {
            x += w;
        }
    }

    vertical_line(ledger, 0, heights, start_y, start_x, &mut segments);
    horizontal_line(ledger, 0, widths, start_x, start_y, &mut segments);
    let bottom = start_y - heights.iter().sum::<f32>();
    horizontal_line(ledger, last_line, widths, start_x, bottom, &mut segments);
    segments
}

fn push(out: &mut Vec<BorderSegment>, border: Border, x1: f32, y1: f32, x2: f32, y2: f32) {
    out.push(BorderSegment {
        border,
        x1,
        y1,
        x2,
        y2,
    });
}

fn horizontal_line(
    ledger: &BorderLedger,
    line: usize,
    widths: &[f32],
    start_x: f32,
    y: f32,
    out: &mut Vec<BorderSegment>,
) {
    let borders = ledger.horizontal(line);
    if borders.is_empty() {
        return;
    }
    let last_line = ledger.horizontal_lines() - 1;
    let first_vertical = ledger.vertical(0);
    let last_vertical = ledger.vertical(ledger.vertical_lines().saturating_sub(1));
    let has_frame = !first_vertical.is_empty() && !last_vertical.is_empty();

    let mut x1 = start_x;
    let mut x2 = x1 + widths[0];
    // The outer lines start under the left frame line.
    let left_corner = if line == 0 {
        first_vertical.first()
    } else if line == last_line {
        first_vertical.last()
    } else {
        None
    };
    if let (true, Some(Some(corner))) = (has_frame, left_corner) {
        x1 -= corner.width / 2.0;
    }

    let mut j = 1;
    while j < borders.len() {
        let current = borders[j];
        match borders[j - 1] {
            Some(previous) => {
                if Some(previous) != current {
                    push(out, previous, x1, y, x2, y);
                    x1 = x2;
                }
            }
            None => {
                x1 += widths[j - 1];
                x2 = x1;
            }
        }
        if current.is_some() {
            x2 += widths.get(j).copied().unwrap_or(0.0);
        }
        j += 1;
    }

    if let Some(last) = borders[j - 1] {
        let right = ledger.vertical(j);
        let right_corner = if line == 0 {
            right.first()
        } else if line == last_line {
            right.get(line - 1)
        } else {
            None
        };
        if let Some(Some(corner)) = right_corner {
            x2 += corner.width / 2.0;
        }
        push(out, last, x1, y, x2, y);
    }
}

fn vertical_line(
    ledger: &BorderLedger,
    line: usize,
    heights: &[f32],
    start_y: f32,
    x: f32,
    out: &mut Vec<BorderSegment>,
) {
    let borders = ledger.vertical(line);
    if borders.is_empty() {
        return;
    }
    let height = |row: usize| heights.get(row).copied().unwrap_or(0.0);

    let mut y1 = start_y;
    let mut y2 = y1 - height(0);
    let mut j = 1;
    while j < borders.len() {
        let current = borders[j];
        match borders[j - 1] {
            Some(previous) => {
                if Some(previous) != current {
                    push(out, previous, x, y1, x, y2);
                    y1 = y2;
                }
            }
            None => {
                y1 -= height(j - 1);
                y2 = y1;
            }
        }
        if current.is_some() {
            y2 -= height(j);
        }
        j += 1;
    }
    if let Some(last) = borders[j - 1] {
        push(out, last, x, y1, x, y2);
    }
}
