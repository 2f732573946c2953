use super::{Point2d, Segment2d};

/// Finds the point where two segments cross, if they do.
///
/// Each segment's end points must lie on opposite sides of (or on) the other
/// segment's supporting line. Parallel and collinear segments never intersect,
/// even when they overlap.
pub fn segment_intersection(a: &Segment2d, b: &Segment2d) -> Option<Point2d> {
    let (x1, y1, x2, y2) = (a.start.x, a.start.y, a.end.x, a.end.y);
    let (x3, y3, x4, y4) = (b.start.x, b.start.y, b.end.x, b.end.y);
    let (dx1, dy1) = (x1 - x2, y1 - y2);
    let (dx2, dy2) = (x3 - x4, y3 - y4);

    let denom = dx1 * dy2 - dy1 * dx2;
    if denom == 0.0 {
        return None;
    }

    // Ends of `a` relative to the line through `b`
    let cb = x3 * y4 - y3 * x4;
    let d1a = dy2 * x1 - dx2 * y1 + cb;
    let d1b = dy2 * x2 - dx2 * y2 + cb;
    if d1a * d1b > 0.0 {
        return None;
    }

    // Ends of `b` relative to the line through `a`
    let ca = x1 * y2 - y1 * x2;
    let d2a = dy1 * x3 - dx1 * y3 + ca;
    let d2b = dy1 * x4 - dx1 * y4 + ca;
    if d2a * d2b > 0.0 {
        return None;
    }

    Some(Point2d::new(
        (ca * dx2 - dx1 * cb) / denom,
        (ca * dy2 - dy1 * cb) / denom,
    ))
}

/// Returns true if `segment` touches or crosses the infinite line through `line`.
///
/// A segment parallel to the line never crosses it.
pub fn segment_crosses_line(segment: &Segment2d, line: &Segment2d) -> bool {
    line_sides(segment, line).map_or(false, |(a, b)| a * b <= 0.0)
}

/// Returns true if the ends of `segment` lie strictly on opposite sides of the
/// infinite line through `line`. Touching the line does not count.
pub fn segment_strictly_crosses_line(segment: &Segment2d, line: &Segment2d) -> bool {
    line_sides(segment, line).map_or(false, |(a, b)| a * b < 0.0)
}

/// Which side of the line through `line` each end of `segment` lies on,
/// or `None` when they are parallel.
fn line_sides(segment: &Segment2d, line: &Segment2d) -> Option<(f64, f64)> {
    let (x1, y1, x2, y2) = (segment.start.x, segment.start.y, segment.end.x, segment.end.y);
    let (x3, y3, x4, y4) = (line.start.x, line.start.y, line.end.x, line.end.y);
    let (dx1, dy1) = (x1 - x2, y1 - y2);
    let (dx2, dy2) = (x3 - x4, y3 - y4);

    if dx1 * dy2 - dy1 * dx2 == 0.0 {
        return None;
    }

    let c = x3 * y4 - y3 * x4;
    Some((dy2 * x1 - dx2 * y1 + c, dy2 * x2 - dx2 * y2 + c))
}
