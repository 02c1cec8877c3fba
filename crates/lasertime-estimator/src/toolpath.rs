//! Toolpath segments and display normalization

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// What the machine was doing along a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Beam on
    Cut,
    /// Beam off
    Travel,
}

/// A straight drawn primitive. Arcs are emitted as runs of short segments.
///
/// Serialized as `{ "type": "cut", "points": [[x0, y0], [x1, y1]] }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "SegmentRecord", from = "SegmentRecord")]
pub struct Segment {
    pub kind: SegmentKind,
    pub start: DVec2,
    pub end: DVec2,
}

impl Segment {
    pub fn new(kind: SegmentKind, start: DVec2, end: DVec2) -> Self {
        Self { kind, start, end }
    }
}

#[derive(Serialize, Deserialize)]
struct SegmentRecord {
    #[serde(rename = "type")]
    kind: SegmentKind,
    points: [[f64; 2]; 2],
}

impl From<Segment> for SegmentRecord {
    fn from(segment: Segment) -> Self {
        Self {
            kind: segment.kind,
            points: [segment.start.to_array(), segment.end.to_array()],
        }
    }
}

impl From<SegmentRecord> for Segment {
    fn from(record: SegmentRecord) -> Self {
        let [start, end] = record.points;
        Self {
            kind: record.kind,
            start: DVec2::from_array(start),
            end: DVec2::from_array(end),
        }
    }
}

/// Bounding box accumulator over segment endpoints
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new()
    }
}

impl Bounds {
    pub fn new() -> Self {
        Self {
            min: DVec2::splat(f64::MAX),
            max: DVec2::splat(f64::MIN),
        }
    }

    /// Bounds of every endpoint in `segments`
    pub fn of_segments(segments: &[Segment]) -> Self {
        let mut bounds = Self::new();
        for segment in segments {
            bounds.update(segment.start);
            bounds.update(segment.end);
        }
        bounds
    }

    pub fn update(&mut self, point: DVec2) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min.cmple(self.max).all()
    }

    /// Width and height; a flat axis reports a span of 1
    pub fn span(&self) -> DVec2 {
        let raw = self.max - self.min;
        DVec2::new(
            if raw.x > 0.0 { raw.x } else { 1.0 },
            if raw.y > 0.0 { raw.y } else { 1.0 },
        )
    }
}

/// Scale and translate a toolpath so its longer axis fills a `box_size` square.
///
/// Aspect ratio, kinds and ordering are preserved; the minimum corner maps to the origin.
pub fn normalize_toolpath(segments: &[Segment], box_size: f64) -> Vec<Segment> {
    let bounds = Bounds::of_segments(segments);
    if !bounds.is_valid() {
        return Vec::new();
    }

    let span = bounds.span();
    let scale = box_size / span.x.max(span.y);
    let map = |p: DVec2| (p - bounds.min) * scale;

    segments
        .iter()
        .map(|s| Segment::new(s.kind, map(s.start), map(s.end)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(kind: SegmentKind, a: (f64, f64), b: (f64, f64)) -> Segment {
        Segment::new(kind, DVec2::new(a.0, a.1), DVec2::new(b.0, b.1))
    }

    #[test]
    fn test_empty_toolpath() {
        assert!(normalize_toolpath(&[], 400.0).is_empty());
    }

    #[test]
    fn test_normalize_fills_longer_axis() {
        let path = vec![
            seg(SegmentKind::Travel, (10.0, 10.0), (30.0, 10.0)),
            seg(SegmentKind::Cut, (30.0, 10.0), (30.0, 20.0)),
        ];
        let out = normalize_toolpath(&path, 400.0);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].kind, SegmentKind::Travel);
        assert_eq!(out[1].kind, SegmentKind::Cut);
        assert_eq!(out[0].start, DVec2::new(0.0, 0.0));
        assert_eq!(out[0].end, DVec2::new(400.0, 0.0));
        assert_eq!(out[1].end, DVec2::new(400.0, 200.0));
    }

    #[test]
    fn test_flat_axis_uses_unit_span() {
        // Horizontal line: height is 0, treated as 1, width dominates
        let path = vec![seg(SegmentKind::Cut, (0.0, 5.0), (4.0, 5.0))];
        let out = normalize_toolpath(&path, 400.0);
        assert_eq!(out[0].end, DVec2::new(400.0, 0.0));

        // A single point: both spans fall back to 1
        let path = vec![seg(SegmentKind::Travel, (2.0, 2.0), (2.0, 2.0))];
        let out = normalize_toolpath(&path, 400.0);
        assert_eq!(out[0].start, DVec2::ZERO);
        assert_eq!(out[0].end, DVec2::ZERO);
    }

    #[test]
    fn test_small_extent_uses_unit_floor_per_axis() {
        // 0.5 wide, 0 tall: height becomes 1 and wins
        let path = vec![seg(SegmentKind::Cut, (0.0, 0.0), (0.5, 0.0))];
        let out = normalize_toolpath(&path, 400.0);
        assert_eq!(out[0].end, DVec2::new(200.0, 0.0));
    }

    #[test]
    fn test_segment_wire_format() {
        let s = seg(SegmentKind::Cut, (1.0, 2.0), (3.5, -4.0));
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"type":"cut","points":[[1.0,2.0],[3.5,-4.0]]}"#);
        let back: Segment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_bounds() {
        let bounds = Bounds::of_segments(&[
            seg(SegmentKind::Cut, (-1.0, 3.0), (4.0, -2.0)),
            seg(SegmentKind::Travel, (4.0, -2.0), (0.0, 7.0)),
        ]);
        assert_eq!(bounds.min, DVec2::new(-1.0, -2.0));
        assert_eq!(bounds.max, DVec2::new(4.0, 7.0));
        assert_eq!(bounds.span(), DVec2::new(5.0, 9.0));
        assert!(!Bounds::new().is_valid());
    }
}
