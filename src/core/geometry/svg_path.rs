//! SVG path data (`d` attribute) parsed into an arc-length sampled curve

use super::{Curve, Point};
use crate::core::error::AssetError;
use std::cmp::Ordering;
use std::f64::consts::PI;
use svgtypes::{PathParser, PathSegment};

/// Samples per Bézier/arc piece used to build its arc-length table
const CURVE_TABLE_SAMPLES: usize = 32;

/// Lengths below this are treated as zero
const LENGTH_EPSILON: f64 = 1e-9;

/// Cumulative chord lengths over a uniformly sampled parameter range
#[derive(Debug, Clone)]
struct ArcLengthTable {
    cumulative: Vec<f64>,
    total: f64,
}

impl ArcLengthTable {
    fn new(samples: usize, mut sample_fn: impl FnMut(f64) -> Point) -> Self {
        let samples = samples.max(1);
        let mut cumulative = Vec::with_capacity(samples + 1);
        let mut total = 0.0;
        let mut prev = sample_fn(0.0);
        cumulative.push(0.0);

        for i in 1..=samples {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64 / samples as f64;
            let point = sample_fn(t);
            total += prev.distance(point);
            cumulative.push(total);
            prev = point;
        }

        Self { cumulative, total }
    }

    /// Curve parameter `t ∈ [0, 1]` reached after `length` units
    #[allow(clippy::cast_precision_loss)]
    fn param_for_length(&self, length: f64) -> f64 {
        if self.total <= LENGTH_EPSILON {
            return 0.0;
        }
        let target = length.clamp(0.0, self.total);
        let idx = match self
            .cumulative
            .binary_search_by(|val| val.partial_cmp(&target).unwrap_or(Ordering::Less))
        {
            Ok(ix) | Err(ix) => ix,
        };
        if idx == 0 {
            return 0.0;
        }
        if idx >= self.cumulative.len() {
            return 1.0;
        }

        let prev = self.cumulative[idx - 1];
        let span = self.cumulative[idx] - prev;
        let alpha = if span <= 0.0 {
            0.0
        } else {
            (target - prev) / span
        };
        let samples = (self.cumulative.len() - 1) as f64;
        let t0 = (idx - 1) as f64 / samples;
        let t1 = idx as f64 / samples;
        t0 + (t1 - t0) * alpha
    }
}

/// Elliptical arc in center parameterisation
#[derive(Debug, Clone, Copy)]
struct EllipseArc {
    center: Point,
    rx: f64,
    ry: f64,
    cos_phi: f64,
    sin_phi: f64,
    theta_start: f64,
    theta_delta: f64,
}

impl EllipseArc {
    fn point(&self, t: f64) -> Point {
        let theta = self.theta_start + self.theta_delta * t;
        let (sin_theta, cos_theta) = theta.sin_cos();
        let x = self.rx * cos_theta;
        let y = self.ry * sin_theta;
        Point::new(
            self.cos_phi * x - self.sin_phi * y + self.center.x,
            self.sin_phi * x + self.cos_phi * y + self.center.y,
        )
    }
}

/// One drawable piece of a path
#[derive(Debug, Clone)]
enum Piece {
    Line {
        start: Point,
        end: Point,
        length: f64,
    },
    Quadratic {
        start: Point,
        ctrl: Point,
        end: Point,
        table: ArcLengthTable,
    },
    Cubic {
        start: Point,
        ctrl1: Point,
        ctrl2: Point,
        end: Point,
        table: ArcLengthTable,
    },
    Arc {
        arc: EllipseArc,
        table: ArcLengthTable,
    },
}

impl Piece {
    fn line(start: Point, end: Point) -> Self {
        Self::Line {
            start,
            end,
            length: start.distance(end),
        }
    }

    fn quadratic(start: Point, ctrl: Point, end: Point) -> Self {
        let table = ArcLengthTable::new(CURVE_TABLE_SAMPLES, |t| {
            quadratic_bezier(start, ctrl, end, t)
        });
        Self::Quadratic {
            start,
            ctrl,
            end,
            table,
        }
    }

    fn cubic(start: Point, ctrl1: Point, ctrl2: Point, end: Point) -> Self {
        let table = ArcLengthTable::new(CURVE_TABLE_SAMPLES, |t| {
            cubic_bezier(start, ctrl1, ctrl2, end, t)
        });
        Self::Cubic {
            start,
            ctrl1,
            ctrl2,
            end,
            table,
        }
    }

    const fn length(&self) -> f64 {
        match self {
            Self::Line { length, .. } => *length,
            Self::Quadratic { table, .. } | Self::Cubic { table, .. } | Self::Arc { table, .. } => {
                table.total
            }
        }
    }

    fn point_at(&self, length: f64) -> Point {
        match self {
            Self::Line {
                start,
                end,
                length: piece_len,
            } => {
                if *piece_len <= LENGTH_EPSILON {
                    return *end;
                }
                let t = (length / piece_len).clamp(0.0, 1.0);
                *start + (*end - *start) * t
            }
            Self::Quadratic {
                start,
                ctrl,
                end,
                table,
            } => quadratic_bezier(*start, *ctrl, *end, table.param_for_length(length)),
            Self::Cubic {
                start,
                ctrl1,
                ctrl2,
                end,
                table,
            } => cubic_bezier(*start, *ctrl1, *ctrl2, *end, table.param_for_length(length)),
            Self::Arc { arc, table } => arc.point(table.param_for_length(length)),
        }
    }
}

/// A parsed SVG path, sampled by arc length across all of its pieces.
///
/// Sub-paths are concatenated in document order; the jump of a move-to
/// between them contributes no length.
#[derive(Debug, Clone)]
pub struct SvgCurve {
    pieces: Vec<Piece>,
    cumulative: Vec<f64>,
    total: f64,
    origin: Point,
}

impl SvgCurve {
    /// Parse SVG path data into a curve
    ///
    /// # Errors
    /// Returns [`AssetError::PathData`] if the path data is malformed.
    pub fn parse(data: &str) -> Result<Self, AssetError> {
        let mut builder = PieceBuilder::default();
        for segment in PathParser::from(data) {
            let segment = segment.map_err(|err| AssetError::PathData(err.to_string()))?;
            builder.push(segment);
        }
        Ok(builder.finish())
    }

    /// Point where the curve starts
    #[must_use]
    pub fn start(&self) -> Point {
        self.point_at_length(0.0)
    }

    /// Number of drawable pieces (lines, Béziers, arcs) in the path
    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }
}

impl Curve for SvgCurve {
    fn total_length(&self) -> f64 {
        self.total
    }

    fn point_at_length(&self, length: f64) -> Point {
        if self.pieces.is_empty() || self.total <= LENGTH_EPSILON {
            return self.pieces.first().map_or(self.origin, |p| p.point_at(0.0));
        }

        let target = length.clamp(0.0, self.total);
        let idx = match self
            .cumulative
            .binary_search_by(|len| len.partial_cmp(&target).unwrap_or(Ordering::Less))
        {
            Ok(ix) | Err(ix) => ix.min(self.pieces.len() - 1),
        };

        let piece_start = if idx == 0 {
            0.0
        } else {
            self.cumulative[idx - 1]
        };
        let piece = &self.pieces[idx];
        piece.point_at((target - piece_start).clamp(0.0, piece.length()))
    }
}

/// Turns a stream of SVG path segments into absolute pieces
#[derive(Default)]
struct PieceBuilder {
    pieces: Vec<Piece>,
    current: Point,
    subpath_start: Point,
    origin: Option<Point>,
    last_cubic_ctrl: Option<Point>,
    last_quad_ctrl: Option<Point>,
}

impl PieceBuilder {
    const fn resolve(&self, abs: bool, x: f64, y: f64) -> Point {
        if abs {
            Point::new(x, y)
        } else {
            Point::new(self.current.x + x, self.current.y + y)
        }
    }

    fn add(&mut self, piece: Piece) {
        if piece.length() > LENGTH_EPSILON {
            self.pieces.push(piece);
        }
    }

    #[allow(clippy::too_many_lines)]
    fn push(&mut self, segment: PathSegment) {
        let start = self.current;
        let mut cubic_ctrl = None;
        let mut quad_ctrl = None;

        match segment {
            PathSegment::MoveTo { abs, x, y } => {
                let to = self.resolve(abs, x, y);
                if self.origin.is_none() {
                    self.origin = Some(to);
                }
                self.current = to;
                self.subpath_start = to;
            }
            PathSegment::LineTo { abs, x, y } => {
                let to = self.resolve(abs, x, y);
                self.add(Piece::line(start, to));
                self.current = to;
            }
            PathSegment::HorizontalLineTo { abs, x } => {
                let to = if abs {
                    Point::new(x, start.y)
                } else {
                    Point::new(start.x + x, start.y)
                };
                self.add(Piece::line(start, to));
                self.current = to;
            }
            PathSegment::VerticalLineTo { abs, y } => {
                let to = if abs {
                    Point::new(start.x, y)
                } else {
                    Point::new(start.x, start.y + y)
                };
                self.add(Piece::line(start, to));
                self.current = to;
            }
            PathSegment::CurveTo {
                abs,
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                let ctrl1 = self.resolve(abs, x1, y1);
                let ctrl2 = self.resolve(abs, x2, y2);
                let to = self.resolve(abs, x, y);
                self.add(Piece::cubic(start, ctrl1, ctrl2, to));
                self.current = to;
                cubic_ctrl = Some(ctrl2);
            }
            PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
                let ctrl1 = self
                    .last_cubic_ctrl
                    .map_or(start, |last| start + (start - last));
                let ctrl2 = self.resolve(abs, x2, y2);
                let to = self.resolve(abs, x, y);
                self.add(Piece::cubic(start, ctrl1, ctrl2, to));
                self.current = to;
                cubic_ctrl = Some(ctrl2);
            }
            PathSegment::Quadratic { abs, x1, y1, x, y } => {
                let ctrl = self.resolve(abs, x1, y1);
                let to = self.resolve(abs, x, y);
                self.add(Piece::quadratic(start, ctrl, to));
                self.current = to;
                quad_ctrl = Some(ctrl);
            }
            PathSegment::SmoothQuadratic { abs, x, y } => {
                let ctrl = self
                    .last_quad_ctrl
                    .map_or(start, |last| start + (start - last));
                let to = self.resolve(abs, x, y);
                self.add(Piece::quadratic(start, ctrl, to));
                self.current = to;
                quad_ctrl = Some(ctrl);
            }
            PathSegment::EllipticalArc {
                abs,
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
            } => {
                let to = self.resolve(abs, x, y);
                if let Some(piece) =
                    build_arc_piece(start, to, rx, ry, x_axis_rotation, large_arc, sweep)
                {
                    self.add(piece);
                }
                self.current = to;
            }
            PathSegment::ClosePath { .. } => {
                self.add(Piece::line(start, self.subpath_start));
                self.current = self.subpath_start;
            }
        }

        self.last_cubic_ctrl = cubic_ctrl;
        self.last_quad_ctrl = quad_ctrl;
    }

    fn finish(self) -> SvgCurve {
        let mut cumulative = Vec::with_capacity(self.pieces.len());
        let mut total = 0.0;
        for piece in &self.pieces {
            total += piece.length();
            cumulative.push(total);
        }
        SvgCurve {
            pieces: self.pieces,
            cumulative,
            total,
            origin: self.origin.unwrap_or_default(),
        }
    }
}

fn quadratic_bezier(p0: Point, p1: Point, p2: Point, t: f64) -> Point {
    let u = 1.0 - t;
    u * u * p0 + 2.0 * u * t * p1 + t * t * p2
}

fn cubic_bezier(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let u = 1.0 - t;
    let uu = u * u;
    let tt = t * t;
    uu * u * p0 + 3.0 * uu * t * p1 + 3.0 * u * tt * p2 + tt * t * p3
}

/// Endpoint-to-center conversion of an SVG elliptical arc (SVG 1.1, appendix F.6).
///
/// Zero radii degrade to a straight line; coincident endpoints draw nothing.
fn build_arc_piece(
    start: Point,
    end: Point,
    rx: f64,
    ry: f64,
    x_axis_rotation: f64,
    large_arc: bool,
    sweep: bool,
) -> Option<Piece> {
    let mut rx = rx.abs();
    let mut ry = ry.abs();
    if rx <= LENGTH_EPSILON || ry <= LENGTH_EPSILON {
        return Some(Piece::line(start, end));
    }
    if start.distance(end) <= LENGTH_EPSILON {
        return None;
    }

    let (sin_phi, cos_phi) = x_axis_rotation.to_radians().sin_cos();
    let dx = (start.x - end.x) / 2.0;
    let dy = (start.y - end.y) / 2.0;
    let x1p = cos_phi * dx + sin_phi * dy;
    let y1p = -sin_phi * dx + cos_phi * dy;

    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let scale = lambda.sqrt();
        rx *= scale;
        ry *= scale;
    }

    let rx_sq = rx * rx;
    let ry_sq = ry * ry;
    let denom = rx_sq * y1p * y1p + ry_sq * x1p * x1p;
    if denom.abs() <= LENGTH_EPSILON {
        return Some(Piece::line(start, end));
    }

    let numerator = rx_sq * ry_sq - rx_sq * y1p * y1p - ry_sq * x1p * x1p;
    let sign = if large_arc == sweep { -1.0 } else { 1.0 };
    let coef = sign * (numerator / denom).max(0.0).sqrt();

    let cxp = coef * (rx * y1p / ry);
    let cyp = coef * (-ry * x1p / rx);
    let center = Point::new(
        cos_phi * cxp - sin_phi * cyp + (start.x + end.x) / 2.0,
        sin_phi * cxp + cos_phi * cyp + (start.y + end.y) / 2.0,
    );

    let v1 = Point::new((x1p - cxp) / rx, (y1p - cyp) / ry);
    let v2 = Point::new((-x1p - cxp) / rx, (-y1p - cyp) / ry);
    let theta_start = v1.y.atan2(v1.x);
    let mut theta_delta = v1.x.mul_add(v2.y, -(v1.y * v2.x)).atan2(v1.x.mul_add(v2.x, v1.y * v2.y));
    if !sweep && theta_delta > 0.0 {
        theta_delta -= 2.0 * PI;
    } else if sweep && theta_delta < 0.0 {
        theta_delta += 2.0 * PI;
    }

    let arc = EllipseArc {
        center,
        rx,
        ry,
        cos_phi,
        sin_phi,
        theta_start,
        theta_delta,
    };
    let table = ArcLengthTable::new(CURVE_TABLE_SAMPLES, |t| arc.point(t));
    Some(Piece::Arc { arc, table })
}
