//! Closed jigsaw-piece outlines: typed segments, exact bounds, transforms,
//! and the randomized generator that produces one outline per captcha.

use std::f32::consts::{FRAC_PI_2, TAU};

use rand::Rng;

use crate::GenerateOptions;
use crate::error::{Error, Result};
use crate::geom::{Point, Vector, point, vector};
use crate::shape::{EdgeShape, edge_shapes};

/// Orientation of an arc segment, in a y-down coordinate system.
///
/// Named rather than a bare boolean: 2D libraries disagree on what a "positive"
/// sweep means, and the two values here produce opposite tabs/blanks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sweep {
    Clockwise,
    CounterClockwise,
}

/// One piece of the outline border. The segment's start point is the previous
/// segment's end point (or the outline start for the first segment).
#[derive(Clone, Copy, Debug)]
pub enum Segment {
    Line {
        to: Point,
    },
    /// Circular endpoint arc, SVG-style: radius, large-arc flag and sweep
    /// orientation select one of the four candidate arcs between the two
    /// endpoints.
    Arc {
        to: Point,
        radius: f32,
        large_arc: bool,
        sweep: Sweep,
    },
}

impl Segment {
    fn end(&self) -> Point {
        match self {
            Segment::Line { to } => *to,
            Segment::Arc { to, .. } => *to,
        }
    }
}

/// Axis-aligned bounding box over final outline geometry.
#[derive(Clone, Copy, Debug)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    fn at(p: Point) -> Self {
        Self {
            min_x: p.x,
            min_y: p.y,
            max_x: p.x,
            max_y: p.y,
        }
    }

    fn include(&mut self, x: f32, y: f32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// A closed, non-self-intersecting border of one jigsaw piece.
///
/// Transforms are pure: they return a new outline with the same shape.
#[derive(Clone, Debug)]
pub struct Outline {
    start: Point,
    segments: Vec<Segment>,
}

/// Fluent builder for [`Outline`]. `close` seals the figure with a final
/// straight segment back to the start point when the path does not already
/// end there.
pub struct OutlineBuilder {
    start: Point,
    current: Point,
    segments: Vec<Segment>,
}

impl OutlineBuilder {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            current: start,
            segments: Vec::new(),
        }
    }

    pub fn line_to(mut self, to: Point) -> Self {
        self.segments.push(Segment::Line { to });
        self.current = to;
        self
    }

    pub fn arc_to(mut self, radius: f32, large_arc: bool, sweep: Sweep, to: Point) -> Self {
        self.segments.push(Segment::Arc {
            to,
            radius,
            large_arc,
            sweep,
        });
        self.current = to;
        self
    }

    pub fn close(mut self) -> Outline {
        if self.current != self.start {
            self.segments.push(Segment::Line { to: self.start });
        }
        Outline {
            start: self.start,
            segments: self.segments,
        }
    }
}

impl Outline {
    pub fn start(&self) -> Point {
        self.start
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Bounding box of the outline as drawn, including circular-arc extremes
    /// that overshoot the segment endpoints.
    pub fn bounds(&self) -> Bounds {
        let mut b = Bounds::at(self.start);
        let mut from = self.start;
        for segment in &self.segments {
            match *segment {
                Segment::Line { to } => b.include(to.x, to.y),
                Segment::Arc {
                    to,
                    radius,
                    large_arc,
                    sweep,
                } => {
                    b.include(to.x, to.y);
                    if let Some(arc) = center_arc(from, to, radius, large_arc, sweep) {
                        // Circle extremes sit on the axis directions; include
                        // each one the swept interval actually crosses.
                        for k in 0..4 {
                            let theta = k as f32 * FRAC_PI_2;
                            if angle_between(theta, arc.start_angle, arc.delta) {
                                b.include(
                                    arc.center.x + arc.radius * theta.cos(),
                                    arc.center.y + arc.radius * theta.sin(),
                                );
                            }
                        }
                    }
                }
            }
            from = segment.end();
        }
        b
    }

    pub fn translate(&self, by: Vector) -> Outline {
        self.map_points(|p| p + by)
    }

    /// Rotates the outline about its bounding-box center. Radii and sweep
    /// orientations are invariant under a proper rotation.
    pub fn rotate(&self, degrees: f32) -> Outline {
        let b = self.bounds();
        let center = point((b.min_x + b.max_x) / 2.0, (b.min_y + b.max_y) / 2.0);
        let (sin, cos) = degrees.to_radians().sin_cos();
        self.map_points(|p| {
            let dx = p.x - center.x;
            let dy = p.y - center.y;
            point(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos)
        })
    }

    fn map_points(&self, f: impl Fn(Point) -> Point) -> Outline {
        let segments = self
            .segments
            .iter()
            .map(|segment| match *segment {
                Segment::Line { to } => Segment::Line { to: f(to) },
                Segment::Arc {
                    to,
                    radius,
                    large_arc,
                    sweep,
                } => Segment::Arc {
                    to: f(to),
                    radius,
                    large_arc,
                    sweep,
                },
            })
            .collect();
        Outline {
            start: f(self.start),
            segments,
        }
    }

    /// Converts the outline into a raster path, approximating each arc with
    /// cubic segments of at most a quarter turn.
    pub fn to_path(&self) -> Option<tiny_skia::Path> {
        let mut pb = tiny_skia::PathBuilder::new();
        pb.move_to(self.start.x, self.start.y);
        let mut from = self.start;
        for segment in &self.segments {
            match *segment {
                Segment::Line { to } => pb.line_to(to.x, to.y),
                Segment::Arc {
                    to,
                    radius,
                    large_arc,
                    sweep,
                } => push_arc(&mut pb, from, to, radius, large_arc, sweep),
            }
            from = segment.end();
        }
        pb.close();
        pb.finish()
    }
}

struct CenterArc {
    center: Point,
    radius: f32,
    start_angle: f32,
    delta: f32,
}

/// SVG endpoint-to-center conversion, specialized to circles (rx == ry, no
/// x-axis rotation). See https://www.w3.org/TR/SVG/implnote.html#ArcImplementationNotes
fn center_arc(
    from: Point,
    to: Point,
    radius: f32,
    large_arc: bool,
    sweep: Sweep,
) -> Option<CenterArc> {
    let mut r = radius.abs();
    if r < 1e-6 {
        return None;
    }

    let dx2 = (from.x - to.x) / 2.0;
    let dy2 = (from.y - to.y) / 2.0;
    let d2 = dx2 * dx2 + dy2 * dy2;
    if d2 < 1e-12 {
        return None;
    }

    // Scale the radius up when the endpoints are too far apart for it.
    let lam = d2 / (r * r);
    if lam > 1.0 {
        r *= lam.sqrt();
    }

    let mut sq = (r * r - d2) / d2;
    if sq < 0.0 {
        sq = 0.0;
    }
    let sweep_flag = sweep == Sweep::Clockwise;
    let sign = if large_arc == sweep_flag { -1.0 } else { 1.0 };
    let coef = sign * sq.sqrt();

    let cxp = coef * dy2;
    let cyp = -coef * dx2;
    let center = point(cxp + (from.x + to.x) / 2.0, cyp + (from.y + to.y) / 2.0);

    let ux = (dx2 - cxp) / r;
    let uy = (dy2 - cyp) / r;
    let vx = (-dx2 - cxp) / r;
    let vy = (-dy2 - cyp) / r;

    let start_angle = vec_angle(1.0, 0.0, ux, uy);
    let mut delta = vec_angle(ux, uy, vx, vy);
    if !sweep_flag && delta > 0.0 {
        delta -= TAU;
    } else if sweep_flag && delta < 0.0 {
        delta += TAU;
    }

    Some(CenterArc {
        center,
        radius: r,
        start_angle,
        delta,
    })
}

fn vec_angle(ux: f32, uy: f32, vx: f32, vy: f32) -> f32 {
    let dot = ux * vx + uy * vy;
    let det = ux * vy - uy * vx;
    det.atan2(dot)
}

fn normalize_angle(mut a: f32) -> f32 {
    a %= TAU;
    if a < 0.0 {
        a += TAU;
    }
    a
}

fn angle_between(theta: f32, start: f32, delta: f32) -> bool {
    let eps = 1e-5;
    let t = normalize_angle(theta - start);
    if delta >= 0.0 {
        t <= delta + eps
    } else {
        t >= TAU + delta - eps
    }
}

fn push_arc(
    pb: &mut tiny_skia::PathBuilder,
    from: Point,
    to: Point,
    radius: f32,
    large_arc: bool,
    sweep: Sweep,
) {
    let Some(arc) = center_arc(from, to, radius, large_arc, sweep) else {
        pb.line_to(to.x, to.y);
        return;
    };

    let steps = (arc.delta.abs() / FRAC_PI_2).ceil().max(1.0) as u32;
    let step = arc.delta / steps as f32;
    let k = 4.0 / 3.0 * (step / 4.0).tan();
    let mut a0 = arc.start_angle;
    for i in 0..steps {
        let a1 = arc.start_angle + (i + 1) as f32 * step;
        let p0 = arc.center + vector(a0.cos(), a0.sin()) * arc.radius;
        let p1 = arc.center + vector(a1.cos(), a1.sin()) * arc.radius;
        pb.cubic_to(
            p0.x - k * arc.radius * a0.sin(),
            p0.y + k * arc.radius * a0.cos(),
            p1.x + k * arc.radius * a1.sin(),
            p1.y - k * arc.radius * a1.cos(),
            p1.x,
            p1.y,
        );
        a0 = a1;
    }
}

/// Derived piece dimensions. All follow from the canvas's shorter side with
/// the original integer ratios: the nominal square spans `2 * square`, each
/// tab/blank arc has radius `radius` over a chord of `2 * gap`.
#[derive(Clone, Copy, Debug)]
struct Units {
    square: i32,
    gap: i32,
    radius: f32,
}

impl Units {
    fn derive(min_length: u32) -> Option<Units> {
        let bulge = min_length as i32 / 2 / 5;
        let square = bulge * 3 / 2;
        let gap = square / 4;
        let radius = (bulge / 2) as f32;
        (gap > 0 && radius > 0.0).then_some(Units {
            square,
            gap,
            radius,
        })
    }
}

/// Builds one randomized jigsaw outline sized for a canvas whose shorter side
/// is `min_length` pixels. The piece never exceeds about half of that side.
pub fn jigsaw_outline(
    min_length: u32,
    options: &GenerateOptions,
    rng: &mut impl Rng,
) -> Result<Outline> {
    let units = Units::derive(min_length).ok_or(Error::CanvasTooSmall { min_length })?;
    let shapes = edge_shapes(rng);

    let s = units.square as f32;
    let g = units.gap as f32;
    let drift = options.drift;

    let top = [
        jitter(rng, drift, 0.0, 0.0),
        jitter(rng, drift, s - g, 0.0),
        jitter(rng, drift, s + g, 0.0),
        jitter(rng, drift, 2.0 * s, 0.0),
    ];
    let right = [
        jitter(rng, drift, 2.0 * s, s - g),
        jitter(rng, drift, 2.0 * s, s + g),
        jitter(rng, drift, 2.0 * s, 2.0 * s),
    ];
    let bottom = [
        jitter(rng, drift, s + g, 2.0 * s),
        jitter(rng, drift, s - g, 2.0 * s),
        jitter(rng, drift, 0.0, 2.0 * s),
    ];
    let left = [
        jitter(rng, drift, 0.0, s + g),
        jitter(rng, drift, 0.0, s - g),
    ];

    // Sides are emitted clockwise (top, right, bottom, left); a straight left
    // side is supplied by `close` itself.
    let mut b = OutlineBuilder::new(top[0]);
    b = match shapes[0] {
        EdgeShape::Linear => b.line_to(top[3]),
        shape => b
            .line_to(top[1])
            .arc_to(
                arc_radius(rng, drift, units.radius),
                true,
                sweep_for(shape),
                top[2],
            )
            .line_to(top[3]),
    };
    b = match shapes[1] {
        EdgeShape::Linear => b.line_to(right[2]),
        shape => b
            .line_to(right[0])
            .arc_to(
                arc_radius(rng, drift, units.radius),
                true,
                sweep_for(shape),
                right[1],
            )
            .line_to(right[2]),
    };
    b = match shapes[2] {
        EdgeShape::Linear => b.line_to(bottom[2]),
        shape => b
            .line_to(bottom[0])
            .arc_to(
                arc_radius(rng, drift, units.radius),
                true,
                sweep_for(shape),
                bottom[1],
            )
            .line_to(bottom[2]),
    };
    b = match shapes[3] {
        EdgeShape::Linear => b,
        shape => b.line_to(left[0]).arc_to(
            arc_radius(rng, drift, units.radius),
            true,
            sweep_for(shape),
            left[1],
        ),
    };
    let outline = b.close();

    if options.rotate && rng.gen_bool(0.5) {
        Ok(outline.rotate(rng.gen_range(0.0..360.0)))
    } else {
        Ok(outline)
    }
}

/// On a clockwise-traversed border a clockwise large arc lands outside the
/// piece, so tabs sweep clockwise and blanks counter-clockwise.
fn sweep_for(shape: EdgeShape) -> Sweep {
    match shape {
        EdgeShape::Bulge => Sweep::Clockwise,
        _ => Sweep::CounterClockwise,
    }
}

fn jitter(rng: &mut impl Rng, drift: bool, x: f32, y: f32) -> Point {
    if drift {
        point(
            x * rng.gen_range(0.95..=1.0f32),
            y * rng.gen_range(0.95..=1.0f32),
        )
    } else {
        point(x, y)
    }
}

fn arc_radius(rng: &mut impl Rng, drift: bool, base: f32) -> f32 {
    if drift {
        base * rng.gen_range(1.0..=1.3f32)
    } else {
        base
    }
}
