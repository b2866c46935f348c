//! Turtle state machine
//!
//! The turtle lives in a y-up plane. Heading is in degrees, 0 pointing
//! east and increasing counter-clockwise, so the initial heading of 90
//! points up. While the pen is down the turtle extends a current path;
//! lifting the pen, or changing the pen style, closes it.

use std::f64::consts::PI;
use std::fmt;

use serde::Serialize;

/// Heading the turtle starts with and returns to on `HOME`
pub const INITIAL_HEADING: f64 = 90.0;

/// Default number of segments used to approximate a circle
pub const DEFAULT_CIRCLE_STEPS: usize = 36;

/// A point in turtle coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Pen color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from arbitrary numbers, rounding and clamping each
    /// channel into 0..=255
    pub fn clamped(r: f64, g: f64, b: f64) -> Self {
        fn channel(v: f64) -> u8 {
            if v.is_nan() {
                0
            } else {
                v.round().clamp(0.0, 255.0) as u8
            }
        }
        Self::new(channel(r), channel(g), channel(b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A polyline drawn with a single pen style
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Path {
    pub points: Vec<Point>,
    pub color: Color,
    pub width: f64,
}

impl Path {
    /// Total length of the polyline
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance(&w[1])).sum()
    }

    /// The path's straight segments, in drawing order
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.points.windows(2).map(move |w| Segment {
            from: w[0],
            to: w[1],
            color: self.color,
            width: self.width,
        })
    }
}

/// One straight pen-down line
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub color: Color,
    pub width: f64,
}

/// Serializable view of the turtle's pose and pen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurtleSnapshot {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    pub pen_down: bool,
    pub pen_width: f64,
    pub pen_color: Color,
    pub visible: bool,
}

type SegmentSink = Box<dyn FnMut(&Segment)>;

/// The turtle
pub struct Turtle {
    position: Point,
    heading: f64,
    pen_down: bool,
    pen_width: f64,
    pen_color: Color,
    visible: bool,
    circle_steps: usize,
    /// Completed paths, oldest first
    paths: Vec<Path>,
    /// Points of the path being drawn; empty while the pen is up
    current: Vec<Point>,
    sink: Option<SegmentSink>,
}

impl Default for Turtle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Turtle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Turtle")
            .field("position", &self.position)
            .field("heading", &self.heading)
            .field("pen_down", &self.pen_down)
            .field("pen_width", &self.pen_width)
            .field("pen_color", &self.pen_color)
            .field("visible", &self.visible)
            .field("paths", &self.paths.len())
            .finish_non_exhaustive()
    }
}

/// Normalize an angle into `[0, 360)`
pub fn normalize_heading(degrees: f64) -> f64 {
    let heading = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if heading >= 360.0 {
        0.0
    } else {
        heading
    }
}

/// Round away the error in sin/cos of multiples of 90 degrees
fn snap(v: f64) -> f64 {
    if v.abs() < 1e-12 {
        0.0
    } else {
        v
    }
}

impl Turtle {
    /// A turtle at the origin, heading up, pen down, 1-wide black pen
    pub fn new() -> Self {
        Self::with_style(1.0, Color::BLACK)
    }

    /// A turtle at the origin with the given pen style
    pub fn with_style(pen_width: f64, pen_color: Color) -> Self {
        Self {
            position: Point::default(),
            heading: INITIAL_HEADING,
            pen_down: true,
            pen_width: pen_width.max(0.0),
            pen_color,
            visible: true,
            circle_steps: DEFAULT_CIRCLE_STEPS,
            paths: Vec::new(),
            current: vec![Point::default()],
            sink: None,
        }
    }

    /// Number of segments `CIRCLE` uses (at least 1)
    pub fn set_circle_steps(&mut self, steps: usize) {
        self.circle_steps = steps.max(1);
    }

    /// Call `sink` for every line committed from now on
    pub fn set_segment_sink(&mut self, sink: impl FnMut(&Segment) + 'static) {
        self.sink = Some(Box::new(sink));
    }

    pub fn clear_segment_sink(&mut self) {
        self.sink = None;
    }

    // ----- movement -----

    pub fn forward(&mut self, distance: f64) {
        let (sin, cos) = self.heading.to_radians().sin_cos();
        let target = Point::new(
            self.position.x + distance * snap(cos),
            self.position.y + distance * snap(sin),
        );
        self.move_to(target);
    }

    pub fn backward(&mut self, distance: f64) {
        self.forward(-distance);
    }

    pub fn left(&mut self, degrees: f64) {
        self.heading = normalize_heading(self.heading + degrees);
    }

    pub fn right(&mut self, degrees: f64) {
        self.heading = normalize_heading(self.heading - degrees);
    }

    pub fn set_heading(&mut self, degrees: f64) {
        self.heading = normalize_heading(degrees);
    }

    pub fn set_xy(&mut self, x: f64, y: f64) {
        self.move_to(Point::new(x, y));
    }

    pub fn set_x(&mut self, x: f64) {
        self.move_to(Point::new(x, self.position.y));
    }

    pub fn set_y(&mut self, y: f64) {
        self.move_to(Point::new(self.position.x, y));
    }

    /// Back to the origin (drawing if the pen is down), heading up
    pub fn home(&mut self) {
        self.set_xy(0.0, 0.0);
        self.set_heading(INITIAL_HEADING);
    }

    /// Approximate a circle of `radius`, turning left as it goes
    pub fn circle(&mut self, radius: f64) {
        let steps = self.circle_steps;
        let edge = 2.0 * PI * radius / steps as f64;
        let turn = 360.0 / steps as f64;
        for _ in 0..steps {
            self.forward(edge);
            self.left(turn);
        }
    }

    /// Rectangle of `width` by `height`, turning right at each corner
    pub fn draw_box(&mut self, width: f64, height: f64) {
        for _ in 0..2 {
            self.forward(width);
            self.right(90.0);
            self.forward(height);
            self.right(90.0);
        }
    }

    pub fn square(&mut self, size: f64) {
        self.draw_box(size, size);
    }

    fn move_to(&mut self, target: Point) {
        let from = self.position;
        self.position = target;
        if !self.pen_down {
            return;
        }
        self.current.push(target);
        if let Some(sink) = self.sink.as_mut() {
            sink(&Segment {
                from,
                to: target,
                color: self.pen_color,
                width: self.pen_width,
            });
        }
    }

    // ----- pen -----

    pub fn pen_up(&mut self) {
        self.finish_path();
        self.pen_down = false;
    }

    pub fn pen_down(&mut self) {
        if !self.pen_down {
            self.pen_down = true;
            self.current = vec![self.position];
        }
    }

    pub fn set_pen_color(&mut self, color: Color) {
        if color != self.pen_color {
            self.restyle();
            self.pen_color = color;
        }
    }

    pub fn set_pen_size(&mut self, width: f64) {
        let width = width.max(0.0);
        if width != self.pen_width {
            self.restyle();
            self.pen_width = width;
        }
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    /// Back to the initial pose with the pen down, discarding all paths.
    /// The pen style is kept.
    pub fn clear(&mut self) {
        self.paths.clear();
        self.position = Point::default();
        self.heading = INITIAL_HEADING;
        self.pen_down = true;
        self.current = vec![self.position];
    }

    /// Close the current path so the next line starts a new one
    fn restyle(&mut self) {
        if self.pen_down {
            self.finish_path();
            self.current = vec![self.position];
        }
    }

    fn finish_path(&mut self) {
        let points = std::mem::take(&mut self.current);
        if points.len() >= 2 {
            self.paths.push(Path {
                points,
                color: self.pen_color,
                width: self.pen_width,
            });
        }
    }

    // ----- queries -----

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn is_pen_down(&self) -> bool {
        self.pen_down
    }

    pub fn pen_width(&self) -> f64 {
        self.pen_width
    }

    pub fn pen_color(&self) -> Color {
        self.pen_color
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Completed paths only
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Completed paths plus the one in progress, if it has a line in it
    pub fn drawing(&self) -> Vec<Path> {
        let mut paths = self.paths.clone();
        if self.current.len() >= 2 {
            paths.push(Path {
                points: self.current.clone(),
                color: self.pen_color,
                width: self.pen_width,
            });
        }
        paths
    }

    /// Every drawn line, in drawing order
    pub fn segments(&self) -> Vec<Segment> {
        self.drawing().iter().flat_map(|p| p.segments()).collect()
    }

    pub fn snapshot(&self) -> TurtleSnapshot {
        TurtleSnapshot {
            x: self.position.x,
            y: self.position.y,
            heading: self.heading,
            pen_down: self.pen_down,
            pen_width: self.pen_width,
            pen_color: self.pen_color,
            visible: self.visible,
        }
    }
}

#[cfg(test)]
mod tests;
