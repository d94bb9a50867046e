//! Stateless vector math over host coordinates (origin top-left, y grows downward).

use serde::Deserialize;


#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    None,
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector {
    pub start: Point,
    pub end: Point,
    pub delta_x: f32,
    pub delta_y: f32,
    pub length: f32,
    pub direction: Direction,
}

impl Vector {
    pub fn reversed(&self) -> Self {
        vector(self.end, self.start)
    }

    pub fn is_zero(&self) -> bool {
        self.length == 0.0
    }
}

pub fn vector(start: Point, end: Point) -> Vector {
    let delta_x = end.x - start.x;
    let delta_y = end.y - start.y;
    Vector {
        start,
        end,
        delta_x,
        delta_y,
        length: delta_x.hypot(delta_y),
        direction: direction_of(delta_x, delta_y),
    }
}

/// The dominant axis wins; ties go to the vertical axis.
pub fn direction_of(delta_x: f32, delta_y: f32) -> Direction {
    if delta_x.abs() > delta_y.abs() {
        if delta_x > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if delta_y > 0.0 {
        Direction::Down
    } else if delta_y < 0.0 {
        Direction::Up
    } else {
        Direction::None
    }
}

/// Pixels per second over `[start_ms, end_ms]`; zero when no time elapsed.
pub fn speed(vector: &Vector, start_ms: u64, end_ms: u64) -> f32 {
    per_second(vector.length, start_ms, end_ms)
}

pub(crate) fn per_second(value: f32, start_ms: u64, end_ms: u64) -> f32 {
    let elapsed_ms = end_ms.saturating_sub(start_ms);
    if elapsed_ms == 0 {
        return 0.0;
    }
    value / (elapsed_ms as f32 / 1_000.0)
}

pub fn center(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Chords between the two contacts at the start and at the end of their vectors.
pub fn cross_vectors(first: &Vector, second: &Vector) -> (Vector, Vector) {
    (
        vector(first.start, second.start),
        vector(first.end, second.end),
    )
}

/// Displacement of the midpoint between two contacts.
pub fn center_movement(first: &Vector, second: &Vector) -> Vector {
    vector(
        center(first.start, second.start),
        center(first.end, second.end),
    )
}

/// Signed change of the contact-to-contact distance; negative when the contacts converge.
pub fn absolute_distance_change(first: &Vector, second: &Vector) -> f32 {
    let (start_chord, end_chord) = cross_vectors(first, second);
    end_chord.length - start_chord.length
}

/// End chord length over start chord length, `None` when the contacts started coincident.
pub fn relative_distance_change(first: &Vector, second: &Vector) -> Option<f32> {
    let (start_chord, end_chord) = cross_vectors(first, second);
    if start_chord.length == 0.0 {
        return None;
    }
    Some(end_chord.length / start_chord.length)
}

/// Signed angle in degrees, range (-180, 180], by which the chord between two contacts turned
/// from the start to the end of their vectors. Positive is clockwise on screen.
///
/// Both chords are moved to the origin, the end chord is rotated back by the start chord's
/// polar angle and the polar angle of the result is the rotation. This is a one-shot
/// measurement between two snapshots; nothing is accumulated across calls.
pub fn rotation_angle(first: &Vector, second: &Vector) -> f32 {
    let (start_chord, end_chord) = cross_vectors(first, second);
    if start_chord.is_zero() || end_chord.is_zero() {
        return 0.0;
    }

    let translated_start = to_origin(&start_chord);
    let translated_end = to_origin(&end_chord);

    let turn = -translated_start.y.atan2(translated_start.x);
    let rotated_end = rotate(translated_end, turn);
    let angle = rotated_end.y.atan2(rotated_end.x).to_degrees();
    // atan2 yields -180 for a negative-zero y; keep the range half-open.
    if angle <= -180.0 {
        180.0
    } else {
        angle
    }
}

/// Unsigned angle in degrees, range [0, 180], between the contacts' own vectors.
/// Zero when either vector has no length.
pub fn vector_angle(first: &Vector, second: &Vector) -> f32 {
    if first.is_zero() || second.is_zero() {
        return 0.0;
    }
    let dot = first.delta_x * second.delta_x + first.delta_y * second.delta_y;
    let cos = (dot / (first.length * second.length)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

fn to_origin(vector: &Vector) -> Point {
    Point::new(vector.delta_x, vector.delta_y)
}

fn rotate(point: Point, angle_rad: f32) -> Point {
    let (sin, cos) = angle_rad.sin_cos();
    Point::new(
        point.x * cos - point.y * sin,
        point.x * sin + point.y * cos,
    )
}
