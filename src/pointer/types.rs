use crate::geometry::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

impl PointerPhase {
    pub const fn is_release(self) -> bool {
        matches!(self, Self::Up | Self::Cancel)
    }
}

/// One contact report from the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub id: PointerId,
    pub point: Point,
    pub t_ms: u64,
    pub phase: PointerPhase,
}

impl PointerSample {
    pub const fn new(id: PointerId, point: Point, t_ms: u64, phase: PointerPhase) -> Self {
        Self {
            id,
            point,
            t_ms,
            phase,
        }
    }

    pub const fn down(id: u32, x: f32, y: f32, t_ms: u64) -> Self {
        Self::new(PointerId(id), Point::new(x, y), t_ms, PointerPhase::Down)
    }

    pub const fn moved(id: u32, x: f32, y: f32, t_ms: u64) -> Self {
        Self::new(PointerId(id), Point::new(x, y), t_ms, PointerPhase::Move)
    }

    pub const fn up(id: u32, x: f32, y: f32, t_ms: u64) -> Self {
        Self::new(PointerId(id), Point::new(x, y), t_ms, PointerPhase::Up)
    }

    pub const fn cancel(id: u32, x: f32, y: f32, t_ms: u64) -> Self {
        Self::new(PointerId(id), Point::new(x, y), t_ms, PointerPhase::Cancel)
    }
}
