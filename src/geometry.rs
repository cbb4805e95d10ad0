use std::ops::Sub;

/// Point in virtual-screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Sub for Coordinate {
    type Output = Coordinate;

    fn sub(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Screen rectangle with exclusive right/bottom edges, as Win32 reports
/// work areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }
}

/// Keep a box of `size` whose top-left is `desired` inside `work_area`.
///
/// An empty or missing work area leaves `desired` untouched. When the box is
/// larger than the area the right/bottom edge wins, so the result never panics.
pub fn clamp_to_work_area(desired: Coordinate, size: Size, work_area: Option<Rect>) -> Coordinate {
    let Some(area) = work_area.filter(|area| !area.is_empty()) else {
        return desired;
    };

    Coordinate {
        x: desired.x.max(area.left).min(area.right - size.width),
        y: desired.y.max(area.top).min(area.bottom - size.height),
    }
}
