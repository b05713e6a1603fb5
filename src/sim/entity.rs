//! Entity model: the player and the obstacles sharing a playfield
//!
//! Coordinates are screen-style: origin at the top-left, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    /// Strict overlap on the horizontal axis (touching edges do not count)
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.left() < other.right() && self.right() > other.left()
    }

    /// Strict overlap on the vertical axis
    pub fn overlaps_y(&self, other: &Rect) -> bool {
        self.top() < other.bottom() && self.bottom() > other.top()
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.overlaps_x(other) && self.overlaps_y(other)
    }
}

/// What happens when the player touches an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleClass {
    /// Ends the attempt
    Blocking,
    /// Grants a forward boost and is consumed
    Bonus,
    /// Harmless scenery
    Neutral,
}

/// Obstacle types across all three levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    Zepto,
    Auto,
    Cow,
    Crowd,
    TeaStall,
    Watchman,
    Police,
    Csk,
}

impl ObstacleKind {
    pub fn class(&self) -> ObstacleClass {
        match self {
            ObstacleKind::TeaStall => ObstacleClass::Bonus,
            ObstacleKind::Watchman => ObstacleClass::Neutral,
            ObstacleKind::Zepto
            | ObstacleKind::Auto
            | ObstacleKind::Cow
            | ObstacleKind::Crowd
            | ObstacleKind::Police
            | ObstacleKind::Csk => ObstacleClass::Blocking,
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.class() == ObstacleClass::Blocking
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Zepto => "zepto",
            ObstacleKind::Auto => "auto",
            ObstacleKind::Cow => "cow",
            ObstacleKind::Crowd => "crowd",
            ObstacleKind::TeaStall => "teastall",
            ObstacleKind::Watchman => "watchman",
            ObstacleKind::Police => "police",
            ObstacleKind::Csk => "csk",
        }
    }

    /// Label shown by text-only frontends
    pub fn label(&self) -> &'static str {
        match self {
            ObstacleKind::Zepto => "Zepto bike",
            ObstacleKind::Auto => "Auto",
            ObstacleKind::Cow => "Cow",
            ObstacleKind::Crowd => "Crowd",
            ObstacleKind::TeaStall => "Tea stall",
            ObstacleKind::Watchman => "Watchman",
            ObstacleKind::Police => "Police",
            ObstacleKind::Csk => "CSK",
        }
    }
}

/// The player avatar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Current lane on lane-based levels
    pub lane: Option<usize>,
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// A moving obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Lane on lane-based levels, `None` where obstacles fall freely
    pub lane: Option<usize>,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Units per second along the level's movement axis
    pub speed: f32,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_overlap_is_strict() {
        let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let touching = Rect::new(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        let inside = Rect::new(Vec2::new(9.0, 9.0), Vec2::new(10.0, 10.0));
        let below = Rect::new(Vec2::new(0.0, 10.0), Vec2::new(10.0, 10.0));

        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(a.overlaps_x(&below));
        assert!(!a.overlaps_y(&below));
    }

    #[test]
    fn test_obstacle_classes() {
        assert_eq!(ObstacleKind::TeaStall.class(), ObstacleClass::Bonus);
        assert_eq!(ObstacleKind::Watchman.class(), ObstacleClass::Neutral);
        for kind in [
            ObstacleKind::Zepto,
            ObstacleKind::Auto,
            ObstacleKind::Cow,
            ObstacleKind::Crowd,
            ObstacleKind::Police,
            ObstacleKind::Csk,
        ] {
            assert!(kind.is_blocking(), "{} should block", kind.as_str());
        }
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ObstacleKind::TeaStall).unwrap();
        assert_eq!(json, "\"teastall\"");
    }
}
