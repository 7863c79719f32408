use serde::{Deserialize, Serialize};

/// A labelled object placed in the scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: String,
    #[serde(rename = "name")]
    pub display_name: String,
}

impl SceneObject {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Where an object sits, in percent of the scene panel (origin top left, y down).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectPosition {
    #[serde(rename = "id")]
    pub object_id: String,
    pub x: f64,
    pub y: f64,
}

impl ObjectPosition {
    pub fn new(object_id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            object_id: object_id.into(),
            x,
            y,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// 2-D point / vector in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Scalar 2-D cross product `self.x * other.y - self.y * other.x`.
    pub fn cross(self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalized(self) -> Point {
        let len = self.length();
        Point::new(self.x / len, self.y / len)
    }
}
