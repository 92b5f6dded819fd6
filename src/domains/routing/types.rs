use serde::{Deserialize, Serialize};

/// Real-valued world position, used for area centers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position2D {
    pub x: f64,
    pub y: f64,
}

/// Integer world coordinate of an area corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corner {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaBounds {
    pub start: Corner,
    pub end: Corner,
}

impl AreaBounds {
    pub fn min_x(&self) -> i32 {
        self.start.x.min(self.end.x)
    }
    pub fn max_x(&self) -> i32 {
        self.start.x.max(self.end.x)
    }
    pub fn min_y(&self) -> i32 {
        self.start.y.min(self.end.y)
    }
    pub fn max_y(&self) -> i32 {
        self.start.y.max(self.end.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaKind {
    #[default]
    Booth,
    Obstacle,
}

/// A named rectangular region of the venue, e.g. an exhibitor booth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueArea {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: AreaKind,
    pub area: AreaBounds,
}

impl VenueArea {
    pub fn new(
        name: impl Into<String>,
        kind: AreaKind,
        start: (i32, i32),
        end: (i32, i32),
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind,
            area: AreaBounds {
                start: Corner { x: start.0, y: start.1 },
                end: Corner { x: end.0, y: end.1 },
            },
        }
    }

    pub fn booth(name: impl Into<String>, start: (i32, i32), end: (i32, i32)) -> Self {
        Self::new(name, AreaKind::Booth, start, end)
    }

    pub fn obstacle(name: impl Into<String>, start: (i32, i32), end: (i32, i32)) -> Self {
        Self::new(name, AreaKind::Obstacle, start, end)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn center(&self) -> Position2D {
        Position2D {
            x: (self.area.start.x as f64 + self.area.end.x as f64) / 2.0,
            y: (self.area.start.y as f64 + self.area.end.y as f64) / 2.0,
        }
    }

    /// Whether `name` refers to this area (trimmed, case-insensitive).
    pub fn matches(&self, name: &str) -> bool {
        normalize_name(&self.name) == normalize_name(name)
    }
}

pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A cell of the occupancy grid, `x` is the column and `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn manhattan(&self, other: &GridCell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn is_adjacent(&self, other: &GridCell) -> bool {
        self.manhattan(other) == 1
    }
}

impl From<(i32, i32)> for GridCell {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<GridCell> for (i32, i32) {
    fn from(cell: GridCell) -> Self {
        (cell.x, cell.y)
    }
}

impl std::fmt::Display for GridCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
