use super::{Canonical, Fields, decode_list, number_to_f64, number_to_i32};
use crate::error::DecodeError;
use crate::value::Value;

// -------------------------------- Vec3i ----------------------------------- //

/// Integer offset / position, serialized as `[x, y, z]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vec3i {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Vec3i {
    pub const ZERO: Vec3i = Vec3i { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Largest absolute component, used by clamped offset codecs.
    pub fn max_abs(&self) -> u32 {
        self.x
            .unsigned_abs()
            .max(self.y.unsigned_abs())
            .max(self.z.unsigned_abs())
    }
}

impl Canonical for Vec3i {
    const KIND: &'static str = "vector";

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let xs = decode_list(value, number_to_i32)?;
        match xs.as_slice() {
            [x, y, z] => Ok(Self::new(*x, *y, *z)),
            _ => Err(DecodeError::invalid(
                Self::KIND,
                format!("expected 3 components, found {}", xs.len()),
            )),
        }
    }

    fn encode(&self) -> Value {
        Value::Array(vec![self.x.into(), self.y.into(), self.z.into()])
    }
}

// -------------------------------- Vec3f ----------------------------------- //

/// Float vector, serialized as `[x, y, z]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3f {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3f {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl Canonical for Vec3f {
    const KIND: &'static str = "float vector";

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let xs = decode_list(value, number_to_f64)?;
        match xs.as_slice() {
            [x, y, z] => Ok(Self::new(*x, *y, *z)),
            _ => Err(DecodeError::invalid(
                Self::KIND,
                format!("expected 3 components, found {}", xs.len()),
            )),
        }
    }

    fn encode(&self) -> Value {
        Value::Array(vec![self.x.into(), self.y.into(), self.z.into()])
    }
}

// ------------------------------ Direction --------------------------------- //

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Direction::Down => "down",
            Direction::Up => "up",
            Direction::North => "north",
            Direction::South => "south",
            Direction::West => "west",
            Direction::East => "east",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Down | Direction::Up)
    }
}

impl Canonical for Direction {
    const KIND: &'static str = "direction";

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let name = value
            .as_str()
            .ok_or_else(|| DecodeError::expected("string", value))?;
        Self::from_name(name)
            .ok_or_else(|| DecodeError::invalid(Self::KIND, format!("unknown direction `{name}`")))
    }

    fn encode(&self) -> Value {
        Value::from(self.name())
    }
}

// ------------------------------ Heightmap --------------------------------- //

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Heightmap {
    WorldSurfaceWg,
    WorldSurface,
    OceanFloorWg,
    OceanFloor,
    MotionBlocking,
    MotionBlockingNoLeaves,
}

impl Heightmap {
    pub const ALL: [Heightmap; 6] = [
        Heightmap::WorldSurfaceWg,
        Heightmap::WorldSurface,
        Heightmap::OceanFloorWg,
        Heightmap::OceanFloor,
        Heightmap::MotionBlocking,
        Heightmap::MotionBlockingNoLeaves,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Heightmap::WorldSurfaceWg => "WORLD_SURFACE_WG",
            Heightmap::WorldSurface => "WORLD_SURFACE",
            Heightmap::OceanFloorWg => "OCEAN_FLOOR_WG",
            Heightmap::OceanFloor => "OCEAN_FLOOR",
            Heightmap::MotionBlocking => "MOTION_BLOCKING",
            Heightmap::MotionBlockingNoLeaves => "MOTION_BLOCKING_NO_LEAVES",
        }
    }
}

impl Canonical for Heightmap {
    const KIND: &'static str = "heightmap";

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let name = value
            .as_str()
            .ok_or_else(|| DecodeError::expected("string", value))?;
        Self::ALL
            .into_iter()
            .find(|h| h.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| DecodeError::invalid(Self::KIND, format!("unknown heightmap `{name}`")))
    }

    fn encode(&self) -> Value {
        Value::from(self.name())
    }
}

// ------------------------------- IntRange --------------------------------- //

/// Inclusive integer interval. Encodes as an object, decodes from an object or `[a, b]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntRange {
    pub min_inclusive: i32,
    pub max_inclusive: i32,
}

impl IntRange {
    pub fn new(min_inclusive: i32, max_inclusive: i32) -> Self {
        Self {
            min_inclusive,
            max_inclusive,
        }
    }
}

impl Canonical for IntRange {
    const KIND: &'static str = "int range";

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let range = match value {
            Value::Array(_) => match decode_list(value, number_to_i32)?.as_slice() {
                [a, b] => Self::new(*a, *b),
                _ => return Err(DecodeError::invalid(Self::KIND, "expected [min, max]")),
            },
            _ => {
                let fields = Fields::of(Self::KIND, value)?;
                Self::new(fields.i32("min_inclusive")?, fields.i32("max_inclusive")?)
            }
        };
        if range.min_inclusive > range.max_inclusive {
            return Err(DecodeError::invalid(
                Self::KIND,
                format!("min {} > max {}", range.min_inclusive, range.max_inclusive),
            ));
        }
        Ok(range)
    }

    fn encode(&self) -> Value {
        Value::object([
            ("min_inclusive", Value::from(self.min_inclusive)),
            ("max_inclusive", Value::from(self.max_inclusive)),
        ])
    }
}
