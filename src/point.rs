//! Spatial points, qualified by an integer Spatial Reference System
//! Identifier (SRID).

use std::fmt;

/// A 2D or 3D point in the coordinate system named by `srid`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub srid: i64,
    pub coordinates: Vec<f64>,
}

impl Point {
    /// WGS-84 geographic, 2D.
    pub const SRID_WGS84_2D: i64 = 4326;
    /// WGS-84 geographic, 3D.
    pub const SRID_WGS84_3D: i64 = 4979;
    /// Cartesian, 2D.
    pub const SRID_CARTESIAN_2D: i64 = 7203;
    /// Cartesian, 3D.
    pub const SRID_CARTESIAN_3D: i64 = 9157;

    pub fn new(srid: i64, coordinates: Vec<f64>) -> Option<Self> {
        if coordinates.len() == 2 || coordinates.len() == 3 {
            Some(Point { srid, coordinates })
        } else {
            None
        }
    }

    pub fn wgs84(x: f64, y: f64) -> Self {
        Point {
            srid: Self::SRID_WGS84_2D,
            coordinates: vec![x, y],
        }
    }

    pub fn cartesian(x: f64, y: f64) -> Self {
        Point {
            srid: Self::SRID_CARTESIAN_2D,
            coordinates: vec![x, y],
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}(", self.srid)?;
        for (i, c) in self.coordinates.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, ")")
    }
}
