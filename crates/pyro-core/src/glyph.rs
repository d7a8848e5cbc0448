//! Text rasterization into point clouds
//!
//! Character and text behaviors turn a string into particles. The heavy
//! lifting (fonts, anti-aliasing) belongs to a [`Rasterizer`]; the bundled
//! [`GridRasterizer`] is a dependency-free stand-in good enough for demos
//! and tests.

use glam::DVec3;

/// Points of rasterized text and their centroid
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointCloud {
    pub points: Vec<DVec3>,
    pub centroid: DVec3,
}

impl PointCloud {
    /// Build a cloud, computing the centroid (zero when empty)
    pub fn new(points: Vec<DVec3>) -> Self {
        let centroid = if points.is_empty() {
            DVec3::ZERO
        } else {
            points.iter().copied().sum::<DVec3>() / points.len() as f64
        };
        Self { points, centroid }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Turns text into a point cloud
pub trait Rasterizer {
    fn rasterize(&self, text: &str) -> PointCloud;
}

/// Rasterizes every visible character as a solid 3x5 cell
///
/// Text is laid out on the y/-z plane: y points up and successive
/// characters advance along -z, one blank column apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridRasterizer {
    /// Distance between neighbouring points
    pub spacing: f64,
}

impl GridRasterizer {
    const COLUMNS: usize = 3;
    const ROWS: usize = 5;

    pub fn new(spacing: f64) -> Self {
        Self { spacing }
    }

    /// Points produced per visible character
    pub fn points_per_glyph() -> usize {
        Self::COLUMNS * Self::ROWS
    }
}

impl Default for GridRasterizer {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl Rasterizer for GridRasterizer {
    fn rasterize(&self, text: &str) -> PointCloud {
        let mut points = Vec::new();
        for (cell, c) in text.chars().enumerate() {
            if c.is_whitespace() {
                continue;
            }
            let left = cell * (Self::COLUMNS + 1);
            for column in 0..Self::COLUMNS {
                for row in 0..Self::ROWS {
                    points.push(DVec3::new(
                        0.0,
                        (Self::ROWS - 1 - row) as f64 * self.spacing,
                        -((left + column) as f64) * self.spacing,
                    ));
                }
            }
        }
        PointCloud::new(points)
    }
}
