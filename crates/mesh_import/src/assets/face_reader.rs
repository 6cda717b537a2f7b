//! Face line reader and fan triangulation
//!
//! A face line lists corners as `v`, `v/t`, `v/t/n` or `v//n`. Indices are
//! kept exactly as written (1-based); an empty or absent segment becomes
//! [`NO_INDEX`]. Polygons are split into a fan around the first corner, which
//! is only correct for convex, planar polygons.

use super::obj_loader::{ModelFace, NO_INDEX};
use super::{ImportError, Result};

/// One corner of a face line, alive only while that line is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceCorner {
    /// Position index
    pub vertex: i32,
    /// Texture coordinate index
    pub tex_coord: i32,
    /// Normal index
    pub normal: i32,
}

impl Default for FaceCorner {
    fn default() -> Self {
        Self {
            vertex: NO_INDEX,
            tex_coord: NO_INDEX,
            normal: NO_INDEX,
        }
    }
}

impl FaceCorner {
    /// Parse a corner token such as `3`, `3/7`, `3/7/2` or `3//2`
    pub fn parse(token: &str, line: usize) -> Result<Self> {
        let mut segments = token.split('/');
        let mut corner = Self::default();

        corner.vertex = match segments.next() {
            Some(segment) if !segment.is_empty() => parse_index(segment, token, line)?,
            _ => {
                return Err(ImportError::Parse {
                    line,
                    message: format!("face corner '{token}' has no position index"),
                })
            }
        };

        if let Some(segment) = segments.next().filter(|s| !s.is_empty()) {
            corner.tex_coord = parse_index(segment, token, line)?;
        }
        if let Some(segment) = segments.next().filter(|s| !s.is_empty()) {
            corner.normal = parse_index(segment, token, line)?;
        }

        Ok(corner)
    }
}

fn parse_index(segment: &str, token: &str, line: usize) -> Result<i32> {
    segment.parse().map_err(|_| ImportError::Parse {
        line,
        message: format!("invalid index '{segment}' in face corner '{token}'"),
    })
}

/// Read the corners of one face line and append its fan triangles to `faces`
///
/// Returns the number of triangles added. Fewer than three corners is an
/// error; nothing is appended in that case.
pub fn read_face<'a>(
    tokens: impl Iterator<Item = &'a str>,
    line: usize,
    faces: &mut Vec<ModelFace>,
) -> Result<usize> {
    let corners = tokens
        .map(|token| FaceCorner::parse(token, line))
        .collect::<Result<Vec<_>>>()?;

    if corners.len() < 3 {
        return Err(ImportError::InvalidFace {
            line,
            corners: corners.len(),
        });
    }

    let first = corners[0];
    faces.extend(
        corners
            .windows(2)
            .skip(1)
            .map(|pair| ModelFace::from_corners(&first, &pair[0], &pair[1])),
    );

    Ok(corners.len() - 2)
}
