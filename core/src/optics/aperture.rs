//! Pupil-transmittance grids.
//!
//! An [`Aperture`] is a 2D grid of transmittance samples with an optical-axis
//! index, a radius and a central obstruction radius (both in grid samples),
//! and the physical length of one sample. The sample spacing is the only
//! place where grid units turn into metres, so callers that describe their
//! pupil in millimetres keep the default of `1e-3`.

use crate::prelude::{ensure_positive, GridIndex, OpticsError, OpticsResult};
use ndarray::{s, Array2};
use std::ops::Index;

/// Transmittance of a fully open sample in generated masks.
pub const FULL_TRANSMITTANCE: f64 = 255.0;

/// One grid sample per millimetre.
pub const DEFAULT_SAMPLE_SPACING: f64 = 1e-3;

const DEFAULT_GRID_SIDE: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Aperture {
    array: Array2<f64>,
    center: GridIndex,
    radius: f64,
    obstruction_radius: f64,
    sample_spacing: f64,
}

/// Attributes replaced by [`Aperture::copy_with`]; `None` keeps the original.
#[derive(Debug, Clone, Default)]
pub struct ApertureOverrides {
    pub array: Option<Array2<f64>>,
    pub center: Option<GridIndex>,
    pub radius: Option<f64>,
    pub obstruction_radius: Option<f64>,
    pub sample_spacing: Option<f64>,
}

impl Default for Aperture {
    fn default() -> Self {
        Self {
            array: Array2::zeros((DEFAULT_GRID_SIDE, DEFAULT_GRID_SIDE)),
            center: (DEFAULT_GRID_SIDE / 2, DEFAULT_GRID_SIDE / 2),
            radius: 0.0,
            obstruction_radius: 0.0,
            sample_spacing: DEFAULT_SAMPLE_SPACING,
        }
    }
}

impl Aperture {
    /// Wraps a caller-supplied grid. The center is the integer midpoint
    /// `(rows / 2, cols / 2)`; the radii are stored as given.
    pub fn new(array: Array2<f64>, radius: f64, obstruction_radius: f64) -> OpticsResult<Self> {
        let center = midpoint(&array)?;
        let aperture = Self {
            array,
            center,
            radius,
            obstruction_radius,
            sample_spacing: DEFAULT_SAMPLE_SPACING,
        };
        aperture.validate()?;
        Ok(aperture)
    }

    /// Circular pupil of `radius` samples with an optional central
    /// obstruction.
    ///
    /// The grid is square with side `grid_size`, or `2 * ceil(radius) + 1`
    /// when no size is given, centered on `side / 2`. Samples on or inside
    /// the radius are fully open; when `obstruction_radius > 0`, samples on
    /// or inside it are blocked again.
    pub fn disk(
        radius: f64,
        obstruction_radius: f64,
        grid_size: Option<usize>,
    ) -> OpticsResult<Self> {
        validate_radii(radius, obstruction_radius)?;
        let side = match grid_size {
            Some(side) => Some(side),
            None => (radius.ceil() as usize)
                .checked_mul(2)
                .and_then(|diameter| diameter.checked_add(1)),
        };
        let (side, _) = checked_shape(side, side)?;
        if side == 0 {
            return Err(OpticsError::InvalidGeometry(
                "disk grid needs at least one sample".into(),
            ));
        }

        let mid = side / 2;
        let outer = radius * radius;
        let inner = obstruction_radius * obstruction_radius;
        let array = Array2::from_shape_fn((side, side), |(i, j)| {
            let di = i as f64 - mid as f64;
            let dj = j as f64 - mid as f64;
            let distance_sq = di * di + dj * dj;
            let blocked = obstruction_radius > 0.0 && distance_sq <= inner;
            if distance_sq <= outer && !blocked {
                FULL_TRANSMITTANCE
            } else {
                0.0
            }
        });

        Ok(Self {
            array,
            center: (mid, mid),
            radius,
            obstruction_radius,
            sample_spacing: DEFAULT_SAMPLE_SPACING,
        })
    }

    /// Independent copy with the given attributes replaced.
    pub fn copy_with(&self, overrides: ApertureOverrides) -> OpticsResult<Self> {
        let copy = Self {
            array: overrides.array.unwrap_or_else(|| self.array.clone()),
            center: overrides.center.unwrap_or(self.center),
            radius: overrides.radius.unwrap_or(self.radius),
            obstruction_radius: overrides
                .obstruction_radius
                .unwrap_or(self.obstruction_radius),
            sample_spacing: overrides.sample_spacing.unwrap_or(self.sample_spacing),
        };
        copy.validate()?;
        Ok(copy)
    }

    /// New aperture with `margin` zero samples added on every side.
    ///
    /// The optical axis moves with the data, so a midpoint-centered grid
    /// stays midpoint-centered. Radii and sample spacing describe the pupil,
    /// not the grid, and are kept.
    pub fn add_padding(&self, margin: usize) -> OpticsResult<Self> {
        let (rows, cols) = self.array.dim();
        let extra = margin.checked_mul(2);
        let shape = checked_shape(
            extra.and_then(|extra| extra.checked_add(rows)),
            extra.and_then(|extra| extra.checked_add(cols)),
        )?;
        let mut array = Array2::zeros(shape);
        array
            .slice_mut(s![margin..margin + rows, margin..margin + cols])
            .assign(&self.array);

        Ok(Self {
            array,
            center: (self.center.0 + margin, self.center.1 + margin),
            radius: self.radius,
            obstruction_radius: self.obstruction_radius,
            sample_spacing: self.sample_spacing,
        })
    }

    pub fn with_sample_spacing(&self, sample_spacing: f64) -> OpticsResult<Self> {
        self.copy_with(ApertureOverrides {
            sample_spacing: Some(sample_spacing),
            ..Default::default()
        })
    }

    /// Transmittance at `index`.
    pub fn get(&self, index: GridIndex) -> OpticsResult<f64> {
        self.array
            .get(index)
            .copied()
            .ok_or(OpticsError::IndexOutOfBounds {
                index,
                shape: self.array.dim(),
            })
    }

    pub fn array(&self) -> &Array2<f64> {
        &self.array
    }

    pub fn center(&self) -> GridIndex {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn obstruction_radius(&self) -> f64 {
        self.obstruction_radius
    }

    /// Physical length of one grid sample, in metres.
    pub fn sample_spacing(&self) -> f64 {
        self.sample_spacing
    }

    pub fn shape(&self) -> GridIndex {
        self.array.dim()
    }

    pub fn physical_radius(&self) -> f64 {
        self.radius * self.sample_spacing
    }

    /// Side lengths of the grid in metres, as (rows, cols).
    pub fn physical_extent(&self) -> (f64, f64) {
        let (rows, cols) = self.array.dim();
        (
            rows as f64 * self.sample_spacing,
            cols as f64 * self.sample_spacing,
        )
    }

    /// Mean transmittance of the grid relative to a fully open sample.
    pub fn open_fraction(&self) -> f64 {
        self.array.mean().unwrap_or(0.0) / FULL_TRANSMITTANCE
    }

    fn validate(&self) -> OpticsResult<()> {
        let (rows, cols) = self.array.dim();
        if rows == 0 || cols == 0 {
            return Err(OpticsError::InvalidGeometry(format!(
                "aperture grid of shape {:?} is empty",
                (rows, cols)
            )));
        }
        if self.center.0 >= rows || self.center.1 >= cols {
            return Err(OpticsError::InvalidGeometry(format!(
                "center {:?} outside grid of shape {:?}",
                self.center,
                (rows, cols)
            )));
        }
        validate_radii(self.radius, self.obstruction_radius)?;
        ensure_positive("sample spacing", self.sample_spacing)
    }
}

impl Index<GridIndex> for Aperture {
    type Output = f64;

    fn index(&self, index: GridIndex) -> &f64 {
        &self.array[index]
    }
}

fn midpoint(array: &Array2<f64>) -> OpticsResult<GridIndex> {
    let (rows, cols) = array.dim();
    if rows == 0 || cols == 0 {
        return Err(OpticsError::InvalidGeometry(format!(
            "aperture grid of shape {:?} is empty",
            (rows, cols)
        )));
    }
    Ok((rows / 2, cols / 2))
}

// Rejects grid sides that overflowed, or grids too large to address in bytes.
fn checked_shape(rows: Option<usize>, cols: Option<usize>) -> OpticsResult<GridIndex> {
    let addressable = |rows: usize, cols: usize| {
        rows.checked_mul(cols)
            .and_then(|count| count.checked_mul(std::mem::size_of::<f64>()))
            .map_or(false, |bytes| bytes <= isize::MAX as usize)
    };
    match (rows, cols) {
        (Some(rows), Some(cols)) if addressable(rows, cols) => Ok((rows, cols)),
        _ => Err(OpticsError::InvalidGeometry(format!(
            "grid of {:?} x {:?} samples is too large",
            rows, cols
        ))),
    }
}

fn validate_radii(radius: f64, obstruction_radius: f64) -> OpticsResult<()> {
    if !(radius.is_finite() && obstruction_radius.is_finite()) {
        return Err(OpticsError::InvalidGeometry(format!(
            "radii must be finite, got {} and {}",
            radius, obstruction_radius
        )));
    }
    if obstruction_radius < 0.0 || radius < obstruction_radius {
        return Err(OpticsError::InvalidGeometry(format!(
            "expected radius >= obstruction radius >= 0, got {} and {}",
            radius, obstruction_radius
        )));
    }
    Ok(())
}
