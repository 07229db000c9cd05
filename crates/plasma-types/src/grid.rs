// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Grid
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Structured-grid descriptors and field values.
//!
//! Every field carries its [`GridShape`], laid out as `(batch, z, y, x)`.
//! The per-slice 2D machinery works on a [`SliceStack`], which is the same
//! data with the field-aligned `z` axis folded into the batch axis:
//! `(batch·z, y, x)`. [`Field::fold_parallel`] and [`SliceStack::unfold`]
//! are the only ways between the two and both check element counts.

use ndarray::{Array3, Array4};
use serde::{Deserialize, Serialize};

use crate::error::{PlasmaError, PlasmaResult};

/// Boundary kind of one grid axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Boundary {
    Periodic,
    /// Homogeneous Dirichlet ghost cells.
    Open,
}

/// Logical shape of a field: `(batch, z, y, x)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridShape {
    pub batch: usize,
    pub nz: usize,
    pub ny: usize,
    pub nx: usize,
}

impl GridShape {
    pub fn new(batch: usize, nz: usize, ny: usize, nx: usize) -> PlasmaResult<Self> {
        if batch == 0 || nz == 0 || ny == 0 || nx == 0 {
            return Err(PlasmaError::ConfigError(format!(
                "Grid extents must be >= 1, got (batch={batch}, nz={nz}, ny={ny}, nx={nx})"
            )));
        }
        Ok(GridShape { batch, nz, ny, nx })
    }

    /// A single 2D plane: `batch = nz = 1`.
    pub fn planar(ny: usize, nx: usize) -> PlasmaResult<Self> {
        Self::new(1, 1, ny, nx)
    }

    pub fn dim(&self) -> (usize, usize, usize, usize) {
        (self.batch, self.nz, self.ny, self.nx)
    }

    pub fn len(&self) -> usize {
        self.batch * self.nz * self.ny * self.nx
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of 2D slices once `z` is folded into the batch axis.
    pub fn slices(&self) -> usize {
        self.batch * self.nz
    }

    /// Dimensions of the folded stack: `(batch·z, y, x)`.
    pub fn stack_dim(&self) -> (usize, usize, usize) {
        (self.slices(), self.ny, self.nx)
    }

    pub fn is_planar(&self) -> bool {
        self.nz == 1
    }
}

/// Perpendicular `(y, x)` geometry handed to the elliptic solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub ny: usize,
    pub nx: usize,
    pub spacing: f64,
    /// Boundary kinds of the `[y, x]` axes.
    pub boundary: [Boundary; 2],
}

impl Plane {
    pub fn is_periodic(&self) -> bool {
        self.boundary.iter().all(|b| *b == Boundary::Periodic)
    }
}

/// Grid resolution, spacing and per-axis boundary kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub shape: GridShape,
    /// Perpendicular grid spacing `d` (shared by `y` and `x`).
    pub spacing: f64,
    /// Grid spacing along the field-aligned `z` axis.
    pub parallel_spacing: f64,
    /// Boundary kinds of the `[z, y, x]` axes.
    pub boundary: [Boundary; 3],
}

impl Domain {
    /// Fully periodic domain with isotropic spacing.
    pub fn new(shape: GridShape, spacing: f64) -> PlasmaResult<Self> {
        check_spacing("spacing", spacing)?;
        Ok(Domain {
            shape,
            spacing,
            parallel_spacing: spacing,
            boundary: [Boundary::Periodic; 3],
        })
    }

    pub fn with_parallel_spacing(mut self, parallel_spacing: f64) -> PlasmaResult<Self> {
        check_spacing("parallel_spacing", parallel_spacing)?;
        self.parallel_spacing = parallel_spacing;
        Ok(self)
    }

    pub fn with_boundary(mut self, boundary: [Boundary; 3]) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn plane(&self) -> Plane {
        Plane {
            ny: self.shape.ny,
            nx: self.shape.nx,
            spacing: self.spacing,
            boundary: [self.boundary[1], self.boundary[2]],
        }
    }

    /// Physical box lengths `[Lz, Ly, Lx]`.
    pub fn extents(&self) -> [f64; 3] {
        [
            self.shape.nz as f64 * self.parallel_spacing,
            self.shape.ny as f64 * self.spacing,
            self.shape.nx as f64 * self.spacing,
        ]
    }
}

fn check_spacing(name: &str, value: f64) -> PlasmaResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PlasmaError::ConfigError(format!(
            "{name} must be finite and > 0, got {value}"
        )));
    }
    Ok(())
}

fn shape_error(context: &'static str, expected: &[usize], found: &[usize]) -> PlasmaError {
    PlasmaError::ShapeMismatch {
        context,
        expected: expected.to_vec(),
        found: found.to_vec(),
    }
}

/// Dense scalar field over a `(batch, z, y, x)` grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    shape: GridShape,
    data: Array4<f64>,
}

impl Field {
    pub fn zeros(shape: GridShape) -> Self {
        Field {
            shape,
            data: Array4::zeros(shape.dim()),
        }
    }

    pub fn from_array(shape: GridShape, data: Array4<f64>) -> PlasmaResult<Self> {
        let (b, z, y, x) = shape.dim();
        if data.shape() != [b, z, y, x] {
            return Err(shape_error("Field::from_array", &[b, z, y, x], data.shape()));
        }
        Ok(Field { shape, data })
    }

    pub fn from_shape_fn<F>(shape: GridShape, f: F) -> Self
    where
        F: FnMut((usize, usize, usize, usize)) -> f64,
    {
        Field {
            shape,
            data: Array4::from_shape_fn(shape.dim(), f),
        }
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn data(&self) -> &Array4<f64> {
        &self.data
    }

    pub fn into_data(self) -> Array4<f64> {
        self.data
    }

    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0_f64, |m, v| m.max(v.abs()))
    }

    pub fn sum(&self) -> f64 {
        self.data.sum()
    }

    /// Elementwise combination of two fields of identical shape.
    pub fn zip_with<F>(&self, other: &Field, mut f: F) -> PlasmaResult<Field>
    where
        F: FnMut(f64, f64) -> f64,
    {
        if self.shape != other.shape {
            return Err(shape_error(
                "Field::zip_with",
                self.data.shape(),
                other.data.shape(),
            ));
        }
        let mut data = self.data.clone();
        data.zip_mut_with(&other.data, |a, &b| *a = f(*a, b));
        Ok(Field {
            shape: self.shape,
            data,
        })
    }

    /// Fold `z` into the batch axis: `(B, Z, Y, X) → (B·Z, Y, X)`.
    ///
    /// Values keep their logical (row-major) order, so slice `b·Z + z` of
    /// the stack is plane `(b, z)` of the field.
    pub fn fold_parallel(&self) -> PlasmaResult<SliceStack> {
        let dim = self.shape.stack_dim();
        let data = self
            .data
            .to_shape(dim)
            .map_err(|_| {
                shape_error(
                    "Field::fold_parallel",
                    &[dim.0, dim.1, dim.2],
                    self.data.shape(),
                )
            })?
            .into_owned();
        Ok(SliceStack {
            origin: self.shape,
            data,
        })
    }
}

/// Batch of independent 2D slices `(K, Y, X)` remembering the field shape
/// it was folded from.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceStack {
    origin: GridShape,
    data: Array3<f64>,
}

impl SliceStack {
    pub fn new(origin: GridShape, data: Array3<f64>) -> PlasmaResult<Self> {
        let (k, y, x) = origin.stack_dim();
        if data.shape() != [k, y, x] {
            return Err(shape_error("SliceStack::new", &[k, y, x], data.shape()));
        }
        Ok(SliceStack { origin, data })
    }

    pub fn zeros(origin: GridShape) -> Self {
        SliceStack {
            origin,
            data: Array3::zeros(origin.stack_dim()),
        }
    }

    /// New stack with the same origin shape and different values.
    pub fn with_data(&self, data: Array3<f64>) -> PlasmaResult<Self> {
        Self::new(self.origin, data)
    }

    pub fn origin(&self) -> GridShape {
        self.origin
    }

    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }

    pub fn into_data(self) -> Array3<f64> {
        self.data
    }

    pub fn slices(&self) -> usize {
        self.data.dim().0
    }

    /// Inverse of [`Field::fold_parallel`].
    pub fn unfold(self) -> PlasmaResult<Field> {
        let (b, z, y, x) = self.origin.dim();
        let found = self.data.shape().to_vec();
        let data = self
            .data
            .into_shape_clone((b, z, y, x))
            .map_err(|_| shape_error("SliceStack::unfold", &[b, z, y, x], &found))?;
        Ok(Field {
            shape: self.origin,
            data,
        })
    }
}
