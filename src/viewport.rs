//! Conversion between simulation space and a fixed-size viewport.

use nalgebra::Vector2;

use crate::error::{Error, Result};

/// The drawing area a layout is fitted into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: f64,
    height: f64,
}

impl Viewport {
    /// Creates a viewport, both dimensions must be positive and finite.
    pub fn new(width: f64, height: f64) -> Result<Self> {
        let valid = |d: f64| d.is_finite() && d > 0.0;

        if valid(width) && valid(height) {
            Ok(Self { width, height })
        } else {
            Err(Error::InvalidViewport { width, height })
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns `width * height`, the area the ideal edge length is derived from.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// An axis-aligned box in simulation space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoundingBox {
    /// A box containing nothing, every [`BoundingBox::include`] call grows it.
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Computes the box around a set of points.
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra::Vector2;
    /// use graphsim::viewport::BoundingBox;
    ///
    /// let bounds = BoundingBox::around([Vector2::new(1.0, 5.0), Vector2::new(-2.0, 3.0)]);
    ///
    /// assert_eq!(bounds.width(), 3.0);
    /// assert_eq!(bounds.height(), 2.0);
    /// ```
    pub fn around(points: impl IntoIterator<Item = Vector2<f64>>) -> Self {
        points.into_iter().fold(Self::empty(), |mut bounds, point| {
            bounds.include(point);
            bounds
        })
    }

    /// Grows the box so it contains `point`.
    pub fn include(&mut self, point: Vector2<f64>) {
        self.min_x = self.min_x.min(point.x);
        self.max_x = self.max_x.max(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_y = self.max_y.max(point.y);
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Returns whether `point` lies inside the box, edges included.
    pub fn contains(&self, point: Vector2<f64>) -> bool {
        (self.min_x..=self.max_x).contains(&point.x) && (self.min_y..=self.max_y).contains(&point.y)
    }
}

/// Maps simulation coordinates into a viewport and back, with a uniform scale on both axes.
///
/// The bounding box is fitted into the viewport shrunk by `margin` on every side, the margin
/// being the largest rendered node radius, so nodes on the edge of the box stay fully visible.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    origin: Vector2<f64>,
    margin: f64,
    scale: f64,
}

impl CoordinateMapper {
    /// Creates a mapper fitting `bounds` into `viewport`.
    ///
    /// An axis of zero extent doesn't constrain the scale; when both are degenerate (or the box is
    /// empty) the scale is 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra::Vector2;
    /// use graphsim::viewport::{BoundingBox, CoordinateMapper, Viewport};
    ///
    /// let viewport = Viewport::new(200.0, 100.0)?;
    /// let bounds = BoundingBox::around([Vector2::new(0.0, 0.0), Vector2::new(10.0, 10.0)]);
    /// let mapper = CoordinateMapper::new(viewport, bounds, 0.0);
    ///
    /// // The height is the tighter constraint.
    /// assert_eq!(mapper.scale(), 10.0);
    /// assert_eq!(mapper.to_viewport(Vector2::new(10.0, 10.0)), Vector2::new(100.0, 100.0));
    /// # Ok::<(), graphsim::error::Error>(())
    /// ```
    pub fn new(viewport: Viewport, bounds: BoundingBox, margin: f64) -> Self {
        let margin = margin.max(0.0);

        if bounds.is_empty() {
            return Self {
                origin: Vector2::zeros(),
                margin,
                scale: 1.0,
            };
        }

        // Leave at least one unit of drawable space, whatever the margin.
        let available_width = (viewport.width() - 2.0 * margin).max(1.0);
        let available_height = (viewport.height() - 2.0 * margin).max(1.0);

        let fit = |available: f64, extent: f64| {
            if extent > 0.0 {
                available / extent
            } else {
                f64::INFINITY
            }
        };

        let scale = fit(available_width, bounds.width()).min(fit(available_height, bounds.height()));

        Self {
            origin: Vector2::new(bounds.min_x, bounds.min_y),
            margin,
            scale: if scale.is_finite() { scale } else { 1.0 },
        }
    }

    /// Viewport units per simulation unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Viewport units kept free on every side.
    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Maps a simulation point into the viewport.
    pub fn to_viewport(&self, point: Vector2<f64>) -> Vector2<f64> {
        (point - self.origin).scale(self.scale).add_scalar(self.margin)
    }

    /// Maps a viewport point back into simulation space.
    pub fn to_simulation(&self, point: Vector2<f64>) -> Vector2<f64> {
        point.add_scalar(-self.margin).unscale(self.scale) + self.origin
    }
}
