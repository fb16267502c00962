//! Search windows over the (operations, engineer, management) space.

use crate::error::OptimizerError;

/// Points per dimension an auto-stepped pass aims for.
pub const TARGET_POINTS_PER_DIMENSION: u32 = 60;

/// Inclusive integer range sampled every `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimension {
    pub min: u32,
    pub max: u32,
    pub step: u32,
}

impl Dimension {
    /// A dimension with an explicit step.
    ///
    /// # Errors
    ///
    /// [`OptimizerError::InvalidWindow`] when `min > max` or `step == 0`.
    pub fn new(min: u32, max: u32, step: u32) -> Result<Self, OptimizerError> {
        let dim = Self { min, max, step };
        dim.validate()?;
        Ok(dim)
    }

    /// A dimension stepped by [`auto_step`](Self::auto_step).
    pub fn auto(min: u32, max: u32) -> Result<Self, OptimizerError> {
        if min > max {
            return Err(OptimizerError::InvalidWindow(format!(
                "min {min} exceeds max {max}"
            )));
        }
        Ok(Self {
            min,
            max,
            step: Self::auto_step(max - min),
        })
    }

    /// `max(1, floor(width / 60))`.
    pub fn auto_step(width: u32) -> u32 {
        (width / TARGET_POINTS_PER_DIMENSION).max(1)
    }

    pub fn validate(&self) -> Result<(), OptimizerError> {
        if self.min > self.max {
            return Err(OptimizerError::InvalidWindow(format!(
                "min {} exceeds max {}",
                self.min, self.max
            )));
        }
        if self.step == 0 {
            return Err(OptimizerError::InvalidWindow("step must be at least 1".into()));
        }
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.max - self.min
    }

    /// Sampled values, ascending.
    pub fn points(&self) -> impl Iterator<Item = u32> {
        (self.min..=self.max).step_by(self.step.max(1) as usize)
    }

    pub fn point_count(&self) -> usize {
        (self.width() / self.step.max(1)) as usize + 1
    }

    /// `[center - radius, center + radius]` clamped to `bounds`, auto-stepped.
    pub fn around(center: u32, radius: u32, bounds: &Dimension) -> Self {
        let center = center.clamp(bounds.min, bounds.max);
        let min = center.saturating_sub(radius).max(bounds.min);
        let max = center.saturating_add(radius).min(bounds.max);
        Self {
            min,
            max,
            step: Self::auto_step(max - min),
        }
    }

    /// Splits the sampled points into at most `parts` contiguous chunks.
    ///
    /// Every chunk keeps this dimension's step, so the union of the chunks
    /// samples exactly the same points. Earlier chunks take the remainder.
    pub fn split(&self, parts: usize) -> Vec<Dimension> {
        let count = self.point_count();
        let parts = parts.clamp(1, count);
        let base = count / parts;
        let extra = count % parts;
        let mut chunks = Vec::with_capacity(parts);
        let mut first = 0usize;
        for i in 0..parts {
            let len = base + usize::from(i < extra);
            let last = first + len - 1;
            chunks.push(Dimension {
                min: self.min + first as u32 * self.step,
                max: self.min + last as u32 * self.step,
                step: self.step,
            });
            first += len;
        }
        chunks
    }
}

/// One grid pass: a [`Dimension`] per searched job.
///
/// Business is never searched; it takes whatever headcount remains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RefinementWindow {
    pub operations: Dimension,
    pub engineer: Dimension,
    pub management: Dimension,
}

impl RefinementWindow {
    pub fn new(
        operations: Dimension,
        engineer: Dimension,
        management: Dimension,
    ) -> Result<Self, OptimizerError> {
        let window = Self {
            operations,
            engineer,
            management,
        };
        window.validate()?;
        Ok(window)
    }

    /// Every dimension spans `0..=headcount` with an auto step.
    pub fn full(headcount: u32) -> Self {
        let dim = Dimension {
            min: 0,
            max: headcount,
            step: Dimension::auto_step(headcount),
        };
        Self {
            operations: dim,
            engineer: dim,
            management: dim,
        }
    }

    pub fn validate(&self) -> Result<(), OptimizerError> {
        self.operations.validate()?;
        self.engineer.validate()?;
        self.management.validate()
    }

    pub fn dimensions(&self) -> [Dimension; 3] {
        [self.operations, self.engineer, self.management]
    }

    /// Coarsest step over all dimensions.
    pub fn max_step(&self) -> u32 {
        self.dimensions().iter().map(|d| d.step).max().unwrap_or(1)
    }

    pub fn point_count(&self) -> usize {
        self.dimensions().iter().map(Dimension::point_count).product()
    }

    /// Window of radius `step` around `best` in every dimension, clamped to
    /// `bounds`.
    pub fn refined_around(&self, best: [u32; 3], bounds: &RefinementWindow) -> Self {
        let [ops, eng, mgmt] = best;
        Self {
            operations: Dimension::around(ops, self.operations.step, &bounds.operations),
            engineer: Dimension::around(eng, self.engineer.step, &bounds.engineer),
            management: Dimension::around(mgmt, self.management.step, &bounds.management),
        }
    }

    /// Splits the operations dimension into contiguous sub-windows.
    pub fn split_operations(&self, parts: usize) -> Vec<RefinementWindow> {
        self.operations
            .split(parts)
            .into_iter()
            .map(|operations| RefinementWindow {
                operations,
                ..*self
            })
            .collect()
    }
}
