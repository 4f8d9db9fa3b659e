//! Scaling of keyed attributes into node values, edge forces and edge widths.

use std::f64::consts::PI;

/// How promoted attribute values are scaled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Normalization {
    /// Always rescale using the global minimum and maximum.
    #[default]
    Always,
    /// Copy the raw attribute.
    Never,
    /// Copy the raw attribute when every value already lies in `[0, 1]`, rescale otherwise.
    IfOutOfRange,
}

/// Flag-style normalization settings, as handed over by a configuration surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NormalizationFlags {
    pub always: bool,
    pub never: bool,
    pub if_out_of_range: bool,
}

impl NormalizationFlags {
    /// Resolves the flags into a single policy.
    ///
    /// With no flag set this falls back to [`Normalization::Always`]. With several flags set the
    /// first of `always`, `never`, `if_out_of_range` wins. Both cases log a warning.
    ///
    /// # Examples
    ///
    /// ```
    /// use graphsim::normalize::{Normalization, NormalizationFlags};
    ///
    /// let flags = NormalizationFlags { never: true, ..Default::default() };
    /// assert_eq!(flags.resolve(), Normalization::Never);
    ///
    /// assert_eq!(NormalizationFlags::default().resolve(), Normalization::Always);
    /// ```
    pub fn resolve(self) -> Normalization {
        let set = [self.always, self.never, self.if_out_of_range]
            .iter()
            .filter(|flag| **flag)
            .count();

        match set {
            0 => log::warn!("no normalization policy selected, falling back to always normalizing"),
            1 => {}
            _ => log::warn!("several normalization policies selected, using the first of always, never, if-out-of-range"),
        }

        if self.always || set == 0 {
            Normalization::Always
        } else if self.never {
            Normalization::Never
        } else {
            Normalization::IfOutOfRange
        }
    }
}

impl From<NormalizationFlags> for Normalization {
    fn from(flags: NormalizationFlags) -> Self {
        flags.resolve()
    }
}

/// Scales node values into radii: `sqrt((x - min) / (π (max - min)))`, so that rendered areas are
/// proportional to the attribute.
pub fn radius_scale(values: &[f64], policy: Normalization) -> Vec<f64> {
    scale(values, policy, (0.5 / PI).sqrt(), |x, min, range| {
        ((x - min) / (PI * range)).sqrt()
    })
}

/// Scales edge values linearly into `[0, 1]`.
pub fn unit_scale(values: &[f64], policy: Normalization) -> Vec<f64> {
    scale(values, policy, 0.5, |x, min, range| (x - min) / range)
}

fn scale<F>(values: &[f64], policy: Normalization, neutral: f64, f: F) -> Vec<f64>
where
    F: Fn(f64, f64, f64) -> f64,
{
    let rescale = match policy {
        Normalization::Always => true,
        Normalization::Never => false,
        Normalization::IfOutOfRange => values.iter().any(|x| !(0.0..=1.0).contains(x)),
    };

    if !rescale {
        return values.to_vec();
    }

    let (min, max) = min_max(values);
    let range = max - min;

    // A flat distribution has no meaningful position within its range.
    if range == 0.0 {
        return vec![neutral; values.len()];
    }

    values.iter().map(|x| f(*x, min, range)).collect()
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), x| {
            (min.min(*x), max.max(*x))
        })
}
