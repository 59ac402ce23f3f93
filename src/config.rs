//! Initial conditions and run parameters.
//!
//! A system is described by a whitespace-delimited list of numbers:
//!
//! ```text
//! G N steps
//! m x y vx vy    (N times)
//! ```
//!
//! For example, two bodies of mass `1e6` one unit apart, integrated for one step:
//!
//! ```
//! # use nbody_relay::config::SystemConfig;
//! let config: SystemConfig = "1 2 1  1e6 0 0 0 0  1e6 1 0 0 0".parse().unwrap();
//!
//! assert_eq!(config.bodies.len(), 2);
//! assert_eq!(config.time_steps, 1);
//! ```

use std::{fmt::Display, fs, path::Path, str::FromStr};

use crate::{error::Error, vector::Vector};

/// Fixed integration step.
pub const DT: f64 = 0.05;

/// Floor applied to the separation of two bodies before it is cubed.
pub const SOFTENING: f64 = f32::EPSILON as f64;

/// Initial state of a single body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyConfig {
    /// Mass, strictly positive.
    pub mass: f64,
    /// Initial position.
    pub position: Vector,
    /// Initial velocity.
    pub velocity: Vector,
}

/// Gravitational constant, step count and initial bodies of a system.
#[derive(Clone, Debug, PartialEq)]
pub struct SystemConfig {
    /// Gravitational constant.
    pub gravity: f64,
    /// Number of steps to integrate.
    pub time_steps: usize,
    /// Bodies in index order.
    pub bodies: Vec<BodyConfig>,
}

impl SystemConfig {
    /// Reads and parses the configuration file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let input = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_owned(),
            source,
        })?;

        let config = Self::parse(&input)?;
        log::info!(
            "loaded {} bodies for {} steps from {} (G = {})",
            config.bodies.len(),
            config.time_steps,
            path.display(),
            config.gravity
        );

        Ok(config)
    }

    /// Parses a configuration from its textual form.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let mut fields = Fields::new(input);

        let gravity = fields.real("gravitational constant")?;
        let count: usize = fields.next("body count")?;
        let time_steps = fields.next("step count")?;

        let bodies = (0..count)
            .map(|i| {
                let n = i + 1;
                let mass = fields.real(format_args!("mass of body {n}"))?;
                if mass <= 0.0 {
                    return Err(Error::NonPositiveMass { body: i, mass });
                }

                let position = Vector::new(
                    fields.real(format_args!("x of body {n}"))?,
                    fields.real(format_args!("y of body {n}"))?,
                );
                let velocity = Vector::new(
                    fields.real(format_args!("vx of body {n}"))?,
                    fields.real(format_args!("vy of body {n}"))?,
                );

                Ok(BodyConfig {
                    mass,
                    position,
                    velocity,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let trailing = fields.tokens.count();
        if trailing > 0 {
            log::warn!("ignoring {trailing} trailing configuration tokens");
        }

        Ok(Self {
            gravity,
            time_steps,
            bodies,
        })
    }
}

impl FromStr for SystemConfig {
    type Err = Error;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Numerical parameters that are not part of the system description.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parameters {
    /// Integration step.
    pub dt: f64,
    /// Minimum separation used when computing forces.
    pub softening: f64,
}

impl Default for Parameters {
    #[inline]
    fn default() -> Self {
        Self {
            dt: DT,
            softening: SOFTENING,
        }
    }
}

struct Fields<'a> {
    tokens: std::str::SplitWhitespace<'a>,
}

impl<'a> Fields<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            tokens: input.split_whitespace(),
        }
    }

    fn next<T: FromStr>(&mut self, field: impl Display) -> Result<T, Error> {
        let token = self.tokens.next().ok_or_else(|| Error::Truncated {
            field: field.to_string(),
        })?;

        token.parse().map_err(|_| Error::InvalidField {
            field: field.to_string(),
            token: token.to_owned(),
        })
    }

    fn real(&mut self, field: impl Display + Copy) -> Result<f64, Error> {
        let value: f64 = self.next(field)?;
        if !value.is_finite() {
            return Err(Error::InvalidField {
                field: field.to_string(),
                token: value.to_string(),
            });
        }

        Ok(value)
    }
}
