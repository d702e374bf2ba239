//! Columns of a polar data row.
//!
//! The enum replaces a name-to-column lookup table with exhaustive matching.
//!
//! # Examples
//! ```
//! use foilrank_core::PolarField;
//!
//! assert_eq!(PolarField::Cl.as_str(), "cl");
//! assert_eq!(PolarField::BotXtr.index(), 6);
//! assert_eq!("TOP_XTR".parse::<PolarField>(), Ok(PolarField::TopXtr));
//! ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolarField {
    /// Angle of attack in degrees.
    Alpha,
    /// Lift coefficient.
    Cl,
    /// Drag coefficient.
    Cd,
    /// Pressure drag coefficient.
    Cp,
    /// Moment coefficient.
    Cm,
    /// Upper-surface transition location.
    TopXtr,
    /// Lower-surface transition location.
    BotXtr,
}

impl PolarField {
    /// Every field in column order.
    pub const ALL: [Self; 7] = [
        Self::Alpha,
        Self::Cl,
        Self::Cd,
        Self::Cp,
        Self::Cm,
        Self::TopXtr,
        Self::BotXtr,
    ];

    /// Column position of the field within a data row.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Alpha => 0,
            Self::Cl => 1,
            Self::Cd => 2,
            Self::Cp => 3,
            Self::Cm => 4,
            Self::TopXtr => 5,
            Self::BotXtr => 6,
        }
    }

    /// Return the formula identifier for the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alpha => "alpha",
            Self::Cl => "cl",
            Self::Cd => "cd",
            Self::Cp => "cp",
            Self::Cm => "cm",
            Self::TopXtr => "top_xtr",
            Self::BotXtr => "bot_xtr",
        }
    }
}

impl std::fmt::Display for PolarField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PolarField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "alpha" => Ok(Self::Alpha),
            "cl" => Ok(Self::Cl),
            "cd" => Ok(Self::Cd),
            "cp" => Ok(Self::Cp),
            "cm" => Ok(Self::Cm),
            "top_xtr" => Ok(Self::TopXtr),
            "bot_xtr" => Ok(Self::BotXtr),
            _ => Err(format!("unknown polar field '{s}'")),
        }
    }
}

/// One sample of a polar: every column at a single angle of attack.
///
/// # Examples
/// ```
/// use foilrank_core::{PolarField, PolarRecord};
///
/// let record = PolarRecord::new([2.0, 0.4, 0.01, 0.005, -0.05, 0.6, 0.9]);
/// assert_eq!(record.get(PolarField::Cl), 0.4);
/// assert_eq!(record.alpha(), 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarRecord {
    values: [f64; 7],
}

impl PolarRecord {
    /// Build a record from values in column order.
    #[must_use]
    pub const fn new(values: [f64; 7]) -> Self {
        Self { values }
    }

    /// Return the value stored for `field`.
    #[must_use]
    pub const fn get(&self, field: PolarField) -> f64 {
        match field {
            PolarField::Alpha => self.values[0],
            PolarField::Cl => self.values[1],
            PolarField::Cd => self.values[2],
            PolarField::Cp => self.values[3],
            PolarField::Cm => self.values[4],
            PolarField::TopXtr => self.values[5],
            PolarField::BotXtr => self.values[6],
        }
    }

    /// Angle of attack of the sample.
    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.get(PolarField::Alpha)
    }

    /// Lift coefficient of the sample.
    #[must_use]
    pub const fn lift(&self) -> f64 {
        self.get(PolarField::Cl)
    }
}
