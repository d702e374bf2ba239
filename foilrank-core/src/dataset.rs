//! Parsing and storage of one airfoil's polar data.
//!
//! Polar files follow the `airfoiltools.com` CSV export, extended with two
//! geometry header lines. The layout is addressed by fixed line offsets, so a
//! file without the leading marker is rejected outright. Individual data rows
//! that cannot be parsed are dropped and reported as [`SkippedRow`]s.

use std::collections::HashMap;
use std::num::ParseFloatError;

use log::{debug, warn};
use thiserror::Error;

use crate::{PolarField, PolarRecord};

/// Literal that must open the first line of every polar file.
pub const POLAR_MARKER: &str = "Xfoil polar.";

const REYNOLDS_LINE: usize = 3;
const NCRIT_LINE: usize = 4;
const MAX_LIFT_DRAG_LINE: usize = 6;
const MAX_LIFT_DRAG_ALPHA_LINE: usize = 7;
const MAX_THICKNESS_LINE: usize = 8;
const MAX_CAMBER_LINE: usize = 9;
const DATA_START_LINE: usize = 13;

/// Errors that make a polar file unusable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormatError {
    /// The first line does not carry the polar marker.
    #[error("polar data must begin with {POLAR_MARKER:?}")]
    MissingMarker,
    /// A required header line is absent or has no value column.
    #[error("header line {line} ({label}) has no value")]
    MissingHeaderValue {
        /// One-based line number.
        line: usize,
        /// Name of the expected header entry.
        label: &'static str,
    },
    /// A required header value is not a number.
    #[error("header line {line} ({label}) value {raw:?} is not a number")]
    InvalidHeaderValue {
        /// One-based line number.
        line: usize,
        /// Name of the expected header entry.
        label: &'static str,
        /// Text found in the value column.
        raw: String,
        /// Source error from float parsing.
        #[source]
        source: ParseFloatError,
    },
}

/// Reasons a single data row is dropped.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RowError {
    /// The row has fewer than seven columns.
    #[error("expected at least 7 fields, found {found}")]
    TooFewFields {
        /// Number of comma-separated fields present.
        found: usize,
    },
    /// A column failed to parse as a float.
    #[error("{field} value {raw:?} is not a number")]
    InvalidNumber {
        /// Column that failed to parse.
        field: PolarField,
        /// Text found in the column.
        raw: String,
        /// Source error from float parsing.
        #[source]
        source: ParseFloatError,
    },
}

/// A data row dropped during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// One-based line number of the row.
    pub line: usize,
    /// Why the row was dropped.
    pub error: RowError,
}

/// Simulation parameters and geometry read leniently from the header.
///
/// Missing or malformed entries are `None`; they never fail construction.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PolarMetadata {
    /// Reynolds number of the simulation.
    pub reynolds: Option<f64>,
    /// Turbulence transition sensitivity.
    pub ncrit: Option<f64>,
    /// Maximum thickness as a percentage of chord.
    pub max_thickness: Option<f64>,
    /// Maximum camber as a percentage of chord.
    pub max_camber: Option<f64>,
}

impl PolarMetadata {
    /// Read the metadata header lines of a polar file.
    ///
    /// The marker is not checked here; callers filtering candidate files only
    /// need the geometry values.
    ///
    /// # Examples
    /// ```
    /// use foilrank_core::PolarMetadata;
    ///
    /// let text = "Xfoil polar.\n\n\nReynolds number,50000\nNcrit,9\n\n\n\nMax Thickness,12\nMax Camber,2.5\n";
    /// let metadata = PolarMetadata::from_header(text);
    /// assert_eq!(metadata.max_thickness, Some(12.0));
    /// assert_eq!(metadata.max_camber, Some(2.5));
    /// ```
    #[must_use]
    pub fn from_header(text: &str) -> Self {
        let lines: Vec<&str> = text.lines().take(DATA_START_LINE).collect();
        let lenient = |index: usize| {
            header_value(&lines, index).and_then(|raw| raw.parse::<f64>().ok())
        };
        Self {
            reynolds: lenient(REYNOLDS_LINE),
            ncrit: lenient(NCRIT_LINE),
            max_thickness: lenient(MAX_THICKNESS_LINE),
            max_camber: lenient(MAX_CAMBER_LINE),
        }
    }
}

/// The polar data of one airfoil, immutable once built.
///
/// Angles keep the order in which they appear in the source. Every angle maps
/// to exactly one [`PolarRecord`]; a repeated angle keeps its first position
/// and takes the values of the last row that carried it.
///
/// # Examples
///
/// ```
/// use foilrank_core::{PolarDataset, PolarField};
///
/// # fn main() -> Result<(), foilrank_core::FormatError> {
/// let text = "Xfoil polar. Reynolds number fixed. Mach  number fixed\n\
///     Polar key,xf-demo\nAirfoil,demo\nReynolds number,50000\nNcrit,9\nMach,0\n\
///     Max Cl/Cd,40.5\nMax Cl/Cd alpha,4.0\nMax Thickness,12\nMax Camber,2\n\
///     Url,http://example.invalid\n\nAlpha,Cl,Cd,Cdp,Cm,Top_Xtr,Bot_Xtr\n\
///     0.0,0.2,0.010,0.004,-0.05,0.60,0.90\n\
///     4.0,0.6,0.015,0.006,-0.05,0.50,0.95\n";
/// let polar = PolarDataset::parse(text)?;
/// assert_eq!(polar.angles(), &[0.0, 4.0]);
/// assert_eq!(polar.max_lift_drag_ratio(), 40.5);
/// assert_eq!(polar.series(PolarField::Cl, polar.angles()), Some(vec![0.2, 0.6]));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PolarDataset {
    angles: Vec<f64>,
    records: Vec<PolarRecord>,
    positions: HashMap<AngleKey, usize>,
    max_lift_drag_ratio: f64,
    angle_at_max_lift_drag_ratio: f64,
    metadata: PolarMetadata,
    skipped_rows: Vec<SkippedRow>,
}

/// Hashable identity of an angle; `-0.0` and `0.0` are the same angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct AngleKey(u64);

impl AngleKey {
    fn of(angle: f64) -> Self {
        if angle == 0.0_f64 {
            Self(0.0_f64.to_bits())
        } else {
            Self(angle.to_bits())
        }
    }
}

impl PolarDataset {
    /// Parse the text of a polar file.
    ///
    /// # Errors
    /// Returns [`FormatError`] when the marker is missing or when the
    /// maximum lift/drag header values are absent or not numeric. Malformed
    /// data rows are skipped, logged, and listed in [`Self::skipped_rows`].
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let lines: Vec<&str> = text.lines().collect();
        if !lines
            .first()
            .is_some_and(|first| first.starts_with(POLAR_MARKER))
        {
            return Err(FormatError::MissingMarker);
        }

        let max_lift_drag_ratio = required_header(&lines, MAX_LIFT_DRAG_LINE, "Max Cl/Cd")?;
        let angle_at_max_lift_drag_ratio =
            required_header(&lines, MAX_LIFT_DRAG_ALPHA_LINE, "Max Cl/Cd alpha")?;

        let mut builder = Builder::default();
        for (offset, line) in lines.iter().enumerate().skip(DATA_START_LINE) {
            if line.trim().is_empty() {
                continue;
            }
            let line_number = offset + 1;
            match parse_row(line) {
                Ok(record) => builder.push(record, line_number),
                Err(error) => {
                    warn!("Skipped polar row {line_number}: {error}");
                    builder.skipped_rows.push(SkippedRow {
                        line: line_number,
                        error,
                    });
                }
            }
        }

        Ok(Self {
            angles: builder.angles,
            records: builder.records,
            positions: builder.positions,
            max_lift_drag_ratio,
            angle_at_max_lift_drag_ratio,
            metadata: PolarMetadata::from_header(text),
            skipped_rows: builder.skipped_rows,
        })
    }

    /// Angles of attack in source order.
    #[must_use]
    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    /// Records in the same order as [`Self::angles`].
    #[must_use]
    pub fn records(&self) -> &[PolarRecord] {
        &self.records
    }

    /// Return the record stored for `angle`.
    #[must_use]
    pub fn record(&self, angle: f64) -> Option<&PolarRecord> {
        self.positions
            .get(&AngleKey::of(angle))
            .and_then(|&position| self.records.get(position))
    }

    /// Report whether the dataset holds a record for `angle`.
    #[must_use]
    pub fn contains_angle(&self, angle: f64) -> bool {
        self.positions.contains_key(&AngleKey::of(angle))
    }

    /// Maximum lift/drag ratio from the file header.
    #[must_use]
    pub const fn max_lift_drag_ratio(&self) -> f64 {
        self.max_lift_drag_ratio
    }

    /// Angle of attack of the maximum lift/drag ratio from the file header.
    #[must_use]
    pub const fn angle_at_max_lift_drag_ratio(&self) -> f64 {
        self.angle_at_max_lift_drag_ratio
    }

    /// Lenient header metadata.
    #[must_use]
    pub const fn metadata(&self) -> &PolarMetadata {
        &self.metadata
    }

    /// Rows dropped during construction.
    #[must_use]
    pub fn skipped_rows(&self) -> &[SkippedRow] {
        &self.skipped_rows
    }

    /// Number of stored angles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.angles.len()
    }

    /// Report whether no data rows were stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    /// Values of `field` at each of `angles`, in the order given.
    ///
    /// Returns `None` when any angle has no record.
    #[must_use]
    pub fn series(&self, field: PolarField, angles: &[f64]) -> Option<Vec<f64>> {
        angles
            .iter()
            .map(|&angle| self.record(angle).map(|record| record.get(field)))
            .collect()
    }

    /// Heuristic stall angle.
    ///
    /// Returns the first angle, in source order, whose lift coefficient is
    /// positive and strictly below the previous sample's. When lift never
    /// drops the last angle is returned instead; this keeps formulas that
    /// reference the stall point usable for airfoils that do not stall within
    /// the sampled range. Returns `None` only for an empty dataset.
    #[must_use]
    pub fn find_stall_angle(&self) -> Option<f64> {
        let stall = self
            .records
            .windows(2)
            .find_map(|pair| match pair {
                [previous, current]
                    if current.lift() > 0.0_f64 && current.lift() < previous.lift() =>
                {
                    Some(current.alpha())
                }
                _ => None,
            });
        stall.or_else(|| {
            let last = self.angles.last().copied();
            if let Some(angle) = last {
                debug!("No lift decline found; using last angle {angle} as stall angle");
            }
            last
        })
    }

    /// Angles of `other` that this dataset also holds, in `other`'s order.
    ///
    /// Normalisation uses this to compare equal-length series sampled at the
    /// same physical angles.
    #[must_use]
    pub fn intersect_angles_with(&self, other: &Self) -> Vec<f64> {
        other
            .angles
            .iter()
            .copied()
            .filter(|&angle| self.contains_angle(angle))
            .collect()
    }
}

#[derive(Default)]
struct Builder {
    angles: Vec<f64>,
    records: Vec<PolarRecord>,
    positions: HashMap<AngleKey, usize>,
    skipped_rows: Vec<SkippedRow>,
}

impl Builder {
    fn push(&mut self, record: PolarRecord, line_number: usize) {
        let key = AngleKey::of(record.alpha());
        if let Some(&position) = self.positions.get(&key) {
            warn!(
                "Duplicate angle {} on line {line_number}; replacing the earlier sample",
                record.alpha()
            );
            if let Some(slot) = self.records.get_mut(position) {
                *slot = record;
            }
            return;
        }
        self.positions.insert(key, self.records.len());
        self.angles.push(record.alpha());
        self.records.push(record);
    }
}

fn parse_row(line: &str) -> Result<PolarRecord, RowError> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < PolarField::ALL.len() {
        return Err(RowError::TooFewFields {
            found: fields.len(),
        });
    }
    let mut values = [0.0_f64; 7];
    for ((slot, raw), field) in values.iter_mut().zip(&fields).zip(PolarField::ALL) {
        let trimmed = raw.trim();
        *slot = trimmed
            .parse::<f64>()
            .map_err(|source| RowError::InvalidNumber {
                field,
                raw: trimmed.to_owned(),
                source,
            })?;
    }
    Ok(PolarRecord::new(values))
}

fn header_value<'a>(lines: &[&'a str], index: usize) -> Option<&'a str> {
    lines
        .get(index)
        .and_then(|line| line.split(',').nth(1))
        .map(str::trim)
}

fn required_header(lines: &[&str], index: usize, label: &'static str) -> Result<f64, FormatError> {
    let line = index + 1;
    let raw = header_value(lines, index).ok_or(FormatError::MissingHeaderValue { line, label })?;
    raw.parse::<f64>()
        .map_err(|source| FormatError::InvalidHeaderValue {
            line,
            label,
            raw: raw.to_owned(),
            source,
        })
}
