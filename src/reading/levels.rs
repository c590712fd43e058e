//! The level table: one row per pressure level, reconciled to a fixed 10-slot record.
//!
//! Column layout of a complete row:
//!
//! ```text
//!    PRES   HGHT   TEMP   DWPT   RELH   MIXR   DRCT   SKNT   THTA   THTE   THTV
//!     hPa     m      C      C      %    g/kg    deg   knot     K      K      K
//! ```
//!
//! Rows above the humidity sensor's range drop DWPT, RELH, MIXR and THTE; rows
//! without wind additionally drop DRCT and SKNT. Nothing marks the gaps but the
//! token count, so shapes are recognised by counting tokens.

use serde::{Serialize, Serializer};

/// Number of value slots in a level record (pressure excluded).
pub const LEVEL_FIELDS: usize = 10;

/// Lines before the first data row: blank, rule, column names, units, rule.
const TABLE_HEADER_LINES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Height,
    Temperature,
    DewPoint,
    RelativeHumidity,
    MixingRatio,
    WindDirection,
    WindSpeed,
    PotentialTemp,
    EquivPotentialTemp,
    VirtualPotentialTemp,
}

impl Field {
    /// Slot order of a complete row.
    pub const ALL: [Field; LEVEL_FIELDS] = [
        Field::Height,
        Field::Temperature,
        Field::DewPoint,
        Field::RelativeHumidity,
        Field::MixingRatio,
        Field::WindDirection,
        Field::WindSpeed,
        Field::PotentialTemp,
        Field::EquivPotentialTemp,
        Field::VirtualPotentialTemp,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// How a raw row's tokens were mapped onto the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowShape {
    Complete,
    NoDewPoint,
    NoDewPointNoWind,
    /// Token count matched no known layout; mapped positionally.
    Irregular(usize),
}

impl RowShape {
    fn from_token_count(count: usize) -> Self {
        match count {
            11 => RowShape::Complete,
            7 => RowShape::NoDewPoint,
            5 => RowShape::NoDewPointNoWind,
            n => RowShape::Irregular(n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LevelRecord([Option<String>; LEVEL_FIELDS]);

impl LevelRecord {
    pub fn raw(&self, field: Field) -> Option<&str> {
        self.0[field.index()].as_deref()
    }

    pub fn value(&self, field: Field) -> Option<f64> {
        self.raw(field).and_then(|v| v.parse().ok())
    }

    /// Places `values` into the slots the row shape says they belong to.
    fn from_values(shape: RowShape, values: &[&str]) -> Self {
        use Field::*;

        let fields: &[Field] = match shape {
            RowShape::NoDewPoint => &[
                Height,
                Temperature,
                WindDirection,
                WindSpeed,
                PotentialTemp,
                VirtualPotentialTemp,
            ],
            RowShape::NoDewPointNoWind => &[Height, Temperature, PotentialTemp, VirtualPotentialTemp],
            RowShape::Complete | RowShape::Irregular(_) => &Field::ALL,
        };

        let mut record: [Option<String>; LEVEL_FIELDS] = Default::default();
        for (field, value) in fields.iter().zip(values) {
            record[field.index()] = Some(value.to_string());
        }

        LevelRecord(record)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub pressure: String,
    pub record: LevelRecord,
    pub shape: RowShape,
}

impl Level {
    /// Parses one table row. Blank lines yield `None`.
    pub fn from_line(line: &str) -> Option<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (pressure, values) = tokens.split_first()?;
        let shape = RowShape::from_token_count(tokens.len());

        Some(Level {
            pressure: pressure.to_string(),
            record: LevelRecord::from_values(shape, values),
            shape,
        })
    }
}

/// Levels keyed by pressure, kept in table order (surface first).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Levels(Vec<Level>);

impl Levels {
    pub fn from_table(block: &str) -> Self {
        let mut levels = Levels::default();
        for level in block
            .lines()
            .skip(TABLE_HEADER_LINES)
            .filter_map(Level::from_line)
        {
            levels.insert(level);
        }

        levels
    }

    /// A repeated pressure replaces the earlier row but keeps its position.
    fn insert(&mut self, level: Level) {
        match self.0.iter_mut().find(|l| l.pressure == level.pressure) {
            Some(existing) => *existing = level,
            None => self.0.push(level),
        }
    }

    /// The first row of the table, normally the surface observation.
    pub fn surface(&self) -> Option<&Level> {
        self.0.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Serialize for Levels {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|l| (&l.pressure, &l.record)))
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
impl LevelRecord {
    pub(crate) fn slots(&self) -> &[Option<String>; LEVEL_FIELDS] {
        &self.0
    }
}

#[cfg(test)]
impl Levels {
    pub(crate) fn get(&self, pressure: &str) -> Option<&LevelRecord> {
        self.0
            .iter()
            .find(|l| l.pressure == pressure)
            .map(|l| &l.record)
    }
}
