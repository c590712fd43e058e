//! The "Station information and sounding indices" block.

use serde::{Serialize, Serializer};

/// Short names for the lines of the indices block, in the order the archive prints them.
pub const INDEX_LABELS: [&str; 29] = [
    "ID", "TIME", "SLAT", "SLON", "SELV", "SHOW", "LIFT", "LFTV", "SWET", "KINX", "CTOT", "VTOT",
    "TOTL", "CAPE", "CAPV", "CINS", "CINV", "EQLV", "EQTV", "LFCT", "LFCV", "BRCH", "BRCV", "LCLT",
    "LCLP", "MLTH", "MLMR", "THTK", "PWAT",
];

const SEPARATOR: &str = ": ";

/// Label/value pairs. Labels are assigned by line position, not read from the text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Indices(Vec<(&'static str, String)>);

impl Indices {
    pub fn from_block(block: &str) -> Self {
        let values = block
            .lines()
            .skip(1)
            .filter_map(|line| line.split(SEPARATOR).nth(1))
            .map(|value| value.trim().to_string());

        Indices(INDEX_LABELS.iter().copied().zip(values).collect())
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Serialize for Indices {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(l, v)| (l, v)))
    }
}

// -- Tests -------------------------------------------------------------------
