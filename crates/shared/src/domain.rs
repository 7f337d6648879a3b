use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{CodeError, ValidationError};

pub const CODE_LEN: usize = 3;

/// Uppercases `c` and returns it when it is an ASCII letter.
pub fn normalize_letter(c: char) -> Option<char> {
    let upper = c.to_ascii_uppercase();
    upper.is_ascii_uppercase().then_some(upper)
}

/// Instructor abbreviation: three cells, each empty or holding one of `A-Z`.
///
/// The textual code is the concatenation of the filled cells, so its length is
/// the number of filled cells and never exceeds [`CODE_LEN`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Code {
    cells: [Option<char>; CODE_LEN],
}

impl Code {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a code from free text, e.g. a CLI argument. Case is ignored.
    pub fn parse(raw: &str) -> Result<Self, CodeError> {
        let raw = raw.trim();
        let count = raw.chars().count();
        if count > CODE_LEN {
            return Err(CodeError::TooLong(count));
        }

        let mut code = Self::new();
        for (index, c) in raw.chars().enumerate() {
            code.set(index, c)?;
        }
        Ok(code)
    }

    pub fn cell(&self, index: usize) -> Option<char> {
        self.cells.get(index).copied().flatten()
    }

    pub fn cells(&self) -> [Option<char>; CODE_LEN] {
        self.cells
    }

    /// Overwrites cell `index` with the uppercased `letter`.
    pub fn set(&mut self, index: usize, letter: char) -> Result<(), CodeError> {
        let letter = normalize_letter(letter).ok_or(CodeError::InvalidLetter(letter))?;
        let cell = self
            .cells
            .get_mut(index)
            .ok_or(CodeError::CellOutOfRange(index))?;
        *cell = Some(letter);
        Ok(())
    }

    pub fn clear(&mut self, index: usize) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = None;
        }
    }

    pub fn reset(&mut self) {
        self.cells = [None; CODE_LEN];
    }

    pub fn len(&self) -> usize {
        self.cells.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_complete(&self) -> bool {
        self.len() == CODE_LEN
    }

    pub fn as_string(&self) -> String {
        self.cells.iter().flatten().collect()
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl FromStr for Code {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "Civil Department")]
    Civil,
    #[serde(rename = "Electrical Department")]
    Electrical,
    #[serde(rename = "Mechanical Department")]
    Mechanical,
    #[serde(rename = "Industrial Department")]
    Industrial,
    #[serde(rename = "Chemical Department")]
    Chemical,
    #[serde(rename = "Mining and Petroleum Department")]
    MiningAndPetroleum,
    #[serde(rename = "Environmental Department")]
    Environmental,
    #[serde(rename = "Survey Department")]
    Survey,
    #[serde(rename = "Metallurgical Department")]
    Metallurgical,
    #[default]
    #[serde(rename = "Computer Department")]
    Computer,
    #[serde(rename = "Nuclear Department")]
    Nuclear,
    #[serde(rename = "Water Resources Department")]
    WaterResources,
}

impl Department {
    /// Menu order.
    pub const ALL: [Department; 12] = [
        Department::Civil,
        Department::Electrical,
        Department::Mechanical,
        Department::Industrial,
        Department::Chemical,
        Department::MiningAndPetroleum,
        Department::Environmental,
        Department::Survey,
        Department::Metallurgical,
        Department::Computer,
        Department::Nuclear,
        Department::WaterResources,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Department::Civil => "Civil Department",
            Department::Electrical => "Electrical Department",
            Department::Mechanical => "Mechanical Department",
            Department::Industrial => "Industrial Department",
            Department::Chemical => "Chemical Department",
            Department::MiningAndPetroleum => "Mining and Petroleum Department",
            Department::Environmental => "Environmental Department",
            Department::Survey => "Survey Department",
            Department::Metallurgical => "Metallurgical Department",
            Department::Computer => "Computer Department",
            Department::Nuclear => "Nuclear Department",
            Department::WaterResources => "Water Resources Department",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Department::Civil => "civil",
            Department::Electrical => "electrical",
            Department::Mechanical => "mechanical",
            Department::Industrial => "industrial",
            Department::Chemical => "chemical",
            Department::MiningAndPetroleum => "mining-and-petroleum",
            Department::Environmental => "environmental",
            Department::Survey => "survey",
            Department::Metallurgical => "metallurgical",
            Department::Computer => "computer",
            Department::Nuclear => "nuclear",
            Department::WaterResources => "water-resources",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Department::ALL
            .into_iter()
            .find(|dept| {
                dept.slug().eq_ignore_ascii_case(needle)
                    || dept.as_str().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| ValidationError::UnknownDepartment(needle.to_string()))
    }
}
