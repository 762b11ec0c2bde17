use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::AppError;

/// Licence course an invoice is issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Course {
    /// Mopeds
    AM,
    /// Motorcycles up to 125cc
    A1,
    /// Motorcycles up to 35kW
    A2,
    /// Unrestricted motorcycles
    A,
    /// Cars
    B,
    /// Trucks
    C,
    /// Truck with trailer
    CE,
}

impl Course {
    pub const ALL: [Course; 7] = [
        Course::AM,
        Course::A1,
        Course::A2,
        Course::A,
        Course::B,
        Course::C,
        Course::CE,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Course::AM => "AM",
            Course::A1 => "A1",
            Course::A2 => "A2",
            Course::A => "A",
            Course::B => "B",
            Course::C => "C",
            Course::CE => "C+E",
        }
    }

    /// Professional truck courses are invoiced without IVA
    pub fn is_vat_exempt(&self) -> bool {
        matches!(self, Course::C | Course::CE)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Course::AM => "Ciclomotores",
            Course::A1 => "Motocicletas hasta 125cc",
            Course::A2 => "Motocicletas hasta 35kW",
            Course::A => "Motocicletas sin límite",
            Course::B => "Automóviles",
            Course::C => "Camiones",
            Course::CE => "Camión con remolque",
        }
    }
}

impl Default for Course {
    fn default() -> Self {
        Course::B
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Course {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AM" => Ok(Course::AM),
            "A1" => Ok(Course::A1),
            "A2" => Ok(Course::A2),
            "A" => Ok(Course::A),
            "B" => Ok(Course::B),
            "C" => Ok(Course::C),
            "C+E" | "CE" => Ok(Course::CE),
            _ => Err(AppError::parse(format!("unknown course '{}'", s.trim()))),
        }
    }
}

impl TryFrom<String> for Course {
    type Error = AppError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Course> for String {
    fn from(course: Course) -> Self {
        course.code().to_string()
    }
}
