use serde::{Deserialize, Serialize};

use crate::modules::fees::Course;

/// Upper-case DNI/NIE without spaces or dashes, as stored
pub fn normalize_dni(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_uppercase()
}

/// Structured address printed on quarterly invoices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    pub street: String,
    pub postal_code: String,
    pub municipality: String,
    pub province: String,
}

impl PostalAddress {
    /// Fill blank fields from `other`; returns the names of the fields set
    pub fn fill_blanks_from(&mut self, other: &PostalAddress) -> Vec<&'static str> {
        let mut updated = Vec::new();
        let pairs = [
            (&mut self.street, &other.street, "street"),
            (&mut self.postal_code, &other.postal_code, "postal_code"),
            (&mut self.municipality, &other.municipality, "municipality"),
            (&mut self.province, &other.province, "province"),
        ];
        for (field, candidate, name) in pairs {
            if field.trim().is_empty() && !candidate.trim().is_empty() {
                *field = candidate.trim().to_string();
                updated.push(name);
            }
        }
        updated
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub dni: String,
    pub course: Course,
    pub address: PostalAddress,
    pub is_active: bool,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub dni: String,
    pub course: Course,
    pub address: PostalAddress,
}

impl NewStudent {
    pub fn into_student(self, id: i64) -> Student {
        Student {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            dni: normalize_dni(&self.dni),
            course: self.course,
            address: self.address,
            is_active: true,
        }
    }
}
