use crate::core::{AppError, Result};
use serde::Deserialize;
use std::env;

/// Issuing company and invoicing settings
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    pub company_name: String,
    pub company_tax_id: String,
    pub company_address: String,
    pub company_city: String,
    pub company_phone: String,
    pub company_email: String,
    /// Province stored for students whose address has none
    pub default_province: String,
    /// Attempts at allocating a free invoice number before giving up
    pub number_retry_limit: u32,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            company_name: "Autoescuela".to_string(),
            company_tax_id: String::new(),
            company_address: String::new(),
            company_city: String::new(),
            company_phone: String::new(),
            company_email: String::new(),
            default_province: "VALENCIA".to_string(),
            number_retry_limit: 5,
        }
    }
}

impl BillingConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let var_or = |key: &str, fallback: String| env::var(key).unwrap_or(fallback);

        Ok(Self {
            company_name: var_or("COMPANY_NAME", defaults.company_name),
            company_tax_id: var_or("COMPANY_TAX_ID", defaults.company_tax_id),
            company_address: var_or("COMPANY_ADDRESS", defaults.company_address),
            company_city: var_or("COMPANY_CITY", defaults.company_city),
            company_phone: var_or("COMPANY_PHONE", defaults.company_phone),
            company_email: var_or("COMPANY_EMAIL", defaults.company_email),
            default_province: var_or("DEFAULT_PROVINCE", defaults.default_province),
            number_retry_limit: match env::var("INVOICE_NUMBER_RETRY_LIMIT") {
                Ok(value) => value.parse().map_err(|_| {
                    AppError::Configuration("Invalid INVOICE_NUMBER_RETRY_LIMIT".to_string())
                })?,
                Err(_) => defaults.number_retry_limit,
            },
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.company_name.trim().is_empty() {
            return Err(AppError::Configuration(
                "COMPANY_NAME must not be empty".to_string(),
            ));
        }

        if self.number_retry_limit == 0 {
            return Err(AppError::Configuration(
                "INVOICE_NUMBER_RETRY_LIMIT must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
