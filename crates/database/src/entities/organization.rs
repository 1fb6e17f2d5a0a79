//! Organization entity definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Organization entity representing a tenant account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub currency: Currency,
    pub language: Language,
}

/// Request for creating a new organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganizationRequest {
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub language: Language,
    pub currency: Currency,
}

/// Languages supported by the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    /// Spanish
    Es,
    /// English
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Es => "ES",
            Language::En => "EN",
        }
    }
}

impl From<&str> for Language {
    fn from(s: &str) -> Self {
        match s {
            "EN" => Language::En,
            _ => Language::Es,
        }
    }
}

impl ToString for Language {
    fn to_string(&self) -> String {
        self.as_str().to_string()
    }
}

/// Currencies supported by the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    Cop,
    Usd,
    Eur,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Cop => "COP",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        match s {
            "USD" => Currency::Usd,
            "EUR" => Currency::Eur,
            _ => Currency::Cop,
        }
    }
}

impl ToString for Currency {
    fn to_string(&self) -> String {
        self.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_round_trips_through_wire_strings() {
        assert_eq!(Language::from(Language::Es.as_str()), Language::Es);
        assert_eq!(Language::from(Language::En.as_str()), Language::En);
    }

    #[test]
    fn unknown_language_falls_back_to_spanish() {
        assert_eq!(Language::from("FR"), Language::Es);
    }

    #[test]
    fn currency_round_trips_through_wire_strings() {
        assert_eq!(Currency::from(Currency::Cop.as_str()), Currency::Cop);
        assert_eq!(Currency::from(Currency::Usd.as_str()), Currency::Usd);
        assert_eq!(Currency::from(Currency::Eur.as_str()), Currency::Eur);
    }

    #[test]
    fn unknown_currency_falls_back_to_cop() {
        assert_eq!(Currency::from("GBP"), Currency::Cop);
    }
}
