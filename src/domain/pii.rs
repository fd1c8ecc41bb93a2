//! Host-side PII data models
//!
//! These types mirror the entity representation used by the PII extraction
//! framework: the enumerated PII types, the entity descriptor a task detects,
//! and the detected entity itself.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// Enumerated PII types known to the host framework
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PiiEnum {
    /// Person names
    Person,
    /// Age of a person
    Age,
    /// Date of birth
    BirthDate,
    /// Date of death
    DeathDate,
    /// Any other date
    Date,
    /// Nationalities, religious or political groups
    Norp,
    /// Locations (countries, cities, regions)
    Location,
    /// Postal addresses
    StreetAddress,
    /// Phone numbers
    PhoneNumber,
    /// Email addresses
    EmailAddress,
    /// Web URLs
    Url,
    /// IP addresses
    IpAddress,
    /// Government-issued identifiers (passports, tax ids, driver licenses)
    GovId,
    /// Credit card numbers
    CreditCard,
    /// Bank account numbers (IBAN and others)
    BankAccount,
    /// Cryptocurrency wallet addresses
    BlockchainAddress,
    /// Vehicle license plates
    LicensePlate,
    /// Medical information
    Medical,
    /// User names
    Username,
    /// Passwords
    Password,
    /// Occupations
    Occupation,
    /// Anything not covered by the other types
    Other,
}

impl PiiEnum {
    /// All enum members, in declaration order
    pub const ALL: [PiiEnum; 22] = [
        Self::Person,
        Self::Age,
        Self::BirthDate,
        Self::DeathDate,
        Self::Date,
        Self::Norp,
        Self::Location,
        Self::StreetAddress,
        Self::PhoneNumber,
        Self::EmailAddress,
        Self::Url,
        Self::IpAddress,
        Self::GovId,
        Self::CreditCard,
        Self::BankAccount,
        Self::BlockchainAddress,
        Self::LicensePlate,
        Self::Medical,
        Self::Username,
        Self::Password,
        Self::Occupation,
        Self::Other,
    ];

    /// Canonical (uppercase) name of the PII type
    pub fn name(&self) -> &'static str {
        match self {
            Self::Person => "PERSON",
            Self::Age => "AGE",
            Self::BirthDate => "BIRTH_DATE",
            Self::DeathDate => "DEATH_DATE",
            Self::Date => "DATE",
            Self::Norp => "NORP",
            Self::Location => "LOCATION",
            Self::StreetAddress => "STREET_ADDRESS",
            Self::PhoneNumber => "PHONE_NUMBER",
            Self::EmailAddress => "EMAIL_ADDRESS",
            Self::Url => "URL",
            Self::IpAddress => "IP_ADDRESS",
            Self::GovId => "GOV_ID",
            Self::CreditCard => "CREDIT_CARD",
            Self::BankAccount => "BANK_ACCOUNT",
            Self::BlockchainAddress => "BLOCKCHAIN_ADDRESS",
            Self::LicensePlate => "LICENSE_PLATE",
            Self::Medical => "MEDICAL",
            Self::Username => "USERNAME",
            Self::Password => "PASSWORD",
            Self::Occupation => "OCCUPATION",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for PiiEnum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string does not name a [`PiiEnum`] member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPiiType(pub String);

impl fmt::Display for UnknownPiiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown PII type: {}", self.0)
    }
}

impl std::error::Error for UnknownPiiType {}

impl FromStr for PiiEnum {
    type Err = UnknownPiiType;

    /// Case-insensitive; accepts spaces or dashes in place of underscores
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace([' ', '-'], "_");
        Self::ALL
            .iter()
            .find(|p| p.name() == normalized)
            .copied()
            .ok_or_else(|| UnknownPiiType(s.to_string()))
    }
}

/// Descriptor of a PII entity a task can detect
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PiiEntityInfo {
    /// PII type
    pub pii: PiiEnum,
    /// Language the entity applies to
    pub lang: Option<String>,
    /// Country the entity applies to
    pub country: Option<String>,
    /// Subtype (e.g. the kind of government id)
    pub subtype: Option<String>,
}

impl PiiEntityInfo {
    /// Create a new entity descriptor
    pub fn new(
        pii: PiiEnum,
        lang: Option<String>,
        country: Option<String>,
        subtype: Option<String>,
    ) -> Self {
        Self {
            pii,
            lang,
            country,
            subtype,
        }
    }
}

/// Processing provenance attached to a detected entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessInfo {
    /// Pipeline stage that produced the entity
    pub stage: String,
    /// Confidence score reported by the engine
    pub score: f64,
}

impl ProcessInfo {
    /// Provenance for an entity produced by the detection stage
    pub fn detection(score: f64) -> Self {
        Self {
            stage: "detection".to_string(),
            score,
        }
    }
}

/// A PII entity detected in a document chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiiEntity {
    /// What was detected
    pub info: PiiEntityInfo,
    /// Matched text
    pub value: String,
    /// Id of the chunk the entity was found in
    pub chunk_id: String,
    /// Start position in the chunk (in characters)
    pub start: usize,
    /// Provenance of the detection
    pub process: ProcessInfo,
}

impl PiiEntity {
    /// Create a new PII entity
    pub fn new(
        info: PiiEntityInfo,
        value: String,
        chunk_id: String,
        start: usize,
        process: ProcessInfo,
    ) -> Self {
        Self {
            info,
            value,
            chunk_id,
            start,
            process,
        }
    }

    /// End position in the chunk (in characters, exclusive)
    pub fn end(&self) -> usize {
        self.start + self.value.chars().count()
    }

    /// Dictionary form of the entity, as exchanged with the host framework
    ///
    /// Optional fields (`subtype`, `country`) are only present when set.
    pub fn as_dict(&self) -> Value {
        let mut out = json!({
            "type": self.info.pii.name(),
            "lang": self.info.lang,
            "chunkid": self.chunk_id,
            "process": {"stage": self.process.stage, "score": self.process.score},
            "value": self.value,
            "start": self.start,
            "end": self.end(),
        });
        if let Value::Object(ref mut map) = out {
            if let Some(ref subtype) = self.info.subtype {
                map.insert("subtype".to_string(), Value::String(subtype.clone()));
            }
            if let Some(ref country) = self.info.country {
                map.insert("country".to_string(), Value::String(country.clone()));
            }
        }
        out
    }
}
