use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::G2koError;

/// Upper bound on organisms accepted for one report.
pub const MAX_ORGANISMS: usize = 10;

static ORGANISM_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("organism code pattern"));
static KO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^K\d{5}$").expect("KO id pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OrganismCode(String);

impl OrganismCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrganismCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrganismCode {
    type Err = G2koError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if !ORGANISM_CODE.is_match(trimmed) {
            return Err(G2koError::InvalidOrganismCode(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct KoId(String);

impl KoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for KoId {
    type Err = G2koError;

    /// Accepts `K01234` as well as the prefixed `ko:K01234` form.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let bare = trimmed.strip_prefix("ko:").unwrap_or(trimmed).to_uppercase();
        if !KO_ID.is_match(&bare) {
            return Err(G2koError::InvalidKoId(value.to_string()));
        }
        Ok(Self(bare))
    }
}

/// One organism to put in the report, in the order the user gave it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganismRequest {
    code: OrganismCode,
    display_name: String,
}

impl OrganismRequest {
    /// `position` is 1-based and only used for the placeholder name.
    pub fn new(code: OrganismCode, name: Option<&str>, position: usize) -> Self {
        let display_name = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Organism {position}"),
        };
        Self { code, display_name }
    }

    pub fn code(&self) -> &OrganismCode {
        &self.code
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// Raw organism row as typed by the user: a code and an optional name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganismInput {
    pub code: String,
    pub name: Option<String>,
}

impl OrganismInput {
    pub fn new(code: impl Into<String>, name: Option<String>) -> Self {
        Self {
            code: code.into(),
            name,
        }
    }
}

impl FromStr for OrganismInput {
    type Err = G2koError;

    /// `eco` or `eco=Escherichia coli`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (code, name) = match value.split_once('=') {
            Some((code, name)) => (code, Some(name.trim().to_string())),
            None => (value, None),
        };
        Ok(Self {
            code: code.trim().to_string(),
            name: name.filter(|name| !name.is_empty()),
        })
    }
}

/// Turns input rows into requests. Rows with a blank code are skipped but
/// still count towards the positional placeholder name.
pub fn collect_requests(rows: &[OrganismInput]) -> Result<Vec<OrganismRequest>, G2koError> {
    if rows.len() > MAX_ORGANISMS {
        return Err(G2koError::TooManyOrganisms {
            count: rows.len(),
            max: MAX_ORGANISMS,
        });
    }

    rows.iter()
        .enumerate()
        .filter(|(_, row)| !row.code.trim().is_empty())
        .map(|(index, row)| -> Result<OrganismRequest, G2koError> {
            let code: OrganismCode = row.code.parse()?;
            Ok(OrganismRequest::new(code, row.name.as_deref(), index + 1))
        })
        .collect()
}
