// src/domain/report_kind.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which audience a report is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Buyer,
    Seller,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Buyer => "buyer",
            ReportKind::Seller => "seller",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Buyer => "Buyer's Comparable Market Analysis",
            ReportKind::Seller => "Seller's Comparable Market Analysis",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buyer" => Ok(ReportKind::Buyer),
            "seller" => Ok(ReportKind::Seller),
            other => Err(format!(
                "Invalid report type '{other}'. Use 'buyer' or 'seller'."
            )),
        }
    }
}
