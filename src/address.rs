//! Postal addresses for letter windows and invoice heads.

use serde::{Deserialize, Serialize};

/// The parts of a postal address. Every field may be empty.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub company: String,
    /// e.g. "Ms." or "Dr."
    pub manner_of_address: String,
    pub first_name: String,
    pub last_name: String,
    /// Street and number
    pub address: String,
    pub zip_code: String,
    pub city: String,
    /// Replaces the whole address when not empty, one line per line
    pub full_override: String,
}

impl Address {
    /// Collect the fields from some record by name, each looked up as `{prefix}{field}`
    /// (e.g. `billing_city`). Missing fields are left empty.
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use pdf_document::Address;
    ///
    /// let record = HashMap::from([
    ///     ("billing_last_name", "Muster"),
    ///     ("billing_city", " Zürich "),
    /// ]);
    /// let address = Address::from_lookup("billing_", |key| {
    ///     record.get(key).map(|v| v.to_string())
    /// });
    /// assert_eq!(address.city, "Zürich");
    /// ```
    pub fn from_lookup<F>(prefix: &str, lookup: F) -> Address
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |field: &str| {
            lookup(&format!("{prefix}{field}"))
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };
        Address {
            company: get("company"),
            manner_of_address: get("manner_of_address"),
            first_name: get("first_name"),
            last_name: get("last_name"),
            address: get("address"),
            zip_code: get("zip_code"),
            city: get("city"),
            full_override: get("full_override"),
        }
    }

    /// The lines of the address as they are printed
    pub fn lines(&self) -> Vec<String> {
        let full_override = self.full_override.trim();
        if !full_override.is_empty() {
            return full_override
                .replace('\r', "")
                .lines()
                .map(|line| line.trim().to_string())
                .collect();
        }

        let mut lines = Vec::with_capacity(4);
        let company = self.company.trim();
        if !company.is_empty() {
            lines.push(company.to_string());
        }

        let mut title = self.manner_of_address.trim().to_string();
        if !title.is_empty() {
            title.push(' ');
        }
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();
        if first_name.is_empty() {
            lines.push(format!("{title}{last_name}"));
        } else {
            lines.push(format!("{title}{first_name} {last_name}"));
        }

        lines.push(self.address.trim().to_string());
        lines.push(format!("{} {}", self.zip_code.trim(), self.city.trim()));
        lines
    }

    /// The address as one block of text, lines separated by `\n`
    pub fn to_text(&self) -> String {
        self.lines().join("\n")
    }
}
