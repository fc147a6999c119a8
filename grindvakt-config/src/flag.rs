//! Boolean keys as the portal dispatcher hands them over.
//!
//! The dispatcher reads its plugin section from an INI file, so flags arrive
//! as strings (`"True"`, `"yes"`, `"0"`), while YAML and environment layers
//! produce real booleans or integers. All of them are accepted.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

/// Interpret the usual INI spellings of a boolean, case-insensitively.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}

pub(crate) fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match FlagValue::deserialize(deserializer)? {
        FlagValue::Bool(b) => Ok(b),
        FlagValue::Int(0) => Ok(false),
        FlagValue::Int(1) => Ok(true),
        FlagValue::Int(n) => Err(serde::de::Error::custom(format!(
            "Not a boolean: {n}"
        ))),
        FlagValue::Str(s) => parse_flag(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("Not a boolean: {s:?}"))),
    }
}
