// SPDX-License-Identifier: Apache-2.0

use crate::ids::TypeId;
use crate::todo::Priority;
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

pub const COMPLETION_METHODS: [&str; 4] = ["auto", "modal", "dropdown", "none"];

/// How the client collects completion input for todos of a type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionMethod {
    #[default]
    Auto,
    Modal,
    Dropdown,
    None,
}

impl CompletionMethod {
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw {
            "auto" => Ok(Self::Auto),
            "modal" => Ok(Self::Modal),
            "dropdown" => Ok(Self::Dropdown),
            "none" => Ok(Self::None),
            _ => Err(format!(
                "completionMethod must be one of: {}",
                COMPLETION_METHODS.join(", ")
            )),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Modal => "modal",
            Self::Dropdown => "dropdown",
            Self::None => "none",
        }
    }
}

impl Display for CompletionMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Select,
    Rating,
    Number,
    Date,
    Datetime,
    Signature,
    Photo,
    Barcode,
    Qr,
}

/// One entry of a completion form, rendered by the client when the type's
/// method is `modal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionField {
    pub field_name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeLabel {
    pub code: String,
    pub label: String,
}

/// Dismissal policy. On the wire this is either the literal string `"none"`
/// (dismissal disabled, distinct from "not yet configured") or an ordered
/// list of `{code, label}` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DismissalCodes {
    Disabled,
    Codes(Vec<CodeLabel>),
}

impl DismissalCodes {
    #[must_use]
    pub fn codes(&self) -> &[CodeLabel] {
        match self {
            Self::Disabled => &[],
            Self::Codes(codes) => codes,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Codes(codes) if !codes.is_empty())
    }

    /// An empty editable list persists as the `"none"` sentinel.
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            Self::Codes(codes) if codes.is_empty() => Self::Disabled,
            other => other,
        }
    }
}

impl Default for DismissalCodes {
    fn default() -> Self {
        Self::Codes(Vec::new())
    }
}

impl Serialize for DismissalCodes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Disabled => serializer.serialize_str("none"),
            Self::Codes(codes) => codes.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for DismissalCodes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CodesVisitor;

        impl<'de> Visitor<'de> for CodesVisitor {
            type Value = DismissalCodes;

            fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str("the string \"none\" or a list of {code, label} entries")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                if value == "none" {
                    Ok(DismissalCodes::Disabled)
                } else {
                    Err(E::custom(format!(
                        "dismissalCodes string must be \"none\", got {value:?}"
                    )))
                }
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut codes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(entry) = seq.next_element::<CodeLabel>()? {
                    codes.push(entry);
                }
                Ok(DismissalCodes::Codes(codes))
            }
        }

        deserializer.deserialize_any(CodesVisitor)
    }
}

/// Template describing completion/dismissal policy and form fields for a
/// category of todo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoType {
    pub id: TypeId,
    pub name: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completion_method: CompletionMethod,
    #[serde(default)]
    pub completion_fields: Vec<CompletionField>,
    #[serde(default)]
    pub dismissal_codes: DismissalCodes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_codes: Option<Vec<CodeLabel>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dismissal_codes_sentinel_round_trips() {
        let raw = serde_json::json!("none");
        let codes: DismissalCodes = serde_json::from_value(raw).expect("decode sentinel");
        assert_eq!(codes, DismissalCodes::Disabled);
        assert_eq!(
            serde_json::to_value(&codes).expect("encode"),
            serde_json::json!("none")
        );
    }

    #[test]
    fn dismissal_codes_list_round_trips() {
        let raw = serde_json::json!([{"code": "NO_STOCK", "label": "No stock on hand"}]);
        let codes: DismissalCodes = serde_json::from_value(raw.clone()).expect("decode list");
        assert!(codes.is_enabled());
        assert_eq!(serde_json::to_value(&codes).expect("encode"), raw);
    }

    #[test]
    fn dismissal_codes_other_strings_are_rejected() {
        assert!(serde_json::from_value::<DismissalCodes>(serde_json::json!("nope")).is_err());
    }

    #[test]
    fn empty_list_normalizes_to_disabled() {
        let codes = DismissalCodes::Codes(Vec::new()).normalized();
        assert_eq!(codes, DismissalCodes::Disabled);
        let kept = DismissalCodes::Codes(vec![CodeLabel {
            code: "DAMAGED".to_string(),
            label: "Damaged".to_string(),
        }])
        .normalized();
        assert!(kept.is_enabled());
    }

    #[test]
    fn todo_type_defaults_match_registry_policy() {
        let raw = serde_json::json!({"id": "pick_exception", "name": "Pick Exception"});
        let ty: TodoType = serde_json::from_value(raw).expect("decode type");
        assert_eq!(ty.priority, Priority::MEDIUM);
        assert_eq!(ty.completion_method, CompletionMethod::Auto);
        assert!(ty.completion_fields.is_empty());
        assert_eq!(ty.dismissal_codes, DismissalCodes::Codes(Vec::new()));
    }

    #[test]
    fn field_type_wire_names_are_lowercase() {
        let raw = serde_json::json!({
            "fieldName": "dock_door",
            "type": "barcode",
            "label": "Dock door",
            "required": true
        });
        let field: CompletionField = serde_json::from_value(raw).expect("decode field");
        assert_eq!(field.field_type, FieldType::Barcode);
        let out = serde_json::to_value(&field).expect("encode");
        assert_eq!(out["type"], serde_json::json!("barcode"));
    }
}
