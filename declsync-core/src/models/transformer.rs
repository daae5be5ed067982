//! Transformer configuration: one 35-way variant group.
//!
//! The selected variant is the transformer's identity; its payload holds
//! optional parameters. No cross-field checks happen here (`min <= max` and
//! friends are left to the editing front-end or the remote service).
//! Defaults are only filled in by [`TransformerConfig::with_defaults`].

use crate::variant::{Empty, variant_group};
use serde::{Deserialize, Serialize};

variant_group! {
    /// Transformer kind and its parameters. Declared order is selection order.
    pub enum TransformerConfig / TransformerConfigSlots as "transformer config" {
        GenerateEmail(GenerateEmail) => generate_email,
        TransformEmail(TransformEmail) => transform_email,
        GenerateBool(Empty) => generate_bool,
        GenerateCardNumber(GenerateCardNumber) => generate_card_number,
        GenerateCity(Empty) => generate_city,
        GenerateE164PhoneNumber(LengthRange) => generate_e164_phone_number,
        GenerateFirstName(Empty) => generate_first_name,
        GenerateFloat64(GenerateFloat64) => generate_float64,
        GenerateCategorical(GenerateCategorical) => generate_categorical,
        GenerateFullName(Empty) => generate_full_name,
        GenerateGender(GenerateGender) => generate_gender,
        GenerateInt64PhoneNumber(Empty) => generate_int64_phone_number,
        GenerateInt64(GenerateInt64) => generate_int64,
        GenerateLastName(Empty) => generate_last_name,
        GenerateSha256Hash(Empty) => generate_sha256_hash,
        GenerateSsn(Empty) => generate_ssn,
        GenerateState(GenerateState) => generate_state,
        GenerateDefault(Empty) => generate_default,
        GenerateStringPhoneNumber(LengthRange) => generate_string_phone_number,
        GenerateString(LengthRange) => generate_string,
        GenerateUnixTimestamp(Empty) => generate_unix_timestamp,
        GenerateUsername(Empty) => generate_username,
        GenerateUtcTimestamp(Empty) => generate_utc_timestamp,
        GenerateUuid(GenerateUuid) => generate_uuid,
        /// Reference to a transformer defined elsewhere on the account
        UserDefinedTransformer(UserDefinedTransformer) => user_defined_transformer,
        TransformE164PhoneNumber(PreserveLength) => transform_e164_phone_number,
        TransformFirstName(PreserveLength) => transform_first_name,
        TransformFloat64(TransformFloat64) => transform_float64,
        TransformFullName(PreserveLength) => transform_full_name,
        TransformInt64(TransformInt64) => transform_int64,
        TransformLastName(PreserveLength) => transform_last_name,
        TransformString(PreserveLength) => transform_string,
        /// Copy the value unchanged
        Passthrough(Empty) => passthrough,
        /// Write NULL
        Null(Empty) => null,
        TransformJavascript(JavascriptCode) => transform_javascript,
    }
}

const DEFAULT_JAVASCRIPT: &str = "return value;";

impl TransformerConfig {
    /// Returns a copy with every absent parameter set to its documented
    /// default. Encoding never calls this, so round-trips stay exact.
    pub fn with_defaults(&self) -> Self {
        let mut config = self.clone();
        match &mut config {
            Self::GenerateEmail(params) => {
                params.email_type.get_or_insert(EmailType::UuidV4);
            }
            Self::TransformEmail(params) => {
                params.preserve_domain.get_or_insert(false);
                params.preserve_length.get_or_insert(false);
                params.excluded_domains.get_or_insert_with(Vec::new);
                params.email_type.get_or_insert(EmailType::UuidV4);
                params
                    .invalid_email_action
                    .get_or_insert(InvalidEmailAction::Reject);
            }
            Self::GenerateCardNumber(params) => {
                params.valid_luhn.get_or_insert(true);
            }
            Self::GenerateE164PhoneNumber(range) => range.fill(9, 15),
            Self::GenerateFloat64(params) => {
                params.randomize_sign.get_or_insert(false);
                params.min.get_or_insert(1.0);
                params.max.get_or_insert(100.0);
                params.precision.get_or_insert(6);
            }
            Self::GenerateCategorical(params) => {
                params
                    .categories
                    .get_or_insert_with(|| vec!["value1".to_string(), "value2".to_string()]);
            }
            Self::GenerateGender(params) => {
                params.abbreviate.get_or_insert(false);
            }
            Self::GenerateInt64(params) => {
                params.randomize_sign.get_or_insert(false);
                params.min.get_or_insert(1);
                params.max.get_or_insert(100);
            }
            Self::GenerateState(params) => {
                params.generate_full_name.get_or_insert(false);
            }
            Self::GenerateStringPhoneNumber(range) => range.fill(9, 14),
            Self::GenerateString(range) => range.fill(2, 7),
            Self::GenerateUuid(params) => {
                params.include_hyphens.get_or_insert(true);
            }
            Self::TransformE164PhoneNumber(params)
            | Self::TransformFirstName(params)
            | Self::TransformFullName(params)
            | Self::TransformLastName(params)
            | Self::TransformString(params) => {
                params.preserve_length.get_or_insert(false);
            }
            Self::TransformFloat64(params) => {
                params.randomization_range_min.get_or_insert(1.0);
                params.randomization_range_max.get_or_insert(10.0);
            }
            Self::TransformInt64(params) => {
                params.randomization_range_min.get_or_insert(1);
                params.randomization_range_max.get_or_insert(10);
            }
            Self::TransformJavascript(params) => {
                params
                    .code
                    .get_or_insert_with(|| DEFAULT_JAVASCRIPT.to_string());
            }
            // Marker variants and references carry nothing to default.
            _ => {}
        }
        config
    }
}

/// Shape of a generated email address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailType {
    UuidV4,
    FullName,
    Any,
}

/// What to do with a value that is not a valid email address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidEmailAction {
    Reject,
    Null,
    Passthrough,
    Generate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateEmail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_type: Option<EmailType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformEmail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_domain: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_length: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded_domains: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_type: Option<EmailType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_email_action: Option<InvalidEmailAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateCardNumber {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_luhn: Option<bool>,
}

/// Inclusive length bounds shared by the phone-number and string generators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LengthRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

impl LengthRange {
    /// Creates a fully specified range.
    pub const fn new(min: i64, max: i64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    fn fill(&mut self, min: i64, max: i64) {
        self.min.get_or_insert(min);
        self.max.get_or_insert(max);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateFloat64 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub randomize_sign: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Significant digits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateCategorical {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateGender {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abbreviate: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateInt64 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub randomize_sign: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate_full_name: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateUuid {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_hyphens: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserDefinedTransformer {
    pub id: String,
}

/// The single flag shared by the name, phone and string transformers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreserveLength {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_length: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformFloat64 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub randomization_range_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub randomization_range_max: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformInt64 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub randomization_range_min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub randomization_range_max: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JavascriptCode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_thirty_five_kinds_in_declared_order() {
        assert_eq!(TransformerConfig::TAGS.len(), 35);
        assert_eq!(TransformerConfig::TAGS[0], "generate_email");
        assert_eq!(TransformerConfig::TAGS[34], "transform_javascript");
    }

    #[test]
    fn test_first_populated_slot_wins() {
        // generate_bool is declared before passthrough.
        let slots = TransformerConfigSlots {
            passthrough: Some(Empty {}),
            generate_bool: Some(Empty {}),
            ..Default::default()
        };
        assert_eq!(
            TransformerConfig::try_from(slots),
            Ok(TransformerConfig::GenerateBool(Empty {}))
        );
    }

    #[test]
    fn test_with_defaults_fills_only_absent_parameters() {
        let config = TransformerConfig::GenerateInt64(GenerateInt64 {
            min: Some(-5),
            ..Default::default()
        });
        assert_eq!(
            config.with_defaults(),
            TransformerConfig::GenerateInt64(GenerateInt64 {
                randomize_sign: Some(false),
                min: Some(-5),
                max: Some(100),
            })
        );

        let config = TransformerConfig::GenerateString(LengthRange::default());
        assert_eq!(
            config.with_defaults(),
            TransformerConfig::GenerateString(LengthRange::new(2, 7))
        );

        let config = TransformerConfig::Null(Empty {});
        assert_eq!(config.with_defaults(), config);
    }

    #[test]
    fn test_transform_email_defaults() {
        let config = TransformerConfig::TransformEmail(TransformEmail::default()).with_defaults();
        let TransformerConfig::TransformEmail(params) = config else {
            panic!("variant changed");
        };
        assert_eq!(params.email_type, Some(EmailType::UuidV4));
        assert_eq!(params.invalid_email_action, Some(InvalidEmailAction::Reject));
        assert_eq!(params.excluded_domains, Some(vec![]));
    }

    #[test]
    fn test_slot_form_serde() {
        let config: TransformerConfig = serde_json::from_value(json!({
            "generate_categorical": {"categories": ["red", "blue"]}
        }))
        .expect("deserialize");
        assert_eq!(config.tag(), "generate_categorical");

        let value = serde_json::to_value(TransformerConfig::TransformEmail(TransformEmail {
            email_type: Some(EmailType::FullName),
            ..Default::default()
        }))
        .expect("serialize");
        assert_eq!(value["transform_email"]["email_type"], "full_name");
    }
}
