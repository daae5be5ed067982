//! Transformer messages.
//!
//! Parameter messages with the same shape in both models are shared with
//! [`crate::models::transformer`]. Only the email messages differ: their
//! enumerations travel as integer codes, 0 meaning unspecified.

use crate::models::transformer::{
    GenerateCardNumber, GenerateCategorical, GenerateFloat64, GenerateGender, GenerateInt64,
    GenerateState, GenerateUuid, JavascriptCode, LengthRange, PreserveLength, TransformFloat64,
    TransformInt64, UserDefinedTransformer,
};
use crate::variant::{Empty, wire_oneof};
use serde::{Deserialize, Serialize};

/// `email_type` code for UUID-v4 local parts
pub const EMAIL_TYPE_UUID_V4: i32 = 1;
/// `email_type` code for full-name local parts
pub const EMAIL_TYPE_FULL_NAME: i32 = 2;
/// `email_type` code letting the service choose
pub const EMAIL_TYPE_ANY: i32 = 3;

/// `invalid_email_action` codes
pub const INVALID_EMAIL_ACTION_REJECT: i32 = 1;
pub const INVALID_EMAIL_ACTION_NULL: i32 = 2;
pub const INVALID_EMAIL_ACTION_PASSTHROUGH: i32 = 3;
pub const INVALID_EMAIL_ACTION_GENERATE: i32 = 4;

/// Transformer message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<TransformerKind>,
}

wire_oneof! {
    /// Transformer kind oneof.
    pub enum TransformerKind {
        GenerateEmail(GenerateEmail) = "generate_email",
        TransformEmail(TransformEmail) = "transform_email",
        GenerateBool(Empty) = "generate_bool",
        GenerateCardNumber(GenerateCardNumber) = "generate_card_number",
        GenerateCity(Empty) = "generate_city",
        GenerateE164PhoneNumber(LengthRange) = "generate_e164_phone_number",
        GenerateFirstName(Empty) = "generate_first_name",
        GenerateFloat64(GenerateFloat64) = "generate_float64",
        GenerateCategorical(GenerateCategorical) = "generate_categorical",
        GenerateFullName(Empty) = "generate_full_name",
        GenerateGender(GenerateGender) = "generate_gender",
        GenerateInt64PhoneNumber(Empty) = "generate_int64_phone_number",
        GenerateInt64(GenerateInt64) = "generate_int64",
        GenerateLastName(Empty) = "generate_last_name",
        GenerateSha256Hash(Empty) = "generate_sha256_hash",
        GenerateSsn(Empty) = "generate_ssn",
        GenerateState(GenerateState) = "generate_state",
        GenerateDefault(Empty) = "generate_default",
        GenerateStringPhoneNumber(LengthRange) = "generate_string_phone_number",
        GenerateString(LengthRange) = "generate_string",
        GenerateUnixTimestamp(Empty) = "generate_unix_timestamp",
        GenerateUsername(Empty) = "generate_username",
        GenerateUtcTimestamp(Empty) = "generate_utc_timestamp",
        GenerateUuid(GenerateUuid) = "generate_uuid",
        UserDefinedTransformer(UserDefinedTransformer) = "user_defined_transformer",
        TransformE164PhoneNumber(PreserveLength) = "transform_e164_phone_number",
        TransformFirstName(PreserveLength) = "transform_first_name",
        TransformFloat64(TransformFloat64) = "transform_float64",
        TransformFullName(PreserveLength) = "transform_full_name",
        TransformInt64(TransformInt64) = "transform_int64",
        TransformLastName(PreserveLength) = "transform_last_name",
        TransformString(PreserveLength) = "transform_string",
        Passthrough(Empty) = "passthrough",
        Null(Empty) = "null",
        TransformJavascript(JavascriptCode) = "transform_javascript",
    }
}

/// Email generator with a coded `email_type`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateEmail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_type: Option<i32>,
}

/// Email transformer with coded enumerations.
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
    pub email_type: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_email_action: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::UnknownTag;
    use serde_json::json;

    #[test]
    fn test_digit_tags_keep_their_underscores() {
        let wire = TransformerKind::GenerateE164PhoneNumber(LengthRange::new(9, 15));
        let value = serde_json::to_value(&wire).expect("serialize");
        assert!(value.get("generate_e164_phone_number").is_some());

        let wire: TransformerKind =
            serde_json::from_value(json!({"generate_sha256_hash": {}})).expect("deserialize");
        assert_eq!(wire, TransformerKind::GenerateSha256Hash(Empty {}));
    }

    #[test]
    fn test_unknown_transformer_tag_is_captured() {
        let wire: TransformerConfig =
            serde_json::from_value(json!({"config": {"generate_future_thing": {"seed": 4}}}))
                .expect("deserialize");
        assert_eq!(
            wire.config,
            Some(TransformerKind::Unknown(UnknownTag::new("generate_future_thing")))
        );
    }
}
