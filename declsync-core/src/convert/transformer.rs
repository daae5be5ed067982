//! Transformer converters.
//!
//! Encoding dispatches on the selected variant; the declared order of the 35
//! branches is enforced when slot form becomes a [`TransformerConfig`].
//! Decoding is a direct tag switch, and a tag this build does not know is a
//! loud `UnsupportedVariant`, never a silent drop.

use crate::convert::{FromWire, ToWire};
use crate::error::{ConvertError, Result};
use crate::models::transformer::{
    EmailType, GenerateEmail, InvalidEmailAction, TransformEmail, TransformerConfig,
    UserDefinedTransformer,
};
use crate::wire::transformer::{self as wire, TransformerKind};

impl EmailType {
    /// Wire code.
    pub const fn code(self) -> i32 {
        match self {
            Self::UuidV4 => wire::EMAIL_TYPE_UUID_V4,
            Self::FullName => wire::EMAIL_TYPE_FULL_NAME,
            Self::Any => wire::EMAIL_TYPE_ANY,
        }
    }

    /// Parses a wire code. 0 is unspecified and yields `None`.
    ///
    /// # Errors
    /// `UnsupportedVariant("email_type=<code>")` for codes this build lacks.
    pub fn from_code(code: i32) -> Result<Option<Self>> {
        match code {
            0 => Ok(None),
            wire::EMAIL_TYPE_UUID_V4 => Ok(Some(Self::UuidV4)),
            wire::EMAIL_TYPE_FULL_NAME => Ok(Some(Self::FullName)),
            wire::EMAIL_TYPE_ANY => Ok(Some(Self::Any)),
            other => Err(ConvertError::unsupported_code("email_type", other)),
        }
    }
}

impl InvalidEmailAction {
    /// Wire code.
    pub const fn code(self) -> i32 {
        match self {
            Self::Reject => wire::INVALID_EMAIL_ACTION_REJECT,
            Self::Null => wire::INVALID_EMAIL_ACTION_NULL,
            Self::Passthrough => wire::INVALID_EMAIL_ACTION_PASSTHROUGH,
            Self::Generate => wire::INVALID_EMAIL_ACTION_GENERATE,
        }
    }

    /// Parses a wire code. 0 is unspecified and yields `None`.
    ///
    /// # Errors
    /// `UnsupportedVariant("invalid_email_action=<code>")` for unknown codes.
    pub fn from_code(code: i32) -> Result<Option<Self>> {
        match code {
            0 => Ok(None),
            wire::INVALID_EMAIL_ACTION_REJECT => Ok(Some(Self::Reject)),
            wire::INVALID_EMAIL_ACTION_NULL => Ok(Some(Self::Null)),
            wire::INVALID_EMAIL_ACTION_PASSTHROUGH => Ok(Some(Self::Passthrough)),
            wire::INVALID_EMAIL_ACTION_GENERATE => Ok(Some(Self::Generate)),
            other => Err(ConvertError::unsupported_code("invalid_email_action", other)),
        }
    }
}

fn email_type_from_wire(code: Option<i32>) -> Result<Option<EmailType>> {
    Ok(code.map(EmailType::from_code).transpose()?.flatten())
}

fn invalid_email_action_from_wire(code: Option<i32>) -> Result<Option<InvalidEmailAction>> {
    Ok(code
        .map(InvalidEmailAction::from_code)
        .transpose()?
        .flatten())
}

/// A user-defined transformer is only a reference; it must name its target.
fn require_reference(reference: &UserDefinedTransformer) -> Result<UserDefinedTransformer> {
    if reference.id.is_empty() {
        return Err(ConvertError::nil_input("user_defined_transformer.id"));
    }
    Ok(reference.clone())
}

impl ToWire for TransformerConfig {
    type Wire = wire::TransformerConfig;

    fn to_wire(&self) -> Result<Self::Wire> {
        tracing::debug!(variant = self.tag(), "encoding transformer config");
        let kind = match self {
            Self::GenerateEmail(params) => TransformerKind::GenerateEmail(wire::GenerateEmail {
                email_type: params.email_type.map(EmailType::code),
            }),
            Self::TransformEmail(params) => {
                TransformerKind::TransformEmail(wire::TransformEmail {
                    preserve_domain: params.preserve_domain,
                    preserve_length: params.preserve_length,
                    excluded_domains: params.excluded_domains.clone(),
                    email_type: params.email_type.map(EmailType::code),
                    invalid_email_action: params.invalid_email_action.map(InvalidEmailAction::code),
                })
            }
            Self::GenerateBool(marker) => TransformerKind::GenerateBool(*marker),
            Self::GenerateCardNumber(params) => TransformerKind::GenerateCardNumber(params.clone()),
            Self::GenerateCity(marker) => TransformerKind::GenerateCity(*marker),
            Self::GenerateE164PhoneNumber(range) => {
                TransformerKind::GenerateE164PhoneNumber(range.clone())
            }
            Self::GenerateFirstName(marker) => TransformerKind::GenerateFirstName(*marker),
            Self::GenerateFloat64(params) => TransformerKind::GenerateFloat64(params.clone()),
            Self::GenerateCategorical(params) => {
                TransformerKind::GenerateCategorical(params.clone())
            }
            Self::GenerateFullName(marker) => TransformerKind::GenerateFullName(*marker),
            Self::GenerateGender(params) => TransformerKind::GenerateGender(params.clone()),
            Self::GenerateInt64PhoneNumber(marker) => {
                TransformerKind::GenerateInt64PhoneNumber(*marker)
            }
            Self::GenerateInt64(params) => TransformerKind::GenerateInt64(params.clone()),
            Self::GenerateLastName(marker) => TransformerKind::GenerateLastName(*marker),
            Self::GenerateSha256Hash(marker) => TransformerKind::GenerateSha256Hash(*marker),
            Self::GenerateSsn(marker) => TransformerKind::GenerateSsn(*marker),
            Self::GenerateState(params) => TransformerKind::GenerateState(params.clone()),
            Self::GenerateDefault(marker) => TransformerKind::GenerateDefault(*marker),
            Self::GenerateStringPhoneNumber(range) => {
                TransformerKind::GenerateStringPhoneNumber(range.clone())
            }
            Self::GenerateString(range) => TransformerKind::GenerateString(range.clone()),
            Self::GenerateUnixTimestamp(marker) => TransformerKind::GenerateUnixTimestamp(*marker),
            Self::GenerateUsername(marker) => TransformerKind::GenerateUsername(*marker),
            Self::GenerateUtcTimestamp(marker) => TransformerKind::GenerateUtcTimestamp(*marker),
            Self::GenerateUuid(params) => TransformerKind::GenerateUuid(params.clone()),
            Self::UserDefinedTransformer(reference) => {
                TransformerKind::UserDefinedTransformer(require_reference(reference)?)
            }
            Self::TransformE164PhoneNumber(params) => {
                TransformerKind::TransformE164PhoneNumber(params.clone())
            }
            Self::TransformFirstName(params) => TransformerKind::TransformFirstName(params.clone()),
            Self::TransformFloat64(params) => TransformerKind::TransformFloat64(params.clone()),
            Self::TransformFullName(params) => TransformerKind::TransformFullName(params.clone()),
            Self::TransformInt64(params) => TransformerKind::TransformInt64(params.clone()),
            Self::TransformLastName(params) => TransformerKind::TransformLastName(params.clone()),
            Self::TransformString(params) => TransformerKind::TransformString(params.clone()),
            Self::Passthrough(marker) => TransformerKind::Passthrough(*marker),
            Self::Null(marker) => TransformerKind::Null(*marker),
            Self::TransformJavascript(code) => TransformerKind::TransformJavascript(code.clone()),
        };
        Ok(wire::TransformerConfig { config: Some(kind) })
    }
}

impl FromWire for TransformerConfig {
    type Wire = wire::TransformerConfig;

    fn from_wire(wire: &Self::Wire) -> Result<Self> {
        let kind = wire
            .config
            .as_ref()
            .ok_or_else(|| ConvertError::missing_variant(Self::GROUP))?;

        Ok(match kind {
            TransformerKind::GenerateEmail(params) => Self::GenerateEmail(GenerateEmail {
                email_type: email_type_from_wire(params.email_type)?,
            }),
            TransformerKind::TransformEmail(params) => Self::TransformEmail(TransformEmail {
                preserve_domain: params.preserve_domain,
                preserve_length: params.preserve_length,
                excluded_domains: params.excluded_domains.clone(),
                email_type: email_type_from_wire(params.email_type)?,
                invalid_email_action: invalid_email_action_from_wire(params.invalid_email_action)?,
            }),
            TransformerKind::GenerateBool(marker) => Self::GenerateBool(*marker),
            TransformerKind::GenerateCardNumber(params) => Self::GenerateCardNumber(params.clone()),
            TransformerKind::GenerateCity(marker) => Self::GenerateCity(*marker),
            TransformerKind::GenerateE164PhoneNumber(range) => {
                Self::GenerateE164PhoneNumber(range.clone())
            }
            TransformerKind::GenerateFirstName(marker) => Self::GenerateFirstName(*marker),
            TransformerKind::GenerateFloat64(params) => Self::GenerateFloat64(params.clone()),
            TransformerKind::GenerateCategorical(params) => {
                Self::GenerateCategorical(params.clone())
            }
            TransformerKind::GenerateFullName(marker) => Self::GenerateFullName(*marker),
            TransformerKind::GenerateGender(params) => Self::GenerateGender(params.clone()),
            TransformerKind::GenerateInt64PhoneNumber(marker) => {
                Self::GenerateInt64PhoneNumber(*marker)
            }
            TransformerKind::GenerateInt64(params) => Self::GenerateInt64(params.clone()),
            TransformerKind::GenerateLastName(marker) => Self::GenerateLastName(*marker),
            TransformerKind::GenerateSha256Hash(marker) => Self::GenerateSha256Hash(*marker),
            TransformerKind::GenerateSsn(marker) => Self::GenerateSsn(*marker),
            TransformerKind::GenerateState(params) => Self::GenerateState(params.clone()),
            TransformerKind::GenerateDefault(marker) => Self::GenerateDefault(*marker),
            TransformerKind::GenerateStringPhoneNumber(range) => {
                Self::GenerateStringPhoneNumber(range.clone())
            }
            TransformerKind::GenerateString(range) => Self::GenerateString(range.clone()),
            TransformerKind::GenerateUnixTimestamp(marker) => Self::GenerateUnixTimestamp(*marker),
            TransformerKind::GenerateUsername(marker) => Self::GenerateUsername(*marker),
            TransformerKind::GenerateUtcTimestamp(marker) => Self::GenerateUtcTimestamp(*marker),
            TransformerKind::GenerateUuid(params) => Self::GenerateUuid(params.clone()),
            TransformerKind::UserDefinedTransformer(reference) => {
                Self::UserDefinedTransformer(require_reference(reference)?)
            }
            TransformerKind::TransformE164PhoneNumber(params) => {
                Self::TransformE164PhoneNumber(params.clone())
            }
            TransformerKind::TransformFirstName(params) => Self::TransformFirstName(params.clone()),
            TransformerKind::TransformFloat64(params) => Self::TransformFloat64(params.clone()),
            TransformerKind::TransformFullName(params) => Self::TransformFullName(params.clone()),
            TransformerKind::TransformInt64(params) => Self::TransformInt64(params.clone()),
            TransformerKind::TransformLastName(params) => Self::TransformLastName(params.clone()),
            TransformerKind::TransformString(params) => Self::TransformString(params.clone()),
            TransformerKind::Passthrough(marker) => Self::Passthrough(*marker),
            TransformerKind::Null(marker) => Self::Null(*marker),
            TransformerKind::TransformJavascript(code) => Self::TransformJavascript(code.clone()),
            TransformerKind::Unknown(tag) => return Err(tag.unsupported()),
            TransformerKind::Malformed(payload) => return Err(payload.invalid()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transformer::TransformerConfigSlots;
    use crate::variant::Empty;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(EmailType::UuidV4, 1)]
    #[case(EmailType::FullName, 2)]
    #[case(EmailType::Any, 3)]
    fn test_email_type_codes(#[case] email_type: EmailType, #[case] code: i32) {
        assert_eq!(email_type.code(), code);
        assert_eq!(EmailType::from_code(code), Ok(Some(email_type)));
    }

    #[rstest]
    #[case(InvalidEmailAction::Reject, 1)]
    #[case(InvalidEmailAction::Null, 2)]
    #[case(InvalidEmailAction::Passthrough, 3)]
    #[case(InvalidEmailAction::Generate, 4)]
    fn test_invalid_email_action_codes(#[case] action: InvalidEmailAction, #[case] code: i32) {
        assert_eq!(action.code(), code);
        assert_eq!(InvalidEmailAction::from_code(code), Ok(Some(action)));
    }

    #[test]
    fn test_unspecified_and_unknown_codes() {
        assert_eq!(EmailType::from_code(0), Ok(None));
        assert_eq!(
            InvalidEmailAction::from_code(42),
            Err(ConvertError::UnsupportedVariant("invalid_email_action=42".to_string()))
        );
    }

    #[test]
    fn test_every_slot_survives_a_round_trip() {
        for tag in TransformerConfig::TAGS {
            let payload = match *tag {
                "user_defined_transformer" => json!({"id": "t-1"}),
                _ => json!({}),
            };
            let slots: TransformerConfigSlots =
                serde_json::from_value(json!({ *tag: payload })).expect("slot form");
            let config = TransformerConfig::try_from(slots).expect("config");
            assert_eq!(config.tag(), *tag);

            let wire = config.to_wire().expect("encode");
            let value = serde_json::to_value(&wire).expect("serialize");
            assert!(value["config"].get(*tag).is_some(), "wire tag for {tag}");
            assert_eq!(TransformerConfig::from_wire(&wire), Ok(config));
        }
    }

    #[test]
    fn test_unknown_tag_decodes_to_unsupported_variant() {
        let wire: wire::TransformerConfig =
            serde_json::from_value(json!({"config": {"generate_future_thing": {}}}))
                .expect("deserialize");
        assert_eq!(
            TransformerConfig::from_wire(&wire),
            Err(ConvertError::UnsupportedVariant("generate_future_thing".to_string()))
        );
    }

    #[test]
    fn test_user_defined_reference_needs_an_id() {
        let config = TransformerConfig::UserDefinedTransformer(UserDefinedTransformer::default());
        assert_eq!(
            config.to_wire(),
            Err(ConvertError::nil_input("user_defined_transformer.id"))
        );
    }

    #[test]
    fn test_email_codes_on_the_wire() {
        let config = TransformerConfig::TransformEmail(TransformEmail {
            email_type: Some(EmailType::Any),
            invalid_email_action: Some(InvalidEmailAction::Passthrough),
            ..Default::default()
        });
        let value = serde_json::to_value(config.to_wire().expect("encode")).expect("serialize");
        assert_eq!(
            value,
            json!({"config": {"transform_email": {"email_type": 3, "invalid_email_action": 3}}})
        );

        let config = TransformerConfig::Passthrough(Empty {});
        assert_eq!(
            serde_json::to_value(config.to_wire().expect("encode")).expect("serialize"),
            json!({"config": {"passthrough": {}}})
        );
    }
}
