//! Tagged-union discipline shared by every variant group.
//!
//! Variant groups are Rust enums in the configuration model, so a
//! constructed value always has exactly one branch. Front-ends, however,
//! hand over *slot form*: one optional field per branch, any number of
//! which may be populated. [`select_one`] turns slot form into the enum:
//! - slots are inspected in a fixed declared order;
//! - the first populated slot wins, with a warning if others are populated;
//! - no populated slot is [`ConvertError::MissingVariantSelection`].
//!
//! Front-ends that prefer a hard error over precedence call
//! `ensure_single()` on the slot form first.
//!
//! On the wire side every oneof enum is declared with [`wire_oneof!`], which
//! adds two catch-alls:
//! - [`UnknownTag`] for a tag from a newer server, decoded later into
//!   [`ConvertError::UnsupportedVariant`] instead of being dropped;
//! - [`MalformedPayload`] for a declared tag whose payload does not decode,
//!   reported as [`ConvertError::InvalidVariantSelection`] naming the field.

use crate::error::{ConvertError, Result};
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Payload of a branch that carries no parameters. Serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// Picks the first populated candidate in declared order.
///
/// # Errors
/// Returns `MissingVariantSelection` naming `group` when nothing is populated.
///
/// # Example
/// ```rust
/// use declsync_core::variant::select_one;
///
/// let picked = select_one("timing", vec![("pre_sync", None), ("post_sync", Some(2))]);
/// assert_eq!(picked, Ok(2));
/// ```
pub fn select_one<T>(group: &str, candidates: Vec<(&'static str, Option<T>)>) -> Result<T> {
    let mut populated = Vec::new();
    let mut selected = None;

    for (slot, value) in candidates {
        if let Some(value) = value {
            populated.push(slot);
            if selected.is_none() {
                selected = Some(value);
            }
        }
    }

    if let [first, ignored @ ..] = populated.as_slice()
        && !ignored.is_empty()
    {
        tracing::warn!(
            group,
            selected = *first,
            ?ignored,
            "multiple variants populated; keeping the first in declared order"
        );
    }

    selected.ok_or_else(|| ConvertError::missing_variant(group))
}

/// Strict counterpart of [`select_one`]'s precedence rule.
///
/// # Errors
/// Returns `InvalidVariantSelection` listing the populated slots when more
/// than one is populated.
pub fn ensure_single(group: &str, populated: &[&'static str]) -> Result<()> {
    if populated.len() > 1 {
        return Err(ConvertError::invalid_variant(format!(
            "{group}: multiple variants populated ({})",
            populated.join(", ")
        )));
    }
    Ok(())
}

/// A wire tag this build does not know.
///
/// Only the tag is kept; the payload cannot be interpreted and is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag(String);

impl UnknownTag {
    /// Wraps a raw tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The raw tag as received.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the tag into the decode-side error.
    pub fn unsupported(&self) -> ConvertError {
        ConvertError::unsupported_variant(self.0.clone())
    }
}

impl fmt::Display for UnknownTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for UnknownTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.0, &Empty {})?;
        map.end()
    }
}

/// A declared wire tag whose payload failed to decode.
///
/// The payload is kept verbatim so re-serializing gives back what arrived.
/// It may hold credentials, so `Debug` leaves it out.
#[derive(Clone, PartialEq)]
pub struct MalformedPayload {
    tag: String,
    field: Option<String>,
    detail: String,
    payload: Value,
}

impl MalformedPayload {
    /// The declared tag the payload arrived under.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// First payload field that fails on its own, when one can be singled out.
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Converts the payload failure into the decode-side error.
    pub fn invalid(&self) -> ConvertError {
        let location = match &self.field {
            Some(field) => format!("{}.{field}", self.tag),
            None => self.tag.clone(),
        };
        ConvertError::invalid_variant(format!("{location}: {}", self.detail))
    }
}

impl fmt::Debug for MalformedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MalformedPayload")
            .field("tag", &self.tag)
            .field("field", &self.field)
            .field("detail", &self.detail)
            .finish_non_exhaustive()
    }
}

impl Serialize for MalformedPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.tag, &self.payload)?;
        map.end()
    }
}

/// Splits a oneof value into its tag and payload.
///
/// Accepts a single-key object, or a bare tag string standing for `{tag: {}}`.
#[doc(hidden)]
pub fn split_tagged<E: serde::de::Error>(value: Value) -> std::result::Result<(String, Value), E> {
    match value {
        Value::String(tag) => Ok((tag, Value::Object(Map::new()))),
        Value::Object(map) if map.len() == 1 => map
            .into_iter()
            .next()
            .ok_or_else(|| E::custom("expected a variant tag")),
        other => Err(E::custom(format!(
            "expected a single variant tag, found {other}"
        ))),
    }
}

/// Decodes the payload of a declared tag.
#[doc(hidden)]
pub fn decode_payload<P: DeserializeOwned>(
    tag: &str,
    payload: Value,
) -> std::result::Result<P, MalformedPayload> {
    match P::deserialize(&payload) {
        Ok(decoded) => Ok(decoded),
        Err(err) => Err(MalformedPayload {
            tag: tag.to_string(),
            field: offending_field::<P>(&payload),
            detail: err.to_string(),
            payload,
        }),
    }
}

/// Names the first field that fails alone. Only meaningful when the payload
/// type accepts `{}`, otherwise every single field would fail.
fn offending_field<P: DeserializeOwned>(payload: &Value) -> Option<String> {
    let fields = payload.as_object()?;
    P::deserialize(&Value::Object(Map::new())).ok()?;
    fields.iter().find_map(|(name, value)| {
        let alone = Value::Object(Map::from_iter([(name.clone(), value.clone())]));
        P::deserialize(&alone).is_err().then(|| name.clone())
    })
}

/// Declares a wire oneof enum.
///
/// Generates, from one ordered list of `Variant(Payload) = "tag"` entries:
/// - the enum, with trailing `Unknown` and `Malformed` catch-alls;
/// - `TAGS` and `tag()`;
/// - externally tagged `Serialize`/`Deserialize` (`{"tag": payload}`), where
///   an undeclared tag becomes `Unknown` and a declared tag with a bad payload
///   becomes `Malformed`.
macro_rules! wire_oneof {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident $(<$generic:ident>)? {
            $(
                $(#[$vmeta:meta])*
                $variant:ident($payload:ty) = $tag:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name $(<$generic>)? {
            $(
                $(#[$vmeta])*
                $variant($payload),
            )+
            /// Tag this build does not declare
            Unknown($crate::variant::UnknownTag),
            /// Declared tag whose payload does not decode
            Malformed($crate::variant::MalformedPayload),
        }

        impl $(<$generic>)? $name $(<$generic>)? {
            /// Declared wire tags.
            pub const TAGS: &'static [&'static str] = &[$($tag),+];

            /// Wire tag of this value, as received for the catch-alls.
            pub fn tag(&self) -> &str {
                match self {
                    $( Self::$variant(_) => $tag, )+
                    Self::Unknown(unknown) => unknown.as_str(),
                    Self::Malformed(malformed) => malformed.tag(),
                }
            }
        }

        impl $(<$generic: ::serde::Serialize>)? ::serde::Serialize for $name $(<$generic>)? {
            fn serialize<S: ::serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::std::result::Result<S::Ok, S::Error> {
                use ::serde::ser::SerializeMap as _;
                match self {
                    $(
                        Self::$variant(payload) => {
                            let mut map = serializer.serialize_map(Some(1))?;
                            map.serialize_entry($tag, payload)?;
                            map.end()
                        }
                    )+
                    Self::Unknown(unknown) => ::serde::Serialize::serialize(unknown, serializer),
                    Self::Malformed(malformed) => {
                        ::serde::Serialize::serialize(malformed, serializer)
                    }
                }
            }
        }

        impl<'de $(, $generic: ::serde::de::DeserializeOwned)?> ::serde::Deserialize<'de>
            for $name $(<$generic>)?
        {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::std::result::Result<Self, D::Error> {
                let value = <::serde_json::Value as ::serde::Deserialize>::deserialize(deserializer)?;
                let (tag, payload) = $crate::variant::split_tagged::<D::Error>(value)?;
                Ok(match tag.as_str() {
                    $(
                        $tag => $crate::variant::decode_payload(&tag, payload)
                            .map_or_else(Self::Malformed, Self::$variant),
                    )+
                    _ => Self::Unknown($crate::variant::UnknownTag::new(tag)),
                })
            }
        }
    };
}

pub(crate) use wire_oneof;

/// Declares a configuration-model variant group.
///
/// Generates, from one ordered list of `Variant(Payload) => slot` entries:
/// - the enum itself;
/// - its slot-form struct with one optional field per variant;
/// - `TryFrom<Slots>` applying [`select_one`] in the listed order;
/// - `From<Enum>` back to slot form;
/// - `Serialize`/`Deserialize` for the enum going through slot form;
/// - `GROUP`, `TAGS` and `tag()` for diagnostics.
macro_rules! variant_group {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident / $slots:ident as $group:literal {
            $(
                $(#[$vmeta:meta])*
                $variant:ident($payload:ty) => $slot:ident
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant($payload),
            )+
        }

        #[doc = concat!("Slot form of [`", stringify!($name), "`]: one optional field per variant.")]
        #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        $vis struct $slots {
            $(
                #[allow(missing_docs)]
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $slot: Option<$payload>,
            )+
        }

        impl $name {
            /// Group name used in diagnostics.
            pub const GROUP: &'static str = $group;

            /// Slot names in declared selection order.
            pub const TAGS: &'static [&'static str] = &[$(stringify!($slot)),+];

            /// Slot name of the selected variant.
            pub const fn tag(&self) -> &'static str {
                match self {
                    $( Self::$variant(_) => stringify!($slot), )+
                }
            }
        }

        impl $slots {
            /// Names of the populated slots, in declared order.
            pub fn populated(&self) -> Vec<&'static str> {
                let mut populated = Vec::new();
                $(
                    if self.$slot.is_some() {
                        populated.push(stringify!($slot));
                    }
                )+
                populated
            }

            /// Rejects slot forms with more than one populated slot.
            pub fn ensure_single(&self) -> $crate::error::Result<()> {
                $crate::variant::ensure_single($group, &self.populated())
            }
        }

        impl TryFrom<$slots> for $name {
            type Error = $crate::error::ConvertError;

            fn try_from(slots: $slots) -> $crate::error::Result<Self> {
                $crate::variant::select_one(
                    $group,
                    vec![
                        $( (stringify!($slot), slots.$slot.map(Self::$variant)), )+
                    ],
                )
            }
        }

        impl From<$name> for $slots {
            fn from(value: $name) -> Self {
                let mut slots = Self::default();
                match value {
                    $( $name::$variant(payload) => slots.$slot = Some(payload), )+
                }
                slots
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::std::result::Result<S::Ok, S::Error> {
                ::serde::Serialize::serialize(&$slots::from(self.clone()), serializer)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::std::result::Result<Self, D::Error> {
                let slots = <$slots as ::serde::Deserialize>::deserialize(deserializer)?;
                Self::try_from(slots).map_err(::serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use variant_group;
