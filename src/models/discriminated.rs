//! Tagged-union decoding for polymorphic API payloads.
//!
//! Many TrueLayer resources come in one wire shape whose meaning depends on
//! a discriminator field: a payment's `status`, a beneficiary's `type`, and
//! so on. Each such family is modelled as a Rust enum with one newtype
//! variant per concrete shape. The enum implements [`Discriminated`], which
//! names the discriminator field and provides a [`VariantRegistry`] mapping
//! tags to decoders; [`decode`] does the dispatch.
//!
//! Families also get uniform narrowing accessors (`is_*`, `as_*`, `into_*`)
//! generated by the `discriminated!` macro, so callers never need to match
//! on a variant just to reach its fields.
//!
//! # Example
//!
//! ```
//! use truelayer_rs::models::{decode, Beneficiary};
//! use serde_json::json;
//!
//! let beneficiary: Beneficiary = decode(json!({
//!     "type": "merchant_account",
//!     "merchant_account_id": "ma-123",
//! })).unwrap();
//!
//! assert!(beneficiary.is_merchant_account());
//! assert!(beneficiary.as_external_account().is_err());
//! ```

use serde_json::Value;

use crate::error::DecodeError;

/// Function that builds one concrete variant from a full payload.
pub type VariantDecoder<T> = fn(Value) -> Result<T, DecodeError>;

/// One registered variant of a family.
#[derive(Debug)]
pub struct VariantEntry<T: 'static> {
    /// Discriminator value selecting this variant
    pub tag: &'static str,
    /// Decoder for this variant
    pub decode: VariantDecoder<T>,
}

/// The closed set of variants of a family, plus an optional fallback used
/// when the discriminator carries a value this crate does not know yet.
#[derive(Debug)]
pub struct VariantRegistry<T: 'static> {
    variants: &'static [VariantEntry<T>],
    fallback: Option<&'static str>,
}

impl<T> VariantRegistry<T> {
    /// Create a registry that rejects unknown tags.
    pub const fn new(variants: &'static [VariantEntry<T>]) -> Self {
        Self {
            variants,
            fallback: None,
        }
    }

    /// Create a registry that decodes unknown tags as the variant
    /// registered under `fallback`.
    pub const fn with_fallback(variants: &'static [VariantEntry<T>], fallback: &'static str) -> Self {
        Self {
            variants,
            fallback: Some(fallback),
        }
    }

    /// Look up the decoder registered for `tag`.
    pub fn get(&self, tag: &str) -> Option<VariantDecoder<T>> {
        self.variants
            .iter()
            .find(|entry| entry.tag == tag)
            .map(|entry| entry.decode)
    }

    /// Registered tags, in declaration order.
    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.variants.iter().map(|entry| entry.tag)
    }

    /// Tag of the variant unknown tags are decoded as, if any.
    pub fn fallback(&self) -> Option<&'static str> {
        self.fallback
    }
}

/// A tagged-union family of response or request shapes.
pub trait Discriminated: Sized + 'static {
    /// Human-readable family name, used in error messages.
    const FAMILY: &'static str;

    /// Name of the discriminator field on the wire.
    const DISCRIMINATOR: &'static str;

    /// Tag-to-decoder registry for this family.
    fn registry() -> &'static VariantRegistry<Self>;

    /// Wire tag of the concrete variant.
    fn tag(&self) -> &'static str;

    /// Rust name of the concrete variant.
    fn variant_name(&self) -> &'static str;
}

/// Decode `payload` into the variant of `T` selected by its discriminator.
///
/// # Errors
///
/// - [`DecodeError::NotAnObject`] if `payload` is not a JSON object
/// - [`DecodeError::MissingDiscriminator`] if the discriminator is absent
///   or not a string
/// - [`DecodeError::UnknownTag`] if the tag is unknown and `T` has no
///   fallback variant
/// - [`DecodeError::Payload`] if the selected variant rejects the payload
pub fn decode<T: Discriminated>(payload: Value) -> Result<T, DecodeError> {
    let tag = match &payload {
        Value::Object(map) => match map.get(T::DISCRIMINATOR) {
            Some(Value::String(tag)) => tag.clone(),
            _ => {
                return Err(DecodeError::MissingDiscriminator {
                    family: T::FAMILY,
                    field: T::DISCRIMINATOR,
                })
            }
        },
        _ => return Err(DecodeError::NotAnObject { family: T::FAMILY }),
    };

    let registry = T::registry();
    if let Some(decode_variant) = registry.get(&tag) {
        return decode_variant(payload);
    }

    match registry.fallback.and_then(|fallback| registry.get(fallback)) {
        Some(decode_fallback) => {
            tracing::warn!(
                family = T::FAMILY,
                field = T::DISCRIMINATOR,
                tag = %tag,
                fallback = registry.fallback.unwrap_or_default(),
                "unknown discriminator value, decoding with fallback variant"
            );
            decode_fallback(payload)
        }
        None => Err(DecodeError::UnknownTag {
            family: T::FAMILY,
            field: T::DISCRIMINATOR,
            tag,
        }),
    }
}

/// Deserialize one variant's payload, tagging failures with the variant
/// name. Used by the decoders the `discriminated!` macro generates.
pub(crate) fn decode_variant<V: serde::de::DeserializeOwned>(
    variant: &'static str,
    payload: Value,
) -> Result<V, DecodeError> {
    serde_json::from_value(payload).map_err(|e| DecodeError::payload(variant, e))
}

/// Implements [`Discriminated`], `Deserialize` and the narrowing accessors
/// for a family enum whose variants are all newtypes.
///
/// ```ignore
/// discriminated! {
///     Beneficiary("beneficiary", discriminator = "type") {
///         MerchantAccount(MerchantAccount) = "merchant_account"
///             => is_merchant_account, as_merchant_account, into_merchant_account;
///     }
/// }
/// ```
///
/// An optional `fallback = "tag"` after the discriminator designates the
/// variant used for unknown tags.
macro_rules! discriminated {
    (
        $family:ident($family_name:literal, discriminator = $field:literal $(, fallback = $fallback:literal)?) {
            $(
                $variant:ident($inner:ty) = $tag:literal => $is:ident, $as:ident, $into:ident;
            )+
        }
    ) => {
        impl $crate::models::discriminated::Discriminated for $family {
            const FAMILY: &'static str = $family_name;
            const DISCRIMINATOR: &'static str = $field;

            fn registry() -> &'static $crate::models::discriminated::VariantRegistry<Self> {
                static ENTRIES: &[$crate::models::discriminated::VariantEntry<$family>] = &[
                    $(
                        $crate::models::discriminated::VariantEntry {
                            tag: $tag,
                            decode: |payload| {
                                $crate::models::discriminated::decode_variant::<$inner>(
                                    stringify!($variant),
                                    payload,
                                )
                                .map($family::$variant)
                            },
                        },
                    )+
                ];
                static REGISTRY: $crate::models::discriminated::VariantRegistry<$family> =
                    discriminated!(@registry ENTRIES $(, $fallback)?);
                &REGISTRY
            }

            fn tag(&self) -> &'static str {
                match self {
                    $( $family::$variant(_) => $tag, )+
                }
            }

            fn variant_name(&self) -> &'static str {
                match self {
                    $( $family::$variant(_) => stringify!($variant), )+
                }
            }
        }

        impl<'de> serde::Deserialize<'de> for $family {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let payload = serde_json::Value::deserialize(deserializer)?;
                $crate::models::discriminated::decode(payload).map_err(serde::de::Error::custom)
            }
        }

        impl $family {
            fn accessor_for(&self) -> &'static str {
                match self {
                    $( $family::$variant(_) => stringify!($as), )+
                }
            }

            fn mismatch(&self, expected: &'static str) -> $crate::Error {
                $crate::error::TypeMismatchError {
                    family: $family_name,
                    expected,
                    actual: $crate::models::discriminated::Discriminated::variant_name(self),
                    accessor: self.accessor_for(),
                }
                .into()
            }

            $(
                #[doc = concat!("Returns `true` if this is the `", $tag, "` variant.")]
                pub fn $is(&self) -> bool {
                    matches!(self, $family::$variant(_))
                }

                #[doc = concat!("Borrow the `", $tag, "` variant, or fail with a type mismatch.")]
                pub fn $as(&self) -> $crate::Result<&$inner> {
                    match self {
                        $family::$variant(inner) => Ok(inner),
                        #[allow(unreachable_patterns)]
                        _ => Err(self.mismatch(stringify!($variant))),
                    }
                }

                #[doc = concat!("Unwrap the `", $tag, "` variant, or fail with a type mismatch.")]
                pub fn $into(self) -> $crate::Result<$inner> {
                    match self {
                        $family::$variant(inner) => Ok(inner),
                        #[allow(unreachable_patterns)]
                        other => Err(other.mismatch(stringify!($variant))),
                    }
                }
            )+
        }
    };

    (@registry $entries:ident) => {
        $crate::models::discriminated::VariantRegistry::new($entries)
    };

    (@registry $entries:ident, $fallback:literal) => {
        $crate::models::discriminated::VariantRegistry::with_fallback($entries, $fallback)
    };
}

pub(crate) use discriminated;
