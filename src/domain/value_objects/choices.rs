//! # Choice Enums
//!
//! Every enumerated column in the gateway schema is a closed set of
//! upper-snake codes (`PENDING`, `NON_CUSTODIAL`, ...) with a human label.
//! [`choice_enum!`] generates the enum plus its wire code, label,
//! [`Display`](std::fmt::Display) and [`FromStr`](std::str::FromStr)
//! implementations, so each record module only lists its variants.
//!
//! ```
//! use mtt_gateway::domain::entities::wallets::WalletCategory;
//!
//! let category: WalletCategory = "NON_CUSTODIAL".parse().unwrap();
//! assert_eq!(category.label(), "Non-Custodial");
//! assert_eq!(category.to_string(), "NON_CUSTODIAL");
//! assert!("PAPER".parse::<WalletCategory>().is_err());
//! ```

/// Generates a choice enum.
///
/// Syntax:
///
/// ```text
/// choice_enum! {
///     /// Docs.
///     pub enum Name("field_name") = DefaultVariant {
///         Variant = "CODE" => "Label",
///     }
/// }
/// ```
///
/// The `= DefaultVariant` part is optional and implements [`Default`].
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($field:literal) $(= $default:ident)? {
            $($variant:ident = $code:literal => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        $vis enum $name {
            $(
                #[doc = $label]
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl $name {
            /// Every declared choice, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Stored code of this choice.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            /// Human-readable label of this choice.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::domain::errors::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($code => Ok(Self::$variant),)+
                    other => Err($crate::domain::errors::DomainError::InvalidChoice {
                        field: $field,
                        value: other.to_string(),
                    }),
                }
            }
        }

        $(
            impl Default for $name {
                fn default() -> Self {
                    Self::$default
                }
            }
        )?
    };
}

pub(crate) use choice_enum;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::domain::errors::DomainError;

    choice_enum! {
        /// Test-only choice.
        pub enum Flavor("flavor") = Plain {
            Plain = "PLAIN" => "Plain",
            DoubleShot = "DOUBLE_SHOT" => "Double Shot",
        }
    }

    #[test]
    fn codes_and_labels() {
        assert_eq!(Flavor::DoubleShot.as_str(), "DOUBLE_SHOT");
        assert_eq!(Flavor::DoubleShot.label(), "Double Shot");
        assert_eq!(Flavor::ALL.len(), 2);
        assert_eq!(Flavor::default(), Flavor::Plain);
    }

    #[test]
    fn parse_rejects_unknown_code() {
        assert_eq!("PLAIN".parse::<Flavor>().unwrap(), Flavor::Plain);
        let err = "plain".parse::<Flavor>().unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidChoice {
                field: "flavor",
                value: "plain".to_string()
            }
        );
    }

    #[test]
    fn serde_uses_codes() {
        let json = serde_json::to_string(&Flavor::DoubleShot).unwrap();
        assert_eq!(json, "\"DOUBLE_SHOT\"");
        let back: Flavor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Flavor::DoubleShot);
    }
}
