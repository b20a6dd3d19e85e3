//! Macro for implementing Display and FromStr for wire-name enums
//!
//! Enums that travel as fixed strings (HTTP verbs, failure kinds) share one
//! implementation for both Display and FromStr. Parsing is case-insensitive,
//! output is always the canonical spelling.
//!
//! # Example
//!
//! ```rust
//! use dfcontacts_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Verb {
//!     Get,
//!     Post,
//! }
//!
//! impl_wire_name_conversions!(Verb {
//!     Get => "GET",
//!     Post => "POST",
//! });
//!
//! assert_eq!(Verb::Get.to_string(), "GET");
//! assert_eq!("post".parse::<Verb>().unwrap(), Verb::Post);
//! ```

/// Implements Display and FromStr traits for wire-name enums
///
/// This macro generates:
/// - Display trait: writes the canonical string for each variant
/// - FromStr trait: parses case-insensitive strings to enum variants
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their canonical strings
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Canonical wire spelling of this variant.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
