//! Macro for implementing Display and FromStr for wire code enums
//!
//! The API reports well-known conditions as short dotted codes
//! (`token.expired`, `token.invalid`). This macro maps an enum onto those
//! codes in both directions so callers never compare raw strings.
//!
//! # Example
//!
//! ```rust
//! use ignitegym_domain::impl_wire_code_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum SessionCode {
//!     Expired,
//!     Invalid,
//! }
//!
//! impl_wire_code_conversions!(SessionCode {
//!     Expired => "session.expired",
//!     Invalid => "session.invalid",
//! });
//!
//! assert_eq!(SessionCode::Expired.to_string(), "session.expired");
//! assert_eq!("session.invalid".parse::<SessionCode>(), Ok(SessionCode::Invalid));
//! ```

/// Implements Display and FromStr traits for wire code enums
///
/// Parsing is exact: the server's codes are case-sensitive, so
/// `"TOKEN.EXPIRED"` is not the same code as `"token.expired"`.
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their wire codes
#[macro_export]
macro_rules! impl_wire_code_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Unknown {} code: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
