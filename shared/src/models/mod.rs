//! Data models
//!
//! Records exchanged with the HR server. They mirror the JSON the server
//! emits; this layer never enforces entity invariants on them.
//! All IDs are `i64`.

/// String-backed enum that keeps values it does not know.
///
/// The server adds statuses and categories over time, so an unknown value
/// is carried as `Other(raw)` and rendered verbatim instead of failing the
/// whole response.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// Value unknown to this client, kept verbatim
            Other(String),
        }

        impl $name {
            /// Wire representation
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $wire, )+
                    Self::Other(raw) => raw.as_str(),
                }
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.as_str() {
                    $( $wire => Self::$variant, )+
                    _ => Self::Other(raw),
                }
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::from(raw.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(raw) => raw,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod chat;
pub mod complaint;
pub mod employee;
pub mod payroll;
pub mod permission;
pub mod role;
pub mod ticket;

// Re-exports
pub use chat::*;
pub use complaint::*;
pub use employee::*;
pub use payroll::*;
pub use permission::*;
pub use role::*;
pub use ticket::*;
