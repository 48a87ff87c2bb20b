//! Enumerations shared by the wallet and transaction domains.
//!
//! These mirror `pkg/types` in the Go original: small, serde-friendly enums
//! validated at the HTTP edge and stored as text in Postgres.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $repr:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $repr),+
                }
            }

            pub fn all() -> &'static [Self] {
                &[$(Self::$variant),+]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(if s.eq_ignore_ascii_case($repr) { return Ok(Self::$variant); })+
                Err(format!("invalid {}: {}", stringify!($name), s))
            }
        }
    };
}

string_enum! {
    /// ISO-ish currency code a wallet is denominated in.
    Currency {
        Usd => "USD",
        Eur => "EUR",
        Gbp => "GBP",
        Aed => "AED",
        Bhd => "BHD",
        Sar => "SAR",
    }
}

string_enum! {
    /// Lifecycle status of a wallet. Unlike transaction status, any value is
    /// reachable from any other (no state-machine guard, per spec.md 4.1).
    WalletStatus {
        Active => "active",
        Inactive => "inactive",
        Frozen => "frozen",
    }
}

string_enum! {
    TransactionType {
        Credit => "credit",
        Debit => "debit",
    }
}

string_enum! {
    TransactionStatus {
        Pending => "pending",
        Completed => "completed",
        Failed => "failed",
    }
}

impl TransactionStatus {
    /// True if `to` is a legal transition from `self`, per the state table in spec.md 3.
    pub fn can_transition_to(self, to: Self) -> bool {
        use TransactionStatus::*;
        match (self, to) {
            (Pending, Completed) | (Pending, Failed) => true,
            _ => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TransactionStatus::Completed | TransactionStatus::Failed)
    }
}
