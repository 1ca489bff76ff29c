use serde::{Deserialize, Serialize};

/// Raised when a stored or configured string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid value for {field}: {value}")]
pub struct InvalidEnum {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnum;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
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

// How a second entry for the same consumer, service code and day is treated.
str_enum!(DuplicatePolicy {
    RejectDuplicates => "reject_duplicates",
    Hold => "hold",
});

// What happens when an entry consumes more units than the block has left.
str_enum!(OverdrawPolicy {
    Clamp => "clamp",
    Reject => "reject",
});

str_enum!(FilterField {
    Specialist => "specialist",
    Consumer => "consumer",
    ServiceCode => "service_code",
    Status => "status",
    County => "county",
    ServiceDate => "service_date",
    Hold => "hold",
    ContractType => "contract_type",
    Confirmation => "confirmation",
    BilledCode => "billed_code",
});

str_enum!(FilterOp {
    Eq => "eq",
    Ne => "ne",
    Lt => "lt",
    Le => "le",
    Gt => "gt",
    Ge => "ge",
});
