use serde::Serialize;
use strum_macros::{EnumIter, IntoStaticStr};

/// The family a rule belongs to, shown by `pgcheck rules`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, IntoStaticStr)]
pub enum Category {
    #[strum(serialize = "breaking change")]
    BreakingChange,
    #[strum(serialize = "nullability")]
    Nullability,
    #[strum(serialize = "locking")]
    Locking,
    #[strum(serialize = "idempotency")]
    Idempotency,
    #[strum(serialize = "miscellaneous")]
    Miscellaneous,
    #[strum(serialize = "types")]
    Types,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
