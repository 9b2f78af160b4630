use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Platform-wide roles of the requesting user.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    pub struct UserRoles: u32 {
        /// Global staff: bypasses start dates and enrollment, matches `staff` flags.
        const STAFF = 1 << 0;
        const SUPERUSER = 1 << 1;
        /// May load courses before their start date.
        const BETA_TESTER = 1 << 2;

        const ALL = Self::STAFF.bits() | Self::SUPERUSER.bits() | Self::BETA_TESTER.bits();
    }
}

impl UserRoles {
    /// Parses a comma separated role list (`"staff,beta_tester"`); unknown names are ignored.
    #[must_use]
    pub fn parse_list(raw: &str) -> Self {
        raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(Self::from).collect()
    }

    #[must_use]
    pub const fn is_staff(self) -> bool {
        self.intersects(Self::STAFF.union(Self::SUPERUSER))
    }
}

impl From<&str> for UserRoles {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "staff" => Self::STAFF,
            "superuser" => Self::SUPERUSER,
            "beta_tester" | "beta" => Self::BETA_TESTER,
            "all" | "*" => Self::ALL,
            _ => Self::empty(),
        }
    }
}

impl Serialize for UserRoles {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for UserRoles {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u32::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}
