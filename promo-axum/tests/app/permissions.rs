use std::{fmt::Display, str::FromStr};

// In order to test the correctness of our permission checks in our endpoints,
// we define a declarative permission scheme, which is encoded as plain text
// into the `Authorization: Bearer <...>` header. This allows us to easily
// construct "tokens" that exercise the permission configurations.
#[derive(Debug, Default, Clone, Copy)]
pub struct Permissions {
    pub view: bool,
    pub manage: bool,
}

impl Display for Permissions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut grants = Vec::new();
        if self.view {
            grants.push("view");
        }
        if self.manage {
            grants.push("manage");
        }
        write!(f, "{}", grants.join(","))
    }
}

impl FromStr for Permissions {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut permissions = Self::default();
        for grant in s.split(',').filter(|grant| !grant.is_empty()) {
            match grant {
                "view" => permissions.view = true,
                "manage" => permissions.manage = true,
                other => return Err(format!("unknown grant {other}")),
            }
        }
        Ok(permissions)
    }
}
