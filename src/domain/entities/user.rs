use std::fmt;

/// Represents a Telegram user in the system
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    pub id: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: None,
            first_name: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_first_name(mut self, first: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self
    }

    pub fn display_name(&self) -> String {
        if let Some(ref username) = self.username {
            format!("@{}", username)
        } else if let Some(ref first) = self.first_name {
            first.clone()
        } else {
            self.id.clone()
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_username() {
        let user = User::new("42").with_first_name("Ivan").with_username("ivan_seller");
        assert_eq!(user.display_name(), "@ivan_seller");

        let user = User::new("42").with_first_name("Ivan");
        assert_eq!(user.to_string(), "Ivan");

        assert_eq!(User::new("42").display_name(), "42");
    }
}
