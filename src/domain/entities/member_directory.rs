use std::collections::HashMap;

/// User id to display name mapping for one channel.
///
/// Supplied by the caller and treated as read-only while a render job runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberDirectory {
    names: HashMap<String, String>,
}

impl MemberDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a member.
    #[must_use]
    pub fn with_member(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.names.insert(id.into(), name.into());
        self
    }

    /// Looks up the display name for a user id.
    #[must_use]
    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Number of known members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no members are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for MemberDirectory
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            names: iter
                .into_iter()
                .map(|(id, name)| (id.into(), name.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let members: MemberDirectory = [("42", "Nova"), ("7", "Ash")].into_iter().collect();

        assert_eq!(members.display_name("42"), Some("Nova"));
        assert_eq!(members.display_name("8"), None);
        assert_eq!(members.len(), 2);
    }
}
