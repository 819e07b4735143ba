//! Family renaming

use std::fmt;

use crate::tables::NamingTable;

const FAMILY: u16 = 1;
const SUBFAMILY: u16 = 2;
const FULL_NAME: u16 = 4;
const POSTSCRIPT_NAME: u16 = 6;
const TYPOGRAPHIC_FAMILY: u16 = 16;

/// Name strings written by [`rename_family`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FamilyNames {
    pub family: String,
    pub subfamily: String,
    pub full_name: String,
    pub postscript_name: String,
}

impl FamilyNames {
    pub fn new(family: &str, subfamily: &str) -> Self {
        Self {
            family: family.to_string(),
            subfamily: subfamily.to_string(),
            full_name: format!("{family} {subfamily}"),
            postscript_name: format!("{}-{}", strip_spaces(family), strip_spaces(subfamily)),
        }
    }
}

impl fmt::Display for FamilyNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.full_name, self.postscript_name)
    }
}

fn strip_spaces(s: &str) -> String {
    s.chars().filter(|c| *c != ' ').collect()
}

/// Rewrite the family, full and PostScript names, keeping the subfamily.
///
/// The subfamily is read from name ID 2 and falls back to `Regular`. Only
/// records already present are rewritten; the typographic family (ID 16) is
/// updated where the font carries one.
pub fn rename_family(names: &mut impl NamingTable, family: &str) -> FamilyNames {
    let subfamily = names.get(SUBFAMILY).unwrap_or_else(|| "Regular".to_string());
    let new_names = FamilyNames::new(family, &subfamily);

    names.set(FAMILY, &new_names.family);
    names.set(FULL_NAME, &new_names.full_name);
    names.set(POSTSCRIPT_NAME, &new_names.postscript_name);
    names.set(TYPOGRAPHIC_FAMILY, &new_names.family);

    new_names
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[derive(Default)]
    struct FakeNames(BTreeMap<u16, String>);

    impl FakeNames {
        fn with(mut self, name_id: u16, value: &str) -> Self {
            self.0.insert(name_id, value.to_string());
            self
        }
    }

    impl NamingTable for FakeNames {
        fn get(&self, name_id: u16) -> Option<String> {
            self.0.get(&name_id).cloned()
        }

        fn set(&mut self, name_id: u16, value: &str) -> usize {
            match self.0.get_mut(&name_id) {
                Some(existing) => {
                    *existing = value.to_string();
                    1
                }
                None => 0,
            }
        }
    }

    #[test]
    fn test_rename_keeps_subfamily() {
        let mut names = FakeNames::default()
            .with(1, "Source Font")
            .with(2, "Bold")
            .with(4, "Source Font Bold")
            .with(6, "SourceFont-Bold");

        let result = rename_family(&mut names, "Test Merged Font");

        assert_eq!(result.full_name, "Test Merged Font Bold");
        assert_eq!(result.postscript_name, "TestMergedFont-Bold");
        assert_eq!(names.get(1).as_deref(), Some("Test Merged Font"));
        assert_eq!(names.get(2).as_deref(), Some("Bold"));
        assert_eq!(names.get(4).as_deref(), Some("Test Merged Font Bold"));
        assert_eq!(names.get(6).as_deref(), Some("TestMergedFont-Bold"));
        assert_eq!(names.get(16), None);
    }

    #[test]
    fn test_rename_default_subfamily() {
        let mut names = FakeNames::default().with(1, "Old").with(4, "Old Regular").with(16, "Old");

        let result = rename_family(&mut names, "TestMergedFont");

        assert_eq!(result.subfamily, "Regular");
        assert_eq!(names.get(4).as_deref(), Some("TestMergedFont Regular"));
        assert_eq!(names.get(16).as_deref(), Some("TestMergedFont"));
    }

    #[test]
    fn test_postscript_name_strips_spaces() {
        let names = FamilyNames::new("My Font", "Semi Bold");
        assert_eq!(names.postscript_name, "MyFont-SemiBold");
        assert_eq!(names.to_string(), "My Font Semi Bold (MyFont-SemiBold)");
    }
}
