//! Job-role autocomplete: a fixed catalog plus the filtering and selection
//! behavior the welcome form offers.

/// Roles offered as suggestions for the job-role field.
pub const JOB_ROLES: &[&str] = &[
    "Software Developer",
    "Frontend Developer",
    "Backend Developer",
    "Full Stack Developer",
    "Software Engineer",
    "DevOps Engineer",
    "Product Manager",
    "Product Owner",
    "Project Manager",
    "UX Designer",
    "UI Designer",
    "Data Analyst",
    "Data Scientist",
    "Marketing Manager",
    "Sales Manager",
    "Sales",
    "Director of Sales",
    "Team Lead",
    "Engineering Manager",
    "Director of Engineering",
    "Human Resources Manager",
    "HR Specialist",
    "Financial Analyst",
    "Accountant",
    "Financial Manager",
    "Operations Manager",
    "Customer Service Representative",
    "Customer Success Manager",
    "Content Writer",
    "Copywriter",
    "Consultant",
    "Cybersecurity Analyst",
    "Security Engineer",
    "Attorney",
    "Lawyer",
    "Legal Counsel",
    "Healthcare Manager",
    "Medical Professional",
    "Clinical Director",
    "Research Scientist",
    "Teacher",
    "Educator",
    "Instructor",
];

/// Case-insensitive suggestion filter. Prefix matches rank ahead of substring
/// matches; empty input yields nothing.
#[must_use]
pub fn suggest_roles(input: &str) -> Vec<&'static str> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let mut prefixed = Vec::new();
    let mut contained = Vec::new();
    for role in JOB_ROLES {
        let lower = role.to_lowercase();
        if lower.starts_with(&needle) {
            prefixed.push(*role);
        } else if lower.contains(&needle) {
            contained.push(*role);
        }
    }
    prefixed.extend(contained);
    prefixed
}

/// Keyboard selection over a suggestion list: down and up wrap around,
/// escape clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionCursor {
    len: usize,
    selected: Option<usize>,
}

impl SuggestionCursor {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            len,
            selected: None,
        }
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn down(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let next = match self.selected {
            None => 0,
            Some(i) => (i + 1) % self.len,
        };
        self.selected = Some(next);
        self.selected
    }

    pub fn up(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let next = match self.selected {
            None => self.len - 1,
            Some(i) => (i + self.len - 1) % self.len,
        };
        self.selected = Some(next);
        self.selected
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_suggests_nothing() {
        assert!(suggest_roles("  ").is_empty());
    }

    #[test]
    fn prefix_matches_rank_first() {
        let suggestions = suggest_roles("back");
        assert_eq!(suggestions.first(), Some(&"Backend Developer"));

        let suggestions = suggest_roles("engineer");
        assert!(suggestions.contains(&"Engineering Manager"));
        assert!(suggestions.contains(&"DevOps Engineer"));
        let prefix_pos = suggestions
            .iter()
            .position(|r| *r == "Engineering Manager")
            .unwrap();
        let contains_pos = suggestions
            .iter()
            .position(|r| *r == "DevOps Engineer")
            .unwrap();
        assert!(prefix_pos < contains_pos);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(suggest_roles("DEVOPS"), vec!["DevOps Engineer"]);
    }

    #[test]
    fn cursor_wraps_both_ways() {
        let mut cursor = SuggestionCursor::new(3);
        assert_eq!(cursor.selected(), None);
        assert_eq!(cursor.down(), Some(0));
        assert_eq!(cursor.down(), Some(1));
        assert_eq!(cursor.down(), Some(2));
        assert_eq!(cursor.down(), Some(0));
        assert_eq!(cursor.up(), Some(2));
        cursor.clear();
        assert_eq!(cursor.selected(), None);
        assert_eq!(cursor.up(), Some(2));
    }

    #[test]
    fn empty_list_never_selects() {
        let mut cursor = SuggestionCursor::new(0);
        assert_eq!(cursor.down(), None);
        assert_eq!(cursor.up(), None);
    }
}
