use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Skill grouping used by the analysis endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillCategory {
    TechnicalSkills,
    SoftSkills,
    DomainKnowledge,
    ToolsAndPlatforms,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 4] = [
        SkillCategory::TechnicalSkills,
        SkillCategory::SoftSkills,
        SkillCategory::DomainKnowledge,
        SkillCategory::ToolsAndPlatforms,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SkillCategory::TechnicalSkills => "technical_skills",
            SkillCategory::SoftSkills => "soft_skills",
            SkillCategory::DomainKnowledge => "domain_knowledge",
            SkillCategory::ToolsAndPlatforms => "tools_and_platforms",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Skills per category, as inferred by the remote service or confirmed by the
/// candidate. Sets, not lists: the original UI toggles membership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSet {
    #[serde(default)]
    pub technical_skills: BTreeSet<String>,
    #[serde(default)]
    pub soft_skills: BTreeSet<String>,
    #[serde(default)]
    pub domain_knowledge: BTreeSet<String>,
    #[serde(default)]
    pub tools_and_platforms: BTreeSet<String>,
}

impl SkillSet {
    #[must_use]
    pub fn category(&self, category: SkillCategory) -> &BTreeSet<String> {
        match category {
            SkillCategory::TechnicalSkills => &self.technical_skills,
            SkillCategory::SoftSkills => &self.soft_skills,
            SkillCategory::DomainKnowledge => &self.domain_knowledge,
            SkillCategory::ToolsAndPlatforms => &self.tools_and_platforms,
        }
    }

    pub fn insert(&mut self, category: SkillCategory, skill: impl Into<String>) {
        let set = match category {
            SkillCategory::TechnicalSkills => &mut self.technical_skills,
            SkillCategory::SoftSkills => &mut self.soft_skills,
            SkillCategory::DomainKnowledge => &mut self.domain_knowledge,
            SkillCategory::ToolsAndPlatforms => &mut self.tools_and_platforms,
        };
        set.insert(skill.into());
    }

    #[must_use]
    pub fn contains(&self, category: SkillCategory, skill: &str) -> bool {
        self.category(category).contains(skill)
    }

    /// Total skills across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        SkillCategory::ALL
            .iter()
            .map(|category| self.category(*category).len())
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
