//! The five pipeline stages

use crate::prompt::{template_for, PromptTemplate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One stage of the analysis pipeline, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Validation,
    Scoring,
    Improvement,
    Funding,
    Launch,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Validation,
        Stage::Scoring,
        Stage::Improvement,
        Stage::Funding,
        Stage::Launch,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// 1-based position in the pipeline
    pub fn index(self) -> usize {
        match self {
            Stage::Validation => 1,
            Stage::Scoring => 2,
            Stage::Improvement => 3,
            Stage::Funding => 4,
            Stage::Launch => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Validation => "Validation",
            Stage::Scoring => "Scoring",
            Stage::Improvement => "Improvement",
            Stage::Funding => "Funding",
            Stage::Launch => "Launch",
        }
    }

    /// Human-readable progress label
    pub fn label(self) -> &'static str {
        match self {
            Stage::Validation => "Validating idea",
            Stage::Scoring => "Analyzing potential",
            Stage::Improvement => "Generating improvements",
            Stage::Funding => "Planning funding",
            Stage::Launch => "Creating launch strategy",
        }
    }

    pub fn template(self) -> &'static PromptTemplate {
        template_for(self)
    }

    pub fn next(self) -> Option<Stage> {
        Self::ALL.get(self.index()).copied()
    }

    /// Case-insensitive lookup by name
    pub fn from_name(name: &str) -> Option<Stage> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
