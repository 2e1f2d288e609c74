use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category tag for a generated artifact. Selects the generation prompt
/// template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Lesson,
    Assignment,
    Quiz,
    Notes,
}

impl ContentType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lesson => "lesson",
            Self::Assignment => "assignment",
            Self::Quiz => "quiz",
            Self::Notes => "notes",
        }
    }

    /// Human readable label used when building artifact titles.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lesson => "Lesson Plan",
            Self::Assignment => "Assignment",
            Self::Quiz => "Quiz",
            Self::Notes => "Lecture Notes",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lesson" => Ok(Self::Lesson),
            "assignment" => Ok(Self::Assignment),
            "quiz" => Ok(Self::Quiz),
            "notes" => Ok(Self::Notes),
            other => Err(anyhow::anyhow!("Unknown content type: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for ct in [
            ContentType::Lesson,
            ContentType::Assignment,
            ContentType::Quiz,
            ContentType::Notes,
        ] {
            assert_eq!(ct.as_str().parse::<ContentType>().unwrap(), ct);
        }
        assert!("essay".parse::<ContentType>().is_err());
    }
}
