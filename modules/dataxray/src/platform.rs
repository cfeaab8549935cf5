use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// A named search scope. The suffix is appended to the search prompt to
/// narrow grounding results to a family of sites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    All,
    Kaggle,
    HuggingFace,
    GitHub,
    Gov,
    Papers,
}

impl Platform {
    /// Display order.
    pub const ALL: [Platform; 6] = [
        Platform::All,
        Platform::Kaggle,
        Platform::HuggingFace,
        Platform::GitHub,
        Platform::Gov,
        Platform::Papers,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Platform::All => "all",
            Platform::Kaggle => "kaggle",
            Platform::HuggingFace => "huggingface",
            Platform::GitHub => "github",
            Platform::Gov => "gov",
            Platform::Papers => "papers",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Platform::All => "All Sources",
            Platform::Kaggle => "Kaggle",
            Platform::HuggingFace => "Hugging Face",
            Platform::GitHub => "GitHub",
            Platform::Gov => "Gov Data",
            Platform::Papers => "Academic",
        }
    }

    /// Empty for `All`.
    pub fn query_suffix(self) -> &'static str {
        match self {
            Platform::All => "",
            Platform::Kaggle => "site:kaggle.com",
            Platform::HuggingFace => "site:huggingface.co",
            Platform::GitHub => {
                "site:github.com filetype:csv OR filetype:json OR filetype:parquet"
            }
            Platform::Gov => "site:data.gov OR site:europa.eu",
            Platform::Papers => "site:arxiv.org OR site:paperswithcode.com",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown platform '{0}' (expected one of: all, kaggle, huggingface, github, gov, papers)")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Platform::ALL
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownPlatform(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_all_with_empty_suffix() {
        assert_eq!(Platform::default(), Platform::All);
        assert_eq!(Platform::All.query_suffix(), "");
    }

    #[test]
    fn parses_every_id_case_insensitively() {
        for platform in Platform::ALL {
            assert_eq!(platform.id().parse::<Platform>().unwrap(), platform);
            assert_eq!(
                platform.id().to_uppercase().parse::<Platform>().unwrap(),
                platform
            );
        }
    }

    #[test]
    fn rejects_unknown_id() {
        let err = "zenodo".parse::<Platform>().unwrap_err();
        assert_eq!(err.0, "zenodo");
    }

    #[test]
    fn github_suffix() {
        assert_eq!(
            Platform::GitHub.query_suffix(),
            "site:github.com filetype:csv OR filetype:json OR filetype:parquet"
        );
        assert_eq!(Platform::GitHub.to_string(), "GitHub");
    }

    #[test]
    fn serializes_as_lowercase_id() {
        assert_eq!(
            serde_json::to_value(Platform::HuggingFace).unwrap(),
            serde_json::json!("huggingface")
        );
    }
}
