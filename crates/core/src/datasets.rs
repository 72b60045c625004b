use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The published datasets the viewer knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetId {
    #[default]
    Movies,
    VideoGames,
    Kickstarter,
}

impl DatasetId {
    pub const ALL: [DatasetId; 3] = [DatasetId::Movies, DatasetId::VideoGames, DatasetId::Kickstarter];

    pub fn key(self) -> &'static str {
        match self {
            DatasetId::Movies => "movies",
            DatasetId::VideoGames => "videogames",
            DatasetId::Kickstarter => "kickstarter",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            DatasetId::Movies => "Movie Sales",
            DatasetId::VideoGames => "Video Game Sales",
            DatasetId::Kickstarter => "Kickstarter Pledges",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DatasetId::Movies => "Top 100 Highest Grossing Movies Grouped By Genre",
            DatasetId::VideoGames => "Top 100 Most Sold Video Games Grouped by Platform",
            DatasetId::Kickstarter => "Top 100 Most Pledged Kickstarter Campaigns Grouped By Category",
        }
    }

    /// Where the dataset is published.
    pub fn source_url(self) -> &'static str {
        match self {
            DatasetId::Movies => {
                "https://cdn.freecodecamp.org/testable-projects-fcc/data/tree_map/movie-data.json"
            }
            DatasetId::VideoGames => {
                "https://cdn.freecodecamp.org/testable-projects-fcc/data/tree_map/video-game-sales-data.json"
            }
            DatasetId::Kickstarter => {
                "https://cdn.freecodecamp.org/testable-projects-fcc/data/tree_map/kickstarter-funding-data.json"
            }
        }
    }

    pub fn file_name(self) -> &'static str {
        // Last path segment of the published URL.
        self.source_url().rsplit('/').next().unwrap_or_default()
    }

    pub fn path_in(self, data_dir: &Path) -> PathBuf {
        data_dir.join(self.file_name())
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DatasetId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DatasetId::ALL
            .into_iter()
            .find(|d| d.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::invalid(format!("unknown dataset {s:?}")))
    }
}

/// Title and description shown above a rendered treemap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heading {
    pub title: String,
    pub description: String,
}

impl From<DatasetId> for Heading {
    fn from(id: DatasetId) -> Self {
        Heading {
            title: id.title().to_string(),
            description: id.description().to_string(),
        }
    }
}
