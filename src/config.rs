use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::preferences::Theme;

/// Title and background colors (hex codes without `#`) of a landing page variant
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PageColors {
    title: String,
    background: String,
}

impl PageColors {
    pub fn new<T: Into<String>, B: Into<String>>(title: T, background: B) -> Self {
        Self {
            title: title.into(),
            background: background.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn background(&self) -> &str {
        &self.background
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TopicConfig {
    /// First segment of every path in this topic
    pub slug: String,
    pub title: String,
    pub description: String,
    pub articles_directory: PathBuf,
    /// Article file names, in reading order
    pub articles: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    pub site_title: String,
    pub author_name: String,
    pub landing_page_colors: Vec<PageColors>,
    pub topics: Vec<TopicConfig>,
    pub files_directory: PathBuf,
    pub date_format: String,
    pub host_name: String,
    pub port: u16,
    pub log_level: String,
    pub file_watcher_delay_in_milliseconds: u64,
    #[serde(default)]
    pub default_theme: Theme,
}

impl Config {
    /// Returns a sample configuration, which should __not__ be used in production (because it
    /// lacks the author's name)
    pub fn sample() -> Self {
        Self {
            site_title: "Programming courses".into(),
            author_name: "<author name>".into(),
            landing_page_colors: vec![
                PageColors::new("C8566B", "F6E5E8"),
                PageColors::new("E78963", "FBEDE7"),
                PageColors::new("9D75BF", "F0EAF5"),
                PageColors::new("6661AB", "E8E7F2"),
            ],
            topics: vec![
                TopicConfig {
                    slug: "dotnet-api".into(),
                    title: ".NET API".into(),
                    description: "Building web APIs with ASP.NET Core".into(),
                    articles_directory: "articles/dotnet-api".into(),
                    articles: vec![
                        "introduction.md".into(),
                        "controllers.md".into(),
                        "entity-framework.md".into(),
                    ],
                },
                TopicConfig {
                    slug: "react".into(),
                    title: "React".into(),
                    description: "Components, hooks and state management".into(),
                    articles_directory: "articles/react".into(),
                    articles: vec![
                        "getting-started.md".into(),
                        "components.md".into(),
                        "hooks.md".into(),
                    ],
                },
            ],
            files_directory: "files".into(),
            date_format: "%Y.%m.%d".into(),
            host_name: "localhost".into(),
            port: 8080,
            log_level: "info".into(),
            file_watcher_delay_in_milliseconds: 2000,
            default_theme: Theme::Light,
        }
    }

    /// # Errors
    /// Returns an error if the file can't be read or isn't a valid configuration
    pub fn read(path: &Path) -> io::Result<Self> {
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))
    }
}
