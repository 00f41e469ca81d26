use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::{debug, info, warn};
use rand::prelude::SliceRandom;

use crate::{
    config::{Config, PageColors, TopicConfig},
    error::SiteError,
    navigation::{neighbor_entries, prev_next, Neighbors, RouteEntry, RoutePath, RouteSequence},
    page_compilers::{
        compile_article, render_article, render_landing, render_not_found, render_topic,
        CompiledArticle, FileTime,
    },
    preferences::Theme,
    registry::{article_path, topic_path, Page, PageRegistry},
    utils::ExtractBaseName,
};

#[derive(Debug)]
pub struct Topic {
    pub slug: Arc<str>,
    pub title: Arc<str>,
    pub description: Arc<str>,
    pub path: Arc<RoutePath>,
    pub sequence: RouteSequence,
}

struct ArticleBody {
    html: String,
    modification_time: FileTime,
}

/// The whole catalog. Topics, their route sequences and the registry are fixed once loaded;
/// only article bodies get recompiled.
pub struct Site {
    config: Config,
    topics: Vec<Topic>,
    registry: PageRegistry,
    compiled_articles: HashMap<Arc<RoutePath>, ArticleBody>,
    article_sources: HashMap<PathBuf, Arc<RoutePath>>,
}

/// Canonical form of an article path. Only the directory is canonicalized, so removed files
/// still map to the key they were registered under.
fn source_key(path: &Path) -> PathBuf {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match (fs::canonicalize(parent), path.file_name()) {
        (Ok(parent), Some(file_name)) => parent.join(file_name),
        _ => path.to_owned(),
    }
}

impl Site {
    /// # Errors
    /// Fails if an article can't be read or two pages end up with the same path
    pub fn load(config: Config) -> Result<Self, SiteError> {
        let mut topics = Vec::with_capacity(config.topics.len());
        let mut compiled_articles = HashMap::new();
        let mut article_sources = HashMap::new();
        for topic_config in &config.topics {
            let TopicConfig {
                slug,
                title,
                description,
                articles_directory,
                articles,
            } = topic_config;
            let path = topic_path(slug)?;
            let mut entries = Vec::with_capacity(articles.len());
            for file_name in articles {
                let source = articles_directory.join(file_name);
                let CompiledArticle {
                    title: article_title,
                    body,
                    modification_time,
                } = compile_article(&source, &config)?;
                let file_name: Arc<str> = file_name.as_str().into();
                let route_path = article_path(&path, &file_name.base_name());
                debug!("Compiled {:?} as {}", source, route_path);
                compiled_articles.insert(
                    route_path.clone(),
                    ArticleBody {
                        html: body,
                        modification_time,
                    },
                );
                article_sources.insert(source_key(&source), route_path.clone());
                entries.push(RouteEntry::new(route_path, article_title.clone_contents()));
            }
            let sequence = RouteSequence::new(entries)?;
            if sequence.is_empty() {
                warn!("Topic `{}` has no articles", slug);
            }
            topics.push(Topic {
                slug: slug.as_str().into(),
                title: title.as_str().into(),
                description: description.as_str().into(),
                path,
                sequence,
            });
        }
        let registry = PageRegistry::new(&topics)?;
        info!(
            "Loaded {} topics with {} articles ({} pages in total)",
            topics.len(),
            compiled_articles.len(),
            registry.len()
        );
        Ok(Self {
            config,
            topics,
            registry,
            compiled_articles,
            article_sources,
        })
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn resolve(&self, path: &RoutePath) -> Option<(&Arc<RoutePath>, Page)> {
        self.registry.resolve(path)
    }

    /// Previous and next articles within the article's own topic
    pub fn neighbors(&self, path: &RoutePath) -> Neighbors<&RouteEntry> {
        match self.resolve(path) {
            Some((path, Page::Article { topic })) => {
                neighbor_entries(path, &self.topics[topic].sequence)
            }
            _ => Neighbors::none(),
        }
    }

    pub fn neighbor_paths(&self, path: &RoutePath) -> Neighbors<Arc<RoutePath>> {
        match self.resolve(path) {
            Some((path, Page::Article { topic })) => prev_next(path, &self.topics[topic].sequence),
            _ => Neighbors::none(),
        }
    }

    pub fn article_body(&self, path: &RoutePath) -> Option<&str> {
        self.compiled_articles
            .get(path)
            .map(|article| &article.html[..])
    }

    pub fn article_modification_time(&self, path: &RoutePath) -> Option<&FileTime> {
        self.compiled_articles
            .get(path)
            .map(|article| &article.modification_time)
    }

    fn landing_colors(&self) -> Option<&PageColors> {
        self.config
            .landing_page_colors
            .choose(&mut rand::thread_rng())
    }

    /// Renders the page at `path`, or returns `None` if there is no such page
    ///
    /// # Errors
    /// Fails if the template can't be rendered
    pub fn render(&self, path: &RoutePath, theme: Theme) -> Result<Option<String>, SiteError> {
        let site_title = &self.config.site_title;
        let page = match self.resolve(path) {
            None => return Ok(None),
            Some((_, Page::Landing)) => {
                render_landing(site_title, theme, &self.topics, self.landing_colors())?
            }
            Some((_, Page::TopicIndex { topic })) => {
                render_topic(site_title, theme, &self.topics[topic])?
            }
            Some((path, Page::Article { topic })) => {
                let topic = &self.topics[topic];
                let (entry, body) = match (topic.sequence.get(path), self.article_body(path)) {
                    (Some(entry), Some(body)) => (entry, body),
                    _ => return Ok(None),
                };
                render_article(site_title, theme, topic, entry, body, self.neighbors(path))?
            }
        };
        Ok(Some(page))
    }

    /// # Errors
    /// Fails if the template can't be rendered
    pub fn render_not_found(&self, path: &str, theme: Theme) -> Result<String, SiteError> {
        render_not_found(&self.config.site_title, theme, path)
    }

    pub fn article_directories(&self) -> impl Iterator<Item = &Path> {
        self.config
            .topics
            .iter()
            .map(|topic| topic.articles_directory.as_path())
    }

    pub fn is_registered_source(&self, file_path: &Path) -> bool {
        self.article_sources.contains_key(&source_key(file_path))
    }

    /// Recompiles the body of a registered article. Labels and order stay as they were loaded.
    ///
    /// # Errors
    /// Fails if the article can't be read
    pub fn recompile_article(&mut self, file_path: &Path) -> Result<bool, SiteError> {
        let route_path = match self.article_sources.get(&source_key(file_path)) {
            Some(route_path) => route_path.clone(),
            None => {
                debug!("{:?} isn't a registered article, ignoring it", file_path);
                return Ok(false);
            }
        };
        let CompiledArticle {
            body,
            modification_time,
            ..
        } = compile_article(file_path, &self.config)?;
        self.compiled_articles.insert(
            route_path.clone(),
            ArticleBody {
                html: body,
                modification_time,
            },
        );
        info!("Recompiled {}", route_path);
        Ok(true)
    }
}
