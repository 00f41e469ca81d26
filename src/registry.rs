use std::{collections::HashMap, sync::Arc};

use crate::{error::SiteError, navigation::RoutePath, site::Topic};

pub const LANDING_PATH: &RoutePath = "/";

pub type TopicIndex = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Landing,
    TopicIndex { topic: TopicIndex },
    Article { topic: TopicIndex },
}

/// Every page of the site, keyed by its path
#[derive(Debug, Default)]
pub struct PageRegistry {
    pages: HashMap<Arc<RoutePath>, Page>,
}

impl PageRegistry {
    /// # Errors
    /// Returns [`SiteError::DuplicatePath`] if two pages end up with the same path
    pub fn new(topics: &[Topic]) -> Result<Self, SiteError> {
        let mut registry = Self::default();
        registry.register(LANDING_PATH.into(), Page::Landing)?;
        for (index, topic) in topics.iter().enumerate() {
            registry.register(topic.path.clone(), Page::TopicIndex { topic: index })?;
            for entry in topic.sequence.entries() {
                registry.register(entry.path.clone(), Page::Article { topic: index })?;
            }
        }
        Ok(registry)
    }

    fn register(&mut self, path: Arc<RoutePath>, page: Page) -> Result<(), SiteError> {
        if self.pages.contains_key(&path) {
            return Err(SiteError::DuplicatePath(path.to_string()));
        }
        self.pages.insert(path, page);
        Ok(())
    }

    /// Returns the registered path together with its page. Trailing slashes are ignored.
    pub fn resolve(&self, path: &RoutePath) -> Option<(&Arc<RoutePath>, Page)> {
        let trimmed = path.trim_end_matches('/');
        let key = if trimmed.is_empty() { LANDING_PATH } else { trimmed };
        self.pages.get_key_value(key).map(|(path, page)| (path, *page))
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }
}

pub fn topic_path(slug: &str) -> Result<Arc<RoutePath>, SiteError> {
    if slug.is_empty() || slug.contains('/') {
        return Err(SiteError::InvalidSlug(slug.to_owned()));
    }
    Ok(format!("/{}", slug).into())
}

pub fn article_path(topic_path: &RoutePath, article_slug: &str) -> Arc<RoutePath> {
    format!("{}/{}", topic_path, article_slug).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{RouteEntry, RouteSequence};

    fn topic(slug: &str, articles: &[&str]) -> Topic {
        let path = topic_path(slug).unwrap();
        let sequence = RouteSequence::new(
            articles
                .iter()
                .map(|article| RouteEntry::new(article_path(&path, article), *article))
                .collect(),
        )
        .unwrap();
        Topic {
            slug: slug.into(),
            title: slug.into(),
            description: "".into(),
            path,
            sequence,
        }
    }

    #[test]
    fn every_page_kind_resolves() {
        let registry =
            PageRegistry::new(&[topic("react", &["hooks", "state"]), topic("dotnet", &["intro"])])
                .unwrap();
        assert_eq!(registry.len(), 6);
        assert_eq!(registry.resolve("/").unwrap().1, Page::Landing);
        assert_eq!(registry.resolve("/dotnet").unwrap().1, Page::TopicIndex { topic: 1 });
        assert_eq!(registry.resolve("/react/state").unwrap().1, Page::Article { topic: 0 });
    }

    #[test]
    fn trailing_slashes_are_ignored() {
        let registry = PageRegistry::new(&[topic("react", &["hooks"])]).unwrap();
        let (path, page) = registry.resolve("/react/hooks/").unwrap();
        assert_eq!(&**path, "/react/hooks");
        assert_eq!(page, Page::Article { topic: 0 });
        assert_eq!(registry.resolve("//").unwrap().1, Page::Landing);
        assert_eq!(registry.resolve("").unwrap().1, Page::Landing);
    }

    #[test]
    fn unknown_paths_resolve_to_nothing() {
        let registry = PageRegistry::new(&[topic("react", &["hooks"])]).unwrap();
        assert!(registry.resolve("/react/classes").is_none());
        assert!(registry.resolve("/vue").is_none());
    }

    #[test]
    fn topics_sharing_a_slug_collide() {
        let result = PageRegistry::new(&[topic("react", &["a"]), topic("react", &["b"])]);
        assert!(matches!(result, Err(SiteError::DuplicatePath(path)) if path == "/react"));
    }

    #[test]
    fn slugs_must_be_single_segments() {
        assert!(matches!(topic_path(""), Err(SiteError::InvalidSlug(_))));
        assert!(matches!(topic_path("a/b"), Err(SiteError::InvalidSlug(_))));
        assert_eq!(&*topic_path("react").unwrap(), "/react");
    }
}
