use std::{fs, iter, path::Path, sync::Arc};

use askama::Template;
use chrono::{DateTime, Local};
use peeking_take_while::PeekableExt;
use pulldown_cmark::CowStr;

use crate::{
    config::{Config, PageColors},
    error::SiteError,
    navigation::{Neighbors, RouteEntry},
    preferences::Theme,
    site::Topic,
    utils::{ExtractBaseName, FileNameShortcut},
};

pub type FileTime = DateTime<Local>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleTitle {
    FromFileName(Arc<str>),
    FromFirstHeading(Arc<str>),
}

impl ArticleTitle {
    pub fn clone_contents(&self) -> Arc<str> {
        match self {
            Self::FromFileName(file_name) => file_name,
            Self::FromFirstHeading(first_heading) => first_heading,
        }
        .clone()
    }
}

pub struct CompiledArticle {
    pub title: ArticleTitle,
    /// Article HTML without the surrounding page
    pub body: String,
    pub modification_time: FileTime,
}

fn signature(author_name: &str, date_format: &str, created: Option<FileTime>, modified: FileTime) -> String {
    let author_name = html_escape::encode_text(author_name);
    match created {
        Some(created) => {
            let mut signature = format!(
                r#"<p align="right"><em>- {}, {}"#,
                author_name,
                created.format(date_format)
            );
            if created.date_naive() != modified.date_naive() {
                signature.push_str(&format!(" (last edit at {})", modified.format(date_format)));
            }
            signature.push_str("</em></p>");
            signature
        }
        None => format!(
            r#"<p align="right"><em>- {}, {}</em></p>"#,
            author_name,
            modified.format(date_format)
        ),
    }
}

/// Splits the markdown into HTML and the text of its first heading
pub fn compile_markdown(source: &str) -> (String, String) {
    let mut parser = pulldown_cmark::Parser::new_ext(source, {
        let mut options = pulldown_cmark::Options::empty();
        options.insert(pulldown_cmark::Options::ENABLE_STRIKETHROUGH);
        options.insert(pulldown_cmark::Options::ENABLE_FOOTNOTES);
        options.insert(pulldown_cmark::Options::ENABLE_TABLES);
        options
    })
    .peekable();
    let mut compiled_body = String::new();
    pulldown_cmark::html::push_html(
        &mut compiled_body,
        parser.by_ref().peeking_take_while(|event| {
            !matches!(
                event,
                pulldown_cmark::Event::Start(pulldown_cmark::Tag::Heading(..))
            )
        }),
    );
    let mut title = String::new();
    pulldown_cmark::html::push_html(
        &mut compiled_body,
        parser.by_ref().peeking_take_while(|event| {
            if let pulldown_cmark::Event::Code(contents)
            | pulldown_cmark::Event::Html(contents)
            | pulldown_cmark::Event::Text(contents) = event
            {
                title.push_str(contents);
            }
            !matches!(
                event,
                pulldown_cmark::Event::End(pulldown_cmark::Tag::Heading(..))
            )
        }),
    );
    pulldown_cmark::html::push_html(&mut compiled_body, parser);
    (compiled_body, title)
}

/// # Errors
/// Returns [`SiteError::UnreadableArticle`] if the file or its metadata can't be read
pub fn compile_article(path: &Path, config: &Config) -> Result<CompiledArticle, SiteError> {
    let unreadable = |source| SiteError::UnreadableArticle {
        path: path.to_owned(),
        source,
    };
    let file_contents = fs::read_to_string(path).map_err(unreadable)?;
    let file_info = fs::metadata(path).map_err(unreadable)?;
    let modification_time: FileTime = file_info.modified().map_err(unreadable)?.into();
    let creation_time = file_info.created().ok().map(FileTime::from);

    let (mut body, title) = compile_markdown(&file_contents);
    let signature = signature(
        &config.author_name,
        &config.date_format,
        creation_time,
        modification_time,
    );
    pulldown_cmark::html::push_html(
        &mut body,
        iter::once(pulldown_cmark::Event::Html(CowStr::Borrowed(&signature))),
    );

    let title = if title.is_empty() {
        ArticleTitle::FromFileName(path.file_name_arc_str().base_name())
    } else {
        ArticleTitle::FromFirstHeading(title.into())
    };
    Ok(CompiledArticle {
        title,
        body,
        modification_time,
    })
}

mod filters {
    use std::fmt::Display;

    pub fn url_path<T: Display>(path: T) -> askama::Result<String> {
        Ok(crate::utils::encode_path(&path.to_string()))
    }
}

#[derive(Template)]
#[template(path = "landing.html")]
struct LandingTemplate<'page> {
    site_title: &'page str,
    title: &'page str,
    theme: Theme,
    topics: &'page [Topic],
    colors: Option<&'page PageColors>,
}

#[derive(Template)]
#[template(path = "topic.html")]
struct TopicTemplate<'page> {
    site_title: &'page str,
    title: &'page str,
    theme: Theme,
    topic: &'page Topic,
}

#[derive(Template)]
#[template(path = "article.html")]
struct ArticleTemplate<'page> {
    site_title: &'page str,
    title: &'page str,
    theme: Theme,
    topic: &'page Topic,
    body: &'page str,
    previous: Option<&'page RouteEntry>,
    next: Option<&'page RouteEntry>,
}

#[derive(Template)]
#[template(path = "not_found.html")]
struct NotFoundTemplate<'page> {
    site_title: &'page str,
    title: &'page str,
    theme: Theme,
    path: &'page str,
}

pub fn render_landing(
    site_title: &str,
    theme: Theme,
    topics: &[Topic],
    colors: Option<&PageColors>,
) -> Result<String, SiteError> {
    Ok(LandingTemplate {
        site_title,
        title: site_title,
        theme,
        topics,
        colors,
    }
    .render()?)
}

pub fn render_topic(site_title: &str, theme: Theme, topic: &Topic) -> Result<String, SiteError> {
    Ok(TopicTemplate {
        site_title,
        title: &topic.title,
        theme,
        topic,
    }
    .render()?)
}

pub fn render_article(
    site_title: &str,
    theme: Theme,
    topic: &Topic,
    entry: &RouteEntry,
    body: &str,
    neighbors: Neighbors<&RouteEntry>,
) -> Result<String, SiteError> {
    Ok(ArticleTemplate {
        site_title,
        title: &entry.label,
        theme,
        topic,
        body,
        previous: neighbors.previous,
        next: neighbors.next,
    }
    .render()?)
}

pub fn render_not_found(site_title: &str, theme: Theme, path: &str) -> Result<String, SiteError> {
    Ok(NotFoundTemplate {
        site_title,
        title: "Page not found",
        theme,
        path,
    }
    .render()?)
}
