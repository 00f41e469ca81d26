use std::{
    path::Path,
    sync::{mpsc, Arc, RwLock},
    thread,
    time::Duration,
};

use log::{error, info, warn};
use notify::{DebouncedEvent, RecommendedWatcher, RecursiveMode, Watcher};

use crate::site::Site;

/// Keeps the watcher alive; watching stops when this is dropped
pub struct WatchGuard {
    _watcher: RecommendedWatcher,
}

/// What the site should do about a file system event
#[derive(Debug, PartialEq, Eq)]
enum Reaction<'event> {
    Recompile(&'event Path),
    KeepStale(&'event Path),
    Moved {
        from: &'event Path,
        to: &'event Path,
    },
    Ignore,
}

fn react(event: &DebouncedEvent) -> Reaction<'_> {
    match event {
        DebouncedEvent::Write(path) | DebouncedEvent::Create(path) => Reaction::Recompile(path),
        DebouncedEvent::Remove(path) => Reaction::KeepStale(path),
        DebouncedEvent::Rename(from, to) => Reaction::Moved { from, to },
        _ => Reaction::Ignore,
    }
}

fn recompile(site: &RwLock<Site>, path: &Path) {
    let result = site.write().unwrap().recompile_article(path);
    if let Err(error) = result {
        error!("Couldn't recompile {:?}. Details: {}", path, error);
    }
}

fn warn_if_stale(site: &RwLock<Site>, path: &Path) {
    if site.read().unwrap().is_registered_source(path) {
        warn!(
            "{:?} was removed or renamed. Its last version is still served; \
            restart the server to change the list of articles",
            path
        );
    }
}

pub fn handle_event(site: &RwLock<Site>, event: &DebouncedEvent) {
    match react(event) {
        Reaction::Recompile(path) => recompile(site, path),
        Reaction::KeepStale(path) => warn_if_stale(site, path),
        // Editors that save atomically rename a temporary file over the article
        Reaction::Moved { from, to } => {
            warn_if_stale(site, from);
            recompile(site, to);
        }
        Reaction::Ignore => {
            if let DebouncedEvent::Error(error, path) = event {
                error!("File watcher error at {:?}. Details: {}", path, error);
            }
        }
    }
}

/// # Errors
/// Returns an error if one of the articles directories can't be watched
pub fn watch_articles(site: &Arc<RwLock<Site>>) -> notify::Result<WatchGuard> {
    let (event_sender, event_receiver) = mpsc::channel();
    let watcher = {
        let site = site.read().unwrap();
        let mut watcher: RecommendedWatcher = Watcher::new(
            event_sender,
            Duration::from_millis(site.config().file_watcher_delay_in_milliseconds),
        )?;
        for directory in site.article_directories() {
            watcher.watch(directory, RecursiveMode::NonRecursive)?;
            info!("Watching {:?}", directory);
        }
        watcher
    };
    let site = site.clone();
    thread::spawn(move || {
        while let Ok(event) = event_receiver.recv() {
            handle_event(&site, &event);
        }
    });
    Ok(WatchGuard { _watcher: watcher })
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use super::*;
    use crate::site::tests::fixture;

    #[test]
    fn writes_and_creations_recompile() {
        let path = PathBuf::from("a.md");
        assert_eq!(react(&DebouncedEvent::Write(path.clone())), Reaction::Recompile(&path));
        assert_eq!(react(&DebouncedEvent::Create(path.clone())), Reaction::Recompile(&path));
    }

    #[test]
    fn removals_keep_the_old_body() {
        let path = PathBuf::from("a.md");
        assert_eq!(react(&DebouncedEvent::Remove(path.clone())), Reaction::KeepStale(&path));
        assert_eq!(react(&DebouncedEvent::Rescan), Reaction::Ignore);
    }

    #[test]
    fn renames_know_both_ends() {
        let from = PathBuf::from("a.md");
        let to = PathBuf::from("b.md");
        assert_eq!(
            react(&DebouncedEvent::Rename(from.clone(), to.clone())),
            Reaction::Moved { from: &from, to: &to }
        );
    }

    #[test]
    fn written_articles_are_recompiled() {
        let (directory, config) = fixture();
        let site = RwLock::new(Site::load(config).unwrap());
        let source = directory.path().join("react").join("hooks.md");
        fs::write(&source, "Hooks, revised.").unwrap();
        handle_event(&site, &DebouncedEvent::Write(source));
        assert!(site
            .read()
            .unwrap()
            .article_body("/react/hooks")
            .unwrap()
            .contains("Hooks, revised."));
    }

    #[test]
    fn atomically_saved_articles_are_recompiled() {
        let (directory, config) = fixture();
        let site = RwLock::new(Site::load(config).unwrap());
        let source = directory.path().join("react").join("hooks.md");
        let temporary = directory.path().join("react").join("hooks.md.tmp");
        fs::write(&temporary, "Hooks, saved atomically.").unwrap();
        fs::rename(&temporary, &source).unwrap();
        handle_event(&site, &DebouncedEvent::Rename(temporary, source));
        assert!(site
            .read()
            .unwrap()
            .article_body("/react/hooks")
            .unwrap()
            .contains("saved atomically"));
    }

    #[test]
    fn articles_renamed_away_stay_served() {
        let (directory, config) = fixture();
        let site = RwLock::new(Site::load(config).unwrap());
        let source = directory.path().join("react").join("hooks.md");
        let renamed = directory.path().join("react").join("old-hooks.md");
        fs::rename(&source, &renamed).unwrap();
        handle_event(&site, &DebouncedEvent::Rename(source, renamed));
        assert!(site
            .read()
            .unwrap()
            .article_body("/react/hooks")
            .unwrap()
            .contains("No heading, just hooks."));
    }

    #[test]
    fn removed_articles_stay_served() {
        let (directory, config) = fixture();
        let site = RwLock::new(Site::load(config).unwrap());
        let source = directory.path().join("react").join("hooks.md");
        handle_event(&site, &DebouncedEvent::Remove(source));
        assert!(site.read().unwrap().article_body("/react/hooks").is_some());
    }
}
