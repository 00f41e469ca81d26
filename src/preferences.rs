use actix_web::{
    cookie::{time::Duration, Cookie},
    HttpRequest, HttpResponseBuilder,
};
use serde::{Deserialize, Serialize};

pub const THEME_KEY: &str = "theme";

/// Key-value storage for visitor preferences
pub trait PreferenceStore {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, value: &str);
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match &name.to_lowercase()[..] {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Falls back to `default` when nothing (or garbage) is stored
    pub fn load(store: &impl PreferenceStore, default: Self) -> Self {
        store
            .read(THEME_KEY)
            .and_then(|name| Self::from_name(&name))
            .unwrap_or(default)
    }

    pub fn save(self, store: &mut impl PreferenceStore) {
        store.write(THEME_KEY, self.name());
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    values: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl PreferenceStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }
}

/// Reads preferences from the request cookies. Writes are kept until [`CookieStore::apply`]
/// turns them into `Set-Cookie` headers.
pub struct CookieStore<'request> {
    request: &'request HttpRequest,
    written: Vec<Cookie<'static>>,
}

impl<'request> CookieStore<'request> {
    pub const fn new(request: &'request HttpRequest) -> Self {
        Self {
            request,
            written: Vec::new(),
        }
    }

    pub fn apply(self, response: &mut HttpResponseBuilder) {
        for cookie in self.written {
            response.cookie(cookie);
        }
    }
}

impl PreferenceStore for CookieStore<'_> {
    fn read(&self, key: &str) -> Option<String> {
        self.written
            .iter()
            .rev()
            .find(|cookie| cookie.name() == key)
            .map(|cookie| cookie.value().to_owned())
            .or_else(|| self.request.cookie(key).map(|cookie| cookie.value().to_owned()))
    }

    fn write(&mut self, key: &str, value: &str) {
        self.written.push(
            Cookie::build(key.to_owned(), value.to_owned())
                .path("/")
                .max_age(Duration::days(365))
                .finish(),
        );
    }
}
