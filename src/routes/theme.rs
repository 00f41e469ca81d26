use std::sync::RwLock;

use actix_web::{http::header, web, HttpRequest, HttpResponse};
use log::debug;

use crate::{
    preferences::{CookieStore, Theme},
    site::Site,
};

fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\")
}

/// Path on this site to go back to. Referers from other hosts lead home.
fn redirect_target<'referer>(referer: Option<&'referer str>, host: &str) -> &'referer str {
    let path = referer.and_then(|referer| {
        match ["http://", "https://"]
            .iter()
            .find_map(|scheme| referer.strip_prefix(scheme))
        {
            Some(rest) => rest.strip_prefix(host),
            None => Some(referer),
        }
    });
    match path {
        Some(path) if is_local_path(path) => path,
        _ => "/",
    }
}

/// Flips the visitor's theme and sends them back where they came from
#[allow(clippy::unused_async)]
pub async fn toggle_theme(site: web::Data<RwLock<Site>>, request: HttpRequest) -> HttpResponse {
    let default_theme = site.read().unwrap().config().default_theme;
    let mut store = CookieStore::new(&request);
    let theme = Theme::load(&store, default_theme).toggled();
    theme.save(&mut store);
    debug!("Theme switched to {}", theme.name());
    let referer = request
        .headers()
        .get(header::REFERER)
        .and_then(|referer| referer.to_str().ok());
    let location = redirect_target(referer, request.connection_info().host()).to_owned();
    let mut response = HttpResponse::SeeOther();
    response.insert_header((header::LOCATION, location));
    store.apply(&mut response);
    response.finish()
}
