use std::{
    sync::{Arc, RwLock},
    time::SystemTime,
};

use actix_web::{
    http::header::{self, ContentType},
    web, HttpRequest, HttpResponse, HttpResponseBuilder,
};
use log::error;
use percent_encoding::percent_decode_str;

use crate::{
    navigation::{Neighbors, RoutePath},
    preferences::{CookieStore, Theme},
    site::Site,
    utils::encode_path,
};

fn html(mut response: HttpResponseBuilder, body: String) -> HttpResponse {
    response.content_type(ContentType::html()).body(body)
}

/// `Link` header pointing at the neighboring articles
fn link_header(neighbors: &Neighbors<Arc<RoutePath>>) -> Option<String> {
    if neighbors.is_empty() {
        return None;
    }
    let links: Vec<_> = [("prev", &neighbors.previous), ("next", &neighbors.next)]
        .into_iter()
        .filter_map(|(relation, path)| {
            path.as_ref()
                .map(|path| format!(r#"<{}>; rel="{}""#, encode_path(path), relation))
        })
        .collect();
    Some(links.join(", "))
}

/// Landing page, topic indexes and articles
#[allow(clippy::unused_async)]
pub async fn page(site: web::Data<RwLock<Site>>, request: HttpRequest) -> HttpResponse {
    let site = site.read().unwrap();
    let theme = Theme::load(&CookieStore::new(&request), site.config().default_theme);
    let path = percent_decode_str(request.path()).decode_utf8_lossy();
    let path = &path[..];
    let rendered = match site.render(path, theme) {
        Ok(Some(page)) => {
            let mut response = HttpResponse::Ok();
            if let Some(links) = link_header(&site.neighbor_paths(path)) {
                response.insert_header((header::LINK, links));
            }
            let modification_time = site
                .resolve(path)
                .and_then(|(path, _)| site.article_modification_time(path));
            if let Some(modification_time) = modification_time {
                response.insert_header(header::LastModified(
                    SystemTime::from(*modification_time).into(),
                ));
            }
            return html(response, page);
        }
        Ok(None) => site.render_not_found(path, theme),
        Err(error) => Err(error),
    };
    match rendered {
        Ok(page) => html(HttpResponse::NotFound(), page),
        Err(error) => {
            error!("Couldn't render `{}`. Details: {}", path, error);
            HttpResponse::InternalServerError().body("Sorry, this page couldn't be rendered!")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use actix_web::{
        cookie::Cookie,
        http::{header, StatusCode},
        test::{call_and_read_body, call_service, init_service, read_body, TestRequest},
        App,
    };

    use crate::{routes::{configure, tests::site_data}, site::tests::fixture};

    #[actix_web::test]
    async fn articles_link_to_their_neighbors() {
        let (_directory, config) = fixture();
        let app = init_service(App::new().app_data(site_data(config)).configure(configure)).await;
        let request = TestRequest::get().uri("/dotnet-api/controllers").to_request();
        let response = call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::LINK).unwrap(),
            r#"</dotnet-api/intro>; rel="prev", </dotnet-api/ef>; rel="next""#
        );
        assert!(response.headers().contains_key(header::LAST_MODIFIED));
        let body = String::from_utf8(read_body(response).await.to_vec()).unwrap();
        assert!(body.contains(r#"rel="prev""#));
        assert!(body.contains("Introduction"));
        assert!(body.contains(r#"rel="next""#));
        assert!(body.contains("Entity Framework"));
    }

    #[actix_web::test]
    async fn first_article_has_no_previous_link() {
        let (_directory, config) = fixture();
        let app = init_service(App::new().app_data(site_data(config)).configure(configure)).await;
        let request = TestRequest::get().uri("/dotnet-api/intro").to_request();
        let body = String::from_utf8(call_and_read_body(&app, request).await.to_vec()).unwrap();
        assert!(!body.contains(r#"rel="prev""#));
        assert!(body.contains(r#"rel="next""#));
    }

    #[actix_web::test]
    async fn landing_and_topic_pages_are_served() {
        let (_directory, config) = fixture();
        let app = init_service(App::new().app_data(site_data(config)).configure(configure)).await;
        for uri in ["/", "/react", "/react/"] {
            let request = TestRequest::get().uri(uri).to_request();
            let response = call_service(&app, request).await;
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
            assert!(!response.headers().contains_key(header::LINK));
        }
    }

    #[actix_web::test]
    async fn unknown_pages_are_not_found() {
        let (_directory, config) = fixture();
        let app = init_service(App::new().app_data(site_data(config)).configure(configure)).await;
        let request = TestRequest::get().uri("/vue/basics").to_request();
        let response = call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = String::from_utf8(read_body(response).await.to_vec()).unwrap();
        assert!(body.contains("isn't found"));
    }

    #[actix_web::test]
    async fn articles_with_encoded_names_are_reachable() {
        let (directory, mut config) = fixture();
        fs::write(directory.path().join("react").join("use state.md"), "# Using state").unwrap();
        fs::write(directory.path().join("react").join("über.md"), "# Beyond hooks").unwrap();
        config.topics[1].articles.push("use state.md".into());
        config.topics[1].articles.push("über.md".into());
        let app = init_service(App::new().app_data(site_data(config)).configure(configure)).await;

        let request = TestRequest::get().uri("/react/use%20state").to_request();
        let response = call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::LINK).unwrap(),
            r#"</react/hooks>; rel="prev", </react/%C3%BCber>; rel="next""#
        );
        assert!(response.headers().contains_key(header::LAST_MODIFIED));
        let body = String::from_utf8(read_body(response).await.to_vec()).unwrap();
        assert!(body.contains("Using state"));
        assert!(body.contains("%C3%BCber"));

        let request = TestRequest::get().uri("/react/%C3%BCber/").to_request();
        let response = call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn theme_cookie_is_honored() {
        let (_directory, config) = fixture();
        let app = init_service(App::new().app_data(site_data(config)).configure(configure)).await;
        let request = TestRequest::get()
            .uri("/react/hooks")
            .cookie(Cookie::new("theme", "dark"))
            .to_request();
        let body = String::from_utf8(call_and_read_body(&app, request).await.to_vec()).unwrap();
        assert!(body.contains("theme-dark"));
    }
}
