use std::{
    path::{Component, Path},
    sync::RwLock,
};

use actix_files::NamedFile;
use actix_web::{web, Either, HttpResponse};
use log::debug;

use crate::site::Site;

type FileOrNotFound = Either<NamedFile, HttpResponse>;

fn is_plain_file_name(file_name: &str) -> bool {
    let mut components = Path::new(file_name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Stylesheets, scripts and images from the files directory
#[allow(clippy::unused_async)]
pub async fn file(
    site: web::Data<RwLock<Site>>,
    path_arguments: web::Path<String>,
) -> FileOrNotFound {
    let file_name = path_arguments.into_inner();
    let not_found = || {
        Either::Right(HttpResponse::NotFound().body("Sorry, the file you requested isn't found!"))
    };
    if !is_plain_file_name(&file_name) {
        return not_found();
    }
    let full_path = site.read().unwrap().config().files_directory.join(&file_name);
    match NamedFile::open(&full_path) {
        Ok(file) => Either::Left(file),
        Err(error) => {
            debug!("{:?} couldn't be opened. Details: {}", full_path, error);
            not_found()
        }
    }
}
