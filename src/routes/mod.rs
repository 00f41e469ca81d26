use actix_web::web;

mod file;
mod page;
mod theme;

pub use file::file;
pub use page::page;
pub use theme::toggle_theme;

pub fn configure(config: &mut web::ServiceConfig) {
    config
        .route("/files/{file_name}", web::get().to(file))
        .route("/theme/toggle", web::get().to(toggle_theme))
        .route("/{path:.*}", web::get().to(page));
}
