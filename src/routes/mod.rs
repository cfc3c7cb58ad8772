pub mod health;
pub mod tasks;
pub mod upload;
pub mod users;

use crate::auth::AuthMiddleware;
use actix_web::web;

/// Mounts the API routes.
///
/// Public endpoints (signup, login, avatar fetch) are registered ahead of
/// the auth-wrapped scopes; everything else under `/users` and all of
/// `/tasks` goes through `AuthMiddleware`, which resolves the session or
/// rejects with a 404.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .service(users::signup)
            .service(users::login)
            .service(users::get_avatar)
            .service(
                web::scope("")
                    .wrap(AuthMiddleware)
                    .service(users::logout)
                    .service(users::logout_all)
                    .service(users::me)
                    .service(users::update_me)
                    .service(users::delete_me)
                    .service(users::upload_avatar)
                    .service(users::delete_avatar),
            ),
    )
    .service(
        web::scope("/tasks")
            .wrap(AuthMiddleware)
            .service(tasks::get_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}
