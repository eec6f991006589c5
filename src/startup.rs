use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::PgPool;
use std::net::TcpListener;

use crate::configuration::JwtSettings;
use crate::middleware::{JwtMiddleware, LoggerMiddleware};
use crate::routes::{
    create_user, delete_user, health_check, index, list_users, login, refresh_token, update_user,
};

pub fn run(
    listener: TcpListener,
    connection: PgPool,
    jwt_config: JwtSettings,
) -> Result<Server, std::io::Error> {
    let connection = web::Data::new(connection);
    let jwt_config_data = web::Data::new(jwt_config.clone());

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(LoggerMiddleware)

            // Shared state
            .app_data(connection.clone())
            .app_data(jwt_config_data.clone())

            // Public routes (no authentication required)
            .route("/health_check", web::get().to(health_check))
            .route("/index", web::get().to(index))

            .service(
                web::scope("/account")
                    .route("/login", web::post().to(login))
                    .route("/refresh_token", web::post().to(refresh_token))

                    // Protected routes (require a valid access token)
                    .service(
                        web::scope("/user")
                            .wrap(JwtMiddleware::new(jwt_config.clone()))
                            .route("", web::get().to(list_users))
                            .route("", web::post().to(create_user))
                            .route("", web::put().to(update_user))
                            .route("", web::delete().to(delete_user)),
                    ),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
