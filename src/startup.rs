use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use actix_web_lab::middleware::from_fn;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use crate::authentication::require_admin_token;
use crate::config::{AdminSettings, DatabaseSettings, Settings};
use crate::email_client::EmailClient;
use crate::notifier::Notifier;
use crate::routes::{
    create_job, create_video, delete_job, delete_video, get_job, get_video,
    handle_create_subscription, health_check, list_jobs, list_subscribers, list_videos,
    notify_subscribers, update_job, update_video,
};
use crate::subscriber_store::PgSubscriberStore;

pub struct Application {
    pub port: u16,
    pub server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let db_pool = get_connection_db_pool(&config.database);
        let sender_email = config
            .get_email_client_sender()
            .map_err(anyhow::Error::msg)?;
        let email_client = EmailClient::new(
            config.get_email_client_base_url(),
            sender_email,
            config.get_email_client_api(),
            Some(config.get_email_client_timeout()),
        )?;

        // The notifier lives as long as the process and is shared by every worker
        let notifier = Notifier::new(
            Arc::new(PgSubscriberStore::new(db_pool.clone())),
            Arc::new(email_client),
        );

        let listener = TcpListener::bind(config.get_address())?;
        let port = listener.local_addr()?.port();
        let server = run(listener, db_pool, notifier, config.admin.clone())?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    db_pool: PgPool,
    notifier: Notifier,
    admin: AdminSettings,
) -> Result<Server, std::io::Error> {
    let db_pool = web::Data::new(db_pool);
    let notifier = web::Data::new(notifier);
    let admin = web::Data::new(admin);

    let server = HttpServer::new(move || {
        // App is where your application logic lives: routing, middlewares, request handler, etc
        App::new()
            // 'wrap' method adds a middleware to the App. This specific middleware provide incoming
            // request logger
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/api/videos", web::get().to(list_videos))
            .route("/api/jobs", web::get().to(list_jobs))
            .route("/api/subscribe", web::post().to(handle_create_subscription))
            .service(
                web::scope("/api/admin")
                    .wrap(from_fn(require_admin_token))
                    .route("/videos", web::post().to(create_video))
                    .route("/videos/{id}", web::get().to(get_video))
                    .route("/videos/{id}", web::put().to(update_video))
                    .route("/videos/{id}", web::delete().to(delete_video))
                    .route("/jobs", web::post().to(create_job))
                    .route("/jobs/{id}", web::get().to(get_job))
                    .route("/jobs/{id}", web::put().to(update_job))
                    .route("/jobs/{id}", web::delete().to(delete_job))
                    .route("/subscribers", web::get().to(list_subscribers))
                    .route("/notify", web::post().to(notify_subscribers)),
            )
            .app_data(db_pool.clone())
            .app_data(notifier.clone())
            .app_data(admin.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

pub fn get_connection_db_pool(config: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(config.get_db_options())
}
