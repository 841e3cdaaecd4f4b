use std::{net::TcpListener, sync::Arc};

use actix_web::{
    HttpServer,
    dev::Server,
    error::{JsonPayloadError, PathError, QueryPayloadError},
    middleware::Condition,
    web::{self, Data},
};
use postgres::PostgresAdapter;
use routing_client::RoutingClient;
use snafu::{ResultExt, Snafu};
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracking_core::{Environment, RoutingService, TrackingStorage};

use crate::{error::error::InvalidInputSnafu, routes, settings::Settings, states::AppState};

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum StartupError {
    #[snafu(display("Failed to bind the api listener"))]
    Listener { source: std::io::Error },
    #[snafu(display("Failed to set up postgres"))]
    Postgres { source: postgres::Error },
    #[snafu(display("Failed to set up the routing client"))]
    Routing { source: routing_client::Error },
}

pub struct App {
    server: Server,
    port: u16,
}

impl App {
    pub async fn build(settings: &Settings) -> Result<Self, StartupError> {
        let postgres = PostgresAdapter::new(&settings.postgres)
            .await
            .context(startup_error::PostgresSnafu)?;

        if matches!(settings.environment, Environment::Local | Environment::Test) {
            info!("running database migrations...");
            postgres
                .do_migrations()
                .await
                .context(startup_error::PostgresSnafu)?;
        }

        let routing = match &settings.routing {
            Some(routing) => Some(Arc::new(
                RoutingClient::new(routing).context(startup_error::RoutingSnafu)?,
            ) as Arc<dyn RoutingService>),
            None => None,
        };

        Self::build_with(settings, Arc::new(postgres), routing)
    }

    pub fn build_with(
        settings: &Settings,
        storage: Arc<dyn TrackingStorage>,
        routing: Option<Arc<dyn RoutingService>>,
    ) -> Result<Self, StartupError> {
        let listener = TcpListener::bind(settings.api.listener_address())
            .context(startup_error::ListenerSnafu)?;
        let port = listener
            .local_addr()
            .context(startup_error::ListenerSnafu)?
            .port();

        let state = AppState::new(
            storage,
            routing,
            settings.broadcast_buffer_size,
            settings.eta_cooldown,
        );

        let server = create_server(state, listener, settings)?;

        Ok(App { server, port })
    }

    pub async fn run(self) -> Result<(), std::io::Error> {
        self.server.await
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

fn create_server(
    state: AppState,
    listener: TcpListener,
    settings: &Settings,
) -> Result<Server, StartupError> {
    let not_prod = settings.environment != Environment::Production;

    let mut server = HttpServer::new(move || {
        actix_web::App::new()
            .app_data(Data::new(state.clone()))
            .app_data(web::JsonConfig::default().error_handler(|e: JsonPayloadError, _| {
                InvalidInputSnafu {
                    message: e.to_string(),
                }
                .build()
                .into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|e: QueryPayloadError, _| {
                InvalidInputSnafu {
                    message: e.to_string(),
                }
                .build()
                .into()
            }))
            .app_data(web::PathConfig::default().error_handler(|e: PathError, _| {
                InvalidInputSnafu {
                    message: e.to_string(),
                }
                .build()
                .into()
            }))
            .wrap(Condition::new(not_prod, actix_cors::Cors::permissive()))
            .wrap(TracingLogger::default())
            .service(routes::v1::scope())
    })
    .listen(listener)
    .context(startup_error::ListenerSnafu)?;

    if let Some(workers) = settings.api.num_workers {
        server = server.workers(workers as usize);
    }

    Ok(server.run())
}
