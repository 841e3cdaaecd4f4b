#![deny(warnings)]
#![deny(rust_2018_idioms)]

use tracing::{Level, info, span};
use web_api::{settings::Settings, startup::App, telemetry::init_tracer};

#[tokio::main]
async fn main() {
    let settings = Settings::new().unwrap();

    init_tracer(settings.log_level, settings.environment);

    let app = App::build(&settings).await.unwrap();

    let span = span!(Level::TRACE, "tracking_api");
    let _enter = span.enter();

    info!("starting tracking_api on port {}...", app.port());

    app.run().await.unwrap();
}
