use std::{future::Future, sync::Arc, sync::Once, time::Duration};

use postgres::{PsqlLogStatements, PsqlSettings};
use tracing_subscriber::FmtSubscriber;
use tracking_core::{
    Coordinate, DeliveryId, EntityId, EntityKind, Environment, OrderId, RouteEstimate,
    test_helper::{MemoryStorage, RouteRecorder},
};
use web_api::{
    settings::{ApiSettings, LogLevel, Settings},
    startup::App,
};

use super::test_client::ApiClient;

static TRACING: Once = Once::new();

pub struct TestHelper {
    pub app: ApiClient,
    pub storage: Arc<MemoryStorage>,
    pub routing: Arc<RouteRecorder>,
}

impl TestHelper {
    async fn spawn_app() -> TestHelper {
        let settings = Settings {
            log_level: LogLevel::Debug,
            api: ApiSettings {
                ip: "127.0.0.1".into(),
                port: 0,
                num_workers: Some(1),
            },
            postgres: PsqlSettings {
                ip: "127.0.0.1".into(),
                port: 5432,
                db_name: None,
                username: "unused".into(),
                password: None,
                max_connections: 1,
                root_cert: None,
                log_statements: PsqlLogStatements::Disable,
            },
            environment: Environment::Test,
            broadcast_buffer_size: 64,
            eta_cooldown: Duration::from_secs(5),
            routing: None,
        };

        let storage = Arc::new(MemoryStorage::new());
        let routing = Arc::new(RouteRecorder::new(RouteEstimate {
            distance_meters: 2_400.0,
            duration_seconds: 420.0,
        }));

        let app = App::build_with(&settings, storage.clone(), Some(routing.clone())).unwrap();
        let address = format!("http://127.0.0.1:{}/v1.0", app.port());

        tokio::spawn(async move { app.run().await.unwrap() });

        TestHelper {
            app: ApiClient::new(address),
            storage,
            routing,
        }
    }

    pub fn add_courier(&self) -> EntityId {
        self.storage.add_entity("courier", EntityKind::Courier)
    }

    pub fn add_delivery(&self) -> (DeliveryId, OrderId) {
        let order_id = OrderId::new(77);
        let delivery_id = self
            .storage
            .add_delivery(order_id, Coordinate::new(59.95, 10.80));
        (delivery_id, order_id)
    }
}

pub async fn test<T, Fut>(test: T)
where
    T: FnOnce(TestHelper) -> Fut,
    Fut: Future<Output = ()>,
{
    TRACING.call_once(|| {
        tracing::subscriber::set_global_default(
            FmtSubscriber::builder()
                .with_max_level(tracing::Level::WARN)
                .with_test_writer()
                .finish(),
        )
        .unwrap();
    });

    test(TestHelper::spawn_app().await).await;
}
