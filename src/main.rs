use rusty_circulation_ddd::{
    adapters::memory::{
        catalog::Catalog as MemoryCatalog,
        change_notifier::ChangeNotifier as MemoryChangeNotifier,
        customer_registry::CustomerRegistry as MemoryCustomerRegistry,
        event_recorder::EventRecorder as MemoryEventRecorder,
    },
    api::{handlers::AppState, router::create_router},
    application::lending::{LendingService, ServiceDependencies},
    domain::value_objects::{CustomerId, ItemId},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "rusty_circulation_ddd=debug,tower_http=debug,axum=trace".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Initialize adapters
    let catalog = Arc::new(MemoryCatalog::new());
    let customer_registry = Arc::new(MemoryCustomerRegistry::new());
    let event_recorder = Arc::new(MemoryEventRecorder::new());
    let change_notifier = Arc::new(MemoryChangeNotifier::new());

    // Seed a demo inventory so the API is usable right away
    for _ in 0..5 {
        let item_id = ItemId::new();
        catalog.add_item(item_id);
        tracing::info!("Seeded item {}", item_id);
    }
    for _ in 0..3 {
        let customer_id = CustomerId::new();
        customer_registry.add_customer(customer_id);
        tracing::info!("Seeded customer {}", customer_id);
    }

    // Log a line whenever the lending state changes
    let mut changes = change_notifier.subscribe();
    tokio::spawn(async move {
        while changes.changed().await.is_ok() {
            tracing::debug!("Lending state changed");
        }
    });

    // Create service dependencies
    let service_deps = ServiceDependencies {
        catalog,
        customer_registry,
        event_recorder,
        change_notifier,
    };

    // Create the lending service and application state
    let lending = Arc::new(LendingService::new(service_deps));
    let app_state = Arc::new(AppState { lending });

    // Create router
    let app = create_router(app_state);

    // Server configuration
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
