use std::future::Future;
use std::sync::Arc;

use error_stack::ResultExt;
use tokio::net::TcpListener;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use application::subscriber::BookingNotifySubscriber;
use driver::bus::InMemoryEventBus;
use driver::config::Config;
use driver::database::{InMemoryDatabase, PostgresDatabase, StorageBackend};
use driver::notify::TracingNotificationSink;
use kernel::KernelError;

use crate::error::StackTrace;
use crate::handler::AppModule;
use crate::route::{ItemRouter, WishlistRouter};

mod controller;
mod error;
mod handler;
mod route;

#[tokio::main]
async fn main() -> Result<(), StackTrace> {
    let appender = tracing_appender::rolling::daily(std::path::Path::new("./logs/"), "debug.log");
    let (non_blocking_appender, _guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_filter(tracing_subscriber::EnvFilter::new(
                    std::env::var("RUST_LOG").unwrap_or_else(|_| {
                        "application=debug,driver=debug,server=debug,tower_http=debug".into()
                    }),
                ))
                .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG),
        )
        .with(
            tracing_subscriber::fmt::Layer::default()
                .with_writer(non_blocking_appender)
                .with_ansi(false)
                .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG),
        )
        .init();

    let config = Config::from_env()?;
    match config.postgres_url() {
        Some(url) => {
            info!("Using PostgreSQL storage");
            let database = PostgresDatabase::new(url).await?;
            serve(database, &config).await?;
        }
        None => {
            info!("Using in-memory storage");
            serve(InMemoryDatabase::new(), &config).await?;
        }
    }
    Ok(())
}

async fn serve<B: StorageBackend>(
    database: B,
    config: &Config,
) -> error_stack::Result<(), KernelError> {
    let bus = Arc::new(InMemoryEventBus::new(config.bus()));
    BookingNotifySubscriber::new(Arc::new(TracingNotificationSink)).subscribe(bus.as_ref());

    let shutdown = CancellationToken::new();
    let mut worker: Worker = tokio::spawn({
        let bus = Arc::clone(&bus);
        let shutdown = shutdown.clone();
        async move { bus.run(shutdown).await }
    });

    let app = AppModule::new(database, Arc::clone(&bus));
    let router = axum::Router::<AppModule<B>>::new()
        .route_wishlist()
        .route_item()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new())
        .with_state(app);

    let tcp = TcpListener::bind(config.server_addr())
        .await
        .change_context_lazy(|| KernelError::Internal)
        .attach_printable_lazy(|| format!("Failed to listen on {}", config.server_addr()))?;
    info!("Listening on {}", config.server_addr());

    let serving = CancellationToken::new();
    let server = tokio::spawn({
        let serving = serving.clone();
        async move {
            axum::serve(tcp, router.into_make_service())
                .with_graceful_shutdown(async move { serving.cancelled().await })
                .await
        }
    });

    let signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {e}");
        }
    };
    let exited = supervise(signal, &mut worker).await;
    let exited_early = exited.is_some();
    if exited_early {
        error!(
            "Event bus worker exited while serving (bus stopped: {})",
            bus.is_stopped()
        );
    }
    info!("Shutting down");

    // requests still in flight publish before the bus closes
    serving.cancel();
    let served = server
        .await
        .change_context_lazy(|| KernelError::Internal)
        .attach_printable("HTTP server task panicked")
        .and_then(|served| served.change_context_lazy(|| KernelError::Internal));

    shutdown.cancel();
    let worker_result = match exited {
        Some(result) => result,
        None => worker.await,
    };
    match worker_result {
        Ok(result) => result?,
        Err(e) => {
            return Err(error_stack::Report::new(KernelError::Internal)
                .attach_printable(format!("Event bus worker panicked: {e}")))
        }
    }
    if exited_early {
        return Err(error_stack::Report::new(KernelError::EventBusClosed)
            .attach_printable("Event bus worker stopped before shutdown"));
    }
    info!("Event bus stopped: {}", bus.is_stopped());
    served
}

type Worker = JoinHandle<error_stack::Result<(), KernelError>>;

/// Waits for `signal` or for the bus worker to end, whichever comes first.
///
/// Returns the worker's outcome when it ended first.
async fn supervise<S>(
    signal: S,
    worker: &mut Worker,
) -> Option<Result<error_stack::Result<(), KernelError>, JoinError>>
where
    S: Future<Output = ()>,
{
    tokio::select! {
        _ = signal => None,
        exited = worker => Some(exited),
    }
}
