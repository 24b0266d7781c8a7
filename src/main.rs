use std::{process, sync::Arc};

use postboard::{
    application::{
        controller::PostListController, error::AppError, inflight::InFlightActions,
        posts::PostService, repos::PostsRepo,
    },
    config,
    infra::{
        error::InfraError,
        http::{self, ApiState, FrontendState, HttpPostsGateway},
        memory::InMemoryPostsRepo,
        telemetry,
    },
};
use tokio::{net::TcpListener, try_join};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(config::ServeArgs::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::ServeApi(_) => run_serve_api(settings).await,
        config::Command::ServeFrontend(_) => run_serve_frontend(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let api_listener = bind(settings.server.api_addr).await?;
    let frontend_listener = bind(settings.server.frontend_addr).await?;

    let api_router = http::build_api_router(build_api_state(&settings));
    let frontend_state = build_frontend_state(&settings)?;
    spawn_initial_load(frontend_state.controller.clone());
    let frontend_router = http::build_frontend_router(frontend_state);

    info!(
        api_addr = %settings.server.api_addr,
        frontend_addr = %settings.server.frontend_addr,
        "postboard listening"
    );

    let api_server = axum::serve(api_listener, api_router.into_make_service());
    let frontend_server = axum::serve(frontend_listener, frontend_router.into_make_service());

    try_join!(api_server, frontend_server)
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

async fn run_serve_api(settings: config::Settings) -> Result<(), AppError> {
    let listener = bind(settings.server.api_addr).await?;
    let router = http::build_api_router(build_api_state(&settings));

    info!(api_addr = %settings.server.api_addr, "posts api listening");
    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))
}

async fn run_serve_frontend(settings: config::Settings) -> Result<(), AppError> {
    let listener = bind(settings.server.frontend_addr).await?;
    let state = build_frontend_state(&settings)?;
    spawn_initial_load(state.controller.clone());
    let router = http::build_frontend_router(state);

    info!(
        frontend_addr = %settings.server.frontend_addr,
        api_base = %settings.frontend.api_base,
        "host page listening"
    );
    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))
}

fn build_api_state(settings: &config::Settings) -> ApiState {
    let repo: Arc<dyn PostsRepo> = if settings.api.seed_posts {
        Arc::new(InMemoryPostsRepo::seeded())
    } else {
        Arc::new(InMemoryPostsRepo::default())
    };
    ApiState {
        posts: Arc::new(PostService::new(repo)),
    }
}

fn build_frontend_state(settings: &config::Settings) -> Result<FrontendState, AppError> {
    let gateway = HttpPostsGateway::new(settings.frontend.request_timeout)?;
    let controller = PostListController::new(
        Arc::new(gateway),
        settings.frontend.api_base.clone(),
        InFlightActions::new(settings.frontend.dedupe_actions),
    );
    Ok(FrontendState { controller })
}

/// The page opens with the list already fetched.
fn spawn_initial_load(controller: PostListController) {
    tokio::spawn(async move {
        controller.load_posts().await;
    });
}

async fn bind(addr: std::net::SocketAddr) -> Result<TcpListener, AppError> {
    TcpListener::bind(addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))
}
