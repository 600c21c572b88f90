use actionkit::config::ServerConfig;
use actionkit::prelude::*;
use actionkit::validation::RuleValidator;
use tracing_subscriber::EnvFilter;

mod user;

use user::{InMemoryUserRepository, UserController, UserRepository};

fn routes() -> Vec<RouteGroup> {
    let service = RouteGroup::new("/userService")
        .middleware(RequestLogging)
        .middleware(JsonOnly::new())
        .get(
            "/hello",
            Action::from_fn(|_request, response| async move {
                Ok(helpers::write(response, "demo route hello", StatusCode::OK))
            }),
        )
        .post("/create", Action::bind(UserController::create));

    let users = RouteGroup::new("/userService/users")
        .middleware(RequestLogging)
        .route(Route::get("/{id}", Action::bind(UserController::show)).name("users.show"));

    vec![service, users]
}

fn container() -> Container {
    let mut container = Container::new();
    container.register(InMemoryUserRepository::new());
    container.register_trait::<dyn UserRepository, InMemoryUserRepository, _>(|repository| {
        repository as Arc<dyn UserRepository>
    });
    container.register_factory(RuleValidator::new);
    container
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,actionkit=debug")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let app = routes()
        .into_iter()
        .fold(Application::builder().container(container()), |builder, group| {
            builder.group(group)
        })
        .build()?;

    let listener = tokio::net::TcpListener::bind(config.addr())
        .await
        .map_err(|err| ActionError::Config(format!("cannot bind {}: {err}", config.addr())))?;
    tracing::info!("user service listening on http://{}", config.addr());

    app.serve(listener)
        .await
        .map_err(|err| ActionError::Internal(err.to_string()))
}
