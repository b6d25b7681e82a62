use optiride::config::Config;
use optiride::engine::Engine;
use optiride::error::Error;
use optiride::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let engine = Engine::new(&config)?;

    serve(engine, config).await
}
