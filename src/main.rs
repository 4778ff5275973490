use clap::Parser;
use quizdeck::db::Db;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Postgres connection string.
    #[clap(env)]
    database_url: String,

    /// The address to bind to.
    #[arg(short, long, env, default_value = "127.0.0.1:1414")]
    address: String,

    /// Seed a demo quiz when the database holds none.
    #[arg(long, default_value_t = false)]
    load_sample_data: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "tracing=info,axum=info,quizdeck=debug".to_owned());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let db = Db::new(&args.database_url).await?;
    if args.load_sample_data {
        db.load_sample_data().await?;
    }

    let app = quizdeck::router(quizdeck::AppState::new(db));

    let listener = tokio::net::TcpListener::bind(&args.address).await?;
    tracing::info!("listening on {}", args.address);
    axum::serve(listener, app).await?;

    Ok(())
}
