use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dreamroom::{
    AppContext, Config, GenerationInput, GenerationOutcome, TriggerResult,
    error::GENERIC_FAILURE_MESSAGE,
    services::style::prompt_hint,
    ui::TracingSurface,
};

const USAGE: &str = "usage: dreamroom <command>

commands:
  login <identity-token>          sign in with a compact identity token
  logout                          forget the signed-in session
  whoami                          show the signed-in session
  styles                          list design styles
  style <label>                   select a design style
  generate <image-path> <prompt>  generate a design from a room photo";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    tracing::info!("✅ Configuration loaded successfully");

    let context = AppContext::new(&config, Arc::new(TracingSurface)).await?;
    context.restore().await;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("login") => {
            let token = args.get(1).context(USAGE)?;
            let session = context
                .sessions
                .sign_in(token)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("Signed in as {} ({})", session.email, session.initial());
        }
        Some("logout") => {
            context
                .sessions
                .sign_out()
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("Signed out");
        }
        Some("whoami") => match context.sessions.current().await {
            Some(session) => println!("{} <{}> [{}]", session.name, session.email, session.initial()),
            None => println!("Not signed in"),
        },
        Some("styles") => {
            let selected = context.styles.selected().await;
            for style in context.styles.catalog() {
                let marker = if selected.as_deref() == Some(*style) { "*" } else { " " };
                println!("{} {}", marker, style);
            }
        }
        Some("style") => {
            let label = args[1..].join(" ");
            let style = context
                .styles
                .select(&label)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("{}", prompt_hint(&style));
        }
        Some("generate") => generate(&context, &args[1..]).await?,
        _ => println!("{}", USAGE),
    }

    Ok(())
}

async fn generate(context: &AppContext, args: &[String]) -> anyhow::Result<()> {
    let path = args.first().context(USAGE)?;
    let image = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image {}", path))?;
    let input = GenerationInput::new(Some(image), args[1..].join(" "));

    let shutdown = context.shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.cancel();
        }
    });

    match context.generate(&input).await {
        TriggerResult::Completed(GenerationOutcome::Success { image_url }) => {
            println!("🎉 Your AI design is ready: {}", image_url);
            Ok(())
        }
        TriggerResult::Completed(GenerationOutcome::Failure { .. }) => {
            anyhow::bail!("{}", GENERIC_FAILURE_MESSAGE)
        }
        TriggerResult::SignInRequired => {
            anyhow::bail!("Sign in first: dreamroom login <identity-token>")
        }
        TriggerResult::Rejected(e) => anyhow::bail!("{}", e),
        TriggerResult::Busy => anyhow::bail!("A generation is already running"),
        TriggerResult::Cancelled => anyhow::bail!("Generation cancelled"),
    }
}
