use std::sync::Arc;

use signup_wizard::cli::{CliOutcome, WizardPrompt};
use signup_wizard::config::WizardConfig;
use signup_wizard::signup::{ActorType, ChannelSubmitter, Wizard};
use signup_wizard::store::{Database, DraftStore, SqliteDraftStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they don't interleave with prompts on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = WizardConfig::from_env()?;

    let actor = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<ActorType>()?,
        None => config.actor_type.unwrap_or(ActorType::Client),
    };

    eprintln!("📝 Signup Wizard v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Account type: {}", actor);
    eprintln!("   Drafts: {}", config.db_path.display());

    // ── Draft store ─────────────────────────────────────────────────────
    let db = Arc::new(Database::open(&config.db_path)?);
    let store: Arc<dyn DraftStore> = Arc::new(SqliteDraftStore::with_prefix(
        db,
        config.draft_key_prefix.clone(),
    ));

    // ── Registration consumer ───────────────────────────────────────────
    let (submitter, mut registrations) = ChannelSubmitter::channel(actor);
    let consumer = tokio::spawn(async move {
        while let Some(registration) = registrations.recv().await {
            tracing::info!(
                actor = %registration.actor_type,
                email = %registration.data.email,
                submitted_at = %registration.submitted_at,
                "Registration received"
            );
        }
    });

    // ── Wizard (blocking stdin) ─────────────────────────────────────────
    let outcome = tokio::task::spawn_blocking(move || {
        let mut wizard = Wizard::new(actor, store, submitter)
            .with_back_handler(|| tracing::info!("Returning to account type selection"));
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        WizardPrompt::new(stdin.lock(), stdout.lock()).run(&mut wizard)
    })
    .await??;

    // The wizard (and its sender) is dropped, so the consumer drains and exits.
    consumer.await?;

    match outcome {
        CliOutcome::Submitted => eprintln!("\n✅ Signup complete."),
        CliOutcome::Cancelled => eprintln!("\nSignup cancelled. Your progress is saved."),
        CliOutcome::Abandoned => {
            eprintln!("\nProgress saved. Run again with `{actor}` to resume.")
        }
    }

    Ok(())
}
