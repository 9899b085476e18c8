use clap::{Parser, Subcommand};
use mailinator_inbox_rs::{
    generate_email, Config, Error, HttpPage, MailboxAddress, MailinatorHelperBuilder,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "mailinator-inbox",
    about = "Check public Mailinator inboxes from the command line",
    arg_required_else_help = true
)]
struct Cli {
    #[arg(short, long, help = "Mailbox address (e.g. alice@mailinator.com)")]
    email: Option<String>,

    #[arg(long, help = "TOML configuration file (defaults to MAILINATOR_* env vars)")]
    config: Option<PathBuf>,

    #[arg(long, help = "Proxy URL (optional)")]
    proxy: Option<String>,

    #[arg(long, help = "Timeout in milliseconds")]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a fresh unique address
    Generate {
        #[arg(long, default_value = "test")]
        prefix: String,
    },
    /// Poll until a message with the subject fragment arrives
    Wait {
        #[arg(long)]
        subject: String,
    },
    /// Open the newest message matching the subject fragment and print its body
    Latest {
        #[arg(long)]
        subject: String,
    },
    /// Wait for a password reset email and print its link
    ResetLink,
    /// Check that an invite email mentions the user
    VerifyInvite {
        #[arg(long)]
        user_name: String,
    },
    /// Check that a password reset email with a link arrived
    VerifyReset,
    /// Delete all messages if the inbox offers it
    Clear,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mailinator_inbox_rs=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();
}

fn load_config(cli: &Cli) -> Result<Config, Error> {
    let mut cfg = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::from_env()?,
    };
    if cli.proxy.is_some() {
        cfg.proxy_url = cli.proxy.clone();
    }
    Ok(cfg)
}

fn outcome(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Error> {
    init_logging();
    let cli = Cli::parse();

    if let Commands::Generate { prefix } = &cli.command {
        println!("{}", generate_email(prefix));
        return Ok(ExitCode::SUCCESS);
    }

    let email = cli
        .email
        .as_deref()
        .ok_or_else(|| Error::Parse("--email is required".into()))?;
    let address = MailboxAddress::parse(email)?;
    let config = load_config(&cli)?;
    let timeout = cli.timeout_ms.map(Duration::from_millis);
    let page = HttpPage::new(&config)?;
    let mut helper = MailinatorHelperBuilder::new().config(config).build(page);
    let email = address.as_str();

    let code = match cli.command {
        Commands::Generate { .. } => ExitCode::SUCCESS,
        Commands::Wait { subject } => {
            let found = helper.wait_for_email(email, &subject, timeout).await;
            println!("{}", if found { "found" } else { "not found" });
            outcome(found)
        }
        Commands::Latest { subject } => match helper.get_latest_email(email, &subject).await {
            Some(message) => {
                println!("{}", message.content);
                ExitCode::SUCCESS
            }
            None => {
                println!("No message matching \"{subject}\".");
                ExitCode::FAILURE
            }
        },
        Commands::ResetLink => match helper.get_password_reset_link(email, timeout).await {
            Some(link) => {
                println!("{link}");
                ExitCode::SUCCESS
            }
            None => {
                println!("No password reset link found.");
                ExitCode::FAILURE
            }
        },
        Commands::VerifyInvite { user_name } => {
            let ok = helper.verify_invite_email(email, &user_name, timeout).await;
            println!("invite for {user_name}: {}", if ok { "verified" } else { "missing" });
            outcome(ok)
        }
        Commands::VerifyReset => {
            let ok = helper.verify_password_reset_email(email, timeout).await;
            println!("password reset: {}", if ok { "verified" } else { "missing" });
            outcome(ok)
        }
        Commands::Clear => {
            let cleared = helper.clear_inbox(email).await;
            println!("{}", if cleared { "cleared" } else { "nothing to clear" });
            ExitCode::SUCCESS
        }
    };

    Ok(code)
}
