use std::path::PathBuf;

use alexa_api::{Account, Config, DEFAULT_ACCOUNT, SessionManager};
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "alexa", version, about = "Alexa web console CLI")]
struct Cli {
    /// Account id the session is stored under
    #[arg(short, long, global = true, default_value = DEFAULT_ACCOUNT)]
    account: String,
    /// Cookie store (relative paths resolve against the home directory)
    #[arg(long, global = true, value_name = "PATH")]
    cookies: Option<PathBuf>,
    /// Storefront domain, e.g. amazon.de
    #[arg(long, global = true, value_name = "DOMAIN")]
    storefront: Option<String>,
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check whether the stored session is still valid
    Status,
    /// Exchange a refresh token for session cookies
    Login {
        /// Refresh token (`Atnr|...`)
        token: String,
        /// Skip login when the stored session is still valid
        #[arg(long)]
        if_needed: bool,
    },
    /// List speakers
    Devices,
    /// List alarms, reminders and timers
    Notifications,
    /// Show what a speaker is playing
    Queue {
        /// Device serial number (defaults to the first speaker)
        #[arg(short, long)]
        serial: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::from_env()?;
    if let Some(path) = cli.cookies {
        config = config.with_cookie_path(path);
    }
    if let Some(domain) = &cli.storefront {
        config = config.with_storefront(domain);
    }

    let mut manager = SessionManager::new(config).context("failed to create client")?;
    tracing::debug!(path = %manager.storage_path().display(), "using cookie store");
    let mut account = manager.account(cli.account);

    match cli.command {
        Command::Status => cmd_status(&account),
        Command::Login { token, if_needed } => cmd_login(&mut account, &token, if_needed),
        Command::Devices => cmd_devices(&account),
        Command::Notifications => cmd_notifications(&account),
        Command::Queue { serial } => cmd_queue(&account, serial.as_deref()),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ── status / login ──

fn cmd_status(account: &Account<'_>) -> Result<()> {
    if account.check_status()? {
        println!("Logged in ({}).", account.id());
    } else {
        println!("Not logged in ({}).", account.id());
    }
    Ok(())
}

fn cmd_login(account: &mut Account<'_>, token: &str, if_needed: bool) -> Result<()> {
    if if_needed && account.check_status()? {
        println!("Already logged in.");
        return Ok(());
    }
    if !account.login(token)? {
        bail!("login failed for account {}", account.id());
    }
    println!("Session saved.");
    Ok(())
}

// ── reads ──

fn cmd_devices(account: &Account<'_>) -> Result<()> {
    let devices = account.devices()?;
    if devices.is_empty() {
        println!("No speakers found.");
    }
    for d in &devices {
        println!(
            "  {} [{}] serial={} type={}",
            d.account_name, d.device_family, d.serial_number, d.device_type
        );
    }
    Ok(())
}

fn cmd_notifications(account: &Account<'_>) -> Result<()> {
    let notifications = account.notifications()?;
    if notifications.is_empty() {
        println!("No notifications.");
    }
    for n in &notifications {
        let label = n
            .alarm_label
            .as_deref()
            .or(n.reminder_label.as_deref())
            .or(n.timer_label.as_deref())
            .unwrap_or("-");
        let when = match (&n.original_date, &n.original_time) {
            (Some(date), Some(time)) => format!("{date} {time}"),
            _ => n
                .remaining_time
                .map_or_else(|| "-".to_owned(), |ms| format!("{}s left", ms / 1000)),
        };
        println!(
            "  {:<10} {:<7} {:<24} {} ({})",
            n.kind,
            n.status,
            when,
            label,
            n.device_name.as_deref().unwrap_or("?")
        );
    }
    Ok(())
}

fn cmd_queue(account: &Account<'_>, serial: Option<&str>) -> Result<()> {
    let devices = account.devices()?;
    let device = match serial {
        Some(sn) => devices
            .iter()
            .find(|d| d.serial_number == sn)
            .with_context(|| format!("no speaker with serial {sn}"))?,
        None => devices.first().context("no speakers on this account")?,
    };

    let queue = account.queue(device)?;
    println!("Device:   {}", device.account_name);
    println!("State:    {}", queue.state.as_deref().unwrap_or("IDLE"));
    if let Some(info) = &queue.info_text {
        println!("Title:    {}", info.title.as_deref().unwrap_or("-"));
        println!("Artist:   {}", info.sub_text1.as_deref().unwrap_or("-"));
    }
    if let Some(p) = &queue.progress {
        if let (Some(pos), Some(len)) = (p.media_progress, p.media_length) {
            println!(
                "Progress: {}:{:02} / {}:{:02}",
                pos / 60,
                pos % 60,
                len / 60,
                len % 60
            );
        }
    }
    if let Some(name) = queue.provider.as_ref().and_then(|p| p.provider_name.as_deref()) {
        println!("Provider: {name}");
    }
    Ok(())
}
