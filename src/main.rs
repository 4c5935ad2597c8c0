use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, BufReader, stdin};

use z2m::event::AttributeEvent;

use hzswitch::backend::z2m::Z2mBackend;
use hzswitch::codec::encode::EncodeRequest;
use hzswitch::codec::message::{InboundMessage, ZclRecord};
use hzswitch::codec::{field_name, SwitchCodec};
use hzswitch::config::{self, AppConfig};
use hzswitch::device::SwitchDevice;
use hzswitch::error::SwitchResult;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: Utf8PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode attribute messages (one json object per line) from stdin
    Decode {
        /// Input lines are raw zcl records instead of herdsman events
        #[arg(long)]
        zcl: bool,
    },

    /// Read a field from the device
    Get {
        field: String,

        #[arg(short, long, default_value = "button_1")]
        endpoint: String,

        #[arg(short, long, default_value = "default")]
        server: String,

        /// Seconds to wait for the device to answer
        #[arg(short, long, default_value_t = 10)]
        timeout: u64,
    },

    /// Write a field on the device
    Set {
        field: String,

        /// Value, as json (falls back to a plain string)
        value: String,

        #[arg(short, long, default_value = "button_1")]
        endpoint: String,

        #[arg(short, long, default_value = "default")]
        server: String,
    },

    /// Print device definition and exposes
    Exposes,
}

/*
 * Formatter function to output in syslog format. This makes sense when running
 * as a service (where output might go to a log file, or the system journal)
 */
#[allow(clippy::match_same_arms)]
fn syslog_format(
    buf: &mut pretty_env_logger::env_logger::fmt::Formatter,
    record: &log::Record,
) -> std::io::Result<()> {
    writeln!(
        buf,
        "<{}>{}: {}",
        match record.level() {
            log::Level::Error => 3,
            log::Level::Warn => 4,
            log::Level::Info => 6,
            log::Level::Debug => 7,
            log::Level::Trace => 7,
        },
        record.target(),
        record.args()
    )
}

fn init_logging() -> SwitchResult<()> {
    /* Try to provide reasonable default filters, when RUST_LOG is not specified */
    const DEFAULT_LOG_FILTERS: &[&str] = &["info", "tungstenite=warn", "tokio_tungstenite=warn"];

    let log_filters = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTERS.join(","));

    /* Detect if we need syslog or human-readable formatting */
    if std::env::var("SYSTEMD_EXEC_PID").is_ok_and(|pid| pid == std::process::id().to_string()) {
        Ok(pretty_env_logger::env_logger::builder()
            .format(syslog_format)
            .parse_filters(&log_filters)
            .try_init()?)
    } else {
        Ok(pretty_env_logger::formatted_timed_builder()
            .parse_filters(&log_filters)
            .try_init()?)
    }
}

fn load_config(path: &Utf8PathBuf) -> SwitchResult<AppConfig> {
    if path.is_file() {
        let conf = config::parse(path)?;
        log::debug!("Configuration loaded successfully");
        Ok(conf)
    } else {
        log::debug!("No configuration at {path}, using defaults");
        Ok(AppConfig::default())
    }
}

fn parse_message(line: &str, zcl: bool) -> SwitchResult<Option<InboundMessage>> {
    if zcl {
        let rec: ZclRecord = serde_json::from_str(line)?;
        if let Some(desc) = rec.describe()? {
            log::debug!("[{}] {:04x}: {desc}", rec.endpoint, rec.cluster);
        }
        rec.message()
    } else {
        InboundMessage::from_event(&AttributeEvent::from_json(line)?)
    }
}

async fn decode(codec: &SwitchCodec, zcl: bool) -> SwitchResult<()> {
    let mut lines = BufReader::new(stdin()).lines();
    let mut out = std::io::stdout().lock();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let msg = match parse_message(&line, zcl) {
            Ok(Some(msg)) => msg,
            Ok(None) => continue,
            Err(err) => {
                log::error!("Failed to parse: {err}");
                continue;
            }
        };

        let state = codec.decode(&msg);
        writeln!(out, "{}", serde_json::to_string(&state)?)?;
    }

    Ok(())
}

async fn run() -> SwitchResult<()> {
    init_logging()?;

    let args = Args::parse();
    let conf = load_config(&args.config)?;
    let device = SwitchDevice::from_config(&conf.device)?;

    match args.command {
        Command::Decode { zcl } => decode(device.codec(), zcl).await?,

        Command::Get {
            field,
            endpoint,
            server,
            timeout,
        } => {
            let req = EncodeRequest::get(&field, &endpoint);
            // validate before connecting
            device.codec().build_command(&req)?;

            let backend =
                Z2mBackend::connect(&server, conf.server(&server)?, device.friendly_name()).await?;
            device.codec().encode(&backend, &req).await?;

            let name = field_name(&field, &endpoint);
            let value = backend
                .wait_for_field(&name, Duration::from_secs(timeout))
                .await?;
            println!("{}", json!({ name: value }));
            backend.close().await?;
        }

        Command::Set {
            field,
            value,
            endpoint,
            server,
        } => {
            let value = serde_json::from_str(&value).unwrap_or(Value::String(value));
            let req = EncodeRequest::set(&field, value, &endpoint);
            device.codec().build_command(&req)?;

            let backend =
                Z2mBackend::connect(&server, conf.server(&server)?, device.friendly_name()).await?;
            if let Some(echo) = device.codec().encode(&backend, &req).await? {
                println!("{}", serde_json::to_string(&echo)?);
            }
            backend.close().await?;
        }

        Command::Exposes => {
            let out = json!({
                "definition": device.definition(),
                "endpoints": device.endpoint_map(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(())
}

fn exit_status(res: &SwitchResult<()>) -> ExitCode {
    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("hzswitch error: {err}");
            log::error!("Fatal error encountered, cannot continue.");
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    exit_status(&run().await)
}
