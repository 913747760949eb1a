use std::path::PathBuf;

use clap::Parser;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use regview_core::{
    config::{self, ConfigOverrides},
    register::{self, Register},
    LoadResult, LoaderConfig, RegisterLoader, RenderContext, ReqwestFetch, RouteParams,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{reload, EnvFilter, Registry};

// ── Palette ──────────────────────────────────────────────────────────

fn s_header() -> Style { Style::new().color256(252).bold() }  // bright gray, bold
fn s_dim() -> Style    { Style::new().color256(248) }         // light gray
fn s_tree() -> Style   { Style::new().color256(245) }         // mid gray
fn s_hint() -> Style   { Style::new().color256(243) }         // soft gray
fn s_ok() -> Style     { Style::new().color256(114) }         // green
fn s_warm() -> Style   { Style::new().color256(214) }         // amber
fn s_err() -> Style    { Style::new().color256(167) }         // red

fn sep(width: usize) -> String {
    s_tree().apply_to("\u{2500}".repeat(width)).to_string()
}

// ── CLI Args ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "regview",
    about = "Load register readings from the register API and show them",
    version,
    after_help = "examples:\n  \
        regview                                  (server context, 127.0.0.1:8081)\n  \
        regview --context client                 (localhost:8081)\n  \
        regview --base-url http://pi.local:8081\n  \
        regview --json\n  \
        regview --watch 5"
)]
struct Cli {
    /// Render context; picks the default base URL.
    #[arg(long, default_value = "server")]
    context: RenderContext,

    /// Base URL of the register API (overrides config and REGVIEW_BASE_URL).
    #[arg(long)]
    base_url: Option<String>,

    /// Config file [default: <config dir>/regview/config.toml]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log the loaded payload.
    #[arg(long, short)]
    verbose: bool,

    /// Route parameter, `key=value`. Accepted and ignored by the loader.
    #[arg(long = "param", short = 'p', value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Print the load result as JSON.
    #[arg(long, short)]
    json: bool,

    /// Reload every N seconds (at least 1).
    #[arg(long, short, value_parser = clap::value_parser!(u64).range(1..))]
    watch: Option<u64>,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((k, v)) if !k.is_empty() => Ok((k.to_string(), v.to_string())),
        _ => Err(format!("expected key=value, got {raw:?}")),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let logging = init_logging(cli.verbose);

    let cfg = resolve_config(&cli)?;
    logging.follow_config(&cfg)?;
    let loader = RegisterLoader::new(ReqwestFetch::new()?, cfg);
    let params: RouteParams = cli.params.iter().cloned().collect();

    let ok = cmd_load(&loader, &params, &cli).await?;
    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

// ── Logging ──────────────────────────────────────────────────────────

fn default_directive(verbose: bool) -> &'static str {
    if verbose { "info" } else { "warn" }
}

struct Logging {
    filter: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl Logging {
    /// Raise the default filter once verbose may have come from the config
    /// file or environment. `RUST_LOG` always wins.
    fn follow_config(&self, cfg: &LoaderConfig) -> anyhow::Result<()> {
        if !self.from_env {
            self.filter.reload(default_directive(cfg.verbose))?;
        }
        Ok(())
    }
}

fn init_logging(verbose: bool) -> Logging {
    let (env_filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(f) => (f, true),
        Err(_) => (EnvFilter::new(default_directive(verbose)), false),
    };
    let (filter_layer, filter) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    Logging { filter, from_env }
}

// ── Config ───────────────────────────────────────────────────────────

fn resolve_config(cli: &Cli) -> anyhow::Result<LoaderConfig> {
    resolve_config_with(cli, config::default_config_path(), &ConfigOverrides::from_env())
}

/// Context default, then config file, then environment, then flags.
/// A missing default file is skipped; a missing `--config` file is an error.
fn resolve_config_with(
    cli: &Cli,
    default_path: Option<PathBuf>,
    env: &ConfigOverrides,
) -> anyhow::Result<LoaderConfig> {
    let mut cfg = LoaderConfig::for_context(cli.context);

    match &cli.config {
        Some(path) => {
            cfg = cfg.apply(&ConfigOverrides::load(path)?);
        }
        None => {
            if let Some(path) = default_path.filter(|p| p.exists()) {
                tracing::debug!(path = %path.display(), "reading config file");
                cfg = cfg.apply(&ConfigOverrides::load(&path)?);
            }
        }
    }

    cfg = cfg.apply(env);
    cfg = cfg.apply(&ConfigOverrides {
        base_url: cli.base_url.clone(),
        verbose: cli.verbose.then_some(true),
    });
    cfg.validate()?;
    Ok(cfg)
}

// ── Load ─────────────────────────────────────────────────────────────

/// Returns whether the last load succeeded.
async fn cmd_load(
    loader: &RegisterLoader<ReqwestFetch>,
    params: &RouteParams,
    cli: &Cli,
) -> anyhow::Result<bool> {
    let pulse = ['\u{2731}', '\u{2726}', '\u{00b7}', '\u{2726}'];
    let mut frame: usize = 0;

    loop {
        let result = loader.load_with_params(params).await;

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            if cli.watch.is_some() {
                Term::stdout().clear_screen()?;
            }
            let refresh = if cli.watch.is_some() {
                format!(
                    "  {}",
                    s_warm().apply_to(format!("{} refreshing...", pulse[frame % pulse.len()]))
                )
            } else {
                String::new()
            };
            let now = chrono::Local::now().format("%H:%M:%S");
            println!();
            println!(
                "{}  {}{}",
                s_header().apply_to(loader.endpoint()),
                s_dim().apply_to(now),
                refresh
            );
            println!("{}", sep(64));
            print_result(&result);
            println!("{}", sep(64));
        }

        match cli.watch {
            Some(secs) => {
                if !cli.json {
                    println!("{}", s_hint().apply_to(format!("  \u{21bb} {secs}s")));
                }
                frame += 1;
                tokio::time::sleep(std::time::Duration::from_secs(secs)).await;
            }
            None => {
                if !cli.json {
                    println!();
                }
                return Ok(result.is_success());
            }
        }
    }
}

fn print_result(result: &LoadResult) {
    match result {
        LoadResult::Success { data } => {
            let registers = register::parse_registers(data);
            if registers.is_empty() {
                println!("  {}", s_dim().apply_to("no registers in response"));
                if !data.is_null() {
                    println!("  {}", s_hint().apply_to(data.to_string()));
                }
            } else {
                print_registers(&registers);
            }
        }
        LoadResult::HttpFailure { status, error } => {
            println!(
                "  {}  {}",
                s_err().apply_to(&error.message),
                s_dim().apply_to(format!("HTTP {status}"))
            );
        }
        LoadResult::TransportFailure { error, detail } => {
            println!("  {}", s_err().apply_to(&error.message));
            println!("  {}", s_hint().apply_to(detail));
        }
        LoadResult::DecodeFailure {
            status,
            error,
            detail,
        } => {
            println!(
                "  {}  {}",
                s_err().apply_to(&error.message),
                s_dim().apply_to(format!("HTTP {status}"))
            );
            println!("  {}", s_hint().apply_to(detail));
        }
    }
}

fn fmt_value(r: &Register) -> String {
    match r.value {
        _ if r.is_unread() => "\u{2500}".to_string(),
        Some(v) if r.is_digital() => if v != 0.0 { "on".into() } else { "off".into() },
        Some(v) => format!("{v}"),
        None => "\u{2500}".to_string(),
    }
}

fn print_registers(registers: &[Register]) {
    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("  Tag").fg(Color::AnsiValue(243)),
        Cell::new("Address").fg(Color::AnsiValue(243)),
        Cell::new("Type").fg(Color::AnsiValue(243)),
        Cell::new("Value").fg(Color::AnsiValue(243)),
        Cell::new("Updated").fg(Color::AnsiValue(243)),
        Cell::new("Description").fg(Color::AnsiValue(243)),
    ]);

    for r in registers {
        let (tag_c, value_c) = if r.is_unread() {
            (Color::AnsiValue(248), Color::AnsiValue(167))
        } else {
            (Color::AnsiValue(252), Color::AnsiValue(114))
        };
        table.add_row(vec![
            Cell::new(format!("  {}", r.tag)).fg(tag_c),
            Cell::new(&r.address).fg(Color::AnsiValue(248)),
            Cell::new(&r.datatype).fg(Color::AnsiValue(248)),
            Cell::new(fmt_value(r)).fg(value_c),
            Cell::new(r.last_update.as_deref().unwrap_or("never")).fg(Color::AnsiValue(245)),
            Cell::new(&r.description).fg(Color::AnsiValue(248)),
        ]);
    }
    println!("{table}");

    let unread = registers.iter().filter(|r| r.is_unread()).count();
    let summary = format!("{} registers", registers.len());
    if unread > 0 {
        println!(
            "  {}  {}",
            s_dim().apply_to(summary),
            s_err().apply_to(format!("{unread} unread"))
        );
    } else {
        println!("  {}  {}", s_dim().apply_to(summary), s_ok().apply_to("all read"));
    }
}
