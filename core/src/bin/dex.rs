use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dex_core::format::{format_height, format_id, format_name, format_weight};
use dex_core::stat_meta::{stat_label, stat_meta, stat_width, StatRating};
use dex_core::{
    Config, DetailController, DetailRecord, ListController, ResourceClient, SortField,
};

/// Browse the species catalog from the terminal.
#[derive(Debug, Parser)]
#[command(name = "dex", version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Catalog base URL [env: DEX_API_URL]
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in milliseconds [env: DEX_API_TIMEOUT_MS]
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Maximum number of move lookups per detail view [env: DEX_MAX_MOVES]
    #[arg(long, global = true)]
    max_moves: Option<usize>,

    /// Bypass the response cache [env: DEX_CACHE_ENABLED=false]
    #[arg(long, global = true)]
    no_cache: bool,

    /// Cache entry lifetime in milliseconds [env: DEX_CACHE_TTL_MS]
    #[arg(long, global = true)]
    cache_ttl_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", global = true, default_value = "warn")]
    log_level: String,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// List one page of the catalog
    List {
        /// Page number (0-indexed)
        #[arg(short, long, default_value = "0")]
        page: usize,

        /// Entries per page [env: DEX_PAGE_SIZE]
        #[arg(long)]
        page_size: Option<usize>,

        /// Sort column
        #[arg(short, long, value_enum, default_value = "name")]
        sort: SortArg,

        /// Sort descending
        #[arg(long)]
        desc: bool,
    },

    /// Show one entity with its moves and evolution line
    Show {
        /// Id or name, e.g. "25" or "pikachu"
        id_or_name: String,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum SortArg {
    Name,
    Hp,
    Speed,
    Experience,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortField::Name,
            SortArg::Hp => SortField::Hp,
            SortArg::Speed => SortField::Speed,
            SortArg::Experience => SortField::BaseExperience,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("dex_core={},warn", args.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = config_from(&args);
    let client = match ResourceClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            error!("failed to set up catalog client: {e}");
            return ExitCode::FAILURE;
        }
    };

    let ok = match args.command {
        Command::List {
            page,
            page_size,
            sort,
            desc,
        } => {
            let page_size = page_size.unwrap_or(config.pagination.default_page_size);
            run_list(client, page, page_size, sort.into(), desc, args.json).await
        }
        Command::Show { id_or_name } => {
            run_show(client, &id_or_name, config.moves.max_fetch_count, args.json).await
        }
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn config_from(args: &Args) -> Config {
    let mut config = Config::from_env();
    if let Some(url) = &args.base_url {
        config.api.base_url = url.clone();
    }
    if let Some(ms) = args.timeout_ms {
        config.api.timeout = Duration::from_millis(ms);
    }
    if let Some(max) = args.max_moves {
        config.moves.max_fetch_count = max;
    }
    if args.no_cache {
        config.cache.enabled = false;
    }
    if let Some(ms) = args.cache_ttl_ms {
        config.cache.ttl = Duration::from_millis(ms);
    }
    config
}

async fn run_list(
    client: ResourceClient,
    page: usize,
    page_size: usize,
    field: SortField,
    desc: bool,
    json: bool,
) -> bool {
    let mut list = ListController::new(client, page_size).with_page(page);
    if field != list.sort_field() {
        list.toggle_sort(field);
    }
    if desc {
        list.toggle_sort(field);
    }

    list.refetch().await;
    if let Some(message) = list.error() {
        eprintln!("{message}");
        return false;
    }

    let rows = list.rows();
    if json {
        let output = serde_json::json!({
            "page": list.page(),
            "totalPages": list.total_pages(),
            "totalCount": list.total_count(),
            "rows": rows,
            "stats": list.stats(),
        });
        return print_json(&output);
    }

    for row in &rows {
        println!(
            "{:>6}  {:<16} {:<18} HP {:>3}  SPD {:>3}  XP {:>4}  {}",
            format_id(row.id),
            format_name(&row.name),
            row.types.join("/"),
            row.hp,
            row.speed,
            row.base_experience,
            format_name(&row.primary_ability),
        );
    }

    let stats = list.stats();
    println!();
    println!(
        "Page {}/{} ({} total)  avg HP {:.1}",
        list.page() + 1,
        list.total_pages().max(1),
        list.total_count(),
        stats.average_hp,
    );
    if let Some(best) = &stats.most_powerful {
        println!("Most powerful: {} ({})", format_name(&best.name), best.score);
    }
    let distribution: Vec<String> = stats
        .type_distribution
        .iter()
        .map(|(kind, percent)| format!("{kind} {percent}%"))
        .collect();
    if !distribution.is_empty() {
        println!("Types: {}", distribution.join(", "));
    }
    true
}

async fn run_show(client: ResourceClient, id_or_name: &str, max_moves: usize, json: bool) -> bool {
    let mut detail = DetailController::new(client, max_moves);
    detail.select(id_or_name).await;

    if let Some(message) = detail.error() {
        eprintln!("{message}");
        return false;
    }
    let Some(record) = detail.record() else {
        return false;
    };

    if json {
        return print_json(record);
    }
    print_record(record);
    true
}

fn print_record(record: &DetailRecord) {
    println!("{} {}", format_id(record.id), format_name(&record.name));
    println!("Types:  {}", record.types.join("/"));
    println!(
        "Height: {}  Weight: {}  Base XP: {}",
        format_height(record.height),
        format_weight(record.weight),
        record.base_experience
    );

    println!();
    for (key, value) in record.stats.entries() {
        let max = stat_meta(key).map_or(255, |meta| meta.max_value);
        let filled = (stat_width(value, max) / 5.0).round() as usize;
        println!(
            "{:<8} {:>3} {:<20} {}",
            stat_label(key),
            value,
            "#".repeat(filled),
            StatRating::for_value(value)
        );
    }

    println!();
    let abilities: Vec<String> = record
        .abilities
        .iter()
        .map(|a| {
            if a.is_hidden {
                format!("{} (hidden)", format_name(&a.name))
            } else {
                format_name(&a.name)
            }
        })
        .collect();
    println!("Abilities: {}", abilities.join(", "));

    if !record.moves.is_empty() {
        let moves: Vec<String> = record
            .moves
            .iter()
            .map(|m| format!("{} [{}]", format_name(&m.name), m.kind))
            .collect();
        println!("Moves: {}", moves.join(", "));
    }

    if !record.evolution_chain.is_empty() {
        let stages: Vec<String> = record
            .evolution_chain
            .iter()
            .map(|stage| {
                if stage.id == 0 {
                    format_name(&stage.name)
                } else {
                    format!("{} {}", format_name(&stage.name), format_id(stage.id))
                }
            })
            .collect();
        println!("Evolution: {}", stages.join(" -> "));
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> bool {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{text}");
            true
        }
        Err(e) => {
            error!("failed to serialize output: {e}");
            false
        }
    }
}
