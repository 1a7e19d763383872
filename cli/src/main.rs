//! reachgraph CLI: load a dataset and run friend-graph queries against it
//!
//! Without `--fixture` the bundled social-network sample is loaded.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use reachgraph::{
    Database, DatabaseConfig, Exclusion, Fixture, GroupCount, LikeRecord, NodeRecord, PropertyValue,
    QueryEngine, Seed,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "reachgraph", version, about = "reachgraph query CLI")]
struct Cli {
    /// Database configuration (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dataset to load (YAML)
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Log at debug level on stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ExclusionArg {
    None,
    Direct,
    All,
}

impl From<ExclusionArg> for Exclusion {
    fn from(arg: ExclusionArg) -> Self {
        match arg {
            ExclusionArg::None => Exclusion::None,
            ExclusionArg::Direct => Exclusion::DirectNeighbors,
            ExclusionArg::All => Exclusion::AllCloser,
        }
    }
}

/// Index lookup that selects the start node
#[derive(Args, Clone)]
struct SeedArgs {
    /// Value to look up; integers are matched as integers
    value: String,

    #[arg(long, default_value = "User")]
    label: String,

    #[arg(long, default_value = "name")]
    key: String,
}

impl SeedArgs {
    fn seed(&self) -> Seed {
        let value = match self.value.parse::<i64>() {
            Ok(n) => PropertyValue::Integer(n),
            Err(_) => PropertyValue::from(self.value.as_str()),
        };
        Seed::lookup(self.label.as_str(), self.key.as_str(), value)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Find a node through an index
    Lookup(SeedArgs),
    /// Friends first reached at exactly DEPTH hops
    Friends {
        #[command(flatten)]
        seed: SeedArgs,
        #[arg(long, default_value_t = 1)]
        depth: u32,
        #[arg(long, default_value = "direct")]
        exclude: ExclusionArg,
    },
    /// Distinct ends of friend walks of exactly DEPTH hops
    Pattern {
        #[command(flatten)]
        seed: SeedArgs,
        #[arg(long, default_value_t = 3)]
        depth: u32,
    },
    /// What friends up to DEPTH hops away like
    Likes {
        #[command(flatten)]
        seed: SeedArgs,
        #[arg(long, default_value_t = 1)]
        depth: u32,
    },
    /// Nodes liked most by friends up to DEPTH hops away
    MostLiked {
        #[command(flatten)]
        seed: SeedArgs,
        #[arg(long, default_value_t = 1)]
        depth: u32,
    },
    /// Run every query for the user `me`
    Demo,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::WARN })
        .init();

    let db = open(&cli)?;
    let snapshot = db.snapshot();
    let engine = QueryEngine::new();
    let format = cli.format;

    match &cli.command {
        Commands::Lookup(seed) => {
            let found = engine.resolve(&snapshot, &seed.seed())?;
            let records: Vec<NodeRecord> = found
                .and_then(|id| snapshot.get_node(id))
                .map(|node| NodeRecord::from_node(node, 0))
                .into_iter()
                .collect();
            print_nodes(&records, format)?;
        }
        Commands::Friends { seed, depth, exclude } => {
            let mut records = engine.friends_at_depth(&snapshot, &seed.seed(), *depth, (*exclude).into())?;
            reachgraph::query::order_by(&mut records, "name");
            print_nodes(&records, format)?;
        }
        Commands::Pattern { seed, depth } => {
            let mut records = engine.pattern_at_depth(&snapshot, &seed.seed(), *depth)?;
            reachgraph::query::order_by(&mut records, "name");
            print_nodes(&records, format)?;
        }
        Commands::Likes { seed, depth } => {
            let likes = engine.likes_of_friends(&snapshot, &seed.seed(), *depth)?;
            print_likes(&likes, format)?;
        }
        Commands::MostLiked { seed, depth } => {
            let groups = engine.most_liked(&snapshot, &seed.seed(), *depth)?;
            print_groups(&groups, format)?;
        }
        Commands::Demo => run_demo(&engine, &snapshot, format)?,
    }

    db.close();
    Ok(())
}

fn open(cli: &Cli) -> anyhow::Result<Database> {
    let config = match &cli.config {
        Some(path) => DatabaseConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DatabaseConfig::default(),
    };
    let fixture = match &cli.fixture {
        Some(path) => Fixture::from_path(path)
            .with_context(|| format!("loading fixture {}", path.display()))?,
        None => Fixture::social_network()?,
    };

    let db = Database::open(config)?;
    fixture.load(&db)?;
    Ok(db)
}

fn run_demo(engine: &QueryEngine, store: &reachgraph::GraphStore, format: OutputFormat) -> anyhow::Result<()> {
    let me = Seed::lookup("User", "name", "me");

    println!("Friends of me");
    print_nodes(&engine.direct_neighbors(store, &me)?, format)?;

    println!("\nFriends of friends of me");
    let mut records = engine.friends_at_depth(store, &me, 2, Exclusion::DirectNeighbors)?;
    reachgraph::query::order_by(&mut records, "name");
    print_nodes(&records, format)?;

    println!("\nFriends of friends of friends of me");
    let mut records = engine.pattern_at_depth(store, &me, 3)?;
    reachgraph::query::order_by(&mut records, "name");
    print_nodes(&records, format)?;

    println!("\nLikes of friends of me");
    print_likes(&engine.likes_of_friends(store, &me, 1)?, format)?;

    println!("\nWebsites friends of me liked most");
    print_groups(&engine.most_liked(store, &me, 1)?, format)?;
    Ok(())
}

/// Property used to name a node in tables
fn display_name(record: &NodeRecord) -> serde_json::Value {
    ["name", "url"]
        .iter()
        .find_map(|key| record.get(key))
        .map(|value| serde_json::to_value(value).unwrap_or_default())
        .unwrap_or_else(|| serde_json::Value::from(record.id.as_u64()))
}

fn print_nodes(records: &[NodeRecord], format: OutputFormat) -> anyhow::Result<()> {
    let mut keys: Vec<&String> = records.iter().flat_map(|r| r.properties.keys()).collect();
    keys.sort();
    keys.dedup();

    let mut columns = vec!["node".to_string(), "depth".to_string()];
    columns.extend(keys.iter().map(|k| k.to_string()));

    let rows = records
        .iter()
        .map(|r| {
            let mut row = vec![serde_json::Value::from(r.id.as_u64()), serde_json::Value::from(r.depth)];
            for key in &keys {
                row.push(
                    r.get(key)
                        .map(|v| serde_json::to_value(v).unwrap_or_default())
                        .unwrap_or(serde_json::Value::Null),
                );
            }
            row
        })
        .collect();

    render(records, columns, rows, format)
}

fn print_likes(likes: &[LikeRecord], format: OutputFormat) -> anyhow::Result<()> {
    let columns = vec!["friend".to_string(), "liked".to_string()];
    let rows = likes
        .iter()
        .map(|like| vec![display_name(&like.friend), display_name(&like.liked)])
        .collect();
    render(likes, columns, rows, format)
}

fn print_groups(groups: &[GroupCount], format: OutputFormat) -> anyhow::Result<()> {
    let columns = vec!["liked".to_string(), "count".to_string()];
    let rows = groups
        .iter()
        .map(|group| vec![display_name(&group.node), serde_json::Value::from(group.count)])
        .collect();
    render(groups, columns, rows, format)
}

fn render<T: Serialize>(
    records: &[T],
    columns: Vec<String>,
    rows: Vec<Vec<serde_json::Value>>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(records)?);
        }
        OutputFormat::Csv => {
            println!("{}", columns.join(","));
            for row in &rows {
                let cells: Vec<String> = row.iter().map(format_csv_value).collect();
                println!("{}", cells.join(","));
            }
        }
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("(no results)");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(&columns);
            for row in &rows {
                let cells: Vec<String> = row.iter().map(format_table_value).collect();
                table.add_row(cells);
            }

            println!("{}", table);
            println!("{} row(s)", rows.len());
        }
    }
    Ok(())
}

fn format_table_value(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn format_csv_value(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::Null => "".to_string(),
        serde_json::Value::String(s) => {
            if s.contains(',') || s.contains('"') || s.contains('\n') {
                format!("\"{}\"", s.replace('"', "\"\""))
            } else {
                s.clone()
            }
        }
        other => other.to_string(),
    }
}
