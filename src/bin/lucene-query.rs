//! lucene-query: canonicalize parsed query trees
//!
//! Reads the attribute tree a Lucene query parser emits (JSON) and prints the
//! canonical query text.
//!
//! # Usage
//!
//! ```bash
//! # Inline tree
//! lucene-query '[{"term": "foo"}, {"field": "title", "operand": {"term": "bar"}}]'
//!
//! # From a file or stdin
//! lucene-query serialize --input tree.json
//! parser-dump | lucene-query serialize
//!
//! # Show the typed structure
//! lucene-query explain --input tree.json
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;
use lucene_query::config::{Config, OutputFormat};
use lucene_query::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lucene-query")]
#[command(version)]
#[command(about = "Canonical serializer for Lucene-style query trees", long_about = None)]
#[command(after_help = "EXAMPLES:
    lucene-query '{\"term\": \"fuzzy\", \"similarity\": \"0.8\"}'
    lucene-query serialize --input tree.json --format json
    cat tree.json | lucene-query explain")]
struct Cli {
    /// Attribute tree as inline JSON
    tree: Option<String>,

    /// Output format (overrides the config file)
    #[arg(short, long, value_enum, global = true)]
    format: Option<OutputFormat>,

    /// Config file path
    #[arg(short, long, env = "LUCENE_QUERY_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serialize a tree into canonical query text
    Serialize {
        /// JSON file to read ('-' or omitted for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Show the typed structure of a tree and its canonical query
    Explain {
        /// JSON file to read ('-' or omitted for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Show the serialization rule table
    Rules,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref()).context("failed to load config")?;
    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }
    let format = cli.format.unwrap_or(config.output.format);

    match &cli.command {
        Some(Commands::Serialize { input }) => {
            let node = read_tree(None, input.as_deref())?;
            print_query(&node, format)
        }
        Some(Commands::Explain { input }) => {
            let node = read_tree(None, input.as_deref())?;
            explain(&node, format)
        }
        Some(Commands::Rules) => {
            show_rules();
            Ok(())
        }
        None => {
            if cli.tree.is_some() {
                let node = read_tree(cli.tree.as_deref(), None)?;
                print_query(&node, format)
            } else {
                println!(
                    "{}",
                    "lucene-query: canonical Lucene query serializer".cyan().bold()
                );
                println!();
                println!("Usage: lucene-query <TREE_JSON> [OPTIONS]");
                println!();
                println!("Try: lucene-query --help");
                Ok(())
            }
        }
    }
}

fn read_tree(inline: Option<&str>, input: Option<&Path>) -> anyhow::Result<Node> {
    if let Some(json) = inline {
        return Ok(lucene_query::tree::from_json_str(json)?);
    }

    let node = match input {
        Some(path) if path != Path::new("-") => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            lucene_query::tree::from_reader(std::io::BufReader::new(file))?
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            lucene_query::tree::from_json_str(&buf)?
        }
    };
    tracing::debug!(kind = node.kind(), "tree ingested");
    Ok(node)
}

fn print_query(node: &Node, format: OutputFormat) -> anyhow::Result<()> {
    let query = serialize(node);
    match format {
        OutputFormat::Plain => println!("{}", query),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&serde_json::json!({ "query": query }))?)
        }
    }
    Ok(())
}

fn explain(node: &Node, format: OutputFormat) -> anyhow::Result<()> {
    let query = serialize(node);
    match format {
        OutputFormat::Plain => {
            println!("{}", "Tree:".green().bold());
            print_node(node, 1);
            println!();
            println!("{}", "Canonical query:".green().bold());
            println!("  {}", query.white());
        }
        OutputFormat::Json => {
            let tree = serde_json::to_value(node)?;
            let out = serde_json::json!({ "query": query, "tree": tree });
            println!("{}", serde_json::to_string(&out)?);
        }
    }
    Ok(())
}

fn print_node(node: &Node, depth: usize) {
    let pad = "  ".repeat(depth);
    match node {
        Node::Term(term) => {
            let suffix = match &term.modifier {
                None => String::new(),
                Some(TermModifier::Similarity(s)) => format!(" similarity={:?}", s),
                Some(TermModifier::Boost(b)) => format!(" boost={}", b),
            };
            println!("{}{} {}{}", pad, "term".cyan(), term.value.yellow(), suffix.dimmed());
        }
        Node::Phrase(phrase) => {
            let suffix = match &phrase.modifier {
                None => String::new(),
                Some(PhraseModifier::Boost(b)) => format!(" boost={}", b),
                Some(PhraseModifier::Distance(d)) => format!(" distance={}", d),
            };
            println!(
                "{}{} {}{}",
                pad,
                "phrase".cyan(),
                format!("{:?}", phrase.value).yellow(),
                suffix.dimmed()
            );
        }
        Node::Group { inner } => {
            println!("{}{}", pad, "group".cyan());
            print_node(inner, depth + 1);
        }
        Node::Unary { operator, operand } => {
            println!("{}{} {}", pad, operator.attribute().cyan(), operator.symbol().white());
            print_node(operand, depth + 1);
        }
        Node::Field { field, value } => match value {
            FieldValue::Operand(operand) => {
                println!("{}{} {}", pad, "field".cyan(), field.white());
                print_node(operand, depth + 1);
            }
            FieldValue::Inclusive(range) => {
                let range = format!("[{}]", range);
                println!("{}{} {} {}", pad, "field".cyan(), field.white(), range.yellow());
            }
            FieldValue::Exclusive(range) => {
                let range = format!("{{{}}}", range);
                println!("{}{} {} {}", pad, "field".cyan(), field.white(), range.yellow());
            }
        },
        Node::Sequence(items) => {
            println!("{}{} ({} items)", pad, "sequence".cyan(), items.len());
            for item in items {
                print_node(item, depth + 1);
            }
        }
    }
}

fn show_rules() {
    println!("{}", "Serialization Rules".cyan().bold());
    println!();

    let rules = [
        ("term", "value"),
        ("term + similarity", "value~similarity"),
        ("term + boost", "value^boost"),
        ("phrase", "\"value\""),
        ("phrase + boost", "\"value\"^boost"),
        ("phrase + distance", "\"value\"~distance"),
        ("group", "(inner)"),
        ("unary", "+operand / -operand"),
        ("field + operand", "field:operand"),
        ("field + inclusive_range", "field:[from TO to]"),
        ("field + exclusive_range", "field:{from TO to}"),
        ("sequence", "item item ..."),
    ];

    println!("{:26} {}", "Shape".white().bold(), "Output".white().bold());
    println!("{}", "─".repeat(50).dimmed());
    for (shape, output) in rules {
        println!("{:26} {}", shape.yellow(), output.white());
    }
}
