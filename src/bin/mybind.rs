//! mybind — inspect MySQL binary parameter encodings
//!
//! # Usage
//!
//! ```bash
//! # Descriptor and bytes for each value
//! mybind encode u32:6 'text:Ala ma Kota!' '&datetime'
//!
//! # JSON output, host-width integers
//! mybind encode isize:7 --format json --policy native
//!
//! # Length-encoded integer prefix
//! mybind lenenc 65536
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use mybind::prelude::*;
use mybind::{BindConfig, Literal, codec, parse_literal};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "mybind")]
#[command(version)]
#[command(about = "MySQL binary protocol parameter encoder", long_about = None)]
#[command(after_help = "LITERALS:
    null                      absent value
    u32:6  i8:-1  f64:2.5     fixed-width numbers
    text:hello  bytes:0a0b    strings and byte strings (hex)
    datetime:2010-12-30 17:21:00
    raw(int24):030201         explicit wire type
    &u32:6  &u32              reference, resolved or not")]
struct Cli {
    /// Width policy for isize/usize/real (overrides config)
    #[arg(short, long, env = "MYBIND_WIDTH_POLICY", global = true)]
    policy: Option<WidthPolicy>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Bind and encode typed literals
    Encode {
        /// Literals to encode, in parameter order
        #[arg(required = true)]
        literals: Vec<String>,

        /// Also print the parameter type block
        #[arg(short, long)]
        types: bool,
    },
    /// Show the length-encoded integer for a number
    Lenenc {
        value: u64,
    },
    /// Show the wire type code reference
    Types,
}

#[derive(Serialize)]
struct EncodedParam {
    literal: String,
    descriptor: BoundDescriptor,
    absent: bool,
    hex: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Encode { literals, types }) => encode(&cli, literals, *types),
        Some(Commands::Lenenc { value }) => {
            show_lenenc(*value);
            Ok(())
        }
        Some(Commands::Types) => {
            show_types();
            Ok(())
        }
        None => {
            println!("{}", "mybind — MySQL binary parameter encoder".cyan().bold());
            println!();
            println!("Usage: mybind encode <LITERAL>... [OPTIONS]");
            println!();
            println!("Try: mybind --help");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<BindConfig> {
    let mut config = BindConfig::load()?;
    if let Some(policy) = cli.policy {
        config.width_policy = policy;
    }
    if cli.verbose {
        println!("{} {:?}", "Width policy:".dimmed(), config.width_policy);
    }
    Ok(config)
}

fn to_hex(bytes: &[u8], upper: bool) -> String {
    bytes
        .iter()
        .map(|b| if upper { format!("{:02X}", b) } else { format!("{:02x}", b) })
        .collect::<Vec<_>>()
        .join(" ")
}

fn encode(cli: &Cli, literals: &[String], show_type_block: bool) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let binder = config.binder();

    let parsed = literals
        .iter()
        .map(|text| parse_literal(text).map_err(|e| anyhow::anyhow!("'{}': {}", text, e)))
        .collect::<anyhow::Result<Vec<Literal>>>()?;

    let bound: Vec<Bound<'_>> = parsed.iter().map(|lit| Bound::of(&binder, lit)).collect();

    let mut encoded = Vec::with_capacity(bound.len());
    for (text, b) in literals.iter().zip(&bound) {
        let mut buf = Vec::with_capacity(b.encoded_len()?);
        b.write_to(&mut buf)?;
        encoded.push(EncodedParam {
            literal: text.clone(),
            descriptor: b.descriptor,
            absent: b.is_absent(),
            hex: to_hex(&buf, config.hex_uppercase),
        });
    }

    let mut type_block = Vec::new();
    if show_type_block {
        let descriptors: Vec<BoundDescriptor> = bound.iter().map(|b| b.descriptor).collect();
        mybind::write_param_types(&mut type_block, &descriptors);
    }

    match cli.format {
        OutputFormat::Json => {
            let mut out = serde_json::json!({ "params": encoded });
            if show_type_block {
                out["types"] = serde_json::Value::String(to_hex(&type_block, config.hex_uppercase));
            }
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Table => {
            let width = encoded.iter().map(|e| e.literal.len()).max().unwrap_or(0).max(7);
            println!(
                "{:width$}  {:22}  {:5}  {:4}  {}",
                "Literal".white().bold(),
                "Wire type".white().bold(),
                "Ref".white().bold(),
                "Len".white().bold(),
                "Bytes".white().bold(),
                width = width
            );
            println!("{}", "─".repeat(width + 48).dimmed());
            for e in &encoded {
                let bytes = if e.absent {
                    "(null bitmap)".dimmed().to_string()
                } else {
                    e.hex.clone()
                };
                println!(
                    "{:width$}  {:22}  {:5}  {:4}  {}",
                    e.literal.yellow(),
                    e.descriptor.wire_type.to_string().cyan(),
                    e.descriptor.indirect,
                    e.descriptor.length.to_string(),
                    bytes,
                    width = width
                );
            }
            if show_type_block {
                println!();
                println!("{} {}", "Type block:".green().bold(), to_hex(&type_block, config.hex_uppercase));
            }
        }
    }
    Ok(())
}

fn show_lenenc(value: u64) {
    let mut buf = Vec::new();
    let n = codec::put_lenenc_int(&mut buf, value);
    println!("{} {}", "Value:".dimmed(), value.to_string().yellow());
    println!("{} {} byte(s)", "Prefix:".dimmed(), n);
    println!("{} {}", "Bytes:".dimmed(), to_hex(&buf, false).cyan());
}

fn show_types() {
    println!("{}", "MySQL Wire Type Reference".cyan().bold());
    println!();
    println!(
        "{:6} {:12} {}",
        "Code".white().bold(),
        "Name".white().bold(),
        "Width".white().bold()
    );
    println!("{}", "─".repeat(30).dimmed());
    for t in WireType::ALL {
        let width = t
            .fixed_width()
            .map(|w| w.to_string())
            .unwrap_or_else(|| "var".to_string());
        println!("{:<6} {:12} {}", t.code().to_string().cyan(), t.name().yellow(), width.dimmed());
    }
    println!();
    println!(
        "{} unsigned flag: {:#06x} (flag byte 0x80)",
        "Note:".dimmed(),
        WireType::UNSIGNED_MASK
    );
}
