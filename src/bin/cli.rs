//! kvwire CLI Client
//!
//! Command-line interface for issuing commands to a key-value server.

use clap::{Parser, Subcommand};
use kvwire::{Client, ClientError, Command, Config, Reply};
use tracing_subscriber::{fmt, EnvFilter};

/// kvwire CLI
#[derive(Parser, Debug)]
#[command(name = "kvwire-cli")]
#[command(about = "CLI for length-prefixed key-value servers")]
#[command(version = kvwire::VERSION)]
struct Args {
    /// Server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "8888")]
    port: u16,

    /// Shared secret for the auth handshake
    #[arg(short, long)]
    auth: Option<String>,

    /// Per-operation timeout in seconds (0 = default)
    #[arg(short, long, default_value = "3")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// List key-value pairs in (start, end]
    Scan {
        start: String,
        end: String,

        #[arg(default_value = "10")]
        limit: u64,
    },

    /// Get several keys at once
    MultiGet {
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Set several pairs at once: k1 v1 k2 v2 ...
    MultiSet {
        #[arg(required = true)]
        pairs: Vec<String>,
    },

    /// Send an arbitrary command
    Raw {
        verb: String,
        args: Vec<String>,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,kvwire=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), ClientError> {
    let mut builder = Config::builder()
        .host(&args.host)
        .port(args.port)
        .timeout_secs(args.timeout);
    if let Some(secret) = &args.auth {
        builder = builder.auth(secret);
    }

    let client = Client::connect(builder.build())?;

    let (reply, pairs) = match args.command {
        Commands::Get { key } => (client.get(key)?, false),
        Commands::Set { key, value } => (client.set(key, value)?, false),
        Commands::Del { key } => (client.del(key)?, false),
        Commands::Scan { start, end, limit } => (client.scan(start, end, limit)?, true),
        Commands::MultiGet { keys } => (client.multi_get(keys)?, true),
        Commands::MultiSet { pairs } => (client.multi_set(pairs)?, false),
        Commands::Raw { verb, args } => (client.execute(&Command::with_args(verb, args))?, false),
    };

    client.close();
    print_reply(&reply, pairs);

    if !reply.is_ok() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_reply(reply: &Reply, pairs: bool) {
    println!("{}", reply.status);
    if pairs {
        for kv in reply.hash() {
            println!("{} = {}", kv.key, kv.value);
        }
    } else {
        for field in reply.list() {
            println!("{}", field);
        }
    }
}
