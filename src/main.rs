use anyhow::{Context, Result};
use bcrypt_guard::{DEFAULT_COST, Hasher, MAX_COST, MIN_COST, PASSWORD_LIMIT, PREHASH_LEN};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
mod auth;

#[derive(Debug, clap::Args)]
#[group(required = true, multiple = false)]
struct HashArgs {
    /// bcrypt hash, e.g. '$2b$14$...'
    hash: Option<String>,

    /// Read the hash from a file
    #[arg(long, value_name = "PATH")]
    hash_file: Option<PathBuf>,
}

impl HashArgs {
    fn load(&self) -> Result<String> {
        match (&self.hash, &self.hash_file) {
            (Some(hash), _) => Ok(hash.clone()),
            (None, Some(path)) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read hash file {}", path.display()))?;
                Ok(raw.trim_end().to_string())
            }
            (None, None) => anyhow::bail!("no hash provided"),
        }
    }
}

#[derive(Debug, clap::Args)]
struct CostArgs {
    /// bcrypt cost factor (default: 14)
    #[arg(long, env = "BCRYPT_GUARD_COST", default_value_t = DEFAULT_COST)]
    cost: u32,
}

#[derive(Debug, Parser)]
#[command(name = "bcrypt-guard")]
#[command(
    version,
    about = "Hash and verify passwords with bcrypt, enforcing a minimum cost."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Hashes a password
    Hash {
        #[command(flatten)]
        cost: CostArgs,
    },

    /// Checks a password against a hash
    #[command(arg_required_else_help = true)]
    Verify {
        #[command(flatten)]
        hash: HashArgs,

        /// Print a fresh hash if the stored one is below the target cost
        #[arg(long, default_value_t = false)]
        upgrade: bool,

        #[command(flatten)]
        cost: CostArgs,
    },

    /// Prints the cost recorded in a hash
    #[command(arg_required_else_help = true)]
    Cost {
        #[command(flatten)]
        hash: HashArgs,
    },

    /// Prints whether a hash is below the target cost
    #[command(arg_required_else_help = true)]
    NeedsRehash {
        #[command(flatten)]
        hash: HashArgs,

        #[command(flatten)]
        cost: CostArgs,
    },

    /// Prints the SHA-256 pre-hash of a password as hex
    Prehash,

    /// Shows the hashing policy
    Info {
        #[arg(long, default_value_t = false)]
        /// Print as JSON
        json: bool,
    },
}

#[derive(Debug, Serialize)]
struct PolicyInfo {
    default_cost: u32,
    min_cost: u32,
    max_cost: u32,
    password_limit: usize,
    prehash_len: usize,
}

impl PolicyInfo {
    fn current() -> Self {
        Self {
            default_cost: DEFAULT_COST,
            min_cost: MIN_COST,
            max_cost: MAX_COST,
            password_limit: PASSWORD_LIMIT,
            prehash_len: PREHASH_LEN,
        }
    }
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let args = Cli::parse();
    match args.command {
        Commands::Hash { cost } => {
            let hasher = Hasher::new(cost.cost)?;
            let password = auth::read_new_password_with_confirmation()?;
            let hash = hasher.hash(password.as_bytes())?;
            println!("{hash}");
        }
        Commands::Verify {
            hash,
            upgrade,
            cost,
        } => {
            let stored = hash.load()?;
            let password = auth::read_password()?;
            if upgrade {
                let hasher = Hasher::new(cost.cost)?;
                let upgraded = hasher.verify_and_upgrade(&stored, password.as_bytes())?;
                println!("password matches");
                if let Some(new_hash) = upgraded {
                    println!("{new_hash}");
                }
            } else {
                bcrypt_guard::compare(&stored, password.as_bytes())?;
                println!("password matches");
            }
        }
        Commands::Cost { hash } => {
            let stored = hash.load()?;
            let cost = bcrypt_guard::cost(&stored)?;
            println!("{cost}");
        }
        Commands::NeedsRehash { hash, cost } => {
            let stored = hash.load()?;
            println!("{}", bcrypt_guard::needs_rehash(&stored, cost.cost));
        }
        Commands::Prehash => {
            let password = auth::read_password()?;
            let digest = bcrypt_guard::prehash(password.as_bytes());
            println!("{}", hex::encode(digest));
        }
        Commands::Info { json } => {
            let info = PolicyInfo::current();
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("default cost:   {}", info.default_cost);
                println!("cost range:     {}..={}", info.min_cost, info.max_cost);
                println!("password limit: {} bytes", info.password_limit);
                println!("prehash:        SHA-256 ({} bytes)", info.prehash_len);
            }
        }
    }

    Ok(())
}
