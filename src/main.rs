mod cli_utils;

use std::{io::Write, ops::Bound, str::from_utf8};

use bytes::Bytes;
use clap::{Parser, Subcommand};

use mini_skiplist::{
    memory::skiplist::DEFAULT_MAX_LEVEL, options::SkipListOptions, SkipList, SkipListError,
};

#[derive(Parser)]
#[clap(version, about = "Interactive shell over an in-memory skip list")]
struct Args {
    /// Tallest level a node may reach
    #[clap(long, default_value_t = DEFAULT_MAX_LEVEL)]
    max_level: usize,
    /// Seed for the leveling policy, random when omitted
    #[clap(long)]
    seed: Option<u64>,
}

#[derive(Parser)]
#[clap(name = "", no_binary_name = true)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Insert {
        key: i64,
        value: String,
    },
    Get {
        key: i64,
    },
    Contains {
        key: i64,
    },
    Remove {
        key: i64,
    },
    /// Entry with the greatest key
    Last,
    /// Entry with the greatest key below KEY
    Lt {
        key: i64,
    },
    /// Entry with the smallest key at or above KEY
    Ge {
        key: i64,
    },
    Scan {
        lower: Option<i64>,
        upper: Option<i64>,
    },
    /// Inserts lower..=upper, each key mapped to its square
    Fill {
        lower: i64,
        upper: i64,
    },
    Dump,
    Len,
    Quit,
}

fn print_entry(key: &i64, value: &Bytes) -> anyhow::Result<()> {
    println!("{}={}", key, from_utf8(value)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let options = SkipListOptions {
        max_level: args.max_level,
        seed: args.seed,
    };
    let mut list: SkipList<i64, Bytes> = SkipList::from_options(&options)?;
    loop {
        print!("$ ");
        std::io::stdout().flush()?;

        let Some(line) = cli_utils::readline()? else {
            return Ok(());
        };
        let words = shlex::split(&line).unwrap_or_default();
        if words.is_empty() {
            continue;
        }
        let command = match Cli::try_parse_from(words) {
            Ok(cli) => cli.command,
            Err(err) => {
                err.print()?;
                continue;
            }
        };
        match command {
            Command::Insert { key, value } => match list.insert(key, Bytes::from(value)) {
                Ok(()) => println!("inserted {}", key),
                Err(SkipListError::DuplicateKey) => println!("{} already exists", key),
                Err(err) => eprintln!("insert {} failed: {}", key, err),
            },
            Command::Get { key } => match list.search(&key) {
                Some(value) => print_entry(&key, value)?,
                None => println!("{} not found", key),
            },
            Command::Contains { key } => {
                println!("{}", list.contains(&key));
            }
            Command::Remove { key } => match list.remove(&key) {
                Ok(_) => println!("removed {}", key),
                Err(err) => println!("remove {}: {}", key, err),
            },
            Command::Last => match list.find_last() {
                Some(entry) => print_entry(entry.key, entry.value)?,
                None => println!("empty"),
            },
            Command::Lt { key } => match list.find_less_than(&key) {
                Some(entry) => print_entry(entry.key, entry.value)?,
                None => println!("nothing below {}", key),
            },
            Command::Ge { key } => match list.find_greater_or_equal(&key) {
                Some(entry) => print_entry(entry.key, entry.value)?,
                None => println!("nothing at or above {}", key),
            },
            Command::Scan { lower, upper } => {
                let lb = lower.as_ref().map_or(Bound::Unbounded, Bound::Included);
                let ub = upper.as_ref().map_or(Bound::Unbounded, Bound::Included);
                for entry in list.range(lb, ub) {
                    print_entry(entry.key, entry.value)?;
                }
            }
            Command::Fill { lower, upper } => {
                for k in lower..=upper {
                    let value = k.saturating_mul(k).to_string();
                    if let Err(err) = list.insert(k, Bytes::from(value)) {
                        eprintln!("insert {} failed: {}", k, err);
                    }
                }
            }
            Command::Dump => {
                print!("{}", list);
            }
            Command::Len => {
                println!("{}", list.len());
            }
            Command::Quit => {
                return Ok(());
            }
        }
    }
}
