use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use rox::ast_printer::AstPrinter;
use rox::error::{LoxError, SyntaxError};
use rox::interpreter::Interpreter;
use rox::parser::Parser;
use rox::scanner::Scanner;
use rox::token::{Token, TokenType};

/// Exit code for programs rejected before execution.
const EXIT_STATIC: i32 = 65;

/// Exit code for programs that failed while running.
const EXIT_RUNTIME: i32 = 70;

#[derive(ClapParser, Debug)]
#[command(version, about = "Rox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to a file
    #[arg(long, global = true)]
    log: bool,

    /// Log file written when --log is set
    #[arg(long, global = true, default_value = "rox.log")]
    log_file: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the token list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file and prints its AST
    Parse { filename: PathBuf },

    /// Runs input from a file as a Rox program
    Run { filename: PathBuf },

    /// Reads and runs one line at a time, keeping globals between lines
    Repl,
}

/// Reads the contents of a file into a String
fn read_file(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);

    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    String::from_utf8(buf).context(format!("File {:?} is not valid UTF-8", filename))
}

fn init_logger(path: &Path) -> Result<()> {
    let log_file = File::create(path).context(format!("Failed to create {:?}", path))?;

    // Default to Debug, override with RUST_LOG
    Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("rox::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    info!("Logger initialized, writing to {:?}", path);
    Ok(())
}

/// Exit code for a failed run.
fn exit_code(e: &LoxError) -> i32 {
    match e {
        LoxError::Static(_) => EXIT_STATIC,
        _ => EXIT_RUNTIME,
    }
}

fn repl() -> Result<()> {
    let mut interpreter = Interpreter::new();
    let stdin = io::stdin();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        if let Err(e) = interpreter.run_source(&line) {
            debug!("REPL error: {}", e);
            eprintln!("{}", e);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger(&args.log_file)?;
    } else {
        Builder::new().filter_level(log::LevelFilter::Off).init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Commands::Tokenize { filename, json } => {
            let source = read_file(&filename)?;
            let mut scanner = Scanner::new(&source);
            let tokens: Vec<Token> = scanner.by_ref().collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&tokens)?);
            } else {
                for token in &tokens {
                    println!("{}", token);
                }
            }

            let mut errors: Vec<SyntaxError> = tokens
                .iter()
                .filter(|t| t.token_type == TokenType::INVALID)
                .map(|t| SyntaxError::at(t, "Unexpected character."))
                .collect();
            errors.extend(scanner.take_errors());

            if !errors.is_empty() {
                debug!("Tokenization found {} error(s)", errors.len());
                eprintln!("{}", LoxError::aggregate(errors));
                std::process::exit(EXIT_STATIC);
            }
        }

        Commands::Parse { filename } => {
            let source = read_file(&filename)?;

            let mut scanner = Scanner::new(&source);
            let tokens: Vec<_> = scanner.by_ref().collect();

            match Parser::new(tokens).with_errors(scanner.take_errors()).parse() {
                Ok(program) => println!("{}", AstPrinter::program(&program)),

                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_STATIC);
                }
            }
        }

        Commands::Run { filename } => {
            let source = read_file(&filename)?;
            let mut interpreter = Interpreter::new();

            if let Err(e) = interpreter.run_source(&source) {
                debug!("Run failed: {}", e);
                io::stdout().flush()?;
                eprintln!("{}", e);
                std::process::exit(exit_code(&e));
            }

            info!("Program executed successfully");
        }

        Commands::Repl => repl()?,
    }

    Ok(())
}
