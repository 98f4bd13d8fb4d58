use std::{fs, path::PathBuf, rc::Rc, time::Instant};

use anyhow::{bail, Context};
use clap::{ArgAction, Parser, ValueEnum};
use log::{info, LevelFilter};

use valc::{
    compiler::compiler::compile, display_error, errors::errors::Error, lexer::lexer::tokenize,
    parser::parser::parse, type_checker::type_checker::type_check,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// The token stream, one token per line
    Tokens,
    /// The syntax tree as produced by the parser
    Ast,
    /// The verified syntax tree with resolved types
    Typed,
    /// Three-address code
    Tac,
}

/// Compiler front end for the val language.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The source file to compile
    file: PathBuf,

    /// What to print on success
    #[arg(long, value_enum, default_value_t = Emit::Tac)]
    emit: Emit,

    /// Stop after type checking and print nothing on success
    #[arg(long)]
    check: bool,

    /// Raise the log level (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn report(errors: &[Error], source: &str) -> anyhow::Result<()> {
    for error in errors {
        display_error(error, source);
    }
    bail!("compilation failed with {} error(s)", errors.len())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let source = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let file_name = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.file.display().to_string());

    let start = Instant::now();

    let tokens = match tokenize(source.clone(), Some(file_name.clone())) {
        Ok(tokens) => tokens,
        Err(error) => return report(&[error], &source),
    };
    info!("tokenized in {:?}", start.elapsed());

    if args.emit == Emit::Tokens && !args.check {
        for token in tokens.iter() {
            println!("{}", token);
        }
        return Ok(());
    }

    let parse_start = Instant::now();
    let (program, errors) = parse(tokens, Rc::new(file_name));
    info!("parsed in {:?}", parse_start.elapsed());

    if !errors.is_empty() {
        return report(&errors, &source);
    }

    if args.emit == Emit::Ast && !args.check {
        println!("{:#?}", program);
        return Ok(());
    }

    let type_check_start = Instant::now();
    let typed_program = match type_check(&program) {
        Ok(typed_program) => typed_program,
        Err(error) => return report(&[error], &source),
    };
    info!("type checked in {:?}", type_check_start.elapsed());

    if args.check {
        info!("{} checked in {:?}", args.file.display(), start.elapsed());
        return Ok(());
    }

    if args.emit == Emit::Typed {
        println!("{:#?}", typed_program);
        return Ok(());
    }

    let compile_start = Instant::now();
    let instructions = compile(&typed_program);
    info!("emitted in {:?}", compile_start.elapsed());

    for instruction in instructions.iter() {
        println!("{}", instruction);
    }

    info!("total time: {:?}", start.elapsed());
    Ok(())
}
