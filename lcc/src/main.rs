use clap::Parser;
use color_print::cprintln;
use lcc::{batch, driver, Config, Error};
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input files
    input: Vec<PathBuf>,

    /// Output file, for a single input
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Compile every `.l` file of this directory
    #[clap(short, long)]
    dir: Option<PathBuf>,

    /// Configuration file (YAML)
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Write the token stream to `<file>.lex`
    #[clap(long)]
    lex: bool,

    /// Write the production trace to `<file>.synt`
    #[clap(long)]
    synt: bool,

    /// Write the AST to `<file>.asynt`
    #[clap(long)]
    asynt: bool,

    /// Write the symbol tables to `<file>.symb`
    #[clap(long)]
    symb: bool,

    /// Report pass/fail per file
    #[clap(long)]
    tests: bool,

    /// Print the generated assembly
    #[clap(long)]
    dump: bool,

    /// Variables must carry the `$` sigil
    #[clap(long)]
    strict: bool,

    /// Debug logging
    #[clap(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> Result<Config, Error> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        config.lexer.sigil_required |= self.strict;
        config.dumps.lex |= self.lex;
        config.dumps.synt |= self.synt;
        config.dumps.asynt |= self.asynt;
        config.dumps.symb |= self.symb;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if let Err(e) = simple_logger::SimpleLogger::new().with_level(level).env().init() {
        eprintln!("{}", e);
    }

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            cprintln!("<red,bold>error</>: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<bool, Error> {
    println!("L Compiler");
    let config = args.config()?;

    println!("1. Read Files");
    let mut paths = args.input.clone();
    if let Some(dir) = &args.dir {
        paths.extend(driver::list_sources(dir)?);
    }
    if paths.is_empty() {
        return Err(Error::NoInput);
    }
    for path in &paths {
        println!("  < {}", path.display());
    }

    if args.tests {
        println!("2. Run Tests");
        let report = batch::run(&paths, &config)?;
        println!("{}", report);
        return Ok(report.failed() == 0);
    }

    println!("2. Compile & Write Outputs");
    let output = match paths.len() {
        1 => args.output.as_deref(),
        _ => None,
    };
    let mut succeeded = true;
    for path in &paths {
        let (source, compilation) = driver::compile_file(path, &config)?;
        compilation.diagnostics.print(&source);
        for written in driver::write_outputs(path, output, &compilation, &config.dumps)? {
            println!("  > {}", written.display());
        }
        if let (true, Some(code)) = (args.dump, &compilation.code) {
            print!("{}", code.cformat());
            println!("-------------------+-----------------------------------------------------");
        }
        succeeded &= compilation.succeeded();
    }
    Ok(succeeded)
}
