use clap::Parser;
use colored::Colorize;
use env_logger::Env;

mod generate;

#[derive(Parser)]
#[command(name = "kibom")]
#[command(about = "Generate a normalized Bill of Materials from a KiCad XML netlist", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    #[command(flatten)]
    args: generate::GenerateArgs,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Default level depends on --debug; RUST_LOG still overrides.
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("info")
    };
    env_logger::Builder::from_env(env).init();

    generate::execute(cli.args)
}
