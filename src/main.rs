use anyhow::Result;
use clap::Parser;
use supplyplan::{CLIArguments, check_main, run_main};

fn main() -> Result<()> {
    let args = CLIArguments::parse();

    match args {
        CLIArguments::Run(args) => run_main(args),
        CLIArguments::Check(args) => check_main(args),
    }
}
