use std::env;
use std::io;
use std::process;

use monte_carlo_pi::config::{parse_args, usage, Invocation};
use monte_carlo_pi::driver;

fn main() {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "monte-carlo-pi".to_string());

    let config = match parse_args(args) {
        Ok(Invocation::Run(config)) => config,
        Ok(Invocation::Help) => {
            println!("{}", usage(&program));
            return;
        }
        Err(err) => {
            eprintln!("error: {}", err);
            eprintln!();
            eprintln!("{}", usage(&program));
            process::exit(2);
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(err) = driver::run(&config, &mut out) {
        eprintln!("error: {}", err);
        process::exit(if err.is_config() { 2 } else { 1 });
    }
}
