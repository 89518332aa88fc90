use std::env;

use assembler::cli;
use assembler::logging::error;
use assembler::pipeline::Pipeline;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} file1 [file2 ...]", args[0]);
        std::process::exit(1);
    }

    let input_paths = match cli::resolve_input_paths(&args[1..]) {
        Ok(paths) => paths,
        Err(err) => {
            error(err.to_string());
            std::process::exit(1);
        }
    };

    let mut pipeline = Pipeline::new();
    match pipeline.run(&input_paths) {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(err) => {
            error(err.to_string());
            std::process::exit(1);
        }
    }
}
