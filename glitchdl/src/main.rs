use colored::Colorize;
use glitchdl::handlers::{
    handle_archive, init_logging, is_informational, parse_arguments, usage_example,
};
use glitchdl_core::report::generate_archive_report;

fn main() {
    let url = match parse_arguments(std::env::args_os()) {
        Ok(url) => url,
        Err(e) if is_informational(&e) => e.exit(),
        Err(e) => {
            let _ = e.print();
            eprintln!("{}", usage_example());
            std::process::exit(1);
        }
    };

    init_logging();

    match handle_archive(&url) {
        Ok(summary) => {
            print!("{}", generate_archive_report(&summary));
            println!("\n{} Finished.", "✓".green().bold());
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    }
}
