use clap::Parser;
use drover_cli::{cli::Cli, commands, error::CliError, logging};

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	match commands::dispatch(cli).await {
		Ok(report) => {
			report.print();
			if !report.passed() {
				std::process::exit(1);
			}
		}
		Err(err) => {
			handle_error(err);
		}
	}
}

fn handle_error(err: CliError) -> ! {
	eprintln!("error: {err}");
	let mut source = std::error::Error::source(&err);
	while let Some(cause) = source {
		eprintln!("  caused by: {cause}");
		source = cause.source();
	}
	std::process::exit(err.exit_code());
}
