use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = passion_api::Args::parse();

	passion_api::run(args).await
}
