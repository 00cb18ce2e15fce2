use anyhow::Result;
use ms_cli::{session::init_tracing, Cli, Commands, Parser};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.session.verbose);

    match cli.command {
        Commands::DedupImageTemplates(args) => args.run(&cli.session).await,
        Commands::CheckImageTemplates(args) => args.run(&cli.session).await,
        Commands::ReplaceEntityType(args) => args.run(&cli.session).await,
        Commands::Get(args) => args.run(&cli.session).await,
    }
}
