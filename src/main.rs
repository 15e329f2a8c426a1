use clap::Parser;
use labdash::cli::{
    handle_completions, handle_config_check, handle_config_init, handle_widgets_fetch,
    handle_widgets_list, Cli, Commands, ConfigCommands, WidgetsCommands,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => labdash::cli::serve::run_serve(args).await,
        Commands::Widgets(cmd) => match cmd {
            WidgetsCommands::List(args) => handle_widgets_list(&args).map(|output| {
                println!("{}", output);
            }),
            WidgetsCommands::Fetch(args) => handle_widgets_fetch(&args).await.map(|output| {
                println!("{}", output);
            }),
        },
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
            ConfigCommands::Check(args) => handle_config_check(&args).map(|output| {
                println!("{}", output);
            }),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
