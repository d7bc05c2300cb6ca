use crate::report::{
    run_portfolio, run_program_list, run_program_show, ListArgs, PortfolioArgs, ShowArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use funnel_insights::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Program Funnel Insights",
    about = "Score program funnels, recommend budget moves, and serve the analytics API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect individual programs and their recommendations
    Programs {
        #[command(subcommand)]
        command: ProgramsCommand,
    },
    /// Summarize the portfolio into buy, hold, and reduce counts
    Portfolio(PortfolioArgs),
}

#[derive(Subcommand, Debug)]
enum ProgramsCommand {
    /// List programs with metrics and recommended action
    List(ListArgs),
    /// Show one program with insights and an optional spend scenario
    Show(ShowArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Programs {
            command: ProgramsCommand::List(args),
        } => run_program_list(args),
        Command::Programs {
            command: ProgramsCommand::Show(args),
        } => run_program_show(args),
        Command::Portfolio(args) => run_portfolio(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use funnel_insights::analytics::RecommendationAction;

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["funnel-insights-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn list_accepts_filters() {
        let cli = Cli::try_parse_from([
            "funnel-insights-api",
            "programs",
            "list",
            "--school",
            "KEEP",
            "--min-leads",
            "100",
            "--action",
            "reduce",
            "--json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Programs {
                command: ProgramsCommand::List(args),
            }) => {
                assert_eq!(args.school.as_deref(), Some("KEEP"));
                assert_eq!(args.min_leads, Some(100));
                assert_eq!(args.action, Some(RecommendationAction::Reduce));
                assert!(args.json);
            }
            other => panic!("expected programs list, got {other:?}"),
        }
    }

    #[test]
    fn list_rejects_unknown_action() {
        let result =
            Cli::try_parse_from(["funnel-insights-api", "programs", "list", "--action", "sell"]);
        assert!(result.is_err());
    }
}
