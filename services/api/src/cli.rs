use crate::demo::{run_demo, run_score, DemoArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use neck_intake::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Neck Pain Intake",
    about = "Run the neck pain intake service or score a questionnaire from the command line",
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
    /// Score a set of answers and print the staff report
    Score(ScoreArgs),
    /// Walk a scripted respondent through the whole intake
    Demo(DemoArgs),
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
        Command::Score(args) => run_score(args),
        Command::Demo(args) => run_demo(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["neck-intake-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn score_collects_repeated_answers() {
        let cli = Cli::try_parse_from([
            "neck-intake-api",
            "score",
            "--answer",
            "slapen=4",
            "--answer",
            "sociaal=7",
            "--name",
            "Jan Jansen",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(
                    args.answers,
                    vec![("slapen".to_string(), 4), ("sociaal".to_string(), 7)]
                );
                assert_eq!(args.name.as_deref(), Some("Jan Jansen"));
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }

    #[test]
    fn score_rejects_malformed_answer_pairs() {
        let result = Cli::try_parse_from(["neck-intake-api", "score", "--answer", "slapen"]);
        assert!(result.is_err());
    }
}
