use crate::session;
use crate::store::TableKind;
use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "upkeep", version)]
#[command(
    about = "Facility inspection checklist and work-order tracker",
    long_about = "upkeep records facility walkthrough inspections, escalates actionable findings into sequential work orders, tracks expected and actual repair dates to completion, and keeps an audit log of every date change."
)]
#[command(arg_required_else_help = true)]
#[command(after_long_help = "Examples:
  upkeep record --location Processing --element Floors --detector aya --rating 2 --comment \"crack near drain\" --person sameh
  upkeep expected --event \"Work Order 3\" --date 2024-04-20 --modifier sameh
  upkeep actual --event \"Work Order 3\" --date 2024-05-01 --modifier sameh
  upkeep list work-orders --person sameh
  upkeep search work-orders leak
  upkeep completion zsh > ~/.zsh/completions/_upkeep
  upkeep man > upkeep.1")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TableArg {
    Checklist,
    WorkOrders,
    Completed,
    ChangeLog,
}

impl TableArg {
    fn kind(self) -> TableKind {
        match self {
            TableArg::Checklist => TableKind::Checklist,
            TableArg::WorkOrders => TableKind::WorkOrders,
            TableArg::Completed => TableKind::Completed,
            TableArg::ChangeLog => TableKind::ChangeLog,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Record one inspection result",
        long_about = "Record one inspection result. Ratings 0 and N/A append a checklist entry; ratings 1-3 open a work order with a fresh sequential event id and optional photo."
    )]
    #[command(arg_required_else_help = true)]
    #[command(after_long_help = "Examples:
  upkeep record --location Warehouse --element Doors --detector aya --rating 0
  upkeep record --location Processing --element Floors --detector aya --rating 2 --comment \"crack near drain\" --person sameh --safety
  upkeep record --location Packaging --element Lights --detector omar --rating 1 --person Kaleed --image flicker.jpg")]
    Record {
        #[arg(long, value_name = "NAME", help = "Inspected location")]
        location: String,
        #[arg(long, value_name = "NAME", help = "Inspected element category")]
        element: String,
        #[arg(long, value_name = "NAME", help = "Name of the person who found it")]
        detector: String,
        #[arg(
            long,
            value_name = "RATING",
            value_parser = ["0", "1", "2", "3", "N/A", "n/a"],
            help = "Condition rating (0 and N/A stay on the checklist; 1-3 open a work order)"
        )]
        rating: String,
        #[arg(long, default_value = "", value_name = "TEXT", help = "Free-text comment")]
        comment: String,
        #[arg(
            long,
            default_value = "",
            value_name = "NAME",
            help = "Responsible person for the repair"
        )]
        person: String,
        #[arg(long, help = "Mark the finding safety-related")]
        safety: bool,
        #[arg(long, help = "Mark the finding quality-related")]
        quality: bool,
        #[arg(long, value_name = "PATH", help = "Attach a photo of the finding")]
        image: Option<PathBuf>,
        #[arg(
            long,
            value_name = "DIR",
            help = "Data directory (default: $XDG_DATA_HOME/upkeep)"
        )]
        data_dir: Option<PathBuf>,
        #[arg(long, value_name = "PATH", help = "Write NDJSON activity log to file")]
        log: Option<PathBuf>,
    },
    #[command(
        about = "Set the expected repair date on a work order",
        long_about = "Set the expected repair date on an open work order. Repeatable; the order stays open. The modifier must be a recognized responsible person. Every applied change is appended to the change log."
    )]
    #[command(arg_required_else_help = true)]
    #[command(after_long_help = "Example:
  upkeep expected --event \"Work Order 3\" --date 2024-04-20 --modifier sameh")]
    Expected {
        #[arg(long, value_name = "EVENT_ID", help = "Work order event id")]
        event: String,
        #[arg(long, value_name = "DATE", help = "Expected repair date (YYYY-MM-DD)")]
        date: String,
        #[arg(long, value_name = "NAME", help = "Who is making the change")]
        modifier: String,
        #[arg(
            long,
            value_name = "DIR",
            help = "Data directory (default: $XDG_DATA_HOME/upkeep)"
        )]
        data_dir: Option<PathBuf>,
        #[arg(long, value_name = "PATH", help = "Write NDJSON activity log to file")]
        log: Option<PathBuf>,
    },
    #[command(
        about = "Set the actual repair date and close a work order",
        long_about = "Set the actual repair date on an open work order. This is terminal: the order becomes done and a copy of the finished row is appended to the completed table."
    )]
    #[command(arg_required_else_help = true)]
    #[command(after_long_help = "Example:
  upkeep actual --event \"Work Order 3\" --date 2024-05-01 --modifier sameh")]
    Actual {
        #[arg(long, value_name = "EVENT_ID", help = "Work order event id")]
        event: String,
        #[arg(long, value_name = "DATE", help = "Actual repair date (YYYY-MM-DD)")]
        date: String,
        #[arg(long, value_name = "NAME", help = "Who is making the change")]
        modifier: String,
        #[arg(
            long,
            value_name = "DIR",
            help = "Data directory (default: $XDG_DATA_HOME/upkeep)"
        )]
        data_dir: Option<PathBuf>,
        #[arg(long, value_name = "PATH", help = "Write NDJSON activity log to file")]
        log: Option<PathBuf>,
    },
    #[command(about = "Print a table as CSV")]
    #[command(arg_required_else_help = true)]
    #[command(after_long_help = "Examples:
  upkeep list checklist
  upkeep list work-orders --open
  upkeep list work-orders --person sameh --person Kaleed")]
    List {
        #[arg(value_enum, value_name = "TABLE", help = "Table to print")]
        table: TableArg,
        #[arg(
            long,
            value_name = "NAME",
            help = "Only work orders assigned to this person (repeatable)"
        )]
        person: Vec<String>,
        #[arg(long, help = "Only work orders that are still open")]
        open: bool,
        #[arg(
            long,
            value_name = "DIR",
            help = "Data directory (default: $XDG_DATA_HOME/upkeep)"
        )]
        data_dir: Option<PathBuf>,
    },
    #[command(
        about = "Search a table for a keyword",
        long_about = "Case-insensitive substring search over one column or all of them. Matching rows are printed as CSV in table order."
    )]
    #[command(arg_required_else_help = true)]
    #[command(after_long_help = "Examples:
  upkeep search work-orders leak
  upkeep search checklist warehouse --column location")]
    Search {
        #[arg(value_enum, value_name = "TABLE", help = "Table to search")]
        table: TableArg,
        #[arg(value_name = "KEYWORD", help = "Substring to look for")]
        keyword: String,
        #[arg(
            long,
            default_value = "all",
            value_name = "COLUMN",
            help = "Column to search, or `all` for every column"
        )]
        column: String,
        #[arg(
            long,
            value_name = "DIR",
            help = "Data directory (default: $XDG_DATA_HOME/upkeep)"
        )]
        data_dir: Option<PathBuf>,
    },
    #[command(about = "Export a table to a CSV file")]
    #[command(arg_required_else_help = true)]
    #[command(after_long_help = "Example:
  upkeep export work-orders --output work_orders_backup.csv")]
    Export {
        #[arg(value_enum, value_name = "TABLE", help = "Table to export")]
        table: TableArg,
        #[arg(long, value_name = "PATH", help = "Destination file")]
        output: PathBuf,
        #[arg(
            long,
            value_name = "DIR",
            help = "Data directory (default: $XDG_DATA_HOME/upkeep)"
        )]
        data_dir: Option<PathBuf>,
    },
    #[command(
        about = "Import a table from a CSV file",
        long_about = "Replace a table wholesale with the rows read from a CSV file. Timestamps with an offset are normalized to the timezone-naive form used everywhere else."
    )]
    #[command(arg_required_else_help = true)]
    #[command(after_long_help = "Example:
  upkeep import work-orders --input work_orders_backup.csv")]
    Import {
        #[arg(value_enum, value_name = "TABLE", help = "Table to replace")]
        table: TableArg,
        #[arg(long, value_name = "PATH", help = "Source file")]
        input: PathBuf,
        #[arg(
            long,
            value_name = "DIR",
            help = "Data directory (default: $XDG_DATA_HOME/upkeep)"
        )]
        data_dir: Option<PathBuf>,
    },
    #[command(about = "Empty a table, keeping its column schema on disk")]
    #[command(arg_required_else_help = true)]
    #[command(after_long_help = "Example:
  upkeep clear checklist")]
    Clear {
        #[arg(value_enum, value_name = "TABLE", help = "Table to empty")]
        table: TableArg,
        #[arg(
            long,
            value_name = "DIR",
            help = "Data directory (default: $XDG_DATA_HOME/upkeep)"
        )]
        data_dir: Option<PathBuf>,
    },
    #[command(
        about = "Print the walkthrough catalog",
        long_about = "Print the locations, element categories with their inspection prompts, and the responsible personnel. Reads upkeep.toml from the data directory when present, built-in catalog otherwise."
    )]
    #[command(after_long_help = "Example:
  upkeep guide")]
    Guide {
        #[arg(
            long,
            value_name = "DIR",
            help = "Data directory (default: $XDG_DATA_HOME/upkeep)"
        )]
        data_dir: Option<PathBuf>,
    },
    #[command(
        about = "Generate shell completion script",
        long_about = "Generate shell completion script for your shell. Redirect output to your shell completion directory."
    )]
    #[command(arg_required_else_help = true)]
    #[command(after_long_help = "Examples:
  upkeep completion bash > ~/.local/share/bash-completion/completions/upkeep
  upkeep completion zsh > ~/.zsh/completions/_upkeep
  upkeep completion fish > ~/.config/fish/completions/upkeep.fish")]
    Completion {
        #[arg(value_enum, value_name = "SHELL", help = "Target shell")]
        shell: Shell,
    },
    #[command(
        about = "Generate a man page",
        long_about = "Generate a roff man page for upkeep."
    )]
    #[command(after_long_help = "Examples:
  upkeep man > upkeep.1
  upkeep man --output docs/upkeep.1")]
    Man {
        #[arg(
            long,
            value_name = "PATH",
            help = "Write man page to file (stdout when omitted)"
        )]
        output: Option<PathBuf>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Record {
            location,
            element,
            detector,
            rating,
            comment,
            person,
            safety,
            quality,
            image,
            data_dir,
            log,
        } => session::record_inspection(session::RecordCommand {
            location,
            element,
            detector,
            rating,
            comment,
            person,
            safety,
            quality,
            image,
            data_dir,
            log,
        }),
        Commands::Expected {
            event,
            date,
            modifier,
            data_dir,
            log,
        } => session::update_expected_date(&event, &date, &modifier, data_dir, log),
        Commands::Actual {
            event,
            date,
            modifier,
            data_dir,
            log,
        } => session::update_actual_date(&event, &date, &modifier, data_dir, log),
        Commands::List {
            table,
            person,
            open,
            data_dir,
        } => session::list_table(table.kind(), person, open, data_dir),
        Commands::Search {
            table,
            keyword,
            column,
            data_dir,
        } => session::search_table(table.kind(), &keyword, &column, data_dir),
        Commands::Export {
            table,
            output,
            data_dir,
        } => session::export_table(table.kind(), output, data_dir),
        Commands::Import {
            table,
            input,
            data_dir,
        } => session::import_table(table.kind(), input, data_dir),
        Commands::Clear { table, data_dir } => session::clear_table(table.kind(), data_dir),
        Commands::Guide { data_dir } => session::show_guide(data_dir),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Commands::Man { output } => {
            let man = clap_mangen::Man::new(Cli::command());
            match output {
                Some(path) => {
                    let mut bytes = Vec::new();
                    man.render(&mut bytes)?;
                    fs::write(path, bytes)?;
                }
                None => {
                    man.render(&mut io::stdout())?;
                }
            }
            Ok(())
        }
    }
}
