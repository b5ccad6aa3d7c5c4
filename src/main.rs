mod app;
mod calendar;
mod help;
mod theme;
use crate::app::App;
use crate::calendar::{CalendarState, ViewMode, WeekStart};
use anyhow::Context;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Environment variable holding the log filter directives used with
/// `--log-file`
const LOG_ENV_VAR: &str = "CALGRID_LOG";

const DEFAULT_LOG_FILTER: &str = "debug";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(RunOptions),
    Help,
    Version,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct RunOptions {
    date: Option<Date>,
    week_start: WeekStart,
    view: ViewMode,
    log_file: Option<PathBuf>,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = RunOptions::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('s') | Arg::Long("week-start") => {
                    opts.week_start = parser.value()?.parse()?;
                }
                Arg::Short('w') | Arg::Long("week") => opts.view = ViewMode::Week,
                Arg::Short('l') | Arg::Long("log-file") => {
                    opts.log_file = Some(PathBuf::from(parser.value()?));
                }
                Arg::Value(value) if opts.date.is_none() => {
                    let value = value.string()?;
                    match Date::parse(&value, &YMD_FMT) {
                        Ok(d) => opts.date = Some(d),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                if let Some(path) = &opts.log_file {
                    init_logging(path)?;
                }
                let today = OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date();
                info!(
                    %today,
                    week_start = %opts.week_start,
                    view = ?opts.view,
                    "starting calendar"
                );
                let mut calendar = CalendarState::new(today, opts.week_start)
                    .context("failed to build calendar for today")?
                    .view_mode(opts.view)
                    .context("failed to build calendar for today")?;
                if let Some(date) = opts.date {
                    calendar = calendar
                        .reference_date(date)
                        .with_context(|| format!("cannot display calendar for {date}"))?;
                }
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(calendar).run(terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: calgrid [options] [YYYY-MM-DD]");
                println!();
                println!("Terminal month & week calendar with date selection");
                println!();
                println!("Options:");
                println!("  -s, --week-start <DAY>  First day of the week [default: sunday]");
                println!("  -w, --week              Start in week view");
                println!("  -l, --log-file <PATH>   Write debug logs to PATH");
                println!("                          (filter with ${LOG_ENV_VAR})");
                println!("  -h, --help              Display this help message and exit");
                println!("  -V, --version           Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    if let Err(e) = execute!(io::stdout(), EnableMouseCapture) {
        ratatui::restore();
        return Err(e).context("failed to enable mouse capture");
    }
    let r = func(terminal);
    if let Err(e) = execute!(io::stdout(), DisableMouseCapture) {
        warn!("failed to disable mouse capture: {e}");
    }
    ratatui::restore();
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use time::Weekday::Monday;

    fn parse(args: &[&str]) -> Result<Command, lexopt::Error> {
        Command::from_parser(Parser::from_args(args.iter().copied()))
    }

    #[test]
    fn test_no_args() {
        assert_eq!(parse(&[]).unwrap(), Command::Run(RunOptions::default()));
    }

    #[test]
    fn test_all_options() {
        let cmd = parse(&["-w", "--week-start", "mon", "-l", "cal.log", "2024-06-13"]).unwrap();
        assert_eq!(
            cmd,
            Command::Run(RunOptions {
                date: Some(date!(2024 - 06 - 13)),
                week_start: WeekStart::new(Monday),
                view: ViewMode::Week,
                log_file: Some(PathBuf::from("cal.log")),
            })
        );
    }

    #[test]
    fn test_help_and_version() {
        assert_eq!(parse(&["2024-06-13", "--help"]).unwrap(), Command::Help);
        assert_eq!(parse(&["-V"]).unwrap(), Command::Version);
    }

    #[test]
    fn test_bad_date() {
        assert!(parse(&["2024-02-30"]).is_err());
        assert!(parse(&["June"]).is_err());
    }

    #[test]
    fn test_bad_week_start() {
        assert!(parse(&["-s", "funday"]).is_err());
        assert!(parse(&["-s"]).is_err());
    }

    #[test]
    fn test_extra_date() {
        assert!(parse(&["2024-06-13", "2024-06-14"]).is_err());
    }
}
