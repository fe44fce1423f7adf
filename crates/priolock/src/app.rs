use clap::{Arg, ArgAction, Command};
use clap_complete::Shell;

pub fn build_cli() -> Command {
    Command::new("priolock")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect and pin process/thread scheduling priorities")
        .long_about(
            "priolock lists OS processes and their threads, changes scheduling priority at the \
             process level (priority class) and thread level, and can keep a priority locked: \
             a monitor re-applies the chosen priority on an interval until it is stopped or the \
             target process exits.",
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only emit error-level log output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("ps")
                .about("List live processes, sorted by name")
                .arg(
                    Arg::new("name")
                        .long("name")
                        .short('n')
                        .help("Only show processes with this exact name, plus their instance count"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("threads")
                .about("List one process's threads and their current priorities")
                .arg(
                    Arg::new("pid")
                        .help("Process id to inspect")
                        .required(true)
                        .value_parser(clap::value_parser!(u32))
                        .index(1),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("set-class")
                .about("Set a process's priority class")
                .arg(
                    Arg::new("pid")
                        .help("Process id to change")
                        .required(true)
                        .value_parser(clap::value_parser!(u32))
                        .index(1),
                )
                .arg(
                    Arg::new("class")
                        .help("Priority class: idle, below-normal, normal, above-normal, high, realtime")
                        .required(true)
                        .index(2),
                ),
        )
        .subcommand(
            Command::new("apply")
                .about("Apply a thread priority once")
                .arg(
                    Arg::new("pid")
                        .help("Process id to act on")
                        .required(true)
                        .value_parser(clap::value_parser!(u32))
                        .index(1),
                )
                .arg(
                    Arg::new("level")
                        .help("Thread priority: idle, lowest, below-normal, normal, above-normal, highest, time-critical")
                        .required(true)
                        .index(2),
                )
                .arg(
                    Arg::new("threads")
                        .long("threads")
                        .short('t')
                        .help("Comma-separated thread ids to target instead of every thread"),
                )
                .arg(
                    Arg::new("all-instances")
                        .long("all-instances")
                        .help("Target every process with the same name as PID")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("threads"),
                )
                .arg(
                    Arg::new("keep-boost")
                        .long("keep-boost")
                        .help("Leave the scheduler's dynamic priority boost enabled")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("lock")
                .about("Keep a thread priority locked until interrupted")
                .long_about(
                    "Starts a monitor that re-applies the chosen thread priority on an interval, \
                     counteracting priority changes made by the OS or other software. Runs until \
                     Ctrl+C, until --cycles is reached, or until the target process exits.",
                )
                .arg(
                    Arg::new("pid")
                        .help("Process id to lock")
                        .required(true)
                        .value_parser(clap::value_parser!(u32))
                        .index(1),
                )
                .arg(
                    Arg::new("level")
                        .help("Thread priority to enforce")
                        .required(true)
                        .index(2),
                )
                .arg(
                    Arg::new("interval")
                        .long("interval")
                        .short('i')
                        .help("Seconds between enforcement cycles (overrides config)")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("all-instances")
                        .long("all-instances")
                        .help("Lock every process with the same name as PID")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("cycles")
                        .long("cycles")
                        .help("Stop after this many enforcement cycles")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(
                    Arg::new("shell")
                        .help("Shell to generate completions for")
                        .required(true)
                        .value_parser(clap::value_parser!(Shell))
                        .index(1),
                ),
        )
}
