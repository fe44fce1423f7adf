use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::ArgMatches;
use tracing::{error, info, warn};

use priolock_core::config::PriolockConfig;
use priolock_core::events;
use priolock_core::{
    MonitorEvent, MonitorManager, MonitorSpec, PriorityClass, PriorityGateway, ProcessTable,
    SystemGateway, SystemTable, TargetScope, ThreadPriorityLevel, enforce_ops, process_ops,
};

use crate::table::{ProcessTableFormatter, ThreadTableFormatter};

mod completions;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    match matches.subcommand() {
        Some(("ps", sub_matches)) => handle_ps_command(sub_matches),
        Some(("threads", sub_matches)) => handle_threads_command(sub_matches),
        Some(("set-class", sub_matches)) => handle_set_class_command(sub_matches),
        Some(("apply", sub_matches)) => handle_apply_command(sub_matches),
        Some(("lock", sub_matches)) => handle_lock_command(sub_matches),
        Some(("completions", sub_matches)) => completions::handle_completions_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}

/// Load configuration with warning on errors.
///
/// Falls back to defaults if config loading fails, but notifies the user
/// via stderr and a structured log event.
fn load_config_with_warning() -> PriolockConfig {
    match PriolockConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.priolock/config.toml and ./.priolock/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            PriolockConfig::default()
        }
    }
}

/// Parse a comma-separated thread id list, e.g. "1304,1310".
fn parse_tid_list(input: &str) -> Result<Vec<u32>, String> {
    let tids: Result<Vec<u32>, _> = input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u32>()
                .map_err(|_| format!("Invalid thread id '{}'", part))
        })
        .collect();

    let tids = tids?;
    if tids.is_empty() {
        return Err("No thread ids given".to_string());
    }
    Ok(tids)
}

/// Build the target scope from the selected pid and flags. Scopes are
/// constructed fresh per invocation from live state.
fn scope_for(
    table: &dyn ProcessTable,
    pid: u32,
    all_instances: bool,
    tids: Option<Vec<u32>>,
) -> Result<TargetScope, Box<dyn std::error::Error>> {
    if all_instances {
        let name = table
            .process(pid)?
            .map(|process| process.name)
            .ok_or_else(|| format!("Process {} not found", pid))?;
        Ok(TargetScope::AllNamed { name })
    } else if let Some(tids) = tids {
        Ok(TargetScope::Threads { pid, tids })
    } else {
        Ok(TargetScope::Process { pid })
    }
}

fn handle_ps_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let table = SystemTable::new();
    let json = matches.get_flag("json");

    if let Some(name) = matches.get_one::<String>("name") {
        let processes = table.processes_named(name)?;

        info!(
            event = "cli.ps_completed",
            name = name.as_str(),
            count = processes.len()
        );

        if json {
            println!("{}", serde_json::to_string_pretty(&processes)?);
        } else {
            ProcessTableFormatter::new(&processes).print_table(&processes);
            println!("Instances: {}", processes.len());
        }
        return Ok(());
    }

    let processes = process_ops::list_processes(&table)?;

    info!(event = "cli.ps_completed", count = processes.len());

    if json {
        println!("{}", serde_json::to_string_pretty(&processes)?);
    } else {
        ProcessTableFormatter::new(&processes).print_table(&processes);
        println!("Loaded {} processes", processes.len());
    }

    Ok(())
}

fn handle_threads_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let pid = *matches.get_one::<u32>("pid").ok_or("PID argument is required")?;
    let json = matches.get_flag("json");

    let table = SystemTable::new();
    let gateway = SystemGateway::new();
    let threads = process_ops::list_threads(&table, &gateway, pid)?;

    info!(event = "cli.threads_completed", pid = pid, count = threads.len());

    if json {
        println!("{}", serde_json::to_string_pretty(&threads)?);
        return Ok(());
    }

    match gateway.process_priority_class(pid) {
        Ok(Some(class)) => println!("Priority class: {}", class),
        Ok(None) => println!("Priority class: Custom"),
        Err(e) => {
            warn!(event = "cli.threads_class_unreadable", pid = pid, error = %e);
        }
    }

    ThreadTableFormatter::new().print_table(&threads);
    println!("Loaded {} threads for PID {}", threads.len(), pid);

    Ok(())
}

fn handle_set_class_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let pid = *matches.get_one::<u32>("pid").ok_or("PID argument is required")?;
    let class: PriorityClass = matches
        .get_one::<String>("class")
        .ok_or("Class argument is required")?
        .parse()?;

    let table = SystemTable::new();
    let gateway = SystemGateway::new();

    // Resolve the name up front so the status line can show it; fall back
    // to the pid when the process is already gone by the time we look.
    let display_name = table
        .process(pid)?
        .map(|process| process.name)
        .unwrap_or_else(|| format!("PID {}", pid));

    info!(
        event = "cli.set_class_started",
        pid = pid,
        class = %class
    );

    if enforce_ops::set_process_priority(&gateway, pid, class) {
        println!("Set process priority of {} to {}", display_name, class);
        Ok(())
    } else {
        Err(format!("Cannot open process {} (access denied?)", pid).into())
    }
}

fn handle_apply_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let pid = *matches.get_one::<u32>("pid").ok_or("PID argument is required")?;
    let level: ThreadPriorityLevel = matches
        .get_one::<String>("level")
        .ok_or("Level argument is required")?
        .parse()?;
    let tids = matches
        .get_one::<String>("threads")
        .map(|input| parse_tid_list(input))
        .transpose()?;
    let all_instances = matches.get_flag("all-instances");
    let json = matches.get_flag("json");

    let config = load_config_with_warning();
    let disable_boost = config.apply.disable_boost && !matches.get_flag("keep-boost");

    let table = SystemTable::new();
    let gateway = SystemGateway::new();
    let scope = scope_for(&table, pid, all_instances, tids)?;

    info!(
        event = "cli.apply_started",
        scope = %scope.describe(),
        level = %level
    );

    let result = enforce_ops::apply_thread_priority(&table, &gateway, &scope, level, disable_boost)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "scope": scope,
                "level": level,
                "attempted": result.attempted,
                "succeeded": result.succeeded,
            }))?
        );
    } else if result.attempted == 0 {
        println!(
            "No threads resolved for {} (process may have exited)",
            scope.describe()
        );
    } else {
        println!(
            "Applied {} to {}/{} threads ({})",
            level,
            result.succeeded,
            result.attempted,
            scope.describe()
        );
    }

    if result.attempted > 0 && result.succeeded == 0 {
        return Err("No thread priority could be applied (insufficient privileges?)".into());
    }

    Ok(())
}

fn handle_lock_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let pid = *matches.get_one::<u32>("pid").ok_or("PID argument is required")?;
    let level: ThreadPriorityLevel = matches
        .get_one::<String>("level")
        .ok_or("Level argument is required")?
        .parse()?;
    let all_instances = matches.get_flag("all-instances");
    let max_cycles = matches.get_one::<u64>("cycles").copied();

    let config = load_config_with_warning();
    let interval_secs = matches
        .get_one::<u64>("interval")
        .copied()
        .unwrap_or(config.monitor.interval_secs);

    let table: Arc<dyn ProcessTable> = Arc::new(SystemTable::new());
    let gateway: Arc<dyn PriorityGateway> = Arc::new(SystemGateway::new());
    let scope = scope_for(table.as_ref(), pid, all_instances, None)?;

    let manager = MonitorManager::new(table, gateway);
    let handle = manager.start(MonitorSpec {
        scope: scope.clone(),
        level,
        interval: Duration::from_secs(interval_secs),
        disable_boost: config.apply.disable_boost,
    })?;

    info!(
        event = "cli.lock_started",
        session_id = handle.session_id(),
        scope = %scope.describe(),
        level = %level,
        interval_secs = interval_secs
    );

    println!(
        "Monitor ON (prio {}) - target: {}, interval {}s",
        level,
        scope.describe(),
        interval_secs
    );

    let interrupted = interrupt_flag();
    let mut completed = 0u64;

    loop {
        if interrupted.load(Ordering::SeqCst) {
            manager.stop();
            println!("Monitor stopped.");
            break;
        }

        match handle.events().recv_timeout(Duration::from_millis(200)) {
            Ok(MonitorEvent::Cycle(report)) => {
                completed += 1;
                match &report.error {
                    Some(message) => println!("cycle {}: error: {}", completed, message),
                    None => println!(
                        "cycle {}: applied {} to {}/{} threads",
                        completed, level, report.result.succeeded, report.result.attempted
                    ),
                }
                if max_cycles.is_some_and(|max| completed >= max) {
                    manager.stop();
                    println!("Monitor stopped.");
                    break;
                }
            }
            Ok(MonitorEvent::TargetLost { pid }) => {
                println!("Process {} terminated. Monitor stopped.", pid);
                break;
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    info!(
        event = "cli.lock_completed",
        session_id = handle.session_id(),
        cycles = completed
    );

    Ok(())
}

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Install a SIGINT handler that flips a flag instead of killing the
/// process, so lock mode can stop its monitor session cleanly.
#[cfg(unix)]
fn interrupt_flag() -> &'static AtomicBool {
    use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};

    extern "C" fn handle_sigint(_: nix::libc::c_int) {
        INTERRUPTED.store(true, Ordering::SeqCst);
    }

    let action = SigAction::new(
        SigHandler::Handler(handle_sigint),
        SaFlags::empty(),
        SigSet::empty(),
    );
    unsafe {
        if let Err(e) = sigaction(Signal::SIGINT, &action) {
            warn!(event = "cli.sigint_handler_failed", error = %e);
        }
    }

    &INTERRUPTED
}

#[cfg(not(unix))]
fn interrupt_flag() -> &'static AtomicBool {
    &INTERRUPTED
}
