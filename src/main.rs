use plugcmd::utils::format::{Role, StyleOptions, color};
use plugcmd::utils::{init_logging, level_from_env};
use plugcmd::{Application, Commands, DispatchError, Env, HelpPrinter, Outcome, cmd, log_error, log_info};

/// plugcmd - demo entry point for the pluggable command dispatcher.
///
/// Usage:
///   plugcmd                       list available commands
///   plugcmd <command> [args...]   run a command
///   plugcmd help <command>        show a command's usage
///
/// Global flags (accepted anywhere, removed before the command sees its args):
///   -h / --help          help mode for the selected command
///   --home <path>        home directory (PLUGCMD_HOME)
///   -m / --mode <name>   operating mode (PLUGCMD_MODE, PLACK_ENV, "development")
///
/// Env:
///   PLUGCMD_LOG          error|info|debug|trace (default info), logs go to stderr
///   PLUGCMD_NO_DETECT    disable CGI/PSGI detection
///   PLUGCMD_APP_LOADER   embedded use; nothing is dispatched
///   NO_COLOR / COLUMNS   output styling
fn main() {
    let env = Env::from_process();
    let style = StyleOptions::detect(&env);

    let mut commands = Commands::new(
        Application::new("plugcmd", env!("CARGO_PKG_VERSION")),
        env,
    )
    .with_printer(HelpPrinter {
        style: style.clone(),
        ..HelpPrinter::default()
    });

    init_logging(level_from_env(commands.env().get(&commands.vars().log)));
    cmd::register_builtins(commands.registry_mut());

    let argv: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|a| a.to_string_lossy().into_owned())
        .collect();

    match commands.start(argv) {
        Ok(Outcome::Listing(text)) => print!("{text}"),
        Ok(Outcome::Suppressed) => log_info!("command listing hidden under a test harness"),
        Ok(Outcome::Loaded(app)) => log_info!("{} {} loaded; nothing dispatched", app.name, app.version),
        Ok(Outcome::Ran) => {}
        Err(e) => {
            let msg = match &e {
                DispatchError::Command(inner) => color(Role::Error, format!("Error: {inner:#}"), &style),
                DispatchError::UnknownCommand { .. } => color(Role::Warning, e.to_string(), &style),
                DispatchError::LoadFailure { .. } => color(Role::Error, e.to_string(), &style),
            };
            log_error!("{msg}");
            std::process::exit(e.exit_code());
        }
    }
}
