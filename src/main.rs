use clap::Parser;
use miette::Result;
use pnt::cli::{Cli, Commands};
use pnt::core::audit::AuditLog;

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    let mut audit = if cli.global.no_log {
        AuditLog::disabled()
    } else {
        AuditLog::open(&cli.global.log_file)
    };

    match cli.command {
        Some(Commands::Pipe(cmd)) => pnt::cli::commands::pipe::run(cmd, &cli.global, &mut audit),
        Some(Commands::Station(cmd)) => {
            pnt::cli::commands::station::run(cmd, &cli.global, &mut audit)
        }
        Some(Commands::Data(cmd)) => pnt::cli::commands::data::run(cmd, &cli.global, &mut audit),
        // Plain `pnt` drops into the interactive menu
        Some(Commands::Menu) | None => pnt::cli::commands::menu::run(&mut audit),
    }
}
