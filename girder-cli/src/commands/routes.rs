use std::io::Write;

use colored::{ColoredString, Colorize};
use girder_core::router::RouteEntry;

use crate::error::CliError;
use crate::plugin::CliApp;

pub fn run<A: CliApp + ?Sized>(app: &A, out: &mut dyn Write) -> Result<(), CliError> {
    out.write_all(render(&app.routes()).as_bytes())?;
    Ok(())
}

/// The route table as printed by `routes`.
pub fn render(routes: &[RouteEntry]) -> String {
    if routes.is_empty() {
        return format!("{}\n", "No routes found.".dimmed());
    }

    let mut table = format!("{}\n\n", "Declared routes:".bold());
    table.push_str(&format!(
        "  {:<8} {:<35} {:<25} {}\n",
        "METHOD".dimmed(),
        "PATH".dimmed(),
        "HANDLER".dimmed(),
        "OWNER".dimmed()
    ));
    table.push_str(&format!("  {}\n", "-".repeat(80).dimmed()));

    for route in routes {
        let handler = if route.websocket {
            format!("{} (ws)", route.handler)
        } else {
            route.handler.clone()
        };
        table.push_str(&format!(
            "  {:<8} {:<35} {:<25} {}\n",
            method_colored(&route.method),
            route.path,
            handler,
            route.owner
        ));
    }

    table.push_str(&format!("\n  {} routes total\n", routes.len()));
    table
}

fn method_colored(method: &str) -> ColoredString {
    match method {
        "GET" => method.green(),
        "POST" => method.blue(),
        "PUT" => method.yellow(),
        "DELETE" => method.red(),
        "PATCH" => method.magenta(),
        _ => method.normal(),
    }
}
