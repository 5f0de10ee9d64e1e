//! Help and status text

use crate::exchange::Exchange;
use std::io::{self, Write};

pub const HELP: &str = "\
Available commands:
1. offhook <phone|name>
2. onhook <phone|name>
3. call <target>
4. transfer <phone|name> <target>
5. conference <target> [call#]
6. status
7. help
8. quit/exit";

pub fn write_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{HELP}")
}

/// Every phone's state and who it is talking to, then the active calls
pub fn write_status(out: &mut impl Write, exchange: &Exchange) -> io::Result<()> {
    writeln!(out, "System Status:")?;
    writeln!(out, "-------------")?;
    for (entry, state) in exchange.phones() {
        write!(out, "{entry}: {state}")?;
        let partners = exchange.partners_of(&entry.number);
        if !partners.is_empty() {
            let partners: Vec<String> = partners.iter().map(ToString::to_string).collect();
            write!(out, " with {}", partners.join(", "))?;
        }
        writeln!(out)?;
    }

    if exchange.active_calls().is_empty() {
        writeln!(out, "Active calls: none")?;
    } else {
        writeln!(out, "Active calls:")?;
        for call in exchange.call_summaries() {
            writeln!(out, "  - {call}")?;
        }
    }
    Ok(())
}
