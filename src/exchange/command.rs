//! Commands that drive the exchange

/// One operator command, with identifiers still unresolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Offhook {
        phone: String,
    },
    Onhook {
        phone: String,
    },
    /// Placed from whichever phone currently has dial tone
    Call {
        target: String,
    },
    Transfer {
        from: String,
        target: String,
    },
    Conference {
        target: String,
        /// 1-based index into the active call list; asked for when omitted
        /// and more than one call is up
        selection: Option<usize>,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Offhook { .. } => "offhook",
            Command::Onhook { .. } => "onhook",
            Command::Call { .. } => "call",
            Command::Transfer { .. } => "transfer",
            Command::Conference { .. } => "conference",
        }
    }
}
