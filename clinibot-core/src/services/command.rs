// File: src/services/command.rs
//
// Turns one inbound text into a `Command`. Matching is literal and
// case-insensitive; the first rule that applies wins.

/// Replies that grant consent while the consent gate is active.
pub const CONSENT_WORDS: [&str; 4] = ["acepto", "si", "sí", "ok"];

/// Greetings that show the main menu.
pub const MENU_WORDS: [&str; 4] = ["hola", "menu", "buenas", "start"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Menu,
    /// Identification with a RUT; `candidate` is the last token of the text.
    IdentifyByRut { candidate: String },
    IdentifyByPhone,
    MyAppointments,
    SearchAvailability {
        specialty: Option<String>,
        date: Option<String>,
    },
    Book { date: String, time: String },
    /// `RESERVAR` without both date and time.
    BookUsage,
    /// Bare `CANCELAR`.
    CancelPrompt,
    Cancel { code: String },
    Help,
    Unknown,
}

impl Command {
    /// Stable label for logs. Never includes arguments (a RUT candidate
    /// must not end up in the log).
    pub fn name(&self) -> &'static str {
        match self {
            Command::Menu => "menu",
            Command::IdentifyByRut { .. } => "identify_rut",
            Command::IdentifyByPhone => "identify_phone",
            Command::MyAppointments => "my_appointments",
            Command::SearchAvailability { .. } => "search_availability",
            Command::Book { .. } => "book",
            Command::BookUsage => "book_usage",
            Command::CancelPrompt => "cancel_prompt",
            Command::Cancel { .. } => "cancel",
            Command::Help => "help",
            Command::Unknown => "unknown",
        }
    }
}

pub fn is_consent_affirmative(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    CONSENT_WORDS.contains(&lower.as_str())
}

/// Classifies a message from a user who is past the consent gate.
///
/// Order: menu words, RUT entry, phone identification, keyword commands,
/// fallback. Text led by a command keyword is never read as a RUT even
/// when it contains a dash (`RESERVAR 2025-01-01 10:00`).
pub fn classify(text: &str) -> Command {
    let text = text.trim();
    let lower = text.to_lowercase();

    if MENU_WORDS.contains(&lower.as_str()) {
        return Command::Menu;
    }

    let keyword = keyword_command(text);

    if keyword.is_none() && looks_like_rut_entry(text, &lower) {
        let candidate = text.split_whitespace().last().unwrap_or("").to_string();
        return Command::IdentifyByRut { candidate };
    }

    if keyword.is_none() && text.starts_with('2') {
        return Command::IdentifyByPhone;
    }

    keyword.unwrap_or(Command::Unknown)
}

fn looks_like_rut_entry(text: &str, lower: &str) -> bool {
    text.contains('-') || lower.starts_with('1') || lower.starts_with("rut")
}

fn keyword_command(text: &str) -> Option<Command> {
    let upper = text.to_uppercase();

    if upper == "MIS HORAS" {
        return Some(Command::MyAppointments);
    }

    if upper.starts_with("AGENDAR") {
        let mut args = text.split_whitespace().skip(1);
        return Some(Command::SearchAvailability {
            specialty: args.next().map(str::to_string),
            date: args.next().map(str::to_string),
        });
    }

    if upper.starts_with("RESERVAR") {
        let mut args = text.split_whitespace().skip(1);
        return Some(match (args.next(), args.next()) {
            (Some(date), Some(time)) => Command::Book {
                date: date.to_string(),
                time: time.to_string(),
            },
            _ => Command::BookUsage,
        });
    }

    if upper == "CANCELAR" {
        return Some(Command::CancelPrompt);
    }

    if upper.starts_with("CANCELAR ") {
        let code = text
            .split_once(char::is_whitespace)
            .map(|(_, rest)| rest.trim_start())
            .unwrap_or("");
        if !code.is_empty() {
            return Some(Command::Cancel { code: code.to_string() });
        }
        return Some(Command::CancelPrompt);
    }

    if upper == "AYUDA" {
        return Some(Command::Help);
    }

    None
}
