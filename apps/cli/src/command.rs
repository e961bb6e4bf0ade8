use std::path::PathBuf;

pub const HELP: &str = "\
Type a question and press Enter to ask it.
  /upload <path>   analyze an insurance document (PDF, JPG, JPEG, PNG)
  /history         list the turns of this session
  /expand <n>      show turn n with every block expanded
  /retry           resend the last question that failed
  /health          check that the assistant service is up
  /help            show this help
  /quit            leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    Upload(PathBuf),
    History,
    Expand(usize),
    Retry,
    Health,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub fn parse(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Ask(line.trim_end_matches(['\r', '\n']).to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "upload" if arg.is_empty() => Command::Invalid("usage: /upload <path>".into()),
        "upload" => Command::Upload(PathBuf::from(arg)),
        "history" => Command::History,
        "expand" => match arg.parse::<usize>() {
            Ok(n) if n > 0 => Command::Expand(n),
            _ => Command::Invalid("usage: /expand <turn number>".into()),
        },
        "retry" => Command::Retry,
        "health" => Command::Health,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Invalid(format!("unknown command '/{other}', try /help")),
    }
}
