use porter_core::JobKind;

pub const HELP: &str = "\
commands:
  use <convert|analyse>   switch the active job kind
  url <text>              set the repository URL (empty clears it)
  submit                  send the URL to the service
  reset                   clear the active job
  download                save the artifact of a successful job
  status                  show both jobs
  help                    show this text
  quit                    leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Use(JobKind),
    Url(String),
    Submit,
    Reset,
    Download,
    Status,
    Help,
    Quit,
    /// Blank line.
    Nothing,
}

pub fn parse(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "" => ShellCommand::Nothing,
        "use" => ShellCommand::Use(rest.parse().map_err(|err| format!("{err}"))?),
        "url" => ShellCommand::Url(rest.to_string()),
        "submit" => ShellCommand::Submit,
        "reset" | "clear" => ShellCommand::Reset,
        "download" => ShellCommand::Download,
        "status" => ShellCommand::Status,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(command)
}
