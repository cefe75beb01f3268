use serde_json::{json, Value};

/// A direct tool invocation typed at the prompt, bypassing the model.
#[derive(Debug, PartialEq)]
pub enum LocalCommand<'a> {
    ReadFile(&'a str),
    WriteFile { filepath: &'a str, content: &'a str },
    ListDir(&'a str),
    Bash(&'a str),
    /// A recognized command prefix with a malformed remainder; carries the
    /// usage text to show.
    Malformed(&'static str),
}

/// Recognize the `read_file:`, `write_file:`, `list_dir:` and `bash:`
/// pass-through prefixes. Anything else is a message for the model.
pub fn parse_local_command(input: &str) -> Option<LocalCommand<'_>> {
    if let Some(rest) = input.strip_prefix("read_file:") {
        return Some(LocalCommand::ReadFile(rest));
    }
    if let Some(rest) = input.strip_prefix("write_file:") {
        return Some(match rest.split_once(':') {
            Some((filepath, content)) => LocalCommand::WriteFile { filepath, content },
            None => LocalCommand::Malformed("write_file format is 'write_file:<path>:<content>'"),
        });
    }
    if let Some(rest) = input.strip_prefix("list_dir:") {
        return Some(LocalCommand::ListDir(rest));
    }
    if let Some(rest) = input.strip_prefix("bash:") {
        return Some(LocalCommand::Bash(rest));
    }
    None
}

impl LocalCommand<'_> {
    /// The tool name and argument document this command routes to.
    pub fn as_tool_call(&self) -> Option<(&'static str, Value)> {
        match self {
            LocalCommand::ReadFile(filepath) => {
                Some(("read_file", json!({ "filepath": filepath })))
            }
            LocalCommand::WriteFile { filepath, content } => Some((
                "write_file",
                json!({ "filepath": filepath, "content": content }),
            )),
            LocalCommand::ListDir(dirpath) => Some(("list_dir", json!({ "dirpath": dirpath }))),
            LocalCommand::Bash(command) => Some(("bash", json!({ "command": command }))),
            LocalCommand::Malformed(_) => None,
        }
    }
}
