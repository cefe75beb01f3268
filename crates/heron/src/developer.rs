use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::Command;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::errors::{AgentError, AgentResult};
use crate::models::tool::{Tool, ToolCall};
use crate::systems::System;

/// Local filesystem and shell capabilities: read_file, write_file, list_dir
/// and bash. Paths are tilde-expanded and resolved against the process
/// working directory.
pub struct DeveloperSystem {
    tools: Vec<Tool>,
}

impl Default for DeveloperSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl DeveloperSystem {
    pub fn new() -> Self {
        let read_file_tool = Tool::new(
            "read_file",
            "Read a file and return its full contents.",
            json!({
                "type": "object",
                "required": ["filepath"],
                "properties": {
                    "filepath": {
                        "type": "string",
                        "description": "Path of the file to read."
                    }
                }
            }),
        );

        let write_file_tool = Tool::new(
            "write_file",
            "Write content to a file, creating it if needed and replacing any existing contents.",
            json!({
                "type": "object",
                "required": ["filepath", "content"],
                "properties": {
                    "filepath": {
                        "type": "string",
                        "description": "Path of the file to write."
                    },
                    "content": {
                        "type": "string",
                        "description": "The full content to write."
                    }
                }
            }),
        );

        let list_dir_tool = Tool::new(
            "list_dir",
            "List the entries of a directory. Hidden entries are skipped.",
            json!({
                "type": "object",
                "required": ["dirpath"],
                "properties": {
                    "dirpath": {
                        "type": "string",
                        "description": "Path of the directory to list."
                    }
                }
            }),
        );

        let bash_tool = Tool::new(
            "bash",
            "Run a command in a bash shell and return its interleaved stdout and stderr along with the exit code.",
            json!({
                "type": "object",
                "required": ["command"],
                "properties": {
                    "command": {
                        "type": "string",
                        "description": "The bash shell command to run."
                    }
                }
            }),
        );

        Self {
            tools: vec![read_file_tool, write_file_tool, list_dir_tool, bash_tool],
        }
    }

    fn resolve_path(&self, path_str: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path_str).as_ref())
    }

    fn string_param<'a>(params: &'a Value, name: &str) -> AgentResult<&'a str> {
        params
            .get(name)
            .and_then(|value| value.as_str())
            .ok_or_else(|| AgentError::InvalidParameters(format!("Missing '{}' parameter", name)))
    }

    async fn read_file(&self, params: Value) -> AgentResult<String> {
        let filepath = Self::string_param(&params, "filepath")?;
        let path = self.resolve_path(filepath);

        let content = std::fs::read_to_string(&path).map_err(|err| {
            AgentError::ExecutionError(format!("Cannot open file '{}': {}", path.display(), err))
        })?;

        Ok(format!(
            "--- Content of {} ---\n{}\n--- End of file ---",
            path.display(),
            content
        ))
    }

    async fn write_file(&self, params: Value) -> AgentResult<String> {
        let filepath = Self::string_param(&params, "filepath")?;
        let content = Self::string_param(&params, "content")?;
        let path = self.resolve_path(filepath);

        std::fs::write(&path, content).map_err(|err| {
            AgentError::ExecutionError(format!(
                "Cannot write to file '{}': {}",
                path.display(),
                err
            ))
        })?;

        Ok(format!("Written to {}", path.display()))
    }

    async fn list_dir(&self, params: Value) -> AgentResult<String> {
        let dirpath = Self::string_param(&params, "dirpath")?;
        let path = self.resolve_path(dirpath);

        let entries = std::fs::read_dir(&path).map_err(|err| {
            AgentError::ExecutionError(format!(
                "Cannot open directory '{}': {}",
                path.display(),
                err
            ))
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|err| AgentError::ExecutionError(format!("Failed to read entry: {}", err)))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let metadata = entry.metadata().map_err(|err| {
                AgentError::ExecutionError(format!("Failed to stat '{}': {}", name, err))
            })?;
            names.push((name, metadata));
        }
        names.sort_by(|a, b| a.0.cmp(&b.0));

        let mut listing = format!("--- Contents of {} ---\n", path.display());
        for (name, metadata) in names {
            if metadata.is_dir() {
                let _ = writeln!(listing, "  [DIR]  {}/", name);
            } else {
                let _ = writeln!(listing, "  [FILE] {} ({} bytes)", name, metadata.len());
            }
        }
        listing.push_str("--- End of listing ---");
        Ok(listing)
    }

    async fn bash(&self, params: Value) -> AgentResult<String> {
        let command = Self::string_param(&params, "command")?;

        // Interleave stderr into stdout, the way a terminal shows it.
        let output = Command::new("bash")
            .arg("-c")
            .arg(format!("{} 2>&1", command))
            .output()
            .map_err(|err| AgentError::ExecutionError(format!("Failed to execute command: {}", err)))?;

        let text = String::from_utf8_lossy(&output.stdout).to_string();
        let code = output.status.code().unwrap_or(-1);
        Ok(format!("{}--- Exit code: {} ---", text, code))
    }
}

#[async_trait]
impl System for DeveloperSystem {
    fn name(&self) -> &str {
        "developer"
    }

    fn description(&self) -> &str {
        "Local file access and shell command execution"
    }

    fn instructions(&self) -> &str {
        "Use read_file, write_file and list_dir for filesystem work, and bash to run shell commands. \
         Prefer the filesystem tools over shell equivalents when both would work."
    }

    fn tools(&self) -> &[Tool] {
        &self.tools
    }

    async fn call(&self, tool_call: ToolCall) -> AgentResult<String> {
        match tool_call.name.as_str() {
            "read_file" => self.read_file(tool_call.arguments).await,
            "write_file" => self.write_file(tool_call.arguments).await,
            "list_dir" => self.list_dir(tool_call.arguments).await,
            "bash" => self.bash(tool_call.arguments).await,
            _ => Err(AgentError::ToolNotFound(tool_call.name)),
        }
    }
}
