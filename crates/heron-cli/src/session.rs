use std::io::Write;

use anyhow::Result;
use console::style;

use heron::agent::{Agent, ReplyHandler, ReplyOutcome};
use heron::errors::ProviderError;

use crate::commands::{parse_local_command, LocalCommand};
use crate::presets::{find_preset, MODEL_PRESETS};

/// Prints reply events as they arrive: content fragments inline for the
/// real-time feel, tool invocations as dim one-liners.
struct StreamPrinter;

impl ReplyHandler for StreamPrinter {
    fn on_content_delta(&mut self, fragment: &str) {
        print!("{}", fragment);
        let _ = std::io::stdout().flush();
    }

    fn on_tool_call(&mut self, name: &str) {
        println!("\n{}", style(format!("⚙ running {} ...", name)).dim());
    }
}

/// The interactive loop: reads input, routes local commands directly to the
/// tools, and sends everything else through the agent.
pub struct Session {
    agent: Agent,
}

impl Session {
    pub fn new(agent: Agent) -> Self {
        Session { agent }
    }

    pub async fn start(&mut self) -> Result<()> {
        self.print_banner();

        loop {
            let input: String = cliclack::input("You")
                .placeholder("Type a message, a command, or 'exit'")
                .multiline()
                .interact()?;
            let input = input.trim();

            if input.is_empty() {
                continue;
            }
            if input.eq_ignore_ascii_case("exit") {
                println!("Goodbye!");
                break;
            }
            if input == "/help" {
                self.print_help();
                continue;
            }
            if input == "/model" {
                self.select_model()?;
                continue;
            }

            match parse_local_command(input) {
                Some(LocalCommand::Malformed(usage)) => {
                    eprintln!("{}", style(format!("Error: {}", usage)).red());
                }
                Some(command) => {
                    // Pass-through: run the tool without a model round-trip.
                    let (name, arguments) = command
                        .as_tool_call()
                        .expect("malformed commands are handled above");
                    let result = self.agent.call_tool(name, arguments).await;
                    println!("{}", result);
                }
                None => self.send_to_model(input).await,
            }
            println!();
        }

        Ok(())
    }

    async fn send_to_model(&mut self, input: &str) {
        print!("{} ", style("Grok:").cyan().bold());
        let _ = std::io::stdout().flush();

        let mut printer = StreamPrinter;
        match self.agent.reply(input, &mut printer).await {
            Ok(ReplyOutcome::Answer(_)) => println!(),
            Ok(ReplyOutcome::Silent) => {
                println!("{}", style("(no response)").dim());
            }
            Err(ProviderError::ToolLoopExceeded(limit)) => {
                eprintln!(
                    "\n{}",
                    style(format!(
                        "Error: gave up after {} tool calls without a final answer",
                        limit
                    ))
                    .red()
                );
            }
            Err(error) => {
                // History is unchanged after a failed turn; the same input
                // can simply be sent again.
                eprintln!("\n{}", style(format!("Error: {}", error)).red());
            }
        }
    }

    fn select_model(&mut self) -> Result<()> {
        let mut select = cliclack::select("Select a model");
        if find_preset(self.agent.model()).is_some() {
            select = select.initial_value(self.agent.model().to_string());
        }
        for preset in MODEL_PRESETS {
            select = select.item(preset.name.to_string(), preset.label, preset.description);
        }
        let chosen = select.interact()?;

        if let Some(preset) = find_preset(&chosen) {
            println!("✓ Model changed to: {}", preset.label);
        }
        self.agent.set_model(chosen);
        Ok(())
    }

    fn print_banner(&self) {
        println!("=== Grok Terminal ===");
        println!(
            "Connected to xAI API (model: {}) {}",
            self.agent.model(),
            style("- type \"exit\" to end the session").dim()
        );
        self.print_help();
    }

    fn print_help(&self) {
        println!("\nAvailable commands:");
        println!("  <text>                       - Send message to Grok");
        println!("  /model                       - Display model selection menu");
        println!("  /help                        - Show this help");
        println!("  read_file:<path>             - Read and display file contents");
        println!("  write_file:<path>:<content>  - Write content to file");
        println!("  list_dir:<path>              - List directory contents");
        println!("  bash:<command>               - Execute bash command");
        println!("  exit                         - Exit the terminal\n");
    }
}
