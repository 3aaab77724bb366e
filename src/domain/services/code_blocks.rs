use anyhow::bail;
use anyhow::Result;

use super::ContentParser;
use crate::domain::models::Message;
use crate::domain::models::Role;
use crate::domain::models::SlashCommand;

#[cfg(test)]
#[path = "code_blocks_test.rs"]
mod tests;

/// Every code block from the assistant's answers, numbered from 1 across the
/// whole conversation in the same order the chat view labels them.
#[derive(Default)]
pub struct CodeBlocks {
    codeblocks: Vec<String>,
}

impl CodeBlocks {
    pub fn replace_from_messages(&mut self, messages: &[Message]) {
        self.codeblocks = messages
            .iter()
            .filter(|msg| return msg.role == Role::Assistant)
            .flat_map(|msg| {
                return ContentParser::parse(&msg.content).code_blocks;
            })
            .collect();
    }

    pub fn len(&self) -> usize {
        return self.codeblocks.len();
    }

    /// Selects blocks from `/copy` arguments: `2`, `1,3`, an inclusive range
    /// `2..4`, or nothing for the most recent block.
    pub fn blocks_from_slash_commands(&self, command: &SlashCommand) -> Result<String> {
        if self.codeblocks.is_empty() {
            bail!("There are no code blocks to copy yet.");
        }

        let args = command
            .args
            .iter()
            .flat_map(|arg| return arg.split(','))
            .map(|e| return e.trim())
            .filter(|e| return !e.is_empty())
            .collect::<Vec<&str>>();

        if args.is_empty() {
            if let Some(last) = self.codeblocks.last() {
                return Ok(last.to_string());
            }
        }

        let mut numbers: Vec<usize> = vec![];
        for arg in args {
            if let Some((first, last)) = arg.split_once("..") {
                let first = self.block_number(first)?;
                let last = self.block_number(last)?;
                if first > last {
                    bail!(format!(
                        "Code block range {first}..{last} is backwards. Use {last}..{first} instead."
                    ));
                }
                numbers.extend(first..=last);
            } else {
                numbers.push(self.block_number(arg)?);
            }
        }

        let blocks = numbers
            .iter()
            .map(|number| return self.codeblocks[number - 1].to_string())
            .collect::<Vec<String>>();

        return Ok(blocks.join("\n\n"));
    }

    /// Parses a 1-based block number and checks the block exists.
    fn block_number(&self, arg: &str) -> Result<usize> {
        let number = arg.trim().parse::<usize>()?;
        if number == 0 || number > self.codeblocks.len() {
            bail!(format!("Code block {number} does not exist."));
        }

        return Ok(number);
    }
}
