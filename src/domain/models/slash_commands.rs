#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

pub struct SlashCommand {
    command: String,
    pub args: Vec<String>,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let mut args = text
            .split_whitespace()
            .map(|e| return e.to_string())
            .collect::<Vec<String>>();
        if args.is_empty() {
            return None;
        }

        let cmd = SlashCommand {
            command: args.remove(0),
            args,
        };
        if cmd.is_quit()
            || cmd.is_retry()
            || cmd.is_clear()
            || cmd.is_model_set()
            || cmd.is_copy_code_block()
            || cmd.is_help()
        {
            return Some(cmd);
        }

        return None;
    }

    fn is_command(&self, names: &[&str]) -> bool {
        return names.contains(&self.command.as_str());
    }

    pub fn is_quit(&self) -> bool {
        return self.is_command(&["/q", "/quit", "/exit"]);
    }

    pub fn is_retry(&self) -> bool {
        return self.is_command(&["/r", "/retry"]);
    }

    pub fn is_clear(&self) -> bool {
        return self.is_command(&["/clear"]);
    }

    pub fn is_model_set(&self) -> bool {
        return self.is_command(&["/m", "/model"]);
    }

    pub fn is_copy_code_block(&self) -> bool {
        return self.is_command(&["/c", "/copy"]);
    }

    pub fn is_help(&self) -> bool {
        return self.is_command(&["/h", "/help"]);
    }
}
