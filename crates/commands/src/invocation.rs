/// A received chat command.
///
/// `tokens[0]` is the command with its prefix marker (`!role`), `tokens[1]` the
/// subcommand, the rest positional arguments. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    tokens: Vec<String>,
    sender: String,
}

impl Invocation {
    pub fn new(sender: impl Into<String>, tokens: Vec<String>) -> Self {
        Self {
            tokens,
            sender: sender.into(),
        }
    }

    /// Split raw message text on whitespace.
    pub fn parse(sender: impl Into<String>, text: &str) -> Self {
        Self::new(sender, text.split_whitespace().map(str::to_string).collect())
    }

    /// The command token including its prefix (`!role`), or `""` for an empty message.
    pub fn command(&self) -> &str {
        self.tokens.first().map(String::as_str).unwrap_or("")
    }

    pub fn subcommand(&self) -> Option<&str> {
        self.tokens.get(1).map(String::as_str)
    }

    /// Positional arguments after the subcommand.
    pub fn args(&self) -> &[String] {
        self.tokens.get(2..).unwrap_or(&[])
    }

    /// Caller identity (`<platform>:<user-id>`).
    pub fn sender(&self) -> &str {
        &self.sender
    }
}
