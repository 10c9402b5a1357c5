//! Typed command results, rendered to chat text only at the boundary.

use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    /// The caller did something wrong (usage, permission, unknown command).
    Warning,
    /// The system or a collaborator failed.
    Fatal,
}

impl Severity {
    pub fn prefix(&self) -> &'static str {
        match self {
            Severity::Success => ":white_check_mark: ",
            Severity::Warning => ":warning: ",
            Severity::Fatal => ":octagonal_sign: ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub severity: Severity,
    pub body: String,
}

impl Reply {
    pub fn success(body: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            body: body.into(),
        }
    }

    pub fn warning(body: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            body: body.into(),
        }
    }

    pub fn fatal(body: impl Into<String>) -> Self {
        Self {
            severity: Severity::Fatal,
            body: body.into(),
        }
    }

    /// Chat text: severity prefix followed by the body.
    pub fn render(&self) -> String {
        format!("{}{}", self.severity.prefix(), self.body)
    }
}

impl core::fmt::Display for Reply {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.severity.prefix())?;
        f.write_str(&self.body)
    }
}

/// Fixed-width block, one line per entry.
pub fn code_block<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::from("```\n");
    for line in lines {
        out.push_str(line.as_ref());
        out.push('\n');
    }
    out.push_str("```");
    out
}
