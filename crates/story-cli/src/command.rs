//! Shell command parsing.

use std::fmt;

/// One line typed at the shell prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `go <fragment>`: change the location
    Go(String),
    /// `submit <form> [name=value]...`
    Submit {
        form: String,
        fields: Vec<(String, String)>,
    },
    /// `click <target> [name=value]...`
    Click {
        target: String,
        data: Vec<(String, String)>,
    },
    /// `show`: print the whole document
    Show,
    /// `maps`: list live map widgets
    Maps,
    Help,
    Quit,
}

/// Names offered by tab completion.
pub const COMMAND_NAMES: &[&str] = &["go", "submit", "click", "show", "maps", "help", "quit"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ParseError {}

fn error(message: impl Into<String>) -> ParseError {
    ParseError(message.into())
}

/// Splits a line on whitespace, keeping double-quoted runs together.
fn tokenize(line: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if quoted {
        return Err(error("Unterminated quote"));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

fn pairs(tokens: &[String]) -> Result<Vec<(String, String)>, ParseError> {
    tokens
        .iter()
        .map(|token| {
            token
                .split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| error(format!("Expected name=value, got '{}'", token)))
        })
        .collect()
}

impl Command {
    /// Parses a shell line. Returns `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let tokens = tokenize(line)?;
        let Some((name, args)) = tokens.split_first() else {
            return Ok(None);
        };

        let command = match name.as_str() {
            "go" => match args {
                [fragment] => Self::Go(fragment.clone()),
                _ => return Err(error("Usage: go <fragment>")),
            },
            "submit" => {
                let (form, rest) = args
                    .split_first()
                    .ok_or_else(|| error("Usage: submit <form> [name=value]..."))?;
                Self::Submit {
                    form: form.clone(),
                    fields: pairs(rest)?,
                }
            }
            "click" => {
                let (target, rest) = args
                    .split_first()
                    .ok_or_else(|| error("Usage: click <target> [name=value]..."))?;
                Self::Click {
                    target: target.clone(),
                    data: pairs(rest)?,
                }
            }
            "show" => Self::Show,
            "maps" => Self::Maps,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(error(format!("Unknown command '{}'. Type 'help'.", other))),
        };
        Ok(Some(command))
    }
}

pub const HELP: &str = "\
go <fragment>                 change the location, e.g. go #/story/42
submit <form> name=value...   submit a form, e.g. submit login-form email=a@b.c password=secret
click <target> name=value...  click an element, e.g. click map-toggle-button id=s1 lat=-6.2 lon=106.8
show                          print the mounted page and all regions
maps                          list live map widgets
quit                          leave the shell";
