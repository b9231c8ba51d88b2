// ABOUTME: Line-oriented command language for driving the layout from a script.
// ABOUTME: Parses `add`, `remove`, `drag`, `flip`, `close`, `size` and inspection commands.

use anyhow::{anyhow, bail, Context, Result};
use pane_layout::{Orientation, Position, Side};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Resize the root container and relayout
    Size { width: i32, height: i32 },
    Add {
        name: String,
        near: Option<(Position, String)>,
        prev: Option<i32>,
        curr: Option<i32>,
    },
    Remove(String),
    /// Move the nearest enclosing divider of a pane, optionally of one axis only
    Drag {
        name: String,
        position: i32,
        orientation: Option<Orientation>,
    },
    Flip(String),
    /// Close the first pane on one side of the divider enclosing `name`
    Close { name: String, side: Side },
    Show,
    Dump,
    Panes,
}

/// Parse one script line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let line = line.split('#').next().unwrap_or_default().trim();
    if line.is_empty() {
        return Ok(None);
    }
    let words: Vec<&str> = line.split_whitespace().collect();
    let command = match words.as_slice() {
        ["size", width, height] => Command::Size {
            width: number(width)?,
            height: number(height)?,
        },
        ["add", name, rest @ ..] => parse_add(name, rest)?,
        ["remove", name] => Command::Remove(name.to_string()),
        ["drag", name, position] => Command::Drag {
            name: name.to_string(),
            position: number(position)?,
            orientation: None,
        },
        ["drag", name, axis, position] => Command::Drag {
            name: name.to_string(),
            position: number(position)?,
            orientation: Some(orientation(axis)?),
        },
        ["flip", name] => Command::Flip(name.to_string()),
        ["close", name, side] => Command::Close {
            name: name.to_string(),
            side: match *side {
                "first" => Side::First,
                "second" => Side::Second,
                other => bail!("expected first or second, got {other:?}"),
            },
        },
        ["show"] => Command::Show,
        ["dump"] => Command::Dump,
        ["panes"] => Command::Panes,
        _ => bail!("unrecognised command {line:?}"),
    };
    Ok(Some(command))
}

/// `add NAME [POSITION [of] NEAR] [prev=N] [curr=N]`
fn parse_add(name: &str, rest: &[&str]) -> Result<Command> {
    let mut near = None;
    let mut prev = None;
    let mut curr = None;
    let mut words = rest.iter().copied().peekable();
    while let Some(word) = words.next() {
        if let Some(value) = word.strip_prefix("prev=") {
            prev = Some(number(value)?);
        } else if let Some(value) = word.strip_prefix("curr=") {
            curr = Some(number(value)?);
        } else if let Some(position) = Position::parse(word) {
            if words.peek() == Some(&"of") {
                words.next();
            }
            let target = words
                .next()
                .ok_or_else(|| anyhow!("{word} needs a neighbouring pane"))?;
            near = Some((position, target.to_string()));
        } else {
            bail!("unexpected {word:?} in add");
        }
    }
    Ok(Command::Add {
        name: name.to_string(),
        near,
        prev,
        curr,
    })
}

fn number(word: &str) -> Result<i32> {
    word.parse().with_context(|| format!("expected a number, got {word:?}"))
}

fn orientation(word: &str) -> Result<Orientation> {
    match word {
        "horizontal" => Ok(Orientation::Horizontal),
        "vertical" => Ok(Orientation::Vertical),
        other => bail!("expected horizontal or vertical, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_neighbour_and_hints() {
        let command = parse_line("add B right of A curr=300").unwrap();
        assert_eq!(
            command,
            Some(Command::Add {
                name: "B".into(),
                near: Some((Position::Right, "A".into())),
                prev: None,
                curr: Some(300),
            })
        );

        let command = parse_line("add C bottom B prev=120").unwrap();
        assert_eq!(
            command,
            Some(Command::Add {
                name: "C".into(),
                near: Some((Position::Bottom, "B".into())),
                prev: Some(120),
                curr: None,
            })
        );
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   # just a note").unwrap(), None);
        assert_eq!(parse_line("show # trailing").unwrap(), Some(Command::Show));
    }

    #[test]
    fn parses_drag_with_axis() {
        assert_eq!(
            parse_line("drag C vertical 200").unwrap(),
            Some(Command::Drag {
                name: "C".into(),
                position: 200,
                orientation: Some(Orientation::Vertical),
            })
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_line("explode A").is_err());
        assert!(parse_line("add B left").is_err());
        assert!(parse_line("size wide 10").is_err());
        assert!(parse_line("close A middle").is_err());
    }
}
