//! Terminal output for styled trees
//!
//! Colors follow the role of each highlighted span, the way the terminal
//! documentation printer colors signatures.

use super::{ElementTag, StyleRole, StyledElement, StyledNode, StyledTree};
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

fn role_color(role: StyleRole) -> Option<ColorSpec> {
    let mut spec = ColorSpec::new();
    match role {
        StyleRole::Keyword => spec.set_fg(Some(Color::Magenta)),
        StyleRole::Entity => spec.set_fg(Some(Color::Cyan)).set_bold(true),
        StyleRole::String => spec.set_fg(Some(Color::Green)),
        StyleRole::Constant => spec.set_fg(Some(Color::Yellow)),
        StyleRole::Parameter => spec.set_italic(true),
        StyleRole::Punctuation => return None,
    };
    Some(spec)
}

impl StyledTree {
    /// Write the tree's text, colored by role
    pub fn write_colored<W: WriteColor>(&self, w: &mut W) -> io::Result<()> {
        write_element(w, &self.root)
    }

    /// Print directly to stdout
    pub fn print_to_stdout(&self, use_color: bool) -> io::Result<()> {
        let choice = if use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        self.write_colored(&mut stdout)?;
        writeln!(stdout)
    }
}

fn write_element<W: WriteColor>(w: &mut W, element: &StyledElement) -> io::Result<()> {
    if element.tag == ElementTag::Br {
        return writeln!(w);
    }

    let color = element.role.and_then(role_color);
    if let Some(spec) = &color {
        w.set_color(spec)?;
    }
    for child in &element.children {
        match child {
            StyledNode::Element(child) => write_element(w, child)?,
            StyledNode::Text { value } => write!(w, "{}", value)?,
        }
    }
    if color.is_some() {
        w.reset()?;
    }
    Ok(())
}
