use super::Patch;
use crate::codec;
use crate::diff::Op;
use ansi_term::{Color, Style};
use std::fmt::{Display, Formatter, Result};

// One coordinate pair of the header. A zero length keeps the raw start
// with an explicit `,0`; a length of one prints the 1-based start alone;
// otherwise both the 1-based start and the length appear.
fn write_coords(f: &mut Formatter<'_>, start: usize, length: usize) -> Result {
    match length {
        0 => write!(f, "{},0", start),
        1 => write!(f, "{}", start + 1),
        _ => write!(f, "{},{}", start + 1, length),
    }
}

impl Display for Patch {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "@@ -")?;
        write_coords(f, self.start1, self.length1)?;
        write!(f, " +")?;
        write_coords(f, self.start2, self.length2)?;
        writeln!(f, " @@")?;

        for diff in &self.diffs {
            let sign = match diff.op {
                Op::Insert => '+',
                Op::Delete => '-',
                Op::Equal => ' ',
            };
            writeln!(f, "{}{}", sign, codec::encode(&diff.text))?;
        }

        Ok(())
    }
}

/// Serialise a patch list to its wire format.
pub fn patches_to_text(patches: &[Patch]) -> String {
    patches.iter().map(ToString::to_string).collect()
}

/// Struct used to adjust the formatting of a patch list for terminals
#[derive(Debug)]
pub struct PatchFormatter {
    with_color: bool,

    context: Style,
    delete: Style,
    insert: Style,
    hunk_header: Style,
}

impl PatchFormatter {
    /// Construct a new formatter
    pub fn new() -> Self {
        Self {
            with_color: false,

            context: Style::new(),
            delete: Color::Red.normal(),
            insert: Color::Green.normal(),
            hunk_header: Color::Cyan.normal(),
        }
    }

    /// Enable formatting with color
    pub fn with_color(mut self) -> Self {
        self.with_color = true;
        self
    }

    /// Returns a `Display` impl which can be used to print a patch list
    pub fn fmt_patches<'a>(&'a self, patches: &'a [Patch]) -> impl Display + 'a {
        PatchesDisplay { f: self, patches }
    }

    fn fmt_patch<'a>(&'a self, patch: &'a Patch) -> impl Display + 'a {
        PatchDisplay { f: self, patch }
    }
}

impl Default for PatchFormatter {
    fn default() -> Self {
        Self::new()
    }
}

struct PatchesDisplay<'a> {
    f: &'a PatchFormatter,
    patches: &'a [Patch],
}

impl Display for PatchesDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for patch in self.patches {
            write!(f, "{}", self.f.fmt_patch(patch))?;
        }
        Ok(())
    }
}

struct PatchDisplay<'a> {
    f: &'a PatchFormatter,
    patch: &'a Patch,
}

impl Display for PatchDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if self.f.with_color {
            write!(f, "{}", self.f.hunk_header.prefix())?;
        }
        write!(f, "@@ -")?;
        write_coords(f, self.patch.start1, self.patch.length1)?;
        write!(f, " +")?;
        write_coords(f, self.patch.start2, self.patch.length2)?;
        write!(f, " @@")?;
        if self.f.with_color {
            write!(f, "{}", self.f.hunk_header.suffix())?;
        }
        writeln!(f)?;

        for diff in &self.patch.diffs {
            let (sign, style) = match diff.op {
                Op::Insert => ('+', self.f.insert),
                Op::Delete => ('-', self.f.delete),
                Op::Equal => (' ', self.f.context),
            };

            if self.f.with_color {
                write!(f, "{}", style.prefix())?;
            }
            write!(f, "{}{}", sign, codec::encode(&diff.text))?;
            if self.f.with_color {
                write!(f, "{}", style.suffix())?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
