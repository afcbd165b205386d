//! Console output: one colored `[instance] payload` line per event.

use std::io::{self, Write};

use colored::{Color, Colorize};

use crate::event::InstanceExit;

/// Shared console sink for every instance.
///
/// Only the supervisor loop writes here, and each event is emitted with a
/// single `write_all`, so lines from different instances never interleave
/// mid-line.
pub struct Multiplexer<W: Write> {
    out: W,
    colorize: bool,
}

impl<W: Write> Multiplexer<W> {
    pub fn new(out: W, colorize: bool) -> Self {
        Self { out, colorize }
    }

    /// Uncolored output, for tests and `--no-color`.
    pub fn plain(out: W) -> Self {
        Self::new(out, false)
    }

    /// Emit a chunk of stdout/stderr. A multi-line chunk stays one write.
    pub fn output(&mut self, instance: &str, color: Color, chunk: &[u8]) -> io::Result<()> {
        let text = String::from_utf8_lossy(chunk);
        self.emit(&format_line(instance, trim_terminator(&text)), color)
    }

    pub fn exited(&mut self, instance: &str, color: Color, exit: InstanceExit) -> io::Result<()> {
        self.emit(
            &format_line(instance, &format!("exited with code {exit}")),
            color,
        )
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: &str, color: Color) -> io::Result<()> {
        let mut rendered = if self.colorize {
            line.color(color).to_string()
        } else {
            line.to_string()
        };
        rendered.push('\n');
        self.out.write_all(rendered.as_bytes())?;
        self.out.flush()
    }
}

/// `[{instance}] {payload}`
pub fn format_line(instance: &str, payload: &str) -> String {
    format!("[{instance}] {payload}")
}

/// Drop one trailing line terminator so the console line ends exactly once.
fn trim_terminator(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Multiplexer<Vec<u8>>) -> io::Result<()>) -> String {
        let mut mux = Multiplexer::plain(Vec::new());
        f(&mut mux).expect("write");
        String::from_utf8(mux.into_inner()).expect("utf8")
    }

    #[test]
    fn prefixes_chunk_with_instance_name() {
        let out = render(|m| m.output("web-0", Color::Yellow, b"listening on 5000\n"));
        assert_eq!(out, "[web-0] listening on 5000\n");
    }

    #[test]
    fn multi_line_chunk_is_one_write() {
        let out = render(|m| m.output("worker-1", Color::Cyan, b"a\nb\n"));
        assert_eq!(out, "[worker-1] a\nb\n");
    }

    #[test]
    fn chunk_without_newline_still_ends_the_line() {
        let out = render(|m| m.output("web-0", Color::Yellow, b"partial"));
        assert_eq!(out, "[web-0] partial\n");
    }

    #[test]
    fn exit_line_format() {
        let out = render(|m| m.exited("web-1", Color::Blue, InstanceExit::Code(2)));
        assert_eq!(out, "[web-1] exited with code 2\n");
    }

    #[test]
    fn colorized_line_wraps_whole_text() {
        colored::control::set_override(true);
        let mut mux = Multiplexer::new(Vec::new(), true);
        mux.output("web-0", Color::Green, b"hi").expect("write");
        let out = String::from_utf8(mux.into_inner()).expect("utf8");
        assert!(out.starts_with("\u{1b}["), "expected ANSI prefix, got {out:?}");
        assert!(out.contains("[web-0] hi"));
    }
}
