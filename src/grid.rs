//! Character grid shared by every arcade screen.
//!
//! A `GridBuffer` is a tiny framebuffer of characters. Games draw into it
//! once per frame; the shell turns the result into ratatui lines. Every
//! write is bounds-checked and silently dropped when it falls outside the
//! grid, so drawing code never has to clip by hand.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Round a continuous coordinate to the nearest cell, halves rounding up
/// (`-0.5 → 0`, `2.5 → 3`).
pub fn to_cell(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}

/// `base + i`, or None when it leaves the i32 range (such a cell is off-grid).
fn offset(base: i32, i: usize) -> Option<i32> {
    i32::try_from(i).ok().and_then(|i| base.checked_add(i))
}

/// Column at which `len` characters are centered on a row of `width`.
fn centered_col(width: i32, len: i32) -> i32 {
    (width - len).div_euclid(2)
}

pub struct GridBuffer {
    width: i32,
    height: i32,
    cells: Vec<char>,
    highlights: Vec<bool>,
    any_highlight: bool,
}

impl GridBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        Self {
            width: width as i32,
            height: height as i32,
            cells: vec![' '; len],
            highlights: vec![false; len],
            any_highlight: false,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if row >= 0 && row < self.height && col >= 0 && col < self.width {
            Some((row * self.width + col) as usize)
        } else {
            None
        }
    }

    /// Reset every cell to a space and drop all highlights.
    pub fn clear(&mut self) {
        self.cells.fill(' ');
        self.highlights.fill(false);
        self.any_highlight = false;
    }

    pub fn set(&mut self, row: i32, col: i32, ch: char) {
        if let Some(i) = self.index(row, col) {
            self.cells[i] = ch;
        }
    }

    /// Character at (row, col), or a space outside the grid.
    pub fn get(&self, row: i32, col: i32) -> char {
        self.index(row, col).map_or(' ', |i| self.cells[i])
    }

    pub fn is_highlighted(&self, row: i32, col: i32) -> bool {
        self.index(row, col).is_some_and(|i| self.highlights[i])
    }

    /// Write `s` from `col`, or centered on the full width when `col` is `None`.
    pub fn text(&mut self, s: &str, row: i32, col: Option<i32>) {
        let col = col.unwrap_or_else(|| centered_col(self.width, s.chars().count() as i32));
        for (i, ch) in s.chars().enumerate() {
            if let Some(c) = offset(col, i) {
                self.set(row, c, ch);
            }
        }
    }

    /// Like [`text`](Self::text) but clipped to the area inside the border.
    pub fn text_inner(&mut self, s: &str, row: i32, col: Option<i32>) {
        if row < 1 || row > self.height - 2 {
            return;
        }
        let col = col.unwrap_or_else(|| centered_col(self.width, s.chars().count() as i32));
        for (i, ch) in s.chars().enumerate() {
            match offset(col, i) {
                Some(c) if c >= 1 && c <= self.width - 2 => self.set(row, c, ch),
                _ => {}
            }
        }
    }

    /// Center `s` on a border row. Columns 0 and `width - 1` are never touched.
    pub fn border_text(&mut self, s: &str, row: i32) {
        let start = centered_col(self.width, s.chars().count() as i32);
        for (i, ch) in s.chars().enumerate() {
            match offset(start, i) {
                Some(c) if c > 0 && c < self.width - 1 => self.set(row, c, ch),
                _ => {}
            }
        }
    }

    /// `+` corners, `=` top and bottom, `|` sides.
    pub fn borders(&mut self) {
        let (w, h) = (self.width, self.height);
        for c in 0..w {
            self.set(0, c, '=');
            self.set(h - 1, c, '=');
        }
        for r in 0..h {
            self.set(r, 0, '|');
            self.set(r, w - 1, '|');
        }
        for (r, c) in [(0, 0), (0, w - 1), (h - 1, 0), (h - 1, w - 1)] {
            self.set(r, c, '+');
        }
    }

    /// Blit multi-line art. Spaces in the source are transparent.
    pub fn sprite(&mut self, lines: &[&str], row: i32, col: i32) {
        for (r, line) in lines.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                if ch == ' ' {
                    continue;
                }
                if let (Some(r), Some(c)) = (offset(row, r), offset(col, c)) {
                    self.set(r, c, ch);
                }
            }
        }
    }

    pub fn set_green(&mut self, row: i32, col: i32, ch: char) {
        if let Some(i) = self.index(row, col) {
            self.cells[i] = ch;
            self.highlights[i] = true;
            self.any_highlight = true;
        }
    }

    pub fn text_green(&mut self, s: &str, row: i32, col: Option<i32>) {
        let col = col.unwrap_or_else(|| centered_col(self.width, s.chars().count() as i32));
        for (i, ch) in s.chars().enumerate() {
            if let Some(c) = offset(col, i) {
                self.set_green(row, c, ch);
            }
        }
    }

    /// Whole grid as text, rows joined by `\n`.
    pub fn to_plain_string(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.height as usize);
        for (r, row) in self.cells.chunks(self.width.max(1) as usize).enumerate() {
            if r > 0 {
                out.push('\n');
            }
            out.extend(row.iter());
        }
        out
    }

    /// Snapshot the grid for display.
    ///
    /// Without highlights this is the plain string; otherwise each row is
    /// split into runs of equal emphasis.
    pub fn render(&self) -> Rendered {
        if !self.any_highlight {
            return Rendered::Plain(self.to_plain_string());
        }
        let width = self.width.max(1) as usize;
        let rows = self
            .cells
            .chunks(width)
            .zip(self.highlights.chunks(width))
            .map(|(cells, marks)| {
                let mut runs: Vec<Run> = Vec::new();
                for (&ch, &emphasized) in cells.iter().zip(marks) {
                    match runs.last_mut() {
                        Some(run) if run.emphasized == emphasized => run.text.push(ch),
                        _ => runs.push(Run {
                            text: ch.to_string(),
                            emphasized,
                        }),
                    }
                }
                runs
            })
            .collect();
        Rendered::Decorated(rows)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub emphasized: bool,
}

/// Output of [`GridBuffer::render`].
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Plain(String),
    Decorated(Vec<Vec<Run>>),
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            _ => out.push(ch),
        }
    }
}

impl Rendered {
    /// Markup form: emphasized runs wrapped in `<span class="green">`.
    /// Plain output is returned untouched.
    pub fn to_markup(&self) -> String {
        match self {
            Rendered::Plain(s) => s.clone(),
            Rendered::Decorated(rows) => {
                let mut out = String::new();
                for (r, runs) in rows.iter().enumerate() {
                    if r > 0 {
                        out.push('\n');
                    }
                    for run in runs {
                        if run.emphasized {
                            out.push_str("<span class=\"green\">");
                            escape_into(&mut out, &run.text);
                            out.push_str("</span>");
                        } else {
                            escape_into(&mut out, &run.text);
                        }
                    }
                }
                out
            }
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'static>> {
        let emphasis = Style::default()
            .fg(Color::LightGreen)
            .add_modifier(Modifier::BOLD);
        match self {
            Rendered::Plain(s) => s.split('\n').map(|l| Line::from(l.to_string())).collect(),
            Rendered::Decorated(rows) => rows
                .iter()
                .map(|runs| {
                    let spans: Vec<Span<'static>> = runs
                        .iter()
                        .map(|run| {
                            if run.emphasized {
                                Span::styled(run.text.clone(), emphasis)
                            } else {
                                Span::raw(run.text.clone())
                            }
                        })
                        .collect();
                    Line::from(spans)
                })
                .collect(),
        }
    }
}
