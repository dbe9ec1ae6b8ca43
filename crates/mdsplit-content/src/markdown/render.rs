//! Node sequence → Markdown rendering.
//!
//! Item titles and bodies are re-serialized from parsed events rather than
//! sliced out of the source, so every item comes out in one canonical
//! style regardless of how the source was written:
//!
//! - ATX headings, one blank line between blocks
//! - `-` bullets and `N.` numbers, continuation lines indented by the
//!   marker width, blank lines between items only for loose lists
//! - fenced code blocks with the shortest safe fence
//! - padded GFM pipe tables
//! - backslash escapes for literal markdown characters
//!
//! Re-parsing the output yields the same structure for headings,
//! paragraphs, lists, code blocks, tables, quotes and inline emphasis.
//! Byte-for-byte fidelity with the source is not a goal.
//!
//! # Example
//!
//! ```rust
//! use mdsplit_content::markdown::{parse_nodes, render_blocks, MarkdownOptions};
//!
//! let nodes = parse_nodes("Some *text*\nhere.\n\n* one\n* two\n", &MarkdownOptions::default());
//! assert_eq!(render_blocks(&nodes), "Some *text*\nhere.\n\n- one\n- two\n");
//! ```

use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, LinkType, Tag, TagEnd};

use super::escape::{
    TextContext, calculate_fence_length, calculate_inline_code_ticks, escape_text,
    escape_trailing_bang,
};
use super::parser::{FencedCode, Node};

/// Render a sequence of block nodes as markdown.
///
/// The result ends with a single newline, or is empty if there is nothing
/// to render.
pub fn render_blocks(nodes: &[Node<'_>]) -> String {
    let mut writer = MarkdownWriter::new(false);
    for node in nodes {
        match node {
            Node::Heading(heading) => writer.heading(heading.level, &heading.inlines),
            Node::FencedCode(code) => writer.fenced_code(code),
            Node::Other(events) => writer.events(events),
        }
    }
    writer.finish()
}

/// Render inline events (such as a heading's content) as a single line.
///
/// Line breaks become spaces and no trailing newline is added.
///
/// ```rust
/// use mdsplit_content::markdown::{parse_nodes, render_inlines, MarkdownOptions, Node};
///
/// let nodes = parse_nodes("# Using `cargo` **fast**\n", &MarkdownOptions::default());
/// let Node::Heading(heading) = &nodes[0] else { unreachable!() };
/// assert_eq!(render_inlines(&heading.inlines), "Using `cargo` **fast**");
/// ```
pub fn render_inlines(events: &[Event<'_>]) -> String {
    let mut writer = MarkdownWriter::new(true);
    writer.events(events);
    writer.finish()
}

// ============================================================================
// Writer state
// ============================================================================

/// Text written at the start of every line inside a container.
#[derive(Debug)]
struct Prefix {
    /// Replaces `rest` on the container's first line (list markers).
    first: Option<String>,
    /// Written on every other line.
    rest: String,
}

#[derive(Debug)]
struct ListContext {
    /// Next number for ordered lists, `None` for bullet lists.
    number: Option<u64>,
    /// Bullet character or ordered delimiter.
    delimiter: char,
    /// Loose lists separate items with blank lines.
    loose: bool,
    /// Items seen so far.
    items: usize,
}

#[derive(Debug)]
enum LinkFrame {
    Autolink,
    Inline { dest: String, title: String },
}

#[derive(Debug, Default)]
struct TableContext {
    alignments: Vec<Alignment>,
    head: Vec<String>,
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: Option<String>,
}

/// A list that just ended, used to keep adjacent lists apart.
#[derive(Debug, Clone, Copy)]
struct ClosedList {
    depth: usize,
    ordered: bool,
    delimiter: char,
}

struct MarkdownWriter {
    output: String,
    inline_only: bool,
    prefixes: Vec<Prefix>,
    lists: Vec<ListContext>,
    links: Vec<LinkFrame>,
    table: Option<TableContext>,
    code: Option<(String, String)>,
    html: Option<String>,
    at_line_start: bool,
    needs_blank_line: bool,
    in_heading: bool,
    last_list: Option<ClosedList>,
}

impl MarkdownWriter {
    fn new(inline_only: bool) -> Self {
        Self {
            output: String::new(),
            inline_only,
            prefixes: Vec::new(),
            lists: Vec::new(),
            links: Vec::new(),
            table: None,
            code: None,
            html: None,
            at_line_start: true,
            needs_blank_line: false,
            in_heading: false,
            last_list: None,
        }
    }

    fn finish(mut self) -> String {
        if !self.inline_only && !self.at_line_start {
            self.output.push('\n');
        }
        self.output
    }

    // ------------------------------------------------------------------------
    // Low-level output
    // ------------------------------------------------------------------------

    fn write_prefixes(&mut self) {
        for prefix in self.prefixes.iter_mut() {
            match prefix.first.take() {
                Some(marker) => self.output.push_str(&marker),
                None => self.output.push_str(&prefix.rest),
            }
        }
        self.at_line_start = false;
    }

    /// Write raw markdown, starting the line with container prefixes.
    fn write(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        if let Some(cell) = self.table.as_mut().and_then(|t| t.cell.as_mut()) {
            cell.push_str(s);
            return;
        }
        if self.at_line_start {
            self.write_prefixes();
        }
        self.output.push_str(s);
    }

    fn newline(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    /// Write an empty line that still belongs to the open containers.
    fn blank_line(&mut self) {
        let line: String = self.prefixes.iter().map(|p| p.rest.as_str()).collect();
        self.output.push_str(line.trim_end());
        self.newline();
    }

    fn write_raw_line(&mut self, line: &str) {
        if line.is_empty() {
            self.blank_line();
        } else {
            self.write(line);
            self.newline();
        }
    }

    fn start_block(&mut self) {
        if !self.at_line_start {
            self.newline();
        }
        if self.needs_blank_line {
            self.blank_line();
            self.needs_blank_line = false;
        }
    }

    fn end_block(&mut self) {
        self.needs_blank_line = true;
        self.last_list = None;
    }

    fn text(&mut self, text: &str) {
        if matches!(self.links.last(), Some(LinkFrame::Autolink)) {
            self.write(text);
            return;
        }
        let in_cell = self.table.as_ref().is_some_and(|t| t.cell.is_some());
        let context = TextContext {
            line_start: self.at_line_start && !self.inline_only && !in_cell,
            heading: self.in_heading,
        };
        self.write(&escape_text(text, context));
    }

    // ------------------------------------------------------------------------
    // Blocks
    // ------------------------------------------------------------------------

    fn heading(&mut self, level: HeadingLevel, inlines: &[Event<'_>]) {
        self.start_heading(level);
        self.events(inlines);
        self.end_heading();
    }

    fn start_heading(&mut self, level: HeadingLevel) {
        self.start_block();
        self.write(&"#".repeat(level as usize));
        self.write(" ");
        self.in_heading = true;
    }

    fn end_heading(&mut self) {
        self.in_heading = false;
        let trimmed = self.output.trim_end_matches(' ').len();
        self.output.truncate(trimmed);
        self.end_block();
    }

    fn fenced_code(&mut self, code: &FencedCode) {
        self.start_block();
        self.code_block(&code.info(), &code.text);
    }

    fn code_block(&mut self, info: &str, text: &str) {
        let fence_char = if info.contains('`') { '~' } else { '`' };
        let fence = fence_char
            .to_string()
            .repeat(calculate_fence_length(text, fence_char));

        self.write(&fence);
        self.write(info);
        self.newline();
        for line in text.lines() {
            self.write_raw_line(line);
        }
        self.write(&fence);
        self.end_block();
    }

    fn start_list(&mut self, first_number: Option<u64>, loose: bool) {
        self.start_block();
        let depth = self.lists.len();
        let ordered = first_number.is_some();
        let (primary, alternate) = if ordered { ('.', ')') } else { ('-', '*') };
        let delimiter = match self.last_list {
            Some(prev) if prev.depth == depth && prev.ordered == ordered => {
                if prev.delimiter == primary { alternate } else { primary }
            }
            _ => primary,
        };
        self.lists.push(ListContext {
            number: first_number,
            delimiter,
            loose,
            items: 0,
        });
    }

    fn end_list(&mut self) {
        let closed = self.lists.pop();
        self.end_block();
        self.last_list = closed.map(|list| ClosedList {
            depth: self.lists.len(),
            ordered: list.number.is_some(),
            delimiter: list.delimiter,
        });
    }

    fn start_item(&mut self) {
        let (marker, separate) = match self.lists.last_mut() {
            Some(list) => {
                let marker = match list.number.as_mut() {
                    Some(number) => {
                        let marker = format!("{number}{} ", list.delimiter);
                        *number += 1;
                        marker
                    }
                    None => format!("{} ", list.delimiter),
                };
                let separate = list.loose && list.items > 0;
                list.items += 1;
                (marker, separate)
            }
            None => ("- ".to_string(), false),
        };

        if !self.at_line_start {
            self.newline();
        }
        if separate {
            self.blank_line();
        }
        self.needs_blank_line = false;
        self.last_list = None;

        let rest = " ".repeat(marker.len());
        self.prefixes.push(Prefix {
            first: Some(marker),
            rest,
        });
    }

    fn end_item(&mut self) {
        let empty = self.prefixes.last().is_some_and(|p| p.first.is_some());
        if empty {
            self.write_prefixes();
            let trimmed = self.output.trim_end_matches(' ').len();
            self.output.truncate(trimmed);
        }
        self.prefixes.pop();
        self.needs_blank_line = false;
    }

    fn start_quote(&mut self) {
        self.start_block();
        self.prefixes.push(Prefix {
            first: None,
            rest: "> ".to_string(),
        });
    }

    fn end_quote(&mut self) {
        self.prefixes.pop();
        if self.at_line_start && !self.needs_blank_line {
            // Empty quote: keep a bare marker so it survives re-parsing
            self.write(">");
        }
        self.end_block();
    }

    fn rule(&mut self) {
        self.start_block();
        self.write("***");
        self.end_block();
    }

    fn html_block(&mut self, html: &str) {
        for line in html.lines() {
            self.write_raw_line(line);
        }
        self.end_block();
    }

    fn table(&mut self, table: TableContext) {
        let columns = table
            .alignments
            .len()
            .max(table.head.len())
            .max(table.rows.iter().map(Vec::len).max().unwrap_or(0));
        let mut widths = vec![3usize; columns];
        for row in std::iter::once(&table.head).chain(table.rows.iter()) {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        self.table_row(&table.head, &widths);
        let delimiters: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, &width)| {
                let alignment = table.alignments.get(i).copied().unwrap_or(Alignment::None);
                alignment_marker(alignment, width)
            })
            .collect();
        self.write(&format!("| {} |", delimiters.join(" | ")));
        self.newline();
        for row in &table.rows {
            self.table_row(row, &widths);
        }
        self.end_block();
    }

    fn table_row(&mut self, row: &[String], widths: &[usize]) {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, &width)| {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                let padding = width.saturating_sub(cell.chars().count());
                format!("{cell}{}", " ".repeat(padding))
            })
            .collect();
        self.write(&format!("| {} |", cells.join(" | ")));
        self.newline();
    }

    // ------------------------------------------------------------------------
    // Inlines
    // ------------------------------------------------------------------------

    fn code_span(&mut self, code: &str) {
        let code = if self.table.as_ref().is_some_and(|t| t.cell.is_some()) {
            code.replace('|', "\\|")
        } else {
            code.to_string()
        };
        let ticks = "`".repeat(calculate_inline_code_ticks(&code));
        let needs_padding = code.starts_with('`')
            || code.ends_with('`')
            || (code.starts_with(' ') && code.ends_with(' ') && !code.trim().is_empty());
        let pad = if needs_padding { " " } else { "" };
        self.write(&format!("{ticks}{pad}{code}{pad}{ticks}"));
    }

    fn start_link(&mut self, link_type: LinkType, dest: &str, title: &str, image: bool) {
        if matches!(link_type, LinkType::Autolink | LinkType::Email) && !image {
            self.write("<");
            self.links.push(LinkFrame::Autolink);
            return;
        }
        if !image {
            match self.table.as_mut().and_then(|t| t.cell.as_mut()) {
                Some(cell) => escape_trailing_bang(cell),
                None => escape_trailing_bang(&mut self.output),
            }
        }
        self.write(if image { "![" } else { "[" });
        self.links.push(LinkFrame::Inline {
            dest: dest.to_string(),
            title: title.to_string(),
        });
    }

    fn end_link(&mut self) {
        match self.links.pop() {
            Some(LinkFrame::Autolink) => self.write(">"),
            Some(LinkFrame::Inline { dest, title }) => {
                let mut target = format_destination(&dest);
                if !title.is_empty() {
                    target.push_str(&format!(
                        " \"{}\"",
                        title.replace('\\', "\\\\").replace('"', "\\\"")
                    ));
                }
                self.write(&format!("]({target})"));
            }
            None => {}
        }
    }

    fn soft_break(&mut self) {
        if self.inline_only || self.in_heading {
            self.write(" ");
        } else {
            self.newline();
        }
    }

    fn hard_break(&mut self) {
        if self.inline_only || self.in_heading {
            self.write(" ");
        } else {
            self.write("\\");
            self.newline();
        }
    }

    // ------------------------------------------------------------------------
    // Event dispatch
    // ------------------------------------------------------------------------

    fn events(&mut self, events: &[Event<'_>]) {
        // pulldown-cmark splits text around escapes and entities; escaping
        // needs whole runs to see line-start context.
        let mut pending = String::new();
        for (i, event) in events.iter().enumerate() {
            if self.code.is_none() && self.html.is_none() {
                if let Event::Text(text) = event {
                    pending.push_str(text);
                    continue;
                }
                if !pending.is_empty() {
                    self.text(&std::mem::take(&mut pending));
                }
            }

            if let Some((_, text)) = self.code.as_mut() {
                match event {
                    Event::Text(t) => text.push_str(t),
                    Event::End(TagEnd::CodeBlock) => {
                        if let Some((info, text)) = self.code.take() {
                            self.code_block(&info, &text);
                        }
                    }
                    _ => {}
                }
                continue;
            }
            if let Some(html) = self.html.as_mut() {
                match event {
                    Event::Html(t) | Event::Text(t) => html.push_str(t),
                    Event::End(TagEnd::HtmlBlock) => {
                        if let Some(html) = self.html.take() {
                            self.html_block(&html);
                        }
                    }
                    _ => {}
                }
                continue;
            }
            match event {
                Event::Start(tag) => self.start_tag(tag, &events[i..]),
                Event::End(tag) => self.end_tag(*tag),
                Event::Text(text) => self.text(text),
                Event::Code(code) => self.code_span(code),
                Event::InlineMath(math) => self.write(&format!("${math}$")),
                Event::DisplayMath(math) => self.write(&format!("$${math}$$")),
                Event::Html(html) | Event::InlineHtml(html) => self.write(html),
                Event::FootnoteReference(label) => self.write(&format!("[^{label}]")),
                Event::SoftBreak => self.soft_break(),
                Event::HardBreak => self.hard_break(),
                Event::Rule => self.rule(),
                Event::TaskListMarker(checked) => {
                    self.write(if *checked { "[x] " } else { "[ ] " })
                }
            }
        }
        if !pending.is_empty() {
            self.text(&pending);
        }
    }

    fn start_tag(&mut self, tag: &Tag<'_>, remaining: &[Event<'_>]) {
        match tag {
            Tag::Paragraph => self.start_block(),
            Tag::Heading { level, .. } => self.start_heading(*level),
            Tag::BlockQuote(_) => self.start_quote(),
            Tag::CodeBlock(kind) => {
                self.start_block();
                let info = match kind {
                    CodeBlockKind::Fenced(info) => info.trim().to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.code = Some((info, String::new()));
            }
            Tag::HtmlBlock => {
                self.start_block();
                self.html = Some(String::new());
            }
            Tag::List(first_number) => self.start_list(*first_number, list_is_loose(remaining)),
            Tag::Item => self.start_item(),
            Tag::Table(alignments) => {
                self.start_block();
                self.table = Some(TableContext {
                    alignments: alignments.clone(),
                    ..TableContext::default()
                });
            }
            Tag::TableHead | Tag::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    table.row.clear();
                }
            }
            Tag::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    table.cell = Some(String::new());
                }
            }
            Tag::Emphasis => self.write("*"),
            Tag::Strong => self.write("**"),
            Tag::Strikethrough => self.write("~~"),
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => self.start_link(*link_type, dest_url, title, false),
            Tag::Image {
                link_type,
                dest_url,
                title,
                ..
            } => self.start_link(*link_type, dest_url, title, true),
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.end_block(),
            TagEnd::Heading(_) => self.end_heading(),
            TagEnd::BlockQuote(_) => self.end_quote(),
            TagEnd::List(_) => self.end_list(),
            TagEnd::Item => self.end_item(),
            TagEnd::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    let cell = table.cell.take().unwrap_or_default();
                    table.row.push(cell);
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.head = std::mem::take(&mut table.row);
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    let row = std::mem::take(&mut table.row);
                    table.rows.push(row);
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.table(table);
                }
            }
            TagEnd::Emphasis => self.write("*"),
            TagEnd::Strong => self.write("**"),
            TagEnd::Strikethrough => self.write("~~"),
            TagEnd::Link | TagEnd::Image => self.end_link(),
            _ => {}
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Check whether the list starting at `events[0]` is loose.
///
/// pulldown-cmark wraps item content in paragraphs only for loose lists.
fn list_is_loose(events: &[Event<'_>]) -> bool {
    let mut depth = 0usize;
    for event in events {
        match event {
            Event::Start(tag) => {
                // depth 0 is the list, 1 an item, 2 the item's own blocks
                if depth == 2 && matches!(tag, Tag::Paragraph) {
                    return true;
                }
                depth += 1;
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    false
}

fn alignment_marker(alignment: Alignment, width: usize) -> String {
    match alignment {
        Alignment::None => "-".repeat(width),
        Alignment::Left => format!(":{}", "-".repeat(width - 1)),
        Alignment::Center => format!(":{}:", "-".repeat(width - 2)),
        Alignment::Right => format!("{}:", "-".repeat(width - 1)),
    }
}

fn format_destination(dest: &str) -> String {
    let needs_brackets = dest.is_empty()
        || dest.starts_with('<')
        || dest.chars().any(|c| c.is_whitespace() || c.is_control())
        || !parens_balanced(dest);
    if needs_brackets {
        format!("<{}>", dest.replace('<', "\\<").replace('>', "\\>"))
    } else {
        dest.to_string()
    }
}

fn parens_balanced(s: &str) -> bool {
    let mut depth = 0i32;
    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

// ============================================================================
// Tests
// ============================================================================
