//! Minimal PDF 1.4 writer for text reports.
//!
//! Uses the standard Helvetica faces with WinAnsi encoding, so no fonts are
//! embedded. Characters outside that encoding are approximated or replaced
//! with `?`.

use crate::document::RequirementDocument;
use crate::model::WorkItem;
use std::fmt::Write as _;

const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const MARGIN: f32 = 28.35;
/// Space reserved at the bottom of every page for the footer.
const FOOTER_SPACE: f32 = 42.5;

/// Helvetica advance widths (1/1000 em) for ASCII 32..=126.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    278, 278, 584, 584, 584, 556, 1015, // :;<=>?@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    278, 278, 278, 469, 556, 333, // [\]^_`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
    334, 260, 334, 584, // {|}~
];

const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    333, 333, 584, 584, 584, 611, 975, // :;<=>?@
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    333, 278, 333, 584, 556, 333, // [\]^_`
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a-m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n-z
    389, 280, 389, 584, // {|}~
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
    Italic,
}

impl Font {
    fn resource(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
            Font::Italic => "F3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Page-by-page text layout. Every page gets the title as a header and a
/// `Page N` footer.
pub struct PdfDocument {
    title: String,
    pages: Vec<String>,
    current: String,
    page_no: usize,
    y: f32,
    font: Font,
    size: f32,
}

impl PdfDocument {
    pub fn new(title: impl Into<String>) -> Self {
        let mut doc = Self {
            title: title.into(),
            pages: Vec::new(),
            current: String::new(),
            page_no: 0,
            y: MARGIN,
            font: Font::Regular,
            size: 10.0,
        };
        doc.add_page();
        doc
    }

    pub fn page_count(&self) -> usize {
        self.page_no
    }

    pub fn set_font(&mut self, font: Font, size: f32) {
        self.font = font;
        self.size = size;
    }

    fn content_width() -> f32 {
        PAGE_WIDTH - 2.0 * MARGIN
    }

    fn bottom_limit() -> f32 {
        PAGE_HEIGHT - FOOTER_SPACE
    }

    fn add_page(&mut self) {
        if self.page_no > 0 {
            self.finish_page();
        }
        self.page_no += 1;
        self.y = MARGIN;

        let (font, size) = (self.font, self.size);
        self.set_font(Font::Bold, 15.0);
        let title = self.title.clone();
        self.draw_line(&title, 28.35, Align::Center);
        self.y += 28.35;
        self.set_font(font, size);
    }

    fn finish_page(&mut self) {
        let (font, size) = (self.font, self.size);
        self.set_font(Font::Italic, 8.0);
        self.y = PAGE_HEIGHT - FOOTER_SPACE;
        let footer = format!("Page {}", self.page_no);
        self.draw_line(&footer, 28.35, Align::Center);
        self.set_font(font, size);
        self.pages.push(std::mem::take(&mut self.current));
    }

    fn ensure_space(&mut self, height: f32) {
        if self.y + height > Self::bottom_limit() {
            self.add_page();
        }
    }

    /// Draw one line of text in a box of `height` at the cursor, without moving it.
    fn draw_line(&mut self, text: &str, height: f32, align: Align) {
        let x = match align {
            Align::Left => MARGIN,
            Align::Center => {
                MARGIN + ((Self::content_width() - text_width(text, self.font, self.size)) / 2.0).max(0.0)
            }
        };
        let baseline = self.y + height / 2.0 + self.size * 0.3;
        let _ = writeln!(
            self.current,
            "BT /{} {:.2} Tf {:.2} {:.2} Td ({}) Tj ET",
            self.font.resource(),
            self.size,
            x,
            PAGE_HEIGHT - baseline,
            encode_text(text)
        );
    }

    /// A single line followed by a line break.
    pub fn cell(&mut self, text: &str, height: f32) {
        self.ensure_space(height);
        self.draw_line(text, height, Align::Left);
        self.y += height;
    }

    pub fn centered_cell(&mut self, text: &str, height: f32) {
        self.ensure_space(height);
        self.draw_line(text, height, Align::Center);
        self.y += height;
    }

    /// Word-wrapped text, breaking pages as needed.
    pub fn multi_cell(&mut self, text: &str, line_height: f32) {
        for line in wrap_text(text, Self::content_width(), self.font, self.size) {
            self.cell(&line, line_height);
        }
    }

    /// Vertical space.
    pub fn ln(&mut self, height: f32) {
        self.y += height;
        if self.y > Self::bottom_limit() {
            self.add_page();
        }
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.finish_page();
        serialize(&self.pages)
    }
}

/// Oblique shares the regular metrics.
fn char_width(c: char, font: Font) -> f32 {
    let widths = match font {
        Font::Bold => &HELVETICA_BOLD_WIDTHS,
        Font::Regular | Font::Italic => &HELVETICA_WIDTHS,
    };
    match c as u32 {
        code @ 32..=126 => widths[(code - 32) as usize] as f32,
        _ => 556.0,
    }
}

pub fn text_width(text: &str, font: Font, size: f32) -> f32 {
    text.chars().map(|c| char_width(c, font)).sum::<f32>() * size / 1000.0
}

/// Split `text` into lines no wider than `max_width`. Explicit newlines are
/// kept; words longer than a line are broken by character.
pub fn wrap_text(text: &str, max_width: f32, font: Font, size: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.replace('\t', "    ").split('\n') {
        let mut line = String::new();
        for word in paragraph.split(' ') {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", line, word)
            };
            if text_width(&candidate, font, size) <= max_width {
                line = candidate;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            for c in word.chars() {
                line.push(c);
                if text_width(&line, font, size) > max_width {
                    line.pop();
                    lines.push(std::mem::take(&mut line));
                    line.push(c);
                }
            }
        }
        lines.push(line);
    }
    lines
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        '\u{2018}' | '\u{2019}' => b'\'',
        '\u{201C}' | '\u{201D}' => b'"',
        '\u{2013}' | '\u{2014}' => b'-',
        '\u{2022}' => 0x95,
        '\u{20AC}' => 0x80,
        c if (c as u32) >= 0xA0 && (c as u32) <= 0xFF => c as u32 as u8,
        c if (c as u32) >= 0x20 && (c as u32) < 0x7F => c as u8,
        _ => b'?',
    }
}

/// Escape text for a PDF literal string; non-ASCII bytes become octal escapes.
fn encode_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '\u{2026}' {
            out.push_str("...");
            continue;
        }
        match win_ansi_byte(c) {
            b'(' => out.push_str("\\("),
            b')' => out.push_str("\\)"),
            b'\\' => out.push_str("\\\\"),
            b if b.is_ascii() => out.push(b as char),
            b => {
                let _ = write!(out, "\\{:03o}", b);
            }
        }
    }
    out
}

fn serialize(pages: &[String]) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    let mut offsets: Vec<usize> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");

    let mut object = |out: &mut Vec<u8>, body: String| {
        offsets.push(out.len());
        let id = offsets.len();
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", id, body).as_bytes());
    };

    let first_page_id = 6;
    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", first_page_id + 2 * i))
        .collect();

    object(&mut out, "<< /Type /Catalog /Pages 2 0 R >>".to_string());
    object(
        &mut out,
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        ),
    );
    for base in ["Helvetica", "Helvetica-Bold", "Helvetica-Oblique"] {
        object(
            &mut out,
            format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                base
            ),
        );
    }
    for (i, content) in pages.iter().enumerate() {
        let page_id = first_page_id + 2 * i;
        object(
            &mut out,
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R /F3 5 0 R >> >> /Contents {} 0 R >>",
                PAGE_WIDTH,
                PAGE_HEIGHT,
                page_id + 1
            ),
        );
        object(
            &mut out,
            format!(
                "<< /Length {} >>\nstream\n{}endstream",
                content.len(),
                content
            ),
        );
    }

    let xref_offset = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", offsets.len() + 1);
    for offset in &offsets {
        let _ = writeln!(xref, "{:010} 00000 n ", offset);
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        offsets.len() + 1,
        xref_offset
    );
    out.extend_from_slice(xref.as_bytes());
    out
}

/// Report of a converter run: the detailed requirement, then each item.
pub fn work_items_report(items: &[WorkItem], detailed_requirement: &str) -> Vec<u8> {
    let mut pdf = PdfDocument::new("Work Items Report");

    pdf.set_font(Font::Bold, 12.0);
    pdf.cell("Detailed Requirement:", 28.35);
    pdf.set_font(Font::Regular, 10.0);
    pdf.multi_cell(detailed_requirement, 14.17);
    pdf.ln(28.35);

    pdf.set_font(Font::Bold, 12.0);
    pdf.cell("Work Items:", 28.35);

    for (i, item) in items.iter().enumerate() {
        pdf.set_font(Font::Bold, 11.0);
        pdf.multi_cell(&format!("Item {}: {}", i + 1, item.summary), 28.35);

        pdf.set_font(Font::Bold, 10.0);
        pdf.cell("Description:", 14.17);
        pdf.set_font(Font::Regular, 10.0);
        pdf.multi_cell(&item.description, 14.17);

        pdf.set_font(Font::Bold, 10.0);
        pdf.cell("Acceptance Criteria:", 14.17);
        pdf.set_font(Font::Regular, 10.0);
        pdf.multi_cell(&item.acceptance_criteria, 14.17);

        pdf.cell(&format!("Story Points: {}", item.story_points), 14.17);
        pdf.cell(&format!("Priority: {}", item.priority), 14.17);
        pdf.multi_cell(&format!("Labels: {}", item.labels.join(", ")), 14.17);
        pdf.ln(14.17);
    }

    pdf.finish()
}

/// A requirement document: metadata block, then the body with `#` headings
/// and blank-line separated paragraphs.
pub fn document_report(document: &RequirementDocument) -> Vec<u8> {
    let mut pdf = PdfDocument::new("Requirements Document");

    pdf.set_font(Font::Regular, 10.0);
    let metadata = [
        ("Requirement Type:", document.kind.to_string()),
        (
            "Generated On:",
            document.generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ),
        ("Model Used:", document.model_id.clone()),
        ("Input Method:", document.input_method.to_string()),
        ("Document ID:", document.id.clone()),
    ];
    for (label, value) in metadata {
        pdf.set_font(Font::Bold, 10.0);
        pdf.cell(label, 14.17);
        pdf.set_font(Font::Regular, 10.0);
        pdf.multi_cell(&value, 14.17);
    }
    pdf.ln(20.0);

    pdf.set_font(Font::Bold, 12.0);
    pdf.cell("Generated Requirements", 22.0);

    for paragraph in document.text.split("\n\n") {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }
        if paragraph.starts_with('#') {
            pdf.set_font(Font::Bold, 12.0);
            pdf.multi_cell(paragraph.replace('#', "").trim(), 18.0);
        } else {
            pdf.set_font(Font::Regular, 10.0);
            pdf.multi_cell(paragraph, 14.0);
        }
        pdf.ln(6.0);
    }

    pdf.ln(20.0);
    pdf.set_font(Font::Italic, 8.0);
    pdf.centered_cell("Generated by reqsmith", 12.0);

    pdf.finish()
}
