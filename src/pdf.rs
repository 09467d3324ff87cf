//! Paints a [ReportDocument] onto A4 pages.

use std::{fs::File, io::BufWriter, path::Path};

use printpdf::{
	Actions, BorderArray, BuiltinFont, Color, ColorArray, HighlightingMode, IndirectFontRef, Line as PdfLine, LinkAnnotation, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Point, Polygon, Rect,
	path::{PaintMode, WindingOrder},
};

use crate::{
	error::RenderError,
	presentation::Rgb,
	report::{Block, IssueBlock, Line, ReportDocument},
};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const INDENT: f32 = 6.0;
const PT_TO_MM: f32 = 0.3528;
/// Rough average Helvetica glyph width, in ems.
const AVG_GLYPH_EM: f32 = 0.5;

const TITLE_SIZE: f32 = 20.0;
const WEEK_SIZE: f32 = 14.0;
const ASSIGNEE_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const META_SIZE: f32 = 9.0;

fn color(rgb: Rgb) -> Color {
	Color::Rgb(printpdf::Rgb::new(f32::from(rgb.r) / 255.0, f32::from(rgb.g) / 255.0, f32::from(rgb.b) / 255.0, None))
}

fn line_height(size: f32) -> f32 {
	size * PT_TO_MM * 1.4
}

/// Greedy word wrap by estimated glyph width. Words longer than a line are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
	let max_chars = max_chars.max(1);
	let mut lines = Vec::new();
	let mut current = String::new();
	for word in text.split_whitespace() {
		let mut word: Vec<char> = word.chars().collect();
		while word.len() > max_chars {
			if !current.is_empty() {
				lines.push(std::mem::take(&mut current));
			}
			lines.push(word.drain(..max_chars).collect());
		}
		let word: String = word.into_iter().collect();
		if word.is_empty() {
			continue;
		}
		let needed = if current.is_empty() { word.chars().count() } else { current.chars().count() + 1 + word.chars().count() };
		if needed > max_chars && !current.is_empty() {
			lines.push(std::mem::take(&mut current));
		}
		if !current.is_empty() {
			current.push(' ');
		}
		current.push_str(&word);
	}
	if !current.is_empty() || lines.is_empty() {
		lines.push(current);
	}
	lines
}

struct Canvas {
	doc: PdfDocumentReference,
	layer: PdfLayerReference,
	regular: IndirectFontRef,
	bold: IndirectFontRef,
	/// Baseline of the next line, from the bottom of the page.
	y: f32,
	pages: usize,
}

impl Canvas {
	fn new(title: &str) -> Result<Self, RenderError> {
		let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
		let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(|e| RenderError::Pdf(format!("{e:?}")))?;
		let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(|e| RenderError::Pdf(format!("{e:?}")))?;
		let layer = doc.get_page(page).get_layer(layer);
		Ok(Self {
			doc,
			layer,
			regular,
			bold,
			y: PAGE_HEIGHT - MARGIN,
			pages: 1,
		})
	}

	fn new_page(&mut self) {
		let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
		self.layer = self.doc.get_page(page).get_layer(layer);
		self.y = PAGE_HEIGHT - MARGIN;
		self.pages += 1;
	}

	/// Starts a new page unless `height` more millimeters fit above the bottom margin.
	fn reserve(&mut self, height: f32) {
		if self.y - height < MARGIN {
			self.new_page();
		}
	}

	fn max_chars(size: f32, indent: f32) -> usize {
		let width = PAGE_WIDTH - 2.0 * MARGIN - indent;
		(width / (size * PT_TO_MM * AVG_GLYPH_EM)) as usize
	}

	fn text_width(text: &str, size: f32) -> f32 {
		text.chars().count() as f32 * size * PT_TO_MM * AVG_GLYPH_EM
	}

	fn put(&self, text: &str, size: f32, rgb: Rgb, x: f32, bold: bool) {
		self.layer.set_fill_color(color(rgb));
		let font = if bold { &self.bold } else { &self.regular };
		self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
	}

	/// Writes `line`, wrapped, and advances the cursor.
	fn paragraph(&mut self, line: &Line, size: f32, indent: f32, bold: bool) {
		let lh = line_height(size);
		for chunk in wrap_text(&line.text, Self::max_chars(size, indent)) {
			self.reserve(lh);
			self.y -= lh;
			self.put(&chunk, size, line.color, MARGIN + indent, bold);
		}
	}

	fn gap(&mut self, height: f32) {
		self.y -= height;
	}

	fn fill_rect(&self, rgb: Rgb, x: f32, y: f32, w: f32, h: f32) {
		let points = vec![
			(Point::new(Mm(x), Mm(y)), false),
			(Point::new(Mm(x + w), Mm(y)), false),
			(Point::new(Mm(x + w), Mm(y + h)), false),
			(Point::new(Mm(x), Mm(y + h)), false),
		];
		self.layer.set_fill_color(color(rgb));
		self.layer.add_polygon(Polygon {
			rings: vec![points],
			mode: PaintMode::Fill,
			winding_order: WindingOrder::NonZero,
		});
	}

	fn dot(&self, rgb: Rgb, cx: f32, cy: f32, r: f32) {
		const SEGMENTS: usize = 16;
		let points: Vec<(Point, bool)> = (0..SEGMENTS)
			.map(|i| {
				let angle = i as f32 / SEGMENTS as f32 * std::f32::consts::TAU;
				(Point::new(Mm(cx + r * angle.cos()), Mm(cy + r * angle.sin())), false)
			})
			.collect();
		self.layer.set_fill_color(color(rgb));
		self.layer.add_polygon(Polygon {
			rings: vec![points],
			mode: PaintMode::Fill,
			winding_order: WindingOrder::NonZero,
		});
	}

	fn rule(&mut self) {
		self.reserve(6.0);
		self.y -= 3.0;
		self.layer.set_outline_color(color(Rgb::new(180, 180, 180)));
		self.layer.set_outline_thickness(0.5);
		self.layer.add_line(PdfLine {
			points: vec![(Point::new(Mm(MARGIN), Mm(self.y)), false), (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(self.y)), false)],
			is_closed: false,
		});
		self.y -= 3.0;
	}

	fn link(&self, url: &str, x: f32, width: f32, height: f32) {
		self.layer.add_link_annotation(LinkAnnotation::new(
			Rect::new(Mm(x), Mm(self.y - 1.0), Mm(x + width), Mm(self.y + height)),
			Some(BorderArray::default()),
			Some(ColorArray::default()),
			Actions::uri(url.to_string()),
			Some(HighlightingMode::Invert),
		));
	}

	fn header(&mut self, doc: &ReportDocument) {
		self.paragraph(&Line { text: doc.title.clone(), color: Rgb::BLACK }, TITLE_SIZE, 0.0, true);
		self.gap(2.0);
		self.paragraph(&doc.generated, META_SIZE, 0.0, false);
		self.gap(3.0);

		let lh = line_height(META_SIZE);
		self.reserve(lh);
		self.y -= lh;
		let mut x = MARGIN;
		for entry in &doc.legend {
			self.dot(entry.color, x + 1.5, self.y + 1.0, 1.5);
			self.put(&entry.text, META_SIZE, entry.color, x + 4.5, false);
			x += 4.5 + Self::text_width(&entry.text, META_SIZE) + 8.0;
		}
		self.gap(6.0);
	}

	fn issue(&mut self, block: &IssueBlock) {
		let indent = INDENT * f32::from(block.indent);
		// keep the title and summary together
		self.reserve(line_height(BODY_SIZE) * 2.0);

		let lh = line_height(BODY_SIZE);
		self.y -= lh;
		let x = MARGIN + indent;
		self.dot(block.dot, x + 1.5, self.y + 1.2, 1.5);
		self.put(&block.title.text, BODY_SIZE, block.title.color, x + 5.0, true);
		self.link(&block.url, x + 5.0, Self::text_width(&block.title.text, BODY_SIZE), lh);

		let text_indent = indent + 5.0;
		if let Some(suffix) = &block.delayed {
			let summary_lines = wrap_text(&block.summary.text, Self::max_chars(BODY_SIZE, text_indent).saturating_sub(suffix.text.len()));
			let last = summary_lines.len() - 1;
			for (i, chunk) in summary_lines.iter().enumerate() {
				self.reserve(lh);
				self.y -= lh;
				self.put(chunk, BODY_SIZE, block.summary.color, MARGIN + text_indent, false);
				if i == last {
					let after = MARGIN + text_indent + Self::text_width(chunk, BODY_SIZE);
					self.put(&suffix.text, BODY_SIZE, suffix.color, after, true);
				}
			}
		} else {
			self.paragraph(&block.summary, BODY_SIZE, text_indent, false);
		}
		self.paragraph(&block.status, META_SIZE, text_indent, false);
		self.paragraph(&block.description, META_SIZE, text_indent, false);
		self.paragraph(&block.due, META_SIZE, text_indent, false);
		self.gap(3.0);
	}

	fn block(&mut self, block: &Block) {
		match block {
			Block::Week { title, highlight } => {
				let lh = line_height(WEEK_SIZE);
				self.reserve(lh + 2.0);
				self.y -= lh;
				if let Some(highlight) = highlight {
					self.fill_rect(*highlight, MARGIN - 1.0, self.y - 1.5, PAGE_WIDTH - 2.0 * MARGIN + 2.0, lh + 1.0);
				}
				self.put(&title.text, WEEK_SIZE, title.color, MARGIN, true);
				self.gap(2.0);
			}
			Block::Assignee(line) => {
				self.gap(1.0);
				self.paragraph(line, ASSIGNEE_SIZE, 0.0, true);
				self.gap(1.0);
			}
			Block::Epic(line) => self.paragraph(line, BODY_SIZE, INDENT / 2.0, true),
			Block::Issue(issue) => self.issue(issue),
			Block::Note(line) => self.paragraph(line, BODY_SIZE, 0.0, false),
			Block::Rule => self.rule(),
		}
	}

	fn save(self, path: &Path) -> Result<usize, RenderError> {
		let pages = self.pages;
		let mut writer = BufWriter::new(File::create(path)?);
		self.doc.save(&mut writer).map_err(|e| RenderError::Pdf(format!("{e:?}")))?;
		Ok(pages)
	}
}

/// Writes `doc` to `path`, returning the number of pages.
pub fn write_pdf(doc: &ReportDocument, path: &Path) -> Result<usize, RenderError> {
	let mut canvas = Canvas::new(&doc.title)?;
	canvas.header(doc);
	for block in &doc.blocks {
		canvas.block(block);
	}
	canvas.save(path)
}
