//! Certificate rendering with `printpdf`
//!
//! One landscape A4 page. Text is set in embedded TrueType faces, written as
//! Identity-H glyph ids with a ToUnicode map, so any script a face covers
//! survives into the PDF. DejaVu Sans ships with the binary; extra faces
//! (Devanagari, CJK, ...) are appended as fallbacks and picked per character.

use owned_ttf_parser::{AsFaceRef, OwnedFace};
use printpdf::{Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb};

use crate::domain::entity::certificate::Certificate;
use crate::domain::services::CertificateRenderer;
use crate::error::{AcademyError, AcademyResult};

static DEJAVU_SANS: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
static DEJAVU_SANS_BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

const PAGE_WIDTH_MM: f32 = 297.0;
const PAGE_HEIGHT_MM: f32 = 210.0;
const MARGIN_MM: f32 = 12.0;
const TEXT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 4.0 * MARGIN_MM;
const MIN_FONT_SIZE: f32 = 10.0;

const PT_TO_MM: f32 = 0.3528;

const REGULAR: usize = 0;
const BOLD: usize = 1;

#[derive(Debug, Clone, PartialEq)]
struct TextLine {
    text: String,
    size: f32,
    y_mm: f32,
    bold: bool,
}

impl TextLine {
    fn new(text: impl Into<String>, size: f32, y_mm: f32, bold: bool) -> Self {
        Self {
            text: text.into(),
            size,
            y_mm,
            bold,
        }
    }
}

fn layout(certificate: &Certificate) -> Vec<TextLine> {
    vec![
        TextLine::new(&certificate.brand, 20.0, 172.0, true),
        TextLine::new("Certificate of Completion", 34.0, 150.0, true),
        TextLine::new("This certifies that", 14.0, 132.0, false),
        TextLine::new(&certificate.learner_name, 30.0, 116.0, true),
        TextLine::new("has successfully completed the course", 14.0, 100.0, false),
        TextLine::new(&certificate.course_title, 24.0, 86.0, true),
        TextLine::new(
            format!("Instructor: {}", certificate.instructor_name),
            14.0,
            56.0,
            false,
        ),
        TextLine::new(
            format!("Issued on {}", certificate.issued_on_text()),
            12.0,
            44.0,
            false,
        ),
    ]
}

/// A parsed TrueType face; the same bytes are embedded into the PDF.
#[derive(Debug)]
struct FontFace {
    face: OwnedFace,
}

impl FontFace {
    fn parse(bytes: Vec<u8>) -> AcademyResult<Self> {
        let face = OwnedFace::from_vec(bytes, 0).map_err(render_error)?;
        Ok(Self { face })
    }

    fn covers(&self, ch: char) -> bool {
        self.face.as_face_ref().glyph_index(ch).is_some()
    }

    /// Horizontal advance in em units
    fn advance(&self, ch: char) -> f32 {
        let face = self.face.as_face_ref();
        let advance = face
            .glyph_index(ch)
            .and_then(|id| face.glyph_hor_advance(id))
            .unwrap_or(0);
        f32::from(advance) / f32::from(face.units_per_em().max(1))
    }

    fn bytes(&self) -> &[u8] {
        self.face.as_slice()
    }
}

/// Consecutive characters set in the same face
#[derive(Debug, Clone, PartialEq)]
struct Run {
    face: usize,
    text: String,
}

/// Split `text` into runs, each character going to the first face in
/// `chain` that covers it. Fails with the first character nothing covers.
fn split_runs(
    text: &str,
    chain: &[usize],
    covers: impl Fn(usize, char) -> bool,
) -> Result<Vec<Run>, char> {
    let mut runs: Vec<Run> = Vec::new();
    for ch in text.chars() {
        let face = chain
            .iter()
            .copied()
            .find(|&face| covers(face, ch))
            .ok_or(ch)?;

        match runs.last_mut() {
            Some(run) if run.face == face => run.text.push(ch),
            _ => runs.push(Run {
                face,
                text: ch.to_string(),
            }),
        }
    }
    Ok(runs)
}

fn frame(inset: f32) -> Line {
    let (left, bottom) = (inset, inset);
    let (right, top) = (PAGE_WIDTH_MM - inset, PAGE_HEIGHT_MM - inset);

    Line {
        points: vec![
            (Point::new(Mm(left), Mm(bottom)), false),
            (Point::new(Mm(right), Mm(bottom)), false),
            (Point::new(Mm(right), Mm(top)), false),
            (Point::new(Mm(left), Mm(top)), false),
        ],
        is_closed: true,
    }
}

fn render_error(err: impl std::fmt::Display) -> AcademyError {
    AcademyError::Render(err.to_string())
}

/// Renders certificates with the bundled DejaVu Sans faces plus any
/// fallback faces configured at startup.
#[derive(Debug)]
pub struct PrintPdfRenderer {
    /// `[regular, bold, fallbacks...]`
    faces: Vec<FontFace>,
}

impl PrintPdfRenderer {
    pub fn new() -> AcademyResult<Self> {
        Ok(Self {
            faces: vec![
                FontFace::parse(DEJAVU_SANS.to_vec())?,
                FontFace::parse(DEJAVU_SANS_BOLD.to_vec())?,
            ],
        })
    }

    /// Append TrueType faces tried, in order, for characters the bundled
    /// faces lack.
    pub fn with_fallback_fonts(mut self, fonts: Vec<Vec<u8>>) -> AcademyResult<Self> {
        for bytes in fonts {
            self.faces.push(FontFace::parse(bytes)?);
        }
        Ok(self)
    }

    fn chain(&self, bold: bool) -> Vec<usize> {
        let primary = if bold { BOLD } else { REGULAR };
        std::iter::once(primary)
            .chain(2..self.faces.len())
            .collect()
    }

    fn runs(&self, line: &TextLine) -> AcademyResult<Vec<Run>> {
        split_runs(&line.text, &self.chain(line.bold), |face, ch| {
            self.faces[face].covers(ch)
        })
        .map_err(|ch| {
            AcademyError::Render(format!(
                "No certificate font covers {ch:?} (U+{:04X})",
                u32::from(ch)
            ))
        })
    }

    fn width_mm(&self, runs: &[Run], size: f32) -> f32 {
        let ems: f32 = runs
            .iter()
            .flat_map(|run| run.text.chars().map(move |ch| self.faces[run.face].advance(ch)))
            .sum();
        ems * size * PT_TO_MM
    }

    /// Shrink long lines (course titles) until they fit between the borders
    fn fit_size(&self, runs: &[Run], size: f32) -> f32 {
        let width = self.width_mm(runs, size);
        if width <= TEXT_WIDTH_MM {
            size
        } else {
            (size * TEXT_WIDTH_MM / width).max(MIN_FONT_SIZE)
        }
    }

    fn write_line(
        &self,
        layer: &PdfLayerReference,
        fonts: &[Option<IndirectFontRef>],
        line: &TextLine,
        runs: &[Run],
    ) -> AcademyResult<()> {
        let size = self.fit_size(runs, line.size);
        let width = self.width_mm(runs, size);
        let x = ((PAGE_WIDTH_MM - width) / 2.0).max(2.0 * MARGIN_MM);

        layer.begin_text_section();
        layer.set_text_cursor(Mm(x), Mm(line.y_mm));
        for run in runs {
            let font = fonts[run.face]
                .as_ref()
                .ok_or_else(|| render_error("Font was not embedded"))?;
            layer.set_font(font, size);
            layer.write_text(run.text.as_str(), font);
        }
        layer.end_text_section();
        Ok(())
    }
}

impl CertificateRenderer for PrintPdfRenderer {
    fn render(&self, certificate: &Certificate) -> AcademyResult<Vec<u8>> {
        let lines = layout(certificate);
        let runs = lines
            .iter()
            .map(|line| self.runs(line))
            .collect::<AcademyResult<Vec<_>>>()?;

        let title = format!("{} - {}", certificate.brand, certificate.course_title);
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Certificate");
        let layer = doc.get_page(page).get_layer(layer);

        // Embed only the faces this certificate uses.
        let mut fonts: Vec<Option<IndirectFontRef>> = vec![None; self.faces.len()];
        for run in runs.iter().flatten() {
            if fonts[run.face].is_none() {
                let font = doc
                    .add_external_font(self.faces[run.face].bytes())
                    .map_err(render_error)?;
                fonts[run.face] = Some(font);
            }
        }

        layer.set_outline_color(Color::Rgb(Rgb::new(0.11, 0.23, 0.45, None)));
        layer.set_outline_thickness(3.0);
        layer.add_line(frame(MARGIN_MM));
        layer.set_outline_thickness(0.8);
        layer.add_line(frame(MARGIN_MM + 4.0));

        layer.set_fill_color(Color::Rgb(Rgb::new(0.1, 0.1, 0.1, None)));
        for (line, line_runs) in lines.iter().zip(&runs) {
            self.write_line(&layer, &fonts, line, line_runs)?;
        }

        doc.save_to_bytes().map_err(render_error)
    }
}
