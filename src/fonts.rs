use std::collections::{HashMap, HashSet};
use std::path::Path;

use memmap2::Mmap;
use pdf_writer::types::{CidFontType, FontFlags, SystemInfo, UnicodeCmap};
use pdf_writer::{Name, Pdf, Rect, Ref, Str};
use ttf_parser::Face;

use crate::error::{Error, RenderError};
use crate::model::FontWeight;

const BULLET: char = '\u{2022}';

/// Text width at a font size, in points.
pub trait Measure {
    fn measure(&self, text: &str, font_size: f32) -> Result<f32, RenderError>;
}

impl<F> Measure for F
where
    F: Fn(&str, f32) -> Result<f32, RenderError>,
{
    fn measure(&self, text: &str, font_size: f32) -> Result<f32, RenderError> {
        self(text, font_size)
    }
}

/// Helvetica advance widths at 1000 units/em for ASCII 32..=126.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // space to /
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,                               // 0-9
    278, 278, 584, 584, 584, 556, 1015,                                             // : to @
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,                // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,                // N-Z
    278, 278, 278, 469, 556, 333,                                                   // [ to `
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,                // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,                // n-z
    334, 260, 334, 584,                                                             // { to ~
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

enum FaceData {
    Builtin,
    TrueType { data: Mmap, face_index: u32 },
}

/// One font variant: its metrics and, for TrueType faces, the file contents
/// needed to embed it.
pub struct FontFace {
    ps_name: String,
    data: FaceData,
    widths_1000: HashMap<char, f32>,
}

impl FontFace {
    fn builtin(weight: FontWeight) -> Self {
        let (ps_name, table) = match weight {
            FontWeight::Regular => ("Helvetica", &HELVETICA_WIDTHS),
            FontWeight::Bold => ("Helvetica-Bold", &HELVETICA_BOLD_WIDTHS),
        };
        let mut widths_1000: HashMap<char, f32> = (' '..='~')
            .zip(table.iter())
            .map(|(ch, &w)| (ch, w as f32))
            .collect();
        widths_1000.insert(BULLET, 350.0);
        Self {
            ps_name: ps_name.to_string(),
            data: FaceData::Builtin,
            widths_1000,
        }
    }

    /// Load a TrueType/OpenType face (the first face of a collection).
    pub fn load(path: &Path) -> Result<Self, Error> {
        let file = std::fs::File::open(path)?;
        let data = unsafe { Mmap::map(&file) }?;
        let face_index = 0;

        let (ps_name, widths_1000) = {
            let face = Face::parse(&data, face_index)
                .map_err(|e| Error::Font(format!("{}: {e}", path.display())))?;
            let units = face.units_per_em() as f32;
            let widths_1000: HashMap<char, f32> = (' '..='~')
                .chain([BULLET])
                .filter_map(|ch| {
                    let gid = face.glyph_index(ch)?;
                    let adv = face.glyph_hor_advance(gid)?;
                    Some((ch, adv as f32 / units * 1000.0))
                })
                .collect();
            let ps_name = postscript_name(&face).unwrap_or_else(|| {
                path.file_stem()
                    .map(|s| s.to_string_lossy().replace(' ', ""))
                    .unwrap_or_else(|| "EmbeddedFont".to_string())
            });
            (ps_name, widths_1000)
        };

        if widths_1000.is_empty() {
            return Err(Error::Font(format!(
                "{}: no glyphs for printable ASCII",
                path.display()
            )));
        }

        log::debug!(
            "Loaded font {ps_name} from {} ({} measurable chars)",
            path.display(),
            widths_1000.len()
        );

        Ok(Self {
            ps_name,
            data: FaceData::TrueType { data, face_index },
            widths_1000,
        })
    }

    pub fn name(&self) -> &str {
        &self.ps_name
    }

    pub fn supports(&self, ch: char) -> bool {
        self.widths_1000.contains_key(&ch)
    }
}

impl Measure for FontFace {
    fn measure(&self, text: &str, font_size: f32) -> Result<f32, RenderError> {
        let mut total = 0.0f32;
        for ch in text.chars() {
            let Some(&w) = self.widths_1000.get(&ch) else {
                return Err(RenderError::UnsupportedGlyph {
                    ch,
                    text: text.to_string(),
                });
            };
            total += w * font_size / 1000.0;
        }
        Ok(total)
    }
}

fn postscript_name(face: &Face) -> Option<String> {
    for name in face.names() {
        if name.name_id == ttf_parser::name_id::POST_SCRIPT_NAME
            && name.is_unicode()
            && let Some(s) = name.to_string()
        {
            return Some(s.replace(' ', ""));
        }
    }
    None
}

/// The regular and bold faces used by a report.
pub struct FontSet {
    regular: FontFace,
    bold: FontFace,
}

impl FontSet {
    /// The standard Helvetica pair; needs no font files.
    pub fn builtin() -> Self {
        Self {
            regular: FontFace::builtin(FontWeight::Regular),
            bold: FontFace::builtin(FontWeight::Bold),
        }
    }

    pub fn from_files(regular: &Path, bold: &Path) -> Result<Self, Error> {
        Ok(Self {
            regular: FontFace::load(regular)?,
            bold: FontFace::load(bold)?,
        })
    }

    pub fn face(&self, weight: FontWeight) -> &FontFace {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }
}

impl Default for FontSet {
    fn default() -> Self {
        Self::builtin()
    }
}

/// A font registered in a PDF under a resource name.
pub(crate) struct PdfFont {
    pub(crate) pdf_name: String,
    pub(crate) font_ref: Ref,
    char_to_gid: Option<HashMap<char, u16>>,
}

impl PdfFont {
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match &self.char_to_gid {
            Some(map) => encode_as_gids(text, map),
            None => to_winansi_bytes(text),
        }
    }
}

/// Encode for a standard font with WinAnsiEncoding. Only ASCII and the
/// bullet are measurable with the builtin faces, so nothing else can occur.
fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .filter_map(|c| match c {
            ' '..='~' => Some(c as u8),
            BULLET => Some(0x95),
            _ => None,
        })
        .collect()
}

/// Encode UTF-8 text as big-endian 2-byte glyph IDs for CIDFont content streams.
fn encode_as_gids(text: &str, char_to_gid: &HashMap<char, u16>) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for ch in text.chars() {
        let gid = char_to_gid.get(&ch).copied().unwrap_or(0);
        out.push((gid >> 8) as u8);
        out.push((gid & 0xFF) as u8);
    }
    out
}

const IDENTITY: SystemInfo<'static> = SystemInfo {
    registry: Str(b"Adobe"),
    ordering: Str(b"Identity"),
    supplement: 0,
};

/// Glyphs a report actually draws, renumbered for the subset.
struct SubsetPlan {
    remapper: subsetter::GlyphRemapper,
    gids: HashMap<char, u16>,
    /// (subset gid, advance at 1000 units/em), sorted by gid.
    advances: Vec<(u16, f32)>,
}

impl SubsetPlan {
    fn new(face: &Face, used_chars: &HashSet<char>) -> Self {
        let per_em = 1000.0 / face.units_per_em() as f32;
        let mut chars: Vec<char> = used_chars.iter().copied().collect();
        chars.sort_unstable();

        let mut plan = Self {
            remapper: subsetter::GlyphRemapper::new(),
            gids: HashMap::new(),
            advances: Vec::new(),
        };
        for ch in chars {
            let Some(glyph) = face.glyph_index(ch) else {
                continue;
            };
            let gid = plan.remapper.remap(glyph.0);
            plan.gids.insert(ch, gid);
            // Several chars can share one glyph.
            if !plan.advances.iter().any(|a| a.0 == gid) {
                let advance = face.glyph_hor_advance(glyph).unwrap_or(0);
                plan.advances.push((gid, advance as f32 * per_em));
            }
        }
        plan.advances.sort_by_key(|a| a.0);
        plan
    }

    /// Runs of consecutive gids, for the compact `W` array form.
    fn width_runs(&self) -> Vec<(u16, Vec<f32>)> {
        let mut runs: Vec<(u16, Vec<f32>)> = Vec::new();
        for &(gid, width) in &self.advances {
            match runs.last_mut() {
                Some((first, widths)) if *first as usize + widths.len() == gid as usize => {
                    widths.push(width)
                }
                _ => runs.push((gid, vec![width])),
            }
        }
        runs
    }
}

fn write_descriptor(pdf: &mut Pdf, id: Ref, ps_name: &str, face: &Face, file_ref: Ref) {
    let per_em = 1000.0 / face.units_per_em() as f32;
    let scaled = |v: i16| v as f32 * per_em;
    let bb = face.global_bounding_box();
    pdf.font_descriptor(id)
        .name(Name(ps_name.as_bytes()))
        .flags(FontFlags::NON_SYMBOLIC)
        .bbox(Rect::new(
            scaled(bb.x_min),
            scaled(bb.y_min),
            scaled(bb.x_max),
            scaled(bb.y_max),
        ))
        .italic_angle(0.0)
        .ascent(scaled(face.ascender()))
        .descent(scaled(face.descender()))
        .cap_height(face.capital_height().map_or(700.0, scaled))
        .stem_v(80.0)
        .font_file2(file_ref);
}

/// ToUnicode map so extracted report text reads back as typed.
fn write_to_unicode(pdf: &mut Pdf, id: Ref, ps_name: &str, gids: &HashMap<char, u16>) {
    let name = format!("{ps_name}-UTF16");
    let mut cmap = UnicodeCmap::new(Name(name.as_bytes()), IDENTITY);
    let mut pairs: Vec<(u16, char)> = gids.iter().map(|(&ch, &gid)| (gid, ch)).collect();
    pairs.sort_unstable();
    for (gid, ch) in pairs {
        cmap.pair(gid, ch);
    }
    pdf.stream(id, cmap.finish().as_slice());
}

/// Embed a TrueType face as a Type0 font with Identity-H encoding, subset to
/// the characters the report uses. Returns the char to subset-gid map that
/// content streams must be encoded with.
fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    ps_name: &str,
    font_data: &[u8],
    face_index: u32,
    used_chars: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Option<HashMap<char, u16>> {
    let face = Face::parse(font_data, face_index).ok()?;
    let plan = SubsetPlan::new(&face, used_chars);

    let program = match subsetter::subset(font_data, face_index, &plan.remapper) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("Subsetting {ps_name} failed ({e}), embedding the whole font");
            font_data.to_vec()
        }
    };
    let program_len = i32::try_from(program.len()).ok()?;

    let [file_ref, descriptor_ref, cid_ref, cmap_ref] = [alloc(), alloc(), alloc(), alloc()];
    pdf.stream(file_ref, &program)
        .pair(Name(b"Length1"), program_len);
    write_descriptor(pdf, descriptor_ref, ps_name, &face, file_ref);

    let runs = plan.width_runs();
    {
        let mut cid = pdf.cid_font(cid_ref);
        cid.subtype(CidFontType::Type2)
            .base_font(Name(ps_name.as_bytes()))
            .system_info(IDENTITY)
            .font_descriptor(descriptor_ref)
            .default_width(0.0)
            .cid_to_gid_map_predefined(Name(b"Identity"));
        if !runs.is_empty() {
            let mut w = cid.widths();
            for (first, widths) in runs {
                w.consecutive(first, widths);
            }
        }
    }

    write_to_unicode(pdf, cmap_ref, ps_name, &plan.gids);

    pdf.type0_font(font_ref)
        .base_font(Name(ps_name.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_ref)
        .to_unicode(cmap_ref);

    log::debug!(
        "Embedded {ps_name}: {} glyphs, {} of {} bytes",
        plan.advances.len(),
        program.len(),
        font_data.len(),
    );
    Some(plan.gids)
}

fn write_standard_font(pdf: &mut Pdf, font_ref: Ref, weight: FontWeight) {
    let base = match weight {
        FontWeight::Regular => Name(b"Helvetica"),
        FontWeight::Bold => Name(b"Helvetica-Bold"),
    };
    pdf.type1_font(font_ref)
        .base_font(base)
        .encoding_predefined(Name(b"WinAnsiEncoding"));
}

pub(crate) fn register_font(
    pdf: &mut Pdf,
    face: &FontFace,
    weight: FontWeight,
    pdf_name: String,
    alloc: &mut impl FnMut() -> Ref,
    used_chars: &HashSet<char>,
) -> PdfFont {
    let t0 = std::time::Instant::now();
    let font_ref = alloc();

    let char_to_gid = match &face.data {
        FaceData::Builtin => {
            write_standard_font(pdf, font_ref, weight);
            None
        }
        FaceData::TrueType { data, face_index } => {
            let embedded = embed_truetype(
                pdf,
                font_ref,
                &face.ps_name,
                data,
                *face_index,
                used_chars,
                alloc,
            );
            if embedded.is_none() {
                log::warn!("Could not embed {}, using Helvetica", face.ps_name);
                write_standard_font(pdf, font_ref, weight);
            }
            embedded
        }
    };

    log::debug!(
        "register_font: {} {weight:?} → {:.1}ms",
        face.ps_name,
        t0.elapsed().as_secs_f64() * 1000.0,
    );

    PdfFont {
        pdf_name,
        font_ref,
        char_to_gid,
    }
}
