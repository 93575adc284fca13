use std::fmt::Write;
use tracing::debug;
use trendscope_core::KeywordRanking;

const PALETTE: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#17becf",
];

// Rough advance width of a glyph relative to the font size.
const GLYPH_WIDTH: f64 = 0.6;

#[derive(Debug, Clone)]
pub struct WordCloudOptions {
    pub width: u32,
    pub height: u32,
    pub min_font_size: f64,
    pub max_font_size: f64,
    pub background: String,
}

impl Default for WordCloudOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            min_font_size: 14.0,
            max_font_size: 72.0,
            background: "white".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Rect {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl Rect {
    fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    fn inside(&self, width: f64, height: f64) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.x + self.w <= width && self.y + self.h <= height
    }
}

fn font_size(count: u64, max_count: u64, options: &WordCloudOptions) -> f64 {
    if max_count == 0 {
        return options.min_font_size;
    }
    let ratio = count as f64 / max_count as f64;
    options.min_font_size + (options.max_font_size - options.min_font_size) * ratio
}

/// Walks an Archimedean spiral out from the centre until `w`×`h` fits.
fn place(w: f64, h: f64, placed: &[Rect], width: f64, height: f64) -> Option<Rect> {
    let (cx, cy) = (width / 2.0, height / 2.0);
    let max_radius = width.hypot(height) / 2.0;
    let mut theta: f64 = 0.0;

    loop {
        let radius = 2.0 * theta;
        if radius > max_radius {
            return None;
        }
        let candidate = Rect {
            x: cx + radius * theta.cos() - w / 2.0,
            y: cy + radius * theta.sin() * (height / width) - h / 2.0,
            w,
            h,
        };
        if candidate.inside(width, height) && placed.iter().all(|r| !r.overlaps(&candidate)) {
            return Some(candidate);
        }
        theta += 0.1;
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Lays the ranking out as an SVG word cloud.
///
/// Font size grows linearly with a word's count. Words are placed in ranking
/// order on a spiral from the centre; a word that no longer fits anywhere is
/// left out. Output depends only on the ranking and options.
pub fn render_word_cloud_svg(ranking: &KeywordRanking, options: &WordCloudOptions) -> String {
    let (width, height) = (options.width as f64, options.height as f64);
    let max_count = ranking.max_count();
    let mut placed: Vec<Rect> = Vec::new();
    let mut body = String::new();

    for (rank, entry) in ranking.iter().enumerate() {
        let size = font_size(entry.count, max_count, options);
        let w = size * GLYPH_WIDTH * entry.word.chars().count() as f64;
        let h = size;

        let Some(rect) = place(w, h, &placed, width, height) else {
            debug!("No room left for {:?} in word cloud", entry.word);
            continue;
        };
        placed.push(rect);

        let _ = writeln!(
            body,
            r#"  <text x="{:.1}" y="{:.1}" font-size="{:.1}" fill="{}">{}</text>"#,
            rect.x,
            rect.y + rect.h * 0.8,
            size,
            PALETTE[rank % PALETTE.len()],
            escape(&entry.word)
        );
    }

    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" "#,
            r#"viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
            "\n",
            r#"  <rect width="100%" height="100%" fill="{bg}"/>"#,
            "\n{body}</svg>\n"
        ),
        w = options.width,
        h = options.height,
        bg = escape(&options.background),
        body = body
    )
}
