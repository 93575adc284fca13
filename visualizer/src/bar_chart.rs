use std::fmt::Write;
use trendscope_core::KeywordRanking;

const BAR: char = '█';

/// Horizontal bar chart, one row per keyword in ranking order.
///
/// The longest bar spans `width` cells; every non-zero count gets at least one.
pub fn render_bar_chart(ranking: &KeywordRanking, width: usize) -> String {
    if ranking.is_empty() {
        return "(no keywords)\n".to_string();
    }

    let label_width = ranking.iter().map(|e| e.word.len()).max().unwrap_or(0);
    let max_count = ranking.max_count();
    let mut out = String::new();

    for entry in ranking {
        let cells = if max_count == 0 || entry.count == 0 {
            0
        } else {
            let scaled = (entry.count as f64 / max_count as f64 * width as f64).round() as usize;
            scaled.max(1)
        };
        let bar: String = std::iter::repeat(BAR).take(cells).collect();
        let _ = writeln!(
            out,
            "{:<label_width$}  {} {}",
            entry.word,
            bar,
            entry.count,
            label_width = label_width
        );
    }

    out
}
