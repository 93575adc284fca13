//! Text and SVG renderings of a keyword ranking.

pub mod bar_chart;
pub mod word_cloud;

pub use bar_chart::render_bar_chart;
pub use word_cloud::{render_word_cloud_svg, WordCloudOptions};
