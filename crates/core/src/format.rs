use crate::types::Video;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MarkupStyle {
    /// `[![title](thumbnail)](url)` blocks placed side by side.
    #[default]
    Markdown,
    /// `<a><img width="200"></a>` blocks separated by blank lines.
    Html,
}

impl MarkupStyle {
    /// Padding between the markers and the generated markup.
    pub fn padding(&self) -> &'static str {
        match self {
            MarkupStyle::Markdown => "\n\n",
            MarkupStyle::Html => "\n",
        }
    }
}

/// Render one block per video in list order.
pub fn render_videos(videos: &[Video], style: MarkupStyle) -> String {
    match style {
        MarkupStyle::Markdown => videos.iter().map(markdown_block).collect(),
        MarkupStyle::Html => videos.iter().map(html_block).collect::<Vec<_>>().join("\n"),
    }
}

fn markdown_block(video: &Video) -> String {
    format!(
        "[![{}]({})]({})",
        video.title.replace('"', "\\\""),
        video.thumbnail_url,
        video.url
    )
}

fn html_block(video: &Video) -> String {
    format!(
        "\n<a href=\"{}\" target=\"_blank\">\n  <img src=\"{}\" alt=\"{}\" width=\"200\" />\n</a>",
        escape_attribute(&video.url),
        escape_attribute(&video.thumbnail_url),
        escape_attribute(&video.title)
    )
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
