use serde::Serialize;

/// One display element of a post body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Block {
    Heading1(String),
    Heading2(String),
    Heading3(String),
    ListItem(String),
    Paragraph(String),
}

/// Classify each line of `content` by its prefix.
///
/// Not Markdown: only `# `, `## `, `### ` and `- ` are
/// recognised, there is no inline markup and no nesting. Blank lines produce
/// nothing; any other line becomes a paragraph with its text untouched.
pub fn parse_blocks(content: &str) -> Vec<Block> {
    content.split('\n').filter_map(classify_line).collect()
}

fn classify_line(line: &str) -> Option<Block> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if let Some(text) = line.strip_prefix("# ") {
        Some(Block::Heading1(text.to_owned()))
    } else if let Some(text) = line.strip_prefix("## ") {
        Some(Block::Heading2(text.to_owned()))
    } else if let Some(text) = line.strip_prefix("### ") {
        Some(Block::Heading3(text.to_owned()))
    } else if let Some(text) = line.strip_prefix("- ") {
        Some(Block::ListItem(text.to_owned()))
    } else if line.trim().is_empty() {
        None
    } else {
        Some(Block::Paragraph(line.to_owned()))
    }
}

impl Block {
    pub fn to_html(&self) -> String {
        let (tag, text) = match self {
            Block::Heading1(text) => ("h1", text),
            Block::Heading2(text) => ("h2", text),
            Block::Heading3(text) => ("h3", text),
            Block::ListItem(text) => ("li", text),
            Block::Paragraph(text) => ("p", text),
        };
        format!("<{tag}>{}</{tag}>", escape_html(text))
    }
}

pub fn to_html(blocks: &[Block]) -> String {
    blocks.iter().map(Block::to_html).collect::<Vec<_>>().join("\n")
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
