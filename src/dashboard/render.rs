//! 标记树渲染
//!
//! - [`html`]：输出 HTML，文本和属性值全部转义
//! - [`text`]：输出终端文本

use super::view::{Element, Node};

/// 渲染为 HTML 片段
pub fn html(node: &Node) -> String {
    let mut out = String::new();
    write_html(node, &mut out);
    out
}

fn write_html(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(&escape(text)),
        Node::Element(element) => {
            out.push('<');
            out.push_str(element.tag);
            for (name, value) in &element.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape(value));
                out.push('"');
            }
            out.push('>');
            for child in &element.children {
                write_html(child, out);
            }
            out.push_str("</");
            out.push_str(element.tag);
            out.push('>');
        }
    }
}

/// HTML 转义
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// 单行展示的容器 class，子元素文本以分隔符连接
const INLINE_CLASSES: [(&str, &str); 3] = [
    ("stat-card", ": "),
    ("price-info", "  "),
    ("company-item", ""),
];

/// 渲染为终端文本，每个块级元素占一行，列表项带序号
pub fn text(node: &Node) -> String {
    let mut out = TextOut::default();
    write_text(node, &mut out);
    out.lines.join("\n")
}

#[derive(Default)]
struct TextOut {
    lines: Vec<String>,
    items: usize,
}

fn write_text(node: &Node, out: &mut TextOut) {
    let element = match node {
        Node::Text(text) => {
            let text = text.trim();
            if !text.is_empty() {
                out.lines.push(text.to_string());
            }
            return;
        }
        Node::Element(element) => element,
    };

    match element.tag {
        "h2" => out.lines.push(format!("== {} ==", squash(&element.text_content()))),
        "select" => out.lines.push(select_line(element)),
        "canvas" => {
            let id = element.get_attr("id").unwrap_or("chart");
            out.lines.push(format!("[chart #{}]", id));
        }
        "pre" => out.lines.extend(element.text_content().lines().map(str::to_string)),
        _ => {
            if let Some((_, separator)) = INLINE_CLASSES.iter().find(|(class, _)| element.has_class(class)) {
                let parts: Vec<String> = element
                    .children
                    .iter()
                    .map(|child| squash(&child.text_content()))
                    .filter(|part| !part.is_empty())
                    .collect();
                let mut line = parts.join(separator);
                if element.has_class("company-item") {
                    out.items += 1;
                    let marker = if element.has_class("active") { '*' } else { ' ' };
                    line = format!("{} {}. {}", marker, out.items, line);
                }
                out.lines.push(line);
            } else if is_text_only(element) {
                let line = squash(&element.text_content());
                if !line.is_empty() {
                    out.lines.push(line);
                }
            } else {
                for child in &element.children {
                    write_text(child, out);
                }
            }
        }
    }
}

fn select_line(element: &Element) -> String {
    let options: Vec<String> = element
        .children
        .iter()
        .filter_map(Node::as_element)
        .map(|option| {
            let label = squash(&option.text_content());
            if option.get_attr("selected").is_some() {
                format!("[{}]", label)
            } else {
                label
            }
        })
        .collect();
    format!("Dates: {}", options.join(" "))
}

fn is_text_only(element: &Element) -> bool {
    element.children.iter().all(|child| matches!(child, Node::Text(_)))
}

/// 合并连续空白
fn squash(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escapes_text_and_attributes() {
        let node: Node = Element::new("div")
            .class("company-item")
            .attr("data-company", "\"><script>alert(1)</script>")
            .text("A & B <i>")
            .into();
        assert_eq!(
            html(&node),
            "<div class=\"company-item\" data-company=\"&quot;&gt;&lt;script&gt;alert(1)&lt;/script&gt;\">A &amp; B &lt;i&gt;</div>"
        );
    }

    #[test]
    fn test_text_rendering() {
        let node: Node = Element::new("div")
            .child(Element::new("h2").text("NIFTY 50"))
            .child(
                Element::new("div")
                    .class("stat-card")
                    .child(Element::new("div").text("Open"))
                    .child(Element::new("div").text("₹100.00")),
            )
            .child(
                Element::new("select")
                    .child(Element::new("option").attr("value", "a").text("a"))
                    .child(Element::new("option").attr("value", "b").attr("selected", "").text("b")),
            )
            .child(Element::new("canvas").id("price-chart"))
            .into();

        assert_eq!(
            text(&node),
            "== NIFTY 50 ==\nOpen: ₹100.00\nDates: a [b]\n[chart #price-chart]"
        );
    }

    #[test]
    fn test_text_marks_active_item() {
        let node: Node = Element::new("div")
            .child(Element::new("div").class("company-item").class("active").text("NIFTY 50"))
            .child(Element::new("div").class("company-item").text("NIFTY IT"))
            .into();
        assert_eq!(text(&node), "* 1. NIFTY 50\n  2. NIFTY IT");
    }
}
