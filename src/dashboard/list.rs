//! 公司列表视图
//!
//! 搜索在已获取的完整列表上进行，不区分大小写，从不重新请求

use super::view::{Element, Node};

/// 按关键字过滤，空关键字返回完整列表
pub fn filter_entities<'a>(entities: &'a [String], query: &str) -> Vec<&'a String> {
    let needle = query.to_lowercase();
    entities
        .iter()
        .filter(|name| needle.is_empty() || name.to_lowercase().contains(&needle))
        .collect()
}

/// 渲染列表：N 个可点击条目，或恰好一个占位提示
pub fn render_list(visible: &[&String], total: usize, query: &str, selected: Option<&str>) -> Node {
    if visible.is_empty() {
        let message = if total == 0 {
            "No companies found".to_string()
        } else {
            format!("No results for \"{}\"", query)
        };
        return Element::new("div")
            .class("p-3")
            .class("text-muted")
            .text(message)
            .into();
    }

    Element::new("div")
        .class("company-list")
        .children(visible.iter().map(|name| {
            let item = Element::new("div").class("company-item");
            let item = if selected == Some(name.as_str()) { item.class("active") } else { item };
            item.attr("data-company", name.as_str()).text(name.as_str())
        }))
        .into()
}

/// 列表加载失败
pub fn render_list_error(message: &str) -> Node {
    Element::new("div")
        .class("p-3")
        .class("text-danger")
        .text(format!("Error loading companies: {}", message))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_filter_case_insensitive() {
        let all = names(&["NIFTY 50", "Nifty Bank", "SENSEX"]);
        assert_eq!(filter_entities(&all, "nifty"), vec!["NIFTY 50", "Nifty Bank"]);
        assert_eq!(filter_entities(&all, "BANK"), vec!["Nifty Bank"]);
        assert_eq!(filter_entities(&all, "").len(), 3);
        assert!(filter_entities(&all, "midcap").is_empty());
        // 同样输入结果相同
        assert_eq!(filter_entities(&all, "ni"), filter_entities(&all, "ni"));
    }

    #[test]
    fn test_items_or_single_placeholder() {
        let all = names(&["NIFTY 50", "NIFTY IT"]);

        let visible = filter_entities(&all, "");
        let node = render_list(&visible, all.len(), "", Some("NIFTY IT"));
        let items = node.find_by_class("company-item");
        assert_eq!(items.len(), 2);
        assert!(node.find_by_class("text-muted").is_empty());
        assert!(items[1].has_class("active"));
        assert!(!items[0].has_class("active"));
        assert_eq!(items[0].get_attr("data-company"), Some("NIFTY 50"));

        let visible = filter_entities(&all, "zzz");
        let node = render_list(&visible, all.len(), "zzz", None);
        assert!(node.find_by_class("company-item").is_empty());
        assert_eq!(node.find_by_class("text-muted").len(), 1);
        assert_eq!(node.text_content(), "No results for \"zzz\"");

        let empty: Vec<String> = Vec::new();
        let node = render_list(&filter_entities(&empty, ""), 0, "", None);
        assert_eq!(node.text_content(), "No companies found");
        assert!(node.find_by_class("company-item").is_empty());
    }

    #[test]
    fn test_list_error() {
        assert_eq!(
            render_list_error("Server returned 500: Internal Server Error").text_content(),
            "Error loading companies: Server returned 500: Internal Server Error"
        );
    }
}
