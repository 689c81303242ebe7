//! 开发者模式：展示接口返回的数据结构

use super::view::{Element, Node};
use crate::models::RawRecord;

/// 字段列表及首条记录
pub fn render_structure(series: &[RawRecord]) -> Option<Node> {
    let sample = series.first()?;
    let keys: Vec<&str> = sample.keys().map(String::as_str).collect();
    let pretty = serde_json::to_string_pretty(sample).unwrap_or_else(|e| e.to_string());

    log::debug!("数据结构: {:?}", keys);

    Some(
        Element::new("div")
            .class("debug")
            .child(
                Element::new("div")
                    .class("alert")
                    .class("alert-info")
                    .class("mb-4")
                    .child(Element::new("strong").text("Data Structure Detected:"))
                    .text(format!(" Available fields: {}", keys.join(", "))),
            )
            .child(
                Element::new("div")
                    .class("debug-section")
                    .class("mb-4")
                    .child(Element::new("div").class("debug-title").text("Sample Data Item (First Record)"))
                    .child(Element::new("pre").class("debug-content").text(pretty)),
            )
            .into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structure_lists_fields_in_order() {
        let series = vec![json!({ "index_name": "NIFTY 50", "index_date": "2024-01-01", "volume": 10 })
            .as_object()
            .cloned()
            .unwrap()];
        let node = render_structure(&series).unwrap();
        let info = &node.find_by_class("alert-info")[0];
        assert_eq!(
            info.text_content(),
            "Data Structure Detected: Available fields: index_name, index_date, volume"
        );
        assert!(node.find_by_class("debug-content")[0].text_content().contains("\"volume\": 10"));
        assert!(render_structure(&[]).is_none());
    }
}
