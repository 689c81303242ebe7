//! 详情视图
//!
//! 展示某一日的记录：当前价格、涨跌、日期选择、图表画布和统计卡片

use super::chart::{CANVAS_ID, CURRENCY};
use super::format::{format_int, format_value, Trend};
use super::view::{Element, Node};
use crate::models::{CanonicalRecord, FieldMap, RawRecord};

/// 日期下拉框 id
pub const DATE_SELECT_ID: &str = "dateDropdown";

/// 选取要展示的记录及其位置：指定日期时精确匹配，否则取最后一条
pub fn select_record<'a>(
    series: &'a [RawRecord],
    fields: &FieldMap,
    date: Option<&str>,
) -> Option<(usize, &'a RawRecord)> {
    match date {
        Some(date) => series
            .iter()
            .enumerate()
            .find(|(_, record)| fields.date_of(record).as_deref() == Some(date)),
        None => series.len().checked_sub(1).map(|index| (index, &series[index])),
    }
}

/// 记录缺少涨跌数据时，用前一条记录的收盘值推算
pub fn derive_change(mut record: CanonicalRecord, previous: Option<&CanonicalRecord>) -> CanonicalRecord {
    let prev_close = previous.and_then(|p| p.close);
    if let (None, Some(close), Some(prev_close)) = (record.points_change, record.close, prev_close) {
        let change = close - prev_close;
        record.points_change = Some(change);
        if record.change_percent.is_none() && prev_close != 0.0 {
            record.change_percent = Some(change / prev_close * 100.0);
        }
    }
    record
}

/// 价格摘要卡片，所有数值均已格式化
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCard {
    pub entity: String,
    pub date: Option<String>,
    pub price: String,
    pub change: String,
    pub change_percent: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub volume: String,
    pub pb_ratio: String,
    pub pe_ratio: String,
    pub div_yield: String,
    pub turnover: String,
    pub trend: Trend,
}

impl SummaryCard {
    pub fn build(entity: &str, record: &CanonicalRecord) -> Self {
        let change = format_value(&record.points_change);
        Self {
            entity: entity.to_string(),
            date: record.date.clone(),
            price: format_value(&record.close),
            trend: Trend::of(&change),
            change,
            change_percent: format_value(&record.change_percent),
            open: format_value(&record.open),
            high: format_value(&record.high),
            low: format_value(&record.low),
            volume: format_int(&record.volume),
            pb_ratio: format_value(&record.pb_ratio),
            pe_ratio: format_value(&record.pe_ratio),
            div_yield: format_value(&record.div_yield),
            turnover: format_int(&record.turnover),
        }
    }
}

/// 渲染详情，找不到指定日期时返回提示节点
pub fn render_detail(
    entity: &str,
    series: &[RawRecord],
    fields: &FieldMap,
    date: Option<&str>,
) -> Result<Node, Node> {
    let (index, current) = match select_record(series, fields, date) {
        Some(selected) => selected,
        None => {
            return Err(alert(
                "alert-warning",
                format!("No data for {}", date.unwrap_or("the selected date")),
            ))
        }
    };

    let previous = index
        .checked_sub(1)
        .map(|i| CanonicalRecord::from_raw(&series[i], fields));
    let record = derive_change(CanonicalRecord::from_raw(current, fields), previous.as_ref());
    let card = SummaryCard::build(entity, &record);
    let dates: Vec<String> = series.iter().filter_map(|r| fields.date_of(r)).collect();
    Ok(card_markup(&card, &dates))
}

fn card_markup(card: &SummaryCard, dates: &[String]) -> Node {
    let change_text = match card.trend.marker() {
        Some(marker) => format!("{} {} ({}%)", marker, card.change, card.change_percent),
        None => format!("{} ({}%)", card.change, card.change_percent),
    };

    let header = Element::new("div").class("stock-header").child(
        Element::new("div")
            .class("company-details")
            .child(Element::new("h2").class("company-name").text(card.entity.as_str()))
            .child(
                Element::new("div")
                    .class("price-info")
                    .child(Element::new("div").class("current-price").text(format!("{}{}", CURRENCY, card.price)))
                    .child(
                        Element::new("div")
                            .class("price-change")
                            .class(card.trend.class())
                            .text(change_text),
                    ),
            ),
    );

    let options = dates.iter().map(|date| {
        let option = Element::new("option").attr("value", date.as_str());
        let option = if card.date.as_deref() == Some(date.as_str()) {
            option.attr("selected", "")
        } else {
            option
        };
        option.text(date.as_str())
    });
    let filters = Element::new("div").class("filters").class("mb-4").child(
        Element::new("select")
            .id(DATE_SELECT_ID)
            .class("date-filter")
            .class("form-select")
            .children(options),
    );

    let chart = Element::new("div")
        .id("price-chart-container")
        .child(Element::new("canvas").id(CANVAS_ID));

    let prices = Element::new("div")
        .class("stats-cards")
        .class("mt-4")
        .child(stat_card("Open", format!("{}{}", CURRENCY, card.open)))
        .child(stat_card("High", format!("{}{}", CURRENCY, card.high)))
        .child(stat_card("Low", format!("{}{}", CURRENCY, card.low)))
        .child(stat_card("Volume", card.volume.clone()));

    let ratios = Element::new("div")
        .class("stats-cards")
        .class("mt-3")
        .child(stat_card("P/B Ratio", card.pb_ratio.clone()))
        .child(stat_card("P/E Ratio", card.pe_ratio.clone()))
        .child(stat_card("Div. Yield", format!("{}%", card.div_yield)))
        .child(stat_card("Turnover", format!("{}{} Cr", CURRENCY, card.turnover)));

    Element::new("div")
        .class("chart-container")
        .child(header)
        .child(filters)
        .child(chart)
        .child(prices)
        .child(ratios)
        .into()
}

fn stat_card(title: &str, value: String) -> Element {
    Element::new("div")
        .class("stat-card")
        .child(Element::new("div").class("stat-title").text(title))
        .child(Element::new("div").class("stat-value").text(value))
}

fn alert(kind: &str, message: String) -> Node {
    Element::new("div").class("alert").class(kind).text(message).into()
}

/// 加载中
pub fn loading(entity: &str, date: Option<&str>) -> Node {
    let message = match date {
        Some(date) => format!("Loading {} data for {}...", entity, date),
        None => format!("Loading {} data...", entity),
    };
    Element::new("div").class("loading").text(message).into()
}

/// 结果为空
pub fn no_data(entity: &str, date: Option<&str>) -> Node {
    match date {
        Some(date) => alert("alert-warning", format!("No data available for {} on {}", entity, date)),
        None => alert("alert-warning", format!("No data available for {}", entity)),
    }
}

/// 响应体携带的错误
pub fn payload_error(message: &str) -> Node {
    alert("alert-danger", message.to_string())
}

/// 网络或状态码错误
pub fn load_error(entity: &str, date: Option<&str>, message: &str) -> Node {
    match date {
        Some(date) => alert(
            "alert-danger",
            format!("Error loading data for {} on {}: {}", entity, date, message),
        ),
        None => alert("alert-danger", format!("Error loading data for {}: {}", entity, message)),
    }
}

/// 渲染失败
pub fn render_error(message: &str) -> Node {
    alert("alert-danger", format!("Error rendering view: {}", message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn series(values: Vec<Value>) -> Vec<RawRecord> {
        values.into_iter().map(|v| v.as_object().cloned().unwrap()).collect()
    }

    fn text_of(node: &Node, class: &str) -> String {
        node.find_by_class(class)
            .first()
            .map(|e| e.text_content())
            .unwrap_or_default()
    }

    #[test]
    fn test_latest_record_by_default() {
        let series = series(vec![
            json!({ "index_date": "2024-01-01", "closing_index_value": "100" }),
            json!({ "index_date": "2024-01-02", "closing_index_value": "105", "points_change": "5" }),
        ]);
        let fields = FieldMap::detect(&series);
        let node = render_detail("NIFTY 50", &series, &fields, None).unwrap();

        assert_eq!(text_of(&node, "current-price"), "₹105.00");
        let change = node.find_by_class("price-change");
        assert!(change[0].has_class("price-positive"));
        assert!(change[0].text_content().starts_with("▲"));
    }

    #[test]
    fn test_change_derived_from_previous_close() {
        let series = series(vec![
            json!({ "index_date": "2024-01-01", "closing_index_value": "100" }),
            json!({ "index_date": "2024-01-02", "closing_index_value": "105" }),
        ]);
        let fields = FieldMap::detect(&series);
        let node = render_detail("NIFTY 50", &series, &fields, None).unwrap();
        assert_eq!(text_of(&node, "price-change"), "▲ 5.00 (5.00%)");

        // 第一条记录没有前值，涨跌保持缺失
        let (index, first) = select_record(&series, &fields, Some("2024-01-01")).unwrap();
        assert_eq!(index, 0);
        let record = CanonicalRecord::from_raw(first, &fields);
        let card = SummaryCard::build("NIFTY 50", &derive_change(record, None));
        assert_eq!(card.price, "100.00");
        assert_eq!(card.change, "No Data");
        assert_eq!(card.trend, Trend::Hidden);
    }

    #[test]
    fn test_reported_change_wins_over_derived() {
        let current = CanonicalRecord { close: Some(105.0), points_change: Some(-1.0), ..Default::default() };
        let previous = CanonicalRecord { close: Some(100.0), ..Default::default() };
        let record = derive_change(current, Some(&previous));
        assert_eq!(record.points_change, Some(-1.0));
        assert_eq!(record.change_percent, None);
    }

    #[test]
    fn test_unparseable_close_hides_trend() {
        let series = series(vec![json!({ "index_date": "2024-01-01", "closing_index_value": "abc" })]);
        let fields = FieldMap::detect(&series);
        let node = render_detail("NIFTY 50", &series, &fields, None).unwrap();

        assert_eq!(text_of(&node, "current-price"), "₹No Data");
        let change = node.find_by_class("price-change");
        assert!(!change[0].text_content().contains('▲'));
        assert!(!change[0].text_content().contains('▼'));
        assert!(change[0].has_class("price-neutral"));
    }

    #[test]
    fn test_exact_date_selection() {
        let series = series(vec![
            json!({ "index_date": "2024-01-01", "closing_index_value": 100, "points_change": -2.5 }),
            json!({ "index_date": "2024-01-02", "closing_index_value": 105, "points_change": 5 }),
        ]);
        let fields = FieldMap::detect(&series);
        let node = render_detail("NIFTY 50", &series, &fields, Some("2024-01-01")).unwrap();

        assert_eq!(text_of(&node, "current-price"), "₹100.00");
        assert!(node.find_by_class("price-change")[0].has_class("price-negative"));

        let select = node.find_by_id(DATE_SELECT_ID).unwrap();
        let options: Vec<&Element> = select.children.iter().filter_map(Node::as_element).collect();
        assert_eq!(options.len(), 2);
        assert!(options[0].get_attr("selected").is_some());
        assert!(options[1].get_attr("selected").is_none());
    }

    #[test]
    fn test_missing_date_warning() {
        let series = series(vec![json!({ "index_date": "2024-01-01", "closing_index_value": 100 })]);
        let fields = FieldMap::detect(&series);
        let warning = render_detail("NIFTY 50", &series, &fields, Some("2023-12-31")).unwrap_err();
        assert_eq!(warning.text_content(), "No data for 2023-12-31");
        assert!(warning.find_by_id(CANVAS_ID).is_none());
    }

    #[test]
    fn test_stat_cards() {
        let series = series(vec![json!({
            "index_date": "2024-01-01",
            "closing_index_value": 21741.9,
            "open_index_value": 21700.5,
            "high_index_value": 21800,
            "low_index_value": 21650.123,
            "volume": 250000000,
            "pb_ratio": 3.9,
            "pe_ratio": 22.81,
            "div_yield": "1.3",
            "turnover_rs_cr": 24512.47,
        })]);
        let fields = FieldMap::detect(&series);
        let node = render_detail("NIFTY 50", &series, &fields, None).unwrap();

        let cards: Vec<String> = node
            .find_by_class("stat-value")
            .iter()
            .map(|e| e.text_content())
            .collect();
        assert_eq!(
            cards,
            vec!["₹21700.50", "₹21800.00", "₹21650.12", "250,000,000", "3.90", "22.81", "1.30%", "₹24,512.47 Cr"]
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(loading("NIFTY 50", None).text_content(), "Loading NIFTY 50 data...");
        assert_eq!(
            loading("NIFTY 50", Some("2024-01-01")).text_content(),
            "Loading NIFTY 50 data for 2024-01-01..."
        );
        assert_eq!(no_data("NIFTY 50", None).text_content(), "No data available for NIFTY 50");
        assert_eq!(
            load_error("NIFTY 50", None, "Server returned 500: Internal Server Error").text_content(),
            "Error loading data for NIFTY 50: Server returned 500: Internal Server Error"
        );
        assert_eq!(render_error("boom").text_content(), "Error rendering view: boom");
    }
}
