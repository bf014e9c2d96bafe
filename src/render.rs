use crate::calendar::{
    CalendarIndex, TooltipContent, WEEKDAYS, classify, date_key, days_in_month, leading_blanks,
};
use crate::models::{CalendarData, DayRecord};
use crate::tooltip::TooltipController;
use chrono::NaiveDate;
use std::fmt::Write;
use tracing::warn;

pub const CONTAINER_ID: &str = "calendar-container";

/// Minimal element tree the calendar is built into before serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub tag: &'static str,
    pub classes: Vec<&'static str>,
    pub attrs: Vec<(&'static str, String)>,
    pub text: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            classes: Vec::new(),
            attrs: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn div(class: &'static str) -> Self {
        Self::new("div").class(class)
    }

    pub fn class(mut self, class: &'static str) -> Self {
        self.classes.push(class);
        self
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| *c == class)
    }

    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Depth-first list of every descendant carrying `class`.
    pub fn find_all(&self, class: &str) -> Vec<&Node> {
        let mut found = Vec::new();
        self.collect(class, &mut found);
        found
    }

    fn collect<'a>(&'a self, class: &str, found: &mut Vec<&'a Node>) {
        for child in &self.children {
            if child.has_class(class) {
                found.push(child);
            }
            child.collect(class, found);
        }
    }

    pub fn text_content(&self) -> String {
        let mut out = self.text.clone().unwrap_or_default();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        if !self.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", self.classes.join(" "));
        }
        for (name, value) in &self.attrs {
            let _ = write!(out, " {name}=\"{}\"", escape(value));
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn container() -> Node {
    Node::new("div").attr("id", CONTAINER_ID)
}

/// Repopulates `container` with one block per year present in `data`, and
/// registers every day that carries a tooltip with `controller`.
pub fn render(container: &mut Node, data: &CalendarData, controller: &mut TooltipController) {
    container.children.clear();

    let index = CalendarIndex::build(data);
    for year in index.years() {
        let mut month_grid = Node::div("month-grid");
        for month in 1..=12 {
            if let Some(block) = render_month(year, month, data, controller) {
                month_grid.push(block);
            }
        }

        container.push(
            Node::div("year-calendar")
                .child(Node::new("h2").class("year-title").text(format!("{year}年")))
                .child(month_grid),
        );
    }
}

fn render_month(
    year: i32,
    month: u32,
    data: &CalendarData,
    controller: &mut TooltipController,
) -> Option<Node> {
    let (Some(blanks), Some(days)) = (leading_blanks(year, month), days_in_month(year, month))
    else {
        warn!("skipping invalid month {year}-{month:02}");
        return None;
    };

    let mut weekdays = Node::div("weekdays");
    for name in WEEKDAYS {
        weekdays.push(Node::new("span").text(name));
    }

    let mut day_grid = Node::div("day-grid");
    for _ in 0..blanks {
        day_grid.push(Node::div("day").class("empty"));
    }

    for day in 1..=days {
        let key = date_key(year, month, day);
        let cell = match (data.get(&key), NaiveDate::from_ymd_opt(year, month, day)) {
            (Some(record), Some(date)) => {
                controller.register(date);
                day_cell(day, &key, record)
            }
            _ => Node::div("day").text(day.to_string()),
        };
        day_grid.push(cell);
    }

    Some(
        Node::div("month-calendar")
            .child(Node::new("h3").class("month-title").text(format!("{month}月")))
            .child(weekdays)
            .child(day_grid),
    )
}

fn day_cell(day: u32, key: &str, record: &DayRecord) -> Node {
    Node::div("day")
        .class(classify(&record.impact_level).css_class())
        .attr("data-date", key)
        .text(day.to_string())
        .child(tooltip_node(&TooltipContent::from_record(record)))
}

fn tooltip_node(content: &TooltipContent) -> Node {
    let mut tooltip = Node::div("tooltip")
        .attr("role", "tooltip")
        .child(Node::new("strong").text(content.heading.clone()));

    for line in &content.lines {
        tooltip.push(Node::new("p").text(line.clone()));
    }

    if !content.events.is_empty() {
        tooltip.push(Node::new("p").text("イベント:"));
        let mut list = Node::new("ul");
        for event in &content.events {
            list.push(Node::new("li").text(event.clone()));
        }
        tooltip.push(list);
    }

    tooltip
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventRecord, ImpactLevel};

    fn record(date: &str, level: &str) -> DayRecord {
        DayRecord {
            date: date.to_string(),
            demand_score: 55.0,
            impact_level: ImpactLevel::from(level.to_string()),
            monthly_trend_score: None,
            is_holiday: false,
            holiday_name: None,
            events: Vec::new(),
        }
    }

    fn rendered(data: &CalendarData) -> (Node, TooltipController) {
        let mut root = container();
        let mut controller = TooltipController::new();
        render(&mut root, data, &mut controller);
        (root, controller)
    }

    #[test]
    fn renders_twelve_months_per_year() {
        let mut data = CalendarData::new();
        data.insert("2024-02-10".into(), record("2024-02-10", "High"));
        data.insert("2025-07-01".into(), record("2025-07-01", "Low"));

        let (root, controller) = rendered(&data);
        let years = root.find_all("year-calendar");
        assert_eq!(years.len(), 2);
        assert_eq!(years[0].find_all("year-title")[0].text_content(), "2024年");
        for year in years {
            assert_eq!(year.find_all("month-calendar").len(), 12);
        }
        assert_eq!(controller.len(), 2);
    }

    #[test]
    fn month_grid_has_blanks_and_days() {
        let mut data = CalendarData::new();
        data.insert("2024-02-10".into(), record("2024-02-10", "High"));

        let (root, _) = rendered(&data);
        let months = root.find_all("month-calendar");
        let february = months[1];
        assert_eq!(february.find_all("month-title")[0].text_content(), "2月");

        let grid = &february.find_all("day-grid")[0];
        let blanks = grid.children.iter().filter(|c| c.has_class("empty")).count();
        let numbered = grid.children.iter().filter(|c| !c.has_class("empty")).count();
        assert_eq!(blanks, 4);
        assert_eq!(numbered, 29);

        let weekdays = &february.find_all("weekdays")[0];
        let header: Vec<_> = weekdays.children.iter().map(Node::text_content).collect();
        assert_eq!(header, WEEKDAYS);
    }

    #[test]
    fn day_cells_carry_class_and_tooltip() {
        let mut data = CalendarData::new();
        let mut day = record("2025-03-03", "Unknown");
        day.events.push(EventRecord {
            subject: "Board Meeting".into(),
            event_type: "Internal".into(),
            estimated_attendees: 12,
            location: None,
            impact_level: None,
        });
        data.insert("2025-03-03".into(), day);
        data.insert("2025-03-04".into(), record("2025-03-04", "Medium"));

        let (root, controller) = rendered(&data);
        let low = root.find_all("low-demand");
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].attr_value("data-date"), Some("2025-03-03"));

        let text = low[0].find_all("tooltip")[0].text_content();
        assert!(text.contains("Board Meeting"));
        assert!(text.contains("Internal"));
        assert!(text.contains("12"));

        assert_eq!(root.find_all("medium-demand").len(), 1);
        assert_eq!(root.find_all("tooltip").len(), 2);
        assert!(controller.is_registered(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap()));
    }

    #[test]
    fn rerender_replaces_previous_tree() {
        let mut data = CalendarData::new();
        data.insert("2025-01-01".into(), record("2025-01-01", "High"));

        let mut root = container();
        let mut controller = TooltipController::new();
        render(&mut root, &data, &mut controller);
        render(&mut root, &data, &mut controller);
        assert_eq!(root.find_all("year-calendar").len(), 1);
    }

    #[test]
    fn html_is_escaped() {
        let node = Node::div("tooltip").attr("data-x", "\"a\"").text("<b>&</b>");
        assert_eq!(
            node.to_html(),
            "<div class=\"tooltip\" data-x=\"&quot;a&quot;\">&lt;b&gt;&amp;&lt;/b&gt;</div>"
        );
        assert_eq!(
            container().to_html(),
            "<div id=\"calendar-container\"></div>"
        );
    }
}
