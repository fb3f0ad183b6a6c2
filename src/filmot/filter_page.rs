use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use crate::filmot::element_text;

static ORDER_BY_HANDLER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"orderByField\('([^']+)','([^']+)'\)").expect("sort handler pattern"));
static QUICK_DATE_HANDLER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\('#startdate'\)\.val\('([^']+)'\)").expect("quick date pattern"));

/// One entry of the "Sort By" panel.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SortOptionDescriptor {
    pub text: String,
    pub target: SortTarget,
}

/// Where a sort link leads: a `(field, order)` pair recovered from its inline
/// handler, or the raw link target when the handler does not match.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum SortTarget {
    Field { field: String, order: String },
    Link(String),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TextControl {
    pub id: String,
    pub default: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SliderControl {
    pub id: String,
    pub default: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SelectChoice {
    pub value: Option<String>,
    pub label: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SelectControl {
    pub id: String,
    pub options: Vec<SelectChoice>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DateControl {
    pub id: String,
    pub default: Option<String>,
}

/// A "quick date range" shortcut button and the start date its handler fills in.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuickDateRange {
    pub label: String,
    pub start_date: String,
}

/// The filter and sort controls a results page offers.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FilterSet {
    pub sort_options: Vec<SortOptionDescriptor>,
    pub title: Option<TextControl>,
    pub views: Option<SliderControl>,
    pub likes: Option<SliderControl>,
    pub duration: Option<SliderControl>,
    pub license: Option<SelectControl>,
    pub start_date: Option<DateControl>,
    pub end_date: Option<DateControl>,
    pub quick_date_ranges: Vec<QuickDateRange>,
}

/// Walks the filter accordion of a results page. Best-effort throughout: a
/// page without the accordion yields an empty set, and every control is
/// extracted independently of the others.
pub fn parse_filter_page(html: &str) -> FilterSet {
    let document = Html::parse_document(html);
    let accordion_selector = Selector::parse("div#accordion").expect("accordion selector");
    let Some(accordion) = document.select(&accordion_selector).next() else {
        return FilterSet::default();
    };
    let mut filter_set = FilterSet {
        sort_options: parse_sort_options(accordion),
        ..FilterSet::default()
    };
    parse_controls(accordion, &mut filter_set);
    filter_set
}

/// The "Sort By" header references its collapsible panel by element id; each
/// link inside the panel carries an inline handler naming the sort field and
/// order.
fn parse_sort_options(accordion: ElementRef) -> Vec<SortOptionDescriptor> {
    let header_selector = Selector::parse("div.card-header").expect("header selector");
    let link_selector = Selector::parse("a[href]").expect("sort link selector");
    let Some(header) = accordion
        .select(&header_selector)
        .find(|header| element_text(*header).contains("Sort By"))
    else {
        return Vec::new();
    };
    let Some(panel_id) = header
        .value()
        .attr("href")
        .map(|href| href.trim_start_matches('#'))
    else {
        return Vec::new();
    };
    let Some(panel) = find_div_by_id(accordion, panel_id) else {
        return Vec::new();
    };
    let mut options = Vec::new();
    for link in panel.select(&link_selector) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let target = match ORDER_BY_HANDLER.captures(href) {
            Some(captures) => SortTarget::Field {
                field: captures[1].to_owned(),
                order: captures[2].to_owned(),
            },
            None => SortTarget::Link(href.to_owned()),
        };
        options.push(SortOptionDescriptor {
            text: element_text(link),
            target,
        });
    }
    options
}

fn parse_controls(accordion: ElementRef, filter_set: &mut FilterSet) {
    let panel_selector = Selector::parse("div#collapseZero").expect("filter panel selector");
    let Some(panel) = accordion.select(&panel_selector).next() else {
        return;
    };

    if let Some(input) = find_input_by_id(panel, "qtitle") {
        filter_set.title = Some(TextControl {
            id: "qtitle".to_owned(),
            default: input.value().attr("value").unwrap_or("").to_owned(),
        });
    }

    filter_set.views = parse_slider(panel, "sliderviews");
    filter_set.likes = parse_slider(panel, "sliderlikes");
    filter_set.duration = parse_slider(panel, "sliderduration");

    let license_selector = Selector::parse("select#licenseFilter").expect("license selector");
    let option_selector = Selector::parse("option").expect("option selector");
    if let Some(select) = panel.select(&license_selector).next() {
        let options = select
            .select(&option_selector)
            .map(|option| SelectChoice {
                value: option.value().attr("value").map(str::to_owned),
                label: element_text(option),
                selected: option.value().attr("selected").is_some(),
            })
            .collect();
        filter_set.license = Some(SelectControl {
            id: "licenseFilter".to_owned(),
            options,
        });
    }

    filter_set.start_date = parse_date_input(panel, "startdate");
    filter_set.end_date = parse_date_input(panel, "enddate");

    let dropdown_selector = Selector::parse("div.dropdown-menu").expect("dropdown selector");
    let shortcut_selector =
        Selector::parse("button.dateoptionselect").expect("date shortcut selector");
    if let Some(dropdown) = panel.select(&dropdown_selector).next() {
        for button in dropdown.select(&shortcut_selector) {
            let onclick = button.value().attr("onclick").unwrap_or("");
            if let Some(captures) = QUICK_DATE_HANDLER.captures(onclick) {
                filter_set.quick_date_ranges.push(QuickDateRange {
                    label: element_text(button),
                    start_date: captures[1].to_owned(),
                });
            }
        }
    }
}

fn parse_slider(panel: ElementRef, id: &str) -> Option<SliderControl> {
    let input = find_input_by_id(panel, id)?;
    Some(SliderControl {
        id: id.to_owned(),
        default: input.value().attr("value").map(str::to_owned),
    })
}

fn parse_date_input(panel: ElementRef, id: &str) -> Option<DateControl> {
    let input = find_input_by_id(panel, id)?;
    Some(DateControl {
        id: id.to_owned(),
        default: input.value().attr("value").map(str::to_owned),
    })
}

fn find_input_by_id<'a>(panel: ElementRef<'a>, id: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(&format!("input#{id}")).expect("input selector");
    panel.select(&selector).next()
}

fn find_div_by_id<'a>(scope: ElementRef<'a>, id: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse("div[id]").expect("div id selector");
    scope
        .select(&selector)
        .find(|div| div.value().attr("id") == Some(id))
}
