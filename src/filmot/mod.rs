mod cards;
mod channel;
mod embedded_json;
mod filter_page;

pub use cards::{parse_video_cards, VideoRecord};
pub use channel::{channel_id_from_page, Channel};
pub use embedded_json::extract_embedded_object;
pub use filter_page::{
    parse_filter_page, DateControl, FilterSet, QuickDateRange, SelectChoice, SelectControl,
    SliderControl, SortOptionDescriptor, SortTarget, TextControl,
};

use scraper::ElementRef;

pub(crate) fn element_text(element: ElementRef) -> String {
    element.text().collect::<Vec<_>>().join("").trim().to_owned()
}

pub(crate) fn collapsed_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
