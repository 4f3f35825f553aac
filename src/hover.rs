//! Tooltip templates handed to the chart renderer alongside each view.

use crate::relative::ValueMode;

fn measure(mode: ValueMode) -> &'static str {
    match mode {
        ValueMode::Absolute => "Count",
        ValueMode::Relative => "Percentage",
    }
}

pub fn age_distribution_hover(mode: ValueMode) -> String {
    let value = match mode {
        ValueMode::Absolute => "%{marker.size:.0f}",
        ValueMode::Relative => "%{marker.size:.1f}",
    };
    format!(
        "Year: %{{x}}<br>Age Group Midpoint: %{{y}}<br>{}: {}<extra></extra>",
        measure(mode),
        value
    )
}

pub fn country_node_hover(mode: ValueMode) -> String {
    let value = match mode {
        ValueMode::Absolute => "Athletes: %{value:.0f}",
        ValueMode::Relative => "Share: %{value:.2f}%",
    };
    format!("Country: %{{label}} (%{{customdata}})<br>{value}<extra></extra>")
}

pub fn medal_link_hover(mode: ValueMode) -> String {
    let value = match mode {
        ValueMode::Absolute => "%{value:.0f}",
        ValueMode::Relative => "%{value:.2f}%",
    };
    format!(
        "Medal: %{{customdata[0]}}<br>Country: %{{customdata[1]}}<br>{}: {}<extra></extra>",
        measure(mode),
        value
    )
}
