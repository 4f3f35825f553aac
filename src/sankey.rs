use ahash::AHashMap;
use tracing::debug;

use crate::hover;
use crate::record::{Medal, Record};
use crate::relative::{round_percent, ValueMode};
use crate::theme;

/// Number of best-represented countries always shown in the medal flow.
pub const TOP_COUNTRIES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Country,
    Medal(Medal),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowNode {
    /// Unique within the graph: the NOC for countries, `<Medal>_<NOC>` for
    /// medal nodes.
    pub id: String,
    pub label: String,
    pub noc: String,
    pub kind: NodeKind,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowLink {
    pub source: usize,
    pub target: usize,
    pub value: f64,
    pub medal: Medal,
    pub noc: String,
    pub color: String,
}

/// Medal-outcome flow from countries to per-country medal categories.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowGraph {
    pub mode: ValueMode,
    pub nodes: Vec<FlowNode>,
    pub links: Vec<FlowLink>,
    pub selected_country_available: bool,
    pub node_hover: String,
    pub link_hover: String,
}

impl FlowGraph {
    pub fn country_nodes(&self) -> impl Iterator<Item = &FlowNode> {
        self.nodes.iter().filter(|n| n.kind == NodeKind::Country)
    }

    /// Outgoing links of the country node with the given NOC.
    pub fn links_from<'a>(&'a self, noc: &'a str) -> impl Iterator<Item = &'a FlowLink> + 'a {
        self.links.iter().filter(move |l| l.noc == noc)
    }
}

pub fn medal_node_id(medal: Medal, noc: &str) -> String {
    format!("{}_{}", medal.as_str(), noc)
}

/// The three countries with most records in `records` (ties by code), plus
/// `selected` when it appears in `records` and is not already among them.
pub fn countries_of_interest(records: &[&Record], selected: Option<&str>) -> Vec<String> {
    let mut totals: AHashMap<&str, u64> = AHashMap::new();
    for record in records {
        *totals.entry(record.noc.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<(&str, u64)> = totals.iter().map(|(noc, n)| (*noc, *n)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut countries: Vec<String> = ranked
        .iter()
        .take(TOP_COUNTRIES)
        .map(|(noc, _)| noc.to_string())
        .collect();

    if let Some(noc) = selected {
        if totals.contains_key(noc) && !countries.iter().any(|c| c == noc) {
            countries.push(noc.to_string());
        }
    }

    countries
}

/// Builds the medal flow for `countries` over `records`. Countries without
/// any record in `records` have no defined shares and are left out.
/// Returns `None` when no country is left to show.
pub fn build_medal_flow(
    records: &[&Record],
    countries: &[String],
    selected: Option<&str>,
    mode: ValueMode,
) -> Option<FlowGraph> {
    let mut tallies: AHashMap<&str, [u64; 4]> = AHashMap::new();
    let mut labels: AHashMap<&str, &str> = AHashMap::new();
    for record in records {
        let slot = tallies.entry(record.noc.as_str()).or_default();
        slot[record.medal as usize] += 1;
        if let Some(region) = record.region.as_deref() {
            labels.entry(record.noc.as_str()).or_insert(region);
        }
    }

    let countries: Vec<&String> = countries
        .iter()
        .filter(|noc| tallies.contains_key(noc.as_str()))
        .collect();
    if countries.is_empty() {
        return None;
    }

    // ─────────────────────────────────────────────
    // Nodes: countries first, then 4 medal nodes per country
    // ─────────────────────────────────────────────
    let mut nodes: Vec<FlowNode> = countries
        .iter()
        .map(|&noc| FlowNode {
            id: noc.clone(),
            label: labels.get(noc.as_str()).copied().unwrap_or(noc.as_str()).to_string(),
            noc: noc.clone(),
            kind: NodeKind::Country,
            color: if selected == Some(noc.as_str()) {
                theme::SELECTED_COUNTRY_NODE
            } else {
                theme::COUNTRY_NODE
            }
            .to_string(),
        })
        .collect();

    for &noc in &countries {
        for medal in Medal::ALL {
            nodes.push(FlowNode {
                id: medal_node_id(medal, noc),
                label: medal.as_str().to_string(),
                noc: noc.clone(),
                kind: NodeKind::Medal(medal),
                color: theme::medal_color(medal).to_string(),
            });
        }
    }

    // ─────────────────────────────────────────────
    // Links: one per (country, medal), medal order fixed
    // ─────────────────────────────────────────────
    let mut links = Vec::with_capacity(countries.len() * Medal::ALL.len());
    for (ci, &noc) in countries.iter().enumerate() {
        let tally = tallies.get(noc.as_str()).copied().unwrap_or_default();
        let weights = medal_weights(&tally, mode);

        for (mi, medal) in Medal::ALL.into_iter().enumerate() {
            links.push(FlowLink {
                source: ci,
                target: countries.len() + ci * Medal::ALL.len() + mi,
                value: weights[mi],
                medal,
                noc: noc.clone(),
                color: theme::hex_to_rgba(theme::medal_color(medal), theme::LINK_ALPHA)
                    .unwrap_or_else(|| theme::medal_color(medal).to_string()),
            });
        }
    }

    let selected_country_available = selected.is_some_and(|s| countries.iter().any(|c| c.as_str() == s));
    debug!(
        countries = countries.len(),
        links = links.len(),
        selected_country_available,
        "built medal flow"
    );

    Some(FlowGraph {
        mode,
        nodes,
        links,
        selected_country_available,
        node_hover: hover::country_node_hover(mode),
        link_hover: hover::medal_link_hover(mode),
    })
}

/// Edge weights in `Medal::ALL` order. The no-medal weight is always the
/// remainder after the podium weights.
fn medal_weights(tally: &[u64; 4], mode: ValueMode) -> [f64; 4] {
    let podium = [tally[0], tally[1], tally[2]];
    let total: u64 = tally.iter().sum();
    let podium_total: u64 = podium.iter().sum();

    match mode {
        ValueMode::Absolute => [
            podium[0] as f64,
            podium[1] as f64,
            podium[2] as f64,
            total.saturating_sub(podium_total) as f64,
        ],
        ValueMode::Relative => {
            if total == 0 {
                return [0.0; 4];
            }
            let pct = |n: u64| round_percent(100.0 * n as f64 / total as f64);
            let (g, s, b) = (pct(podium[0]), pct(podium[1]), pct(podium[2]));
            [g, s, b, round_percent(100.0 - g - s - b).max(0.0)]
        }
    }
}

/// Countries of interest and their flow graph in one step, as the
/// dashboard uses it.
pub fn medal_flow_for_selection(
    records: &[&Record],
    selected: Option<&str>,
    mode: ValueMode,
) -> Option<FlowGraph> {
    let countries = countries_of_interest(records, selected);
    build_medal_flow(records, &countries, selected, mode)
}
